//! Success classification of response status codes.

use std::fmt;
use std::str::FromStr;

use crate::error::GenerateError;

/// One pattern: a status class (`2XX`) or an exact code (`304`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPattern {
    Class(u8),
    Exact(u16),
}

impl StatusPattern {
    pub fn matches(self, status: u16) -> bool {
        match self {
            StatusPattern::Class(class) => status / 100 == u16::from(class),
            StatusPattern::Exact(code) => status == code,
        }
    }
}

impl FromStr for StatusPattern {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GenerateError::InvalidStatusPattern(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 3 {
            return Err(invalid());
        }

        if bytes[1..].iter().all(|b| b.eq_ignore_ascii_case(&b'X')) {
            return match bytes[0] {
                b @ b'1'..=b'5' => Ok(StatusPattern::Class(b - b'0')),
                _ => Err(invalid()),
            };
        }

        match s.parse::<u16>() {
            Ok(code) if (100..=599).contains(&code) => Ok(StatusPattern::Exact(code)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for StatusPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusPattern::Class(class) => write!(f, "{class}XX"),
            StatusPattern::Exact(code) => write!(f, "{code}"),
        }
    }
}

/// Which statuses count as success for typing purposes.
///
/// Defaults to every 2XX and 3XX status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPredicate {
    patterns: Vec<StatusPattern>,
}

impl Default for StatusPredicate {
    fn default() -> Self {
        Self {
            patterns: vec![StatusPattern::Class(2), StatusPattern::Class(3)],
        }
    }
}

impl StatusPredicate {
    /// Build from textual patterns (`"2XX"`, `"304"`).
    pub fn parse<S: AsRef<str>>(patterns: &[S]) -> Result<Self, GenerateError> {
        let patterns = patterns
            .iter()
            .map(|p| p.as_ref().trim().parse())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, status: u16) -> bool {
        self.patterns.iter().any(|p| p.matches(status))
    }

    pub fn patterns(&self) -> &[StatusPattern] {
        &self.patterns
    }
}
