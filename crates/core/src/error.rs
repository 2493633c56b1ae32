//! Generation errors and warnings.

use std::fmt;

use thiserror::Error;

use crate::descriptor::HttpMethod;

/// Fatal generation errors. Each structural error carries the offending
/// method and path so the upstream document can be corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// A static and a parameter segment are required at the same tree position.
    #[error(
        "{method} {path}: segment {position} `{incoming}` conflicts with existing segment `{existing}` at the same position"
    )]
    AmbiguousSegment {
        method: HttpMethod,
        path: String,
        position: usize,
        existing: String,
        incoming: String,
    },

    /// The same (path, method) pair appears twice.
    #[error("{method} {path}: duplicate operation")]
    DuplicateOperation { method: HttpMethod, path: String },

    /// Two distinct operations synthesized the same identifier.
    #[error(
        "identifier `{identifier}` produced by both {first_method} {first_path} and {second_method} {second_path}"
    )]
    IdentifierCollision {
        identifier: String,
        first_method: HttpMethod,
        first_path: String,
        second_method: HttpMethod,
        second_path: String,
    },

    /// Declared path parameters do not match the parameter segments of the path.
    #[error("{method} {path}: path parameters {declared:?} do not match path segments {segments:?}")]
    PathParameterMismatch {
        method: HttpMethod,
        path: String,
        declared: Vec<String>,
        segments: Vec<String>,
    },

    /// The method is not one of GET, POST, PUT, PATCH, DELETE.
    #[error("{path}: unsupported HTTP method `{method}`")]
    InvalidMethod { method: String, path: String },

    /// The descriptor document could not be parsed.
    #[error("failed to parse route descriptors: {0}")]
    InvalidDescriptors(String),

    /// A success-status pattern is neither `NXX` nor a status code.
    #[error("invalid status pattern `{0}` (expected e.g. `2XX` or `304`)")]
    InvalidStatusPattern(String),

    /// The generator configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Non-fatal findings recorded during generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// No response status is classified as success; the success type is `unknown`.
    NoSuccessResponse { method: HttpMethod, path: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NoSuccessResponse { method, path } => write!(
                f,
                "{method} {path}: no success response, success type falls back to `unknown`"
            ),
        }
    }
}
