//! Identifier and cache-key synthesis.
//!
//! Everything here is a pure function of one (method, path) pair. Sibling
//! routes are never consulted, so adding a route cannot rename an existing
//! binding.

use crate::descriptor::HttpMethod;
use crate::ir::utils::{capitalize_first, to_pascal_case};
use crate::tree::{Segment, SegmentKind, route_template};

/// Namespace used when a path has no static segment.
pub const INDEX_PREFIX: &str = "index";

/// Names and keys derived from one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    /// camelCase fragment: `getGuildsGuildIdBansUserId`.
    pub identifier_base: String,
    /// First static segment (`guilds`), or `index`.
    pub cache_key_prefix: String,
    /// `/guilds/:guild_id/bans/:user_id`
    pub route_template: String,
    pub cache_key: CacheKey,
}

/// Cache key shape of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheKey {
    /// `[template]` or `[template, args]`.
    Read { template: String, has_args: bool },
    /// `[METHOD, template]`, used for mutation bookkeeping only.
    Write { method: HttpMethod, template: String },
}

/// One element of a cache-key tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyToken {
    Literal(String),
    /// The caller-supplied args value.
    Args,
}

impl CacheKey {
    /// Tuple elements in order.
    pub fn tokens(&self) -> Vec<KeyToken> {
        match self {
            CacheKey::Read { template, has_args } => {
                let mut tokens = vec![KeyToken::Literal(template.clone())];
                if *has_args {
                    tokens.push(KeyToken::Args);
                }
                tokens
            }
            CacheKey::Write { method, template } => vec![
                KeyToken::Literal(method.as_str().to_string()),
                KeyToken::Literal(template.clone()),
            ],
        }
    }
}

impl Synthesis {
    /// PascalCase form of the base (`GetGuildsGuildIdBansUserId`).
    pub fn pascal(&self) -> String {
        capitalize_first(&self.identifier_base)
    }

    /// Every identifier derived from the base.
    pub fn names(&self) -> Names {
        let pascal = self.pascal();
        Names {
            invoker: self.identifier_base.clone(),
            key_getter: format!("get{pascal}Key"),
            query_options: format!("get{pascal}QueryOptions"),
            hook: format!("use{pascal}"),
            mutation_key: format!("get{pascal}MutationKey"),
            mutation_options: format!("get{pascal}MutationOptions"),
            args_type: format!("{pascal}Args"),
            response_type: format!("{pascal}Response"),
        }
    }

    /// File stem of the route module this operation lands in.
    ///
    /// Characters that are awkward in file names are dropped. `index` is
    /// reserved for the barrel module and becomes `_index`.
    pub fn module_name(&self) -> String {
        let stem: String = self
            .cache_key_prefix
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            .collect();
        let stem = stem.trim_matches('.');
        if stem.is_empty() || stem == INDEX_PREFIX {
            format!("_{INDEX_PREFIX}")
        } else {
            stem.to_string()
        }
    }
}

/// Identifiers derived from one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
    pub invoker: String,
    pub key_getter: String,
    pub query_options: String,
    pub hook: String,
    pub mutation_key: String,
    pub mutation_options: String,
    pub args_type: String,
    pub response_type: String,
}

/// Synthesize identifier base, cache-key prefix, route template and key shape.
///
/// `has_args` tells whether the operation declares inputs; it only affects the
/// read key, which carries the args value as its last element.
pub fn synthesize(method: HttpMethod, path: &[Segment], has_args: bool) -> Synthesis {
    let mut identifier_base = method.lower().to_string();
    if path.is_empty() {
        identifier_base.push_str("Index");
    }
    for segment in path {
        identifier_base.push_str(&to_pascal_case(&segment.name));
    }

    let cache_key_prefix = path
        .iter()
        .find(|s| s.kind == SegmentKind::Static)
        .map_or_else(|| INDEX_PREFIX.to_string(), |s| s.name.clone());

    let template = route_template(path);
    let cache_key = if method == HttpMethod::Get {
        CacheKey::Read {
            template: template.clone(),
            has_args,
        }
    } else {
        CacheKey::Write {
            method,
            template: template.clone(),
        }
    };

    Synthesis {
        identifier_base,
        cache_key_prefix,
        route_template: template,
        cache_key,
    }
}
