//! Target adapters: the per-library differences the emitter is parameterised by.
//!
//! The emission algorithm is fixed. An adapter only decides how a disabled
//! query is expressed, how reactive inputs are read, how the mutation function
//! is called, and which library names and types the generated code uses.

mod swr;
mod tanstack;
mod vue;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::ir::{TsExpr, TsPrimitive, TsType};

pub use swr::SwrAdapter;
pub use tanstack::TanstackReactAdapter;
pub use vue::VueQueryAdapter;

/// How a hook tells its library not to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisabledState {
    /// The key itself becomes `null` (`useSWR(null, ...)`).
    NullKey,
    /// The query function becomes `skipToken`.
    SkipToken,
    /// A reactive `enabled` getter is passed alongside the key.
    EnabledFlag,
}

/// How the mutation function receives its args.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationShape {
    /// `mutationFn: (args) => ...`
    Positional,
    /// `(_key, { arg }) => ...`
    KeyAndArg,
}

/// One import the generated code needs from a library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryImport {
    Named {
        from: &'static str,
        name: &'static str,
    },
    Type {
        from: &'static str,
        name: &'static str,
    },
    Default {
        from: &'static str,
        name: &'static str,
    },
}

impl LibraryImport {
    pub const fn named(from: &'static str, name: &'static str) -> Self {
        Self::Named { from, name }
    }

    pub const fn type_only(from: &'static str, name: &'static str) -> Self {
        Self::Type { from, name }
    }

    pub const fn default_export(from: &'static str, name: &'static str) -> Self {
        Self::Default { from, name }
    }
}

/// Library-specific customisation points of the binding emitter.
pub trait TargetAdapter: fmt::Debug + Send + Sync {
    /// Target name, also the output directory.
    fn name(&self) -> &'static str;

    fn disabled_state(&self) -> DisabledState;

    /// Read a hook input before use. Identity for non-reactive libraries.
    fn unwrap_args(&self, expr: TsExpr) -> TsExpr {
        expr
    }

    fn mutation_shape(&self) -> MutationShape;

    /// Whether `get<Name>QueryOptions` / `get<Name>MutationOptions` are emitted.
    fn supports_option_builders(&self) -> bool;

    /// Whether the query function receives an `AbortSignal`.
    fn forwards_signal(&self) -> bool;

    /// Type of the hook's `args` parameter, given the args type.
    fn hook_args_type(&self, args: TsType) -> TsType {
        TsType::Union(vec![args, TsType::Primitive(TsPrimitive::Undefined)])
    }

    /// Type of the hook's `enabled` option.
    fn enabled_type(&self) -> TsType {
        TsType::Primitive(TsPrimitive::Boolean)
    }

    /// Wrap a key expression that depends on reactive args.
    fn reactive_key(&self, key: TsExpr) -> TsExpr {
        key
    }

    /// The library's query hook (`useQuery`, `useSWR`).
    fn query_hook(&self) -> &'static str;

    /// The library's mutation hook (`useMutation`, `useSWRMutation`).
    fn mutation_hook(&self) -> &'static str;

    /// Type of a key override.
    fn key_type(&self) -> TsType;

    /// Type of the library options a caller may pass to the query hook.
    fn query_overrides_type(&self, response: TsType) -> TsType;

    /// Type of the library options a caller may pass to the mutation hook.
    /// `args` is `None` for operations that take no args.
    fn mutation_overrides_type(&self, response: TsType, args: Option<TsType>) -> TsType;

    /// Imports needed by a read operation's bindings.
    fn read_imports(&self, has_args: bool) -> Vec<LibraryImport>;

    /// Imports needed by a write operation's bindings.
    fn write_imports(&self) -> Vec<LibraryImport>;
}

/// Built-in targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    TanstackReact,
    Swr,
    VueQuery,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::TanstackReact, Target::Swr, Target::VueQuery];

    pub fn name(self) -> &'static str {
        self.adapter().name()
    }

    /// One-line description for `routebind targets`.
    pub fn description(self) -> &'static str {
        match self {
            Target::TanstackReact => "TanStack Query for React (@tanstack/react-query)",
            Target::Swr => "SWR (swr, swr/mutation)",
            Target::VueQuery => "TanStack Query for Vue (@tanstack/vue-query)",
        }
    }

    pub fn adapter(self) -> &'static dyn TargetAdapter {
        match self {
            Target::TanstackReact => &TanstackReactAdapter,
            Target::Swr => &SwrAdapter,
            Target::VueQuery => &VueQueryAdapter,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| {
                let known: Vec<_> = Target::ALL.iter().map(|t| t.name()).collect();
                format!("unknown target `{s}` (expected one of: {})", known.join(", "))
            })
    }
}

/// `Omit<T, "a" | "b">`
pub(crate) fn omit(ty: TsType, keys: &[&str]) -> TsType {
    TsType::generic(
        "Omit",
        vec![
            ty,
            TsType::Union(keys.iter().map(|k| TsType::string_literal(*k)).collect()),
        ],
    )
}

/// `MutationArgs` type argument: the args type or `void`.
pub(crate) fn mutation_variables(args: Option<TsType>) -> TsType {
    args.unwrap_or(TsType::Primitive(TsPrimitive::Void))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ir::Emit;

    #[test]
    fn test_target_names_round_trip() {
        for target in Target::ALL {
            assert_eq!(target.name().parse::<Target>(), Ok(target));
        }
        assert_eq!(Target::TanstackReact.to_string(), "tanstack-react");
        assert_eq!(Target::VueQuery.name(), "vue-query");
    }

    #[test]
    fn test_unknown_target() {
        let err = "solid-query".parse::<Target>().unwrap_err();
        assert!(err.contains("tanstack-react, swr, vue-query"));
    }

    #[test]
    fn test_target_deserializes_kebab_case() {
        let targets: Vec<Target> = serde_json::from_str(r#"["swr", "vue-query"]"#).unwrap();
        assert_eq!(targets, [Target::Swr, Target::VueQuery]);
    }

    #[test]
    fn test_customisation_points_differ() {
        let states: Vec<_> = Target::ALL
            .iter()
            .map(|t| t.adapter().disabled_state())
            .collect();
        assert_eq!(
            states,
            [DisabledState::SkipToken, DisabledState::NullKey, DisabledState::EnabledFlag]
        );
        assert_eq!(Target::Swr.adapter().mutation_shape(), MutationShape::KeyAndArg);
        assert!(!Target::Swr.adapter().supports_option_builders());

        let args = TsExpr::ident("args");
        assert_eq!(Target::TanstackReact.adapter().unwrap_args(args.clone()).emit(), "args");
        assert_eq!(Target::VueQuery.adapter().unwrap_args(args).emit(), "toValue(args)");
    }

    #[test]
    fn test_omit() {
        let ty = omit(TsType::named("Options"), &["queryKey", "queryFn"]);
        assert_eq!(ty.emit(), "Omit<Options, \"queryKey\" | \"queryFn\">");
    }
}
