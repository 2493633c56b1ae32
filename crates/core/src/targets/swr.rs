//! SWR.

use crate::ir::TsType;

use super::{DisabledState, LibraryImport, MutationShape, TargetAdapter};

const PACKAGE: &str = "swr";
const MUTATION_PACKAGE: &str = "swr/mutation";

/// `swr` + `swr/mutation`: a `null` key disables, mutations receive `{ arg }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwrAdapter;

impl TargetAdapter for SwrAdapter {
    fn name(&self) -> &'static str {
        "swr"
    }

    fn disabled_state(&self) -> DisabledState {
        DisabledState::NullKey
    }

    fn mutation_shape(&self) -> MutationShape {
        MutationShape::KeyAndArg
    }

    fn supports_option_builders(&self) -> bool {
        false
    }

    // SWR fetchers get no cancellation signal.
    fn forwards_signal(&self) -> bool {
        false
    }

    fn query_hook(&self) -> &'static str {
        "useSWR"
    }

    fn mutation_hook(&self) -> &'static str {
        "useSWRMutation"
    }

    fn key_type(&self) -> TsType {
        TsType::named("Key")
    }

    fn query_overrides_type(&self, response: TsType) -> TsType {
        TsType::generic("SWRConfiguration", vec![response])
    }

    fn mutation_overrides_type(&self, response: TsType, args: Option<TsType>) -> TsType {
        TsType::generic(
            "SWRMutationConfiguration",
            vec![
                response,
                TsType::named("Error"),
                TsType::named("Key"),
                args.unwrap_or_else(|| TsType::named("never")),
            ],
        )
    }

    fn read_imports(&self, _has_args: bool) -> Vec<LibraryImport> {
        vec![
            LibraryImport::default_export(PACKAGE, "useSWR"),
            LibraryImport::type_only(PACKAGE, "Key"),
            LibraryImport::type_only(PACKAGE, "SWRConfiguration"),
        ]
    }

    fn write_imports(&self) -> Vec<LibraryImport> {
        vec![
            LibraryImport::default_export(MUTATION_PACKAGE, "useSWRMutation"),
            LibraryImport::type_only(PACKAGE, "Key"),
            LibraryImport::type_only(MUTATION_PACKAGE, "SWRMutationConfiguration"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Emit;

    #[test]
    fn test_mutation_overrides_without_args() {
        let ty = SwrAdapter.mutation_overrides_type(TsType::named("void"), None);
        assert_eq!(ty.emit(), "SWRMutationConfiguration<void, Error, Key, never>");
    }

    #[test]
    fn test_imports_use_default_hooks() {
        let read = SwrAdapter.read_imports(true);
        assert!(read.contains(&LibraryImport::default_export("swr", "useSWR")));
        let write = SwrAdapter.write_imports();
        assert!(write.contains(&LibraryImport::default_export("swr/mutation", "useSWRMutation")));
    }
}
