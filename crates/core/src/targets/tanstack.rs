//! TanStack Query for React.

use crate::ir::TsType;

use super::{
    DisabledState, LibraryImport, MutationShape, TargetAdapter, mutation_variables, omit,
};

const PACKAGE: &str = "@tanstack/react-query";

/// `@tanstack/react-query`: `skipToken` disables, args pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TanstackReactAdapter;

impl TargetAdapter for TanstackReactAdapter {
    fn name(&self) -> &'static str {
        "tanstack-react"
    }

    fn disabled_state(&self) -> DisabledState {
        DisabledState::SkipToken
    }

    fn mutation_shape(&self) -> MutationShape {
        MutationShape::Positional
    }

    fn supports_option_builders(&self) -> bool {
        true
    }

    fn forwards_signal(&self) -> bool {
        true
    }

    fn query_hook(&self) -> &'static str {
        "useQuery"
    }

    fn mutation_hook(&self) -> &'static str {
        "useMutation"
    }

    fn key_type(&self) -> TsType {
        TsType::named("QueryKey")
    }

    fn query_overrides_type(&self, response: TsType) -> TsType {
        omit(
            TsType::generic("UseQueryOptions", vec![response]),
            &["queryKey", "queryFn"],
        )
    }

    fn mutation_overrides_type(&self, response: TsType, args: Option<TsType>) -> TsType {
        omit(
            TsType::generic(
                "UseMutationOptions",
                vec![response, TsType::named("Error"), mutation_variables(args)],
            ),
            &["mutationKey", "mutationFn"],
        )
    }

    fn read_imports(&self, _has_args: bool) -> Vec<LibraryImport> {
        vec![
            LibraryImport::named(PACKAGE, "queryOptions"),
            LibraryImport::named(PACKAGE, "skipToken"),
            LibraryImport::named(PACKAGE, "useQuery"),
            LibraryImport::type_only(PACKAGE, "QueryKey"),
            LibraryImport::type_only(PACKAGE, "UseQueryOptions"),
        ]
    }

    fn write_imports(&self) -> Vec<LibraryImport> {
        vec![
            LibraryImport::named(PACKAGE, "useMutation"),
            LibraryImport::type_only(PACKAGE, "UseMutationOptions"),
        ]
    }
}
