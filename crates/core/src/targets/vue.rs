//! TanStack Query for Vue.
//!
//! Hook inputs may be refs or getters, so every read goes through `toValue`
//! and the key is recomputed inside `computed`.

use crate::ir::{TsExpr, TsPrimitive, TsType};

use super::{
    DisabledState, LibraryImport, MutationShape, TargetAdapter, mutation_variables, omit,
};

const PACKAGE: &str = "@tanstack/vue-query";
const VUE: &str = "vue";

/// `@tanstack/vue-query`: reactive `enabled`, args read through `toValue`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VueQueryAdapter;

fn maybe_ref(ty: TsType) -> TsType {
    TsType::generic("MaybeRefOrGetter", vec![ty])
}

impl TargetAdapter for VueQueryAdapter {
    fn name(&self) -> &'static str {
        "vue-query"
    }

    fn disabled_state(&self) -> DisabledState {
        DisabledState::EnabledFlag
    }

    fn unwrap_args(&self, expr: TsExpr) -> TsExpr {
        TsExpr::call(TsExpr::ident("toValue"), vec![expr])
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

    fn hook_args_type(&self, args: TsType) -> TsType {
        maybe_ref(TsType::Union(vec![
            args,
            TsType::Primitive(TsPrimitive::Undefined),
        ]))
    }

    fn enabled_type(&self) -> TsType {
        maybe_ref(TsType::Primitive(TsPrimitive::Boolean))
    }

    fn reactive_key(&self, key: TsExpr) -> TsExpr {
        TsExpr::call(
            TsExpr::ident("computed"),
            vec![TsExpr::Arrow {
                is_async: false,
                params: vec![],
                body: Box::new(key),
            }],
        )
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
            &["queryKey", "queryFn", "enabled"],
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

    fn read_imports(&self, has_args: bool) -> Vec<LibraryImport> {
        let mut imports = vec![
            LibraryImport::named(PACKAGE, "queryOptions"),
            LibraryImport::named(PACKAGE, "useQuery"),
            LibraryImport::type_only(PACKAGE, "QueryKey"),
            LibraryImport::type_only(PACKAGE, "UseQueryOptions"),
            LibraryImport::named(VUE, "toValue"),
            LibraryImport::type_only(VUE, "MaybeRefOrGetter"),
        ];
        if has_args {
            imports.push(LibraryImport::named(VUE, "computed"));
        }
        imports
    }

    fn write_imports(&self) -> Vec<LibraryImport> {
        vec![
            LibraryImport::named(PACKAGE, "useMutation"),
            LibraryImport::type_only(PACKAGE, "UseMutationOptions"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Emit;

    #[test]
    fn test_reactive_types() {
        let adapter = VueQueryAdapter;
        assert_eq!(
            adapter.hook_args_type(TsType::named("GetItemArgs")).emit(),
            "MaybeRefOrGetter<GetItemArgs | undefined>"
        );
        assert_eq!(adapter.enabled_type().emit(), "MaybeRefOrGetter<boolean>");
    }

    #[test]
    fn test_reactive_key_is_computed() {
        let key = VueQueryAdapter.reactive_key(TsExpr::call(TsExpr::ident("getItemKey"), vec![]));
        assert_eq!(key.emit(), "computed(() => getItemKey())");
    }

    #[test]
    fn test_computed_import_only_with_args() {
        let has = |imports: Vec<LibraryImport>| {
            imports.contains(&LibraryImport::named("vue", "computed"))
        };
        assert!(has(VueQueryAdapter.read_imports(true)));
        assert!(!has(VueQueryAdapter.read_imports(false)));
    }
}
