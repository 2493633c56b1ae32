//! Builders for the TypeScript functions of one operation.
//!
//! Every builder returns an AST value. Network work always goes through
//! `invokeAndParse(routeHandle, args, clientOptions)`; hooks only decide
//! whether a key exists and which function the library calls.

use std::iter;

use crate::compose::OperationClass;
use crate::ir::utils::needs_bracket_notation;
use crate::ir::{
    BinOp, ObjectEntry, TsExpr, TsFunction, TsLiteral, TsParam, TsPrimitive, TsProp, TsStmt,
    TsType, TsTypeDef,
};
use crate::synth::KeyToken;
use crate::targets::{DisabledState, MutationShape, TargetAdapter};
use crate::tree::OperationDescriptor;

use super::{BindingKind, OperationPlan};

pub(super) const CLIENT: &str = "client";
pub(super) const INVOKE_AND_PARSE: &str = "invokeAndParse";
pub(super) const CLIENT_OPTIONS_TYPE: &str = "ClientOptions";
const CLIENT_OPTIONS: &str = "clientOptions";
const ARGS: &str = "args";

/// Transport accessor chain: `client.guilds[":guild_id"].$get`.
pub(super) fn route_handle(operation: &OperationDescriptor) -> TsExpr {
    let mut handle = TsExpr::ident(CLIENT);
    if operation.path.is_empty() {
        handle = handle.member("index");
    }
    for segment in &operation.path {
        let key = segment.template();
        handle = if needs_bracket_notation(&key) {
            handle.index(TsExpr::string(key))
        } else {
            handle.member(key)
        };
    }
    handle.member(format!("${}", operation.method.lower()))
}

fn doc_lines(operation: &OperationDescriptor) -> Vec<String> {
    let mut doc = Vec::new();
    if let Some(summary) = &operation.summary {
        doc.extend(
            summary
                .lines()
                .map(|line| line.trim().replace("*/", "*\\/")),
        );
        doc.push(String::new());
    }
    doc.push(format!("{} {}", operation.method, operation.template()));
    if operation.deprecated {
        doc.push("@deprecated".into());
    }
    doc
}

fn args_type(plan: &OperationPlan<'_>) -> Option<TsType> {
    plan.composed
        .requires_args
        .then(|| TsType::named(plan.names.args_type.clone()))
}

fn response_type(plan: &OperationPlan<'_>) -> TsType {
    TsType::named(plan.names.response_type.clone())
}

fn client_options_param() -> TsParam {
    TsParam::optional(CLIENT_OPTIONS, TsType::named(CLIENT_OPTIONS_TYPE))
}

fn prop(name: &str, ty: TsType) -> TsProp {
    TsProp {
        name: name.into(),
        ty,
        optional: true,
    }
}

fn arrow(params: Vec<TsParam>, body: TsExpr) -> TsExpr {
    TsExpr::Arrow {
        is_async: false,
        params,
        body: Box::new(body),
    }
}

/// `const { a: b, c } = options ?? {};`
fn destructure_options(bindings: &[(&str, Option<&str>)]) -> TsStmt {
    TsStmt::Destructure {
        bindings: bindings
            .iter()
            .map(|(key, alias)| ((*key).to_string(), alias.map(str::to_string)))
            .collect(),
        init: TsExpr::ident("options").bin(BinOp::Nullish, TsExpr::Object(vec![])),
    }
}

fn export_function(name: &str, params: Vec<TsParam>, body: Vec<TsStmt>) -> TsFunction {
    TsFunction {
        name: name.to_string(),
        doc: vec![],
        type_params: vec![],
        params,
        return_type: None,
        body,
        is_async: false,
        is_export: true,
        is_arrow: false,
    }
}

fn export_arrow(
    name: &str,
    params: Vec<TsParam>,
    return_type: Option<TsType>,
    result: TsExpr,
) -> TsFunction {
    TsFunction {
        is_arrow: true,
        return_type,
        ..export_function(name, params, vec![TsStmt::Return(Some(result))])
    }
}

/// `get<Name>Key(args)` / `get<Name>Key()`
fn key_call(plan: &OperationPlan<'_>, args: Option<TsExpr>) -> TsExpr {
    TsExpr::call(
        TsExpr::ident(plan.names.key_getter.clone()),
        args.into_iter().collect(),
    )
}

/// `<invoker>(args, clientOptions)` / `<invoker>(clientOptions)`
fn invoke_call(plan: &OperationPlan<'_>, args: Option<TsExpr>, client_options: TsExpr) -> TsExpr {
    TsExpr::call(
        TsExpr::ident(plan.names.invoker.clone()),
        args.into_iter().chain(iter::once(client_options)).collect(),
    )
}

/// Query function handed to the library. Forwards the library's
/// `AbortSignal` inside the client options when the library supplies one.
fn query_fn(plan: &OperationPlan<'_>, adapter: &dyn TargetAdapter, args: Option<TsExpr>) -> TsExpr {
    if adapter.forwards_signal() {
        let with_signal = TsExpr::Object(vec![
            ObjectEntry::Spread(TsExpr::ident(CLIENT_OPTIONS)),
            ObjectEntry::Shorthand("signal".into()),
        ]);
        arrow(
            vec![TsParam {
                name: "{ signal }".into(),
                ty: None,
                optional: false,
            }],
            invoke_call(plan, args, with_signal),
        )
    } else {
        arrow(vec![], invoke_call(plan, args, TsExpr::ident(CLIENT_OPTIONS)))
    }
}

fn key_tuple(plan: &OperationPlan<'_>) -> TsExpr {
    TsExpr::const_tuple(
        plan.synthesis
            .cache_key
            .tokens()
            .into_iter()
            .map(|token| match token {
                KeyToken::Literal(text) => TsExpr::string(text),
                KeyToken::Args => TsExpr::ident(ARGS),
            })
            .collect(),
    )
}

/// `export type <Name>Args = ...;` and `export type <Name>Response = ...;`
pub(super) fn type_defs(plan: &OperationPlan<'_>) -> Vec<TsTypeDef> {
    let mut defs = Vec::new();
    if let Some(shape) = &plan.composed.arg_shape {
        defs.push(TsTypeDef {
            name: plan.names.args_type.clone(),
            ty: shape.clone(),
        });
    }
    defs.push(TsTypeDef {
        name: plan.names.response_type.clone(),
        ty: plan.composed.response.clone(),
    });
    defs
}

/// Plain invocation wrapper.
pub(super) fn invoker(plan: &OperationPlan<'_>) -> TsFunction {
    let mut params = Vec::new();
    let args = match args_type(plan) {
        Some(ty) => {
            params.push(TsParam::typed(ARGS, ty));
            TsExpr::ident(ARGS)
        }
        None => TsExpr::undefined(),
    };
    params.push(client_options_param());

    let call = TsExpr::call(
        TsExpr::ident(INVOKE_AND_PARSE),
        vec![route_handle(plan.operation), args, TsExpr::ident(CLIENT_OPTIONS)],
    );

    TsFunction {
        doc: doc_lines(plan.operation),
        ..export_arrow(
            &plan.names.invoker,
            params,
            Some(TsType::generic("Promise", vec![response_type(plan)])),
            call,
        )
    }
}

/// `get<Name>Key`: the read cache key.
pub(super) fn key_getter(plan: &OperationPlan<'_>) -> TsFunction {
    let params = args_type(plan)
        .map(|ty| TsParam::optional(ARGS, ty))
        .into_iter()
        .collect();
    export_arrow(&plan.names.key_getter, params, None, key_tuple(plan))
}

/// `get<Name>MutationKey`: `[METHOD, template]`.
pub(super) fn mutation_key(plan: &OperationPlan<'_>) -> TsFunction {
    export_arrow(&plan.names.mutation_key, vec![], None, key_tuple(plan))
}

/// `get<Name>QueryOptions(args, clientOptions?)` built with the library's `queryOptions`.
pub(super) fn query_options(plan: &OperationPlan<'_>, adapter: &dyn TargetAdapter) -> TsFunction {
    let mut params = Vec::new();
    if let Some(ty) = args_type(plan) {
        params.push(TsParam::typed(ARGS, ty));
    }
    params.push(client_options_param());

    let args = plan.composed.requires_args.then(|| TsExpr::ident(ARGS));
    let options = TsExpr::Object(vec![
        ObjectEntry::Prop("queryKey".into(), key_call(plan, args.clone())),
        ObjectEntry::Prop("queryFn".into(), query_fn(plan, adapter, args)),
    ]);

    export_function(
        &plan.names.query_options,
        params,
        vec![TsStmt::Return(Some(TsExpr::call(
            TsExpr::ident("queryOptions"),
            vec![options],
        )))],
    )
}

/// `use<Name>(args, options?)` for a read operation.
pub(super) fn query_hook(plan: &OperationPlan<'_>, adapter: &dyn TargetAdapter) -> TsFunction {
    let mut params = Vec::new();
    if let Some(ty) = args_type(plan) {
        params.push(TsParam::typed(ARGS, adapter.hook_args_type(ty)));
    }
    params.push(TsParam::optional(
        "options",
        TsType::Object(vec![
            prop("query", adapter.query_overrides_type(response_type(plan))),
            prop("queryKey", adapter.key_type()),
            prop("enabled", adapter.enabled_type()),
            prop("client", TsType::named(CLIENT_OPTIONS_TYPE)),
        ]),
    ));

    let read_args = plan
        .composed
        .requires_args
        .then(|| adapter.unwrap_args(TsExpr::ident(ARGS)));

    // Default key always comes from the key getter.
    let key = TsExpr::ident("customKey").bin(BinOp::Nullish, key_call(plan, read_args.clone()));

    let mut enabled = adapter
        .unwrap_args(TsExpr::ident("enabled"))
        .bin(BinOp::StrictNotEqual, TsExpr::Literal(TsLiteral::Bool(false)));
    if let Some(read) = &read_args {
        enabled = enabled.bin(
            BinOp::And,
            read.clone().bin(BinOp::StrictNotEqual, TsExpr::undefined()),
        );
    }

    let state = adapter.disabled_state();
    // Only `skipToken` narrows `args` inside the query function; the other
    // libraries call it after checking the key, so the type is asserted.
    let fetch_args = match (&read_args, args_type(plan)) {
        (Some(read), Some(ty)) if state != DisabledState::SkipToken => Some(TsExpr::Cast {
            expr: Box::new(read.clone()),
            ty,
        }),
        _ => read_args.clone(),
    };
    let fetch = query_fn(plan, adapter, fetch_args);
    let overrides = TsExpr::ident("queryOverrides");
    let hook = TsExpr::ident(adapter.query_hook());

    let call = match state {
        DisabledState::SkipToken => TsExpr::call(
            hook,
            vec![TsExpr::Object(vec![
                ObjectEntry::Prop("queryKey".into(), key),
                ObjectEntry::Prop(
                    "queryFn".into(),
                    TsExpr::Ternary {
                        cond: Box::new(enabled),
                        then_expr: Box::new(fetch),
                        else_expr: Box::new(TsExpr::ident("skipToken")),
                    },
                ),
                ObjectEntry::Spread(overrides),
            ])],
        ),
        DisabledState::NullKey => TsExpr::call(
            hook,
            vec![
                TsExpr::Ternary {
                    cond: Box::new(enabled),
                    then_expr: Box::new(key),
                    else_expr: Box::new(TsExpr::Literal(TsLiteral::Null)),
                },
                fetch,
                overrides,
            ],
        ),
        DisabledState::EnabledFlag => {
            let key = if read_args.is_some() {
                adapter.reactive_key(key)
            } else {
                key
            };
            TsExpr::call(
                hook,
                vec![TsExpr::Object(vec![
                    ObjectEntry::Prop("queryKey".into(), key),
                    ObjectEntry::Prop("queryFn".into(), fetch),
                    ObjectEntry::Prop("enabled".into(), arrow(vec![], enabled)),
                    ObjectEntry::Spread(overrides),
                ])],
            )
        }
    };

    TsFunction {
        doc: doc_lines(plan.operation),
        ..export_function(
            &plan.names.hook,
            params,
            vec![
                destructure_options(&[
                    ("query", Some("queryOverrides")),
                    ("queryKey", Some("customKey")),
                    ("enabled", None),
                    ("client", Some(CLIENT_OPTIONS)),
                ]),
                TsStmt::Return(Some(call)),
            ],
        )
    }
}

/// The function a mutation hook hands to its library.
fn mutation_fn(plan: &OperationPlan<'_>, shape: MutationShape) -> TsExpr {
    let client_options = TsExpr::ident(CLIENT_OPTIONS);
    match (args_type(plan), shape) {
        (None, _) => arrow(vec![], invoke_call(plan, None, client_options)),
        (Some(ty), MutationShape::Positional) => arrow(
            vec![TsParam::typed(ARGS, ty)],
            invoke_call(plan, Some(TsExpr::ident(ARGS)), client_options),
        ),
        (Some(ty), MutationShape::KeyAndArg) => arrow(
            vec![
                TsParam::typed("_key", TsType::Primitive(TsPrimitive::Unknown)),
                TsParam::typed(
                    "{ arg }",
                    TsType::Object(vec![TsProp {
                        name: "arg".into(),
                        ty,
                        optional: false,
                    }]),
                ),
            ],
            invoke_call(plan, Some(TsExpr::ident("arg")), client_options),
        ),
    }
}

fn mutation_key_call(plan: &OperationPlan<'_>) -> TsExpr {
    TsExpr::call(TsExpr::ident(plan.names.mutation_key.clone()), vec![])
}

/// `get<Name>MutationOptions(clientOptions?)`
pub(super) fn mutation_options(
    plan: &OperationPlan<'_>,
    adapter: &dyn TargetAdapter,
) -> TsFunction {
    let options = TsExpr::Object(vec![
        ObjectEntry::Prop("mutationKey".into(), mutation_key_call(plan)),
        ObjectEntry::Prop("mutationFn".into(), mutation_fn(plan, adapter.mutation_shape())),
    ]);
    export_function(
        &plan.names.mutation_options,
        vec![client_options_param()],
        vec![TsStmt::Return(Some(options))],
    )
}

/// `use<Name>(options?)` for a write operation.
pub(super) fn mutation_hook(plan: &OperationPlan<'_>, adapter: &dyn TargetAdapter) -> TsFunction {
    let params = vec![TsParam::optional(
        "options",
        TsType::Object(vec![
            prop(
                "mutation",
                adapter.mutation_overrides_type(response_type(plan), args_type(plan)),
            ),
            prop("client", TsType::named(CLIENT_OPTIONS_TYPE)),
        ]),
    )];

    let shape = adapter.mutation_shape();
    let hook = TsExpr::ident(adapter.mutation_hook());
    let overrides = TsExpr::ident("mutationOverrides");
    let call = match shape {
        MutationShape::Positional => TsExpr::call(
            hook,
            vec![TsExpr::Object(vec![
                ObjectEntry::Prop("mutationKey".into(), mutation_key_call(plan)),
                ObjectEntry::Prop("mutationFn".into(), mutation_fn(plan, shape)),
                ObjectEntry::Spread(overrides),
            ])],
        ),
        MutationShape::KeyAndArg => TsExpr::call(
            hook,
            vec![mutation_key_call(plan), mutation_fn(plan, shape), overrides],
        ),
    };

    TsFunction {
        doc: doc_lines(plan.operation),
        ..export_function(
            &plan.names.hook,
            params,
            vec![
                destructure_options(&[
                    ("mutation", Some("mutationOverrides")),
                    ("client", Some(CLIENT_OPTIONS)),
                ]),
                TsStmt::Return(Some(call)),
            ],
        )
    }
}

/// Every function of one operation for one target, in output order.
pub(super) fn operation_functions(
    plan: &OperationPlan<'_>,
    adapter: &dyn TargetAdapter,
) -> Vec<(BindingKind, TsFunction)> {
    let builders = adapter.supports_option_builders();
    let mut functions = vec![(BindingKind::Invoker, invoker(plan))];
    match plan.composed.class {
        OperationClass::Read => {
            functions.push((BindingKind::KeyGetter, key_getter(plan)));
            if builders {
                functions.push((BindingKind::QueryOptions, query_options(plan, adapter)));
            }
            functions.push((BindingKind::Hook, query_hook(plan, adapter)));
        }
        OperationClass::Write => {
            functions.push((BindingKind::MutationKey, mutation_key(plan)));
            if builders {
                functions.push((BindingKind::MutationOptions, mutation_options(plan, adapter)));
            }
            functions.push((BindingKind::Hook, mutation_hook(plan, adapter)));
        }
    }
    functions
}
