//! Parameter composition and response typing.
//!
//! Merges an operation's path, query, header and body inputs into one `args`
//! object type, classifies the operation as a read or a write, and derives the
//! success type from its responses.

use crate::descriptor::{HttpMethod, ParamDescriptor};
use crate::error::Warning;
use crate::ir::schema::schema_to_ts_type;
use crate::ir::{TsPrimitive, TsProp, TsType};
use crate::status::StatusPredicate;
use crate::tree::OperationDescriptor;

/// Read (query-style) or write (mutation-style) operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationClass {
    Read,
    Write,
}

impl OperationClass {
    pub fn of(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => OperationClass::Read,
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch | HttpMethod::Delete => {
                OperationClass::Write
            }
        }
    }
}

/// An operation's composed inputs and success type.
#[derive(Debug, Clone)]
pub struct ComposedOperation {
    pub class: OperationClass,
    /// False only with no path, query or header parameter and no body.
    pub requires_args: bool,
    /// The `args` object type; `None` when no args are taken.
    pub arg_shape: Option<TsType>,
    pub response: TsType,
    pub warning: Option<Warning>,
}

/// Compose one operation.
pub fn compose(operation: &OperationDescriptor, success: &StatusPredicate) -> ComposedOperation {
    let inputs = &operation.inputs;
    let mut groups = Vec::new();

    // Path params are always required.
    if let Some(group) = param_group("path", &inputs.path, true) {
        groups.push(group);
    }
    if let Some(group) = param_group("query", &inputs.query, false) {
        groups.push(group);
    }
    if let Some(group) = param_group("header", &inputs.header, false) {
        groups.push(group);
    }
    if let Some(body) = &inputs.body {
        groups.push(TsProp {
            name: "body".into(),
            ty: body
                .schema
                .as_ref()
                .map_or(TsType::Primitive(TsPrimitive::Unknown), schema_to_ts_type),
            optional: !body.required,
        });
    }

    let requires_args = !groups.is_empty();
    let (response, has_success) = success_type(operation, success);
    let warning = (!has_success).then(|| Warning::NoSuccessResponse {
        method: operation.method,
        path: operation.source_path.clone(),
    });

    ComposedOperation {
        class: OperationClass::of(operation.method),
        requires_args,
        arg_shape: requires_args.then(|| TsType::Object(groups)),
        response,
        warning,
    }
}

fn param_group(name: &str, params: &[ParamDescriptor], always_required: bool) -> Option<TsProp> {
    if params.is_empty() {
        return None;
    }

    let props: Vec<TsProp> = params
        .iter()
        .map(|param| TsProp {
            name: param.name.clone(),
            ty: param
                .schema
                .as_ref()
                .map_or(TsType::Primitive(TsPrimitive::String), schema_to_ts_type),
            optional: !(always_required || param.required),
        })
        .collect();

    Some(TsProp {
        name: name.to_string(),
        optional: props.iter().all(|p| p.optional),
        ty: TsType::Object(props),
    })
}

/// Union of the distinct success shapes, in first-seen order.
///
/// Returns whether any response was classified as success.
fn success_type(operation: &OperationDescriptor, success: &StatusPredicate) -> (TsType, bool) {
    let mut shapes: Vec<TsType> = Vec::new();
    let mut shapeless = false;

    for response in operation.responses.iter().filter(|r| success.matches(r.status)) {
        match &response.schema {
            Some(schema) => {
                let ty = schema_to_ts_type(schema);
                if !shapes.contains(&ty) {
                    shapes.push(ty);
                }
            }
            None => shapeless = true,
        }
    }

    match shapes.len() {
        0 if shapeless => (TsType::Primitive(TsPrimitive::Void), true),
        0 => (TsType::Primitive(TsPrimitive::Unknown), false),
        1 => (shapes.remove(0), true),
        _ => (TsType::Union(shapes), true),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::descriptor::{BodyDescriptor, ResponseDescriptor, RouteDescriptor, Schema};
    use crate::ir::Emit;
    use crate::tree::RouteTree;

    fn param(name: &str, required: bool) -> ParamDescriptor {
        ParamDescriptor {
            name: name.into(),
            required,
            schema: Some(Schema::of_type("string")),
        }
    }

    fn response(status: u16, reference: Option<&str>) -> ResponseDescriptor {
        ResponseDescriptor {
            status,
            schema: reference.map(Schema::reference),
        }
    }

    fn composed(descriptor: RouteDescriptor) -> ComposedOperation {
        let tree = RouteTree::build(&[descriptor]).unwrap();
        compose(tree.operations()[0], &StatusPredicate::default())
    }

    #[test]
    fn test_no_inputs_requires_no_args() {
        let result = composed(RouteDescriptor::new(HttpMethod::Get, "/gateway"));
        assert_eq!(result.class, OperationClass::Read);
        assert!(!result.requires_args);
        assert!(result.arg_shape.is_none());
    }

    #[test]
    fn test_path_only_requires_args() {
        let mut descriptor = RouteDescriptor::new(HttpMethod::Get, "/guilds/{guild_id}");
        descriptor.path_params = vec![param("guild_id", false)];
        let result = composed(descriptor);
        assert!(result.requires_args);
        assert_eq!(
            result.arg_shape.unwrap().emit(),
            "{ path: { guild_id: string } }"
        );
    }

    #[test]
    fn test_body_only_requires_args() {
        let mut descriptor = RouteDescriptor::new(HttpMethod::Post, "/search");
        descriptor.body = Some(BodyDescriptor {
            required: true,
            schema: Some(Schema::reference("#/components/schemas/SearchRequest")),
        });
        let result = composed(descriptor);
        assert_eq!(result.class, OperationClass::Write);
        assert_eq!(result.arg_shape.unwrap().emit(), "{ body: SearchRequest }");
    }

    #[test]
    fn test_optional_groups() {
        let mut descriptor = RouteDescriptor::new(HttpMethod::Put, "/guilds/{guild_id}/bans");
        descriptor.path_params = vec![param("guild_id", true)];
        descriptor.query_params = vec![param("limit", false), param("after", false)];
        descriptor.header_params = vec![param("X-Audit-Log-Reason", false)];
        descriptor.body = Some(BodyDescriptor {
            required: false,
            schema: None,
        });
        let shape = composed(descriptor).arg_shape.unwrap().emit();
        assert_eq!(
            shape,
            "{ path: { guild_id: string }; query?: { limit?: string; after?: string }; \
             header?: { \"X-Audit-Log-Reason\"?: string }; body?: unknown }"
        );
    }

    #[test]
    fn test_group_required_when_one_member_is() {
        let mut descriptor = RouteDescriptor::new(HttpMethod::Get, "/search");
        descriptor.query_params = vec![param("q", true), param("page", false)];
        let shape = composed(descriptor).arg_shape.unwrap().emit();
        assert_eq!(shape, "{ query: { q: string; page?: string } }");
    }

    #[test]
    fn test_success_union_dedupes_in_order() {
        let mut descriptor = RouteDescriptor::new(HttpMethod::Get, "/gateway");
        descriptor.responses = vec![
            response(200, Some("#/components/schemas/Gateway")),
            response(203, Some("#/components/schemas/Partial")),
            response(206, Some("#/components/schemas/Gateway")),
            response(304, None),
            response(404, Some("#/components/schemas/Error")),
        ];
        let result = composed(descriptor);
        assert_eq!(result.response.emit(), "Gateway | Partial");
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_shapeless_success_is_void() {
        let mut descriptor = RouteDescriptor::new(HttpMethod::Delete, "/search/recent");
        descriptor.responses = vec![
            response(204, None),
            response(400, Some("#/components/schemas/Error")),
        ];
        let result = composed(descriptor);
        assert_eq!(result.response.emit(), "void");
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_no_success_is_unknown_with_warning() {
        let mut descriptor = RouteDescriptor::new(HttpMethod::Post, "/search");
        descriptor.responses = vec![response(400, Some("#/components/schemas/Error"))];
        let result = composed(descriptor);
        assert_eq!(result.response.emit(), "unknown");
        assert_eq!(
            result.warning,
            Some(Warning::NoSuccessResponse {
                method: HttpMethod::Post,
                path: "/search".into()
            })
        );
    }

    #[test]
    fn test_custom_predicate() {
        let mut descriptor = RouteDescriptor::new(HttpMethod::Get, "/gateway");
        descriptor.responses = vec![
            response(200, Some("#/components/schemas/Gateway")),
            response(304, None),
        ];
        let tree = RouteTree::build(&[descriptor]).unwrap();
        let only_304 = StatusPredicate::parse(&["304"]).unwrap();
        let result = compose(tree.operations()[0], &only_304);
        assert_eq!(result.response.emit(), "void");
    }
}
