//! TypeScript code emission via the Emit trait.
//!
//! Each AST type implements `Emit`, so printing a module is a matter of
//! composing the string representations of its parts. Emission is purely
//! mechanical: every decision about *what* to print was made by the emitter.

use super::types::{
    BinOp, ImportItem, ObjectEntry, TsExpr, TsFunction, TsImport, TsLiteral, TsModule, TsParam,
    TsPrimitive, TsProp, TsStmt, TsType, TsTypeDef,
};
use super::utils::{escape_js_string, quote_if_needed};

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

// =============================================================================
// Primitive Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Null => "null".to_string(),
            TsPrimitive::Undefined => "undefined".to_string(),
            TsPrimitive::Void => "void".to_string(),
            TsPrimitive::Unknown => "unknown".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
            TsLiteral::Number(n) => n.to_string(),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
            TsLiteral::Null => "null".to_string(),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                // Wrap complex types in parentheses
                if matches!(**inner, TsType::Union(_) | TsType::Intersection(_)) {
                    format!("({inner_str})[]")
                } else {
                    format!("{inner_str}[]")
                }
            }
            TsType::Union(types) => types.iter().map(|t| t.emit()).collect::<Vec<_>>().join(" | "),
            TsType::Intersection(types) => types
                .iter()
                .map(|t| {
                    let s = t.emit();
                    if matches!(t, TsType::Union(_)) {
                        format!("({s})")
                    } else {
                        s
                    }
                })
                .collect::<Vec<_>>()
                .join(" & "),
            TsType::Object(props) => {
                if props.is_empty() {
                    "{}".to_string()
                } else {
                    let parts: Vec<_> = props.iter().map(|p| p.emit()).collect();
                    format!("{{ {} }}", parts.join("; "))
                }
            }
            TsType::Record { key, value } => {
                format!("Record<{}, {}>", key.emit(), value.emit())
            }
            TsType::Literal(lit) => lit.emit(),
            TsType::Ref(name) => name.clone(),
            TsType::Generic { name, args } => {
                let args_str = args.iter().map(|a| a.emit()).collect::<Vec<_>>().join(", ");
                format!("{name}<{args_str}>")
            }
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {}", key, opt, self.ty.emit())
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        format!("export type {} = {};\n", self.name, self.ty.emit())
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for BinOp {
    fn emit(&self) -> String {
        match self {
            BinOp::StrictNotEqual => "!==".to_string(),
            BinOp::And => "&&".to_string(),
            BinOp::Nullish => "??".to_string(),
        }
    }
}

/// Parenthesize `expr` when it is an operand of `parent`.
///
/// `??` cannot be mixed with `&&` without parentheses, so any nested binary
/// operation with a different operator is wrapped.
fn emit_operand(expr: &TsExpr, parent: BinOp) -> String {
    match expr {
        TsExpr::BinOp { op, .. } if *op != parent => format!("({})", expr.emit()),
        TsExpr::Ternary { .. } => format!("({})", expr.emit()),
        _ => expr.emit(),
    }
}

fn emit_branch(expr: &TsExpr) -> String {
    match expr {
        TsExpr::BinOp { .. } | TsExpr::Ternary { .. } => format!("({})", expr.emit()),
        _ => expr.emit(),
    }
}

impl Emit for ObjectEntry {
    fn emit(&self) -> String {
        match self {
            ObjectEntry::Prop(key, value) => format!("{}: {}", quote_if_needed(key), value.emit()),
            ObjectEntry::Shorthand(key) => key.clone(),
            ObjectEntry::Spread(expr) => format!("...{}", expr.emit()),
        }
    }
}

impl Emit for TsExpr {
    fn emit(&self) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Literal(lit) => lit.emit(),
            TsExpr::Call { callee, args } => {
                let args_str = args.iter().map(|a| a.emit()).collect::<Vec<_>>().join(", ");
                format!("{}({})", callee.emit(), args_str)
            }
            TsExpr::Arrow {
                is_async,
                params,
                body,
            } => {
                let params_str = params.iter().map(|p| p.emit()).collect::<Vec<_>>().join(", ");
                let async_str = if *is_async { "async " } else { "" };
                // An object literal body must be parenthesized to not read as a block
                let body_str = if matches!(**body, TsExpr::Object(_)) {
                    format!("({})", body.emit())
                } else {
                    body.emit()
                };
                format!("{async_str}({params_str}) => {body_str}")
            }
            TsExpr::Object(entries) => {
                if entries.is_empty() {
                    "{}".to_string()
                } else {
                    let parts: Vec<_> = entries.iter().map(|e| e.emit()).collect();
                    format!("{{ {} }}", parts.join(", "))
                }
            }
            TsExpr::Member { object, prop } => {
                format!("{}.{}", object.emit(), prop)
            }
            TsExpr::Index { object, index } => {
                format!("{}[{}]", object.emit(), index.emit())
            }
            TsExpr::BinOp { left, op, right } => {
                format!(
                    "{} {} {}",
                    emit_operand(left, *op),
                    op.emit(),
                    emit_operand(right, *op)
                )
            }
            TsExpr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                format!(
                    "{} ? {} : {}",
                    cond.emit(),
                    emit_branch(then_expr),
                    emit_branch(else_expr)
                )
            }
            TsExpr::Array(items) => {
                let items_str = items.iter().map(|i| i.emit()).collect::<Vec<_>>().join(", ");
                format!("[{items_str}]")
            }
            TsExpr::Cast { expr, ty } => {
                format!("{} as {}", expr.emit(), ty.emit())
            }
        }
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        let opt = if self.optional { "?" } else { "" };
        match &self.ty {
            Some(ty) => format!("{}{}: {}", self.name, opt, ty.emit()),
            None => format!("{}{}", self.name, opt),
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for TsStmt {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

impl TsStmt {
    /// Emit with specified indentation level (2 spaces per level)
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        match self {
            TsStmt::Destructure { bindings, init } => {
                let parts: Vec<_> = bindings
                    .iter()
                    .map(|(key, alias)| match alias {
                        Some(alias) => format!("{key}: {alias}"),
                        None => key.clone(),
                    })
                    .collect();
                format!("{}const {{ {} }} = {};\n", prefix, parts.join(", "), init.emit())
            }
            TsStmt::Return(expr) => match expr {
                Some(e) => format!("{}return {};\n", prefix, e.emit()),
                None => format!("{prefix}return;\n"),
            },
        }
    }
}

// =============================================================================
// Functions
// =============================================================================

impl Emit for TsFunction {
    fn emit(&self) -> String {
        let mut output = String::new();

        if !self.doc.is_empty() {
            output.push_str("/**\n");
            for line in &self.doc {
                if line.is_empty() {
                    output.push_str(" *\n");
                } else {
                    output.push_str(&format!(" * {line}\n"));
                }
            }
            output.push_str(" */\n");
        }

        if self.is_export {
            output.push_str("export ");
        }

        let type_params_str = if self.type_params.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.type_params.join(", "))
        };

        let params_str = self.params.iter().map(|p| p.emit()).collect::<Vec<_>>().join(", ");

        let return_type_str = self
            .return_type
            .as_ref()
            .map(|t| format!(": {}", t.emit()))
            .unwrap_or_default();

        let async_str = if self.is_async { "async " } else { "" };

        if self.is_arrow {
            // Arrow function: export const name = async <T>(...): Type => { ... }
            output.push_str(&format!(
                "const {} = {}{}({}){}",
                self.name, async_str, type_params_str, params_str, return_type_str
            ));
            if self.body.is_empty() {
                output.push_str(" => {};\n");
            } else {
                output.push_str(" => {\n");
                for stmt in &self.body {
                    output.push_str(&stmt.emit_indented(1));
                }
                output.push_str("};\n");
            }
        } else {
            // Regular function: export function name<T>(...): Type { ... }
            output.push_str(&format!(
                "{}function {}{}({}){}",
                async_str, self.name, type_params_str, params_str, return_type_str
            ));
            if self.body.is_empty() {
                output.push_str(" {}\n");
            } else {
                output.push_str(" {\n");
                for stmt in &self.body {
                    output.push_str(&stmt.emit_indented(1));
                }
                output.push_str("}\n");
            }
        }

        output
    }
}

// =============================================================================
// Imports
// =============================================================================

impl Emit for ImportItem {
    fn emit(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} as {}", self.name, alias),
            None => self.name.clone(),
        }
    }
}

impl Emit for TsImport {
    fn emit(&self) -> String {
        let type_keyword = if self.type_only { "type " } else { "" };
        let mut bindings = Vec::new();
        if let Some(default) = &self.default {
            bindings.push(default.clone());
        }
        if !self.items.is_empty() {
            let items_str = self.items.iter().map(|i| i.emit()).collect::<Vec<_>>().join(", ");
            bindings.push(format!("{{ {items_str} }}"));
        }
        format!(
            "import {}{} from \"{}\";\n",
            type_keyword,
            bindings.join(", "),
            escape_js_string(&self.from)
        )
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TsModule {
    fn emit(&self) -> String {
        let mut output = String::new();

        for line in &self.header {
            output.push_str(&format!("// {line}\n"));
        }
        if !self.header.is_empty() {
            output.push('\n');
        }

        for import in &self.imports {
            output.push_str(&import.emit());
        }
        if !self.imports.is_empty() {
            output.push('\n');
        }

        for type_def in &self.types {
            output.push_str(&type_def.emit());
            output.push('\n');
        }

        for func in &self.functions {
            output.push_str(&func.emit());
            output.push('\n');
        }

        for path in &self.re_exports {
            output.push_str(&format!("export * from \"{}\";\n", escape_js_string(path)));
        }

        output
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_primitive() {
        assert_eq!(TsPrimitive::String.emit(), "string");
        assert_eq!(TsPrimitive::Number.emit(), "number");
        assert_eq!(TsPrimitive::Boolean.emit(), "boolean");
        assert_eq!(TsPrimitive::Null.emit(), "null");
        assert_eq!(TsPrimitive::Undefined.emit(), "undefined");
        assert_eq!(TsPrimitive::Void.emit(), "void");
        assert_eq!(TsPrimitive::Unknown.emit(), "unknown");
    }

    #[test]
    fn test_emit_literal() {
        assert_eq!(TsLiteral::String("hello".into()).emit(), "\"hello\"");
        assert_eq!(TsLiteral::String("say \"hi\"".into()).emit(), "\"say \\\"hi\\\"\"");
        assert_eq!(TsLiteral::Int(42).emit(), "42");
        assert_eq!(TsLiteral::Bool(true).emit(), "true");
        assert_eq!(TsLiteral::Null.emit(), "null");
    }

    #[test]
    fn test_emit_union_array() {
        let inner = TsType::Union(vec![
            TsType::Primitive(TsPrimitive::String),
            TsType::Primitive(TsPrimitive::Null),
        ]);
        let ty = TsType::Array(Box::new(inner));
        assert_eq!(ty.emit(), "(string | null)[]");
    }

    #[test]
    fn test_emit_generic_type() {
        let ty = TsType::generic(
            "Omit",
            vec![
                TsType::generic("UseQueryOptions", vec![TsType::named("Ban")]),
                TsType::Union(vec![
                    TsType::string_literal("queryKey"),
                    TsType::string_literal("queryFn"),
                ]),
            ],
        );
        assert_eq!(
            ty.emit(),
            "Omit<UseQueryOptions<Ban>, \"queryKey\" | \"queryFn\">"
        );
    }

    #[test]
    fn test_emit_object_type() {
        let ty = TsType::Object(vec![
            TsProp {
                name: "guild_id".into(),
                ty: TsType::Primitive(TsPrimitive::String),
                optional: false,
            },
            TsProp {
                name: "X-Audit-Log-Reason".into(),
                ty: TsType::Primitive(TsPrimitive::String),
                optional: true,
            },
        ]);
        assert_eq!(
            ty.emit(),
            "{ guild_id: string; \"X-Audit-Log-Reason\"?: string }"
        );
    }

    #[test]
    fn test_emit_member_chain_with_index() {
        let expr = TsExpr::ident("client")
            .member("users")
            .index(TsExpr::string("@me"))
            .member("$get");
        assert_eq!(expr.emit(), "client.users[\"@me\"].$get");
    }

    #[test]
    fn test_emit_mixed_operators_are_parenthesized() {
        let nullish = TsExpr::ident("customKey").bin(
            BinOp::Nullish,
            TsExpr::call(TsExpr::ident("getKey"), vec![]),
        );
        let ternary = TsExpr::Ternary {
            cond: Box::new(TsExpr::ident("isEnabled")),
            then_expr: Box::new(nullish),
            else_expr: Box::new(TsExpr::Literal(TsLiteral::Null)),
        };
        assert_eq!(ternary.emit(), "isEnabled ? (customKey ?? getKey()) : null");

        let and = TsExpr::ident("a")
            .bin(BinOp::StrictNotEqual, TsExpr::undefined())
            .bin(BinOp::And, TsExpr::ident("b"));
        assert_eq!(and.emit(), "(a !== undefined) && b");
    }

    #[test]
    fn test_emit_arrow_with_object_body() {
        let arrow = TsExpr::Arrow {
            is_async: false,
            params: vec![],
            body: Box::new(TsExpr::Object(vec![ObjectEntry::Shorthand("a".into())])),
        };
        assert_eq!(arrow.emit(), "() => ({ a })");
    }

    #[test]
    fn test_emit_const_tuple() {
        let expr = TsExpr::const_tuple(vec![TsExpr::string("/gateway")]);
        assert_eq!(expr.emit(), "[\"/gateway\"] as const");
    }

    #[test]
    fn test_emit_destructure() {
        let stmt = TsStmt::Destructure {
            bindings: vec![
                ("query".into(), Some("queryOptions".into())),
                ("enabled".into(), None),
            ],
            init: TsExpr::ident("options").bin(BinOp::Nullish, TsExpr::Object(vec![])),
        };
        assert_eq!(
            stmt.emit(),
            "  const { query: queryOptions, enabled } = options ?? {};\n"
        );
    }

    #[test]
    fn test_emit_type_import() {
        let import = TsImport {
            default: None,
            items: vec![ImportItem::plain("UseQueryOptions")],
            from: "@tanstack/react-query".into(),
            type_only: true,
        };
        assert_eq!(
            import.emit(),
            "import type { UseQueryOptions } from \"@tanstack/react-query\";\n"
        );
    }

    #[test]
    fn test_emit_default_import() {
        let import = TsImport {
            default: Some("useSWR".into()),
            items: vec![],
            from: "swr".into(),
            type_only: false,
        };
        assert_eq!(import.emit(), "import useSWR from \"swr\";\n");

        let import = TsImport {
            default: Some("useSWR".into()),
            items: vec![ImportItem::plain("preload")],
            ..import
        };
        assert_eq!(import.emit(), "import useSWR, { preload } from \"swr\";\n");
    }

    #[test]
    fn test_emit_aliased_import() {
        let import = TsImport {
            default: None,
            items: vec![ImportItem::aliased("Key", "KeySchema"), ImportItem::plain("Ban")],
            from: "../types".into(),
            type_only: true,
        };
        assert_eq!(
            import.emit(),
            "import type { Key as KeySchema, Ban } from \"../types\";\n"
        );
    }

    #[test]
    fn test_emit_regular_function_with_doc() {
        let func = TsFunction {
            name: "useItem".into(),
            doc: vec!["GET /items/:id".into()],
            type_params: vec!["TData".into()],
            params: vec![TsParam::typed("id", TsType::Primitive(TsPrimitive::Number))],
            return_type: None,
            body: vec![TsStmt::Return(None)],
            is_async: false,
            is_export: true,
            is_arrow: false,
        };
        let result = func.emit();
        assert!(result.starts_with("/**\n * GET /items/:id\n */\n"));
        assert!(result.contains("export function useItem<TData>(id: number) {\n  return;\n}\n"));
    }

    #[test]
    fn test_emit_module_layout() {
        let module = TsModule {
            header: vec!["generated".into()],
            re_exports: vec!["./guilds".into()],
            ..TsModule::default()
        };
        assert_eq!(module.emit(), "// generated\n\nexport * from \"./guilds\";\n");
    }
}
