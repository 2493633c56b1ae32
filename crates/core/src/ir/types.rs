//! TypeScript IR types for code generation.
//!
//! This module defines the TypeScript representation the emitter builds:
//! - TsType: Types (primitives, arrays, unions, objects, generics, etc.)
//! - TsExpr: Expressions (identifiers, calls, arrows, member chains, etc.)
//! - TsStmt / TsFunction / TsModule: statements, functions and whole files

use std::collections::HashMap;

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, undefined, void, unknown
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Intersection type: A & B & C
    Intersection(Vec<TsType>),
    /// Object type: { foo: string; bar?: number }
    Object(Vec<TsProp>),
    /// Record type: Record<K, V>
    Record {
        key: Box<TsType>,
        value: Box<TsType>,
    },
    /// Literal type: "foo", 42, true
    Literal(TsLiteral),
    /// Named type reference: Ban, ClientOptions
    Ref(String),
    /// Generic instantiation: Omit<UseQueryOptions<T>, "queryKey">
    Generic { name: String, args: Vec<TsType> },
}

impl TsType {
    /// Shorthand for a named reference.
    pub fn named(name: impl Into<String>) -> Self {
        TsType::Ref(name.into())
    }

    /// Shorthand for a generic instantiation.
    pub fn generic(name: impl Into<String>, args: Vec<TsType>) -> Self {
        TsType::Generic {
            name: name.into(),
            args,
        }
    }

    /// Shorthand for a string literal type.
    pub fn string_literal(value: impl Into<String>) -> Self {
        TsType::Literal(TsLiteral::String(value.into()))
    }

    /// Collect every named reference reachable from this type, in first-seen order.
    pub fn collect_refs(&self, out: &mut Vec<String>) {
        match self {
            TsType::Ref(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            TsType::Array(inner) => inner.collect_refs(out),
            TsType::Union(types) | TsType::Intersection(types) => {
                for ty in types {
                    ty.collect_refs(out);
                }
            }
            TsType::Object(props) => {
                for prop in props {
                    prop.ty.collect_refs(out);
                }
            }
            TsType::Record { key, value } => {
                key.collect_refs(out);
                value.collect_refs(out);
            }
            TsType::Generic { args, .. } => {
                for arg in args {
                    arg.collect_refs(out);
                }
            }
            TsType::Primitive(_) | TsType::Literal(_) => {}
        }
    }

    /// Replace named references found in `renames`, leaving generic names alone.
    pub fn rename_refs(&mut self, renames: &HashMap<String, String>) {
        match self {
            TsType::Ref(name) => {
                if let Some(alias) = renames.get(name.as_str()) {
                    name.clone_from(alias);
                }
            }
            TsType::Array(inner) => inner.rename_refs(renames),
            TsType::Union(types) | TsType::Intersection(types) => {
                for ty in types {
                    ty.rename_refs(renames);
                }
            }
            TsType::Object(props) => {
                for prop in props {
                    prop.ty.rename_refs(renames);
                }
            }
            TsType::Record { key, value } => {
                key.rename_refs(renames);
                value.rename_refs(renames);
            }
            TsType::Generic { args, .. } => {
                for arg in args {
                    arg.rename_refs(renames);
                }
            }
            TsType::Primitive(_) | TsType::Literal(_) => {}
        }
    }
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Void,
    Unknown,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    Null,
}

/// TypeScript expression
#[derive(Debug, Clone, PartialEq)]
pub enum TsExpr {
    /// Identifier: foo
    Ident(String),
    /// Literal value: "bar", 42
    Literal(TsLiteral),
    /// Function call: foo(a, b)
    Call {
        callee: Box<TsExpr>,
        args: Vec<TsExpr>,
    },
    /// Arrow function: (x) => x.foo
    Arrow {
        is_async: bool,
        params: Vec<TsParam>,
        body: Box<TsExpr>,
    },
    /// Object literal: { a: 1, b, ...rest }
    Object(Vec<ObjectEntry>),
    /// Member access: foo.bar
    Member { object: Box<TsExpr>, prop: String },
    /// Index/bracket access: obj["current-user"]
    Index {
        object: Box<TsExpr>,
        index: Box<TsExpr>,
    },
    /// Binary operation: a !== undefined, a ?? b
    BinOp {
        left: Box<TsExpr>,
        op: BinOp,
        right: Box<TsExpr>,
    },
    /// Ternary/conditional: cond ? a : b
    Ternary {
        cond: Box<TsExpr>,
        then_expr: Box<TsExpr>,
        else_expr: Box<TsExpr>,
    },
    /// Array literal: [a, b, c]
    Array(Vec<TsExpr>),
    /// Type cast: expr as Type
    Cast { expr: Box<TsExpr>, ty: TsType },
}

impl TsExpr {
    /// Identifier expression.
    pub fn ident(name: impl Into<String>) -> Self {
        TsExpr::Ident(name.into())
    }

    /// String literal expression.
    pub fn string(value: impl Into<String>) -> Self {
        TsExpr::Literal(TsLiteral::String(value.into()))
    }

    /// `callee(args...)`
    pub fn call(callee: TsExpr, args: Vec<TsExpr>) -> Self {
        TsExpr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    /// `self.prop`
    pub fn member(self, prop: impl Into<String>) -> Self {
        TsExpr::Member {
            object: Box::new(self),
            prop: prop.into(),
        }
    }

    /// `self[index]`
    pub fn index(self, index: TsExpr) -> Self {
        TsExpr::Index {
            object: Box::new(self),
            index: Box::new(index),
        }
    }

    /// `self <op> right`
    pub fn bin(self, op: BinOp, right: TsExpr) -> Self {
        TsExpr::BinOp {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    /// `[items...] as const`
    pub fn const_tuple(items: Vec<TsExpr>) -> Self {
        TsExpr::Cast {
            expr: Box::new(TsExpr::Array(items)),
            ty: TsType::named("const"),
        }
    }

    /// The `undefined` identifier.
    pub fn undefined() -> Self {
        TsExpr::Ident("undefined".into())
    }
}

/// Entry of an object literal
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEntry {
    /// key: value
    Prop(String, TsExpr),
    /// shorthand property: key
    Shorthand(String),
    /// ...expr
    Spread(TsExpr),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    StrictNotEqual,
    And,
    Nullish,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    /// Binding name or pattern (`args`, `{ signal }`)
    pub name: String,
    pub ty: Option<TsType>,
    pub optional: bool,
}

impl TsParam {
    /// Required parameter with a type annotation.
    pub fn typed(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            optional: false,
        }
    }

    /// Optional parameter (`name?: ty`).
    pub fn optional(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            optional: true,
        }
    }
}

// =============================================================================
// Module-Level IR (for printer)
// =============================================================================

/// Import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsImport {
    /// Default import binding (`import useSWR from "swr"`)
    pub default: Option<String>,
    /// Items to import
    pub items: Vec<ImportItem>,
    /// Module path
    pub from: String,
    /// Whether this is a type-only import
    pub type_only: bool,
}

/// Import item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportItem {
    pub name: String,
    /// Local binding when it differs from the exported name.
    pub alias: Option<String>,
}

impl ImportItem {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// `name as alias`
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// Identifier this import binds in the importing module.
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Exported type alias: `export type Foo = ...;`
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeDef {
    pub name: String,
    pub ty: TsType,
}

/// Statement in a function body
#[derive(Debug, Clone, PartialEq)]
pub enum TsStmt {
    /// const { a: b, c } = init;
    Destructure {
        bindings: Vec<(String, Option<String>)>,
        init: TsExpr,
    },
    /// Return statement
    Return(Option<TsExpr>),
}

/// Function definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsFunction {
    pub name: String,
    /// Leading JSDoc lines
    pub doc: Vec<String>,
    pub type_params: Vec<String>,
    pub params: Vec<TsParam>,
    pub return_type: Option<TsType>,
    pub body: Vec<TsStmt>,
    pub is_async: bool,
    pub is_export: bool,
    pub is_arrow: bool,
}

/// Complete TypeScript module
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TsModule {
    /// Comment lines printed before everything else
    pub header: Vec<String>,
    pub imports: Vec<TsImport>,
    pub types: Vec<TsTypeDef>,
    pub functions: Vec<TsFunction>,
    /// `export * from "<path>";` lines
    pub re_exports: Vec<String>,
}
