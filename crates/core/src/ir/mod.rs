//! TypeScript intermediate representation.
//!
//! - `types`: TypeScript AST (TsType, TsExpr, TsStmt, TsFunction, TsModule)
//! - `emit`: AST to code strings via the `Emit` trait
//! - `schema`: descriptor shapes to `TsType`
//! - `utils`: identifier safety, escaping, case conversion
//!
//! The emitter only ever builds AST values; printing is purely mechanical.

mod emit;
pub mod schema;
mod types;
pub mod utils;

pub use emit::Emit;
pub use types::{
    BinOp, ImportItem, ObjectEntry, TsExpr, TsFunction, TsImport, TsLiteral, TsModule, TsParam,
    TsPrimitive, TsProp, TsStmt, TsType, TsTypeDef,
};
