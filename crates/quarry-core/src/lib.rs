//! Core query-expression layer for Quarry: full-text match builders, the
//! expression tree, catalog-aware validation, and the compiled plan handed to
//! an executor, plus the ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod catalog;
pub mod compile;
pub mod config;
pub mod error;
pub mod exec;
pub mod expr;
pub mod prepare;
pub mod trace;
pub mod validate;
pub mod value;

// re-exports
pub use error::QueryError;
pub use prepare::Preparer;

///
/// Prelude
///
/// Prelude contains only expression-building vocabulary.
/// No errors, sinks, or executor traits are re-exported here.
///

pub mod prelude {
    pub use crate::{
        catalog::{IndexCatalog, IndexDescriptor, IndexKind, MemoryCatalog},
        compile::CompiledPlan,
        expr::{CompareOp, Expr, ExprTree, FullTextExpression},
        prepare::Preparer,
        value::Value,
    };
}
