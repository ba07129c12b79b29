//! ## Crate layout
//! - `core`: expression builders, catalog, validation, plan compilation, and
//!   the reference evaluator.
//!
//! The `prelude` module mirrors the surface used by query authors; executor
//! integrations reach for `core::exec` directly.

pub use quarry_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Re-exports
//

pub use quarry_core::{Preparer, QueryError};

///
/// Prelude
///

pub mod prelude {
    pub use quarry_core::{
        exec::{Document, FullTextProbe, Parameters},
        prelude::*,
    };
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_covers_the_prepare_path() {
        let catalog: MemoryCatalog = serde_json::from_str(
            r#"[{ "name": "titleIdx", "kind": "full_text", "fields": ["title"] }]"#,
        )
        .unwrap();

        let expr = FullTextExpression::index("titleIdx")
            .unwrap()
            .match_text("cat")
            .unwrap();
        let plan = Preparer::new(&catalog).prepare(expr).unwrap();

        assert_eq!(plan.probe_count(), 1);
        assert!(!super::VERSION.is_empty());
    }
}
