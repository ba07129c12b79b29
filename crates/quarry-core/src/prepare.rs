//! Module: prepare
//! Responsibility: one-call pipeline from an expression to a compiled plan.
//! Does not own: validation rules, lowering, or execution.
//! Boundary: the only entry point that emits `PrepareTraceEvent`s.

use crate::{
    catalog::IndexCatalog,
    compile::{CompiledPlan, compile},
    config::PrepareConfig,
    error::QueryError,
    expr::{Expr, ExprTree},
    trace::{PrepareTraceEvent, PrepareTraceSink},
    validate::validate_with,
};

///
/// Preparer
///
/// Borrows a catalog and turns expressions into executor-ready plans.
/// Stateless between calls; share it freely across threads when the
/// catalog allows.
///

pub struct Preparer<'a, C: ?Sized> {
    catalog: &'a C,
    config: PrepareConfig,
    trace: Option<&'a dyn PrepareTraceSink>,
}

impl<'a, C> Preparer<'a, C>
where
    C: IndexCatalog + ?Sized,
{
    #[must_use]
    pub fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            config: PrepareConfig::default(),
            trace: None,
        }
    }

    #[must_use]
    pub const fn with_config(mut self, config: PrepareConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_trace(mut self, sink: &'a dyn PrepareTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &PrepareConfig {
        &self.config
    }

    /// Build the tree, validate it against the catalog, and compile it.
    pub fn prepare(&self, expr: Expr) -> Result<CompiledPlan, QueryError> {
        self.prepare_tree(&ExprTree::new(expr))
    }

    /// Validate and compile an already-built tree. The tree is not consumed.
    pub fn prepare_tree(&self, tree: &ExprTree) -> Result<CompiledPlan, QueryError> {
        let validated = match validate_with(tree, self.catalog, &self.config) {
            Ok(validated) => validated,
            Err(err) => {
                let err = QueryError::from(err);
                self.emit(PrepareTraceEvent::rejected(&err));
                return Err(err);
            }
        };
        self.emit(PrepareTraceEvent::validated(&validated));

        let plan = compile(validated);
        self.emit(PrepareTraceEvent::compiled(&plan));

        Ok(plan)
    }

    fn emit(&self, event: PrepareTraceEvent) {
        if let Some(sink) = self.trace {
            sink.on_event(event);
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{IndexDescriptor, MemoryCatalog},
        error::{ErrorClass, ErrorOrigin},
        expr::FullTextExpression,
    };
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<PrepareTraceEvent>>,
    }

    impl RecordingSink {
        fn events(&self) -> Vec<PrepareTraceEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl PrepareTraceSink for RecordingSink {
        fn on_event(&self, event: PrepareTraceEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::from_descriptors([
            IndexDescriptor::full_text("titleIdx", ["title"]),
            IndexDescriptor::value("priceIdx", ["price"]),
        ])
        .unwrap()
    }

    fn ft_match(index: &str, text: &str) -> Expr {
        FullTextExpression::index(index)
            .unwrap()
            .match_text(text)
            .unwrap()
    }

    #[test]
    fn successful_prepare_emits_validated_then_compiled() {
        let catalog = catalog();
        let sink = RecordingSink::default();
        let plan = Preparer::new(&catalog)
            .with_trace(&sink)
            .prepare(ft_match("titleIdx", "cat"))
            .unwrap();

        assert_eq!(
            sink.events(),
            vec![
                PrepareTraceEvent::Validated {
                    nodes: 1,
                    depth: 1,
                    bindings: 1,
                },
                PrepareTraceEvent::Compiled {
                    fingerprint: plan.fingerprint(),
                    steps: 1,
                    probes: 1,
                },
            ]
        );
    }

    #[test]
    fn rejection_emits_class_and_origin() {
        let catalog = catalog();
        let sink = RecordingSink::default();
        let err = Preparer::new(&catalog)
            .with_trace(&sink)
            .prepare(ft_match("priceIdx", "cat"))
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::WrongIndexKind);
        assert_eq!(
            sink.events(),
            vec![PrepareTraceEvent::Rejected {
                class: ErrorClass::WrongIndexKind,
                origin: ErrorOrigin::Validate,
            }]
        );
    }

    #[test]
    fn tracing_does_not_change_the_plan() {
        let catalog = catalog();
        let sink = RecordingSink::default();
        let build = || Expr::not(ft_match("titleIdx", "cat"));

        let traced = Preparer::new(&catalog)
            .with_trace(&sink)
            .prepare(build())
            .unwrap();
        let plain = Preparer::new(&catalog).prepare(build()).unwrap();

        assert_eq!(traced, plain);
    }

    #[test]
    fn config_is_applied() {
        let catalog = catalog();
        let deep = Expr::not(Expr::not(Expr::not(ft_match("titleIdx", "cat"))));
        let preparer =
            Preparer::new(&catalog).with_config(PrepareConfig::default().with_max_depth(2));

        let err = preparer.prepare(deep).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Unsupported);
        assert_eq!(preparer.config().max_depth, 2);
    }

    #[test]
    fn prepare_tree_leaves_the_tree_usable() {
        let catalog = catalog();
        let tree = ExprTree::new(ft_match("titleIdx", "cat"));
        let preparer = Preparer::new(&catalog);

        let first = preparer.prepare_tree(&tree).unwrap();
        let second = preparer.prepare_tree(&tree).unwrap();

        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_eq!(tree.node_count(), 1);
    }
}
