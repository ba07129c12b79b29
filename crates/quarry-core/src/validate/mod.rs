//! Module: validate
//! Responsibility: resolve full-text index references against a catalog snapshot.
//! Does not own: expression construction or evaluation order.
//! Boundary: the only producer of `ValidatedTree`, the compiler's sole input.
//!
//! Traversal is pre-order, left-to-right, so the first offending node is
//! stable across runs on the same tree and catalog.


use crate::{
    catalog::{IndexCatalog, IndexKind},
    config::PrepareConfig,
    error::ErrorClass,
    expr::{Expr, ExprTree, Function, FunctionCall, rank_index},
};
use derive_more::Deref;
use std::fmt;
use thiserror::Error as ThisError;

///
/// ValidateError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValidateError {
    #[error("unknown index '{name}' at {path}")]
    UnknownIndex { name: String, path: NodePath },

    #[error("index '{name}' at {path} is a {found} index, expected {expected}")]
    WrongIndexKind {
        name: String,
        expected: IndexKind,
        found: IndexKind,
        path: NodePath,
    },

    #[error("unknown function '{name}' at {path}")]
    UnknownFunction { name: String, path: NodePath },

    #[error("function '{name}' at {path} takes {expected} argument(s), found {found}")]
    FunctionArity {
        name: String,
        expected: usize,
        found: usize,
        path: NodePath,
    },

    #[error("rank at {path} requires a non-empty text literal index name")]
    RankArgument { path: NodePath },

    #[error("expression depth exceeds maximum {max} at {path}")]
    DepthExceeded { max: usize, path: NodePath },
}

impl ValidateError {
    /// Position of the offending node.
    #[must_use]
    pub const fn path(&self) -> &NodePath {
        match self {
            Self::UnknownIndex { path, .. }
            | Self::WrongIndexKind { path, .. }
            | Self::UnknownFunction { path, .. }
            | Self::FunctionArity { path, .. }
            | Self::RankArgument { path }
            | Self::DepthExceeded { path, .. } => path,
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownIndex { .. } => ErrorClass::UnknownIndex,
            Self::WrongIndexKind { .. } => ErrorClass::WrongIndexKind,
            Self::FunctionArity { .. } | Self::RankArgument { .. } => ErrorClass::InvalidArgument,
            Self::UnknownFunction { .. } | Self::DepthExceeded { .. } => ErrorClass::Unsupported,
        }
    }
}

///
/// NodePath
///
/// Child-index path from the root. Renders as `$`, `$.0`, `$.0.1`.
///

#[derive(Clone, Debug, Default, Deref, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(path: Vec<usize>) -> Self {
        Self(path)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for index in &self.0 {
            write!(f, ".{index}")?;
        }

        Ok(())
    }
}

///
/// BindingUsage
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BindingUsage {
    Match,
    Rank,
}

///
/// IndexBinding
///
/// One resolved full-text reference, with a snapshot of the catalog entry
/// taken at validation time.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexBinding {
    pub index: String,
    pub kind: IndexKind,
    pub fields: Vec<String>,
    pub usage: BindingUsage,
    pub path: NodePath,
}

///
/// ValidatedTree
///
/// A tree whose every full-text reference resolved to a full-text index.
/// Only `validate` constructs one.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedTree {
    tree: ExprTree,
    bindings: Vec<IndexBinding>,
    config: PrepareConfig,
}

impl ValidatedTree {
    #[must_use]
    pub const fn tree(&self) -> &ExprTree {
        &self.tree
    }

    #[must_use]
    pub const fn root(&self) -> &Expr {
        self.tree.root()
    }

    /// Resolved bindings in pre-order.
    #[must_use]
    pub fn bindings(&self) -> &[IndexBinding] {
        &self.bindings
    }

    /// Configuration the tree was validated under.
    #[must_use]
    pub const fn config(&self) -> &PrepareConfig {
        &self.config
    }
}

/// Validate `tree` against `catalog` with default configuration.
pub fn validate<C>(tree: &ExprTree, catalog: &C) -> Result<ValidatedTree, ValidateError>
where
    C: IndexCatalog + ?Sized,
{
    validate_with(tree, catalog, &PrepareConfig::default())
}

/// Validate `tree` against `catalog`. Neither input is mutated.
#[tracing::instrument(
    skip_all,
    fields(root = tree.root().kind(), nodes = tree.node_count(), depth = tree.depth())
)]
pub fn validate_with<C>(
    tree: &ExprTree,
    catalog: &C,
    config: &PrepareConfig,
) -> Result<ValidatedTree, ValidateError>
where
    C: IndexCatalog + ?Sized,
{
    let mut validator = Validator {
        catalog,
        max_depth: config.max_depth,
        path: Vec::new(),
        bindings: Vec::new(),
    };

    if let Err(err) = validator.visit(tree.root()) {
        tracing::debug!(error = %err, "expression rejected");
        return Err(err);
    }

    tracing::debug!(bindings = validator.bindings.len(), "expression validated");

    Ok(ValidatedTree {
        tree: tree.clone(),
        bindings: validator.bindings,
        config: *config,
    })
}

///
/// Validator
///

struct Validator<'a, C: ?Sized> {
    catalog: &'a C,
    max_depth: usize,
    path: Vec<usize>,
    bindings: Vec<IndexBinding>,
}

impl<C: IndexCatalog + ?Sized> Validator<'_, C> {
    fn node_path(&self) -> NodePath {
        NodePath(self.path.clone())
    }

    // Depth is checked on entry, so recursion never exceeds `max_depth` frames.
    fn visit(&mut self, expr: &Expr) -> Result<(), ValidateError> {
        if self.path.len() >= self.max_depth {
            return Err(ValidateError::DepthExceeded {
                max: self.max_depth,
                path: self.node_path(),
            });
        }

        match expr {
            Expr::FullTextMatch(m) => self.bind(m.index_name(), BindingUsage::Match)?,
            Expr::Function(call) => self.check_function(call)?,
            Expr::Literal(_)
            | Expr::Property(_)
            | Expr::Parameter(_)
            | Expr::Compare(_)
            | Expr::Combinator(_) => {}
        }

        for (index, child) in expr.children().iter().enumerate() {
            self.path.push(index);
            self.visit(child)?;
            self.path.pop();
        }

        Ok(())
    }

    fn check_function(&mut self, call: &FunctionCall) -> Result<(), ValidateError> {
        let Some(function) = Function::from_name(call.name()) else {
            return Err(ValidateError::UnknownFunction {
                name: call.name().to_string(),
                path: self.node_path(),
            });
        };

        if call.args().len() != function.arity() {
            return Err(ValidateError::FunctionArity {
                name: function.name().to_string(),
                expected: function.arity(),
                found: call.args().len(),
                path: self.node_path(),
            });
        }

        if function == Function::Rank {
            let index = rank_index(call).ok_or_else(|| ValidateError::RankArgument {
                path: self.node_path(),
            })?;
            self.bind(index, BindingUsage::Rank)?;
        }

        Ok(())
    }

    fn bind(&mut self, name: &str, usage: BindingUsage) -> Result<(), ValidateError> {
        let Some(descriptor) = self.catalog.lookup(name) else {
            return Err(ValidateError::UnknownIndex {
                name: name.to_string(),
                path: self.node_path(),
            });
        };

        if descriptor.kind != IndexKind::FullText {
            return Err(ValidateError::WrongIndexKind {
                name: name.to_string(),
                expected: IndexKind::FullText,
                found: descriptor.kind,
                path: self.node_path(),
            });
        }

        self.bindings.push(IndexBinding {
            index: name.to_string(),
            kind: descriptor.kind,
            fields: descriptor.fields.clone(),
            usage,
            path: self.node_path(),
        });

        Ok(())
    }
}
