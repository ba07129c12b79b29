use crate::expr::{Expr, Function, ParameterName, PropertyPath, rank_index};
use std::collections::BTreeSet;

///
/// ExprTree
///
/// One owned root node plus the references collected while walking it.
/// The walk is iterative so arbitrarily deep trees can be summarized
/// before validation enforces a depth limit.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ExprTree {
    root: Expr,
    properties: BTreeSet<PropertyPath>,
    parameters: BTreeSet<ParameterName>,
    full_text_indexes: BTreeSet<String>,
    node_count: usize,
    depth: usize,
}

impl ExprTree {
    #[must_use]
    pub fn new(root: Expr) -> Self {
        let mut tree = Self {
            root,
            properties: BTreeSet::new(),
            parameters: BTreeSet::new(),
            full_text_indexes: BTreeSet::new(),
            node_count: 0,
            depth: 0,
        };
        tree.collect_references();

        tree
    }

    // Single pre-order walk over the owned root.
    fn collect_references(&mut self) {
        let mut properties = BTreeSet::new();
        let mut parameters = BTreeSet::new();
        let mut full_text_indexes = BTreeSet::new();
        let mut node_count = 0;
        let mut depth = 0;

        let mut stack = vec![(&self.root, 1usize)];
        while let Some((node, level)) = stack.pop() {
            node_count += 1;
            depth = depth.max(level);

            match node {
                Expr::Property(path) => {
                    properties.insert(path.clone());
                }
                Expr::Parameter(name) => {
                    parameters.insert(name.clone());
                }
                Expr::FullTextMatch(m) => {
                    full_text_indexes.insert(m.index_name().to_string());
                }
                Expr::Function(call) if Function::from_name(call.name()) == Some(Function::Rank) => {
                    if let Some(index) = rank_index(call) {
                        full_text_indexes.insert(index.to_string());
                    }
                }
                Expr::Literal(_) | Expr::Function(_) | Expr::Compare(_) | Expr::Combinator(_) => {}
            }

            stack.extend(node.children().iter().rev().map(|child| (child, level + 1)));
        }

        self.properties = properties;
        self.parameters = parameters;
        self.full_text_indexes = full_text_indexes;
        self.node_count = node_count;
        self.depth = depth;
    }

    #[must_use]
    pub const fn root(&self) -> &Expr {
        &self.root
    }

    #[must_use]
    pub fn into_root(self) -> Expr {
        self.root
    }

    /// Property paths referenced anywhere in the tree.
    #[must_use]
    pub const fn properties(&self) -> &BTreeSet<PropertyPath> {
        &self.properties
    }

    #[must_use]
    pub const fn parameters(&self) -> &BTreeSet<ParameterName> {
        &self.parameters
    }

    /// Full-text index names named by match nodes and rank calls.
    #[must_use]
    pub const fn full_text_indexes(&self) -> &BTreeSet<String> {
        &self.full_text_indexes
    }

    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of nodes on the longest root-to-leaf path.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }
}

impl From<Expr> for ExprTree {
    fn from(root: Expr) -> Self {
        Self::new(root)
    }
}
