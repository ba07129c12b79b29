//! Module: expr
//! Responsibility: immutable expression nodes and their structural constructors.
//! Does not own: index resolution (validate) or evaluation order (compile).
//! Boundary: every node reachable from the host API is built through this module.
//!
//! Invariants:
//! - Combinator operand counts match their operator's arity.
//! - Full-text match nodes carry a non-empty index name and search text.
//! - Property paths, parameter names, and function names are non-empty.
//! - Nodes own their children; there are no parent links.

mod full_text;
mod function;
pub(crate) mod normalize;
mod path;
mod tree;


use crate::value::Value;
use std::{
    fmt, mem,
    ops::{BitAnd, BitOr, Not},
};
use thiserror::Error as ThisError;

// re-exports
pub use full_text::{FullTextExpression, FullTextMatch};
pub(crate) use full_text::rank_index;
pub use function::Function;
pub use path::{ParameterName, PropertyPath};
pub use tree::ExprTree;

///
/// ExprError
///
/// Construction-time argument failures. No node is produced when one of
/// these is returned.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ExprError {
    #[error("full-text index name must not be empty")]
    EmptyIndexName,

    #[error("full-text search text must not be empty")]
    EmptySearchText,

    #[error("property path must not be empty")]
    EmptyPropertyPath,

    #[error("property path '{path}' contains an empty segment")]
    EmptyPathSegment { path: String },

    #[error("parameter name must not be empty")]
    EmptyParameterName,

    #[error("function name must not be empty")]
    EmptyFunctionName,

    #[error("{op} requires {expected} operand(s), found {found}")]
    CombinatorArity {
        op: CombinatorOp,
        expected: Arity,
        found: usize,
    },
}

///
/// Arity
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum CompareOp {
    Eq = 0x01,
    Ne = 0x02,
    Lt = 0x03,
    Lte = 0x04,
    Gt = 0x05,
    Gte = 0x06,
    Like = 0x07,
    In = 0x08,
    Is = 0x09,
    IsNot = 0x0a,
}

impl CompareOp {
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Like => "LIKE",
            Self::In => "IN",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

///
/// CombinatorOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum CombinatorOp {
    And = 0x01,
    Or = 0x02,
    Not = 0x03,
}

impl CombinatorOp {
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn arity(self) -> Arity {
        match self {
            Self::And | Self::Or => Arity::AtLeast(2),
            Self::Not => Arity::Exactly(1),
        }
    }
}

impl fmt::Display for CombinatorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        };
        f.write_str(label)
    }
}

///
/// Comparison
///

#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    op: CompareOp,
    operands: Box<[Expr; 2]>,
}

impl Comparison {
    #[must_use]
    pub fn new(op: CompareOp, left: Expr, right: Expr) -> Self {
        Self {
            op,
            operands: Box::new([left, right]),
        }
    }

    #[must_use]
    pub const fn op(&self) -> CompareOp {
        self.op
    }

    #[must_use]
    pub fn left(&self) -> &Expr {
        &self.operands[0]
    }

    #[must_use]
    pub fn right(&self) -> &Expr {
        &self.operands[1]
    }
}

///
/// Combinator
///

#[derive(Clone, Debug, PartialEq)]
pub struct Combinator {
    op: CombinatorOp,
    operands: Vec<Expr>,
}

impl Combinator {
    /// Build a combinator, rejecting operand counts outside the operator's arity.
    pub fn new(op: CombinatorOp, operands: Vec<Expr>) -> Result<Self, ExprError> {
        let expected = op.arity();
        if !expected.accepts(operands.len()) {
            return Err(ExprError::CombinatorArity {
                op,
                expected,
                found: operands.len(),
            });
        }

        Ok(Self { op, operands })
    }

    #[must_use]
    pub const fn op(&self) -> CombinatorOp {
        self.op
    }

    #[must_use]
    pub fn operands(&self) -> &[Expr] {
        &self.operands
    }
}

///
/// FunctionCall
///
/// A call by name; the name is resolved against the builtin registry at
/// validation time.
///

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    name: String,
    args: Vec<Expr>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Result<Self, ExprError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ExprError::EmptyFunctionName);
        }

        Ok(Self { name, args })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn args(&self) -> &[Expr] {
        &self.args
    }
}

///
/// Drop
///
/// Nested children move onto a heap worklist and each popped node is emptied
/// before it drops, so teardown depth stays constant for any tree shape.
///

impl Drop for Comparison {
    fn drop(&mut self) {
        if self.operands.iter().any(has_children) {
            drop_iteratively(Vec::from(self.take_operands()));
        }
    }
}

impl Drop for Combinator {
    fn drop(&mut self) {
        if self.operands.iter().any(has_children) {
            drop_iteratively(mem::take(&mut self.operands));
        }
    }
}

impl Drop for FunctionCall {
    fn drop(&mut self) {
        if self.args.iter().any(has_children) {
            drop_iteratively(mem::take(&mut self.args));
        }
    }
}

impl Comparison {
    fn take_operands(&mut self) -> [Expr; 2] {
        mem::replace(
            &mut *self.operands,
            [Expr::Literal(Value::Null), Expr::Literal(Value::Null)],
        )
    }
}

fn has_children(expr: &Expr) -> bool {
    !expr.children().is_empty()
}

fn drop_iteratively(mut pending: Vec<Expr>) {
    while let Some(mut expr) = pending.pop() {
        match &mut expr {
            Expr::Function(call) => pending.append(&mut call.args),
            Expr::Compare(cmp) => pending.extend(cmp.take_operands()),
            Expr::Combinator(comb) => pending.append(&mut comb.operands),
            Expr::Literal(_) | Expr::Property(_) | Expr::Parameter(_) | Expr::FullTextMatch(_) => {}
        }
    }
}

///
/// Expr
///
/// Closed set of expression nodes. Validation and compilation match on this
/// exhaustively, so a new node kind must be handled in both passes.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Value),
    Property(PropertyPath),
    Parameter(ParameterName),
    Function(FunctionCall),
    Compare(Comparison),
    Combinator(Combinator),
    FullTextMatch(FullTextMatch),
}

impl Expr {
    ///
    /// LEAVES
    ///

    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn property(path: &str) -> Result<Self, ExprError> {
        PropertyPath::parse(path).map(Self::Property)
    }

    pub fn parameter(name: &str) -> Result<Self, ExprError> {
        ParameterName::new(name).map(Self::Parameter)
    }

    pub fn function(name: impl Into<String>, args: Vec<Self>) -> Result<Self, ExprError> {
        FunctionCall::new(name, args).map(Self::Function)
    }

    ///
    /// COMPARISONS
    ///

    #[must_use]
    pub fn compare(op: CompareOp, left: Self, right: Self) -> Self {
        Self::Compare(Comparison::new(op, left, right))
    }

    #[must_use]
    pub fn equal_to(self, other: Self) -> Self {
        Self::compare(CompareOp::Eq, self, other)
    }

    #[must_use]
    pub fn not_equal_to(self, other: Self) -> Self {
        Self::compare(CompareOp::Ne, self, other)
    }

    #[must_use]
    pub fn less_than(self, other: Self) -> Self {
        Self::compare(CompareOp::Lt, self, other)
    }

    #[must_use]
    pub fn less_than_or_equal_to(self, other: Self) -> Self {
        Self::compare(CompareOp::Lte, self, other)
    }

    #[must_use]
    pub fn greater_than(self, other: Self) -> Self {
        Self::compare(CompareOp::Gt, self, other)
    }

    #[must_use]
    pub fn greater_than_or_equal_to(self, other: Self) -> Self {
        Self::compare(CompareOp::Gte, self, other)
    }

    #[must_use]
    pub fn like(self, pattern: Self) -> Self {
        Self::compare(CompareOp::Like, self, pattern)
    }

    #[must_use]
    pub fn in_list(self, list: Self) -> Self {
        Self::compare(CompareOp::In, self, list)
    }

    #[must_use]
    pub fn is(self, other: Self) -> Self {
        Self::compare(CompareOp::Is, self, other)
    }

    #[must_use]
    pub fn is_not(self, other: Self) -> Self {
        Self::compare(CompareOp::IsNot, self, other)
    }

    ///
    /// COMBINATORS
    ///

    pub fn combine(op: CombinatorOp, operands: Vec<Self>) -> Result<Self, ExprError> {
        Combinator::new(op, operands).map(Self::Combinator)
    }

    pub fn and(operands: impl IntoIterator<Item = Self>) -> Result<Self, ExprError> {
        Self::combine(CombinatorOp::And, operands.into_iter().collect())
    }

    pub fn or(operands: impl IntoIterator<Item = Self>) -> Result<Self, ExprError> {
        Self::combine(CombinatorOp::Or, operands.into_iter().collect())
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(expr: Self) -> Self {
        Self::Combinator(Combinator {
            op: CombinatorOp::Not,
            operands: vec![expr],
        })
    }

    ///
    /// INSPECTION
    ///

    /// Direct children in evaluation (left-to-right) order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Literal(_) | Self::Property(_) | Self::Parameter(_) | Self::FullTextMatch(_) => {
                &[]
            }
            Self::Function(call) => call.args(),
            Self::Compare(cmp) => cmp.operands.as_slice(),
            Self::Combinator(comb) => comb.operands(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Property(_) => "property",
            Self::Parameter(_) => "parameter",
            Self::Function(_) => "function",
            Self::Compare(_) => "comparison",
            Self::Combinator(_) => "combinator",
            Self::FullTextMatch(_) => "full-text match",
        }
    }

    /// True when the node always evaluates to a boolean.
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(
            self,
            Self::Compare(_)
                | Self::Combinator(_)
                | Self::FullTextMatch(_)
                | Self::Literal(Value::Bool(_))
        )
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<FullTextMatch> for Expr {
    fn from(node: FullTextMatch) -> Self {
        Self::FullTextMatch(node)
    }
}

impl BitAnd for Expr {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::Combinator(Combinator {
            op: CombinatorOp::And,
            operands: vec![self, rhs],
        })
    }
}

impl BitAnd for &Expr {
    type Output = Expr;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.clone() & rhs.clone()
    }
}

impl BitOr for Expr {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::Combinator(Combinator {
            op: CombinatorOp::Or,
            operands: vec![self, rhs],
        })
    }
}

impl BitOr for &Expr {
    type Output = Expr;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.clone() | rhs.clone()
    }
}

impl Not for Expr {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::not(self)
    }
}
