use crate::{
    expr::{Expr, ExprError, Function, FunctionCall},
    value::Value,
};

///
/// FullTextExpression
///
/// Builder bound to one full-text index name. The name is not resolved
/// here; resolution happens at validation so builders may exist before the
/// catalog is finalized. The builder is a plain value and can produce any
/// number of match nodes.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FullTextExpression {
    index: String,
}

impl FullTextExpression {
    /// Bind a builder to `name`.
    pub fn index(name: impl Into<String>) -> Result<Self, ExprError> {
        let index = name.into();
        if index.is_empty() {
            return Err(ExprError::EmptyIndexName);
        }

        Ok(Self { index })
    }

    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.index
    }

    /// Build a match node testing `text` against the bound index.
    ///
    /// The search text is opaque; any query syntax is interpreted by the
    /// full-text index at execution time.
    pub fn match_text(&self, text: impl Into<String>) -> Result<Expr, ExprError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ExprError::EmptySearchText);
        }

        Ok(Expr::FullTextMatch(FullTextMatch {
            index: self.index.clone(),
            text,
        }))
    }

    /// Build a `rank` call returning the document's relevance score in the
    /// bound index.
    #[must_use]
    pub fn rank(&self) -> Expr {
        Expr::Function(FunctionCall {
            name: Function::Rank.name().to_string(),
            args: vec![Expr::Literal(Value::Text(self.index.clone()))],
        })
    }
}

/// Index name carried by a well-formed `rank` call.
pub(crate) fn rank_index(call: &FunctionCall) -> Option<&str> {
    match call.args() {
        [Expr::Literal(Value::Text(index))] if !index.is_empty() => Some(index),
        _ => None,
    }
}

///
/// FullTextMatch
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FullTextMatch {
    index: String,
    text: String,
}

impl FullTextMatch {
    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.index
    }

    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.text
    }
}
