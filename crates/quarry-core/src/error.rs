use crate::{expr::ExprError, validate::ValidateError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// QueryError
///
/// Umbrella error for the preparation pipeline. Every variant is a
/// recoverable caller error; internal invariant violations panic instead.
/// Catalog construction reports `CatalogError` on its own, before any
/// expression is prepared.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("{0}")]
    Expr(#[from] ExprError),

    #[error("{0}")]
    Validate(#[from] ValidateError),
}

impl QueryError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Expr(err) => err.class(),
            Self::Validate(err) => err.class(),
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Expr(_) => ErrorOrigin::Expr,
            Self::Validate(_) => ErrorOrigin::Validate,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {self}", self.origin(), self.class())
    }
}

impl ExprError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        ErrorClass::InvalidArgument
    }
}

///
/// ErrorClass
/// Stable error taxonomy for caller-facing classification.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    InvalidArgument,
    UnknownIndex,
    WrongIndexKind,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::UnknownIndex => "unknown_index",
            Self::WrongIndexKind => "wrong_index_kind",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorOrigin {
    Expr,
    Validate,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Expr => "expr",
            Self::Validate => "validate",
        };
        write!(f, "{label}")
    }
}

/// Abort on a broken internal invariant. Reaching this is a bug in this
/// crate, never a caller error.
#[track_caller]
pub(crate) fn invariant_violation(origin: &str, message: impl fmt::Display) -> ! {
    panic!("{origin} invariant violated: {message}")
}
