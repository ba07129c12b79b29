use crate::expr::ExprError;
use derive_more::Deref;
use std::fmt;

///
/// PropertyPath
///
/// Dotted document path (`address.city`). Every segment is non-empty.
///

#[derive(Clone, Debug, Deref, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PropertyPath(String);

impl PropertyPath {
    pub fn parse(path: &str) -> Result<Self, ExprError> {
        if path.is_empty() {
            return Err(ExprError::EmptyPropertyPath);
        }
        if path.split('.').any(str::is_empty) {
            return Err(ExprError::EmptyPathSegment {
                path: path.to_string(),
            });
        }

        Ok(Self(path.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

///
/// ParameterName
///
/// Name of a query parameter bound at execution time (`$name`).
///

#[derive(Clone, Debug, Deref, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ParameterName(String);

impl ParameterName {
    pub fn new(name: &str) -> Result<Self, ExprError> {
        let name = name.strip_prefix('$').unwrap_or(name);
        if name.is_empty() {
            return Err(ExprError::EmptyParameterName);
        }

        Ok(Self(name.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}
