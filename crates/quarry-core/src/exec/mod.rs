//! Module: exec
//! Responsibility: the executor-facing contract and a reference plan interpreter.
//! Does not own: storage scans, index probing, or ranking; those are supplied
//! by the caller through `Document` and `FullTextProbe`.
//!
//! Plans are immutable; any number of threads may evaluate one concurrently.

mod eval;

#[cfg(test)]
mod tests;

use crate::{expr::PropertyPath, value::Value};
use std::collections::BTreeMap;

///
/// Parameters
///
/// Values bound to `$name` parameters for one execution.
///

pub type Parameters = BTreeMap<String, Value>;

///
/// Document
///
/// Row-like view exposing values by property path.
///

pub trait Document {
    fn property(&self, path: &PropertyPath) -> Option<Value>;
}

impl Document for Value {
    fn property(&self, path: &PropertyPath) -> Option<Value> {
        self.get_path(path.segments()).cloned()
    }
}

impl Document for BTreeMap<String, Value> {
    fn property(&self, path: &PropertyPath) -> Option<Value> {
        let mut segments = path.segments();
        let first = self.get(segments.next()?)?;

        first.get_path(segments).cloned()
    }
}

///
/// FullTextProbe
///
/// Executor-supplied full-text evaluation. The plan only references
/// indexes that were confirmed full-text at validation time.
///

pub trait FullTextProbe {
    /// Whether `document` matches `text` in `index`.
    fn probe(&self, index: &str, text: &str, document: &dyn Document) -> bool;

    /// Relevance score of `document` in `index`.
    fn rank(&self, _index: &str, _document: &dyn Document) -> f64 {
        0.0
    }
}

impl<F> FullTextProbe for F
where
    F: Fn(&str, &str, &dyn Document) -> bool,
{
    fn probe(&self, index: &str, text: &str, document: &dyn Document) -> bool {
        self(index, text, document)
    }
}
