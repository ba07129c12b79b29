use crate::{
    expr::{CompareOp, Function, ParameterName, PropertyPath},
    value::Value,
};
use std::fmt::{self, Write as _};

///
/// Step
///
/// One instruction of the plan's stack machine. Jumps only move forward,
/// so every plan terminates after at most `steps.len()` instructions.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Push a constant.
    Literal(Value),
    /// Push the document value at a path (`Null` when absent).
    Property(PropertyPath),
    /// Push a bound parameter (`Null` when unbound).
    Parameter(ParameterName),
    /// Pop `argc` arguments and push the function result.
    Call { function: Function, argc: usize },
    /// Pop right then left, push the boolean comparison result.
    Compare(CompareOp),
    /// Push the full-text index's verdict for this document.
    Probe { index: String, text: String },
    /// Push the document's relevance score in a full-text index.
    Rank { index: String },
    /// Replace the top value with its truthiness.
    ToBool,
    /// Replace the top value with its negated truthiness.
    Not,
    /// If the top is false, jump and keep it; otherwise pop it.
    JumpIfFalse { target: usize },
    /// If the top is true, jump and keep it; otherwise pop it.
    JumpIfTrue { target: usize },
}

impl Step {
    #[must_use]
    pub const fn is_probe(&self) -> bool {
        matches!(self, Self::Probe { .. })
    }

    #[must_use]
    pub const fn is_compare(&self) -> bool {
        matches!(self, Self::Compare(_))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "LITERAL {value}"),
            Self::Property(path) => write!(f, "PROPERTY {path}"),
            Self::Parameter(name) => write!(f, "PARAMETER {name}"),
            Self::Call { function, argc } => write!(f, "CALL {}/{argc}", function.name()),
            Self::Compare(op) => write!(f, "COMPARE {op}"),
            Self::Probe { index, text } => write!(f, "PROBE {index} {text:?}"),
            Self::Rank { index } => write!(f, "RANK {index}"),
            Self::ToBool => write!(f, "TO_BOOL"),
            Self::Not => write!(f, "NOT"),
            Self::JumpIfFalse { target } => write!(f, "JUMP_IF_FALSE {target:04}"),
            Self::JumpIfTrue { target } => write!(f, "JUMP_IF_TRUE {target:04}"),
        }
    }
}

///
/// PlanFingerprint
///
/// SHA-256 over the plan's step stream. Equal plans always fingerprint
/// equally; the encoding is stable within one crate version.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PlanFingerprint([u8; 32]);

impl PlanFingerprint {
    #[must_use]
    pub(crate) const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PlanFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }

        Ok(())
    }
}

///
/// CompiledPlan
///
/// Executor-ready program lowered from one validated tree. Owns all of its
/// data, so the source tree may be dropped once compilation returns.
///

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledPlan {
    pub(crate) steps: Vec<Step>,
    pub(crate) indexes: Vec<String>,
    pub(crate) fingerprint: PlanFingerprint,
}

impl CompiledPlan {
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Plans are never empty; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Full-text indexes the plan probes or ranks, in first-use order.
    #[must_use]
    pub fn full_text_indexes(&self) -> &[String] {
        &self.indexes
    }

    #[must_use]
    pub fn probe_count(&self) -> usize {
        self.steps.iter().filter(|step| step.is_probe()).count()
    }

    #[must_use]
    pub const fn fingerprint(&self) -> PlanFingerprint {
        self.fingerprint
    }

    /// Human-readable listing, one numbered step per line.
    #[must_use]
    pub fn explain(&self) -> String {
        let mut out = String::new();
        for (pc, step) in self.steps.iter().enumerate() {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{pc:04} {step}");
        }

        out
    }
}
