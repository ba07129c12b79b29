//! Preparation tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect
//! validation or compilation results.

use crate::{
    compile::{CompiledPlan, PlanFingerprint},
    error::{ErrorClass, ErrorOrigin, QueryError},
    validate::ValidatedTree,
};

///
/// PrepareTraceSink
///

pub trait PrepareTraceSink: Send + Sync {
    fn on_event(&self, event: PrepareTraceEvent);
}

///
/// PrepareTraceEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrepareTraceEvent {
    Validated {
        nodes: u32,
        depth: u32,
        bindings: u32,
    },
    Rejected {
        class: ErrorClass,
        origin: ErrorOrigin,
    },
    Compiled {
        fingerprint: PlanFingerprint,
        steps: u32,
        probes: u32,
    },
}

impl PrepareTraceEvent {
    pub(crate) fn validated(tree: &ValidatedTree) -> Self {
        Self::Validated {
            nodes: saturating_u32(tree.tree().node_count()),
            depth: saturating_u32(tree.tree().depth()),
            bindings: saturating_u32(tree.bindings().len()),
        }
    }

    pub(crate) const fn rejected(err: &QueryError) -> Self {
        Self::Rejected {
            class: err.class(),
            origin: err.origin(),
        }
    }

    pub(crate) fn compiled(plan: &CompiledPlan) -> Self {
        Self::Compiled {
            fingerprint: plan.fingerprint(),
            steps: saturating_u32(plan.len()),
            probes: saturating_u32(plan.probe_count()),
        }
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
