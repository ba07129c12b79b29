//! Module: compile
//! Responsibility: lower a validated tree into a linear, executor-ready plan.
//! Does not own: index resolution (validate) or match decisions (executor).
//! Boundary: accepts only `ValidatedTree`; never fails on one.
//!
//! Evaluation order is fixed left-to-right. AND / OR lower to forward jumps
//! so an executor may skip operands once the result is decided.

mod fingerprint;
mod plan;

#[cfg(test)]
mod tests;

use crate::{
    error::invariant_violation,
    expr::{CombinatorOp, Expr, Function, FunctionCall, normalize::normalize, rank_index},
    validate::ValidatedTree,
};
use std::borrow::Cow;

// re-exports
pub use plan::{CompiledPlan, PlanFingerprint, Step};

/// Compile a validated tree into a plan.
///
/// Panics only when the validated tree breaks a construction-time invariant,
/// which indicates a bug in this crate.
#[must_use]
#[tracing::instrument(skip_all, fields(nodes = tree.tree().node_count()))]
pub fn compile(tree: ValidatedTree) -> CompiledPlan {
    let root = if tree.config().normalize {
        Cow::Owned(normalize(tree.root()))
    } else {
        Cow::Borrowed(tree.root())
    };

    let mut lowering = Lowering::default();
    lowering.lower(&root);

    let Lowering { steps, indexes } = lowering;
    let fingerprint = fingerprint::fingerprint_steps(&steps);
    tracing::debug!(
        steps = steps.len(),
        indexes = indexes.len(),
        %fingerprint,
        "expression compiled"
    );

    CompiledPlan {
        steps,
        indexes,
        fingerprint,
    }
}

///
/// Lowering
///

#[derive(Default)]
struct Lowering {
    steps: Vec<Step>,
    indexes: Vec<String>,
}

impl Lowering {
    fn emit(&mut self, step: Step) -> usize {
        self.steps.push(step);
        self.steps.len() - 1
    }

    fn note_index(&mut self, index: &str) {
        if !self.indexes.iter().any(|known| known == index) {
            self.indexes.push(index.to_string());
        }
    }

    fn lower(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(value) => {
                self.emit(Step::Literal(value.clone()));
            }
            Expr::Property(path) => {
                self.emit(Step::Property(path.clone()));
            }
            Expr::Parameter(name) => {
                self.emit(Step::Parameter(name.clone()));
            }
            Expr::Function(call) => self.lower_function(call),
            Expr::Compare(cmp) => {
                self.lower(cmp.left());
                self.lower(cmp.right());
                self.emit(Step::Compare(cmp.op()));
            }
            Expr::Combinator(comb) => match comb.op() {
                CombinatorOp::Not => {
                    let [operand] = comb.operands() else {
                        invariant_violation("compile", "NOT must have exactly one operand");
                    };
                    self.lower(operand);
                    self.emit(Step::Not);
                }
                CombinatorOp::And => self.lower_short_circuit(comb.operands(), false),
                CombinatorOp::Or => self.lower_short_circuit(comb.operands(), true),
            },
            Expr::FullTextMatch(m) => {
                self.note_index(m.index_name());
                self.emit(Step::Probe {
                    index: m.index_name().to_string(),
                    text: m.search_text().to_string(),
                });
            }
        }
    }

    fn lower_function(&mut self, call: &FunctionCall) {
        let Some(function) = Function::from_name(call.name()) else {
            invariant_violation("compile", format!("unresolved function '{}'", call.name()));
        };

        if function == Function::Rank {
            let Some(index) = rank_index(call) else {
                invariant_violation("compile", "rank call without an index literal");
            };
            self.note_index(index);
            self.emit(Step::Rank {
                index: index.to_string(),
            });
            return;
        }

        for arg in call.args() {
            self.lower(arg);
        }
        self.emit(Step::Call {
            function,
            argc: call.args().len(),
        });
    }

    // Each operand leaves one boolean; all but the last may jump to the end
    // once the result is decided (false for AND, true for OR).
    fn lower_short_circuit(&mut self, operands: &[Expr], decided_by: bool) {
        if operands.len() < 2 {
            invariant_violation("compile", "AND/OR must have at least two operands");
        }

        let mut jumps = Vec::with_capacity(operands.len() - 1);
        for (i, operand) in operands.iter().enumerate() {
            self.lower(operand);
            self.emit(Step::ToBool);

            if i + 1 < operands.len() {
                let jump = if decided_by {
                    Step::JumpIfTrue { target: 0 }
                } else {
                    Step::JumpIfFalse { target: 0 }
                };
                jumps.push(self.emit(jump));
            }
        }

        let end = self.steps.len();
        for at in jumps {
            match &mut self.steps[at] {
                Step::JumpIfFalse { target } | Step::JumpIfTrue { target } => *target = end,
                _ => invariant_violation("compile", "patched step is not a jump"),
            }
        }
    }
}
