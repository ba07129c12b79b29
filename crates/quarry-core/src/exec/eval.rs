use crate::{
    compile::{CompiledPlan, Step},
    error::invariant_violation,
    exec::{Document, FullTextProbe, Parameters},
    expr::CompareOp,
    value::{Value, compare_eq, compare_order, like_match},
};
use std::cmp::Ordering;

impl CompiledPlan {
    /// Evaluate the plan against one document.
    ///
    /// Short-circuit jumps are honored, so probes to the right of a decided
    /// AND / OR operand are never issued. Missing properties and unbound
    /// parameters evaluate to `Null`.
    #[must_use]
    pub fn evaluate<D, P>(&self, document: &D, probe: &P, params: &Parameters) -> bool
    where
        D: Document,
        P: FullTextProbe + ?Sized,
    {
        let mut machine = Machine {
            stack: Vec::with_capacity(8),
        };
        let mut pc = 0;

        while let Some(step) = self.steps.get(pc) {
            pc += 1;
            match step {
                Step::Literal(value) => machine.push(value.clone()),
                Step::Property(path) => {
                    machine.push(document.property(path).unwrap_or(Value::Null));
                }
                Step::Parameter(name) => {
                    machine.push(params.get(name.as_str()).cloned().unwrap_or(Value::Null));
                }
                Step::Call { function, argc } => {
                    let args = machine.pop_n(*argc);
                    machine.push(function.apply(&args));
                }
                Step::Compare(op) => {
                    let right = machine.pop();
                    let left = machine.pop();
                    machine.push(Value::Bool(eval_compare(*op, &left, &right)));
                }
                Step::Probe { index, text } => {
                    machine.push(Value::Bool(probe.probe(index, text, document)));
                }
                Step::Rank { index } => {
                    machine.push(Value::Float(probe.rank(index, document)));
                }
                Step::ToBool => {
                    let top = machine.pop();
                    machine.push(Value::Bool(top.is_truthy()));
                }
                Step::Not => {
                    let top = machine.pop();
                    machine.push(Value::Bool(!top.is_truthy()));
                }
                Step::JumpIfFalse { target } => {
                    if machine.peek().is_truthy() {
                        machine.pop();
                    } else {
                        pc = *target;
                    }
                }
                Step::JumpIfTrue { target } => {
                    if machine.peek().is_truthy() {
                        pc = *target;
                    } else {
                        machine.pop();
                    }
                }
            }
        }

        let result = machine.pop();
        if !machine.stack.is_empty() {
            invariant_violation("executor", "plan left extra values on the stack");
        }

        result.is_truthy()
    }
}

///
/// Machine
///

struct Machine {
    stack: Vec<Value>,
}

impl Machine {
    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> Value {
        self.stack
            .pop()
            .unwrap_or_else(|| invariant_violation("executor", "stack underflow"))
    }

    fn peek(&self) -> &Value {
        self.stack
            .last()
            .unwrap_or_else(|| invariant_violation("executor", "stack underflow"))
    }

    fn pop_n(&mut self, count: usize) -> Vec<Value> {
        let Some(at) = self.stack.len().checked_sub(count) else {
            invariant_violation("executor", "stack underflow");
        };

        self.stack.split_off(at)
    }
}

// Null never equals or orders against anything; only IS / IS NOT see it.
fn eval_compare(op: CompareOp, left: &Value, right: &Value) -> bool {
    let has_null = left.is_null() || right.is_null();

    match op {
        CompareOp::Eq => !has_null && compare_eq(left, right).unwrap_or(false),
        CompareOp::Ne => !has_null && compare_eq(left, right).is_some_and(|eq| !eq),

        CompareOp::Lt => compare_order(left, right).is_some_and(Ordering::is_lt),
        CompareOp::Lte => compare_order(left, right).is_some_and(Ordering::is_le),
        CompareOp::Gt => compare_order(left, right).is_some_and(Ordering::is_gt),
        CompareOp::Gte => compare_order(left, right).is_some_and(Ordering::is_ge),

        CompareOp::Like => match (left, right) {
            (Value::Text(text), Value::Text(pattern)) => like_match(text, pattern),
            _ => false,
        },
        CompareOp::In => match right {
            Value::List(items) => {
                !left.is_null()
                    && items
                        .iter()
                        .any(|item| compare_eq(left, item).unwrap_or(false))
            }
            _ => false,
        },

        CompareOp::Is => is_same(left, right),
        CompareOp::IsNot => !is_same(left, right),
    }
}

fn is_same(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => compare_eq(left, right).unwrap_or(false),
    }
}
