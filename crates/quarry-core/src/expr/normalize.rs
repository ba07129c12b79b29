use crate::expr::{Combinator, CombinatorOp, Comparison, Expr, FunctionCall};

///
/// Normalize an expression into a simpler, logically equivalent form.
///
/// Normalization guarantees:
/// - Logical equivalence is preserved in boolean position
/// - Double negation over a boolean operand is eliminated
/// - Nested AND / OR nodes of the same operator are flattened
/// - Operand order is never changed (probe order stays observable)
///
/// Callers must bound tree depth first; this pass recurses.
///
#[must_use]
pub(crate) fn normalize(expr: &Expr) -> Expr {
    match expr {
        Expr::Literal(_) | Expr::Property(_) | Expr::Parameter(_) | Expr::FullTextMatch(_) => {
            expr.clone()
        }
        Expr::Function(call) => Expr::Function(FunctionCall {
            name: call.name.clone(),
            args: call.args.iter().map(normalize).collect(),
        }),
        Expr::Compare(cmp) => Expr::Compare(Comparison::new(
            cmp.op,
            normalize(cmp.left()),
            normalize(cmp.right()),
        )),
        Expr::Combinator(comb) => match comb.op {
            CombinatorOp::Not => normalize_not(&comb.operands[0]),
            op @ (CombinatorOp::And | CombinatorOp::Or) => normalize_flat(op, &comb.operands),
        },
    }
}

// NOT(NOT(x)) -> x, but only when x already yields a boolean: a non-boolean
// operand would otherwise leak its raw value into a comparison.
fn normalize_not(inner: &Expr) -> Expr {
    if let Expr::Combinator(comb) = inner
        && comb.op == CombinatorOp::Not
        && comb.operands[0].is_boolean()
    {
        return normalize(&comb.operands[0]);
    }

    Expr::not(normalize(inner))
}

fn normalize_flat(op: CombinatorOp, operands: &[Expr]) -> Expr {
    let mut flat = Vec::with_capacity(operands.len());
    for operand in operands {
        match normalize(operand) {
            Expr::Combinator(mut child) if child.op == op => flat.append(&mut child.operands),
            other => flat.push(other),
        }
    }

    Expr::Combinator(Combinator { op, operands: flat })
}
