//! Value comparison semantics for runtime plan evaluation.
//!
//! Equality is strict same-variant except across numeric variants, which
//! widen before comparing. Ordering is defined for numerics, text, and bools.
//! Helpers return `None` when a comparison is not defined; callers treat that
//! as a non-match.

use crate::value::Value;
use std::{cmp::Ordering, mem::discriminant};

/// Perform equality comparison with numeric widening.
#[must_use]
pub fn compare_eq(left: &Value, right: &Value) -> Option<bool> {
    if left.is_numeric() && right.is_numeric() {
        return cmp_numeric(left, right).map(Ordering::is_eq);
    }
    if discriminant(left) != discriminant(right) {
        return None;
    }

    Some(left == right)
}

/// Perform ordering comparison with numeric widening.
#[must_use]
pub fn compare_order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ if left.is_numeric() && right.is_numeric() => cmp_numeric(left, right),
        _ => None,
    }
}

// Integers compare exactly through i128; any float operand widens both sides to f64.
fn cmp_numeric(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Uint(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
        (Value::Uint(a), Value::Int(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
        _ => left.as_f64()?.partial_cmp(&right.as_f64()?),
    }
}

/// Match `text` against a SQL-style pattern (`%` any run, `_` any one char).
#[must_use]
pub fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // Greedy wildcard matching with single backtrack point.
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                star = Some((p, t));
                p += 1;
            }
            Some('_') => {
                t += 1;
                p += 1;
            }
            Some(c) if *c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match star {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    star = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == '%')
}
