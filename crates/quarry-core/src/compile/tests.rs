
use super::*;
use crate::{
    catalog::{IndexDescriptor, MemoryCatalog},
    config::PrepareConfig,
    expr::{CompareOp, ExprTree, FullTextExpression, PropertyPath},
    validate::{validate, validate_with},
    value::Value,
};

fn catalog() -> MemoryCatalog {
    MemoryCatalog::from_descriptors([
        IndexDescriptor::full_text("titleIdx", ["title"]),
        IndexDescriptor::full_text("bodyIdx", ["body"]),
        IndexDescriptor::value("priceIdx", ["price"]),
    ])
    .unwrap()
}

fn ft_match(index: &str, text: &str) -> Expr {
    FullTextExpression::index(index)
        .unwrap()
        .match_text(text)
        .unwrap()
}

fn price_over(limit: i64) -> Expr {
    Expr::property("price")
        .unwrap()
        .greater_than(Expr::literal(limit))
}

fn compile_expr(expr: Expr) -> CompiledPlan {
    compile(validate(&ExprTree::new(expr), &catalog()).unwrap())
}

fn compile_raw(expr: Expr) -> CompiledPlan {
    let config = PrepareConfig::default().with_normalize(false);

    compile(validate_with(&ExprTree::new(expr), &catalog(), &config).unwrap())
}

#[test]
fn match_and_comparison_lower_to_one_probe_then_one_compare() {
    let plan = compile_expr(Expr::and([ft_match("titleIdx", "cat"), price_over(10)]).unwrap());

    let probes: Vec<_> = plan
        .steps()
        .iter()
        .enumerate()
        .filter(|(_, step)| step.is_probe())
        .map(|(pc, _)| pc)
        .collect();
    let compares: Vec<_> = plan
        .steps()
        .iter()
        .enumerate()
        .filter(|(_, step)| step.is_compare())
        .map(|(pc, _)| pc)
        .collect();

    assert_eq!(probes.len(), 1);
    assert_eq!(compares.len(), 1);
    assert!(probes[0] < compares[0], "probe must be scheduled first");
    assert_eq!(
        plan.steps()[probes[0]],
        Step::Probe {
            index: "titleIdx".to_string(),
            text: "cat".to_string(),
        }
    );
    assert_eq!(plan.steps()[compares[0]], Step::Compare(CompareOp::Gt));
}

#[test]
fn and_lowers_to_forward_jumps_past_the_end() {
    let plan = compile_expr(Expr::and([ft_match("titleIdx", "cat"), price_over(10)]).unwrap());

    assert_eq!(
        plan.steps(),
        &[
            Step::Probe {
                index: "titleIdx".to_string(),
                text: "cat".to_string(),
            },
            Step::ToBool,
            Step::JumpIfFalse { target: 7 },
            Step::Property(PropertyPath::parse("price").unwrap()),
            Step::Literal(Value::Int(10)),
            Step::Compare(CompareOp::Gt),
            Step::ToBool,
        ]
    );
}

#[test]
fn or_jumps_on_true() {
    let plan = compile_expr(
        Expr::or([
            ft_match("titleIdx", "a"),
            ft_match("bodyIdx", "b"),
            ft_match("titleIdx", "c"),
        ])
        .unwrap(),
    );

    let jumps: Vec<_> = plan
        .steps()
        .iter()
        .filter_map(|step| match step {
            Step::JumpIfTrue { target } => Some(*target),
            _ => None,
        })
        .collect();

    assert_eq!(jumps, vec![plan.len(), plan.len()]);
    assert_eq!(plan.probe_count(), 3);
    assert_eq!(plan.full_text_indexes(), &["titleIdx", "bodyIdx"]);
}

#[test]
fn probes_keep_source_order() {
    let plan = compile_expr(
        Expr::and([
            ft_match("bodyIdx", "first"),
            Expr::not(ft_match("titleIdx", "second")),
        ])
        .unwrap(),
    );

    let texts: Vec<_> = plan
        .steps()
        .iter()
        .filter_map(|step| match step {
            Step::Probe { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();

    assert_eq!(texts, vec!["first", "second"]);
}

#[test]
fn rank_lowers_to_a_rank_step() {
    let rank = FullTextExpression::index("bodyIdx").unwrap().rank();
    let plan = compile_expr(rank.greater_than(Expr::literal(0.5)));

    assert_eq!(
        plan.steps()[0],
        Step::Rank {
            index: "bodyIdx".to_string(),
        }
    );
    assert_eq!(plan.probe_count(), 0);
    assert_eq!(plan.full_text_indexes(), &["bodyIdx"]);
}

#[test]
fn functions_lower_arguments_then_call() {
    let lower = Expr::function("LOWER", vec![Expr::property("title").unwrap()]).unwrap();
    let plan = compile_expr(lower.equal_to(Expr::literal("cat")));

    assert_eq!(
        plan.steps()[..2],
        [
            Step::Property(PropertyPath::parse("title").unwrap()),
            Step::Call {
                function: Function::Lower,
                argc: 1,
            },
        ]
    );
}

#[test]
fn normalization_removes_double_negation_and_nesting() {
    let expr = Expr::and([
        Expr::not(Expr::not(ft_match("titleIdx", "cat"))),
        Expr::and([price_over(1), price_over(2)]).unwrap(),
    ])
    .unwrap();

    let normalized = compile_expr(expr.clone());
    let raw = compile_raw(expr);

    assert!(!normalized.steps().contains(&Step::Not));
    assert_eq!(raw.steps().iter().filter(|s| **s == Step::Not).count(), 2);
    assert!(normalized.len() < raw.len());
    assert_ne!(normalized.fingerprint(), raw.fingerprint());
}

#[test]
fn double_negation_of_a_raw_value_is_kept() {
    let expr = Expr::not(Expr::not(Expr::property("flag").unwrap()));
    let plan = compile_expr(expr);

    assert_eq!(plan.steps().iter().filter(|s| **s == Step::Not).count(), 2);
}

#[test]
fn fingerprint_is_deterministic() {
    let build = || Expr::and([ft_match("titleIdx", "cat"), price_over(10)]).unwrap();

    assert_eq!(
        compile_expr(build()).fingerprint(),
        compile_expr(build()).fingerprint()
    );
    assert_ne!(
        compile_expr(build()).fingerprint(),
        compile_expr(Expr::and([ft_match("titleIdx", "dog"), price_over(10)]).unwrap())
            .fingerprint()
    );
    assert_eq!(compile_expr(build()).fingerprint().to_string().len(), 64);
}

#[test]
fn explain_lists_numbered_steps() {
    let plan = compile_expr(Expr::and([ft_match("titleIdx", "cat"), price_over(10)]).unwrap());

    let expected = "\
0000 PROBE titleIdx \"cat\"
0001 TO_BOOL
0002 JUMP_IF_FALSE 0007
0003 PROPERTY price
0004 LITERAL 10
0005 COMPARE >
0006 TO_BOOL
";
    assert_eq!(plan.explain(), expected);
}

#[test]
fn plan_outlives_its_source_tree() {
    let plan = {
        let tree = ExprTree::new(ft_match("titleIdx", "cat"));
        let validated = validate(&tree, &catalog()).unwrap();
        drop(tree);
        compile(validated)
    };

    assert_eq!(plan.len(), 1);
    assert!(!plan.is_empty());
}
