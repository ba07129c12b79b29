use super::*;
use crate::{
    catalog::{IndexDescriptor, MemoryCatalog},
    compile::{CompiledPlan, compile},
    expr::{Expr, ExprTree, FullTextExpression},
    validate::validate,
};
use std::cell::Cell;

///
/// TitleProbe
///
/// Case-insensitive substring probe over the `title` property that counts
/// how often the plan consults it.
///

#[derive(Default)]
struct TitleProbe {
    calls: Cell<usize>,
}

impl FullTextProbe for TitleProbe {
    fn probe(&self, _index: &str, text: &str, document: &dyn Document) -> bool {
        self.calls.set(self.calls.get() + 1);
        let title = PropertyPath::parse("title").unwrap();

        document
            .property(&title)
            .and_then(|value| value.as_text().map(str::to_lowercase))
            .is_some_and(|title| title.contains(&text.to_lowercase()))
    }

    fn rank(&self, index: &str, _document: &dyn Document) -> f64 {
        if index == "titleIdx" {
            2.5
        } else {
            0.0
        }
    }
}

fn plan(expr: Expr) -> CompiledPlan {
    let catalog = MemoryCatalog::from_descriptors([
        IndexDescriptor::full_text("titleIdx", ["title"]),
        IndexDescriptor::full_text("bodyIdx", ["body"]),
    ])
    .unwrap();

    compile(validate(&ExprTree::new(expr), &catalog).unwrap())
}

fn ft_match(text: &str) -> Expr {
    FullTextExpression::index("titleIdx")
        .unwrap()
        .match_text(text)
        .unwrap()
}

fn prop(path: &str) -> Expr {
    Expr::property(path).unwrap()
}

fn doc(title: &str, price: i64) -> Value {
    let mut entries = BTreeMap::new();
    entries.insert("title".to_string(), Value::text(title));
    entries.insert("price".to_string(), Value::Int(price));

    Value::Map(entries)
}

fn run(plan: &CompiledPlan, document: &Value) -> bool {
    plan.evaluate(document, &TitleProbe::default(), &Parameters::new())
}

#[test]
fn match_and_comparison_evaluate_together() {
    let plan = plan(
        Expr::and([ft_match("cat"), prop("price").greater_than(Expr::literal(10))]).unwrap(),
    );

    assert!(run(&plan, &doc("The Cat Sat", 12)));
    assert!(!run(&plan, &doc("The Cat Sat", 9)));
    assert!(!run(&plan, &doc("A dog", 12)));
}

#[test]
fn and_skips_probe_after_false_operand() {
    let plan = plan(
        Expr::and([prop("price").greater_than(Expr::literal(10)), ft_match("cat")]).unwrap(),
    );
    let probe = TitleProbe::default();

    assert!(!plan.evaluate(&doc("cat", 5), &probe, &Parameters::new()));
    assert_eq!(probe.calls.get(), 0);

    assert!(plan.evaluate(&doc("cat", 50), &probe, &Parameters::new()));
    assert_eq!(probe.calls.get(), 1);
}

#[test]
fn or_skips_probe_after_true_operand() {
    let plan = plan(Expr::or([ft_match("cat"), ft_match("dog")]).unwrap());
    let probe = TitleProbe::default();

    assert!(plan.evaluate(&doc("cat", 0), &probe, &Parameters::new()));
    assert_eq!(probe.calls.get(), 1);

    assert!(!plan.evaluate(&doc("bird", 0), &probe, &Parameters::new()));
    assert_eq!(probe.calls.get(), 3);
}

#[test]
fn not_inverts_the_probe() {
    let plan = plan(Expr::not(ft_match("cat")));

    assert!(!run(&plan, &doc("cat", 0)));
    assert!(run(&plan, &doc("dog", 0)));
}

#[test]
fn missing_property_is_null() {
    let is_null = plan(prop("missing").is(Expr::literal(Value::Null)));
    let equals_null = plan(prop("missing").equal_to(Expr::literal(Value::Null)));
    let is_not_null = plan(prop("price").is_not(Expr::literal(Value::Null)));

    assert!(run(&is_null, &doc("x", 1)));
    assert!(!run(&equals_null, &doc("x", 1)));
    assert!(run(&is_not_null, &doc("x", 1)));
}

#[test]
fn nested_paths_resolve_through_maps() {
    let mut address = BTreeMap::new();
    address.insert("city".to_string(), Value::text("Oslo"));
    let mut root = BTreeMap::new();
    root.insert("address".to_string(), Value::Map(address));

    let plan = plan(prop("address.city").equal_to(Expr::literal("Oslo")));

    assert!(plan.evaluate(&root, &TitleProbe::default(), &Parameters::new()));
    assert!(plan.evaluate(&Value::Map(root), &TitleProbe::default(), &Parameters::new()));
}

#[test]
fn parameters_bind_at_execution() {
    let plan = plan(prop("price").greater_than_or_equal_to(Expr::parameter("$min").unwrap()));
    let mut params = Parameters::new();
    params.insert("min".to_string(), Value::Uint(10));

    assert!(plan.evaluate(&doc("x", 10), &TitleProbe::default(), &params));
    assert!(!plan.evaluate(&doc("x", 9), &TitleProbe::default(), &params));

    // Unbound parameters are null and never order.
    assert!(!run(&plan, &doc("x", 10)));
}

#[test]
fn scalar_functions_feed_comparisons() {
    let lowered = Expr::function("lower", vec![prop("title")]).unwrap();
    let like = plan(lowered.like(Expr::literal("%cat%")));

    assert!(run(&like, &doc("Big CAT", 0)));
    assert!(!run(&like, &doc("Big dog", 0)));

    let length = Expr::function("length", vec![prop("title")]).unwrap();
    let short = plan(length.less_than(Expr::literal(4)));

    assert!(run(&short, &doc("cat", 0)));
    assert!(!run(&short, &doc("cats", 0)));
}

#[test]
fn in_list_matches_any_element() {
    let list = Expr::literal(Value::list([1_i64, 12, 40]));
    let plan = plan(prop("price").in_list(list));

    assert!(run(&plan, &doc("x", 12)));
    assert!(!run(&plan, &doc("x", 13)));
}

#[test]
fn in_requires_a_list_operand() {
    let plan = plan(prop("price").in_list(Expr::literal(12)));

    assert!(!run(&plan, &doc("x", 12)));
}

#[test]
fn rank_scores_come_from_the_probe() {
    let rank = FullTextExpression::index("titleIdx").unwrap().rank();
    let plan = plan(rank.greater_than(Expr::literal(2.0)));

    assert!(run(&plan, &doc("anything", 0)));
}

#[test]
fn closures_act_as_probes() {
    let plan = plan(ft_match("cat"));
    let probe =
        |index: &str, text: &str, _: &dyn Document| index == "titleIdx" && text == "cat";

    assert!(plan.evaluate(&doc("", 0), &probe, &Parameters::new()));
}
