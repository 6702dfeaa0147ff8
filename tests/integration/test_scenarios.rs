//! End-to-end step contract tests
//!
//! These tests drive the stateless `engine::step` contract the way a calling
//! application does: they thread `step_index` through repeated calls on the
//! raw exercise text until the engine reports `done`.

#![allow(clippy::unwrap_used)]

use abacus_core::{
    classify, engine, Cycle, EngineOptions, HintKind, Operands, Operation, StepRequest,
    StepResult, StepStatus, Topic,
};
use proptest::prelude::*;

/// Walks an exercise from step 0 to its terminal result.
fn walk(text: &str) -> (Vec<StepResult>, StepResult) {
    let options = EngineOptions::default();
    let mut asks = Vec::new();
    let mut index = 0;
    loop {
        let result = engine::step(text, &StepRequest::at(index), options, Cycle::C2);
        if result.status.is_terminal() {
            return (asks, result);
        }
        index = result.next_step;
        asks.push(result);
    }
}

fn expected(asks: &[StepResult]) -> Vec<String> {
    asks.iter()
        .map(|r| r.expected_answer.clone().unwrap_or_default())
        .collect()
}

#[test]
fn test_addition_with_carry() {
    let (asks, done) = walk("47 + 28");
    assert_eq!(expected(&asks), vec!["5", "7"]);
    assert!(asks.iter().all(|r| r.hint_kind == HintKind::AddColumn));
    assert_eq!(done.status, StepStatus::Done);
    assert_eq!(done.expected_answer.as_deref(), Some("75"));
    assert_eq!(done.hint_kind, HintKind::AddResult);
}

#[test]
fn test_subtraction_with_borrow() {
    let (asks, done) = walk("52 - 38");
    assert_eq!(expected(&asks), vec!["4", "1"]);
    assert_eq!(asks[0].hint_kind, HintKind::SubBorrow);
    assert_eq!(asks[1].hint_kind, HintKind::SubColumn);
    assert_eq!(done.expected_answer.as_deref(), Some("14"));
}

#[test]
fn test_multiplication_single_digit_multiplier() {
    let (asks, done) = walk("12 * 3");
    assert_eq!(expected(&asks), vec!["6", "3"]);
    assert!(asks.iter().all(|r| r.hint_kind == HintKind::MulPartial));
    assert_eq!(done.expected_answer.as_deref(), Some("36"));
    assert_eq!(done.hint_kind, HintKind::MulResult);
}

#[test]
fn test_fraction_pipeline() {
    let (asks, done) = walk("3/4 + 1/2");
    assert_eq!(expected(&asks), vec!["no", "4", "3 and 2", "5/4", "5/4"]);
    assert_eq!(
        asks.iter().map(|r| r.hint_kind).collect::<Vec<_>>(),
        vec![
            HintKind::FracSameDenominator,
            HintKind::FracLcm,
            HintKind::FracEquivalent,
            HintKind::FracCombine,
            HintKind::FracSimplify,
        ]
    );
    assert_eq!(done.status, StepStatus::Done);
    assert_eq!(done.expected_answer.as_deref(), Some("5/4"));
}

#[test]
fn test_decimal_times_integer_is_decimal() {
    let exercise = classify("2.5 * 3").unwrap();
    assert_eq!(exercise.topic(), Topic::Decimals);
    assert_eq!(exercise.operation, Operation::Multiplication);
    assert!(matches!(exercise.operands, Operands::Decimals(..)));

    let (asks, done) = walk("2.5 * 3");
    assert_eq!(asks[0].topic, Some(Topic::Decimals));
    assert_eq!(done.expected_answer.as_deref(), Some("7.5"));
}

#[test]
fn test_long_division() {
    let (asks, done) = walk("156 ÷ 12");
    assert_eq!(expected(&asks), vec!["15", "1", "3", "36", "3", "0"]);
    assert_eq!(done.expected_answer.as_deref(), Some("13"));

    let (_, done) = walk("17 : 5");
    assert_eq!(done.expected_answer.as_deref(), Some("3 r 2"));
}

#[test]
fn test_sentence_and_aliases() {
    let (_, done) = walk("What is 503 − 278?");
    assert_eq!(done.expected_answer.as_deref(), Some("225"));
    let (_, done) = walk("6 · 7");
    assert_eq!(done.expected_answer.as_deref(), Some("42"));
    let (_, done) = walk("2,5 + 1,25");
    assert_eq!(done.expected_answer.as_deref(), Some("3.75"));
}

#[test]
fn test_percentage_of_amount() {
    let exercise = classify("20% de 50").unwrap();
    assert_eq!(exercise.operation, Operation::Percentage);
    assert_eq!(exercise.topic(), Topic::Percentages);

    let (asks, done) = walk("20% de 50");
    assert_eq!(expected(&asks), vec!["20/100", "1000", "10"]);
    assert_eq!(
        asks.iter().map(|r| r.hint_kind).collect::<Vec<_>>(),
        vec![HintKind::PercFraction, HintKind::PercMultiply, HintKind::PercDivide]
    );
    assert_eq!(done.hint_kind, HintKind::PercResult);
    assert_eq!(done.expected_answer.as_deref(), Some("10"));
}

#[test]
fn test_partial_expressions_are_errors() {
    for text in ["3/4 × 1/2", "1/2 + 3", "-3 + 5", "12 + 3 + 4"] {
        let result = engine::step(text, &StepRequest::at(0), EngineOptions::default(), Cycle::C2);
        assert_eq!(result.status, StepStatus::Error, "{text}");
        assert_eq!(result.hint_kind, HintKind::Unrecognized, "{text}");
        assert_eq!(result.expected_answer, None);
    }
}

#[test]
fn test_swapped_subtraction_is_reported() {
    let (asks, done) = walk("38 - 52");
    assert!(asks[0].operands_swapped);
    assert!(asks[0].message.contains("larger number on top"));
    assert_eq!(done.expected_answer.as_deref(), Some("14"));

    let strict = EngineOptions {
        swap_when_negative: false,
    };
    let result = engine::step("38 - 52", &StepRequest::at(0), strict, Cycle::C2);
    assert_eq!(result.status, StepStatus::Error);
    assert_eq!(result.expected_answer, None);
}

#[test]
fn test_error_results_keep_step_pointer() {
    for text in ["", "hello", "1/0 + 1/2", "5 / 0", "99999999999999999999 + 1"] {
        let result = engine::step(text, &StepRequest::at(3), EngineOptions::default(), Cycle::C1);
        assert_eq!(result.status, StepStatus::Error, "{text:?}");
        assert_eq!(result.expected_answer, None);
        assert_eq!(result.next_step, 3);
        assert_eq!(result.cycle, Cycle::C1);
    }
}

#[test]
fn test_step_result_json_snapshot() {
    let result = engine::step("47 + 28", &StepRequest::at(1), EngineOptions::default(), Cycle::C2);
    insta::assert_json_snapshot!(result, {
        ".message" => "[message]",
    }, @r###"
    {
      "status": "ask",
      "expected_answer": "7",
      "next_step": 2,
      "step_index": 1,
      "step_count": 2,
      "hint_kind": "add_column",
      "answer_kind": "integer",
      "topic": "addition",
      "message": "[message]",
      "focus": {
        "kind": "column",
        "place_index": 1,
        "digit_a": 4,
        "digit_b": 2,
        "carry_in": 1,
        "result_digit": 7,
        "carry_out": 0,
        "place_name": "tens"
      },
      "cycle": "c2"
    }
    "###);
}

proptest! {
    #[test]
    fn prop_addition_step_count(a in 10u64..1_000_000_000, b in 0u64..1_000_000_000) {
        let (asks, done) = walk(&format!("{a} + {b}"));
        let columns = a.max(b).to_string().len();
        let total = a + b;
        let carry = usize::from(total.to_string().len() > columns);
        prop_assert_eq!(asks.len(), columns + carry);
        prop_assert_eq!(done.expected_answer, Some(total.to_string()));
    }

    #[test]
    fn prop_decimals_never_use_integer_engines(
        whole in 0u64..1000,
        fraction in 1u64..1000,
        other in 1u64..1000,
        placement in 0usize..3,
        op in prop::sample::select(vec!['+', '-', '*', ':']),
    ) {
        let decimal = format!("{whole}.{fraction}");
        let text = match placement {
            0 => format!("{decimal} {op} {other}"),
            1 => format!("{other} {op} {decimal}"),
            _ => format!("{decimal} {op} {decimal}"),
        };
        let exercise = classify(&text).unwrap();
        prop_assert_eq!(exercise.topic(), Topic::Decimals);
        prop_assert!(exercise.rule.starts_with("decimal"));
    }
}
