//! Practice session tests
//!
//! Full exercises are worked through `Tutor::start` and `Tutor::submit`,
//! including wrong answers, help requests and configuration loaded from an
//! `abacus.json` file.

#![allow(clippy::unwrap_used)]

use abacus_core::{
    Config, HintChain, HintRequest, HintStrategy, HintTier, SessionStatus, StepStatus, Topic,
    TutorError, Tutor, Verdict,
};
use futures::future::{BoxFuture, FutureExt};

/// Answers every step of a fresh session correctly and returns the final answer.
async fn solve(tutor: &Tutor, text: &str) -> String {
    let mut session = tutor.start(text).await.unwrap();
    while !session.is_finished() {
        let expected = session.current().expected_answer.clone().unwrap();
        let outcome = tutor.submit(&mut session, &expected).await;
        assert_eq!(outcome.verdict, Verdict::Correct, "{text}: {expected}");
    }
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.mistake_count(), 0);
    session.current().expected_answer.clone().unwrap()
}

#[tokio::test]
async fn test_every_topic_can_be_completed() {
    let tutor = Tutor::new(Config::default());
    let cases = [
        ("47 + 28", "75"),
        ("52 - 38", "14"),
        ("56 x 23", "1288"),
        ("3/4 + 1/2", "5/4"),
        ("5/6 - 1/3", "1/2"),
        ("156 ÷ 12", "13"),
        ("2.5 * 3", "7.5"),
        ("1.5 + 2.25", "3.75"),
        ("25% of 75", "18.75"),
    ];
    for (text, answer) in cases {
        assert_eq!(solve(&tutor, text).await, answer, "{text}");
    }
}

#[tokio::test]
async fn test_hints_escalate_with_mistakes() {
    let tutor = Tutor::new(Config::default());
    let mut session = tutor.start("47 + 28").await.unwrap();

    let mut hints = Vec::new();
    for _ in 0..4 {
        let outcome = tutor.submit(&mut session, "3").await;
        assert_eq!(outcome.verdict, Verdict::Incorrect);
        assert_eq!(outcome.result.status, StepStatus::Ask);
        hints.push(outcome.result.hint.unwrap());
    }
    assert_eq!(session.error_count, 4);
    assert_eq!(session.step_index, 0);

    for pair in hints.windows(2) {
        assert!(pair[1].starts_with(&pair[0]), "{:?} then {:?}", pair[0], pair[1]);
    }
    assert!(!hints[0].contains("The answer is"));
    assert!(hints[3].ends_with("The answer is 5."));

    let outcome = tutor.submit(&mut session, " 5 ").await;
    assert_eq!(outcome.verdict, Verdict::Correct);
    assert_eq!(session.error_count, 0);
    assert!(outcome.result.hint.is_none());
}

#[tokio::test]
async fn test_help_request_keeps_error_count() {
    let tutor = Tutor::new(Config::default());
    let mut session = tutor.start("52 - 38").await.unwrap();

    for answer in ["help", "?", "idk", ""] {
        let outcome = tutor.submit(&mut session, answer).await;
        assert_eq!(outcome.verdict, Verdict::HelpShown, "{answer:?}");
        assert!(outcome.result.hint.is_some());
    }
    assert_eq!(session.error_count, 0);
    assert_eq!(session.mistake_count(), 0);
    assert_eq!(session.attempts.len(), 4);
}

#[tokio::test]
async fn test_fraction_answers_by_value() {
    let tutor = Tutor::new(Config::default());
    let mut session = tutor.start("3/4 + 1/2").await.unwrap();

    tutor.submit(&mut session, "no").await;
    tutor.submit(&mut session, "4").await;
    tutor.submit(&mut session, "3 and 2").await;
    let combine = tutor.submit(&mut session, "10/8").await;
    assert_eq!(combine.verdict, Verdict::Correct);

    let unreduced = tutor.submit(&mut session, "10/8").await;
    assert_eq!(unreduced.verdict, Verdict::Incorrect);
    let reduced = tutor.submit(&mut session, "5/4").await;
    assert_eq!(reduced.verdict, Verdict::Correct);
    assert!(session.is_finished());
}

#[tokio::test]
async fn test_decimal_answers_within_tolerance() {
    let tutor = Tutor::new(Config::default());
    let mut session = tutor.start("1 : 3.0").await.unwrap();
    assert_eq!(session.topic, Topic::Decimals);
    while !session.is_finished() {
        let expected = session.current().expected_answer.clone().unwrap();
        let answer = if expected == "0.333" { "0.33".to_string() } else { expected };
        let outcome = tutor.submit(&mut session, &answer).await;
        assert_eq!(outcome.verdict, Verdict::Correct, "{answer}");
    }
}

#[tokio::test]
async fn test_swapped_subtraction_session() {
    let tutor = Tutor::new(Config::default());
    let session = tutor.start("38 - 52").await.unwrap();
    assert!(session.current().operands_swapped);
    assert_eq!(solve(&tutor, "38 - 52").await, "14");
}

#[tokio::test]
async fn test_unsolvable_exercises_do_not_start() {
    let tutor = Tutor::new(Config::default());
    assert!(matches!(
        tutor.start("tell me a story").await.unwrap_err(),
        TutorError::NotRecognized { .. }
    ));
    assert!(matches!(
        tutor.start("3/0 + 1/2").await.unwrap_err(),
        TutorError::DegenerateInput { .. }
    ));
}

struct Silent;

impl HintStrategy for Silent {
    fn name(&self) -> &'static str {
        "silent"
    }

    fn hint<'a>(&'a self, _request: &'a HintRequest) -> BoxFuture<'a, Option<String>> {
        async { None }.boxed()
    }
}

#[tokio::test]
async fn test_fallback_message_when_no_strategy_answers() {
    let tutor = Tutor::new(Config::default())
        .with_hints(HintChain::new("Sorry, no hint today.").with_strategy(Silent));
    let mut session = tutor.start("47 + 28").await.unwrap();
    let outcome = tutor.submit(&mut session, "9").await;
    assert_eq!(outcome.result.hint.as_deref(), Some("Sorry, no hint today."));
}

#[tokio::test]
async fn test_config_file_drives_tutor() {
    let dir = std::env::temp_dir().join(format!(
        "abacus_integration_config_{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("abacus.json"),
        r#"{
            "cycle": "c3",
            "subtraction": { "swapWhenNegative": false },
            "hints": { "enabled": false }
        }"#,
    )
    .unwrap();

    let config = Config::load_from_dir(&dir).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    let tutor = Tutor::new(config);
    assert!(matches!(
        tutor.start("38 - 52").await.unwrap_err(),
        TutorError::DegenerateInput { .. }
    ));

    let mut session = tutor.start("47 + 28").await.unwrap();
    assert_eq!(session.current().cycle.as_str(), "c3");
    let outcome = tutor.submit(&mut session, "4").await;
    assert_eq!(outcome.verdict, Verdict::Incorrect);
    assert!(outcome.result.hint.is_none());
}

#[test]
fn test_hint_tier_ceiling_per_topic() {
    assert_eq!(HintTier::for_errors(Topic::Addition, 3), HintTier::Worked);
    assert_eq!(HintTier::for_errors(Topic::Addition, 25), HintTier::Answer);
    assert_eq!(HintTier::clamp_errors(Topic::Addition, 25), 9);
    assert_eq!(HintTier::clamp_errors(Topic::Fractions, 25), 4);
    assert!(HintTier::for_errors(Topic::Fractions, 2) < HintTier::Worked);
}
