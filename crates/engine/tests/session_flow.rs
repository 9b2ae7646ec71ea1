use engine::{Feedback, Phase, RecallPhase, SessionEngine};
use quiz_core::SequenceGenerator;
use quiz_core::bank::ChallengeBank;
use quiz_core::model::{
    ChallengeKind, ChallengeSet, ExpectedAnswer, ItemDraft, RankBand, RankingDraft, RankingScheme,
    SetDraft, SetId, SetSettings, SubmittedAnswer,
};

const FEEDBACK_MS: u64 = 1_500;

fn quiz_bands() -> Vec<RankBand> {
    vec![
        RankBand::new(80, "Expert", "🏆"),
        RankBand::new(60, "Intermediate", "🎯"),
        RankBand::new(0, "Beginner", "🌱"),
    ]
}

/// A ten-statement quiz where the correct answer is always `true`.
fn ten_item_quiz() -> ChallengeSet {
    SetDraft {
        id: 1,
        title: "Marketing Basics".to_string(),
        time_budget_secs: Some(300),
        feedback_delay_ms: Some(FEEDBACK_MS as u32),
        show_secs: None,
        memorize_secs: None,
        ranking: RankingDraft::Percentage(quiz_bands()),
        items: (0..10)
            .map(|index| ItemDraft {
                prompt: format!("Statement {index} holds"),
                kind: ChallengeKind::BooleanChoice,
                options: Vec::new(),
                expected: ExpectedAnswer::Truth(true),
                explanation: format!("Statement {index} is true."),
            })
            .collect(),
    }
    .validate()
    .unwrap()
}

fn memory_game(seed: u64) -> ChallengeSet {
    let bands = vec![
        RankBand::new(8, "Mental Math Master", "🧠"),
        RankBand::new(4, "Quick Thinker", "⚡"),
        RankBand::new(0, "Warm-Up", "🌱"),
    ];
    ChallengeSet::new(
        SetId::new(2),
        "Operation Recall",
        SetSettings::memory_defaults(),
        RankingScheme::absolute(bands).unwrap(),
        ChallengeBank::generated(SequenceGenerator::seeded(seed)),
    )
    .unwrap()
}

/// Walk a started memory game to the `Recalling` phase, returning the
/// canonical order captured while the sequence was shown.
fn reach_recalling(engine: &mut SessionEngine) -> Vec<String> {
    let view = engine.view();
    assert_eq!(view.recall_phase, Some(RecallPhase::Showing));
    let canonical = view.item.unwrap().options;

    engine.advance(3_000);
    let view = engine.view();
    assert_eq!(view.recall_phase, Some(RecallPhase::Memorizing));
    assert!(view.item.unwrap().options.is_empty());

    engine.advance(2_000);
    assert_eq!(engine.view().recall_phase, Some(RecallPhase::Recalling));
    canonical
}

/// Some permutation of `canonical` that differs from it.
fn scrambled(canonical: &[String]) -> Vec<String> {
    let mut out = canonical.to_vec();
    for i in 0..out.len() {
        for j in (i + 1)..out.len() {
            if out[i] != out[j] {
                out.swap(i, j);
                return out;
            }
        }
    }
    panic!("sequence holds a single repeated entry; cannot scramble");
}

#[test]
fn full_quiz_all_correct_reaches_the_top_tier() {
    let mut engine = SessionEngine::new(ten_item_quiz());
    engine.start();

    for index in 0..10 {
        let view = engine.view();
        assert_eq!(view.phase, Phase::Active);
        assert_eq!(view.current_index, index);

        engine.submit_answer(SubmittedAnswer::from(true));
        let view = engine.view();
        assert_eq!(view.feedback, Feedback::Correct);
        assert_eq!(view.score, index as u32 + 1);

        engine.advance(FEEDBACK_MS);
    }

    let view = engine.view();
    assert_eq!(view.phase, Phase::Finished);
    assert_eq!(view.score, 10);
    let result = view.result.unwrap();
    assert_eq!(result.points, 10);
    assert_eq!(result.rank, "Expert");
    assert_eq!(result.badge, "🏆");
}

#[test]
fn score_is_monotonic_and_bounded_by_total() {
    let mut engine = SessionEngine::new(ten_item_quiz());
    engine.start();

    let mut last_score = 0;
    for index in 0..10 {
        // Wrong answer on every other item.
        engine.submit_answer(SubmittedAnswer::from(index % 2 == 0));
        let view = engine.view();
        assert!(view.score >= last_score);
        assert!(view.score <= 10);
        assert!(view.score <= view.current_index as u32 + 1);
        last_score = view.score;
        engine.advance(FEEDBACK_MS);
    }

    assert_eq!(engine.view().score, 5);
}

#[test]
fn countdown_expiry_freezes_the_score_mid_question() {
    let mut engine = SessionEngine::new(ten_item_quiz());
    engine.start();

    for _ in 0..3 {
        engine.submit_answer(SubmittedAnswer::from(true));
        engine.advance(FEEDBACK_MS);
    }
    assert_eq!(engine.view().score, 3);
    assert_eq!(engine.view().phase, Phase::Active);

    // Let the rest of the 300 s budget run out with a question on screen.
    engine.advance(300_000);

    let view = engine.view();
    assert_eq!(view.phase, Phase::Finished);
    assert_eq!(view.score, 3);
    assert_eq!(view.time_left_secs, 0);
    // 3 of 10 lands in the catch-all tier below 60 percent.
    assert_eq!(view.result.unwrap().rank, "Beginner");
}

#[test]
fn expiry_keeps_a_score_update_still_awaiting_its_advance() {
    let set = ten_item_quiz();
    let mut engine = SessionEngine::new(set);
    engine.start();

    // Move to one second before expiry, then answer: the feedback delay is
    // still pending when the countdown reaches zero.
    engine.advance(299_000);
    assert_eq!(engine.view().time_left_secs, 1);
    engine.submit_answer(SubmittedAnswer::from(true));
    assert_eq!(engine.view().feedback, Feedback::Correct);

    engine.advance(1_000);

    let view = engine.view();
    assert_eq!(view.phase, Phase::Finished);
    assert_eq!(view.score, 1);
    assert_eq!(view.result.unwrap().points, 1);
}

#[test]
fn resubmission_affects_the_score_only_once() {
    let mut engine = SessionEngine::new(ten_item_quiz());
    engine.start();

    engine.submit_answer(SubmittedAnswer::from(true));
    engine.submit_answer(SubmittedAnswer::from(true));
    engine.submit_answer(SubmittedAnswer::from(true));

    let view = engine.view();
    assert_eq!(view.score, 1);
    assert_eq!(view.current_index, 0);

    // Only one auto-advance was pending: one item later, not three.
    engine.advance(FEEDBACK_MS);
    assert_eq!(engine.view().current_index, 1);
    engine.advance(10 * FEEDBACK_MS);
    assert_eq!(engine.view().current_index, 1);
}

#[test]
fn reset_is_idempotent_from_any_state() {
    let mut engine = SessionEngine::new(ten_item_quiz());
    engine.start();
    engine.submit_answer(SubmittedAnswer::from(true));
    engine.advance(10_000);

    engine.reset();
    engine.reset();

    let view = engine.view();
    assert_eq!(view.phase, Phase::Idle);
    assert_eq!(view.score, 0);
    assert_eq!(view.time_left_secs, 300);
    assert_eq!(view.feedback, Feedback::None);
    assert!(view.item.is_none());
    assert!(view.result.is_none());

    // Timers from the abandoned run must not leak into the next one.
    engine.advance(60_000);
    assert_eq!(engine.view().time_left_secs, 300);
    engine.start();
    assert_eq!(engine.view().phase, Phase::Active);
    assert_eq!(engine.view().time_left_secs, 300);
}

#[test]
fn memory_game_level_zero_cycle_scores_and_grows() {
    let mut engine = SessionEngine::new(memory_game(42));
    engine.start();

    let view = engine.view();
    assert_eq!(view.total_items, None);
    assert_eq!(view.time_left_secs, 50);

    let canonical = reach_recalling(&mut engine);
    assert_eq!(canonical.len(), 3);

    // Entries cannot be confirmed before the sequence is fully rebuilt.
    engine.confirm_recall();
    assert_eq!(engine.view().feedback, Feedback::None);

    for entry in &canonical {
        engine.push_recall(entry);
    }
    assert_eq!(engine.view().partial_recall, canonical);
    engine.confirm_recall();

    let view = engine.view();
    assert_eq!(view.feedback, Feedback::Correct);
    assert_eq!(view.score, 1);

    // The next round is one operation longer.
    engine.advance(FEEDBACK_MS);
    let view = engine.view();
    assert_eq!(view.current_index, 1);
    assert_eq!(view.recall_phase, Some(RecallPhase::Showing));
    assert_eq!(view.item.unwrap().options.len(), 4);
}

#[test]
fn scrambled_recall_of_the_right_entries_is_incorrect() {
    let mut engine = SessionEngine::new(memory_game(7));
    engine.start();

    let canonical = reach_recalling(&mut engine);
    let wrong_order = scrambled(&canonical);
    assert_ne!(wrong_order, canonical);

    engine.submit_answer(SubmittedAnswer::Sequence(wrong_order));

    let view = engine.view();
    assert_eq!(view.feedback, Feedback::Incorrect);
    assert_eq!(view.score, 0);
}

#[test]
fn recall_input_is_rejected_until_the_sequence_is_hidden() {
    let mut engine = SessionEngine::new(memory_game(13));
    engine.start();

    let view = engine.view();
    assert_eq!(view.recall_phase, Some(RecallPhase::Showing));
    let canonical = view.item.unwrap().options;

    // Submissions and picks during Showing and Memorizing are no-ops.
    engine.submit_answer(SubmittedAnswer::Sequence(canonical.clone()));
    engine.push_recall(&canonical[0]);
    assert_eq!(engine.view().feedback, Feedback::None);
    assert!(engine.view().partial_recall.is_empty());

    engine.advance(3_000);
    engine.submit_answer(SubmittedAnswer::Sequence(canonical.clone()));
    assert_eq!(engine.view().feedback, Feedback::None);

    engine.advance(2_000);
    engine.submit_answer(SubmittedAnswer::Sequence(canonical));
    assert_eq!(engine.view().feedback, Feedback::Correct);
}

#[test]
fn undo_and_availability_guard_recall_picks() {
    let mut engine = SessionEngine::new(memory_game(21));
    engine.start();
    let canonical = reach_recalling(&mut engine);

    // An entry that was never presented is refused.
    engine.push_recall("999 + 999 = 1998");
    assert!(engine.view().partial_recall.is_empty());

    engine.push_recall(&canonical[0]);
    engine.push_recall(&canonical[1]);
    engine.undo_recall();
    assert_eq!(engine.view().partial_recall, vec![canonical[0].clone()]);

    // Each presented entry can only be used as often as it appears.
    engine.push_recall(&canonical[0]);
    let presented = canonical
        .iter()
        .filter(|entry| **entry == canonical[0])
        .count();
    let picked = engine
        .view()
        .partial_recall
        .iter()
        .filter(|entry| **entry == canonical[0])
        .count();
    assert!(picked <= presented);
}

#[test]
fn memory_game_ends_only_when_the_countdown_expires() {
    let mut engine = SessionEngine::new(memory_game(5));
    engine.start();

    // Play two rounds, then idle until the 50 s budget runs out.
    for _ in 0..2 {
        let canonical = reach_recalling(&mut engine);
        for entry in &canonical {
            engine.push_recall(entry);
        }
        engine.confirm_recall();
        engine.advance(FEEDBACK_MS);
    }
    assert_eq!(engine.view().score, 2);
    assert_eq!(engine.view().phase, Phase::Active);

    engine.advance(50_000);
    let view = engine.view();
    assert_eq!(view.phase, Phase::Finished);
    assert_eq!(view.score, 2);
    assert_eq!(view.result.unwrap().rank, "Warm-Up");
}
