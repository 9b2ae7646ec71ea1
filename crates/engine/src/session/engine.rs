use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};

use quiz_core::bank::ChallengeBank;
use quiz_core::evaluate;
use quiz_core::model::{
    ChallengeItem, ChallengeKind, ChallengeSet, ExpectedAnswer, ItemId, RankResult, RankingScheme,
    SetId, SetSettings, SubmittedAnswer,
};
use quiz_core::time::Clock;

use crate::countdown::{Countdown, CountdownSignal};
use crate::scheduler::{CancelToken, Scheduler, TimerEvent};

use super::state::{Feedback, Phase, RecallPhase};
use super::view::{ItemView, SessionView};

/// Outer countdown granularity.
const TICK_MS: u64 = 1_000;

//
// ─── SESSION ENGINE ────────────────────────────────────────────────────────────
//

/// The state machine behind one timed challenge session.
///
/// One engine instance owns one [`ChallengeSet`] and steps through it on
/// virtual time: the owner feeds elapsed milliseconds through
/// [`SessionEngine::advance`], and every timer-driven transition (countdown
/// ticks, the post-feedback auto-advance, the show/memorize recall cycle)
/// happens inside that call. User intents are plain method calls.
///
/// All intents are guarded: a call arriving in the wrong state is a silent
/// no-op, never a fault. Configuration mistakes are caught earlier, when the
/// set is assembled.
pub struct SessionEngine {
    set_id: SetId,
    title: String,
    settings: SetSettings,
    ranking: RankingScheme,
    bank: ChallengeBank,
    clock: Clock,

    scheduler: Scheduler,
    countdown: Countdown,

    phase: Phase,
    recall_phase: Option<RecallPhase>,
    current_index: usize,
    level: u32,
    current_item: Option<ChallengeItem>,
    score: u32,
    answered: HashSet<ItemId>,
    feedback: Feedback,
    partial_recall: Vec<String>,

    tick_timer: Option<CancelToken>,
    advance_timer: Option<CancelToken>,
    recall_timer: Option<CancelToken>,

    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    result: Option<RankResult>,
}

impl SessionEngine {
    /// Create an idle engine for the given set.
    #[must_use]
    pub fn new(set: ChallengeSet) -> Self {
        let (set_id, title, settings, ranking, bank) = set.into_parts();
        let countdown = Countdown::new(settings.time_budget_secs());

        Self {
            set_id,
            title,
            settings,
            ranking,
            bank,
            clock: Clock::system(),
            scheduler: Scheduler::new(),
            countdown,
            phase: Phase::Idle,
            recall_phase: None,
            current_index: 0,
            level: 0,
            current_item: None,
            score: 0,
            answered: HashSet::new(),
            feedback: Feedback::None,
            partial_recall: Vec::new(),
            tick_timer: None,
            advance_timer: None,
            recall_timer: None,
            started_at: None,
            finished_at: None,
            result: None,
        }
    }

    /// Replace the wall clock used for session timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn set_id(&self) -> SetId {
        self.set_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    // ─── Intents ──────────────────────────────────────────────────────────

    /// Begin the session. Only effective from `Idle`.
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        // The introduction is purely presentational; pass straight through.
        self.phase = Phase::Introduction;
        self.begin_active();
    }

    /// Judge an answer for the current item.
    ///
    /// Ignored unless the session is active, no feedback is pending, the
    /// current item has not been answered yet, and (for sequence items) the
    /// recall cycle has reached `Recalling`.
    pub fn submit_answer(&mut self, answer: SubmittedAnswer) {
        if self.phase != Phase::Active || self.feedback != Feedback::None {
            return;
        }
        let Some(item) = &self.current_item else {
            return;
        };
        if self.answered.contains(&item.id()) {
            return;
        }
        if item.kind() == ChallengeKind::OrderedSequence
            && self.recall_phase != Some(RecallPhase::Recalling)
        {
            return;
        }

        let verdict = evaluate(item, &answer);
        self.answered.insert(item.id());
        self.feedback = if verdict.is_correct() {
            self.score += 1;
            Feedback::Correct
        } else {
            Feedback::Incorrect
        };

        self.cancel_recall_timer();
        // Feedback was `None` on entry, so no advance can already be pending.
        debug_assert!(self.advance_timer.is_none());
        self.advance_timer = Some(self.scheduler.schedule(
            u64::from(self.settings.feedback_delay_ms()),
            TimerEvent::AdvanceDue,
        ));
    }

    /// Append an entry to the sequence being rebuilt.
    ///
    /// Ignored outside `Recalling`, for entries not (or no longer) available
    /// among the presented options, and once the rebuilt answer is full.
    pub fn push_recall(&mut self, entry: &str) {
        if !self.recall_input_open() {
            return;
        }
        let Some(item) = &self.current_item else {
            return;
        };
        let Some(len) = item.sequence_len() else {
            return;
        };
        if self.partial_recall.len() >= len {
            return;
        }

        let available = item
            .options()
            .iter()
            .filter(|option| option.as_str() == entry)
            .count();
        let used = self
            .partial_recall
            .iter()
            .filter(|picked| picked.as_str() == entry)
            .count();
        if used >= available {
            return;
        }

        self.partial_recall.push(entry.to_string());
    }

    /// Take back the most recent recall entry.
    pub fn undo_recall(&mut self) {
        if self.recall_input_open() {
            self.partial_recall.pop();
        }
    }

    /// Submit the rebuilt sequence. Ignored until every slot is filled.
    pub fn confirm_recall(&mut self) {
        if !self.recall_input_open() {
            return;
        }
        let Some(len) = self
            .current_item
            .as_ref()
            .and_then(ChallengeItem::sequence_len)
        else {
            return;
        };
        if self.partial_recall.len() != len {
            return;
        }

        let sequence = std::mem::take(&mut self.partial_recall);
        self.submit_answer(SubmittedAnswer::Sequence(sequence));
    }

    /// Return to `Idle` from any state, cancelling every timer.
    ///
    /// Idempotent: resetting twice leaves the same idle session with a zero
    /// score and the countdown back at the full budget.
    pub fn reset(&mut self) {
        self.cancel_all_timers();
        self.countdown = Countdown::new(self.settings.time_budget_secs());
        self.phase = Phase::Idle;
        self.recall_phase = None;
        self.current_index = 0;
        self.level = 0;
        self.current_item = None;
        self.score = 0;
        self.answered.clear();
        self.feedback = Feedback::None;
        self.partial_recall.clear();
        self.started_at = None;
        self.finished_at = None;
        self.result = None;
    }

    // ─── Time ─────────────────────────────────────────────────────────────

    /// Move virtual time forward, firing every timer that comes due.
    ///
    /// Timers fire in deadline order; a timer scheduled while another fires
    /// keeps the chain chronological, so a large delta behaves exactly like
    /// many small ones.
    pub fn advance(&mut self, delta_ms: u64) {
        let target = self.scheduler.now_ms().saturating_add(delta_ms);
        while let Some(event) = self.scheduler.pop_due(target) {
            self.apply_timer(event);
        }
        self.scheduler.advance_to(target);
    }

    fn apply_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Tick => {
                self.tick_timer = None;
                if self.phase != Phase::Active {
                    return;
                }
                match self.countdown.tick() {
                    Some(CountdownSignal::Expired) => self.finish(),
                    Some(CountdownSignal::Ticked(_)) => {
                        self.tick_timer = Some(self.scheduler.schedule(TICK_MS, TimerEvent::Tick));
                    }
                    None => {}
                }
            }
            TimerEvent::AdvanceDue => {
                self.advance_timer = None;
                if self.phase != Phase::Active {
                    return;
                }
                self.advance_item();
            }
            TimerEvent::RecallDue => {
                self.recall_timer = None;
                if self.phase != Phase::Active {
                    return;
                }
                match self.recall_phase {
                    Some(RecallPhase::Showing) => {
                        self.recall_phase = Some(RecallPhase::Memorizing);
                        if let Some(timing) = self.settings.recall() {
                            self.recall_timer = Some(self.scheduler.schedule(
                                u64::from(timing.memorize_secs()) * 1_000,
                                TimerEvent::RecallDue,
                            ));
                        }
                    }
                    Some(RecallPhase::Memorizing) => {
                        self.recall_phase = Some(RecallPhase::Recalling);
                    }
                    _ => {}
                }
            }
        }
    }

    // ─── Transitions ──────────────────────────────────────────────────────

    fn begin_active(&mut self) {
        self.phase = Phase::Active;
        self.started_at = Some(self.clock.now());
        self.score = 0;
        self.current_index = 0;
        self.level = 0;
        self.answered.clear();
        self.feedback = Feedback::None;
        self.result = None;
        self.finished_at = None;

        self.countdown.start(self.settings.time_budget_secs());
        self.tick_timer = Some(self.scheduler.schedule(TICK_MS, TimerEvent::Tick));
        self.load_current_item();
    }

    fn load_current_item(&mut self) {
        self.partial_recall.clear();
        self.current_item = if self.bank.is_endless() {
            self.bank.next_generated(self.level)
        } else {
            self.bank.item_at(self.current_index).cloned()
        };
        self.begin_recall_cycle();
    }

    fn begin_recall_cycle(&mut self) {
        self.cancel_recall_timer();
        self.recall_phase = None;

        let is_sequence = self
            .current_item
            .as_ref()
            .is_some_and(|item| item.kind() == ChallengeKind::OrderedSequence);
        if !is_sequence {
            return;
        }
        // Set assembly guarantees recall timing whenever sequence items exist.
        let Some(timing) = self.settings.recall() else {
            return;
        };

        self.recall_phase = Some(RecallPhase::Showing);
        self.recall_timer = Some(self.scheduler.schedule(
            u64::from(timing.show_secs()) * 1_000,
            TimerEvent::RecallDue,
        ));
    }

    fn advance_item(&mut self) {
        let at_last = self
            .bank
            .total()
            .is_some_and(|total| self.current_index + 1 >= total);
        if at_last {
            self.finish();
            return;
        }

        self.current_index += 1;
        self.level += 1;
        self.feedback = Feedback::None;
        self.load_current_item();
    }

    /// Terminal transition. A score update already applied when expiry lands
    /// stays counted; only the pending advance is abandoned.
    fn finish(&mut self) {
        self.cancel_all_timers();
        self.countdown.cancel();
        self.phase = Phase::Finished;
        self.recall_phase = None;
        self.partial_recall.clear();
        self.finished_at = Some(self.clock.now());

        let total = self.bank.total().map(|total| total as u32);
        self.result = Some(self.ranking.classify(self.score, total));
    }

    fn recall_input_open(&self) -> bool {
        self.phase == Phase::Active
            && self.feedback == Feedback::None
            && self.recall_phase == Some(RecallPhase::Recalling)
    }

    fn cancel_recall_timer(&mut self) {
        if let Some(token) = self.recall_timer.take() {
            self.scheduler.cancel(token);
        }
    }

    fn cancel_all_timers(&mut self) {
        for token in [
            self.tick_timer.take(),
            self.advance_timer.take(),
            self.recall_timer.take(),
        ]
        .into_iter()
        .flatten()
        {
            self.scheduler.cancel(token);
        }
    }

    // ─── View ─────────────────────────────────────────────────────────────

    /// Snapshot the session for rendering.
    #[must_use]
    pub fn view(&self) -> SessionView {
        let item = if self.phase == Phase::Active {
            self.current_item.as_ref().map(|item| {
                let options = match (item.expected(), self.recall_phase) {
                    (ExpectedAnswer::Sequence(canonical), Some(RecallPhase::Showing)) => {
                        canonical.clone()
                    }
                    (_, Some(RecallPhase::Memorizing)) => Vec::new(),
                    _ => item.options().to_vec(),
                };
                let explanation = if self.feedback == Feedback::None {
                    None
                } else {
                    Some(item.explanation().to_string())
                };
                ItemView {
                    id: item.id(),
                    prompt: item.prompt().to_string(),
                    kind: item.kind(),
                    options,
                    explanation,
                }
            })
        } else {
            None
        };

        SessionView {
            phase: self.phase,
            recall_phase: self.recall_phase,
            current_index: self.current_index,
            total_items: self.bank.total(),
            score: self.score,
            time_left_secs: self.countdown.remaining_secs(),
            feedback: self.feedback,
            result: self.result.clone(),
            item,
            partial_recall: self.partial_recall.clone(),
        }
    }
}

impl fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("set_id", &self.set_id)
            .field("phase", &self.phase)
            .field("recall_phase", &self.recall_phase)
            .field("current_index", &self.current_index)
            .field("score", &self.score)
            .field("time_left_secs", &self.countdown.remaining_secs())
            .field("feedback", &self.feedback)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
