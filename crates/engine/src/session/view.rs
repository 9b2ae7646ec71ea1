use quiz_core::model::{ChallengeKind, ItemId, RankResult};

use super::state::{Feedback, Phase, RecallPhase};

/// Presentation data for the current item. Never exposes the expected answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: ItemId,
    pub prompt: String,
    pub kind: ChallengeKind,
    /// What the shell may show right now: the canonical order while a
    /// sequence is being shown, nothing while it is memorized, the shuffled
    /// presentation order otherwise.
    pub options: Vec<String>,
    /// Item explanation, present once feedback is being displayed.
    pub explanation: Option<String>,
}

/// Read-only snapshot handed to the shell on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub phase: Phase,
    pub recall_phase: Option<RecallPhase>,
    pub current_index: usize,
    /// `None` for the endless generated bank.
    pub total_items: Option<usize>,
    pub score: u32,
    pub time_left_secs: u32,
    pub feedback: Feedback,
    /// `None` until the session finishes.
    pub result: Option<RankResult>,
    pub item: Option<ItemView>,
    /// The answer built so far while recalling a sequence.
    pub partial_recall: Vec<String>,
}
