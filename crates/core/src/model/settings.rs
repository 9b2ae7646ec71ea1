use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("time budget must be > 0 seconds")]
    InvalidTimeBudget,

    #[error("feedback delay must be between 500 and 5000 ms, got {provided}")]
    InvalidFeedbackDelay { provided: u32 },

    #[error("recall phase seconds must be between 1 and 30, got {provided}")]
    InvalidRecallSeconds { provided: u32 },
}

//
// ─── RECALL TIMING ─────────────────────────────────────────────────────────────
//

/// Timing of the nested show/memorize cycle for sequence-recall items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecallTiming {
    show_secs: u32,
    memorize_secs: u32,
}

impl RecallTiming {
    /// The observed production timing: 3 s shown, 2 s hidden.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            show_secs: 3,
            memorize_secs: 2,
        }
    }

    /// Creates custom recall timing.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidRecallSeconds` when either phase is
    /// outside 1..=30 seconds.
    pub fn new(show_secs: u32, memorize_secs: u32) -> Result<Self, SettingsError> {
        for provided in [show_secs, memorize_secs] {
            if !(1..=30).contains(&provided) {
                return Err(SettingsError::InvalidRecallSeconds { provided });
            }
        }
        Ok(Self {
            show_secs,
            memorize_secs,
        })
    }

    #[must_use]
    pub fn show_secs(&self) -> u32 {
        self.show_secs
    }

    #[must_use]
    pub fn memorize_secs(&self) -> u32 {
        self.memorize_secs
    }
}

//
// ─── SET SETTINGS ──────────────────────────────────────────────────────────────
//

/// Declarative per-set configuration for a challenge session.
///
/// One generic engine instance is parameterized with these values instead of
/// hard-wiring a state machine per quiz or game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSettings {
    time_budget_secs: u32,
    feedback_delay_ms: u32,
    recall: Option<RecallTiming>,
}

impl SetSettings {
    /// Default configuration for a static quiz: 300 s budget, 1.5 s feedback.
    #[must_use]
    pub fn quiz_defaults() -> Self {
        Self {
            time_budget_secs: 300,
            feedback_delay_ms: 1_500,
            recall: None,
        }
    }

    /// Default configuration for the memory game: 50 s budget, recall cycle on.
    #[must_use]
    pub fn memory_defaults() -> Self {
        Self {
            time_budget_secs: 50,
            feedback_delay_ms: 1_500,
            recall: Some(RecallTiming::defaults()),
        }
    }

    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the time budget is zero or the feedback delay is
    /// outside 500..=5000 ms.
    pub fn new(
        time_budget_secs: u32,
        feedback_delay_ms: u32,
        recall: Option<RecallTiming>,
    ) -> Result<Self, SettingsError> {
        if time_budget_secs == 0 {
            return Err(SettingsError::InvalidTimeBudget);
        }
        if !(500..=5_000).contains(&feedback_delay_ms) {
            return Err(SettingsError::InvalidFeedbackDelay {
                provided: feedback_delay_ms,
            });
        }
        Ok(Self {
            time_budget_secs,
            feedback_delay_ms,
            recall,
        })
    }

    /// Replaces the time budget, keeping everything else.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimeBudget` for a zero budget.
    pub fn with_time_budget(self, time_budget_secs: u32) -> Result<Self, SettingsError> {
        Self::new(time_budget_secs, self.feedback_delay_ms, self.recall)
    }

    /// Replaces the feedback display delay, keeping everything else.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidFeedbackDelay` when outside 500..=5000 ms.
    pub fn with_feedback_delay(self, feedback_delay_ms: u32) -> Result<Self, SettingsError> {
        Self::new(self.time_budget_secs, feedback_delay_ms, self.recall)
    }

    #[must_use]
    pub fn time_budget_secs(&self) -> u32 {
        self.time_budget_secs
    }

    #[must_use]
    pub fn feedback_delay_ms(&self) -> u32 {
        self.feedback_delay_ms
    }

    #[must_use]
    pub fn recall(&self) -> Option<RecallTiming> {
        self.recall
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
