use serde::Deserialize;
use thiserror::Error;

use crate::bank::{BankError, ChallengeBank};
use crate::model::ids::{ItemId, SetId};
use crate::model::item::{ItemDraft, ItemError};
use crate::model::rank::{RankingDraft, RankingError, RankingScheme};
use crate::model::settings::{RecallTiming, SetSettings, SettingsError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised while assembling a challenge set.
///
/// All of these are configuration mistakes; they fail at assembly time and
/// never surface mid-session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SetError {
    #[error("set title cannot be empty")]
    EmptyTitle,

    #[error("percentage ranking needs a fixed bank with a known item count")]
    PercentageNeedsFixedBank,

    #[error("sequence items need recall timing in the set settings")]
    MissingRecallTiming,

    #[error("invalid item at position {index}: {source}")]
    Item { index: usize, source: ItemError },

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Ranking(#[from] RankingError),

    #[error(transparent)]
    Bank(#[from] BankError),
}

//
// ─── CHALLENGE SET ─────────────────────────────────────────────────────────────
//

/// One fully validated challenge definition: settings, ranking, and the bank.
///
/// A session engine consumes exactly one set; everything that differs between
/// two quizzes or games lives here as data.
#[derive(Debug, Clone)]
pub struct ChallengeSet {
    id: SetId,
    title: String,
    settings: SetSettings,
    ranking: RankingScheme,
    bank: ChallengeBank,
}

impl ChallengeSet {
    /// Assemble a set from validated parts.
    ///
    /// # Errors
    ///
    /// Returns `SetError::EmptyTitle` for a blank title,
    /// `SetError::PercentageNeedsFixedBank` when a percentage ranking is
    /// paired with an endless bank, and `SetError::MissingRecallTiming` when
    /// the bank holds sequence items but the settings carry no recall timing.
    pub fn new(
        id: SetId,
        title: impl Into<String>,
        settings: SetSettings,
        ranking: RankingScheme,
        bank: ChallengeBank,
    ) -> Result<Self, SetError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(SetError::EmptyTitle);
        }
        if ranking.is_percentage() && bank.is_endless() {
            return Err(SetError::PercentageNeedsFixedBank);
        }
        if bank.has_sequence_items() && settings.recall().is_none() {
            return Err(SetError::MissingRecallTiming);
        }

        Ok(Self {
            id,
            title,
            settings,
            ranking,
            bank,
        })
    }

    #[must_use]
    pub fn id(&self) -> SetId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn settings(&self) -> &SetSettings {
        &self.settings
    }

    #[must_use]
    pub fn ranking(&self) -> &RankingScheme {
        &self.ranking
    }

    #[must_use]
    pub fn bank(&self) -> &ChallengeBank {
        &self.bank
    }

    /// Decompose the set for a consumer that owns the parts separately.
    #[must_use]
    pub fn into_parts(self) -> (SetId, String, SetSettings, RankingScheme, ChallengeBank) {
        (
            self.id,
            self.title,
            self.settings,
            self.ranking,
            self.bank,
        )
    }
}

//
// ─── SET DRAFT ─────────────────────────────────────────────────────────────────
//

/// Unvalidated fixed-bank set data, as authored or deserialized.
///
/// Timing fields are optional and fall back to the quiz defaults; recall
/// timing defaults kick in as soon as the items include a sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct SetDraft {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub time_budget_secs: Option<u32>,
    #[serde(default)]
    pub feedback_delay_ms: Option<u32>,
    #[serde(default)]
    pub show_secs: Option<u32>,
    #[serde(default)]
    pub memorize_secs: Option<u32>,
    pub ranking: RankingDraft,
    pub items: Vec<ItemDraft>,
}

impl SetDraft {
    /// Validate the draft into a ready-to-run challenge set.
    ///
    /// Items are assigned sequential ids from 1 in list order.
    ///
    /// # Errors
    ///
    /// Returns `SetError` for any invalid item, band table, timing value, or
    /// an empty item list.
    pub fn validate(self) -> Result<ChallengeSet, SetError> {
        let defaults = SetSettings::quiz_defaults();

        let needs_recall = self.show_secs.is_some()
            || self.memorize_secs.is_some()
            || self
                .items
                .iter()
                .any(|item| matches!(item.kind, crate::model::ChallengeKind::OrderedSequence));
        let recall = if needs_recall {
            let timing_defaults = RecallTiming::defaults();
            Some(RecallTiming::new(
                self.show_secs.unwrap_or_else(|| timing_defaults.show_secs()),
                self.memorize_secs
                    .unwrap_or_else(|| timing_defaults.memorize_secs()),
            )?)
        } else {
            None
        };

        let settings = SetSettings::new(
            self.time_budget_secs
                .unwrap_or_else(|| defaults.time_budget_secs()),
            self.feedback_delay_ms
                .unwrap_or_else(|| defaults.feedback_delay_ms()),
            recall,
        )?;

        let ranking = self.ranking.validate()?;

        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate(ItemId::new(index as u64 + 1))
                    .map_err(|source| SetError::Item { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let bank = ChallengeBank::fixed(items)?;

        ChallengeSet::new(SetId::new(self.id), self.title, settings, ranking, bank)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
