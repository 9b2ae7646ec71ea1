use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ItemId;

/// Canonical labels used when a boolean item does not provide its own.
pub const TRUE_LABEL: &str = "True";
pub const FALSE_LABEL: &str = "False";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ItemError {
    #[error("item prompt cannot be empty")]
    EmptyPrompt,

    #[error("multiple choice items need at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("expected choice {0:?} is not among the options")]
    ExpectedNotInOptions(String),

    #[error("boolean items take exactly two truth labels, got {0}")]
    InvalidTruthLabels(usize),

    #[error("options of a sequence item must hold the same entries as the expected order")]
    SequenceMultisetMismatch,

    #[error("sequence items need at least one entry")]
    EmptySequence,

    #[error("expected answer shape does not match item kind")]
    AnswerShapeMismatch,
}

//
// ─── KIND & ANSWERS ────────────────────────────────────────────────────────────
//

/// The interaction shape of a challenge item.
///
/// - `MultipleChoice`: pick one option out of several
/// - `BooleanChoice`: decide whether a statement is true
/// - `OrderedSequence`: rebuild a sequence of entries in its original order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    MultipleChoice,
    BooleanChoice,
    OrderedSequence,
}

/// The answer an item considers correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedAnswer {
    Truth(bool),
    Choice(String),
    Sequence(Vec<String>),
}

/// An answer handed in through the session boundary.
///
/// Mirrors the shapes of [`ExpectedAnswer`]; a shape that does not match the
/// item's kind is simply judged incorrect, never rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedAnswer {
    Truth(bool),
    Choice(String),
    Sequence(Vec<String>),
}

impl From<bool> for SubmittedAnswer {
    fn from(value: bool) -> Self {
        Self::Truth(value)
    }
}

impl From<&str> for SubmittedAnswer {
    fn from(value: &str) -> Self {
        Self::Choice(value.to_string())
    }
}

impl From<Vec<String>> for SubmittedAnswer {
    fn from(value: Vec<String>) -> Self {
        Self::Sequence(value)
    }
}

//
// ─── ITEM DRAFT ────────────────────────────────────────────────────────────────
//

/// Unvalidated item data, as authored or deserialized.
///
/// Items enter the engine exclusively through [`ItemDraft::validate`], so a
/// malformed definition fails at assembly time rather than mid-session.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemDraft {
    pub prompt: String,
    pub kind: ChallengeKind,
    #[serde(default)]
    pub options: Vec<String>,
    pub expected: ExpectedAnswer,
    #[serde(default)]
    pub explanation: String,
}

impl ItemDraft {
    /// Validate the draft and assign it an id.
    ///
    /// # Errors
    ///
    /// Returns `ItemError` when the prompt is empty, the expected answer shape
    /// does not match the kind, a multiple choice expected value is missing
    /// from the options, or a sequence's options are not a permutation of the
    /// expected order.
    pub fn validate(self, id: ItemId) -> Result<ChallengeItem, ItemError> {
        if self.prompt.trim().is_empty() {
            return Err(ItemError::EmptyPrompt);
        }

        let options = match (self.kind, &self.expected) {
            (ChallengeKind::MultipleChoice, ExpectedAnswer::Choice(choice)) => {
                if self.options.len() < 2 {
                    return Err(ItemError::TooFewOptions(self.options.len()));
                }
                if !self.options.contains(choice) {
                    return Err(ItemError::ExpectedNotInOptions(choice.clone()));
                }
                self.options
            }
            (ChallengeKind::BooleanChoice, ExpectedAnswer::Truth(_)) => {
                if self.options.is_empty() {
                    vec![TRUE_LABEL.to_string(), FALSE_LABEL.to_string()]
                } else if self.options.len() == 2 {
                    self.options
                } else {
                    return Err(ItemError::InvalidTruthLabels(self.options.len()));
                }
            }
            (ChallengeKind::OrderedSequence, ExpectedAnswer::Sequence(sequence)) => {
                if sequence.is_empty() {
                    return Err(ItemError::EmptySequence);
                }
                if !same_multiset(&self.options, sequence) {
                    return Err(ItemError::SequenceMultisetMismatch);
                }
                self.options
            }
            _ => return Err(ItemError::AnswerShapeMismatch),
        };

        Ok(ChallengeItem {
            id,
            prompt: self.prompt,
            kind: self.kind,
            options,
            expected: self.expected,
            explanation: self.explanation,
        })
    }
}

fn same_multiset(left: &[String], right: &[String]) -> bool {
    let mut left: Vec<&String> = left.iter().collect();
    let mut right: Vec<&String> = right.iter().collect();
    left.sort();
    right.sort();
    left == right
}

//
// ─── CHALLENGE ITEM ────────────────────────────────────────────────────────────
//

/// One quiz question or one game round, immutable once validated.
///
/// For `OrderedSequence` items the `options` hold a shuffled presentation
/// order that is a permutation of the expected order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeItem {
    id: ItemId,
    prompt: String,
    kind: ChallengeKind,
    options: Vec<String>,
    expected: ExpectedAnswer,
    explanation: String,
}

impl ChallengeItem {
    /// Assemble a sequence item whose parts are correct by construction.
    ///
    /// Only the generator uses this path; authored items go through
    /// [`ItemDraft::validate`].
    pub(crate) fn sequence_from_parts(
        id: ItemId,
        prompt: String,
        options: Vec<String>,
        canonical: Vec<String>,
        explanation: String,
    ) -> Self {
        debug_assert!(same_multiset(&options, &canonical));
        Self {
            id,
            prompt,
            kind: ChallengeKind::OrderedSequence,
            options,
            expected: ExpectedAnswer::Sequence(canonical),
            explanation,
        }
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> ChallengeKind {
        self.kind
    }

    /// Presentation order of the choices.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn expected(&self) -> &ExpectedAnswer {
        &self.expected
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Length of the expected sequence; `None` for scalar items.
    #[must_use]
    pub fn sequence_len(&self) -> Option<usize> {
        match &self.expected {
            ExpectedAnswer::Sequence(sequence) => Some(sequence.len()),
            _ => None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
