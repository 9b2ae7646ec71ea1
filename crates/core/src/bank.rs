use thiserror::Error;

use crate::generate::SequenceGenerator;
use crate::model::{ChallengeItem, ChallengeKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("a fixed challenge bank needs at least one item")]
    Empty,

    #[error("duplicate item id {0} in fixed bank")]
    DuplicateId(crate::model::ItemId),
}

/// The source of challenge items for one session.
///
/// Quizzes read from a fixed, ordered, immutable list; the memory game draws
/// freshly generated items of growing difficulty and never runs out.
#[derive(Debug, Clone)]
pub struct ChallengeBank {
    repr: Repr,
}

#[derive(Debug, Clone)]
enum Repr {
    Fixed(Vec<ChallengeItem>),
    Generated(SequenceGenerator),
}

impl ChallengeBank {
    /// A read-only bank over an ordered list of items.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Empty` when the list has no items.
    pub fn fixed(items: Vec<ChallengeItem>) -> Result<Self, BankError> {
        if items.is_empty() {
            return Err(BankError::Empty);
        }
        let mut seen = std::collections::HashSet::new();
        for item in &items {
            if !seen.insert(item.id()) {
                return Err(BankError::DuplicateId(item.id()));
            }
        }
        Ok(Self {
            repr: Repr::Fixed(items),
        })
    }

    /// An endless bank producing generated sequence items.
    #[must_use]
    pub fn generated(generator: SequenceGenerator) -> Self {
        Self {
            repr: Repr::Generated(generator),
        }
    }

    /// Number of items, or `None` for an endless bank.
    #[must_use]
    pub fn total(&self) -> Option<usize> {
        match &self.repr {
            Repr::Fixed(items) => Some(items.len()),
            Repr::Generated(_) => None,
        }
    }

    #[must_use]
    pub fn is_endless(&self) -> bool {
        matches!(self.repr, Repr::Generated(_))
    }

    /// The item at `index` of a fixed bank; `None` out of bounds or endless.
    #[must_use]
    pub fn item_at(&self, index: usize) -> Option<&ChallengeItem> {
        match &self.repr {
            Repr::Fixed(items) => items.get(index),
            Repr::Generated(_) => None,
        }
    }

    /// Draw the next generated item at the given level; `None` for fixed banks.
    pub fn next_generated(&mut self, level: u32) -> Option<ChallengeItem> {
        match &mut self.repr {
            Repr::Fixed(_) => None,
            Repr::Generated(generator) => Some(generator.generate(level)),
        }
    }

    /// True when any item of this bank runs the nested recall cycle.
    #[must_use]
    pub fn has_sequence_items(&self) -> bool {
        match &self.repr {
            Repr::Fixed(items) => items
                .iter()
                .any(|item| item.kind() == ChallengeKind::OrderedSequence),
            Repr::Generated(_) => true,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChallengeKind, ExpectedAnswer, ItemDraft, ItemId};

    fn boolean_item(id: u64) -> ChallengeItem {
        ItemDraft {
            prompt: format!("Statement {id}"),
            kind: ChallengeKind::BooleanChoice,
            options: Vec::new(),
            expected: ExpectedAnswer::Truth(true),
            explanation: String::new(),
        }
        .validate(ItemId::new(id))
        .unwrap()
    }

    #[test]
    fn empty_fixed_bank_is_rejected() {
        let err = ChallengeBank::fixed(Vec::new()).unwrap_err();
        assert!(matches!(err, BankError::Empty));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = ChallengeBank::fixed(vec![boolean_item(1), boolean_item(1)]).unwrap_err();
        assert!(matches!(err, BankError::DuplicateId(id) if id == ItemId::new(1)));
    }

    #[test]
    fn fixed_bank_is_indexed_in_order() {
        let bank = ChallengeBank::fixed(vec![boolean_item(1), boolean_item(2)]).unwrap();
        assert_eq!(bank.total(), Some(2));
        assert!(!bank.is_endless());
        assert_eq!(bank.item_at(0).unwrap().id(), ItemId::new(1));
        assert_eq!(bank.item_at(1).unwrap().id(), ItemId::new(2));
        assert!(bank.item_at(2).is_none());
    }

    #[test]
    fn fixed_bank_does_not_generate() {
        let mut bank = ChallengeBank::fixed(vec![boolean_item(1)]).unwrap();
        assert!(bank.next_generated(0).is_none());
        assert!(!bank.has_sequence_items());
    }

    #[test]
    fn generated_bank_is_endless() {
        let mut bank = ChallengeBank::generated(SequenceGenerator::seeded(5));
        assert_eq!(bank.total(), None);
        assert!(bank.is_endless());
        assert!(bank.has_sequence_items());
        assert!(bank.item_at(0).is_none());

        let first = bank.next_generated(0).unwrap();
        let second = bank.next_generated(1).unwrap();
        assert_eq!(first.sequence_len(), Some(3));
        assert_eq!(second.sequence_len(), Some(4));
    }
}
