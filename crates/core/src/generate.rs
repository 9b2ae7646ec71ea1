use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::{ChallengeItem, ItemId};

/// Smallest operand used in a generated operation.
const OPERAND_MIN: u32 = 1;
/// Largest operand used in a generated operation.
const OPERAND_MAX: u32 = 20;
/// Sequence length at level 0.
const BASE_LEN: u32 = 3;
/// Sequence length cap, regardless of level.
const MAX_LEN: u32 = 6;

const RECALL_PROMPT: &str = "Rebuild the operations in the order they appeared";

/// Produces sequence-recall items of growing length.
///
/// Each item is a run of `min(3 + level, 6)` small arithmetic operations. The
/// expected order is the generation order; the presentation order is an
/// independent shuffle of the same entries. Seed the generator for
/// reproducible runs; use [`SequenceGenerator::from_entropy`] for live play.
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    rng: StdRng,
    next_id: u64,
}

impl SequenceGenerator {
    /// A generator with a fixed seed, for deterministic generation in tests.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// A generator seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            next_id: 1,
        }
    }

    /// Generate the item for the given difficulty level.
    ///
    /// Item ids are sequential per generator, so every round gets a fresh id.
    pub fn generate(&mut self, level: u32) -> ChallengeItem {
        let len = (BASE_LEN.saturating_add(level)).min(MAX_LEN) as usize;

        let canonical: Vec<String> = (0..len).map(|_| self.operation()).collect();
        let mut options = canonical.clone();
        options.shuffle(&mut self.rng);
        // A presentation order identical to the expected order would give the
        // round away; reshuffle while the entries allow a different order.
        while options == canonical && !all_equal(&canonical) {
            options.shuffle(&mut self.rng);
        }

        let id = ItemId::new(self.next_id);
        self.next_id += 1;

        ChallengeItem::sequence_from_parts(
            id,
            RECALL_PROMPT.to_string(),
            options,
            canonical,
            String::new(),
        )
    }

    /// One rendered operation: addition, or subtraction ordered so the result
    /// is never negative.
    fn operation(&mut self) -> String {
        let a = self.rng.random_range(OPERAND_MIN..=OPERAND_MAX);
        let b = self.rng.random_range(OPERAND_MIN..=OPERAND_MAX);

        if self.rng.random_bool(0.5) {
            format!("{a} + {b} = {}", a + b)
        } else {
            let (hi, lo) = (a.max(b), a.min(b));
            format!("{hi} - {lo} = {}", hi - lo)
        }
    }
}

fn all_equal(entries: &[String]) -> bool {
    entries.windows(2).all(|pair| pair[0] == pair[1])
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
