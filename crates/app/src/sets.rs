//! Bundled challenge sets and file loading for the demo binary.

use std::path::Path;

use quiz_core::SequenceGenerator;
use quiz_core::bank::ChallengeBank;
use quiz_core::model::{
    ChallengeSet, RankBand, RankingScheme, SetDraft, SetError, SetId, SetSettings,
};

const MARKETING_QUIZ: &str = include_str!("../sets/marketing_quiz.json");

/// The bundled ten-question marketing quiz.
pub fn marketing_quiz() -> Result<ChallengeSet, Box<dyn std::error::Error>> {
    let draft: SetDraft = serde_json::from_str(MARKETING_QUIZ)?;
    Ok(draft.validate()?)
}

/// Load a quiz definition from a JSON file.
pub fn from_file(path: &Path) -> Result<ChallengeSet, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let draft: SetDraft = serde_json::from_str(&raw)?;
    Ok(draft.validate()?)
}

/// The 50-second operation-recall memory game.
///
/// # Errors
///
/// Returns `SetError` if the band table is rejected; the bundled bands are
/// valid, so this only fires after edits here.
pub fn memory_game(seed: Option<u64>) -> Result<ChallengeSet, SetError> {
    let generator = match seed {
        Some(seed) => SequenceGenerator::seeded(seed),
        None => SequenceGenerator::from_entropy(),
    };
    let bands = vec![
        RankBand::new(8, "Mental Math Master", "🧠"),
        RankBand::new(4, "Quick Thinker", "⚡"),
        RankBand::new(0, "Warm-Up", "🌱"),
    ];

    ChallengeSet::new(
        SetId::new(2),
        "Operation Recall",
        SetSettings::memory_defaults(),
        RankingScheme::absolute(bands)?,
        ChallengeBank::generated(generator),
    )
}
