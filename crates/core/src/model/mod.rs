mod ids;
mod item;
mod rank;
mod set;
mod settings;

pub use ids::{ItemId, ParseIdError, SetId};
pub use item::{
    ChallengeItem, ChallengeKind, ExpectedAnswer, FALSE_LABEL, ItemDraft, ItemError,
    SubmittedAnswer, TRUE_LABEL,
};
pub use rank::{RankBand, RankResult, RankingDraft, RankingError, RankingScheme};
pub use set::{ChallengeSet, SetDraft, SetError};
pub use settings::{RecallTiming, SetSettings, SettingsError};
