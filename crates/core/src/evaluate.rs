use crate::model::{ChallengeItem, ExpectedAnswer, SubmittedAnswer};

/// Judgement of one submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

/// Compare a submitted answer against what the item expects.
///
/// Pure: the same `(item, submitted)` pair always yields the same verdict.
/// Sequence answers must match element-wise (same entries, same order, same
/// length); a shape that does not fit the item is incorrect, never an error.
#[must_use]
pub fn evaluate(item: &ChallengeItem, submitted: &SubmittedAnswer) -> Verdict {
    let correct = match (item.expected(), submitted) {
        (ExpectedAnswer::Choice(expected), SubmittedAnswer::Choice(choice)) => expected == choice,
        (ExpectedAnswer::Truth(expected), SubmittedAnswer::Truth(truth)) => expected == truth,
        (ExpectedAnswer::Sequence(expected), SubmittedAnswer::Sequence(sequence)) => {
            expected == sequence
        }
        _ => false,
    };

    if correct {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}
