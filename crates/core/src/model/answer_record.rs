use serde::{Deserialize, Serialize};

use crate::time::DateKey;

/// Consecutive correct answers required before a question counts as mastered.
pub const MASTERY_STREAK: u32 = 3;

/// Per-question mastery state, keyed by question id in `ProgressState`.
///
/// Records are created lazily with all-zero defaults the first time a
/// question is referenced; partially stored records are normalized the same
/// way through the serde defaults.
///
/// Invariants upheld by the transition methods:
/// - `ok + wrong == seen` after every recorded answer,
/// - `mastered` is sticky: once true it never reverts, even though
///   `correct_streak` resets on later wrong answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnswerRecord {
    /// Times this question was presented and answered.
    pub seen: u32,
    /// Cumulative correct answers.
    pub ok: u32,
    /// Cumulative incorrect answers.
    pub wrong: u32,
    /// Consecutive correct answers since the last wrong one.
    pub correct_streak: u32,
    /// Outstanding review credits; incremented on wrong answers, drained on
    /// correct ones.
    pub review_count: u32,
    /// True once `correct_streak` first reached `MASTERY_STREAK`.
    pub mastered: bool,
    /// Day mastery was first achieved.
    pub mastered_at: Option<DateKey>,
}

impl AnswerRecord {
    /// Records a correct answer.
    ///
    /// Returns true when this answer causes the first transition to
    /// mastered; the caller is responsible for counting the transition in
    /// `masteredByDate`.
    pub fn record_correct(&mut self, today: DateKey) -> bool {
        self.seen += 1;
        self.ok += 1;
        self.correct_streak += 1;
        self.review_count = self.review_count.saturating_sub(1);

        if !self.mastered && self.correct_streak >= MASTERY_STREAK {
            self.mastered = true;
            self.mastered_at = Some(today);
            return true;
        }
        false
    }

    /// Records an incorrect answer: resets the streak and flags the question
    /// for extra review. Mastery is not revoked.
    pub fn record_wrong(&mut self) {
        self.seen += 1;
        self.wrong += 1;
        self.correct_streak = 0;
        self.review_count += 1;
    }

    /// True when the question carries outstanding review credits.
    #[must_use]
    pub fn needs_review(&self) -> bool {
        self.review_count > 0
    }

    /// True when the question belongs in the occasional-resurfacing pool:
    /// mastered and not currently flagged for review.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.mastered && self.review_count == 0
    }
}
