use rand::Rng;
use serde::{Deserialize, Serialize};

use trainer_core::model::{AnswerRecord, ProgressState, Question};

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Tuning constants for adaptive question selection.
///
/// The resurfacing probability and freshness factors are empirical values
/// carried over from the original trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Chance of drawing from the mastered pool while unmastered questions
    /// remain.
    pub resurface_probability: f64,
    /// Weight of an ordinary candidate.
    pub base_weight: f64,
    /// Weight of a candidate flagged for review.
    pub review_weight: f64,
    /// Bonus per unseen exposure below the cap.
    pub freshness_step: f64,
    /// Exposures after which the freshness bonus reaches zero.
    pub freshness_seen_cap: u32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            resurface_probability: 0.1,
            base_weight: 1.0,
            review_weight: 2.0,
            freshness_step: 0.4,
            freshness_seen_cap: 3,
        }
    }
}

impl SelectorConfig {
    /// Sampling weight for one candidate's record.
    #[must_use]
    pub fn weight(&self, record: &AnswerRecord) -> f64 {
        let base = if record.needs_review() {
            self.review_weight
        } else {
            self.base_weight
        };
        let unseen = self.freshness_seen_cap - record.seen.min(self.freshness_seen_cap);
        base + f64::from(unseen) * self.freshness_step
    }
}

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

/// Picks the next question to present.
///
/// Questions split into two pools: settled ones (mastered, no review flags)
/// and everything else. The settled pool is only drawn with the configured
/// resurfacing probability while regular material remains, so sessions stay
/// dominated by unmastered questions. Within the chosen pool a single-pass
/// weighted draw favors review-flagged and rarely-seen items.
///
/// Returns `None` only for an empty question list.
pub fn select_next<'a, R>(
    questions: &'a [Question],
    progress: &ProgressState,
    config: &SelectorConfig,
    rng: &mut R,
) -> Option<&'a Question>
where
    R: Rng + ?Sized,
{
    if questions.is_empty() {
        return None;
    }

    let default_record = AnswerRecord::default();
    let mut settled: Vec<(&Question, &AnswerRecord)> = Vec::new();
    let mut regular: Vec<(&Question, &AnswerRecord)> = Vec::new();
    for question in questions {
        let record = progress.answers.get(&question.id).unwrap_or(&default_record);
        if record.is_settled() {
            settled.push((question, record));
        } else {
            regular.push((question, record));
        }
    }

    let use_settled = !settled.is_empty()
        && (regular.is_empty() || rng.random::<f64>() < config.resurface_probability);
    let pool = if use_settled { &settled } else { &regular };
    if pool.is_empty() {
        return questions.first();
    }

    let total: f64 = pool.iter().map(|(_, rec)| config.weight(rec)).sum();
    let mut r = rng.random_range(0.0..total);
    for (question, record) in pool {
        r -= config.weight(record);
        if r <= 0.0 {
            return Some(question);
        }
    }
    // Floating-point overshoot falls back to the pool head.
    Some(pool[0].0)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
