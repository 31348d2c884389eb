use std::collections::BTreeMap;

use serde::Serialize;

use trainer_core::DateKey;
use trainer_core::model::{ProgressState, QuestionBank};

//
// ─── SECTION ACCURACY ──────────────────────────────────────────────────────────
//

/// Per-section exposure and accuracy totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionAccuracy {
    pub seen: u32,
    pub ok: u32,
}

impl SectionAccuracy {
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn accuracy_pct(&self) -> u32 {
        ((f64::from(self.ok) / f64::from(self.seen.max(1))) * 100.0).round() as u32
    }
}

/// Tracked minutes on one day of the weekly chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMinutes {
    pub day: DateKey,
    pub minutes: u32,
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Read-only progress summary for the dashboard.
///
/// Every field is derived; building a snapshot never mutates progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub total_questions: usize,
    /// Questions answered at least once.
    pub practiced: usize,
    pub mastered: usize,
    /// Practiced but not yet mastered.
    pub learning: usize,
    /// Never answered.
    pub fresh: usize,
    pub accuracy_pct: u32,
    pub mastered_pct: u32,
    pub total_study_minutes: u64,
    /// Accuracy grouped by `Question::section_key`, only for sections with
    /// at least one recorded answer.
    pub sections: BTreeMap<String, SectionAccuracy>,
    /// The last seven days, oldest first, zero-filled.
    pub weekly_minutes: Vec<DailyMinutes>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub streak_at_risk: bool,
}

/// Seconds to whole minutes, rounded to nearest.
fn minutes_rounded(seconds: u64) -> u64 {
    (seconds + 30) / 60
}

/// Builds the dashboard snapshot for `today`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn build_snapshot(
    bank: &QuestionBank,
    progress: &ProgressState,
    today: DateKey,
) -> ProgressSnapshot {
    let mut practiced = 0usize;
    let mut mastered = 0usize;
    let mut sections: BTreeMap<String, SectionAccuracy> = BTreeMap::new();

    for question in bank.iter() {
        let record = progress.record(&question.id);
        if record.seen == 0 {
            continue;
        }
        practiced += 1;
        if record.mastered {
            mastered += 1;
        }
        let entry = sections.entry(question.section_key()).or_default();
        entry.seen += record.seen;
        entry.ok += record.ok;
    }

    let total = bank.len();
    let mastered_pct =
        ((mastered as f64 / total.max(1) as f64) * 100.0).round() as u32;

    let weekly_minutes = today
        .last_n(7)
        .into_iter()
        .map(|day| DailyMinutes {
            day,
            minutes: minutes_rounded(u64::from(progress.seconds_on(day))) as u32,
        })
        .collect();

    ProgressSnapshot {
        total_questions: total,
        practiced,
        mastered,
        learning: practiced - mastered,
        fresh: total - practiced,
        accuracy_pct: progress.accuracy_pct(),
        mastered_pct,
        total_study_minutes: minutes_rounded(progress.total_study_seconds()),
        sections,
        weekly_minutes,
        current_streak: progress.displayed_streak(today),
        longest_streak: progress.streak.longest,
        streak_at_risk: progress.streak_warning(today),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
