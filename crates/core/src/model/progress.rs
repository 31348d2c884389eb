use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::answer_record::AnswerRecord;
use crate::model::ids::QuestionId;
use crate::time::DateKey;

/// Default daily study goal in minutes.
pub const DEFAULT_DAILY_GOAL_MINUTES: u32 = 60;

//
// ─── STREAK ────────────────────────────────────────────────────────────────────
//

/// Persisted streak counters.
///
/// `current` is only corrected on the next unlock event; the decayed value
/// shown to the user comes from `ProgressState::displayed_streak`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
    pub last_goal_date: Option<DateKey>,
}

/// Early blobs stored the streak as a bare day count; normalize those to the
/// structured form on load.
fn streak_compat<'de, D>(deserializer: D) -> Result<StreakState, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Legacy(u32),
        State(StreakState),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Legacy(n) => StreakState {
            current: n,
            longest: n,
            last_goal_date: None,
        },
        Raw::State(state) => state,
    })
}

//
// ─── PROGRESS STATE ────────────────────────────────────────────────────────────
//

/// Process-wide study progress, persisted as one JSON blob.
///
/// Wire field names stay camelCase for compatibility with blobs written by
/// earlier versions of the trainer. Missing or partial fields normalize to
/// defaults on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressState {
    pub answers: BTreeMap<QuestionId, AnswerRecord>,
    #[serde(deserialize_with = "streak_compat")]
    pub streak: StreakState,
    pub daily_goal_minutes: u32,
    /// Accumulated study seconds per calendar day.
    pub daily_seconds: BTreeMap<DateKey, u32>,
    /// Count of questions that first became mastered on each day (not the
    /// running total). Sole writer is `register_answer`.
    pub mastered_by_date: BTreeMap<DateKey, u32>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            answers: BTreeMap::new(),
            streak: StreakState::default(),
            daily_goal_minutes: DEFAULT_DAILY_GOAL_MINUTES,
            daily_seconds: BTreeMap::new(),
            mastered_by_date: BTreeMap::new(),
        }
    }
}

impl ProgressState {
    //
    // ─── ANSWER RECORDS ────────────────────────────────────────────────────
    //

    /// Applies one answered question to its record, creating the record
    /// lazily. Returns true when the question transitioned to mastered, in
    /// which case the transition is counted in `mastered_by_date[today]`.
    pub fn register_answer(&mut self, id: &QuestionId, correct: bool, today: DateKey) -> bool {
        let record = self.answers.entry(id.clone()).or_default();
        if correct {
            let newly_mastered = record.record_correct(today);
            if newly_mastered {
                *self.mastered_by_date.entry(today).or_insert(0) += 1;
            }
            newly_mastered
        } else {
            record.record_wrong();
            false
        }
    }

    /// Snapshot of a question's record, all-zero if never answered.
    #[must_use]
    pub fn record(&self, id: &QuestionId) -> AnswerRecord {
        self.answers.get(id).cloned().unwrap_or_default()
    }

    /// Global accuracy over every recorded answer, rounded to whole percent.
    #[must_use]
    pub fn accuracy_pct(&self) -> u32 {
        let (seen, ok) = self
            .answers
            .values()
            .fold((0u64, 0u64), |(seen, ok), rec| {
                (seen + u64::from(rec.seen), ok + u64::from(rec.ok))
            });
        pct(ok, seen.max(1))
    }

    /// Number of questions currently mastered.
    #[must_use]
    pub fn mastered_total(&self) -> u32 {
        self.answers.values().filter(|rec| rec.mastered).count() as u32
    }

    //
    // ─── STUDY TIME ────────────────────────────────────────────────────────
    //

    pub fn add_study_seconds(&mut self, day: DateKey, seconds: u32) {
        if seconds == 0 {
            return;
        }
        *self.daily_seconds.entry(day).or_insert(0) += seconds;
    }

    #[must_use]
    pub fn seconds_on(&self, day: DateKey) -> u32 {
        self.daily_seconds.get(&day).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_study_seconds(&self) -> u64 {
        self.daily_seconds.values().map(|&s| u64::from(s)).sum()
    }

    /// Number of distinct days with any tracked study time.
    #[must_use]
    pub fn study_day_count(&self) -> usize {
        self.daily_seconds.values().filter(|&&s| s > 0).count()
    }

    /// Daily goal in seconds. A stored zero falls back to the default goal,
    /// matching how older blobs treated the field.
    #[must_use]
    pub fn goal_seconds(&self) -> u32 {
        let minutes = if self.daily_goal_minutes == 0 {
            DEFAULT_DAILY_GOAL_MINUTES
        } else {
            self.daily_goal_minutes
        };
        minutes * 60
    }

    //
    // ─── STREAK & GOAL ─────────────────────────────────────────────────────
    //

    /// Unlocks the daily goal for `day` if its accumulated time has reached
    /// the goal and it was not already unlocked. Returns true on a fresh
    /// unlock; the caller persists and celebrates.
    pub fn unlock_goal_if_due(&mut self, day: DateKey) -> bool {
        if self.seconds_on(day) < self.goal_seconds() {
            return false;
        }
        if self.streak.last_goal_date == Some(day) {
            return false;
        }

        let continues = self
            .streak
            .last_goal_date
            .is_some_and(|last| day.is_day_after(last));
        self.streak.current = if continues { self.streak.current + 1 } else { 1 };
        self.streak.longest = self.streak.longest.max(self.streak.current);
        self.streak.last_goal_date = Some(day);
        true
    }

    /// Streak as shown to the user: decays to zero once a day is missed,
    /// independent of the persisted counter.
    #[must_use]
    pub fn displayed_streak(&self, today: DateKey) -> u32 {
        match self.streak.last_goal_date {
            Some(last) if last == today || today.is_day_after(last) => self.streak.current,
            _ => 0,
        }
    }

    /// Non-authoritative nudge: studied yesterday but not yet today.
    #[must_use]
    pub fn streak_warning(&self, today: DateKey) -> bool {
        self.seconds_on(today.yesterday()) > 0 && self.seconds_on(today) == 0
    }

    //
    // ─── MASTERY VELOCITY ──────────────────────────────────────────────────
    //

    /// Mean newly-mastered questions per day over a `window_days` window
    /// ending `offset_days` before `today`.
    #[must_use]
    pub fn mastery_velocity(&self, window_days: usize, offset_days: usize, today: DateKey) -> f64 {
        if window_days == 0 {
            return 0.0;
        }
        let newly_mastered: u32 = today
            .last_n(window_days + offset_days)
            .into_iter()
            .take(window_days)
            .map(|day| self.mastered_by_date.get(&day).copied().unwrap_or(0))
            .sum();
        f64::from(newly_mastered) / window_days as f64
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pct(part: u64, whole: u64) -> u32 {
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
