use serde::{Deserialize, Serialize};

use crate::model::ProgressState;
use crate::time::DateKey;

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Tuning constants for readiness forecasting.
///
/// The penalty and margin factors are empirical values carried over from the
/// original trainer; they are configuration, not derived from a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Rolling window over which mastery velocity is averaged.
    pub window_days: usize,
    /// Minimum distinct study days before any date is projected.
    pub min_history_days: usize,
    /// Accuracy (whole percent) below which the penalty factor applies.
    pub low_accuracy_threshold: u32,
    /// Multiplier applied to the day estimate under the threshold.
    pub low_accuracy_penalty: f64,
    /// Fixed safety margin applied to every estimate.
    pub safety_margin: f64,
    /// Velocity floor guarding the division.
    pub min_velocity: f64,
    /// Ratio below which the pace counts as slowed.
    pub slowdown_ratio: f64,
    /// Ratio above which the pace counts as accelerated.
    pub speedup_ratio: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            min_history_days: 3,
            low_accuracy_threshold: 60,
            low_accuracy_penalty: 1.5,
            safety_margin: 1.2,
            min_velocity: 0.01,
            slowdown_ratio: 0.9,
            speedup_ratio: 1.1,
        }
    }
}

//
// ─── RESULT TYPES ──────────────────────────────────────────────────────────────
//

/// Week-over-week comparison of mastery velocity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaceTrend {
    /// Velocity within the neutral band, or no prior-week data to compare.
    Steady,
    /// Velocity dropped below the slowdown ratio; the date moved later.
    Slowed { projected: DateKey },
    /// Velocity rose above the speedup ratio; `previous` is where the date
    /// stood at last week's pace.
    Accelerated { projected: DateKey, previous: DateKey },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MilestoneStatus {
    Met,
    Projected(DateKey),
}

/// Projection for one of the 25/50/75/100% mastery targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub percent: u8,
    /// Questions that must be mastered to reach this milestone.
    pub target: u32,
    pub status: MilestoneStatus,
}

/// A successful readiness projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadinessProjection {
    /// Projected exam-ready date.
    pub ready_on: DateKey,
    /// Whole days until ready (already ceiled).
    pub estimated_days: u32,
    /// Questions still to master.
    pub remaining: u32,
    /// Current mastery velocity (questions/day).
    pub velocity: f64,
    pub pace: PaceTrend,
    pub milestones: Vec<Milestone>,
}

/// Forecast result. Degenerate inputs produce the explicit variants rather
/// than a fabricated date.
#[derive(Debug, Clone, PartialEq)]
pub enum Forecast {
    /// Fewer distinct study days than the configured minimum.
    InsufficientHistory,
    /// No questions mastered inside the rolling window.
    NoMasteryProgress,
    Projection(ReadinessProjection),
}

impl Forecast {
    #[must_use]
    pub fn projection(&self) -> Option<&ReadinessProjection> {
        match self {
            Forecast::Projection(p) => Some(p),
            _ => None,
        }
    }
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Projects an exam-ready date from rolling mastery velocity.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

const MILESTONE_PERCENTS: [u8; 4] = [25, 50, 75, 100];

impl ForecastEngine {
    #[must_use]
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Estimated days to master `remaining` questions at `velocity`
    /// questions/day, with the low-accuracy penalty and safety margin.
    #[must_use]
    pub fn estimate_days(&self, remaining: u32, velocity: f64, accuracy_pct: u32) -> f64 {
        let mut days = f64::from(remaining) / velocity.max(self.config.min_velocity);
        if accuracy_pct < self.config.low_accuracy_threshold {
            days *= self.config.low_accuracy_penalty;
        }
        days * self.config.safety_margin
    }

    /// Builds the full forecast for `today`.
    #[must_use]
    pub fn build(
        &self,
        progress: &ProgressState,
        mastered: u32,
        total_questions: u32,
        accuracy_pct: u32,
        today: DateKey,
    ) -> Forecast {
        if progress.study_day_count() < self.config.min_history_days {
            return Forecast::InsufficientHistory;
        }

        let velocity = progress.mastery_velocity(self.config.window_days, 0, today);
        if velocity <= 0.0 {
            return Forecast::NoMasteryProgress;
        }

        let remaining = total_questions.saturating_sub(mastered);
        let estimate = self.estimate_days(remaining, velocity, accuracy_pct);
        let estimated_days = ceil_days(estimate);
        let ready_on = today.add_days(i64::from(estimated_days));

        let pace = self.pace_trend(
            progress,
            remaining,
            velocity,
            accuracy_pct,
            ready_on,
            today,
        );
        let milestones = self.milestones(mastered, total_questions, velocity, accuracy_pct, today);

        Forecast::Projection(ReadinessProjection {
            ready_on,
            estimated_days,
            remaining,
            velocity,
            pace,
            milestones,
        })
    }

    fn pace_trend(
        &self,
        progress: &ProgressState,
        remaining: u32,
        velocity: f64,
        accuracy_pct: u32,
        ready_on: DateKey,
        today: DateKey,
    ) -> PaceTrend {
        let prior = progress.mastery_velocity(self.config.window_days, self.config.window_days, today);
        if prior <= 0.0 {
            return PaceTrend::Steady;
        }

        if velocity < prior * self.config.slowdown_ratio {
            PaceTrend::Slowed { projected: ready_on }
        } else if velocity > prior * self.config.speedup_ratio {
            let prior_days = self.estimate_days(remaining, prior, accuracy_pct);
            PaceTrend::Accelerated {
                projected: ready_on,
                previous: today.add_days(i64::from(ceil_days(prior_days))),
            }
        } else {
            PaceTrend::Steady
        }
    }

    fn milestones(
        &self,
        mastered: u32,
        total_questions: u32,
        velocity: f64,
        accuracy_pct: u32,
        today: DateKey,
    ) -> Vec<Milestone> {
        MILESTONE_PERCENTS
            .iter()
            .map(|&percent| {
                let target = milestone_target(percent, total_questions);
                let status = if mastered >= target {
                    MilestoneStatus::Met
                } else {
                    let days = self.estimate_days(target - mastered, velocity, accuracy_pct);
                    MilestoneStatus::Projected(today.add_days(i64::from(ceil_days(days))))
                };
                Milestone {
                    percent,
                    target,
                    status,
                }
            })
            .collect()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ceil_days(days: f64) -> u32 {
    days.ceil().max(0.0) as u32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn milestone_target(percent: u8, total: u32) -> u32 {
    ((f64::from(percent) / 100.0) * f64::from(total)).ceil() as u32
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
