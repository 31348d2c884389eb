use chrono::{DateTime, Duration, Utc};

use trainer_core::DateKey;

//
// ─── VIEWS ─────────────────────────────────────────────────────────────────────
//

/// The view the user is currently in, reported by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Quiz,
    Exam,
    Review,
    Progress,
}

impl View {
    /// Study time only accrues in the practice-facing views.
    #[must_use]
    pub fn is_trackable(self) -> bool {
        matches!(self, View::Quiz | View::Exam | View::Review)
    }
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyClockConfig {
    /// Tracking stops once no interaction arrives within this window.
    pub inactivity_window: Duration,
    /// Accrued seconds are batched until this many are pending, then flushed.
    pub flush_after_seconds: u32,
}

impl Default for StudyClockConfig {
    fn default() -> Self {
        Self {
            inactivity_window: Duration::minutes(2),
            flush_after_seconds: 10,
        }
    }
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Result of feeding one tick into the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Whole seconds to credit to today's study time.
    pub seconds_accrued: u32,
    /// True when the pending batch should be persisted now (batch full, or
    /// tracking just stopped with unsaved time).
    pub should_flush: bool,
}

//
// ─── STUDY CLOCK ───────────────────────────────────────────────────────────────
//

/// Ephemeral study-time accumulator, driven by a 1-second external tick.
///
/// Time accrues only while the user is in a trackable view and has
/// interacted within the inactivity window. Sub-second remainders are kept
/// in a carry buffer so no elapsed time is lost between ticks. The clock
/// itself never touches storage; `should_flush` tells the caller when to
/// persist, and the pending counter resets as soon as a flush is requested.
#[derive(Debug, Clone)]
pub struct StudyClock {
    config: StudyClockConfig,
    active: bool,
    last_interaction: Option<DateTime<Utc>>,
    last_tick: DateTime<Utc>,
    carry_ms: i64,
    unsaved_seconds: u32,
    goal_celebrated: Option<DateKey>,
}

impl StudyClock {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_config(now, StudyClockConfig::default())
    }

    #[must_use]
    pub fn with_config(now: DateTime<Utc>, config: StudyClockConfig) -> Self {
        Self {
            config,
            active: false,
            last_interaction: None,
            last_tick: now,
            carry_ms: 0,
            unsaved_seconds: 0,
            goal_celebrated: None,
        }
    }

    /// Registers a user interaction. Interactions outside trackable views
    /// are ignored.
    pub fn interaction(&mut self, now: DateTime<Utc>, view: View) {
        if !view.is_trackable() {
            return;
        }
        self.last_interaction = Some(now);
        self.active = true;
    }

    /// Advances the clock to `now` and reports accrued seconds.
    pub fn tick(&mut self, now: DateTime<Utc>, view: View) -> TickOutcome {
        let delta = now - self.last_tick;
        self.last_tick = now;

        if !view.is_trackable() {
            self.active = false;
            return TickOutcome::default();
        }

        let within_window = self
            .last_interaction
            .is_some_and(|at| now - at <= self.config.inactivity_window);

        if self.active && within_window {
            return self.accrue(delta);
        }

        if self.active {
            // Inactivity cutoff: stop tracking and save what is pending so
            // nothing accrued is lost.
            log::debug!("study tracking stopped after inactivity");
            self.active = false;
            return TickOutcome {
                seconds_accrued: 0,
                should_flush: self.take_pending(),
            };
        }

        TickOutcome::default()
    }

    /// Stops tracking (view hidden, teardown). Returns true when pending
    /// time must be persisted immediately.
    pub fn suspend(&mut self) -> bool {
        self.active = false;
        self.take_pending()
    }

    /// Once-per-day gate for the goal celebration side effect.
    pub fn should_celebrate(&mut self, day: DateKey) -> bool {
        if self.goal_celebrated == Some(day) {
            return false;
        }
        self.goal_celebrated = Some(day);
        true
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn carry_ms(&self) -> i64 {
        self.carry_ms
    }

    #[must_use]
    pub fn unsaved_seconds(&self) -> u32 {
        self.unsaved_seconds
    }

    fn accrue(&mut self, delta: Duration) -> TickOutcome {
        let delta_ms = delta.num_milliseconds().max(0);
        self.carry_ms += delta_ms;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let seconds = (self.carry_ms / 1000) as u32;
        self.carry_ms %= 1000;

        if seconds == 0 {
            return TickOutcome::default();
        }

        self.unsaved_seconds += seconds;
        let should_flush = self.unsaved_seconds >= self.config.flush_after_seconds;
        if should_flush {
            self.unsaved_seconds = 0;
        }

        TickOutcome {
            seconds_accrued: seconds,
            should_flush,
        }
    }

    fn take_pending(&mut self) -> bool {
        if self.unsaved_seconds == 0 {
            return false;
        }
        self.unsaved_seconds = 0;
        true
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use trainer_core::time::fixed_now;

    fn active_clock(now: DateTime<Utc>) -> StudyClock {
        let mut clock = StudyClock::new(now);
        clock.interaction(now, View::Quiz);
        clock
    }

    #[test]
    fn whole_seconds_drain_and_remainder_carries() {
        let start = fixed_now();
        let mut clock = active_clock(start);

        let out = clock.tick(start + Duration::milliseconds(2500), View::Quiz);
        assert_eq!(out.seconds_accrued, 2);
        assert!(!out.should_flush);
        assert_eq!(clock.carry_ms(), 500);

        // The carry tops up the next tick.
        clock.interaction(start + Duration::milliseconds(2500), View::Quiz);
        let out = clock.tick(start + Duration::milliseconds(3000), View::Quiz);
        assert_eq!(out.seconds_accrued, 1);
        assert_eq!(clock.carry_ms(), 0);
    }

    #[test]
    fn flush_requested_after_ten_pending_seconds() {
        let start = fixed_now();
        let mut clock = active_clock(start);

        let mut now = start;
        for i in 0..9 {
            now += Duration::seconds(1);
            clock.interaction(now, View::Quiz);
            let out = clock.tick(now, View::Quiz);
            assert_eq!(out.seconds_accrued, 1, "tick {i}");
            assert!(!out.should_flush, "tick {i}");
        }

        now += Duration::seconds(1);
        clock.interaction(now, View::Quiz);
        let out = clock.tick(now, View::Quiz);
        assert!(out.should_flush);
        assert_eq!(clock.unsaved_seconds(), 0);
    }

    #[test]
    fn inactivity_cutoff_stops_tracking_and_forces_flush() {
        let start = fixed_now();
        let mut clock = active_clock(start);

        let out = clock.tick(start + Duration::seconds(3), View::Quiz);
        assert_eq!(out.seconds_accrued, 3);
        assert!(!out.should_flush);

        // Next tick arrives past the 2-minute window.
        let late = start + Duration::minutes(3);
        let out = clock.tick(late, View::Quiz);
        assert_eq!(out.seconds_accrued, 0);
        assert!(out.should_flush);
        assert!(!clock.is_active());

        // Still inactive: nothing further accrues or flushes.
        let out = clock.tick(late + Duration::seconds(1), View::Quiz);
        assert_eq!(out, TickOutcome::default());
    }

    #[test]
    fn untrackable_view_deactivates_without_accrual() {
        let start = fixed_now();
        let mut clock = active_clock(start);

        let out = clock.tick(start + Duration::seconds(5), View::Progress);
        assert_eq!(out, TickOutcome::default());
        assert!(!clock.is_active());
    }

    #[test]
    fn interactions_in_untrackable_views_are_ignored() {
        let start = fixed_now();
        let mut clock = StudyClock::new(start);
        clock.interaction(start, View::Progress);
        assert!(!clock.is_active());

        let out = clock.tick(start + Duration::seconds(2), View::Quiz);
        assert_eq!(out, TickOutcome::default());
    }

    #[test]
    fn suspend_flushes_pending_once() {
        let start = fixed_now();
        let mut clock = active_clock(start);
        clock.tick(start + Duration::seconds(4), View::Quiz);

        assert!(clock.suspend());
        assert!(!clock.is_active());
        assert!(!clock.suspend());
    }

    #[test]
    fn celebration_fires_once_per_day() {
        let start = fixed_now();
        let mut clock = StudyClock::new(start);
        let monday = DateKey::from_ymd(2024, 1, 1).unwrap();
        let tuesday = DateKey::from_ymd(2024, 1, 2).unwrap();

        assert!(clock.should_celebrate(monday));
        assert!(!clock.should_celebrate(monday));
        assert!(clock.should_celebrate(tuesday));
    }
}
