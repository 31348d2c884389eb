use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use storage::ProgressRepository;
use trainer_core::Clock;
use trainer_core::forecast::{Forecast, ForecastEngine};
use trainer_core::model::{ProgressState, Question, QuestionBank};

use crate::error::{ExamError, StudyServiceError};
use crate::exam::ExamSession;
use crate::selector::{SelectorConfig, select_next};
use crate::stats::{ProgressSnapshot, build_snapshot};
use crate::study_clock::{StudyClock, View};

//
// ─── CELEBRATION ───────────────────────────────────────────────────────────────
//

/// Side-effect hook fired when the daily goal is reached, at most once per
/// day. The UI layer plugs its confetti in here.
pub trait CelebrationSink: Send + Sync {
    fn goal_reached(&self, streak: u32);
}

/// Default sink that does nothing.
#[derive(Debug, Default)]
pub struct NoCelebration;

impl CelebrationSink for NoCelebration {
    fn goal_reached(&self, _streak: u32) {}
}

//
// ─── ANSWER OUTCOME ────────────────────────────────────────────────────────────
//

/// What the UI needs to show after one submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// True only on the answer that tipped the question into mastered.
    pub newly_mastered: bool,
}

//
// ─── STUDY SERVICE ─────────────────────────────────────────────────────────────
//

/// Owns the progress state and coordinates selection, study-time tracking,
/// streaks, forecasting and persistence.
///
/// The service is single-threaded by construction; callers drive it from one
/// event loop. Every mutation that matters is persisted through the
/// repository before the call returns, so a crash loses at most the unsaved
/// study-time batch.
pub struct StudyService {
    repo: ProgressRepository,
    progress: ProgressState,
    clock: Clock,
    study: StudyClock,
    selector: SelectorConfig,
    forecaster: ForecastEngine,
    celebration: Arc<dyn CelebrationSink>,
    rng: StdRng,
}

impl StudyService {
    /// Creates a service over the given repository, loading whatever
    /// progress is already stored.
    #[must_use]
    pub fn new(repo: ProgressRepository, clock: Clock) -> Self {
        let progress = repo.load();
        let study = StudyClock::new(clock.now());
        Self {
            repo,
            progress,
            clock,
            study,
            selector: SelectorConfig::default(),
            forecaster: ForecastEngine::default(),
            celebration: Arc::new(NoCelebration),
            rng: StdRng::from_os_rng(),
        }
    }

    #[must_use]
    pub fn with_selector_config(mut self, config: SelectorConfig) -> Self {
        self.selector = config;
        self
    }

    #[must_use]
    pub fn with_forecast_engine(mut self, engine: ForecastEngine) -> Self {
        self.forecaster = engine;
        self
    }

    #[must_use]
    pub fn with_celebration(mut self, sink: Arc<dyn CelebrationSink>) -> Self {
        self.celebration = sink;
        self
    }

    /// Seeds the internal RNG, making selection and exam draws
    /// reproducible.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    //
    // ─── PRACTICE ──────────────────────────────────────────────────────────
    //

    /// Picks the next question to present from the bank.
    pub fn next_question<'a>(&mut self, bank: &'a QuestionBank) -> Option<&'a Question> {
        select_next(bank.questions(), &self.progress, &self.selector, &mut self.rng)
    }

    /// Grades one submitted answer, updates the record and persists.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError::Storage` if the save fails; the record
    /// update itself is already applied.
    pub fn submit_answer(
        &mut self,
        question: &Question,
        choice: char,
    ) -> Result<AnswerOutcome, StudyServiceError> {
        let correct = question.is_correct(choice);
        let newly_mastered =
            self.progress
                .register_answer(&question.id, correct, self.clock.today());
        self.repo.save(&self.progress)?;
        Ok(AnswerOutcome {
            correct,
            newly_mastered,
        })
    }

    /// Starts a timed mock exam from the bank.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Empty` when the bank has no questions.
    pub fn start_exam(&mut self, bank: &QuestionBank) -> Result<ExamSession, ExamError> {
        ExamSession::start(bank, &mut self.rng, self.clock.now())
    }

    //
    // ─── STUDY TIME ────────────────────────────────────────────────────────
    //

    /// Reports a user interaction in the given view.
    pub fn register_interaction(&mut self, view: View) {
        self.study.interaction(self.clock.now(), view);
    }

    /// Drives the 1-second study-time tick.
    ///
    /// Accrued seconds land on today's counter; a completed daily goal
    /// updates the streak, persists, and fires the celebration sink once
    /// per day.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError::Storage` if a flush save fails.
    pub fn tick(&mut self, view: View) -> Result<(), StudyServiceError> {
        let now = self.clock.now();
        let today = self.clock.today();
        let outcome = self.study.tick(now, view);

        let mut unlocked = false;
        if outcome.seconds_accrued > 0 {
            self.progress.add_study_seconds(today, outcome.seconds_accrued);
            unlocked = self.progress.unlock_goal_if_due(today);
            if unlocked {
                log::info!(
                    "daily goal reached on {today}, streak at {}",
                    self.progress.streak.current
                );
                if self.study.should_celebrate(today) {
                    self.celebration.goal_reached(self.progress.streak.current);
                }
            }
        }

        if outcome.should_flush || unlocked {
            self.repo.save(&self.progress)?;
        }
        Ok(())
    }

    /// Stops tracking (view hidden, shutdown) and persists pending time.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError::Storage` if the save fails.
    pub fn suspend(&mut self) -> Result<(), StudyServiceError> {
        if self.study.suspend() {
            self.repo.save(&self.progress)?;
        }
        Ok(())
    }

    //
    // ─── GOALS & STREAK ────────────────────────────────────────────────────
    //

    /// Updates the daily goal and persists immediately.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError::Storage` if the save fails.
    pub fn set_daily_goal_minutes(&mut self, minutes: u32) -> Result<(), StudyServiceError> {
        self.progress.daily_goal_minutes = minutes;
        self.repo.save(&self.progress)?;
        Ok(())
    }

    #[must_use]
    pub fn displayed_streak(&self) -> u32 {
        self.progress.displayed_streak(self.clock.today())
    }

    #[must_use]
    pub fn streak_warning(&self) -> bool {
        self.progress.streak_warning(self.clock.today())
    }

    //
    // ─── ANALYTICS ─────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn forecast(&self, bank: &QuestionBank) -> Forecast {
        self.forecaster.build(
            &self.progress,
            self.progress.mastered_total(),
            bank.len() as u32,
            self.progress.accuracy_pct(),
            self.clock.today(),
        )
    }

    #[must_use]
    pub fn snapshot(&self, bank: &QuestionBank) -> ProgressSnapshot {
        build_snapshot(bank, &self.progress, self.clock.today())
    }

    //
    // ─── PREFERENCES ───────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn translation_enabled(&self) -> bool {
        self.repo.translation_enabled()
    }

    /// # Errors
    ///
    /// Returns `StudyServiceError::Storage` if the flag write fails.
    pub fn set_translation_enabled(&self, enabled: bool) -> Result<(), StudyServiceError> {
        self.repo.set_translation_enabled(enabled)?;
        Ok(())
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Mutable clock access, for advancing a fixed clock in tests.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
