use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use trainer_core::model::{Question, QuestionBank};

use crate::error::ExamError;

/// Questions drawn into one mock exam.
pub const EXAM_QUESTION_COUNT: usize = 40;

/// Wall-clock limit of a mock exam.
pub const EXAM_DURATION: Duration = Duration::minutes(60);

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Outcome of answering one exam question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamAnswer {
    pub correct: bool,
    pub is_complete: bool,
}

/// State reported by the countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamTick {
    pub remaining: Duration,
    /// True on the tick that expired the session at its deadline.
    pub expired: bool,
}

/// Aggregate result of a finished (or running) exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamSummary {
    pub attempted: usize,
    pub answered: u32,
    pub correct: u32,
}

impl ExamSummary {
    /// Session accuracy over the answered questions, whole percent.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn accuracy_pct(&self) -> u32 {
        ((f64::from(self.correct) / f64::from(self.answered.max(1))) * 100.0).round() as u32
    }
}

//
// ─── EXAM SESSION ──────────────────────────────────────────────────────────────
//

/// A timed mock exam over a shuffled subset of the bank.
///
/// The session expires at a fixed deadline (`started_at + 60 min`); the
/// external 1-second countdown driver feeds `tick` and stops once the
/// session reports itself finished. Answer records are not written here;
/// callers route answers through `StudyService::register_answer` exactly
/// like quiz answers.
#[derive(Debug, Clone)]
pub struct ExamSession {
    questions: Vec<Question>,
    current: usize,
    answered: u32,
    correct: u32,
    started_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl ExamSession {
    /// Starts a mock exam from a shuffled draw of the bank.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Empty` when the bank has no questions.
    pub fn start<R>(bank: &QuestionBank, rng: &mut R, now: DateTime<Utc>) -> Result<Self, ExamError>
    where
        R: Rng + ?Sized,
    {
        if bank.is_empty() {
            return Err(ExamError::Empty);
        }

        let mut questions: Vec<Question> = bank.questions().to_vec();
        questions.shuffle(rng);
        questions.truncate(EXAM_QUESTION_COUNT);

        Ok(Self {
            questions,
            current: 0,
            answered: 0,
            correct: 0,
            started_at: now,
            ends_at: now + EXAM_DURATION,
            finished_at: None,
        })
    }

    /// The question currently presented, if the session is still running.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_finished() {
            return None;
        }
        self.questions.get(self.current)
    }

    /// Answers the current question and advances. Answering the last
    /// question completes the session.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Finished` when the session is already over.
    pub fn answer_current(
        &mut self,
        choice: char,
        now: DateTime<Utc>,
    ) -> Result<ExamAnswer, ExamError> {
        let question = self.current_question().ok_or(ExamError::Finished)?;
        let correct = question.is_correct(choice);

        self.answered += 1;
        if correct {
            self.correct += 1;
        }
        self.advance(now);

        Ok(ExamAnswer {
            correct,
            is_complete: self.is_finished(),
        })
    }

    /// Moves past the current question without answering (skip gesture).
    pub fn advance(&mut self, now: DateTime<Utc>) {
        if self.is_finished() {
            return;
        }
        self.current += 1;
        if self.current >= self.questions.len() {
            self.finish(now);
        }
    }

    /// Countdown driver input. Expires the session once the deadline
    /// passes; safe to keep calling afterwards.
    pub fn tick(&mut self, now: DateTime<Utc>) -> ExamTick {
        if self.is_finished() {
            return ExamTick {
                remaining: Duration::zero(),
                expired: false,
            };
        }
        if now >= self.ends_at {
            self.finish(now);
            return ExamTick {
                remaining: Duration::zero(),
                expired: true,
            };
        }
        ExamTick {
            remaining: self.ends_at - now,
            expired: false,
        }
    }

    /// Ends the session early. Idempotent.
    pub fn finish(&mut self, now: DateTime<Utc>) {
        if self.finished_at.is_none() {
            self.finished_at = Some(now);
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Time left on the exam clock, clamped at zero.
    #[must_use]
    pub fn remaining_time(&self, now: DateTime<Utc>) -> Duration {
        (self.ends_at - now).max(Duration::zero())
    }

    #[must_use]
    pub fn summary(&self) -> ExamSummary {
        ExamSummary {
            attempted: self.questions.len(),
            answered: self.answered,
            correct: self.correct,
        }
    }
}

/// Formats a countdown as `MM:SS`, clamped at zero.
#[must_use]
pub fn format_remaining(remaining: Duration) -> String {
    let total_secs = remaining.num_seconds().max(0);
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
