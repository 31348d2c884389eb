//! Session-level services: adaptive question selection, study-time
//! tracking, timed mock exams, dashboard statistics and the coordinating
//! `StudyService`.

#![forbid(unsafe_code)]

pub mod error;
pub mod exam;
pub mod selector;
pub mod stats;
pub mod study_clock;
pub mod study_service;

pub use error::{ExamError, StudyServiceError};
pub use exam::{ExamSession, ExamSummary, format_remaining};
pub use selector::{SelectorConfig, select_next};
pub use stats::{ProgressSnapshot, build_snapshot};
pub use study_clock::{StudyClock, View};
pub use study_service::{AnswerOutcome, CelebrationSink, StudyService};
