mod answer_record;
mod ids;
mod progress;
mod question;

pub use answer_record::{AnswerRecord, MASTERY_STREAK};
pub use ids::QuestionId;
pub use progress::{DEFAULT_DAILY_GOAL_MINUTES, ProgressState, StreakState};
pub use question::{Question, QuestionBank, QuestionError, VocabPair};
