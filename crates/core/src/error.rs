use thiserror::Error;

use crate::model::QuestionError;
use crate::time::DateKeyError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    DateKey(#[from] DateKeyError),
}
