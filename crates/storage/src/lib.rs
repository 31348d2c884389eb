//! Persistence boundary for the exam trainer: a key-value store contract,
//! the progress-blob repository, and the question-bank loader.

#![forbid(unsafe_code)]

pub mod bank;
pub mod progress_store;
pub mod repository;

pub use bank::parse_question_bank;
pub use progress_store::{PROGRESS_KEY, ProgressRepository, TRANSLATION_PREF_KEY};
pub use repository::{KeyValueStore, MemoryStore, StorageError};
