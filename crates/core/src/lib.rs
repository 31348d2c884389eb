//! Domain core of the exam trainer: question bank model, per-question
//! mastery state, study progress (streaks, daily goals, study time), and the
//! readiness forecast engine.
//!
//! Everything here is pure and deterministic; clocks and random sources are
//! injected by the service layer.

#![forbid(unsafe_code)]

pub mod error;
pub mod forecast;
pub mod model;
pub mod time;

pub use error::Error;
pub use time::{Clock, DateKey};
