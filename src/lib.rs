//! Rubric-based eligibility scoring for university social-support
//! applications.
//!
//! Answers come in through [`intake`], are scored by [`engine`] against a
//! [`rubric::RuleTable`], and leave as a [`ScoreOutcome`] that [`report`]
//! renders.

pub mod config;
pub mod engine;
pub mod error;
pub mod intake;
pub mod report;
pub mod rubric;
pub mod telemetry;
pub mod types;

pub use engine::{evaluate, ScoringEngine};
pub use error::{Result, ScoreError};
pub use types::{AnswerSnapshot, FieldKey, Points, ScoreBreakdown, ScoreOutcome, Section};
