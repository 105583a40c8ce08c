pub mod answers;
pub mod config;
pub mod field;
pub mod scoring;

pub use answers::{AnswerSnapshot, FamilyStatus, LivingSituation, Selection, SupporterDisability};
pub use field::{FieldKey, FieldKind, Section};
pub use scoring::{
    BreakdownEntry, Contribution, Points, ScoreBreakdown, ScoreOutcome, SectionTotal,
};
