pub mod json;
pub mod md;

use crate::error::Result;
use crate::rubric::RuleTable;
use crate::types::ScoreOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render(outcome: &ScoreOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(json::to_json(outcome)?),
        OutputFormat::Md => Ok(md::to_markdown(outcome)),
    }
}

pub fn render_rubric(rubric: &RuleTable, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(json::rubric_to_json(rubric)?),
        OutputFormat::Md => md::rubric_to_markdown(rubric),
    }
}
