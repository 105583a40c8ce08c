mod sections;

use crate::error::Result;
use crate::rubric::{self, RuleTable};
use crate::types::{
    AnswerSnapshot, Contribution, Points, ScoreBreakdown, ScoreOutcome, Section, SectionTotal,
};
use tracing::{debug, info};

/// Scores answer snapshots against one rubric. Holds no state between
/// evaluations, so a single engine can be shared freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine<'a> {
    rubric: &'a RuleTable,
}

impl Default for ScoringEngine<'static> {
    fn default() -> Self {
        Self::new(rubric::standard())
    }
}

impl<'a> ScoringEngine<'a> {
    pub fn new(rubric: &'a RuleTable) -> Self {
        Self { rubric }
    }

    pub fn evaluate(&self, answers: &AnswerSnapshot) -> Result<ScoreOutcome> {
        let contributions = self.contributions(answers)?;
        let policy = self.rubric.policy();

        let mut sections = Vec::with_capacity(Section::ALL.len());
        for section in Section::ALL {
            let raw: Points = contributions
                .iter()
                .filter(|contribution| contribution.field.section() == section)
                .map(|contribution| contribution.points)
                .sum();
            let capped = policy.caps.cap(section, raw);
            debug!(section = section.as_str(), raw, capped, "section scored");
            sections.push(SectionTotal {
                section,
                raw,
                capped,
            });
        }

        let uncapped: Points = sections.iter().map(|total| total.capped).sum();
        let total_score = policy.caps.cap_total(uncapped);
        let breakdown = ScoreBreakdown::from_contributions(&contributions);
        info!(
            total_score,
            entries = breakdown.len(),
            rubric = self.rubric.version(),
            "evaluation complete"
        );

        Ok(ScoreOutcome {
            total_score,
            breakdown,
            sections,
            rubric_version: self.rubric.version().to_string(),
            rubric_fingerprint: self.rubric.fingerprint(),
            warnings: Vec::new(),
        })
    }

    pub fn total_score(&self, answers: &AnswerSnapshot) -> Result<Points> {
        Ok(self.evaluate(answers)?.total_score)
    }

    /// The line items behind the total, derived from the same per-field
    /// contributions the section sums use.
    pub fn breakdown(&self, answers: &AnswerSnapshot) -> Result<ScoreBreakdown> {
        Ok(ScoreBreakdown::from_contributions(
            &self.contributions(answers)?,
        ))
    }

    /// Per-field contributions in section order with exclusivity applied.
    pub fn contributions(&self, answers: &AnswerSnapshot) -> Result<Vec<Contribution>> {
        let mut contributions = Vec::new();
        for section in Section::ALL {
            contributions.extend(sections::section_contributions(
                self.rubric,
                answers,
                section,
            )?);
        }
        self.rubric
            .policy()
            .exclusivity
            .resolve(&mut contributions);
        Ok(contributions)
    }
}

/// Evaluates against the standard rubric.
pub fn evaluate(answers: &AnswerSnapshot) -> Result<ScoreOutcome> {
    ScoringEngine::default().evaluate(answers)
}
