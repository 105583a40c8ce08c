//! Turns loosely typed form answers into an [`AnswerSnapshot`].
//!
//! Form inputs arrive as JSON where numeric fields may be numbers, numeric
//! strings, empty strings or null. Empty means unset. Negative, fractional and
//! non-numeric values never fail the evaluation: they are coerced and reported
//! as [`CoercionWarning`]s. Categorical fields are strict, since a typo there
//! would otherwise score as `none`.

use crate::error::Result;
use crate::types::{
    AnswerSnapshot, FamilyStatus, FieldKey, LivingSituation, Selection, SupporterDisability,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// A numeric form value as submitted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    #[default]
    Unset,
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl From<i64> for NumericInput {
    fn from(value: i64) -> Self {
        NumericInput::Integer(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionReason {
    Negative,
    Fractional,
    NotANumber,
    OutOfRange,
}

impl CoercionReason {
    fn describe(&self) -> &'static str {
        match self {
            CoercionReason::Negative => "negative value clamped to 0",
            CoercionReason::Fractional => "fractional value truncated",
            CoercionReason::NotANumber => "non-numeric value treated as 0",
            CoercionReason::OutOfRange => "value too large, clamped to the maximum",
        }
    }
}

/// Non-fatal notice that an answer was adjusted before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoercionWarning {
    pub field: FieldKey,
    pub raw: String,
    pub coerced: i64,
    pub reason: CoercionReason,
}

impl fmt::Display for CoercionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ('{}' -> {})",
            self.field,
            self.reason.describe(),
            self.raw,
            self.coerced
        )
    }
}

/// Answers exactly as the form submits them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RawAnswers {
    pub disadvantaged: bool,
    pub multiply_disadvantaged: bool,
    pub disabled: bool,
    pub large_family: bool,
    pub family_supporter: bool,
    pub orphan_under_25: bool,
    pub half_orphan_under_25: bool,
    pub child_carer: bool,

    pub foster_care: bool,
    pub guardianship_ended: bool,
    pub orphan_over_25: bool,
    pub half_orphan_over_25: bool,
    pub imagined_paternity: bool,

    pub dependent_siblings: NumericInput,
    pub number_of_children: NumericInput,
    pub single_parent: bool,
    pub cared_for_family_members: NumericInput,

    pub supporter1_disability: Option<String>,
    pub supporter1_pensioner: bool,
    pub supporter1_unemployed: bool,
    pub supporter2_disability: Option<String>,
    pub supporter2_pensioner: bool,
    pub supporter2_unemployed: bool,
    pub family_status: Option<String>,

    pub living_situation: Option<String>,
    pub distance: NumericInput,
    pub health_costs: NumericInput,

    pub self_supporting: bool,
    pub other_social_circumstances: NumericInput,

    pub per_capita_income: NumericInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intake {
    pub answers: AnswerSnapshot,
    pub warnings: Vec<CoercionWarning>,
}

pub fn from_json_str(content: &str) -> Result<Intake> {
    let raw: RawAnswers = serde_json::from_str(content)?;
    coerce(&raw)
}

pub fn coerce(raw: &RawAnswers) -> Result<Intake> {
    let mut warnings = Vec::new();

    let answers = AnswerSnapshot {
        disadvantaged: raw.disadvantaged,
        multiply_disadvantaged: raw.multiply_disadvantaged,
        disabled: raw.disabled,
        large_family: raw.large_family,
        family_supporter: raw.family_supporter,
        orphan_under_25: raw.orphan_under_25,
        half_orphan_under_25: raw.half_orphan_under_25,
        child_carer: raw.child_carer,
        foster_care: raw.foster_care,
        guardianship_ended: raw.guardianship_ended,
        orphan_over_25: raw.orphan_over_25,
        half_orphan_over_25: raw.half_orphan_over_25,
        imagined_paternity: raw.imagined_paternity,
        dependent_siblings: coerce_count(
            FieldKey::DependentSiblings,
            &raw.dependent_siblings,
            &mut warnings,
        ),
        number_of_children: coerce_count(
            FieldKey::NumberOfChildren,
            &raw.number_of_children,
            &mut warnings,
        ),
        single_parent: raw.single_parent,
        cared_for_family_members: coerce_count(
            FieldKey::CaredForFamilyMembers,
            &raw.cared_for_family_members,
            &mut warnings,
        ),
        supporter1_disability: selection(
            FieldKey::Supporter1Disability,
            raw.supporter1_disability.as_deref(),
        )?,
        supporter1_pensioner: raw.supporter1_pensioner,
        supporter1_unemployed: raw.supporter1_unemployed,
        supporter2_disability: selection(
            FieldKey::Supporter2Disability,
            raw.supporter2_disability.as_deref(),
        )?,
        supporter2_pensioner: raw.supporter2_pensioner,
        supporter2_unemployed: raw.supporter2_unemployed,
        family_status: selection::<FamilyStatus>(
            FieldKey::FamilyStatus,
            raw.family_status.as_deref(),
        )?,
        living_situation: selection::<LivingSituation>(
            FieldKey::LivingSituation,
            raw.living_situation.as_deref(),
        )?,
        distance: coerce_count(FieldKey::Distance, &raw.distance, &mut warnings),
        health_costs: coerce_count(FieldKey::HealthCosts, &raw.health_costs, &mut warnings),
        self_supporting: raw.self_supporting,
        other_social_circumstances: coerce_count(
            FieldKey::OtherSocialCircumstances,
            &raw.other_social_circumstances,
            &mut warnings,
        ),
        per_capita_income: coerce_integer(
            FieldKey::PerCapitaIncome,
            &raw.per_capita_income,
            &mut warnings,
        ),
    };

    for warning in &warnings {
        warn!(field = warning.field.as_str(), "{warning}");
    }

    Ok(Intake { answers, warnings })
}

fn selection<S: Selection + Default>(field: FieldKey, value: Option<&str>) -> Result<S> {
    match value.map(str::trim) {
        None | Some("") => Ok(S::default()),
        Some(value) => S::parse_for(field, value),
    }
}

/// Unset counts become 0; anything else is clamped into `u32`.
fn coerce_count(field: FieldKey, input: &NumericInput, warnings: &mut Vec<CoercionWarning>) -> u32 {
    let Some(value) = coerce_integer(field, input, warnings) else {
        return 0;
    };
    if value < 0 {
        warnings.push(CoercionWarning {
            field,
            raw: value.to_string(),
            coerced: 0,
            reason: CoercionReason::Negative,
        });
        return 0;
    }
    u32::try_from(value).unwrap_or_else(|_| {
        warnings.push(CoercionWarning {
            field,
            raw: value.to_string(),
            coerced: i64::from(u32::MAX),
            reason: CoercionReason::OutOfRange,
        });
        u32::MAX
    })
}

fn coerce_integer(
    field: FieldKey,
    input: &NumericInput,
    warnings: &mut Vec<CoercionWarning>,
) -> Option<i64> {
    match input {
        NumericInput::Unset => None,
        NumericInput::Integer(value) => Some(*value),
        NumericInput::Decimal(value) => Some(coerce_decimal(field, *value, warnings)),
        NumericInput::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Ok(value) = trimmed.parse::<i64>() {
                return Some(value);
            }
            match trimmed.parse::<f64>() {
                Ok(value) => Some(coerce_decimal(field, value, warnings)),
                Err(_) => {
                    warnings.push(CoercionWarning {
                        field,
                        raw: trimmed.to_string(),
                        coerced: 0,
                        reason: CoercionReason::NotANumber,
                    });
                    Some(0)
                }
            }
        }
    }
}

fn coerce_decimal(field: FieldKey, value: f64, warnings: &mut Vec<CoercionWarning>) -> i64 {
    if !value.is_finite() {
        warnings.push(CoercionWarning {
            field,
            raw: value.to_string(),
            coerced: 0,
            reason: CoercionReason::NotANumber,
        });
        return 0;
    }
    // Saturating float-to-int cast.
    let truncated = value.trunc() as i64;
    if value.fract() != 0.0 {
        warnings.push(CoercionWarning {
            field,
            raw: value.to_string(),
            coerced: truncated,
            reason: CoercionReason::Fractional,
        });
    }
    truncated
}
