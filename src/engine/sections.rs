use crate::error::Result;
use crate::rubric::{BandTable, RuleTable};
use crate::types::{AnswerSnapshot, Contribution, FieldKey, FieldKind, Points, Section};

/// Contributions of every field of `section`, in field order, before
/// exclusivity and caps.
pub(crate) fn section_contributions(
    rubric: &RuleTable,
    answers: &AnswerSnapshot,
    section: Section,
) -> Result<Vec<Contribution>> {
    section
        .fields()
        .iter()
        .map(|field| field_contribution(rubric, answers, *field))
        .collect()
}

pub(crate) fn field_contribution(
    rubric: &RuleTable,
    answers: &AnswerSnapshot,
    field: FieldKey,
) -> Result<Contribution> {
    let contribution = match field.kind() {
        FieldKind::Flag => {
            let active = answers.flag(field);
            let points = if active {
                rubric.points_for_flag(field)?
            } else {
                0
            };
            Contribution::new(field, points, active)
        }
        FieldKind::Count => {
            let count = rubric.limits().clamp(field, answers.number(field));
            let points = match rubric.per_unit(field) {
                Some(per_unit) => per_unit.saturating_mul(Points::from(count)),
                None => rubric.sibling_points(i64::from(count)),
            };
            Contribution::new(field, points, count > 0)
        }
        FieldKind::Band => {
            let code = rubric.limits().clamp(field, answers.number(field));
            let points = match field {
                FieldKey::Distance => rubric.lookup_band(BandTable::Distance, code),
                FieldKey::HealthCosts => rubric.lookup_band(BandTable::HealthCosts, code),
                // The slider value is the score.
                _ => Points::from(code),
            };
            Contribution::new(field, points, code > 0)
        }
        FieldKind::Selection => selection_contribution(rubric, answers, field)?,
        FieldKind::Income => match answers.per_capita_income {
            Some(income) => Contribution::new(field, rubric.income_points(income), true),
            None => Contribution::new(field, 0, false),
        },
    };
    Ok(contribution)
}

fn selection_contribution(
    rubric: &RuleTable,
    answers: &AnswerSnapshot,
    field: FieldKey,
) -> Result<Contribution> {
    use crate::types::Selection;

    let (points, active) = match field {
        FieldKey::Supporter1Disability => (
            rubric.selection_points(answers.supporter1_disability)?,
            !answers.supporter1_disability.is_none(),
        ),
        FieldKey::Supporter2Disability => (
            rubric.selection_points(answers.supporter2_disability)?,
            !answers.supporter2_disability.is_none(),
        ),
        FieldKey::FamilyStatus => (
            rubric.selection_points(answers.family_status)?,
            !answers.family_status.is_none(),
        ),
        FieldKey::LivingSituation => (
            rubric.selection_points(answers.living_situation)?,
            !answers.living_situation.is_none(),
        ),
        _ => (0, false),
    };
    Ok(Contribution::new(field, points, active))
}
