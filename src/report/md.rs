use crate::error::Result;
use crate::rubric::{BandTable, RuleTable, SelectionTable};
use crate::types::{
    FamilyStatus, FieldKey, LivingSituation, ScoreOutcome, Section, Selection, SupporterDisability,
};

fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}

pub fn to_markdown(outcome: &ScoreOutcome) -> String {
    let mut output = String::new();
    output.push_str("# Eligibility Score\n\n");
    output.push_str(&format!("Total score: {}\n\n", outcome.total_score));
    output.push_str(&format!(
        "Rubric: {} ({})\n\n",
        outcome.rubric_version,
        short_fingerprint(&outcome.rubric_fingerprint)
    ));

    output.push_str("## Breakdown\n\n");
    if outcome.breakdown.is_empty() {
        output.push_str("- none\n\n");
    } else {
        output.push_str("| Field | Label | Points |\n|---|---|---:|\n");
        for entry in outcome.breakdown.iter() {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                entry.key, entry.label, entry.points
            ));
        }
        output.push('\n');
    }

    output.push_str("## Sections\n\n");
    for total in &outcome.sections {
        if total.raw == total.capped {
            output.push_str(&format!(
                "- {} ({}): {}\n",
                total.section.title(),
                total.section,
                total.capped
            ));
        } else {
            output.push_str(&format!(
                "- {} ({}): {} (capped from {})\n",
                total.section.title(),
                total.section,
                total.capped,
                total.raw
            ));
        }
    }

    if outcome.is_capped() {
        output.push_str("\nCaps applied: breakdown points are before capping.\n");
    }

    if !outcome.warnings.is_empty() {
        output.push_str("\n## Warnings\n\n");
        for warning in &outcome.warnings {
            output.push_str(&format!("- {warning}\n"));
        }
    }

    output
}

fn push_selection_rows<S: Selection>(
    output: &mut String,
    rubric: &RuleTable,
    field: FieldKey,
) -> Result<()>
where
    RuleTable: SelectionTable<S>,
{
    for value in S::ALL.iter().filter(|value| !value.is_none()) {
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            field,
            value.as_str(),
            rubric.selection_points(*value)?
        ));
    }
    Ok(())
}

pub fn rubric_to_markdown(rubric: &RuleTable) -> Result<String> {
    let mut output = String::new();
    output.push_str("# Eligibility Rubric\n\n");
    output.push_str(&format!(
        "Version: {}\n\nFingerprint: {}\n\n",
        rubric.version(),
        rubric.fingerprint()
    ));

    output.push_str("## Flags\n\n| Field | Label | Points |\n|---|---|---:|\n");
    for section in Section::ALL {
        for field in section.fields().iter().filter(|field| field.is_flag()) {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                field,
                field.label(),
                rubric.points_for_flag(*field)?
            ));
        }
    }

    output.push_str("\n## Counts\n\n");
    for field in [FieldKey::NumberOfChildren, FieldKey::CaredForFamilyMembers] {
        if let Some(per_unit) = rubric.per_unit(field) {
            output.push_str(&format!("- {field}: {per_unit} per person\n"));
        }
    }
    let steps = rubric
        .siblings()
        .base()
        .iter()
        .map(|points| points.to_string())
        .collect::<Vec<_>>();
    output.push_str(&format!(
        "- {}: {} then +{} per sibling\n",
        FieldKey::DependentSiblings,
        steps.join(", "),
        rubric.siblings().extra_step()
    ));

    output.push_str("\n## Selections\n\n| Field | Value | Points |\n|---|---|---:|\n");
    push_selection_rows::<SupporterDisability>(
        &mut output,
        rubric,
        FieldKey::Supporter1Disability,
    )?;
    push_selection_rows::<SupporterDisability>(
        &mut output,
        rubric,
        FieldKey::Supporter2Disability,
    )?;
    push_selection_rows::<FamilyStatus>(&mut output, rubric, FieldKey::FamilyStatus)?;
    push_selection_rows::<LivingSituation>(&mut output, rubric, FieldKey::LivingSituation)?;

    output.push_str("\n## Bands\n\n");
    for table in [BandTable::Distance, BandTable::HealthCosts] {
        let codes = rubric
            .band_points(table)
            .map(|(code, points)| format!("{code}={points}"))
            .collect::<Vec<_>>();
        output.push_str(&format!("- {}: {}\n", table.field(), codes.join(", ")));
    }
    output.push_str(&format!(
        "- {}: slider value\n",
        FieldKey::OtherSocialCircumstances
    ));

    output.push_str("\n## Income\n\n| Up to | Points |\n|---:|---:|\n");
    for bracket in rubric.income().brackets() {
        output.push_str(&format!(
            "| {} | {} |\n",
            bracket.upper_inclusive, bracket.points
        ));
    }
    let income = rubric.income();
    output.push_str(&format!(
        "\nFrom {}: {} points, {} for every further {}\n",
        income.high_base(),
        income.high_base_points(),
        income.high_step_points(),
        income.high_step()
    ));

    let policy = rubric.policy();
    output.push_str("\n## Policy\n\n");
    if policy.is_empty() {
        output.push_str("- none\n");
    } else {
        for group in policy.exclusivity.groups() {
            let members = group.iter().map(FieldKey::as_str).collect::<Vec<_>>();
            output.push_str(&format!("- exclusive: {}\n", members.join(", ")));
        }
        for section in Section::ALL {
            if let Some(cap) = policy.caps.get(section) {
                output.push_str(&format!("- cap {section}: {cap}\n"));
            }
        }
        if let Some(cap) = policy.caps.total() {
            output.push_str(&format!("- cap total: {cap}\n"));
        }
    }

    output.push_str("\n## Limits\n\n");
    for (field, max) in rubric.limits().iter() {
        output.push_str(&format!("- {field}: at most {max}\n"));
    }

    Ok(output)
}
