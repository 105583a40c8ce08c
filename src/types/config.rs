use crate::error::{Result, ScoreError};
use crate::rubric::{ExclusivityGroups, RuleTable, ScoringPolicy};
use crate::types::{FieldKey, Points, Section};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

/// Largest magnitude a configured flag value or cap may take.
pub const MAX_CONFIGURED_POINTS: Points = 1000;

/// A rubric revision layered over the standard table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RubricConfig {
    pub rubric: Option<RubricMeta>,
    #[serde(default)]
    pub points: BTreeMap<String, Points>,
    pub policy: Option<PolicyConfig>,
    pub limits: Option<LimitsConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RubricMeta {
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    #[serde(default)]
    pub exclusivity: Vec<Vec<String>>,
    pub caps: Option<CapsConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapsConfig {
    pub equality: Option<Points>,
    pub applicant: Option<Points>,
    pub community: Option<Points>,
    pub supporters: Option<Points>,
    pub living: Option<Points>,
    pub other: Option<Points>,
    pub income: Option<Points>,
    pub total: Option<Points>,
}

impl CapsConfig {
    fn sections(&self) -> [(Section, Option<Points>); 7] {
        [
            (Section::Equality, self.equality),
            (Section::Applicant, self.applicant),
            (Section::Community, self.community),
            (Section::Supporters, self.supporters),
            (Section::Living, self.living),
            (Section::Other, self.other),
            (Section::Income, self.income),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    pub dependent_siblings_max: Option<i64>,
    pub number_of_children_max: Option<i64>,
    pub cared_for_family_members_max: Option<i64>,
    pub distance_max: Option<i64>,
    pub health_costs_max: Option<i64>,
    pub other_social_circumstances_max: Option<i64>,
}

impl LimitsConfig {
    fn entries(&self) -> [(&'static str, FieldKey, Option<i64>); 6] {
        [
            (
                "dependent_siblings_max",
                FieldKey::DependentSiblings,
                self.dependent_siblings_max,
            ),
            (
                "number_of_children_max",
                FieldKey::NumberOfChildren,
                self.number_of_children_max,
            ),
            (
                "cared_for_family_members_max",
                FieldKey::CaredForFamilyMembers,
                self.cared_for_family_members_max,
            ),
            ("distance_max", FieldKey::Distance, self.distance_max),
            ("health_costs_max", FieldKey::HealthCosts, self.health_costs_max),
            (
                "other_social_circumstances_max",
                FieldKey::OtherSocialCircumstances,
                self.other_social_circumstances_max,
            ),
        ]
    }
}

impl RubricConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(version) = self.rubric.as_ref().and_then(|meta| meta.version.as_ref()) {
            if version.trim().is_empty() {
                return Err(ScoreError::ConfigParse(
                    "rubric.version must not be empty".to_string(),
                ));
            }
        }

        let unknown = self
            .points
            .keys()
            .filter(|key| !key.parse::<FieldKey>().is_ok_and(|field| field.is_flag()))
            .cloned()
            .collect::<Vec<_>>();
        if !unknown.is_empty() {
            return Err(ScoreError::ConfigParse(format!(
                "points contains unknown flag key(s): {}",
                unknown.join(", ")
            )));
        }
        for (key, points) in &self.points {
            check_points_range(&format!("points.{key}"), *points)?;
        }

        if let Some(policy) = &self.policy {
            self.exclusivity_groups()?;
            if let Some(caps) = &policy.caps {
                for (section, cap) in caps.sections() {
                    if let Some(cap) = cap {
                        check_points_range(&format!("policy.caps.{section}"), cap)?;
                    }
                }
                if let Some(total) = caps.total {
                    check_points_range("policy.caps.total", total)?;
                }
            }
        }

        if let Some(limits) = &self.limits {
            for (name, _, max) in limits.entries() {
                if let Some(max) = max {
                    if max < 0 || max > i64::from(u32::MAX) {
                        return Err(ScoreError::ConfigParse(format!(
                            "limits.{name} must be between 0 and {} (found {max})",
                            u32::MAX
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Parses the configured exclusivity groups into field keys.
    pub fn exclusivity_groups(&self) -> Result<Vec<Vec<FieldKey>>> {
        let Some(policy) = &self.policy else {
            return Ok(Vec::new());
        };
        let mut seen = HashSet::<FieldKey>::new();
        let mut groups = Vec::with_capacity(policy.exclusivity.len());
        for (index, group) in policy.exclusivity.iter().enumerate() {
            if group.is_empty() {
                return Err(ScoreError::ConfigParse(format!(
                    "policy.exclusivity[{index}] must not be empty"
                )));
            }
            let mut members = Vec::with_capacity(group.len());
            for key in group {
                let field = key.parse::<FieldKey>().map_err(|_| {
                    ScoreError::ConfigParse(format!(
                        "policy.exclusivity[{index}] contains unknown key: {key}"
                    ))
                })?;
                if !field.is_flag() {
                    return Err(ScoreError::ConfigParse(format!(
                        "policy.exclusivity[{index}] member {key} is not a boolean flag"
                    )));
                }
                if !seen.insert(field) {
                    return Err(ScoreError::ConfigParse(format!(
                        "flag '{key}' cannot appear in more than one exclusivity group"
                    )));
                }
                members.push(field);
            }
            groups.push(members);
        }
        Ok(groups)
    }

    /// Derives a new table from `base` with this revision applied.
    pub fn apply(&self, base: &RuleTable) -> Result<RuleTable> {
        self.validate()?;
        let mut table = base.clone();

        if let Some(version) = self.rubric.as_ref().and_then(|meta| meta.version.as_ref()) {
            table = table.with_version(version.trim());
        }

        for (key, points) in &self.points {
            let field = key.parse::<FieldKey>()?;
            table = table.with_flag_points(field, *points)?;
        }

        if let Some(policy) = &self.policy {
            let mut merged = ScoringPolicy {
                exclusivity: ExclusivityGroups::new(self.exclusivity_groups()?),
                caps: base.policy().caps.clone(),
            };
            if let Some(caps) = &policy.caps {
                for (section, cap) in caps.sections() {
                    if let Some(cap) = cap {
                        merged.caps.set(section, cap);
                    }
                }
                if let Some(total) = caps.total {
                    merged.caps.set_total(total);
                }
            }
            table = table.with_policy(merged);
        }

        if let Some(limits) = &self.limits {
            let mut merged = base.limits().clone();
            for (_, field, max) in limits.entries() {
                if let Some(max) = max {
                    let max = u32::try_from(max).map_err(|_| {
                        ScoreError::ConfigParse(format!("limit for {field} is out of range"))
                    })?;
                    merged.set(field, max);
                }
            }
            table = table.with_limits(merged);
        }

        table.validate()?;
        Ok(table)
    }
}

fn check_points_range(name: &str, points: Points) -> Result<()> {
    if !(-MAX_CONFIGURED_POINTS..=MAX_CONFIGURED_POINTS).contains(&points) {
        return Err(ScoreError::ConfigParse(format!(
            "{name} must be between -{MAX_CONFIGURED_POINTS} and {MAX_CONFIGURED_POINTS} (found {points})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric;

    #[test]
    fn parse_empty_config() {
        let cfg: RubricConfig = toml::from_str("").expect("empty config should parse");
        cfg.validate().expect("empty config should validate");
        let table = cfg.apply(rubric::standard()).expect("apply should succeed");
        assert_eq!(&table, rubric::standard());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[rubric]
version = "2025/26-rev2"

[points]
largeFamily = 6
selfSupporting = 8

[policy]
exclusivity = [["orphanUnder25", "halfOrphanUnder25"], ["orphanOver25", "halfOrphanOver25"]]

[policy.caps]
living = 30
income = 40
total = 150

[limits]
distance_max = 8
number_of_children_max = 5
"#;
        let cfg: RubricConfig = toml::from_str(toml_str).expect("full config should parse");
        let table = cfg.apply(rubric::standard()).expect("apply should succeed");

        assert_eq!(table.version(), "2025/26-rev2");
        assert_eq!(table.points_for("largeFamily").expect("known flag"), 6);
        assert_eq!(table.points_for("selfSupporting").expect("known flag"), 8);
        assert_eq!(table.points_for("disabled").expect("known flag"), 10);
        assert_eq!(table.policy().exclusivity.groups().len(), 2);
        assert_eq!(table.policy().caps.get(Section::Living), Some(30));
        assert_eq!(table.policy().caps.get(Section::Other), None);
        assert_eq!(table.policy().caps.total(), Some(150));
        assert_eq!(table.limits().get(FieldKey::Distance), Some(8));
        assert_eq!(table.limits().get(FieldKey::NumberOfChildren), Some(5));
        assert_eq!(table.limits().get(FieldKey::OtherSocialCircumstances), Some(10));
        assert_ne!(table.fingerprint(), rubric::standard().fingerprint());
    }

    #[test]
    fn unknown_sections_are_rejected_at_parse() {
        let result: std::result::Result<RubricConfig, _> = toml::from_str("[weights]\na = 1\n");
        assert!(result.is_err());
        let result: std::result::Result<RubricConfig, _> =
            toml::from_str("[policy.caps]\nsurplus = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_unknown_point_keys() {
        let cfg: RubricConfig =
            toml::from_str("[points]\nisOrphan = 3\ndistance = 2\n").expect("config should parse");
        let err = cfg.validate().expect_err("unknown keys should fail");
        let message = err.to_string();
        assert!(message.contains("isOrphan"));
        assert!(message.contains("distance"));
    }

    #[test]
    fn validate_rejects_out_of_range_points() {
        let cfg: RubricConfig =
            toml::from_str("[points]\ndisabled = 5000\n").expect("config should parse");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_exclusivity_groups() {
        let cases = [
            "[policy]\nexclusivity = [[]]\n",
            "[policy]\nexclusivity = [[\"distance\", \"disabled\"]]\n",
            "[policy]\nexclusivity = [[\"nope\"]]\n",
            "[policy]\nexclusivity = [[\"orphanUnder25\"], [\"orphanUnder25\", \"orphanOver25\"]]\n",
        ];
        for toml_str in cases {
            let cfg: RubricConfig = toml::from_str(toml_str).expect("config should parse");
            let err = cfg.validate().expect_err("bad group should fail");
            assert!(err.is_config_error(), "{toml_str}");
        }
    }

    #[test]
    fn validate_rejects_negative_limits() {
        let cfg: RubricConfig =
            toml::from_str("[limits]\ndistance_max = -1\n").expect("config should parse");
        let err = cfg.validate().expect_err("negative limit should fail");
        assert!(err.to_string().contains("limits.distance_max"));
    }
}
