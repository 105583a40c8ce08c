//! The point tables of the eligibility rubric.
//!
//! A [`RuleTable`] is built once and never mutated while scoring; the
//! standard 2025/26 table is available process-wide through [`standard`].
//! Rubric revisions are expressed by deriving a new table with the
//! `with_*` builders (see `types::config`), never by editing a shared one.

pub mod income;
pub mod policy;
pub mod siblings;

pub use income::{IncomeBracket, IncomeBrackets};
pub use policy::{ExclusivityGroups, FieldLimits, ScoringPolicy, SectionCaps};
pub use siblings::SiblingSteps;

use crate::error::{Result, ScoreError};
use crate::types::{
    FamilyStatus, FieldKey, LivingSituation, Points, Selection, SupporterDisability,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const STANDARD_VERSION: &str = "2025/26";

/// Direct lookup tables keyed by the option code the form submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandTable {
    Distance,
    HealthCosts,
}

impl BandTable {
    pub fn field(&self) -> FieldKey {
        match self {
            BandTable::Distance => FieldKey::Distance,
            BandTable::HealthCosts => FieldKey::HealthCosts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTable {
    version: String,
    flags: BTreeMap<FieldKey, Points>,
    per_child: Points,
    per_cared_member: Points,
    siblings: SiblingSteps,
    income: IncomeBrackets,
    supporter_disability: BTreeMap<SupporterDisability, Points>,
    family_status: BTreeMap<FamilyStatus, Points>,
    living_situation: BTreeMap<LivingSituation, Points>,
    distance: BTreeMap<u32, Points>,
    health_costs: BTreeMap<u32, Points>,
    policy: ScoringPolicy,
    limits: FieldLimits,
}

/// The shared standard rubric.
pub fn standard() -> &'static RuleTable {
    static STANDARD: OnceLock<RuleTable> = OnceLock::new();
    STANDARD.get_or_init(RuleTable::standard)
}

impl RuleTable {
    pub fn standard() -> Self {
        let flags = BTreeMap::from([
            (FieldKey::Disadvantaged, 10),
            (FieldKey::MultiplyDisadvantaged, 15),
            (FieldKey::Disabled, 10),
            (FieldKey::LargeFamily, 5),
            (FieldKey::FamilySupporter, 5),
            (FieldKey::OrphanUnder25, 17),
            (FieldKey::HalfOrphanUnder25, 12),
            (FieldKey::ChildCarer, 7),
            (FieldKey::FosterCare, 6),
            (FieldKey::GuardianshipEnded, 12),
            (FieldKey::OrphanOver25, 17),
            (FieldKey::HalfOrphanOver25, 12),
            (FieldKey::ImaginedPaternity, 5),
            (FieldKey::SingleParent, 5),
            (FieldKey::Supporter1Pensioner, 4),
            (FieldKey::Supporter1Unemployed, 6),
            (FieldKey::Supporter2Pensioner, 4),
            (FieldKey::Supporter2Unemployed, 6),
            (FieldKey::SelfSupporting, 7),
        ]);

        let supporter_disability = BTreeMap::from([
            (SupporterDisability::Cat12, 10),
            (SupporterDisability::Cat3, 8),
            (SupporterDisability::Other, 6),
        ]);
        let family_status = BTreeMap::from([
            (FamilyStatus::DivorcedNoRemarry, 7),
            (FamilyStatus::DivorcedNoSupport, 9),
            (FamilyStatus::SpouseIsSupporter, 4),
        ]);
        let living_situation = BTreeMap::from([
            (LivingSituation::Rent, 20),
            (LivingSituation::Dorm, 15),
            (LivingSituation::Own, 5),
            (LivingSituation::Courtesy, 5),
        ]);

        // Both option lists score their own code.
        let distance = (0..=10).map(|code| (code, Points::from(code))).collect();
        let health_costs = [0, 2, 4, 5, 6, 7, 8]
            .into_iter()
            .map(|code| (code, Points::from(code)))
            .collect();

        Self {
            version: STANDARD_VERSION.to_string(),
            flags,
            per_child: 7,
            per_cared_member: 7,
            siblings: SiblingSteps::standard(),
            income: IncomeBrackets::standard(),
            supporter_disability,
            family_status,
            living_situation,
            distance,
            health_costs,
            policy: ScoringPolicy::default(),
            limits: FieldLimits::standard(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn limits(&self) -> &FieldLimits {
        &self.limits
    }

    pub fn siblings(&self) -> &SiblingSteps {
        &self.siblings
    }

    pub fn income(&self) -> &IncomeBrackets {
        &self.income
    }

    pub fn band_points(&self, table: BandTable) -> impl Iterator<Item = (u32, Points)> + '_ {
        self.band_table(table)
            .iter()
            .map(|(code, points)| (*code, *points))
    }

    /// Fixed points for a boolean flag, looked up by its wire name.
    pub fn points_for(&self, flag_key: &str) -> Result<Points> {
        let field = flag_key
            .parse::<FieldKey>()
            .map_err(|_| ScoreError::UnknownFlag(flag_key.to_string()))?;
        self.points_for_flag(field)
    }

    pub fn points_for_flag(&self, field: FieldKey) -> Result<Points> {
        if !field.is_flag() {
            return Err(ScoreError::UnknownFlag(field.as_str().to_string()));
        }
        self.flags
            .get(&field)
            .copied()
            .ok_or_else(|| ScoreError::MissingRule(field.as_str().to_string()))
    }

    /// Points for a categorical answer given by wire names. `none` scores 0.
    pub fn points_for_selection(&self, enum_key: &str, selection: &str) -> Result<Points> {
        let field = enum_key
            .parse::<FieldKey>()
            .map_err(|_| ScoreError::UnknownCategory(enum_key.to_string()))?;
        match field {
            FieldKey::Supporter1Disability | FieldKey::Supporter2Disability => {
                self.selection_points(SupporterDisability::parse_for(field, selection)?)
            }
            FieldKey::FamilyStatus => {
                self.selection_points(FamilyStatus::parse_for(field, selection)?)
            }
            FieldKey::LivingSituation => {
                self.selection_points(LivingSituation::parse_for(field, selection)?)
            }
            other => Err(ScoreError::UnknownCategory(other.as_str().to_string())),
        }
    }

    pub fn selection_points<S>(&self, selection: S) -> Result<Points>
    where
        S: Selection,
        Self: SelectionTable<S>,
    {
        if selection.is_none() {
            return Ok(0);
        }
        <Self as SelectionTable<S>>::selection_table(self)
            .get(&selection)
            .copied()
            .ok_or_else(|| ScoreError::MissingRule(format!("{}.{}", S::TABLE, selection.as_str())))
    }

    /// Band lookup that never fails: codes outside the table score 0.
    pub fn lookup_band(&self, table: BandTable, code: u32) -> Points {
        self.band_table(table).get(&code).copied().unwrap_or(0)
    }

    pub fn per_unit(&self, field: FieldKey) -> Option<Points> {
        match field {
            FieldKey::NumberOfChildren => Some(self.per_child),
            FieldKey::CaredForFamilyMembers => Some(self.per_cared_member),
            _ => None,
        }
    }

    pub fn sibling_points(&self, count: i64) -> Points {
        self.siblings.points(count)
    }

    pub fn income_points(&self, income: i64) -> Points {
        self.income.points(income)
    }

    fn band_table(&self, table: BandTable) -> &BTreeMap<u32, Points> {
        match table {
            BandTable::Distance => &self.distance,
            BandTable::HealthCosts => &self.health_costs,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_flag_points(mut self, field: FieldKey, points: Points) -> Result<Self> {
        if !field.is_flag() {
            return Err(ScoreError::UnknownFlag(field.as_str().to_string()));
        }
        self.flags.insert(field, points);
        Ok(self)
    }

    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_limits(mut self, limits: FieldLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Checks that every field has a rule and that the piecewise tables keep
    /// their shape.
    pub fn validate(&self) -> Result<()> {
        for field in FieldKey::flags() {
            if !self.flags.contains_key(&field) {
                return Err(ScoreError::MissingRule(field.as_str().to_string()));
            }
        }
        check_selection_table::<SupporterDisability>(&self.supporter_disability)?;
        check_selection_table::<FamilyStatus>(&self.family_status)?;
        check_selection_table::<LivingSituation>(&self.living_situation)?;

        self.siblings.validate().map_err(ScoreError::InvalidRubric)?;
        self.income.validate().map_err(ScoreError::InvalidRubric)?;

        let mut seen = Vec::new();
        for group in self.policy.exclusivity.groups() {
            if group.is_empty() {
                return Err(ScoreError::InvalidRubric(
                    "exclusivity groups must not be empty".to_string(),
                ));
            }
            for field in group {
                if !field.is_flag() {
                    return Err(ScoreError::InvalidRubric(format!(
                        "exclusivity group member {field} is not a boolean flag"
                    )));
                }
                if seen.contains(field) {
                    return Err(ScoreError::InvalidRubric(format!(
                        "{field} appears in more than one exclusivity group"
                    )));
                }
                seen.push(*field);
            }
        }
        Ok(())
    }

    /// Stable digest of every rule, so two outcomes can be checked for having
    /// been scored against the same rubric revision.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("version={};", self.version));
        for (field, points) in &self.flags {
            hasher.update(format!("flag.{field}={points};"));
        }
        hasher.update(format!(
            "perChild={};perCared={};",
            self.per_child, self.per_cared_member
        ));
        hasher.update(format!(
            "siblings={:?}+{};",
            self.siblings.base(),
            self.siblings.extra_step()
        ));
        for bracket in self.income.brackets() {
            hasher.update(format!(
                "income<={}={};",
                bracket.upper_inclusive, bracket.points
            ));
        }
        hasher.update(format!(
            "income>={}={}/{}:{};",
            self.income.high_base(),
            self.income.high_base_points(),
            self.income.high_step(),
            self.income.high_step_points()
        ));
        for (value, points) in &self.supporter_disability {
            hasher.update(format!("supporterDisability.{}={points};", value.as_str()));
        }
        for (value, points) in &self.family_status {
            hasher.update(format!("familyStatus.{}={points};", value.as_str()));
        }
        for (value, points) in &self.living_situation {
            hasher.update(format!("livingSituation.{}={points};", value.as_str()));
        }
        for (code, points) in &self.distance {
            hasher.update(format!("distance.{code}={points};"));
        }
        for (code, points) in &self.health_costs {
            hasher.update(format!("healthCosts.{code}={points};"));
        }
        for group in self.policy.exclusivity.groups() {
            let members: Vec<_> = group.iter().map(FieldKey::as_str).collect();
            hasher.update(format!("exclusive={};", members.join(",")));
        }
        for section in crate::types::Section::ALL {
            if let Some(cap) = self.policy.caps.get(section) {
                hasher.update(format!("cap.{section}={cap};"));
            }
        }
        if let Some(cap) = self.policy.caps.total() {
            hasher.update(format!("cap.total={cap};"));
        }
        for (field, max) in self.limits.iter() {
            hasher.update(format!("limit.{field}={max};"));
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Access to the point table of one selection type.
pub trait SelectionTable<S: Selection> {
    fn selection_table(&self) -> &BTreeMap<S, Points>;
}

impl SelectionTable<SupporterDisability> for RuleTable {
    fn selection_table(&self) -> &BTreeMap<SupporterDisability, Points> {
        &self.supporter_disability
    }
}

impl SelectionTable<FamilyStatus> for RuleTable {
    fn selection_table(&self) -> &BTreeMap<FamilyStatus, Points> {
        &self.family_status
    }
}

impl SelectionTable<LivingSituation> for RuleTable {
    fn selection_table(&self) -> &BTreeMap<LivingSituation, Points> {
        &self.living_situation
    }
}

fn check_selection_table<S: Selection>(table: &BTreeMap<S, Points>) -> Result<()> {
    for value in S::ALL.iter().filter(|value| !value.is_none()) {
        if !table.contains_key(value) {
            return Err(ScoreError::MissingRule(format!(
                "{}.{}",
                S::TABLE,
                value.as_str()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_validates() {
        standard().validate().expect("standard rubric is valid");
        assert_eq!(standard().version(), "2025/26");
        assert!(standard().policy().is_empty());
    }

    #[test]
    fn flag_points_by_wire_name() {
        let rubric = standard();
        let cases = [
            ("disadvantaged", 10),
            ("multiplyDisadvantaged", 15),
            ("orphanUnder25", 17),
            ("guardianshipEnded", 12),
            ("imaginedPaternity", 5),
            ("supporter2Unemployed", 6),
            ("selfSupporting", 7),
        ];
        for (key, points) in cases {
            assert_eq!(rubric.points_for(key).expect("known flag"), points, "{key}");
        }
    }

    #[test]
    fn points_for_rejects_unknown_and_non_flag_keys() {
        let rubric = standard();
        assert!(matches!(
            rubric.points_for("isOrphan"),
            Err(ScoreError::UnknownFlag(_))
        ));
        assert!(matches!(
            rubric.points_for("distance"),
            Err(ScoreError::UnknownFlag(_))
        ));
    }

    #[test]
    fn selection_points_by_wire_name() {
        let rubric = standard();
        assert_eq!(
            rubric
                .points_for_selection("supporter1Disability", "cat12")
                .expect("valid"),
            10
        );
        assert_eq!(
            rubric
                .points_for_selection("familyStatus", "divorcedNoSupport")
                .expect("valid"),
            9
        );
        assert_eq!(
            rubric
                .points_for_selection("livingSituation", "none")
                .expect("valid"),
            0
        );
    }

    #[test]
    fn selection_errors_are_descriptive() {
        let rubric = standard();
        let err = rubric
            .points_for_selection("livingSituation", "tent")
            .expect_err("unknown selection");
        assert!(matches!(err, ScoreError::UnknownSelection { .. }));
        assert!(err.is_config_error());
        assert!(matches!(
            rubric.points_for_selection("distance", "4"),
            Err(ScoreError::UnknownCategory(_))
        ));
    }

    #[test]
    fn band_lookup_defaults_to_zero() {
        let rubric = standard();
        assert_eq!(rubric.lookup_band(BandTable::Distance, 7), 7);
        assert_eq!(rubric.lookup_band(BandTable::Distance, 11), 0);
        assert_eq!(rubric.lookup_band(BandTable::HealthCosts, 5), 5);
        assert_eq!(rubric.lookup_band(BandTable::HealthCosts, 3), 0);
    }

    #[test]
    fn per_unit_multipliers() {
        let rubric = standard();
        assert_eq!(rubric.per_unit(FieldKey::NumberOfChildren), Some(7));
        assert_eq!(rubric.per_unit(FieldKey::CaredForFamilyMembers), Some(7));
        assert_eq!(rubric.per_unit(FieldKey::DependentSiblings), None);
    }

    #[test]
    fn missing_flag_rule_is_reported() {
        let mut rubric = RuleTable::standard();
        rubric.flags.remove(&FieldKey::ChildCarer);
        assert!(matches!(
            rubric.points_for_flag(FieldKey::ChildCarer),
            Err(ScoreError::MissingRule(_))
        ));
        assert!(rubric.validate().is_err());
    }

    #[test]
    fn validate_rejects_key_in_two_groups() {
        let rubric = RuleTable::standard().with_policy(ScoringPolicy {
            exclusivity: ExclusivityGroups::new(vec![
                vec![FieldKey::OrphanUnder25, FieldKey::HalfOrphanUnder25],
                vec![FieldKey::OrphanUnder25, FieldKey::OrphanOver25],
            ]),
            caps: SectionCaps::default(),
        });
        let err = rubric.validate().expect_err("overlapping groups");
        assert!(err.to_string().contains("more than one exclusivity group"));
    }

    #[test]
    fn fingerprint_tracks_rule_changes() {
        let base = RuleTable::standard();
        assert_eq!(base.fingerprint(), standard().fingerprint());
        let revised = RuleTable::standard()
            .with_flag_points(FieldKey::LargeFamily, 6)
            .expect("flag override");
        assert_ne!(base.fingerprint(), revised.fingerprint());
        assert_eq!(base.fingerprint().len(), 64);
    }
}
