use super::field::FieldKey;
use crate::error::{Result, ScoreError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A categorical answer with an explicit `none` sentinel.
pub trait Selection: Copy + Ord + fmt::Debug + 'static {
    /// Rubric table name shared by every field using this selection.
    const TABLE: &'static str;
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn is_none(&self) -> bool;

    fn parse_for(field: FieldKey, value: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| ScoreError::UnknownSelection {
                field: field.as_str().to_string(),
                value: value.to_string(),
                expected: Self::ALL
                    .iter()
                    .map(|candidate| candidate.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum SupporterDisability {
    #[default]
    None,
    Cat12,
    Cat3,
    Other,
}

impl Selection for SupporterDisability {
    const TABLE: &'static str = "supporterDisability";
    const ALL: &'static [Self] = &[Self::None, Self::Cat12, Self::Cat3, Self::Other];

    fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Cat12 => "cat12",
            Self::Cat3 => "cat3",
            Self::Other => "other",
        }
    }

    fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum FamilyStatus {
    #[default]
    None,
    DivorcedNoRemarry,
    DivorcedNoSupport,
    SpouseIsSupporter,
}

impl Selection for FamilyStatus {
    const TABLE: &'static str = "familyStatus";
    const ALL: &'static [Self] = &[
        Self::None,
        Self::DivorcedNoRemarry,
        Self::DivorcedNoSupport,
        Self::SpouseIsSupporter,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DivorcedNoRemarry => "divorcedNoRemarry",
            Self::DivorcedNoSupport => "divorcedNoSupport",
            Self::SpouseIsSupporter => "spouseIsSupporter",
        }
    }

    fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum LivingSituation {
    #[default]
    None,
    Rent,
    Dorm,
    Own,
    Courtesy,
}

impl Selection for LivingSituation {
    const TABLE: &'static str = "livingSituation";
    const ALL: &'static [Self] = &[
        Self::None,
        Self::Rent,
        Self::Dorm,
        Self::Own,
        Self::Courtesy,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rent => "rent",
            Self::Dorm => "dorm",
            Self::Own => "own",
            Self::Courtesy => "courtesy",
        }
    }

    fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Coerced applicant answers for one evaluation.
///
/// Counts and band codes are already non-negative integers here; the only
/// distinction between "unset" and zero that survives intake is the income,
/// because an unset income scores nothing while a zero income scores the
/// lowest bracket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSnapshot {
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

    pub dependent_siblings: u32,
    pub number_of_children: u32,
    pub single_parent: bool,
    pub cared_for_family_members: u32,

    pub supporter1_disability: SupporterDisability,
    pub supporter1_pensioner: bool,
    pub supporter1_unemployed: bool,
    pub supporter2_disability: SupporterDisability,
    pub supporter2_pensioner: bool,
    pub supporter2_unemployed: bool,
    pub family_status: FamilyStatus,

    pub living_situation: LivingSituation,
    pub distance: u32,
    pub health_costs: u32,

    pub self_supporting: bool,
    pub other_social_circumstances: u32,

    pub per_capita_income: Option<i64>,
}

impl AnswerSnapshot {
    /// Value of a boolean flag; `false` for keys that are not flags.
    pub fn flag(&self, key: FieldKey) -> bool {
        match key {
            FieldKey::Disadvantaged => self.disadvantaged,
            FieldKey::MultiplyDisadvantaged => self.multiply_disadvantaged,
            FieldKey::Disabled => self.disabled,
            FieldKey::LargeFamily => self.large_family,
            FieldKey::FamilySupporter => self.family_supporter,
            FieldKey::OrphanUnder25 => self.orphan_under_25,
            FieldKey::HalfOrphanUnder25 => self.half_orphan_under_25,
            FieldKey::ChildCarer => self.child_carer,
            FieldKey::FosterCare => self.foster_care,
            FieldKey::GuardianshipEnded => self.guardianship_ended,
            FieldKey::OrphanOver25 => self.orphan_over_25,
            FieldKey::HalfOrphanOver25 => self.half_orphan_over_25,
            FieldKey::ImaginedPaternity => self.imagined_paternity,
            FieldKey::SingleParent => self.single_parent,
            FieldKey::Supporter1Pensioner => self.supporter1_pensioner,
            FieldKey::Supporter1Unemployed => self.supporter1_unemployed,
            FieldKey::Supporter2Pensioner => self.supporter2_pensioner,
            FieldKey::Supporter2Unemployed => self.supporter2_unemployed,
            FieldKey::SelfSupporting => self.self_supporting,
            _ => false,
        }
    }

    /// Raw numeric value of a count or band field, before rubric limits.
    pub fn number(&self, key: FieldKey) -> u32 {
        match key {
            FieldKey::DependentSiblings => self.dependent_siblings,
            FieldKey::NumberOfChildren => self.number_of_children,
            FieldKey::CaredForFamilyMembers => self.cared_for_family_members,
            FieldKey::Distance => self.distance,
            FieldKey::HealthCosts => self.health_costs,
            FieldKey::OtherSocialCircumstances => self.other_social_circumstances,
            _ => 0,
        }
    }

    pub fn set_flag(&mut self, key: FieldKey, value: bool) -> Result<()> {
        let slot = match key {
            FieldKey::Disadvantaged => &mut self.disadvantaged,
            FieldKey::MultiplyDisadvantaged => &mut self.multiply_disadvantaged,
            FieldKey::Disabled => &mut self.disabled,
            FieldKey::LargeFamily => &mut self.large_family,
            FieldKey::FamilySupporter => &mut self.family_supporter,
            FieldKey::OrphanUnder25 => &mut self.orphan_under_25,
            FieldKey::HalfOrphanUnder25 => &mut self.half_orphan_under_25,
            FieldKey::ChildCarer => &mut self.child_carer,
            FieldKey::FosterCare => &mut self.foster_care,
            FieldKey::GuardianshipEnded => &mut self.guardianship_ended,
            FieldKey::OrphanOver25 => &mut self.orphan_over_25,
            FieldKey::HalfOrphanOver25 => &mut self.half_orphan_over_25,
            FieldKey::ImaginedPaternity => &mut self.imagined_paternity,
            FieldKey::SingleParent => &mut self.single_parent,
            FieldKey::Supporter1Pensioner => &mut self.supporter1_pensioner,
            FieldKey::Supporter1Unemployed => &mut self.supporter1_unemployed,
            FieldKey::Supporter2Pensioner => &mut self.supporter2_pensioner,
            FieldKey::Supporter2Unemployed => &mut self.supporter2_unemployed,
            FieldKey::SelfSupporting => &mut self.self_supporting,
            other => return Err(ScoreError::UnknownFlag(other.as_str().to_string())),
        };
        *slot = value;
        Ok(())
    }
}
