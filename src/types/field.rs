use crate::error::ScoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a field is turned into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Flag,
    Count,
    Band,
    Selection,
    Income,
}

/// Rubric sections in scoring and display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Equality,
    Applicant,
    Community,
    Supporters,
    Living,
    Other,
    Income,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Equality,
        Section::Applicant,
        Section::Community,
        Section::Supporters,
        Section::Living,
        Section::Other,
        Section::Income,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Equality => "equality",
            Section::Applicant => "applicant",
            Section::Community => "community",
            Section::Supporters => "supporters",
            Section::Living => "living",
            Section::Other => "other",
            Section::Income => "income",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Equality => "Nyilvántartott esélyegyenlőségi adatok",
            Section::Applicant => "Kérvényező által megadandó adatok",
            Section::Community => "Eltartói közösség körülményei",
            Section::Supporters => "Eltartóra vonatkozó körülmények",
            Section::Living => "Lakhatás, távolság, egészségügyi terhek",
            Section::Other => "Egyéb körülmények",
            Section::Income => "Egy főre eső jövedelem",
        }
    }

    pub fn fields(&self) -> &'static [FieldKey] {
        use FieldKey::*;
        match self {
            Section::Equality => &[
                Disadvantaged,
                MultiplyDisadvantaged,
                Disabled,
                LargeFamily,
                FamilySupporter,
                OrphanUnder25,
                HalfOrphanUnder25,
                ChildCarer,
            ],
            Section::Applicant => &[
                FosterCare,
                GuardianshipEnded,
                OrphanOver25,
                HalfOrphanOver25,
                ImaginedPaternity,
            ],
            Section::Community => &[
                DependentSiblings,
                NumberOfChildren,
                SingleParent,
                CaredForFamilyMembers,
            ],
            Section::Supporters => &[
                Supporter1Disability,
                Supporter1Pensioner,
                Supporter1Unemployed,
                Supporter2Disability,
                Supporter2Pensioner,
                Supporter2Unemployed,
                FamilyStatus,
            ],
            Section::Living => &[LivingSituation, Distance, HealthCosts],
            Section::Other => &[SelfSupporting, OtherSocialCircumstances],
            Section::Income => &[PerCapitaIncome],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ScoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == value)
            .ok_or_else(|| ScoreError::ConfigParse(format!("unknown section: {value}")))
    }
}

/// Every scorable answer field, keyed the way the intake form names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    Disadvantaged,
    MultiplyDisadvantaged,
    Disabled,
    LargeFamily,
    FamilySupporter,
    OrphanUnder25,
    HalfOrphanUnder25,
    ChildCarer,
    FosterCare,
    GuardianshipEnded,
    OrphanOver25,
    HalfOrphanOver25,
    ImaginedPaternity,
    DependentSiblings,
    NumberOfChildren,
    SingleParent,
    CaredForFamilyMembers,
    Supporter1Disability,
    Supporter1Pensioner,
    Supporter1Unemployed,
    Supporter2Disability,
    Supporter2Pensioner,
    Supporter2Unemployed,
    FamilyStatus,
    LivingSituation,
    Distance,
    HealthCosts,
    SelfSupporting,
    OtherSocialCircumstances,
    PerCapitaIncome,
}

impl FieldKey {
    pub const ALL: [FieldKey; 30] = [
        FieldKey::Disadvantaged,
        FieldKey::MultiplyDisadvantaged,
        FieldKey::Disabled,
        FieldKey::LargeFamily,
        FieldKey::FamilySupporter,
        FieldKey::OrphanUnder25,
        FieldKey::HalfOrphanUnder25,
        FieldKey::ChildCarer,
        FieldKey::FosterCare,
        FieldKey::GuardianshipEnded,
        FieldKey::OrphanOver25,
        FieldKey::HalfOrphanOver25,
        FieldKey::ImaginedPaternity,
        FieldKey::DependentSiblings,
        FieldKey::NumberOfChildren,
        FieldKey::SingleParent,
        FieldKey::CaredForFamilyMembers,
        FieldKey::Supporter1Disability,
        FieldKey::Supporter1Pensioner,
        FieldKey::Supporter1Unemployed,
        FieldKey::Supporter2Disability,
        FieldKey::Supporter2Pensioner,
        FieldKey::Supporter2Unemployed,
        FieldKey::FamilyStatus,
        FieldKey::LivingSituation,
        FieldKey::Distance,
        FieldKey::HealthCosts,
        FieldKey::SelfSupporting,
        FieldKey::OtherSocialCircumstances,
        FieldKey::PerCapitaIncome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Disadvantaged => "disadvantaged",
            FieldKey::MultiplyDisadvantaged => "multiplyDisadvantaged",
            FieldKey::Disabled => "disabled",
            FieldKey::LargeFamily => "largeFamily",
            FieldKey::FamilySupporter => "familySupporter",
            FieldKey::OrphanUnder25 => "orphanUnder25",
            FieldKey::HalfOrphanUnder25 => "halfOrphanUnder25",
            FieldKey::ChildCarer => "childCarer",
            FieldKey::FosterCare => "fosterCare",
            FieldKey::GuardianshipEnded => "guardianshipEnded",
            FieldKey::OrphanOver25 => "orphanOver25",
            FieldKey::HalfOrphanOver25 => "halfOrphanOver25",
            FieldKey::ImaginedPaternity => "imaginedPaternity",
            FieldKey::DependentSiblings => "dependentSiblings",
            FieldKey::NumberOfChildren => "numberOfChildren",
            FieldKey::SingleParent => "singleParent",
            FieldKey::CaredForFamilyMembers => "caredForFamilyMembers",
            FieldKey::Supporter1Disability => "supporter1Disability",
            FieldKey::Supporter1Pensioner => "supporter1Pensioner",
            FieldKey::Supporter1Unemployed => "supporter1Unemployed",
            FieldKey::Supporter2Disability => "supporter2Disability",
            FieldKey::Supporter2Pensioner => "supporter2Pensioner",
            FieldKey::Supporter2Unemployed => "supporter2Unemployed",
            FieldKey::FamilyStatus => "familyStatus",
            FieldKey::LivingSituation => "livingSituation",
            FieldKey::Distance => "distance",
            FieldKey::HealthCosts => "healthCosts",
            FieldKey::SelfSupporting => "selfSupporting",
            FieldKey::OtherSocialCircumstances => "otherSocialCircumstances",
            FieldKey::PerCapitaIncome => "perCapitaIncome",
        }
    }

    /// Display label used in score breakdowns.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKey::Disadvantaged => "Hátrányos helyzet",
            FieldKey::MultiplyDisadvantaged => "Halmozottan hátrányos helyzet",
            FieldKey::Disabled => "Fogyatékkal élő",
            FieldKey::LargeFamily => "Nagycsaládos",
            FieldKey::FamilySupporter => "Családfenntartó",
            FieldKey::OrphanUnder25 => "Árva (25 éves korig)",
            FieldKey::HalfOrphanUnder25 => "Félárva (25 éves korig)",
            FieldKey::ChildCarer => "Gyermekgondozó",
            FieldKey::FosterCare => "Tartós nevelésbe vétel",
            FieldKey::GuardianshipEnded => "Gyámság megszűnése",
            FieldKey::OrphanOver25 => "Árva (25 év felett)",
            FieldKey::HalfOrphanOver25 => "Félárva (25 év felett)",
            FieldKey::ImaginedPaternity => "Képzelt apaság",
            FieldKey::DependentSiblings => "Eltartott testvérek",
            FieldKey::NumberOfChildren => "Kérvényező gyermekeinek száma",
            FieldKey::SingleParent => "Gyermekeit egyedül neveli",
            FieldKey::CaredForFamilyMembers => "Ápolásra szoruló családtagok",
            FieldKey::Supporter1Disability => "1. Eltartó rokkantsága",
            FieldKey::Supporter1Pensioner => "1. Eltartó nyugdíjas",
            FieldKey::Supporter1Unemployed => "1. Eltartó munkanélküli",
            FieldKey::Supporter2Disability => "2. Eltartó rokkantsága",
            FieldKey::Supporter2Pensioner => "2. Eltartó nyugdíjas",
            FieldKey::Supporter2Unemployed => "2. Eltartó munkanélküli",
            FieldKey::FamilyStatus => "Családi állapot",
            FieldKey::LivingSituation => "Lakhatási körülmények",
            FieldKey::Distance => "Lakóhely távolsága",
            FieldKey::HealthCosts => "Rendszeres egészségügyi teher",
            FieldKey::SelfSupporting => "Önellátó hallgató",
            FieldKey::OtherSocialCircumstances => "Egyéb szociális körülmény",
            FieldKey::PerCapitaIncome => "Egy főre eső jövedelem",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldKey::DependentSiblings
            | FieldKey::NumberOfChildren
            | FieldKey::CaredForFamilyMembers => FieldKind::Count,
            FieldKey::Distance | FieldKey::HealthCosts | FieldKey::OtherSocialCircumstances => {
                FieldKind::Band
            }
            FieldKey::Supporter1Disability
            | FieldKey::Supporter2Disability
            | FieldKey::FamilyStatus
            | FieldKey::LivingSituation => FieldKind::Selection,
            FieldKey::PerCapitaIncome => FieldKind::Income,
            _ => FieldKind::Flag,
        }
    }

    pub fn is_flag(&self) -> bool {
        self.kind() == FieldKind::Flag
    }

    pub fn section(&self) -> Section {
        Section::ALL
            .into_iter()
            .find(|section| section.fields().contains(self))
            .unwrap_or(Section::Other)
    }

    pub fn flags() -> impl Iterator<Item = FieldKey> {
        FieldKey::ALL.into_iter().filter(FieldKey::is_flag)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = ScoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| ScoreError::UnknownField(value.to_string()))
    }
}
