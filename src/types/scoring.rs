use super::field::{FieldKey, Section};
use crate::intake::CoercionWarning;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

pub type Points = i64;

/// Points one field contributes during a scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub field: FieldKey,
    pub points: Points,
    /// The answer was given (flag set, selection made, income entered, count > 0).
    pub active: bool,
    /// Zeroed by an exclusivity group in favour of a higher-value member.
    pub excluded: bool,
}

impl Contribution {
    pub fn new(field: FieldKey, points: Points, active: bool) -> Self {
        Self {
            field,
            points,
            active,
            excluded: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownEntry {
    pub key: FieldKey,
    pub label: &'static str,
    pub points: Points,
}

/// Ordered line items of a score: section order, then field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    entries: Vec<BreakdownEntry>,
}

impl ScoreBreakdown {
    pub fn from_contributions<'a>(contributions: impl IntoIterator<Item = &'a Contribution>) -> Self {
        let entries = contributions
            .into_iter()
            .filter(|contribution| contribution.points != 0)
            .map(|contribution| BreakdownEntry {
                key: contribution.field,
                label: contribution.field.label(),
                points: contribution.points,
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BreakdownEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: FieldKey) -> Option<&BreakdownEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn points(&self) -> Points {
        self.entries.iter().map(|entry| entry.points).sum()
    }
}

struct LabelledPoints<'a>(&'a BreakdownEntry);

impl Serialize for LabelledPoints<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LabelledPoints", 2)?;
        state.serialize_field("label", self.0.label)?;
        state.serialize_field("points", &self.0.points)?;
        state.end()
    }
}

// Serialized as an object keyed by field so consumers can look entries up by
// key, written in engine order.
impl Serialize for ScoreBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.key.as_str(), &LabelledPoints(entry))?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionTotal {
    pub section: Section,
    pub raw: Points,
    pub capped: Points,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOutcome {
    pub total_score: Points,
    pub breakdown: ScoreBreakdown,
    pub sections: Vec<SectionTotal>,
    pub rubric_version: String,
    pub rubric_fingerprint: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CoercionWarning>,
}

impl ScoreOutcome {
    pub fn with_warnings(mut self, warnings: Vec<CoercionWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn section(&self, section: Section) -> Option<&SectionTotal> {
        self.sections.iter().find(|total| total.section == section)
    }

    pub fn is_capped(&self) -> bool {
        let section_sum: Points = self.sections.iter().map(|total| total.capped).sum();
        section_sum != self.total_score || self.sections.iter().any(|total| total.raw != total.capped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_skips_zero_contributions_and_keeps_order() {
        let contributions = [
            Contribution::new(FieldKey::Disabled, 10, true),
            Contribution::new(FieldKey::LargeFamily, 0, false),
            Contribution::new(FieldKey::PerCapitaIncome, -6, true),
        ];
        let breakdown = ScoreBreakdown::from_contributions(&contributions);
        let keys: Vec<_> = breakdown.iter().map(|entry| entry.key).collect();
        assert_eq!(keys, vec![FieldKey::Disabled, FieldKey::PerCapitaIncome]);
        assert_eq!(breakdown.points(), 4);
    }

    #[test]
    fn breakdown_serializes_as_keyed_object_in_order() {
        let contributions = [
            Contribution::new(FieldKey::LivingSituation, 20, true),
            Contribution::new(FieldKey::Distance, 4, true),
        ];
        let breakdown = ScoreBreakdown::from_contributions(&contributions);
        let json = serde_json::to_string(&breakdown).expect("breakdown serializes");
        assert_eq!(
            json,
            r#"{"livingSituation":{"label":"Lakhatási körülmények","points":20},"distance":{"label":"Lakóhely távolsága","points":4}}"#
        );
    }
}
