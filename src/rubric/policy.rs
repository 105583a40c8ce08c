use crate::types::{Contribution, FieldKey, Points, Section};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Ceilings on section sums and on the grand total. Empty means no cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionCaps {
    sections: BTreeMap<Section, Points>,
    total: Option<Points>,
}

impl SectionCaps {
    pub fn set(&mut self, section: Section, cap: Points) {
        self.sections.insert(section, cap);
    }

    pub fn set_total(&mut self, cap: Points) {
        self.total = Some(cap);
    }

    pub fn get(&self, section: Section) -> Option<Points> {
        self.sections.get(&section).copied()
    }

    pub fn total(&self) -> Option<Points> {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.total.is_none()
    }

    pub fn cap(&self, section: Section, sum: Points) -> Points {
        match self.get(section) {
            Some(cap) => sum.min(cap),
            None => sum,
        }
    }

    pub fn cap_total(&self, total: Points) -> Points {
        match self.total {
            Some(cap) => total.min(cap),
            None => total,
        }
    }
}

/// Groups of mutually exclusive flags: only the highest-value active member
/// of a group scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExclusivityGroups {
    groups: Vec<Vec<FieldKey>>,
}

impl ExclusivityGroups {
    pub fn new(groups: Vec<Vec<FieldKey>>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[Vec<FieldKey>] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Zeroes every active group member except the winner. Ties go to the
    /// member declared first in the group.
    pub fn resolve(&self, contributions: &mut [Contribution]) {
        for group in &self.groups {
            let mut winner: Option<(FieldKey, Points)> = None;
            for key in group {
                let Some(candidate) = contributions
                    .iter()
                    .find(|contribution| contribution.field == *key && contribution.active)
                else {
                    continue;
                };
                if winner.map_or(true, |(_, best)| candidate.points > best) {
                    winner = Some((*key, candidate.points));
                }
            }

            let Some((winner_key, _)) = winner else {
                continue;
            };
            for contribution in contributions.iter_mut() {
                if contribution.active
                    && contribution.field != winner_key
                    && group.contains(&contribution.field)
                {
                    debug!(
                        field = contribution.field.as_str(),
                        winner = winner_key.as_str(),
                        "exclusivity group suppressed contribution"
                    );
                    contribution.points = 0;
                    contribution.excluded = true;
                }
            }
        }
    }
}

/// Optional rubric policies layered over the point tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoringPolicy {
    pub exclusivity: ExclusivityGroups,
    pub caps: SectionCaps,
}

impl ScoringPolicy {
    pub fn is_empty(&self) -> bool {
        self.exclusivity.is_empty() && self.caps.is_empty()
    }
}

/// Upper clamps applied to count and band answers before scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldLimits {
    limits: BTreeMap<FieldKey, u32>,
}

impl FieldLimits {
    pub fn standard() -> Self {
        let mut limits = Self::default();
        limits.set(FieldKey::Distance, 10);
        limits.set(FieldKey::OtherSocialCircumstances, 10);
        limits
    }

    pub fn set(&mut self, field: FieldKey, max: u32) {
        self.limits.insert(field, max);
    }

    pub fn get(&self, field: FieldKey) -> Option<u32> {
        self.limits.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, u32)> + '_ {
        self.limits.iter().map(|(field, max)| (*field, *max))
    }

    pub fn clamp(&self, field: FieldKey, value: u32) -> u32 {
        match self.get(field) {
            Some(max) => value.min(max),
            None => value,
        }
    }
}
