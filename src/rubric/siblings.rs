use crate::types::Points;
use serde::Serialize;

/// Stepped points for dependent siblings: a per-count table up to the last
/// entry, then a flat increment for every sibling beyond it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiblingSteps {
    base: Vec<Points>,
    extra_step: Points,
}

impl SiblingSteps {
    pub fn new(base: Vec<Points>, extra_step: Points) -> Self {
        Self { base, extra_step }
    }

    pub fn standard() -> Self {
        Self::new(vec![0, 4, 8, 12, 15, 17, 19], 2)
    }

    pub fn base(&self) -> &[Points] {
        &self.base
    }

    pub fn extra_step(&self) -> Points {
        self.extra_step
    }

    pub fn points(&self, count: i64) -> Points {
        if count <= 0 || self.base.is_empty() {
            return 0;
        }
        let last = self.base.len() - 1;
        match usize::try_from(count) {
            Ok(n) if n <= last => self.base[n],
            _ => {
                let beyond = count - last as i64;
                self.base[last].saturating_add(beyond.saturating_mul(self.extra_step))
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.first() != Some(&0) {
            return Err("sibling steps must start at 0 points for 0 siblings".to_string());
        }
        if self.base.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err("sibling steps must be non-decreasing".to_string());
        }
        if self.extra_step < 0 {
            return Err("sibling extra step must not be negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_values() {
        let steps = SiblingSteps::standard();
        let expected = [(0, 0), (1, 4), (2, 8), (3, 12), (4, 15), (5, 17), (6, 19), (7, 21)];
        for (count, points) in expected {
            assert_eq!(steps.points(count), points, "{count} siblings");
        }
        assert_eq!(steps.points(10), 19 + 4 * 2);
    }

    #[test]
    fn negative_counts_clamp_to_zero() {
        assert_eq!(SiblingSteps::standard().points(-3), 0);
    }

    #[test]
    fn non_decreasing_over_range() {
        let steps = SiblingSteps::standard();
        let mut previous = steps.points(0);
        for count in 1..=200 {
            let current = steps.points(count);
            assert!(current >= previous, "drop at {count}");
            previous = current;
        }
    }

    #[test]
    fn marginal_value_diminishes_then_flattens() {
        let steps = SiblingSteps::standard();
        let marginal: Vec<_> = (1..=9)
            .map(|count| steps.points(count) - steps.points(count - 1))
            .collect();
        assert_eq!(marginal, vec![4, 4, 4, 3, 2, 2, 2, 2, 2]);
    }

    #[test]
    fn validate_rejects_decreasing_table() {
        let steps = SiblingSteps::new(vec![0, 5, 3], 2);
        assert!(steps.validate().is_err());
        assert!(SiblingSteps::standard().validate().is_ok());
    }
}
