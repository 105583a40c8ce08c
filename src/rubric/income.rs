use crate::types::Points;
use serde::Serialize;

/// Upper-inclusive income band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeBracket {
    pub upper_inclusive: i64,
    pub points: Points,
}

const STANDARD_BRACKETS: [(i64, Points); 17] = [
    (59_999, 45),
    (64_999, 42),
    (69_999, 39),
    (74_999, 36),
    (79_999, 33),
    (84_999, 30),
    (89_999, 27),
    (94_999, 24),
    (99_999, 21),
    (104_999, 18),
    (109_999, 15),
    (114_999, 12),
    (119_999, 9),
    (124_999, 6),
    (129_999, 3),
    (159_999, 0),
    (164_999, -3),
];

/// Per-capita income scoring: explicit brackets, then an open-ended tail that
/// keeps subtracting a fixed amount per step above the high-income base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeBrackets {
    brackets: Vec<IncomeBracket>,
    high_base: i64,
    high_base_points: Points,
    high_step: i64,
    high_step_points: Points,
}

impl IncomeBrackets {
    pub fn standard() -> Self {
        Self {
            brackets: STANDARD_BRACKETS
                .iter()
                .map(|&(upper_inclusive, points)| IncomeBracket {
                    upper_inclusive,
                    points,
                })
                .collect(),
            high_base: 165_000,
            high_base_points: -6,
            high_step: 5_000,
            high_step_points: -3,
        }
    }

    pub fn brackets(&self) -> &[IncomeBracket] {
        &self.brackets
    }

    pub fn high_base(&self) -> i64 {
        self.high_base
    }

    pub fn high_base_points(&self) -> Points {
        self.high_base_points
    }

    pub fn high_step(&self) -> i64 {
        self.high_step
    }

    pub fn high_step_points(&self) -> Points {
        self.high_step_points
    }

    pub fn points(&self, income: i64) -> Points {
        if income < 0 {
            return 0;
        }
        if let Some(bracket) = self
            .brackets
            .iter()
            .find(|bracket| income <= bracket.upper_inclusive)
        {
            return bracket.points;
        }
        if income >= self.high_base && self.high_step > 0 {
            let steps = (income - self.high_base).div_euclid(self.high_step);
            return self
                .high_base_points
                .saturating_sub(steps.saturating_mul(self.high_step_points.abs()));
        }
        0
    }

    /// Brackets must ascend, never award more for a higher income, and hand
    /// over to the tail without a gap or an upward jump.
    pub fn validate(&self) -> Result<(), String> {
        for pair in self.brackets.windows(2) {
            if pair[1].upper_inclusive <= pair[0].upper_inclusive {
                return Err(format!(
                    "income bracket bounds must ascend ({} after {})",
                    pair[1].upper_inclusive, pair[0].upper_inclusive
                ));
            }
            if pair[1].points > pair[0].points {
                return Err(format!(
                    "income points must not increase with income ({} -> {})",
                    pair[0].points, pair[1].points
                ));
            }
        }
        if self.high_step <= 0 {
            return Err("high income step must be positive".to_string());
        }
        if let Some(last) = self.brackets.last() {
            if last.upper_inclusive + 1 != self.high_base {
                return Err(format!(
                    "high income base {} must follow the last bracket bound {}",
                    self.high_base, last.upper_inclusive
                ));
            }
            if self.high_base_points > last.points {
                return Err("high income base points exceed the last bracket".to_string());
            }
        }
        Ok(())
    }
}
