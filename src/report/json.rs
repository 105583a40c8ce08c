use crate::rubric::RuleTable;
use crate::types::ScoreOutcome;
use serde::Serialize;

pub fn to_json(outcome: &ScoreOutcome) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(outcome)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RubricDocument<'a> {
    fingerprint: String,
    rules: &'a RuleTable,
}

pub fn rubric_to_json(rubric: &RuleTable) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&RubricDocument {
        fingerprint: rubric.fingerprint(),
        rules: rubric,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;
    use crate::intake::{CoercionReason, CoercionWarning};
    use crate::rubric;
    use crate::types::{AnswerSnapshot, FieldKey, LivingSituation};

    #[test]
    fn json_outcome_contains_total_and_breakdown() {
        let answers = AnswerSnapshot {
            living_situation: LivingSituation::Rent,
            distance: 4,
            ..AnswerSnapshot::default()
        };
        let outcome = engine::evaluate(&answers).expect("evaluates");
        let rendered = to_json(&outcome).expect("json should serialize");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");

        assert_eq!(value["totalScore"], 24);
        assert_eq!(value["breakdown"]["livingSituation"]["points"], 20);
        assert_eq!(value["breakdown"]["distance"]["points"], 4);
        assert_eq!(value["rubricVersion"], "2025/26");
        assert!(value.get("warnings").is_none());
    }

    #[test]
    fn json_outcome_lists_warnings_when_present() {
        let outcome = engine::evaluate(&AnswerSnapshot::default())
            .expect("evaluates")
            .with_warnings(vec![CoercionWarning {
                field: FieldKey::NumberOfChildren,
                raw: "-2".to_string(),
                coerced: 0,
                reason: CoercionReason::Negative,
            }]);
        let rendered = to_json(&outcome).expect("json should serialize");
        assert!(rendered.contains("\"warnings\""));
        assert!(rendered.contains("numberOfChildren"));
    }

    #[test]
    fn rubric_json_carries_fingerprint_and_flags() {
        let rendered = rubric_to_json(rubric::standard()).expect("json should serialize");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(
            value["fingerprint"].as_str().map(str::len),
            Some(64)
        );
        assert_eq!(value["rules"]["flags"]["orphanUnder25"], 17);
        assert_eq!(value["rules"]["perChild"], 7);
    }
}
