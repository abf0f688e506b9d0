use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::{ComparisonCriterion, ComparisonResult, MAX_ITEMS, MAX_SCORE, MIN_ITEMS, MIN_SCORE};

/// Turn an untrusted generator payload into a [`ComparisonResult`] that both views can
/// read without further checks.
///
/// Only a payload that is structurally unusable is rejected. Anything else is repaired:
/// per-criterion arrays are padded or truncated to the item count, scores are clamped to
/// `[0, 10]`, and out-of-range winner indices become ties. `requested` is the number of
/// items the user asked about; extra items invented upstream are dropped.
pub fn normalize(raw: &Value, requested: usize) -> Result<ComparisonResult, SchemaError> {
    let obj = raw.as_object().ok_or(SchemaError::NotAnObject)?;

    let mut items = string_array(obj, "items")?;
    let summary = string_field(obj, "summary")?;
    let verdict = string_field(obj, "verdict")?;
    let raw_criteria = required(obj, "criteria")?
        .as_array()
        .ok_or(SchemaError::WrongType {
            field: "criteria",
            expected: "an array",
        })?;

    if items.len() < MIN_ITEMS {
        return Err(SchemaError::TooFewItems { found: items.len() });
    }
    let limit = requested.clamp(MIN_ITEMS, MAX_ITEMS);
    if items.len() > limit {
        tracing::warn!(found = items.len(), limit, "dropping surplus items from response");
        items.truncate(limit);
    }

    let criteria: Vec<ComparisonCriterion> = raw_criteria
        .iter()
        .filter_map(|c| {
            let obj = c.as_object();
            if obj.is_none() {
                tracing::warn!(criterion = %c, "skipping criterion that is not an object");
            }
            obj
        })
        .enumerate()
        .map(|(position, c)| normalize_criterion(c, position, items.len()))
        .collect();

    tracing::debug!(
        items = items.len(),
        criteria = criteria.len(),
        "normalized comparison"
    );

    Ok(ComparisonResult {
        items,
        summary,
        verdict,
        criteria,
    })
}

/// Clip a score into `[0, 10]`. NaN counts as no score.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return MIN_SCORE;
    }
    score.clamp(MIN_SCORE, MAX_SCORE)
}

fn normalize_criterion(obj: &Map<String, Value>, position: usize, len: usize) -> ComparisonCriterion {
    let name = match obj.get("name").and_then(Value::as_str) {
        Some(name) => name.to_string(),
        None => format!("Criterion {}", position + 1),
    };

    let mut descriptions: Vec<String> = array(obj, "descriptions")
        .iter()
        .map(description_text)
        .collect();
    descriptions.resize(len, String::new());

    let mut scores: Vec<f64> = array(obj, "scores")
        .iter()
        .map(|s| s.as_f64().map(clamp_score).unwrap_or(MIN_SCORE))
        .collect();
    scores.resize(len, MIN_SCORE);

    ComparisonCriterion {
        name,
        descriptions,
        scores,
        winner_index: winner_index(obj.get("winnerIndex"), len),
    }
}

/// Accept integral numbers in `[0, len)`; anything else is a tie.
fn winner_index(value: Option<&Value>, len: usize) -> Option<usize> {
    let value = value?;
    let index = value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })?;
    usize::try_from(index).ok().filter(|&i| i < len)
}

fn description_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn array<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn required<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, SchemaError> {
    obj.get(field).ok_or(SchemaError::MissingField { field })
}

fn string_field(obj: &Map<String, Value>, field: &'static str) -> Result<String, SchemaError> {
    required(obj, field)?
        .as_str()
        .map(str::to_string)
        .ok_or(SchemaError::WrongType {
            field,
            expected: "a string",
        })
}

fn string_array(obj: &Map<String, Value>, field: &'static str) -> Result<Vec<String>, SchemaError> {
    let wrong_type = SchemaError::WrongType {
        field,
        expected: "an array of strings",
    };
    required(obj, field)?
        .as_array()
        .ok_or_else(|| wrong_type.clone())?
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(|| wrong_type.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(criteria: Value) -> Value {
        json!({
            "items": ["A", "B"],
            "summary": "A is cheaper.",
            "verdict": "Pick A.",
            "criteria": criteria,
        })
    }

    #[test]
    fn well_formed_payload_is_unchanged() {
        let raw = payload(json!([{
            "name": "Cost",
            "descriptions": ["cheap", "pricey"],
            "scores": [9, 3],
            "winnerIndex": 0
        }]));

        let result = normalize(&raw, 2).unwrap();
        assert_eq!(
            result,
            ComparisonResult {
                items: vec!["A".into(), "B".into()],
                summary: "A is cheaper.".into(),
                verdict: "Pick A.".into(),
                criteria: vec![ComparisonCriterion {
                    name: "Cost".into(),
                    descriptions: vec!["cheap".into(), "pricey".into()],
                    scores: vec![9.0, 3.0],
                    winner_index: Some(0),
                }],
            }
        );
        let again = normalize(&serde_json::to_value(&result).unwrap(), 2).unwrap();
        assert_eq!(again, result);
    }

    #[test]
    fn missing_scores_are_filled_with_zero() {
        let raw = payload(json!([{
            "name": "Taste",
            "descriptions": ["sweet", "sour"],
            "winnerIndex": -1
        }]));

        let result = normalize(&raw, 2).unwrap();
        assert_eq!(result.criteria[0].scores, vec![0.0, 0.0]);
        assert_eq!(result.criteria[0].descriptions, vec!["sweet", "sour"]);
    }

    #[test]
    fn short_and_long_arrays_align_to_items() {
        let raw = payload(json!([{
            "name": "Speed",
            "descriptions": ["fast"],
            "scores": [6, 7, 8, 9],
            "winnerIndex": 1
        }]));

        let c = &normalize(&raw, 2).unwrap().criteria[0];
        assert_eq!(c.descriptions, vec!["fast".to_string(), String::new()]);
        assert_eq!(c.scores, vec![6.0, 7.0]);
    }

    #[test]
    fn scores_are_clamped_not_rejected() {
        let raw = payload(json!([{
            "name": "Power",
            "descriptions": ["", ""],
            "scores": [-3.5, 42],
            "winnerIndex": 1
        }]));

        assert_eq!(normalize(&raw, 2).unwrap().criteria[0].scores, vec![0.0, 10.0]);
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp_score(-0.01), 0.0);
        assert_eq!(clamp_score(10.5), 10.0);
        assert_eq!(clamp_score(7.25), 7.25);
        assert_eq!(clamp_score(0.0), 0.0);
        assert_eq!(clamp_score(10.0), 10.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }

    #[test]
    fn out_of_range_winner_becomes_tie() {
        for winner in [json!(7), json!(2), json!(-4), json!(0.5), json!("0"), Value::Null] {
            let raw = payload(json!([{
                "name": "Cost",
                "descriptions": ["a", "b"],
                "scores": [1, 2],
                "winnerIndex": winner
            }]));
            assert_eq!(normalize(&raw, 2).unwrap().criteria[0].winner_index, None);
        }
    }

    #[test]
    fn integral_float_winner_is_accepted() {
        let raw = payload(json!([{ "name": "Cost", "scores": [1, 2], "winnerIndex": 1.0 }]));
        assert_eq!(normalize(&raw, 2).unwrap().criteria[0].winner_index, Some(1));
    }

    #[test]
    fn odd_entries_are_coerced() {
        let raw = payload(json!([
            "not a criterion",
            {
                "descriptions": [null, 12],
                "scores": ["9", 4]
            }
        ]));

        let result = normalize(&raw, 2).unwrap();
        assert_eq!(result.criteria.len(), 1);
        let c = &result.criteria[0];
        assert_eq!(c.name, "Criterion 1");
        assert_eq!(c.descriptions, vec!["".to_string(), "12".to_string()]);
        assert_eq!(c.scores, vec![0.0, 4.0]);
        assert_eq!(c.winner_index, None);
    }

    #[test]
    fn surplus_items_are_truncated_to_request() {
        let raw = json!({
            "items": ["A", "B", "C"],
            "summary": "",
            "verdict": "",
            "criteria": [{ "name": "X", "descriptions": ["a", "b", "c"], "scores": [1, 2, 3], "winnerIndex": 2 }]
        });

        let result = normalize(&raw, 2).unwrap();
        assert_eq!(result.items, vec!["A", "B"]);
        assert_eq!(result.criteria[0].scores, vec![1.0, 2.0]);
        assert_eq!(result.criteria[0].winner_index, None);
    }

    #[test]
    fn structural_failures_are_schema_errors() {
        assert_eq!(normalize(&json!([1, 2]), 2), Err(SchemaError::NotAnObject));

        let mut raw = payload(json!([]));
        raw.as_object_mut().unwrap().remove("verdict");
        assert_eq!(
            normalize(&raw, 2),
            Err(SchemaError::MissingField { field: "verdict" })
        );

        let mut raw = payload(json!([]));
        raw["criteria"] = json!({});
        assert!(matches!(
            normalize(&raw, 2),
            Err(SchemaError::WrongType { field: "criteria", .. })
        ));

        let mut raw = payload(json!([]));
        raw["items"] = json!(["A", 3]);
        assert!(matches!(
            normalize(&raw, 2),
            Err(SchemaError::WrongType { field: "items", .. })
        ));

        let mut raw = payload(json!([]));
        raw["items"] = json!(["solo"]);
        assert_eq!(normalize(&raw, 2), Err(SchemaError::TooFewItems { found: 1 }));
    }

    #[test]
    fn empty_criteria_is_valid() {
        let result = normalize(&payload(json!([])), 2).unwrap();
        assert!(result.criteria.is_empty());
    }
}
