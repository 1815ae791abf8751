//! Prediction request validation
//!
//! Only key presence is checked here. Values flow downstream untouched and
//! surface as encoding fallbacks or prediction failures.

use serde_json::{Map, Value};

use crate::error::{Result, ScreeningError};

/// The 18 keys every prediction request must carry, in reporting order.
/// `austim` and `contry_of_res` are the historical wire names.
pub const REQUIRED_FIELDS: [&str; 18] = [
    "A1_Score",
    "A2_Score",
    "A3_Score",
    "A4_Score",
    "A5_Score",
    "A6_Score",
    "A7_Score",
    "A8_Score",
    "A9_Score",
    "A10_Score",
    "age",
    "gender",
    "ethnicity",
    "jaundice",
    "austim",
    "contry_of_res",
    "used_app_before",
    "relation",
];

/// A request body that carries every required field
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    fields: Map<String, Value>,
}

impl PredictionRequest {
    /// Parse and validate a raw request body
    pub fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ScreeningError::NoData);
        }
        let value: Value =
            serde_json::from_slice(body).map_err(|e| ScreeningError::InvalidJson {
                message: e.to_string(),
            })?;
        Self::from_value(value)
    }

    /// Validate an already-parsed JSON body.
    /// Empty scalars and arrays count as no data. Any other non-object body
    /// has no keys, so every required field is reported.
    pub fn from_value(value: Value) -> Result<Self> {
        let fields = match value {
            Value::Object(map) => map,
            other if is_empty_body(&other) => return Err(ScreeningError::NoData),
            _ => Map::new(),
        };

        let missing = missing_fields(&fields);
        if !missing.is_empty() {
            return Err(ScreeningError::MissingFields { fields: missing });
        }
        Ok(Self { fields })
    }

    /// Value of a required field. Presence is guaranteed by validation.
    pub fn get(&self, field: &str) -> &Value {
        self.fields.get(field).unwrap_or(&Value::Null)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

// `{}` is deliberately not empty here: it reports all 18 fields
fn is_empty_body(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

/// Every required key absent from `fields`, in required-field order
pub fn missing_fields(fields: &Map<String, Value>) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|name| !fields.contains_key(**name))
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_body() -> Value {
        json!({
            "A1_Score": 1, "A2_Score": 0, "A3_Score": 1, "A4_Score": 0, "A5_Score": 1,
            "A6_Score": 0, "A7_Score": 1, "A8_Score": 0, "A9_Score": 1, "A10_Score": 0,
            "age": 31, "gender": "f", "ethnicity": "White-European", "jaundice": "no",
            "austim": "no", "contry_of_res": "Germany", "used_app_before": "no",
            "relation": "Self"
        })
    }

    #[test]
    fn test_complete_body_validates() {
        let request = PredictionRequest::from_value(complete_body()).unwrap();
        assert_eq!(request.get("gender"), &json!("f"));
        assert_eq!(request.fields().len(), 18);
    }

    #[test]
    fn test_missing_fields_reported_in_required_order() {
        let mut body = complete_body();
        let map = body.as_object_mut().unwrap();
        map.remove("relation");
        map.remove("A3_Score");
        map.remove("age");

        match PredictionRequest::from_value(body) {
            Err(ScreeningError::MissingFields { fields }) => {
                assert_eq!(fields, vec!["A3_Score", "age", "relation"]);
            }
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_object_reports_all_fields() {
        match PredictionRequest::from_value(json!({})) {
            Err(ScreeningError::MissingFields { fields }) => {
                assert_eq!(fields, REQUIRED_FIELDS.to_vec());
            }
            other => panic!("expected missing fields, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_body_has_no_fields() {
        let err = PredictionRequest::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ScreeningError::MissingFields { ref fields } if fields.len() == 18));
    }

    #[test]
    fn test_absent_body_is_no_data() {
        assert!(matches!(
            PredictionRequest::from_body(b""),
            Err(ScreeningError::NoData)
        ));
        assert!(matches!(
            PredictionRequest::from_body(b"  \n"),
            Err(ScreeningError::NoData)
        ));
        assert!(matches!(
            PredictionRequest::from_body(b"null"),
            Err(ScreeningError::NoData)
        ));
    }

    #[test]
    fn test_falsy_bodies_are_no_data() {
        let bodies: [&[u8]; 5] = [b"[]", b"\"\"", b"false", b"0", b"0.0"];
        for raw in bodies {
            assert!(
                matches!(PredictionRequest::from_body(raw), Err(ScreeningError::NoData)),
                "{}",
                String::from_utf8_lossy(raw)
            );
        }
        for body in [json!(true), json!(7), json!("x")] {
            let err = PredictionRequest::from_value(body).unwrap_err();
            assert!(matches!(err, ScreeningError::MissingFields { ref fields } if fields.len() == 18));
        }
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = PredictionRequest::from_body(b"{\"age\": ").unwrap_err();
        assert!(matches!(err, ScreeningError::InvalidJson { .. }));
    }

    #[test]
    fn test_extra_keys_and_wrong_types_pass() {
        let mut body = complete_body();
        body["age"] = json!("thirty");
        body["comment"] = json!("ignored");
        assert!(PredictionRequest::from_value(body).is_ok());
    }
}
