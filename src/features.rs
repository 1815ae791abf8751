//! Feature row assembly.
//!
//! The column order below is the contract with the trained model. A
//! reordered row still predicts, just wrongly, so nothing downstream can
//! detect the mistake.

use serde_json::{Value, json};

use crate::error::{Result, ScreeningError};
use crate::model::{CategoricalEncoder, CategoricalField, EncoderSet};
use crate::questions::score_columns;
use crate::request::PredictionRequest;

/// Model input columns, in training order
pub const FEATURE_COLUMNS: [&str; 19] = [
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
    "result",
    "relation",
];

/// Derived column holding the summed question scores
pub const TOTAL_SCORE_COLUMN: &str = "result";

/// One model input row, aligned with `FEATURE_COLUMNS`
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    values: Vec<Value>,
}

impl FeatureRow {
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        FEATURE_COLUMNS
            .iter()
            .position(|c| *c == column)
            .and_then(|idx| self.values.get(idx))
    }

    /// `(column, value)` pairs in model order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        FEATURE_COLUMNS.iter().copied().zip(self.values.iter())
    }
}

/// Lenient numeric view of a JSON value: numbers, booleans and numeric strings
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// JSON number for `x`, integral when `x` has no fractional part
pub fn number_value(x: f64) -> Value {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 9_007_199_254_740_992.0 {
        json!(x as i64)
    } else {
        json!(x)
    }
}

/// Sum of the ten raw question scores
pub fn aq_total_score(request: &PredictionRequest) -> Result<f64> {
    score_columns().try_fold(0.0, |total, column| {
        let raw = request.get(column);
        numeric(raw).map(|score| total + score).ok_or_else(|| {
            ScreeningError::prediction(format!("unsupported score value for {column}: {raw}"))
        })
    })
}

/// Encode one categorical value.
///
/// Without an encoder the raw value is passed through. Values the encoder
/// does not know are replaced by its first class before encoding, and an
/// encoding failure yields 0; neither aborts the request.
pub fn encode_categorical(
    field: CategoricalField,
    raw: &Value,
    encoder: Option<&dyn CategoricalEncoder>,
) -> Value {
    let Some(encoder) = encoder else {
        return raw.clone();
    };

    let known = raw.as_str().filter(|s| encoder.knows(s));
    let label = match (known, encoder.classes().first()) {
        (Some(s), _) => s,
        (None, Some(first)) => {
            tracing::warn!(
                "Unknown {} value {}, substituting first known class '{}'",
                field.column(),
                raw,
                first
            );
            first.as_str()
        }
        (None, None) => {
            tracing::warn!("Error encoding {}: encoder has no known classes", field.column());
            return json!(0);
        }
    };

    match encoder.transform(label) {
        Ok(code) => json!(code),
        Err(e) => {
            tracing::warn!("Error encoding {}: {}", field.column(), e);
            json!(0)
        }
    }
}

/// Build the model row for a validated request
pub fn build_features(request: &PredictionRequest, encoders: &EncoderSet) -> Result<FeatureRow> {
    let total = aq_total_score(request)?;

    let values = FEATURE_COLUMNS
        .iter()
        .map(|column| {
            if *column == TOTAL_SCORE_COLUMN {
                number_value(total)
            } else if let Some(field) = CategoricalField::from_column(column) {
                encode_categorical(field, request.get(column), encoders.get(field))
            } else {
                request.get(column).clone()
            }
        })
        .collect();

    let row = FeatureRow { values };
    tracing::debug!("Input features: {:?}", row.iter().collect::<Vec<_>>());
    Ok(row)
}
