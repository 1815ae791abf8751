//! Single-row inference over the loaded classifier

use crate::error::{Result, ScreeningError};
use crate::features::{FeatureRow, numeric};
use crate::model::{Classifier, ModelError};

/// Outcome of one inference call
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: i64,
    pub probabilities: Vec<f64>,
    /// Highest class probability
    pub confidence: f64,
}

impl Prediction {
    pub fn is_positive(&self) -> bool {
        self.label == 1
    }
}

/// Convert a feature row to the numeric input the classifier expects.
/// Fails on the first value that has no numeric reading.
pub fn numeric_row(row: &FeatureRow) -> Result<Vec<f64>> {
    row.iter()
        .map(|(column, value)| {
            numeric(value).ok_or_else(|| {
                ScreeningError::prediction(format!(
                    "could not convert {column} value {value} to float"
                ))
            })
        })
        .collect()
}

pub fn predict(model: &dyn Classifier, row: &FeatureRow) -> Result<Prediction> {
    let input = numeric_row(row)?;
    let label = model.predict(&input).map_err(model_failure)?;
    let probabilities = model.predict_proba(&input).map_err(model_failure)?;
    let confidence = probabilities
        .iter()
        .copied()
        .fold(None, |best: Option<f64>, p| Some(best.map_or(p, |b| b.max(p))))
        .ok_or_else(|| model_failure(ModelError::EmptyProbabilities))?;

    tracing::debug!("Model prediction: {}", label);
    tracing::debug!("Prediction probabilities: {:?}", probabilities);

    Ok(Prediction {
        label,
        probabilities,
        confidence,
    })
}

fn model_failure(err: ModelError) -> ScreeningError {
    ScreeningError::prediction(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COLUMNS;

    /// Returns fixed probabilities regardless of input
    struct FixedModel(Vec<f64>);

    impl Classifier for FixedModel {
        fn kind(&self) -> &'static str {
            "fixed"
        }

        fn classes(&self) -> &[i64] {
            &[0, 1]
        }

        fn predict_proba(&self, row: &[f64]) -> std::result::Result<Vec<f64>, ModelError> {
            assert_eq!(row.len(), FEATURE_COLUMNS.len());
            Ok(self.0.clone())
        }
    }

    fn row(age: serde_json::Value) -> FeatureRow {
        let mut body = serde_json::Map::new();
        for column in crate::request::REQUIRED_FIELDS {
            body.insert(column.to_string(), serde_json::json!(1));
        }
        body.insert("age".to_string(), age);
        let request =
            crate::request::PredictionRequest::from_value(serde_json::Value::Object(body)).unwrap();
        crate::features::build_features(&request, &crate::model::EncoderSet::new()).unwrap()
    }

    #[test]
    fn test_confidence_is_max_probability() {
        let prediction = predict(&FixedModel(vec![0.27, 0.73]), &row(serde_json::json!(30))).unwrap();
        assert_eq!(prediction.label, 1);
        assert!(prediction.is_positive());
        assert_eq!(prediction.confidence, 0.73);
        assert_eq!(prediction.probabilities, vec![0.27, 0.73]);
    }

    #[test]
    fn test_non_numeric_feature_fails_with_column_name() {
        let err = predict(&FixedModel(vec![0.5, 0.5]), &row(serde_json::json!("adult"))).unwrap_err();
        match err {
            ScreeningError::Prediction { message } => assert!(message.contains("age")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_empty_probabilities_fail() {
        let err = predict(&FixedModel(vec![]), &row(serde_json::json!(30))).unwrap_err();
        assert!(matches!(err, ScreeningError::Prediction { .. }));
    }
}
