//! Classifier capability and the JSON model artifact.
//!
//! The artifact mirrors what a scikit-learn exporter can write without
//! pickling: a logistic regression (`coef`, `intercept`) or a tree ensemble
//! in sklearn's parallel-array tree layout. One tree behaves as a decision
//! tree; several trees average their leaf distributions like a random forest.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::FEATURE_COLUMNS;

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// sklearn marks leaves with -1 in `children_left` / `children_right`
const TREE_LEAF: i64 = -1;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("X has {got} features, but the model is expecting {expected} features as input")]
    FeatureCount { expected: usize, got: usize },

    #[error("Input X contains NaN or infinity")]
    NonFinite,

    #[error("model produced no class probabilities")]
    EmptyProbabilities,

    #[error("invalid model artifact: {message}")]
    Invalid { message: String },
}

impl ModelError {
    fn invalid(message: impl Into<String>) -> Self {
        ModelError::Invalid {
            message: message.into(),
        }
    }
}

/// Inference interface of a trained classifier over one feature row
pub trait Classifier: Send + Sync {
    /// Short human-readable model kind, used in start-up logs
    fn kind(&self) -> &'static str;

    /// Class labels, aligned with `predict_proba` output
    fn classes(&self) -> &[i64];

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, ModelError>;

    /// Label of the most probable class; ties go to the earlier class
    fn predict(&self, row: &[f64]) -> Result<i64, ModelError> {
        let proba = self.predict_proba(row)?;
        let mut best: Option<(usize, f64)> = None;
        for (idx, p) in proba.iter().copied().enumerate() {
            if best.is_none_or(|(_, b)| p > b) {
                best = Some((idx, p));
            }
        }
        let (idx, _) = best.ok_or(ModelError::EmptyProbabilities)?;
        self.classes()
            .get(idx)
            .copied()
            .ok_or_else(|| ModelError::invalid(format!("no class label for output {idx}")))
    }
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

/// Serialized classifier as read from the model artifact file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    pub model: Estimator,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression { coef: Vec<f64>, intercept: f64 },
    TreeEnsemble { trees: Vec<Tree> },
}

/// One fitted tree in sklearn's array layout
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class counts (or fractions)
    pub value: Vec<Vec<f64>>,
}

impl ModelArtifact {
    /// Parse and validate an artifact document
    pub fn from_json(content: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact =
            serde_json::from_str(content).map_err(|e| ModelError::invalid(e.to_string()))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check the artifact against the fixed 19-column feature contract
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelError::invalid(format!(
                "unsupported format_version {} (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }
        if let Some(names) = &self.feature_names
            && !names.iter().map(String::as_str).eq(FEATURE_COLUMNS)
        {
            return Err(ModelError::invalid(format!(
                "feature_names {:?} do not match the expected column order {:?}",
                names, FEATURE_COLUMNS
            )));
        }
        if self.classes.is_empty() {
            return Err(ModelError::invalid("no classes"));
        }

        match &self.model {
            Estimator::LogisticRegression { coef, intercept } => {
                if self.classes.len() != 2 {
                    return Err(ModelError::invalid(
                        "logistic regression artifacts must be binary",
                    ));
                }
                if coef.len() != FEATURE_COLUMNS.len() {
                    return Err(ModelError::FeatureCount {
                        expected: FEATURE_COLUMNS.len(),
                        got: coef.len(),
                    });
                }
                if !intercept.is_finite() || coef.iter().any(|c| !c.is_finite()) {
                    return Err(ModelError::invalid("non-finite coefficient"));
                }
            }
            Estimator::TreeEnsemble { trees } => {
                if trees.is_empty() {
                    return Err(ModelError::invalid("tree ensemble has no trees"));
                }
                for (idx, tree) in trees.iter().enumerate() {
                    tree.validate(self.classes.len())
                        .map_err(|e| ModelError::invalid(format!("tree {idx}: {e}")))?;
                }
            }
        }
        Ok(())
    }
}

impl Classifier for ModelArtifact {
    fn kind(&self) -> &'static str {
        match &self.model {
            Estimator::LogisticRegression { .. } => "logistic_regression",
            Estimator::TreeEnsemble { trees } if trees.len() == 1 => "decision_tree",
            Estimator::TreeEnsemble { .. } => "random_forest",
        }
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        if row.len() != FEATURE_COLUMNS.len() {
            return Err(ModelError::FeatureCount {
                expected: FEATURE_COLUMNS.len(),
                got: row.len(),
            });
        }
        if row.iter().any(|x| !x.is_finite()) {
            return Err(ModelError::NonFinite);
        }

        match &self.model {
            Estimator::LogisticRegression { coef, intercept } => {
                let z: f64 = coef.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + intercept;
                let p = sigmoid(z);
                Ok(vec![1.0 - p, p])
            }
            Estimator::TreeEnsemble { trees } => {
                let mut acc = vec![0.0; self.classes.len()];
                for tree in trees {
                    for (a, p) in acc.iter_mut().zip(tree.leaf_distribution(row)) {
                        *a += p;
                    }
                }
                let n = trees.len() as f64;
                Ok(acc.into_iter().map(|a| a / n).collect())
            }
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Tree {
    fn validate(&self, n_classes: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("empty tree".to_string());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("node arrays have different lengths".to_string());
        }
        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF || right == TREE_LEAF {
                if left != right {
                    return Err(format!("node {node} has a single child"));
                }
            } else {
                // sklearn numbers children after their parent; this also rules out cycles
                for child in [left, right] {
                    if child <= node as i64 || child >= n as i64 {
                        return Err(format!("node {node} has out-of-range child {child}"));
                    }
                }
                let feature = self.feature[node];
                if feature < 0 || feature as usize >= FEATURE_COLUMNS.len() {
                    return Err(format!("node {node} splits on unknown feature {feature}"));
                }
            }
            if self.value[node].len() != n_classes {
                return Err(format!(
                    "node {node} has {} class values, expected {n_classes}",
                    self.value[node].len()
                ));
            }
        }
        Ok(())
    }

    /// Normalised class distribution of the leaf `row` lands in
    fn leaf_distribution(&self, row: &[f64]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            let x = row[self.feature[node] as usize];
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        let counts = &self.value[node];
        let total: f64 = counts.iter().sum();
        if total > 0.0 {
            counts.iter().map(|c| c / total).collect()
        } else {
            vec![1.0 / counts.len() as f64; counts.len()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single split on the `result` column (index 17): total <= 5.5 → class 0
    fn stump_json() -> String {
        r#"{
            "format_version": 1,
            "classes": [0, 1],
            "model": {
                "kind": "tree_ensemble",
                "trees": [{
                    "children_left": [1, -1, -1],
                    "children_right": [2, -1, -1],
                    "feature": [17, -2, -2],
                    "threshold": [5.5, -2.0, -2.0],
                    "value": [[50.0, 50.0], [45.0, 5.0], [3.0, 27.0]]
                }]
            }
        }"#
        .to_string()
    }

    fn row_with_total(total: f64) -> Vec<f64> {
        let mut row = vec![0.0; FEATURE_COLUMNS.len()];
        row[17] = total;
        row
    }

    #[test]
    fn test_tree_routes_on_threshold() {
        let model = ModelArtifact::from_json(&stump_json()).unwrap();
        assert_eq!(model.kind(), "decision_tree");

        let low = model.predict_proba(&row_with_total(3.0)).unwrap();
        assert!((low[0] - 0.9).abs() < 1e-12);
        assert_eq!(model.predict(&row_with_total(3.0)).unwrap(), 0);

        let high = model.predict_proba(&row_with_total(8.0)).unwrap();
        assert!((high[1] - 0.9).abs() < 1e-12);
        assert_eq!(model.predict(&row_with_total(8.0)).unwrap(), 1);

        // boundary goes left, like sklearn's `<=`
        assert_eq!(model.predict(&row_with_total(5.5)).unwrap(), 0);
    }

    #[test]
    fn test_forest_averages_trees() {
        let mut model = ModelArtifact::from_json(&stump_json()).unwrap();
        let Estimator::TreeEnsemble { trees } = &mut model.model else {
            panic!("expected a tree ensemble");
        };
        let mut second = trees[0].clone();
        second.value = vec![vec![1.0, 1.0], vec![1.0, 1.0], vec![0.0, 1.0]];
        trees.push(second);
        model.validate().unwrap();
        assert_eq!(model.kind(), "random_forest");

        let proba = model.predict_proba(&row_with_total(8.0)).unwrap();
        assert!((proba[1] - (0.9 + 1.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_logistic_regression_probabilities() {
        let mut coef = vec![0.0; FEATURE_COLUMNS.len()];
        coef[17] = 1.0;
        let model = ModelArtifact {
            format_version: 1,
            feature_names: None,
            classes: vec![0, 1],
            model: Estimator::LogisticRegression {
                coef,
                intercept: -5.0,
            },
        };
        model.validate().unwrap();
        let proba = model.predict_proba(&row_with_total(5.0)).unwrap();
        assert!((proba[0] - 0.5).abs() < 1e-12);
        // tie resolves to the first class
        assert_eq!(model.predict(&row_with_total(5.0)).unwrap(), 0);
        assert_eq!(model.predict(&row_with_total(9.0)).unwrap(), 1);
    }

    #[test]
    fn test_rejects_wrong_row_width_and_nan() {
        let model = ModelArtifact::from_json(&stump_json()).unwrap();
        assert_eq!(
            model.predict_proba(&[1.0, 2.0]),
            Err(ModelError::FeatureCount {
                expected: 19,
                got: 2
            })
        );
        let mut row = row_with_total(1.0);
        row[10] = f64::NAN;
        assert_eq!(model.predict_proba(&row), Err(ModelError::NonFinite));
    }

    #[test]
    fn test_validation_rejects_bad_artifacts() {
        let wrong_version = stump_json().replace("\"format_version\": 1", "\"format_version\": 2");
        assert!(ModelArtifact::from_json(&wrong_version).is_err());

        let cyclic = stump_json().replace("[1, -1, -1]", "[0, -1, -1]");
        assert!(ModelArtifact::from_json(&cyclic).is_err());

        let bad_feature = stump_json().replace("[17, -2, -2]", "[19, -2, -2]");
        assert!(ModelArtifact::from_json(&bad_feature).is_err());

        let short_coef = r#"{"format_version": 1, "model": {"kind": "logistic_regression", "coef": [1.0], "intercept": 0.0}}"#;
        assert!(matches!(
            ModelArtifact::from_json(short_coef),
            Err(ModelError::FeatureCount { got: 1, .. })
        ));
    }

    #[test]
    fn test_feature_names_must_match_column_order() {
        let mut names: Vec<String> = FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect();
        let mut artifact = ModelArtifact::from_json(&stump_json()).unwrap();
        artifact.feature_names = Some(names.clone());
        assert!(artifact.validate().is_ok());

        names.swap(17, 18);
        artifact.feature_names = Some(names);
        assert!(artifact.validate().is_err());
    }
}
