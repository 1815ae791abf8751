//! Categorical encoders keyed by an explicit column enumeration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The seven categorical request fields, in feature-column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    Gender,
    Ethnicity,
    Jaundice,
    Autism,
    CountryOfResidence,
    UsedAppBefore,
    Relation,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 7] = [
        CategoricalField::Gender,
        CategoricalField::Ethnicity,
        CategoricalField::Jaundice,
        CategoricalField::Autism,
        CategoricalField::CountryOfResidence,
        CategoricalField::UsedAppBefore,
        CategoricalField::Relation,
    ];

    /// Column name shared by the request body, the encoders artifact and the model
    pub fn column(self) -> &'static str {
        match self {
            CategoricalField::Gender => "gender",
            CategoricalField::Ethnicity => "ethnicity",
            CategoricalField::Jaundice => "jaundice",
            CategoricalField::Autism => "austim",
            CategoricalField::CountryOfResidence => "contry_of_res",
            CategoricalField::UsedAppBefore => "used_app_before",
            CategoricalField::Relation => "relation",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    #[error("y contains previously unseen labels: '{value}'")]
    UnseenLabel { value: String },

    #[error("encoder has no known classes")]
    NoClasses,
}

/// Capability exposed by a per-column encoder
pub trait CategoricalEncoder: Send + Sync + std::fmt::Debug {
    /// Known classes, in encoding order
    fn classes(&self) -> &[String];

    /// Map a known class to its stable integer code
    fn transform(&self, value: &str) -> Result<i64, EncodeError>;

    fn knows(&self, value: &str) -> bool {
        self.classes().iter().any(|c| c == value)
    }
}

/// Encoder whose code is the class's index in `classes`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }
}

impl CategoricalEncoder for LabelEncoder {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn transform(&self, value: &str) -> Result<i64, EncodeError> {
        if self.classes.is_empty() {
            return Err(EncodeError::NoClasses);
        }
        self.classes
            .iter()
            .position(|c| c == value)
            .map(|idx| idx as i64)
            .ok_or_else(|| EncodeError::UnseenLabel {
                value: value.to_string(),
            })
    }
}

/// Loaded encoders, one optional entry per categorical field
#[derive(Debug, Default)]
pub struct EncoderSet {
    encoders: HashMap<CategoricalField, Box<dyn CategoricalEncoder>>,
}

impl EncoderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the encoders artifact: `{"<column>": {"classes": [...]}, ...}`.
    /// Columns that are not categorical request fields are skipped.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, LabelEncoder> = serde_json::from_str(content)?;
        let mut set = Self::new();
        for (column, encoder) in raw {
            match CategoricalField::from_column(&column) {
                Some(field) => set.insert(field, encoder),
                None => tracing::debug!("Ignoring encoder for unknown column '{}'", column),
            }
        }
        Ok(set)
    }

    pub fn insert(&mut self, field: CategoricalField, encoder: impl CategoricalEncoder + 'static) {
        self.encoders.insert(field, Box::new(encoder));
    }

    pub fn get(&self, field: CategoricalField) -> Option<&dyn CategoricalEncoder> {
        self.encoders.get(&field).map(|e| e.as_ref())
    }

    /// Column names with a loaded encoder, in feature order
    pub fn columns(&self) -> Vec<&'static str> {
        CategoricalField::ALL
            .into_iter()
            .filter(|f| self.encoders.contains_key(f))
            .map(CategoricalField::column)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_encoder_codes_follow_class_order() {
        let enc = LabelEncoder::new(["f", "m"]);
        assert_eq!(enc.transform("f"), Ok(0));
        assert_eq!(enc.transform("m"), Ok(1));
        assert!(enc.knows("m"));
        assert!(!enc.knows("x"));
    }

    #[test]
    fn test_label_encoder_rejects_unseen_and_empty() {
        let enc = LabelEncoder::new(["no", "yes"]);
        assert_eq!(
            enc.transform("maybe"),
            Err(EncodeError::UnseenLabel {
                value: "maybe".to_string()
            })
        );
        let empty = LabelEncoder::new(Vec::<String>::new());
        assert_eq!(empty.transform("no"), Err(EncodeError::NoClasses));
    }

    #[test]
    fn test_column_names_round_trip() {
        for field in CategoricalField::ALL {
            assert_eq!(CategoricalField::from_column(field.column()), Some(field));
        }
        assert_eq!(CategoricalField::from_column("country"), None);
    }

    #[test]
    fn test_encoder_set_from_json_skips_unknown_columns() {
        let set = EncoderSet::from_json(
            r#"{
                "relation": {"classes": ["Others", "Parent", "Self"]},
                "gender": {"classes": ["f", "m"]},
                "age_desc": {"classes": ["18 and more"]}
            }"#,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.columns(), vec!["gender", "relation"]);
        let relation = set.get(CategoricalField::Relation).unwrap();
        assert_eq!(relation.transform("Self"), Ok(2));
        assert!(set.get(CategoricalField::Ethnicity).is_none());
    }

    #[test]
    fn test_encoder_set_rejects_malformed_json() {
        assert!(EncoderSet::from_json(r#"{"gender": ["f", "m"]}"#).is_err());
    }
}
