//! Risk tiers, explanation text and recommendations for a prediction

use serde::Serialize;
use serde_json::Value;

use crate::features::number_value;
use crate::predictor::Prediction;
use crate::request::PredictionRequest;

/// AQ-10 totals at or above this suggest further evaluation
pub const AQ_THRESHOLD: f64 = 6.0;

const CONCERN_RECOMMENDATIONS: [&str; 4] = [
    "Consider consulting with a qualified healthcare professional or psychologist who specializes in autism assessment",
    "Keep a journal of your experiences and challenges to discuss with a professional",
    "Research local autism support groups and resources in your area",
    "Remember that this is a screening tool and not a diagnostic instrument",
];

const REASSURANCE_RECOMMENDATIONS: [&str; 4] = [
    "Your responses suggest lower likelihood of autism traits",
    "If you still have concerns, consider speaking with a healthcare professional",
    "Continue to trust your own experiences and seek support if needed",
    "This screening tool is just one data point - your experiences matter most",
];

/// Appended to every recommendation list
pub const DISCLAIMERS: [&str; 3] = [
    "This assessment is for educational purposes only and should not replace professional evaluation",
    "Autism presents differently in each individual, and formal diagnosis requires comprehensive assessment",
    "Consider exploring neurodiversity resources regardless of the screening results",
];

/// Confidence bucket of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            Self::High
        } else if confidence >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Closing sentence of the explanation
    fn interpretation(&self) -> &'static str {
        match self {
            Self::High => {
                "The high confidence level indicates strong alignment with the training data patterns."
            }
            Self::Medium => {
                "The moderate confidence level suggests some uncertainty in the prediction."
            }
            Self::Low => {
                "The lower confidence level indicates significant uncertainty in the prediction."
            }
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// Successful `/api/predict` payload
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub success: bool,
    pub prediction: &'static str,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub aq_total_score: Value,
    pub explanation: String,
    pub recommendations: Vec<String>,
}

/// Percentage rounded to one decimal, e.g. 0.8567 -> 85.7.
/// Rounds the exact binary value, so 0.5625 gives 56.2 just like the
/// `{:.1}` rendering in the explanation.
pub fn confidence_percent(confidence: f64) -> f64 {
    let percent = confidence * 100.0;
    format!("{percent:.1}").parse().unwrap_or(percent)
}

// Strings are shown bare, everything else as JSON
fn display_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "Unknown".to_string(),
    }
}

pub fn explanation(prediction: &Prediction, aq_total: f64, request: &PredictionRequest) -> String {
    let pred_text = if prediction.is_positive() {
        "suggests autism traits"
    } else {
        "does not suggest autism traits"
    };
    let score = number_value(aq_total);

    let mut text = format!(
        "Based on the assessment, the model {} with {:.1}% confidence. ",
        pred_text,
        prediction.confidence * 100.0
    );

    if aq_total >= AQ_THRESHOLD {
        text.push_str(&format!(
            "Your AQ-10 total score is {score}/10, which is above the typical threshold (6+) "
        ));
        text.push_str("that suggests further evaluation may be beneficial. ");
    } else {
        text.push_str(&format!(
            "Your AQ-10 total score is {score}/10, which is below the typical threshold. "
        ));
    }

    let fields = request.fields();
    text.push_str(&format!(
        "This assessment considers your age ({}) and gender ({}) ",
        display_field(fields.get("age")),
        display_field(fields.get("gender"))
    ));
    text.push_str("along with your responses to the AQ-10 screening questions. ");
    text.push_str(RiskLevel::from_confidence(prediction.confidence).interpretation());
    text
}

pub fn recommendations(prediction: &Prediction, aq_total: f64) -> Vec<String> {
    let primary = if prediction.is_positive() || aq_total >= AQ_THRESHOLD {
        CONCERN_RECOMMENDATIONS
    } else {
        REASSURANCE_RECOMMENDATIONS
    };
    primary
        .iter()
        .chain(DISCLAIMERS.iter())
        .map(|s| s.to_string())
        .collect()
}

pub fn respond(
    prediction: &Prediction,
    aq_total: f64,
    request: &PredictionRequest,
) -> PredictionResponse {
    PredictionResponse {
        success: true,
        prediction: if prediction.is_positive() { "YES" } else { "NO" },
        confidence: confidence_percent(prediction.confidence),
        risk_level: RiskLevel::from_confidence(prediction.confidence),
        aq_total_score: number_value(aq_total),
        explanation: explanation(prediction, aq_total, request),
        recommendations: recommendations(prediction, aq_total),
    }
}
