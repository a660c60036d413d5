use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Advice attached to every prediction, whatever produced the diagnosis.
pub const RECOMMENDATIONS: &[&str] = &["Rest and hydration", "Consult a doctor if symptoms persist"];

pub const UNAVAILABLE_DIAGNOSIS: &str = "System temporarily unavailable";
pub const UNAVAILABLE_CONFIDENCE: f64 = 0.6;
/// Confidence reported when the model yields a label but no distribution.
pub const DEFAULT_MODEL_CONFIDENCE: f64 = 0.85;

/// Raw `/predict` form fields before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictForm {
    pub age: Option<String>,
    pub gender: Option<String>,
    pub symptoms: Option<String>,
    pub medical_history: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub age: u32,
    pub gender: String,
    pub symptoms: String,
    pub medical_history: Option<String>,
}

impl TryFrom<PredictForm> for PredictionRequest {
    type Error = ValidationError;

    fn try_from(form: PredictForm) -> Result<Self, Self::Error> {
        let age_raw = required("age", form.age)?;
        let age = age_raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::bad_input("age", format!("expected a non-negative integer, got '{age_raw}'")))?;
        let gender = required("gender", form.gender)?;
        let symptoms = required("symptoms", form.symptoms)?;
        let medical_history = form
            .medical_history
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(PredictionRequest { age, gender, symptoms, medical_history })
    }
}

fn required(field: &'static str, v: Option<String>) -> Result<String, ValidationError> {
    match v {
        Some(s) if !s.trim().is_empty() => Ok(s),
        Some(_) => Err(ValidationError::bad_input(field, "must not be empty")),
        None => Err(ValidationError::bad_input(field, "field required")),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub diagnosis: String,
    pub confidence: f64,
    pub recommendations: Vec<String>,
    pub model_used: bool,
}

impl PredictionResponse {
    pub fn unavailable() -> Self {
        Self::build(UNAVAILABLE_DIAGNOSIS.to_string(), UNAVAILABLE_CONFIDENCE, false)
    }

    pub fn heuristic(diagnosis: &str, confidence: f64) -> Self {
        Self::build(diagnosis.to_string(), confidence, false)
    }

    pub fn from_model(label: String, confidence: f64) -> Self {
        Self::build(label, confidence, true)
    }

    fn build(diagnosis: String, confidence: f64, model_used: bool) -> Self {
        PredictionResponse {
            diagnosis,
            confidence,
            recommendations: RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
            model_used,
        }
    }
}
