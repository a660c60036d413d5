//! Request -> numeric feature vector.
//!
//! The feature layout is data, not code: a model artifact names the features it was trained
//! on and their order, and [`FeatureSchema::build`] produces exactly that vector.

use serde::{Deserialize, Serialize};

use super::types::PredictionRequest;
use crate::error::ModelError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Age in years, as given.
    Age,
    /// 1.0 for "male"/"m" (case-insensitive), else 0.0.
    Gender,
    /// Number of whitespace-delimited tokens in the symptoms text.
    SymptomCount,
    /// Length of the symptoms text in characters.
    SymptomLength,
    /// 1.0 when a medical history was supplied.
    HasMedicalHistory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema(pub Vec<Feature>);

impl Default for FeatureSchema {
    fn default() -> Self {
        FeatureSchema(vec![Feature::Age, Feature::Gender, Feature::SymptomCount])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(pub Vec<f64>);

impl FeatureVector {
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn as_slice(&self) -> &[f64] { &self.0 }
}

impl FeatureSchema {
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn build(&self, req: &PredictionRequest) -> Result<FeatureVector, ModelError> {
        if self.0.is_empty() {
            return Err(ModelError::InvocationFailure("feature schema is empty".into()));
        }
        let values = self
            .0
            .iter()
            .map(|f| match f {
                Feature::Age => req.age as f64,
                Feature::Gender => encode_gender(&req.gender),
                Feature::SymptomCount => symptom_count(&req.symptoms) as f64,
                Feature::SymptomLength => req.symptoms.chars().count() as f64,
                Feature::HasMedicalHistory => if req.medical_history.is_some() { 1.0 } else { 0.0 },
            })
            .collect();
        Ok(FeatureVector(values))
    }
}

pub fn encode_gender(gender: &str) -> f64 {
    match gender.trim().to_lowercase().as_str() {
        "male" | "m" => 1.0,
        _ => 0.0,
    }
}

pub fn symptom_count(symptoms: &str) -> usize {
    symptoms.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(age: u32, gender: &str, symptoms: &str) -> PredictionRequest {
        PredictionRequest { age, gender: gender.into(), symptoms: symptoms.into(), medical_history: None }
    }

    #[test]
    fn default_schema_is_age_gender_count() {
        let v = FeatureSchema::default().build(&req(34, "Male", "fever  and\tcough")).unwrap();
        assert_eq!(v.as_slice(), &[34.0, 1.0, 3.0]);
    }

    #[test]
    fn gender_encoding() {
        assert_eq!(encode_gender("M"), 1.0);
        assert_eq!(encode_gender(" male "), 1.0);
        assert_eq!(encode_gender("female"), 0.0);
        assert_eq!(encode_gender("other"), 0.0);
    }

    #[test]
    fn extended_schema_follows_declared_order() {
        let schema = FeatureSchema(vec![
            Feature::HasMedicalHistory,
            Feature::SymptomLength,
            Feature::Age,
        ]);
        let mut r = req(5, "f", "rash");
        r.medical_history = Some("eczema".into());
        assert_eq!(schema.build(&r).unwrap().as_slice(), &[1.0, 4.0, 5.0]);
    }

    #[test]
    fn empty_schema_is_a_model_failure() {
        let err = FeatureSchema(vec![]).build(&req(1, "m", "x")).unwrap_err();
        assert!(matches!(err, ModelError::InvocationFailure(_)));
    }

    #[test]
    fn schema_deserializes_from_names() {
        let s: FeatureSchema = serde_json::from_str(r#"["age","gender","symptom_count"]"#).unwrap();
        assert_eq!(s, FeatureSchema::default());
    }
}
