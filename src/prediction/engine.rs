use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::heuristics;
use super::model::{Classifier, load_model};
use super::types::{PredictionRequest, PredictionResponse, DEFAULT_MODEL_CONFIDENCE};
use crate::error::ModelError;

/// Model-first prediction with rule-based fallback.
///
/// - no model loaded: fixed "temporarily unavailable" answer
/// - model loaded: build features, classify, read confidence from the distribution
/// - any model failure: keyword heuristics
///
/// Model failures are logged and never reach the caller.
pub struct PredictionEngine {
    model: Option<Arc<dyn Classifier>>,
}

impl PredictionEngine {
    pub fn new(model: Option<Arc<dyn Classifier>>) -> Self {
        Self { model }
    }

    pub fn without_model() -> Self {
        Self { model: None }
    }

    /// Load the artifact at `path`; a missing or broken artifact leaves the engine model-less.
    pub fn load(path: &Path) -> Self {
        match load_model(path) {
            Ok(m) => {
                info!(target: "startup", "model loaded from {}", path.display());
                Self::new(Some(m))
            }
            Err(e) => {
                warn!(target: "startup", "model unavailable, predictions will degrade: {:#}", e);
                Self::without_model()
            }
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn predict(&self, req: &PredictionRequest) -> PredictionResponse {
        let Some(model) = self.model.as_deref() else {
            warn!(target: "healthqai::predict", "{}", ModelError::Unavailable);
            return PredictionResponse::unavailable();
        };
        match invoke(model, req) {
            Ok(resp) => resp,
            Err(e) => {
                warn!(target: "healthqai::predict", "falling back to heuristics: {e}");
                heuristics::diagnose(&req.symptoms)
            }
        }
    }
}

fn invoke(model: &dyn Classifier, req: &PredictionRequest) -> Result<PredictionResponse, ModelError> {
    let x = model.schema().build(req)?;
    let label = model.classify(&x)?;
    if label.trim().is_empty() {
        return Err(ModelError::InvocationFailure("empty label".into()));
    }
    let confidence = match model.probabilities(&x)? {
        Some(dist) => max_probability(&dist)?,
        None => DEFAULT_MODEL_CONFIDENCE,
    };
    Ok(PredictionResponse::from_model(label, confidence))
}

fn max_probability(dist: &[f64]) -> Result<f64, ModelError> {
    let max = dist
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or_else(|| ModelError::InvocationFailure("empty probability distribution".into()))?;
    if !(0.0..=1.0).contains(&max) {
        return Err(ModelError::InvocationFailure(format!("probability {max} outside [0, 1]")));
    }
    Ok(max)
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
