//! The external model collaborator.
//!
//! Anything implementing [`Classifier`] can back the prediction engine. The shipped
//! implementation is a multinomial linear model loaded from a JSON artifact:
//!
//! ```json
//! {
//!   "labels": ["Common cold", "Influenza"],
//!   "features": ["age", "gender", "symptom_count"],
//!   "weights": [[0.01, 0.2, 0.3], [0.02, -0.1, 0.5]],
//!   "bias": [0.0, -1.0],
//!   "expose_probabilities": true
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use super::features::{FeatureSchema, FeatureVector};
use crate::error::ModelError;

pub trait Classifier: Send + Sync {
    /// Ordered features this model expects.
    fn schema(&self) -> &FeatureSchema;

    fn classify(&self, features: &FeatureVector) -> Result<String, ModelError>;

    /// Distribution over labels, for models that expose one.
    fn probabilities(&self, _features: &FeatureVector) -> Result<Option<Vec<f64>>, ModelError> {
        Ok(None)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub labels: Vec<String>,
    #[serde(default)]
    pub features: FeatureSchema,
    pub weights: Vec<Vec<f64>>,
    #[serde(default)]
    pub bias: Vec<f64>,
    #[serde(default = "default_true")]
    pub expose_probabilities: bool,
}

fn default_true() -> bool { true }

impl LinearModel {
    /// Check shapes once at load time so invocation only fails on bad inputs.
    pub fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(anyhow!("model declares no labels"));
        }
        if self.features.is_empty() {
            return Err(anyhow!("model declares no features"));
        }
        if self.weights.len() != self.labels.len() {
            return Err(anyhow!("weights has {} rows for {} labels", self.weights.len(), self.labels.len()));
        }
        for (i, row) in self.weights.iter().enumerate() {
            if row.len() != self.features.len() {
                return Err(anyhow!("weights row {} has {} columns, expected {}", i, row.len(), self.features.len()));
            }
            if row.iter().any(|w| !w.is_finite()) {
                return Err(anyhow!("weights row {} contains a non-finite value", i));
            }
        }
        if !self.bias.is_empty() && self.bias.len() != self.labels.len() {
            return Err(anyhow!("bias has {} entries for {} labels", self.bias.len(), self.labels.len()));
        }
        Ok(())
    }

    fn logits(&self, x: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        if x.len() != self.features.len() {
            return Err(ModelError::InvocationFailure(format!(
                "expected {} features, got {}",
                self.features.len(),
                x.len()
            )));
        }
        let logits: Vec<f64> = self
            .weights
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let b = self.bias.get(i).copied().unwrap_or(0.0);
                row.iter().zip(x.as_slice()).map(|(w, v)| w * v).sum::<f64>() + b
            })
            .collect();
        if logits.iter().any(|z| !z.is_finite()) {
            return Err(ModelError::InvocationFailure("non-finite score".into()));
        }
        Ok(logits)
    }
}

impl Classifier for LinearModel {
    fn schema(&self) -> &FeatureSchema { &self.features }

    fn classify(&self, features: &FeatureVector) -> Result<String, ModelError> {
        let logits = self.logits(features)?;
        let best = logits
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .ok_or_else(|| ModelError::InvocationFailure("no scores".into()))?;
        Ok(self.labels[best].clone())
    }

    fn probabilities(&self, features: &FeatureVector) -> Result<Option<Vec<f64>>, ModelError> {
        if !self.expose_probabilities {
            return Ok(None);
        }
        Ok(Some(softmax(&self.logits(features)?)))
    }
}

pub fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Read and validate a model artifact.
pub fn load_model(path: &Path) -> Result<Arc<dyn Classifier>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading model artifact {}", path.display()))?;
    let model: LinearModel = serde_json::from_str(&text)
        .with_context(|| format!("parsing model artifact {}", path.display()))?;
    model.validate().with_context(|| format!("validating model artifact {}", path.display()))?;
    Ok(Arc::new(model))
}
