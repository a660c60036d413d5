//! Symptom prediction: request validation, feature construction, the model collaborator and
//! the heuristic fallback chain.

pub mod types;
pub mod features;
pub mod model;
pub mod heuristics;
mod engine;

pub use types::{PredictForm, PredictionRequest, PredictionResponse, RECOMMENDATIONS};
pub use features::{Feature, FeatureSchema, FeatureVector};
pub use model::{Classifier, LinearModel, load_model};
pub use engine::PredictionEngine;
