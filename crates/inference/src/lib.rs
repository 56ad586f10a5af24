//! Campaign performance prediction: artifact loading and the prediction
//! service built on top of it.

pub mod engine;
pub mod model;

pub use engine::PredictionService;
pub use model::{FeatureSpec, LinearCampaignModel, ModelArtifact};
