pub mod config;
pub mod error;
pub mod inference;
pub mod types;

pub use config::{AppConfig, ModelConfig, NegativePolicy};
pub use error::{ArtifactLoadError, InferenceError, ValidationError};
pub use inference::{CampaignModel, FeatureRecord, FeatureValue, FEATURE_NAMES};
pub use types::{CampaignInput, Metric, PercentageBreakdown, PredictionResult, RawCampaignInput};
