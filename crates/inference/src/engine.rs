//! Prediction service: owns the loaded model and turns validated campaign
//! inputs into rounded performance predictions.

use crate::model::LinearCampaignModel;
use campaign_core::config::{ModelConfig, NegativePolicy};
use campaign_core::error::{ArtifactLoadError, InferenceError};
use campaign_core::inference::{CampaignModel, FeatureRecord};
use campaign_core::types::{CampaignInput, Metric, PredictionResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 2^63: the first magnitude an `i64` count cannot hold.
const COUNT_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Shares one read-only model across all callers. Construct once at
/// startup and hand out by reference or `Arc`.
#[derive(Clone)]
pub struct PredictionService {
    model: Arc<dyn CampaignModel>,
    negative_policy: NegativePolicy,
}

impl PredictionService {
    /// Load the configured artifact. Failure here is fatal for the caller:
    /// there is no fallback model.
    pub fn load(config: &ModelConfig) -> Result<Self, ArtifactLoadError> {
        let model = LinearCampaignModel::load(&config.artifact_path)?;
        let service = Self::with_model(Arc::new(model), config.negative_policy);

        info!(
            model = service.model.name(),
            negative_policy = ?service.negative_policy,
            "Prediction service initialized"
        );
        Ok(service)
    }

    /// Wrap an already-loaded model, e.g. a stub in tests.
    pub fn with_model(model: Arc<dyn CampaignModel>, negative_policy: NegativePolicy) -> Self {
        Self {
            model,
            negative_policy,
        }
    }

    /// Predict campaign performance for one validated input.
    pub fn predict(&self, input: &CampaignInput) -> Result<PredictionResult, InferenceError> {
        metrics::counter!("predictions.requests").increment(1);
        let start = std::time::Instant::now();

        let record = FeatureRecord::from_input(input);
        debug!(model = self.model.name(), "Running inference");

        let result = self
            .model
            .infer(&record)
            .and_then(|raw| self.shape_output(&raw));

        match &result {
            Ok(prediction) => {
                let latency_us = start.elapsed().as_micros() as u64;
                metrics::histogram!("predictions.latency_us").record(latency_us as f64);
                debug!(latency_us = latency_us, ?prediction, "Prediction complete");
            }
            Err(e) => {
                metrics::counter!("predictions.errors").increment(1);
                warn!(error = %e, "Inference failed");
            }
        }

        result
    }

    pub fn negative_policy(&self) -> NegativePolicy {
        self.negative_policy
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Map the raw output vector onto the fixed metric order, apply the
    /// negative policy and round half away from zero.
    fn shape_output(&self, raw: &[f64]) -> Result<PredictionResult, InferenceError> {
        if raw.len() != Metric::ALL.len() {
            return Err(InferenceError::OutputShape {
                expected: Metric::ALL.len(),
                got: raw.len(),
            });
        }

        let mut values = [0i64; 6];
        for ((slot, metric), &value) in values.iter_mut().zip(Metric::ALL).zip(raw) {
            if !value.is_finite() {
                return Err(InferenceError::NonFinite {
                    metric: metric.name(),
                });
            }

            let rounded = value.round();
            if rounded.abs() >= COUNT_LIMIT {
                return Err(InferenceError::OutOfRange {
                    metric: metric.name(),
                    value,
                });
            }

            let mut rounded = rounded as i64;
            if rounded < 0 {
                metrics::counter!("predictions.negative_values").increment(1);
                match self.negative_policy {
                    NegativePolicy::Preserve => {
                        debug!(metric = metric.name(), value = value, "Negative prediction kept");
                    }
                    NegativePolicy::ClampToZero => rounded = 0,
                }
            }
            *slot = rounded;
        }

        Ok(PredictionResult::from_values(values))
    }
}
