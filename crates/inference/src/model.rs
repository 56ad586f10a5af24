//! Linear campaign-performance model loaded from a JSON artifact.
//!
//! The artifact is the portable form of the training pipeline: one-hot
//! encoding for categorical columns, standardization for numeric columns,
//! then a multi-output linear regression. Encoded columns follow the
//! artifact's feature order; within a categorical feature, columns follow
//! its `categories` list.
//!
//! Everything that can be checked without an input is checked at load
//! time, so a renamed column or a truncated weight matrix fails startup
//! instead of the first prediction.

use campaign_core::error::{ArtifactLoadError, InferenceError};
use campaign_core::inference::{CampaignModel, FeatureRecord, FeatureValue, FEATURE_NAMES};
use campaign_core::types::Metric;
use ndarray::{Array1, Array2};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// On-disk artifact layout.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub name: Option<String>,
    pub features: Vec<FeatureSpec>,
    pub targets: Vec<String>,
    pub intercept: Vec<f64>,
    /// One row per encoded column, one value per target.
    pub coefficients: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSpec {
    Categorical { name: String, categories: Vec<String> },
    Numeric {
        name: String,
        #[serde(default)]
        mean: f64,
        #[serde(default = "default_scale")]
        scale: f64,
    },
}

fn default_scale() -> f64 {
    1.0
}

impl FeatureSpec {
    pub fn name(&self) -> &str {
        match self {
            FeatureSpec::Categorical { name, .. } | FeatureSpec::Numeric { name, .. } => name,
        }
    }

    fn width(&self) -> usize {
        match self {
            FeatureSpec::Categorical { categories, .. } => categories.len(),
            FeatureSpec::Numeric { .. } => 1,
        }
    }
}

/// A validated, ready-to-run linear model.
pub struct LinearCampaignModel {
    name: String,
    features: Vec<FeatureSpec>,
    /// Shape `(encoded_width, 6)`.
    weights: Array2<f64>,
    intercept: Array1<f64>,
}

impl LinearCampaignModel {
    /// Read and validate an artifact file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ArtifactLoadError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let model = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            model = %model.name,
            encoded_width = model.encoded_width(),
            "Model artifact loaded"
        );
        Ok(model)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ArtifactLoadError> {
        let artifact: ModelArtifact = serde_json::from_str(raw)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ArtifactLoadError> {
        let found: Vec<&str> = artifact.features.iter().map(FeatureSpec::name).collect();
        if found != FEATURE_NAMES {
            return Err(ArtifactLoadError::FeatureMismatch {
                expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                found: found.iter().map(|s| s.to_string()).collect(),
            });
        }

        let expected_targets: Vec<&str> = Metric::ALL.iter().map(Metric::name).collect();
        if artifact.targets != expected_targets {
            return Err(ArtifactLoadError::TargetMismatch {
                expected: expected_targets.iter().map(|s| s.to_string()).collect(),
                found: artifact.targets,
            });
        }

        for feature in &artifact.features {
            match feature {
                FeatureSpec::Numeric { name, scale, .. } if !scale.is_finite() || *scale == 0.0 => {
                    return Err(ArtifactLoadError::InvalidScale {
                        feature: name.clone(),
                        scale: *scale,
                    });
                }
                FeatureSpec::Categorical { name, categories } if categories.is_empty() => {
                    return Err(ArtifactLoadError::Shape(format!(
                        "categorical feature {name} has no categories"
                    )));
                }
                _ => {}
            }
        }

        let outputs = Metric::ALL.len();
        if artifact.intercept.len() != outputs {
            return Err(ArtifactLoadError::Shape(format!(
                "intercept has {} values, expected {outputs}",
                artifact.intercept.len()
            )));
        }

        let encoded_width: usize = artifact.features.iter().map(FeatureSpec::width).sum();
        if artifact.coefficients.len() != encoded_width {
            return Err(ArtifactLoadError::Shape(format!(
                "coefficients have {} rows, encoded width is {encoded_width}",
                artifact.coefficients.len()
            )));
        }
        if let Some((row, values)) = artifact
            .coefficients
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != outputs)
        {
            return Err(ArtifactLoadError::Shape(format!(
                "coefficient row {row} has {} values, expected {outputs}",
                values.len()
            )));
        }

        let flat: Vec<f64> = artifact.coefficients.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((encoded_width, outputs), flat)
            .map_err(|e| ArtifactLoadError::Shape(e.to_string()))?;

        Ok(Self {
            name: artifact.name.unwrap_or_else(|| "linear".to_string()),
            features: artifact.features,
            weights,
            intercept: Array1::from_vec(artifact.intercept),
        })
    }

    pub fn encoded_width(&self) -> usize {
        self.weights.nrows()
    }

    /// One-hot encode categoricals and standardize numerics into a single row.
    fn encode(&self, record: &FeatureRecord) -> Result<Array1<f64>, InferenceError> {
        // load-time checks pin the artifact to FEATURE_NAMES, the record's order
        debug_assert!(self
            .features
            .iter()
            .map(FeatureSpec::name)
            .eq(record.columns().iter().map(|(column, _)| *column)));

        let mut row = Array1::<f64>::zeros(self.encoded_width());
        let mut offset = 0;

        for (spec, (column, value)) in self.features.iter().zip(record.columns()) {
            match (spec, value) {
                (FeatureSpec::Categorical { categories, .. }, FeatureValue::Category(label)) => {
                    let idx = categories.iter().position(|c| c == label).ok_or_else(|| {
                        InferenceError::UnknownCategory {
                            feature: column.to_string(),
                            value: label.to_string(),
                        }
                    })?;
                    row[offset + idx] = 1.0;
                }
                (FeatureSpec::Numeric { mean, scale, .. }, FeatureValue::Number(x)) => {
                    row[offset] = (x - mean) / scale;
                }
                (FeatureSpec::Categorical { .. }, _) => {
                    return Err(InferenceError::FeatureKind {
                        feature: column.to_string(),
                        expected: "categorical",
                    });
                }
                (FeatureSpec::Numeric { .. }, _) => {
                    return Err(InferenceError::FeatureKind {
                        feature: column.to_string(),
                        expected: "numeric",
                    });
                }
            }

            offset += spec.width();
        }

        Ok(row)
    }
}

impl CampaignModel for LinearCampaignModel {
    fn infer(&self, record: &FeatureRecord) -> Result<Vec<f64>, InferenceError> {
        let row = self.encode(record)?;
        let output = row.dot(&self.weights) + &self.intercept;
        Ok(output.to_vec())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
