use serde::{Deserialize, Serialize};
use tracing::debug;

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `CAMPAIGN_PREDICTOR__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,
    #[serde(default)]
    pub negative_policy: NegativePolicy,
}

/// What to do with predictions below zero. The model does not constrain
/// its output, so counts can come back negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativePolicy {
    /// Report the model's value unchanged.
    #[default]
    Preserve,
    /// Report negative counts as zero.
    ClampToZero,
}

impl std::str::FromStr for NegativePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preserve" => Ok(NegativePolicy::Preserve),
            "clamp_to_zero" | "clamp-to-zero" => Ok(NegativePolicy::ClampToZero),
            other => Err(format!(
                "unknown negative policy {other:?} (expected preserve or clamp_to_zero)"
            )),
        }
    }
}

fn default_artifact_path() -> String {
    "campaign_predictor.json".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: default_artifact_path(),
            negative_policy: NegativePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables only.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an optional file, with environment variables
    /// taking precedence over file values.
    pub fn load_from(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!(path = path, "Reading configuration file");
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let builder = builder.add_source(
            config::Environment::with_prefix("CAMPAIGN_PREDICTOR")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
