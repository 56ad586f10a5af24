use thiserror::Error;

/// A campaign field failed its domain check. Recoverable: re-prompt the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing field: {field}")]
    MissingField { field: &'static str },

    #[error("{field}: unknown value {value:?} (expected one of {expected})")]
    UnknownCategory {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("{field}: {value} is not a whole number")]
    NotAnInteger { field: &'static str, value: f64 },

    #[error("{field}: {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// The model artifact could not be turned into a usable model. Fatal at startup.
#[derive(Error, Debug)]
pub enum ArtifactLoadError {
    #[error("cannot read model artifact {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode model artifact: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("artifact features {found:?} do not match expected {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("artifact targets {found:?} do not match expected {expected:?}")]
    TargetMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("artifact shape error: {0}")]
    Shape(String),

    #[error("feature {feature}: scale must be finite and non-zero, got {scale}")]
    InvalidScale { feature: String, scale: f64 },
}

/// A single inference call failed. The input is the likely cause, so callers
/// should report and allow resubmission rather than retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("feature {feature}: category {value:?} was not seen during training")]
    UnknownCategory { feature: String, value: String },

    #[error("feature {feature}: expected a {expected} value")]
    FeatureKind {
        feature: String,
        expected: &'static str,
    },

    #[error("model returned {got} outputs, expected {expected}")]
    OutputShape { expected: usize, got: usize },

    #[error("model returned a non-finite value for {metric}")]
    NonFinite { metric: &'static str },

    #[error("model returned {value} for {metric}, beyond the representable count range")]
    OutOfRange { metric: &'static str, value: f64 },

    #[error("model backend failure: {0}")]
    Backend(String),
}
