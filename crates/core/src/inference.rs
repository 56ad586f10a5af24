//! Model-agnostic inference seam.
//!
//! The trained model is an opaque collaborator: it receives one
//! [`FeatureRecord`] and answers with one value per
//! [`Metric`](crate::types::Metric). Anything implementing
//! [`CampaignModel`] can sit behind the prediction service, which keeps
//! the loaded artifact swappable for a stub in tests.

use crate::error::InferenceError;
use crate::types::CampaignInput;

/// Column names the model was trained on, in training order.
pub const FEATURE_NAMES: [&str; 8] = [
    "target_gender",
    "target_age_group",
    "target_interests",
    "duration_days",
    "total_budget",
    "ad_platform",
    "ad_type",
    "time_of_day",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Category(&'static str),
    Number(f64),
}

/// A single-row feature table in [`FEATURE_NAMES`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    columns: [(&'static str, FeatureValue); 8],
}

impl FeatureRecord {
    pub fn from_input(input: &CampaignInput) -> Self {
        let [gender, age, interests, duration, budget, platform, ad_type, time] = FEATURE_NAMES;
        Self {
            columns: [
                (gender, FeatureValue::Category(input.target_gender().as_str())),
                (age, FeatureValue::Category(input.target_age_group().as_str())),
                (interests, FeatureValue::Category(input.target_interests().as_str())),
                (duration, FeatureValue::Number(input.duration_days() as f64)),
                (budget, FeatureValue::Number(input.total_budget())),
                (platform, FeatureValue::Category(input.ad_platform().as_str())),
                (ad_type, FeatureValue::Category(input.ad_type().as_str())),
                (time, FeatureValue::Category(input.time_of_day().as_str())),
            ],
        }
    }

    pub fn columns(&self) -> &[(&'static str, FeatureValue)] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.columns
            .iter()
            .find(|(column, _)| *column == name)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A loaded regression model. Implementations must be reentrant: one
/// instance is shared read-only by every caller.
pub trait CampaignModel: Send + Sync {
    /// Run inference on one record, returning one raw value per metric in
    /// `Metric::ALL` order.
    fn infer(&self, record: &FeatureRecord) -> Result<Vec<f64>, InferenceError>;

    /// Model name for logging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    #[test]
    fn test_record_follows_training_order() {
        let input = CampaignInput::new(
            TargetGender::Female,
            AgeGroup::Age25To34,
            Interest::Tech,
            10,
            5000.0,
            AdPlatform::Instagram,
            AdType::Video,
            TimeOfDay::Evening,
        )
        .unwrap();
        let record = FeatureRecord::from_input(&input);

        let names: Vec<_> = record.columns().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, FEATURE_NAMES);
        assert_eq!(record.len(), 8);
        assert_eq!(
            record.get("target_age_group"),
            Some(FeatureValue::Category("25-34"))
        );
        assert_eq!(record.get("total_budget"), Some(FeatureValue::Number(5000.0)));
        assert_eq!(record.get("duration_days"), Some(FeatureValue::Number(10.0)));
        assert_eq!(record.get("budget"), None);
    }
}
