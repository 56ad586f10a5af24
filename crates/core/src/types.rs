//! Campaign input and prediction output value types.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DURATION_DAYS_MIN: u32 = 1;
pub const DURATION_DAYS_MAX: u32 = 60;
pub const TOTAL_BUDGET_MIN: f64 = 100.0;
pub const TOTAL_BUDGET_MAX: f64 = 1_000_000.0;

/// Declares a closed set of campaign options with their training labels.
macro_rules! campaign_option {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const FIELD: &'static str = $field;

            /// Label exactly as the model saw it during training.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(ValidationError::UnknownCategory {
                        field: $field,
                        value: other.to_string(),
                        expected: [$($label),+].join(", "),
                    }),
                }
            }
        }
    };
}

campaign_option!(TargetGender, "target_gender" {
    Male => "Male",
    Female => "Female",
});

campaign_option!(AgeGroup, "target_age_group" {
    Age18To24 => "18-24",
    Age25To34 => "25-34",
    Age35To44 => "35-44",
});

campaign_option!(Interest, "target_interests" {
    Sports => "Sports",
    Fashion => "Fashion",
    Tech => "Tech",
    Gaming => "Gaming",
    Food => "Food",
});

campaign_option!(AdPlatform, "ad_platform" {
    Facebook => "Facebook",
    Instagram => "Instagram",
});

campaign_option!(AdType, "ad_type" {
    Image => "Image",
    Video => "Video",
    Carousel => "Carousel",
});

campaign_option!(TimeOfDay, "time_of_day" {
    Morning => "Morning",
    Afternoon => "Afternoon",
    Evening => "Evening",
    Night => "Night",
});

// ─── Campaign Input ─────────────────────────────────────────────────────

/// Unvalidated campaign settings as a form or JSON document delivers them.
///
/// `duration_days` is taken as any JSON number so that `10.5` or `-3`
/// surface as a [`ValidationError`] rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCampaignInput {
    #[serde(default)]
    pub target_gender: Option<String>,
    #[serde(default)]
    pub target_age_group: Option<String>,
    #[serde(default)]
    pub target_interests: Option<String>,
    #[serde(default)]
    pub duration_days: Option<f64>,
    #[serde(default)]
    pub total_budget: Option<f64>,
    #[serde(default)]
    pub ad_platform: Option<String>,
    #[serde(default)]
    pub ad_type: Option<String>,
    #[serde(default)]
    pub time_of_day: Option<String>,
}

impl RawCampaignInput {
    /// The values a freshly opened input form starts with: the first option
    /// of every select, 10 days and a budget of 5000.
    pub fn form_defaults() -> Self {
        Self {
            target_gender: Some(TargetGender::ALL[0].to_string()),
            target_age_group: Some(AgeGroup::ALL[0].to_string()),
            target_interests: Some(Interest::ALL[0].to_string()),
            duration_days: Some(10.0),
            total_budget: Some(5000.0),
            ad_platform: Some(AdPlatform::ALL[0].to_string()),
            ad_type: Some(AdType::ALL[0].to_string()),
            time_of_day: Some(TimeOfDay::ALL[0].to_string()),
        }
    }
}

/// A validated campaign configuration. Every instance holds all eight
/// fields inside their declared domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCampaignInput")]
pub struct CampaignInput {
    target_gender: TargetGender,
    target_age_group: AgeGroup,
    target_interests: Interest,
    duration_days: u32,
    total_budget: f64,
    ad_platform: AdPlatform,
    ad_type: AdType,
    time_of_day: TimeOfDay,
}

impl CampaignInput {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        target_gender: TargetGender,
        target_age_group: AgeGroup,
        target_interests: Interest,
        duration_days: u32,
        total_budget: f64,
        ad_platform: AdPlatform,
        ad_type: AdType,
        time_of_day: TimeOfDay,
    ) -> Result<Self, ValidationError> {
        check_duration(duration_days as f64)?;
        check_budget(total_budget)?;

        Ok(Self {
            target_gender,
            target_age_group,
            target_interests,
            duration_days,
            total_budget,
            ad_platform,
            ad_type,
            time_of_day,
        })
    }

    pub fn target_gender(&self) -> TargetGender {
        self.target_gender
    }

    pub fn target_age_group(&self) -> AgeGroup {
        self.target_age_group
    }

    pub fn target_interests(&self) -> Interest {
        self.target_interests
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn total_budget(&self) -> f64 {
        self.total_budget
    }

    pub fn ad_platform(&self) -> AdPlatform {
        self.ad_platform
    }

    pub fn ad_type(&self) -> AdType {
        self.ad_type
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }
}

impl TryFrom<RawCampaignInput> for CampaignInput {
    type Error = ValidationError;

    fn try_from(raw: RawCampaignInput) -> Result<Self, Self::Error> {
        let duration_days = require(raw.duration_days, "duration_days")?;
        check_duration(duration_days)?;

        Self::new(
            parse_option(raw.target_gender, TargetGender::FIELD)?,
            parse_option(raw.target_age_group, AgeGroup::FIELD)?,
            parse_option(raw.target_interests, Interest::FIELD)?,
            // whole and within [1, 60] after check_duration
            duration_days as u32,
            require(raw.total_budget, "total_budget")?,
            parse_option(raw.ad_platform, AdPlatform::FIELD)?,
            parse_option(raw.ad_type, AdType::FIELD)?,
            parse_option(raw.time_of_day, TimeOfDay::FIELD)?,
        )
    }
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField { field })
}

fn parse_option<T>(value: Option<String>, field: &'static str) -> Result<T, ValidationError>
where
    T: FromStr<Err = ValidationError>,
{
    require(value, field)?.parse()
}

fn check_duration(days: f64) -> Result<(), ValidationError> {
    if days.is_finite() && days.fract() != 0.0 {
        return Err(ValidationError::NotAnInteger {
            field: "duration_days",
            value: days,
        });
    }
    if !(DURATION_DAYS_MIN as f64..=DURATION_DAYS_MAX as f64).contains(&days) {
        return Err(ValidationError::OutOfRange {
            field: "duration_days",
            value: days,
            min: DURATION_DAYS_MIN as f64,
            max: DURATION_DAYS_MAX as f64,
        });
    }
    Ok(())
}

fn check_budget(budget: f64) -> Result<(), ValidationError> {
    // NaN fails the range check too
    if !(TOTAL_BUDGET_MIN..=TOTAL_BUDGET_MAX).contains(&budget) {
        return Err(ValidationError::OutOfRange {
            field: "total_budget",
            value: budget,
            min: TOTAL_BUDGET_MIN,
            max: TOTAL_BUDGET_MAX,
        });
    }
    Ok(())
}

// ─── Prediction Result ──────────────────────────────────────────────────

/// Predicted performance metrics, in the order the model emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Impressions,
    Clicks,
    Comments,
    Likes,
    Shares,
    Purchases,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Impressions,
        Metric::Clicks,
        Metric::Comments,
        Metric::Likes,
        Metric::Shares,
        Metric::Purchases,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Impressions => "Impressions",
            Metric::Clicks => "Clicks",
            Metric::Comments => "Comments",
            Metric::Likes => "Likes",
            Metric::Shares => "Shares",
            Metric::Purchases => "Purchases",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rounded prediction counts. Values are signed: the model does not
/// guarantee non-negative output and the service only clamps when
/// configured to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PredictionResult {
    pub impressions: i64,
    pub clicks: i64,
    pub comments: i64,
    pub likes: i64,
    pub shares: i64,
    pub purchases: i64,
}

impl PredictionResult {
    pub fn from_values(values: [i64; 6]) -> Self {
        let [impressions, clicks, comments, likes, shares, purchases] = values;
        Self {
            impressions,
            clicks,
            comments,
            likes,
            shares,
            purchases,
        }
    }

    pub fn values(&self) -> [i64; 6] {
        [
            self.impressions,
            self.clicks,
            self.comments,
            self.likes,
            self.shares,
            self.purchases,
        ]
    }

    pub fn get(&self, metric: Metric) -> i64 {
        self.values()[metric.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, i64)> {
        Metric::ALL.into_iter().zip(self.values())
    }

    /// Sum of all six counts, or `None` if it does not fit in an `i64`.
    pub fn total(&self) -> Option<i64> {
        self.values()
            .iter()
            .try_fold(0i64, |acc, &value| acc.checked_add(value))
    }

    /// Each metric's share of the total, in percent.
    ///
    /// Returns `None` when the total is not strictly positive. An all-zero
    /// prediction has no meaningful breakdown (0/0), and negative values
    /// can push the total to zero or below; the renderer decides what to
    /// show in that case.
    pub fn percentage_breakdown(&self) -> Option<PercentageBreakdown> {
        // six i64 values cannot overflow an i128
        let total: i128 = self.values().iter().map(|&value| i128::from(value)).sum();
        if total <= 0 {
            return None;
        }
        let total = total as f64;
        let mut shares = [0.0; 6];
        for (share, value) in shares.iter_mut().zip(self.values()) {
            *share = value as f64 / total * 100.0;
        }
        Some(PercentageBreakdown { shares })
    }
}

/// Normalized view of a [`PredictionResult`]; shares sum to 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentageBreakdown {
    shares: [f64; 6],
}

impl PercentageBreakdown {
    pub fn get(&self, metric: Metric) -> f64 {
        self.shares[metric.index()]
    }

    pub fn shares(&self) -> [f64; 6] {
        self.shares
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> {
        Metric::ALL.into_iter().zip(self.shares)
    }
}

impl Serialize for PercentageBreakdown {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.shares.len()))?;
        for (metric, share) in self.iter() {
            map.serialize_entry(metric.name(), &share)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> CampaignInput {
        CampaignInput::new(
            TargetGender::Female,
            AgeGroup::Age25To34,
            Interest::Tech,
            10,
            5000.0,
            AdPlatform::Instagram,
            AdType::Video,
            TimeOfDay::Evening,
        )
        .unwrap()
    }

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for g in TargetGender::ALL {
            assert_eq!(g.as_str().parse::<TargetGender>().unwrap(), *g);
        }
        for a in AgeGroup::ALL {
            assert_eq!(a.as_str().parse::<AgeGroup>().unwrap(), *a);
        }
        for t in TimeOfDay::ALL {
            assert_eq!(t.to_string().parse::<TimeOfDay>().unwrap(), *t);
        }
        assert_eq!(AgeGroup::Age18To24.as_str(), "18-24");
    }

    #[test]
    fn test_unknown_category_rejected_for_every_enum() {
        assert!(matches!(
            "Other".parse::<TargetGender>(),
            Err(ValidationError::UnknownCategory { field: "target_gender", .. })
        ));
        assert!("45-54".parse::<AgeGroup>().is_err());
        assert!("Travel".parse::<Interest>().is_err());
        assert!("TikTok".parse::<AdPlatform>().is_err());
        assert!("Story".parse::<AdType>().is_err());
        assert!("Midnight".parse::<TimeOfDay>().is_err());
        // labels are case-sensitive
        assert!("male".parse::<TargetGender>().is_err());
    }

    #[test]
    fn test_duration_boundaries() {
        let build = |days| {
            CampaignInput::new(
                TargetGender::Male,
                AgeGroup::Age18To24,
                Interest::Sports,
                days,
                5000.0,
                AdPlatform::Facebook,
                AdType::Image,
                TimeOfDay::Morning,
            )
        };
        assert!(build(1).is_ok());
        assert!(build(60).is_ok());
        assert!(matches!(
            build(0),
            Err(ValidationError::OutOfRange { field: "duration_days", .. })
        ));
        assert!(build(61).is_err());
    }

    #[test]
    fn test_budget_boundaries() {
        let build = |budget| {
            CampaignInput::new(
                TargetGender::Male,
                AgeGroup::Age18To24,
                Interest::Sports,
                10,
                budget,
                AdPlatform::Facebook,
                AdType::Image,
                TimeOfDay::Morning,
            )
        };
        assert!(build(100.0).is_ok());
        assert!(build(1_000_000.0).is_ok());
        assert!(build(99.99).is_err());
        assert!(build(1_000_000.01).is_err());
        assert!(build(f64::NAN).is_err());
        assert!(build(f64::INFINITY).is_err());
    }

    #[test]
    fn test_raw_input_missing_field() {
        let mut raw = RawCampaignInput::form_defaults();
        raw.ad_type = None;
        assert_eq!(
            CampaignInput::try_from(raw),
            Err(ValidationError::MissingField { field: "ad_type" })
        );
    }

    #[test]
    fn test_raw_input_negative_duration_rejected() {
        let mut raw = RawCampaignInput::form_defaults();
        raw.duration_days = Some(-5.0);
        assert!(matches!(
            CampaignInput::try_from(raw),
            Err(ValidationError::OutOfRange { field: "duration_days", .. })
        ));

        let mut raw = RawCampaignInput::form_defaults();
        raw.duration_days = Some(f64::from(u32::MAX) + 1.0);
        assert!(CampaignInput::try_from(raw).is_err());
    }

    #[test]
    fn test_fractional_duration_is_a_validation_error() {
        let mut raw = RawCampaignInput::form_defaults();
        raw.duration_days = Some(10.5);
        assert_eq!(
            CampaignInput::try_from(raw),
            Err(ValidationError::NotAnInteger {
                field: "duration_days",
                value: 10.5,
            })
        );

        let mut raw = RawCampaignInput::form_defaults();
        raw.duration_days = Some(f64::NAN);
        assert!(matches!(
            CampaignInput::try_from(raw),
            Err(ValidationError::OutOfRange { field: "duration_days", .. })
        ));
    }

    #[test]
    fn test_fractional_duration_in_json() {
        let json = serde_json::to_string(&RawCampaignInput {
            duration_days: Some(10.5),
            ..RawCampaignInput::form_defaults()
        })
        .unwrap();
        let err = serde_json::from_str::<CampaignInput>(&json).unwrap_err();
        assert!(err.to_string().contains("not a whole number"), "{err}");

        // whole numbers written as floats are accepted
        let json = json.replace("10.5", "12.0");
        let input: CampaignInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input.duration_days(), 12);
    }

    #[test]
    fn test_form_defaults_are_valid() {
        let input = CampaignInput::try_from(RawCampaignInput::form_defaults()).unwrap();
        assert_eq!(input.target_gender(), TargetGender::Male);
        assert_eq!(input.target_age_group(), AgeGroup::Age18To24);
        assert_eq!(input.duration_days(), 10);
        assert_eq!(input.total_budget(), 5000.0);
        assert_eq!(input.time_of_day(), TimeOfDay::Morning);
    }

    #[test]
    fn test_deserialize_goes_through_validation() {
        let json = r#"{
            "target_gender": "Female",
            "target_age_group": "25-34",
            "target_interests": "Tech",
            "duration_days": 10,
            "total_budget": 5000,
            "ad_platform": "Instagram",
            "ad_type": "Video",
            "time_of_day": "Evening"
        }"#;
        let input: CampaignInput = serde_json::from_str(json).unwrap();
        assert_eq!(input, sample_input());

        let bad = json.replace("\"duration_days\": 10", "\"duration_days\": 61");
        assert!(serde_json::from_str::<CampaignInput>(&bad).is_err());

        let bad = json.replace("Instagram", "Snapchat");
        assert!(serde_json::from_str::<CampaignInput>(&bad).is_err());
    }

    #[test]
    fn test_serialize_uses_training_labels() {
        let value = serde_json::to_value(sample_input()).unwrap();
        assert_eq!(value["target_age_group"], "25-34");
        assert_eq!(value["ad_platform"], "Instagram");
        assert_eq!(value["duration_days"], 10);
    }

    #[test]
    fn test_prediction_result_fixed_order() {
        let result = PredictionResult::from_values([100, 20, 3, 40, 5, 1]);
        let names: Vec<_> = result.iter().map(|(m, _)| m.name()).collect();
        assert_eq!(
            names,
            ["Impressions", "Clicks", "Comments", "Likes", "Shares", "Purchases"]
        );
        assert_eq!(result.get(Metric::Likes), 40);
        assert_eq!(result.total(), Some(169));

        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["Impressions"], 100);
        assert_eq!(json["Purchases"], 1);
    }

    #[test]
    fn test_percentage_breakdown_sums_to_100() {
        let result = PredictionResult::from_values([12_345, 678, 9, 321, 45, 7]);
        let breakdown = result.percentage_breakdown().unwrap();
        let sum: f64 = breakdown.shares().iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert!(breakdown.get(Metric::Impressions) > breakdown.get(Metric::Clicks));
    }

    #[test]
    fn test_percentage_breakdown_guards_zero_total() {
        let zero = PredictionResult::from_values([0; 6]);
        assert!(zero.percentage_breakdown().is_none());

        let cancelling = PredictionResult::from_values([10, -10, 0, 0, 0, 0]);
        assert!(cancelling.percentage_breakdown().is_none());
    }

    #[test]
    fn test_huge_counts_do_not_overflow() {
        let result = PredictionResult::from_values([i64::MAX, i64::MAX, 0, 0, 0, 0]);
        assert_eq!(result.total(), None);

        let breakdown = result.percentage_breakdown().unwrap();
        assert!((breakdown.get(Metric::Impressions) - 50.0).abs() < 1e-9);
        assert!((breakdown.get(Metric::Clicks) - 50.0).abs() < 1e-9);

        let huge = 9_000_000_000_000_000_000;
        let result = PredictionResult::from_values([huge, huge, 0, 0, 0, 0]);
        assert_eq!(result.total(), None);
        let sum: f64 = result.percentage_breakdown().unwrap().shares().iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_breakdown_serializes_by_metric_name() {
        let breakdown = PredictionResult::from_values([50, 50, 0, 0, 0, 0])
            .percentage_breakdown()
            .unwrap();
        let json = serde_json::to_value(breakdown).unwrap();
        assert_eq!(json["Impressions"], 50.0);
        assert_eq!(json["Shares"], 0.0);
    }
}
