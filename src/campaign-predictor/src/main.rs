//! Campaign Predictor estimates campaign performance from its settings.
//!
//! Loads the model artifact once, validates one campaign configuration,
//! and prints the prediction as JSON for whatever front-end renders it.

use anyhow::Context;
use campaign_core::config::{AppConfig, NegativePolicy};
use campaign_core::types::{CampaignInput, PercentageBreakdown, PredictionResult, RawCampaignInput};
use campaign_inference::PredictionService;
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "campaign-predictor")]
#[command(about = "Predict impressions, clicks, comments, likes, shares and purchases for a campaign")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<String>,

    /// Model artifact path (overrides config)
    #[arg(long, env = "CAMPAIGN_PREDICTOR__MODEL__ARTIFACT_PATH")]
    model: Option<String>,

    /// Negative prediction policy: preserve or clamp-to-zero (overrides config)
    #[arg(long)]
    negative_policy: Option<NegativePolicy>,

    /// Read the campaign from a JSON file instead of the field flags
    #[arg(long, conflicts_with_all = [
        "target_gender", "target_age_group", "target_interests", "duration_days",
        "total_budget", "ad_platform", "ad_type", "time_of_day",
    ])]
    input: Option<String>,

    #[arg(long)]
    target_gender: Option<String>,
    #[arg(long)]
    target_age_group: Option<String>,
    #[arg(long)]
    target_interests: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    duration_days: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    total_budget: Option<f64>,
    #[arg(long)]
    ad_platform: Option<String>,
    #[arg(long)]
    ad_type: Option<String>,
    #[arg(long)]
    time_of_day: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

impl Cli {
    /// Field flags layered over the form defaults.
    fn raw_input(&self) -> RawCampaignInput {
        let defaults = RawCampaignInput::form_defaults();
        RawCampaignInput {
            target_gender: self.target_gender.clone().or(defaults.target_gender),
            target_age_group: self.target_age_group.clone().or(defaults.target_age_group),
            target_interests: self.target_interests.clone().or(defaults.target_interests),
            duration_days: self.duration_days.or(defaults.duration_days),
            total_budget: self.total_budget.or(defaults.total_budget),
            ad_platform: self.ad_platform.clone().or(defaults.ad_platform),
            ad_type: self.ad_type.clone().or(defaults.ad_type),
            time_of_day: self.time_of_day.clone().or(defaults.time_of_day),
        }
    }
}

#[derive(Serialize)]
struct PredictionReport<'a> {
    input: &'a CampaignInput,
    prediction: PredictionResult,
    /// Absent when the predicted total is not positive.
    percentages: Option<PercentageBreakdown>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "campaign_predictor=info,campaign_inference=info,campaign_core=info".into()
            }),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    info!("Campaign Predictor starting up");

    // An explicit config file must load; the environment alone may fall back
    let mut config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from(Some(path))
            .with_context(|| format!("loading configuration {path}"))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        }),
    };

    if let Some(model) = &cli.model {
        config.model.artifact_path = model.clone();
    }
    if let Some(policy) = cli.negative_policy {
        config.model.negative_policy = policy;
    }

    info!(
        artifact_path = %config.model.artifact_path,
        negative_policy = ?config.model.negative_policy,
        "Configuration loaded"
    );

    let service = PredictionService::load(&config.model).map_err(|e| {
        error!(error = %e, "Cannot start without a model");
        e
    })?;

    let raw = match &cli.input {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading campaign input {path}"))?;
            serde_json::from_str::<RawCampaignInput>(&contents)
                .with_context(|| format!("parsing campaign input {path}"))?
        }
        None => cli.raw_input(),
    };

    let input = CampaignInput::try_from(raw).context("invalid campaign input")?;
    let prediction = service.predict(&input).context("prediction failed")?;

    let report = PredictionReport {
        input: &input,
        prediction,
        percentages: prediction.percentage_breakdown(),
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}
