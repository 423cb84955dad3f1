pub mod monitor;
pub mod report;
pub mod serve;
pub mod snapshot;

use clap::Args;
use compliancewatch_core::{
    CONFIDENCE_MAX, CONFIDENCE_MIN, DashboardView, MonitoringConfig, SEVERITY_MAX, SEVERITY_MIN,
    Synthesizer,
};

/// Sidebar settings as command-line flags.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Drug to monitor (e.g. Ozempic, Humira, Keytruda)
    #[arg(long, default_value = "")]
    pub drug: String,

    /// Comma-separated data sources: reddit, twitter, facebook, forums, faers
    #[arg(long, default_value = "reddit,faers")]
    pub sources: String,

    /// Monitoring period: 24h, 7d, 30d, 90d
    #[arg(long, default_value = "24h", value_parser = ["24h", "7d", "30d", "90d"])]
    pub window: String,

    /// Severity threshold; alerts scoring at or above it are actionable
    #[arg(
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u8).range(i64::from(SEVERITY_MIN)..=i64::from(SEVERITY_MAX))
    )]
    pub severity: u8,

    /// Confidence threshold (percent); less confident alerts are hidden
    #[arg(
        long,
        default_value = "70",
        value_parser = clap::value_parser!(u8).range(i64::from(CONFIDENCE_MIN)..=i64::from(CONFIDENCE_MAX))
    )]
    pub confidence: u8,
}

impl Default for ConfigArgs {
    fn default() -> Self {
        Self {
            drug: String::new(),
            sources: "reddit,faers".to_string(),
            window: "24h".to_string(),
            severity: 5,
            confidence: 70,
        }
    }
}

impl ConfigArgs {
    pub fn to_config(&self) -> compliancewatch_core::Result<MonitoringConfig> {
        MonitoringConfig::from_pairs([
            ("drug", self.drug.clone()),
            ("sources", self.sources.clone()),
            ("window", self.window.clone()),
            ("severity", self.severity.to_string()),
            ("confidence", self.confidence.to_string()),
        ])
    }
}

/// One-shot render, as if start had been pressed.
pub fn build_view(
    args: &ConfigArgs,
    seed: Option<u64>,
) -> compliancewatch_core::Result<DashboardView> {
    let config = args.to_config()?;
    let mut synth = Synthesizer::new(seed);
    DashboardView::build(&config, &mut synth, chrono::Utc::now())
}

/// Print `Error: ...` and exit with status 1.
pub fn exit_with_error(err: impl std::fmt::Display) -> ! {
    eprintln!("Error: {err}");
    std::process::exit(1);
}
