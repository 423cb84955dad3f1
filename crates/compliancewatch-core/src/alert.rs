//! Synthetic adverse-event alerts.
//!
//! Alerts come from a fixed catalog of report templates. Each render draws a
//! fresh classifier confidence per entry, drops entries from unselected
//! sources or below the confidence threshold, and flags the rest as
//! actionable against the severity threshold.

use std::cmp::Ordering;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MonitoringConfig;
use crate::source::DataSource;

/// Severity bucket derived from a 1-10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Most severe first.
    pub const DESCENDING: [Severity; 4] = [
        Self::Critical,
        Self::High,
        Self::Medium,
        Self::Low,
    ];

    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            Self::Critical
        } else if score >= 6.0 {
            Self::High
        } else if score >= 4.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Label with the score range, as used on the distribution chart.
    pub fn bucket_label(self) -> &'static str {
        match self {
            Self::Critical => "Critical (8-10)",
            Self::High => "High (6-7)",
            Self::Medium => "Medium (4-5)",
            Self::Low => "Low (1-3)",
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Critical => "🔴",
            Self::High => "🟠",
            Self::Medium => "🟡",
            Self::Low => "🟢",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Critical => "#dc2626",
            Self::High => "#f59e0b",
            Self::Medium => "#667eea",
            Self::Low => "#10b981",
        }
    }

    /// CSS class suffix.
    pub fn css(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One catalog entry. `{drug}` in the template is replaced by the drug name.
struct AlertTemplate {
    source: DataSource,
    source_detail: &'static str,
    template: &'static str,
    score: f64,
    hours_ago: u32,
    affected: &'static str,
}

const CATALOG: &[AlertTemplate] = &[
    AlertTemplate {
        source: DataSource::Reddit,
        source_detail: "Reddit r/diabetes",
        template: "Multiple users reporting severe nausea and vomiting with {drug}",
        score: 8.7,
        hours_ago: 2,
        affected: "12 reports",
    },
    AlertTemplate {
        source: DataSource::PatientForums,
        source_detail: "Patient Forum",
        template: "Unexpected vision changes reported with {drug} dosage increase",
        score: 7.9,
        hours_ago: 5,
        affected: "8 reports",
    },
    AlertTemplate {
        source: DataSource::TwitterX,
        source_detail: "Twitter/X",
        template: "Discussions about skin reactions possibly linked to {drug}",
        score: 5.2,
        hours_ago: 8,
        affected: "23 mentions",
    },
    AlertTemplate {
        source: DataSource::FdaFaers,
        source_detail: "FDA FAERS",
        template: "Mild headaches reported with {drug} in combination with other medications",
        score: 3.1,
        hours_ago: 12,
        affected: "5 reports",
    },
    AlertTemplate {
        source: DataSource::FdaFaers,
        source_detail: "FDA FAERS",
        template: "Cluster of acute pancreatitis case reports referencing {drug}",
        score: 9.1,
        hours_ago: 1,
        affected: "4 reports",
    },
    AlertTemplate {
        source: DataSource::FacebookGroups,
        source_detail: "Facebook support group",
        template: "Members describing persistent fatigue after starting {drug}",
        score: 4.6,
        hours_ago: 26,
        affected: "17 posts",
    },
    AlertTemplate {
        source: DataSource::Reddit,
        source_detail: "Reddit r/pharmacy",
        template: "Questions about {drug} interactions with blood thinners",
        score: 6.3,
        hours_ago: 30,
        affected: "9 threads",
    },
];

/// Number of templates in the alert catalog.
pub fn catalog_len() -> usize {
    CATALOG.len()
}

/// A single synthetic alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub source: DataSource,
    pub source_detail: String,
    pub description: String,
    /// Severity score, 1-10.
    pub score: f64,
    /// Classifier confidence, percent.
    pub confidence: u8,
    pub hours_ago: u32,
    pub affected: String,
    /// Score meets the configured severity threshold.
    pub actionable: bool,
}

impl Alert {
    pub fn time_ago(&self) -> String {
        format_time_ago(self.hours_ago)
    }
}

/// Human-readable relative time, e.g. `"5 hours ago"`.
pub fn format_time_ago(hours: u32) -> String {
    match hours {
        0 => "just now".to_string(),
        1 => "1 hour ago".to_string(),
        2..=23 => format!("{hours} hours ago"),
        24..=47 => "1 day ago".to_string(),
        _ => format!("{} days ago", hours / 24),
    }
}

/// Alerts that survived filtering, plus bookkeeping about what was dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertBoard {
    pub alerts: Vec<Alert>,
    /// Entries from selected sources hidden by the confidence threshold.
    pub suppressed: usize,
}

impl AlertBoard {
    pub fn build<R: Rng>(config: &MonitoringConfig, rng: &mut R) -> Self {
        let mut alerts = Vec::new();
        let mut suppressed = 0;

        for entry in CATALOG {
            // Draw for every entry so the stream position does not depend on the filters.
            let confidence: u8 = rng.random_range(70..=99);
            if !config.sources.contains(&entry.source) {
                continue;
            }
            if confidence < config.confidence_threshold {
                suppressed += 1;
                continue;
            }
            alerts.push(Alert {
                severity: Severity::from_score(entry.score),
                source: entry.source,
                source_detail: entry.source_detail.to_string(),
                description: entry.template.replace("{drug}", &config.drug_name),
                score: entry.score,
                confidence,
                hours_ago: entry.hours_ago,
                affected: entry.affected.to_string(),
                actionable: entry.score >= f64::from(config.severity_threshold),
            });
        }

        alerts.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
        });

        log::debug!(
            "alert board: {} listed, {} suppressed",
            alerts.len(),
            suppressed
        );
        Self { alerts, suppressed }
    }

    pub fn actionable_count(&self) -> usize {
        self.alerts.iter().filter(|a| a.actionable).count()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.alerts.iter().filter(|a| a.severity == severity).count()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config_with(sources: Vec<DataSource>, severity: u8, confidence: u8) -> MonitoringConfig {
        MonitoringConfig {
            drug_name: "Ozempic".into(),
            sources,
            severity_threshold: severity,
            confidence_threshold: confidence,
            ..Default::default()
        }
    }

    #[test]
    fn severity_buckets_from_score() {
        assert_eq!(Severity::from_score(9.1), Severity::Critical);
        assert_eq!(Severity::from_score(8.0), Severity::Critical);
        assert_eq!(Severity::from_score(7.9), Severity::High);
        assert_eq!(Severity::from_score(5.2), Severity::Medium);
        assert_eq!(Severity::from_score(3.1), Severity::Low);
    }

    #[test]
    fn severity_orders_low_to_critical() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn time_ago_formats() {
        assert_eq!(format_time_ago(0), "just now");
        assert_eq!(format_time_ago(1), "1 hour ago");
        assert_eq!(format_time_ago(5), "5 hours ago");
        assert_eq!(format_time_ago(26), "1 day ago");
        assert_eq!(format_time_ago(72), "3 days ago");
    }

    #[test]
    fn descriptions_mention_drug() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = AlertBoard::build(&config_with(DataSource::ALL.to_vec(), 5, 50), &mut rng);
        assert_eq!(board.alerts.len(), catalog_len());
        assert!(board.alerts.iter().all(|a| a.description.contains("Ozempic")));
    }

    #[test]
    fn sorted_by_severity_then_score() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = AlertBoard::build(&config_with(DataSource::ALL.to_vec(), 5, 50), &mut rng);
        for pair in board.alerts.windows(2) {
            assert!(pair[0].severity >= pair[1].severity);
            if pair[0].severity == pair[1].severity {
                assert!(pair[0].score >= pair[1].score);
            }
        }
        assert_eq!(board.alerts[0].score, 9.1);
    }

    #[test]
    fn unselected_sources_are_dropped() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = AlertBoard::build(&config_with(vec![DataSource::TwitterX], 5, 50), &mut rng);
        assert_eq!(board.alerts.len(), 1);
        assert_eq!(board.alerts[0].source, DataSource::TwitterX);
        assert_eq!(board.suppressed, 0);
    }

    #[test]
    fn confidence_threshold_suppresses_everything_at_100() {
        let mut rng = StdRng::seed_from_u64(9);
        let board = AlertBoard::build(&config_with(DataSource::ALL.to_vec(), 5, 100), &mut rng);
        assert!(board.is_empty());
        assert_eq!(board.suppressed, catalog_len());
    }

    #[test]
    fn actionable_follows_severity_threshold() {
        let mut rng = StdRng::seed_from_u64(11);
        let board = AlertBoard::build(&config_with(DataSource::ALL.to_vec(), 8, 50), &mut rng);
        for alert in &board.alerts {
            assert_eq!(alert.actionable, alert.score >= 8.0);
        }
        assert_eq!(board.actionable_count(), 2);
    }
}
