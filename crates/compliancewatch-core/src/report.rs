//! Compliance report: configuration, totals, findings and recommendations.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::{Alert, AlertBoard, Severity};
use crate::config::MonitoringConfig;
use crate::synth::{GeoPoint, SeverityCount, SourceShare, count_for, region_totals, total_events};

const RECOMMENDATIONS: [&str; 4] = [
    "Review high-severity gastrointestinal events for potential safety signal",
    "Initiate follow-up investigation on vision-related reports",
    "Update adverse event database with new findings",
    "Consider regulatory notification if pattern persists",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub config: MonitoringConfig,
    pub total_events: u64,
    pub critical_events: u64,
    pub top_source: Option<String>,
    pub top_region: Option<String>,
    /// Alerts at or above the severity threshold.
    pub actionable: Vec<Alert>,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Report {
    pub fn compile(
        config: &MonitoringConfig,
        generated_at: DateTime<Utc>,
        distribution: &[SeverityCount],
        sources: &[SourceShare],
        geo: &[GeoPoint],
        board: &AlertBoard,
    ) -> Self {
        let total = total_events(distribution);
        let critical = count_for(distribution, Severity::Critical);
        let top_source = sources
            .iter()
            .max_by_key(|s| s.events)
            .map(|s| s.source.label().to_string());
        let top_region = region_totals(geo).into_iter().next().map(|(r, _)| r);

        let mut key_findings = vec![
            format!(
                "**Critical Events:** {critical} high-severity adverse events detected requiring immediate review"
            ),
            "**Detection Speed:** Events identified average 48 hours before traditional reporting"
                .to_string(),
            "**Primary Concerns:** Gastrointestinal issues (45%), neurological symptoms (23%), skin reactions (18%)"
                .to_string(),
            "**Trending Topics:** Dosage-related events increasing by 35% over past week"
                .to_string(),
        ];
        if let Some(region) = &top_region {
            key_findings.push(format!(
                "**Geographic Clusters:** Higher incident rates reported in {region} region"
            ));
        }

        Self {
            generated_at,
            config: config.clone(),
            total_events: total,
            critical_events: critical,
            top_source,
            top_region,
            actionable: board.alerts.iter().filter(|a| a.actionable).cloned().collect(),
            key_findings,
            recommendations: RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Download file name, e.g. `ComplianceWatch_Report_Ozempic_20250314.md`.
    pub fn file_name(&self) -> String {
        format!(
            "ComplianceWatch_Report_{}_{}.md",
            file_slug(&self.config.drug_name),
            self.generated_at.format("%Y%m%d")
        )
    }

    pub fn render_markdown(&self) -> String {
        let mut report = String::new();
        report.push_str("# ComplianceWatch — Compliance Report\n\n");
        report.push_str(&format!(
            "**Report Generated:** {}  \n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        for (label, value) in self.config.summary_lines() {
            report.push_str(&format!("**{label}:** {value}  \n"));
        }

        report.push_str("\n## Summary\n\n");
        report.push_str(&format!("- Total events detected: {}\n", self.total_events));
        report.push_str(&format!("- Critical events: {}\n", self.critical_events));
        report.push_str(&format!(
            "- Actionable alerts (score ≥ {}): {}\n",
            self.config.severity_threshold,
            self.actionable.len()
        ));
        if let Some(src) = &self.top_source {
            report.push_str(&format!("- Most active source: {src}\n"));
        }

        report.push_str("\n## Key Findings\n\n");
        for (i, finding) in self.key_findings.iter().enumerate() {
            report.push_str(&format!("{}. {finding}\n", i + 1));
        }

        if !self.actionable.is_empty() {
            report.push_str("\n## Actionable Alerts\n\n");
            report.push_str("| Severity | Score | Confidence | Source | Event |\n");
            report.push_str("|----------|-------|------------|--------|-------|\n");
            for a in &self.actionable {
                report.push_str(&format!(
                    "| {} | {:.1}/10 | {}% | {} | {} |\n",
                    a.severity,
                    a.score,
                    a.confidence,
                    a.source_detail,
                    a.description.replace('|', "\\|")
                ));
            }
        }

        report.push_str("\n## Recommended Actions\n\n");
        for rec in &self.recommendations {
            report.push_str(&format!("- {rec}\n"));
        }
        report.push_str("\n---\n_All figures are synthetic and generated for demonstration._\n");
        report
    }

    /// Write the markdown report into `dir`, returning the file path.
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.render_markdown())?;
        log::info!("report written to {}", path.display());
        Ok(path)
    }
}

/// Filename-safe form of a drug name.
pub fn file_slug(name: &str) -> String {
    let mut slug = String::new();
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            slug.push(c);
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_').to_string();
    if slug.is_empty() { "drug".to_string() } else { slug }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{DataSource, TimeWindow};
    use crate::synth::Synthesizer;
    use chrono::TimeZone;

    fn sample_report(config: &MonitoringConfig) -> Report {
        let mut synth = Synthesizer::seeded(21);
        let dist = synth.severity_distribution(config.time_window);
        let total = total_events(&dist);
        let shares = synth.source_distribution(&config.sources, total);
        let geo = synth.geo_points(total);
        let board = AlertBoard::build(config, synth.rng());
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
        Report::compile(config, at, &dist, &shares, &geo, &board)
    }

    #[test]
    fn slug_strips_unsafe_characters() {
        assert_eq!(file_slug("Ozempic"), "Ozempic");
        assert_eq!(file_slug(" Keytruda (pembrolizumab) "), "Keytruda_pembrolizumab");
        assert_eq!(file_slug("../../etc"), "etc");
        assert_eq!(file_slug("///"), "drug");
    }

    #[test]
    fn file_name_has_drug_and_date() {
        let config = MonitoringConfig {
            drug_name: "Ozempic".into(),
            ..Default::default()
        };
        assert_eq!(
            sample_report(&config).file_name(),
            "ComplianceWatch_Report_Ozempic_20250314.md"
        );
    }

    #[test]
    fn markdown_reads_back_configuration() {
        let config = MonitoringConfig {
            drug_name: "Keytruda".into(),
            sources: vec![DataSource::TwitterX, DataSource::PatientForums],
            time_window: TimeWindow::Last90Days,
            severity_threshold: 6,
            confidence_threshold: 80,
        };
        let md = sample_report(&config).render_markdown();
        assert!(md.contains("**Drug Monitored:** Keytruda"));
        assert!(md.contains("**Period:** Last 90 Days"));
        assert!(md.contains("**Data Sources:** Twitter/X, Patient Forums"));
        assert!(md.contains("**Severity Threshold:** 6/10"));
        assert!(md.contains("**Confidence Threshold:** 80%"));
        assert!(md.contains("2025-03-14 09:30:00 UTC"));
        assert!(md.contains("## Recommended Actions"));
    }

    #[test]
    fn markdown_sections_in_order() {
        let config = MonitoringConfig {
            drug_name: "Ozempic".into(),
            severity_threshold: 1,
            ..Default::default()
        };
        let report = sample_report(&config);
        let md = report.render_markdown();
        let at = |needle: &str| md.find(needle).unwrap();
        assert!(md.starts_with("# ComplianceWatch — Compliance Report\n\n**Report Generated:**"));
        assert!(at("## Summary") < at("## Key Findings"));
        assert!(at("## Key Findings") < at("## Actionable Alerts"));
        assert!(at("## Actionable Alerts") < at("## Recommended Actions"));
        assert!(md.contains(&format!("- Total events detected: {}\n", report.total_events)));
        assert!(md.contains("1. **Critical Events:**"));
        assert!(md.ends_with("generated for demonstration._\n"));
        assert!(!md.contains("\n\n\n"));
    }

    #[test]
    fn findings_interpolate_totals() {
        let config = MonitoringConfig {
            drug_name: "Ozempic".into(),
            ..Default::default()
        };
        let report = sample_report(&config);
        assert_eq!(report.key_findings.len(), 5);
        assert!(
            report.key_findings[0].contains(&format!("{} high-severity", report.critical_events))
        );
        assert_eq!(report.recommendations.len(), 4);
        assert!(report.actionable.iter().all(|a| a.score >= 5.0));
    }

    #[test]
    fn write_to_dir_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = MonitoringConfig {
            drug_name: "Ozempic".into(),
            ..Default::default()
        };
        let report = sample_report(&config);
        let path = report.write_to_dir(dir.path()).unwrap();
        assert!(path.ends_with(report.file_name()));
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("# ComplianceWatch"));
    }
}
