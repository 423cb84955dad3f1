//! Monitoring configuration read from the sidebar controls.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::source::{DataSource, TimeWindow};

pub const SEVERITY_MIN: u8 = 1;
pub const SEVERITY_MAX: u8 = 10;
pub const CONFIDENCE_MIN: u8 = 50;
pub const CONFIDENCE_MAX: u8 = 100;

/// The five user-controlled inputs of a render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub drug_name: String,
    /// Selected sources, de-duplicated, in catalog order.
    pub sources: Vec<DataSource>,
    pub time_window: TimeWindow,
    /// Minimum score (1-10) for an alert to count as actionable.
    pub severity_threshold: u8,
    /// Minimum classifier confidence (50-100%) for an alert to be listed.
    pub confidence_threshold: u8,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            drug_name: String::new(),
            sources: vec![DataSource::Reddit, DataSource::FdaFaers],
            time_window: TimeWindow::default(),
            severity_threshold: 5,
            confidence_threshold: 70,
        }
    }
}

impl MonitoringConfig {
    /// Build a config from form or query-string pairs.
    ///
    /// Recognised keys: `drug`, `source` (repeatable), `sources` (comma
    /// separated), `window`, `severity`, `confidence`. Anything else is
    /// ignored. When no source key is present the default selection is kept;
    /// an explicitly empty `sources=` clears it.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        let mut sources: Option<Vec<DataSource>> = None;

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "drug" | "drug_name" => config.drug_name = value.trim().to_string(),
                "source" => {
                    let list = sources.get_or_insert_with(Vec::new);
                    if !value.trim().is_empty() {
                        list.push(value.parse()?);
                    }
                }
                "sources" => {
                    let list = sources.get_or_insert_with(Vec::new);
                    for part in value.split(',').filter(|p| !p.trim().is_empty()) {
                        list.push(part.parse()?);
                    }
                }
                "window" | "period" => config.time_window = value.parse()?,
                "severity" => {
                    config.severity_threshold =
                        parse_bounded("severity threshold", value, SEVERITY_MIN, SEVERITY_MAX)?
                }
                "confidence" => {
                    config.confidence_threshold = parse_bounded(
                        "confidence threshold",
                        value,
                        CONFIDENCE_MIN,
                        CONFIDENCE_MAX,
                    )?
                }
                _ => {}
            }
        }

        if let Some(list) = sources {
            config.set_sources(list);
        }
        Ok(config)
    }

    /// Replace the source selection, normalising order and duplicates.
    pub fn set_sources(&mut self, list: Vec<DataSource>) {
        self.sources = DataSource::ALL
            .into_iter()
            .filter(|src| list.contains(src))
            .collect();
    }

    /// Toggle a single source in or out of the selection.
    pub fn toggle_source(&mut self, source: DataSource) {
        let mut list = self.sources.clone();
        if let Some(pos) = list.iter().position(|s| *s == source) {
            list.remove(pos);
        } else {
            list.push(source);
        }
        self.set_sources(list);
    }

    /// Re-check the numeric bounds. Used for configs assembled by hand.
    pub fn validate(&self) -> Result<()> {
        check_bounds(
            "severity threshold",
            i64::from(self.severity_threshold),
            SEVERITY_MIN,
            SEVERITY_MAX,
        )?;
        check_bounds(
            "confidence threshold",
            i64::from(self.confidence_threshold),
            CONFIDENCE_MIN,
            CONFIDENCE_MAX,
        )
    }

    pub fn has_drug(&self) -> bool {
        !self.drug_name.trim().is_empty()
    }

    /// Sources joined for display, or "None selected".
    pub fn sources_label(&self) -> String {
        if self.sources.is_empty() {
            "None selected".to_string()
        } else {
            self.sources
                .iter()
                .map(|s| s.label())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// Configuration summary shown above the report.
    pub fn summary_lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Drug Monitored", self.drug_name.clone()),
            ("Period", self.time_window.label().to_string()),
            ("Data Sources", self.sources_label()),
            (
                "Severity Threshold",
                format!("{}/{}", self.severity_threshold, SEVERITY_MAX),
            ),
            (
                "Confidence Threshold",
                format!("{}%", self.confidence_threshold),
            ),
        ]
    }

    /// Query pairs that reproduce this config through [`Self::from_pairs`].
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("drug", self.drug_name.clone())];
        pairs.push((
            "sources",
            self.sources
                .iter()
                .map(|s| s.slug())
                .collect::<Vec<_>>()
                .join(","),
        ));
        pairs.push(("window", self.time_window.slug().to_string()));
        pairs.push(("severity", self.severity_threshold.to_string()));
        pairs.push(("confidence", self.confidence_threshold.to_string()));
        pairs
    }
}

fn parse_bounded(field: &'static str, raw: &str, min: u8, max: u8) -> Result<u8> {
    let value: i64 = raw.trim().parse().map_err(|_| Error::InvalidNumber {
        field,
        value: raw.trim().to_string(),
    })?;
    check_bounds(field, value, min, max)?;
    Ok(value as u8)
}

fn check_bounds(field: &'static str, value: i64, min: u8, max: u8) -> Result<()> {
    if value < i64::from(min) || value > i64::from(max) {
        return Err(Error::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sidebar() {
        let c = MonitoringConfig::default();
        assert!(!c.has_drug());
        assert_eq!(c.sources, vec![DataSource::Reddit, DataSource::FdaFaers]);
        assert_eq!(c.time_window, TimeWindow::Last24Hours);
        assert_eq!(c.severity_threshold, 5);
        assert_eq!(c.confidence_threshold, 70);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn from_pairs_reads_every_control() {
        let c = MonitoringConfig::from_pairs([
            ("drug", "  Ozempic "),
            ("source", "faers"),
            ("source", "Twitter/X"),
            ("window", "30d"),
            ("severity", "7"),
            ("confidence", "85"),
            ("action", "start"),
        ])
        .unwrap();
        assert_eq!(c.drug_name, "Ozempic");
        assert_eq!(c.sources, vec![DataSource::TwitterX, DataSource::FdaFaers]);
        assert_eq!(c.time_window, TimeWindow::Last30Days);
        assert_eq!(c.severity_threshold, 7);
        assert_eq!(c.confidence_threshold, 85);
    }

    #[test]
    fn comma_separated_sources_are_deduplicated() {
        let c = MonitoringConfig::from_pairs([("sources", "reddit,forums,reddit")]).unwrap();
        assert_eq!(c.sources, vec![DataSource::Reddit, DataSource::PatientForums]);
    }

    #[test]
    fn explicit_empty_sources_clears_selection() {
        let c = MonitoringConfig::from_pairs([("sources", "")]).unwrap();
        assert!(c.sources.is_empty());
        assert_eq!(c.sources_label(), "None selected");
    }

    #[test]
    fn out_of_range_thresholds_are_rejected() {
        let err = MonitoringConfig::from_pairs([("severity", "0")]).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { value: 0, .. }));
        let err = MonitoringConfig::from_pairs([("confidence", "101")]).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { value: 101, .. }));
        let err = MonitoringConfig::from_pairs([("confidence", "high")]).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { .. }));
    }

    #[test]
    fn validate_catches_hand_built_configs() {
        let c = MonitoringConfig {
            confidence_threshold: 20,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn toggle_source_keeps_catalog_order() {
        let mut c = MonitoringConfig::default();
        c.toggle_source(DataSource::TwitterX);
        assert_eq!(
            c.sources,
            vec![DataSource::Reddit, DataSource::TwitterX, DataSource::FdaFaers]
        );
        c.toggle_source(DataSource::Reddit);
        assert_eq!(c.sources, vec![DataSource::TwitterX, DataSource::FdaFaers]);
    }

    #[test]
    fn pairs_round_trip_through_from_pairs() {
        let c = MonitoringConfig {
            drug_name: "Keytruda".into(),
            sources: vec![DataSource::FacebookGroups],
            time_window: TimeWindow::Last90Days,
            severity_threshold: 3,
            confidence_threshold: 95,
        };
        assert_eq!(MonitoringConfig::from_pairs(c.to_pairs()).unwrap(), c);
    }

    #[test]
    fn summary_reads_back_selection() {
        let c = MonitoringConfig {
            drug_name: "Keytruda".into(),
            ..Default::default()
        };
        let lines = c.summary_lines();
        assert_eq!(lines[0], ("Drug Monitored", "Keytruda".to_string()));
        assert_eq!(lines[1], ("Period", "Last 24 Hours".to_string()));
        assert_eq!(lines[2], ("Data Sources", "Reddit, FDA FAERS".to_string()));
        assert_eq!(lines[3], ("Severity Threshold", "5/10".to_string()));
        assert_eq!(lines[4], ("Confidence Threshold", "70%".to_string()));
    }
}
