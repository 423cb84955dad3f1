//! Monitored data sources and monitoring periods.
//!
//! Both enums are closed catalogs: the dashboard only ever offers these
//! options, so parsing rejects anything else.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Platform scanned for adverse-event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Reddit,
    TwitterX,
    FacebookGroups,
    PatientForums,
    FdaFaers,
}

impl DataSource {
    /// Catalog order, as offered in the sidebar.
    pub const ALL: [DataSource; 5] = [
        Self::Reddit,
        Self::TwitterX,
        Self::FacebookGroups,
        Self::PatientForums,
        Self::FdaFaers,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Reddit => "Reddit",
            Self::TwitterX => "Twitter/X",
            Self::FacebookGroups => "Facebook Groups",
            Self::PatientForums => "Patient Forums",
            Self::FdaFaers => "FDA FAERS",
        }
    }

    /// Short identifier used in query strings and CLI flags.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Reddit => "reddit",
            Self::TwitterX => "twitter",
            Self::FacebookGroups => "facebook",
            Self::PatientForums => "forums",
            Self::FdaFaers => "faers",
        }
    }

    /// Relative event volume used when splitting totals across sources.
    pub fn base_weight(self) -> f64 {
        match self {
            Self::Reddit => 89.0,
            Self::FdaFaers => 67.0,
            Self::TwitterX => 54.0,
            Self::FacebookGroups => 41.0,
            Self::PatientForums => 37.0,
        }
    }

    /// Chart colour.
    pub fn color(self) -> &'static str {
        match self {
            Self::Reddit => "#667eea",
            Self::TwitterX => "#10b981",
            Self::FacebookGroups => "#3b82f6",
            Self::PatientForums => "#f59e0b",
            Self::FdaFaers => "#764ba2",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DataSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|src| src.slug() == needle || src.label().to_lowercase() == needle)
            .or(match needle.as_str() {
                "twitter/x" | "x" => Some(Self::TwitterX),
                "fda" => Some(Self::FdaFaers),
                _ => None,
            })
            .ok_or_else(|| Error::UnknownSource(s.trim().to_string()))
    }
}

/// Granularity of a timeline bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketUnit {
    Hour,
    Day,
}

impl BucketUnit {
    pub fn duration(self) -> Duration {
        match self {
            Self::Hour => Duration::hours(1),
            Self::Day => Duration::days(1),
        }
    }
}

/// Historical period the dashboard summarises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    #[default]
    #[serde(rename = "24h")]
    Last24Hours,
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 4] = [
        Self::Last24Hours,
        Self::Last7Days,
        Self::Last30Days,
        Self::Last90Days,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Last24Hours => "Last 24 Hours",
            Self::Last7Days => "Last 7 Days",
            Self::Last30Days => "Last 30 Days",
            Self::Last90Days => "Last 90 Days",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Last24Hours => "24h",
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
            Self::Last90Days => "90d",
        }
    }

    /// Timeline layout: bucket unit and number of buckets.
    pub fn buckets(self) -> (BucketUnit, usize) {
        match self {
            Self::Last24Hours => (BucketUnit::Hour, 24),
            Self::Last7Days => (BucketUnit::Day, 7),
            Self::Last30Days => (BucketUnit::Day, 30),
            Self::Last90Days => (BucketUnit::Day, 90),
        }
    }

    /// Multiplier applied to the 30-day baseline event volume.
    pub fn volume_scale(self) -> f64 {
        match self {
            Self::Last24Hours => 0.15,
            Self::Last7Days => 0.5,
            Self::Last30Days => 1.0,
            Self::Last90Days => 2.8,
        }
    }

    /// Next option in catalog order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Last24Hours => Self::Last7Days,
            Self::Last7Days => Self::Last30Days,
            Self::Last30Days => Self::Last90Days,
            Self::Last90Days => Self::Last24Hours,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Last24Hours => Self::Last90Days,
            Self::Last7Days => Self::Last24Hours,
            Self::Last30Days => Self::Last7Days,
            Self::Last90Days => Self::Last30Days,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeWindow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|w| w.slug() == needle || w.label().to_lowercase() == needle)
            .ok_or_else(|| Error::UnknownTimeWindow(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_parses_label_and_slug() {
        assert_eq!("reddit".parse::<DataSource>().unwrap(), DataSource::Reddit);
        assert_eq!("FDA FAERS".parse::<DataSource>().unwrap(), DataSource::FdaFaers);
        assert_eq!("Twitter/X".parse::<DataSource>().unwrap(), DataSource::TwitterX);
        assert_eq!(" forums ".parse::<DataSource>().unwrap(), DataSource::PatientForums);
    }

    #[test]
    fn source_rejects_unknown() {
        let err = "myspace".parse::<DataSource>().unwrap_err();
        assert_eq!(err, Error::UnknownSource("myspace".into()));
    }

    #[test]
    fn source_display_is_label() {
        for src in DataSource::ALL {
            assert_eq!(src.to_string(), src.label());
            assert_eq!(src.label().parse::<DataSource>().unwrap(), src);
        }
    }

    #[test]
    fn window_parses_slug_and_label() {
        assert_eq!("7d".parse::<TimeWindow>().unwrap(), TimeWindow::Last7Days);
        assert_eq!(
            "last 90 days".parse::<TimeWindow>().unwrap(),
            TimeWindow::Last90Days
        );
        assert!("1y".parse::<TimeWindow>().is_err());
    }

    #[test]
    fn window_cycles_both_ways() {
        for w in TimeWindow::ALL {
            assert_eq!(w.next().prev(), w);
        }
        assert_eq!(TimeWindow::Last90Days.next(), TimeWindow::Last24Hours);
    }

    #[test]
    fn window_bucket_layout() {
        assert_eq!(TimeWindow::Last24Hours.buckets(), (BucketUnit::Hour, 24));
        assert_eq!(TimeWindow::Last30Days.buckets(), (BucketUnit::Day, 30));
    }
}
