//! # compliancewatch-core
//!
//! **Adverse-event monitoring dashboard, minus the dashboard.**
//!
//! `compliancewatch-core` holds everything a ComplianceWatch front end needs
//! to render: the monitoring configuration, a seeded synthetic signal engine,
//! the alert feed, a trend forecast and the compliance report. All data is
//! synthetic; nothing here reaches a real social network or FDA system.
//!
//! ## Quick Start
//!
//! ```
//! use compliancewatch_core::{Action, MonitorSession, MonitoringConfig, Synthesizer};
//!
//! let config = MonitoringConfig {
//!     drug_name: "Ozempic".into(),
//!     ..Default::default()
//! };
//! let mut synth = Synthesizer::seeded(42);
//! let mut session = MonitorSession::new(chrono::Utc::now());
//!
//! let screen = session
//!     .render(&config, Action::Start, &mut synth, chrono::Utc::now())
//!     .unwrap();
//! let view = screen.view().unwrap();
//! println!("{} events, {} alerts", view.total_events(), view.alerts.alerts.len());
//! ```
//!
//! ## Architecture
//!
//! Config → Session (monitoring flag) → Synthesizer → DashboardView → front end
//!
//! One render draws every series from a single [`Synthesizer`], so the KPI
//! row, charts, map and report of that render agree on their totals.

pub mod alert;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod report;
pub mod session;
pub mod source;
pub mod synth;

pub use alert::{Alert, AlertBoard, Severity, format_time_ago};
pub use config::{
    CONFIDENCE_MAX, CONFIDENCE_MIN, MonitoringConfig, SEVERITY_MAX, SEVERITY_MIN,
};
pub use dashboard::{APP_NAME, DashboardView, Screen, TAGLINE, Tab};
pub use error::{Error, Result};
pub use forecast::{ForecastParams, ForecastPoint};
pub use report::Report;
pub use session::{Action, DEFAULT_MAX_SESSIONS, MonitorSession, SessionStore};
pub use source::{BucketUnit, DataSource, TimeWindow};
pub use synth::{
    GeoPoint, Metric, ModelStats, RiskSurface, SeverityCount, SourceShare, Synthesizer,
    TimelinePoint, WeeklyTrend, apportion,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
