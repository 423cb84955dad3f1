//! Integration tests for compliancewatch-core.
//!
//! These tests drive the full render pipeline:
//! query pairs → config → session → synthesizer → dashboard view → report.

use chrono::{TimeZone, Utc};
use compliancewatch_core::{
    Action, DataSource, MonitorSession, MonitoringConfig, Screen, SessionStore, Synthesizer, Tab,
    TimeWindow,
};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
}

#[test]
fn blank_drug_never_renders_tabs() {
    for drug in ["", " ", "\t\n"] {
        let config = MonitoringConfig {
            drug_name: drug.into(),
            ..Default::default()
        };
        let mut session = MonitorSession::new(now());
        let mut synth = Synthesizer::seeded(1);
        let screen = session
            .render(&config, Action::Start, &mut synth, now())
            .unwrap();
        assert_eq!(screen, Screen::MissingDrugName, "drug {drug:?}");
        assert!(screen.warning().is_some());
        assert!(screen.view().is_none());
    }
}

#[test]
fn any_drug_renders_every_tab() {
    for (seed, drug) in ["Ozempic", "Keytruda", "Humira", "x"].iter().enumerate() {
        for window in TimeWindow::ALL {
            let config = MonitoringConfig {
                drug_name: drug.to_string(),
                time_window: window,
                ..Default::default()
            };
            let mut session = MonitorSession::new(now());
            let mut synth = Synthesizer::seeded(seed as u64);
            let screen = session
                .render(&config, Action::Start, &mut synth, now())
                .unwrap();
            let view = screen.view().expect("monitoring view");
            assert_eq!(view.tabs(), &Tab::ALL);
            assert_eq!(view.metrics.len(), 5);
            assert_eq!(view.severity.len(), 4);
            assert_eq!(view.timeline.len(), window.buckets().1);
            assert!(!view.forecast.is_empty());
            assert!(!view.geo.is_empty());
            assert!(!view.report.key_findings.is_empty());
        }
    }
}

#[test]
fn configuration_reads_back_into_report() {
    let config = MonitoringConfig::from_pairs([
        ("drug", "Mounjaro"),
        ("source", "twitter"),
        ("source", "faers"),
        ("window", "30d"),
        ("severity", "7"),
        ("confidence", "85"),
    ])
    .unwrap();
    assert_eq!(config.sources, vec![DataSource::TwitterX, DataSource::FdaFaers]);

    let mut session = MonitorSession::new(now());
    let mut synth = Synthesizer::seeded(9);
    let screen = session
        .render(&config, Action::Start, &mut synth, now())
        .unwrap();
    let view = screen.view().unwrap();
    assert_eq!(view.config, config);

    let md = view.report.render_markdown();
    assert!(md.contains("**Drug Monitored:** Mounjaro"));
    assert!(md.contains("**Period:** Last 30 Days"));
    assert!(md.contains("**Data Sources:** Twitter/X, FDA FAERS"));
    assert!(md.contains("**Severity Threshold:** 7/10"));
    assert!(md.contains("**Confidence Threshold:** 85%"));
}

#[test]
fn repeated_start_keeps_flag_on() {
    let mut store = SessionStore::default();
    let config = MonitoringConfig {
        drug_name: "Ozempic".into(),
        ..Default::default()
    };
    let mut synth = Synthesizer::seeded(4);
    let (id, _) = store.get_or_create(None, now());

    for _ in 0..5 {
        let (same, session) = store.get_or_create(Some(id), now());
        assert_eq!(same, id);
        let screen = session
            .render(&config, Action::Start, &mut synth, now())
            .unwrap();
        assert!(screen.is_monitoring());
        assert!(session.monitoring);
    }
    assert_eq!(store.monitoring_count(), 1);
}

#[test]
fn alerts_respect_source_selection_and_thresholds() {
    let config = MonitoringConfig {
        drug_name: "Ozempic".into(),
        sources: DataSource::ALL.to_vec(),
        severity_threshold: 8,
        confidence_threshold: 50,
        ..Default::default()
    };
    let mut session = MonitorSession::new(now());
    let mut synth = Synthesizer::seeded(12);
    let screen = session
        .render(&config, Action::Start, &mut synth, now())
        .unwrap();
    let board = &screen.view().unwrap().alerts;
    assert_eq!(board.suppressed, 0);
    assert!(board.alerts.iter().all(|a| a.actionable == (a.score >= 8.0)));
    assert!(board.alerts.iter().any(|a| a.description.contains("Ozempic")));

    let reddit_only = MonitoringConfig {
        sources: vec![DataSource::Reddit],
        ..config
    };
    let screen = session
        .render(&reddit_only, Action::Refresh, &mut synth, now())
        .unwrap();
    let board = &screen.view().unwrap().alerts;
    assert!(board.alerts.iter().all(|a| a.source == DataSource::Reddit));
}

#[test]
fn seeded_sessions_are_reproducible() {
    let config = MonitoringConfig {
        drug_name: "Ozempic".into(),
        ..Default::default()
    };
    let render = |seed| {
        let mut session = MonitorSession::new(now());
        session
            .render(&config, Action::Start, &mut Synthesizer::seeded(seed), now())
            .unwrap()
    };
    assert_eq!(render(99), render(99));
}
