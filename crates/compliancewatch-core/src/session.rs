//! Per-session monitoring state.
//!
//! State that survives between renders is the "monitoring" flag, set by the
//! start action and kept until the session ends, plus the report of the last
//! monitoring render so a download matches what was on screen. A
//! [`SessionStore`] keeps one [`MonitorSession`] per visitor, keyed by a
//! random UUID.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::MonitoringConfig;
use crate::dashboard::{DashboardView, Screen};
use crate::error::Error;
use crate::report::Report;
use crate::synth::Synthesizer;

/// Default cap on concurrently tracked sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// What the user did to trigger this render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Any interaction other than pressing start.
    #[default]
    Refresh,
    /// The start-monitoring button.
    Start,
}

impl Action {
    /// `"start"` (case-insensitive) is the start button; anything else is a refresh.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case("start") => Self::Start,
            _ => Self::Refresh,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSession {
    pub monitoring: bool,
    pub renders: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub last_seen: DateTime<Utc>,
    /// Report of the most recent monitoring screen; `None` after any other screen.
    pub last_report: Option<Report>,
}

impl MonitorSession {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            monitoring: false,
            renders: 0,
            started_at: None,
            last_seen: now,
            last_report: None,
        }
    }

    /// Resolve one render pass.
    ///
    /// Start with a blank drug name shows the warning and leaves the flag as
    /// it was. Start with a drug name turns monitoring on; pressing it again
    /// keeps it on.
    pub fn render(
        &mut self,
        config: &MonitoringConfig,
        action: Action,
        synth: &mut Synthesizer,
        now: DateTime<Utc>,
    ) -> crate::Result<Screen> {
        self.renders += 1;
        self.last_seen = now;
        self.last_report = None;

        if action == Action::Start {
            if !config.has_drug() {
                log::info!("start requested without a drug name");
                return Ok(Screen::MissingDrugName);
            }
            if !self.monitoring {
                log::info!("monitoring started for '{}'", config.drug_name);
                self.monitoring = true;
                self.started_at = Some(now);
            }
        }

        if !self.monitoring {
            return Ok(Screen::Welcome);
        }
        match DashboardView::build(config, synth, now) {
            Ok(view) => {
                self.last_report = Some(view.report.clone());
                Ok(Screen::Monitoring(Box::new(view)))
            }
            Err(Error::MissingDrugName) => Ok(Screen::MissingDrugName),
            Err(e) => Err(e),
        }
    }
}

/// Sessions keyed by id, evicting the least recently seen when full.
#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<Uuid, MonitorSession>,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Fetch the session for `id`, creating it (with a fresh id if `id` is
    /// `None` or unknown). Returns the id actually used.
    pub fn get_or_create(
        &mut self,
        id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> (Uuid, &mut MonitorSession) {
        let id = match id {
            Some(id) if self.sessions.contains_key(&id) => id,
            _ => {
                self.evict_if_full();
                let id = Uuid::new_v4();
                self.sessions.insert(id, MonitorSession::new(now));
                log::debug!("new session {id}");
                id
            }
        };
        let session = self
            .sessions
            .entry(id)
            .or_insert_with(|| MonitorSession::new(now));
        (id, session)
    }

    pub fn get(&self, id: &Uuid) -> Option<&MonitorSession> {
        self.sessions.get(id)
    }

    /// End a session. Returns whether it existed.
    pub fn end(&mut self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn monitoring_count(&self) -> usize {
        self.sessions.values().filter(|s| s.monitoring).count()
    }

    fn evict_if_full(&mut self) {
        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|(_, s)| s.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    self.sessions.remove(&id);
                    log::debug!("evicted session {id}");
                }
                None => break,
            }
        }
    }
}
