//! HTTP front end for ComplianceWatch.
//!
//! Serves the dashboard page (a GET form whose monitoring flag lives in a
//! cookie-keyed session), a JSON API over the same render pipeline, and the
//! markdown compliance report as a download.

mod html;

use std::io;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use compliancewatch_core::{
    Action, DEFAULT_MAX_SESSIONS, DashboardView, DataSource, Error, MonitoringConfig, Report,
    SessionStore, Synthesizer, TimeWindow,
};

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "cw_session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seed for the synthetic data stream; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            seed: None,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared server state.
struct AppState {
    inner: Mutex<Inner>,
}

struct Inner {
    sessions: SessionStore,
    synth: Synthesizer,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    sessions: usize,
    monitoring: usize,
    version: String,
}

type Pairs = Vec<(String, String)>;

fn parse_config(pairs: &[(String, String)]) -> compliancewatch_core::Result<MonitoringConfig> {
    MonitoringConfig::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

fn pair_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn error_status(err: &Error) -> StatusCode {
    if err.is_missing_input() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::BAD_REQUEST
    }
}

trait JsonWithStatus<T> {
    fn with_status(self, status: StatusCode) -> (StatusCode, Json<T>);
}

impl<T> JsonWithStatus<T> for Json<T> {
    fn with_status(self, status: StatusCode) -> (StatusCode, Json<T>) {
        (status, self)
    }
}

fn json_error(err: &Error) -> Response {
    log::debug!("api request rejected: {err}");
    Json(ErrorResponse {
        success: false,
        error: err.to_string(),
    })
    .with_status(error_status(err))
    .into_response()
}

/// Session id from the request's `Cookie` headers, if present and well formed.
fn session_cookie(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

fn set_cookie(response: &mut Response, cookie: &str) {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}

async fn handle_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(pairs): Query<Pairs>,
) -> Response {
    let action = Action::parse(pair_value(&pairs, "action"));
    let config = match parse_config(&pairs) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("rejected dashboard form: {e}");
            return (
                StatusCode::BAD_REQUEST,
                Html(html::render_error_page(&e.to_string())),
            )
                .into_response();
        }
    };

    let cookie = session_cookie(&headers);
    let now = Utc::now();
    let (id, result) = {
        let mut inner = state.inner.lock().await;
        let Inner { sessions, synth } = &mut *inner;
        let (id, session) = sessions.get_or_create(cookie, now);
        (id, session.render(&config, action, synth, now))
    };

    let mut response = match result {
        Ok(screen) => Html(html::render_page(&config, &screen)).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Html(html::render_error_page(&e.to_string())),
        )
            .into_response(),
    };
    if cookie != Some(id) {
        set_cookie(
            &mut response,
            &format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"),
        );
    }
    response
}

async fn handle_end_session(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(id) = session_cookie(&headers) {
        let ended = state.inner.lock().await.sessions.end(&id);
        log::info!("session {id} ended (known: {ended})");
    }
    let mut response = (StatusCode::SEE_OTHER, [(header::LOCATION, "/")]).into_response();
    set_cookie(
        &mut response,
        &format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"),
    );
    response
}

/// Render a dashboard for an API request. API calls always behave as if
/// start was pressed and do not touch any session.
async fn build_view(
    state: &AppState,
    pairs: &[(String, String)],
) -> compliancewatch_core::Result<DashboardView> {
    let config = parse_config(pairs)?;
    let mut inner = state.inner.lock().await;
    DashboardView::build(&config, &mut inner.synth, Utc::now())
}

async fn handle_dashboard(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Pairs>,
) -> Response {
    match build_view(&state, &pairs).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => json_error(&e),
    }
}

async fn handle_alerts(State(state): State<Arc<AppState>>, Query(pairs): Query<Pairs>) -> Response {
    match build_view(&state, &pairs).await {
        Ok(view) => Json(view.alerts).into_response(),
        Err(e) => json_error(&e),
    }
}

fn markdown_attachment(report: &Report) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", report.file_name());
    (
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.render_markdown(),
    )
        .into_response()
}

async fn handle_report(State(state): State<Arc<AppState>>, Query(pairs): Query<Pairs>) -> Response {
    match build_view(&state, &pairs).await {
        Ok(view) => markdown_attachment(&view.report),
        Err(e) => json_error(&e),
    }
}

/// The report shown on the session's last monitoring screen, byte for byte.
async fn handle_session_report(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let report = match session_cookie(&headers) {
        Some(id) => {
            let inner = state.inner.lock().await;
            inner.sessions.get(&id).and_then(|s| s.last_report.clone())
        }
        None => None,
    };
    match report {
        Some(report) => markdown_attachment(&report),
        None => Json(ErrorResponse {
            success: false,
            error: "no report on screen for this session; start monitoring first".to_string(),
        })
        .with_status(StatusCode::NOT_FOUND)
        .into_response(),
    }
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let inner = state.inner.lock().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        sessions: inner.sessions.len(),
        monitoring: inner.sessions.monitoring_count(),
        version: compliancewatch_core::VERSION.to_string(),
    })
}

async fn handle_index() -> Json<serde_json::Value> {
    let sources: Vec<&str> = DataSource::ALL.iter().map(|s| s.slug()).collect();
    let windows: Vec<&str> = TimeWindow::ALL.iter().map(|w| w.slug()).collect();

    Json(serde_json::json!({
        "name": "ComplianceWatch Server",
        "version": compliancewatch_core::VERSION,
        "endpoints": {
            "/": "Dashboard page (HTML)",
            "/api": "This API index",
            "/api/v1/dashboard": {
                "method": "GET",
                "description": "Full synthetic dashboard for one drug",
                "params": {
                    "drug": "Drug name (required)",
                    "source": format!("Data source, repeatable. Available: {}", sources.join(", ")),
                    "window": format!("Monitoring period: {} (default: 24h)", windows.join(", ")),
                    "severity": "Severity threshold 1-10 (default: 5)",
                    "confidence": "Confidence threshold 50-100 (default: 70)",
                }
            },
            "/api/v1/alerts": "Alert board only, same params",
            "/api/v1/report": "Markdown compliance report download, same params",
            "/session/report": "Report currently on screen for this session (cookie)",
            "/session/end": "POST: end the current session",
            "/health": "Health check",
        },
        "examples": {
            "dashboard": "/api/v1/dashboard?drug=Ozempic&source=reddit&source=faers&window=7d",
            "report": "/api/v1/report?drug=Ozempic&severity=6",
        }
    }))
}

/// Build the axum router.
pub fn build_router(config: &ServerConfig) -> Router {
    let state = Arc::new(AppState {
        inner: Mutex::new(Inner {
            sessions: SessionStore::new(config.max_sessions),
            synth: Synthesizer::new(config.seed),
        }),
    });

    Router::new()
        .route("/", get(handle_page))
        .route("/api", get(handle_index))
        .route("/api/v1/dashboard", get(handle_dashboard))
        .route("/api/v1/alerts", get(handle_alerts))
        .route("/api/v1/report", get(handle_report))
        .route("/health", get(handle_health))
        .route("/session/report", get(handle_session_report))
        .route("/session/end", post(handle_end_session))
        .with_state(state)
}

/// Run the HTTP server until it fails.
pub async fn run_server(config: ServerConfig) -> io::Result<()> {
    let app = build_router(&config);
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("ComplianceWatch listening on http://{addr}");
    axum::serve(listener, app).await
}
