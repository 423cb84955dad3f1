//! HTML page rendering.
//!
//! Produces one self-contained page per request: inline CSS, SVG charts, no
//! JavaScript. The sidebar is a plain GET form, so every interaction is a
//! fresh render of the same route. Tabs use radio inputs and CSS.

use compliancewatch_core::dashboard::{
    FEATURES, HOW_TO_STEPS, VALUE_POINTS, WELCOME_INTRO, WELCOME_TITLE,
};
use compliancewatch_core::synth::region_totals;
use compliancewatch_core::{
    APP_NAME, AlertBoard, CONFIDENCE_MAX, CONFIDENCE_MIN, DashboardView, DataSource, ForecastPoint,
    GeoPoint, Metric, MonitoringConfig, RiskSurface, SEVERITY_MAX, SEVERITY_MIN, Screen,
    SeverityCount, SourceShare, TAGLINE, Tab, TimeWindow, TimelinePoint,
};

const CHART_W: f64 = 640.0;
const CHART_H: f64 = 180.0;
const MAP_H: f64 = 288.0;

/// Render the full page for one screen.
pub fn render_page(config: &MonitoringConfig, screen: &Screen) -> String {
    let main = match screen {
        Screen::Welcome => render_welcome(),
        Screen::MissingDrugName => render_warning(&screen.warning().unwrap_or_default()),
        Screen::Monitoring(view) => render_monitoring(view),
    };
    page(config, &main)
}

/// Render the page for a request whose configuration could not be read.
pub fn render_error_page(message: &str) -> String {
    let main = format!(
        r#"<div class="warning">⚠️ {message}</div>
<p><a href="/">Back to the dashboard</a></p>"#,
        message = html_escape(message),
    );
    page(&MonitoringConfig::default(), &main)
}

fn page(config: &MonitoringConfig, main: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{app} - Drug Safety Monitoring</title>
    <style>{css}</style>
</head>
<body>
    <div class="layout">
        {sidebar}
        <main>
            <header>
                <h1>🔍 {app}</h1>
                <div class="meta">{tagline}</div>
            </header>
            {main}
            {footer}
        </main>
    </div>
</body>
</html>"#,
        app = APP_NAME,
        tagline = TAGLINE,
        css = inline_css(),
        sidebar = render_sidebar(config),
        main = main,
        footer = render_footer(),
    )
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, -apple-system, 'Segoe UI', sans-serif; line-height: 1.5; color: #111827; background: #f8fafc; }
.layout { display: flex; min-height: 100vh; }
aside { width: 300px; background: #1e1b4b; color: #e0e7ff; padding: 1.5rem; }
aside h2 { font-size: 1.1rem; margin-bottom: 1rem; }
aside label { display: block; font-size: 0.8rem; margin: 0.9rem 0 0.3rem; text-transform: uppercase; letter-spacing: 0.04em; }
aside input[type=text], aside select { width: 100%; padding: 0.4rem; border-radius: 0.3rem; border: none; }
aside input[type=range] { width: 100%; }
aside .check { display: block; text-transform: none; letter-spacing: 0; font-size: 0.9rem; margin: 0.2rem 0; }
aside button { width: 100%; margin-top: 1rem; padding: 0.6rem; border: none; border-radius: 0.4rem; cursor: pointer; font-weight: 600; }
aside button.primary { background: linear-gradient(90deg, #667eea, #764ba2); color: white; }
aside button.secondary { background: #312e81; color: #e0e7ff; }
main { flex: 1; padding: 2rem; max-width: 1200px; }
header { margin-bottom: 1.5rem; padding-bottom: 1rem; border-bottom: 2px solid #e5e7eb; }
header h1 { font-size: 2rem; background: linear-gradient(90deg, #667eea, #764ba2); -webkit-background-clip: text; color: transparent; }
header .meta { color: #6b7280; }
h2 { font-size: 1.3rem; margin: 1.2rem 0 0.6rem; }
h3 { font-size: 1rem; margin: 1rem 0 0.5rem; }
.warning { background: #fef3c7; border-left: 4px solid #f59e0b; padding: 1rem; border-radius: 0.4rem; margin: 1rem 0; }
.welcome ol, .welcome ul { margin-left: 1.5rem; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
.cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(170px, 1fr)); gap: 1rem; margin-bottom: 1.5rem; }
.card { background: white; padding: 1rem; border-radius: 0.5rem; border-left: 4px solid #667eea; box-shadow: 0 1px 2px rgba(0,0,0,0.06); }
.card h3 { font-size: 0.8rem; color: #6b7280; margin: 0; }
.card .value { font-size: 1.6rem; font-weight: 700; }
.delta-good { color: #10b981; font-size: 0.85rem; }
.delta-bad { color: #ef4444; font-size: 0.85rem; }
.tabs > input { display: none; }
.tabs > label { display: inline-block; padding: 0.5rem 1rem; cursor: pointer; border-bottom: 3px solid transparent; }
.tabs > input:checked + label { border-bottom-color: #667eea; font-weight: 600; }
.tab-panel { display: none; padding-top: 1rem; }
#tab-dashboard:checked ~ .panel-dashboard,
#tab-alerts:checked ~ .panel-alerts,
#tab-analytics:checked ~ .panel-analytics,
#tab-geographic:checked ~ .panel-geographic,
#tab-report:checked ~ .panel-report { display: block; }
.bar-row { display: flex; align-items: center; gap: 0.5rem; margin: 0.3rem 0; }
.bar-label { width: 150px; font-size: 0.85rem; }
.bar-track { flex: 1; background: #e5e7eb; border-radius: 0.25rem; }
.bar { height: 1rem; border-radius: 0.25rem; }
.bar-value { width: 70px; text-align: right; font-size: 0.85rem; }
svg { background: white; border-radius: 0.4rem; }
table { width: 100%; border-collapse: collapse; background: white; margin-bottom: 1rem; }
th, td { padding: 0.45rem 0.6rem; border-bottom: 1px solid #e5e7eb; text-align: left; font-size: 0.85rem; }
th { background: #f3f4f6; }
.alert { background: white; border-radius: 0.5rem; padding: 0.8rem 1rem; margin: 0.6rem 0; border-left: 5px solid #9ca3af; }
.alert-critical { border-left-color: #ef4444; }
.alert-high { border-left-color: #f97316; }
.alert-medium { border-left-color: #f59e0b; }
.alert-low { border-left-color: #10b981; }
.alert .meta { color: #6b7280; font-size: 0.8rem; }
.tag { display: inline-block; background: #ede9fe; color: #5b21b6; padding: 0 0.4rem; border-radius: 0.25rem; font-size: 0.75rem; }
.muted { color: #6b7280; font-size: 0.85rem; }
pre.report { background: white; padding: 1rem; border-radius: 0.4rem; white-space: pre-wrap; font-size: 0.85rem; }
a.download { display: inline-block; margin: 0.5rem 0; padding: 0.5rem 1rem; background: #667eea; color: white; border-radius: 0.4rem; text-decoration: none; }
footer { margin-top: 2rem; color: #9ca3af; font-size: 0.8rem; }
"#
}

fn render_sidebar(config: &MonitoringConfig) -> String {
    let checkboxes: String = DataSource::ALL
        .iter()
        .map(|src| {
            format!(
                r#"<label class="check"><input type="checkbox" name="source" value="{slug}"{checked}> {label}</label>"#,
                slug = src.slug(),
                label = src.label(),
                checked = if config.sources.contains(src) { " checked" } else { "" },
            )
        })
        .collect();

    let options: String = TimeWindow::ALL
        .iter()
        .map(|w| {
            format!(
                r#"<option value="{slug}"{selected}>{label}</option>"#,
                slug = w.slug(),
                label = w.label(),
                selected = if *w == config.time_window { " selected" } else { "" },
            )
        })
        .collect();

    format!(
        r#"<aside>
    <h2>⚙️ Monitoring Configuration</h2>
    <form method="get" action="/">
        <label for="drug">Drug Name</label>
        <input type="text" id="drug" name="drug" value="{drug}" placeholder="e.g., Ozempic, Humira, Keytruda">
        <label>Data Sources</label>
        <input type="hidden" name="sources" value="">
        {checkboxes}
        <label for="window">Monitoring Period</label>
        <select id="window" name="window">{options}</select>
        <label for="severity">Severity Threshold: {severity}</label>
        <input type="range" id="severity" name="severity" min="{sev_min}" max="{sev_max}" value="{severity}">
        <label for="confidence">Confidence Threshold: {confidence}%</label>
        <input type="range" id="confidence" name="confidence" min="{conf_min}" max="{conf_max}" value="{confidence}">
        <button class="primary" type="submit" name="action" value="start">🚀 Start Monitoring</button>
        <button class="secondary" type="submit" name="action" value="refresh">Apply</button>
    </form>
    <form method="post" action="/session/end">
        <button class="secondary" type="submit">End Session</button>
    </form>
</aside>"#,
        drug = html_escape(&config.drug_name),
        checkboxes = checkboxes,
        options = options,
        severity = config.severity_threshold,
        confidence = config.confidence_threshold,
        sev_min = SEVERITY_MIN,
        sev_max = SEVERITY_MAX,
        conf_min = CONFIDENCE_MIN,
        conf_max = CONFIDENCE_MAX,
    )
}

fn render_welcome() -> String {
    let steps: String = HOW_TO_STEPS
        .iter()
        .map(|(title, detail)| format!("<li><strong>{title}</strong>: {detail}</li>"))
        .collect();
    let features: String = FEATURES.iter().map(|f| format!("<li>{f}</li>")).collect();
    let values: String = VALUE_POINTS.iter().map(|v| format!("<li>{v}</li>")).collect();

    format!(
        r#"<section class="welcome">
    <h2>👋 {title}</h2>
    <p>{intro}</p>
    <div class="columns">
        <div>
            <h3>How to Use</h3>
            <ol>{steps}</ol>
        </div>
        <div>
            <h3>Key Features</h3>
            <ul>{features}</ul>
            <h3>Why ComplianceWatch</h3>
            <ul>{values}</ul>
        </div>
    </div>
</section>"#,
        title = WELCOME_TITLE,
        intro = WELCOME_INTRO,
        steps = steps,
        features = features,
        values = values,
    )
}

fn render_warning(text: &str) -> String {
    format!(r#"<div class="warning">{}</div>"#, html_escape(text))
}

fn render_monitoring(view: &DashboardView) -> String {
    let tabs: String = Tab::ALL
        .iter()
        .map(|tab| {
            format!(
                r#"<input type="radio" name="tab" id="tab-{slug}"{checked}><label for="tab-{slug}">{title}</label>"#,
                slug = tab.slug(),
                title = tab.title(),
                checked = if *tab == Tab::default() { " checked" } else { "" },
            )
        })
        .collect();

    let panels: String = Tab::ALL
        .iter()
        .map(|tab| {
            let body = match tab {
                Tab::Dashboard => render_dashboard_tab(view),
                Tab::Alerts => render_alerts_tab(&view.alerts),
                Tab::Analytics => render_analytics_tab(view),
                Tab::Geographic => render_geographic_tab(&view.geo),
                Tab::Report => render_report_tab(view),
            };
            format!(
                r#"<div class="tab-panel panel-{slug}">{body}</div>"#,
                slug = tab.slug(),
            )
        })
        .collect();

    format!(
        r#"<p class="muted">Monitoring <strong>{drug}</strong> · {window} · {sources}</p>
{metrics}
<div class="tabs">{tabs}{panels}</div>"#,
        drug = html_escape(&view.config.drug_name),
        window = view.config.time_window.label(),
        sources = view.config.sources_label(),
        metrics = render_metrics(&view.metrics),
        tabs = tabs,
        panels = panels,
    )
}

fn render_metrics(metrics: &[Metric]) -> String {
    let cards: String = metrics
        .iter()
        .map(|m| {
            format!(
                r#"<div class="card" title="{help}">
    <h3>{label}</h3>
    <div class="value">{value}</div>
    <div class="{class}">{delta}</div>
</div>"#,
                help = html_escape(&m.help),
                label = html_escape(&m.label),
                value = html_escape(&m.value),
                delta = html_escape(&m.delta),
                class = if m.inverse { "delta-bad" } else { "delta-good" },
            )
        })
        .collect();
    format!(r#"<div class="cards">{cards}</div>"#)
}

fn render_dashboard_tab(view: &DashboardView) -> String {
    format!(
        r#"<div class="columns">
    <div>
        <h3>Severity Distribution</h3>
        {severity}
    </div>
    <div>
        <h3>Events by Source</h3>
        {sources}
    </div>
</div>
<h3>Event Timeline</h3>
{timeline}"#,
        severity = render_severity_bars(&view.severity),
        sources = render_source_bars(&view.sources),
        timeline = render_timeline(&view.timeline),
    )
}

fn render_severity_bars(distribution: &[SeverityCount]) -> String {
    let max = distribution.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    distribution
        .iter()
        .map(|b| {
            bar_row(
                b.severity.bucket_label(),
                b.count as f64 / max as f64,
                b.severity.color(),
                &b.count.to_string(),
            )
        })
        .collect()
}

fn render_source_bars(shares: &[SourceShare]) -> String {
    if shares.is_empty() {
        return r#"<p class="muted">No data sources selected.</p>"#.to_string();
    }
    shares
        .iter()
        .map(|s| {
            bar_row(
                s.source.label(),
                s.percent / 100.0,
                s.source.color(),
                &format!("{} ({:.1}%)", s.events, s.percent),
            )
        })
        .collect()
}

fn bar_row(label: &str, fraction: f64, color: &str, value: &str) -> String {
    format!(
        r#"<div class="bar-row"><span class="bar-label">{label}</span><div class="bar-track"><div class="bar" style="width: {width:.1}%; background: {color}"></div></div><span class="bar-value">{value}</span></div>"#,
        width = (fraction * 100.0).clamp(0.0, 100.0),
    )
}

fn render_timeline(points: &[TimelinePoint]) -> String {
    let values: Vec<f64> = points.iter().map(|p| p.events as f64).collect();
    let max = values.iter().cloned().fold(1.0, f64::max);
    let line = polyline(&values, 0, values.len(), max);
    let first = points
        .first()
        .map(|p| p.timestamp.format("%b %d %H:%M").to_string())
        .unwrap_or_default();
    let last = points
        .last()
        .map(|p| p.timestamp.format("%b %d %H:%M").to_string())
        .unwrap_or_default();
    format!(
        r##"<svg viewBox="0 0 {w} {h}" width="100%" height="{h}" role="img" aria-label="Event timeline">
    <polyline fill="none" stroke="#667eea" stroke-width="2" points="{line}"/>
</svg>
<p class="muted">{first} → {last} · peak {max:.0} events per bucket</p>"##,
        w = CHART_W,
        h = CHART_H,
    )
}

/// SVG `points` for `values` placed at slots `offset..` out of `slots`.
fn polyline(values: &[f64], offset: usize, slots: usize, max: f64) -> String {
    let step = if slots > 1 {
        CHART_W / (slots - 1) as f64
    } else {
        0.0
    };
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = (offset + i) as f64 * step;
            let y = CHART_H - (v / max) * (CHART_H - 10.0);
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_alerts_tab(board: &AlertBoard) -> String {
    if board.is_empty() {
        return format!(
            r#"<p class="muted">No alerts for the selected sources and thresholds ({} hidden by the confidence threshold).</p>"#,
            board.suppressed
        );
    }
    let items: String = board
        .alerts
        .iter()
        .map(|a| {
            format!(
                r#"<div class="alert alert-{css}">
    <strong>{marker} {severity}</strong> · {source}{flag}
    <p>{description}</p>
    <div class="meta">Score {score:.1}/10 · Confidence {confidence}% · {affected} · {ago}</div>
</div>"#,
                css = a.severity.css(),
                marker = a.severity.marker(),
                severity = a.severity.label(),
                source = html_escape(&a.source_detail),
                flag = if a.actionable {
                    r#" <span class="tag">actionable</span>"#
                } else {
                    ""
                },
                description = html_escape(&a.description),
                score = a.score,
                confidence = a.confidence,
                affected = html_escape(&a.affected),
                ago = a.time_ago(),
            )
        })
        .collect();
    format!(
        r#"<h3>Active Alerts ({count})</h3>
<p class="muted">{actionable} actionable · {suppressed} below confidence threshold</p>
{items}"#,
        count = board.alerts.len(),
        actionable = board.actionable_count(),
        suppressed = board.suppressed,
    )
}

fn render_analytics_tab(view: &DashboardView) -> String {
    let trend_rows: String = view
        .weekly_trend
        .iter()
        .map(|t| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                t.severity.label(),
                t.weeks[0],
                t.weeks[1],
                t.weeks[2],
                t.weeks[3]
            )
        })
        .collect();

    let m = &view.model;
    format!(
        r#"<h3>Weekly Trend by Severity</h3>
<table>
    <thead><tr><th>Severity</th><th>Week 1</th><th>Week 2</th><th>Week 3</th><th>Week 4</th></tr></thead>
    <tbody>{trend_rows}</tbody>
</table>
<h3>Predictive Forecast</h3>
{forecast}
<h3>Model Performance</h3>
<div class="cards">
    <div class="card"><h3>Accuracy</h3><div class="value">{accuracy:.1}%</div></div>
    <div class="card"><h3>Precision</h3><div class="value">{precision:.1}%</div></div>
    <div class="card"><h3>Recall</h3><div class="value">{recall:.1}%</div></div>
    <div class="card"><h3>F1 Score</h3><div class="value">{f1:.1}%</div></div>
</div>
<h3>Dose-Response Risk Surface</h3>
{surface}"#,
        forecast = render_forecast(&view.timeline, &view.forecast),
        accuracy = m.accuracy,
        precision = m.precision,
        recall = m.recall,
        f1 = m.f1,
        surface = render_surface(&view.surface),
    )
}

fn render_forecast(history: &[TimelinePoint], forecast: &[ForecastPoint]) -> String {
    if forecast.is_empty() {
        return r#"<p class="muted">Not enough history to forecast.</p>"#.to_string();
    }
    let observed: Vec<f64> = history.iter().map(|p| p.events as f64).collect();
    let predicted: Vec<f64> = forecast.iter().map(|p| p.predicted).collect();
    let upper: Vec<f64> = forecast.iter().map(|p| p.upper).collect();
    let lower_rev: Vec<f64> = forecast.iter().rev().map(|p| p.lower).collect();

    let slots = observed.len() + forecast.len();
    let max = observed
        .iter()
        .chain(upper.iter())
        .cloned()
        .fold(1.0, f64::max);
    let offset = observed.len();

    let band = format!(
        "{} {}",
        polyline(&upper, offset, slots, max),
        polyline_rev(&lower_rev, offset, slots, max)
    );

    format!(
        r##"<svg viewBox="0 0 {w} {h}" width="100%" height="{h}" role="img" aria-label="Forecast">
    <polygon fill="#c7d2fe" fill-opacity="0.6" points="{band}"/>
    <polyline fill="none" stroke="#667eea" stroke-width="2" points="{observed}"/>
    <polyline fill="none" stroke="#764ba2" stroke-width="2" stroke-dasharray="5,4" points="{predicted}"/>
</svg>
<p class="muted">{n} buckets ahead, shaded band is the 95% interval</p>"##,
        w = CHART_W,
        h = CHART_H,
        observed = polyline(&observed, 0, slots, max),
        predicted = polyline(&predicted, offset, slots, max),
        n = forecast.len(),
    )
}

/// Like [`polyline`] but for values already reversed, so the polygon closes.
fn polyline_rev(reversed: &[f64], offset: usize, slots: usize, max: f64) -> String {
    let n = reversed.len();
    let step = if slots > 1 {
        CHART_W / (slots - 1) as f64
    } else {
        0.0
    };
    reversed
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = (offset + n - 1 - i) as f64 * step;
            let y = CHART_H - (v / max) * (CHART_H - 10.0);
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_surface(surface: &RiskSurface) -> String {
    let header: String = surface
        .doses_mg
        .iter()
        .map(|d| format!("<th>{d} mg</th>"))
        .collect();
    let rows: String = surface
        .weeks
        .iter()
        .zip(&surface.scores)
        .map(|(week, row)| {
            let cells: String = row
                .iter()
                .map(|s| {
                    format!(
                        r#"<td style="background: rgba(239, 68, 68, {alpha:.2})">{s:.1}</td>"#,
                        alpha = (s / 10.0).clamp(0.05, 1.0),
                    )
                })
                .collect();
            format!("<tr><td>Week {week}</td>{cells}</tr>")
        })
        .collect();
    let peak = surface
        .peak()
        .map(|(dose, week, score)| {
            format!(r#"<p class="muted">Peak risk {score:.1}/10 at {dose} mg, week {week}</p>"#)
        })
        .unwrap_or_default();
    format!(
        r#"<table>
    <thead><tr><th>Week</th>{header}</tr></thead>
    <tbody>{rows}</tbody>
</table>
{peak}"#
    )
}

fn render_geographic_tab(points: &[GeoPoint]) -> String {
    // Continental US bounding box.
    let (lon_min, lon_max, lat_min, lat_max) = (-125.0, -66.0, 24.0, 50.0);
    let max_events = points.iter().map(|p| p.events).max().unwrap_or(0).max(1) as f64;
    let circles: String = points
        .iter()
        .map(|p| {
            let x = (p.lon - lon_min) / (lon_max - lon_min) * CHART_W;
            let y = (lat_max - p.lat) / (lat_max - lat_min) * MAP_H;
            let r = 4.0 + 16.0 * (p.events as f64 / max_events).sqrt();
            format!(
                r##"<circle cx="{x:.1}" cy="{y:.1}" r="{r:.1}" fill="#ef4444" fill-opacity="0.55"><title>{city}: {events}</title></circle>"##,
                city = html_escape(&p.city),
                events = p.events,
            )
        })
        .collect();

    let rows: String = points
        .iter()
        .map(|p| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                html_escape(&p.city),
                html_escape(&p.region),
                p.events
            )
        })
        .collect();
    let regions: String = region_totals(points)
        .into_iter()
        .map(|(region, events)| format!("<li>{}: {events}</li>", html_escape(&region)))
        .collect();

    format!(
        r#"<h3>Geographic Distribution</h3>
<svg viewBox="0 0 {w} {h}" width="100%" height="{h}" role="img" aria-label="Event map">{circles}</svg>
<div class="columns">
    <table>
        <thead><tr><th>City</th><th>Region</th><th>Events</th></tr></thead>
        <tbody>{rows}</tbody>
    </table>
    <div><h3>By Region</h3><ul>{regions}</ul></div>
</div>"#,
        w = CHART_W,
        h = MAP_H,
    )
}

fn render_report_tab(view: &DashboardView) -> String {
    let report = &view.report;
    let summary: String = view
        .config
        .summary_lines()
        .into_iter()
        .map(|(label, value)| {
            format!(
                "<tr><th>{label}</th><td>{}</td></tr>",
                html_escape(&value)
            )
        })
        .collect();
    format!(
        r#"<h3>Compliance Report</h3>
<table>{summary}</table>
<a class="download" href="/session/report" download="{file}">📥 Download {file}</a>
<pre class="report">{markdown}</pre>"#,
        file = html_escape(&report.file_name()),
        markdown = html_escape(&report.render_markdown()),
    )
}

fn render_footer() -> String {
    format!(
        r#"<footer>
    <p>{APP_NAME} v{version} · all figures are synthetic demonstration data</p>
</footer>"#,
        version = compliancewatch_core::VERSION,
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use compliancewatch_core::Synthesizer;

    fn view(drug: &str) -> DashboardView {
        let config = MonitoringConfig {
            drug_name: drug.into(),
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        DashboardView::build(&config, &mut Synthesizer::seeded(8), now).unwrap()
    }

    #[test]
    fn escape_covers_markup() {
        assert_eq!(
            html_escape(r#"<b a="1">'x' & y</b>"#),
            "&lt;b a=&quot;1&quot;&gt;&#39;x&#39; &amp; y&lt;/b&gt;"
        );
    }

    #[test]
    fn welcome_page_has_steps_and_no_tabs() {
        let html = render_page(&MonitoringConfig::default(), &Screen::Welcome);
        assert!(html.contains(WELCOME_TITLE));
        assert!(html.contains("Start Monitoring"));
        assert!(!html.contains("tab-panel"));
    }

    #[test]
    fn warning_page_shows_message() {
        let html = render_page(&MonitoringConfig::default(), &Screen::MissingDrugName);
        assert!(html.contains("Please enter a drug name to start monitoring"));
        assert!(!html.contains("tab-panel"));
    }

    #[test]
    fn monitoring_page_has_all_tabs() {
        let v = view("Ozempic");
        let html = render_page(&v.config, &Screen::Monitoring(Box::new(v.clone())));
        for tab in Tab::ALL {
            assert!(html.contains(&format!("panel-{}", tab.slug())));
        }
        assert!(html.contains("Total Events Detected"));
        assert!(html.contains("ComplianceWatch_Report_Ozempic_20250314.md"));
    }

    #[test]
    fn drug_name_is_escaped_everywhere() {
        let v = view("<script>alert(1)</script>");
        let html = render_page(&v.config, &Screen::Monitoring(Box::new(v.clone())));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn sidebar_reflects_config() {
        let config = MonitoringConfig {
            drug_name: "Humira".into(),
            sources: vec![DataSource::PatientForums],
            time_window: TimeWindow::Last7Days,
            severity_threshold: 3,
            confidence_threshold: 90,
        };
        let html = render_sidebar(&config);
        assert!(html.contains(r#"value="Humira""#));
        assert!(html.contains(r#"value="forums" checked"#));
        assert!(!html.contains(r#"value="reddit" checked"#));
        assert!(html.contains(r#"<option value="7d" selected>"#));
        assert!(html.contains(r#"name="severity" min="1" max="10" value="3""#));
        assert!(html.contains(r#"name="confidence" min="50" max="100" value="90""#));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = render_error_page("unknown source '<x>'");
        assert!(html.contains("unknown source &#39;&lt;x&gt;&#39;"));
    }
}
