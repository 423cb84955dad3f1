//! TUI rendering — sidebar plus tabbed monitoring screen.
//!
//! ┌──────────────────────────────────────────────────────────┐
//! │  💊 ComplianceWatch   Ozempic · Last 24 Hours   ● LIVE    │
//! ├──────────────────┬───────────────────────────────────────┤
//! │  Drug: Ozempic   │  [Total] [Critical] [Speed] [Acc] ... │
//! │  Sources         │  Dashboard │ Alerts │ Analytics │ ... │
//! │   [x] Reddit     │                                       │
//! │  ▸[ ] Twitter/X  │   (tab content)                       │
//! │  Window: 24h     │                                       │
//! │  Severity: 5     │                                       │
//! │  Confidence: 70% │                                       │
//! │  [ Start ]       │                                       │
//! ├──────────────────┴───────────────────────────────────────┤
//! │  tab: focus   ←→ adjust   enter: start   1-5: tabs  ...  │
//! └──────────────────────────────────────────────────────────┘

use std::str::FromStr;

use super::app::{App, Field};
use compliancewatch_core::dashboard::{
    FEATURES, HOW_TO_STEPS, VALUE_POINTS, WELCOME_INTRO, WELCOME_TITLE,
};
use compliancewatch_core::synth::region_totals;
use compliancewatch_core::{
    APP_NAME, DashboardView, DataSource, Metric, Screen, Severity, TAGLINE, Tab,
};
use ratatui::widgets::canvas::{Canvas, Map, MapResolution, Points};
use ratatui::{prelude::*, widgets::*};

/// Continental US, for the geographic canvas.
const LON_BOUNDS: [f64; 2] = [-125.0, -66.0];
const LAT_BOUNDS: [f64; 2] = [24.0, 50.0];

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(10),   // main
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(40)])
        .split(rows[1]);

    draw_sidebar(f, cols[0], app);
    match app.screen() {
        Screen::Welcome => draw_welcome(f, cols[1]),
        Screen::MissingDrugName => draw_warning(f, cols[1], app),
        Screen::Monitoring(view) => draw_monitoring(f, cols[1], app, view),
    }

    draw_keys(f, rows[2], app);
}

fn hex(color: &str) -> Color {
    Color::from_str(color).unwrap_or(Color::White)
}

fn severity_color(severity: Severity) -> Color {
    hex(severity.color())
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let config = app.config();
    let drug = if config.has_drug() {
        config.drug_name.trim()
    } else {
        "no drug selected"
    };
    let status = if app.is_monitoring() {
        Span::styled("  ● LIVE ", Style::default().bold().fg(Color::Green))
    } else {
        Span::styled("  ○ idle ", Style::default().fg(Color::DarkGray))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(
                format!(" 💊 {APP_NAME} "),
                Style::default().bold().fg(Color::Cyan),
            ),
            Span::raw("  "),
            Span::styled(drug, Style::default().bold().fg(Color::Yellow)),
            Span::styled(
                format!(" · {}  render #{}", config.time_window.label(), app.renders()),
                Style::default().fg(Color::DarkGray),
            ),
            status,
        ]));

    f.render_widget(block, area);
}

// ---------------------------------------------------------------------------
// Sidebar
// ---------------------------------------------------------------------------

fn draw_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let config = app.config();
    let focus = app.focus();

    let label = |field: Field, text: &str| {
        let style = if focus == field {
            Style::default().bold().fg(Color::Yellow)
        } else {
            Style::default().bold()
        };
        let pointer = if focus == field { "▸ " } else { "  " };
        Line::from(Span::styled(format!("{pointer}{text}"), style))
    };

    let mut lines = vec![
        label(Field::Drug, "Drug Name"),
        Line::from(Span::styled(
            format!(
                "    {}{}",
                config.drug_name,
                if focus == Field::Drug { "▏" } else { "" }
            ),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        label(Field::Sources, "Data Sources"),
    ];

    for (i, source) in DataSource::ALL.iter().enumerate() {
        let checked = if config.sources.contains(source) {
            "[x]"
        } else {
            "[ ]"
        };
        let style = if focus == Field::Sources && i == app.source_cursor() {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("    {checked} {}", source.label()),
            style,
        )));
    }

    lines.extend([
        Line::from(""),
        label(Field::Window, "Time Range"),
        Line::from(format!("    ◂ {} ▸", config.time_window.label())),
        label(Field::Severity, "Severity Threshold"),
        Line::from(format!("    ◂ {} / 10 ▸", config.severity_threshold)),
        label(Field::Confidence, "Confidence Threshold"),
        Line::from(format!("    ◂ {}% ▸", config.confidence_threshold)),
        Line::from(""),
    ]);

    let button_style = if focus == Field::Start {
        Style::default().bold().bg(Color::Cyan).fg(Color::Black)
    } else {
        Style::default().fg(Color::Cyan)
    };
    lines.push(Line::from(Span::styled(
        "  [ 🔍 Start Monitoring ]",
        button_style,
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" ⚙ Monitoring Configuration ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

// ---------------------------------------------------------------------------
// Welcome / warning
// ---------------------------------------------------------------------------

fn draw_welcome(f: &mut Frame, area: Rect) {
    let heading = Style::default().bold().fg(Color::Cyan);
    let mut lines = vec![
        Line::from(Span::styled(WELCOME_TITLE, heading)),
        Line::from(Span::styled(TAGLINE, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(WELCOME_INTRO),
        Line::from(""),
        Line::from(Span::styled("How to use", heading)),
    ];
    for (i, (step, detail)) in HOW_TO_STEPS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}. {step}: ", i + 1), Style::default().bold()),
            Span::raw(*detail),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Key features", heading)));
    lines.extend(FEATURES.iter().map(|f| Line::from(format!("  ✓ {f}"))));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Value", heading)));
    lines.extend(VALUE_POINTS.iter().map(|v| Line::from(format!("  • {v}"))));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}

fn draw_warning(f: &mut Frame, area: Rect, app: &App) {
    let text = app.screen().warning().unwrap_or_default();
    let p = Paragraph::new(text)
        .style(Style::default().bold().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(" Warning "));
    f.render_widget(p, area);
}

// ---------------------------------------------------------------------------
// Monitoring screen
// ---------------------------------------------------------------------------

fn draw_monitoring(f: &mut Frame, area: Rect, app: &App, view: &DashboardView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // metric cards
            Constraint::Length(3), // tabs
            Constraint::Min(8),    // content
        ])
        .split(area);

    draw_metrics(f, rows[0], &view.metrics);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab().index())
        .highlight_style(Style::default().bold().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(tabs, rows[1]);

    match app.tab() {
        Tab::Dashboard => draw_dashboard_tab(f, rows[2], view),
        Tab::Alerts => draw_alerts_tab(f, rows[2], view),
        Tab::Analytics => draw_analytics_tab(f, rows[2], view),
        Tab::Geographic => draw_geo_tab(f, rows[2], view),
        Tab::Report => draw_report_tab(f, rows[2], view),
    }
}

fn draw_metrics(f: &mut Frame, area: Rect, metrics: &[Metric]) {
    let n = metrics.len().max(1) as u32;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, n); metrics.len()])
        .split(area);

    for (metric, col) in metrics.iter().zip(cols.iter()) {
        let bad = metric.inverse && metric.delta.starts_with('↑');
        let delta_color = if bad { Color::Red } else { Color::Green };
        let lines = vec![
            Line::from(Span::styled(
                metric.value.clone(),
                Style::default().bold().fg(Color::White),
            )),
            Line::from(Span::styled(
                metric.delta.clone(),
                Style::default().fg(delta_color),
            )),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", metric.label));
        f.render_widget(Paragraph::new(lines).block(block), *col);
    }
}

fn draw_dashboard_tab(f: &mut Frame, area: Rect, view: &DashboardView) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(cols[0]);

    let severity_bars: Vec<Bar> = view
        .severity
        .iter()
        .map(|s| {
            Bar::default()
                .value(s.count)
                .label(Line::from(s.label.clone()))
                .style(Style::default().fg(severity_color(s.severity)))
        })
        .collect();
    let chart = BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&severity_bars))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Events by Severity "),
        );
    f.render_widget(chart, left[0]);

    let source_bars: Vec<Bar> = view
        .sources
        .iter()
        .map(|s| {
            Bar::default()
                .value(s.events)
                .label(Line::from(s.source.label()))
                .text_value(format!("{} ({:.0}%)", s.events, s.percent))
                .style(Style::default().fg(hex(s.source.color())))
        })
        .collect();
    if source_bars.is_empty() {
        let p = Paragraph::new("No data sources selected")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Events by Source "));
        f.render_widget(p, left[1]);
    } else {
        let chart = BarChart::default()
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .data(BarGroup::default().bars(&source_bars))
            .block(Block::default().borders(Borders::ALL).title(" Events by Source "));
        f.render_widget(chart, left[1]);
    }

    draw_timeline(f, cols[1], view);
}

fn draw_timeline(f: &mut Frame, area: Rect, view: &DashboardView) {
    let data: Vec<(f64, f64)> = view
        .timeline
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.events as f64))
        .collect();
    let max = data.iter().map(|(_, y)| *y).fold(1.0, f64::max);
    let fmt = if view.timeline.len() == 24 {
        "%H:%M"
    } else {
        "%b %d"
    };
    let first = view
        .timeline
        .first()
        .map(|p| p.timestamp.format(fmt).to_string())
        .unwrap_or_default();
    let last = view
        .timeline
        .last()
        .map(|p| p.timestamp.format(fmt).to_string())
        .unwrap_or_default();

    let datasets = vec![
        Dataset::default()
            .name("events")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&data),
    ];
    let x_max = (data.len().saturating_sub(1) as f64).max(1.0);
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Event Timeline · {} ", view.config.time_window.label())),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Line::from(first), Line::from(last)]),
        )
        .y_axis(Axis::default().bounds([0.0, max * 1.1]).labels(vec![
            Line::from("0"),
            Line::from(format!("{max:.0}")),
        ]));
    f.render_widget(chart, area);
}

fn draw_alerts_tab(f: &mut Frame, area: Rect, view: &DashboardView) {
    let board = &view.alerts;
    let title = format!(
        " 🚨 Active Alerts: {} shown · {} actionable · {} below confidence ",
        board.alerts.len(),
        board.actionable_count(),
        board.suppressed
    );

    if board.is_empty() {
        let p = Paragraph::new("No alerts match the current sources and thresholds")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(p, area);
        return;
    }

    let items: Vec<ListItem> = board
        .alerts
        .iter()
        .map(|a| {
            let color = severity_color(a.severity);
            let flag = if a.actionable { " ⚑ ACTION" } else { "" };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        format!("{} {} ", a.severity.marker(), a.severity.label()),
                        Style::default().bold().fg(color),
                    ),
                    Span::styled(a.description.clone(), Style::default().bold()),
                    Span::styled(flag, Style::default().bold().fg(Color::Red)),
                ]),
                Line::from(Span::styled(
                    format!(
                        "   {} · {} · {} · score {:.1} · {}% confidence · {}",
                        a.source.label(),
                        a.source_detail,
                        a.time_ago(),
                        a.score,
                        a.confidence,
                        a.affected
                    ),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn draw_analytics_tab(f: &mut Frame, area: Rect, view: &DashboardView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[1]);

    // Weekly trend
    let header = Row::new(vec!["Severity", "Wk 1", "Wk 2", "Wk 3", "Wk 4"])
        .style(Style::default().bold());
    let trend_rows: Vec<Row> = view
        .weekly_trend
        .iter()
        .map(|t| {
            let mut cells = vec![t.severity.label().to_string()];
            cells.extend(t.weeks.iter().map(|w| w.to_string()));
            Row::new(cells).style(Style::default().fg(severity_color(t.severity)))
        })
        .collect();
    let table = Table::new(
        trend_rows,
        [
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Weekly Trend "));
    f.render_widget(table, top[0]);

    draw_forecast(f, top[1], view);

    let m = &view.model;
    let peak = view
        .surface
        .peak()
        .map(|(dose, week, score)| format!("{score:.1} at {dose} mg, week {week}"))
        .unwrap_or_else(|| "—".into());
    let lines = vec![
        Line::from(format!("Accuracy   {:.1}%", m.accuracy)),
        Line::from(format!("Precision  {:.1}%", m.precision)),
        Line::from(format!("Recall     {:.1}%", m.recall)),
        Line::from(format!("F1 score   {:.1}%", m.f1)),
        Line::from(""),
        Line::from(Span::styled("Peak risk", Style::default().bold())),
        Line::from(peak),
    ];
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" 🤖 Model "));
    f.render_widget(p, bottom[0]);

    draw_surface(f, bottom[1], view);
}

fn draw_forecast(f: &mut Frame, area: Rect, view: &DashboardView) {
    let history: Vec<(f64, f64)> = view
        .timeline
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.events as f64))
        .collect();
    let offset = history.len() as f64;
    let at = |i: usize| offset + i as f64;
    let predicted: Vec<(f64, f64)> = view
        .forecast
        .iter()
        .enumerate()
        .map(|(i, p)| (at(i), p.predicted))
        .collect();
    let upper: Vec<(f64, f64)> = view
        .forecast
        .iter()
        .enumerate()
        .map(|(i, p)| (at(i), p.upper))
        .collect();
    let lower: Vec<(f64, f64)> = view
        .forecast
        .iter()
        .enumerate()
        .map(|(i, p)| (at(i), p.lower))
        .collect();

    let y_max = history
        .iter()
        .chain(upper.iter())
        .map(|(_, y)| *y)
        .fold(1.0, f64::max);
    let x_max = (offset + view.forecast.len() as f64 - 1.0).max(1.0);

    let datasets = vec![
        Dataset::default()
            .name("history")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&history),
        Dataset::default()
            .name("forecast")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&predicted),
        Dataset::default()
            .name("95% band")
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(Color::DarkGray))
            .data(&upper),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(Color::DarkGray))
            .data(&lower),
    ];
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Predictive Trend "),
        )
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(vec![
            Line::from("past"),
            Line::from("now"),
            Line::from(format!("+{}", view.forecast.len())),
        ]))
        .y_axis(Axis::default().bounds([0.0, y_max * 1.1]).labels(vec![
            Line::from("0"),
            Line::from(format!("{y_max:.0}")),
        ]));
    f.render_widget(chart, area);
}

fn surface_color(score: f64) -> Color {
    if score >= 8.0 {
        severity_color(Severity::Critical)
    } else if score >= 6.0 {
        severity_color(Severity::High)
    } else if score >= 4.0 {
        severity_color(Severity::Medium)
    } else {
        severity_color(Severity::Low)
    }
}

fn draw_surface(f: &mut Frame, area: Rect, view: &DashboardView) {
    let surface = &view.surface;
    let mut header = vec!["Week".to_string()];
    header.extend(surface.doses_mg.iter().map(|d| format!("{d} mg")));

    let rows: Vec<Row> = surface
        .weeks
        .iter()
        .zip(surface.scores.iter())
        .map(|(week, scores)| {
            let mut cells = vec![Cell::from(week.to_string())];
            cells.extend(scores.iter().map(|s| {
                Cell::from(format!("{s:.1}")).style(Style::default().fg(surface_color(*s)))
            }));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(5)];
    widths.extend(surface.doses_mg.iter().map(|_| Constraint::Length(8)));

    let table = Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().bold()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Risk by Dose × Week "),
        );
    f.render_widget(table, area);
}

fn draw_geo_tab(f: &mut Frame, area: Rect, view: &DashboardView) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let coords: Vec<(f64, f64)> = view.geo.iter().map(|p| (p.lon, p.lat)).collect();
    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" 🗺 Events by Location "),
        )
        .marker(symbols::Marker::Braille)
        .x_bounds(LON_BOUNDS)
        .y_bounds(LAT_BOUNDS)
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &coords,
                color: Color::Red,
            });
        });
    f.render_widget(canvas, cols[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(cols[1]);

    let mut cities: Vec<_> = view.geo.iter().collect();
    cities.sort_by(|a, b| b.events.cmp(&a.events));
    let rows: Vec<Row> = cities
        .iter()
        .map(|p| Row::new(vec![p.city.clone(), p.region.clone(), p.events.to_string()]))
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(7),
        ],
    )
    .header(Row::new(vec!["City", "Region", "Events"]).style(Style::default().bold()))
    .block(Block::default().borders(Borders::ALL).title(" Cities "));
    f.render_widget(table, right[0]);

    let regions: Vec<Row> = region_totals(&view.geo)
        .into_iter()
        .map(|(region, events)| Row::new(vec![region, events.to_string()]))
        .collect();
    let table = Table::new(regions, [Constraint::Min(12), Constraint::Length(7)])
        .header(Row::new(vec!["Region", "Events"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title(" Regions "));
    f.render_widget(table, right[1]);
}

fn draw_report_tab(f: &mut Frame, area: Rect, view: &DashboardView) {
    let markdown = view.report.render_markdown();
    let lines: Vec<Line> = markdown
        .lines()
        .map(|l| {
            if l.starts_with('#') {
                Line::from(Span::styled(
                    l.to_string(),
                    Style::default().bold().fg(Color::Cyan),
                ))
            } else {
                Line::from(l.to_string())
            }
        })
        .collect();
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" 📄 {}  (s: save) ", view.report.file_name())),
    );
    f.render_widget(p, area);
}

fn draw_keys(f: &mut Frame, area: Rect, app: &App) {
    let text = match app.status() {
        Some(status) => format!(" {status}"),
        None => " tab/↑↓ focus   ←→ adjust   space: toggle   enter: start   1-5: tabs   r: refresh   s: save report   esc: quit".to_string(),
    };
    let bar = Paragraph::new(text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}
