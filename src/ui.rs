use crate::app::{App, Field};
use crate::config::{self, DataSourceMode};
use crate::data::{self, Trend};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, Gauge, GraphType, Paragraph, Row, Sparkline,
        Table, Wrap,
    },
};
use std::time::Instant;

pub fn render(f: &mut Frame, app: &App, now: Instant) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, now, layout[0]);

    let body = if app.sidebar_visible {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(config::SIDEBAR_WIDTH),
                Constraint::Min(0),
            ])
            .split(layout[1]);
        render_sidebar(f, app, now, chunks[0]);
        chunks[1]
    } else {
        layout[1]
    };

    render_main(f, app, body);
    render_footer(f, app, layout[2]);
}

fn render_header(f: &mut Frame, app: &App, now: Instant, area: Rect) {
    let status = if app.is_running() {
        Span::styled(
            format!("{} Running...", app.spinner_frame(now)),
            Style::default().fg(Color::Yellow),
        )
    } else {
        Span::styled("Idle", Style::default().fg(Color::Green))
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" 📈 {} Stock Price Prediction Dashboard ", config::SYMBOL),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("| "),
        Span::styled(
            "Advanced ML models for data scientists & traders",
            Style::default().fg(Color::Gray),
        ),
        Span::raw(" | "),
        status,
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(msg) = &app.status_msg {
        Line::from(vec![
            Span::styled(" Status: ", Style::default().fg(Color::Gray)),
            Span::styled(msg.as_str(), Style::default().fg(Color::Yellow)),
        ])
    } else {
        Line::from(vec![
            Span::styled(
                " Tab/↑↓: focus | Space/←→: change | Enter: activate | r: run | e: export | b: sidebar | q/Esc: quit ",
                Style::default().fg(Color::White),
            ),
            Span::styled(
                "| © 2024 Brainybeam Info-Tech PVT LTD",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

// ── Sidebar ─────────────────────────────────────────────────────────────────

fn focus_style(app: &App, field: Field) -> Style {
    if app.focus == field {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_sidebar(f: &mut Frame, app: &App, now: Instant, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        "◆ Data Source",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    for mode in DataSourceMode::ALL {
        let marker = if app.config.data_source == mode {
            "(•)"
        } else {
            "( )"
        };
        let style = if app.focus == Field::DataSource && app.config.data_source == mode {
            focus_style(app, Field::DataSource)
        } else if app.config.data_source == mode {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!("  {} {}", marker, mode.label()),
            style,
        )));
    }

    if app.config.shows_upload() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  ⇪ Click to upload CSV file",
            Style::default().fg(Color::Gray),
        )));
        let path = app.config.upload_path.as_deref().unwrap_or("");
        let shown = if path.is_empty() { "(.csv path)" } else { path };
        lines.push(Line::from(vec![
            Span::raw("  File: "),
            Span::styled(format!("[{}]", shown), focus_style(app, Field::UploadPath)),
        ]));
    }

    if app.config.shows_date_range() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  Start Date ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("[{}]", app.config.start_date),
                focus_style(app, Field::StartDate),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  End Date   ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("[{}]", app.config.end_date),
                focus_style(app, Field::EndDate),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "◆ Model Selection",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    let model_label = app
        .config
        .model
        .map(|m| m.label())
        .unwrap_or("Choose ML model");
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("◂ {} ▸", model_label), focus_style(app, Field::Model)),
    ]));

    for key in app.config.hyperparam_fields() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<13}", key.label()), Style::default().fg(Color::Gray)),
            Span::styled(
                format!("[{}]", app.config.hyperparam(*key)),
                focus_style(app, Field::Hyperparam(*key)),
            ),
        ]));
    }

    lines.push(Line::from(""));
    let run_label = if app.is_running() {
        format!("  {} Running...", app.spinner_frame(now))
    } else {
        "  ▶ Run Prediction".to_string()
    };
    let run_style = if app.focus == Field::RunButton {
        if app.can_run() {
            focus_style(app, Field::RunButton)
        } else {
            Style::default()
                .fg(Color::DarkGray)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD)
        }
    } else if app.can_run() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        // Disabled: no model selected, or a run already in flight.
        Style::default().fg(Color::DarkGray)
    };
    lines.push(Line::from(Span::styled(run_label, run_style)));
    lines.push(Line::from(Span::styled(
        "  ↺ Reset",
        focus_style(app, Field::ResetButton),
    )));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "▪ Quick Start",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        "  Select data source, choose your ML model, and press Run Prediction to get insights.",
        Style::default().fg(Color::Gray),
    )));

    let sidebar = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Configuration "));
    f.render_widget(sidebar, area);
}

// ── Main content ────────────────────────────────────────────────────────────

fn render_main(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(12),
        ])
        .split(area);

    render_metric_cards(f, rows[0]);

    let grid = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(40),
            Constraint::Percentage(26),
        ])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(9)])
        .split(grid[0]);
    render_data_preview(f, left[0]);
    render_recommendation(f, left[1]);

    render_price_chart(f, app, grid[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(grid[2]);
    render_volume(f, app, right[0]);
    render_sentiment(f, app, right[1]);

    render_prediction_chart(f, app, rows[2]);
}

fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Up => Color::Green,
        Trend::Down => Color::Red,
        Trend::Neutral => Color::Gray,
    }
}

fn render_metric_cards(f: &mut Frame, area: Rect) {
    let cards = data::metric_cards();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    for (metric, chunk) in cards.iter().zip(chunks.iter()) {
        let arrow = match metric.trend {
            Trend::Up => "▲",
            Trend::Down => "▼",
            Trend::Neutral => "■",
        };
        let card = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(
                    metric.value,
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(arrow, Style::default().fg(trend_color(metric.trend))),
            ]),
            Line::from(Span::styled(
                metric.description,
                Style::default().fg(Color::Gray),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", metric.title)),
        );
        f.render_widget(card, *chunk);
    }
}

fn render_data_preview(f: &mut Frame, area: Rect) {
    let header = Row::new(
        ["Date", "Open", "High", "Low", "Close", "Vol"]
            .into_iter()
            .map(|h| Cell::from(Span::styled(h, Style::default().fg(Color::Gray)))),
    );

    let rows: Vec<Row> = data::sample_rows()
        .into_iter()
        .map(|c| {
            Row::new(vec![
                Cell::from(c.date.to_string()),
                Cell::from(format!("{:.2}", c.open)),
                Cell::from(Span::styled(
                    format!("{:.2}", c.high),
                    Style::default().fg(Color::Green),
                )),
                Cell::from(Span::styled(
                    format!("{:.2}", c.low),
                    Style::default().fg(Color::Red),
                )),
                Cell::from(Span::styled(
                    format!("{:.2}", c.close),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Cell::from(Span::styled(
                    c.volume_label(),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Data Preview ✔ Data Loaded ")
            .title_bottom(Line::from(Span::styled(
                format!(
                    " First 5 of {} records • {} from Yahoo Finance ",
                    data::TOTAL_RECORDS,
                    config::SYMBOL
                ),
                Style::default().fg(Color::DarkGray),
            ))),
    );

    f.render_widget(table, area);
}

fn render_recommendation(f: &mut Frame, area: Rect) {
    let rec = data::recommendation();
    let text = vec![
        Line::from(vec![
            Span::styled("Current Signal: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!(" {} ", rec.signal),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" ${:.2}", rec.price),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Confidence: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}%", rec.confidence_pct),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Target: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("${:.2}", rec.target_price),
                Style::default().fg(Color::Green),
            ),
            Span::styled("   Stop Loss: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("${:.2}", rec.stop_loss),
                Style::default().fg(Color::Red),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Based on {} model with {}% confidence.",
                rec.basis, rec.confidence_pct
            ),
            Style::default().fg(Color::Gray),
        )),
        Line::from(vec![
            Span::styled("Last predicted direction: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{:+.1}% upward trend", rec.direction_pct),
                Style::default().fg(Color::Green),
            ),
        ]),
    ];

    let panel = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Trading Recommendation "),
        );
    f.render_widget(panel, area);
}

fn render_price_chart(f: &mut Frame, app: &App, area: Rect) {
    let closes: Vec<f64> = app.history.iter().map(|c| c.close).collect();
    let points: Vec<(f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, c)| (i as f64, *c))
        .collect();
    let ma50 = data::moving_average(&closes, 50);
    let ma200 = data::moving_average(&closes, 200);

    let mut datasets = vec![
        Dataset::default()
            .name("Close")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points),
    ];
    if !ma50.is_empty() {
        datasets.push(
            Dataset::default()
                .name("MA50")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Yellow))
                .data(&ma50),
        );
    }
    if !ma200.is_empty() {
        datasets.push(
            Dataset::default()
                .name("MA200")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Magenta))
                .data(&ma200),
        );
    }

    let min = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    format!(" {} Price Chart with Moving Averages ", config::SYMBOL),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        )
        .x_axis(
            Axis::default()
                .title("Days")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, points.len() as f64]),
        )
        .y_axis(
            Axis::default()
                .title("Price")
                .style(Style::default().fg(Color::Gray))
                .bounds([min * 0.95, max * 1.05])
                .labels(vec![
                    Span::styled(format!("{:.0}", min), Style::default().fg(Color::Gray)),
                    Span::styled(format!("{:.0}", max), Style::default().fg(Color::Gray)),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_volume(f: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let volumes: Vec<u64> = app
        .history
        .iter()
        .rev()
        .take(width.max(1))
        .rev()
        .map(|c| c.volume)
        .collect();

    let sparkline = Sparkline::default()
        .data(&volumes)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Volume Analysis — daily trading volume "),
        );
    f.render_widget(sparkline, area);
}

fn render_sentiment(f: &mut Frame, app: &App, area: Rect) {
    let (up, down) = data::sentiment_split(&app.history);
    let total = (up + down).max(1);
    let up_pct = (up * 100 / total) as u16;

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Market Sentiment — Up vs Down "),
        )
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Red))
        .percent(up_pct.min(100))
        .label(format!("{} up / {} down days", up, down));
    f.render_widget(gauge, area);
}

fn render_prediction_chart(f: &mut Frame, app: &App, area: Rect) {
    let closes: Vec<f64> = app.history.iter().map(|c| c.close).collect();
    let predicted = data::predicted_closes(&closes);

    let actual_points: Vec<(f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, c)| (i as f64, *c))
        .collect();
    let predicted_points: Vec<(f64, f64)> = predicted
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, *p))
        .collect();

    let datasets = vec![
        Dataset::default()
            .name("Actual")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&actual_points),
        Dataset::default()
            .name("Predicted")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&predicted_points),
    ];

    let min = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let model_label = app
        .config
        .model
        .map(|m| m.label())
        .unwrap_or("no model selected");

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    format!(" Actual vs Predicted ({}) — e: Export CSV ", model_label),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        )
        .x_axis(
            Axis::default()
                .title("Days")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, actual_points.len() as f64]),
        )
        .y_axis(
            Axis::default()
                .title("Price")
                .style(Style::default().fg(Color::Gray))
                .bounds([min * 0.95, max * 1.05]),
        );

    f.render_widget(chart, area);
}
