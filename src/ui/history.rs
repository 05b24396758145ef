use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::history::{HistoryBackend, HistoryStore, Statistics};
use crate::ui::charting::{bar, compute_chart_bounds, format_label, trend_points};

/// Results shown in the trend section.
pub const TREND_WINDOW: usize = 10;

pub fn statistics_lines(stats: &Statistics) -> Vec<Line<'static>> {
    vec![
        Line::from(format!("  Total Tests: {}", stats.count)),
        Line::from(format!("  Average WPM: {:.2}", stats.average_wpm)),
        Line::from(format!("  Best WPM: {:.2}", stats.best_wpm)),
        Line::from(format!("  Average Accuracy: {:.2}%", stats.average_accuracy)),
        Line::from(format!("  Best Accuracy: {:.2}%", stats.best_accuracy)),
        Line::from(format!("  WPM Std Dev: {:.2}", stats.wpm_std_dev)),
        Line::from(format!("  Total Characters Typed: {}", stats.total_chars)),
    ]
}

pub fn render_history<B: HistoryBackend>(history: &HistoryStore<B>, f: &mut Frame) {
    let area = f.area();
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let title_style = bold.fg(Color::Cyan);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(9), // statistics
            Constraint::Min(6),    // trend chart
            Constraint::Length(TREND_WINDOW as u16 + 2),
            Constraint::Length(1), // footer
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(Span::styled("Typing History & Statistics", title_style))
            .alignment(Alignment::Center),
        chunks[0],
    );

    let footer = Paragraph::new(Span::styled(
        "(esc) new test / (ctrl+c) quit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[4]);

    if history.is_empty() {
        f.render_widget(
            Paragraph::new("No test history yet. Complete a test to see statistics!")
                .style(Style::default().fg(Color::Gray))
                .block(Block::default().borders(Borders::ALL).title("No Data")),
            chunks[1],
        );
        return;
    }

    f.render_widget(
        Paragraph::new(statistics_lines(&history.statistics())).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Overall Statistics"),
        ),
        chunks[1],
    );

    let recent = history.recent(TREND_WINDOW);
    let points = trend_points(recent);
    let (runs, ceiling) = compute_chart_bounds(&points);
    let datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&points)];
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Recent WPM Trend (Last {} Tests)", recent.len())),
        )
        .x_axis(
            Axis::default()
                .title("run")
                .bounds([1.0, runs])
                .labels(vec![
                    Span::styled("1", bold),
                    Span::styled(format_label(runs), bold),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, ceiling])
                .labels(vec![
                    Span::styled("0", bold),
                    Span::styled(format_label(ceiling), bold),
                ]),
        );
    f.render_widget(chart, chunks[2]);

    let best = recent.iter().map(|r| r.wpm).fold(0.0, f64::max);
    let bar_width = chunks[3].width.saturating_sub(30) as usize;
    let rows: Vec<Line> = recent
        .iter()
        .map(|r| {
            Line::from(vec![
                Span::raw(format!("  {}: ", r.timestamp.format("%m/%d %H:%M"))),
                Span::styled(bar(r.wpm, best, bar_width), Style::default().fg(Color::Yellow)),
                Span::raw(format!(" {:.1}", r.wpm)),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(rows).block(Block::default().borders(Borders::ALL).title("Recent Results")),
        chunks[3],
    );
}
