pub mod charting;
pub mod history;
pub mod screen;

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};

use crate::{
    app::App,
    history::HistoryBackend,
    metrics,
    session::{Lifecycle, Session},
};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const PROGRESS_WIDTH: usize = 40;
const TITLE: &str = "TYPECLOCK - Terminal Typing Test";

/// Read-only view of the app at one instant, handed to the screens.
pub struct AppView<'a, B: HistoryBackend> {
    pub app: &'a App<B>,
    pub now: Instant,
}

pub fn draw<B: HistoryBackend>(f: &mut Frame, app: &App<B>, now: Instant) {
    let view = AppView { app, now };
    screen::current_screen::<B>(app.screen()).render(&view, f);
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// First passage index shown when only `visible` characters fit, keeping the
/// cursor near the middle.
pub fn window_start(cursor: usize, target_len: usize, visible: usize) -> usize {
    let half = visible / 2;
    if cursor <= half {
        0
    } else if target_len.saturating_sub(cursor) <= half {
        target_len.saturating_sub(visible)
    } else {
        cursor - half
    }
}

/// `[=====>     ]` for the typed share of the passage.
pub fn progress_bar(position: usize, target_len: usize, width: usize) -> String {
    let filled = if target_len == 0 {
        0
    } else {
        (position.min(target_len) * width) / target_len
    };
    format!("[{}>{}]", "=".repeat(filled), " ".repeat(width - filled))
}

fn passage_spans(session: &Session, visible: usize) -> Vec<Span<'static>> {
    let green = bold().fg(Color::Green);
    let red = bold().fg(Color::Red);
    let cursor_style = dim().add_modifier(Modifier::UNDERLINED);

    let target: Vec<char> = session.target().chars().collect();
    let typed: Vec<char> = session.input().chars().collect();
    let cursor = typed.len();
    let start = window_start(cursor, target.len(), visible);
    let end = (start + visible).min(target.len());

    let mut spans: Vec<Span> = (start..end)
        .map(|idx| {
            let expected = target[idx];
            match typed.get(idx) {
                Some(&c) if c == expected => Span::styled(expected.to_string(), green),
                Some(&c) => Span::styled(
                    match c {
                        ' ' => "·".to_owned(),
                        c => c.to_string(),
                    },
                    red,
                ),
                None if idx == cursor => Span::styled(expected.to_string(), cursor_style),
                None => Span::styled(expected.to_string(), dim()),
            }
        })
        .collect();

    if cursor >= target.len() {
        let overflow: String = typed[target.len()..].iter().collect();
        if !overflow.is_empty() {
            spans.push(Span::styled(overflow, red));
        }
        spans.push(Span::styled("|", bold()));
    }
    spans
}

impl<B: HistoryBackend> Widget for &AppView<'_, B> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.app.session();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(1), // live stats
                Constraint::Min(1),
                Constraint::Length(1), // passage
                Constraint::Length(1), // progress bar
                Constraint::Length(1), // position
                Constraint::Min(1),
                Constraint::Length(1), // footer
            ])
            .split(area);

        Paragraph::new(Span::styled(TITLE, bold().fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let stats = match session.lifecycle() {
            Lifecycle::NotStarted => format!(
                "Duration: {}s | Press any key to start...",
                session.duration().as_secs()
            ),
            Lifecycle::Running | Lifecycle::Completed => format!(
                "Time: {:.1}s | WPM: {:.0} | Accuracy: {:.1}%",
                session.seconds_remaining(self.now),
                metrics::wpm(session, self.now),
                metrics::accuracy(session),
            ),
        };
        Paragraph::new(Span::styled(stats, Style::default().fg(Color::Yellow)))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let visible = chunks[3].width.saturating_sub(4).max(1) as usize;
        Paragraph::new(Line::from(passage_spans(session, visible)))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let position = session.total_typed();
        let target_len = session.target_len();
        Paragraph::new(progress_bar(position, target_len, PROGRESS_WIDTH))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
        Paragraph::new(Span::styled(
            format!("Position: {}/{}", position.min(target_len), target_len),
            dim(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

        Paragraph::new(Span::styled(
            "(esc) restart / (ctrl+c) quit",
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);
    }
}

/// Results screen: always reads the record frozen at completion.
pub struct ResultsView<'a, B: HistoryBackend>(pub &'a AppView<'a, B>);

impl<B: HistoryBackend> Widget for ResultsView<'_, B> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.0.app;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1), // heading
                Constraint::Length(1),
                Constraint::Length(5), // numbers
                Constraint::Length(1), // save failure
                Constraint::Length(1),
                Constraint::Length(1), // legend
                Constraint::Min(1),
            ])
            .split(area);

        Paragraph::new(Span::styled("Test Complete!", bold().fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let lines: Vec<Line> = match app.last_result() {
            Some(r) => vec![
                Line::from(format!("WPM: {:.2}", r.wpm)),
                Line::from(format!("Accuracy: {:.2}%", r.accuracy)),
                Line::from(format!("Correct Characters: {}", r.correct_chars)),
                Line::from(format!("Incorrect Characters: {}", r.incorrect_chars)),
                Line::from(format!("Total Characters: {}", r.total_chars)),
            ],
            None => vec![Line::from("No result recorded")],
        };
        Paragraph::new(lines)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        if let Some(err) = app.persist_error() {
            Paragraph::new(Span::styled(
                format!("Result not saved: {err}"),
                bold().fg(Color::Red),
            ))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
        }

        Paragraph::new(Span::styled(
            "(esc) restart / (h)istory / (ctrl+c) quit",
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);
    }
}
