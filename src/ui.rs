use chrono::Utc;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use time_humanize::{Accuracy, HumanTime, Tense};
use unicode_width::UnicodeWidthStr;

use crate::catalog::Difficulty;
use crate::highlight::LanguageHint;
use crate::presenter::Presenter;
use crate::score_store::ScoreRecord;
use crate::session::SessionStatus;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// Everything the terminal shows, kept current through [`Presenter`] calls
#[derive(Debug, Clone)]
pub struct View {
    pub snippet: Option<String>,
    pub hint: Option<LanguageHint>,
    pub wpm: u32,
    pub accuracy: u8,
    pub time_remaining: u32,
    pub leaderboard: Vec<ScoreRecord>,
    pub status: SessionStatus,
}

impl Default for View {
    fn default() -> Self {
        Self {
            snippet: None,
            hint: None,
            wpm: 0,
            accuracy: 100,
            time_remaining: 0,
            leaderboard: Vec::new(),
            status: SessionStatus::Idle,
        }
    }
}

impl Presenter for View {
    fn display_snippet(&mut self, text: &str, hint: LanguageHint) {
        self.snippet = Some(text.to_string());
        self.hint = Some(hint);
    }

    fn clear_snippet(&mut self) {
        self.snippet = None;
        self.hint = None;
    }

    fn display_stats(&mut self, wpm: u32, accuracy: u8) {
        self.wpm = wpm;
        self.accuracy = accuracy;
    }

    fn display_time_remaining(&mut self, seconds: u32) {
        self.time_remaining = seconds;
    }

    fn display_leaderboard(&mut self, records: &[ScoreRecord]) {
        self.leaderboard = records.to_vec();
    }

    fn display_status(&mut self, status: SessionStatus) {
        self.status = status;
    }
}

/// The typing screen: snippet with per-character feedback, timer, stats
/// and the most recent scores
pub struct GameScreen<'a> {
    pub view: &'a View,
    pub input: &'a str,
    pub difficulty: Difficulty,
    pub username: &'a str,
}

/// Startup screen asking who is typing
pub struct NameEntryScreen<'a> {
    pub name: &'a str,
}

impl Widget for NameEntryScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let input = Paragraph::new(Line::from(vec![
            Span::styled(self.name.to_string(), bold_style),
            Span::styled(" ", bold_style.add_modifier(Modifier::UNDERLINED)),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Your name"))
        .alignment(Alignment::Center);
        input.render(chunks[1], buf);

        Paragraph::new(Span::styled(
            "(enter) start / (esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
    }
}

impl Widget for GameScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.view;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let snippet_lines = view
            .snippet
            .as_deref()
            .map(|s| s.split('\n').count())
            .unwrap_or(1) as u16;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),                 // header
                Constraint::Length(1),                 // timer
                Constraint::Min(snippet_lines + 2),    // snippet
                Constraint::Length(1),                 // stats
                Constraint::Length(1),                 // status / legend
                Constraint::Length(7),                 // leaderboard
            ])
            .split(area);

        let hint = view
            .hint
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_string());
        Paragraph::new(Span::styled(
            format!("{} | {} | {}", self.difficulty, hint, self.username),
            Style::default().fg(Color::Cyan).patch(bold_style),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        if view.snippet.is_some() {
            let timer_style = if view.time_remaining <= 5 {
                Style::default().fg(Color::Red).patch(bold_style)
            } else {
                dim_bold_style
            };
            Paragraph::new(Span::styled(format!("{}s", view.time_remaining), timer_style))
                .alignment(Alignment::Center)
                .render(chunks[1], buf);
        }

        match view.snippet.as_deref() {
            Some(snippet) => {
                let block_area = centered_block(chunks[2], snippet);
                Paragraph::new(snippet_lines_with_feedback(snippet, self.input))
                    .block(Block::default().borders(Borders::ALL))
                    .wrap(Wrap { trim: false })
                    .render(block_area, buf);
            }
            None => {
                Paragraph::new(Span::styled(
                    format!("no snippets for {}", self.difficulty),
                    Style::default().fg(Color::Yellow).patch(italic_style),
                ))
                .alignment(Alignment::Center)
                .render(chunks[2], buf);
            }
        }

        Paragraph::new(Span::styled(
            format!("WPM: {}   Accuracy: {}%", view.wpm, view.accuracy),
            bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        let (status_text, status_style) = match view.status {
            SessionStatus::Completed => (
                "done! (→) next / (←) retry / (↑↓) difficulty / (esc)ape",
                Style::default().fg(Color::Green).patch(bold_style),
            ),
            SessionStatus::Expired => (
                "time's up! (→) next / (←) retry / (↑↓) difficulty / (esc)ape",
                Style::default().fg(Color::Red).patch(bold_style),
            ),
            SessionStatus::Running | SessionStatus::Idle => (
                "(→) skip / (←) retry / (↑↓) difficulty / (esc)ape",
                italic_style,
            ),
        };
        Paragraph::new(Span::styled(status_text, status_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        let rows: Vec<Line> = if view.leaderboard.is_empty() {
            vec![Line::from(Span::styled("no scores yet", italic_style))]
        } else {
            view.leaderboard
                .iter()
                .map(|r| Line::from(leaderboard_line(r)))
                .collect()
        };
        Paragraph::new(rows)
            .block(Block::default().borders(Borders::ALL).title("Recent scores"))
            .render(chunks[5], buf);
    }
}

/// `WPM: 42 | Accuracy: 97% | ada (easy)`, plus how long ago when known
pub fn leaderboard_line(record: &ScoreRecord) -> String {
    let base = format!(
        "WPM: {} | Accuracy: {}% | {} ({})",
        record.wpm, record.accuracy, record.username, record.difficulty
    );
    match record.recorded_at {
        Some(at) => {
            let age = (Utc::now() - at).to_std().unwrap_or_default();
            format!(
                "{} · {}",
                base,
                HumanTime::from(age).to_text_en(Accuracy::Rough, Tense::Past)
            )
        }
        None => base,
    }
}

/// Block just wide enough for the longest snippet line, centered in `area`
fn centered_block(area: Rect, snippet: &str) -> Rect {
    let widest = snippet
        .split('\n')
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0) as u16;
    // borders plus room for the cursor past the last char
    let width = (widest + 3).min(area.width);
    let lines = snippet.split('\n').count() as u16;
    let height = (lines + 2).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Snippet text split into lines, each character styled by how the input
/// at that position compares to it
pub fn snippet_lines_with_feedback(snippet: &str, input: &str) -> Vec<Line<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let cursor_style = dim_bold_style.add_modifier(Modifier::UNDERLINED);

    let typed: Vec<char> = input.chars().collect();
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut idx = 0;

    for expected in snippet.chars() {
        let span = match typed.get(idx) {
            Some(&c) if c == expected => {
                (expected != '\n').then(|| Span::styled(expected.to_string(), green_bold_style))
            }
            Some(&c) => Some(Span::styled(visible(c), red_bold_style)),
            None if idx == typed.len() => Some(Span::styled(
                if expected == '\n' {
                    " ".to_string()
                } else {
                    expected.to_string()
                },
                cursor_style,
            )),
            None => {
                (expected != '\n').then(|| Span::styled(expected.to_string(), dim_bold_style))
            }
        };
        if let Some(span) = span {
            spans.push(span);
        }
        if expected == '\n' {
            lines.push(Line::from(std::mem::take(&mut spans)));
        }
        idx += 1;
    }

    // overtyped tail
    for &c in typed.iter().skip(idx) {
        spans.push(Span::styled(visible(c), red_bold_style));
    }
    if typed.len() == idx {
        spans.push(Span::styled(" ", cursor_style));
    }
    lines.push(Line::from(spans));
    lines
}

fn visible(c: char) -> String {
    match c {
        ' ' => "·".to_owned(),
        '\n' => "↵".to_owned(),
        c => c.to_string(),
    }
}
