pub mod scene;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use sortline::clock::Millis;
use sortline::scoring::Summary;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const CARD_LANE_MIN_HEIGHT: u16 = scene::CARD_HEIGHT;

/// Remaining time as shown in the HUD, one decimal
pub fn format_time(remaining_ms: Millis) -> String {
    format!("{:.1}", remaining_ms as f64 / 1000.0)
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn hint_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

pub fn render_start(area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // title
            Constraint::Length(1),
            Constraint::Length(3), // rules
            Constraint::Length(1),
            Constraint::Length(1), // keys
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled("S O R T L I N E", bold().fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let rules = vec![
        Line::from(vec![
            Span::raw("Swipe "),
            Span::styled("OK", bold().fg(Color::Green)),
            Span::raw(" items right and "),
            Span::styled("NG", bold().fg(Color::Red)),
            Span::raw(" items left with the mouse."),
        ]),
        Line::from("Anything that reaches the end of the line unsorted counts as wrong."),
    ];
    Paragraph::new(rules)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    Paragraph::new(Span::styled("(enter) start / (q)uit", hint_style()))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
}

pub fn render_hud(remaining_ms: Millis, correct: u32, wrong: u32, area: Rect, buf: &mut Buffer) {
    let line = Line::from(vec![
        Span::styled(format_time(remaining_ms), bold()),
        Span::raw("   "),
        Span::styled(format!("correct {correct}"), bold().fg(Color::Green)),
        Span::raw("   "),
        Span::styled(format!("wrong {wrong}"), bold().fg(Color::Red)),
    ]);
    Paragraph::new(line)
        .alignment(Alignment::Center)
        .render(area, buf);
}

/// Draws the running game and returns the lane the cards move in
pub fn render_game(app: &App, now: Millis, area: Rect, buf: &mut Buffer) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // hud
            Constraint::Min(CARD_LANE_MIN_HEIGHT),
            Constraint::Length(1), // hints
        ])
        .split(area);

    render_hud(
        app.session.remaining_ms(),
        app.session.correct_count(),
        app.session.wrong_count(),
        rows[0],
        buf,
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(rows[1]);

    let bin_style = bold().add_modifier(Modifier::DIM);
    Paragraph::new(Span::styled("<< NG", bin_style.fg(Color::Red)))
        .alignment(Alignment::Center)
        .render(vertical_centre(columns[0]), buf);
    Paragraph::new(Span::styled("OK >>", bin_style.fg(Color::Green)))
        .alignment(Alignment::Center)
        .render(vertical_centre(columns[2]), buf);

    let belt = Block::default()
        .borders(Borders::LEFT | Borders::RIGHT)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::DarkGray));
    let lane = belt.inner(columns[1]);
    belt.render(columns[1], buf);

    app.session.renderer().render(lane, now, buf);

    Paragraph::new(Span::styled("drag a card sideways to sort it / (q)uit", hint_style()))
        .alignment(Alignment::Center)
        .render(rows[2], buf);

    lane
}

fn vertical_centre(area: Rect) -> Rect {
    Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1))
}

pub fn render_results(summary: &Summary, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // title
            Constraint::Length(1),
            Constraint::Length(4), // counts
            Constraint::Length(1),
            Constraint::Length(1), // comment
            Constraint::Length(1),
            Constraint::Length(1), // keys
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled("Shift over", bold().fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let counts = vec![
        Line::from(format!("sorted   {}", summary.total)),
        Line::from(Span::styled(
            format!("correct  {}", summary.correct),
            Style::default().fg(Color::Green),
        )),
        Line::from(Span::styled(
            format!("wrong    {}", summary.wrong),
            Style::default().fg(Color::Red),
        )),
        Line::from(Span::styled(format!("accuracy {}%", summary.accuracy), bold())),
    ];
    Paragraph::new(counts)
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        summary.comment.message(),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[5], buf);

    Paragraph::new(Span::styled("(r)etry / (q)uit", hint_style()))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);
}
