//! Status bar rendering with keybindings and transport state

use crate::engine::PlaybackState;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Data needed to render the status bar
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub cursor: usize,
    pub len: usize,
    pub playback: PlaybackState,
    pub speed_ms: u64,
    pub playback_rate: f64,
    /// Timelines are paced by rate, diagrams by speed
    pub is_timeline: bool,
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    // Left side: step info, pace and message
    let pace_text = if data.is_timeline {
        format!(" {}× ", data.playback_rate)
    } else {
        format!(" {}ms ", data.speed_ms)
    };
    let left_spans = vec![
        Span::styled(
            format!(" Step {}/{} ", data.cursor, data.len),
            Style::default()
                .bg(DEFAULT_THEME.accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            pace_text,
            Style::default()
                .bg(DEFAULT_THEME.cursor_bg)
                .fg(DEFAULT_THEME.annotation),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.cursor_bg)
                .fg(DEFAULT_THEME.dim),
        ),
        Span::styled(
            format!(" {} ", data.message),
            Style::default()
                .bg(DEFAULT_THEME.cursor_bg)
                .fg(DEFAULT_THEME.text),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.cursor_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    // Right side: keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.dim).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.cursor_bg)
        .fg(DEFAULT_THEME.text);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.cursor_bg)
        .fg(DEFAULT_THEME.dim);

    let step_keys = if data.is_timeline { " ←/→ " } else { " → " };
    let pace_keys = if data.is_timeline { " [/] " } else { " -/+ " };
    let mut right_spans = vec![
        Span::styled(step_keys, key_style),
        Span::styled(" step ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ⎵ ", key_style),
        Span::styled(" play ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(pace_keys, key_style),
        Span::styled(" pace ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ↵ / r ", key_style),
        Span::styled(" end/reset ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled("q", key_style),
        Span::styled(" quit ", desc_style),
        Span::styled("│", sep_style),
    ];

    let label = match data.playback {
        PlaybackState::Running => " ▶ PLAYING ",
        PlaybackState::Paused => " ⏸ PAUSED ",
        PlaybackState::Completed => " END ",
        PlaybackState::Idle => " START ",
    };
    let color = DEFAULT_THEME.playback(data.playback);
    right_spans.push(Span::styled(
        label,
        Style::default()
            .bg(color)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    ));

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.cursor_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
