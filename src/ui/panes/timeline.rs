//! Timeline panes: the step list and the current record's call stack
//!
//! The frames pane mirrors a debugger's stack view: one header per frame
//! with its call site, then parameters and locals. Values flagged as changed
//! since the previous record are highlighted.

use super::utils::{follow, pane_block, visible_rows, window};
use crate::model::{StackFrame, TimelineStep, Variable};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Data needed to render the step list
pub struct StepsRenderData<'a> {
    pub steps: &'a [TimelineStep],
    /// Index of the record currently shown
    pub current: Option<usize>,
    pub playback_rate: f64,
}

/// Render the list of timeline steps with the current one highlighted
pub fn render_steps_pane(
    frame: &mut Frame,
    area: Rect,
    data: StepsRenderData,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block("Timeline", is_focused);

    if data.steps.is_empty() {
        let paragraph = Paragraph::new("(no steps)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.dim));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = data
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let is_current = data.current == Some(i);
            let is_past = data.current.is_some_and(|c| i < c);
            let marker = if is_current {
                "▶ "
            } else if is_past {
                "✓ "
            } else {
                "  "
            };
            let name_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.frame_active)
                    .add_modifier(Modifier::BOLD)
            } else if is_past {
                Style::default().fg(DEFAULT_THEME.dim)
            } else {
                Style::default().fg(DEFAULT_THEME.text)
            };
            let effective_ms = (step.duration as f64 / data.playback_rate).round() as u64;
            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.highlight)),
                Span::styled(format!("{:>3}. ", i + 1), Style::default().fg(DEFAULT_THEME.dim)),
                Span::styled(step.name.clone(), name_style),
                Span::styled(
                    format!("  {}ms", effective_ms.max(1)),
                    Style::default().fg(DEFAULT_THEME.dim),
                ),
            ]);
            let item = ListItem::new(line);
            if is_current {
                item.style(Style::default().bg(DEFAULT_THEME.cursor_bg))
            } else {
                item
            }
        })
        .collect();

    let visible_height = visible_rows(area);
    if let Some(current) = data.current {
        follow(scroll_offset, current, visible_height);
    }
    let visible_items = window(items, scroll_offset, visible_height);
    frame.render_widget(List::new(visible_items).block(block), area);
}

fn variable_line(var: &Variable, indent: &str) -> Line<'static> {
    let value_style = if var.is_changed {
        Style::default()
            .fg(DEFAULT_THEME.changed)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.text)
    };
    let mut spans = vec![
        Span::raw(indent.to_string()),
        Span::styled(var.name.clone(), Style::default().fg(DEFAULT_THEME.accent)),
        Span::styled(
            format!(": {} ", var.var_type.label()),
            Style::default().fg(DEFAULT_THEME.annotation),
        ),
        Span::styled("= ", Style::default().fg(DEFAULT_THEME.dim)),
        Span::styled(var.value.to_string(), value_style),
    ];
    if var.is_changed {
        spans.push(Span::styled(" *", Style::default().fg(DEFAULT_THEME.changed)));
    }
    Line::from(spans)
}

fn frame_header(stack_frame: &StackFrame) -> Line<'static> {
    let name_style = if stack_frame.is_active {
        Style::default()
            .fg(DEFAULT_THEME.frame_active)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.frame_caller)
    };
    let mut spans = vec![
        Span::styled(
            if stack_frame.is_active { "▸ " } else { "  " },
            Style::default().fg(DEFAULT_THEME.highlight),
        ),
        Span::styled(
            format!("Frame {} ", stack_frame.depth),
            Style::default().fg(DEFAULT_THEME.dim),
        ),
        Span::styled("│ ", Style::default().fg(DEFAULT_THEME.dim)),
        Span::styled(format!("{}()", stack_frame.function_name), name_style),
    ];
    if let Some(line) = stack_frame.current_line {
        spans.push(Span::styled(
            format!("  line {}", line),
            Style::default().fg(DEFAULT_THEME.dim),
        ));
    }
    Line::from(spans)
}

/// Render the frames of the current record, innermost first
pub fn render_frames_pane(
    frame: &mut Frame,
    area: Rect,
    step: Option<&TimelineStep>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = match step {
        Some(step) => format!("Call Stack: {}", step.name),
        None => "Call Stack".to_string(),
    };
    let block = pane_block(&title, is_focused);

    let Some(step) = step else {
        let paragraph = Paragraph::new("(press Space to play or → to step)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.dim));
        frame.render_widget(paragraph, area);
        return;
    };

    let mut items = Vec::new();
    if !step.description.is_empty() {
        items.push(
            ListItem::new(step.description.clone())
                .style(Style::default().fg(DEFAULT_THEME.dim)),
        );
        items.push(ListItem::new(""));
    }

    if step.frames.is_empty() {
        items.push(ListItem::new("(empty)").style(Style::default().fg(DEFAULT_THEME.dim)));
    }

    for stack_frame in step.frames.iter().rev() {
        items.push(ListItem::new(frame_header(stack_frame)));
        if let Some(site) = &stack_frame.call_site {
            items.push(ListItem::new(Line::from(vec![
                Span::styled("  ↪ called from ", Style::default().fg(DEFAULT_THEME.dim)),
                Span::styled(site.clone(), Style::default().fg(DEFAULT_THEME.highlight)),
            ])));
        }
        for var in &stack_frame.parameters {
            items.push(ListItem::new(variable_line(var, "    (param) ")));
        }
        for var in &stack_frame.local_variables {
            items.push(ListItem::new(variable_line(var, "    ")));
        }
        items.push(ListItem::new(""));
    }

    let visible_items = window(items, scroll_offset, visible_rows(area));
    frame.render_widget(List::new(visible_items).block(block), area);
}
