//! Diagram panes: block list, simulated call stack, execution path

use super::utils::{follow, pane_block, visible_rows, window};
use crate::engine::ExecutionState;
use crate::model::DiagramBlock;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Data needed to render the block list
pub struct BlocksRenderData<'a> {
    pub blocks: &'a [DiagramBlock],
    pub state: &'a ExecutionState,
    /// Names of functions flagged recursive
    pub recursive: &'a [String],
}

/// Render every block with its active/visited/branch/loop markers
pub fn render_blocks_pane(
    frame: &mut Frame,
    area: Rect,
    data: BlocksRenderData,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block("Control Flow", is_focused);

    if data.blocks.is_empty() {
        let paragraph = Paragraph::new("(no blocks)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.dim));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = data
        .blocks
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let is_active = data.state.is_active(i);
            let marker = if is_active {
                "▶ "
            } else if data.state.is_visited(i) {
                "✓ "
            } else {
                "  "
            };
            let content_style = if is_active {
                Style::default()
                    .fg(DEFAULT_THEME.block(b.block_type))
                    .add_modifier(Modifier::BOLD)
            } else if data.state.is_visited(i) {
                Style::default().fg(DEFAULT_THEME.dim)
            } else {
                Style::default().fg(DEFAULT_THEME.block(b.block_type))
            };

            let mut spans = vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.highlight)),
                Span::styled(format!("{:>3} ", b.index), Style::default().fg(DEFAULT_THEME.dim)),
                Span::styled(
                    format!("{:<9} ", b.block_type.label()),
                    Style::default().fg(DEFAULT_THEME.annotation),
                ),
                Span::styled(b.content.clone(), content_style),
            ];
            if let Some(name) = &b.function_name {
                let tag = if data.recursive.iter().any(|r| r == name) {
                    format!("  [{} ↻]", name)
                } else {
                    format!("  [{}]", name)
                };
                spans.push(Span::styled(tag, Style::default().fg(DEFAULT_THEME.frame_caller)));
            }
            if let Some(taken) = data.state.branch_decision(i) {
                let (text, color) = if taken {
                    ("  → true", DEFAULT_THEME.taken)
                } else {
                    ("  → false", DEFAULT_THEME.not_taken)
                };
                spans.push(Span::styled(text, Style::default().fg(color)));
            }
            let iterations = data.state.loop_iteration(i);
            if iterations > 0 {
                spans.push(Span::styled(
                    format!("  ×{}", iterations),
                    Style::default().fg(DEFAULT_THEME.annotation),
                ));
            }

            let item = ListItem::new(Line::from(spans));
            if is_active {
                item.style(Style::default().bg(DEFAULT_THEME.cursor_bg))
            } else {
                item
            }
        })
        .collect();

    let visible_height = visible_rows(area);
    if let Some(active) = data.state.active_block() {
        follow(scroll_offset, active, visible_height);
    }
    let visible_items = window(items, scroll_offset, visible_height);
    frame.render_widget(List::new(visible_items).block(block), area);
}

/// Render the simulated call stack, innermost frame on top
pub fn render_call_stack_pane(
    frame: &mut Frame,
    area: Rect,
    state: &ExecutionState,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block("Call Stack", is_focused);
    let frames = state.call_stack();

    if frames.is_empty() {
        let paragraph = Paragraph::new("(empty)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.dim));
        frame.render_widget(paragraph, area);
        return;
    }

    let top = frames.len() - 1;
    let items: Vec<ListItem> = frames
        .iter()
        .enumerate()
        .rev()
        .map(|(i, f)| {
            let name_style = if i == top {
                Style::default()
                    .fg(DEFAULT_THEME.frame_active)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.frame_caller)
            };
            let mut spans = vec![
                Span::styled(
                    format!("Frame {} ", f.depth),
                    Style::default().fg(DEFAULT_THEME.dim),
                ),
                Span::styled("│ ", Style::default().fg(DEFAULT_THEME.dim)),
                Span::styled(format!("{}()", f.function_name), name_style),
                Span::styled(
                    format!("  entered at block {}", f.entry_step),
                    Style::default().fg(DEFAULT_THEME.dim),
                ),
            ];
            let live = state.frames_named(&f.function_name);
            if live > 1 {
                spans.push(Span::styled(
                    format!("  (recursion ×{})", live),
                    Style::default().fg(DEFAULT_THEME.highlight),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let visible_items = window(items, scroll_offset, visible_rows(area));
    frame.render_widget(List::new(visible_items).block(block), area);
}

/// Render the execution path, newest entries last
pub fn render_path_pane(
    frame: &mut Frame,
    area: Rect,
    state: &ExecutionState,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let path = state.path();
    let block = pane_block(&format!("Execution Path ({})", path.len()), is_focused);

    if path.is_empty() {
        let paragraph = Paragraph::new("(nothing executed yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.dim));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = path
        .iter()
        .enumerate()
        .map(|(n, entry)| {
            let mut spans = vec![
                Span::styled(format!("{:>4} ", n + 1), Style::default().fg(DEFAULT_THEME.dim)),
                Span::styled(
                    format!("block {}", entry.block_index),
                    Style::default().fg(DEFAULT_THEME.text),
                ),
                Span::styled(
                    format!("  @{}ms", entry.timestamp.as_millis()),
                    Style::default().fg(DEFAULT_THEME.dim),
                ),
            ];
            if let Some(name) = &entry.function_name {
                spans.push(Span::styled(
                    format!("  in {}()", name),
                    Style::default().fg(DEFAULT_THEME.frame_caller),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let visible_items = window(items, scroll_offset, visible_rows(area));
    frame.render_widget(List::new(visible_items).block(block), area);
}
