//! Shared helpers for pane rendering

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Border style for a pane, highlighted when focused
pub fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Bordered block with a padded title
pub fn pane_block(title: &str, is_focused: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused))
}

/// Rows available inside a bordered pane
pub fn visible_rows(area: Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize // Account for borders, min 1
}

/// Clamp `offset` so the window never scrolls past the last item
pub fn clamp_scroll(offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *offset = (*offset).min(max_scroll);
    } else {
        *offset = 0;
    }
}

/// Scroll just enough to keep row `target` inside the window
pub fn follow(offset: &mut usize, target: usize, visible_height: usize) {
    if target < *offset {
        *offset = target;
    } else if target >= *offset + visible_height {
        *offset = target + 1 - visible_height;
    }
}

/// Take the visible slice of `items` after clamping `offset`
pub fn window<T>(items: Vec<T>, offset: &mut usize, visible_height: usize) -> Vec<T> {
    clamp_scroll(offset, items.len(), visible_height);
    items
        .into_iter()
        .skip(*offset)
        .take(visible_height)
        .collect()
}
