//! Colors for every pane, keyed by what they mark rather than by hue

use crate::engine::PlaybackState;
use crate::model::BlockType;
use ratatui::style::Color;

pub struct Theme {
    pub text: Color,
    pub accent: Color,
    pub highlight: Color,
    pub dim: Color,
    /// Branch taken, first step
    pub taken: Color,
    /// Branch not taken, end of sequence
    pub not_taken: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    /// Background of the row under the cursor and of the status bar
    pub cursor_bg: Color,
    pub frame_active: Color,
    pub frame_caller: Color,
    pub annotation: Color,
    pub changed: Color,
}

impl Theme {
    pub fn block(&self, block_type: BlockType) -> Color {
        match block_type {
            BlockType::Start | BlockType::End => self.taken,
            BlockType::Condition => self.highlight,
            BlockType::Loop => self.annotation,
            BlockType::Function | BlockType::Return => self.frame_active,
            BlockType::Process => self.text,
        }
    }

    pub fn playback(&self, playback: PlaybackState) -> Color {
        match playback {
            PlaybackState::Idle => self.taken,
            PlaybackState::Running => self.highlight,
            PlaybackState::Paused => self.accent,
            PlaybackState::Completed => self.not_taken,
        }
    }
}

pub const DEFAULT_THEME: Theme = Theme {
    text: Color::Rgb(205, 214, 244),
    accent: Color::Rgb(137, 180, 250),
    highlight: Color::Rgb(250, 179, 135),
    dim: Color::Rgb(108, 112, 134),
    taken: Color::Rgb(166, 227, 161),
    not_taken: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
    cursor_bg: Color::Rgb(50, 50, 70),
    frame_active: Color::Rgb(249, 226, 175),
    frame_caller: Color::Rgb(180, 165, 120),
    annotation: Color::Rgb(148, 226, 213),
    changed: Color::Rgb(245, 194, 231),
};
