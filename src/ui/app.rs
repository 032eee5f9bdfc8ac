//! Main TUI application state and logic

use crate::engine::{ControlError, PlaybackState};
use crate::session::Session;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

use super::panes::{
    render_blocks_pane, render_call_stack_pane, render_frames_pane, render_path_pane,
    render_status_bar, render_steps_pane, BlocksRenderData, StatusRenderData, StepsRenderData,
};

/// Speed change per `+`/`-` press
const SPEED_STEP_MS: u64 = 100;
/// Playback rate change per `[`/`]` press, and its bounds
const RATE_STEP: f64 = 0.25;
const MIN_RATE: f64 = 0.5;
const MAX_RATE: f64 = 3.0;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Sequence,
    Stack,
    Path,
}

impl FocusedPane {
    /// Move focus to the next pane. Timelines have no path pane.
    pub fn next(self, has_path: bool) -> Self {
        match self {
            FocusedPane::Sequence => FocusedPane::Stack,
            FocusedPane::Stack if has_path => FocusedPane::Path,
            FocusedPane::Stack => FocusedPane::Sequence,
            FocusedPane::Path => FocusedPane::Sequence,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self, has_path: bool) -> Self {
        match self {
            FocusedPane::Sequence if has_path => FocusedPane::Path,
            FocusedPane::Sequence => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Sequence,
            FocusedPane::Path => FocusedPane::Stack,
        }
    }
}

/// The main application state
pub struct App {
    /// The replay being shown
    pub session: Session,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub sequence_scroll: usize,
    pub stack_scroll: usize,
    pub path_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Longest wait for input before checking the step timer
    pub poll_interval: Duration,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(session: Session, poll_interval: Duration) -> Self {
        App {
            session,
            focused_pane: FocusedPane::Sequence,
            sequence_scroll: 0,
            stack_scroll: 0,
            path_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            poll_interval,
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    fn has_path(&self) -> bool {
        matches!(self.session, Session::Diagram(_))
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Let the scheduler fire its timer if it is due
            if self.session.tick() {
                self.after_step();
                self.status_message = match self.session.state() {
                    PlaybackState::Completed => "Playback complete".to_string(),
                    _ => "Playing...".to_string(),
                };
            }

            // Wake up for the next step or for input, whichever comes first
            let timeout = match self.session.time_until_next_step() {
                Some(left) => left.min(self.poll_interval),
                None => self.poll_interval,
            };
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        if self.has_path() {
            self.render_diagram(frame, pane_area);
        } else {
            self.render_timeline(frame, pane_area);
        }

        render_status_bar(
            frame,
            status_area,
            StatusRenderData {
                message: &self.status_message,
                cursor: self.session.cursor(),
                len: self.session.len(),
                playback: self.session.state(),
                speed_ms: self.session.speed_ms(),
                playback_rate: self.session.playback_rate(),
                is_timeline: !self.has_path(),
            },
        );
    }

    fn render_timeline(&mut self, frame: &mut Frame, area: Rect) {
        let Session::Timeline(scheduler) = &self.session else {
            return;
        };
        let snapshot = scheduler.snapshot();

        // Left: step list | Right: frames of the current record
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        render_steps_pane(
            frame,
            columns[0],
            StepsRenderData {
                steps: scheduler.policy().steps(),
                current: snapshot.current_index(),
                playback_rate: snapshot.playback_rate,
            },
            self.focused_pane == FocusedPane::Sequence,
            &mut self.sequence_scroll,
        );

        render_frames_pane(
            frame,
            columns[1],
            snapshot.payload.as_ref(),
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );
    }

    fn render_diagram(&mut self, frame: &mut Frame, area: Rect) {
        let Session::Diagram(scheduler) = &self.session else {
            return;
        };
        let snapshot = scheduler.snapshot();
        let policy = scheduler.policy();
        let recursive: Vec<String> = policy
            .functions()
            .iter()
            .filter(|f| f.is_recursive())
            .map(|f| f.name.clone())
            .collect();

        // Left: blocks | Right: call stack (top) and execution path (bottom)
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        render_blocks_pane(
            frame,
            columns[0],
            BlocksRenderData {
                blocks: policy.blocks(),
                state: &snapshot.state,
                recursive: &recursive,
            },
            self.focused_pane == FocusedPane::Sequence,
            &mut self.sequence_scroll,
        );

        render_call_stack_pane(
            frame,
            right_rows[0],
            &snapshot.state,
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        render_path_pane(
            frame,
            right_rows[1],
            &snapshot.state,
            self.focused_pane == FocusedPane::Path,
            &mut self.path_scroll,
        );
    }

    /// Keep the path pane pinned to its newest entry after a step
    fn after_step(&mut self) {
        self.path_scroll = usize::MAX;
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.session.pause();
                let n = c.to_digit(10).unwrap_or(1) as usize;
                match self.session.step_n(n) {
                    Ok(stepped) => {
                        self.status_message = format!("Stepped forward {} step(s)", stepped);
                    }
                    Err(e) => self.report(e),
                }
                self.after_step();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next(self.has_path());
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev(self.has_path());
            }
            KeyCode::Left => {
                self.session.pause();
                self.step_backward();
            }
            KeyCode::Right => {
                self.session.pause();
                self.step_forward();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::Char(' ') => {
                // Toggle playback (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    match self.session.toggle() {
                        Ok(PlaybackState::Running) => {
                            self.status_message = "Playing...".to_string();
                        }
                        Ok(_) => self.status_message = "Paused".to_string(),
                        Err(e) => self.report(e),
                    }
                }
            }
            KeyCode::Enter => {
                self.session.pause();
                match self.session.jump_to_end() {
                    Ok(()) => self.status_message = "Jumped to end".to_string(),
                    Err(e) => self.report(e),
                }
                self.after_step();
            }
            KeyCode::Backspace | KeyCode::Char('r') | KeyCode::Char('R') => {
                self.session.reset();
                self.sequence_scroll = 0;
                self.stack_scroll = 0;
                self.path_scroll = 0;
                self.status_message = "Reset to start".to_string();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let faster = self
                    .session
                    .speed_ms()
                    .saturating_sub(SPEED_STEP_MS)
                    .max(SPEED_STEP_MS);
                self.change_speed(faster);
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                let slower = self.session.speed_ms().saturating_add(SPEED_STEP_MS);
                self.change_speed(slower);
            }
            KeyCode::Char(']') => {
                let rate = (self.session.playback_rate() + RATE_STEP).min(MAX_RATE);
                self.change_rate(rate);
            }
            KeyCode::Char('[') => {
                let rate = (self.session.playback_rate() - RATE_STEP).max(MIN_RATE);
                self.change_rate(rate);
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Sequence => &mut self.sequence_scroll,
            FocusedPane::Stack => &mut self.stack_scroll,
            FocusedPane::Path => &mut self.path_scroll,
        }
    }

    fn change_speed(&mut self, ms: u64) {
        match self.session.set_speed(ms) {
            Ok(()) => self.status_message = format!("Speed: {}ms per step", ms),
            Err(e) => self.report(e),
        }
    }

    fn change_rate(&mut self, rate: f64) {
        match self.session.set_playback_rate(rate) {
            Ok(()) => self.status_message = format!("Playback rate: {}×", rate),
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, error: ControlError) {
        self.status_message = match error {
            ControlError::Exhausted { .. } => "End of execution (press r to reset)".to_string(),
            other => format!("Error: {}", other),
        };
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        match self.session.step() {
            Ok(()) => {
                self.status_message = "Stepped forward".to_string();
                self.after_step();
            }
            Err(e) => self.report(e),
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        match self.session.step_back() {
            Some(Ok(())) => self.status_message = "Stepped backward".to_string(),
            Some(Err(ControlError::AtStart)) => {
                self.status_message = "Cannot step backward: already at the start".to_string();
            }
            Some(Err(e)) => self.report(e),
            None => {
                self.status_message =
                    "Cannot step backward: the simulation only moves forward (r to reset)"
                        .to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::loader::Scenario;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        let scenario = Scenario::from_json(
            r#"{"kind": "timeline", "steps": [
                {"id": "a", "name": "a", "duration": 100},
                {"id": "b", "name": "b", "duration": 100},
                {"id": "c", "name": "c", "duration": 100}
            ]}"#,
        )
        .unwrap();
        App::new(
            Session::from_scenario(scenario, &Config::default()),
            Duration::from_millis(50),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_focus_cycle() {
        assert_eq!(FocusedPane::Stack.next(false), FocusedPane::Sequence);
        assert_eq!(FocusedPane::Stack.next(true), FocusedPane::Path);
        assert_eq!(FocusedPane::Sequence.prev(true), FocusedPane::Path);
        assert_eq!(FocusedPane::Sequence.prev(false), FocusedPane::Stack);
    }

    #[test]
    fn test_number_key_steps() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.session.cursor(), 2);
        assert_eq!(app.status_message, "Stepped forward 2 step(s)");
    }

    #[test]
    fn test_step_keys_and_reset() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.session.cursor(), 1);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.session.cursor(), 0);
        assert_eq!(app.session.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_rate_keys_are_bounded() {
        let mut app = app();
        for _ in 0..20 {
            press(&mut app, KeyCode::Char(']'));
        }
        assert_eq!(app.session.playback_rate(), MAX_RATE);
        for _ in 0..20 {
            press(&mut app, KeyCode::Char('['));
        }
        assert_eq!(app.session.playback_rate(), MIN_RATE);
    }

    #[test]
    fn test_enter_jumps_to_end() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.cursor(), 3);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.status_message, "End of execution (press r to reset)");
    }
}
