//! A scheduler for whichever kind of scenario was loaded
//!
//! Front ends hold a [`Session`] and issue controls through it without
//! caring which policy is behind it. Controls that only exist for the
//! timeline variant return `None` on a diagram session.

use crate::config::Config;
use crate::engine::{
    CfgSimulationPolicy, ControlError, PlaybackState, RandomOracle, Scheduler, TimelinePolicy,
};
use crate::loader::Scenario;
use std::time::{Duration, Instant};

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Session::Timeline($s) => $body,
            Session::Diagram($s) => $body,
        }
    };
}

/// A running replay of one scenario
pub enum Session {
    Timeline(Scheduler<TimelinePolicy>),
    Diagram(Scheduler<CfgSimulationPolicy>),
}

impl Session {
    pub fn from_scenario(scenario: Scenario, config: &Config) -> Self {
        match scenario {
            Scenario::Timeline { steps } => {
                let policy = TimelinePolicy::new(steps);
                Session::Timeline(Scheduler::new(policy).with_pace(config.pace()))
            }
            Scenario::Diagram { blocks, functions } => {
                let oracle = match config.seed {
                    Some(seed) => RandomOracle::seeded(seed),
                    None => RandomOracle::from_entropy(),
                };
                let policy = CfgSimulationPolicy::with_oracle(blocks, functions, oracle);
                Session::Diagram(Scheduler::new(policy).with_pace(config.pace()))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Session::Timeline(_) => "timeline",
            Session::Diagram(_) => "diagram",
        }
    }

    pub fn state(&self) -> PlaybackState {
        dispatch!(self, s => s.state())
    }

    pub fn is_running(&self) -> bool {
        self.state() == PlaybackState::Running
    }

    pub fn cursor(&self) -> usize {
        dispatch!(self, s => s.cursor())
    }

    pub fn len(&self) -> usize {
        dispatch!(self, s => s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn speed_ms(&self) -> u64 {
        dispatch!(self, s => s.pace().speed_ms)
    }

    pub fn playback_rate(&self) -> f64 {
        dispatch!(self, s => s.pace().playback_rate)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        dispatch!(self, s => s.next_deadline())
    }

    pub fn time_until_next_step(&self) -> Option<Duration> {
        dispatch!(self, s => s.time_until_next_step())
    }

    pub fn play(&mut self) -> Result<(), ControlError> {
        dispatch!(self, s => s.play())
    }

    pub fn pause(&mut self) {
        dispatch!(self, s => s.pause())
    }

    /// Pause when playing, play otherwise. Returns the resulting state.
    pub fn toggle(&mut self) -> Result<PlaybackState, ControlError> {
        if self.is_running() {
            self.pause();
        } else {
            self.play()?;
        }
        Ok(self.state())
    }

    pub fn step(&mut self) -> Result<(), ControlError> {
        dispatch!(self, s => s.step())
    }

    pub fn step_n(&mut self, n: usize) -> Result<usize, ControlError> {
        dispatch!(self, s => s.step_n(n))
    }

    pub fn reset(&mut self) {
        dispatch!(self, s => s.reset())
    }

    pub fn tick(&mut self) -> bool {
        dispatch!(self, s => s.tick())
    }

    pub fn set_speed(&mut self, ms: u64) -> Result<(), ControlError> {
        dispatch!(self, s => s.set_speed(ms))
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> Result<(), ControlError> {
        dispatch!(self, s => s.set_playback_rate(rate))
    }

    /// Show the previous record. `None` for the diagram variant, which only moves forward.
    pub fn step_back(&mut self) -> Option<Result<(), ControlError>> {
        match self {
            Session::Timeline(s) => Some(s.step_back()),
            Session::Diagram(_) => None,
        }
    }

    /// Move to the end: a direct jump for timelines, a full replay for diagrams.
    pub fn jump_to_end(&mut self) -> Result<(), ControlError> {
        match self {
            Session::Timeline(s) => {
                s.jump_to_end();
                Ok(())
            }
            Session::Diagram(s) => s.fast_forward().map(|_| ()),
        }
    }

    /// Show record `index` directly. `None` for the diagram variant.
    pub fn jump_to(&mut self, index: usize) -> Option<()> {
        match self {
            Session::Timeline(s) => {
                s.jump_to(index);
                Some(())
            }
            Session::Diagram(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagram() -> Scenario {
        Scenario::from_json(
            r#"{"kind": "diagram", "blocks": [
                {"index": 0, "blockType": "start"},
                {"index": 1, "blockType": "condition", "content": "x > 0"},
                {"index": 2, "blockType": "end"}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_config_pace_applied() {
        let config = Config {
            speed_ms: 250,
            playback_rate: 2.0,
            ..Config::default()
        };
        let session = Session::from_scenario(diagram(), &config);
        assert_eq!(session.kind(), "diagram");
        assert_eq!(session.speed_ms(), 250);
        assert_eq!(session.playback_rate(), 2.0);
    }

    #[test]
    fn test_diagram_cannot_step_back() {
        let mut session = Session::from_scenario(diagram(), &Config::default());
        session.step().unwrap();
        assert!(session.step_back().is_none());
        assert!(session.jump_to(0).is_none());
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn test_jump_to_end_replays_diagram() {
        let mut session = Session::from_scenario(diagram(), &Config::default());
        session.jump_to_end().unwrap();
        assert_eq!(session.cursor(), 3);
        assert_eq!(session.state(), PlaybackState::Completed);
    }

    #[test]
    fn test_toggle() {
        let mut session = Session::from_scenario(diagram(), &Config::default());
        assert_eq!(session.toggle(), Ok(PlaybackState::Running));
        assert_eq!(session.toggle(), Ok(PlaybackState::Paused));
    }

    #[test]
    fn test_seeded_sessions_agree() {
        let config = Config {
            seed: Some(11),
            ..Config::default()
        };
        let outcome = |session: &Session| match session {
            Session::Diagram(s) => s.snapshot().state.branch_decision(1),
            Session::Timeline(_) => None,
        };
        let mut a = Session::from_scenario(diagram(), &config);
        let mut b = Session::from_scenario(diagram(), &config);
        a.step_n(2).unwrap();
        b.step_n(2).unwrap();
        assert!(outcome(&a).is_some());
        assert_eq!(outcome(&a), outcome(&b));
    }
}
