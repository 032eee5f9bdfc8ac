//! Transition policies
//!
//! A [`TransitionPolicy`] turns "perform step `i` from accumulated state `S`"
//! into the next accumulated state, the payload to present, and the delay
//! that step is held for. The scheduler is the only caller and guarantees
//! `index < len()` and strictly sequential indices between resets (except
//! for stateless seeks on the timeline variant).

use std::fmt::Debug;
use std::time::Duration;

/// Default per-step delay for the CFG variant
pub const DEFAULT_SPEED_MS: u64 = 1000;

/// Default playback rate for the timeline variant
pub const DEFAULT_PLAYBACK_RATE: f64 = 1.0;

/// Pacing knobs shared by both policies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pace {
    /// Global per-step delay in milliseconds (CFG variant)
    pub speed_ms: u64,
    /// Divides authored durations (timeline variant)
    pub playback_rate: f64,
}

impl Default for Pace {
    fn default() -> Self {
        Pace {
            speed_ms: DEFAULT_SPEED_MS,
            playback_rate: DEFAULT_PLAYBACK_RATE,
        }
    }
}

impl Pace {
    /// Scale an authored duration by the playback rate. Never below 1 ms.
    pub fn scaled(&self, authored_ms: u64) -> Duration {
        let ms = (authored_ms as f64 / self.playback_rate).round();
        let ms = if ms.is_finite() && ms >= 1.0 {
            ms as u64
        } else {
            1
        };
        Duration::from_millis(ms)
    }

    /// The global speed as a delay. Never below 1 ms.
    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms.max(1))
    }
}

/// Per-step inputs the scheduler hands a policy
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    pub pace: Pace,
    /// Time since the last reset
    pub elapsed: Duration,
}

/// The result of one step
#[derive(Debug, Clone)]
pub struct Transition<S, P> {
    pub state: S,
    pub payload: P,
    pub delay: Duration,
}

/// A rule producing the states being replayed
pub trait TransitionPolicy {
    /// Accumulated bookkeeping carried from step to step
    type State: Clone + Default + Debug;
    /// What a single step yields for presentation
    type Payload: Clone + Debug;

    /// Number of steps in the sequence
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How long step `index` is held for under `pace`
    fn delay(&self, index: usize, pace: &Pace) -> Duration;

    /// Perform step `index` on top of `prior`
    fn transition(
        &mut self,
        index: usize,
        prior: &Self::State,
        ctx: &StepContext,
    ) -> Transition<Self::State, Self::Payload>;

    /// Called on reset, before the first step of a new run
    fn restart(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_duration() {
        let pace = Pace {
            speed_ms: 100,
            playback_rate: 2.0,
        };
        assert_eq!(pace.scaled(1000), Duration::from_millis(500));
        assert_eq!(pace.scaled(1), Duration::from_millis(1));

        let slow = Pace {
            speed_ms: 100,
            playback_rate: 0.5,
        };
        assert_eq!(slow.scaled(800), Duration::from_millis(1600));
    }

    #[test]
    fn test_speed_never_zero() {
        let pace = Pace {
            speed_ms: 0,
            playback_rate: 1.0,
        };
        assert_eq!(pace.speed(), Duration::from_millis(1));
    }
}
