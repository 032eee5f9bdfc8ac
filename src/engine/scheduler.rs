//! Playback scheduler
//!
//! The [`Scheduler`] owns the transport state machine and is the only writer
//! of the replayed state. It performs steps on demand ([`Scheduler::step`])
//! or from a single one-shot timer while playing, and publishes an immutable
//! [`Snapshot`] after every change.
//!
//! ```text
//! Idle ──play──▶ Running ──pause──▶ Paused ──play──▶ Running
//!   ▲               │ last step                        │
//!   │               ▼                                  │
//!   └──reset── Completed ◀─────────── last step ───────┘
//! ```
//!
//! # Timer
//!
//! At most one timer is armed, and only while Running. Arming always cancels
//! the previous timer first. The timer is a deadline checked by
//! [`Scheduler::tick`]; the host loop calls `tick` whenever it wakes up and
//! may use [`Scheduler::next_deadline`] to decide how long to sleep.
//! `pause` and `reset` cancel the timer before returning, so no queued step
//! fires after them.

use super::clock::{Clock, SystemClock};
use super::errors::ControlError;
use super::policy::{Pace, StepContext, TransitionPolicy};
use super::timeline::TimelinePolicy;
use crate::snapshot::{Snapshot, SnapshotHub, SubscriptionId};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackState::Idle => "Idle",
            PlaybackState::Running => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Completed => "Completed",
        }
    }
}

/// Snapshot type published for a policy
pub type SnapshotOf<P> =
    Snapshot<<P as TransitionPolicy>::Payload, <P as TransitionPolicy>::State>;

/// The armed one-shot timer
#[derive(Debug, Clone, Copy)]
struct PendingStep {
    due: Instant,
    generation: u64,
}

/// Drives a [`TransitionPolicy`] through its sequence
pub struct Scheduler<P: TransitionPolicy, C: Clock = SystemClock> {
    policy: P,
    clock: C,
    pace: Pace,
    cursor: usize,
    playback: PlaybackState,
    pending: Option<PendingStep>,
    generation: u64,
    /// When the current run started (last reset)
    epoch: Instant,
    revision: u64,
    current: Arc<SnapshotOf<P>>,
    hub: SnapshotHub<SnapshotOf<P>>,
}

impl<P: TransitionPolicy> Scheduler<P, SystemClock> {
    pub fn new(policy: P) -> Self {
        Self::with_clock(policy, SystemClock)
    }
}

impl<P: TransitionPolicy, C: Clock> Scheduler<P, C> {
    pub fn with_clock(policy: P, clock: C) -> Self {
        let pace = Pace::default();
        let epoch = clock.now();
        let current = Arc::new(Snapshot {
            revision: 0,
            cursor: 0,
            len: policy.len(),
            playback: PlaybackState::Idle,
            payload: None,
            state: P::State::default(),
            speed_ms: pace.speed_ms,
            playback_rate: pace.playback_rate,
        });
        Scheduler {
            policy,
            clock,
            pace,
            cursor: 0,
            playback: PlaybackState::Idle,
            pending: None,
            generation: 0,
            epoch,
            revision: 0,
            current,
            hub: SnapshotHub::new(),
        }
    }

    /// Start with `pace` instead of the defaults.
    ///
    /// A non-positive speed or rate is logged by `set_speed` /
    /// `set_playback_rate` and the default is kept.
    pub fn with_pace(mut self, pace: Pace) -> Self {
        let _ = self.set_speed(pace.speed_ms);
        let _ = self.set_playback_rate(pace.playback_rate);
        self
    }

    // ========== Read-only view ==========

    /// The most recently published snapshot
    pub fn snapshot(&self) -> Arc<SnapshotOf<P>> {
        Arc::clone(&self.current)
    }

    pub fn state(&self) -> PlaybackState {
        self.playback
    }

    pub fn is_running(&self) -> bool {
        self.playback == PlaybackState::Running
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.policy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policy.is_empty()
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    /// When the armed timer fires, if one is armed
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    /// Time left until the armed timer fires
    pub fn time_until_next_step(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.pending.map(|p| p.due.saturating_duration_since(now))
    }

    /// Register an observer called after every publish
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Arc<SnapshotOf<P>>) + 'static,
    {
        self.hub.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.hub.unsubscribe(id)
    }

    // ========== Transport controls ==========

    /// Start auto-advancing. A no-op while already playing.
    pub fn play(&mut self) -> Result<(), ControlError> {
        if self.playback == PlaybackState::Running {
            return Ok(());
        }
        self.ensure_remaining()?;

        self.cancel_timer();
        self.playback = PlaybackState::Running;
        self.arm_timer();
        info!(cursor = self.cursor, len = self.len(), "playback started");
        self.republish();
        Ok(())
    }

    /// Stop auto-advancing. A no-op unless playing.
    pub fn pause(&mut self) {
        if self.playback != PlaybackState::Running {
            return;
        }
        self.cancel_timer();
        self.playback = PlaybackState::Paused;
        info!(cursor = self.cursor, "playback paused");
        self.republish();
    }

    /// Perform exactly one step. Rejected while playing or once exhausted.
    pub fn step(&mut self) -> Result<(), ControlError> {
        if self.playback == PlaybackState::Running {
            return Err(ControlError::Busy);
        }
        self.ensure_remaining()?;

        if !self.perform_step() {
            self.playback = PlaybackState::Paused;
        }
        self.republish();
        Ok(())
    }

    /// Return to the start with all bookkeeping cleared
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.cursor = 0;
        self.playback = PlaybackState::Idle;
        self.epoch = self.clock.now();
        self.policy.restart();
        info!("playback reset");
        self.publish(None, P::State::default());
    }

    /// Change the per-step delay used from the next arm or step on
    pub fn set_speed(&mut self, ms: u64) -> Result<(), ControlError> {
        if ms == 0 {
            warn!(ms, "rejected non-positive speed");
            return Err(ControlError::InvalidSpeed(ms));
        }
        self.pace.speed_ms = ms;
        debug!(ms, "speed changed");
        self.republish();
        Ok(())
    }

    /// Change the multiplier applied to authored durations
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<(), ControlError> {
        if !rate.is_finite() || rate <= 0.0 {
            warn!(rate, "rejected playback rate");
            return Err(ControlError::InvalidRate(rate));
        }
        self.pace.playback_rate = rate;
        debug!(rate, "playback rate changed");
        self.republish();
        Ok(())
    }

    /// Perform up to `n` steps. Returns how many were taken.
    pub fn step_n(&mut self, n: usize) -> Result<usize, ControlError> {
        if self.playback == PlaybackState::Running {
            return Err(ControlError::Busy);
        }
        let mut taken = 0;
        while taken < n && self.cursor < self.len() {
            self.step()?;
            taken += 1;
        }
        Ok(taken)
    }

    /// Step until the sequence is exhausted, replaying every step on the way
    pub fn fast_forward(&mut self) -> Result<usize, ControlError> {
        let remaining = self.len().saturating_sub(self.cursor);
        self.step_n(remaining)
    }

    /// Fire the armed timer if it is due. Returns true if a step was taken.
    pub fn tick(&mut self) -> bool {
        if self.playback != PlaybackState::Running {
            return false;
        }
        let Some(pending) = self.pending else {
            return false;
        };
        if self.clock.now() < pending.due {
            return false;
        }
        self.pending = None;
        debug!(generation = pending.generation, "timer fired");

        if !self.perform_step() {
            self.arm_timer();
        }
        self.republish();
        true
    }

    // ========== Internals ==========

    fn ensure_remaining(&self) -> Result<(), ControlError> {
        if self.cursor >= self.len() {
            return Err(ControlError::Exhausted {
                cursor: self.cursor,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// One atomic transition at the cursor. Returns true once the sequence is done.
    fn perform_step(&mut self) -> bool {
        let index = self.cursor;
        let ctx = StepContext {
            pace: self.pace,
            elapsed: self.clock.now().saturating_duration_since(self.epoch),
        };
        let transition = self.policy.transition(index, &self.current.state, &ctx);
        debug!(
            index,
            delay_ms = transition.delay.as_millis() as u64,
            "step performed"
        );

        self.cursor = index + 1;
        let done = self.cursor >= self.len();
        if done {
            self.cancel_timer();
            self.playback = PlaybackState::Completed;
            info!(steps = self.cursor, "playback completed");
        }
        self.stage(Some(transition.payload), transition.state);
        done
    }

    fn arm_timer(&mut self) {
        self.cancel_timer();
        let delay = self.policy.delay(self.cursor, &self.pace);
        self.generation += 1;
        self.pending = Some(PendingStep {
            due: self.clock.now() + delay,
            generation: self.generation,
        });
        debug!(
            generation = self.generation,
            delay_ms = delay.as_millis() as u64,
            "timer armed"
        );
    }

    fn cancel_timer(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(generation = pending.generation, "timer cancelled");
        }
    }

    /// Replace the current snapshot without notifying observers
    fn stage(&mut self, payload: Option<P::Payload>, state: P::State) {
        self.current = Arc::new(Snapshot {
            revision: self.revision,
            cursor: self.cursor,
            len: self.policy.len(),
            playback: self.playback,
            payload,
            state,
            speed_ms: self.pace.speed_ms,
            playback_rate: self.pace.playback_rate,
        });
    }

    fn publish(&mut self, payload: Option<P::Payload>, state: P::State) {
        self.stage(payload, state);
        self.republish();
    }

    /// Publish the current payload and state with updated transport fields
    fn republish(&mut self) {
        self.revision += 1;
        let snapshot = Arc::make_mut(&mut self.current);
        snapshot.revision = self.revision;
        snapshot.cursor = self.cursor;
        snapshot.len = self.policy.len();
        snapshot.playback = self.playback;
        snapshot.speed_ms = self.pace.speed_ms;
        snapshot.playback_rate = self.pace.playback_rate;
        self.hub.publish(&self.current);
    }
}

impl<C: Clock> Scheduler<TimelinePolicy, C> {
    /// Show record `index` directly and stop there.
    ///
    /// Out-of-range indices are clamped to the last record. The cursor moves
    /// to `index + 1`, so the next step shows the record after it. Landing on
    /// the last record completes playback; anywhere else pauses.
    pub fn jump_to(&mut self, index: usize) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let index = index.min(len - 1);
        self.cancel_timer();

        let ctx = StepContext {
            pace: self.pace,
            elapsed: self.clock.now().saturating_duration_since(self.epoch),
        };
        let transition = self.policy.transition(index, &(), &ctx);
        self.cursor = index + 1;
        self.playback = if self.cursor >= len {
            PlaybackState::Completed
        } else {
            PlaybackState::Paused
        };
        debug!(index, "jumped");
        self.publish(Some(transition.payload), ());
    }

    /// Show the record before the current one
    pub fn step_back(&mut self) -> Result<(), ControlError> {
        match self.cursor.checked_sub(2) {
            Some(previous) => {
                self.jump_to(previous);
                Ok(())
            }
            None => Err(ControlError::AtStart),
        }
    }

    /// Show the last record
    pub fn jump_to_end(&mut self) {
        self.jump_to(usize::MAX);
    }

    /// Index of the record currently shown
    pub fn current_index(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::ManualClock;
    use crate::model::TimelineStep;

    fn timeline(durations: &[u64]) -> TimelinePolicy {
        TimelinePolicy::new(
            durations
                .iter()
                .enumerate()
                .map(|(i, d)| TimelineStep {
                    id: format!("s{}", i),
                    name: format!("step {}", i),
                    description: String::new(),
                    frames: Vec::new(),
                    duration: *d,
                })
                .collect(),
        )
    }

    fn scheduler(durations: &[u64]) -> (Scheduler<TimelinePolicy, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (Scheduler::with_clock(timeline(durations), clock.clone()), clock)
    }

    #[test]
    fn test_play_arms_single_timer() {
        let (mut s, _clock) = scheduler(&[100, 100]);
        s.play().unwrap();
        let first = s.next_deadline();
        assert!(first.is_some());
        s.play().unwrap();
        assert_eq!(s.next_deadline(), first);
        assert_eq!(s.state(), PlaybackState::Running);
    }

    #[test]
    fn test_tick_before_due_does_nothing() {
        let (mut s, clock) = scheduler(&[100, 100]);
        s.play().unwrap();
        clock.advance_ms(99);
        assert!(!s.tick());
        assert_eq!(s.cursor(), 0);
        clock.advance_ms(1);
        assert!(s.tick());
        assert_eq!(s.cursor(), 1);
    }

    #[test]
    fn test_pause_cancels_timer() {
        let (mut s, clock) = scheduler(&[100, 100]);
        s.play().unwrap();
        s.pause();
        assert!(s.next_deadline().is_none());
        clock.advance_ms(1000);
        assert!(!s.tick());
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_pause_when_idle_is_noop() {
        let (mut s, _clock) = scheduler(&[100]);
        let before = s.snapshot();
        s.pause();
        assert_eq!(s.state(), PlaybackState::Idle);
        assert_eq!(s.snapshot().revision, before.revision);
    }

    #[test]
    fn test_play_on_empty_sequence_is_rejected() {
        let (mut s, _clock) = scheduler(&[]);
        assert_eq!(
            s.play(),
            Err(ControlError::Exhausted { cursor: 0, len: 0 })
        );
        assert_eq!(s.state(), PlaybackState::Idle);
        assert!(s.next_deadline().is_none());
    }

    #[test]
    fn test_set_speed_does_not_reschedule() {
        let (mut s, _clock) = scheduler(&[100, 100]);
        s.play().unwrap();
        let due = s.next_deadline();
        s.set_playback_rate(4.0).unwrap();
        assert_eq!(s.next_deadline(), due);
    }

    #[test]
    fn test_invalid_speed_and_rate_rejected() {
        let (mut s, _clock) = scheduler(&[100]);
        assert_eq!(s.set_speed(0), Err(ControlError::InvalidSpeed(0)));
        assert!(matches!(
            s.set_playback_rate(-1.0),
            Err(ControlError::InvalidRate(_))
        ));
        assert!(s.set_playback_rate(f64::NAN).is_err());
        assert_eq!(s.pace(), Pace::default());
    }

    #[test]
    fn test_jump_to_clamps_and_stops() {
        let (mut s, _clock) = scheduler(&[100, 100, 100]);
        s.play().unwrap();
        s.jump_to(1);
        assert_eq!(s.state(), PlaybackState::Paused);
        assert!(s.next_deadline().is_none());
        s.play().unwrap();
        s.jump_to(99);
        assert_eq!(s.state(), PlaybackState::Completed);
        assert!(s.next_deadline().is_none());
        assert_eq!(s.current_index(), Some(2));
        assert_eq!(
            s.snapshot().payload.as_ref().map(|p| p.id.as_str()),
            Some("s2")
        );
    }

    #[test]
    fn test_step_back() {
        let (mut s, _clock) = scheduler(&[100, 100, 100]);
        assert_eq!(s.step_back(), Err(ControlError::AtStart));
        s.step_n(3).unwrap();
        assert_eq!(s.state(), PlaybackState::Completed);
        s.step_back().unwrap();
        assert_eq!(s.current_index(), Some(1));
        assert_eq!(s.state(), PlaybackState::Paused);
        s.step().unwrap();
        assert_eq!(s.current_index(), Some(2));
        assert_eq!(s.state(), PlaybackState::Completed);
    }

    #[test]
    fn test_with_pace_keeps_defaults_for_rejected_values() {
        let s = Scheduler::with_clock(TimelinePolicy::new(Vec::new()), ManualClock::new())
            .with_pace(Pace {
                speed_ms: 0,
                playback_rate: 2.0,
            });
        assert_eq!(s.pace().speed_ms, Pace::default().speed_ms);
        assert_eq!(s.pace().playback_rate, 2.0);
    }

    #[test]
    fn test_revision_increases_per_publish() {
        let (mut s, _clock) = scheduler(&[100, 100]);
        let r0 = s.snapshot().revision;
        s.step().unwrap();
        let r1 = s.snapshot().revision;
        s.reset();
        let r2 = s.snapshot().revision;
        assert!(r0 < r1 && r1 < r2);
    }
}
