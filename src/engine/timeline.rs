//! Timeline replay
//!
//! Step `i` yields `steps[i]` verbatim. There is no accumulated state, so any
//! record can be shown directly without replaying the ones before it.

use super::policy::{Pace, StepContext, Transition, TransitionPolicy};
use crate::model::TimelineStep;
use std::time::Duration;

/// Stateless lookup over a fixed sequence of records
#[derive(Debug, Clone)]
pub struct TimelinePolicy {
    steps: Vec<TimelineStep>,
}

impl TimelinePolicy {
    pub fn new(steps: Vec<TimelineStep>) -> Self {
        TimelinePolicy { steps }
    }

    pub fn steps(&self) -> &[TimelineStep] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&TimelineStep> {
        self.steps.get(index)
    }

    /// Sum of all effective delays under `pace`
    pub fn total_duration(&self, pace: &Pace) -> Duration {
        (0..self.steps.len()).map(|i| self.delay(i, pace)).sum()
    }
}

impl TransitionPolicy for TimelinePolicy {
    type State = ();
    type Payload = TimelineStep;

    fn len(&self) -> usize {
        self.steps.len()
    }

    fn delay(&self, index: usize, pace: &Pace) -> Duration {
        match self.steps.get(index) {
            Some(step) => pace.scaled(step.duration),
            None => pace.speed(),
        }
    }

    fn transition(
        &mut self,
        index: usize,
        _prior: &(),
        ctx: &StepContext,
    ) -> Transition<(), TimelineStep> {
        Transition {
            state: (),
            payload: self.steps[index].clone(),
            delay: self.delay(index, &ctx.pace),
        }
    }
}
