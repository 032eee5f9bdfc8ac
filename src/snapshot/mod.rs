// Published engine state for presentation

use crate::engine::scheduler::PlaybackState;
use std::sync::Arc;

/// Immutable view of the scheduler after a publish
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<P, S> {
    /// Bumped on every publish
    pub revision: u64,
    /// Steps taken since the last reset (index of the next step)
    pub cursor: usize,
    pub len: usize,
    pub playback: PlaybackState,
    /// What the most recent step yielded, if any step was taken
    pub payload: Option<P>,
    /// Accumulated bookkeeping (unit for the timeline variant)
    pub state: S,
    pub speed_ms: u64,
    pub playback_rate: f64,
}

impl<P, S> Snapshot<P, S> {
    pub fn is_running(&self) -> bool {
        self.playback == PlaybackState::Running
    }

    pub fn is_complete(&self) -> bool {
        self.playback == PlaybackState::Completed
    }

    /// Index of the record currently shown
    pub fn current_index(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    /// Fraction of the sequence consumed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.len == 0 {
            1.0
        } else {
            self.cursor as f64 / self.len as f64
        }
    }
}

/// Handle returned by [`SnapshotHub::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<T> = Box<dyn FnMut(&Arc<T>)>;

/// Fan-out of published snapshots to observers, in registration order
pub struct SnapshotHub<T> {
    observers: Vec<(SubscriptionId, Observer<T>)>,
    next_id: u64,
}

impl<T> SnapshotHub<T> {
    pub fn new() -> Self {
        SnapshotHub {
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Arc<T>) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn publish(&mut self, snapshot: &Arc<T>) {
        for (_, observer) in self.observers.iter_mut() {
            observer(snapshot);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<T> Default for SnapshotHub<T> {
    fn default() -> Self {
        Self::new()
    }
}
