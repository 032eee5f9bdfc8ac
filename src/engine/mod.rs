//! Stepped-replay engine
//!
//! This module provides the core replay logic:
//! - [`scheduler`]: transport state machine and the single step timer
//! - [`policy`]: the [`TransitionPolicy`] seam and pacing
//! - [`timeline`]: replay of precomputed stack snapshots
//! - [`cfg`]: simulation over control-flow blocks
//! - [`clock`]: real and manual time sources
//! - [`errors`]: rejected-control errors
//!
//! # Execution Model
//!
//! Everything runs on one thread. A step is the only place replayed state
//! changes, and it runs to completion before anything can observe it.
//! Steps come either from [`Scheduler::step`] or from the timer, never both:
//! manual steps are rejected while the timer owns playback.

pub mod cfg;
pub mod clock;
pub mod errors;
pub mod policy;
pub mod scheduler;
pub mod timeline;

pub use cfg::{
    CallFrame, CfgSimulationPolicy, DecisionOracle, ExecutionState, PathEntry, RandomOracle,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::ControlError;
pub use policy::{Pace, StepContext, Transition, TransitionPolicy};
pub use scheduler::{PlaybackState, Scheduler, SnapshotOf};
pub use timeline::TimelinePolicy;
