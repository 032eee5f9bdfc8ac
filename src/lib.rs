//! # Introduction
//!
//! flowtty animates program execution for teaching. It steps through a
//! sequence of execution states, either precomputed call-stack snapshots or
//! a simulated walk over control-flow blocks, and exposes transport controls
//! (play, pause, step, reset, speed) so a viewer can watch execution unfold
//! at their own pace in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Scenario (JSON) → Loader → Session → Scheduler ⇄ Policy → Snapshots → TUI
//! ```
//!
//! 1. [`loader`]: reads a [`loader::Scenario`] document.
//! 2. [`model`]: plain data for timeline records and diagram blocks.
//! 3. [`engine`]: the [`engine::Scheduler`] transport state machine and the
//!    two transition policies, [`engine::TimelinePolicy`] and
//!    [`engine::CfgSimulationPolicy`].
//! 4. [`snapshot`]: immutable published state and subscription fan-out.
//! 5. [`session`]: one scheduler for whichever scenario kind was loaded.
//! 6. [`ui`] / [`headless`]: front ends; not part of the stable library API.
//! 7. [`config`]: runtime settings and their validation.
//!
//! ## What the engine does not do
//!
//! It does not interpret any language. It advances a cursor and annotates
//! state. Condition outcomes come from a pluggable decision oracle that is
//! random unless seeded.

pub mod config;
pub mod engine;
pub mod headless;
pub mod loader;
pub mod model;
pub mod session;
pub mod snapshot;
pub mod ui;
