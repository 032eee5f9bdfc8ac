//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, and the
//!   wake-up loop that lets the scheduler fire its step timer
//! - **[`panes`]**: stateless render functions for each visible pane (timeline,
//!   frames, control-flow blocks, call stack, execution path, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a [`Session`] and
//! call [`App::run`] to start the event loop. The UI only reads published
//! snapshots and issues transport controls; it never touches replayed state.
//!
//! [`Session`]: crate::session::Session
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
