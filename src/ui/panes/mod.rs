//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`timeline`]: step list and the current record's stack frames
//! - [`diagram`]: control-flow blocks, simulated call stack, execution path
//! - [`status`]: status bar with keybindings and transport state
//! - `utils`: shared border and scrolling helpers
//!
//! Each pane exports a stateless `render_*` function taking a `Frame`, an
//! area, its data, its focus flag, and (when scrollable) its scroll offset.

mod utils;

pub mod diagram;
pub mod status;
pub mod timeline;

pub use diagram::{render_blocks_pane, render_call_stack_pane, render_path_pane, BlocksRenderData};
pub use status::{render_status_bar, StatusRenderData};
pub use timeline::{render_frames_pane, render_steps_pane, StepsRenderData};
