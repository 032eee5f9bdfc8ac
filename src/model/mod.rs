//! Data model consumed by the replay engine
//!
//! This module provides the records the engine replays or simulates over:
//! - [`value`]: displayed values, their type tags, and [`Variable`]
//! - [`frame`]: [`StackFrame`] and [`TimelineStep`] for the timeline variant
//! - [`diagram`]: [`DiagramBlock`] and [`FunctionDefinition`] for the CFG variant
//!
//! All types here are plain data. They are authored outside the engine
//! (usually loaded from a scenario document) and never mutated by it.

pub mod diagram;
pub mod frame;
pub mod value;

pub use diagram::{BlockType, DiagramBlock, FunctionDefinition, RecursionInfo};
pub use frame::{StackFrame, TimelineStep};
pub use value::{Value, VarType, Variable};
