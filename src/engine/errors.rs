//! Control errors for the playback scheduler
//!
//! This module defines [`ControlError`], returned when a transport control is
//! rejected. Every rejection leaves the scheduler exactly as it was; none of
//! them is fatal.

use thiserror::Error;

/// Reasons a transport control was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    /// A manual step was requested while the timer owns stepping
    #[error("cannot step while playing; pause first")]
    Busy,

    /// Every step of the sequence has already been taken
    #[error("sequence exhausted at step {cursor} of {len}")]
    Exhausted { cursor: usize, len: usize },

    /// Nothing earlier to navigate back to
    #[error("already at the first step")]
    AtStart,

    /// Per-step delay must be at least one millisecond
    #[error("invalid speed: {0} ms (must be positive)")]
    InvalidSpeed(u64),

    /// Playback rate must be a finite positive multiplier
    #[error("invalid playback rate: {0} (must be a positive number)")]
    InvalidRate(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ControlError::Exhausted { cursor: 4, len: 4 }.to_string(),
            "sequence exhausted at step 4 of 4"
        );
        assert_eq!(
            ControlError::InvalidSpeed(0).to_string(),
            "invalid speed: 0 ms (must be positive)"
        );
    }
}
