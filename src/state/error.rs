use thiserror::Error;

use crate::state::catalog::Side;

/// Validation failures raised by timer commands. A failed command leaves the
/// session exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// Requested step index is outside the active format.
    #[error("step {index} is out of range (format has {len} steps)")]
    InvalidStep {
        /// Index the caller asked for.
        index: usize,
        /// Number of steps in the active format.
        len: usize,
    },
    /// Side does not have enough deliberation time left.
    #[error("{} has {available}s of deliberation time left, {requested}s requested", .side.as_str())]
    InsufficientBudget {
        /// Side that tried to spend.
        side: Side,
        /// Seconds requested.
        requested: u32,
        /// Seconds left in that side's pool.
        available: u32,
    },
    /// Deliberation can only be spent in fixed increments.
    #[error("deliberation time must be spent in 60s or 120s increments (got {requested}s)")]
    InvalidDeliberationAmount {
        /// Seconds requested.
        requested: u32,
    },
    /// Command does not apply to the currently selected step or format.
    #[error("wrong mode: {0}")]
    WrongMode(&'static str),
}
