//! Error types for the wave field simulator.

use thiserror::Error;

/// Result type for wave field operations.
pub type Result<T> = std::result::Result<T, WaveFieldError>;

/// Precondition violations surfaced by [`WaveSimulator`](super::WaveSimulator).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveFieldError {
    /// Width or height was zero.
    #[error("invalid field dimensions {width}x{height}: both must be positive")]
    InvalidDimension { width: u32, height: u32 },

    /// An operation was called before `initialize`.
    #[error("wave simulator used before initialize")]
    NotInitialized,
}
