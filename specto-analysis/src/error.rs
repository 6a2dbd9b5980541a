//! Error types for the spectral pipeline

use thiserror::Error;

/// Errors raised by the FFT engine, ingest and post-processing stages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpectrumError {
    /// FFT input length is zero or not a power of two
    #[error("invalid window length {0}: must be a non-zero power of two")]
    InvalidLength(usize),
    /// A buffer does not match the configured window length
    #[error("length mismatch: expected {expected} samples, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
