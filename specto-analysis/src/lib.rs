//! Spectral pipeline for Specto
//!
//! Turns fixed-size windows of captured audio into display-ready spectra:
//! in-place FFT, magnitude scaling, logarithmic frequency remap, and a
//! lock-light hand-off between the audio producer and the render consumer.

mod config;
mod error;
pub mod fft;
mod handoff;
mod ingest;
pub mod post;
mod pipeline;
mod spectrum;

pub use config::{PipelineConfig, DEFAULT_SAMPLE_RATE, DEFAULT_SCALE_FACTOR, DEFAULT_WINDOW_SIZE};
pub use error::SpectrumError;
pub use handoff::{BusyGuard, Handoff, SpectrumReader};
pub use ingest::ingest;
pub use pipeline::Pipeline;
pub use post::{scale_magnitudes, transform_index, LogRemap, PostProcessor};
pub use spectrum::{Sample, Spectrum, SILENCE};
