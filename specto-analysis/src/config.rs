//! Validated pipeline settings

use crate::error::SpectrumError;
use crate::fft;

/// Default analysis window length (samples)
pub const DEFAULT_WINDOW_SIZE: usize = 512;
/// Default capture sample rate (Hz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
/// Default magnitude scale factor
pub const DEFAULT_SCALE_FACTOR: f64 = 100.0;

/// Settings fixed for the lifetime of a [`Pipeline`](crate::Pipeline)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    window_size: usize,
    sample_rate: u32,
    scale_factor: f64,
}

impl PipelineConfig {
    /// Build a config, rejecting non-power-of-two windows, a zero sample
    /// rate, and non-finite or non-positive scale factors.
    pub fn new(window_size: usize, sample_rate: u32, scale_factor: f64) -> Result<Self, SpectrumError> {
        fft::validate_length(window_size)?;
        if window_size < 2 {
            return Err(SpectrumError::InvalidConfig(format!(
                "window size {window_size} leaves no display bins"
            )));
        }
        if sample_rate == 0 {
            return Err(SpectrumError::InvalidConfig("sample rate must be > 0".into()));
        }
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(SpectrumError::InvalidConfig(format!(
                "scale factor must be positive, got {scale_factor}"
            )));
        }

        Ok(Self {
            window_size,
            sample_rate,
            scale_factor,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Number of display bins after the log remap
    pub fn display_bins(&self) -> usize {
        self.window_size / 2
    }

    /// Time covered by one window, i.e. the producer's activation period
    pub fn window_duration_secs(&self) -> f64 {
        self.window_size as f64 / self.sample_rate as f64
    }

    /// Width of one linear FFT bin in Hz
    pub fn bin_width_hz(&self) -> f64 {
        self.sample_rate as f64 / self.window_size as f64
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            sample_rate: DEFAULT_SAMPLE_RATE,
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }
}
