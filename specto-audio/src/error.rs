//! Capture-side error types

use thiserror::Error;

/// Errors that can occur while opening or running audio capture
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("device index {index} out of range ({available} input devices)")]
    DeviceIndexOutOfRange { index: usize, available: usize },
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to enumerate devices: {0}")]
    Devices(#[from] cpal::DevicesError),
    #[error("failed to query device config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to query supported configs: {0}")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),
    #[error("failed to build input stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("failed to start input stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}
