//! Audio capture for Specto - input devices and window assembly
//!
//! This crate is the producer side of the visualizer:
//! - Device: input enumeration, selection by index, config negotiation
//! - Assembler: downmix to mono and cut fixed-size analysis windows
//! - Engine: capture thread owning the cpal stream, feeding the pipeline

mod assembler;
mod device;
mod engine;
mod error;

pub use assembler::{WindowAssembler, WindowSink};
pub use device::{list_input_devices, negotiate_config, select_input_device, DeviceInfo};
pub use engine::{CaptureCommand, CaptureEngine, CaptureEvent, CaptureSettings};
pub use error::CaptureError;
