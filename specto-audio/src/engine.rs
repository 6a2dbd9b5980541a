//! Capture engine - owns the input stream on its own thread

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{BufferSize, Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use specto_analysis::Pipeline;

use crate::assembler::WindowAssembler;
use crate::device::{negotiate_config, select_input_device};
use crate::error::CaptureError;

/// Scratch capacity for sample format conversion in the callback
const CONVERT_CAPACITY: usize = 16384;

/// What to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureSettings {
    /// Index into the input device list; `None` for the host default
    pub device_index: Option<usize>,
    /// Requested sample rate in Hz
    pub sample_rate: u32,
}

/// Commands sent to the capture thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureCommand {
    Shutdown,
}

/// Events sent from the capture thread
#[derive(Debug)]
pub enum CaptureEvent {
    /// Stream is running
    Started {
        device: String,
        sample_rate: u32,
        channels: u16,
    },
    /// Non-fatal error reported by the backend
    StreamError(String),
    /// Capture could not start or the device went away
    Error(CaptureError),
    /// Stream closed
    Stopped,
}

/// Handle to the capture thread
pub struct CaptureEngine {
    command_tx: Sender<CaptureCommand>,
    event_rx: Receiver<CaptureEvent>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CaptureEngine {
    /// Create channels for engine communication
    pub fn create_channels() -> (
        Sender<CaptureCommand>,
        Receiver<CaptureCommand>,
        Sender<CaptureEvent>,
        Receiver<CaptureEvent>,
    ) {
        let (cmd_tx, cmd_rx) = bounded(16);
        let (evt_tx, evt_rx) = bounded(256);
        (cmd_tx, cmd_rx, evt_tx, evt_rx)
    }

    /// Open the device described by `settings` on a new thread and feed
    /// every captured window into `pipeline`.
    ///
    /// Failures arrive as [`CaptureEvent::Error`]; the pipeline's readers
    /// simply stop seeing new frames.
    pub fn spawn(settings: CaptureSettings, pipeline: Pipeline) -> Self {
        let (command_tx, command_rx, event_tx, event_rx) = Self::create_channels();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_capture = shutdown.clone();

        let handle = thread::Builder::new()
            .name("specto-capture".into())
            .spawn(move || run_capture_thread(settings, pipeline, command_rx, event_tx, shutdown_capture));

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::error!(%err, "failed to spawn capture thread");
                None
            }
        };

        Self {
            command_tx,
            event_rx,
            shutdown,
            handle,
        }
    }

    /// Next pending event, if any
    pub fn try_event(&self) -> Option<CaptureEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Stop the stream and wait for the capture thread
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let _ = self.command_tx.try_send(CaptureCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CaptureEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_capture_thread(
    settings: CaptureSettings,
    pipeline: Pipeline,
    command_rx: Receiver<CaptureCommand>,
    event_tx: Sender<CaptureEvent>,
    shutdown: Arc<AtomicBool>,
) {
    let stream = match open_stream(settings, pipeline, &event_tx) {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!(%err, "failed to open audio input");
            let _ = event_tx.send(CaptureEvent::Error(err));
            return;
        }
    };

    if let Err(err) = stream.play() {
        tracing::error!(%err, "failed to start audio input");
        let _ = event_tx.send(CaptureEvent::Error(err.into()));
        return;
    }

    while !shutdown.load(Ordering::Relaxed) {
        match command_rx.recv_timeout(Duration::from_millis(10)) {
            Ok(CaptureCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    drop(stream);
    tracing::info!("audio input stopped");
    let _ = event_tx.try_send(CaptureEvent::Stopped);
}

fn open_stream(
    settings: CaptureSettings,
    pipeline: Pipeline,
    event_tx: &Sender<CaptureEvent>,
) -> Result<Stream, CaptureError> {
    let host = cpal::default_host();
    let device = select_input_device(&host, settings.device_index)?;
    let device_name = device.name().unwrap_or_else(|_| "<unnamed>".to_string());

    let supported = negotiate_config(&device, settings.sample_rate)?;
    let sample_format = supported.sample_format();
    let config: StreamConfig = supported.config();

    tracing::info!(
        device = %device_name,
        sample_rate = config.sample_rate.0,
        channels = config.channels,
        format = ?sample_format,
        window = pipeline.config().window_size(),
        "opening audio input"
    );

    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, pipeline, event_tx.clone())?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, pipeline, event_tx.clone())?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, pipeline, event_tx.clone())?,
        other => return Err(CaptureError::UnsupportedFormat(format!("{other:?}"))),
    };

    let _ = event_tx.try_send(CaptureEvent::Started {
        device: device_name,
        sample_rate: config.sample_rate.0,
        channels: config.channels,
    });
    Ok(stream)
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    mut pipeline: Pipeline,
    event_tx: Sender<CaptureEvent>,
) -> Result<Stream, CaptureError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let mut assembler = WindowAssembler::new(pipeline.config().window_size(), config.channels as usize);
    // A device buffer beyond this capacity grows it once inside the
    // callback; it keeps the larger capacity from then on.
    let mut converted: Vec<f32> = Vec::with_capacity(convert_capacity(config));

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            converted.clear();
            converted.extend(data.iter().map(|&sample| f32::from_sample(sample)));
            assembler.push_interleaved(&converted, &mut pipeline);
        },
        move |err| {
            tracing::warn!(%err, "audio input stream error");
            let event = match err {
                cpal::StreamError::DeviceNotAvailable => {
                    CaptureEvent::Error(CaptureError::DeviceUnavailable("device disconnected".into()))
                }
                other => CaptureEvent::StreamError(other.to_string()),
            };
            let _ = event_tx.try_send(event);
        },
        None,
    )?;

    Ok(stream)
}

/// Conversion scratch size: the fixed device buffer when one was negotiated
fn convert_capacity(config: &StreamConfig) -> usize {
    match config.buffer_size {
        BufferSize::Fixed(frames) => (frames as usize * config.channels as usize).max(CONVERT_CAPACITY),
        BufferSize::Default => CONVERT_CAPACITY,
    }
}
