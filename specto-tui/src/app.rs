//! Application state management (Elm architecture)

use crate::theme::Theme;
use specto_analysis::Spectrum;
use specto_audio::CaptureEvent;
use specto_input::Mode;

/// Multiplier applied to the display ceiling per zoom step
pub const ZOOM_STEP: f64 = 1.25;
/// Lowest ceiling reachable by zooming in
pub const MIN_CEILING: f64 = 1.0;
/// Highest ceiling reachable by zooming out
pub const MAX_CEILING: f64 = 1.0e7;

/// Peak hold for the spectrum bins (classic analyzer behavior)
#[derive(Debug, Clone, Default)]
pub struct PeakHold {
    peaks: Vec<f64>,
    hold_frames: Vec<u16>,
}

impl PeakHold {
    /// Frames a new peak stays put before decaying (~667ms at 30fps)
    pub const HOLD_FRAMES: u16 = 20;
    pub const DECAY_RATE: f64 = 0.92;

    /// Update peak hold state each frame (call from main loop)
    pub fn update(&mut self, levels: &[f64]) {
        if self.peaks.len() != levels.len() {
            self.peaks = vec![0.0; levels.len()];
            self.hold_frames = vec![0; levels.len()];
        }

        for ((peak, hold), &level) in self
            .peaks
            .iter_mut()
            .zip(self.hold_frames.iter_mut())
            .zip(levels)
        {
            if level > *peak {
                *peak = level;
                *hold = Self::HOLD_FRAMES;
            } else if *hold > 0 {
                *hold -= 1;
            } else {
                *peak *= Self::DECAY_RATE;
                if *peak < 0.001 {
                    *peak = 0.0;
                }
            }
        }
    }

    pub fn peaks(&self) -> &[f64] {
        &self.peaks
    }

    pub fn clear(&mut self) {
        self.peaks.iter_mut().for_each(|p| *p = 0.0);
        self.hold_frames.iter_mut().for_each(|h| *h = 0);
    }
}

/// Message type for status bar coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Capture side as last reported by the audio thread
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeviceStatus {
    #[default]
    Connecting,
    Running {
        name: String,
        sample_rate: u32,
        channels: u16,
    },
    Failed,
    Stopped,
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: Mode,
    pub command_buffer: String,
    pub message: Option<String>,
    pub message_type: MessageType,
    pub show_help: bool,
    pub theme: Theme,

    /// Ignore new frames and keep the last one on screen
    pub frozen: bool,
    pub show_peaks: bool,
    /// Magnitude that fills the spectrum panel height
    pub ceiling: f64,
    pub default_ceiling: f64,

    pub device: DeviceStatus,
    pub window_size: usize,
    pub scale_factor: f64,

    /// Display ticks since start
    pub frame_count: u64,
    /// Ticks that picked up a newly published frame
    pub fresh_frames: u64,
    /// Ticks that kept showing the previous frame
    pub reused_frames: u64,
    /// Generation of the frame on screen; 0 before the first one
    pub generation: u64,

    /// Display magnitudes of the frame on screen
    pub spectrum: Vec<f64>,
    pub peak_hold: PeakHold,
}

impl AppState {
    pub fn new(window_size: usize, scale_factor: f64, ceiling: f64, theme: Theme) -> Self {
        Self {
            mode: Mode::Normal,
            command_buffer: String::new(),
            message: None,
            message_type: MessageType::Info,
            show_help: false,
            theme,
            frozen: false,
            show_peaks: true,
            ceiling,
            default_ceiling: ceiling,
            device: DeviceStatus::Connecting,
            window_size,
            scale_factor,
            frame_count: 0,
            fresh_frames: 0,
            reused_frames: 0,
            generation: 0,
            spectrum: vec![0.0; window_size / 2],
            peak_hold: PeakHold::default(),
        }
    }

    /// Take the frame offered this tick; `None` means the producer was busy
    /// and the previous frame stays on screen.
    pub fn update_spectrum(&mut self, frame: Option<&Spectrum>) {
        self.frame_count += 1;

        if self.frozen {
            self.reused_frames += 1;
            return;
        }

        match frame {
            Some(frame) if frame.generation() != self.generation => {
                self.spectrum.clear();
                self.spectrum.extend(frame.magnitudes());
                self.generation = frame.generation();
                self.fresh_frames += 1;
            }
            _ => self.reused_frames += 1,
        }

        self.peak_hold.update(&self.spectrum);
    }

    /// Peaks to draw, if enabled
    pub fn peaks(&self) -> Option<&[f64]> {
        self.show_peaks.then(|| self.peak_hold.peaks())
    }

    pub fn zoom_in(&mut self) {
        self.ceiling = (self.ceiling / ZOOM_STEP).clamp(MIN_CEILING, MAX_CEILING);
        self.set_message(format!("Ceiling: {:.0}", self.ceiling));
    }

    pub fn zoom_out(&mut self) {
        self.ceiling = (self.ceiling * ZOOM_STEP).clamp(MIN_CEILING, MAX_CEILING);
        self.set_message(format!("Ceiling: {:.0}", self.ceiling));
    }

    pub fn reset_zoom(&mut self) {
        self.ceiling = self.default_ceiling;
        self.set_message(format!("Ceiling reset to {:.0}", self.ceiling));
    }

    pub fn set_ceiling(&mut self, ceiling: f64) {
        self.ceiling = ceiling.clamp(MIN_CEILING, MAX_CEILING);
        self.set_success(format!("Ceiling set to {:.0}", self.ceiling));
    }

    pub fn toggle_freeze(&mut self) {
        self.frozen = !self.frozen;
        self.set_message(if self.frozen { "Frozen" } else { "Live" });
    }

    pub fn toggle_peaks(&mut self) {
        self.show_peaks = !self.show_peaks;
        if !self.show_peaks {
            self.peak_hold.clear();
        }
        self.set_message(if self.show_peaks { "Peak hold on" } else { "Peak hold off" });
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        self.mode = if self.show_help { Mode::Help } else { Mode::Normal };
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.set_message(format!("Theme: {}", self.theme.name));
    }

    /// Set theme by name
    pub fn set_theme(&mut self, name: &str) {
        match Theme::by_name(name) {
            Some(theme) => {
                self.theme = theme;
                self.set_success(format!("Theme set to: {}", self.theme.name));
            }
            None => self.set_error(format!(
                "Unknown theme: {}. Use green/amber/cyber",
                name
            )),
        }
    }

    /// Reflect a capture thread event in the status line
    pub fn handle_capture_event(&mut self, event: CaptureEvent) {
        match event {
            CaptureEvent::Started {
                device,
                sample_rate,
                channels,
            } => {
                self.set_success(format!("Listening on {}", device));
                self.device = DeviceStatus::Running {
                    name: device,
                    sample_rate,
                    channels,
                };
            }
            CaptureEvent::StreamError(err) => self.set_warning(format!("Stream: {}", err)),
            CaptureEvent::Error(err) => {
                self.device = DeviceStatus::Failed;
                self.set_error(err.to_string());
            }
            CaptureEvent::Stopped => {
                self.device = DeviceStatus::Stopped;
                self.set_message("Capture stopped");
            }
        }
    }

    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_type = MessageType::Info;
    }

    /// Set an info message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Info;
    }

    /// Set a success message (green)
    pub fn set_success(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Success;
    }

    /// Set a warning message (yellow)
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Warning;
    }

    /// Set an error message (red)
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specto_analysis::{Pipeline, PipelineConfig};
    use specto_audio::CaptureError;

    fn state() -> AppState {
        AppState::new(8, 1.0, 100.0, Theme::default())
    }

    fn published(level: f32) -> std::sync::Arc<Spectrum> {
        let config = PipelineConfig::new(8, 44100, 1.0).unwrap();
        let mut pipeline = Pipeline::new(config);
        pipeline.on_audio_window(&[level; 8]).unwrap();
        pipeline.current_spectrum().unwrap()
    }

    #[test]
    fn test_peak_hold_then_decay() {
        let mut hold = PeakHold::default();
        hold.update(&[10.0]);
        for _ in 0..PeakHold::HOLD_FRAMES {
            hold.update(&[0.0]);
            assert_eq!(hold.peaks(), &[10.0]);
        }
        hold.update(&[0.0]);
        assert!((hold.peaks()[0] - 10.0 * PeakHold::DECAY_RATE).abs() < 1e-12);
    }

    #[test]
    fn test_fresh_and_reused_frames() {
        let mut app = state();
        let frame = published(1.0);

        app.update_spectrum(Some(frame.as_ref()));
        assert_eq!(app.fresh_frames, 1);
        assert_eq!(app.generation, frame.generation());
        // DC of eight ones lands in bin 0
        assert_eq!(app.spectrum[0], 8.0);

        // Same generation again, then a busy producer
        app.update_spectrum(Some(frame.as_ref()));
        app.update_spectrum(None);
        assert_eq!(app.fresh_frames, 1);
        assert_eq!(app.reused_frames, 2);
        assert_eq!(app.frame_count, 3);
        assert_eq!(app.spectrum[0], 8.0);
    }

    #[test]
    fn test_frozen_ignores_new_frames() {
        let mut app = state();
        app.toggle_freeze();
        let frame = published(1.0);
        app.update_spectrum(Some(frame.as_ref()));
        assert_eq!(app.generation, 0);
        assert!(app.spectrum.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_zoom_round_trip() {
        let mut app = state();
        app.zoom_in();
        assert!((app.ceiling - 80.0).abs() < 1e-9);
        app.zoom_out();
        app.zoom_out();
        assert!((app.ceiling - 125.0).abs() < 1e-9);
        app.reset_zoom();
        assert_eq!(app.ceiling, 100.0);

        app.set_ceiling(0.0);
        assert_eq!(app.ceiling, MIN_CEILING);
    }

    #[test]
    fn test_set_theme_unknown_keeps_current() {
        let mut app = state();
        app.set_theme("plaid");
        assert_eq!(app.theme.name, "phosphor-green");
        assert_eq!(app.message_type, MessageType::Error);

        app.set_theme("amber");
        assert_eq!(app.theme.name, "amber");
    }

    #[test]
    fn test_capture_events_update_device() {
        let mut app = state();
        app.handle_capture_event(CaptureEvent::Started {
            device: "Mic".into(),
            sample_rate: 48000,
            channels: 2,
        });
        assert_eq!(
            app.device,
            DeviceStatus::Running {
                name: "Mic".into(),
                sample_rate: 48000,
                channels: 2
            }
        );

        app.handle_capture_event(CaptureEvent::Error(CaptureError::DeviceUnavailable(
            "unplugged".into(),
        )));
        assert_eq!(app.device, DeviceStatus::Failed);
        assert_eq!(app.message_type, MessageType::Error);
    }

    #[test]
    fn test_help_toggles_mode() {
        let mut app = state();
        app.toggle_help();
        assert!(app.show_help);
        assert_eq!(app.mode, Mode::Help);
        app.toggle_help();
        assert_eq!(app.mode, Mode::Normal);
    }
}
