//! Interleaved device buffers → fixed-size mono analysis windows

use specto_analysis::Pipeline;

/// Receives one complete mono window per call
pub trait WindowSink {
    fn push_window(&mut self, raw: &[f32]);
}

impl WindowSink for Pipeline {
    /// Runs the activation; a failure only drops this window.
    fn push_window(&mut self, raw: &[f32]) {
        if let Err(err) = self.on_audio_window(raw) {
            tracing::warn!(%err, failures = self.failures(), "spectrum activation failed");
        }
    }
}

/// Collects device callbacks of arbitrary size into back-to-back windows.
///
/// Each interleaved frame is averaged down to one mono sample. Windows do
/// not overlap. Storage is allocated once up front.
pub struct WindowAssembler {
    channels: usize,
    window: Vec<f32>,
    filled: usize,
}

impl WindowAssembler {
    pub fn new(window_size: usize, channels: usize) -> Self {
        Self {
            channels: channels.max(1),
            window: vec![0.0; window_size],
            filled: 0,
        }
    }

    pub fn window_size(&self) -> usize {
        self.window.len()
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Samples collected towards the next window
    pub fn pending(&self) -> usize {
        self.filled
    }

    /// Drop any partially collected window
    pub fn reset(&mut self) {
        self.filled = 0;
    }

    /// Append interleaved `data`, handing every completed window to `sink`.
    /// Returns the number of windows emitted.
    pub fn push_interleaved<S: WindowSink + ?Sized>(&mut self, data: &[f32], sink: &mut S) -> usize {
        if self.window.is_empty() {
            return 0;
        }

        let mut emitted = 0;
        for frame in data.chunks(self.channels) {
            let mono = frame.iter().sum::<f32>() / frame.len() as f32;
            self.window[self.filled] = mono;
            self.filled += 1;

            if self.filled == self.window.len() {
                sink.push_window(&self.window);
                self.filled = 0;
                emitted += 1;
            }
        }
        emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specto_analysis::PipelineConfig;

    #[derive(Default)]
    struct Collector {
        windows: Vec<Vec<f32>>,
    }

    impl WindowSink for Collector {
        fn push_window(&mut self, raw: &[f32]) {
            self.windows.push(raw.to_vec());
        }
    }

    #[test]
    fn test_mono_passthrough() {
        let mut assembler = WindowAssembler::new(4, 1);
        let mut sink = Collector::default();

        let emitted = assembler.push_interleaved(&[1.0, 2.0, 3.0, 4.0, 5.0], &mut sink);

        assert_eq!(emitted, 1);
        assert_eq!(sink.windows, vec![vec![1.0, 2.0, 3.0, 4.0]]);
        assert_eq!(assembler.pending(), 1);
    }

    #[test]
    fn test_stereo_downmix() {
        let mut assembler = WindowAssembler::new(2, 2);
        let mut sink = Collector::default();

        assembler.push_interleaved(&[1.0, 0.0, -0.5, -0.5], &mut sink);

        assert_eq!(sink.windows, vec![vec![0.5, -0.5]]);
    }

    #[test]
    fn test_windows_span_callbacks() {
        let mut assembler = WindowAssembler::new(4, 1);
        let mut sink = Collector::default();

        assert_eq!(assembler.push_interleaved(&[1.0, 2.0, 3.0], &mut sink), 0);
        assert_eq!(assembler.push_interleaved(&[4.0, 5.0, 6.0, 7.0, 8.0, 9.0], &mut sink), 2);

        assert_eq!(
            sink.windows,
            vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]]
        );
        assert_eq!(assembler.pending(), 1);

        assembler.reset();
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn test_zero_channels_treated_as_mono() {
        let assembler = WindowAssembler::new(8, 0);
        assert_eq!(assembler.channels(), 1);
    }

    #[test]
    fn test_feeds_pipeline() {
        let config = PipelineConfig::new(8, 44100, 1.0).unwrap();
        let mut pipeline = Pipeline::new(config);
        let reader = pipeline.reader();
        let mut assembler = WindowAssembler::new(8, 2);

        // 12 stereo frames → one full window and 4 pending
        let data = vec![0.25f32; 24];
        assert_eq!(assembler.push_interleaved(&data, &mut pipeline), 1);

        let frame = reader.current_spectrum().unwrap();
        assert_eq!(frame.generation(), 1);
        assert!((frame.bins()[0].re - 2.0).abs() < 1e-9);
        assert_eq!(assembler.pending(), 4);
    }
}
