//! Pipeline orchestrator - ingest → FFT → scale → remap → publish

use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::error::SpectrumError;
use crate::fft;
use crate::handoff::{Handoff, SpectrumReader};
use crate::ingest::ingest;
use crate::post::PostProcessor;
use crate::spectrum::{Sample, Spectrum, SILENCE};

/// Recycled frames kept besides the published one. A reader holding one
/// frame across several activations still leaves a free spare.
const SPARE_FRAMES: usize = 3;

/// Producer side of the spectral pipeline.
///
/// Owns the working buffer. Call [`Pipeline::on_audio_window`] once per
/// captured window; hand [`Pipeline::reader`] to the renderer.
pub struct Pipeline {
    config: PipelineConfig,
    /// Ingest target and FFT/post-processing scratch
    work: Vec<Sample>,
    post: PostProcessor,
    handoff: Arc<Handoff>,
    /// Unpublished frames, reused once no reader holds them
    spares: Vec<Arc<Spectrum>>,
    activations: u64,
    failures: u64,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let len = config.window_size();
        tracing::debug!(
            window_size = len,
            sample_rate = config.sample_rate(),
            scale_factor = config.scale_factor(),
            "spectral pipeline created"
        );

        Self {
            config,
            work: vec![SILENCE; len],
            post: PostProcessor::new(len, config.scale_factor()),
            handoff: Arc::new(Handoff::new(len)),
            spares: (0..SPARE_FRAMES)
                .map(|_| Arc::new(Spectrum::silent(len)))
                .collect(),
            activations: 0,
            failures: 0,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one producer activation for `raw` (length must equal the window
    /// size).
    ///
    /// On error nothing is published and the hand-off is back to Idle.
    pub fn on_audio_window(&mut self, raw: &[f32]) -> Result<(), SpectrumError> {
        let handoff = Arc::clone(&self.handoff);
        let _busy = handoff.begin();

        if let Err(err) = Self::run_stages(raw, &mut self.work, &mut self.post) {
            self.failures += 1;
            return Err(err);
        }

        self.activations += 1;
        let mut frame = self.take_spare();
        Arc::make_mut(&mut frame).fill_from(&self.work, self.activations);
        // Same length as before the take, so this never reallocates
        self.spares.push(handoff.publish(frame));

        Ok(())
    }

    /// A spare no reader holds. Spares never sit in the publish slot, so
    /// readers cannot pick up new references to them.
    ///
    /// Falls back to the first spare, which `Arc::make_mut` then copies,
    /// only when readers hold every one of them.
    fn take_spare(&mut self) -> Arc<Spectrum> {
        let free = self
            .spares
            .iter_mut()
            .position(|frame| Arc::get_mut(frame).is_some())
            .unwrap_or(0);
        self.spares.swap_remove(free)
    }

    fn run_stages(
        raw: &[f32],
        work: &mut [Sample],
        post: &mut PostProcessor,
    ) -> Result<(), SpectrumError> {
        ingest(raw, work)?;
        fft::transform(work)?;
        post.process(work)
    }

    /// Consumer handle for the renderer
    pub fn reader(&self) -> SpectrumReader {
        SpectrumReader::new(Arc::clone(&self.handoff))
    }

    /// Latest published spectrum, `None` while an activation is in flight
    pub fn current_spectrum(&self) -> Option<Arc<Spectrum>> {
        self.reader().current_spectrum()
    }

    /// Successful activations so far
    pub fn activations(&self) -> u64 {
        self.activations
    }

    /// Failed activations so far
    pub fn failures(&self) -> u64 {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::transform_index;
    use std::f64::consts::PI;
    use std::thread;

    fn pipeline(window_size: usize, scale: f64) -> Pipeline {
        Pipeline::new(PipelineConfig::new(window_size, 44100, scale).unwrap())
    }

    #[test]
    fn test_dc_window() {
        let mut pipeline = pipeline(64, 2.0);
        pipeline.on_audio_window(&[0.5; 64]).unwrap();

        let frame = pipeline.current_spectrum().unwrap();
        assert_eq!(frame.generation(), 1);
        // Unnormalized: DC bin holds the sum, then scaled
        assert!((frame.bins()[0].re - 0.5 * 64.0 * 2.0).abs() < 1e-9);
        assert_eq!(pipeline.activations(), 1);
    }

    #[test]
    fn test_cosine_peak_lands_on_remapped_column() {
        const N: usize = 256;
        let half = N / 2;
        let column = 100;
        let bin = transform_index(column, half);

        let raw: Vec<f32> = (0..N)
            .map(|i| (2.0 * PI * bin as f64 * i as f64 / N as f64).cos() as f32)
            .collect();

        let mut pipeline = pipeline(N, 1.0);
        pipeline.on_audio_window(&raw).unwrap();
        let frame = pipeline.current_spectrum().unwrap();

        // A unit cosine at bin k puts N/2 into the real part of X[k]
        let magnitudes: Vec<f64> = frame.magnitudes().collect();
        assert_eq!(magnitudes.len(), half);
        for (i, magnitude) in magnitudes.iter().enumerate() {
            if transform_index(i, half) == bin {
                assert!((magnitude - N as f64 / 2.0).abs() < 1e-3);
            } else {
                assert!(*magnitude < 1e-3);
            }
        }
    }

    #[test]
    fn test_failed_activation_publishes_nothing() {
        let mut pipeline = pipeline(32, 1.0);
        pipeline.on_audio_window(&[1.0; 32]).unwrap();
        let reader = pipeline.reader();

        let err = pipeline.on_audio_window(&[1.0; 31]).unwrap_err();

        assert_eq!(
            err,
            SpectrumError::LengthMismatch {
                expected: 32,
                actual: 31
            }
        );
        assert!(!reader.is_busy());
        assert_eq!(reader.generation(), 1);
        assert_eq!(pipeline.failures(), 1);
        assert_eq!(pipeline.activations(), 1);
        assert_eq!(reader.current_spectrum().unwrap().generation(), 1);
    }

    #[test]
    fn test_held_frame_is_not_recycled() {
        let mut pipeline = pipeline(16, 1.0);
        pipeline.on_audio_window(&[1.0; 16]).unwrap();
        let held = pipeline.current_spectrum().unwrap();

        // Enough activations to cycle through every spare twice
        let mut published = Vec::new();
        for _ in 0..2 * (SPARE_FRAMES + 1) {
            pipeline.on_audio_window(&[2.0; 16]).unwrap();
            published.push(Arc::as_ptr(&pipeline.current_spectrum().unwrap()));
        }

        // The held frame stays out of rotation; the rest are reused in place
        assert!(published.iter().all(|&ptr| ptr != Arc::as_ptr(&held)));
        assert_eq!(pipeline.spares.len(), SPARE_FRAMES);
        published.sort();
        published.dedup();
        assert!(published.len() <= SPARE_FRAMES);
    }

    #[test]
    fn test_held_frame_keeps_its_contents() {
        let mut pipeline = pipeline(16, 1.0);
        pipeline.on_audio_window(&[1.0; 16]).unwrap();
        let held = pipeline.current_spectrum().unwrap();

        pipeline.on_audio_window(&[2.0; 16]).unwrap();
        pipeline.on_audio_window(&[3.0; 16]).unwrap();

        // The frame the reader kept is never rewritten
        assert_eq!(held.generation(), 1);
        assert!((held.bins()[0].re - 16.0).abs() < 1e-9);
        assert!((pipeline.current_spectrum().unwrap().bins()[0].re - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_concurrent_producer_consumer() {
        const N: usize = 128;
        const WINDOWS: u64 = 2_000;
        const SCALE: f64 = 2.0;

        let mut pipeline = pipeline(N, SCALE);
        let reader = pipeline.reader();

        let producer = thread::spawn(move || {
            for generation in 1..=WINDOWS {
                // Constant window: only the DC bin is non-zero, exactly
                let raw = vec![generation as f32; N];
                pipeline.on_audio_window(&raw).unwrap();
            }
            pipeline
        });

        let mut last_generation = 0;
        while last_generation < WINDOWS {
            let Some(frame) = reader.current_spectrum() else {
                continue;
            };
            let generation = frame.generation();
            assert!(generation >= last_generation);

            let dc = generation as f64 * N as f64 * SCALE;
            assert_eq!(frame.bins()[0].re, dc);
            assert!(frame.magnitudes().all(|m| m == 0.0 || m == dc));
            last_generation = generation;
        }

        let pipeline = producer.join().unwrap();
        assert_eq!(pipeline.activations(), WINDOWS);
        assert!(!reader.is_busy());
    }
}
