//! Sample and published spectrum types

use rustfft::num_complex::Complex;

/// One time-domain sample or one frequency bin
pub type Sample = Complex<f64>;

/// Zero-valued sample
pub const SILENCE: Sample = Complex { re: 0.0, im: 0.0 };

/// An immutable, fully processed spectrum frame as seen by the renderer.
///
/// Holds the whole window of `N` bins. After post-processing only the lower
/// half carries display data: the real part of each bin is its scaled
/// magnitude, the imaginary part is leftover bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    generation: u64,
    bins: Vec<Sample>,
}

impl Spectrum {
    /// Frame of `len` zero bins, generation 0
    pub fn silent(len: usize) -> Self {
        Self {
            generation: 0,
            bins: vec![SILENCE; len],
        }
    }

    /// Activation counter of the producer that wrote this frame.
    /// Zero means nothing has been published yet.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All `N` bins
    pub fn bins(&self) -> &[Sample] {
        &self.bins
    }

    /// The remapped lower half (`N/2` bins) intended for display
    pub fn display_bins(&self) -> &[Sample] {
        &self.bins[..self.bins.len() / 2]
    }

    /// Display magnitudes (real parts of the display bins)
    pub fn magnitudes(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.display_bins().iter().map(|bin| bin.re)
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Overwrite this frame with `bins` and stamp it. Lengths must match.
    pub(crate) fn fill_from(&mut self, bins: &[Sample], generation: u64) {
        self.bins.copy_from_slice(bins);
        self.generation = generation;
    }
}
