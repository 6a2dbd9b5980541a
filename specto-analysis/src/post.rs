//! Post-transform reshaping: magnitude scaling and logarithmic frequency remap
//!
//! The two stages always run scale-then-remap. Scaling works on linear bin
//! values and the remap samples the scaled curve, so swapping them changes
//! what ends up on screen.

use crate::error::SpectrumError;
use crate::spectrum::Sample;

/// Replace each bin's real part with `|re| * factor`; imaginary parts are
/// left alone.
///
/// Meant to run exactly once per transform. Feeding its own output back in
/// multiplies by `factor` again.
pub fn scale_magnitudes(spectrum: &mut [Sample], factor: f64) {
    for bin in spectrum.iter_mut() {
        bin.re = bin.re.abs() * factor;
    }
}

/// Source bin for display column `index` on a log axis of `half` bins.
///
/// Index 0 (and any index when `half <= 1`) maps to 0 without evaluating
/// `log10(0)`. Otherwise the column's normalized log position is resampled
/// nearest-neighbor onto the linear axis and clamped to `[0, half)`.
pub fn transform_index(index: usize, half: usize) -> usize {
    if index == 0 || half <= 1 {
        return 0;
    }
    let position = (index as f64).log10() / (half as f64).log10();
    let source = (position * half as f64).floor() as usize;
    source.min(half - 1)
}

/// Logarithmic remap of the lower half of a spectrum.
///
/// The index table is computed once; [`LogRemap::apply`] copies the lower
/// half into an owned scratch buffer and reads from there, so overlapping
/// source positions never see already-remapped values. The upper half is
/// left untouched.
#[derive(Debug, Clone)]
pub struct LogRemap {
    window_len: usize,
    table: Vec<usize>,
    scratch: Vec<Sample>,
}

impl LogRemap {
    pub fn new(window_len: usize) -> Self {
        let half = window_len / 2;
        let table = (0..half).map(|i| transform_index(i, half)).collect();
        Self {
            window_len,
            table,
            scratch: vec![Sample::new(0.0, 0.0); half],
        }
    }

    /// Number of display bins produced
    pub fn half_len(&self) -> usize {
        self.table.len()
    }

    /// Precomputed source index for every display bin
    pub fn table(&self) -> &[usize] {
        &self.table
    }

    pub fn apply(&mut self, spectrum: &mut [Sample]) -> Result<(), SpectrumError> {
        if spectrum.len() != self.window_len {
            return Err(SpectrumError::LengthMismatch {
                expected: self.window_len,
                actual: spectrum.len(),
            });
        }

        let half = self.table.len();
        self.scratch.copy_from_slice(&spectrum[..half]);
        for (out, &source) in spectrum[..half].iter_mut().zip(&self.table) {
            *out = self.scratch[source];
        }
        Ok(())
    }
}

/// Scale-then-remap stage run by the pipeline after every transform
#[derive(Debug, Clone)]
pub struct PostProcessor {
    window_len: usize,
    scale_factor: f64,
    remap: LogRemap,
}

impl PostProcessor {
    pub fn new(window_len: usize, scale_factor: f64) -> Self {
        Self {
            window_len,
            scale_factor,
            remap: LogRemap::new(window_len),
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Scale then remap `spectrum` in place
    pub fn process(&mut self, spectrum: &mut [Sample]) -> Result<(), SpectrumError> {
        if spectrum.len() != self.window_len {
            return Err(SpectrumError::LengthMismatch {
                expected: self.window_len,
                actual: spectrum.len(),
            });
        }
        scale_magnitudes(spectrum, self.scale_factor);
        self.remap.apply(spectrum)
    }
}
