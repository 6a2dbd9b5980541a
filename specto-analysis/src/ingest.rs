//! Raw audio window → complex working buffer

use crate::error::SpectrumError;
use crate::spectrum::Sample;

/// Widen each real sample into `target` as a complex value with zero
/// imaginary part, overwriting what was there.
///
/// Lengths must match; on mismatch nothing is written.
pub fn ingest(raw: &[f32], target: &mut [Sample]) -> Result<(), SpectrumError> {
    if raw.len() != target.len() {
        return Err(SpectrumError::LengthMismatch {
            expected: target.len(),
            actual: raw.len(),
        });
    }

    for (slot, &sample) in target.iter_mut().zip(raw) {
        *slot = Sample::new(f64::from(sample), 0.0);
    }
    Ok(())
}
