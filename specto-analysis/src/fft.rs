//! In-place radix-2 FFT.
//!
//! Features:
//! - Iterative butterflies, no recursion and no auxiliary output array
//! - Twiddle factors generated by repeated squaring of one base rotation
//! - Bit-reversal permutation sized to `log2(N)`
//! - O(1) extra state, no allocation

use std::f64::consts::PI;

use crate::error::SpectrumError;
use crate::spectrum::Sample;

/// Check that `len` is usable as a transform length
#[inline]
pub fn validate_length(len: usize) -> Result<(), SpectrumError> {
    if len.is_power_of_two() {
        Ok(())
    } else {
        Err(SpectrumError::InvalidLength(len))
    }
}

/// Forward FFT of `buffer`, in place, in natural frequency order.
///
/// The transform is unnormalized: no `1/N` factor is applied, so an impulse
/// of height 1 yields a flat spectrum of 1s and bin 0 is the plain sum of
/// the input. Callers that need a normalized result must scale explicitly.
///
/// Fails with [`SpectrumError::InvalidLength`] and leaves the buffer
/// untouched when its length is zero or not a power of two.
pub fn transform(buffer: &mut [Sample]) -> Result<(), SpectrumError> {
    let n = buffer.len();
    validate_length(n)?;
    if n == 1 {
        return Ok(());
    }

    let theta = PI / n as f64;
    let mut phi = Sample::new(theta.cos(), -theta.sin());
    let mut k = n;

    while k > 1 {
        let span = k;
        k >>= 1;
        // Per-level root of unity e^(-2πi/span)
        phi = phi * phi;

        let mut twiddle = Sample::new(1.0, 0.0);
        for l in 0..k {
            for a in (l..n).step_by(span) {
                let b = a + k;
                let upper = buffer[b];
                let diff = buffer[a] - upper;
                buffer[a] += upper;
                buffer[b] = diff * twiddle;
            }
            twiddle *= phi;
        }
    }

    bit_reverse_permute(buffer);
    Ok(())
}

/// Normalized inverse FFT via the conjugate identity
/// `ifft(x) = conj(fft(conj(x))) / N`.
pub fn inverse(buffer: &mut [Sample]) -> Result<(), SpectrumError> {
    validate_length(buffer.len())?;

    for bin in buffer.iter_mut() {
        *bin = bin.conj();
    }
    transform(buffer)?;

    let norm = 1.0 / buffer.len() as f64;
    for bin in buffer.iter_mut() {
        *bin = bin.conj() * norm;
    }
    Ok(())
}

/// Reverse the low `bits` bits of `index`
#[inline]
pub fn reverse_bits(index: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    index.reverse_bits() >> (usize::BITS - bits)
}

/// Swap every index with its bit-reversed partner, each pair exactly once
fn bit_reverse_permute(buffer: &mut [Sample]) {
    let bits = buffer.len().trailing_zeros();
    for a in 0..buffer.len() {
        let b = reverse_bits(a, bits);
        if b > a {
            buffer.swap(a, b);
        }
    }
}
