//! Producer/consumer hand-off of finished spectra.
//!
//! The producer (audio callback) and the consumer (render loop) never share a
//! mutable buffer. The producer works in its own buffer, copies the result
//! into an immutable [`Spectrum`] frame and swaps the frame's identity into
//! the publish slot. The consumer clones the current `Arc` out of that slot.
//! A frame is never written after it has been published, so a torn read is
//! impossible; the busy flag only decides whether the consumer bothers to
//! look this tick.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::spectrum::Spectrum;

/// Shared state between the pipeline and its readers
#[derive(Debug)]
pub struct Handoff {
    /// Busy while a producer activation is in flight
    busy: AtomicBool,
    /// Generation of the frame in `front`
    generation: AtomicU64,
    /// Consumer reads that returned no frame
    skipped: AtomicU64,
    /// Currently published frame
    front: Mutex<Arc<Spectrum>>,
}

impl Handoff {
    /// Idle hand-off whose published frame is `window_len` zero bins
    pub fn new(window_len: usize) -> Self {
        Self {
            busy: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            front: Mutex::new(Arc::new(Spectrum::silent(window_len))),
        }
    }

    /// Mark a producer activation as started (Idle → Busy).
    ///
    /// The flag goes back to Idle when the returned guard drops, including
    /// on early error returns.
    pub fn begin(&self) -> BusyGuard<'_> {
        self.busy.store(true, Ordering::Release);
        BusyGuard { busy: &self.busy }
    }

    /// Swap `frame` in as the published spectrum and hand back the one it
    /// replaced so the producer can recycle it.
    ///
    /// Only a pointer swap happens under the lock.
    pub fn publish(&self, frame: Arc<Spectrum>) -> Arc<Spectrum> {
        let generation = frame.generation();
        let previous = std::mem::replace(&mut *self.front.lock(), frame);
        self.generation.store(generation, Ordering::Release);
        previous
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

/// Returns the hand-off to Idle on drop
#[must_use = "the activation is marked Idle as soon as the guard is dropped"]
pub struct BusyGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Consumer-side handle. Cheap to clone, never blocks.
#[derive(Debug, Clone)]
pub struct SpectrumReader {
    shared: Arc<Handoff>,
}

impl SpectrumReader {
    pub fn new(shared: Arc<Handoff>) -> Self {
        Self { shared }
    }

    /// The last published spectrum, or `None` when the producer is busy or
    /// the publish slot is held right now. On `None` the caller keeps
    /// showing its previous frame.
    pub fn current_spectrum(&self) -> Option<Arc<Spectrum>> {
        if self.shared.is_busy() {
            self.shared.skipped.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        match self.shared.front.try_lock() {
            Some(front) => Some(Arc::clone(&front)),
            None => {
                self.shared.skipped.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Whether a producer activation is in flight
    pub fn is_busy(&self) -> bool {
        self.shared.is_busy()
    }

    /// Generation of the most recently published frame
    pub fn generation(&self) -> u64 {
        self.shared.generation()
    }

    /// How many reads came back empty so far
    pub fn skipped_reads(&self) -> u64 {
        self.shared.skipped.load(Ordering::Relaxed)
    }
}
