use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use atomic_float::AtomicF64;

/// Current playback position of the backing track, in seconds.
pub trait ClockSource {
    fn now(&self) -> f64;
}

impl<C: ClockSource + ?Sized> ClockSource for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

impl<C: ClockSource + ?Sized> ClockSource for Arc<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Clock driven by the sample position of a playing audio stream.
///
/// The audio thread advances the shared position as it renders frames; while playback
/// is paused the position, and therefore the time, stays put.
#[derive(Debug, Clone)]
pub struct AudioClock {
    processed_frames: Arc<AtomicU64>,
    sample_rate: u32,
}

impl AudioClock {
    pub fn new(processed_frames: Arc<AtomicU64>, sample_rate: u32) -> Self {
        Self {
            processed_frames,
            sample_rate,
        }
    }

    /// Handle for the audio thread.
    pub fn position_handle(&self) -> Arc<AtomicU64> {
        self.processed_frames.clone()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl ClockSource for AudioClock {
    fn now(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.processed_frames.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }
}

/// Clock whose time is set explicitly by its owner. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Arc<AtomicF64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            time: Arc::new(AtomicF64::new(start)),
        }
    }

    pub fn set(&self, seconds: f64) {
        self.time.store(seconds, Ordering::Release);
    }

    pub fn advance(&self, seconds: f64) {
        self.time.fetch_add(seconds, Ordering::AcqRel);
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> f64 {
        self.time.load(Ordering::Acquire)
    }
}

/// Never reports a time earlier than one it already reported.
#[derive(Debug)]
pub struct Monotonic<C> {
    inner: C,
    last: Cell<f64>,
}

impl<C: ClockSource> Monotonic<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            last: Cell::new(f64::NEG_INFINITY),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: ClockSource> ClockSource for Monotonic<C> {
    fn now(&self) -> f64 {
        let t = self.inner.now().max(self.last.get());
        self.last.set(t);
        t
    }
}
