//! Local monotonic clocks the session measures transport drift against.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Local time in milliseconds since the source's origin.
pub trait TimeSource {
    fn now_ms(&self) -> f64;
}

/// Wall clock anchored at an `Instant`. Other threads that schedule against
/// the session (autoplay) take the same origin through [`Self::origin`].
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(origin: Instant) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// The instant at which this source reads `ms`. Negative values clamp to
    /// the origin.
    pub fn instant_at(&self, ms: f64) -> Instant {
        self.origin + Duration::from_secs_f64(ms.max(0.0) / 1000.0)
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for session and clock tests. Interior mutability lets a
/// test move time while the session holds the source.
#[derive(Debug, Default)]
pub struct MockTimeSource {
    now_ms: Cell<f64>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(ms: f64) -> Self {
        Self {
            now_ms: Cell::new(ms),
        }
    }

    pub fn set_time(&self, ms: f64) {
        self.now_ms.set(ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }
}

impl TimeSource for MockTimeSource {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}
