//! Frame throttling against host timestamps.
//!
//! The host's frame callback fires at display refresh cadence, which may be
//! 120 Hz or more. [`FrameThrottle`] decides which of those callbacks do
//! real work: a callback is *accepted* only once the target interval has
//! elapsed since the previous accepted one. Everything else is skipped.
//!
//! Timestamps are the host's monotonic clock in milliseconds (the value
//! `requestAnimationFrame` passes). No wall clock is read, so the throttle
//! runs the same under a simulated clock.
//!
//! # Example
//!
//! ```ignore
//! use driftlight::time::FrameThrottle;
//!
//! let mut throttle = FrameThrottle::with_target_fps(60.0);
//!
//! // In the frame callback:
//! if throttle.accept(timestamp) {
//!     store.step(&mut surface);
//! }
//! println!("FPS: {:.1}", throttle.fps());
//! ```

/// How often the measured FPS is refreshed, in host milliseconds.
const FPS_UPDATE_INTERVAL_MS: f64 = 500.0;

/// Throttle-by-skip gate plus frame statistics.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    /// Minimum spacing between accepted frames.
    interval_ms: f64,
    /// Timestamp of the last accepted frame.
    last_accepted: f64,
    /// Accepted frames since creation or reset.
    accepted: u64,
    /// Skipped callbacks since creation or reset.
    skipped: u64,
    /// Measured accepted frames per second.
    fps: f64,
    /// Accepted count at the last FPS update.
    fps_frame_count: u64,
    /// Timestamp of the last FPS update, once one has been seen.
    fps_update_time: Option<f64>,
}

impl FrameThrottle {
    /// Create a throttle with the given minimum interval between accepted frames.
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_accepted: 0.0,
            accepted: 0,
            skipped: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: None,
        }
    }

    /// Create a throttle targeting `fps` accepted frames per second.
    pub fn with_target_fps(fps: f64) -> Self {
        Self::new(1000.0 / fps)
    }

    /// Decide whether the callback at `timestamp` does work.
    ///
    /// Returns `false` when less than the interval has passed since the last
    /// accepted frame. Otherwise records `timestamp` and returns `true`.
    pub fn accept(&mut self, timestamp: f64) -> bool {
        if timestamp - self.last_accepted < self.interval_ms {
            self.skipped += 1;
            return false;
        }

        self.last_accepted = timestamp;
        self.accepted += 1;
        self.update_fps(timestamp);
        true
    }

    fn update_fps(&mut self, now: f64) {
        let Some(since) = self.fps_update_time else {
            self.fps_update_time = Some(now);
            self.fps_frame_count = self.accepted;
            return;
        };

        let elapsed = now - since;
        if elapsed >= FPS_UPDATE_INTERVAL_MS {
            let frames = self.accepted - self.fps_frame_count;
            self.fps = frames as f64 * 1000.0 / elapsed;
            self.fps_frame_count = self.accepted;
            self.fps_update_time = Some(now);
        }
    }

    /// Minimum spacing between accepted frames, in milliseconds.
    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Timestamp of the last accepted frame.
    #[inline]
    pub fn last_accepted(&self) -> f64 {
        self.last_accepted
    }

    /// Accepted frames so far.
    #[inline]
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Skipped callbacks so far.
    #[inline]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Measured accepted frames per second.
    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Forget all history, keeping the interval.
    pub fn reset(&mut self) {
        *self = Self::new(self.interval_ms);
    }
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self::with_target_fps(crate::config::DEFAULT_TARGET_FPS)
    }
}
