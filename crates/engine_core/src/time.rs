//! Time management for the game loop.

use std::time::{Duration, Instant};

/// Longest frame the simulation will integrate in one step.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Manages frame timing and delta time calculation.
///
/// The delta is clamped to [`MAX_FRAME_DELTA`] so a stalled window (drag,
/// breakpoint, minimise) never produces a huge integration step.
#[derive(Debug)]
pub struct Time {
    /// Time of the last frame.
    last_frame: Instant,
    /// Clamped duration of the last frame.
    delta: Duration,
    /// Unclamped duration of the last frame, used for the FPS readout.
    raw_delta: Duration,
    /// Sum of all clamped deltas.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            raw_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Update timing at the start of a new frame from the wall clock.
    pub fn update(&mut self) {
        let now = Instant::now();
        let raw = now - self.last_frame;
        self.last_frame = now;
        self.advance(raw);
    }

    /// Advance by an explicit frame duration. `update` funnels through here.
    pub fn advance(&mut self, raw: Duration) {
        self.raw_delta = raw;
        self.delta = raw.min(MAX_FRAME_DELTA);
        self.elapsed += self.delta;
        self.frame_count += 1;
    }

    /// Forget the time spent away (e.g. while the window was suspended).
    pub fn reset_clock(&mut self) {
        self.last_frame = Instant::now();
    }

    /// Get the clamped delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the clamped delta time as a Duration.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Get total simulated time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (from the unclamped last frame).
    pub fn fps(&self) -> f32 {
        if self.raw_delta.as_secs_f32() > 0.0 {
            1.0 / self.raw_delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_clamped() {
        let mut time = Time::new();
        time.advance(Duration::from_secs(3));
        assert!((time.delta_seconds() - 0.1).abs() < 1e-6);
        assert!((time.fps() - 1.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn short_frames_pass_through() {
        let mut time = Time::new();
        time.advance(Duration::from_millis(16));
        time.advance(Duration::from_millis(16));
        assert_eq!(time.frame_count(), 2);
        assert!((time.elapsed_seconds() - 0.032).abs() < 1e-6);
    }
}
