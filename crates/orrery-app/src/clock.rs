//! Variable-step frame clock.
//!
//! Every frame advances the scene by the measured wall-clock time since the
//! previous frame. Overlong frames (debugger pauses, window drags) are clamped
//! so the meteor and camera do not jump across the scene.

use std::time::Instant;
use tracing::warn;

/// Longest frame the scene will integrate in one step, in seconds.
pub const MAX_FRAME_TIME: f32 = 0.25; // 250ms = 4 FPS minimum

pub struct FrameClock {
    previous_time: Instant,
    total_time: f64,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Measure the time since the last call and return the clamped step.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f32();
        self.previous_time = now;
        self.advance_by(frame_time)
    }

    /// Advance by an explicit frame time and return the clamped step.
    pub fn advance_by(&mut self, frame_time: f32) -> f32 {
        let dt = if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            MAX_FRAME_TIME
        } else {
            frame_time.max(0.0)
        };

        self.total_time += f64::from(dt);
        self.frame_count += 1;
        dt
    }

    /// Forget time spent away (e.g. while suspended) without stepping.
    pub fn reset(&mut self) {
        self.previous_time = Instant::now();
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_frame_passes_through() {
        let mut clock = FrameClock::new();
        let dt = clock.advance_by(1.0 / 60.0);
        assert!((dt - 1.0 / 60.0).abs() < 1e-7);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clock = FrameClock::new();
        assert!((clock.advance_by(3.0) - MAX_FRAME_TIME).abs() < f32::EPSILON);
        assert!((clock.total_time() - f64::from(MAX_FRAME_TIME)).abs() < 1e-9);
    }

    #[test]
    fn test_negative_frame_time_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance_by(-0.5), 0.0);
    }

    #[test]
    fn test_total_time_accumulates() {
        let mut clock = FrameClock::new();
        for _ in 0..10 {
            clock.advance_by(0.02);
        }
        assert!((clock.total_time() - 0.2).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 10);
    }

    #[test]
    fn test_measured_tick_is_bounded() {
        let mut clock = FrameClock::default();
        let dt = clock.tick();
        assert!((0.0..=MAX_FRAME_TIME).contains(&dt));
    }
}
