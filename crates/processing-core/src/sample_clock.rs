//! Sample clock: which frames to inspect, and which second each one lands on.
//!
//! The scan walks backward from the last frame toward frame 0 in steps of
//! `interval_secs × frame_rate` frames. Each visited index is mapped to an
//! integer second by floor division.

use reelcut_common::error::{ReelcutError, ReelcutResult};

/// A whole second on the video timeline.
pub type TimestampSecond = u32;

/// Convert a frame index to the integer second it belongs to.
pub fn second_of(frame_index: u64, frame_rate: f64) -> TimestampSecond {
    (frame_index as f64 / frame_rate).floor() as TimestampSecond
}

/// Descending iterator over sampled frame indices.
#[derive(Debug, Clone)]
pub struct SampleClock {
    frame_rate: f64,
    step: u64,
    next: Option<u64>,
}

impl SampleClock {
    /// Build a clock over `total_frames` frames.
    pub fn new(total_frames: u64, frame_rate: f64, interval_secs: u32) -> ReelcutResult<Self> {
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(ReelcutError::invalid_input(format!(
                "frame rate must be positive, got {frame_rate}"
            )));
        }
        if interval_secs == 0 {
            return Err(ReelcutError::invalid_input(
                "sampling interval must be at least one second",
            ));
        }

        let step = ((interval_secs as f64 * frame_rate).round() as u64).max(1);

        Ok(Self {
            frame_rate,
            step,
            next: total_frames.checked_sub(1),
        })
    }

    /// Frames advanced between two samples.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Second of a frame index under this clock's frame rate.
    pub fn second_of(&self, frame_index: u64) -> TimestampSecond {
        second_of(frame_index, self.frame_rate)
    }
}

impl Iterator for SampleClock {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let current = self.next?;
        self.next = current.checked_sub(self.step);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map(|n| (n / self.step) as usize + 1)
            .unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SampleClock {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walks_backward_to_zero() {
        let clock = SampleClock::new(10, 2.0, 1).unwrap();
        let indices: Vec<u64> = clock.collect();
        assert_eq!(indices, vec![9, 7, 5, 3, 1]);
    }

    #[test]
    fn test_includes_frame_zero_when_aligned() {
        let clock = SampleClock::new(91, 30.0, 1).unwrap();
        let indices: Vec<u64> = clock.collect();
        assert_eq!(indices, vec![90, 60, 30, 0]);
    }

    #[test]
    fn test_step_rounds_fractional_rates() {
        let clock = SampleClock::new(1000, 29.97, 1).unwrap();
        assert_eq!(clock.step(), 30);

        let clock = SampleClock::new(1000, 29.97, 2).unwrap();
        assert_eq!(clock.step(), 60);
    }

    #[test]
    fn test_step_never_zero() {
        let clock = SampleClock::new(5, 0.2, 1).unwrap();
        assert_eq!(clock.step(), 1);
        assert_eq!(clock.count(), 5);
    }

    #[test]
    fn test_empty_video_yields_nothing() {
        let mut clock = SampleClock::new(0, 30.0, 1).unwrap();
        assert_eq!(clock.len(), 0);
        assert_eq!(clock.next(), None);
    }

    #[test]
    fn test_size_hint_is_exact() {
        let clock = SampleClock::new(3001, 60.0, 1).unwrap();
        let expected = clock.len();
        assert_eq!(clock.count(), expected);
    }

    #[test]
    fn test_rejects_bad_frame_rate() {
        assert!(SampleClock::new(10, 0.0, 1).is_err());
        assert!(SampleClock::new(10, -5.0, 1).is_err());
        assert!(SampleClock::new(10, f64::NAN, 1).is_err());
        assert!(SampleClock::new(10, 30.0, 0).is_err());
    }

    #[test]
    fn test_second_of_floors() {
        assert_eq!(second_of(0, 30.0), 0);
        assert_eq!(second_of(29, 30.0), 0);
        assert_eq!(second_of(30, 30.0), 1);
        assert_eq!(second_of(1799, 29.97), 60);
    }
}
