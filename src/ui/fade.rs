// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Frame-clock fades, sampled on the UI thread

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    started: Instant,
    duration: Duration,
}

impl Fade {
    pub fn start(now: Instant, duration: Duration) -> Self {
        Self { started: now, duration }
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Eased opacity for the current frame
    pub fn opacity(&self, now: Instant) -> f32 {
        let t = self.progress(now);
        t * t * (3.0 - 2.0 * t)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_runs_from_zero_to_one() {
        let start = Instant::now();
        let fade = Fade::start(start, Duration::from_millis(200));

        assert_eq!(fade.progress(start), 0.0);
        assert!((fade.progress(start + Duration::from_millis(100)) - 0.5).abs() < 1e-3);
        assert_eq!(fade.progress(start + Duration::from_millis(200)), 1.0);
        assert_eq!(fade.progress(start + Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn test_opacity_is_monotonic() {
        let start = Instant::now();
        let fade = Fade::start(start, Duration::from_millis(250));
        let mut last = -1.0;
        for ms in (0..=300).step_by(10) {
            let value = fade.opacity(start + Duration::from_millis(ms));
            assert!(value >= last);
            assert!((0.0..=1.0).contains(&value));
            last = value;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_finished_only_after_duration() {
        let start = Instant::now();
        let fade = Fade::start(start, Duration::from_millis(100));
        assert!(!fade.is_finished(start + Duration::from_millis(50)));
        assert!(fade.is_finished(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_zero_duration_is_immediately_done() {
        let start = Instant::now();
        let fade = Fade::start(start, Duration::ZERO);
        assert!(fade.is_finished(start));
        assert_eq!(fade.opacity(start), 1.0);
    }

    #[test]
    fn test_clock_before_start_reads_zero() {
        let now = Instant::now();
        let fade = Fade::start(now + Duration::from_millis(50), Duration::from_millis(100));
        assert_eq!(fade.progress(now), 0.0);
    }
}
