//! Fixed-duration match countdown

use serde::{Deserialize, Serialize};

/// Countdown that reports whole-second display changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchClock {
    /// Total match length (seconds)
    pub duration: f32,
    /// Simulated seconds since match start
    elapsed: f64,
    /// Last emitted display string
    last_display: String,
}

impl MatchClock {
    pub fn new(duration: f32) -> Self {
        let mut clock = Self {
            duration,
            elapsed: 0.0,
            last_display: String::new(),
        };
        clock.last_display = clock.display();
        clock
    }

    /// Advance by `dt` seconds. Returns the new display only when the
    /// whole-second value changed.
    pub fn advance(&mut self, dt: f32) -> Option<String> {
        self.elapsed = (self.elapsed + dt as f64).min(self.duration as f64);
        let display = self.display();
        if display != self.last_display {
            self.last_display = display.clone();
            Some(display)
        } else {
            None
        }
    }

    /// Seconds left, never negative
    pub fn remaining(&self) -> f32 {
        (self.duration as f64 - self.elapsed).max(0.0) as f32
    }

    /// Seconds played, capped at the match length
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    /// Fraction of the match played, 0..=1
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration as f64).clamp(0.0, 1.0) as f32
        } else {
            1.0
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining() <= 0.0
    }

    /// Remaining time as `MM:SS`, rounded up so `00:00` means expired
    pub fn display(&self) -> String {
        format_mmss((self.duration as f64 - self.elapsed).max(0.0).ceil() as u32)
    }
}

/// Format whole seconds as `MM:SS`
pub fn format_mmss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_format() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(59), "00:59");
        assert_eq!(format_mmss(180), "03:00");
        assert_eq!(format_mmss(3599), "59:59");
    }

    #[test]
    fn test_emits_only_on_second_change() {
        let mut clock = MatchClock::new(180.0);
        assert_eq!(clock.display(), "03:00");

        // First tick drops below 180s -> shows 03:00 still (ceil)
        assert_eq!(clock.advance(SIM_DT), None);

        let mut changes = Vec::new();
        for _ in 0..120 {
            if let Some(s) = clock.advance(SIM_DT) {
                changes.push(s);
            }
        }
        assert_eq!(changes, vec!["02:59".to_string(), "02:58".to_string()]);
    }

    #[test]
    fn test_expires_at_zero() {
        let mut clock = MatchClock::new(1.0);
        let mut last = None;
        let mut ticks = 0;
        while !clock.is_expired() {
            if let Some(s) = clock.advance(SIM_DT) {
                last = Some(s);
            }
            ticks += 1;
            assert!(ticks <= 61);
        }
        assert_eq!(last.as_deref(), Some("00:00"));
        assert_eq!(clock.remaining(), 0.0);
        assert_eq!(clock.progress(), 1.0);
    }

    #[test]
    fn test_elapsed_tracks_play_and_caps() {
        let mut clock = MatchClock::new(2.0);
        for _ in 0..30 {
            clock.advance(SIM_DT);
        }
        assert!((clock.elapsed() - 0.5).abs() < 1e-4);
        assert!((clock.elapsed() + clock.remaining() - 2.0).abs() < 1e-4);

        clock.advance(10.0);
        assert_eq!(clock.elapsed(), 2.0);
        assert_eq!(clock.remaining(), 0.0);
    }
}
