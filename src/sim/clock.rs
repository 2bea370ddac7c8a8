//! Frame clock
//!
//! Turns wall-clock frame timestamps into a movement scale so obstacles
//! travel the same distance per second at any frame rate.

/// Converts successive frame timestamps into movement units
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Milliseconds that make one movement unit
    reference_ms: f64,
    /// Longest gap credited to a single tick
    max_frame_ms: f64,
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new(reference_ms: f64, max_frame_ms: f64) -> Self {
        Self {
            reference_ms,
            max_frame_ms,
            last_ms: None,
        }
    }

    /// Forget the previous frame; the next gap is measured from `now_ms`
    pub fn rebase(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    /// Elapsed time since the previous frame, in movement units
    ///
    /// A clock that was never rebased reports 0 for its first frame. Time
    /// running backwards counts as 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let elapsed = match self.last_ms {
            Some(last) if now_ms.is_finite() => (now_ms - last).clamp(0.0, self.max_frame_ms),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
        }
        (elapsed / self.reference_ms) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_scale_is_time_proportional() {
        let mut clock = FrameClock::new(MOVEMENT_REFERENCE_MS, MAX_FRAME_MS);
        clock.rebase(1000.0);
        assert!((clock.advance(1016.0) - 1.6).abs() < 1e-6);
        assert!((clock.advance(1049.0) - 3.3).abs() < 1e-6);
    }

    #[test]
    fn test_first_frame_without_rebase_is_zero() {
        let mut clock = FrameClock::new(MOVEMENT_REFERENCE_MS, MAX_FRAME_MS);
        assert_eq!(clock.advance(5000.0), 0.0);
        assert!((clock.advance(5010.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_long_gap_is_capped() {
        let mut clock = FrameClock::new(MOVEMENT_REFERENCE_MS, MAX_FRAME_MS);
        clock.rebase(0.0);
        assert_eq!(clock.advance(60_000.0), 10.0);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::new(MOVEMENT_REFERENCE_MS, MAX_FRAME_MS);
        clock.rebase(100.0);
        assert_eq!(clock.advance(50.0), 0.0);
        assert_eq!(clock.advance(f64::NAN), 0.0);
        assert!((clock.advance(60.0) - 1.0).abs() < 1e-6);
    }
}
