//! Per-tick timing input.

/// Timing for one step, supplied by the host's clock.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTiming {
    /// Seconds since the previous step.
    pub delta_time: f32,
    /// Seconds since the simulation started.
    pub elapsed_time: f32,
}

impl FrameTiming {
    /// Timing with the given delta and elapsed time.
    pub fn new(delta_time: f32, elapsed_time: f32) -> Self {
        Self {
            delta_time,
            elapsed_time,
        }
    }

    /// Timing for the `tick`-th step of a fixed-rate run.
    pub fn fixed(delta_time: f32, tick: u64) -> Self {
        Self {
            delta_time,
            elapsed_time: delta_time * tick as f32,
        }
    }

    /// Replace a negative or non-finite delta with zero and, when
    /// `max_delta` is set, cap it there. Returns the cleaned timing and
    /// whether anything changed.
    pub fn sanitized(self, max_delta: Option<f32>) -> (Self, bool) {
        let dt = if self.delta_time.is_finite() && self.delta_time >= 0.0 {
            max_delta.map_or(self.delta_time, |cap| self.delta_time.min(cap))
        } else {
            0.0
        };
        let elapsed = if self.elapsed_time.is_finite() {
            self.elapsed_time
        } else {
            0.0
        };
        let cleaned = Self {
            delta_time: dt,
            elapsed_time: elapsed,
        };
        (cleaned, cleaned != self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_passes_valid_timing() {
        let t = FrameTiming::new(0.016, 3.0);
        assert_eq!(t.sanitized(Some(1.0)), (t, false));
        let long = FrameTiming::new(30.0, 0.0);
        assert_eq!(long.sanitized(None), (long, false));
    }

    #[test]
    fn sanitized_zeroes_bad_delta() {
        for bad in [f32::NAN, f32::INFINITY, -0.5] {
            let (t, changed) = FrameTiming::new(bad, 1.0).sanitized(None);
            assert_eq!(t.delta_time, 0.0);
            assert!(changed);
        }
    }

    #[test]
    fn sanitized_caps_large_delta() {
        let (t, changed) = FrameTiming::new(5.0, 0.0).sanitized(Some(0.1));
        assert_eq!(t.delta_time, 0.1);
        assert!(changed);
    }

    #[test]
    fn fixed_accumulates_elapsed() {
        assert_eq!(FrameTiming::fixed(0.5, 4).elapsed_time, 2.0);
    }
}
