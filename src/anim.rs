//! The time-driven scalar interpolator used to smooth visual transitions.
//! Values are advanced by the screen's update tick; a widget stays on the
//! update list for as long as its timelines are running.

/// The easing curve applied to normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// Smoothstep: slow in, slow out.
    Smooth,
}

/// A scalar timeline running from a start value to an end value over a fixed
/// duration. `elapsed` only ever moves forward while driven, clamped to
/// `[0, duration]`; the current value is a pure function of `elapsed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedValue {
    start: f32,
    end: f32,
    duration: f32,
    elapsed: f32,
    ease: Ease,
}

impl AnimatedValue {
    pub fn new(ease: Ease, start: f32, end: f32, duration: f32) -> Self {
        AnimatedValue {
            start,
            end,
            duration: duration.max(0.0),
            elapsed: 0.0,
            ease,
        }
    }

    pub fn linear(start: f32, end: f32, duration: f32) -> Self {
        AnimatedValue::new(Ease::Linear, start, end, duration)
    }

    pub fn smooth(start: f32, end: f32, duration: f32) -> Self {
        AnimatedValue::new(Ease::Smooth, start, end, duration)
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Advance the timeline. Clamped to the duration; advancing a finished
    /// timeline is a no-op.
    pub fn update(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
    }

    /// Seek to an absolute time. Seeking to 0 restarts the transition;
    /// seeking to the duration snap-completes it.
    pub fn set_time(&mut self, t: f32) {
        self.elapsed = t.clamp(0.0, self.duration);
    }

    /// Has the timeline run to completion?
    pub fn is_over(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn current_value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.end;
        }
        let t = self.elapsed / self.duration;
        let t = match self.ease {
            Ease::Linear => t,
            Ease::Smooth => t * t * (3.0 - 2.0 * t),
        };
        self.start + (self.end - self.start) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_to_completion() {
        let mut v = AnimatedValue::smooth(1.0, 0.0, 0.2);
        assert!(!v.is_over());
        assert_eq!(v.current_value(), 1.0);
        v.update(0.1);
        assert!(!v.is_over());
        v.update(0.1);
        assert!(v.is_over());
        assert_eq!(v.current_value(), 0.0);
        // Further updates are a no-op.
        v.update(1.0);
        assert_eq!(v.current_value(), 0.0);
    }

    #[test]
    fn seek() {
        let mut v = AnimatedValue::smooth(1.0, 0.0, 0.2);
        v.set_time(v.duration());
        assert!(v.is_over());
        assert_eq!(v.current_value(), 0.0);
        v.set_time(0.0);
        assert!(!v.is_over());
        assert_eq!(v.current_value(), 1.0);
        // Out-of-range seeks clamp.
        v.set_time(99.0);
        assert!(v.is_over());
    }

    #[test]
    fn linear_midpoint() {
        let mut v = AnimatedValue::linear(0.0, 10.0, 1.0);
        v.update(0.5);
        assert_eq!(v.current_value(), 5.0);
    }

    #[test]
    fn smooth_is_monotonic() {
        let mut v = AnimatedValue::smooth(0.0, 1.0, 1.0);
        let mut last = v.current_value();
        for _ in 0..20 {
            v.update(0.05);
            let cur = v.current_value();
            assert!(cur >= last);
            last = cur;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn zero_duration_is_immediately_over() {
        let v = AnimatedValue::smooth(0.0, 1.0, 0.0);
        assert!(v.is_over());
        assert_eq!(v.current_value(), 1.0);
    }
}
