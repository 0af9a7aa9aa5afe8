//! Camera shift animation
//!
//! Cubic ease-out from one camera offset to another over a fixed duration.
//! Restarted after every successful landing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftAnimation {
    pub active: bool,
    pub elapsed: f32,
    pub duration: f32,
    pub from: f32,
    pub to: f32,
    pub value: f32,
    pub done: bool,
}

impl Default for ShiftAnimation {
    fn default() -> Self {
        Self {
            active: false,
            elapsed: 0.0,
            duration: 0.0,
            from: 0.0,
            to: 0.0,
            value: 0.0,
            done: true,
        }
    }
}

impl ShiftAnimation {
    /// Begin (or restart) an animation
    pub fn start(&mut self, from: f32, to: f32, duration: f32) {
        *self = Self {
            active: true,
            elapsed: 0.0,
            duration,
            from,
            to,
            value: from,
            done: false,
        };
    }

    /// Advance by `dt` seconds and return the current value
    pub fn advance(&mut self, dt: f32) -> f32 {
        if !self.active || self.done {
            return self.value;
        }

        self.elapsed += dt.max(0.0);
        let p = if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        };
        let eased = 1.0 - (1.0 - p).powi(3);
        self.value = self.from + (self.to - self.from) * eased;

        if p >= 1.0 {
            self.value = self.to;
            self.done = true;
            self.active = false;
        }
        self.value
    }

    /// Drop any in-flight animation
    pub fn cancel(&mut self) {
        *self = Self {
            value: self.value,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_curve() {
        let mut anim = ShiftAnimation::default();
        anim.start(0.0, 100.0, 1.0);
        assert!(!anim.done);
        assert_eq!(anim.value, 0.0);

        // p = 0.5 -> 1 - 0.125
        let v = anim.advance(0.5);
        assert!((v - 87.5).abs() < 1e-3);
        assert!(anim.active);

        let v = anim.advance(0.6);
        assert_eq!(v, 100.0);
        assert!(anim.done);
        assert!(!anim.active);

        // Finished animations hold their value
        assert_eq!(anim.advance(1.0), 100.0);
    }

    #[test]
    fn test_restart_is_reentrant() {
        let mut anim = ShiftAnimation::default();
        anim.start(0.0, 50.0, 0.42);
        anim.advance(1.0);
        assert!(anim.done);

        anim.start(50.0, 120.0, 0.42);
        assert!(!anim.done);
        assert_eq!(anim.elapsed, 0.0);
        assert_eq!(anim.value, 50.0);
        let v = anim.advance(0.21);
        assert!(v > 50.0 && v < 120.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut anim = ShiftAnimation::default();
        anim.start(10.0, 30.0, 0.0);
        assert_eq!(anim.advance(0.0), 30.0);
        assert!(anim.done);
    }

    #[test]
    fn test_cancel_keeps_value() {
        let mut anim = ShiftAnimation::default();
        anim.start(0.0, 100.0, 1.0);
        let v = anim.advance(0.25);
        anim.cancel();
        assert!(!anim.active);
        assert!(anim.done);
        assert_eq!(anim.value, v);
    }
}
