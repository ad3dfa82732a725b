use crate::dial::{angle_from_point, clamp_angle, Point};

/// Fraction of the physical rotation applied to the dial.
pub const DEFAULT_SENSITIVITY: f64 = 0.75;

/// Turns pointer drags around the dial center into a bounded dial angle.
///
/// Two layers are tracked: the raw pointer angle, which wraps at 12 o'clock,
/// and the accumulated dial angle, which is clamped to `[0, 360]` and never
/// wraps. Frame-to-frame deltas of the raw angle are folded into
/// `(-180, 180]` before being accumulated.
#[derive(Debug, Clone)]
pub struct DialGesture {
    center: Point,
    sensitivity: f64,
    disabled: bool,
    active: bool,
    gesture_angle: f64,
    last_raw_angle: f64,
    current_angle: f64,
}

impl DialGesture {
    pub fn new(center: Point, angle: f64) -> Self {
        let angle = clamp_angle(angle);
        Self {
            center,
            sensitivity: DEFAULT_SENSITIVITY,
            disabled: false,
            active: false,
            gesture_angle: angle,
            last_raw_angle: 0.0,
            current_angle: angle,
        }
    }

    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn angle(&self) -> f64 {
        self.current_angle
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Locks the dial, e.g. while a session is running.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.active = false;
        }
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    /// Re-sync with an angle chosen by the owner outside of a drag.
    pub fn set_angle(&mut self, angle: f64) {
        let angle = clamp_angle(angle);
        self.current_angle = angle;
        self.gesture_angle = angle;
    }

    pub fn begin(&mut self, touch: Point) {
        if self.disabled {
            return;
        }
        self.active = true;
        self.gesture_angle = self.current_angle;
        self.last_raw_angle = angle_from_point(self.center.x, self.center.y, touch.x, touch.y);
    }

    /// Feeds one pointer position; returns the new dial angle to emit.
    pub fn update(&mut self, touch: Point) -> Option<f64> {
        if self.disabled || !self.active {
            return None;
        }

        let raw_angle = angle_from_point(self.center.x, self.center.y, touch.x, touch.y);
        if raw_angle.is_nan() {
            return None;
        }

        let mut delta = raw_angle - self.last_raw_angle;
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta < -180.0 {
            delta += 360.0;
        }
        delta *= self.sensitivity;

        self.gesture_angle = clamp_angle(self.gesture_angle + delta);
        // still tracked while clamped, so reversing direction responds at once
        self.last_raw_angle = raw_angle;
        self.current_angle = self.gesture_angle;

        Some(self.current_angle)
    }

    pub fn end(&mut self) {
        self.active = false;
    }
}
