//! Duration dial geometry.
//!
//! The dial sweeps clockwise from 12 o'clock. A full turn covers the whole
//! duration range, quantized to [`STEP_MINUTES`]. All coordinates are screen
//! coordinates: x grows to the right, y grows downwards.

pub const MIN_MINUTES: u32 = 5;
pub const MAX_MINUTES: u32 = 180;
pub const STEP_MINUTES: u32 = 5;
pub const DEFAULT_MINUTES: u32 = 15;

/// Shortest arc the dial will draw, so a 5 minute setting is still visible.
pub const MIN_DISPLAY_ANGLE: f64 = 10.0;

const FULL_TURN: f64 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Clamp into `[0, 360]`; NaN maps to 0.
pub(crate) fn clamp_angle(angle: f64) -> f64 {
    if angle.is_nan() {
        return 0.0;
    }
    angle.clamp(0.0, FULL_TURN)
}

/// Linear map from `[MIN_MINUTES, MAX_MINUTES]` onto `[0, 360]`.
pub fn minutes_to_angle(minutes: u32) -> f64 {
    let clamped = minutes.clamp(MIN_MINUTES, MAX_MINUTES);
    let ratio = (clamped - MIN_MINUTES) as f64 / (MAX_MINUTES - MIN_MINUTES) as f64;

    ratio * FULL_TURN
}

/// Quantized inverse of [`minutes_to_angle`].
///
/// The turn is split into one slot per selectable value and the slot index is
/// floored, so at a slot boundary the lower value wins and the last few degrees
/// before a boundary do not change the result.
pub fn angle_to_minutes(angle: f64) -> u32 {
    let clamped = clamp_angle(angle);

    let total_steps = (MAX_MINUTES - MIN_MINUTES) / STEP_MINUTES;
    let angle_per_step = FULL_TURN / (total_steps + 1) as f64;
    let step = (clamped / angle_per_step).floor() as u32;

    (MIN_MINUTES + step * STEP_MINUTES).clamp(MIN_MINUTES, MAX_MINUTES)
}

/// Snap an arbitrary minute count onto the dial grid.
pub fn snap_minutes(minutes: u32) -> u32 {
    let clamped = minutes.clamp(MIN_MINUTES, MAX_MINUTES);
    let steps = (clamped - MIN_MINUTES + STEP_MINUTES / 2) / STEP_MINUTES;

    (MIN_MINUTES + steps * STEP_MINUTES).min(MAX_MINUTES)
}

/// Point at `angle` degrees on a circle, with 0° straight up and angles
/// growing clockwise.
pub fn point_on_circle(cx: f64, cy: f64, radius: f64, angle: f64) -> Point {
    let radian = (angle - 90.0).to_radians();

    Point {
        x: cx + radius * radian.cos(),
        y: cy + radius * radian.sin(),
    }
}

/// Angle of `(px, py)` around `(cx, cy)` in `[0, 360)`, same orientation as
/// [`point_on_circle`].
pub fn angle_from_point(cx: f64, cy: f64, px: f64, py: f64) -> f64 {
    let dx = px - cx;
    let dy = py - cy;

    let angle = dy.atan2(dx).to_degrees() + 90.0;
    let normalized = angle.rem_euclid(FULL_TURN);

    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= FULL_TURN {
        0.0
    } else {
        normalized
    }
}

/// `MM:SS`, minutes are not capped at 59.
pub fn format_time(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    format!("{:02}:{:02}", minutes, seconds)
}

/// Sweep actually drawn for a dial angle.
pub fn display_sweep(angle: f64) -> f64 {
    clamp_angle(angle).max(MIN_DISPLAY_ANGLE)
}

/// Samples of the clockwise arc from 12 o'clock through `sweep` degrees.
///
/// Always returns `segments + 1` points including both ends.
pub fn arc_points(cx: f64, cy: f64, radius: f64, sweep: f64, segments: usize) -> Vec<Point> {
    let sweep = clamp_angle(sweep);
    let segments = segments.max(1);

    (0..=segments)
        .map(|i| {
            let angle = sweep * i as f64 / segments as f64;
            point_on_circle(cx, cy, radius, angle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn angular_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).abs().rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn test_minutes_to_angle_endpoints() {
        assert_eq!(minutes_to_angle(MIN_MINUTES), 0.0);
        assert_eq!(minutes_to_angle(MAX_MINUTES), 360.0);
        assert!((minutes_to_angle(15) - 10.0 * 360.0 / 175.0).abs() < EPS);
    }

    #[test]
    fn test_minutes_to_angle_clamps() {
        assert_eq!(minutes_to_angle(0), 0.0);
        assert_eq!(minutes_to_angle(1000), 360.0);
    }

    #[test]
    fn test_round_trip_on_grid() {
        for m in (MIN_MINUTES..=MAX_MINUTES).step_by(STEP_MINUTES as usize) {
            assert_eq!(angle_to_minutes(minutes_to_angle(m)), m, "minutes {m}");
        }
    }

    #[test]
    fn test_angle_to_minutes_stays_on_grid() {
        let mut angle = 0.0;
        while angle <= 360.0 {
            let m = angle_to_minutes(angle);
            assert!((MIN_MINUTES..=MAX_MINUTES).contains(&m));
            assert_eq!(m % STEP_MINUTES, 0);
            angle += 0.25;
        }
    }

    #[test]
    fn test_angle_to_minutes_floors_at_boundaries() {
        // 36 slots of 10 degrees each
        assert_eq!(angle_to_minutes(9.999), 5);
        assert_eq!(angle_to_minutes(10.0), 10);
        assert_eq!(angle_to_minutes(19.99), 10);
        assert_eq!(angle_to_minutes(350.0), 180);
        assert_eq!(angle_to_minutes(360.0), 180);
    }

    #[test]
    fn test_angle_to_minutes_clamps_out_of_range() {
        assert_eq!(angle_to_minutes(-45.0), MIN_MINUTES);
        assert_eq!(angle_to_minutes(720.0), MAX_MINUTES);
        assert_eq!(angle_to_minutes(f64::NAN), MIN_MINUTES);
    }

    #[test]
    fn test_snap_minutes() {
        assert_eq!(snap_minutes(0), 5);
        assert_eq!(snap_minutes(12), 10);
        assert_eq!(snap_minutes(13), 15);
        assert_eq!(snap_minutes(25), 25);
        assert_eq!(snap_minutes(999), 180);
    }

    #[test]
    fn test_point_on_circle_orientation() {
        let top = point_on_circle(0.0, 0.0, 10.0, 0.0);
        assert!(top.x.abs() < EPS);
        assert!((top.y + 10.0).abs() < EPS);

        let right = point_on_circle(0.0, 0.0, 10.0, 90.0);
        assert!((right.x - 10.0).abs() < EPS);
        assert!(right.y.abs() < EPS);

        let bottom = point_on_circle(0.0, 0.0, 10.0, 180.0);
        assert!((bottom.y - 10.0).abs() < EPS);
    }

    #[test]
    fn test_angle_from_point_orientation() {
        assert!(angle_from_point(5.0, 5.0, 5.0, 0.0).abs() < EPS);
        assert!((angle_from_point(5.0, 5.0, 10.0, 5.0) - 90.0).abs() < EPS);
        assert!((angle_from_point(5.0, 5.0, 5.0, 10.0) - 180.0).abs() < EPS);
        assert!((angle_from_point(5.0, 5.0, 0.0, 5.0) - 270.0).abs() < EPS);
    }

    #[test]
    fn test_point_angle_round_trip() {
        let (cx, cy, r) = (40.0, 25.0, 12.5);
        let mut theta = 0.0;
        while theta < 360.0 {
            let p = point_on_circle(cx, cy, r, theta);
            let back = angle_from_point(cx, cy, p.x, p.y);
            assert!((0.0..360.0).contains(&back));
            assert!(angular_distance(back, theta) < 1e-6, "theta {theta} -> {back}");
            theta += 7.5;
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(3600), "60:00");
        assert_eq!(format_time(180 * 60 + 59), "180:59");
    }

    #[test]
    fn test_display_sweep() {
        assert_eq!(display_sweep(0.0), MIN_DISPLAY_ANGLE);
        assert_eq!(display_sweep(90.0), 90.0);
        assert_eq!(display_sweep(400.0), 360.0);
    }

    #[test]
    fn test_arc_points() {
        let points = arc_points(0.0, 0.0, 1.0, 90.0, 4);
        assert_eq!(points.len(), 5);
        assert!((points[0].y + 1.0).abs() < EPS);
        assert!((points[4].x - 1.0).abs() < EPS);

        assert_eq!(arc_points(0.0, 0.0, 1.0, 90.0, 0).len(), 2);
    }
}
