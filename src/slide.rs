//! Slide-to-give-up bar.
//!
//! The handle starts on the right and is dragged leftwards. Progress is the
//! dragged distance over the available travel, clamped to `[0, 1]`.

use std::fmt;

pub const DEFAULT_CANCEL_THRESHOLD: f64 = 1.0;
pub const DEFAULT_COLOR_THRESHOLD: f64 = 0.5;

pub const HANDLE_WIDTH: f64 = 8.0;
pub const HANDLE_MARGIN: f64 = 1.0;
/// Width the handle itself occupies inside the track.
pub const HANDLE_FOOTPRINT: f64 = HANDLE_WIDTH + 2.0 * HANDLE_MARGIN;

pub const BASE_COLOR: &str = "#666666";
pub const DANGER_COLOR: &str = "#FF4444";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideOutcome {
    Cancelled,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `rgb(r, g, b)`. Anything else is black.
    pub fn parse(color: &str) -> Self {
        let color = color.trim();

        if let Some(hex) = color.strip_prefix('#') {
            let channel = |range: std::ops::Range<usize>| {
                hex.get(range)
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .unwrap_or(0)
            };
            return Self::new(channel(0..2), channel(2..4), channel(4..6));
        }

        if let Some(body) = color
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let channels: Vec<u8> = body
                .split(',')
                .filter_map(|c| c.trim().parse::<u8>().ok())
                .collect();
            if let [r, g, b] = channels[..] {
                return Self::new(r, g, b);
            }
        }

        Self::new(0, 0, 0)
    }

    /// Channel-wise linear interpolation, rounded.
    pub fn lerp(self, other: Rgb, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;

        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

pub fn calculate_slide_progress(translation_x: f64, max_distance: f64) -> f64 {
    if max_distance <= 0.0 || !translation_x.is_finite() {
        return 0.0;
    }
    (translation_x.abs() / max_distance).clamp(0.0, 1.0)
}

pub fn should_trigger_cancel(progress: f64, threshold: f64) -> bool {
    progress >= threshold
}

/// Travel available to the handle in a container of `container_width`.
pub fn max_distance_for(container_width: f64) -> f64 {
    (container_width - HANDLE_FOOTPRINT).max(0.0)
}

#[derive(Debug, Clone)]
pub struct SlideToCancel {
    progress: f64,
    max_distance: f64,
    max_distance_override: Option<f64>,
    cancel_threshold: f64,
    color_threshold: f64,
}

impl Default for SlideToCancel {
    fn default() -> Self {
        Self {
            progress: 0.0,
            max_distance: 0.0,
            max_distance_override: None,
            cancel_threshold: DEFAULT_CANCEL_THRESHOLD,
            color_threshold: DEFAULT_COLOR_THRESHOLD,
        }
    }
}

impl SlideToCancel {
    pub fn new(cancel_threshold: f64, color_threshold: f64) -> Self {
        Self {
            cancel_threshold,
            color_threshold,
            ..Self::default()
        }
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance_override = Some(max_distance);
        self.max_distance = max_distance.max(0.0);
        self
    }

    /// Recomputes the travel from the laid out container width, unless an
    /// explicit distance was given.
    pub fn set_container_width(&mut self, width: f64) {
        self.max_distance = match self.max_distance_override {
            Some(distance) => distance.max(0.0),
            None => max_distance_for(width),
        };
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn cancel_threshold(&self) -> f64 {
        self.cancel_threshold
    }

    pub fn color_threshold(&self) -> f64 {
        self.color_threshold
    }

    /// Feeds the drag translation relative to where the drag started.
    pub fn update(&mut self, translation_x: f64) {
        if self.max_distance <= 0.0 {
            return;
        }
        // rightward drags never count
        let leftward = translation_x.min(0.0);
        self.progress = calculate_slide_progress(leftward, self.max_distance);
    }

    pub fn end(&mut self) -> SlideOutcome {
        if should_trigger_cancel(self.progress, self.cancel_threshold) {
            SlideOutcome::Cancelled
        } else {
            self.progress = 0.0;
            SlideOutcome::Reset
        }
    }

    pub fn reset(&mut self) {
        self.progress = 0.0;
    }

    /// Handle translation, negative means left of its resting place.
    pub fn handle_offset(&self) -> f64 {
        -self.progress * self.max_distance
    }

    pub fn track_width_percent(&self) -> f64 {
        self.progress * 100.0
    }

    pub fn is_armed(&self) -> bool {
        self.progress >= self.color_threshold
    }

    pub fn track_color(&self, base: &str, danger: &str) -> Rgb {
        let base = Rgb::parse(base);
        if self.progress < self.color_threshold {
            return base;
        }
        let span = 1.0 - self.color_threshold;
        let t = if span <= 0.0 {
            1.0
        } else {
            (self.progress - self.color_threshold) / span
        };
        base.lerp(Rgb::parse(danger), t)
    }

    pub fn hint_text(&self) -> &'static str {
        if self.progress == 0.0 {
            "slide left to give up"
        } else if self.progress < self.color_threshold {
            "keep sliding to give up"
        } else {
            "give up"
        }
    }
}
