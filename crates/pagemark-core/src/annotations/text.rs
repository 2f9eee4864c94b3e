//! Text annotation.

use super::{PageIndex, SerializableColor};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Measures rendered text width in view-space pixels.
///
/// The overlay surface implements this with real font metrics so that hit
/// testing and selection outlines agree with what was drawn.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// Character-count based estimate, used when no surface is attached.
#[derive(Debug, Clone, Copy)]
pub struct ApproximateTextMeasure {
    /// Average glyph advance as a fraction of the font size.
    pub char_width_factor: f64,
}

impl Default for ApproximateTextMeasure {
    fn default() -> Self {
        Self {
            char_width_factor: 0.6,
        }
    }
}

impl TextMeasure for ApproximateTextMeasure {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.char_width_factor
    }
}

/// A single line of text placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// Page the text lives on.
    pub page: PageIndex,
    /// Start of the baseline in view space.
    pub origin: Point,
    /// The text content.
    pub content: String,
    /// Fill color.
    pub color: SerializableColor,
    /// Font size in points. Not scaled when serialized.
    pub font_size: f64,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Create a new text annotation in black at the default size.
    pub fn new(page: PageIndex, origin: Point, content: String) -> Self {
        Self {
            page,
            origin,
            content,
            color: SerializableColor::black(),
            font_size: Self::DEFAULT_FONT_SIZE,
        }
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Approximate box: measured width, font size as ascent, no descent.
    pub fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        let width = measure.text_width(&self.content, self.font_size);
        Rect::new(
            self.origin.x,
            self.origin.y - self.font_size,
            self.origin.x + width,
            self.origin.y,
        )
    }

    pub fn contains(&self, point: Point, measure: &dyn TextMeasure) -> bool {
        let bounds = self.bounds(measure);
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return false;
        }
        point.x >= bounds.x0 && point.x <= bounds.x1 && point.y >= bounds.y0 && point.y <= bounds.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedWidth(f64);

    impl TextMeasure for FixedWidth {
        fn text_width(&self, _text: &str, _font_size: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_text_creation() {
        let text = Text::new(1, Point::new(100.0, 100.0), "Hello".to_string());
        assert_eq!(text.content, "Hello");
        assert!((text.font_size - Text::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds_sit_above_baseline() {
        let text =
            Text::new(1, Point::new(30.0, 40.0), "Approved".to_string()).with_font_size(20.0);
        let bounds = text.bounds(&FixedWidth(80.0));
        assert!((bounds.x0 - 30.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let text = Text::new(1, Point::new(30.0, 40.0), "Approved".to_string());
        let measure = FixedWidth(80.0);
        assert!(text.contains(Point::new(50.0, 30.0), &measure));
        assert!(text.contains(Point::new(30.0, 40.0), &measure));
        // Below the baseline: no descent compensation.
        assert!(!text.contains(Point::new(50.0, 45.0), &measure));
        assert!(!text.contains(Point::new(111.0, 30.0), &measure));
    }

    #[test]
    fn test_empty_text_is_not_hit() {
        let text = Text::new(1, Point::new(30.0, 40.0), String::new());
        assert!(!text.contains(Point::new(30.0, 30.0), &ApproximateTextMeasure::default()));
    }

    #[test]
    fn test_approximate_measure() {
        let measure = ApproximateTextMeasure::default();
        assert!((measure.text_width("abcd", 10.0) - 24.0).abs() < 1e-9);
    }
}
