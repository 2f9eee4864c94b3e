//! Overlay annotation definitions.

mod image;
mod rectangle;
mod text;

pub use image::Image;
pub use rectangle::Rectangle;
pub use text::{ApproximateTextMeasure, Text, TextMeasure};

use kurbo::{Point, Rect, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 1-based page number within the open document.
pub type PageIndex = u32;

/// Stable handle to one annotation in the store.
pub type AnnotationId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Indigo accent used for new rectangles and selection decoration.
    pub fn accent() -> Self {
        Self::new(0x63, 0x66, 0xf1, 255)
    }

    /// Parse a CSS hex color (`#rgb`, `#rrggbb` or `#rrggbbaa`).
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for SerializableColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| format!("invalid hex color: {}", s))
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Discriminant of an [`Annotation`], used by tools, profiles and the property panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Rectangle,
    Text,
    Image,
}

impl AnnotationKind {
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationKind::Rectangle => "rect",
            AnnotationKind::Text => "text",
            AnnotationKind::Image => "image",
        }
    }
}

/// A property-panel edit applied to the selected annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum AnnotationPatch {
    Width(f64),
    Height(f64),
    Content(String),
    Color(SerializableColor),
    FontSize(f64),
}

/// Sanitize a user-entered magnitude: non-finite or negative values clamp to zero.
pub(crate) fn clamp_magnitude(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// An overlay annotation. Geometry is always in view space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Annotation {
    Rectangle(Rectangle),
    Text(Text),
    Image(Image),
}

impl Annotation {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Rectangle(_) => AnnotationKind::Rectangle,
            Annotation::Text(_) => AnnotationKind::Text,
            Annotation::Image(_) => AnnotationKind::Image,
        }
    }

    pub fn page(&self) -> PageIndex {
        match self {
            Annotation::Rectangle(r) => r.page,
            Annotation::Text(t) => t.page,
            Annotation::Image(i) => i.page,
        }
    }

    /// Anchor point: top-left for boxes, baseline start for text.
    pub fn origin(&self) -> Point {
        match self {
            Annotation::Rectangle(r) => r.origin,
            Annotation::Text(t) => t.origin,
            Annotation::Image(i) => i.origin,
        }
    }

    pub fn set_origin(&mut self, origin: Point) {
        match self {
            Annotation::Rectangle(r) => r.origin = origin,
            Annotation::Text(t) => t.origin = origin,
            Annotation::Image(i) => i.origin = origin,
        }
    }

    /// Box size for rectangles and images; text has no stored size.
    pub fn size(&self) -> Option<Size> {
        match self {
            Annotation::Rectangle(r) => Some(r.size),
            Annotation::Image(i) => Some(i.size),
            Annotation::Text(_) => None,
        }
    }

    /// Bounding box in view space. Text bounds depend on the measured width.
    pub fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        match self {
            Annotation::Rectangle(r) => r.as_rect(),
            Annotation::Text(t) => t.bounds(measure),
            Annotation::Image(i) => i.as_rect(),
        }
    }

    /// Check if a view-space point falls inside this annotation.
    pub fn hit_test(&self, point: Point, measure: &dyn TextMeasure) -> bool {
        match self {
            Annotation::Rectangle(r) => r.contains(point),
            Annotation::Text(t) => t.contains(point, measure),
            Annotation::Image(i) => i.contains(point),
        }
    }

    /// Apply a property-panel edit. Returns false when the field does not
    /// exist on this kind of annotation.
    pub fn apply(&mut self, patch: AnnotationPatch) -> bool {
        match (self, patch) {
            (Annotation::Rectangle(r), AnnotationPatch::Width(w)) => {
                r.size.width = clamp_magnitude(w);
                true
            }
            (Annotation::Rectangle(r), AnnotationPatch::Height(h)) => {
                r.size.height = clamp_magnitude(h);
                true
            }
            (Annotation::Rectangle(r), AnnotationPatch::Color(c)) => {
                r.stroke_color = c;
                true
            }
            (Annotation::Image(i), AnnotationPatch::Width(w)) => {
                i.size.width = clamp_magnitude(w);
                true
            }
            (Annotation::Image(i), AnnotationPatch::Height(h)) => {
                i.size.height = clamp_magnitude(h);
                true
            }
            (Annotation::Text(t), AnnotationPatch::Content(content)) => {
                t.content = content;
                true
            }
            (Annotation::Text(t), AnnotationPatch::Color(c)) => {
                t.color = c;
                true
            }
            (Annotation::Text(t), AnnotationPatch::FontSize(size))
                if size.is_finite() && size > 0.0 =>
            {
                t.font_size = size;
                true
            }
            _ => false,
        }
    }

    pub fn as_rectangle(&self) -> Option<&Rectangle> {
        match self {
            Annotation::Rectangle(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Annotation::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Annotation::Image(i) => Some(i),
            _ => None,
        }
    }
}

impl From<Rectangle> for Annotation {
    fn from(rect: Rectangle) -> Self {
        Annotation::Rectangle(rect)
    }
}

impl From<Text> for Annotation {
    fn from(text: Text) -> Self {
        Annotation::Text(text)
    }
}

impl From<Image> for Annotation {
    fn from(image: Image) -> Self {
        Annotation::Image(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_roundtrip() {
        let color = SerializableColor::from_hex("#ff0000").unwrap();
        assert_eq!(color, SerializableColor::new(255, 0, 0, 255));
        assert_eq!(color.to_hex(), "#ff0000");
    }

    #[test]
    fn test_color_short_and_alpha_forms() {
        assert_eq!(
            SerializableColor::from_hex("#0f8"),
            Some(SerializableColor::new(0, 255, 136, 255))
        );
        let translucent = SerializableColor::from_hex("#11223380").unwrap();
        assert_eq!(translucent.a, 0x80);
        assert_eq!(translucent.to_hex(), "#11223380");
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert!(SerializableColor::from_hex("red").is_none());
        assert!(SerializableColor::from_hex("#12345").is_none());
        assert!(SerializableColor::from_hex("#gggggg").is_none());
        assert!(SerializableColor::from_hex("#ééé").is_none());
    }

    #[test]
    fn test_color_serde_as_string() {
        let json = serde_json::to_string(&SerializableColor::accent()).unwrap();
        assert_eq!(json, "\"#6366f1\"");
        let back: SerializableColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SerializableColor::accent());
    }

    #[test]
    fn test_patch_width_on_rectangle() {
        let mut ann =
            Annotation::from(Rectangle::new(1, Point::new(0.0, 0.0), Size::new(10.0, 10.0)));
        assert!(ann.apply(AnnotationPatch::Width(200.0)));
        assert!(ann.apply(AnnotationPatch::Height(-5.0)));
        assert_eq!(ann.size(), Some(Size::new(200.0, 0.0)));
    }

    #[test]
    fn test_patch_ignored_for_wrong_kind() {
        let mut ann = Annotation::from(Text::new(1, Point::new(5.0, 5.0), "Hi".to_string()));
        assert!(!ann.apply(AnnotationPatch::Width(10.0)));
        assert!(!ann.apply(AnnotationPatch::FontSize(0.0)));
        assert!(ann.apply(AnnotationPatch::Content("Hello".to_string())));
        assert_eq!(ann.as_text().map(|t| t.content.as_str()), Some("Hello"));
    }

    #[test]
    fn test_set_origin_keeps_size() {
        let mut ann =
            Annotation::from(Rectangle::new(2, Point::new(1.0, 2.0), Size::new(3.0, 4.0)));
        ann.set_origin(Point::new(50.0, 60.0));
        assert_eq!(ann.origin(), Point::new(50.0, 60.0));
        assert_eq!(ann.size(), Some(Size::new(3.0, 4.0)));
        assert_eq!(ann.page(), 2);
    }
}
