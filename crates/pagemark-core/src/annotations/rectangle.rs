//! Rectangle annotation.

use super::{PageIndex, SerializableColor};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// An outlined rectangle drawn over a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Page the rectangle lives on.
    pub page: PageIndex,
    /// Top-left corner in view space.
    pub origin: Point,
    /// Width and height in view space.
    pub size: Size,
    /// Outline color.
    pub stroke_color: SerializableColor,
}

impl Rectangle {
    /// Size given to rectangles placed with a single click.
    pub const DEFAULT_SIZE: Size = Size::new(10.0, 10.0);

    /// Create a new rectangle with the accent stroke color.
    pub fn new(page: PageIndex, origin: Point, size: Size) -> Self {
        Self {
            page,
            origin,
            size,
            stroke_color: SerializableColor::accent(),
        }
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.stroke_color = color;
        self
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    /// Inclusive containment; zero-area rectangles contain nothing.
    pub fn contains(&self, point: Point) -> bool {
        if self.size.width <= 0.0 || self.size.height <= 0.0 {
            return false;
        }
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.size.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.size.height
    }
}
