//! Image annotation for placed signatures.

use super::PageIndex;
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// A bitmap stretched into a box on a page.
///
/// The bitmap is kept as the encoded `data:` URL produced by the signature
/// pad, which is also what the persistence backend receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Page the image lives on.
    pub page: PageIndex,
    /// Top-left corner in view space.
    pub origin: Point,
    /// Display size in view space.
    pub size: Size,
    /// Encoded bitmap, usually `data:image/png;base64,...`.
    pub data_url: String,
}

impl Image {
    /// Where a freshly added signature lands.
    pub const DEFAULT_ORIGIN: Point = Point::new(50.0, 50.0);
    /// Display size of a freshly added signature.
    pub const DEFAULT_SIZE: Size = Size::new(150.0, 75.0);

    pub fn new(page: PageIndex, origin: Point, size: Size, data_url: String) -> Self {
        Self {
            page,
            origin,
            size,
            data_url,
        }
    }

    /// Base64 payload of the data URL, or the whole string when it carries no header.
    fn payload(&self) -> &str {
        match self.data_url.split_once(',') {
            Some((header, payload)) if header.starts_with("data:") => payload,
            _ => &self.data_url,
        }
    }

    /// Get the raw image bytes (decoded from base64).
    pub fn data(&self) -> Option<Vec<u8>> {
        STANDARD.decode(self.payload().trim()).ok()
    }

    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    /// Inclusive containment; zero-area images contain nothing.
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
