//! Transforms between view space and document space.
//!
//! View space is the pixel grid of the page surface as rasterized at the
//! session scale. Document space is the scale-independent point grid the
//! persistence backend works in. The two differ only by a uniform factor.

use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// A point in view space (pixels of the scaled page surface).
pub type ViewPoint = Point;
/// A size in view space.
pub type ViewSize = Size;
/// A point in document space (points).
pub type DocPoint = Point;

/// Session-global zoom factor used when rasterizing pages.
///
/// Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PageScale(f64);

impl PageScale {
    /// Scale used by the editor when none is configured.
    pub const DEFAULT: PageScale = PageScale(1.5);

    /// Create a scale, rejecting zero, negative and non-finite factors.
    pub fn new(factor: f64) -> Option<Self> {
        (factor.is_finite() && factor > 0.0).then_some(Self(factor))
    }

    /// The raw factor.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Affine mapping document space to view space.
    pub fn view_transform(self) -> Affine {
        Affine::scale(self.0)
    }

    /// Affine mapping view space to document space.
    pub fn document_transform(self) -> Affine {
        Affine::scale(1.0 / self.0)
    }
}

impl Default for PageScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for PageScale {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        PageScale::new(value).ok_or_else(|| format!("invalid page scale: {}", value))
    }
}

impl From<PageScale> for f64 {
    fn from(scale: PageScale) -> Self {
        scale.0
    }
}

/// Geometry that can move between view and document space.
pub trait SpaceTransform: Sized {
    /// Convert from view space to document space.
    fn to_document_space(self, scale: PageScale) -> Self;

    /// Convert from document space to view space.
    fn to_view_space(self, scale: PageScale) -> Self;
}

impl SpaceTransform for Point {
    fn to_document_space(self, scale: PageScale) -> Self {
        scale.document_transform() * self
    }

    fn to_view_space(self, scale: PageScale) -> Self {
        scale.view_transform() * self
    }
}

impl SpaceTransform for Size {
    fn to_document_space(self, scale: PageScale) -> Self {
        Size::new(self.width / scale.get(), self.height / scale.get())
    }

    fn to_view_space(self, scale: PageScale) -> Self {
        Size::new(self.width * scale.get(), self.height * scale.get())
    }
}

impl SpaceTransform for Rect {
    // Both corners go through the point transform so the far corner is
    // derived from origin + size as a unit.
    fn to_document_space(self, scale: PageScale) -> Self {
        Rect::from_points(
            self.origin().to_document_space(scale),
            Point::new(self.x1, self.y1).to_document_space(scale),
        )
    }

    fn to_view_space(self, scale: PageScale) -> Self {
        Rect::from_points(
            self.origin().to_view_space(scale),
            Point::new(self.x1, self.y1).to_view_space(scale),
        )
    }
}

/// Convert view-space geometry to document space.
pub fn to_document_space<T: SpaceTransform>(value: T, scale: PageScale) -> T {
    value.to_document_space(scale)
}

/// Convert document-space geometry to view space.
pub fn to_view_space<T: SpaceTransform>(value: T, scale: PageScale) -> T {
    value.to_view_space(scale)
}
