//! Pagemark Render Library
//!
//! Draws the annotation overlay of the current page onto a 2D surface.
//! Surfaces are abstract so the same drawing code serves the browser canvas
//! and the recording display list used in tests.

mod display_list;
mod image_cache;
mod renderer;

pub use display_list::{DisplayList, DrawCommand};
pub use image_cache::{CachedImage, ImageCache, decode_image};
pub use renderer::{
    OverlayRenderer, OverlaySurface, RECT_LINE_WIDTH, RenderContext, RenderResult, RendererError,
    css_font, render_overlay,
};
