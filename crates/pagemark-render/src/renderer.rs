//! Overlay renderer and the surface abstraction it draws on.

use crate::image_cache::{CachedImage, ImageCache};
use kurbo::{Point, Rect, Size};
use pagemark_core::annotations::{Annotation, AnnotationId, PageIndex, TextMeasure};
use pagemark_core::{AnnotationStore, EditorSession};
use peniko::{Color, ImageData};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Surface error: {0}")]
    Surface(String),
    #[error("Image decode failed: {0}")]
    ImageDecode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Stroke width of rectangles and selection outlines.
pub const RECT_LINE_WIDTH: f64 = 2.0;

/// Font shorthand for a text annotation.
pub fn css_font(font_size: f64, family: &str) -> String {
    format!("{}px {}", font_size, family)
}

/// A 2D drawing target in view-space pixels.
///
/// Surfaces also measure text so that hit testing sees the same widths
/// that were drawn.
pub trait OverlaySurface: TextMeasure {
    /// Erase everything.
    fn clear(&mut self, size: Size);

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, line_width: f64);

    /// Fill a single line of text whose baseline starts at `baseline`.
    fn fill_text(&mut self, text: &str, baseline: Point, font_size: f64, color: Color);

    /// Draw a decoded bitmap scaled into `dest`.
    fn draw_image(&mut self, id: AnnotationId, image: &ImageData, dest: Rect) -> RenderResult<()>;
}

/// Context for a single overlay frame.
pub struct RenderContext<'a> {
    /// Annotations to draw from.
    pub store: &'a AnnotationStore,
    /// Page being shown; other pages are skipped.
    pub page: PageIndex,
    /// Annotation to decorate.
    pub selection: Option<AnnotationId>,
    /// Surface size in pixels.
    pub surface_size: Size,
    /// Selection outline and handle stroke.
    pub selection_color: Color,
    /// Handle square edge length.
    pub handle_size: f64,
    /// Fill of undecodable image boxes.
    pub placeholder_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(store: &'a AnnotationStore, page: PageIndex, surface_size: Size) -> Self {
        Self {
            store,
            page,
            selection: None,
            surface_size,
            selection_color: Color::from_rgba8(99, 102, 241, 255),
            handle_size: 6.0,
            placeholder_color: Color::from_rgba8(200, 200, 200, 255),
        }
    }

    /// Context for the page a session is currently showing.
    pub fn from_session(session: &'a EditorSession, surface_size: Size) -> Self {
        let config = session.config();
        Self::new(session.store(), session.viewport().current_page, surface_size)
            .with_selection(session.selection())
            .with_selection_color(config.selection_color.into())
            .with_handle_size(config.handle_size)
    }

    pub fn with_selection(mut self, selection: Option<AnnotationId>) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    pub fn with_handle_size(mut self, size: f64) -> Self {
        self.handle_size = size;
        self
    }
}

/// Overlay renderer holding decoded images between frames.
#[derive(Debug, Default)]
pub struct OverlayRenderer {
    images: ImageCache,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Draw one frame and drop cached images of removed annotations.
    pub fn render(
        &mut self,
        surface: &mut dyn OverlaySurface,
        ctx: &RenderContext,
    ) -> RenderResult<()> {
        render_overlay(surface, ctx, &mut self.images)?;
        self.images.retain(ctx.store);
        Ok(())
    }
}

/// Clear the surface and draw every annotation on the context's page.
pub fn render_overlay(
    surface: &mut dyn OverlaySurface,
    ctx: &RenderContext,
    images: &mut ImageCache,
) -> RenderResult<()> {
    surface.clear(ctx.surface_size);

    for (id, annotation) in ctx.store.for_page(ctx.page) {
        match annotation {
            Annotation::Rectangle(rect) => {
                surface.stroke_rect(rect.as_rect(), rect.stroke_color.into(), RECT_LINE_WIDTH);
            }
            Annotation::Text(text) => {
                surface.fill_text(&text.content, text.origin, text.font_size, text.color.into());
            }
            Annotation::Image(image) => match images.get_or_decode(id, image) {
                CachedImage::Decoded(data) => surface.draw_image(id, data, image.as_rect())?,
                CachedImage::Failed => render_image_placeholder(surface, image.as_rect(), ctx),
            },
        }

        if ctx.selection == Some(id) {
            render_selection(surface, annotation, ctx);
        }
    }
    Ok(())
}

/// Outline plus top-left and bottom-right handle squares.
fn render_selection(
    surface: &mut dyn OverlaySurface,
    annotation: &Annotation,
    ctx: &RenderContext,
) {
    let outline = match annotation {
        Annotation::Text(text) => {
            // The font size stands in for the glyph height.
            let width = surface.text_width(&text.content, text.font_size);
            let height = text.font_size;
            Rect::new(
                text.origin.x - 2.0,
                text.origin.y - height,
                text.origin.x + width + 2.0,
                text.origin.y + 4.0,
            )
        }
        Annotation::Rectangle(rect) => rect.as_rect(),
        Annotation::Image(image) => image.as_rect(),
    };

    surface.stroke_rect(outline, ctx.selection_color, RECT_LINE_WIDTH);
    for corner in [Point::new(outline.x0, outline.y0), Point::new(outline.x1, outline.y1)] {
        render_handle(surface, corner, ctx);
    }
}

fn render_handle(surface: &mut dyn OverlaySurface, center: Point, ctx: &RenderContext) {
    let half = ctx.handle_size / 2.0;
    let square = Rect::new(center.x - half, center.y - half, center.x + half, center.y + half);
    surface.fill_rect(square, Color::WHITE);
    surface.stroke_rect(square, ctx.selection_color, 1.0);
}

/// Gray box with an X for images that couldn't be decoded.
fn render_image_placeholder(surface: &mut dyn OverlaySurface, bounds: Rect, ctx: &RenderContext) {
    let line = Color::from_rgba8(150, 150, 150, 255);
    surface.fill_rect(bounds, ctx.placeholder_color);
    let top_right = Point::new(bounds.x1, bounds.y0);
    let bottom_left = Point::new(bounds.x0, bounds.y1);
    surface.stroke_line(bounds.origin(), Point::new(bounds.x1, bounds.y1), line, RECT_LINE_WIDTH);
    surface.stroke_line(top_right, bottom_left, line, RECT_LINE_WIDTH);
    surface.stroke_rect(bounds, line, 1.0);
}
