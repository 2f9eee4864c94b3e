//! Canvas 2D overlay surface.

use crate::style::css_color;
use kurbo::{Point, Rect, Size};
use pagemark_core::AnnotationStore;
use pagemark_core::annotations::{AnnotationId, ApproximateTextMeasure, TextMeasure};
use pagemark_render::{OverlaySurface, RenderResult, RendererError, css_font};
use peniko::{Color, ImageData};
use std::collections::HashMap;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Get the 2D context of a canvas.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("unexpected context type"))
}

/// Measures text with the canvas' own font metrics.
#[derive(Clone)]
pub struct CanvasTextMeasure {
    context: CanvasRenderingContext2d,
    font_family: String,
}

impl CanvasTextMeasure {
    pub fn new(context: CanvasRenderingContext2d, font_family: String) -> Self {
        Self { context, font_family }
    }
}

impl TextMeasure for CanvasTextMeasure {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        self.context.set_font(&css_font(font_size, &self.font_family));
        match self.context.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(_) => ApproximateTextMeasure::default().text_width(text, font_size),
        }
    }
}

/// Overlay surface drawing into an HTML canvas.
pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    measure: CanvasTextMeasure,
    /// Off-screen canvases holding decoded images, so scaling is done by the browser.
    bitmaps: HashMap<AnnotationId, HtmlCanvasElement>,
}

impl Canvas2dSurface {
    pub fn new(canvas: HtmlCanvasElement, font_family: String) -> Result<Self, JsValue> {
        let context = context_2d(&canvas)?;
        let measure = CanvasTextMeasure::new(context.clone(), font_family);
        Ok(Self {
            canvas,
            context,
            measure,
            bitmaps: HashMap::new(),
        })
    }

    pub fn measure(&self) -> CanvasTextMeasure {
        self.measure.clone()
    }

    pub fn size(&self) -> Size {
        Size::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    /// Match the overlay to a freshly rendered page.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    /// Drop bitmaps of annotations that no longer exist.
    pub fn retain_bitmaps(&mut self, store: &AnnotationStore) {
        self.bitmaps.retain(|id, _| store.contains(*id));
    }

    fn bitmap(
        &mut self,
        id: AnnotationId,
        image: &ImageData,
    ) -> Result<HtmlCanvasElement, JsValue> {
        if let Some(bitmap) = self.bitmaps.get(&id) {
            return Ok(bitmap.clone());
        }
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let bitmap: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("not a canvas"))?;
        bitmap.set_width(image.width);
        bitmap.set_height(image.height);

        let pixels = web_sys::ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(image.data.data()),
            image.width,
            image.height,
        )?;
        context_2d(&bitmap)?.put_image_data(&pixels, 0.0, 0.0)?;
        self.bitmaps.insert(id, bitmap.clone());
        Ok(bitmap)
    }
}

impl TextMeasure for Canvas2dSurface {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        self.measure.text_width(text, font_size)
    }
}

impl OverlaySurface for Canvas2dSurface {
    fn clear(&mut self, size: Size) {
        self.context.clear_rect(0.0, 0.0, size.width, size.height);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        self.context.set_stroke_style_str(&css_color(color));
        self.context.set_line_width(line_width);
        self.context.stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.context.set_fill_style_str(&css_color(color));
        self.context.fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, line_width: f64) {
        self.context.set_stroke_style_str(&css_color(color));
        self.context.set_line_width(line_width);
        self.context.begin_path();
        self.context.move_to(from.x, from.y);
        self.context.line_to(to.x, to.y);
        self.context.stroke();
    }

    fn fill_text(&mut self, text: &str, baseline: Point, font_size: f64, color: Color) {
        self.context.set_font(&css_font(font_size, &self.measure.font_family));
        self.context.set_fill_style_str(&css_color(color));
        if let Err(e) = self.context.fill_text(text, baseline.x, baseline.y) {
            log::warn!("fillText failed: {}", js_error(&e));
        }
    }

    fn draw_image(&mut self, id: AnnotationId, image: &ImageData, dest: Rect) -> RenderResult<()> {
        let bitmap = self
            .bitmap(id, image)
            .map_err(|e| RendererError::Surface(js_error(&e)))?;
        self.context
            .draw_image_with_html_canvas_element_and_dw_and_dh(
                &bitmap,
                dest.x0,
                dest.y0,
                dest.width(),
                dest.height(),
            )
            .map_err(|e| RendererError::Surface(js_error(&e)))
    }
}
