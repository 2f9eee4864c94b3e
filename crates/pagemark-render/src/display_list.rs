//! Recording surface.

use crate::renderer::{OverlaySurface, RenderResult};
use kurbo::{Point, Rect, Size};
use pagemark_core::annotations::{
    AnnotationId, ApproximateTextMeasure, SerializableColor, TextMeasure,
};
use peniko::{Color, ImageData};

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        size: Size,
    },
    StrokeRect {
        rect: Rect,
        color: SerializableColor,
        line_width: f64,
    },
    FillRect {
        rect: Rect,
        color: SerializableColor,
    },
    StrokeLine {
        from: Point,
        to: Point,
        color: SerializableColor,
        line_width: f64,
    },
    FillText {
        text: String,
        baseline: Point,
        font_size: f64,
        color: SerializableColor,
    },
    DrawImage {
        id: AnnotationId,
        dest: Rect,
        width: u32,
        height: u32,
    },
}

/// Surface that records drawing calls instead of rasterizing them.
///
/// Text is measured with [`ApproximateTextMeasure`] unless another measure
/// is supplied.
#[derive(Debug, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    measure: ApproximateTextMeasure,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_measure(measure: ApproximateTextMeasure) -> Self {
        Self {
            commands: Vec::new(),
            measure,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl TextMeasure for DisplayList {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        self.measure.text_width(text, font_size)
    }
}

impl OverlaySurface for DisplayList {
    fn clear(&mut self, size: Size) {
        // Drawing after a clear only shows the latest frame.
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { size });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color: color.into(),
            line_width,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color: color.into(),
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, line_width: f64) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            color: color.into(),
            line_width,
        });
    }

    fn fill_text(&mut self, text: &str, baseline: Point, font_size: f64, color: Color) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            baseline,
            font_size,
            color: color.into(),
        });
    }

    fn draw_image(&mut self, id: AnnotationId, image: &ImageData, dest: Rect) -> RenderResult<()> {
        self.commands.push(DrawCommand::DrawImage {
            id,
            dest,
            width: image.width,
            height: image.height,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_cache::ImageCache;
    use crate::renderer::{RenderContext, render_overlay};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use pagemark_core::AnnotationStore;
    use pagemark_core::annotations::Image;

    #[test]
    fn test_clear_starts_new_frame() {
        let mut list = DisplayList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        list.clear(Size::new(5.0, 5.0));
        assert_eq!(list.commands(), &[DrawCommand::Clear { size: Size::new(5.0, 5.0) }]);
    }

    #[test]
    fn test_custom_measure() {
        let list = DisplayList::with_measure(ApproximateTextMeasure { char_width_factor: 1.0 });
        assert!((list.text_width("abcd", 10.0) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_records_decoded_image() {
        let img = ::image::RgbaImage::from_pixel(4, 2, ::image::Rgba([0, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), ::image::ImageFormat::Png)
            .unwrap();
        let data_url = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));

        let mut store = AnnotationStore::new();
        let id = store.add(Image::new(1, Image::DEFAULT_ORIGIN, Image::DEFAULT_SIZE, data_url));

        let mut list = DisplayList::new();
        let mut images = ImageCache::new();
        let ctx = RenderContext::new(&store, 1, Size::new(300.0, 300.0));
        render_overlay(&mut list, &ctx, &mut images).unwrap();
        assert_eq!(
            list.commands()[1],
            DrawCommand::DrawImage {
                id,
                dest: Rect::new(50.0, 50.0, 200.0, 125.0),
                width: 4,
                height: 2,
            }
        );
    }
}
