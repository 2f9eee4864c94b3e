//! Document-space export of the annotation store.
//!
//! The store keeps view-space geometry; everything leaving the editor is
//! divided by the session scale so the backend sees document units.

use crate::annotations::{Annotation, PageIndex, SerializableColor};
use crate::geometry::{PageScale, to_document_space};
use crate::store::AnnotationStore;
use serde::{Deserialize, Serialize};

/// One annotation in the backend's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DocumentAnnotation {
    /// Text anchored at its baseline start.
    #[serde(rename = "text")]
    Text {
        page: PageIndex,
        x: f64,
        y: f64,
        content: String,
        color: SerializableColor,
        /// Font size in points, not scaled.
        size: f64,
    },
    #[serde(rename = "rect")]
    Rect {
        page: PageIndex,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: SerializableColor,
    },
    /// Image with its original data URL.
    #[serde(rename = "image_base64", alias = "image")]
    Image {
        page: PageIndex,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        image_base64: String,
    },
}

impl DocumentAnnotation {
    pub fn page(&self) -> PageIndex {
        match self {
            DocumentAnnotation::Text { page, .. }
            | DocumentAnnotation::Rect { page, .. }
            | DocumentAnnotation::Image { page, .. } => *page,
        }
    }

    /// Convert a single view-space annotation.
    pub fn from_annotation(annotation: &Annotation, scale: PageScale) -> Self {
        match annotation {
            Annotation::Text(text) => {
                let origin = to_document_space(text.origin, scale);
                DocumentAnnotation::Text {
                    page: text.page,
                    x: origin.x,
                    y: origin.y,
                    content: text.content.clone(),
                    color: text.color,
                    size: text.font_size,
                }
            }
            Annotation::Rectangle(rect) => {
                let bounds = to_document_space(rect.as_rect(), scale);
                DocumentAnnotation::Rect {
                    page: rect.page,
                    x1: bounds.x0,
                    y1: bounds.y0,
                    x2: bounds.x1,
                    y2: bounds.y1,
                    color: rect.stroke_color,
                }
            }
            Annotation::Image(image) => {
                let bounds = to_document_space(image.as_rect(), scale);
                DocumentAnnotation::Image {
                    page: image.page,
                    x1: bounds.x0,
                    y1: bounds.y0,
                    x2: bounds.x1,
                    y2: bounds.y1,
                    image_base64: image.data_url.clone(),
                }
            }
        }
    }
}

/// Export every annotation in insertion order.
pub fn serialize(store: &AnnotationStore, scale: PageScale) -> Vec<DocumentAnnotation> {
    store
        .iter()
        .map(|(_, annotation)| DocumentAnnotation::from_annotation(annotation, scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{Image, Rectangle, Text};
    use kurbo::{Point, Size};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_rect_corners_in_document_space() {
        let mut store = AnnotationStore::new();
        store.add(Rectangle::new(1, Point::new(120.0, 80.0), Size::new(200.0, 100.0)));

        let out = serialize(&store, PageScale::DEFAULT);
        match &out[0] {
            DocumentAnnotation::Rect { page, x1, y1, x2, y2, .. } => {
                assert_eq!(*page, 1);
                assert!(approx(*x1, 80.0));
                assert!(approx(*y1, 53.333333333));
                assert!(approx(*x2, 213.333333333));
                assert!(approx(*y2, 120.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_far_corner_follows_origin_plus_size() {
        let mut store = AnnotationStore::new();
        store.add(Rectangle::new(1, Point::new(100.0, 100.0), Size::new(50.0, 30.0)));
        store.add(Image::new(1, Point::new(100.0, 100.0), Size::new(50.0, 30.0), String::new()));

        for record in serialize(&store, PageScale::new(1.5).unwrap()) {
            let (x1, y1, x2, y2) = match record {
                DocumentAnnotation::Rect { x1, y1, x2, y2, .. }
                | DocumentAnnotation::Image { x1, y1, x2, y2, .. } => (x1, y1, x2, y2),
                other => panic!("unexpected {:?}", other),
            };
            assert!((x1 - 66.67).abs() < 1e-2);
            assert!((y1 - 66.67).abs() < 1e-2);
            assert!((x2 - 100.0).abs() < 1e-2);
            assert!((y2 - 86.67).abs() < 1e-2);
        }
    }

    #[test]
    fn test_text_keeps_font_size() {
        let mut store = AnnotationStore::new();
        store.add(
            Text::new(2, Point::new(22.5, 30.0), "Approved".to_string()).with_font_size(20.0),
        );

        let out = serialize(&store, PageScale::DEFAULT);
        match &out[0] {
            DocumentAnnotation::Text { page, x, y, content, color, size } => {
                assert_eq!(*page, 2);
                assert!(approx(*x, 15.0));
                assert!(approx(*y, 20.0));
                assert_eq!(content, "Approved");
                assert_eq!(*color, SerializableColor::black());
                assert!(approx(*size, 20.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_order_and_json_shape() {
        let mut store = AnnotationStore::new();
        store.add(Image::new(
            1,
            Point::new(50.0, 50.0),
            Size::new(150.0, 75.0),
            "data:image/png;base64,AAAA".to_string(),
        ));
        store.add(Rectangle::new(1, Point::new(0.0, 0.0), Size::new(10.0, 10.0)));

        let json = serde_json::to_value(serialize(&store, PageScale::new(1.0).unwrap())).unwrap();
        assert_eq!(json[0]["type"], "image_base64");
        assert_eq!(json[0]["x2"], 200.0);
        assert_eq!(json[0]["image_base64"], "data:image/png;base64,AAAA");
        assert_eq!(json[1]["type"], "rect");
        assert_eq!(json[1]["color"], "#6366f1");
    }

    #[test]
    fn test_empty_store() {
        assert!(serialize(&AnnotationStore::new(), PageScale::DEFAULT).is_empty());
    }

    #[test]
    fn test_accepts_image_alias() {
        let parsed: DocumentAnnotation = serde_json::from_str(
            r#"{"type":"image","page":1,"x1":0,"y1":0,"x2":1,"y2":1,"image_base64":"data:,"}"#,
        )
        .unwrap();
        assert_eq!(parsed.page(), 1);
    }
}
