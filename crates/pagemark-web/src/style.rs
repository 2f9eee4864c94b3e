//! Conversions from engine values to what the browser consumes.

use pagemark_core::{ControllerResponse, PanelUpdate};
use peniko::Color;
use serde_json::{Value, json};

/// CSS `rgba()` form of a color.
pub fn css_color(color: Color) -> String {
    let rgba = color.to_rgba8();
    if rgba.a == 255 {
        format!("rgb({}, {}, {})", rgba.r, rgba.g, rgba.b)
    } else {
        format!(
            "rgba({}, {}, {}, {:.3})",
            rgba.r,
            rgba.g,
            rgba.b,
            rgba.a as f64 / 255.0
        )
    }
}

/// JSON handed back to the host page after each controller call.
///
/// `panel` is absent when the panel should stay as is, `null` for the
/// empty state, and an object of fields otherwise.
pub fn response_json(response: &ControllerResponse) -> Value {
    let mut out = json!({
        "redraw": response.redraw,
        "promptText": response.prompt_text,
    });
    if let Some(panel) = &response.panel {
        out["panel"] = match panel {
            PanelUpdate::Empty => Value::Null,
            PanelUpdate::Show(fields) => json!({
                "kind": fields.kind.name(),
                "width": fields.width,
                "height": fields.height,
                "content": fields.content,
                "color": fields.color.map(|c| c.to_hex()),
                "fontSize": fields.font_size,
            }),
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagemark_core::{AnnotationKind, PanelFields};

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(Color::from_rgba8(99, 102, 241, 255)), "rgb(99, 102, 241)");
        assert_eq!(css_color(Color::from_rgba8(0, 0, 0, 0)), "rgba(0, 0, 0, 0.000)");
    }

    #[test]
    fn test_response_json() {
        let none = response_json(&ControllerResponse::none());
        assert_eq!(none, json!({"redraw": false, "promptText": false}));

        let empty = response_json(&ControllerResponse {
            redraw: true,
            panel: Some(PanelUpdate::Empty),
            prompt_text: false,
        });
        assert_eq!(empty["panel"], Value::Null);

        let shown = response_json(&ControllerResponse {
            redraw: true,
            panel: Some(PanelUpdate::Show(PanelFields {
                kind: AnnotationKind::Rectangle,
                width: Some(10.0),
                height: Some(20.0),
                content: None,
                color: Some(pagemark_core::SerializableColor::accent()),
                font_size: None,
            })),
            prompt_text: false,
        });
        assert_eq!(shown["panel"]["kind"], "rect");
        assert_eq!(shown["panel"]["width"], 10.0);
        assert_eq!(shown["panel"]["color"], "#6366f1");
    }
}
