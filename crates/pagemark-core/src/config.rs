//! Editor configuration.

use crate::annotations::{Image, Rectangle, SerializableColor, Text};
use crate::geometry::PageScale;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for one editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Zoom factor pages are rasterized at for the whole session.
    pub scale: PageScale,
    /// Size of a rectangle placed with a single click.
    pub default_rect_size: Size,
    /// Where an added signature lands.
    pub signature_origin: Point,
    /// Display size of an added signature.
    pub signature_size: Size,
    /// Initial color picker value.
    pub default_color: SerializableColor,
    /// Initial font size picker value, in points.
    pub default_font_size: f64,
    /// CSS font family used to draw and measure text.
    pub font_family: String,
    /// Outline and handle color of the selected annotation.
    pub selection_color: SerializableColor,
    /// Edge length of the decorative corner handles, in pixels.
    pub handle_size: f64,
    /// Path or URL the save request is posted to.
    pub save_endpoint: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            scale: PageScale::DEFAULT,
            default_rect_size: Rectangle::DEFAULT_SIZE,
            signature_origin: Image::DEFAULT_ORIGIN,
            signature_size: Image::DEFAULT_SIZE,
            default_color: SerializableColor::accent(),
            default_font_size: Text::DEFAULT_FONT_SIZE,
            font_family: "Plus Jakarta Sans".to_string(),
            selection_color: SerializableColor::accent(),
            handle_size: 6.0,
            save_endpoint: "/save-annotations".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_scale(mut self, scale: PageScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("default_rect_size", self.default_rect_size),
            ("signature_size", self.signature_size),
        ];
        for (name, size) in sizes {
            if !(size.width.is_finite() && size.height.is_finite())
                || size.width < 0.0
                || size.height < 0.0
            {
                return Err(ConfigError::Invalid(format!("{} must be non-negative", name)));
            }
        }
        if !(self.default_font_size.is_finite() && self.default_font_size > 0.0) {
            return Err(ConfigError::Invalid("default_font_size must be positive".to_string()));
        }
        if !(self.handle_size.is_finite() && self.handle_size >= 0.0) {
            return Err(ConfigError::Invalid("handle_size must be non-negative".to_string()));
        }
        if self.font_family.trim().is_empty() {
            return Err(ConfigError::Invalid("font_family must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!((config.scale.get() - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.default_rect_size, Size::new(10.0, 10.0));
        assert_eq!(config.signature_origin, Point::new(50.0, 50.0));
        assert_eq!(config.signature_size, Size::new(150.0, 75.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            EditorConfig::from_json(r##"{"scale": 2.0, "default_color": "#ff0000"}"##).unwrap();
        assert!((config.scale.get() - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.default_color, SerializableColor::new(255, 0, 0, 255));
        assert_eq!(config.save_endpoint, "/save-annotations");
    }

    #[test]
    fn test_rejects_bad_scale() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"scale": -1.0}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_bad_font_size() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"default_font_size": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
    }
}
