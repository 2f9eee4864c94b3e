//! Tool selection and editor profiles.

use crate::annotations::{SerializableColor, Text};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    #[serde(rename = "rect")]
    Rectangle,
    Text,
    Image,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Rectangle => "rect",
            ToolKind::Text => "text",
            ToolKind::Image => "image",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches("tool-") {
            "select" => Ok(ToolKind::Select),
            "rect" | "rectangle" => Ok(ToolKind::Rectangle),
            "text" => Ok(ToolKind::Text),
            "image" | "signature" => Ok(ToolKind::Image),
            other => Err(format!("unknown tool: {}", other)),
        }
    }
}

/// Which surface tool a session serves.
///
/// Both surfaces share one engine; the profile only restricts which tools
/// and annotation kinds are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EditorProfile {
    /// Generic markup: rectangles and text.
    #[default]
    Markup,
    /// Signature placement: images only.
    Signature,
}

impl EditorProfile {
    pub fn tools(&self) -> &'static [ToolKind] {
        match self {
            EditorProfile::Markup => &[ToolKind::Select, ToolKind::Rectangle, ToolKind::Text],
            EditorProfile::Signature => &[ToolKind::Select, ToolKind::Image],
        }
    }

    pub fn supports(&self, tool: ToolKind) -> bool {
        self.tools().contains(&tool)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorProfile::Markup => "markup",
            EditorProfile::Signature => "signature",
        }
    }
}

impl fmt::Display for EditorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EditorProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "markup" | "editor" => Ok(EditorProfile::Markup),
            "signature" | "esign" => Ok(EditorProfile::Signature),
            other => Err(format!("unknown editor mode: {}", other)),
        }
    }
}

/// Current tool plus the style applied to newly created annotations.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Color picker value.
    pub color: SerializableColor,
    /// Font size picker value, in points.
    pub font_size: f64,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            color: SerializableColor::accent(),
            font_size: Text::DEFAULT_FONT_SIZE,
        }
    }
}

impl ToolManager {
    pub fn new(color: SerializableColor, font_size: f64) -> Self {
        Self {
            current_tool: ToolKind::Select,
            color,
            font_size,
        }
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_selection() {
        let mut tm = ToolManager::default();
        assert_eq!(tm.current_tool, ToolKind::Select);
        tm.set_tool(ToolKind::Rectangle);
        assert_eq!(tm.current_tool, ToolKind::Rectangle);
    }

    #[test]
    fn test_parse_tool_names() {
        assert_eq!("tool-rect".parse::<ToolKind>(), Ok(ToolKind::Rectangle));
        assert_eq!("select".parse::<ToolKind>(), Ok(ToolKind::Select));
        assert_eq!("text".parse::<ToolKind>(), Ok(ToolKind::Text));
        assert!("lasso".parse::<ToolKind>().is_err());
    }

    #[test]
    fn test_profiles() {
        assert!(EditorProfile::Markup.supports(ToolKind::Text));
        assert!(!EditorProfile::Markup.supports(ToolKind::Image));
        assert!(EditorProfile::Signature.supports(ToolKind::Image));
        assert!(!EditorProfile::Signature.supports(ToolKind::Rectangle));
        assert_eq!("esign".parse::<EditorProfile>(), Ok(EditorProfile::Signature));
        assert_eq!("markup".parse::<EditorProfile>(), Ok(EditorProfile::Markup));
        assert!("draw".parse::<EditorProfile>().is_err());
    }

    #[test]
    fn test_tool_serde_names() {
        assert_eq!(serde_json::to_string(&ToolKind::Rectangle).unwrap(), "\"rect\"");
        let tool: ToolKind = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(tool, ToolKind::Image);
    }
}
