//! Pointer events in view space.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` code.
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }
}

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are view-space pixels relative to the page's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_buttons() {
        assert_eq!(MouseButton::from_dom(0), Some(MouseButton::Left));
        assert_eq!(MouseButton::from_dom(2), Some(MouseButton::Right));
        assert_eq!(MouseButton::from_dom(7), None);
    }
}
