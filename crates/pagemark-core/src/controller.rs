//! Pointer-driven interaction state machine.

use crate::annotations::{
    Annotation, AnnotationId, AnnotationKind, AnnotationPatch, Image, PageIndex, Rectangle,
    SerializableColor, Text,
};
use crate::hit_test::hit_test;
use crate::input::{MouseButton, PointerEvent};
use crate::session::{EditorSession, SessionError};
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Moving an annotation; `grab_offset` is pointer minus origin at grab time.
    Dragging { id: AnnotationId, grab_offset: Vec2 },
    /// Waiting for the shell's text prompt to resolve.
    AwaitingTextInput { page: PageIndex, at: Point },
}

impl InteractionState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, InteractionState::Dragging { .. })
    }

    pub fn is_awaiting_text(&self) -> bool {
        matches!(self, InteractionState::AwaitingTextInput { .. })
    }
}

/// Values shown in the property panel for the selected annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelFields {
    pub kind: AnnotationKind,
    /// Rounded width, rectangles and images only.
    pub width: Option<f64>,
    /// Rounded height, rectangles and images only.
    pub height: Option<f64>,
    pub content: Option<String>,
    pub color: Option<SerializableColor>,
    pub font_size: Option<f64>,
}

impl PanelFields {
    pub fn from_annotation(annotation: &Annotation) -> Self {
        match annotation {
            Annotation::Rectangle(r) => Self {
                kind: AnnotationKind::Rectangle,
                width: Some(r.size.width.round()),
                height: Some(r.size.height.round()),
                content: None,
                color: Some(r.stroke_color),
                font_size: None,
            },
            Annotation::Text(t) => Self {
                kind: AnnotationKind::Text,
                width: None,
                height: None,
                content: Some(t.content.clone()),
                color: Some(t.color),
                font_size: Some(t.font_size),
            },
            Annotation::Image(i) => Self {
                kind: AnnotationKind::Image,
                width: Some(i.size.width.round()),
                height: Some(i.size.height.round()),
                content: None,
                color: None,
                font_size: None,
            },
        }
    }
}

/// Property panel refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelUpdate {
    /// Nothing selected.
    Empty,
    Show(PanelFields),
}

/// Tells the shell what to refresh after a controller call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerResponse {
    /// The overlay must be redrawn.
    pub redraw: bool,
    /// The property panel must be refreshed.
    pub panel: Option<PanelUpdate>,
    /// The shell should open its text prompt.
    pub prompt_text: bool,
}

impl ControllerResponse {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    fn with_panel(mut self, panel: PanelUpdate) -> Self {
        self.panel = Some(panel);
        self
    }

    fn showing(annotation: Option<&Annotation>) -> Self {
        let panel = annotation
            .map(|a| PanelUpdate::Show(PanelFields::from_annotation(a)))
            .unwrap_or(PanelUpdate::Empty);
        Self::redraw().with_panel(panel)
    }
}

impl EditorSession {
    /// Dispatch a raw pointer event. Only the primary button starts interactions.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> ControllerResponse {
        match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.pointer_down(position),
            PointerEvent::Down { .. } => ControllerResponse::none(),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(),
        }
    }

    /// Pointer pressed at a view-space point on the current page.
    pub fn pointer_down(&mut self, point: Point) -> ControllerResponse {
        if !self.is_editable() || self.state.is_awaiting_text() {
            return ControllerResponse::none();
        }
        let page = self.viewport().current_page;

        match self.tools.current_tool {
            ToolKind::Select => {
                match hit_test(point, &self.store, page, self.text_measure()) {
                    Some(id) => {
                        let origin = self.store.get(id).map(|a| a.origin()).unwrap_or(point);
                        self.selection = Some(id);
                        self.transition(InteractionState::Dragging {
                            id,
                            grab_offset: point - origin,
                        });
                    }
                    None => {
                        self.selection = None;
                        self.transition(InteractionState::Idle);
                    }
                }
                ControllerResponse::showing(self.selected())
            }
            ToolKind::Rectangle => {
                let rect = Rectangle::new(page, point, self.config().default_rect_size)
                    .with_color(self.tools.color);
                let id = self.store.add(rect);
                log::debug!("Created rectangle {} on page {}", id, page);
                self.tools.set_tool(ToolKind::Select);
                self.selection = Some(id);
                self.transition(InteractionState::Dragging {
                    id,
                    grab_offset: Vec2::ZERO,
                });
                ControllerResponse::showing(self.selected())
            }
            ToolKind::Text => {
                self.transition(InteractionState::AwaitingTextInput { page, at: point });
                ControllerResponse {
                    prompt_text: true,
                    ..ControllerResponse::none()
                }
            }
            // Images are placed through `add_signature`.
            ToolKind::Image => ControllerResponse::none(),
        }
    }

    /// Pointer moved. Only matters while dragging.
    pub fn pointer_move(&mut self, point: Point) -> ControllerResponse {
        if !self.is_editable() {
            return ControllerResponse::none();
        }
        let InteractionState::Dragging { id, grab_offset } = self.state else {
            return ControllerResponse::none();
        };
        match self.store.get_mut(id) {
            Some(annotation) => {
                annotation.set_origin(point - grab_offset);
                ControllerResponse::showing(Some(&*annotation))
            }
            None => {
                self.transition(InteractionState::Idle);
                ControllerResponse::none()
            }
        }
    }

    /// Pointer released anywhere. Ends a drag; a pending text prompt stays open.
    pub fn pointer_up(&mut self) -> ControllerResponse {
        if self.state.is_dragging() {
            self.transition(InteractionState::Idle);
        }
        ControllerResponse::none()
    }

    /// Resolve the text prompt with the entered content.
    pub fn confirm_text(&mut self, content: &str) -> ControllerResponse {
        let InteractionState::AwaitingTextInput { page, at } = self.state else {
            return ControllerResponse::none();
        };
        self.transition(InteractionState::Idle);
        if content.trim().is_empty() {
            return ControllerResponse::none();
        }

        let text = Text::new(page, at, content.to_string())
            .with_color(self.tools.color)
            .with_font_size(self.tools.font_size);
        let id = self.store.add(text);
        log::debug!("Created text {} on page {}", id, page);
        self.selection = Some(id);
        ControllerResponse::showing(self.selected())
    }

    /// Dismiss the text prompt without creating anything.
    pub fn cancel_text(&mut self) -> ControllerResponse {
        if self.state.is_awaiting_text() {
            self.transition(InteractionState::Idle);
        }
        ControllerResponse::none()
    }

    /// Place a signature image on the current page and select it.
    pub fn add_signature(&mut self, data_url: &str) -> Result<ControllerResponse, SessionError> {
        if !self.profile().supports(ToolKind::Image) {
            return Err(SessionError::ToolNotSupported {
                tool: ToolKind::Image,
                profile: self.profile(),
            });
        }
        if data_url.is_empty() || !self.is_editable() {
            return Ok(ControllerResponse::none());
        }

        let page = self.viewport().current_page;
        let image = Image::new(
            page,
            self.config().signature_origin,
            self.config().signature_size,
            data_url.to_string(),
        );
        let id = self.store.add(image);
        log::debug!("Placed signature {} on page {}", id, page);
        self.selection = Some(id);
        self.transition(InteractionState::Idle);
        Ok(ControllerResponse::showing(self.selected()))
    }

    /// Place the captured signature, if any.
    pub fn add_captured_signature(&mut self) -> Result<ControllerResponse, SessionError> {
        let data_url = self.signature.clone().unwrap_or_default();
        self.add_signature(&data_url)
    }

    /// Remove the selected annotation.
    pub fn delete_selected(&mut self) -> ControllerResponse {
        if !self.is_editable() {
            return ControllerResponse::none();
        }
        let Some(id) = self.selection.take() else {
            return ControllerResponse::none();
        };
        if self.store.remove(id).is_some() {
            log::debug!("Removed annotation {}", id);
        }
        self.transition(InteractionState::Idle);
        ControllerResponse::redraw().with_panel(PanelUpdate::Empty)
    }

    /// Apply a property-panel edit to the selection.
    pub fn apply_patch(&mut self, patch: AnnotationPatch) -> ControllerResponse {
        if !self.is_editable() {
            return ControllerResponse::none();
        }
        match self.selection {
            Some(id) if self.store.update(id, patch) => ControllerResponse::redraw(),
            _ => ControllerResponse::none(),
        }
    }

    pub(crate) fn transition(&mut self, next: InteractionState) {
        if self.state != next {
            log::debug!("Interaction {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}
