//! Pagemark Core Library
//!
//! Platform-agnostic annotation engine for the Pagemark document overlay
//! editor: geometry, the annotation store, hit testing, the interaction
//! state machine, and the save path to the document backend.

pub mod annotations;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod input;
pub mod pages;
pub mod persistence;
pub mod serialize;
pub mod session;
pub mod store;
pub mod tools;
pub mod viewport;

pub use annotations::{
    Annotation, AnnotationId, AnnotationKind, AnnotationPatch, ApproximateTextMeasure, Image,
    PageIndex, Rectangle, SerializableColor, Text, TextMeasure,
};
pub use config::{ConfigError, EditorConfig};
pub use controller::{ControllerResponse, InteractionState, PanelFields, PanelUpdate};
pub use geometry::{PageScale, SpaceTransform, to_document_space, to_view_space};
pub use hit_test::hit_test;
pub use input::{MouseButton, PointerEvent};
pub use pages::{PageError, PageLoader, PageSource, RasterSurface};
pub use persistence::{
    BoxFuture, MemoryBackend, PersistenceBackend, PersistenceError, SaveOutcome, SaveRequest,
    SaveResponse,
};
#[cfg(feature = "http")]
pub use persistence::HttpBackend;
pub use serialize::{DocumentAnnotation, serialize};
pub use session::{EditorSession, SessionError, SessionStatus};
pub use store::AnnotationStore;
pub use tools::{EditorProfile, ToolKind, ToolManager};
pub use viewport::ViewportState;
