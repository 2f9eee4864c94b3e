//! One editing session over one open document.

use crate::annotations::{
    Annotation, AnnotationId, ApproximateTextMeasure, PageIndex, SerializableColor, TextMeasure,
};
use crate::config::EditorConfig;
use crate::controller::{InteractionState, PanelFields};
use crate::geometry::PageScale;
use crate::pages::{PageError, PageLoader, PageSource, RasterSurface};
use crate::persistence::{
    PersistenceBackend, PersistenceResult, SaveOutcome, SaveRequest, SaveResponse,
};
use crate::serialize::{DocumentAnnotation, serialize};
use crate::store::AnnotationStore;
use crate::tools::{EditorProfile, ToolKind, ToolManager};
use crate::viewport::ViewportState;
use std::fmt;
use thiserror::Error;

/// Session errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Document has no pages")]
    EmptyDocument,
    #[error("Page load failed: {0}")]
    PageLoad(#[from] PageError),
    #[error("Tool {tool} is not available in the {profile} editor")]
    ToolNotSupported { tool: ToolKind, profile: EditorProfile },
}

/// Where the session is in its save lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Editing,
    /// A save request is in flight; edits are ignored.
    Saving,
    /// The backend accepted the annotations.
    Finished { download_url: Option<String> },
}

/// Context object for one document being edited.
///
/// Owns the annotation store, the selection, the viewport, the active tool
/// and style, and the interaction state. Nothing here is global; several
/// sessions can live side by side.
pub struct EditorSession {
    document_id: String,
    profile: EditorProfile,
    config: EditorConfig,
    pub(crate) store: AnnotationStore,
    pub(crate) selection: Option<AnnotationId>,
    viewport: ViewportState,
    pub(crate) tools: ToolManager,
    pub(crate) state: InteractionState,
    pub(crate) signature: Option<String>,
    measure: Box<dyn TextMeasure>,
    status: SessionStatus,
    last_save_error: Option<String>,
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("document_id", &self.document_id)
            .field("profile", &self.profile)
            .field("annotations", &self.store.len())
            .field("selection", &self.selection)
            .field("viewport", &self.viewport)
            .field("tool", &self.tools.current_tool)
            .field("state", &self.state)
            .field("status", &self.status)
            .finish()
    }
}

impl EditorSession {
    /// Start a session over a document with `page_count` pages.
    pub fn new(
        document_id: impl Into<String>,
        profile: EditorProfile,
        config: EditorConfig,
        page_count: u32,
    ) -> Result<Self, SessionError> {
        let viewport =
            ViewportState::new(page_count, config.scale).ok_or(SessionError::EmptyDocument)?;
        let tools = ToolManager::new(config.default_color, config.default_font_size);
        let document_id = document_id.into();
        log::info!(
            "Opened {} ({} pages) in the {} editor",
            document_id,
            page_count,
            profile
        );
        Ok(Self {
            document_id,
            profile,
            config,
            store: AnnotationStore::new(),
            selection: None,
            viewport,
            tools,
            state: InteractionState::Idle,
            signature: None,
            measure: Box::new(ApproximateTextMeasure::default()),
            status: SessionStatus::Editing,
            last_save_error: None,
        })
    }

    /// Load the document's first page and start a session on it.
    ///
    /// Fails without constructing a session when the document is empty or
    /// its first page cannot be rasterized.
    pub async fn open<S: PageSource>(
        document_id: impl Into<String>,
        profile: EditorProfile,
        config: EditorConfig,
        loader: &PageLoader<S>,
    ) -> Result<(Self, RasterSurface), SessionError> {
        let page_count = loader.page_count();
        if page_count == 0 {
            return Err(SessionError::EmptyDocument);
        }
        let surface = loader.render_page(1).await?.ok_or_else(|| {
            PageError::LoadFailed("another render was already in flight".to_string())
        })?;
        let config = config.with_scale(loader.scale());
        let session = Self::new(document_id, profile, config, page_count)?;
        Ok((session, surface))
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn profile(&self) -> EditorProfile {
        self.profile
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn selection(&self) -> Option<AnnotationId> {
        self.selection
    }

    /// The selected annotation, if the handle is still live.
    pub fn selected(&self) -> Option<&Annotation> {
        self.selection.and_then(|id| self.store.get(id))
    }

    /// Panel contents for the current selection.
    pub fn panel_fields(&self) -> Option<PanelFields> {
        self.selected().map(PanelFields::from_annotation)
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn scale(&self) -> PageScale {
        self.viewport.scale
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Reason the most recent save failed, cleared by the next attempt.
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn is_editable(&self) -> bool {
        self.status == SessionStatus::Editing
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, SessionStatus::Finished { .. })
    }

    pub fn text_measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    /// Use the drawing surface's font metrics for hit testing.
    pub fn set_text_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.measure = measure;
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Switch tools. Tools outside this session's profile are rejected.
    pub fn set_tool(&mut self, tool: ToolKind) -> Result<(), SessionError> {
        if !self.profile.supports(tool) {
            return Err(SessionError::ToolNotSupported {
                tool,
                profile: self.profile,
            });
        }
        self.tools.set_tool(tool);
        Ok(())
    }

    /// Color applied to annotations created from now on.
    pub fn current_color(&self) -> SerializableColor {
        self.tools.color
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.tools.color = color;
    }

    pub fn current_font_size(&self) -> f64 {
        self.tools.font_size
    }

    /// Font size for new text. Non-positive or non-finite sizes are ignored.
    pub fn set_font_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.tools.font_size = size;
        }
    }

    /// Remember a drawn signature for later placement.
    pub fn capture_signature(&mut self, data_url: impl Into<String>) {
        let data_url = data_url.into();
        self.signature = (!data_url.is_empty()).then_some(data_url);
    }

    pub fn clear_signature(&mut self) {
        self.signature = None;
    }

    pub fn captured_signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Show a different page. The selection is kept.
    pub fn go_to_page(&mut self, page: PageIndex) -> Result<(), PageError> {
        self.viewport.go_to(page)?;
        log::info!("Showing page {} of {}", page, self.viewport.page_count);
        Ok(())
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.viewport.next();
        if moved {
            log::info!(
                "Showing page {} of {}",
                self.viewport.current_page,
                self.viewport.page_count
            );
        }
        moved
    }

    pub fn previous_page(&mut self) -> bool {
        let moved = self.viewport.previous();
        if moved {
            log::info!(
                "Showing page {} of {}",
                self.viewport.current_page,
                self.viewport.page_count
            );
        }
        moved
    }

    /// All annotations in document space.
    pub fn serialize(&self) -> Vec<DocumentAnnotation> {
        serialize(&self.store, self.scale())
    }

    pub fn save_request(&self) -> SaveRequest {
        SaveRequest {
            document_id: self.document_id.clone(),
            annotations: self.serialize(),
        }
    }

    /// Lock the session for saving and build the request.
    ///
    /// Returns None if a save is already in flight or the session finished.
    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        if !self.is_editable() {
            return None;
        }
        self.status = SessionStatus::Saving;
        self.last_save_error = None;
        self.transition(InteractionState::Idle);
        Some(self.save_request())
    }

    /// Record the backend's reply to a request from `begin_save`.
    pub fn finish_save(&mut self, result: PersistenceResult<SaveResponse>) -> SaveOutcome {
        if self.status != SessionStatus::Saving {
            return SaveOutcome::Skipped;
        }
        match result.and_then(SaveResponse::into_result) {
            Ok(download_url) => {
                log::info!("Saved {} annotations for {}", self.store.len(), self.document_id);
                self.status = SessionStatus::Finished {
                    download_url: download_url.clone(),
                };
                SaveOutcome::Completed { download_url }
            }
            Err(e) => {
                log::warn!("Save failed for {}: {}", self.document_id, e);
                let reason = e.to_string();
                self.status = SessionStatus::Editing;
                self.last_save_error = Some(reason.clone());
                SaveOutcome::Failed { reason }
            }
        }
    }

    /// Serialize and post the annotations to `backend`.
    pub async fn save(&mut self, backend: &dyn PersistenceBackend) -> SaveOutcome {
        let Some(request) = self.begin_save() else {
            return SaveOutcome::Skipped;
        };
        let result = backend.save(&request).await;
        self.finish_save(result)
    }
}
