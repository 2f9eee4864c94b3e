//! Page rasterization seam.
//!
//! The document renderer is external; this module only defines what the
//! editor needs from it and guards against overlapping page renders.

use crate::annotations::PageIndex;
use crate::geometry::PageScale;
use crate::persistence::BoxFuture;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use thiserror::Error;

/// Page loading errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
    #[error("Failed to load page: {0}")]
    LoadFailed(String),
    #[error("Page {page} out of range (document has {page_count} pages)")]
    OutOfRange { page: PageIndex, page_count: u32 },
}

/// Pixel dimensions of a rasterized page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterSurface {
    pub width: u32,
    pub height: u32,
}

/// A paginated document that can rasterize its pages.
pub trait PageSource {
    /// Total number of pages.
    fn page_count(&self) -> u32;

    /// Rasterize a 1-based page at `scale`.
    fn page_surface(
        &self,
        page: PageIndex,
        scale: PageScale,
    ) -> BoxFuture<'_, Result<RasterSurface, PageError>>;
}

/// Resets the in-flight flag when a render finishes or is dropped.
struct RenderGuard<'a>(&'a Cell<bool>);

impl<'a> RenderGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for RenderGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Renders pages one at a time and caches the result per page.
pub struct PageLoader<S> {
    source: S,
    scale: PageScale,
    rendering: Cell<bool>,
    cache: RefCell<HashMap<PageIndex, RasterSurface>>,
}

impl<S: PageSource> PageLoader<S> {
    pub fn new(source: S, scale: PageScale) -> Self {
        Self {
            source,
            scale,
            rendering: Cell::new(false),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn page_count(&self) -> u32 {
        self.source.page_count()
    }

    pub fn scale(&self) -> PageScale {
        self.scale
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether a render is currently in flight.
    pub fn is_rendering(&self) -> bool {
        self.rendering.get()
    }

    pub fn cached(&self, page: PageIndex) -> Option<RasterSurface> {
        self.cache.borrow().get(&page).copied()
    }

    /// Render a page, reusing the cached surface when there is one.
    ///
    /// Returns `Ok(None)` when another render is still in flight; the request
    /// is dropped, not queued.
    pub async fn render_page(&self, page: PageIndex) -> Result<Option<RasterSurface>, PageError> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PageError::OutOfRange { page, page_count });
        }

        let Some(_guard) = RenderGuard::acquire(&self.rendering) else {
            log::warn!("Ignoring render of page {} while another render is in flight", page);
            return Ok(None);
        };

        if let Some(surface) = self.cached(page) {
            return Ok(Some(surface));
        }

        let surface = self.source.page_surface(page, self.scale).await?;
        self.cache.borrow_mut().insert(page, surface);
        log::debug!("Rendered page {} at {}x{}", page, surface.width, surface.height);
        Ok(Some(surface))
    }
}
