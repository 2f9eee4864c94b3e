//! Displayed page and session scale.

use crate::annotations::PageIndex;
use crate::geometry::PageScale;
use crate::pages::PageError;
use serde::{Deserialize, Serialize};

/// Which page is on screen, at what scale, out of how many.
///
/// Only page navigation changes this; the interaction controller never does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// 1-based page currently displayed.
    pub current_page: PageIndex,
    /// Session-global scale.
    pub scale: PageScale,
    /// Number of pages in the document.
    pub page_count: u32,
}

impl ViewportState {
    /// Start on the first page. Returns None for an empty document.
    pub fn new(page_count: u32, scale: PageScale) -> Option<Self> {
        (page_count > 0).then_some(Self {
            current_page: 1,
            scale,
            page_count,
        })
    }

    pub fn contains(&self, page: PageIndex) -> bool {
        (1..=self.page_count).contains(&page)
    }

    /// Jump to a page.
    pub fn go_to(&mut self, page: PageIndex) -> Result<(), PageError> {
        if !self.contains(page) {
            return Err(PageError::OutOfRange {
                page,
                page_count: self.page_count,
            });
        }
        self.current_page = page;
        Ok(())
    }

    /// Advance one page. Returns false on the last page.
    pub fn next(&mut self) -> bool {
        if self.current_page >= self.page_count {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Go back one page. Returns false on the first page.
    pub fn previous(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.current_page -= 1;
        true
    }
}
