//! Page source backed by the host page's document renderer.

use js_sys::{Promise, Reflect};
use pagemark_core::annotations::PageIndex;
use pagemark_core::{BoxFuture, PageError, PageScale, PageSource, RasterSurface};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    /// JS adapter over the document renderer.
    ///
    /// `renderPage(page, scale)` draws the page into the host's page canvas
    /// and resolves to `{ width, height }` in pixels.
    pub type HostDocument;

    #[wasm_bindgen(method, getter, js_name = numPages)]
    fn num_pages(this: &HostDocument) -> u32;

    #[wasm_bindgen(method, js_name = renderPage)]
    fn render_page(this: &HostDocument, page: u32, scale: f64) -> Promise;
}

pub struct JsPageSource {
    document: HostDocument,
}

impl JsPageSource {
    pub fn new(document: HostDocument) -> Self {
        Self { document }
    }
}

fn dimension(value: &JsValue, key: &str) -> Result<u32, PageError> {
    Reflect::get(value, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u32)
        .ok_or_else(|| PageError::LoadFailed(format!("renderPage result has no {}", key)))
}

impl PageSource for JsPageSource {
    fn page_count(&self) -> u32 {
        self.document.num_pages()
    }

    fn page_surface(
        &self,
        page: PageIndex,
        scale: PageScale,
    ) -> BoxFuture<'_, Result<RasterSurface, PageError>> {
        let promise = self.document.render_page(page, scale.get());
        Box::pin(async move {
            let value = JsFuture::from(promise).await.map_err(|e| {
                PageError::LoadFailed(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
            })?;
            Ok(RasterSurface {
                width: dimension(&value, "width")?,
                height: dimension(&value, "height")?,
            })
        })
    }
}
