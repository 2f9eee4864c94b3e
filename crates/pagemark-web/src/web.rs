//! WebAssembly entry point and the editor API exported to the host page.

use crate::canvas::Canvas2dSurface;
use crate::launch::{LaunchParams, parse_profile, resolve_endpoint};
use crate::pages::{HostDocument, JsPageSource};
use crate::style::response_json;
use pagemark_core::{
    AnnotationPatch, ControllerResponse, EditorConfig, EditorSession, HttpBackend, MouseButton,
    PageLoader, PersistenceBackend, PointerEvent, SaveOutcome, SerializableColor, ToolKind,
};
use pagemark_render::{OverlayRenderer, RenderContext};
use kurbo::Point;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn json_to_js(value: &serde_json::Value) -> JsValue {
    js_sys::JSON::parse(&value.to_string()).unwrap_or(JsValue::NULL)
}

/// Shared state behind the exported handle. Async work clones the `Rc`.
struct Shell {
    session: RefCell<EditorSession>,
    surface: RefCell<Canvas2dSurface>,
    renderer: RefCell<OverlayRenderer>,
    loader: PageLoader<JsPageSource>,
    backend: HttpBackend,
}

impl Shell {
    fn redraw(&self) {
        let session = self.session.borrow();
        let mut surface = self.surface.borrow_mut();
        surface.retain_bitmaps(session.store());
        let ctx = RenderContext::from_session(&session, surface.size());
        if let Err(e) = self.renderer.borrow_mut().render(&mut *surface, &ctx) {
            log::warn!("Overlay render failed: {}", e);
        }
    }

    fn respond(&self, response: ControllerResponse) -> JsValue {
        if response.redraw {
            self.redraw();
        }
        json_to_js(&response_json(&response))
    }

    async fn show_page(&self, page: u32) -> Result<bool, JsValue> {
        let Some(raster) = self.loader.render_page(page).await.map_err(to_js)? else {
            return Ok(false);
        };
        self.session.borrow_mut().go_to_page(page).map_err(to_js)?;
        self.surface.borrow_mut().resize(raster.width, raster.height);
        self.redraw();
        Ok(true)
    }
}

/// Editor handle owned by the host page.
#[wasm_bindgen]
pub struct WebEditor {
    shell: Rc<Shell>,
}

#[wasm_bindgen]
impl WebEditor {
    /// Open a document and render its first page.
    ///
    /// `document_id` and `profile` default to the page URL's `doc` and
    /// `mode` parameters. `profile` is `"markup"` or `"signature"`.
    /// `config_json` may override any `EditorConfig` field.
    pub async fn open(
        overlay: web_sys::HtmlCanvasElement,
        document: HostDocument,
        document_id: Option<String>,
        profile: Option<String>,
        config_json: Option<String>,
    ) -> Result<WebEditor, JsValue> {
        let href = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .location()
            .href()?;
        let launch = LaunchParams::from_url(&href).map_err(to_js)?;
        let document_id = match document_id {
            Some(id) => id,
            None => launch.document_id().map_err(to_js)?.to_string(),
        };
        let profile = match profile {
            Some(mode) => parse_profile(&mode).map_err(to_js)?,
            None => launch.profile(),
        };
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(to_js)?,
            None => EditorConfig::default(),
        };

        let endpoint = resolve_endpoint(&href, &config.save_endpoint).map_err(to_js)?;
        let backend = HttpBackend::new(endpoint.as_str());
        let mut surface = Canvas2dSurface::new(overlay, config.font_family.clone())?;

        let loader = PageLoader::new(JsPageSource::new(document), config.scale);
        let (mut session, raster) = EditorSession::open(document_id, profile, config, &loader)
            .await
            .map_err(to_js)?;
        session.set_text_measure(Box::new(surface.measure()));
        surface.resize(raster.width, raster.height);

        let shell = Rc::new(Shell {
            session: RefCell::new(session),
            surface: RefCell::new(surface),
            renderer: RefCell::new(OverlayRenderer::new()),
            loader,
            backend,
        });
        shell.redraw();
        Ok(WebEditor { shell })
    }

    /// Mouse pressed at page-local pixel coordinates.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, x: f64, y: f64, button: i16) -> JsValue {
        let Some(button) = MouseButton::from_dom(button) else {
            return JsValue::NULL;
        };
        let event = PointerEvent::Down {
            position: Point::new(x, y),
            button,
        };
        let response = self.shell.session.borrow_mut().handle_pointer(&event);
        self.shell.respond(response)
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f64, y: f64) -> JsValue {
        let event = PointerEvent::Move {
            position: Point::new(x, y),
        };
        let response = self.shell.session.borrow_mut().handle_pointer(&event);
        self.shell.respond(response)
    }

    /// Mouse released anywhere in the window.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self) -> JsValue {
        let response = self.shell.session.borrow_mut().pointer_up();
        self.shell.respond(response)
    }

    #[wasm_bindgen(js_name = confirmText)]
    pub fn confirm_text(&self, content: String) -> JsValue {
        let response = self.shell.session.borrow_mut().confirm_text(&content);
        self.shell.respond(response)
    }

    #[wasm_bindgen(js_name = cancelText)]
    pub fn cancel_text(&self) -> JsValue {
        let response = self.shell.session.borrow_mut().cancel_text();
        self.shell.respond(response)
    }

    /// Accepts tool names with or without the `tool-` prefix.
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&self, name: String) -> Result<(), JsValue> {
        let tool: ToolKind = name.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.shell.session.borrow_mut().set_tool(tool).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&self, hex: String) -> Result<(), JsValue> {
        let color: SerializableColor = hex.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.shell.session.borrow_mut().set_color(color);
        Ok(())
    }

    #[wasm_bindgen(js_name = setFontSize)]
    pub fn set_font_size(&self, size: f64) {
        self.shell.session.borrow_mut().set_font_size(size);
    }

    /// Property panel edit: `field` is `width`, `height`, `content`, `color`
    /// or `font_size`.
    #[wasm_bindgen(js_name = editProperty)]
    pub fn edit_property(&self, field: String, value: String) -> Result<JsValue, JsValue> {
        let number = || {
            value
                .trim()
                .parse::<f64>()
                .map_err(|e| JsValue::from_str(&format!("{}: {}", field, e)))
        };
        let patch = match field.as_str() {
            "width" => AnnotationPatch::Width(number()?),
            "height" => AnnotationPatch::Height(number()?),
            "font_size" | "fontSize" => AnnotationPatch::FontSize(number()?),
            "content" => AnnotationPatch::Content(value.clone()),
            "color" => {
                let color = value.parse().map_err(|e: String| JsValue::from_str(&e))?;
                AnnotationPatch::Color(color)
            }
            other => return Err(JsValue::from_str(&format!("unknown field: {}", other))),
        };
        let response = self.shell.session.borrow_mut().apply_patch(patch);
        Ok(self.shell.respond(response))
    }

    #[wasm_bindgen(js_name = deleteSelected)]
    pub fn delete_selected(&self) -> JsValue {
        let response = self.shell.session.borrow_mut().delete_selected();
        self.shell.respond(response)
    }

    /// Store the signature drawn on the capture pad.
    #[wasm_bindgen(js_name = captureSignature)]
    pub fn capture_signature(&self, data_url: String) {
        self.shell.session.borrow_mut().capture_signature(data_url);
    }

    #[wasm_bindgen(js_name = clearSignature)]
    pub fn clear_signature(&self) {
        self.shell.session.borrow_mut().clear_signature();
    }

    /// Place the captured signature on the current page.
    #[wasm_bindgen(js_name = addSignature)]
    pub fn add_signature(&self) -> Result<JsValue, JsValue> {
        let response = self
            .shell
            .session
            .borrow_mut()
            .add_captured_signature()
            .map_err(to_js)?;
        Ok(self.shell.respond(response))
    }

    #[wasm_bindgen(js_name = currentPage)]
    pub fn current_page(&self) -> u32 {
        self.shell.session.borrow().viewport().current_page
    }

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> u32 {
        self.shell.session.borrow().viewport().page_count
    }

    /// Resolves to false when the request was dropped because a render was in flight.
    #[wasm_bindgen(js_name = goToPage)]
    pub fn go_to_page(&self, page: u32) -> js_sys::Promise {
        let shell = self.shell.clone();
        future_to_promise(async move { shell.show_page(page).await.map(JsValue::from_bool) })
    }

    #[wasm_bindgen(js_name = nextPage)]
    pub fn next_page(&self) -> js_sys::Promise {
        let viewport = *self.shell.session.borrow().viewport();
        if viewport.current_page >= viewport.page_count {
            return js_sys::Promise::resolve(&JsValue::FALSE);
        }
        self.go_to_page(viewport.current_page + 1)
    }

    #[wasm_bindgen(js_name = previousPage)]
    pub fn previous_page(&self) -> js_sys::Promise {
        let current = self.shell.session.borrow().viewport().current_page;
        if current <= 1 {
            return js_sys::Promise::resolve(&JsValue::FALSE);
        }
        self.go_to_page(current - 1)
    }

    /// Post the annotations. On success the browser follows the download URL.
    pub fn save(&self) -> js_sys::Promise {
        let shell = self.shell.clone();
        future_to_promise(async move {
            let Some(request) = shell.session.borrow_mut().begin_save() else {
                return Ok(JsValue::NULL);
            };
            let result = shell.backend.save(&request).await;
            let outcome = shell.session.borrow_mut().finish_save(result);
            match outcome {
                SaveOutcome::Completed { download_url } => {
                    if let (Some(url), Some(window)) = (&download_url, web_sys::window()) {
                        window.location().set_href(url)?;
                    }
                    Ok(download_url.map(JsValue::from).unwrap_or(JsValue::NULL))
                }
                SaveOutcome::Failed { reason } => Err(JsValue::from_str(&reason)),
                SaveOutcome::Skipped => Ok(JsValue::NULL),
            }
        })
    }

    pub fn redraw(&self) {
        self.shell.redraw();
    }
}

/// Initialize logging and panic reporting.
#[wasm_bindgen(start)]
pub fn start() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("pagemark: logger already initialized"));
    }
    log::info!("Pagemark editor loaded");
}
