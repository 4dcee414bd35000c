use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Match a canvas' backing store to its CSS size times devicePixelRatio,
/// capped. Returns true when the size changed.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, max_pixel_ratio: f64) -> bool {
    let Some(w) = web::window() else {
        return false;
    };
    let dpr = w.device_pixel_ratio().min(max_pixel_ratio).max(1.0);
    let rect = canvas.get_bounding_client_rect();
    let w_px = ((rect.width() * dpr) as u32).max(1);
    let h_px = ((rect.height() * dpr) as u32).max(1);
    if canvas.width() == w_px && canvas.height() == h_px {
        return false;
    }
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    true
}

pub fn canvas_by_id(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

pub fn html_element(document: &web::Document, id: &str) -> Option<web::HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
}

#[inline]
pub fn set_opacity(el: &web::HtmlElement, opacity: f32) {
    _ = el
        .style()
        .set_property("opacity", &format!("{:.3}", opacity.clamp(0.0, 1.0)));
}

/// Cheap static backdrop for when the 3D context cannot be created.
pub fn apply_fallback_background(canvas: &web::HtmlCanvasElement) {
    _ = canvas.set_attribute("style", crate::constants::FALLBACK_GRADIENT_CSS);
}

/// Vertical scroll metrics of the page: `(scroll_top, scroll_height, viewport_height)`.
pub fn scroll_metrics(window: &web::Window) -> Option<(f64, f64, f64)> {
    let root = window.document()?.document_element()?;
    let top = window.scroll_y().ok()?;
    let viewport = window.inner_height().ok()?.as_f64()?;
    Some((top, root.scroll_height() as f64, viewport))
}

/// Probe for the reduced-capability layout: narrow viewport, coarse pointer
/// or few cores.
/// Primary input is a finger rather than a mouse.
pub fn has_coarse_pointer(window: &web::Window) -> bool {
    window
        .match_media("(pointer: coarse)")
        .ok()
        .flatten()
        .map(|m| m.matches())
        .unwrap_or(false)
}

pub fn detect_compact(window: &web::Window) -> bool {
    let narrow = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .map(|w| w <= crate::constants::COMPACT_MAX_WIDTH_PX)
        .unwrap_or(false);
    let coarse = has_coarse_pointer(window);
    let cores = window.navigator().hardware_concurrency();
    narrow || coarse || (cores > 0.0 && cores < crate::constants::LOW_CORE_COUNT)
}
