use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlCanvasElement, HtmlElement, HtmlImageElement, HtmlInputElement, PointerEvent,
    Window,
};

use holdboard_shared::DEFAULT_HOLD_COLOR;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn window_and_document() -> Result<(Window, Document), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    Ok((window, document))
}

pub fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    search.contains("debug=1")
        || search.contains("debug=true")
        || search.contains("log=1")
        || search.contains("log=true")
}

/// Lays the canvas over the image's on-screen box. Returns the canvas size.
pub fn fit_canvas_to_image(canvas: &HtmlCanvasElement, image: &HtmlImageElement) -> (f64, f64) {
    let width = image.offset_width().max(0) as u32;
    let height = image.offset_height().max(0) as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    if let Ok(element) = canvas.clone().dyn_into::<HtmlElement>() {
        let style = element.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("left", &format!("{}px", image.offset_left()));
        let _ = style.set_property("top", &format!("{}px", image.offset_top()));
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
    }
    (width as f64, height as f64)
}

pub fn event_offset(event: &PointerEvent) -> (f64, f64) {
    (event.offset_x() as f64, event.offset_y() as f64)
}

/// Colour of the checked hold type radio.
pub fn selected_hold_color(document: &Document, name: &str) -> String {
    let selector = format!("input[name=\"{name}\"]:checked");
    document
        .query_selector(&selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_else(|| DEFAULT_HOLD_COLOR.to_string())
}

pub fn set_field_value(document: &Document, id: &str, value: &str) -> Result<(), JsValue> {
    let input: HtmlInputElement = get_element(document, id)?;
    input.set_value(value);
    Ok(())
}

pub fn alert(window: &Window, message: &str) {
    let _ = window.alert_with_message(message);
}

pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn append_input(document: &Document, html: &str) {
        let body = document.body().expect("body");
        let holder = document.create_element("div").expect("div");
        holder.set_inner_html(html);
        body.append_child(&holder).expect("append");
    }

    #[wasm_bindgen_test]
    fn checked_radio_sets_hold_color() {
        let (_, document) = window_and_document().expect("document");
        append_input(
            &document,
            "<input type=\"radio\" name=\"grip\" value=\"#0000ff\">\
             <input type=\"radio\" name=\"grip\" value=\"#ff0000\" checked>",
        );
        assert_eq!(selected_hold_color(&document, "grip"), "#ff0000");
        assert_eq!(selected_hold_color(&document, "absent"), DEFAULT_HOLD_COLOR);
    }

    #[wasm_bindgen_test]
    fn missing_element_is_reported() {
        let (_, document) = window_and_document().expect("document");
        let err = get_element::<HtmlCanvasElement>(&document, "no-such-canvas").unwrap_err();
        assert_eq!(err.as_string().as_deref(), Some("Missing element: no-such-canvas"));
    }

    #[wasm_bindgen_test]
    fn canvas_follows_image_box() {
        let (_, document) = window_and_document().expect("document");
        append_input(
            &document,
            "<img id=\"fit-image\" style=\"display:block;width:320px;height:240px\">\
             <canvas id=\"fit-canvas\"></canvas>",
        );
        let image: HtmlImageElement = get_element(&document, "fit-image").expect("image");
        let canvas: HtmlCanvasElement = get_element(&document, "fit-canvas").expect("canvas");
        let (width, height) = fit_canvas_to_image(&canvas, &image);
        assert_eq!((width, height), (320.0, 240.0));
        assert_eq!(canvas.width(), 320);
        assert_eq!(canvas.height(), 240);
    }
}
