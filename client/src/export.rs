use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlAnchorElement, HtmlCanvasElement, HtmlImageElement,
};

use holdboard_shared::Hold;

use crate::state::MARK_LINE_WIDTH;

/// What the export needs from the live editor, captured before any await.
pub struct ExportSnapshot {
    pub holds: Vec<Hold>,
    pub width: f64,
    pub height: f64,
}

pub async fn load_image(url: &str) -> Result<HtmlImageElement, JsValue> {
    let image = HtmlImageElement::new()?;
    image.set_cross_origin(Some("anonymous"));
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let onload = Closure::once(move || {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let url_for_error = url.to_string();
        let onerror = Closure::once(move || {
            let _ = reject.call1(
                &JsValue::NULL,
                &JsValue::from_str(&format!("image_load_failed url={url_for_error}")),
            );
        });
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
    });
    image.set_src(url);
    JsFuture::from(promise).await?;
    Ok(image)
}

/// Draws the wall photo with every hold outlined and downloads it as `<name>.png`.
pub async fn export_png(
    document: Document,
    snapshot: ExportSnapshot,
    name: String,
    background_url: String,
) -> Result<(), JsValue> {
    let image = load_image(&background_url).await?;
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(snapshot.width.max(1.0) as u32);
    canvas.set_height(snapshot.height.max(1.0) as u32);
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        &image,
        0.0,
        0.0,
        snapshot.width,
        snapshot.height,
    )?;
    ctx.set_line_width(MARK_LINE_WIDTH);
    for hold in &snapshot.holds {
        ctx.begin_path();
        ctx.arc(
            hold.x * snapshot.width,
            hold.y * snapshot.height,
            hold.radius.max(0.0),
            0.0,
            std::f64::consts::PI * 2.0,
        )?;
        ctx.set_stroke_style_str(&hold.color);
        ctx.stroke();
    }
    let href = canvas.to_data_url_with_type("image/png")?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&href);
    anchor.set_download(&format!("{name}.png"));
    anchor.click();
    Ok(())
}
