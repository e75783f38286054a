use std::cell::Cell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlDocument, Response, Window};

use holdboard_shared::{navigation_path, NavContext, NavEndpoint};

use crate::dom::{debug_enabled, scroll_y, window_and_document};

thread_local! {
    static NAV_GENERATION: Cell<u64> = Cell::new(0);
}

fn next_generation() -> u64 {
    NAV_GENERATION.with(|generation| {
        let next = generation.get() + 1;
        generation.set(next);
        next
    })
}

fn is_current(generation: u64) -> bool {
    NAV_GENERATION.with(|current| current.get() == generation)
}

async fn fetch_text(window: &Window, path: &str) -> Result<String, JsValue> {
    let response: Response = JsFuture::from(window.fetch_with_str(path))
        .await?
        .dyn_into()?;
    let text = JsFuture::from(response.text()?).await?;
    text.as_string()
        .ok_or_else(|| JsValue::from_str("Response body is not text"))
}

/// Swaps the whole page for the fetched HTML.
fn replace_document(document: web_sys::Document, body: &str) -> Result<(), JsValue> {
    // open/write/close are only bound on HtmlDocument.
    let document: HtmlDocument = document.unchecked_into();
    document.open()?;
    document.write(&js_sys::Array::of1(&JsValue::from_str(body)))?;
    document.close()
}

/// Requests the neighbouring problem and replaces the page with it. A response
/// that lands after a newer navigation started is dropped.
pub fn navigate(endpoint: NavEndpoint, context: &NavContext) -> Result<(), JsValue> {
    let (window, document) = window_and_document()?;
    let path = navigation_path(endpoint, context, scroll_y(&window));
    let generation = next_generation();
    let debug = debug_enabled(&window);
    if debug {
        web_sys::console::log_1(&format!("Navigation start path={path} generation={generation}").into());
    }
    spawn_local(async move {
        match fetch_text(&window, &path).await {
            Ok(body) => {
                if !is_current(generation) {
                    if debug {
                        web_sys::console::log_1(
                            &format!("Navigation stale path={path} generation={generation}").into(),
                        );
                    }
                    return;
                }
                if let Err(err) = replace_document(document, &body) {
                    web_sys::console::error_2(
                        &format!("Navigation render failed path={path}").into(),
                        &err,
                    );
                }
            }
            Err(err) => {
                web_sys::console::warn_2(&format!("Navigation fetch failed path={path}").into(), &err);
            }
        }
    });
    Ok(())
}

pub fn navigate_json(endpoint: NavEndpoint, context: &str) -> Result<(), JsValue> {
    let context = NavContext::from_json(context)
        .map_err(|err| JsValue::from_str(&format!("Invalid navigation context: {err}")))?;
    navigate(endpoint, &context)
}
