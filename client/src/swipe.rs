use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, TouchEvent};

use holdboard_shared::{NavContext, NavEndpoint, Swipe, SwipeTracker, DEFAULT_SWIPE_THRESHOLD};

use crate::dom::{debug_enabled, window_and_document};
use crate::net::{navigate, navigate_json};

fn first_changed_touch(event: &TouchEvent) -> Option<(f64, f64)> {
    let touch = event.changed_touches().get(0)?;
    Some((touch.screen_x() as f64, touch.screen_y() as f64))
}

fn listen<F>(document: &Document, tracker: Rc<RefCell<SwipeTracker>>, mut on_swipe: F) -> Result<(), JsValue>
where
    F: FnMut(Swipe) + 'static,
{
    {
        let tracker = tracker.clone();
        let onstart = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            if let Some((x, y)) = first_changed_touch(&event) {
                tracker.borrow_mut().touch_start(x, y);
            }
        });
        document.add_event_listener_with_callback("touchstart", onstart.as_ref().unchecked_ref())?;
        onstart.forget();
    }

    let onend = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
        let Some((x, y)) = first_changed_touch(&event) else {
            return;
        };
        let swipe = tracker.borrow_mut().touch_end(x, y);
        if let Some(swipe) = swipe {
            on_swipe(swipe);
        }
    });
    document.add_event_listener_with_callback("touchend", onend.as_ref().unchecked_ref())?;
    onend.forget();
    Ok(())
}

/// Turns horizontal swipes anywhere on the page into previous/next actions.
#[wasm_bindgen]
pub struct SwipeHandler {
    tracker: Rc<RefCell<SwipeTracker>>,
}

#[wasm_bindgen]
impl SwipeHandler {
    #[wasm_bindgen(constructor)]
    pub fn new(threshold: Option<f64>) -> SwipeHandler {
        let threshold = threshold
            .filter(|value| value.is_finite() && *value >= 0.0)
            .unwrap_or(DEFAULT_SWIPE_THRESHOLD);
        SwipeHandler {
            tracker: Rc::new(RefCell::new(SwipeTracker::new(threshold))),
        }
    }

    /// Calls `on_swipe_left` (next) or `on_swipe_right` (previous) with
    /// `nav_context`.
    pub fn attach(
        &self,
        on_swipe_left: Function,
        on_swipe_right: Function,
        nav_context: JsValue,
    ) -> Result<(), JsValue> {
        let (_, document) = window_and_document()?;
        listen(&document, self.tracker.clone(), move |swipe| {
            let callback = match swipe {
                Swipe::Left => &on_swipe_left,
                Swipe::Right => &on_swipe_right,
            };
            if let Err(err) = callback.call1(&JsValue::NULL, &nav_context) {
                web_sys::console::error_2(&"Swipe callback failed".into(), &err);
            }
        })
    }

    /// Wires swipes straight to `load_next` / `load_previous`.
    #[wasm_bindgen(js_name = attachNavigation)]
    pub fn attach_navigation(&self, nav_context: &str) -> Result<(), JsValue> {
        let (window, document) = window_and_document()?;
        let context = NavContext::from_json(nav_context)
            .map_err(|err| JsValue::from_str(&format!("Invalid navigation context: {err}")))?;
        let debug = debug_enabled(&window);
        listen(&document, self.tracker.clone(), move |swipe| {
            let endpoint = match swipe {
                Swipe::Left => NavEndpoint::Next,
                Swipe::Right => NavEndpoint::Previous,
            };
            if debug {
                web_sys::console::log_1(
                    &format!("Swipe {swipe:?} problem={} list={}", context.problem_id, context.list_id)
                        .into(),
                );
            }
            if let Err(err) = navigate(endpoint, &context) {
                web_sys::console::error_1(&err);
            }
        })
    }

    pub fn threshold(&self) -> f64 {
        self.tracker.borrow().threshold
    }
}

#[wasm_bindgen(js_name = loadNext)]
pub fn load_next(nav_context: &str) -> Result<(), JsValue> {
    navigate_json(NavEndpoint::Next, nav_context)
}

#[wasm_bindgen(js_name = loadPrevious)]
pub fn load_previous(nav_context: &str) -> Result<(), JsValue> {
    navigate_json(NavEndpoint::Previous, nav_context)
}
