use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlImageElement, HtmlInputElement, PointerEvent};

use holdboard_shared::geometry::{display_ratio, scale_polygons, to_pixels};
use holdboard_shared::{
    hold_type, parse_holds, EditorConfig, EditorMode, HoldEditor as EditorCore, HoldsFormatError, Placement,
    Release,
};

use crate::dom::{
    alert, debug_enabled, event_offset, fit_canvas_to_image, get_element, set_field_value,
    window_and_document,
};
use crate::export::{export_png, ExportSnapshot};
use crate::render::{draw_circle, draw_polygon, redraw};
use crate::state::State;

#[wasm_bindgen(start)]
pub fn run() {
    console_error_panic_hook::set_once();
}

fn build_state(config: &EditorConfig, mode: EditorMode, holds: &str) -> Result<State, JsValue> {
    let (window, document) = window_and_document()?;
    let debug = debug_enabled(&window);

    let canvas: HtmlCanvasElement = get_element(&document, &config.canvas_id)?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    let image: HtmlImageElement = get_element(&document, &config.image_id)?;

    let mut editor = EditorCore::new(mode, config.radius, config.detection, Vec::new());
    let holds = parse_holds(holds).map_err(|err| JsValue::from_str(&err.to_string()))?;
    editor.load_holds(holds);

    let mut state = State {
        document,
        canvas,
        ctx,
        image,
        source_polygons: config.polygon_payload().holds,
        holds_field_id: config.holds_field_id.clone(),
        hold_type_name: config.hold_type_name.clone(),
        editor,
        debug,
    };
    let ratio = fit_to_image(&mut state);
    let (width, height) = state.canvas_size();
    let editor = &state.editor;

    if debug {
        web_sys::console::log_1(
            &format!(
                "Hold editor ready mode={mode:?} canvas={width}x{height} ratio={ratio:.4} polygons={} holds={} detection={}",
                editor.polygons().len(),
                editor.holds().len(),
                editor.detection_active()
            )
            .into(),
        );
    }

    Ok(state)
}

/// Lays the canvas over the image and rescales polygons and hold radii to
/// its current on-screen size. Returns the display ratio used.
fn fit_to_image(state: &mut State) -> f64 {
    let (width, height) = fit_canvas_to_image(&state.canvas, &state.image);
    let natural_width = state.image.natural_width();
    if natural_width == 0 || width == 0.0 {
        web_sys::console::warn_1(
            &format!(
                "Wall image {} not laid out yet (canvas={width}x{height}), waiting for load",
                state.image.id()
            )
            .into(),
        );
    }
    let ratio = display_ratio(state.image.offset_width() as f64, natural_width as f64);
    state
        .editor
        .set_polygons(scale_polygons(&state.source_polygons, ratio));
    state.editor.set_canvas_size(width, height);
    ratio
}

fn attach_image_refit(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let image = state.borrow().image.clone();
    let refit_state = state.clone();
    let onrefit = Closure::<dyn FnMut(Event)>::new(move |_| {
        let mut state = refit_state.borrow_mut();
        let ratio = fit_to_image(&mut state);
        if state.debug {
            let (width, height) = state.canvas_size();
            web_sys::console::log_1(
                &format!("Canvas refit canvas={width}x{height} ratio={ratio:.4}").into(),
            );
        }
        let snap = state.editor.detection_active();
        redraw(&state, snap);
    });
    image.add_event_listener_with_callback("load", onrefit.as_ref().unchecked_ref())?;
    if let Some(window) = web_sys::window() {
        window.add_event_listener_with_callback("resize", onrefit.as_ref().unchecked_ref())?;
    }
    onrefit.forget();
    Ok(())
}

fn attach_pointer_handlers(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let canvas = state.borrow().canvas.clone();

    {
        let down_state = state.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if !event.is_primary() {
                return;
            }
            event.prevent_default();
            event.stop_propagation();
            let (x, y) = event_offset(&event);
            let mut state = down_state.borrow_mut();
            if let Some(index) = state.editor.pointer_down(x, y) {
                let _ = state.canvas.set_pointer_capture(event.pointer_id());
                if state.debug {
                    web_sys::console::log_1(&format!("Drag start hold={index} x={x} y={y}").into());
                }
            }
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if !event.is_primary() {
                return;
            }
            let (x, y) = event_offset(&event);
            let mut state = move_state.borrow_mut();
            if state.editor.pointer_move(x, y) {
                event.prevent_default();
                event.stop_propagation();
                let snap = state.editor.detection_active();
                redraw(&state, snap);
            }
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let up_state = state.clone();
        let onup = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if !event.is_primary() {
                return;
            }
            event.prevent_default();
            event.stop_propagation();
            let (x, y) = event_offset(&event);
            let mut state = up_state.borrow_mut();
            let state = &mut *state;
            let _ = state.canvas.release_pointer_capture(event.pointer_id());
            let color = state.selected_color();
            let release = state.editor.pointer_up(x, y, &color);
            match release {
                Release::Placed(Placement::Highlighted { polygon }) => {
                    if let Some(polygon) = state.editor.polygons().get(polygon) {
                        draw_polygon(&state.ctx, polygon, &color);
                    }
                }
                Release::Placed(Placement::Placed { index }) => {
                    if let Some(hold) = state.editor.holds().get(index) {
                        let (width, height) = state.editor.canvas_size();
                        let (hx, hy) = to_pixels(hold.position(), width, height);
                        draw_circle(&state.ctx, hx, hy, hold.radius, &hold.color);
                    }
                }
                Release::Dropped | Release::Ignored => {}
            }
            if state.debug {
                web_sys::console::log_1(
                    &format!(
                        "Pointer up x={x} y={y} release={release:?} type={:?}",
                        hold_type(&color)
                    )
                    .into(),
                );
            }
        });
        canvas.add_event_listener_with_callback("pointerup", onup.as_ref().unchecked_ref())?;
        onup.forget();
    }

    {
        let cancel_state = state.clone();
        let oncancel = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if !event.is_primary() {
                return;
            }
            let mut state = cancel_state.borrow_mut();
            let _ = state.canvas.release_pointer_capture(event.pointer_id());
            if state.editor.pointer_cancel() && state.debug {
                web_sys::console::log_1(&"Drag cancelled".into());
            }
        });
        canvas
            .add_event_listener_with_callback("pointercancel", oncancel.as_ref().unchecked_ref())?;
        oncancel.forget();
    }

    Ok(())
}

fn attach_detection_toggle(state: &Rc<RefCell<State>>, toggle_id: &str) -> Result<(), JsValue> {
    let document = state.borrow().document.clone();
    let toggle: HtmlInputElement = get_element(&document, toggle_id)?;
    toggle.set_checked(state.borrow().editor.detection_active());
    let toggle_state = state.clone();
    let toggle_cb = toggle.clone();
    let onchange = Closure::<dyn FnMut(Event)>::new(move |_| {
        let mut state = toggle_state.borrow_mut();
        let active = toggle_cb.checked();
        state.editor.set_detection_active(active);
        redraw(&state, active);
    });
    toggle.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
    onchange.forget();
    Ok(())
}

/// Canvas editor for marking holds over a wall photo.
#[wasm_bindgen]
pub struct HoldEditor {
    state: Rc<RefCell<State>>,
}

impl HoldEditor {
    fn init(config: &str, mode: EditorMode, holds: &str) -> Result<HoldEditor, JsValue> {
        let config =
            EditorConfig::from_json(config).map_err(|err| JsValue::from_str(&err.to_string()))?;
        let state = Rc::new(RefCell::new(build_state(&config, mode, holds)?));
        attach_pointer_handlers(&state)?;
        attach_image_refit(&state)?;
        if let Some(toggle_id) = config.detection_toggle_id.as_deref() {
            attach_detection_toggle(&state, toggle_id)?;
        }
        {
            let state = state.borrow();
            let snap = state.editor.detection_active();
            redraw(&state, snap);
        }
        Ok(HoldEditor { state })
    }
}

#[wasm_bindgen]
impl HoldEditor {
    /// Empty editor where clicks place new holds.
    #[wasm_bindgen(js_name = initForCreate)]
    pub fn init_for_create(config: &str) -> Result<HoldEditor, JsValue> {
        Self::init(config, EditorMode::Create, "")
    }

    /// Editor showing saved holds; they can be dragged or undone.
    #[wasm_bindgen(js_name = initForLoad)]
    pub fn init_for_load(config: &str, holds: &str) -> Result<HoldEditor, JsValue> {
        Self::init(config, EditorMode::Load, holds)
    }

    #[wasm_bindgen(js_name = holdCount)]
    pub fn hold_count(&self) -> usize {
        self.state.borrow().editor.holds().len()
    }

    #[wasm_bindgen(js_name = detectionActive)]
    pub fn detection_active(&self) -> bool {
        self.state.borrow().editor.detection_active()
    }

    #[wasm_bindgen(js_name = setDetectionActive)]
    pub fn set_detection_active(&self, active: bool) {
        let mut state = self.state.borrow_mut();
        state.editor.set_detection_active(active);
        redraw(&state, active);
    }

    /// Removes the last placed hold and repaints the rest as plain circles.
    pub fn undo(&self) {
        let mut state = self.state.borrow_mut();
        let removed = state.editor.undo();
        if state.debug {
            web_sys::console::log_1(
                &format!("Undo removed={} remaining={}", removed.is_some(), state.editor.holds().len())
                    .into(),
            );
        }
        redraw(&state, false);
    }

    /// `[{x, y, color}]` for the current holds; errors when there are none.
    #[wasm_bindgen(js_name = holdsJson)]
    pub fn holds_json(&self) -> Result<String, JsValue> {
        self.state
            .borrow()
            .editor
            .encode()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Writes the serialized holds into the hidden form field.
    #[wasm_bindgen(js_name = setHolds)]
    pub fn set_holds(&self) -> Result<(), JsValue> {
        let json = self.holds_json()?;
        let state = self.state.borrow();
        set_field_value(&state.document, &state.holds_field_id, &json)
    }

    /// Alerts and returns false when nothing has been marked.
    #[wasm_bindgen(js_name = validateForm)]
    pub fn validate_form(&self) -> bool {
        if self.hold_count() > 0 {
            return true;
        }
        if let Some(window) = web_sys::window() {
            alert(&window, &HoldsFormatError::Empty.to_string());
        }
        false
    }

    /// Form `onsubmit` hook: validate, then fill the hidden field.
    #[wasm_bindgen(js_name = prepareSubmit)]
    pub fn prepare_submit(&self) -> bool {
        if !self.validate_form() {
            return false;
        }
        match self.set_holds() {
            Ok(()) => true,
            Err(err) => {
                web_sys::console::error_2(&"Failed to store holds".into(), &err);
                false
            }
        }
    }

    /// Downloads the wall photo with the holds drawn on it as `<name>.png`.
    #[wasm_bindgen(js_name = exportImage)]
    pub fn export_image(&self, name: String, background_url: String) {
        let (document, snapshot) = {
            let state = self.state.borrow();
            let rect = state.canvas.get_bounding_client_rect();
            (
                state.document.clone(),
                ExportSnapshot {
                    holds: state.editor.holds().to_vec(),
                    width: rect.width(),
                    height: rect.height(),
                },
            )
        };
        spawn_local(async move {
            if let Err(err) = export_png(document, snapshot, name, background_url).await {
                web_sys::console::warn_2(&"Image export failed".into(), &err);
            }
        });
    }
}
