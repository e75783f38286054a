use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use holdboard_shared::geometry::Polygon;
use holdboard_shared::HoldEditor as EditorCore;

pub const OVERLAY_COLOR: &str = "#9c9c9c";
pub const OVERLAY_ALPHA: f64 = 0.65;
pub const MARK_LINE_WIDTH: f64 = 4.0;

pub struct State {
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub image: HtmlImageElement,
    /// Detector output in natural image pixels, rescaled on every refit.
    pub source_polygons: Vec<Polygon>,
    pub holds_field_id: String,
    pub hold_type_name: String,
    pub editor: EditorCore,
    pub debug: bool,
}

impl State {
    pub fn canvas_size(&self) -> (f64, f64) {
        self.editor.canvas_size()
    }

    pub fn selected_color(&self) -> String {
        crate::dom::selected_hold_color(&self.document, &self.hold_type_name)
    }
}
