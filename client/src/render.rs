use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use holdboard_shared::geometry::Polygon;
use holdboard_shared::{hex_to_rgba, Mark};

use crate::state::{State, MARK_LINE_WIDTH, OVERLAY_ALPHA, OVERLAY_COLOR};

pub fn fill_overlay(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    let fill = hex_to_rgba(OVERLAY_COLOR, Some(OVERLAY_ALPHA))
        .unwrap_or_else(|| "rgba(156, 156, 156, 0.65)".to_string());
    ctx.set_fill_style_str(&fill);
    ctx.fill_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str("#000000");
}

/// Outlines the path in `color`, then punches its interior out of the overlay.
fn stroke_and_reveal(ctx: &CanvasRenderingContext2d, color: &str) {
    ctx.set_line_width(MARK_LINE_WIDTH);
    ctx.set_stroke_style_str(color);
    ctx.stroke();
    let _ = ctx.set_global_composite_operation("destination-out");
    ctx.fill();
    let _ = ctx.set_global_composite_operation("source-over");
}

pub fn draw_circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, color: &str) {
    let _ = ctx.set_global_composite_operation("source-over");
    ctx.begin_path();
    let _ = ctx.arc(x, y, radius.max(0.0), 0.0, PI * 2.0);
    stroke_and_reveal(ctx, color);
}

pub fn draw_polygon(ctx: &CanvasRenderingContext2d, polygon: &Polygon, color: &str) {
    if !polygon.is_drawable() {
        return;
    }
    let _ = ctx.set_global_composite_operation("source-over");
    ctx.begin_path();
    let [x, y] = polygon.points[0];
    ctx.move_to(x, y);
    for [x, y] in &polygon.points[1..] {
        ctx.line_to(*x, *y);
    }
    ctx.close_path();
    stroke_and_reveal(ctx, color);
}

pub fn draw_mark(ctx: &CanvasRenderingContext2d, mark: &Mark<'_>) {
    match mark {
        Mark::Circle {
            x,
            y,
            radius,
            color,
        } => draw_circle(ctx, *x, *y, *radius, color),
        Mark::Polygon { polygon, color } => draw_polygon(ctx, polygon, color),
    }
}

/// Clears and repaints every hold in insertion order.
pub fn redraw(state: &State, snap: bool) {
    let (width, height) = state.canvas_size();
    state.ctx.clear_rect(0.0, 0.0, width, height);
    if state.editor.detection_active() {
        fill_overlay(&state.ctx, width, height);
    }
    for mark in state.editor.marks(snap) {
        draw_mark(&state.ctx, &mark);
    }
}
