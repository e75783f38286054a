use serde::{Deserialize, Serialize};

pub mod config;
pub mod editor;
pub mod geometry;
pub mod holds_format;
pub mod nav;
pub mod swipe;

pub use config::{ConfigError, EditorConfig};
pub use editor::{EditorMode, HoldEditor, Mark, Placement, Release};
pub use holds_format::{
    encode_holds, parse_holds, parse_polygons, HoldsFormatError, PolygonPayload,
};
pub use nav::{navigation_path, NavContext, NavEndpoint};
pub use swipe::{Swipe, SwipeTracker, DEFAULT_SWIPE_THRESHOLD};

/// Hold types offered by the editor, as `(name, colour)`.
pub const HOLD_PALETTE: [(&str, &str); 3] = [
    ("start", "#00ff00"),
    ("hand", "#0000ff"),
    ("top", "#ff0000"),
];
pub const DEFAULT_HOLD_COLOR: &str = HOLD_PALETTE[0].1;

/// Canvas-relative position, both axes in `[0, 1]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn clamp(self) -> Self {
        Self {
            x: clamp_unit(self.x),
            y: clamp_unit(self.y),
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(1.0)
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Hold {
    pub x: f64,
    pub y: f64,
    pub color: String,
    /// Marker radius in canvas pixels, derived from the editor radius.
    #[serde(skip)]
    pub radius: f64,
    #[serde(skip)]
    pub is_dragging: bool,
}

impl Hold {
    pub fn new(position: Point, color: String, radius: f64) -> Self {
        let position = position.clamp();
        Self {
            x: position.x,
            y: position.y,
            color: sanitize_color(color),
            radius,
            is_dragging: false,
        }
    }

    pub fn position(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    pub fn set_position(&mut self, position: Point) {
        let position = position.clamp();
        self.x = position.x;
        self.y = position.y;
    }
}

/// Hold type name for a palette colour.
pub fn hold_type(color: &str) -> Option<&'static str> {
    HOLD_PALETTE
        .iter()
        .find(|(_, value)| value.eq_ignore_ascii_case(color))
        .map(|(name, _)| *name)
}

/// Accepts `#rrggbb` colours, falls back to the start colour otherwise.
pub fn sanitize_color(color: String) -> String {
    let trimmed = color.trim();
    let valid = trimmed.len() == 7
        && trimmed.starts_with('#')
        && trimmed[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        trimmed.to_ascii_lowercase()
    } else {
        DEFAULT_HOLD_COLOR.to_string()
    }
}

/// `hex_to_rgba("#9c9c9c", Some(0.65))` gives `rgba(156, 156, 156, 0.65)`.
pub fn hex_to_rgba(hex: &str, alpha: Option<f64>) -> Option<String> {
    if hex.len() != 7 || !hex.starts_with('#') {
        return None;
    }
    let r = u8::from_str_radix(hex.get(1..3)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(3..5)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(5..7)?, 16).ok()?;
    Some(match alpha {
        Some(alpha) => format!("rgba({r}, {g}, {b}, {alpha})"),
        None => format!("rgb({r}, {g}, {b})"),
    })
}
