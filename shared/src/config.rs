use std::fmt;

use serde::Deserialize;

use crate::holds_format::PolygonPayload;

pub const DEFAULT_RADIUS: f64 = 0.025;

/// Page-supplied editor settings. Every field has a default so the page only
/// needs to pass what differs.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    pub image_id: String,
    pub canvas_id: String,
    pub holds_field_id: String,
    pub detection_toggle_id: Option<String>,
    pub hold_type_name: String,
    /// Marker radius as a fraction of the canvas width.
    pub radius: f64,
    pub detection: bool,
    pub polygons: Option<PolygonPayload>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            image_id: "wall-image".to_string(),
            canvas_id: "wall-canvas".to_string(),
            holds_field_id: "holds-array".to_string(),
            detection_toggle_id: None,
            hold_type_name: "hold_type".to_string(),
            radius: DEFAULT_RADIUS,
            detection: true,
            polygons: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidJson(serde_json::Error),
    InvalidRadius(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidJson(err) => write!(f, "Invalid editor config: {err}"),
            ConfigError::InvalidRadius(radius) => {
                write!(f, "Hold radius must be a fraction in (0, 1], got {radius}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl EditorConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let trimmed = text.trim();
        let config: EditorConfig = if trimmed.is_empty() {
            EditorConfig::default()
        } else {
            serde_json::from_str(trimmed).map_err(ConfigError::InvalidJson)?
        };
        if !(config.radius > 0.0 && config.radius <= 1.0) {
            return Err(ConfigError::InvalidRadius(config.radius));
        }
        Ok(config)
    }

    pub fn polygon_payload(&self) -> PolygonPayload {
        self.polygons.clone().unwrap_or_default()
    }
}
