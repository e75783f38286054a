use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Polygon;
use crate::{sanitize_color, Hold};

/// Polygon payload produced by the hold detector: `{ "holds": [[[x, y], ...], ...] }`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PolygonPayload {
    #[serde(default)]
    pub holds: Vec<Polygon>,
}

#[derive(Debug)]
pub enum HoldsFormatError {
    Empty,
    InvalidData(serde_json::Error),
}

impl fmt::Display for HoldsFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoldsFormatError::Empty => write!(f, "Boulder cannot be empty"),
            HoldsFormatError::InvalidData(err) => write!(f, "Invalid hold data: {err}"),
        }
    }
}

impl std::error::Error for HoldsFormatError {}

impl From<serde_json::Error> for HoldsFormatError {
    fn from(err: serde_json::Error) -> Self {
        HoldsFormatError::InvalidData(err)
    }
}

/// Compact `[{"x":..,"y":..,"color":..}]` for the hidden form field.
pub fn encode_holds(holds: &[Hold]) -> Result<String, HoldsFormatError> {
    if holds.is_empty() {
        return Err(HoldsFormatError::Empty);
    }
    Ok(serde_json::to_string(holds)?)
}

/// Parses persisted holds. Radius is left at zero for the editor to fill in.
pub fn parse_holds(text: &str) -> Result<Vec<Hold>, HoldsFormatError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let holds: Vec<Hold> = serde_json::from_str(trimmed)?;
    Ok(holds
        .into_iter()
        .map(|mut hold| {
            let position = hold.position();
            hold.set_position(position);
            hold.color = sanitize_color(hold.color);
            hold
        })
        .collect())
}

pub fn parse_polygons(text: &str) -> Result<PolygonPayload, HoldsFormatError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(PolygonPayload::default());
    }
    Ok(serde_json::from_str(trimmed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn encode_rejects_empty_list() {
        let err = encode_holds(&[]).unwrap_err();
        assert!(matches!(err, HoldsFormatError::Empty));
        assert_eq!(err.to_string(), "Boulder cannot be empty");
    }

    #[test]
    fn encode_strips_transient_fields() {
        let mut holds = vec![
            Hold::new(Point { x: 0.1, y: 0.2 }, "#00ff00".to_string(), 14.0),
            Hold::new(Point { x: 0.5, y: 0.75 }, "#ff0000".to_string(), 14.0),
        ];
        holds[1].is_dragging = true;
        let json = encode_holds(&holds).expect("encode");
        assert_eq!(
            json,
            r##"[{"x":0.1,"y":0.2,"color":"#00ff00"},{"x":0.5,"y":0.75,"color":"#ff0000"}]"##
        );
        assert!(!json.contains("radius"));
        assert!(!json.contains("dragging"));
    }

    #[test]
    fn parse_clamps_and_sanitizes() {
        let holds =
            parse_holds(r##"[{"x":1.4,"y":0.3,"color":"#0000FF"},{"x":0.2,"y":-1,"color":"?"}]"##)
                .expect("parse");
        assert_eq!(holds.len(), 2);
        assert_eq!(holds[0].x, 1.0);
        assert_eq!(holds[0].color, "#0000ff");
        assert_eq!(holds[1].y, 0.0);
        assert_eq!(holds[1].color, crate::DEFAULT_HOLD_COLOR);
        assert!(!holds[0].is_dragging);
    }

    #[test]
    fn parse_tolerates_legacy_transient_keys() {
        let holds = parse_holds(r##"[{"x":0.3,"y":0.3,"color":"#ff0000","radius":9}]"##)
            .expect("parse");
        assert_eq!(holds[0].radius, 0.0);
        assert!(parse_holds("").expect("empty").is_empty());
        assert!(parse_holds("{").is_err());
    }

    #[test]
    fn parse_polygon_payload() {
        let payload =
            parse_polygons(r#"{"holds":[[[0,0],[10,0],[10,10]],[[20,20],[30,20],[30,30],[20,30]]]}"#)
                .expect("parse");
        assert_eq!(payload.holds.len(), 2);
        assert_eq!(payload.holds[1].points[3], [20.0, 30.0]);
        assert_eq!(parse_polygons("  ").expect("empty"), PolygonPayload::default());
        assert!(parse_polygons(r#"{"holds":[[1,2]]}"#).is_err());
    }
}
