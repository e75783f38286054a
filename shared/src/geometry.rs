use serde::{Deserialize, Serialize};

use crate::Point;

/// Detected hold outline, vertices in canvas pixels once scaled.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct Polygon {
    pub points: Vec<[f64; 2]>,
}

impl Polygon {
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Self { points }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        point_in_polygon(x, y, &self.points)
    }

    pub fn scaled(&self, ratio: f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|[x, y]| [x * ratio, y * ratio])
                .collect(),
        }
    }

    /// Fewer than three vertices cannot enclose anything.
    pub fn is_drawable(&self) -> bool {
        self.points.len() > 2
    }
}

/// Ratio between the on-screen image width and its natural width.
pub fn display_ratio(displayed_width: f64, natural_width: f64) -> f64 {
    if natural_width <= 0.0 || !natural_width.is_finite() || !displayed_width.is_finite() {
        return 1.0;
    }
    displayed_width / natural_width
}

pub fn scale_polygons(polygons: &[Polygon], ratio: f64) -> Vec<Polygon> {
    polygons.iter().map(|polygon| polygon.scaled(ratio)).collect()
}

pub fn to_fraction(px: f64, py: f64, width: f64, height: f64) -> Option<Point> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let point = Point {
        x: px / width,
        y: py / height,
    };
    if !point.x.is_finite() || !point.y.is_finite() {
        return None;
    }
    Some(point.clamp())
}

pub fn to_pixels(point: Point, width: f64, height: f64) -> (f64, f64) {
    (point.x * width, point.y * height)
}

pub fn hit_circle(x: f64, y: f64, cx: f64, cy: f64, radius: f64) -> bool {
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy < radius * radius
}

pub fn point_in_polygon(px: f64, py: f64, polygon: &[[f64; 2]]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[j];
        let intersect =
            ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi + f64::EPSILON) + xi);
        if intersect {
            inside = !inside;
        }
        j = i;
    }
    inside
}
