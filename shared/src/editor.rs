use crate::geometry::{hit_circle, to_fraction, to_pixels, Polygon};
use crate::holds_format::{encode_holds, HoldsFormatError};
use crate::Hold;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorMode {
    /// Clicks place new holds.
    Create,
    /// Holds come from a saved problem; only drag and undo apply.
    Load,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The click landed in a detected polygon, which gets filled instead.
    Highlighted { polygon: usize },
    Placed { index: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    Dropped,
    Placed(Placement),
    Ignored,
}

/// One drawing instruction of a full redraw, in canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum Mark<'a> {
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        color: &'a str,
    },
    Polygon {
        polygon: &'a Polygon,
        color: &'a str,
    },
}

pub struct HoldEditor {
    mode: EditorMode,
    holds: Vec<Hold>,
    polygons: Vec<Polygon>,
    detection_active: bool,
    radius: f64,
    width: f64,
    height: f64,
    drag_active: bool,
}

impl HoldEditor {
    pub fn new(mode: EditorMode, radius: f64, detection_active: bool, polygons: Vec<Polygon>) -> Self {
        Self {
            mode,
            holds: Vec::new(),
            polygons,
            detection_active,
            radius,
            width: 0.0,
            height: 0.0,
            drag_active: false,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn holds(&self) -> &[Hold] {
        &self.holds
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn set_polygons(&mut self, polygons: Vec<Polygon>) {
        self.polygons = polygons;
    }

    pub fn detection_active(&self) -> bool {
        self.detection_active
    }

    pub fn set_detection_active(&mut self, active: bool) {
        self.detection_active = active;
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        let radius = self.radius_px();
        for hold in &mut self.holds {
            hold.radius = radius;
        }
    }

    /// Marker radius in pixels for the current canvas width.
    pub fn radius_px(&self) -> f64 {
        self.radius * self.width
    }

    pub fn load_holds(&mut self, holds: Vec<Hold>) {
        let radius = self.radius_px();
        self.holds = holds
            .into_iter()
            .map(|mut hold| {
                hold.radius = radius;
                hold.is_dragging = false;
                hold
            })
            .collect();
        self.drag_active = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.holds.iter().any(|hold| hold.is_dragging)
    }

    fn hold_pixels(&self, hold: &Hold) -> (f64, f64) {
        to_pixels(hold.position(), self.width, self.height)
    }

    /// First detected polygon containing the pixel position.
    pub fn containing_polygon(&self, x: f64, y: f64) -> Option<usize> {
        self.polygons.iter().position(|polygon| polygon.contains(x, y))
    }

    /// Starts dragging the first hold under the pointer. A hold matches when
    /// it shares a detected polygon with the pointer, or when the pointer is
    /// within its radius.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<usize> {
        self.end_drag();
        let mut hit = None;
        for (index, hold) in self.holds.iter().enumerate() {
            let (hx, hy) = self.hold_pixels(hold);
            if self.detection_active {
                let shared = self
                    .polygons
                    .iter()
                    .any(|polygon| polygon.contains(hx, hy) && polygon.contains(x, y));
                if shared {
                    hit = Some(index);
                    break;
                }
            }
            if hit_circle(x, y, hx, hy, hold.radius) {
                hit = Some(index);
                break;
            }
        }
        if let Some(index) = hit {
            self.holds[index].is_dragging = true;
            self.drag_active = true;
        }
        hit
    }

    /// Moves dragged holds to the pointer. Returns whether a redraw is due.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        if !self.drag_active {
            return false;
        }
        let Some(position) = to_fraction(x, y, self.width, self.height) else {
            return false;
        };
        let mut moved = false;
        for hold in self.holds.iter_mut().filter(|hold| hold.is_dragging) {
            hold.set_position(position);
            moved = true;
        }
        moved
    }

    /// Clears every drag flag. Returns whether a drag was in progress.
    fn end_drag(&mut self) -> bool {
        for hold in &mut self.holds {
            hold.is_dragging = false;
        }
        std::mem::replace(&mut self.drag_active, false)
    }

    /// Ends an interrupted interaction without placing anything.
    pub fn pointer_cancel(&mut self) -> bool {
        self.end_drag()
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, color: &str) -> Release {
        if self.end_drag() {
            return Release::Dropped;
        }
        match self.mode {
            EditorMode::Load => Release::Ignored,
            EditorMode::Create => match self.place(x, y, color) {
                Some(placement) => Release::Placed(placement),
                None => Release::Ignored,
            },
        }
    }

    pub fn place(&mut self, x: f64, y: f64, color: &str) -> Option<Placement> {
        if self.detection_active {
            if let Some(polygon) = self.containing_polygon(x, y) {
                return Some(Placement::Highlighted { polygon });
            }
        }
        let position = to_fraction(x, y, self.width, self.height)?;
        self.holds
            .push(Hold::new(position, color.to_string(), self.radius_px()));
        Some(Placement::Placed {
            index: self.holds.len() - 1,
        })
    }

    /// Drops the most recently placed hold. No-op on an empty editor.
    pub fn undo(&mut self) -> Option<Hold> {
        let removed = self.holds.pop();
        if removed.is_some() {
            self.drag_active = self.is_dragging();
        }
        removed
    }

    pub fn encode(&self) -> Result<String, HoldsFormatError> {
        encode_holds(&self.holds)
    }

    /// Marks for a full redraw in insertion order. With `snap`, holds inside
    /// detected polygons are drawn as those polygons.
    pub fn marks(&self, snap: bool) -> Vec<Mark<'_>> {
        let mut marks = Vec::with_capacity(self.holds.len());
        for hold in &self.holds {
            let (x, y) = self.hold_pixels(hold);
            let mut snapped = false;
            if snap {
                for polygon in self.polygons.iter().filter(|polygon| polygon.contains(x, y)) {
                    marks.push(Mark::Polygon {
                        polygon,
                        color: &hold.color,
                    });
                    snapped = true;
                }
            }
            if !snapped {
                marks.push(Mark::Circle {
                    x,
                    y,
                    radius: hold.radius,
                    color: &hold.color,
                });
            }
        }
        marks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::new(vec![[x, y], [x + size, y], [x + size, y + size], [x, y + size]])
    }

    fn editor(detection: bool) -> HoldEditor {
        let mut editor = HoldEditor::new(
            EditorMode::Create,
            0.02,
            detection,
            vec![square(100.0, 100.0, 50.0), square(300.0, 300.0, 40.0)],
        );
        editor.set_canvas_size(500.0, 400.0);
        editor
    }

    #[test]
    fn click_outside_polygons_places_hold() {
        let mut editor = editor(true);
        let release = editor.pointer_up(20.0, 40.0, "#ff0000");
        assert_eq!(release, Release::Placed(Placement::Placed { index: 0 }));
        let hold = &editor.holds()[0];
        assert_eq!(hold.position(), Point { x: 0.04, y: 0.1 });
        assert_eq!(hold.radius, 10.0);
        assert_eq!(hold.color, "#ff0000");
    }

    #[test]
    fn click_inside_polygon_with_detection_only_highlights() {
        let mut editor = editor(true);
        let release = editor.pointer_up(120.0, 120.0, "#00ff00");
        assert_eq!(release, Release::Placed(Placement::Highlighted { polygon: 0 }));
        assert!(editor.holds().is_empty());
    }

    #[test]
    fn click_inside_polygon_without_detection_places_hold() {
        let mut editor = editor(false);
        let release = editor.pointer_up(120.0, 120.0, "#00ff00");
        assert_eq!(release, Release::Placed(Placement::Placed { index: 0 }));
        assert_eq!(editor.holds().len(), 1);
    }

    #[test]
    fn load_mode_never_places() {
        let mut editor = editor(false);
        editor.mode = EditorMode::Load;
        assert_eq!(editor.pointer_up(20.0, 20.0, "#00ff00"), Release::Ignored);
        assert!(editor.holds().is_empty());
    }

    #[test]
    fn pointer_down_in_shared_polygon_starts_drag() {
        let mut editor = editor(true);
        editor.load_holds(vec![Hold::new(
            Point { x: 0.25, y: 0.3 },
            "#0000ff".to_string(),
            0.0,
        )]);
        // Hold sits at (125, 120), pointer far from its radius but in the same polygon.
        assert_eq!(editor.pointer_down(145.0, 145.0), Some(0));
        assert!(editor.is_dragging());
    }

    #[test]
    fn pointer_down_within_radius_starts_drag() {
        let mut editor = editor(false);
        editor.pointer_up(250.0, 250.0, "#0000ff");
        assert_eq!(editor.pointer_down(255.0, 255.0), Some(0));
        assert!(editor.holds()[0].is_dragging);
    }

    #[test]
    fn pointer_down_far_from_everything_is_idle() {
        let mut editor = editor(true);
        editor.pointer_up(20.0, 20.0, "#0000ff");
        assert_eq!(editor.pointer_down(450.0, 50.0), None);
        assert!(!editor.is_dragging());
        assert!(!editor.pointer_move(460.0, 60.0));
    }

    #[test]
    fn first_matching_hold_wins() {
        let mut editor = editor(false);
        editor.pointer_up(250.0, 250.0, "#0000ff");
        editor.pointer_up(252.0, 250.0, "#ff0000");
        assert_eq!(editor.pointer_down(251.0, 250.0), Some(0));
        assert!(!editor.holds()[1].is_dragging);
    }

    #[test]
    fn drag_moves_hold_and_release_does_not_place() {
        let mut editor = editor(false);
        editor.pointer_up(250.0, 200.0, "#0000ff");
        editor.pointer_down(250.0, 200.0);
        assert!(editor.pointer_move(400.0, 100.0));
        assert_eq!(editor.holds()[0].position(), Point { x: 0.8, y: 0.25 });
        assert!(editor.pointer_move(900.0, -50.0));
        assert_eq!(editor.holds()[0].position(), Point { x: 1.0, y: 0.0 });
        assert_eq!(editor.pointer_up(900.0, -50.0, "#0000ff"), Release::Dropped);
        assert_eq!(editor.holds().len(), 1);
        assert!(!editor.is_dragging());
    }

    #[test]
    fn second_press_without_release_drags_only_the_new_hold() {
        let mut editor = editor(false);
        editor.pointer_up(100.0, 100.0, "#00ff00");
        editor.pointer_up(300.0, 300.0, "#ff0000");
        assert_eq!(editor.pointer_down(100.0, 100.0), Some(0));
        assert_eq!(editor.pointer_down(300.0, 300.0), Some(1));
        assert!(editor.pointer_move(400.0, 50.0));
        assert!(!editor.holds()[0].is_dragging);
        assert_eq!(editor.holds()[0].position(), Point { x: 0.2, y: 0.25 });
        assert_eq!(editor.holds()[1].position(), Point { x: 0.8, y: 0.125 });
    }

    #[test]
    fn press_on_empty_canvas_drops_stale_drag() {
        let mut editor = editor(false);
        editor.pointer_up(100.0, 100.0, "#00ff00");
        editor.pointer_down(100.0, 100.0);
        assert_eq!(editor.pointer_down(450.0, 350.0), None);
        assert!(!editor.is_dragging());
        assert!(!editor.pointer_move(460.0, 360.0));
        assert_eq!(editor.holds()[0].position(), Point { x: 0.2, y: 0.25 });
        assert_eq!(
            editor.pointer_up(450.0, 350.0, "#0000ff"),
            Release::Placed(Placement::Placed { index: 1 })
        );
    }

    #[test]
    fn cancel_ends_drag_without_placing() {
        let mut editor = editor(false);
        editor.pointer_up(100.0, 100.0, "#00ff00");
        editor.pointer_down(100.0, 100.0);
        assert!(editor.pointer_cancel());
        assert!(!editor.is_dragging());
        assert!(!editor.pointer_move(300.0, 300.0));
        assert_eq!(editor.holds().len(), 1);
        assert!(!editor.pointer_cancel());
    }

    #[test]
    fn clicks_work_once_canvas_gets_a_size() {
        let mut editor = HoldEditor::new(EditorMode::Create, 0.02, true, Vec::new());
        assert_eq!(editor.pointer_up(50.0, 50.0, "#00ff00"), Release::Ignored);
        editor.set_canvas_size(500.0, 400.0);
        editor.set_polygons(vec![square(100.0, 100.0, 50.0)]);
        assert_eq!(
            editor.pointer_up(50.0, 50.0, "#00ff00"),
            Release::Placed(Placement::Placed { index: 0 })
        );
        assert_eq!(
            editor.pointer_up(120.0, 120.0, "#00ff00"),
            Release::Placed(Placement::Highlighted { polygon: 0 })
        );
    }

    #[test]
    fn undo_pops_last_hold() {
        let mut editor = editor(false);
        editor.pointer_up(10.0, 10.0, "#00ff00");
        editor.pointer_up(20.0, 20.0, "#0000ff");
        editor.pointer_up(30.0, 30.0, "#ff0000");
        let removed = editor.undo().expect("removed");
        assert_eq!(removed.color, "#ff0000");
        assert_eq!(editor.holds().len(), 2);
        editor.undo();
        editor.undo();
        assert!(editor.holds().is_empty());
        assert!(editor.undo().is_none());
        assert!(editor.holds().is_empty());
    }

    #[test]
    fn encode_requires_holds() {
        let mut editor = editor(false);
        assert!(matches!(editor.encode(), Err(HoldsFormatError::Empty)));
        editor.pointer_up(250.0, 200.0, "#00ff00");
        editor.pointer_down(250.0, 200.0);
        let json = editor.encode().expect("encode");
        assert_eq!(json, r##"[{"x":0.5,"y":0.5,"color":"#00ff00"}]"##);
    }

    #[test]
    fn marks_snap_to_polygons_only_when_asked() {
        let mut editor = editor(true);
        editor.load_holds(vec![
            Hold::new(Point { x: 0.25, y: 0.3 }, "#0000ff".to_string(), 0.0),
            Hold::new(Point { x: 0.9, y: 0.1 }, "#ff0000".to_string(), 0.0),
        ]);
        let snapped = editor.marks(true);
        assert_eq!(snapped.len(), 2);
        assert!(matches!(snapped[0], Mark::Polygon { color: "#0000ff", .. }));
        assert_eq!(
            snapped[1],
            Mark::Circle {
                x: 450.0,
                y: 40.0,
                radius: 10.0,
                color: "#ff0000"
            }
        );
        let plain = editor.marks(false);
        assert!(plain.iter().all(|mark| matches!(mark, Mark::Circle { .. })));
    }

    #[test]
    fn resize_updates_radius() {
        let mut editor = editor(false);
        editor.pointer_up(10.0, 10.0, "#00ff00");
        editor.set_canvas_size(1000.0, 800.0);
        assert_eq!(editor.holds()[0].radius, 20.0);
        assert_eq!(editor.radius_px(), 20.0);
    }
}
