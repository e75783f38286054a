pub const DEFAULT_SWIPE_THRESHOLD: f64 = 75.0;

/// Named after the finger's direction of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved right to left: show the previous problem.
    Right,
    /// Finger moved left to right: show the next problem.
    Left,
}

#[derive(Clone, Copy, Debug)]
pub struct SwipeTracker {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub threshold: f64,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            start_x: 0.0,
            start_y: 0.0,
            end_x: 0.0,
            end_y: 0.0,
            threshold,
        }
    }

    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.start_x = x;
        self.start_y = y;
    }

    pub fn touch_end(&mut self, x: f64, y: f64) -> Option<Swipe> {
        self.end_x = x;
        self.end_y = y;
        self.classify()
    }

    /// Horizontal travel must beat both the threshold and the vertical travel.
    pub fn is_horizontal(&self) -> bool {
        let dx = (self.end_x - self.start_x).abs();
        let dy = (self.end_y - self.start_y).abs();
        dx > self.threshold && dx > dy
    }

    pub fn classify(&self) -> Option<Swipe> {
        if !self.is_horizontal() {
            return None;
        }
        if self.end_x < self.start_x {
            Some(Swipe::Right)
        } else if self.end_x > self.start_x {
            Some(Swipe::Left)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gesture(start: (f64, f64), end: (f64, f64)) -> Option<Swipe> {
        let mut tracker = SwipeTracker::default();
        tracker.touch_start(start.0, start.1);
        tracker.touch_end(end.0, end.1)
    }

    #[test]
    fn left_to_right_loads_next() {
        assert_eq!(gesture((100.0, 100.0), (200.0, 100.0)), Some(Swipe::Left));
    }

    #[test]
    fn right_to_left_loads_previous() {
        assert_eq!(gesture((300.0, 100.0), (120.0, 140.0)), Some(Swipe::Right));
    }

    #[test]
    fn short_gesture_is_ignored() {
        assert_eq!(gesture((100.0, 100.0), (150.0, 180.0)), None);
        assert_eq!(gesture((100.0, 100.0), (175.0, 100.0)), None);
    }

    #[test]
    fn vertical_scroll_is_ignored() {
        assert_eq!(gesture((100.0, 100.0), (190.0, 300.0)), None);
    }

    #[test]
    fn custom_threshold_applies() {
        let mut tracker = SwipeTracker::new(20.0);
        tracker.touch_start(50.0, 50.0);
        assert_eq!(tracker.touch_end(80.0, 55.0), Some(Swipe::Left));
        assert!(tracker.is_horizontal());
    }
}
