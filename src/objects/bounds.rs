use crate::objects::Position;

/// Running maxima over every vertex of every frame.
///
/// Both metrics start at an implicit `0` and only move once a strictly
/// greater value shows up. `None` means the metric never left that baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    radius: Option<f64>,
    height: Option<f64>,
}

impl Bounds {
    pub fn new() -> Self {
        return Bounds::default();
    }

    pub fn include(&mut self, position: Position) {
        let [x, y, z] = position;

        let radius = if z.abs() > x.abs() { z.abs() } else { x.abs() };
        if radius > self.max_radius() {
            self.radius = Some(radius);
        }

        if y > self.max_y() {
            self.height = Some(y);
        }
    }

    /// Largest `|x|` or `|z|` seen so far.
    pub fn max_radius(&self) -> f64 {
        return self.radius.unwrap_or(0.0);
    }

    /// Largest `y` seen so far.
    pub fn max_y(&self) -> f64 {
        return self.height.unwrap_or(0.0);
    }

    pub fn radius(&self) -> Option<f64> {
        return self.radius;
    }

    pub fn height(&self) -> Option<f64> {
        return self.height;
    }
}
