// geometry.rs
// Axis-aligned rectangles, circles and 2-D rotation used by selection and boundary checks

use ultraviolet::DVec2;

/// Axis-aligned rectangle given by its extreme coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    /// Bounding box of a disk.
    pub fn around(center: DVec2, radius: f64) -> Self {
        Self::new(center.x - radius, center.y - radius, center.x + radius, center.y + radius)
    }

    /// True when the projections on either axis do not overlap.
    /// Touching edges count as disjoint.
    pub fn isdisjoint(&self, other: &Rect) -> bool {
        self.x_min >= other.x_max
            || self.x_max <= other.x_min
            || self.y_min >= other.y_max
            || self.y_max <= other.y_min
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    /// Symmetric "one disk contains the other's center" test.
    pub fn is_in_range(&self, other: &Circle) -> bool {
        let d = ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt();
        d <= self.r.max(other.r)
    }
}

/// Rotate `(x, y)` about `(cx, cy)` by `-angle_deg` degrees.
pub fn rotate2d(x: f64, y: f64, cx: f64, cy: f64, angle_deg: f64) -> (f64, f64) {
    let angle = -angle_deg.to_radians();
    let (sin, cos) = angle.sin_cos();
    let (dx, dy) = (x - cx, y - cy);
    (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
}
