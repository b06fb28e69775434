//! Derived shape measurements.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Immutable measurement result for one shape.
///
/// Constructed only by the kernel in [`crate::geometry`], which guarantees
/// `area >= 0`, `perimeter >= 0`, `feret_min <= feret_max`, and
/// non-negative bounding extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    pub area: f64,
    pub perimeter: f64,
    pub centroid_x: f64,
    pub centroid_y: f64,
    /// Smallest caliper width over all rotation angles.
    pub feret_min: f64,
    /// Largest caliper width over all rotation angles.
    pub feret_max: f64,
    pub box_width: f64,
    pub box_height: f64,
}

impl ShapeDescriptor {
    pub(crate) fn new(
        area: f64,
        perimeter: f64,
        centroid: Point,
        feret: (f64, f64),
        box_size: (f64, f64),
    ) -> Self {
        let (feret_min, feret_max) = feret;
        Self {
            area: area.abs(),
            perimeter: perimeter.abs(),
            centroid_x: centroid.x,
            centroid_y: centroid.y,
            feret_min: feret_min.min(feret_max),
            feret_max,
            box_width: box_size.0.abs(),
            box_height: box_size.1.abs(),
        }
    }

    pub fn centroid(&self) -> Point {
        Point::new(self.centroid_x, self.centroid_y)
    }

    /// Same measurements with the centroid shifted by `offset`.
    pub fn translated(mut self, offset: Vec2) -> Self {
        self.centroid_x += offset.x;
        self.centroid_y += offset.y;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_enforces_ordering() {
        let d = ShapeDescriptor::new(-4.0, 8.0, Point::ZERO, (3.0, 2.0), (2.0, -2.0));
        assert_eq!(d.area, 4.0);
        assert!(d.feret_min <= d.feret_max);
        assert_eq!(d.box_height, 2.0);
    }

    #[test]
    fn translation_moves_only_centroid() {
        let d = ShapeDescriptor::new(1.0, 4.0, Point::new(0.5, 0.5), (1.0, 1.5), (1.0, 1.0));
        let moved = d.translated(Vec2::new(10.0, -1.0));
        assert_eq!(moved.centroid(), Point::new(10.5, -0.5));
        assert_eq!(moved.area, d.area);
        assert_eq!(moved.feret_max, d.feret_max);
    }
}
