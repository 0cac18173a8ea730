use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A quadrilateral in canonical corner order: top-left, top-right,
/// bottom-right, bottom-left. Construct via [`Quad::from_unordered`] unless
/// the corners are already known to be canonical.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub corners: [Point2<f32>; 4],
}

impl Quad {
    pub fn new(corners: [Point2<f32>; 4]) -> Self {
        Self { corners }
    }

    /// Canonically order the corners before storing them.
    pub fn from_unordered(corners: [Point2<f32>; 4]) -> Self {
        Self {
            corners: crate::order_corners(corners),
        }
    }

    #[inline]
    pub fn top_left(&self) -> Point2<f32> {
        self.corners[0]
    }

    #[inline]
    pub fn top_right(&self) -> Point2<f32> {
        self.corners[1]
    }

    #[inline]
    pub fn bottom_right(&self) -> Point2<f32> {
        self.corners[2]
    }

    #[inline]
    pub fn bottom_left(&self) -> Point2<f32> {
        self.corners[3]
    }

    /// Lengths of the four edges in corner order: top, right, bottom, left.
    pub fn edge_lengths(&self) -> [f32; 4] {
        let c = &self.corners;
        [
            dist(c[0], c[1]),
            dist(c[1], c[2]),
            dist(c[2], c[3]),
            dist(c[3], c[0]),
        ]
    }

    /// Short side of the card: min of the top edge and the right edge.
    pub fn short_edge(&self) -> f32 {
        let e = self.edge_lengths();
        e[0].min(e[1])
    }

    /// Long side of the card: max of the left edge and the bottom edge.
    pub fn long_edge(&self) -> f32 {
        let e = self.edge_lengths();
        e[3].max(e[2])
    }

    /// Shortest edge, used by the minimum-edge candidate filter.
    pub fn min_edge(&self) -> f32 {
        let e = self.edge_lengths();
        e[0].min(e[1]).min(e[2]).min(e[3])
    }

    /// Enclosed area via the shoelace formula.
    pub fn area(&self) -> f32 {
        polygon_area(&self.corners)
    }
}

/// Shoelace area of a closed polygon (absolute value).
pub fn polygon_area(points: &[Point2<f32>]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let mut acc = 0.0f32;
    for i in 0..n {
        let j = (i + 1) % n;
        acc += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    (acc * 0.5).abs()
}

#[inline]
fn dist(a: Point2<f32>, b: Point2<f32>) -> f32 {
    (a - b).norm()
}

/// A detected circle in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point2<f32>,
    pub radius: f32,
}

/// Best shape found by a detection pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DetectedShape {
    Quad(Quad),
    Circle(Circle),
}

/// Which shape family a guidance verdict refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    None,
    Rectangle,
    Circle,
}
