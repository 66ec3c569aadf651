use nalgebra::{Point2, Vector2};

use super::polygon::Polygon;

pub fn sqr_dist(a: Point2<f64>, b: Point2<f64>) -> f64 {
    (a - b).norm_squared()
}

/// Mirrors a point across the page height. The two reference frames are
/// screen coords (positive y downward, origin top left) and graph coords
/// (positive y upward, origin bottom left).
pub fn flip_y(p: Point2<f64>, page_height: f64) -> Point2<f64> {
    Point2::new(p.x, page_height - p.y)
}

/// Axis-aligned bounding box stored as center plus half extents.
/// Square by default; containment is closed (inclusive on the boundary).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub center: Point2<f64>,
    pub half_width: f64,
    pub half_height: f64,
}

impl BoundingBox {
    pub fn new(center: Point2<f64>, half_width: f64, half_height: f64) -> Self {
        Self {
            center,
            half_width,
            half_height,
        }
    }

    pub fn square(center: Point2<f64>, half: f64) -> Self {
        Self::new(center, half, half)
    }

    pub fn contains(&self, p: Point2<f64>) -> bool {
        (p.x - self.center.x).abs() <= self.half_width
            && (p.y - self.center.y).abs() <= self.half_height
    }

    pub fn min(&self) -> Point2<f64> {
        self.center - Vector2::new(self.half_width, self.half_height)
    }

    pub fn max(&self) -> Point2<f64> {
        self.center + Vector2::new(self.half_width, self.half_height)
    }

    /// Smallest box enclosing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let min = Point2::new(self.min().x.min(other.min().x), self.min().y.min(other.min().y));
        let max = Point2::new(self.max().x.max(other.max().x), self.max().y.max(other.max().y));
        let center = nalgebra::center(&min, &max);
        BoundingBox::new(center, (max.x - min.x) / 2.0, (max.y - min.y) / 2.0)
    }

    pub fn corners(&self) -> [Point2<f64>; 4] {
        let top_left = Point2::new(self.center.x - self.half_width, self.center.y + self.half_height);
        let top_right = Point2::new(self.center.x + self.half_width, self.center.y + self.half_height);
        let bottom_right = Point2::new(self.center.x + self.half_width, self.center.y - self.half_height);
        let bottom_left = Point2::new(self.center.x - self.half_width, self.center.y - self.half_height);
        [top_left, top_right, bottom_right, bottom_left]
    }

    /// Closed loop of corner points (first corner repeated at the end),
    /// suitable for drawing the cell outline.
    pub fn corner_loop(&self) -> Vec<Point2<f64>> {
        let c = self.corners();
        vec![c[0], c[1], c[2], c[3], c[0]]
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::from_points(&self.corner_loop())
    }
}

/// Straight line segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StraightLine {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl StraightLine {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    pub fn point_at(&self, t: f64) -> Point2<f64> {
        self.start + (self.end - self.start) * t
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}
