use nalgebra::Point2;

use super::primitives::{BoundingBox, StraightLine};
use super::Contour;

/// Ordered closed loop of straight line segments. Consecutive segments
/// share an endpoint and the last segment ends where the first starts.
#[derive(Clone, Debug, Default)]
pub struct Polygon {
    pub lines: Vec<StraightLine>,
}

impl Polygon {
    pub fn new(lines: Vec<StraightLine>) -> Self {
        Self { lines }
    }

    /// Builds a polygon by connecting consecutive points. Fewer than two
    /// points yields an empty polygon.
    pub fn from_points(points: &[Point2<f64>]) -> Self {
        let lines = points
            .windows(2)
            .map(|w| StraightLine::new(w[0], w[1]))
            .collect();
        Self { lines }
    }

    pub fn num_sides(&self) -> usize {
        self.lines.len()
    }

    /// Drops zero-length segments. Degenerate segments carry no geometric
    /// information but would confuse the crossing test and bounding-box
    /// logic downstream.
    pub fn remove_zero_length_lines(mut self) -> Self {
        self.lines.retain(|l| !l.is_degenerate());
        self
    }

    /// Even-odd (crossing parity) containment test. A ray is cast in +x
    /// and the parity of edge crossings decides containment; the
    /// half-open y-straddle test makes shared vertices count once.
    pub fn contains_point(&self, p: Point2<f64>) -> bool {
        let mut inside = false;
        for line in &self.lines {
            let a = line.start;
            let b = line.end;
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// True if all four corners of the box pass the containment test.
    /// Adequate for cells at or near the minimum size once the boundary
    /// has been refined to that resolution.
    pub fn contains_box(&self, b: &BoundingBox) -> bool {
        b.corners().iter().all(|&c| self.contains_point(c))
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let points = self.defining_points();
        let first = *points.first()?;
        let mut min = first;
        let mut max = first;
        for p in &points {
            min = Point2::new(min.x.min(p.x), min.y.min(p.y));
            max = Point2::new(max.x.max(p.x), max.y.max(p.y));
        }
        let center = nalgebra::center(&min, &max);
        Some(BoundingBox::new(
            center,
            (max.x - min.x) / 2.0,
            (max.y - min.y) / 2.0,
        ))
    }

    pub fn total_length(&self) -> f64 {
        self.lines.iter().map(|l| l.length()).sum()
    }
}

impl Contour for Polygon {
    fn defining_points(&self) -> Vec<Point2<f64>> {
        let Some(first) = self.lines.first() else {
            return Vec::new();
        };
        let mut points = Vec::with_capacity(self.lines.len() + 1);
        points.push(first.start);
        for line in &self.lines {
            points.push(line.end);
        }
        points
    }

    fn sample_uniform(&self, n: usize) -> Vec<Point2<f64>> {
        let mut points = Vec::with_capacity(self.lines.len() * n);
        for line in &self.lines {
            for k in 0..n {
                points.push(line.point_at(k as f64 / n as f64));
            }
        }
        points
    }
}
