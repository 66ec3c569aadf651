use nalgebra::Point2;

use super::polygon::Polygon;
use super::primitives::{sqr_dist, StraightLine};
use super::Contour;

/// Tolerances controlling when a cubic is considered flat enough to be
/// replaced by its chord.
#[derive(Clone, Copy, Debug)]
pub struct FlattenTolerance {
    /// Allowed perpendicular deviation of the control points, relative to
    /// the chord length.
    pub dist_rel: f64,
    /// Squared-distance threshold below which points are treated as
    /// coincident.
    pub dist_abs: f64,
    /// Allowed deviation of the endpoint tangents from a straight line,
    /// in radians.
    pub angle: f64,
}

impl Default for FlattenTolerance {
    fn default() -> Self {
        Self {
            dist_rel: 0.1,
            dist_abs: 0.01,
            angle: 2.0 * std::f64::consts::PI / 180.0,
        }
    }
}

/// Cubic parametric curve defined by four control points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Point2<f64>,
    pub p1: Point2<f64>,
    pub p2: Point2<f64>,
    pub p3: Point2<f64>,
}

impl CubicBezier {
    pub fn new(p0: Point2<f64>, p1: Point2<f64>, p2: Point2<f64>, p3: Point2<f64>) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// A straight segment expressed as a degenerate cubic: the control
    /// points coincide with the endpoints.
    pub fn line(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self::new(start, start, end, end)
    }

    /// Evaluates the curve at `t` in [0, 1] using the Bernstein form.
    pub fn point_at(&self, t: f64) -> Point2<f64> {
        let s = 1.0 - t;
        let c0 = self.p0.coords * (s * s * s);
        let c1 = self.p1.coords * (3.0 * t * s * s);
        let c2 = self.p2.coords * (3.0 * t * t * s);
        let c3 = self.p3.coords * (t * t * t);
        Point2::from(c0 + c1 + c2 + c3)
    }

    /// Bisects the curve at t = 0.5 by De Casteljau's algorithm. The two
    /// halves exactly reproduce the original shape.
    pub fn split(&self) -> (CubicBezier, CubicBezier) {
        let p01 = nalgebra::center(&self.p0, &self.p1);
        let p12 = nalgebra::center(&self.p1, &self.p2);
        let p23 = nalgebra::center(&self.p2, &self.p3);
        let p012 = nalgebra::center(&p01, &p12);
        let p123 = nalgebra::center(&p12, &p23);
        let p0123 = nalgebra::center(&p012, &p123);

        (
            CubicBezier::new(self.p0, p01, p012, p0123),
            CubicBezier::new(p0123, p123, p23, self.p3),
        )
    }

    /// Signed curvature at `t`. Returns 0 where the first derivative
    /// vanishes (possible when a control point is not distinct).
    pub fn curvature(&self, t: f64) -> f64 {
        let s = 1.0 - t;
        let d1 = (self.p1 - self.p0) * (3.0 * s * s)
            + (self.p2 - self.p1) * (6.0 * s * t)
            + (self.p3 - self.p2) * (3.0 * t * t);
        let d2 = (self.p2 - self.p1 * 2.0 + self.p0.coords) * (6.0 * s)
            + (self.p3 - self.p2 * 2.0 + self.p1.coords) * (6.0 * t);

        let speed2 = d1.norm_squared();
        if speed2 == 0.0 {
            return 0.0;
        }
        (d1.x * d2.y - d1.y * d2.x) / speed2.powf(1.5)
    }

    /// Whether the straight chord between the endpoints adequately
    /// approximates this curve. All four checks must pass:
    /// coincident endpoints, coincident control points, control-point
    /// deviation from the chord, and endpoint tangent angles.
    pub fn is_linear(&self, tol: &FlattenTolerance) -> bool {
        // Degenerate curve: endpoints effectively coincide.
        let chord_len2 = sqr_dist(self.p0, self.p3);
        if chord_len2 < tol.dist_abs {
            return true;
        }

        // Both control points sit on their endpoints: already a line.
        let dist01 = sqr_dist(self.p0, self.p1);
        let dist23 = sqr_dist(self.p2, self.p3);
        if dist01 < tol.dist_abs && dist23 < tol.dist_abs {
            return true;
        }

        // Perpendicular deviation of the control points from the chord,
        // via the cross-product formula. The summed deviation is compared
        // against dist_rel of the chord length.
        let chord = self.p3 - self.p0;
        let cross1 = (self.p1.x - self.p3.x) * chord.y - (self.p1.y - self.p3.y) * chord.x;
        let cross2 = (self.p2.x - self.p3.x) * chord.y - (self.p2.y - self.p3.y) * chord.x;
        let deviation2 = (cross1.abs() + cross2.abs()) * (cross1.abs() + cross2.abs());
        if deviation2 > tol.dist_rel * tol.dist_rel * chord_len2 * chord_len2 {
            return false;
        }

        // Tangent directions at both endpoints must be close to straight.
        // If a control point coincides with its endpoint, the tangent is
        // taken through the other control point.
        let a1 = if dist01 < tol.dist_abs {
            (self.p2.y - self.p0.y).atan2(self.p2.x - self.p0.x)
        } else {
            (self.p1.y - self.p0.y).atan2(self.p1.x - self.p0.x)
        };
        let a2 = if dist23 < tol.dist_abs {
            (self.p1.y - self.p3.y).atan2(self.p1.x - self.p3.x)
        } else {
            (self.p2.y - self.p3.y).atan2(self.p2.x - self.p3.x)
        };
        let angle = std::f64::consts::PI - (a1 - a2).abs();

        angle.abs() <= tol.angle
    }

    /// The straight chord between the endpoints.
    pub fn chord(&self) -> StraightLine {
        StraightLine::new(self.p0, self.p3)
    }
}

/// Ordered sequence of cubics sharing endpoints, representing one closed
/// boundary.
#[derive(Clone, Debug, Default)]
pub struct Beziergon {
    pub curves: Vec<CubicBezier>,
}

impl Beziergon {
    pub fn new(curves: Vec<CubicBezier>) -> Self {
        Self { curves }
    }

    pub fn num_curves(&self) -> usize {
        self.curves.len()
    }

    /// One refinement pass: every curve that fails the flatness test is
    /// replaced by its two bisected halves. Ordering and adjacency are
    /// preserved.
    pub fn refine(&self, tol: &FlattenTolerance) -> Beziergon {
        let mut refined = Vec::with_capacity(self.curves.len());
        for c in &self.curves {
            if c.is_linear(tol) {
                refined.push(*c);
            } else {
                let (a, b) = c.split();
                refined.push(a);
                refined.push(b);
            }
        }
        Beziergon::new(refined)
    }

    /// Refines until the segment count stops growing (fully flattened) or
    /// `max_segments` is reached.
    pub fn repeatedly_refine(&self, tol: &FlattenTolerance, max_segments: usize) -> Beziergon {
        let mut current = self.clone();
        let mut last_size = 0;
        while current.num_curves() < max_segments && current.num_curves() > last_size {
            last_size = current.num_curves();
            current = current.refine(tol);
        }
        current
    }

    /// Converts a flattened sequence into a polygon by taking each
    /// curve's chord. Meaningful only after refinement.
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.curves.iter().map(|c| c.chord()).collect())
    }

    /// Flattens to within tolerance and converts to a polygon, dropping
    /// degenerate zero-length segments.
    pub fn approximate_by_polygon(&self, tol: &FlattenTolerance, max_sides: usize) -> Polygon {
        self.repeatedly_refine(tol, max_sides)
            .to_polygon()
            .remove_zero_length_lines()
    }

    pub fn end_points(&self) -> Vec<Point2<f64>> {
        self.curves.iter().flat_map(|c| [c.p0, c.p3]).collect()
    }

    pub fn control_points(&self) -> Vec<Point2<f64>> {
        self.curves.iter().flat_map(|c| [c.p1, c.p2]).collect()
    }
}

impl Contour for Beziergon {
    fn defining_points(&self) -> Vec<Point2<f64>> {
        self.curves
            .iter()
            .flat_map(|c| [c.p0, c.p1, c.p2, c.p3])
            .collect()
    }

    fn sample_uniform(&self, n: usize) -> Vec<Point2<f64>> {
        let mut points = Vec::with_capacity(self.curves.len() * n);
        for c in &self.curves {
            for k in 0..n {
                points.push(c.point_at(k as f64 / n as f64));
            }
        }
        points
    }
}
