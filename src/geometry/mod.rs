pub mod bezier;
pub mod polygon;
pub mod primitives;


pub use bezier::*;
pub use polygon::*;
pub use primitives::*;

use nalgebra::Point2;

/// A closed boundary that can report its defining points and produce a
/// uniform sampling of itself, regardless of whether it is stored as a
/// curve sequence or a line sequence.
pub trait Contour {
    /// The points that define the shape (endpoints and, for curve
    /// sequences, control points).
    fn defining_points(&self) -> Vec<Point2<f64>>;

    /// Samples the boundary at `n` parameter values per segment.
    fn sample_uniform(&self, n: usize) -> Vec<Point2<f64>>;
}
