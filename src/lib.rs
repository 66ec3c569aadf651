pub mod geometry;
pub mod mesh;
pub mod outline;
