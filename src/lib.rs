// src/lib.rs

pub mod algebra;
pub mod color;
pub mod error;
pub mod geometry;
pub mod render;
pub mod shape;
pub mod spec;

pub use color::{ColorValue, Coloring, Rgb};
pub use error::ShapeError;
pub use geometry::Ring;
pub use render::{DrawTarget, Renderer, TriangleMesh, Vertex};
pub use shape::{Shape, CIRCLE_VERTICES};
pub use spec::ShapeSpec;
