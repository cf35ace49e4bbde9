// src/math/geometry/polygon/core/mod.rs

pub mod polygon;
pub mod properties;

pub use polygon::Polygon;
pub use properties::{Orientation, PolygonProperties};
