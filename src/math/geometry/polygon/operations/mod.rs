// src/math/geometry/polygon/operations/mod.rs
pub mod clipping;
pub mod sampling;

pub use clipping::*;
pub use sampling::*;
