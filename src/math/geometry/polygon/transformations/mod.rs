// src/math/geometry/polygon/transformations/mod.rs
pub mod affine;

pub use affine::*;
