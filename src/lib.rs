// src/lib.rs

pub mod math;
pub mod treemap;

pub use math::geometry::voronoi::{EqualizationConfig, IterationReport, Site, equalize};
pub use math::{MathError, MathResult};
pub use treemap::{CellResult, TreemapService, TreemapSettings, decompose};
