// src/math/geometry/voronoi/mod.rs

pub mod config;
pub mod equalization;
pub mod power_diagram;
pub mod site;

pub use config::EqualizationConfig;
pub use equalization::{EqualizationEngine, IterationReport, Termination, equalize};
pub use power_diagram::{DiagramSolver, PowerDiagram};
pub use site::{Site, normalize_fractions};
