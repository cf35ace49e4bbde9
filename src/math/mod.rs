pub mod error;
pub mod geometry;
pub mod types;
pub mod utils;

// Re-Exports für einfache Verwendung
pub use error::{MathError, MathResult};
pub use types::*;

// Öffentliche API
pub mod prelude {
    pub use super::{
        error::{MathError, MathResult},
        geometry::{
            polygon::{
                AffineTransform, AffineTransformable, Orientation, Polygon, PolygonClipper,
                PolygonProperties, ShapeGenerators, ShrunkPolygon,
            },
            voronoi::{
                DiagramSolver, EqualizationConfig, EqualizationEngine, IterationReport,
                PowerDiagram, Site, Termination, equalize, normalize_fractions,
            },
        },
        types::*,
    };
}
