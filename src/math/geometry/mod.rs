// src/math/geometry/mod.rs

// Deklaration der Haupt-Geometriemodule
pub mod polygon;
pub mod voronoi;

// Re-Exporte für einen schnellen Zugriff auf die Kern-Geometrietypen,
// falls man nicht das gesamte `math::prelude` importieren möchte.
pub use self::polygon::{
    AffineTransform, AffineTransformable, Orientation, Polygon, PolygonClipper, PolygonProperties,
    ShapeGenerators, ShrunkPolygon,
};
pub use self::voronoi::{
    DiagramSolver, EqualizationConfig, EqualizationEngine, IterationReport, PowerDiagram, Site,
    Termination, equalize,
};
