// src/math/geometry/polygon/mod.rs

// Deklaration der Untermodule für Polygon-spezifische Funktionalität
pub mod builder;
pub mod convert;
pub mod core; // Enthält die Polygon-Struktur und den PolygonProperties-Trait
pub mod operations; // Clipping und Sampling
pub mod transformations; // Affine Transformationen und Schrumpfen

// Re-Exporte für den einfachen Zugriff auf die wichtigsten Polygon-Elemente
pub use self::builder::ShapeGenerators;
pub use self::core::{Orientation, Polygon, PolygonProperties};
pub use self::operations::{MAX_SAMPLING_ATTEMPTS, PolygonClipper};
pub use self::transformations::{AffineTransform, AffineTransformable, ShrunkPolygon};
