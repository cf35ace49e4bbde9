// src/math/geometry/polygon/builder.rs

use super::Polygon;
use crate::math::utils::constants::TAU;
use crate::math::{error::*, types::*};

/// Geometrie-Generatoren für typische Clip-Regionen
pub struct ShapeGenerators;

impl ShapeGenerators {
    /// Reguläres n-Eck um den Ursprung.
    ///
    /// Vertex `i` liegt beim Winkel `(i - 0.5) * 2π / n`, damit liegt beim Quadrat
    /// eine Kante parallel zur x-Achse.
    pub fn regular_polygon(sides: usize, radius: f64) -> MathResult<Polygon> {
        if sides < 3 {
            return Err(MathError::InsufficientPoints {
                expected: 3,
                actual: sides,
            });
        }
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(MathError::InvalidConfiguration {
                message: format!("Polygon radius must be positive, got {}", radius),
            });
        }

        let step = TAU / sides as f64;
        let vertices = (0..sides)
            .map(|i| {
                let angle = (i as f64 - 0.5) * step;
                Point2D::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect();

        Polygon::new(vertices)
    }

    /// Achsenparalleles Rechteck mit linker unterer Ecke `min`
    pub fn rectangle(min: Point2D, width: f64, height: f64) -> MathResult<Polygon> {
        let bounds = Bounds2D::new(min, Point2D::new(min.x + width, min.y + height))?;
        Polygon::from_rect(&bounds)
    }
}
