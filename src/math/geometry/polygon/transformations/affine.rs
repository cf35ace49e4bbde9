// src/math/geometry/polygon/transformations/affine.rs

use super::super::{Polygon, PolygonProperties};
use crate::math::{error::*, types::*};

/// Affine Transformations-Matrix (3x3 für 2D)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    // Matrix in der Form: [a c tx]
    //                    [b d ty]
    //                    [0 0  1]
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl AffineTransform {
    /// Identitäts-Transformation
    pub fn identity() -> Self {
        Self::uniform_scale(1.0)
    }

    /// Translation
    pub fn translation(offset: Vector2D) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx: offset.x,
            ty: offset.y,
        }
    }

    /// Uniforme Skalierung um den Ursprung
    pub fn uniform_scale(factor: f64) -> Self {
        Self {
            a: factor,
            b: 0.0,
            c: 0.0,
            d: factor,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Transformations-Komposition: zuerst `other`, danach `self`
    pub fn compose(&self, other: &AffineTransform) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// Inverse Transformation
    pub fn inverse(&self) -> MathResult<Self> {
        let det = self.a * self.d - self.b * self.c;

        if det.abs() < 1e-12 || !det.is_finite() {
            return Err(MathError::InvalidConfiguration {
                message: format!("Affine transform is not invertible (det = {})", det),
            });
        }

        let inv_det = 1.0 / det;

        Ok(Self {
            a: self.d * inv_det,
            b: -self.b * inv_det,
            c: -self.c * inv_det,
            d: self.a * inv_det,
            tx: (self.c * self.ty - self.d * self.tx) * inv_det,
            ty: (self.b * self.tx - self.a * self.ty) * inv_det,
        })
    }

    /// Transformiert einen Punkt
    pub fn transform_point(&self, point: Point2D) -> Point2D {
        Point2D::new(
            self.a * point.x + self.c * point.y + self.tx,
            self.b * point.x + self.d * point.y + self.ty,
        )
    }

    /// Determinante des linearen Anteils (Flächen-Skalierungsfaktor)
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Trait für affine Transformationen
pub trait AffineTransformable {
    fn transform_mut(&mut self, transform: &AffineTransform);

    // Convenience-Methoden
    fn translate(&mut self, offset: Vector2D) {
        self.transform_mut(&AffineTransform::translation(offset));
    }

    fn scale(&mut self, factor: f64) {
        self.transform_mut(&AffineTransform::uniform_scale(factor));
    }
}

impl AffineTransformable for Polygon {
    fn transform_mut(&mut self, transform: &AffineTransform) {
        self.map_vertices(|vertex| transform.transform_point(vertex));
    }
}

impl AffineTransformable for Point2D {
    fn transform_mut(&mut self, transform: &AffineTransform) {
        *self = transform.transform_point(*self);
    }
}

/// Verkleinertes Polygon zusammen mit seinem Original
#[derive(Debug, Clone, PartialEq)]
pub struct ShrunkPolygon {
    pub shrunk: Polygon,
    pub original: Polygon,
}

impl AffineTransformable for ShrunkPolygon {
    fn transform_mut(&mut self, transform: &AffineTransform) {
        self.shrunk.transform_mut(transform);
        self.original.transform_mut(transform);
    }
}

impl Polygon {
    /// Zieht jeden Vertex um `factor` zum Schwerpunkt hin.
    ///
    /// `factor` muss in `(0, 1]` liegen. Das unveränderte Polygon bleibt als
    /// `original` im Ergebnis erhalten.
    pub fn shrink(&self, factor: f64) -> MathResult<ShrunkPolygon> {
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(MathError::InvalidConfiguration {
                message: format!("Shrink factor must be in (0, 1], got {}", factor),
            });
        }
        if !self.has_area() {
            return Err(MathError::GeometricFailure {
                operation: format!("shrink of zero-area {}", self),
            });
        }

        let centroid = self.centroid().coords;
        let toward_centroid = AffineTransform::translation(centroid)
            .compose(&AffineTransform::uniform_scale(factor))
            .compose(&AffineTransform::translation(-centroid));

        let mut shrunk = self.clone();
        shrunk.transform_mut(&toward_centroid);

        Ok(ShrunkPolygon {
            shrunk,
            original: self.clone(),
        })
    }
}
