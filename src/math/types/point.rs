// src/math/types/point.rs
use nalgebra::{Point2, Vector2};

// Einheitliche Typen für das gesamte Modul
pub type Point2D = Point2<f64>;
pub type Vector2D = Vector2<f64>;

/// Erweiterte Vektor-Operationen für 2D-Vektoren
pub trait Vector2DExt {
    /// z-Komponente des Kreuzprodukts, `a.x * b.y - a.y * b.x`
    fn cross_product(&self, other: &Self) -> f64;
}

impl Vector2DExt for Vector2D {
    fn cross_product(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

/// Prüft ob alle Koordinaten endlich sind
pub fn is_finite_point(point: &Point2D) -> bool {
    point.x.is_finite() && point.y.is_finite()
}
