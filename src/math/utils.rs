// src/math/utils.rs

/// Mathematische Konstanten
pub mod constants {
    pub const EPSILON: f64 = 1e-10;
    pub const EPSILON_SQUARED: f64 = EPSILON * EPSILON; // Für Vergleiche mit Längen
    pub const TAU: f64 = std::f64::consts::TAU;
}

/// Geometrische Hilfsfunktionen (einfach, ohne komplexe Strukturen)
pub mod simple_geometry {
    use crate::math::error::{MathError, MathResult};
    use crate::math::types::{Point2D, Vector2DExt};

    /// Vorzeichen der doppelten Dreiecksfläche `abc`: 1 links, -1 rechts, 0 kollinear
    pub fn area_sign(a: Point2D, b: Point2D, c: Point2D) -> i8 {
        let area2 = (b - a).cross_product(&(c - a));
        if area2 > 0.0 {
            1
        } else if area2 < 0.0 {
            -1
        } else {
            0
        }
    }

    /// Kürzester Abstand eines Punktes zum Segment `start`-`end`
    pub fn point_segment_distance(point: Point2D, start: Point2D, end: Point2D) -> f64 {
        let segment = end - start;
        let length_sq = segment.norm_squared();
        if length_sq == 0.0 {
            return nalgebra::distance(&point, &start);
        }

        let t = ((point - start).dot(&segment) / length_sq).clamp(0.0, 1.0);
        nalgebra::distance(&point, &(start + segment * t))
    }

    /// Schnittpunkt des Segments `p1`-`p2` mit dem Segment `p3`-`p4`.
    ///
    /// Liegen `p3` und `p4` auf derselben Seite der Geraden durch `p1`-`p2`, gibt es
    /// keinen Schnitt. Parallele Geraden erreichen die Nenner-Prüfung daher nur bei
    /// inkonsistenter Arithmetik und werden als [`MathError::UnreachableGeometry`] gemeldet.
    pub fn segment_intersection(
        p1: Point2D,
        p2: Point2D,
        p3: Point2D,
        p4: Point2D,
    ) -> MathResult<Option<Point2D>> {
        let direction = p2 - p1;
        let side3 = (p3 - p1).cross_product(&direction);
        let side4 = (p4 - p1).cross_product(&direction);
        if side3 * side4 >= 0.0 {
            return Ok(None);
        }

        let denominator = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
        if denominator == 0.0 {
            return Err(MathError::UnreachableGeometry {
                reason: "lines are parallel".to_string(),
            });
        }

        let ua = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denominator;
        let ub = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / denominator;

        if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
            Ok(Some(p1 + direction * ua))
        } else {
            Ok(None)
        }
    }
}

/// Random utilities (erweitert vorhandene rand-Funktionalität)
pub mod random {
    use crate::math::types::{Bounds2D, Point2D};
    use rand::Rng;

    /// Generiert einen gleichverteilten Punkt in einem Rechteck
    pub fn random_point_in_bounds<R: Rng + ?Sized>(bounds: &Bounds2D, rng: &mut R) -> Point2D {
        Point2D::new(
            bounds.min.x + rng.random::<f64>() * bounds.width(),
            bounds.min.y + rng.random::<f64>() * bounds.height(),
        )
    }
}
