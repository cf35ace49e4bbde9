// src/math/types/bounds.rs

use crate::math::{error::*, types::*};
use std::fmt;

/// 2D Bounding Box (Axis-Aligned Bounding Box)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds2D {
    /// Erstellt eine neue Bounding Box
    pub fn new(min: Point2D, max: Point2D) -> MathResult<Self> {
        if min.x > max.x || min.y > max.y {
            return Err(MathError::InvalidConfiguration {
                message: format!("Invalid bounds: min {:?} > max {:?}", min, max),
            });
        }

        Ok(Self { min, max })
    }

    /// Erstellt eine Bounding Box aus zwei beliebigen Punkten
    pub fn from_points(p1: Point2D, p2: Point2D) -> Self {
        Self {
            min: Point2D::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            max: Point2D::new(p1.x.max(p2.x), p1.y.max(p2.y)),
        }
    }

    /// Erstellt eine Bounding Box die alle Punkte umschließt
    pub fn from_points_iter<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2D>,
    {
        let mut points_iter = points.into_iter();
        let first_point = points_iter.next()?;

        let mut min = first_point;
        let mut max = first_point;

        for point in points_iter {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        Some(Self { min, max })
    }

    /// Leere Bounding Box (ungültig)
    pub fn empty() -> Self {
        Self {
            min: Point2D::new(f64::INFINITY, f64::INFINITY),
            max: Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Prüft ob die Bounding Box leer ist
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Breite der Bounding Box
    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    /// Höhe der Bounding Box
    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }

    /// Die größere der beiden Ausdehnungen
    pub fn max_extent(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Fläche der Bounding Box
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    /// Prüft ob ein Punkt in der Bounding Box liegt (Rand eingeschlossen)
    pub fn contains_point(&self, point: Point2D) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Prüft ob eine andere Bounding Box vollständig enthalten ist
    pub fn contains_bounds(&self, other: &Bounds2D) -> bool {
        if other.is_empty() {
            return true;
        }
        if self.is_empty() {
            return false;
        }

        self.min.x <= other.min.x
            && self.max.x >= other.max.x
            && self.min.y <= other.min.y
            && self.max.y >= other.max.y
    }

    /// Prüft ob sich zwei Bounding Boxes echt überschneiden.
    ///
    /// Boxen, die sich nur an einer Kante oder Ecke berühren, gelten als disjunkt.
    pub fn intersects(&self, other: &Bounds2D) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Erzeugt die vier Eckpunkte der Bounding Box (gegen den Uhrzeigersinn)
    pub fn corners(&self) -> [Point2D; 4] {
        [
            self.min,                             // unten links
            Point2D::new(self.max.x, self.min.y), // unten rechts
            self.max,                             // oben rechts
            Point2D::new(self.min.x, self.max.y), // oben links
        ]
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Bounds2D(empty)")
        } else {
            write!(
                f,
                "Bounds2D(({}, {}) to ({}, {}))",
                self.min.x, self.min.y, self.max.x, self.max.y
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Bounds2D {
        Bounds2D::from_points(Point2D::new(x0, y0), Point2D::new(x1, y1))
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let result = Bounds2D::new(Point2D::new(1.0, 0.0), Point2D::new(0.0, 1.0));
        assert!(matches!(
            result,
            Err(MathError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_intersects_is_strict() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        assert!(a.intersects(&rect(0.5, 0.5, 2.0, 2.0)));
        // Nur Kantenberührung
        assert!(!a.intersects(&rect(1.0, 0.0, 2.0, 1.0)));
        assert!(!a.intersects(&rect(5.0, 5.0, 6.0, 6.0)));
        assert!(!a.intersects(&Bounds2D::empty()));
    }

    #[test]
    fn test_contains_bounds() {
        let outer = rect(0.0, 0.0, 10.0, 10.0);
        assert!(outer.contains_bounds(&rect(2.0, 2.0, 8.0, 8.0)));
        assert!(outer.contains_bounds(&outer));
        assert!(!outer.contains_bounds(&rect(5.0, 5.0, 15.0, 15.0)));
    }

    #[test]
    fn test_from_points_iter() {
        let bounds = Bounds2D::from_points_iter([
            Point2D::new(3.0, -1.0),
            Point2D::new(-2.0, 4.0),
            Point2D::new(0.0, 0.0),
        ])
        .unwrap();

        assert_eq!(bounds.min, Point2D::new(-2.0, -1.0));
        assert_eq!(bounds.max, Point2D::new(3.0, 4.0));
        assert_eq!(bounds.max_extent(), 5.0);
        assert!(Bounds2D::from_points_iter(std::iter::empty()).is_none());
    }
}
