// src/math/geometry/polygon/core/properties.rs

use crate::math::geometry::polygon::Polygon;
use crate::math::types::*;
use crate::math::utils::{constants, simple_geometry};

/// Trait für Polygon-Eigenschaften
pub trait PolygonProperties {
    /// Vorzeichenbehaftete Fläche (positiv bei Orientierung gegen den Uhrzeigersinn)
    fn signed_area(&self) -> f64;

    /// Berechnet die Fläche des Polygons (Shoelace-Formel)
    fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Flächenschwerpunkt. Für Polygone ohne Fläche ist das Ergebnis NaN.
    fn centroid(&self) -> Point2D;

    /// Achsenparallele Bounding Box
    fn bounds(&self) -> Bounds2D;

    /// Hat das Polygon eine messbare Fläche?
    fn has_area(&self) -> bool {
        self.area() > constants::EPSILON
    }

    /// Prüft ob ein Punkt innerhalb des Polygons liegt (Ray-Casting)
    fn contains_point(&self, point: Point2D) -> bool;

    /// Prüft ob ein Rechteck vollständig im Polygon liegt
    fn contains_bounds(&self, rect: &Bounds2D) -> bool;

    /// Prüft ob das Polygon konvex ist
    fn is_convex(&self) -> bool;

    /// Prüft die Orientierung (im Uhrzeigersinn oder gegen)
    fn orientation(&self) -> Orientation;

    /// Kleinster Abstand eines Punktes zum Rand
    fn min_distance_to_border(&self, point: Point2D) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
}

impl PolygonProperties for Polygon {
    fn signed_area(&self) -> f64 {
        *self.cache.signed_area.get_or_init(|| {
            let doubled: f64 = self
                .edges()
                .map(|(a, b)| a.x * b.y - b.x * a.y)
                .sum();
            doubled * 0.5
        })
    }

    fn centroid(&self) -> Point2D {
        *self.cache.centroid.get_or_init(|| {
            let signed_area = self.signed_area();
            let (cx, cy) = self.edges().fold((0.0, 0.0), |(cx, cy), (a, b)| {
                let factor = a.x * b.y - b.x * a.y;
                (cx + (a.x + b.x) * factor, cy + (a.y + b.y) * factor)
            });

            let factor = 1.0 / (6.0 * signed_area);
            Point2D::new(cx * factor, cy * factor)
        })
    }

    fn bounds(&self) -> Bounds2D {
        *self.cache.bounds.get_or_init(|| {
            Bounds2D::from_points_iter(self.vertices().iter().copied())
                .unwrap_or_else(Bounds2D::empty)
        })
    }

    fn contains_point(&self, point: Point2D) -> bool {
        if self.len() < 3 || !self.bounds().contains_point(point) {
            return false;
        }

        let mut inside = false;
        for (vi, vj) in self.edges() {
            // Halboffene Kantenregel: untere Ecke zählt, obere nicht
            let crosses = (vi.y <= point.y && point.y < vj.y) || (vj.y <= point.y && point.y < vi.y);
            if crosses && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x {
                inside = !inside;
            }
        }

        inside
    }

    fn contains_bounds(&self, rect: &Bounds2D) -> bool {
        if rect.is_empty() || !self.bounds().contains_bounds(rect) {
            return false;
        }

        rect.corners()
            .iter()
            .all(|corner| self.contains_point(*corner))
    }

    fn is_convex(&self) -> bool {
        let n = self.len();
        if n < 3 {
            return false;
        }

        let vertices = self.vertices();
        let mut sign = None;

        for i in 0..n {
            let p1 = vertices[i];
            let p2 = vertices[(i + 1) % n];
            let p3 = vertices[(i + 2) % n];

            let cross_product = (p2 - p1).cross_product(&(p3 - p2));

            if cross_product.abs() > constants::EPSILON {
                let current_sign = cross_product > 0.0;

                match sign {
                    None => sign = Some(current_sign),
                    Some(s) if s != current_sign => return false,
                    _ => {}
                }
            }
        }

        true
    }

    fn orientation(&self) -> Orientation {
        let signed_area = self.signed_area();

        if signed_area.abs() < constants::EPSILON {
            Orientation::Collinear
        } else if signed_area > 0.0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Clockwise
        }
    }

    fn min_distance_to_border(&self, point: Point2D) -> f64 {
        self.edges()
            .map(|(start, end)| simple_geometry::point_segment_distance(point, start, end))
            .fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Polygon {
        Polygon::from_coords(&[(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)]).unwrap()
    }

    #[test]
    fn test_area_and_orientation() {
        let ccw = square(2.0);
        assert_relative_eq!(ccw.area(), 4.0);
        assert_relative_eq!(ccw.signed_area(), 4.0);
        assert_eq!(ccw.orientation(), Orientation::CounterClockwise);

        let cw = ccw.reversed();
        assert_relative_eq!(cw.area(), 4.0);
        assert_relative_eq!(cw.signed_area(), -4.0);
        assert_eq!(cw.orientation(), Orientation::Clockwise);
    }

    #[test]
    fn test_centroid_independent_of_winding() {
        let triangle = Polygon::from_coords(&[(0.0, 0.0), (3.0, 0.0), (0.0, 3.0)]).unwrap();
        let expected = Point2D::new(1.0, 1.0);

        let c = triangle.centroid();
        assert_relative_eq!(c.x, expected.x, epsilon = 1e-12);
        assert_relative_eq!(c.y, expected.y, epsilon = 1e-12);

        let c = triangle.reversed().centroid();
        assert_relative_eq!(c.x, expected.x, epsilon = 1e-12);
        assert_relative_eq!(c.y, expected.y, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_polygon_has_no_area() {
        let line = Polygon::from_coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]).unwrap();
        assert!(!line.has_area());
        assert!(line.centroid().x.is_nan());
        assert_eq!(line.orientation(), Orientation::Collinear);
    }

    #[test]
    fn test_contains_point() {
        let poly = square(10.0);
        assert!(poly.contains_point(Point2D::new(5.0, 5.0)));
        assert!(!poly.contains_point(Point2D::new(15.0, 5.0)));
        assert!(!poly.contains_point(Point2D::new(-0.1, 5.0)));
        // Untere Kante gehört dazu, obere nicht
        assert!(poly.contains_point(Point2D::new(5.0, 0.0)));
        assert!(!poly.contains_point(Point2D::new(5.0, 10.0)));
    }

    #[test]
    fn test_contains_bounds() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]).unwrap();
        let inside = Bounds2D::from_points(Point2D::new(4.0, 1.0), Point2D::new(6.0, 3.0));
        let corner_out = Bounds2D::from_points(Point2D::new(0.0, 1.0), Point2D::new(6.0, 3.0));

        assert!(poly.contains_bounds(&inside));
        assert!(!poly.contains_bounds(&corner_out));
    }

    #[test]
    fn test_cache_invalidated_on_mutation() {
        let mut poly = square(1.0);
        assert_relative_eq!(poly.area(), 1.0);

        poly.map_vertices(|p| Point2D::new(p.x * 3.0, p.y * 3.0));
        assert_relative_eq!(poly.area(), 9.0);
        assert_eq!(poly.bounds().max, Point2D::new(3.0, 3.0));
    }

    #[test]
    fn test_is_convex() {
        assert!(square(1.0).is_convex());
        let l_shape = Polygon::from_coords(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ])
        .unwrap();
        assert!(!l_shape.is_convex());
    }

    #[test]
    fn test_min_distance_to_border() {
        let poly = square(10.0);
        assert_relative_eq!(poly.min_distance_to_border(Point2D::new(3.0, 5.0)), 3.0);
        assert_relative_eq!(poly.min_distance_to_border(Point2D::new(5.0, 12.0)), 2.0);
    }
}
