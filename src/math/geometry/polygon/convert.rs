// src/math/geometry/polygon/convert.rs

use super::Polygon;
use crate::math::{error::*, types::*};
use geo::{Coord, LineString};

/// Konvertierung in ein `geo`-Polygon ohne Löcher
impl From<&Polygon> for geo::Polygon<f64> {
    fn from(polygon: &Polygon) -> Self {
        let exterior: Vec<Coord<f64>> = polygon
            .vertices()
            .iter()
            .map(|vertex| Coord {
                x: vertex.x,
                y: vertex.y,
            })
            .collect();

        geo::Polygon::new(LineString::from(exterior), Vec::new())
    }
}

/// Übernimmt den äußeren Ring eines `geo`-Polygons. Löcher werden abgelehnt.
impl TryFrom<&geo::Polygon<f64>> for Polygon {
    type Error = MathError;

    fn try_from(polygon: &geo::Polygon<f64>) -> Result<Self, Self::Error> {
        if !polygon.interiors().is_empty() {
            return Err(MathError::InvalidConfiguration {
                message: format!(
                    "Polygons with holes are not supported ({} interior rings)",
                    polygon.interiors().len()
                ),
            });
        }

        let mut vertices: Vec<Point2D> = polygon
            .exterior()
            .coords()
            .map(|coord| Point2D::new(coord.x, coord.y))
            .collect();

        // geo schließt Ringe explizit
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        Polygon::new(vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::polygon::PolygonProperties;
    use approx::assert_relative_eq;
    use geo::{Area, Centroid};

    #[test]
    fn test_matches_geo_area_and_centroid() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (6.0, 0.0), (6.0, 2.0), (1.0, 4.0)]).unwrap();
        let geo_poly = geo::Polygon::from(&poly);

        assert_relative_eq!(poly.area(), geo_poly.unsigned_area(), epsilon = 1e-12);

        let geo_centroid = geo_poly.centroid().unwrap();
        let centroid = poly.centroid();
        assert_relative_eq!(centroid.x, geo_centroid.x(), epsilon = 1e-12);
        assert_relative_eq!(centroid.y, geo_centroid.y(), epsilon = 1e-12);
    }

    #[test]
    fn test_geo_round_trip_drops_closing_vertex() {
        let poly = Polygon::from_coords(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]).unwrap();
        let geo_poly = geo::Polygon::from(&poly);
        assert_eq!(geo_poly.exterior().0.len(), 4);

        let back = Polygon::try_from(&geo_poly).unwrap();
        assert_eq!(back, poly);
    }

    #[test]
    fn test_holes_rejected() {
        let exterior = LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let hole = LineString::from(vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0)]);
        let geo_poly = geo::Polygon::new(exterior, vec![hole]);

        assert!(matches!(
            Polygon::try_from(&geo_poly),
            Err(MathError::InvalidConfiguration { .. })
        ));
    }
}
