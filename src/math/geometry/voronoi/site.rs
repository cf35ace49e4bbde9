// src/math/geometry/voronoi/site.rs

use crate::math::geometry::polygon::{Polygon, PolygonProperties};
use crate::math::{error::*, types::*};

/// Gewichteter Generatorpunkt eines Power-Diagramms
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Index in die Kindliste des Aufrufers
    pub id: usize,
    pub position: Point2D,
    /// Power-Offset; beim Lösen nie NaN und nie negativ
    pub weight: f64,
    /// Gewünschter Flächenanteil in `(0, 1]`
    pub target_fraction: f64,
    /// Zelle der letzten Lösung, `None` falls die Site keine Zelle erhalten hat
    pub polygon: Option<Polygon>,
    /// Indizes der Nachbar-Sites im aktuellen Diagramm
    pub neighbours: Vec<usize>,
    /// Verhältnis Soll- zu Ist-Fläche der letzten Gewichtsanpassung
    pub last_area_ratio: f64,
}

impl Site {
    pub fn new(id: usize, position: Point2D) -> Self {
        Self {
            id,
            position,
            weight: 0.0,
            target_fraction: 1.0,
            polygon: None,
            neighbours: Vec::new(),
            last_area_ratio: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_target_fraction(mut self, fraction: f64) -> Self {
        self.target_fraction = fraction;
        self
    }

    /// Fläche der aktuellen Zelle (0 ohne Zelle)
    pub fn cell_area(&self) -> f64 {
        self.polygon.as_ref().map_or(0.0, |polygon| polygon.area())
    }
}

/// Normiert die Soll-Anteile einer Geschwistergruppe auf Summe 1
pub fn normalize_fractions(sites: &mut [Site]) -> MathResult<()> {
    if let Some(site) = sites
        .iter()
        .find(|site| !(site.target_fraction.is_finite() && site.target_fraction > 0.0))
    {
        return Err(MathError::InvalidConfiguration {
            message: format!(
                "Site {} has invalid target fraction {}",
                site.id, site.target_fraction
            ),
        });
    }

    let total: f64 = sites.iter().map(|site| site.target_fraction).sum();
    for site in sites.iter_mut() {
        site.target_fraction /= total;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_fractions() {
        let mut sites = vec![
            Site::new(0, Point2D::origin()).with_target_fraction(1.0),
            Site::new(1, Point2D::origin()).with_target_fraction(3.0),
        ];

        normalize_fractions(&mut sites).unwrap();
        assert_relative_eq!(sites[0].target_fraction, 0.25);
        assert_relative_eq!(sites[1].target_fraction, 0.75);
    }

    #[test]
    fn test_normalize_rejects_zero_fraction() {
        let mut sites = vec![
            Site::new(0, Point2D::origin()).with_target_fraction(1.0),
            Site::new(1, Point2D::origin()).with_target_fraction(0.0),
        ];

        assert!(matches!(
            normalize_fractions(&mut sites),
            Err(MathError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_cell_area_without_polygon() {
        let mut site = Site::new(0, Point2D::origin());
        assert_eq!(site.cell_area(), 0.0);

        site.polygon = Some(Polygon::from_coords(&[(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)]).unwrap());
        assert_relative_eq!(site.cell_area(), 2.0);
    }
}
