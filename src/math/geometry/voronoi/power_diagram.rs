// src/math/geometry/voronoi/power_diagram.rs

use super::site::Site;
use crate::math::geometry::polygon::{Polygon, PolygonProperties};
use crate::math::utils::constants;
use crate::math::{error::*, types::*};

/// Zellen unter diesem Anteil der Clip-Fläche gelten als verschwunden
const MIN_CELL_AREA_RATIO: f64 = 1e-14;

/// Berechnet ein Power-Diagramm innerhalb einer konvexen Clip-Region.
///
/// Bei Erfolg erhält jede Site ihre Zelle (oder `None`) und ihre Nachbarn. Bei einem
/// Fehler bleiben alle Sites unverändert.
pub trait DiagramSolver: Send + Sync {
    fn compute(&self, sites: &mut [Site], clip: &Polygon) -> MathResult<()>;
}

/// Vertex eines Zell-Rings; das Label gehört zur Kante, die an diesem Vertex beginnt
type LabelledVertex = (Point2D, Option<usize>);

/// Power-Diagramm über Halbebenen-Schnitte der Power-Bisektoren
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerDiagram;

impl PowerDiagram {
    pub fn new() -> Self {
        Self
    }

    fn validate(sites: &[Site]) -> MathResult<()> {
        for site in sites {
            if !is_finite_point(&site.position) || !site.weight.is_finite() {
                return Err(MathError::DegenerateDiagram {
                    reason: format!(
                        "site {} has non-finite input ({:?}, weight {})",
                        site.id, site.position, site.weight
                    ),
                });
            }
        }

        for (i, a) in sites.iter().enumerate() {
            for b in &sites[i + 1..] {
                if coincident(a.position, b.position)
                    && (a.weight - b.weight).abs() <= constants::EPSILON
                {
                    return Err(MathError::DegenerateDiagram {
                        reason: format!(
                            "sites {} and {} coincide with equal weight",
                            a.id, b.id
                        ),
                    });
                }
            }
        }

        Ok(())
    }

    fn cell(sites: &[Site], index: usize, clip_ring: &[LabelledVertex]) -> Vec<LabelledVertex> {
        let site = &sites[index];
        let mut ring = clip_ring.to_vec();

        for (other_index, other) in sites.iter().enumerate() {
            if other_index == index {
                continue;
            }

            if coincident(site.position, other.position) {
                if other.weight > site.weight {
                    // Vollständig dominiert
                    return Vec::new();
                }
                continue;
            }

            let normal = other.position - site.position;
            let offset = (other.position.coords.norm_squared()
                - site.position.coords.norm_squared()
                + site.weight
                - other.weight)
                * 0.5;

            ring = cut_half_plane(&ring, normal, offset, other_index);
            if ring.len() < 3 {
                return Vec::new();
            }
        }

        ring
    }
}

impl DiagramSolver for PowerDiagram {
    fn compute(&self, sites: &mut [Site], clip: &Polygon) -> MathResult<()> {
        Self::validate(sites)?;

        let mut clip_vertices = clip.vertices().to_vec();
        if clip.signed_area() < 0.0 {
            clip_vertices.reverse();
        }
        let clip_ring: Vec<LabelledVertex> =
            clip_vertices.into_iter().map(|vertex| (vertex, None)).collect();
        let min_area = clip.area() * MIN_CELL_AREA_RATIO;

        let cells: Vec<(Option<Polygon>, Vec<usize>)> = (0..sites.len())
            .map(|index| {
                let ring = Self::cell(sites, index, &clip_ring);
                if ring.len() < 3 {
                    return (None, Vec::new());
                }

                let mut neighbours: Vec<usize> = ring.iter().filter_map(|(_, label)| *label).collect();
                neighbours.sort_unstable();
                neighbours.dedup();

                let polygon =
                    Polygon::from_vertices_unchecked(ring.into_iter().map(|(p, _)| p).collect());
                if polygon.area() <= min_area {
                    (None, Vec::new())
                } else {
                    (Some(polygon), neighbours)
                }
            })
            .collect();

        for (site, (polygon, neighbours)) in sites.iter_mut().zip(cells) {
            site.polygon = polygon;
            site.neighbours = neighbours;
        }

        Ok(())
    }
}

fn coincident(a: Point2D, b: Point2D) -> bool {
    nalgebra::distance_squared(&a, &b) <= constants::EPSILON_SQUARED
}

/// Sutherland-Hodgman-Schritt gegen die Halbebene `normal · x <= offset`.
///
/// Neu entstehende Kanten auf der Schnittgeraden erhalten das Label `label`.
fn cut_half_plane(
    ring: &[LabelledVertex],
    normal: Vector2D,
    offset: f64,
    label: usize,
) -> Vec<LabelledVertex> {
    let n = ring.len();
    let mut output: Vec<LabelledVertex> = Vec::with_capacity(n + 1);

    for i in 0..n {
        let (start, start_label) = ring[i];
        let (end, _) = ring[(i + 1) % n];

        let start_value = normal.dot(&start.coords) - offset;
        let end_value = normal.dot(&end.coords) - offset;
        let start_inside = start_value <= 0.0;
        let end_inside = end_value <= 0.0;

        match (start_inside, end_inside) {
            (true, true) => output.push((start, start_label)),
            (true, false) => {
                output.push((start, start_label));
                let t = start_value / (start_value - end_value);
                output.push((start + (end - start) * t, Some(label)));
            }
            (false, true) => {
                let t = start_value / (start_value - end_value);
                output.push((start + (end - start) * t, start_label));
            }
            (false, false) => {}
        }
    }

    remove_short_edges(output)
}

/// Entfernt Kanten der Länge (nahezu) null, auch die schließende
fn remove_short_edges(ring: Vec<LabelledVertex>) -> Vec<LabelledVertex> {
    let mut cleaned: Vec<LabelledVertex> = Vec::with_capacity(ring.len());
    for vertex in ring {
        if let Some(last) = cleaned.last_mut() {
            if coincident(last.0, vertex.0) {
                // Die Kante des Vorgängers hat keine Länge; das Label des Nachfolgers gilt
                *last = vertex;
                continue;
            }
        }
        cleaned.push(vertex);
    }

    while cleaned.len() > 1 {
        let (first, last) = (cleaned[0].0, cleaned[cleaned.len() - 1].0);
        if !coincident(first, last) {
            break;
        }
        cleaned.pop();
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Polygon {
        Polygon::from_coords(&[(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)]).unwrap()
    }

    fn site(id: usize, x: f64, y: f64, weight: f64) -> Site {
        Site::new(id, Point2D::new(x, y)).with_weight(weight)
    }

    #[test]
    fn test_two_sites_split_at_bisector() {
        let clip = square(10.0);
        let mut sites = vec![site(0, 2.0, 5.0, 0.0), site(1, 8.0, 5.0, 0.0)];

        PowerDiagram.compute(&mut sites, &clip).unwrap();

        assert_relative_eq!(sites[0].cell_area(), 50.0, epsilon = 1e-9);
        assert_relative_eq!(sites[1].cell_area(), 50.0, epsilon = 1e-9);
        assert_eq!(sites[0].neighbours, vec![1]);
        assert_eq!(sites[1].neighbours, vec![0]);
    }

    #[test]
    fn test_weight_moves_bisector() {
        let clip = square(10.0);
        // Bisektor bei x = 5 + (w0 - w1) / (2 * 6) = 7
        let mut sites = vec![site(0, 2.0, 5.0, 24.0), site(1, 8.0, 5.0, 0.0)];

        PowerDiagram.compute(&mut sites, &clip).unwrap();

        assert_relative_eq!(sites[0].cell_area(), 70.0, epsilon = 1e-9);
        assert_relative_eq!(sites[1].cell_area(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cells_partition_clip() {
        let clip = square(100.0);
        let mut sites = vec![
            site(0, 10.0, 10.0, 0.0),
            site(1, 80.0, 20.0, 150.0),
            site(2, 50.0, 90.0, 40.0),
            site(3, 45.0, 45.0, 10.0),
            site(4, 90.0, 95.0, 0.0),
        ];

        PowerDiagram.compute(&mut sites, &clip).unwrap();

        let total: f64 = sites.iter().map(Site::cell_area).sum();
        assert_relative_eq!(total, clip.area(), epsilon = 1e-6);
        for site in &sites {
            let polygon = site.polygon.as_ref().unwrap();
            assert!(polygon.is_convex());
            for neighbour in &site.neighbours {
                assert!(sites[*neighbour].neighbours.contains(&site.id));
            }
        }
    }

    #[test]
    fn test_clockwise_clip() {
        let clip = square(10.0).reversed();
        let mut sites = vec![site(0, 2.0, 5.0, 0.0), site(1, 8.0, 5.0, 0.0)];

        PowerDiagram.compute(&mut sites, &clip).unwrap();
        assert_relative_eq!(sites[0].cell_area(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_coincident_equal_weight_fails_without_mutation() {
        let clip = square(10.0);
        let mut sites = vec![site(0, 5.0, 5.0, 1.0), site(1, 5.0, 5.0, 1.0)];
        let before = sites.clone();

        let result = PowerDiagram.compute(&mut sites, &clip);

        assert!(matches!(result, Err(MathError::DegenerateDiagram { .. })));
        assert_eq!(sites, before);
    }

    #[test]
    fn test_coincident_lighter_site_is_dominated() {
        let clip = square(10.0);
        let mut sites = vec![site(0, 5.0, 5.0, 1.0), site(1, 5.0, 5.0, 3.0)];

        PowerDiagram.compute(&mut sites, &clip).unwrap();

        assert!(sites[0].polygon.is_none());
        assert_relative_eq!(sites[1].cell_area(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_input_fails() {
        let clip = square(10.0);
        let mut sites = vec![site(0, f64::NAN, 5.0, 0.0), site(1, 8.0, 5.0, 0.0)];
        assert!(matches!(
            PowerDiagram.compute(&mut sites, &clip),
            Err(MathError::DegenerateDiagram { .. })
        ));

        let mut sites = vec![site(0, 2.0, 5.0, f64::INFINITY), site(1, 8.0, 5.0, 0.0)];
        assert!(PowerDiagram.compute(&mut sites, &clip).is_err());
    }

    #[test]
    fn test_heavy_neighbour_swallows_cell() {
        let clip = square(10.0);
        // Bisektor liegt weit außerhalb der Clip-Region
        let mut sites = vec![site(0, 4.0, 5.0, 0.0), site(1, 6.0, 5.0, 1000.0)];

        PowerDiagram.compute(&mut sites, &clip).unwrap();

        assert!(sites[0].polygon.is_none());
        assert!(sites[0].neighbours.is_empty());
        assert_relative_eq!(sites[1].cell_area(), 100.0, epsilon = 1e-9);
    }
}
