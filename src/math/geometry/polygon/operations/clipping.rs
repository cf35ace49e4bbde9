// src/math/geometry/polygon/operations/clipping.rs

use crate::math::geometry::polygon::{Polygon, PolygonProperties};
use crate::math::types::*;
use crate::math::utils::simple_geometry::area_sign;

/// Zustand des Rand-Durchlaufs: welches Polygon liegt gerade innen?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InFlag {
    Unknown,
    PIn,
    QIn,
}

/// Klassifikation des Schnitts zweier Segmente
#[derive(Debug, Clone, Copy, PartialEq)]
enum SegmentIntersection {
    None,
    /// Echter Schnitt im Inneren beider Segmente
    Proper(Point2D),
    /// Schnitt in einem Endpunkt
    Vertex(Point2D),
    /// Kollineare Überlappung
    Edge(Point2D, Point2D),
}

/// Clipping-Engine für konvexe Polygone
pub struct PolygonClipper;

impl PolygonClipper {
    /// Schnitt zweier konvexer Polygone in linearer Zeit (O'Rourke).
    ///
    /// Gibt `None` zurück, wenn sich die Polygone nicht überlappen. Liegt eines der
    /// Polygone vollständig im anderen, wird es unverändert zurückgegeben.
    pub fn convex_clip(outer: &Polygon, inner: &Polygon) -> Option<Polygon> {
        let outer_bounds = outer.bounds();
        let inner_bounds = inner.bounds();

        if !outer_bounds.intersects(&inner_bounds) {
            return None;
        }
        if outer.contains_bounds(&inner_bounds) {
            return Some(inner.clone());
        }

        let p = counter_clockwise_vertices(outer);
        let q = counter_clockwise_vertices(inner);
        let ring = dedup_ring(intersect_convex(&p, &q));
        if ring.len() >= 3 {
            return Some(Polygon::from_vertices_unchecked(ring));
        }

        // Keine Randkreuzung: eines der Polygone kann noch im anderen liegen
        if outer.contains_point(inner.vertices()[0]) {
            return Some(inner.clone());
        }
        if inner.contains_point(outer.vertices()[0]) {
            return Some(outer.clone());
        }

        None
    }
}

impl Polygon {
    /// Schnitt mit einem weiteren konvexen Polygon, siehe [`PolygonClipper::convex_clip`]
    pub fn convex_clip(&self, other: &Polygon) -> Option<Polygon> {
        PolygonClipper::convex_clip(self, other)
    }
}

fn counter_clockwise_vertices(polygon: &Polygon) -> Vec<Point2D> {
    let mut vertices = polygon.vertices().to_vec();
    if polygon.signed_area() < 0.0 {
        vertices.reverse();
    }
    vertices
}

/// Entfernt aufeinanderfolgende Duplikate und einen schließenden Wiederholungspunkt
fn dedup_ring(mut points: Vec<Point2D>) -> Vec<Point2D> {
    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Gemeinsamer Rand-Durchlauf über beide gegen den Uhrzeigersinn orientierten Polygone
fn intersect_convex(p: &[Point2D], q: &[Point2D]) -> Vec<Point2D> {
    let (n, m) = (p.len(), q.len());
    let (mut a, mut b) = (0usize, 0usize);
    let (mut aa, mut ba) = (0usize, 0usize);
    let mut inflag = InFlag::Unknown;
    let mut first_point: Option<Point2D> = None;
    let mut output = Vec::with_capacity(n + m);
    let origin = Point2D::origin();

    loop {
        let a1 = (a + n - 1) % n;
        let b1 = (b + m - 1) % m;

        let edge_a = p[a] - p[a1];
        let edge_b = q[b] - q[b1];

        let cross = area_sign(origin, origin + edge_a, origin + edge_b);
        let a_hb = area_sign(q[b1], q[b], p[a]);
        let b_ha = area_sign(p[a1], p[a], q[b]);

        let code = segment_segment_intersection(p[a1], p[a], q[b1], q[b]);
        match code {
            SegmentIntersection::Proper(point) | SegmentIntersection::Vertex(point) => {
                if inflag == InFlag::Unknown && first_point.is_none() {
                    aa = 0;
                    ba = 0;
                    first_point = Some(point);
                }
                output.push(point);
                inflag = if a_hb > 0 {
                    InFlag::PIn
                } else if b_ha > 0 {
                    InFlag::QIn
                } else {
                    inflag
                };
            }
            SegmentIntersection::Edge(start, end) if edge_a.dot(&edge_b) < 0.0 => {
                // Gegenläufige kollineare Kanten: Schnitt ist höchstens ein Segment
                output.push(start);
                output.push(end);
                return output;
            }
            _ => {}
        }

        if cross == 0 && a_hb < 0 && b_ha < 0 {
            // Parallel und getrennt
            return Vec::new();
        }

        let advance_a = if cross == 0 && a_hb == 0 && b_ha == 0 {
            inflag != InFlag::PIn
        } else if cross >= 0 {
            b_ha > 0
        } else {
            a_hb <= 0
        };

        if advance_a {
            if inflag == InFlag::PIn {
                output.push(p[a]);
            }
            aa += 1;
            a = (a + 1) % n;
        } else {
            if inflag == InFlag::QIn {
                output.push(q[b]);
            }
            ba += 1;
            b = (b + 1) % m;
        }

        if !((aa < n || ba < m) && aa < 2 * n && ba < 2 * m) {
            break;
        }
    }

    if let Some(p0) = first_point {
        output.push(p0);
    }

    output
}

fn segment_segment_intersection(
    a: Point2D,
    b: Point2D,
    c: Point2D,
    d: Point2D,
) -> SegmentIntersection {
    let denominator =
        a.x * (d.y - c.y) + b.x * (c.y - d.y) + d.x * (b.y - a.y) + c.x * (a.y - b.y);

    if denominator == 0.0 {
        return parallel_intersection(a, b, c, d);
    }

    let s = (a.x * (d.y - c.y) + c.x * (a.y - d.y) + d.x * (c.y - a.y)) / denominator;
    let t = -(a.x * (c.y - b.y) + b.x * (a.y - c.y) + c.x * (b.y - a.y)) / denominator;
    let point = a + (b - a) * s;

    if 0.0 < s && s < 1.0 && 0.0 < t && t < 1.0 {
        SegmentIntersection::Proper(point)
    } else if s < 0.0 || s > 1.0 || t < 0.0 || t > 1.0 {
        SegmentIntersection::None
    } else {
        SegmentIntersection::Vertex(point)
    }
}

fn parallel_intersection(
    a: Point2D,
    b: Point2D,
    c: Point2D,
    d: Point2D,
) -> SegmentIntersection {
    if area_sign(a, b, c) != 0 {
        return SegmentIntersection::None;
    }

    let candidates = [
        (between(a, b, c) && between(a, b, d), c, d),
        (between(c, d, a) && between(c, d, b), a, b),
        (between(a, b, c) && between(c, d, b), c, b),
        (between(a, b, c) && between(c, d, a), c, a),
        (between(a, b, d) && between(c, d, b), d, b),
        (between(a, b, d) && between(c, d, a), d, a),
    ];

    candidates
        .into_iter()
        .find(|(overlaps, _, _)| *overlaps)
        .map_or(SegmentIntersection::None, |(_, start, end)| {
            SegmentIntersection::Edge(start, end)
        })
}

/// Liegt `c` auf dem Segment `a`-`b`?
fn between(a: Point2D, b: Point2D, c: Point2D) -> bool {
    if area_sign(a, b, c) != 0 {
        return false;
    }

    if a.x != b.x {
        (a.x <= c.x && c.x <= b.x) || (a.x >= c.x && c.x >= b.x)
    } else {
        (a.y <= c.y && c.y <= b.y) || (a.y >= c.y && c.y >= b.y)
    }
}
