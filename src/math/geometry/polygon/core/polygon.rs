// src/math/geometry/polygon/core/polygon.rs

use crate::math::{error::*, types::*};
use std::fmt;
use std::sync::OnceLock;

/// Zwischengespeicherte Kennwerte eines Polygons.
///
/// Wird bei jeder Änderung der Vertices über [`PolygonCache::invalidate`] verworfen.
#[derive(Debug, Clone, Default)]
pub(crate) struct PolygonCache {
    pub(crate) signed_area: OnceLock<f64>,
    pub(crate) centroid: OnceLock<Point2D>,
    pub(crate) bounds: OnceLock<Bounds2D>,
}

impl PolygonCache {
    pub(crate) fn invalidate(&mut self) {
        *self = Self::default();
    }
}

/// Einfaches, implizit geschlossenes Polygon.
///
/// Der letzte Vertex ist mit dem ersten verbunden, er wird nicht wiederholt.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<Point2D>,
    pub(crate) cache: PolygonCache,
}

impl Polygon {
    /// Erstellt ein neues Polygon aus Vertices
    pub fn new(vertices: Vec<Point2D>) -> MathResult<Self> {
        if vertices.len() < 3 {
            return Err(MathError::InsufficientPoints {
                expected: 3,
                actual: vertices.len(),
            });
        }

        Ok(Self::from_vertices_unchecked(vertices))
    }

    /// Erstellt ein Polygon aus Koordinatenpaaren
    pub fn from_coords(coords: &[(f64, f64)]) -> MathResult<Self> {
        Self::new(coords.iter().map(|&(x, y)| Point2D::new(x, y)).collect())
    }

    /// Rechteck aus einer Bounding Box (gegen den Uhrzeigersinn)
    pub fn from_rect(bounds: &Bounds2D) -> MathResult<Self> {
        if bounds.is_empty() || bounds.area() <= 0.0 {
            return Err(MathError::InvalidConfiguration {
                message: format!("Cannot build a polygon from degenerate {}", bounds),
            });
        }

        Ok(Self::from_vertices_unchecked(bounds.corners().to_vec()))
    }

    pub(crate) fn from_vertices_unchecked(vertices: Vec<Point2D>) -> Self {
        Self {
            vertices,
            cache: PolygonCache::default(),
        }
    }

    /// Zugriff auf Vertices
    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    /// Anzahl der Vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Ist das Polygon leer?
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iteriert über alle Kanten `(start, end)` inklusive der schließenden Kante
    pub fn edges(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Wendet `f` auf jeden Vertex an und verwirft die gecachten Kennwerte
    pub fn map_vertices<F>(&mut self, mut f: F)
    where
        F: FnMut(Point2D) -> Point2D,
    {
        for vertex in &mut self.vertices {
            *vertex = f(*vertex);
        }
        self.cache.invalidate();
    }

    /// Polygon umkehren (Vertices in umgekehrter Reihenfolge)
    pub fn reverse(&mut self) {
        self.vertices.reverse();
        self.cache.invalidate();
    }

    /// Erstellt eine Kopie mit umgekehrten Vertices
    pub fn reversed(&self) -> Self {
        let mut copy = self.clone();
        copy.reverse();
        copy
    }
}

impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

/// Display-Implementierung für Debugging
impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polygon({} vertices)", self.vertices.len())
    }
}

/// Konvertierung von Vec<Point2D>
impl TryFrom<Vec<Point2D>> for Polygon {
    type Error = MathError;

    fn try_from(vertices: Vec<Point2D>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

/// Konvertierung zu Vec<Point2D>
impl From<Polygon> for Vec<Point2D> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

impl<'a> IntoIterator for &'a Polygon {
    type Item = &'a Point2D;
    type IntoIter = std::slice::Iter<'a, Point2D>;

    fn into_iter(self) -> Self::IntoIter {
        self.vertices.iter()
    }
}
