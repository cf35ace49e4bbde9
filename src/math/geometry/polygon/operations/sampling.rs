// src/math/geometry/polygon/operations/sampling.rs

use crate::math::geometry::polygon::{Polygon, PolygonProperties};
use crate::math::utils::{random::random_point_in_bounds, simple_geometry};
use crate::math::{error::*, types::*};
use rand::Rng;
use tracing::trace;

/// Obergrenze für Versuche beim Rejection Sampling
pub const MAX_SAMPLING_ATTEMPTS: usize = 100_000;

/// Anteil des Vektors, der beim zweiten Platzierungsversuch genutzt wird
const SHORTENED_VECTOR_FACTOR: f64 = 0.85;

impl Polygon {
    /// Zufälliger Punkt im Inneren (Rejection Sampling in der Bounding Box)
    pub fn inner_point<R: Rng + ?Sized>(&self, rng: &mut R) -> MathResult<Point2D> {
        if !self.has_area() {
            return Err(MathError::GeometricFailure {
                operation: format!("inner point of zero-area {}", self),
            });
        }

        let bounds = self.bounds();
        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            let candidate = random_point_in_bounds(&bounds, rng);
            if self.contains_point(candidate) {
                return Ok(candidate);
            }
        }

        Err(MathError::GeometricFailure {
            operation: format!(
                "inner point sampling gave up after {} attempts",
                MAX_SAMPLING_ATTEMPTS
            ),
        })
    }

    /// Platziert einen Punkt relativ zum Schwerpunkt entlang `vector`.
    ///
    /// Reihenfolge: `centroid + vector`, dann `centroid + 0.85 * vector`, dann der
    /// nach innen gezogene Schnittpunkt des Strahls mit einer Kante. Gelingt nichts
    /// davon, wird ein zufälliger innerer Punkt geliefert.
    pub fn relative_position<R: Rng + ?Sized>(
        &self,
        vector: Vector2D,
        rng: &mut R,
    ) -> MathResult<Point2D> {
        let centroid = self.centroid();
        let end_point = centroid + vector;

        if self.contains_point(end_point) {
            return Ok(end_point);
        }

        let shortened = centroid + vector * SHORTENED_VECTOR_FACTOR;
        if self.contains_point(shortened) {
            return Ok(shortened);
        }

        match self.position_on_border_ray(centroid, end_point) {
            Ok(Some(point)) => Ok(point),
            Ok(None) => self.inner_point(rng),
            Err(MathError::UnreachableGeometry { reason }) => {
                trace!("relative placement fell back to random point: {}", reason);
                self.inner_point(rng)
            }
            Err(err) => Err(err),
        }
    }

    fn position_on_border_ray(
        &self,
        centroid: Point2D,
        end_point: Point2D,
    ) -> MathResult<Option<Point2D>> {
        let centroid_inside = self.contains_point(centroid);

        for (start, end) in self.edges() {
            let Some(intersection) =
                simple_geometry::segment_intersection(start, end, centroid, end_point)?
            else {
                continue;
            };

            let delta = intersection - centroid;
            let factor = if centroid_inside { 0.8 } else { 1.1 };
            let candidate = centroid + delta * factor;
            if self.contains_point(candidate) {
                return Ok(Some(candidate));
            }
        }

        Ok(None)
    }
}
