// src/math/geometry/voronoi/equalization.rs

use super::config::EqualizationConfig;
use super::power_diagram::{DiagramSolver, PowerDiagram};
use super::site::{Site, normalize_fractions};
use crate::math::geometry::polygon::{AffineTransform, AffineTransformable, Polygon, PolygonProperties};
use crate::math::utils::constants;
use crate::math::error::*;
use rand::Rng;
use tracing::{debug, trace, warn};

/// Kleinstes Gewicht nach einer Reparatur
const MIN_REPAIRED_WEIGHT: f64 = 1e-4;

/// Ersatz für NaN-Gewichte vor der Dominanz-Reparatur
const TINY_WEIGHT: f64 = 1e-11;

/// Warum ein Lauf beendet wurde
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Nur eine Site: die ganze Region, keine Iteration
    Trivial,
    /// Flächenfehler unter der Schwelle
    AreaError,
    /// Iterationsobergrenze überschritten
    MaxIterations,
}

/// Ergebnis eines Angleichungslaufs
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    pub iterations: usize,
    /// Summe der Flächenabweichungen relativ zur doppelten Gesamtfläche
    pub area_error: f64,
    /// Größte relative Abweichung einer einzelnen Zelle
    pub max_error: f64,
    pub termination: Termination,
    /// Anzahl reparierter Diagramm-Fehlschläge
    pub recoveries: usize,
}

impl IterationReport {
    fn trivial() -> Self {
        Self {
            iterations: 0,
            area_error: 0.0,
            max_error: 0.0,
            termination: Termination::Trivial,
            recoveries: 0,
        }
    }
}

/// Iterative Angleichung der Zellflächen an die Soll-Anteile.
///
/// Jede Runde verschiebt die Sites in die Schwerpunkte ihrer Zellen, passt die Gewichte
/// an das Verhältnis von Soll- zu Ist-Fläche an und berechnet das Power-Diagramm neu.
pub struct EqualizationEngine<'a, S: DiagramSolver = PowerDiagram> {
    config: EqualizationConfig,
    solver: S,
    clip: Polygon,
    sites: &'a mut [Site],
    frame: AffineTransform,
    recoveries: usize,
}

impl<'a> EqualizationEngine<'a, PowerDiagram> {
    /// Erstellt eine Engine mit dem eingebauten Power-Diagramm
    pub fn new(
        config: EqualizationConfig,
        clip: Polygon,
        sites: &'a mut [Site],
    ) -> MathResult<Self> {
        Self::with_solver(config, PowerDiagram, clip, sites)
    }
}

impl<'a, S: DiagramSolver> EqualizationEngine<'a, S> {
    pub fn with_solver(
        config: EqualizationConfig,
        solver: S,
        clip: Polygon,
        sites: &'a mut [Site],
    ) -> MathResult<Self> {
        config.validate()?;

        if sites.is_empty() {
            return Err(MathError::InsufficientPoints {
                expected: 1,
                actual: 0,
            });
        }
        if !clip.has_area() {
            return Err(MathError::GeometricFailure {
                operation: format!("equalization inside zero-area {}", clip),
            });
        }

        normalize_fractions(sites)?;

        Ok(Self {
            config,
            solver,
            clip,
            sites,
            frame: AffineTransform::identity(),
            recoveries: 0,
        })
    }

    pub fn sites(&self) -> &[Site] {
        self.sites
    }

    pub fn clip(&self) -> &Polygon {
        &self.clip
    }

    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MathResult<IterationReport> {
        self.run_with_hook(rng, |_| {})
    }

    /// Führt den Lauf aus und ruft `hook` danach einmal pro Site auf
    pub fn run_with_hook<R, F>(&mut self, rng: &mut R, mut hook: F) -> MathResult<IterationReport>
    where
        R: Rng + ?Sized,
        F: FnMut(&Site),
    {
        if self.sites.len() == 1 {
            let site = &mut self.sites[0];
            site.polygon = Some(self.clip.clone());
            site.neighbours.clear();
            site.last_area_ratio = 1.0;
            hook(&self.sites[0]);
            return Ok(IterationReport::trivial());
        }

        self.recoveries = 0;
        self.enter_frame();
        let outcome = self.iterate(rng);
        self.leave_frame()?;
        let report = outcome?;

        debug!(
            sites = self.sites.len(),
            iterations = report.iterations,
            area_error = report.area_error,
            max_error = report.max_error,
            recoveries = report.recoveries,
            "equalization finished ({:?})",
            report.termination
        );

        for site in self.sites.iter() {
            hook(site);
        }

        Ok(report)
    }

    fn iterate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MathResult<IterationReport> {
        if self.snap_outside_sites(rng)? > 0 {
            self.fix_dominated_weights();
        }
        self.solve_with_recovery(rng)?;

        let mut iteration = 0;
        let mut bad_rounds = 0;

        loop {
            self.move_to_centroids();
            if self.snap_outside_sites(rng)? > 0 {
                self.fix_dominated_weights();
            }
            self.adapt_weights();
            self.solve_with_recovery(rng)?;

            let (area_error, max_error) = self.errors();
            iteration += 1;
            trace!(iteration, area_error, max_error, "equalization round");

            let bad = self.sites.iter().any(|site| site.polygon.is_none());
            let report = |termination| IterationReport {
                iterations: iteration,
                area_error,
                max_error,
                termination,
                recoveries: self.recoveries,
            };

            if bad {
                bad_rounds += 1;
                if bad_rounds > self.config.max_bad_rounds {
                    return Err(MathError::GeometricFailure {
                        operation: format!(
                            "sites still without a cell after {} consecutive rounds",
                            bad_rounds
                        ),
                    });
                }
            } else {
                bad_rounds = 0;

                if self.config.cancel_on_area_error
                    && area_error < self.config.area_error_threshold
                    && (!self.config.use_local_error_for_termination
                        || max_error < self.config.area_error_threshold)
                {
                    return Ok(report(Termination::AreaError));
                }

                if self.config.cancel_on_max_iterations && iteration > self.config.max_iterations
                {
                    return Ok(report(Termination::MaxIterations));
                }
            }
        }
    }

    /// Verschiebt die Clip-Region in den Ursprung und skaliert sie auf `nominal_width`
    fn enter_frame(&mut self) {
        self.frame = if self.config.normalize {
            let center = self.clip.centroid().coords;
            let scale = self.config.nominal_width / self.clip.bounds().max_extent();
            AffineTransform::uniform_scale(scale).compose(&AffineTransform::translation(-center))
        } else {
            AffineTransform::identity()
        };

        let frame = self.frame;
        self.apply_transform(&frame);
    }

    fn leave_frame(&mut self) -> MathResult<()> {
        let inverse = self.frame.inverse()?;
        self.apply_transform(&inverse);
        self.frame = AffineTransform::identity();
        Ok(())
    }

    fn apply_transform(&mut self, transform: &AffineTransform) {
        let area_scale = transform.determinant();

        self.clip.transform_mut(transform);
        for site in self.sites.iter_mut() {
            site.position.transform_mut(transform);
            site.weight *= area_scale;
            if let Some(polygon) = site.polygon.as_mut() {
                polygon.transform_mut(transform);
            }
        }
    }

    fn move_to_centroids(&mut self) {
        for site in self.sites.iter_mut() {
            let Some(polygon) = site.polygon.as_ref() else {
                continue;
            };
            if !polygon.has_area() {
                continue;
            }

            let centroid = polygon.centroid();
            if self.clip.contains_point(centroid) {
                site.position = centroid;
            }
        }
    }

    /// Setzt Sites außerhalb der Clip-Region auf zufällige innere Punkte
    fn snap_outside_sites<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MathResult<usize> {
        let mut snapped = 0;
        for site in self.sites.iter_mut() {
            if !self.clip.contains_point(site.position) {
                site.position = self.clip.inner_point(rng)?;
                snapped += 1;
            }
        }
        Ok(snapped)
    }

    /// Wie [`Self::snap_outside_sites`], zusätzlich für Sites, die auf einer früheren liegen
    fn reseat_sites<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MathResult<usize> {
        let mut reseated = self.snap_outside_sites(rng)?;

        for index in 1..self.sites.len() {
            let position = self.sites[index].position;
            let duplicate = self.sites[..index].iter().any(|other| {
                nalgebra::distance_squared(&other.position, &position)
                    <= constants::EPSILON_SQUARED
            });

            if duplicate {
                self.sites[index].position = self.clip.inner_point(rng)?;
                reseated += 1;
            }
        }

        Ok(reseated)
    }

    fn adapt_weights(&mut self) {
        let average_distance = self.average_neighbour_distance();
        let (area_error, _) = self.errors();
        let error_transform = 1.0 - (area_error - 1.0) * (area_error - 1.0);
        let step = average_distance * error_transform;
        let epsilon = self.config.ratio_epsilon;
        let total_area = self.clip.area();

        for site in self.sites.iter_mut() {
            let current_area = site.cell_area();
            let wanted_area = total_area * site.target_fraction;
            let ratio = if current_area == 0.0 {
                2.0
            } else {
                wanted_area / current_area
            };

            if ratio < 1.0 - epsilon {
                site.weight -= step;
            } else if ratio > 1.0 + epsilon {
                site.weight += step;
            }
            site.last_area_ratio = ratio;
        }
    }

    /// Mittlerer Abstand benachbarter Sites; ohne Nachbarn der Mittelwert aller Paare
    fn average_neighbour_distance(&self) -> f64 {
        let (sum, count) = self
            .sites
            .iter()
            .flat_map(|site| {
                site.neighbours
                    .iter()
                    .filter_map(|&index| self.sites.get(index))
                    .map(move |other| nalgebra::distance(&site.position, &other.position))
            })
            .fold((0.0, 0usize), |(sum, count), d| (sum + d, count + 1));

        if count > 0 {
            return sum / count as f64;
        }

        let mut pair_sum = 0.0;
        let mut pairs = 0usize;
        for (i, a) in self.sites.iter().enumerate() {
            for b in &self.sites[i + 1..] {
                pair_sum += nalgebra::distance(&a.position, &b.position);
                pairs += 1;
            }
        }

        if pairs > 0 && pair_sum > 0.0 {
            pair_sum / pairs as f64
        } else {
            self.clip.area().sqrt()
        }
    }

    /// Flächenfehler und größter relativer Einzelfehler
    fn errors(&self) -> (f64, f64) {
        let total_area = self.clip.area();
        let mut area_error = 0.0;
        let mut max_error: f64 = 0.0;

        for site in self.sites.iter() {
            let current_area = site.cell_area();
            let wanted_area = total_area * site.target_fraction;
            let deviation = (wanted_area - current_area).abs();

            area_error += deviation / (total_area * 2.0);
            if wanted_area > 0.0 {
                max_error = max_error.max(deviation / wanted_area);
            }
        }

        (area_error, max_error)
    }

    fn solve_with_recovery<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MathResult<()> {
        let mut attempts = 0;

        loop {
            self.shift_weights_non_negative();

            match self.solver.compute(self.sites, &self.clip) {
                Ok(()) => return Ok(()),
                Err(MathError::DegenerateDiagram { reason }) => {
                    if attempts >= self.config.max_recovery_attempts {
                        return Err(MathError::RecoveryExhausted { attempts });
                    }
                    attempts += 1;
                    self.recoveries += 1;
                    warn!(attempt = attempts, "power diagram failed ({}), randomizing sites", reason);

                    self.reseat_sites(rng)?;
                    self.adjust_weights_to_be_positive();
                    self.fix_dominated_weights();
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Verschiebt alle Gewichte um das negative Minimum; das Diagramm bleibt gleich
    fn shift_weights_non_negative(&mut self) {
        let min_weight = self
            .sites
            .iter()
            .map(|site| site.weight)
            .filter(|weight| !weight.is_nan())
            .fold(0.0, f64::min);

        if min_weight < 0.0 {
            for site in self.sites.iter_mut() {
                site.weight -= min_weight;
            }
        }
    }

    fn adjust_weights_to_be_positive(&mut self) {
        let min_weight = self
            .sites
            .iter()
            .map(|site| site.weight)
            .filter(|weight| !weight.is_nan())
            .fold(0.0, f64::min);

        for site in self.sites.iter_mut() {
            let weight = if site.weight.is_nan() {
                MIN_REPAIRED_WEIGHT
            } else {
                site.weight
            };
            site.weight = (weight - min_weight).max(MIN_REPAIRED_WEIGHT);
        }
    }

    /// Begrenzt Gewichte so, dass keine Site den Generator einer anderen überdeckt
    fn fix_dominated_weights(&mut self) {
        for site in self.sites.iter_mut() {
            if site.weight.is_nan() {
                site.weight = TINY_WEIGHT;
            }
        }

        let factor = self.config.dominance_factor;
        let count = self.sites.len();
        for s in 0..count {
            for q in 0..count {
                if s == q {
                    continue;
                }

                let distance =
                    nalgebra::distance(&self.sites[s].position, &self.sites[q].position) * factor;
                if self.sites[s].weight.sqrt() >= distance {
                    self.sites[q].weight = distance * distance;
                }
            }
        }
    }
}

/// Gleicht die Zellflächen von `sites` innerhalb von `clip` an ihre Soll-Anteile an
pub fn equalize<R: Rng + ?Sized>(
    config: &EqualizationConfig,
    sites: &mut [Site],
    clip: &Polygon,
    rng: &mut R,
) -> MathResult<IterationReport> {
    EqualizationEngine::new(config.clone(), clip.clone(), sites)?.run(rng)
}
