// src/treemap/decomposer.rs

use super::counter::CompletionCounter;
use super::settings::TreemapSettings;
use super::weights::{SubtreeSummary, summarize};
use crate::math::error::{MathError, MathResult};
use crate::math::geometry::polygon::{Polygon, PolygonProperties};
use crate::math::geometry::voronoi::{EqualizationEngine, Site};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, trace, warn};

/// Zelle eines Knotens in der fertigen Zerlegung
#[derive(Debug, Clone, PartialEq)]
pub struct CellResult {
    /// Endgültige Zelle (nach optionalem Schrumpfen)
    pub polygon: Polygon,
    /// Zelle vor dem Schrumpfen, falls geschrumpft wurde
    pub unshrunk: Option<Polygon>,
    /// Tiefe des Knotens; die Wurzel hat Tiefe 0
    pub depth: usize,
}

/// Zerlegt `root_polygon` rekursiv entlang des Baums unter `root`.
///
/// `on_result` wird für jeden platzierten Nicht-Wurzelknoten genau einmal aufgerufen,
/// unter einem Mutex und in keiner festen Reihenfolge. Gibt die Anzahl der erreichbaren
/// Knoten zurück.
pub fn decompose<N, C, W, F>(
    settings: &TreemapSettings,
    root: N,
    children_of: C,
    weight_of: W,
    root_polygon: Polygon,
    on_result: F,
) -> MathResult<usize>
where
    N: Clone + Eq + Hash + Send + Sync,
    C: Fn(&N) -> Vec<N> + Sync,
    W: Fn(&N) -> f64,
    F: FnMut(&N, &CellResult) + Send,
{
    settings.validate()?;
    if !root_polygon.has_area() {
        return Err(MathError::GeometricFailure {
            operation: format!("decomposition of zero-area {}", root_polygon),
        });
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.thread_count)
        .build()
        .map_err(|err| MathError::InvalidConfiguration {
            message: format!("Cannot build thread pool: {}", err),
        })?;

    let summaries = summarize(&root, &children_of, weight_of);
    let total_nodes = summaries.get(&root).map_or(1, |summary| summary.count);
    debug!(
        nodes = total_nodes,
        threads = settings.thread_count,
        "starting decomposition"
    );

    let decomposition = Decomposition {
        settings,
        children_of: &children_of,
        summaries,
        sink: Mutex::new(on_result),
        counter: CompletionCounter::new(total_nodes),
    };

    pool.scope(|scope| decomposition.schedule(scope, root, root_polygon, 0));

    // Alle Schritte sind gemeldet oder der Zähler wurde nach einem Fehler geleert
    debug_assert!(decomposition.counter.is_finished());
    debug!(nodes = total_nodes, "decomposition finished");

    Ok(total_nodes)
}

/// Gemeinsamer Zustand aller Knotenschritte einer Zerlegung
struct Decomposition<'a, N, C, F> {
    settings: &'a TreemapSettings,
    children_of: &'a C,
    summaries: HashMap<N, SubtreeSummary>,
    sink: Mutex<F>,
    counter: CompletionCounter,
}

impl<'a, N, C, F> Decomposition<'a, N, C, F>
where
    N: Clone + Eq + Hash + Send + Sync,
    C: Fn(&N) -> Vec<N> + Sync,
    F: FnMut(&N, &CellResult) + Send,
{
    fn schedule<'scope>(
        &'scope self,
        scope: &rayon::Scope<'scope>,
        node: N,
        polygon: Polygon,
        depth: usize,
    ) where
        N: 'scope,
    {
        scope.spawn(move |scope| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.step(&node, &polygon, depth)));

            match outcome {
                Ok(Ok(children)) => {
                    self.counter.complete_one();
                    for (child, cell) in children {
                        self.schedule(scope, child, cell, depth + 1);
                    }
                }
                Ok(Err(err)) => {
                    let err = MathError::NodeStepFailed {
                        depth,
                        reason: err.to_string(),
                    };
                    error!("{}", err);
                    self.counter.drain();
                }
                Err(_) => {
                    error!(depth, "decomposition step panicked");
                    self.counter.drain();
                }
            }
        });
    }

    fn subtree(&self, node: &N) -> SubtreeSummary {
        self.summaries.get(node).copied().unwrap_or_default()
    }

    /// Teilt `polygon` unter den Kindern von `node` auf und meldet deren Zellen.
    ///
    /// Gibt die Kinder zusammen mit dem Polygon zurück, in dem sie weiter zerlegt werden.
    fn step(&self, node: &N, polygon: &Polygon, depth: usize) -> MathResult<Vec<(N, Polygon)>> {
        let children = (self.children_of)(node);
        if children.is_empty() {
            return Ok(Vec::new());
        }

        let total_weight: f64 = children.iter().map(|child| self.subtree(child).weight).sum();
        let placed: Vec<(N, f64)> = if total_weight > 0.0 {
            let mut placed = Vec::with_capacity(children.len());
            for child in children {
                let summary = self.subtree(&child);
                if summary.weight > 0.0 {
                    placed.push((child, summary.weight / total_weight));
                } else {
                    // Teilbaum ohne Gewicht bekommt keine Fläche
                    self.counter.complete_many(summary.count);
                }
            }
            placed
        } else {
            let uniform = 1.0 / children.len() as f64;
            children.into_iter().map(|child| (child, uniform)).collect()
        };

        trace!(depth, children = placed.len(), "decomposing node");

        let mut rng = StdRng::seed_from_u64(self.settings.seed);
        let mut sites = Vec::with_capacity(placed.len());
        for (id, (_, fraction)) in placed.iter().enumerate() {
            let inner = polygon.inner_point(&mut rng)?;
            let position = polygon.relative_position(inner.coords, &mut rng)?;
            sites.push(Site::new(id, position).with_target_fraction(*fraction));
        }

        let mut cells: Vec<Option<Polygon>> = vec![None; placed.len()];
        EqualizationEngine::new(self.settings.equalization.clone(), polygon.clone(), &mut sites)?
            .run_with_hook(&mut rng, |site| cells[site.id] = site.polygon.clone())?;

        let shrink_factor = self.settings.effective_shrink_factor();
        let mut next = Vec::with_capacity(placed.len());

        for ((child, _), cell) in placed.into_iter().zip(cells) {
            let Some(cell) = cell.filter(|cell| cell.has_area()) else {
                warn!(depth = depth + 1, "child received no cell, skipping its subtree");
                self.counter.complete_many(self.subtree(&child).count);
                continue;
            };

            let result = match shrink_factor {
                Some(factor) => {
                    let pair = cell.shrink(factor)?;
                    CellResult {
                        polygon: pair.shrunk,
                        unshrunk: Some(pair.original),
                        depth: depth + 1,
                    }
                }
                None => CellResult {
                    polygon: cell,
                    unshrunk: None,
                    depth: depth + 1,
                },
            };

            {
                let mut sink = self.sink.lock();
                (*sink)(&child, &result);
            }

            next.push((child, result.polygon));
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::polygon::ShapeGenerators;
    use crate::math::geometry::voronoi::EqualizationConfig;
    use crate::math::types::{Bounds2D, Point2D};
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn settings() -> TreemapSettings {
        TreemapSettings::new()
            .with_thread_count(2)
            .with_equalization(EqualizationConfig::default().with_max_iterations(300))
    }

    fn root_square() -> Polygon {
        let bounds = Bounds2D::from_points(Point2D::new(0.0, 0.0), Point2D::new(100.0, 100.0));
        Polygon::from_rect(&bounds).unwrap()
    }

    fn children(node: &&'static str) -> Vec<&'static str> {
        match *node {
            "root" => vec!["a", "b", "c"],
            "b" => vec!["b1", "b2"],
            "c" => vec!["c1", "c2", "c3"],
            _ => Vec::new(),
        }
    }

    fn weight(node: &&'static str) -> f64 {
        match *node {
            "a" => 2.0,
            "b1" | "b2" => 1.0,
            "c1" | "c2" | "c3" => 1.0,
            _ => 0.0,
        }
    }

    fn run(settings: &TreemapSettings) -> (usize, HashMap<&'static str, CellResult>, usize) {
        let mut results = HashMap::new();
        let mut deliveries = 0;
        let count = decompose(
            settings,
            "root",
            children,
            weight,
            root_square(),
            |node: &&'static str, result: &CellResult| {
                deliveries += 1;
                results.insert(*node, result.clone());
            },
        )
        .unwrap();
        (count, results, deliveries)
    }

    #[test]
    fn test_every_node_delivered_once() {
        let (count, results, deliveries) = run(&settings());

        assert_eq!(count, 9);
        assert_eq!(deliveries, 8);
        assert_eq!(results.len(), 8);

        for node in ["a", "b", "c"] {
            assert_eq!(results[node].depth, 1);
        }
        for node in ["b1", "b2", "c1", "c2", "c3"] {
            assert_eq!(results[node].depth, 2);
        }
    }

    #[test]
    fn test_children_tile_parent() {
        let (_, results, _) = run(&settings());

        let top: f64 = ["a", "b", "c"].iter().map(|n| results[n].polygon.area()).sum();
        assert_relative_eq!(top, 10_000.0, max_relative = 1e-6);

        let b_children: f64 = ["b1", "b2"].iter().map(|n| results[n].polygon.area()).sum();
        assert_relative_eq!(b_children, results["b"].polygon.area(), max_relative = 1e-6);

        let c_children: f64 = ["c1", "c2", "c3"]
            .iter()
            .map(|n| results[n].polygon.area())
            .sum();
        assert_relative_eq!(c_children, results["c"].polygon.area(), max_relative = 1e-6);
    }

    #[test]
    fn test_shrink_keeps_unshrunk_cell() {
        let (_, results, _) = run(&settings().with_border_shrink_factor(0.9));

        for result in results.values() {
            let unshrunk = result.unshrunk.as_ref().unwrap();
            assert_relative_eq!(
                result.polygon.area(),
                unshrunk.area() * 0.81,
                max_relative = 1e-9
            );
        }

        // Kinder füllen die geschrumpfte Elternzelle
        let c_children: f64 = ["c1", "c2", "c3"]
            .iter()
            .map(|n| results[n].unshrunk.as_ref().unwrap().area())
            .sum();
        assert_relative_eq!(c_children, results["c"].polygon.area(), max_relative = 1e-6);
    }

    #[test]
    fn test_zero_weight_subtree_is_skipped() {
        let mut delivered = Vec::new();
        let count = decompose(
            &settings(),
            0u32,
            |n| match *n {
                0 => vec![1, 2],
                2 => vec![3],
                _ => Vec::new(),
            },
            |n| if *n == 1 { 1.0 } else { 0.0 },
            root_square(),
            |node: &u32, _: &CellResult| delivered.push(*node),
        )
        .unwrap();

        assert_eq!(count, 4);
        assert_eq!(delivered, vec![1]);
    }

    #[test]
    fn test_all_zero_weights_split_uniformly() {
        let mut areas = Vec::new();
        decompose(
            &settings().with_thread_count(1),
            0u32,
            |n| if *n == 0 { vec![1, 2] } else { Vec::new() },
            |_| 0.0,
            ShapeGenerators::regular_polygon(6, 50.0).unwrap(),
            |_: &u32, result: &CellResult| areas.push(result.polygon.area()),
        )
        .unwrap();

        assert_eq!(areas.len(), 2);
        let total: f64 = areas.iter().sum();
        for area in areas {
            assert!((area / total - 0.5).abs() < 0.1, "share {}", area / total);
        }
    }

    #[test]
    fn test_invalid_settings_rejected_before_work() {
        let mut delivered = 0;
        let result = decompose(
            &TreemapSettings::new().with_thread_count(0),
            "root",
            children,
            weight,
            root_square(),
            |_: &&'static str, _: &CellResult| delivered += 1,
        );

        assert!(matches!(
            result,
            Err(MathError::InvalidConfiguration { .. })
        ));
        assert_eq!(delivered, 0);
    }

    #[test]
    fn test_panicking_step_is_isolated() {
        let armed = AtomicBool::new(false);
        let mut delivered = Vec::new();

        let count = decompose(
            &settings(),
            "root",
            |node: &&'static str| match *node {
                "root" => vec!["a", "boom"],
                "a" => vec!["a1", "a2"],
                // Beim Aufsummieren noch harmlos, erst der eigene Schritt scheitert
                "boom" if armed.swap(true, Ordering::SeqCst) => panic!("broken child list"),
                "boom" => vec!["x"],
                _ => Vec::new(),
            },
            |_| 1.0,
            root_square(),
            |node: &&'static str, _: &CellResult| delivered.push(*node),
        )
        .unwrap();

        delivered.sort_unstable();
        assert_eq!(count, 6);
        assert_eq!(delivered, vec!["a", "a1", "a2", "boom"]);
    }
}
