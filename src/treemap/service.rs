// src/treemap/service.rs

use super::decomposer::{CellResult, decompose};
use super::settings::TreemapSettings;
use crate::math::error::{MathError, MathResult};
use crate::math::geometry::polygon::Polygon;
use crate::math::types::Bounds2D;
use std::fmt;
use std::hash::Hash;

type ChildrenFn<N> = Box<dyn Fn(&N) -> Vec<N> + Send + Sync>;
type WeightFn<N> = Box<dyn Fn(&N) -> f64 + Send + Sync>;
type ResultSink<N> = Box<dyn FnMut(&N, &CellResult) + Send>;

/// Sammelt Baum, Region und Ergebnisempfänger und startet die Zerlegung.
///
/// ```ignore
/// let mut service = TreemapService::new(TreemapSettings::default());
/// service.set_task(root, |n| children(n), |n| weight(n));
/// service.set_root_rectangle(&bounds)?;
/// service.set_result_sink(|node, cell| store(node, cell));
/// let nodes = service.run()?;
/// ```
pub struct TreemapService<N> {
    settings: TreemapSettings,
    root: Option<N>,
    children_of: Option<ChildrenFn<N>>,
    weight_of: Option<WeightFn<N>>,
    root_polygon: Option<Polygon>,
    sink: Option<ResultSink<N>>,
}

impl<N> TreemapService<N>
where
    N: Clone + Eq + Hash + Send + Sync,
{
    pub fn new(settings: TreemapSettings) -> Self {
        Self {
            settings,
            root: None,
            children_of: None,
            weight_of: None,
            root_polygon: None,
            sink: None,
        }
    }

    pub fn settings(&self) -> &TreemapSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut TreemapSettings {
        &mut self.settings
    }

    pub fn set_settings(&mut self, settings: TreemapSettings) {
        self.settings = settings;
    }

    /// Legt den zu zerlegenden Baum fest
    pub fn set_task<C, W>(&mut self, root: N, children_of: C, weight_of: W)
    where
        C: Fn(&N) -> Vec<N> + Send + Sync + 'static,
        W: Fn(&N) -> f64 + Send + Sync + 'static,
    {
        self.root = Some(root);
        self.children_of = Some(Box::new(children_of));
        self.weight_of = Some(Box::new(weight_of));
    }

    pub fn set_root_polygon(&mut self, polygon: Polygon) {
        self.root_polygon = Some(polygon);
    }

    pub fn set_root_rectangle(&mut self, bounds: &Bounds2D) -> MathResult<()> {
        self.root_polygon = Some(Polygon::from_rect(bounds)?);
        Ok(())
    }

    pub fn set_result_sink<F>(&mut self, sink: F)
    where
        F: FnMut(&N, &CellResult) + Send + 'static,
    {
        self.sink = Some(Box::new(sink));
    }

    /// Startet die Zerlegung; gibt die Anzahl der Knoten zurück
    pub fn run(&mut self) -> MathResult<usize> {
        let root = self
            .root
            .as_ref()
            .ok_or(MathError::NotInitialized { missing: "root node" })?;
        let children_of = self.children_of.as_ref().ok_or(MathError::NotInitialized {
            missing: "children function",
        })?;
        let weight_of = self.weight_of.as_ref().ok_or(MathError::NotInitialized {
            missing: "weight function",
        })?;
        let root_polygon = self.root_polygon.as_ref().ok_or(MathError::NotInitialized {
            missing: "root polygon",
        })?;
        let sink = self.sink.as_mut().ok_or(MathError::NotInitialized {
            missing: "result sink",
        })?;

        decompose(
            &self.settings,
            root.clone(),
            |node: &N| children_of(node),
            |node: &N| weight_of(node),
            root_polygon.clone(),
            |node: &N, result: &CellResult| sink(node, result),
        )
    }
}

impl<N: fmt::Debug> fmt::Debug for TreemapService<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreemapService")
            .field("settings", &self.settings)
            .field("root", &self.root)
            .field("has_children_fn", &self.children_of.is_some())
            .field("has_weight_fn", &self.weight_of.is_some())
            .field("root_polygon", &self.root_polygon)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::polygon::PolygonProperties;
    use crate::math::types::Point2D;
    use approx::assert_relative_eq;
    use std::sync::{Arc, Mutex};

    fn bounds() -> Bounds2D {
        Bounds2D::from_points(Point2D::new(0.0, 0.0), Point2D::new(200.0, 100.0))
    }

    #[test]
    fn test_missing_inputs_reported() {
        let mut service: TreemapService<u32> = TreemapService::new(TreemapSettings::default());
        assert_eq!(
            service.run(),
            Err(MathError::NotInitialized { missing: "root node" })
        );

        service.set_task(0, |_| Vec::new(), |_| 1.0);
        assert_eq!(
            service.run(),
            Err(MathError::NotInitialized {
                missing: "root polygon"
            })
        );

        service.set_root_rectangle(&bounds()).unwrap();
        assert_eq!(
            service.run(),
            Err(MathError::NotInitialized {
                missing: "result sink"
            })
        );
    }

    #[test]
    fn test_runs_decomposition() {
        let collected = Arc::new(Mutex::new(Vec::new()));

        let mut service = TreemapService::new(TreemapSettings::new().with_thread_count(2));
        service.set_task(
            0u32,
            |n| if *n == 0 { vec![1, 2, 3] } else { Vec::new() },
            |n| *n as f64,
        );
        service.set_root_rectangle(&bounds()).unwrap();

        let sink_target = Arc::clone(&collected);
        service.set_result_sink(move |node, result| {
            sink_target.lock().unwrap().push((*node, result.polygon.area()));
        });

        assert_eq!(service.run().unwrap(), 4);

        let collected = collected.lock().unwrap();
        assert_eq!(collected.len(), 3);
        let total: f64 = collected.iter().map(|(_, area)| area).sum();
        assert_relative_eq!(total, 20_000.0, max_relative = 1e-6);
    }

    #[test]
    fn test_invalid_settings_surface_from_run() {
        let mut service = TreemapService::new(TreemapSettings::new().with_border_shrink_factor(1.5));
        service.set_task(0u32, |_| Vec::new(), |_| 1.0);
        service.set_root_rectangle(&bounds()).unwrap();
        service.set_result_sink(|_, _| {});

        assert!(matches!(
            service.run(),
            Err(MathError::InvalidConfiguration { .. })
        ));
    }
}
