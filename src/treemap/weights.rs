// src/treemap/weights.rs

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Aufsummierte Kennwerte eines Teilbaums
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SubtreeSummary {
    /// Summe der positiven Eigengewichte im Teilbaum
    pub weight: f64,
    /// Anzahl der Knoten im Teilbaum, der Knoten selbst eingeschlossen
    pub count: usize,
}

/// Berechnet Gewicht und Größe jedes erreichbaren Teilbaums.
///
/// Arbeitet mit einem expliziten Stack, die Baumtiefe ist daher nicht begrenzt.
/// Knoten, die über mehrere Wege erreichbar sind, werden nur einmal gezählt.
pub fn summarize<N, C, W>(root: &N, children_of: C, weight_of: W) -> HashMap<N, SubtreeSummary>
where
    N: Clone + Eq + Hash,
    C: Fn(&N) -> Vec<N>,
    W: Fn(&N) -> f64,
{
    let mut seen = HashSet::new();
    let mut preorder: Vec<(N, Vec<N>)> = Vec::new();
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        if !seen.insert(node.clone()) {
            continue;
        }
        let children = children_of(&node);
        stack.extend(children.iter().cloned());
        preorder.push((node, children));
    }

    let mut summaries: HashMap<N, SubtreeSummary> = HashMap::with_capacity(preorder.len());
    for (node, children) in preorder.into_iter().rev() {
        let own_weight = weight_of(&node);
        let mut summary = SubtreeSummary {
            weight: if own_weight > 0.0 { own_weight } else { 0.0 },
            count: 1,
        };

        for child in &children {
            if let Some(child_summary) = summaries.get(child) {
                summary.weight += child_summary.weight;
                summary.count += child_summary.count;
            }
        }

        summaries.insert(node, summary);
    }

    summaries
}

/// Gewicht jedes Teilbaums
pub fn subtree_weights<N, C, W>(root: &N, children_of: C, weight_of: W) -> HashMap<N, f64>
where
    N: Clone + Eq + Hash,
    C: Fn(&N) -> Vec<N>,
    W: Fn(&N) -> f64,
{
    summarize(root, children_of, weight_of)
        .into_iter()
        .map(|(node, summary)| (node, summary.weight))
        .collect()
}

/// Anzahl der vom Wurzelknoten aus erreichbaren Knoten
pub fn count_nodes<N, C>(root: &N, children_of: C) -> usize
where
    N: Clone + Eq + Hash,
    C: Fn(&N) -> Vec<N>,
{
    summarize(root, children_of, |_| 0.0)
        .get(root)
        .map_or(0, |summary| summary.count)
}
