// src/treemap/mod.rs

pub mod counter;
pub mod decomposer;
pub mod service;
pub mod settings;
pub mod weights;

pub use counter::CompletionCounter;
pub use decomposer::{CellResult, decompose};
pub use service::TreemapService;
pub use settings::TreemapSettings;
pub use weights::{SubtreeSummary, count_nodes, subtree_weights, summarize};
