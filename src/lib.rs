//! # clustermap
//!
//! Two-way hierarchical clustering for heatmaps: parse a tab-separated
//! expression matrix with a sample-group header, transform it, cluster rows
//! and columns, and reorder the matrix so similar items sit side by side.
//!
//! ```text
//! parse ─ preprocess ─ pairwise_distances ─ cluster ─ leaf_order ─ reorder
//! ```
//!
//! [`cluster_heatmap`] runs the whole chain; each stage is also exposed on its
//! own.
//!
//! Enable the `parallel` feature to compute distance rows and the two axes
//! on the rayon thread pool.

pub mod cluster;
pub mod config;
pub mod distance;
/// Error types used across `clustermap`.
pub mod error;
pub mod hierarchy;
pub mod matrix;
pub mod pipeline;

#[cfg(test)]
mod pipeline_tests;

pub use error::{Error, Result};

pub use cluster::{cluster, HierarchicalClustering, Method};
pub use config::{ClusterConfig, PreprocessOptions};
pub use distance::{pairwise_distances, DistanceMatrix, Metric};
pub use hierarchy::{leaf_order, DendrogramLayout, LinkageStep, LinkageTree};
pub use matrix::{parse, preprocess, reorder, to_tsv, GroupMap, Matrix};
pub use pipeline::{cluster_heatmap, cluster_matrix, AxisClustering, ClusteredHeatmap};
