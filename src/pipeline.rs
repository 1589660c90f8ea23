//! Two-way clustering of a heatmap matrix, end to end.
//!
//! ```text
//! raw text ─ parse ─ preprocess ─┬─ rows:    distances ─ linkage ─ leaf order ─┐
//!                                └─ columns: distances ─ linkage ─ leaf order ─┴─ reorder
//! ```
//!
//! The row and column branches share nothing. With the `parallel` feature
//! they run concurrently via `rayon::join`.

use crate::config::ClusterConfig;
use crate::error::{Error, Result};
use crate::hierarchy::{DendrogramLayout, LinkageTree};
use crate::matrix::{parse, preprocess, reorder, GroupMap, Matrix};
use ndarray::ArrayView2;

/// Clustering outcome for one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisClustering {
    /// Merge history; `None` when the axis was not clustered.
    pub tree: Option<LinkageTree>,
    /// Display order of the axis (original indices).
    pub order: Vec<usize>,
}

impl AxisClustering {
    fn unclustered(n: usize) -> Self {
        Self {
            tree: None,
            order: (0..n).collect(),
        }
    }

    /// Drawing coordinates for this axis' dendrogram, if it was clustered.
    pub fn layout(&self) -> Option<Result<DendrogramLayout>> {
        self.tree.as_ref().map(DendrogramLayout::new)
    }
}

/// Everything a renderer needs: the clustered matrix plus ordering metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteredHeatmap {
    /// Parsed values before any transform, in input order.
    pub raw: Matrix,
    /// Transformed values, reordered by the row and column leaf orders.
    pub matrix: Matrix,
    /// Sample → group mapping.
    pub groups: GroupMap,
    /// Row clustering.
    pub rows: AxisClustering,
    /// Column clustering.
    pub columns: AxisClustering,
    /// Group label of each column of [`ClusteredHeatmap::matrix`].
    pub column_groups: Vec<String>,
}

impl ClusteredHeatmap {
    /// Distinct group labels in order of first appearance along the columns.
    pub fn distinct_groups(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for g in &self.column_groups {
            if !out.contains(&g.as_str()) {
                out.push(g);
            }
        }
        out
    }
}

/// Parse `raw` and cluster it according to `config`.
///
/// An invalid metric/method pair fails before any input is parsed.
pub fn cluster_heatmap(raw: &str, config: &ClusterConfig) -> Result<ClusteredHeatmap> {
    config.validate()?;
    let (matrix, groups) = parse(raw)?;
    cluster_matrix(matrix, groups, config)
}

/// Cluster an already parsed matrix.
///
/// Checks `config` before doing any work.
pub fn cluster_matrix(
    matrix: Matrix,
    groups: GroupMap,
    config: &ClusterConfig,
) -> Result<ClusteredHeatmap> {
    config.validate()?;
    check_shape(&matrix, config)?;
    let transformed = preprocess(&matrix, &config.preprocess)?;
    let values = transformed.values();

    let (rows, columns) = join(
        || cluster_axis(values.view(), config.cluster_rows, config),
        || cluster_axis(values.t(), config.cluster_columns, config),
    );
    let (rows, columns) = (rows?, columns?);

    let clustered = reorder(&transformed, &rows.order, &columns.order)?;
    let column_groups = groups.labels_for(clustered.column_ids())?;

    tracing::debug!(
        rows = clustered.n_rows(),
        cols = clustered.n_cols(),
        metric = %config.metric,
        method = %config.method,
        "clustered heatmap"
    );

    Ok(ClusteredHeatmap {
        raw: matrix,
        matrix: clustered,
        groups,
        rows,
        columns,
        column_groups,
    })
}

fn cluster_axis(
    vectors: ArrayView2<'_, f64>,
    enabled: bool,
    config: &ClusterConfig,
) -> Result<AxisClustering> {
    if !enabled {
        return Ok(AxisClustering::unclustered(vectors.nrows()));
    }
    let tree = config.clusterer().fit(vectors)?;
    let order = tree.leaf_order().inspect_err(|e| {
        if e.is_defect() {
            tracing::error!(error = %e, "clustering produced a corrupt tree");
        }
    })?;
    Ok(AxisClustering {
        tree: Some(tree),
        order,
    })
}

#[cfg(feature = "parallel")]
fn join<A, B>(a: impl FnOnce() -> A + Send, b: impl FnOnce() -> B + Send) -> (A, B)
where
    A: Send,
    B: Send,
{
    rayon::join(a, b)
}

#[cfg(not(feature = "parallel"))]
fn join<A, B>(a: impl FnOnce() -> A, b: impl FnOnce() -> B) -> (A, B) {
    (a(), b())
}

/// Reject matrices too small to cluster on an enabled axis.
///
/// [`cluster_matrix`] fails the same way; this lets a caller check before
/// doing any work.
pub fn check_shape(matrix: &Matrix, config: &ClusterConfig) -> Result<()> {
    if config.cluster_rows && matrix.n_rows() < 2 {
        return Err(Error::degenerate(format!(
            "need at least 2 rows to cluster rows, got {}",
            matrix.n_rows()
        )));
    }
    if config.cluster_columns && matrix.n_cols() < 2 {
        return Err(Error::degenerate(format!(
            "need at least 2 columns to cluster columns, got {}",
            matrix.n_cols()
        )));
    }
    Ok(())
}
