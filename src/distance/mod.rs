//! Pairwise distances in condensed form.
//!
//! For `n` items there are `n(n-1)/2` unordered pairs. They are stored
//! upper-triangle, row-major, without the diagonal:
//!
//! ```text
//!        0    1    2    3
//!   0    .   d0   d1   d2
//!   1         .   d3   d4
//!   2              .   d5
//!   3                   .
//! ```
//!
//! The pair `(i, j)` with `i < j` lives at `n*i - i*(i+1)/2 + (j - i - 1)`.
//!
//! Computing the matrix is `O(n² · d)`. With the `parallel` feature the rows of
//! the triangle are filled on the rayon pool; each entry is still computed by
//! the same metric call, so the output is identical to the sequential path.

mod metric;

pub use metric::{Metric, SymmetricMetric};

use crate::error::{Error, Result};
use ndarray::ArrayView2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Condensed (upper-triangular, diagonal-free) distance matrix over `n` items.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n_items: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Distance matrix with no pairs (fewer than two items).
    pub fn empty(n_items: usize) -> Self {
        debug_assert!(n_items < 2);
        Self {
            n_items,
            values: Vec::new(),
        }
    }

    /// Wrap an existing condensed vector.
    ///
    /// Fails if the length is not `n(n-1)/2` or a value is negative or
    /// non-finite. Negative zeros are stored as `+0.0`.
    pub fn from_condensed(n_items: usize, mut values: Vec<f64>) -> Result<Self> {
        let expected = condensed_len(n_items);
        if values.len() != expected {
            return Err(Error::invalid_value(format!(
                "condensed matrix for {n_items} items needs {expected} entries, got {}",
                values.len()
            )));
        }
        if let Some((k, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(Error::invalid_value(format!(
                "distance at offset {k} is {v}; distances must be finite and non-negative"
            )));
        }
        // -0.0 would sort below +0.0 under total ordering.
        values.iter_mut().for_each(|v| *v += 0.0);
        Ok(Self { n_items, values })
    }

    /// Number of items the distances are defined over.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Distance between items `i` and `j` (order-insensitive, zero on the diagonal).
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n_items && j < self.n_items, "index out of range");
        if i == j {
            0.0
        } else {
            self.values[condensed_index(self.n_items, i, j)]
        }
    }

    /// The condensed values.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Length of the condensed form for `n` items.
#[inline]
pub fn condensed_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Offset of the unordered pair `{i, j}` (`i != j`) in the condensed form.
#[inline]
pub fn condensed_index(n: usize, i: usize, j: usize) -> usize {
    debug_assert!(i != j && i < n && j < n);
    let (i, j) = if i < j { (i, j) } else { (j, i) };
    n * i - i * (i + 1) / 2 + (j - i - 1)
}

/// Inverse of [`condensed_index`]: the pair `(i, j)`, `i < j`, stored at offset `k`.
fn condensed_pair(n: usize, mut k: usize) -> (usize, usize) {
    let mut i = 0;
    while k >= n - i - 1 {
        k -= n - i - 1;
        i += 1;
    }
    (i, i + 1 + k)
}

/// Distances between every pair of rows of `vectors`.
///
/// Pass `matrix.t()` to measure columns instead of rows. Fewer than two
/// vectors yields an empty matrix. Any NaN or infinite component fails with
/// [`Error::InvalidValue`] naming the vector and component, and so does a
/// distance that overflows to infinity.
pub fn pairwise_distances(vectors: ArrayView2<'_, f64>, metric: Metric) -> Result<DistanceMatrix> {
    let n = vectors.nrows();

    for (i, row) in vectors.outer_iter().enumerate() {
        if let Some((j, v)) = row.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(Error::invalid_value(format!(
                "non-finite value {v} in vector {i} at component {j}"
            )));
        }
    }

    if n < 2 {
        return Ok(DistanceMatrix::empty(n));
    }

    // Transposed views are not row-contiguous; copy once so every row is a slice.
    let owned = vectors.as_standard_layout();
    let rows: Vec<&[f64]> = owned
        .outer_iter()
        .map(|r| r.to_slice())
        .collect::<Option<_>>()
        .ok_or_else(|| Error::invalid_value("vector storage is not contiguous"))?;

    tracing::debug!(n_items = n, dim = vectors.ncols(), %metric, "computing pairwise distances");

    let values = fill_condensed(&rows, &metric);
    if let Some(k) = values.iter().position(|v| !v.is_finite()) {
        let (i, j) = condensed_pair(n, k);
        return Err(Error::invalid_value(format!(
            "{metric} distance between vectors {i} and {j} is not finite"
        )));
    }
    Ok(DistanceMatrix { n_items: n, values })
}

#[cfg(not(feature = "parallel"))]
fn fill_condensed<M: SymmetricMetric>(rows: &[&[f64]], metric: &M) -> Vec<f64> {
    let n = rows.len();
    let mut out = Vec::with_capacity(condensed_len(n));
    for i in 0..(n - 1) {
        for j in (i + 1)..n {
            out.push(metric.distance(rows[i], rows[j]));
        }
    }
    out
}

#[cfg(feature = "parallel")]
fn fill_condensed<M: SymmetricMetric + Sync>(rows: &[&[f64]], metric: &M) -> Vec<f64> {
    let n = rows.len();
    let blocks: Vec<Vec<f64>> = (0..(n - 1))
        .into_par_iter()
        .map(|i| {
            ((i + 1)..n)
                .map(|j| metric.distance(rows[i], rows[j]))
                .collect()
        })
        .collect();
    let mut out = Vec::with_capacity(condensed_len(n));
    for block in blocks {
        out.extend(block);
    }
    out
}
