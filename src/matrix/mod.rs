//! Labelled expression matrices.
//!
//! Rows are features (genes), columns are samples. Each sample carries a
//! group label kept in a [`GroupMap`].

mod parse;
mod preprocess;
mod reorder;

pub use parse::{parse, to_tsv};
pub use preprocess::preprocess;
pub use reorder::reorder;

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1};
use std::collections::HashMap;

/// A dense `rows × columns` matrix with row and column identifiers.
///
/// Row identifiers are tracked by position and may repeat. Column
/// identifiers are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    row_ids: Vec<String>,
    column_ids: Vec<String>,
    values: Array2<f64>,
}

impl Matrix {
    /// Assemble a matrix, checking that identifiers match the value shape.
    pub fn new(row_ids: Vec<String>, column_ids: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if values.nrows() != row_ids.len() || values.ncols() != column_ids.len() {
            return Err(Error::malformed(
                None,
                format!(
                    "{} row ids and {} column ids for a {}x{} matrix",
                    row_ids.len(),
                    column_ids.len(),
                    values.nrows(),
                    values.ncols()
                ),
            ));
        }
        Ok(Self {
            row_ids,
            column_ids,
            values,
        })
    }

    /// Number of rows (features).
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns (samples).
    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    /// Row identifiers, in row order.
    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    /// Column identifiers, in column order.
    pub fn column_ids(&self) -> &[String] {
        &self.column_ids
    }

    /// The values.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Value at (`row`, `col`), if in range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    /// View of one row.
    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.values.row(row)
    }

    /// Samples as rows, features as columns.
    pub fn transpose(&self) -> Matrix {
        Matrix {
            row_ids: self.column_ids.clone(),
            column_ids: self.row_ids.clone(),
            values: self.values.t().to_owned(),
        }
    }

    pub(crate) fn with_values(&self, values: Array2<f64>) -> Matrix {
        debug_assert_eq!(values.dim(), self.values.dim());
        Matrix {
            row_ids: self.row_ids.clone(),
            column_ids: self.column_ids.clone(),
            values,
        }
    }
}

/// Sample → group label mapping, in sample order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupMap {
    samples: Vec<String>,
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl GroupMap {
    /// Pair samples with labels positionally.
    ///
    /// Fails on a length mismatch or a repeated sample name.
    pub fn new(samples: Vec<String>, labels: Vec<String>) -> Result<Self> {
        if samples.len() != labels.len() {
            return Err(Error::malformed(
                None,
                format!(
                    "{} group labels for {} samples",
                    labels.len(),
                    samples.len()
                ),
            ));
        }
        let mut index = HashMap::with_capacity(samples.len());
        for (i, s) in samples.iter().enumerate() {
            if index.insert(s.clone(), i).is_some() {
                return Err(Error::malformed(None, format!("duplicate sample name '{s}'")));
            }
        }
        Ok(Self {
            samples,
            labels,
            index,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Group label of `sample`.
    pub fn get(&self, sample: &str) -> Option<&str> {
        self.index.get(sample).map(|&i| self.labels[i].as_str())
    }

    /// `(sample, group)` pairs in sample order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.samples
            .iter()
            .zip(&self.labels)
            .map(|(s, g)| (s.as_str(), g.as_str()))
    }

    /// Labels for a sequence of samples, e.g. the reordered column ids.
    pub fn labels_for<'a, I>(&self, samples: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = &'a String>,
    {
        samples
            .into_iter()
            .map(|s| {
                self.get(s)
                    .map(str::to_owned)
                    .ok_or_else(|| Error::malformed(None, format!("sample '{s}' has no group")))
            })
            .collect()
    }

    /// Distinct labels in order of first appearance.
    pub fn groups(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for g in &self.labels {
            if !out.contains(&g.as_str()) {
                out.push(g);
            }
        }
        out
    }
}
