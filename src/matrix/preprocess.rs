//! Log transform and row standardisation.

use super::Matrix;
use crate::config::PreprocessOptions;
use crate::error::{Error, Result};
use ndarray::{Array2, Axis};

/// Apply the enabled transforms, in order: `log2(v + 1)`, then per-row z-score.
///
/// The input is left untouched so callers can keep raw values for display.
///
/// The z-score uses the sample standard deviation (divisor `n - 1`). A row
/// whose values are all equal, or that has a single value, has no defined
/// z-score and is emitted as all zeros.
pub fn preprocess(matrix: &Matrix, options: &PreprocessOptions) -> Result<Matrix> {
    let mut values = matrix.values().to_owned();

    if let Some(((r, c), v)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(Error::invalid_value(format!(
            "non-finite value {v} at row {r} ('{}'), column '{}'",
            matrix.row_ids()[r],
            matrix.column_ids()[c]
        )));
    }

    if options.log_transform {
        log_transform(&mut values, matrix)?;
    }
    if options.normalize {
        standardize_rows(&mut values, matrix);
    }
    Ok(matrix.with_values(values))
}

fn log_transform(values: &mut Array2<f64>, matrix: &Matrix) -> Result<()> {
    if let Some(((r, c), v)) = values.indexed_iter().find(|(_, v)| **v + 1.0 <= 0.0) {
        return Err(Error::invalid_value(format!(
            "log2(v + 1) undefined for {v} at row {r} ('{}'), column '{}'",
            matrix.row_ids()[r],
            matrix.column_ids()[c]
        )));
    }
    values.mapv_inplace(|v| (v + 1.0).log2());
    Ok(())
}

fn standardize_rows(values: &mut Array2<f64>, matrix: &Matrix) {
    for (r, mut row) in values.axis_iter_mut(Axis(0)).enumerate() {
        let n = row.len();
        let first = row.iter().next().copied();
        let constant = n < 2 || row.iter().all(|v| Some(*v) == first);
        let mean = row.sum() / n as f64;
        let sd = if constant {
            0.0
        } else {
            (row.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        };

        if sd == 0.0 || !sd.is_finite() {
            if n > 0 {
                tracing::warn!(row = r, id = %matrix.row_ids()[r], "constant row standardised to zeros");
            }
            row.fill(0.0);
        } else {
            row.mapv_inplace(|v| (v - mean) / sd);
        }
    }
}
