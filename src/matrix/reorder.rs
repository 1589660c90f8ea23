use super::Matrix;
use crate::error::{Error, Result};
use ndarray::Axis;

/// Permute rows and columns: output row `i` is input row `row_order[i]`,
/// and likewise for columns. Identifiers move with their data.
///
/// Both orders must be permutations of `0..n`; anything else is rejected
/// instead of silently dropping or duplicating data.
pub fn reorder(matrix: &Matrix, row_order: &[usize], col_order: &[usize]) -> Result<Matrix> {
    check_permutation("row", row_order, matrix.n_rows())?;
    check_permutation("column", col_order, matrix.n_cols())?;

    let values = matrix
        .values()
        .select(Axis(0), row_order)
        .select(Axis(1), col_order);
    let row_ids = row_order.iter().map(|&i| matrix.row_ids()[i].clone()).collect();
    let column_ids = col_order
        .iter()
        .map(|&j| matrix.column_ids()[j].clone())
        .collect();
    Matrix::new(row_ids, column_ids, values)
}

fn check_permutation(axis: &str, order: &[usize], n: usize) -> Result<()> {
    if order.len() != n {
        return Err(Error::invalid_value(format!(
            "{axis} order has {} entries for {n} {axis}s",
            order.len()
        )));
    }
    let mut seen = vec![false; n];
    for &i in order {
        if i >= n || std::mem::replace(&mut seen[i], true) {
            return Err(Error::invalid_value(format!(
                "{axis} order is not a permutation of 0..{n} (entry {i})"
            )));
        }
    }
    Ok(())
}
