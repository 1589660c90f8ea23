//! Tab-delimited matrix input.
//!
//! ```text
//! Group   A     A     B     B        <- group labels (first field ignored)
//! sample  A-1   A-2   B-1   B-2      <- sample names (first field ignored)
//! ICA1    5.7   11.7  5.7   4.5      <- feature, then one value per sample
//! DBNDD1  9.43  10.67 3.4   2.5
//! ```
//!
//! Fields are split on `\t` only. Leading and trailing blank lines are
//! ignored; a trailing `\r` on any line is stripped.

use super::{GroupMap, Matrix};
use crate::error::{Error, Result};
use ndarray::Array2;
use std::fmt::Write as _;

/// Parse group line, sample line and data rows into a matrix and group map.
///
/// The matrix columns and the group map list the same samples in the same
/// order.
pub fn parse(raw: &str) -> Result<(Matrix, GroupMap)> {
    let lines: Vec<(usize, &str)> = raw
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.strip_suffix('\r').unwrap_or(l)))
        .collect();
    let first = lines.iter().position(|(_, l)| !l.trim().is_empty());
    let last = lines.iter().rposition(|(_, l)| !l.trim().is_empty());
    let lines = match (first, last) {
        (Some(a), Some(b)) => &lines[a..=b],
        _ => &lines[..0],
    };

    if lines.len() < 3 {
        return Err(Error::malformed(
            None,
            format!(
                "need a group line, a sample line and at least one data line; got {} line(s)",
                lines.len()
            ),
        ));
    }

    let (group_no, group_line) = lines[0];
    let (sample_no, sample_line) = lines[1];
    let groups: Vec<&str> = group_line.split('\t').collect();
    let samples: Vec<&str> = sample_line.split('\t').collect();

    let width = samples.len();
    if width < 2 {
        return Err(Error::malformed(Some(sample_no), "no sample columns"));
    }
    if groups.len() != width {
        return Err(Error::malformed(
            Some(group_no),
            format!(
                "group line has {} fields, sample line has {width}",
                groups.len()
            ),
        ));
    }

    let column_ids: Vec<String> = samples[1..].iter().map(|s| s.to_string()).collect();
    let group_map = GroupMap::new(
        column_ids.clone(),
        groups[1..].iter().map(|s| s.to_string()).collect(),
    )
    .map_err(|e| match e {
        Error::MalformedInput { message, .. } => Error::malformed(Some(sample_no), message),
        other => other,
    })?;

    let data = &lines[2..];
    let n_cols = width - 1;
    let mut row_ids = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len() * n_cols);
    for &(line_no, line) in data {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != width {
            return Err(Error::malformed(
                Some(line_no),
                format!("expected {width} fields, found {}", fields.len()),
            ));
        }
        row_ids.push(fields[0].to_string());
        for (col, field) in fields[1..].iter().enumerate() {
            let v: f64 = field.trim().parse().map_err(|_| {
                Error::malformed(
                    Some(line_no),
                    format!(
                        "'{field}' in column '{}' is not a number",
                        column_ids[col]
                    ),
                )
            })?;
            values.push(v);
        }
    }

    let values = Array2::from_shape_vec((row_ids.len(), n_cols), values)
        .map_err(|e| Error::malformed(None, e.to_string()))?;
    tracing::debug!(
        rows = row_ids.len(),
        cols = n_cols,
        groups = group_map.groups().len(),
        "parsed matrix"
    );
    Ok((Matrix::new(row_ids, column_ids, values)?, group_map))
}

/// Write a matrix and its groups back in the input format.
///
/// Values use Rust's shortest round-trip formatting, so `parse(to_tsv(..))`
/// reproduces identical values.
pub fn to_tsv(matrix: &Matrix, groups: &GroupMap) -> Result<String> {
    let labels = groups.labels_for(matrix.column_ids())?;
    let mut out = String::new();

    out.push_str("Group");
    for g in &labels {
        out.push('\t');
        out.push_str(g);
    }
    out.push_str("\nsample");
    for s in matrix.column_ids() {
        out.push('\t');
        out.push_str(s);
    }
    for (id, row) in matrix.row_ids().iter().zip(matrix.values().rows()) {
        out.push('\n');
        out.push_str(id);
        for v in row {
            // Writing to a String cannot fail.
            let _ = write!(out, "\t{v}");
        }
    }
    out.push('\n');
    Ok(out)
}
