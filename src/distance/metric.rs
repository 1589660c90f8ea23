//! Vector dissimilarity measures.
//!
//! Each metric is a pure function of two equal-length vectors. The pairwise
//! driver in [`super::pairwise_distances`] never looks inside a metric, so a
//! new measure only needs a [`SymmetricMetric`] impl and an enum arm.

use crate::error::{Error, Result};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// A symmetric distance between two vectors of the same length.
pub trait SymmetricMetric {
    /// Distance between `a` and `b`. Must be non-negative and zero for `a == b`.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Named distance metric.
///
/// Names follow the conventional spelling (`euclidean`, `cityblock`, ...) and
/// match case-insensitively, through serde as through `FromStr`. Unknown
/// names are rejected rather than defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Metric {
    /// L2 norm of the difference.
    #[default]
    Euclidean,
    /// Squared L2 norm of the difference.
    SqEuclidean,
    /// L1 norm of the difference.
    Manhattan,
    /// L∞ norm of the difference.
    Chebyshev,
    /// One minus the cosine of the angle between the vectors.
    Cosine,
    /// One minus the Pearson correlation of the vectors.
    Correlation,
}

impl Metric {
    /// Every supported metric.
    pub const ALL: [Metric; 6] = [
        Metric::Euclidean,
        Metric::SqEuclidean,
        Metric::Manhattan,
        Metric::Chebyshev,
        Metric::Cosine,
        Metric::Correlation,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::SqEuclidean => "sqeuclidean",
            Metric::Manhattan => "manhattan",
            Metric::Chebyshev => "chebyshev",
            Metric::Cosine => "cosine",
            Metric::Correlation => "correlation",
        }
    }

    /// Whether the metric is the plain Euclidean distance.
    ///
    /// Centroid, median and Ward linkage are only geometrically meaningful on
    /// Euclidean input.
    pub fn is_euclidean(self) -> bool {
        matches!(self, Metric::Euclidean)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for Metric {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Metric::Euclidean),
            "sqeuclidean" => Ok(Metric::SqEuclidean),
            "manhattan" | "cityblock" => Ok(Metric::Manhattan),
            "chebyshev" => Ok(Metric::Chebyshev),
            "cosine" => Ok(Metric::Cosine),
            "correlation" => Ok(Metric::Correlation),
            other => Err(Error::degenerate(format!("unknown distance metric '{other}'"))),
        }
    }
}

impl SymmetricMetric for Metric {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Metric::Euclidean => sq_euclidean(a, b).sqrt(),
            Metric::SqEuclidean => sq_euclidean(a, b),
            Metric::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
            Metric::Chebyshev => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y).abs())
                .fold(0.0, f64::max),
            Metric::Cosine => cosine(a, b),
            Metric::Correlation => correlation(a, b),
        }
    }
}

#[inline]
fn sq_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// `1 - a·b / (|a| |b|)`.
///
/// Two zero vectors are identical (0); a zero vector against a non-zero one
/// is maximally dissimilar among non-negative cosines (1).
fn cosine(a: &[f64], b: &[f64]) -> f64 {
    if a == b {
        return 0.0;
    }
    let (mut dot, mut na, mut nb) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    match (na == 0.0, nb == 0.0) {
        (true, true) => 0.0,
        (true, false) | (false, true) => 1.0,
        // Rounding can push the ratio past 1.
        (false, false) => (1.0 - dot / (na.sqrt() * nb.sqrt())).max(0.0),
    }
}

fn correlation(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    let n = a.len() as f64;
    let ma = a.iter().sum::<f64>() / n;
    let mb = b.iter().sum::<f64>() / n;
    let ca: Vec<f64> = a.iter().map(|x| x - ma).collect();
    let cb: Vec<f64> = b.iter().map(|y| y - mb).collect();
    cosine(&ca, &cb)
}
