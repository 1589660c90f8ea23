//! Agglomeration methods and their Lance-Williams updates.

use crate::error::{Error, Result};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// How the distance between two clusters is defined.
///
/// Every method is a member of the Lance-Williams family: after merging `i`
/// and `j`, the distance from any other cluster `k` to `i ∪ j` follows from
/// `d(k,i)`, `d(k,j)`, `d(i,j)` and the cluster sizes alone.
///
/// Deserialises from the same case-insensitive names `FromStr` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Method {
    /// Nearest members: `min(d(k,i), d(k,j))`.
    Single,
    /// Farthest members: `max(d(k,i), d(k,j))`.
    #[default]
    Complete,
    /// Unweighted mean over member pairs (UPGMA).
    Average,
    /// Mean of the two parents' distances (WPGMA).
    Weighted,
    /// Distance between centroids (UPGMC). Euclidean input only.
    Centroid,
    /// Distance between weighted centroids (WPGMC). Euclidean input only.
    Median,
    /// Increase in within-cluster variance. Euclidean input only.
    Ward,
}

impl Method {
    /// Every supported method.
    pub const ALL: [Method; 7] = [
        Method::Single,
        Method::Complete,
        Method::Average,
        Method::Weighted,
        Method::Centroid,
        Method::Median,
        Method::Ward,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Method::Single => "single",
            Method::Complete => "complete",
            Method::Average => "average",
            Method::Weighted => "weighted",
            Method::Centroid => "centroid",
            Method::Median => "median",
            Method::Ward => "ward",
        }
    }

    /// Whether the method assumes Euclidean input distances.
    pub fn requires_euclidean(self) -> bool {
        matches!(self, Method::Centroid | Method::Median | Method::Ward)
    }

    /// Whether merge heights are guaranteed non-decreasing.
    pub fn is_monotone(self) -> bool {
        !matches!(self, Method::Centroid | Method::Median)
    }

    /// Distance from `k` to the merge of `i` and `j`.
    ///
    /// `d_ki`, `d_kj`, `d_ij` are current inter-cluster distances; `n_*` are
    /// cluster sizes. Centroid, median and Ward operate on squared distances
    /// and return the root; rounding below zero is clamped. Overflow is not
    /// hidden: it surfaces as an infinite or NaN result.
    #[inline]
    pub fn update(
        self,
        d_ki: f64,
        d_kj: f64,
        d_ij: f64,
        n_i: usize,
        n_j: usize,
        n_k: usize,
    ) -> f64 {
        let (ni, nj, nk) = (n_i as f64, n_j as f64, n_k as f64);
        match self {
            Method::Single => d_ki.min(d_kj),
            Method::Complete => d_ki.max(d_kj),
            Method::Average => (ni * d_ki + nj * d_kj) / (ni + nj),
            Method::Weighted => 0.5 * (d_ki + d_kj),
            Method::Centroid => {
                let nij = ni + nj;
                let sq = (ni * d_ki * d_ki + nj * d_kj * d_kj) / nij
                    - ni * nj * d_ij * d_ij / (nij * nij);
                root(sq)
            }
            Method::Median => {
                let sq = 0.5 * d_ki * d_ki + 0.5 * d_kj * d_kj - 0.25 * d_ij * d_ij;
                root(sq)
            }
            Method::Ward => {
                let sq = ((ni + nk) * d_ki * d_ki + (nj + nk) * d_kj * d_kj - nk * d_ij * d_ij)
                    / (ni + nj + nk);
                root(sq)
            }
        }
    }
}

/// Square root of a squared distance, with rounding below zero clamped to
/// `+0.0`. NaN passes through.
#[inline]
fn root(sq: f64) -> f64 {
    if sq <= 0.0 {
        0.0
    } else {
        sq.sqrt()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for Method {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Method::ALL
            .into_iter()
            .find(|m| m.name() == name)
            .ok_or_else(|| Error::degenerate(format!("unknown linkage method '{name}'")))
    }
}
