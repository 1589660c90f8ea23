//! Hierarchical (agglomerative) clustering.
//!
//! Start with every item as its own cluster and repeatedly merge the closest
//! pair. After each merge the distances from the new cluster to every other
//! live cluster follow from the Lance-Williams recurrence
//! ([`Method::update`]), so the raw vectors are never revisited.
//!
//! # Determinism
//!
//! The closest pair is the minimum of the key
//!
//! ```text
//! (distance, min(id_a, id_b), max(id_a, id_b))
//! ```
//!
//! over all live pairs, where ids are SciPy-style cluster ids (leaves `0..n`,
//! merge `s` creates `n + s`). Ties in distance therefore go to the pair with
//! the lexicographically smallest `(left, right)` ids, and each step records
//! `left < right`. The same input always yields the same tree, bit for bit.
//!
//! # Cost
//!
//! The working set is the condensed matrix itself, indexed by slot. Each live
//! slot caches its nearest partner under the key above. After a merge only
//! slots whose cached partner took part in the merge are rescanned; the rest
//! compare against the one changed distance. Typical cost is `O(n²)` with an
//! `O(n³)` worst case; merges are inherently sequential.

use super::method::Method;
use crate::distance::{condensed_index, pairwise_distances, DistanceMatrix, Metric};
use crate::error::{Error, Result};
use crate::hierarchy::{LinkageStep, LinkageTree};
use core::cmp::Ordering;
use ndarray::ArrayView2;

/// Agglomerative clustering of a condensed distance matrix.
///
/// Fails with [`Error::DegenerateInput`] for fewer than two items, and with
/// [`Error::InvalidValue`] if a merged distance overflows.
pub fn cluster(distances: &DistanceMatrix, method: Method) -> Result<LinkageTree> {
    let n = distances.n_items();
    if n < 2 {
        return Err(Error::degenerate(format!(
            "need at least 2 items to cluster, got {n}"
        )));
    }
    tracing::debug!(n_items = n, %method, "agglomerative clustering");

    let mut state = WorkingSet::new(distances, method);
    let mut tree = LinkageTree::with_capacity(n);
    for s in 0..(n - 1) {
        let step = state.merge_closest(n + s)?;
        tracing::trace!(
            step = s,
            left = step.left,
            right = step.right,
            distance = step.distance,
            size = step.size,
            "merge"
        );
        tree.push(step);
    }
    Ok(tree)
}

/// Candidate pair ordering: distance, then ids.
#[derive(Debug, Clone, Copy)]
struct Key {
    distance: f64,
    lo: usize,
    hi: usize,
}

impl Key {
    #[inline]
    fn compare(&self, other: &Key) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.lo.cmp(&other.lo))
            .then(self.hi.cmp(&other.hi))
    }
}

struct WorkingSet {
    method: Method,
    n: usize,
    /// Condensed distances between slots.
    d: Vec<f64>,
    /// Cluster id currently held by each slot.
    ids: Vec<usize>,
    sizes: Vec<usize>,
    /// Live slots, ascending.
    live: Vec<usize>,
    /// Nearest live partner per slot.
    nearest: Vec<Option<usize>>,
}

impl WorkingSet {
    fn new(distances: &DistanceMatrix, method: Method) -> Self {
        let n = distances.n_items();
        let mut ws = Self {
            method,
            n,
            d: distances.as_slice().to_vec(),
            ids: (0..n).collect(),
            sizes: vec![1; n],
            live: (0..n).collect(),
            nearest: vec![None; n],
        };
        for slot in 0..n {
            ws.rescan(slot);
        }
        ws
    }

    #[inline]
    fn dist(&self, a: usize, b: usize) -> f64 {
        self.d[condensed_index(self.n, a, b)]
    }

    #[inline]
    fn key(&self, a: usize, b: usize) -> Key {
        let (ia, ib) = (self.ids[a], self.ids[b]);
        Key {
            distance: self.dist(a, b),
            lo: ia.min(ib),
            hi: ia.max(ib),
        }
    }

    fn rescan(&mut self, slot: usize) {
        let mut best: Option<(Key, usize)> = None;
        for &other in &self.live {
            if other == slot {
                continue;
            }
            let k = self.key(slot, other);
            if best.map_or(true, |(b, _)| k.compare(&b) == Ordering::Less) {
                best = Some((k, other));
            }
        }
        self.nearest[slot] = best.map(|(_, other)| other);
    }

    fn merge_closest(&mut self, new_id: usize) -> Result<LinkageStep> {
        let (a, b) = self.closest_pair();
        let (id_a, id_b) = (self.ids[a], self.ids[b]);
        let (n_a, n_b) = (self.sizes[a], self.sizes[b]);
        let d_ab = self.dist(a, b);

        // The merged cluster lives on in the lower slot.
        let (keep, drop) = (a.min(b), a.max(b));
        self.live.retain(|&s| s != drop);

        for idx in 0..self.live.len() {
            let k = self.live[idx];
            if k == keep {
                continue;
            }
            let updated = self.method.update(
                self.dist(k, a),
                self.dist(k, b),
                d_ab,
                n_a,
                n_b,
                self.sizes[k],
            );
            if !updated.is_finite() {
                return Err(Error::invalid_value(format!(
                    "{} update from cluster {} to merge of {id_a} and {id_b} overflowed",
                    self.method, self.ids[k]
                )));
            }
            self.d[condensed_index(self.n, k, keep)] = updated;
        }

        self.ids[keep] = new_id;
        self.sizes[keep] = n_a + n_b;
        self.nearest[drop] = None;

        for idx in 0..self.live.len() {
            let k = self.live[idx];
            if k == keep {
                continue;
            }
            match self.nearest[k] {
                Some(p) if p == a || p == b => self.rescan(k),
                Some(p) => {
                    if self.key(k, keep).compare(&self.key(k, p)) == Ordering::Less {
                        self.nearest[k] = Some(keep);
                    }
                }
                None => self.rescan(k),
            }
        }
        self.rescan(keep);

        Ok(LinkageStep {
            left: id_a.min(id_b),
            right: id_a.max(id_b),
            distance: d_ab,
            size: n_a + n_b,
        })
    }

    fn closest_pair(&self) -> (usize, usize) {
        let mut best: Option<(Key, usize, usize)> = None;
        for &slot in &self.live {
            if let Some(p) = self.nearest[slot] {
                let k = self.key(slot, p);
                if best.map_or(true, |(b, _, _)| k.compare(&b) == Ordering::Less) {
                    best = Some((k, slot, p));
                }
            }
        }
        // At least two slots are live whenever a merge is requested.
        best.map_or((self.live[0], self.live[1]), |(_, a, b)| (a, b))
    }
}

/// Hierarchical clustering of raw vectors: distance metric plus linkage method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HierarchicalClustering {
    metric: Metric,
    method: Method,
}

impl HierarchicalClustering {
    /// Create a clusterer with the given method and Euclidean distances.
    pub fn new(method: Method) -> Self {
        Self {
            metric: Metric::Euclidean,
            method,
        }
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Configured metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Configured method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Check that the metric suits the method.
    pub fn validate(&self) -> Result<()> {
        if self.method.requires_euclidean() && !self.metric.is_euclidean() {
            return Err(Error::degenerate(format!(
                "{} linkage requires euclidean distances, got {}",
                self.method, self.metric
            )));
        }
        Ok(())
    }

    /// Cluster the rows of `vectors` (pass `m.t()` for columns).
    pub fn fit(&self, vectors: ArrayView2<'_, f64>) -> Result<LinkageTree> {
        self.validate()?;
        let distances = pairwise_distances(vectors, self.metric)?;
        cluster(&distances, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};
    use proptest::prelude::*;

    fn condensed(n: usize, values: &[f64]) -> DistanceMatrix {
        DistanceMatrix::from_condensed(n, values.to_vec()).unwrap()
    }

    fn pairs(tree: &LinkageTree) -> Vec<(usize, usize)> {
        tree.iter().map(|s| (s.left, s.right)).collect()
    }

    #[test]
    fn test_two_separated_groups() {
        let data = array![[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]];
        let tree = HierarchicalClustering::new(Method::Average)
            .fit(data.view())
            .unwrap();

        assert_eq!(tree.n_items(), 4);
        assert_eq!(tree.n_steps(), 3);
        let labels = tree.cut_to_k(2).unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
        let last = tree.steps()[2];
        assert_eq!((last.left, last.right, last.size), (4, 5, 4));
    }

    #[test]
    fn test_hand_computed_complete_linkage() {
        // Points 0, 1, 4, 9 on a line.
        //        0   1   2   3
        // d =  [ 1,  4,  9,      (0,·)
        //            3,  8,      (1,·)
        //                5 ]     (2,·)
        let d = condensed(4, &[1.0, 4.0, 9.0, 3.0, 8.0, 5.0]);
        let tree = cluster(&d, Method::Complete).unwrap();
        assert_eq!(pairs(&tree), vec![(0, 1), (2, 4), (3, 5)]);
        assert_eq!(tree.distances(), vec![1.0, 4.0, 9.0]);
        assert_eq!(tree.iter().map(|s| s.size).collect::<Vec<_>>(), vec![2, 3, 4]);

        let tree = cluster(&d, Method::Single).unwrap();
        assert_eq!(pairs(&tree), vec![(0, 1), (2, 4), (3, 5)]);
        assert_eq!(tree.distances(), vec![1.0, 3.0, 5.0]);

        let tree = cluster(&d, Method::Average).unwrap();
        assert_eq!(pairs(&tree), vec![(0, 1), (2, 4), (3, 5)]);
        assert_relative_eq!(tree.steps()[1].distance, 3.5);
        assert_relative_eq!(tree.steps()[2].distance, (9.0 + 8.0 + 5.0) / 3.0);
    }

    #[test]
    fn test_ties_go_to_lowest_ids() {
        // All pairwise distances equal.
        let d = condensed(4, &[1.0; 6]);
        let tree = cluster(&d, Method::Complete).unwrap();
        assert_eq!(pairs(&tree), vec![(0, 1), (2, 3), (4, 5)]);

        let tree = cluster(&d, Method::Single).unwrap();
        // After (0,1) -> 4, the pairs (2,3), (2,4), (3,4) all sit at 1.0.
        assert_eq!(pairs(&tree), vec![(0, 1), (2, 3), (4, 5)]);
    }

    #[test]
    fn test_signed_zero_ties_go_to_lowest_ids() {
        // (0, 1) at +0.0 and (0, 2) at -0.0 are the same distance.
        let d = condensed(3, &[0.0, -0.0, 5.0]);
        for m in Method::ALL {
            let tree = cluster(&d, m).unwrap();
            assert_eq!(pairs(&tree)[0], (0, 1), "{m}");
        }
    }

    #[test]
    fn test_overflowing_merge_is_rejected() {
        // Every input distance is finite, but squaring them is not.
        let d = condensed(3, &[1e200, 1e200, 2e200]);
        for m in [Method::Ward, Method::Centroid, Method::Median] {
            assert!(
                matches!(cluster(&d, m), Err(Error::InvalidValue { .. })),
                "{m}"
            );
        }
        let tree = cluster(&d, Method::Complete).unwrap();
        assert_eq!(tree.distances(), vec![1e200, 2e200]);
    }

    #[test]
    fn test_overflowing_input_fails_instead_of_flattening() {
        let data = array![[0.0], [1e200], [-1e200]];
        let err = HierarchicalClustering::new(Method::Ward)
            .fit(data.view())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn test_ties_prefer_original_items_over_new_clusters() {
        // 0-1 at 1, then 2 is equally far (2) from 3 and from {0,1}.
        //       0  1  2  3
        let d = condensed(4, &[1.0, 2.0, 7.0, 2.0, 7.0, 2.0]);
        let tree = cluster(&d, Method::Complete).unwrap();
        assert_eq!(pairs(&tree)[0], (0, 1));
        // Candidates at 2.0: (2, 4) and (2, 3); (2, 3) is lexicographically smaller.
        assert_eq!(pairs(&tree)[1], (2, 3));
    }

    #[test]
    fn test_fewer_than_two_items_is_degenerate() {
        for n in 0..2 {
            let d = DistanceMatrix::from_condensed(n, vec![]).unwrap();
            for m in Method::ALL {
                assert!(matches!(cluster(&d, m), Err(Error::DegenerateInput { .. })));
            }
        }
    }

    #[test]
    fn test_two_items() {
        let d = condensed(2, &[0.25]);
        let tree = cluster(&d, Method::Ward).unwrap();
        assert_eq!(tree.steps(), &[LinkageStep { left: 0, right: 1, distance: 0.25, size: 2 }]);
    }

    #[test]
    fn test_ward_requires_euclidean() {
        let data = array![[0.0, 1.0], [1.0, 0.0], [2.0, 2.0]];
        let hc = HierarchicalClustering::new(Method::Ward).with_metric(Metric::Cosine);
        assert!(matches!(hc.fit(data.view()), Err(Error::DegenerateInput { .. })));
        assert!(HierarchicalClustering::new(Method::Ward).fit(data.view()).is_ok());
        assert!(HierarchicalClustering::new(Method::Average)
            .with_metric(Metric::Cosine)
            .fit(data.view())
            .is_ok());
    }

    #[test]
    fn test_ward_merge_height_matches_variance_formula() {
        // Clusters {0, 2} and {10} on a line: Δ = sqrt(2 * n_a n_b / (n_a + n_b)) * |μ_a - μ_b|
        let data = array![[0.0], [2.0], [10.0]];
        let tree = HierarchicalClustering::new(Method::Ward).fit(data.view()).unwrap();
        assert_relative_eq!(tree.steps()[0].distance, 2.0);
        let expected = (2.0f64 * 2.0 * 1.0 / 3.0).sqrt() * 9.0;
        assert_relative_eq!(tree.steps()[1].distance, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_centroid_can_invert() {
        // Equilateral-ish triangle: the centroid of the first pair is closer to
        // the third point than the pair was to each other.
        let h = 3.0f64.sqrt() / 2.0;
        let data = array![[0.0, 0.0], [1.0, 0.0], [0.5, h]];
        let tree = HierarchicalClustering::new(Method::Centroid).fit(data.view()).unwrap();
        assert_eq!(tree.n_steps(), 2);
        assert!(tree.steps()[1].distance < tree.steps()[0].distance);
        assert_eq!(tree.leaf_order().unwrap().len(), 3);
    }

    fn kodama_heights(d: &DistanceMatrix, method: kodama::Method) -> Vec<f64> {
        let mut condensed = d.as_slice().to_vec();
        let dend = kodama::linkage(&mut condensed, d.n_items(), method);
        dend.steps().iter().map(|s| s.dissimilarity).collect()
    }

    proptest! {
        #[test]
        fn test_always_n_minus_one_steps_and_deterministic(
            n in 2usize..24,
            raw in proptest::collection::vec(0.0f64..100.0, 276),
            m in 0usize..7,
        ) {
            let method = Method::ALL[m];
            let d = condensed(n, &raw[..n * (n - 1) / 2]);
            let a = cluster(&d, method).unwrap();
            let b = cluster(&d, method).unwrap();
            prop_assert_eq!(a.n_steps(), n - 1);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.steps()[n - 2].size, n);
            for (s, step) in a.iter().enumerate() {
                prop_assert!(step.left < step.right);
                prop_assert!(step.right < n + s);
            }
            let order = a.leaf_order().unwrap();
            let mut sorted = order.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());
        }

        #[test]
        fn test_monotone_methods_agree_with_kodama(
            rows in 2usize..16,
            raw in proptest::collection::vec(-10.0f64..10.0, 48),
        ) {
            let data = Array2::from_shape_vec((rows, 3), raw[..rows * 3].to_vec()).unwrap();
            let d = pairwise_distances(data.view(), Metric::Euclidean).unwrap();
            for (ours, theirs) in [
                (Method::Single, kodama::Method::Single),
                (Method::Complete, kodama::Method::Complete),
                (Method::Average, kodama::Method::Average),
                (Method::Weighted, kodama::Method::Weighted),
            ] {
                let tree = cluster(&d, ours).unwrap();
                let mut mine = tree.distances();
                mine.sort_by(f64::total_cmp);
                let reference = kodama_heights(&d, theirs);
                prop_assert_eq!(mine.len(), reference.len());
                for (x, y) in mine.iter().zip(&reference) {
                    prop_assert!((x - y).abs() <= 1e-9 * (1.0 + y.abs()), "{ours}: {x} vs {y}");
                }
            }
        }
    }
}
