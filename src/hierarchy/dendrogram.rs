//! Linkage tree: the merge history of agglomerative clustering.
//!
//! Cluster ids follow the SciPy/MATLAB convention:
//! - leaves are `0..n`
//! - merge `i` creates cluster `n + i`

use super::order::{walk, Walk};
use crate::error::{Error, Result};

/// A single merge in a [`LinkageTree`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkageStep {
    /// Cluster id expanded first (drawn left / top).
    pub left: usize,
    /// Cluster id expanded second.
    pub right: usize,
    /// Dissimilarity at which the merge occurred.
    pub distance: f64,
    /// Number of original items in the merged cluster.
    pub size: usize,
}

/// A cluster id resolved against its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterId {
    /// An original item, by index.
    Leaf(usize),
    /// A merged cluster, by the index of the step that created it.
    Internal(usize),
}

/// Merge history over `n` items: exactly `n - 1` steps once complete.
///
/// Merge distances are *not* guaranteed to be non-decreasing: centroid and
/// median linkage can produce inversions.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkageTree {
    steps: Vec<LinkageStep>,
    n_items: usize,
}

impl LinkageTree {
    pub(crate) fn with_capacity(n_items: usize) -> Self {
        Self {
            steps: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    pub(crate) fn push(&mut self, step: LinkageStep) {
        self.steps.push(step);
    }

    /// Build a tree from externally produced steps.
    ///
    /// Only the step count is checked here; structural problems (dangling
    /// ids, cycles, unreachable merges) surface from [`LinkageTree::leaf_order`].
    pub fn from_steps(n_items: usize, steps: Vec<LinkageStep>) -> Result<Self> {
        let expected = n_items.saturating_sub(1);
        if steps.len() != expected {
            return Err(Error::corrupt_tree(format!(
                "{n_items} items need {expected} merge steps, got {}",
                steps.len()
            )));
        }
        Ok(Self { steps, n_items })
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_steps(&self) -> usize {
        self.steps.len()
    }

    /// All merges, in creation order.
    pub fn steps(&self) -> &[LinkageStep] {
        &self.steps
    }

    /// Iterate over merges.
    pub fn iter(&self) -> impl Iterator<Item = &LinkageStep> {
        self.steps.iter()
    }

    /// Merge heights in creation order.
    pub fn distances(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.distance).collect()
    }

    /// Id of the final merge, or of the single leaf for a one-item tree.
    pub fn root(&self) -> Option<usize> {
        match (self.n_items, self.steps.len()) {
            (0, _) => None,
            (_, 0) => Some(0),
            (n, k) => Some(n + k - 1),
        }
    }

    /// Classify a raw cluster id.
    pub fn resolve(&self, id: usize) -> Result<ClusterId> {
        if id < self.n_items {
            Ok(ClusterId::Leaf(id))
        } else if id - self.n_items < self.steps.len() {
            Ok(ClusterId::Internal(id - self.n_items))
        } else {
            Err(Error::corrupt_tree(format!(
                "cluster id {id} out of range for {} items and {} steps",
                self.n_items,
                self.steps.len()
            )))
        }
    }

    /// Left-to-right leaf sequence of the dendrogram.
    ///
    /// See [`crate::hierarchy::leaf_order`].
    pub fn leaf_order(&self) -> Result<Vec<usize>> {
        walk(self).map(|w| w.leaves)
    }

    /// Flat cluster labels after applying the first `n - k` merges.
    ///
    /// Labels are numbered in leaf order, so clusters read left to right as
    /// `0, 1, ..., k-1` along the dendrogram.
    pub fn cut_to_k(&self, k: usize) -> Result<Vec<usize>> {
        if k == 0 || k > self.n_items {
            return Err(Error::degenerate(format!(
                "cannot create {k} clusters from {} items",
                self.n_items
            )));
        }
        let walk = walk(self)?;
        let n_merges = self.n_items - k;
        Ok(self.flat_labels(&walk, |k| k < n_merges))
    }

    /// Flat cluster labels keeping every subtree whose merges all lie at or
    /// below `threshold`.
    ///
    /// With inversions a merge below the threshold can sit above a merge
    /// that is not; such a merge is cut as well, so clusters are always whole
    /// subtrees.
    pub fn cut_at_distance(&self, threshold: f64) -> Result<Vec<usize>> {
        let walk = walk(self)?;
        let mut subtree_max = vec![f64::NEG_INFINITY; self.steps.len()];
        for &k in &walk.post_order {
            let step = &self.steps[k];
            let mut h = step.distance;
            for child in [step.left, step.right] {
                if let ClusterId::Internal(c) = self.resolve(child)? {
                    h = h.max(subtree_max[c]);
                }
            }
            subtree_max[k] = h;
        }
        Ok(self.flat_labels(&walk, |k| subtree_max[k] <= threshold))
    }

    /// Union leaves under every applied merge, then number the components by
    /// first appearance in leaf order.
    fn flat_labels(&self, walk: &Walk, apply: impl Fn(usize) -> bool) -> Vec<usize> {
        let n = self.n_items;
        let mut parent: Vec<usize> = (0..n).collect();
        let mut rep = vec![0usize; self.steps.len()];

        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        for &k in &walk.post_order {
            let step = &self.steps[k];
            let leaf_of = |id: usize| if id < n { id } else { rep[id - n] };
            let (a, b) = (leaf_of(step.left), leaf_of(step.right));
            rep[k] = a;
            if apply(k) {
                let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
                if ra != rb {
                    parent[rb] = ra;
                }
            }
        }

        let mut label_of_root = vec![usize::MAX; n];
        let mut labels = vec![0usize; n];
        let mut next = 0;
        for &leaf in &walk.leaves {
            let r = find(&mut parent, leaf);
            if label_of_root[r] == usize::MAX {
                label_of_root[r] = next;
                next += 1;
            }
            labels[leaf] = label_of_root[r];
        }
        labels
    }
}
