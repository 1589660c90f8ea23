//! Drawing coordinates for a dendrogram.
//!
//! Uses the same coordinate system as SciPy's `dendrogram`: leaf `p` (by
//! position in the leaf order) sits at `x = 5 + 10p`, leaves are at height 0,
//! and each merge is drawn as a `⊓`-shaped link of four points:
//!
//! ```text
//!   (x1, h) ───────── (x2, h)
//!      │                 │
//!   (x1, hl)          (x2, hr)
//! ```
//!
//! where `x1`/`x2` are the child midpoints, `hl`/`hr` the child heights and
//! `h` the merge height. Flip the axes for a row dendrogram.

use super::dendrogram::{ClusterId, LinkageTree};
use super::order::walk;
use crate::error::Result;

/// Leaf spacing along the dendrogram axis.
pub const LEAF_SPACING: f64 = 10.0;

/// One drawn merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DendrogramLink {
    /// Index of the step this link draws.
    pub step: usize,
    /// Positions along the leaf axis.
    pub x: [f64; 4],
    /// Heights.
    pub y: [f64; 4],
}

/// Everything a renderer needs to draw a dendrogram next to a heatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct DendrogramLayout {
    /// Leaf order (original indices, left to right).
    pub leaves: Vec<usize>,
    /// Links in post-order (children before parents).
    pub links: Vec<DendrogramLink>,
    /// Largest height reached by any link.
    pub max_height: f64,
}

impl DendrogramLayout {
    /// Compute the layout for `tree`.
    pub fn new(tree: &LinkageTree) -> Result<Self> {
        let walk = walk(tree)?;
        let n = tree.n_items();

        let mut leaf_x = vec![0.0; n];
        for (pos, &leaf) in walk.leaves.iter().enumerate() {
            leaf_x[leaf] = Self::leaf_position(pos);
        }

        // (midpoint, height) per internal cluster
        let mut internal = vec![(0.0, 0.0); tree.n_steps()];
        let mut links = Vec::with_capacity(tree.n_steps());
        let mut max_height: f64 = 0.0;

        for &k in &walk.post_order {
            let step = &tree.steps()[k];
            let place = |id: usize| -> Result<(f64, f64)> {
                Ok(match tree.resolve(id)? {
                    ClusterId::Leaf(i) => (leaf_x[i], 0.0),
                    ClusterId::Internal(c) => internal[c],
                })
            };
            let (xl, hl) = place(step.left)?;
            let (xr, hr) = place(step.right)?;
            let h = step.distance;

            internal[k] = ((xl + xr) / 2.0, h);
            max_height = max_height.max(h).max(hl).max(hr);
            links.push(DendrogramLink {
                step: k,
                x: [xl, xl, xr, xr],
                y: [hl, h, h, hr],
            });
        }

        Ok(Self {
            leaves: walk.leaves,
            links,
            max_height,
        })
    }

    /// Position of leaf slot `pos` along the leaf axis.
    pub fn leaf_position(pos: usize) -> f64 {
        LEAF_SPACING / 2.0 + LEAF_SPACING * pos as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::LinkageStep;

    #[test]
    fn test_balanced_tree_links() {
        let tree = LinkageTree::from_steps(
            4,
            vec![
                LinkageStep { left: 0, right: 1, distance: 0.5, size: 2 },
                LinkageStep { left: 2, right: 3, distance: 0.7, size: 2 },
                LinkageStep { left: 4, right: 5, distance: 1.0, size: 4 },
            ],
        )
        .unwrap();

        let layout = DendrogramLayout::new(&tree).unwrap();
        assert_eq!(layout.leaves, vec![0, 1, 2, 3]);
        assert_eq!(layout.links.len(), 3);
        assert_eq!(layout.max_height, 1.0);

        let first = layout.links[0];
        assert_eq!(first.step, 0);
        assert_eq!(first.x, [5.0, 5.0, 15.0, 15.0]);
        assert_eq!(first.y, [0.0, 0.5, 0.5, 0.0]);

        let root = layout.links[2];
        assert_eq!(root.step, 2);
        assert_eq!(root.x, [10.0, 10.0, 30.0, 30.0]);
        assert_eq!(root.y, [0.5, 1.0, 1.0, 0.7]);
    }

    #[test]
    fn test_leaf_positions_follow_leaf_order() {
        // 3 = (2, 0); 4 = (3, 1): order is [2, 0, 1]
        let tree = LinkageTree::from_steps(
            3,
            vec![
                LinkageStep { left: 2, right: 0, distance: 1.0, size: 2 },
                LinkageStep { left: 3, right: 1, distance: 2.0, size: 3 },
            ],
        )
        .unwrap();
        let layout = DendrogramLayout::new(&tree).unwrap();
        assert_eq!(layout.leaves, vec![2, 0, 1]);
        assert_eq!(layout.links[0].x, [5.0, 5.0, 15.0, 15.0]);
        assert_eq!(layout.links[1].x, [10.0, 10.0, 25.0, 25.0]);
        assert_eq!(DendrogramLayout::leaf_position(2), 25.0);
    }
}
