//! Linkage trees and what is derived from them.
//!
//! Agglomerative clustering records its merge history as a [`LinkageTree`]:
//!
//! ```text
//!         6 (height=1.0)
//!        / \
//!       4   5 (height=0.7)
//!      / \ / \
//!     0  1 2  3 (leaves)
//! ```
//!
//! From a tree this module derives:
//!
//! - [`leaf_order`]: the left-to-right leaf permutation used to reorder a
//!   heatmap axis
//! - [`DendrogramLayout`]: link coordinates for drawing the tree
//! - flat clusters via [`LinkageTree::cut_to_k`] and
//!   [`LinkageTree::cut_at_distance`]
//!
//! Trees produced by [`crate::cluster::cluster`] are always well formed. Trees
//! assembled by hand with [`LinkageTree::from_steps`] are checked on every
//! walk and rejected with [`crate::Error::CorruptTree`].

mod dendrogram;
mod layout;
mod order;

pub use dendrogram::{ClusterId, LinkageStep, LinkageTree};
pub use layout::{DendrogramLayout, DendrogramLink, LEAF_SPACING};
pub use order::leaf_order;
