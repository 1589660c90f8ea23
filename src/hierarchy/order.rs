//! Dendrogram leaf ordering.
//!
//! Expansion starts at the root merge. An internal cluster expands its
//! `left` child completely before its `right` child, exactly as recorded in
//! the step; nothing is re-sorted by size or height. Leaves are emitted as
//! they are reached. This is the conventional left-to-right leaf sequence of
//! a drawn dendrogram.
//!
//! The walk uses an explicit stack: single linkage on chained data produces
//! trees as deep as they are wide.

use super::dendrogram::{ClusterId, LinkageTree};
use crate::error::{Error, Result};

/// Result of one structural walk over a tree.
#[derive(Debug, Clone)]
pub(crate) struct Walk {
    /// Leaves in dendrogram order.
    pub leaves: Vec<usize>,
    /// Step indices, children before parents.
    pub post_order: Vec<usize>,
}

/// Left-to-right leaf order of `tree`: a permutation of `0..n`.
///
/// Fails with [`Error::CorruptTree`] if a step references an id outside the
/// tree or a cluster not created by an earlier step, if a cluster is
/// reachable twice (a cycle or shared child), or if
/// some merges are not reachable from the root.
pub fn leaf_order(tree: &LinkageTree) -> Result<Vec<usize>> {
    tree.leaf_order()
}

pub(crate) fn walk(tree: &LinkageTree) -> Result<Walk> {
    walk_inner(tree).inspect_err(|e| {
        tracing::error!(n_items = tree.n_items(), error = %e, "linkage tree failed validation");
    })
}

fn walk_inner(tree: &LinkageTree) -> Result<Walk> {
    let n = tree.n_items();
    let n_steps = tree.n_steps();

    let Some(root) = tree.root() else {
        return Ok(Walk {
            leaves: Vec::new(),
            post_order: Vec::new(),
        });
    };
    if n_steps + 1 != n {
        return Err(Error::corrupt_tree(format!(
            "{n} items need {} merge steps, got {n_steps}",
            n - 1
        )));
    }

    let steps = tree.steps();
    let mut seen = vec![false; n + n_steps];
    let mut leaves = Vec::with_capacity(n);
    let mut post_order = Vec::with_capacity(n_steps);

    // (id, children already pushed)
    let mut stack: Vec<(usize, bool)> = vec![(root, false)];
    while let Some((id, expanded)) = stack.pop() {
        match tree.resolve(id)? {
            ClusterId::Internal(k) if expanded => post_order.push(k),
            ClusterId::Internal(k) => {
                visit(&mut seen, id)?;
                let step = &steps[k];
                for child in [step.left, step.right] {
                    if let ClusterId::Internal(c) = tree.resolve(child)? {
                        if c >= k {
                            return Err(Error::corrupt_tree(format!(
                                "step {k} merges cluster {child}, which is created by step {c}"
                            )));
                        }
                    }
                }
                stack.push((id, true));
                stack.push((step.right, false));
                stack.push((step.left, false));
            }
            ClusterId::Leaf(i) => {
                visit(&mut seen, id)?;
                leaves.push(i);
            }
        }
    }

    if leaves.len() != n {
        return Err(Error::corrupt_tree(format!(
            "root reaches {} of {n} leaves",
            leaves.len()
        )));
    }

    Ok(Walk { leaves, post_order })
}

fn visit(seen: &mut [bool], id: usize) -> Result<()> {
    if std::mem::replace(&mut seen[id], true) {
        return Err(Error::corrupt_tree(format!("cluster {id} reached twice")));
    }
    Ok(())
}
