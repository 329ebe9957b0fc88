//! Pure tree transformations
//!
//! Every operation takes a snapshot and returns a new one. Nodes on the path
//! from a root to the changed node are rebuilt; every other subtree is the same
//! `Arc` as in the input. An id that is not present makes the operation a no-op
//! returning a snapshot for which [`Forest::same_snapshot`] holds.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::entities::{ApprovalStatus, Entity, TreeNode};
use crate::domain::forest::{Forest, RootShape};
use crate::domain::locator::{index_path, nodes_along};

/// Remove the node `id` and its whole subtree.
///
/// Returns `None` when the only root of a single-root forest is removed. A
/// multi-root forest stays `Some`, possibly with no roots left.
#[instrument(level = "debug", skip(forest))]
pub fn delete_subtree(forest: &Forest, id: &str) -> Option<Forest> {
    let Some(path) = index_path(forest.roots(), id) else {
        debug!("delete_subtree: {} not present, nothing to do", id);
        return Some(forest.clone());
    };

    if path.len() == 1 && forest.shape() == RootShape::Single {
        debug!("delete_subtree: removed the single root {}", id);
        return None;
    }

    let roots = replace_along(forest.roots(), &path, None);
    Some(Forest::from_parts(forest.shape(), roots))
}

/// Set the review status of node `id`.
///
/// Rejection cascades: the node and every descendant end up rejected in the
/// returned snapshot. Any other status touches only the node itself.
#[instrument(level = "debug", skip(forest))]
pub fn set_approval_status(forest: &Forest, id: &str, status: ApprovalStatus) -> Forest {
    let Some(path) = index_path(forest.roots(), id) else {
        debug!("set_approval_status: {} not present, nothing to do", id);
        return forest.clone();
    };

    let target = match nodes_along(forest.roots(), &path).last() {
        Some(&node) => Arc::clone(node),
        None => return forest.clone(),
    };

    let replacement = match status {
        ApprovalStatus::Rejected => rewrite_subtree(&target, |entity| {
            (entity.approval_status != ApprovalStatus::Rejected)
                .then(|| entity.clone().with_status(ApprovalStatus::Rejected))
        }),
        _ if target.status() == status => Arc::clone(&target),
        _ => Arc::new(target.with_status(status)),
    };

    if Arc::ptr_eq(&replacement, &target) {
        return forest.clone();
    }

    let roots = replace_along(forest.roots(), &path, Some(replacement));
    Forest::from_parts(forest.shape(), roots)
}

/// Approve every node at every depth, overriding rejections.
#[instrument(level = "debug", skip(forest))]
pub fn approve_all(forest: &Forest) -> Forest {
    let roots = forest
        .roots()
        .iter()
        .map(|root| {
            rewrite_subtree(root, |entity| {
                (entity.approval_status != ApprovalStatus::Approved)
                    .then(|| entity.clone().with_status(ApprovalStatus::Approved))
            })
        })
        .collect();
    Forest::from_parts(forest.shape(), roots)
}

/// Rebuild the nodes on `path` bottom-up, substituting (or dropping) its last node.
fn replace_along(
    roots: &[Arc<TreeNode>],
    path: &[usize],
    replacement: Option<Arc<TreeNode>>,
) -> Vec<Arc<TreeNode>> {
    let chain = nodes_along(roots, path);
    let mut current = replacement;

    // chain[depth] is the parent of the node at path[depth + 1]
    for depth in (0..chain.len().saturating_sub(1)).rev() {
        let mut parent = TreeNode::clone(chain[depth]);
        splice(&mut parent.children, path[depth + 1], current);
        current = Some(Arc::new(parent));
    }

    let mut new_roots = roots.to_vec();
    if let Some(&position) = path.first() {
        splice(&mut new_roots, position, current);
    }
    new_roots
}

fn splice(siblings: &mut Vec<Arc<TreeNode>>, position: usize, node: Option<Arc<TreeNode>>) {
    match node {
        Some(node) => siblings[position] = node,
        None => {
            siblings.remove(position);
        }
    }
}

/// Post-order rebuild of a subtree with an explicit stack.
///
/// `change` returns `Some(entity)` for nodes whose payload must change. A node
/// with unchanged payload and unchanged children keeps its original `Arc`.
fn rewrite_subtree<F>(root: &Arc<TreeNode>, change: F) -> Arc<TreeNode>
where
    F: Fn(&Entity) -> Option<Entity>,
{
    let mut stack: Vec<(&Arc<TreeNode>, bool)> = vec![(root, false)];
    let mut finished: Vec<Arc<TreeNode>> = Vec::new();

    while let Some((node, visited)) = stack.pop() {
        if !visited {
            stack.push((node, true));
            for child in node.children.iter().rev() {
                stack.push((child, false));
            }
            continue;
        }

        let children = finished.split_off(finished.len() - node.children.len());
        let data = change(&node.data);
        let children_shared = children
            .iter()
            .zip(&node.children)
            .all(|(new, old)| Arc::ptr_eq(new, old));

        if data.is_none() && children_shared {
            finished.push(Arc::clone(node));
        } else {
            finished.push(Arc::new(TreeNode {
                id: node.id.clone(),
                name: node.name.clone(),
                data: data.unwrap_or_else(|| node.data.clone()),
                children,
            }));
        }
    }

    finished.pop().unwrap_or_else(|| Arc::clone(root))
}
