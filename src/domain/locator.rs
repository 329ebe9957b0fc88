//! Shape-agnostic search over a [`Forest`]
//!
//! All traversals use an explicit stack so pathological depth cannot exhaust
//! the call stack. Order is pre-order, roots left to right.

use std::sync::Arc;

use tracing::instrument;

use crate::domain::entities::TreeNode;
use crate::domain::forest::Forest;

/// Pre-order iterator over a list of roots.
pub struct PreOrder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> PreOrder<'a> {
    pub fn new(roots: &'a [Arc<TreeNode>]) -> Self {
        Self {
            stack: roots.iter().rev().map(Arc::as_ref).collect(),
        }
    }

    /// Traversal of one subtree, the node itself first.
    pub fn from_node(node: &'a TreeNode) -> Self {
        Self { stack: vec![node] }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in current.children.iter().rev() {
            self.stack.push(child);
        }
        Some(current)
    }
}

/// First node with `id` in pre-order; later duplicates are ignored.
#[instrument(level = "trace", skip(forest))]
pub fn find_by_id<'a>(forest: &'a Forest, id: &str) -> Option<&'a TreeNode> {
    forest.iter().find(|node| node.id == id)
}

/// Every id in pre-order.
pub fn all_ids(forest: &Forest) -> Vec<String> {
    forest.iter().map(|node| node.id.clone()).collect()
}

pub fn contains(forest: &Forest, id: &str) -> bool {
    find_by_id(forest, id).is_some()
}

/// Ids of `node` and all of its descendants, in pre-order.
pub fn subtree_ids(node: &TreeNode) -> Vec<String> {
    PreOrder::from_node(node)
        .map(|n| n.id.clone())
        .collect()
}

/// Ids from the root down to `id`, inclusive.
pub fn path_to(forest: &Forest, id: &str) -> Option<Vec<String>> {
    let path = index_path(forest.roots(), id)?;
    let mut ids = Vec::with_capacity(path.len());
    let mut level = forest.roots();
    for &position in &path {
        let node = &level[position];
        ids.push(node.id.clone());
        level = &node.children;
    }
    Some(ids)
}

/// Child-index path to the first pre-order match: `[root, child, grandchild, ..]`.
pub(crate) fn index_path(roots: &[Arc<TreeNode>], id: &str) -> Option<Vec<usize>> {
    let mut path: Vec<usize> = Vec::new();
    let mut stack: Vec<(&TreeNode, usize, usize)> = roots
        .iter()
        .enumerate()
        .rev()
        .map(|(position, root)| (root.as_ref(), 0, position))
        .collect();

    while let Some((node, depth, position)) = stack.pop() {
        // Everything popped since this node's parent lies deeper, so the
        // prefix up to `depth` is still the ancestor chain.
        path.truncate(depth);
        path.push(position);
        if node.id == id {
            return Some(path);
        }
        for (child_position, child) in node.children.iter().enumerate().rev() {
            stack.push((child.as_ref(), depth + 1, child_position));
        }
    }
    None
}

/// Resolve a path produced by [`index_path`] to the node chain it traverses.
pub(crate) fn nodes_along<'a>(roots: &'a [Arc<TreeNode>], path: &[usize]) -> Vec<&'a Arc<TreeNode>> {
    let mut chain = Vec::with_capacity(path.len());
    let mut level = roots;
    for &position in path {
        let node = &level[position];
        chain.push(node);
        level = &node.children;
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Entity;

    fn node(id: &str) -> TreeNode {
        TreeNode::leaf(Entity::new(id, id))
    }

    //      A          D
    //     / \
    //    B   E
    //    |
    //    C
    fn sample() -> Forest {
        Forest::multiple([
            node("A").with_children([node("B").with_children([node("C")]), node("E")]),
            node("D"),
        ])
    }

    #[test]
    fn given_forest_when_listing_ids_then_pre_order() {
        assert_eq!(all_ids(&sample()), vec!["A", "B", "C", "E", "D"]);
    }

    #[test]
    fn given_nested_id_when_finding_then_returns_node() {
        let forest = sample();
        assert_eq!(find_by_id(&forest, "C").map(|n| n.id.as_str()), Some("C"));
        assert!(find_by_id(&forest, "missing").is_none());
    }

    #[test]
    fn given_duplicate_ids_when_finding_then_first_pre_order_match_wins() {
        let forest = Forest::multiple([
            node("A").with_children([TreeNode::leaf(Entity::new("X", "first"))]),
            TreeNode::leaf(Entity::new("X", "second")),
        ]);
        assert_eq!(find_by_id(&forest, "X").map(|n| n.name.as_str()), Some("first"));
    }

    #[test]
    fn given_nested_id_when_resolving_path_then_returns_ancestor_chain() {
        let forest = sample();
        assert_eq!(path_to(&forest, "C"), Some(vec!["A".into(), "B".into(), "C".into()]));
        assert_eq!(path_to(&forest, "E"), Some(vec!["A".into(), "E".into()]));
        assert_eq!(path_to(&forest, "D"), Some(vec!["D".into()]));
        assert_eq!(path_to(&forest, "Z"), None);
    }

    #[test]
    fn given_index_path_when_resolving_nodes_then_chain_ends_at_target() {
        let forest = sample();
        let path = index_path(forest.roots(), "E").unwrap();
        assert_eq!(path, vec![0, 1]);
        let chain = nodes_along(forest.roots(), &path);
        assert_eq!(chain.last().map(|n| n.id.as_str()), Some("E"));
    }

    #[test]
    fn given_node_when_listing_subtree_then_includes_itself() {
        let forest = sample();
        let a = find_by_id(&forest, "A").unwrap();
        assert_eq!(subtree_ids(a), vec!["A", "B", "C", "E"]);
    }

    #[test]
    fn given_very_deep_chain_when_searching_then_no_stack_overflow() {
        let mut current = node("n0");
        for i in 1..20_000 {
            current = node(&format!("n{i}")).with_children([current]);
        }
        let forest = Forest::single(current);
        assert!(contains(&forest, "n0"));
        assert_eq!(path_to(&forest, "n0").map(|p| p.len()), Some(20_000));
    }
}
