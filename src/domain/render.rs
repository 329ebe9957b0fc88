/*
Text rendering of hierarchies for logs and diagnostics.

A trait keeps the call sites uniform: `node.to_tree_string()` and
`forest.to_tree_string()` both produce a termtree::Tree that prints as an
indented outline.
 */
use termtree::Tree;

use crate::domain::entities::TreeNode;
use crate::domain::forest::{Forest, RootShape};

pub trait TreeRender {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeRender for TreeNode {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(self.to_string()).with_leaves(leaves)
    }
}

impl TreeRender for Forest {
    fn to_tree_string(&self) -> Tree<String> {
        match (self.shape(), self.roots()) {
            (RootShape::Single, [root]) => root.to_tree_string(),
            (_, []) => Tree::new("Empty forest".to_string()),
            (_, roots) => {
                let leaves: Vec<_> = roots.iter().map(|r| r.to_tree_string()).collect();
                Tree::new(format!("Forest ({} roots)", roots.len())).with_leaves(leaves)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ApprovalStatus, Entity};

    #[test]
    fn given_forest_when_rendering_then_lists_every_node_with_status() {
        let forest = Forest::multiple([
            TreeNode::leaf(Entity::new("A", "Holding"))
                .with_children([TreeNode::leaf(Entity::new("B", "Subsidiary"))]),
            TreeNode::leaf(Entity::new("C", "Branch").with_status(ApprovalStatus::Approved)),
        ]);
        let rendered = forest.to_tree_string().to_string();

        assert!(rendered.starts_with("Forest (2 roots)"), "{rendered}");
        assert!(rendered.contains("Holding [A] (pending)"));
        assert!(rendered.contains("Subsidiary [B] (pending)"));
        assert!(rendered.contains("Branch [C] (approved)"));
    }

    #[test]
    fn given_empty_forest_when_rendering_then_placeholder() {
        let rendered = Forest::multiple(Vec::new()).to_tree_string().to_string();
        assert!(rendered.starts_with("Empty forest"));
    }
}
