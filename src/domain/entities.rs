//! Domain entities: organizational units and the tree nodes that carry them

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Review state attached to every entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Approved")]
    Approved,
    #[serde(alias = "Rejected")]
    Rejected,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// One organizational unit.
///
/// Only the fields the workflow reads are typed. Address, contact, registration,
/// currency and trading-limit fields pass through `attributes` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Presentation tag such as "Level 1"; never used for structure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Informational only; nesting defines the real parent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: ApprovalStatus) -> Self {
        self.approval_status = status;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Node of an entity hierarchy.
///
/// Children are shared `Arc`s: snapshots produced by the mutator reuse every
/// subtree they did not touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub data: Entity,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<Arc<TreeNode>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Arc<TreeNode>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Arc<TreeNode>>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TreeNode {
    /// Node without children; id and name are mirrored from the entity.
    pub fn leaf(data: Entity) -> Self {
        Self {
            id: data.id.clone(),
            name: data.name.clone(),
            data,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = TreeNode>) -> Self {
        self.children = children.into_iter().map(Arc::new).collect();
        self
    }

    pub fn status(&self) -> ApprovalStatus {
        self.data.approval_status
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Copy of this node with a different status; children are shared, not cloned.
    pub fn with_status(&self, status: ApprovalStatus) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            data: self.data.clone().with_status(status),
            children: self.children.clone(),
        }
    }
}

impl Drop for TreeNode {
    /// Releases uniquely owned descendants through a work stack so that
    /// freeing a deep chain does not recurse once per level.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            // Shared subtrees still belong to another snapshot
            if let Ok(mut owned) = Arc::try_unwrap(child) {
                pending.append(&mut owned.children);
            }
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({})", self.name, self.id, self.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_missing_status_when_deserializing_then_defaults_to_pending() {
        let entity: Entity = serde_json::from_value(json!({"id": "e1", "name": "Treasury"})).unwrap();
        assert_eq!(entity.approval_status, ApprovalStatus::Pending);
    }

    #[test]
    fn given_capitalized_status_when_deserializing_then_accepts_alias() {
        let entity: Entity =
            serde_json::from_value(json!({"id": "e1", "approvalStatus": "Rejected"})).unwrap();
        assert_eq!(entity.approval_status, ApprovalStatus::Rejected);
    }

    #[test]
    fn given_descriptive_fields_when_round_tripping_then_attributes_are_preserved() {
        let wire = json!({
            "id": "e1",
            "name": "Treasury",
            "level": "Level 1",
            "parentName": "Group",
            "approvalStatus": "approved",
            "currency": "EUR",
            "tradingLimit": 2500000,
            "address": {"city": "Frankfurt"}
        });
        let entity: Entity = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(entity.attributes.get("currency"), Some(&json!("EUR")));
        assert_eq!(entity.parent_name.as_deref(), Some("Group"));
        assert_eq!(serde_json::to_value(&entity).unwrap(), wire);
    }

    #[test]
    fn given_null_children_when_deserializing_then_node_is_leaf() {
        let node: TreeNode = serde_json::from_value(json!({
            "id": "A", "name": "A", "data": {"id": "A"}, "children": null
        }))
        .unwrap();
        assert!(node.is_leaf());
    }

    #[test]
    fn given_node_when_changing_status_then_children_are_shared() {
        let node = TreeNode::leaf(Entity::new("A", "A"))
            .with_children([TreeNode::leaf(Entity::new("B", "B"))]);
        let changed = node.with_status(ApprovalStatus::Approved);
        assert_eq!(changed.status(), ApprovalStatus::Approved);
        assert_eq!(node.status(), ApprovalStatus::Pending);
        assert!(Arc::ptr_eq(&node.children[0], &changed.children[0]));
    }

    #[test]
    fn given_very_deep_chain_when_dropped_then_no_stack_overflow() {
        let mut current = TreeNode::leaf(Entity::new("n0", "n0"));
        for i in 1..200_000 {
            current = TreeNode::leaf(Entity::new(format!("n{i}"), "link")).with_children([current]);
        }
        drop(current);
    }

    #[test]
    fn given_shared_subtree_when_one_owner_dropped_then_other_keeps_it() {
        let node = TreeNode::leaf(Entity::new("A", "A")).with_children([
            TreeNode::leaf(Entity::new("B", "B")).with_children([TreeNode::leaf(Entity::new("C", "C"))]),
        ]);
        let changed = node.with_status(ApprovalStatus::Approved);
        drop(node);
        assert_eq!(changed.children[0].id, "B");
        assert_eq!(changed.children[0].children[0].id, "C");
    }
}
