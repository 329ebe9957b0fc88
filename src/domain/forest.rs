//! Forest: the single internal shape for entity hierarchies
//!
//! The hierarchy service answers with either one root node or an array of root
//! nodes. Both are normalized into a [`Forest`] at the boundary; every locate and
//! mutate operation is written once against its root list. The original shape
//! is remembered so it can be written back losslessly.

use std::sync::Arc;

use itertools::Itertools;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::domain::entities::TreeNode;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::locator::PreOrder;

/// Wire shape of a hierarchy payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootShape {
    /// A single root object
    Single,
    /// An array of root objects
    Multiple,
}

/// Immutable hierarchy snapshot.
///
/// `Single` forests always hold exactly one root. `Multiple` forests may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    shape: RootShape,
    roots: Vec<Arc<TreeNode>>,
}

impl From<TreeNode> for Forest {
    fn from(root: TreeNode) -> Self {
        Self::single(root)
    }
}

impl From<Vec<TreeNode>> for Forest {
    fn from(roots: Vec<TreeNode>) -> Self {
        Self::multiple(roots)
    }
}

impl Forest {
    pub fn single(root: TreeNode) -> Self {
        Self {
            shape: RootShape::Single,
            roots: vec![Arc::new(root)],
        }
    }

    pub fn multiple(roots: impl IntoIterator<Item = TreeNode>) -> Self {
        Self {
            shape: RootShape::Multiple,
            roots: roots.into_iter().map(Arc::new).collect(),
        }
    }

    pub(crate) fn from_parts(shape: RootShape, roots: Vec<Arc<TreeNode>>) -> Self {
        debug_assert!(shape == RootShape::Multiple || roots.len() == 1);
        Self { shape, roots }
    }

    pub fn shape(&self) -> RootShape {
        self.shape
    }

    pub fn roots(&self) -> &[Arc<TreeNode>] {
        &self.roots
    }

    pub fn root_ids(&self) -> Vec<String> {
        self.roots.iter().map(|root| root.id.clone()).collect()
    }

    /// Pre-order traversal over every root and all descendants.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder::new(&self.roots)
    }

    /// Number of nodes at every depth.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of levels in the deepest tree, 0 for an empty forest.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&TreeNode, usize)> =
            self.roots.iter().map(|root| (root.as_ref(), 1)).collect();

        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in &node.children {
                stack.push((child.as_ref(), depth + 1));
            }
        }
        max_depth
    }

    /// True when both forests are the same snapshot (root-for-root pointer identity).
    ///
    /// Mutations that hit no node return a forest for which this holds.
    pub fn same_snapshot(&self, other: &Forest) -> bool {
        self.shape == other.shape
            && self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(&other.roots)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }

    /// Ids occurring more than once, in order of their first repetition.
    pub fn duplicate_ids(&self) -> Vec<String> {
        self.iter()
            .map(|node| node.id.as_str())
            .duplicates()
            .map(str::to_string)
            .collect()
    }

    /// Parse a hierarchy payload: a node object or an array of node objects.
    pub fn from_json_value(value: Value) -> DomainResult<Self> {
        let forest = match value {
            Value::Object(_) => {
                let root: TreeNode = serde_json::from_value(value)
                    .map_err(|e| DomainError::malformed(format!("root node: {e}")))?;
                Self::single(root)
            }
            Value::Array(items) => {
                let mut roots = Vec::with_capacity(items.len());
                for (position, item) in items.into_iter().enumerate() {
                    if !item.is_object() {
                        return Err(DomainError::malformed(format!(
                            "root {position} is {}, expected a node object",
                            json_kind(&item)
                        )));
                    }
                    let root: TreeNode = serde_json::from_value(item)
                        .map_err(|e| DomainError::malformed(format!("root {position}: {e}")))?;
                    roots.push(root);
                }
                Self::multiple(roots)
            }
            other => {
                return Err(DomainError::malformed(format!(
                    "expected a node or an array of nodes, got {}",
                    json_kind(&other)
                )))
            }
        };

        if let Some(node) = forest.iter().find(|node| node.id.trim().is_empty()) {
            return Err(DomainError::malformed(format!(
                "node '{}' has an empty id",
                node.name
            )));
        }
        Ok(forest)
    }

    pub fn from_json_str(payload: &str) -> DomainResult<Self> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| DomainError::malformed(format!("invalid JSON: {e}")))?;
        Self::from_json_value(value)
    }

    /// Encode in the original wire shape.
    pub fn to_json_value(&self) -> DomainResult<Value> {
        serde_json::to_value(self).map_err(|e| DomainError::Encoding {
            reason: e.to_string(),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for Forest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (self.shape, self.roots.as_slice()) {
            (RootShape::Single, [root]) => root.serialize(serializer),
            _ => self.roots.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Forest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json_value(value).map_err(D::Error::custom)
    }
}
