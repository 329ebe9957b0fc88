//! Tests for the warm-start snapshot cache

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use entity_hierarchy::application::services::SnapshotCache;
use entity_hierarchy::domain::{set_approval_status, ApprovalStatus, Entity, Forest, RootShape, TreeNode};
use entity_hierarchy::infrastructure::store::FileKeyValueStore;
use entity_hierarchy::infrastructure::traits::{KeyValueStore, RealFileSystem};

fn store(dir: &TempDir) -> Arc<FileKeyValueStore> {
    Arc::new(FileKeyValueStore::new(dir.path(), Arc::new(RealFileSystem)))
}

fn forest() -> Forest {
    Forest::single(
        TreeNode::leaf(Entity::new("A", "Holding").with_attribute("currency", "USD"))
            .with_children([TreeNode::leaf(Entity::new("B", "Subsidiary"))]),
    )
}

#[test]
fn given_saved_snapshot_when_loading_then_tree_and_shape_restored() {
    let dir = TempDir::new().unwrap();
    let cache = SnapshotCache::new(store(&dir), "hierarchy");
    let original = set_approval_status(&forest(), "B", ApprovalStatus::Rejected);

    cache.save(&original).unwrap();
    let restored = cache.load().expect("cached snapshot");

    assert_eq!(restored.tree, original);
    assert_eq!(restored.tree.shape(), RootShape::Single);
}

#[test]
fn given_saved_snapshot_when_reading_raw_then_wire_shape_is_stored() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let cache = SnapshotCache::new(store.clone(), "hierarchy");
    cache.save(&Forest::multiple([TreeNode::leaf(Entity::new("A", "A"))])).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&store.get("hierarchy").unwrap().unwrap()).unwrap();
    assert!(raw.get("savedAt").is_some());
    assert_eq!(raw["tree"][0]["id"], json!("A"));
}

#[test]
fn given_corrupt_entry_when_loading_then_treated_as_miss() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    store.set("hierarchy", "{not json").unwrap();

    let cache = SnapshotCache::new(store, "hierarchy");
    assert!(cache.load().is_none());
}

#[test]
fn given_entry_with_malformed_tree_when_loading_then_treated_as_miss() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    store
        .set("hierarchy", r#"{"savedAt": "2026-01-01T00:00:00Z", "tree": "oops"}"#)
        .unwrap();

    assert!(SnapshotCache::new(store, "hierarchy").load().is_none());
}

#[test]
fn given_saved_snapshot_when_cleared_then_miss() {
    let dir = TempDir::new().unwrap();
    let cache = SnapshotCache::new(store(&dir), "hierarchy");
    cache.save(&forest()).unwrap();
    cache.clear().unwrap();
    assert!(cache.load().is_none());
}
