//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (HierarchyService, KeyValueStore)
//! but are themselves concrete structs, not traits.

mod cache;
mod sync;

pub use cache::{CachedSnapshot, SnapshotCache};
pub use sync::HierarchySync;
