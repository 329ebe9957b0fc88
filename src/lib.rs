//! Organizational entity hierarchy
//!
//! Immutable tree snapshots of business entities with a cascading approval
//! workflow, plus the per-view selection and expansion state that must stay
//! consistent as snapshots are replaced.
//!
//! - [`domain`]: node model, locator, mutator, expansion tracker
//! - [`application`]: the [`HierarchyController`](application::HierarchyController) and its services
//! - [`infrastructure`]: HTTP hierarchy service, file-backed snapshot store, wiring
//! - [`config`]: layered settings

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod util;
