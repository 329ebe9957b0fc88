//! Domain layer: entity hierarchy model and pure tree algorithms
//!
//! This layer is independent of external concerns (no I/O, no HTTP, no config loading).

pub mod entities;
pub mod error;
pub mod expansion;
pub mod forest;
pub mod locator;
pub mod mutator;
pub mod render;

pub use entities::{ApprovalStatus, Entity, TreeNode};
pub use error::{DomainError, DomainResult};
pub use expansion::{ExpansionState, ExpansionTracker};
pub use forest::{Forest, RootShape};
pub use locator::{all_ids, contains, find_by_id, path_to, subtree_ids, PreOrder};
pub use mutator::{approve_all, delete_subtree, set_approval_status};
pub use render::TreeRender;
