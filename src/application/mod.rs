//! Application layer: services and the hierarchy controller
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod controller;
pub mod error;
pub mod error_ext;
pub mod services;

pub use controller::{HierarchyController, LoadOutcome, LoadTicket};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::TransportResultExt;
