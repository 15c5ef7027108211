//! Business Services
//!
//! This module contains the outline engine's service layer:
//!
//! - `OutlineService` - forest ownership, composed edit protocols, change
//!   notification
//! - `ChildSource` / `StaticChildSource` - lazy child loading collaborator
//! - `OutlineEvent` - change notifications
//! - `OutlineError` - service-layer failures
//!
//! Services coordinate between the pure mutation engine in [`crate::tree`]
//! and interactive collaborators, enforcing the invariants the engine only
//! assumes.

pub mod error;
pub mod events;
pub mod outline_service;
pub mod source;

pub use error::OutlineError;
pub use events::OutlineEvent;
pub use outline_service::OutlineService;
pub use source::{ChildSource, LoadError, StaticChildSource};
