//! Treemap Core - Outline Engine
//!
//! This crate provides the data model, pure tree mutation engine, and edit
//! orchestration for the Treemap interactive outline.
//!
//! # Architecture
//!
//! - **Immutable forest values**: the outline is an ordered `Vec<Node>` of
//!   roots; every mutation produces a new forest and the old one stays
//!   valid, so collaborators can hold snapshots freely
//! - **Pure engine, strict service**: the [`tree`] primitives are total
//!   functions (missing id = no-op); [`services::OutlineService`] validates
//!   first and fails loudly, and owns the composed protocols (lazy-load
//!   toggle, ancestor-vetoed moves)
//! - **Interaction state stays outside**: [`session::EditorSession`] holds
//!   selection, rename, drag, and dialog state so the engine remains
//!   stateless and reentrant
//!
//! # Modules
//!
//! - [`models`] - Data structures (`Node`, `NodePatch`, `CreateNodeParams`)
//! - [`tree`] - Pure mutation engine over the forest
//! - [`services`] - `OutlineService`, lazy `ChildSource`, events, errors
//! - [`session`] - `EditorSession` interaction state record

pub mod models;
pub mod services;
pub mod session;
pub mod tree;

// Re-export commonly used types
pub use models::*;
pub use services::*;
pub use session::{AddDialog, EditorSession, RenameState, MAX_DESCRIPTION_LEN};
