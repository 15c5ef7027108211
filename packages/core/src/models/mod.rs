//! Data Models
//!
//! This module contains the core data structures used throughout Treemap:
//!
//! - `Node` - a single outline entry, owning its ordered children
//! - `NodePatch` - partial update applied by the patch operation
//! - `CreateNodeParams` - parameters for node creation
//!
//! A forest is an ordered `Vec<Node>` of roots; all structural operations on
//! it live in [`crate::tree`].

mod node;
mod params;

pub use node::{Node, NodePatch, ValidationError};
pub use params::CreateNodeParams;
