//! Service Layer Error Types
//!
//! This module defines error types for service-layer operations. The tree
//! engine itself never fails (its primitives are total functions), so
//! everything here reports a *caller* mistake (unknown id, illegal move)
//! or a collaborator failure (child source).

use crate::models::ValidationError;
use crate::services::source::LoadError;
use thiserror::Error;

/// Outline operation errors
///
/// The engine primitives treat a missing id as a silent no-op; the service
/// layer resolves that ambiguity in favor of explicit failure, validating
/// first and returning one of these.
#[derive(Error, Debug)]
pub enum OutlineError {
    /// Node not found by ID
    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    /// Validation failed for node or forest
    #[error("Node validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Invalid parent reference
    #[error("Invalid parent node: {parent_id}")]
    InvalidParent { parent_id: String },

    /// Circular reference detected (move into own descendant)
    #[error("Circular reference detected: {context}")]
    CircularReference { context: String },

    /// Node hierarchy constraint violation
    #[error("Hierarchy constraint violated: {0}")]
    HierarchyViolation(String),

    /// Id already present in the forest
    #[error("Duplicate node id: {id}")]
    DuplicateId { id: String },

    /// Asynchronous child load failed
    #[error("Child load failed for node {id}: {source}")]
    LoadFailed { id: String, source: LoadError },
}

impl OutlineError {
    /// Create a node not found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Create an invalid parent error
    pub fn invalid_parent(parent_id: impl Into<String>) -> Self {
        Self::InvalidParent {
            parent_id: parent_id.into(),
        }
    }

    /// Create a circular reference error
    pub fn circular_reference(context: impl Into<String>) -> Self {
        Self::CircularReference {
            context: context.into(),
        }
    }

    /// Create a hierarchy violation error
    pub fn hierarchy_violation(msg: impl Into<String>) -> Self {
        Self::HierarchyViolation(msg.into())
    }

    /// Create a duplicate id error
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create a load failed error
    pub fn load_failed(id: impl Into<String>, source: LoadError) -> Self {
        Self::LoadFailed {
            id: id.into(),
            source,
        }
    }
}
