//! Node Data Structures
//!
//! This module defines the core `Node` struct used throughout Treemap's
//! outline engine.
//!
//! # Architecture
//!
//! - **Owned forest**: each node owns its `children` vector; a forest is an
//!   ordered `Vec<Node>` of roots
//! - **Absent vs empty**: `children: None` means "not yet loaded",
//!   `Some(vec![])` means "loaded, has none"; the distinction drives lazy
//!   loading and survives serialization
//! - **Record shape**: camelCase field names with absent optionals omitted,
//!   so serialized nodes match the interchange format used at the boundary
//!
//! # Examples
//!
//! ```rust
//! use treemap_core::models::Node;
//!
//! let node = Node::new("Projects")
//!     .with_description("Everything in flight")
//!     .expandable();
//!
//! assert!(!node.id.is_empty());
//! assert!(node.needs_load());
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for Node and forest structure
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Duplicate node id in forest: {0}")]
    DuplicateId(String),
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// A single labeled entry in the outline hierarchy.
///
/// # Fields
///
/// - `id`: opaque unique identifier, stable for the node's lifetime and
///   never reused
/// - `title`: display name
/// - `subtitle`, `description`: optional free-text metadata (the editing
///   session caps descriptions at 100 characters; the engine does not)
/// - `children`: ordered child nodes; `None` means the children are not yet
///   known and a lazy load may be pending
/// - `has_children`: expandability hint, set when children exist but have
///   not been fetched yet
/// - `is_expanded`: visibility flag for rendering collaborators; has no
///   effect on data validity
/// - `is_loading`: transient flag held while an asynchronous child fetch is
///   in flight
///
/// # Examples
///
/// ```rust
/// # use treemap_core::models::Node;
/// // Leaf with a deterministic id (fixtures, seed data)
/// let leaf = Node::with_id("node-d", "D").with_description("Deep leaf");
///
/// // Branch whose children are already known
/// let branch = Node::new("Branch").with_children(vec![leaf]);
/// assert_eq!(branch.child_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier (UUID v4 unless supplied by the caller)
    pub id: String,

    /// Display name
    pub title: String,

    /// Optional secondary label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Optional free-text annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ordered children; `None` = not yet loaded, `Some(vec![])` = loaded
    /// and empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,

    /// Expandability hint used before children are fetched
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_children: bool,

    /// Whether rendering collaborators should show this node's children
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_expanded: bool,

    /// Set while an asynchronous child fetch is pending
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_loading: bool,
}

impl Node {
    /// Create a new node with an auto-generated UUID id.
    ///
    /// The node starts as an unloaded leaf: no children, no hints, all flags
    /// cleared.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use treemap_core::models::Node;
    /// let a = Node::new("A");
    /// let b = Node::new("B");
    /// assert_ne!(a.id, b.id);
    /// ```
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title)
    }

    /// Create a new node with a caller-provided id.
    ///
    /// Deterministic ids are useful for fixtures and seed data; uniqueness
    /// across the forest remains the caller's responsibility.
    pub fn with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            description: None,
            children: None,
            has_children: false,
            is_expanded: false,
            is_loading: false,
        }
    }

    /// Set the secondary label.
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the free-text annotation.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the child sequence (marks the children as loaded).
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = Some(children);
        self
    }

    /// Append a child, materializing an empty sequence first if needed.
    #[must_use]
    pub fn child(mut self, node: Node) -> Self {
        self.children.get_or_insert_with(Vec::new).push(node);
        self
    }

    /// Flag the node as expandable before its children are fetched.
    #[must_use]
    pub fn expandable(mut self) -> Self {
        self.has_children = true;
        self
    }

    /// Set the expansion flag.
    #[must_use]
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.is_expanded = expanded;
        self
    }

    /// Number of loaded children (0 when children are not yet loaded).
    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, Vec::len)
    }

    /// Whether a lazy load is required before this node can show children:
    /// it is flagged expandable but its children are still unknown.
    pub fn needs_load(&self) -> bool {
        self.has_children && self.children.is_none()
    }

    /// Whether the node can be toggled open at all, either because children
    /// are hinted or because loaded children exist.
    pub fn is_expandable(&self) -> bool {
        self.has_children || self.child_count() > 0
    }

    /// Validate node structure.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` if `id` is empty. Titles may
    /// be blank; interactive collaborators substitute a placeholder on
    /// commit instead.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }
        Ok(())
    }
}

/// Deserialize a double-`Option` field: a field that is present but `null`
/// becomes `Some(None)` (clear), while a missing field stays `None` (leave
/// unchanged) via `#[serde(default)]`.
fn deserialize_optional_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

/// Partial node update for patch operations.
///
/// All fields are optional; only provided fields are merged onto the target
/// node. `children` is deliberately absent; children replacement is a
/// separate operation with its own semantics (see
/// [`tree::replace_children`](crate::tree::replace_children)).
///
/// # Double-Option Pattern for Nullable Fields
///
/// `subtitle` and `description` use a double-`Option` to distinguish three
/// states:
///
/// - `None`: leave the field unchanged
/// - `Some(None)`: clear the field
/// - `Some(Some(v))`: set the field to `v`
///
/// # Examples
///
/// ```rust
/// # use treemap_core::models::NodePatch;
/// // Rename only
/// let rename = NodePatch {
///     title: Some("New title".to_string()),
///     ..Default::default()
/// };
///
/// // Clear the description, leave everything else alone
/// let clear = NodePatch {
///     description: Some(None),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    /// Update the display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Update or clear the secondary label
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub subtitle: Option<Option<String>>,

    /// Update or clear the annotation
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub description: Option<Option<String>>,

    /// Update the expandability hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_children: Option<bool>,

    /// Update the expansion flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_expanded: Option<bool>,

    /// Update the load-in-flight flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_loading: Option<bool>,
}

impl NodePatch {
    /// Shallow-merge this patch onto a node.
    pub fn apply(&self, node: &mut Node) {
        if let Some(title) = &self.title {
            node.title = title.clone();
        }
        if let Some(subtitle) = &self.subtitle {
            node.subtitle = subtitle.clone();
        }
        if let Some(description) = &self.description {
            node.description = description.clone();
        }
        if let Some(has_children) = self.has_children {
            node.has_children = has_children;
        }
        if let Some(is_expanded) = self.is_expanded {
            node.is_expanded = is_expanded;
        }
        if let Some(is_loading) = self.is_loading {
            node.is_loading = is_loading;
        }
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
