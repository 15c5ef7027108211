//! Node creation parameters.

use serde::{Deserialize, Serialize};

/// Parameters for creating a node
///
/// This struct is used by `OutlineService::create_node()` to encapsulate all
/// parameters needed for node creation.
///
/// # ID Generation Strategy
///
/// The `id` field supports two scenarios:
///
/// 1. **Caller-provided id**: interactive frontends pre-generate ids so they
///    can track the node optimistically before the creation round-trips.
///    A provided id that already exists in the forest is rejected with
///    `OutlineError::DuplicateId`; ids are never reused.
/// 2. **Auto-generated UUID**: when `id` is `None` the service assigns a
///    fresh UUID v4.
///
/// # Examples
///
/// ```rust
/// use treemap_core::models::CreateNodeParams;
///
/// // Append a root node with an auto-generated id
/// let params = CreateNodeParams {
///     title: "Inbox".to_string(),
///     ..Default::default()
/// };
///
/// // Insert as the first child of an existing parent
/// let child = CreateNodeParams {
///     title: "First step".to_string(),
///     parent_id: Some("parent-123".to_string()),
///     index: Some(0),
///     ..Default::default()
/// };
/// # let _ = (params, child);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNodeParams {
    /// Optional id for the node. If `None`, a UUID v4 is assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name of the new node
    pub title: String,

    /// Optional secondary label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Optional annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional parent node id (`None` = insert at the forest root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Optional insertion position among the siblings (`None` = append;
    /// out-of-range values clamp to the end)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}
