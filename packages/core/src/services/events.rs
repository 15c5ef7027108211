//! Outline Change Events
//!
//! Events emitted by [`OutlineService`](crate::services::OutlineService)
//! after every successful mutation, following the observer pattern:
//! rendering or persistence collaborators subscribe without coupling to the
//! service internals.
//!
//! Delivery uses tokio's broadcast channel; subscribers receive events
//! asynchronously, and a lagging subscriber only loses history, never the
//! current forest (which it can always re-read via
//! `OutlineService::snapshot`).

use crate::models::Node;

/// Change notifications emitted by the outline service
///
/// Each event describes one committed mutation. The forest value the event
/// refers to is already swapped in when the event is delivered.
#[derive(Debug, Clone)]
pub enum OutlineEvent {
    /// A new node was created
    NodeCreated(Node),

    /// An existing node's fields changed (rename, flags, metadata)
    NodeUpdated(Node),

    /// A node and its whole subtree were removed
    NodeDeleted { id: String },

    /// A node was re-parented or re-ordered
    NodeMoved {
        id: String,
        parent_id: Option<String>,
        index: usize,
    },

    /// A lazy child fetch resolved and the children were attached
    ChildrenLoaded { id: String, count: usize },
}

impl OutlineEvent {
    /// Get a string representation of the event type, for logging and
    /// debugging consumers.
    pub fn event_type(&self) -> &str {
        match self {
            OutlineEvent::NodeCreated(_) => "node:created",
            OutlineEvent::NodeUpdated(_) => "node:updated",
            OutlineEvent::NodeDeleted { .. } => "node:deleted",
            OutlineEvent::NodeMoved { .. } => "node:moved",
            OutlineEvent::ChildrenLoaded { .. } => "children:loaded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_tags() {
        let event = OutlineEvent::NodeDeleted {
            id: "x".to_string(),
        };
        assert_eq!(event.event_type(), "node:deleted");

        let event = OutlineEvent::ChildrenLoaded {
            id: "x".to_string(),
            count: 3,
        };
        assert_eq!(event.event_type(), "children:loaded");
    }
}
