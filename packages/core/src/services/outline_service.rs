//! Outline Service - Forest Ownership and Composed Edit Protocols
//!
//! This module provides the main business layer for outline editing:
//!
//! - expand/collapse with the lazy-load protocol (`toggle`)
//! - node lifecycle (`create_node`, `update_node`, `rename_node`,
//!   `delete_node`)
//! - drag-and-drop re-parenting (`move_node`) with the ancestor veto
//! - change notification over a broadcast channel
//!
//! # Forest ownership
//!
//! The service holds the forest as `RwLock<Arc<Vec<Node>>>`. Readers take a
//! cheap `Arc` snapshot that stays valid and unchanged forever; every
//! mutation builds a new forest through the pure engine in [`crate::tree`]
//! and swaps the `Arc` in one step. No reader can ever observe a partially
//! updated forest, and the lock is never held across an `.await`.
//!
//! # Strictness
//!
//! The engine primitives are lenient (missing id = no-op); this layer is
//! strict. Caller-initiated operations validate existence first and return
//! `OutlineError` on unknown ids, illegal parents, and cyclic moves. The one
//! deliberate exception is the tail of a lazy load: by the time a fetch
//! resolves, the node may have been deleted, and applying the result then is
//! a silent no-op rather than an error.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::{CreateNodeParams, Node, NodePatch};
use crate::services::error::OutlineError;
use crate::services::events::OutlineEvent;
use crate::services::source::ChildSource;
use crate::tree;

/// Broadcast channel capacity for outline events.
///
/// 128 gives bursty edits (scripted imports, rapid drags) headroom while
/// bounding memory. A lagging subscriber loses history only; the current
/// forest is always available via `snapshot()`.
const OUTLINE_EVENT_CHANNEL_CAPACITY: usize = 128;

/// Owner of the current forest value and orchestrator of all edits.
///
/// # Examples
///
/// ```rust
/// use treemap_core::models::{CreateNodeParams, Node};
/// use treemap_core::services::OutlineService;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let service = OutlineService::new(vec![Node::with_id("inbox", "Inbox")])?;
///
/// let id = service.create_node(CreateNodeParams {
///     title: "First task".to_string(),
///     parent_id: Some("inbox".to_string()),
///     ..Default::default()
/// })?;
///
/// assert!(service.get_node(&id).is_some());
/// assert!(service.get_node("inbox").unwrap().is_expanded);
/// # Ok(())
/// # }
/// ```
pub struct OutlineService {
    /// Current forest; mutations swap the `Arc`, snapshots clone it
    forest: RwLock<Arc<Vec<Node>>>,

    /// Lazy child provider, if any
    source: Option<Arc<dyn ChildSource>>,

    /// Change notification fan-out
    events: broadcast::Sender<OutlineEvent>,
}

impl OutlineService {
    /// Create a service owning `initial` as the current forest.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed` if the forest violates the unique-id
    /// invariant or contains malformed nodes. The mutation engine assumes
    /// these invariants; this is the boundary where they are enforced.
    pub fn new(initial: Vec<Node>) -> Result<Self, OutlineError> {
        tree::validate_forest(&initial)?;
        let (events, _) = broadcast::channel(OUTLINE_EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            forest: RwLock::new(Arc::new(initial)),
            source: None,
            events,
        })
    }

    /// Attach the lazy child source used by [`toggle`](Self::toggle).
    #[must_use]
    pub fn with_child_source(mut self, source: Arc<dyn ChildSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// The current forest value.
    ///
    /// The returned snapshot is immutable and remains valid after any number
    /// of subsequent mutations; holders simply see an older value.
    pub fn snapshot(&self) -> Arc<Vec<Node>> {
        self.forest.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Subscribe to change notifications.
    ///
    /// Events describe mutations committed after this call; the receiver
    /// should pair them with `snapshot()` for current state.
    pub fn subscribe(&self) -> broadcast::Receiver<OutlineEvent> {
        self.events.subscribe()
    }

    /// Look up a node by id, cloning it out of the current forest.
    pub fn get_node(&self, id: &str) -> Option<Node> {
        let snapshot = self.snapshot();
        tree::find(&snapshot, id).cloned()
    }

    /// Expand or collapse a node.
    ///
    /// If the node is hinted as expandable, has no children loaded, and a
    /// child source is attached, the first expansion runs the lazy-load
    /// protocol: the node is optimistically shown expanded with
    /// `is_loading` set, the source is awaited, and the result is applied
    /// to whatever forest is current by then. A node deleted mid-fetch
    /// swallows the result (no-op); a node moved mid-fetch still receives
    /// its children, because application is by id.
    ///
    /// A toggle while a fetch is in flight is a no-op; exactly one load is
    /// issued per unloaded node, no matter how often the user clicks.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` for an unknown id; `LoadFailed` when the source
    /// fails. On failure `is_loading` is always cleared; a stuck spinner
    /// state cannot occur.
    pub async fn toggle(&self, id: &str) -> Result<(), OutlineError> {
        let snapshot = self.snapshot();
        let node = tree::find(&snapshot, id).ok_or_else(|| OutlineError::node_not_found(id))?;

        if node.is_loading {
            tracing::debug!("toggle ignored for node '{}': load already in flight", id);
            return Ok(());
        }

        if node.needs_load() {
            if let Some(source) = self.source.clone() {
                return self.expand_with_load(&snapshot, id, source).await;
            }
        }

        let next = tree::patch_node(
            &snapshot,
            id,
            &NodePatch {
                is_expanded: Some(!node.is_expanded),
                ..Default::default()
            },
        );
        self.swap_forest(next);
        self.emit_updated(id);
        Ok(())
    }

    async fn expand_with_load(
        &self,
        snapshot: &[Node],
        id: &str,
        source: Arc<dyn ChildSource>,
    ) -> Result<(), OutlineError> {
        // Optimistically open the node with a spinner while the fetch runs
        let pending = tree::patch_node(
            snapshot,
            id,
            &NodePatch {
                is_loading: Some(true),
                is_expanded: Some(true),
                ..Default::default()
            },
        );
        self.swap_forest(pending);
        self.emit_updated(id);

        tracing::debug!("loading children for node '{}'", id);
        let loaded = source.load_children(id).await;

        // The forest may have changed while the fetch was pending; apply
        // against the current value, not the snapshot from before the await
        let current = self.snapshot();
        match loaded {
            Ok(children) => {
                let count = children.len();
                let with_children = tree::replace_children(&current, id, &children);
                let next = tree::patch_node(
                    &with_children,
                    id,
                    &NodePatch {
                        is_loading: Some(false),
                        ..Default::default()
                    },
                );
                let still_present = tree::find(&current, id).is_some();
                self.swap_forest(next);
                if still_present {
                    tracing::debug!("loaded {} children for node '{}'", count, id);
                    self.emit(OutlineEvent::ChildrenLoaded {
                        id: id.to_string(),
                        count,
                    });
                } else {
                    tracing::debug!("discarding late child load for removed node '{}'", id);
                }
                Ok(())
            }
            Err(err) => {
                // Always resolve the spinner, even on failure
                let next = tree::patch_node(
                    &current,
                    id,
                    &NodePatch {
                        is_loading: Some(false),
                        ..Default::default()
                    },
                );
                self.swap_forest(next);
                tracing::warn!("child load failed for node '{}': {}", id, err);
                Err(OutlineError::load_failed(id, err))
            }
        }
    }

    /// Create a node and insert it into the forest.
    ///
    /// The id comes from `params.id` or a fresh UUID. New nodes start with
    /// an empty, loaded child sequence and collapsed. `params.index`
    /// defaults to appending after the existing siblings; the parent (when
    /// given) is expanded so the new node is immediately visible.
    ///
    /// # Errors
    ///
    /// `DuplicateId` if the id already exists anywhere in the forest (ids
    /// are never reused); `InvalidParent` for an unknown parent;
    /// `ValidationFailed` for a malformed node (empty id).
    pub fn create_node(&self, params: CreateNodeParams) -> Result<String, OutlineError> {
        let snapshot = self.snapshot();

        let id = params.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        if tree::find(&snapshot, &id).is_some() {
            return Err(OutlineError::duplicate_id(id));
        }
        if let Some(parent_id) = &params.parent_id {
            if tree::find(&snapshot, parent_id).is_none() {
                return Err(OutlineError::invalid_parent(parent_id.clone()));
            }
        }

        let mut node = Node::with_id(id.clone(), params.title);
        node.subtitle = params.subtitle;
        node.description = params.description;
        node.children = Some(Vec::new());
        node.validate()?;

        let parent_id = params.parent_id.as_deref();
        let index = params.index.unwrap_or_else(|| match parent_id {
            Some(parent_id) => tree::find(&snapshot, parent_id).map_or(0, Node::child_count),
            None => snapshot.len(),
        });

        let next = tree::insert_at(&snapshot, parent_id, index, node.clone());
        self.swap_forest(next);

        tracing::debug!(
            "created node '{}' under {:?} at index {}",
            id,
            parent_id,
            index
        );
        self.emit(OutlineEvent::NodeCreated(node));
        Ok(id)
    }

    /// Shallow-merge `patch` onto the node matching `id`.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` for an unknown id.
    pub fn update_node(&self, id: &str, patch: NodePatch) -> Result<(), OutlineError> {
        let snapshot = self.snapshot();
        if tree::find(&snapshot, id).is_none() {
            return Err(OutlineError::node_not_found(id));
        }

        let next = tree::patch_node(&snapshot, id, &patch);
        self.swap_forest(next);
        self.emit_updated(id);
        Ok(())
    }

    /// Set a node's title.
    pub fn rename_node(&self, id: &str, title: impl Into<String>) -> Result<(), OutlineError> {
        let title = title.into();
        tracing::debug!("renaming node '{}' to '{}'", id, title);
        self.update_node(
            id,
            NodePatch {
                title: Some(title),
                ..Default::default()
            },
        )
    }

    /// Remove a node and its entire subtree, returning the detached value.
    ///
    /// Every descendant disappears with it; a later `get_node` on any id in
    /// the subtree misses. The removed value owns the subtree, so callers
    /// can still inspect or re-insert it (with fresh ids) if they wish.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` for an unknown id.
    pub fn delete_node(&self, id: &str) -> Result<Node, OutlineError> {
        let snapshot = self.snapshot();
        let (next, removed) = tree::detach(&snapshot, id);
        let removed = removed.ok_or_else(|| OutlineError::node_not_found(id))?;

        self.swap_forest(next);
        tracing::debug!(
            "deleted node '{}' ({} loaded children in subtree root)",
            id,
            removed.child_count()
        );
        self.emit(OutlineEvent::NodeDeleted { id: id.to_string() });
        Ok(removed)
    }

    /// Move a node to a new parent (or the forest root) at `index`.
    ///
    /// The whole check-detach-insert sequence is atomic from the outside:
    /// every validation runs against the original forest before anything is
    /// touched, and a failed check returns with no observable change.
    /// Inserting marks the destination parent expanded, so the moved node
    /// stays visible. An out-of-range `index` clamps (drag index arithmetic
    /// may overshoot by design of the drop zones).
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` - the node does not exist
    /// - `HierarchyViolation` - the destination is the node itself
    /// - `InvalidParent` - the destination parent does not exist
    /// - `CircularReference` - the destination is inside the node's own
    ///   subtree
    pub fn move_node(
        &self,
        id: &str,
        new_parent: Option<&str>,
        index: usize,
    ) -> Result<(), OutlineError> {
        let snapshot = self.snapshot();

        if tree::find(&snapshot, id).is_none() {
            return Err(OutlineError::node_not_found(id));
        }

        if let Some(parent_id) = new_parent {
            if parent_id == id {
                return Err(OutlineError::hierarchy_violation(format!(
                    "node '{}' cannot become its own parent",
                    id
                )));
            }
            if tree::find(&snapshot, parent_id).is_none() {
                return Err(OutlineError::invalid_parent(parent_id));
            }
            // Checked on the original forest, before the detach: a node may
            // not become a child of its own descendant
            if tree::is_ancestor(&snapshot, id, parent_id) {
                return Err(OutlineError::circular_reference(format!(
                    "cannot move node '{}' under its descendant '{}'",
                    id, parent_id
                )));
            }
        }

        let (pruned, removed) = tree::detach(&snapshot, id);
        let Some(removed) = removed else {
            return Err(OutlineError::node_not_found(id));
        };
        let next = tree::insert_at(&pruned, new_parent, index, removed);
        self.swap_forest(next);

        tracing::debug!("moved node '{}' under {:?} at index {}", id, new_parent, index);
        self.emit(OutlineEvent::NodeMoved {
            id: id.to_string(),
            parent_id: new_parent.map(String::from),
            index,
        });
        Ok(())
    }

    fn swap_forest(&self, next: Vec<Node>) {
        *self.forest.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(next);
    }

    fn emit(&self, event: OutlineEvent) {
        // No subscribers is fine; events are fire-and-forget
        let _ = self.events.send(event);
    }

    fn emit_updated(&self, id: &str) {
        if let Some(node) = self.get_node(id) {
            self.emit(OutlineEvent::NodeUpdated(node));
        }
    }
}
