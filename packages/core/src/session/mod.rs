//! Editor Session - Interactive State Record
//!
//! The engine and service are stateless with respect to *interaction*:
//! selection, an inline rename in progress, an active drag, the add-node
//! dialog. `EditorSession` models that state as one explicit record that a
//! rendering collaborator reads and drives, keeping it entirely outside the
//! engine.
//!
//! Each flow here corresponds to a user gesture on the outline: opening the
//! add dialog and confirming it, double-clicking a title to rename,
//! dragging a row onto a drop zone. The session composes them into
//! [`OutlineService`] calls and owns the small policy decisions that belong
//! to the editing surface, not the engine: the 100-character description
//! cap, the `"Untitled"` fallback for blank renames, and keeping a drag
//! alive when its drop is vetoed.

use std::sync::Arc;

use crate::models::{CreateNodeParams, Node};
use crate::services::{OutlineError, OutlineService};
use crate::tree;

/// Maximum description length accepted by the add-node dialog, in
/// characters. Enforced here, not by the engine.
pub const MAX_DESCRIPTION_LEN: usize = 100;

/// State of the add-node dialog while it is open.
#[derive(Debug, Clone, PartialEq)]
pub struct AddDialog {
    /// Where the confirmed node will be inserted (`None` = forest root)
    pub parent_id: Option<String>,
    pub title_input: String,
    pub description_input: String,
}

/// State of an inline rename while it is active.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameState {
    pub id: String,
    pub value: String,
}

/// Interaction state for one editing surface over an outline.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use treemap_core::models::Node;
/// use treemap_core::services::OutlineService;
/// use treemap_core::session::EditorSession;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let service = Arc::new(OutlineService::new(vec![Node::with_id("a", "A")])?);
/// let mut session = EditorSession::new(service);
///
/// session.open_add_dialog(Some("a"));
/// session.set_dialog_title("New child");
/// let id = session.confirm_add()?.expect("node created");
/// # let _ = id;
/// # Ok(())
/// # }
/// ```
pub struct EditorSession {
    service: Arc<OutlineService>,
    selected_id: Option<String>,
    rename: Option<RenameState>,
    dragging_id: Option<String>,
    dialog: Option<AddDialog>,
}

impl EditorSession {
    pub fn new(service: Arc<OutlineService>) -> Self {
        Self {
            service,
            selected_id: None,
            rename: None,
            dragging_id: None,
            dialog: None,
        }
    }

    /// The underlying outline service.
    pub fn service(&self) -> &Arc<OutlineService> {
        &self.service
    }

    // --- selection -------------------------------------------------------

    pub fn select(&mut self, id: Option<String>) {
        self.selected_id = id;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Expand/collapse passthrough (see `OutlineService::toggle`).
    pub async fn toggle(&self, id: &str) -> Result<(), OutlineError> {
        self.service.toggle(id).await
    }

    // --- add-node dialog -------------------------------------------------

    /// Open the add dialog targeting `parent_id` (`None` = forest root).
    pub fn open_add_dialog(&mut self, parent_id: Option<&str>) {
        self.dialog = Some(AddDialog {
            parent_id: parent_id.map(String::from),
            title_input: String::new(),
            description_input: String::new(),
        });
    }

    pub fn dialog(&self) -> Option<&AddDialog> {
        self.dialog.as_ref()
    }

    pub fn set_dialog_title(&mut self, value: impl Into<String>) {
        if let Some(dialog) = &mut self.dialog {
            dialog.title_input = value.into();
        }
    }

    /// Update the dialog's description input, truncated to
    /// [`MAX_DESCRIPTION_LEN`] characters.
    pub fn set_dialog_description(&mut self, value: impl Into<String>) {
        if let Some(dialog) = &mut self.dialog {
            let value: String = value.into();
            dialog.description_input = value.chars().take(MAX_DESCRIPTION_LEN).collect();
        }
    }

    /// Confirm the dialog, creating the node.
    ///
    /// A blank (or whitespace-only) title closes the dialog without
    /// creating anything, mirroring a cancel, and returns `Ok(None)`. On
    /// success returns the new node's id. The new node appends after its
    /// siblings and the parent is expanded to show it.
    pub fn confirm_add(&mut self) -> Result<Option<String>, OutlineError> {
        let Some(dialog) = self.dialog.take() else {
            return Ok(None);
        };

        let title = dialog.title_input.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let description = dialog.description_input.trim();
        let description =
            (!description.is_empty()).then(|| description.chars().take(MAX_DESCRIPTION_LEN).collect());

        let id = self.service.create_node(CreateNodeParams {
            title: title.to_string(),
            description,
            parent_id: dialog.parent_id,
            ..Default::default()
        })?;
        Ok(Some(id))
    }

    pub fn cancel_dialog(&mut self) {
        self.dialog = None;
    }

    // --- inline rename ---------------------------------------------------

    /// Start renaming `id`, seeding the input with the current title.
    pub fn begin_rename(&mut self, id: &str) -> Result<(), OutlineError> {
        let node = self
            .service
            .get_node(id)
            .ok_or_else(|| OutlineError::node_not_found(id))?;
        self.rename = Some(RenameState {
            id: id.to_string(),
            value: node.title,
        });
        Ok(())
    }

    pub fn rename_state(&self) -> Option<&RenameState> {
        self.rename.as_ref()
    }

    pub fn set_rename_value(&mut self, value: impl Into<String>) {
        if let Some(rename) = &mut self.rename {
            rename.value = value.into();
        }
    }

    /// Commit the rename in progress. An empty input commits as
    /// `"Untitled"`; a node never ends up with no visible name.
    pub fn commit_rename(&mut self) -> Result<(), OutlineError> {
        let Some(rename) = self.rename.take() else {
            return Ok(());
        };
        let title = if rename.value.is_empty() {
            "Untitled".to_string()
        } else {
            rename.value
        };
        self.service.rename_node(&rename.id, title)
    }

    pub fn cancel_rename(&mut self) {
        self.rename = None;
    }

    // --- drag and drop ---------------------------------------------------

    /// Begin dragging `id`.
    pub fn start_drag(&mut self, id: &str) -> Result<(), OutlineError> {
        if self.service.get_node(id).is_none() {
            return Err(OutlineError::node_not_found(id));
        }
        self.dragging_id = Some(id.to_string());
        Ok(())
    }

    pub fn dragging_id(&self) -> Option<&str> {
        self.dragging_id.as_deref()
    }

    pub fn cancel_drag(&mut self) {
        self.dragging_id = None;
    }

    /// Drop the dragged node into `parent_id` at `index`.
    ///
    /// Returns `Ok(true)` when the move was applied (and the drag ends),
    /// `Ok(false)` when there is no active drag or the move was vetoed
    /// (self-parent or into the node's own subtree); a vetoed drop leaves
    /// both the forest and the drag untouched, so the user can retry on a
    /// legal target. Other failures (unknown destination) propagate.
    pub fn drop_at(&mut self, parent_id: Option<&str>, index: usize) -> Result<bool, OutlineError> {
        let Some(dragging_id) = self.dragging_id.clone() else {
            return Ok(false);
        };

        match self.service.move_node(&dragging_id, parent_id, index) {
            Ok(()) => {
                self.dragging_id = None;
                Ok(true)
            }
            Err(OutlineError::HierarchyViolation(_))
            | Err(OutlineError::CircularReference { .. }) => {
                tracing::debug!(
                    "drop of '{}' onto {:?} vetoed, drag stays active",
                    dragging_id,
                    parent_id
                );
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Drop the dragged node directly onto a row: it becomes the target's
    /// last child.
    pub fn drop_on_node(&mut self, id: &str) -> Result<bool, OutlineError> {
        let count = self.service.get_node(id).map_or(0, |node| node.child_count());
        self.drop_at(Some(id), count)
    }

    // --- deletion --------------------------------------------------------

    /// Delete a node and its subtree, clearing any interaction state that
    /// pointed into it.
    pub fn delete_node(&mut self, id: &str) -> Result<Node, OutlineError> {
        let removed = self.service.delete_node(id)?;
        let removed_slice = std::slice::from_ref(&removed);

        if self
            .selected_id
            .as_deref()
            .is_some_and(|sel| tree::find(removed_slice, sel).is_some())
        {
            self.selected_id = None;
        }
        if self
            .rename
            .as_ref()
            .is_some_and(|r| tree::find(removed_slice, &r.id).is_some())
        {
            self.rename = None;
        }
        if self
            .dragging_id
            .as_deref()
            .is_some_and(|d| tree::find(removed_slice, d).is_some())
        {
            self.dragging_id = None;
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    /// Fixture: A -> (B -> (C), E), F
    fn session() -> EditorSession {
        let forest = vec![
            Node::with_id("a", "A")
                .child(Node::with_id("b", "B").child(Node::with_id("c", "C")))
                .child(Node::with_id("e", "E")),
            Node::with_id("f", "F"),
        ];
        EditorSession::new(Arc::new(OutlineService::new(forest).unwrap()))
    }

    #[test]
    fn test_add_dialog_flow() {
        let mut session = session();

        session.open_add_dialog(Some("b"));
        session.set_dialog_title("  New node  ");
        session.set_dialog_description("notes");

        let id = session.confirm_add().unwrap().expect("created");
        assert!(session.dialog().is_none());

        let created = session.service().get_node(&id).unwrap();
        assert_eq!(created.title, "New node");
        assert_eq!(created.description.as_deref(), Some("notes"));
        // The parent opened up to show the new child
        assert!(session.service().get_node("b").unwrap().is_expanded);
    }

    #[test]
    fn test_dialog_description_is_capped() {
        let mut session = session();
        session.open_add_dialog(None);
        session.set_dialog_title("Long note");
        session.set_dialog_description("x".repeat(500));

        assert_eq!(
            session.dialog().unwrap().description_input.chars().count(),
            MAX_DESCRIPTION_LEN
        );

        let id = session.confirm_add().unwrap().unwrap();
        let created = session.service().get_node(&id).unwrap();
        assert_eq!(
            created.description.unwrap().chars().count(),
            MAX_DESCRIPTION_LEN
        );
    }

    #[test]
    fn test_blank_title_closes_dialog_without_creating() {
        let mut session = session();
        let before = session.service().snapshot();

        session.open_add_dialog(None);
        session.set_dialog_title("   ");
        let created = session.confirm_add().unwrap();

        assert!(created.is_none());
        assert!(session.dialog().is_none());
        assert_eq!(*session.service().snapshot(), *before);
    }

    #[test]
    fn test_rename_flow() {
        let mut session = session();

        session.begin_rename("f").unwrap();
        assert_eq!(session.rename_state().unwrap().value, "F");

        session.set_rename_value("F sharp");
        session.commit_rename().unwrap();

        assert_eq!(session.service().get_node("f").unwrap().title, "F sharp");
        assert!(session.rename_state().is_none());
    }

    #[test]
    fn test_blank_rename_commits_as_untitled() {
        let mut session = session();

        session.begin_rename("f").unwrap();
        session.set_rename_value("");
        session.commit_rename().unwrap();

        assert_eq!(session.service().get_node("f").unwrap().title, "Untitled");
    }

    #[test]
    fn test_drop_without_drag_is_ignored() {
        let mut session = session();
        assert!(!session.drop_at(None, 0).unwrap());
    }

    #[test]
    fn test_vetoed_drop_keeps_drag_and_forest() {
        let mut session = session();
        let before = session.service().snapshot();

        session.start_drag("a").unwrap();
        // "c" is inside "a"'s subtree
        assert!(!session.drop_at(Some("c"), 0).unwrap());
        // And a row cannot be dropped onto itself
        assert!(!session.drop_on_node("a").unwrap());

        assert_eq!(session.dragging_id(), Some("a"));
        assert_eq!(*session.service().snapshot(), *before);
    }

    #[test]
    fn test_drop_reparents_and_ends_drag() {
        let mut session = session();

        session.start_drag("f").unwrap();
        assert!(session.drop_on_node("e").unwrap());

        assert!(session.dragging_id().is_none());
        let e = session.service().get_node("e").unwrap();
        assert_eq!(e.children.as_ref().unwrap().last().unwrap().id, "f");
    }

    #[test]
    fn test_delete_clears_stale_interaction_state() {
        let mut session = session();

        session.select(Some("c".to_string()));
        session.start_drag("c").unwrap();

        session.delete_node("b").unwrap();

        assert!(session.selected_id().is_none());
        assert!(session.dragging_id().is_none());
        assert!(session.service().get_node("c").is_none());
    }
}
