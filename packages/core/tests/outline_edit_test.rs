//! Integration Tests for the Full Editing Session
//!
//! Walks the outline through the complete interactive lifecycle: lazy
//! expansion chain, dialog-driven creation, rename, drag-and-drop with the
//! ancestor veto, cascading delete. Checks the forest invariants hold
//! at every step.

use std::sync::Arc;

use treemap_core::models::Node;
use treemap_core::services::{OutlineEvent, OutlineService, StaticChildSource};
use treemap_core::session::EditorSession;
use treemap_core::tree;

/// The sample outline: one root hinted as expandable, with two lazy levels
/// behind it.
fn seed_forest() -> Vec<Node> {
    vec![Node::with_id("node-a", "A")
        .with_subtitle("Level A")
        .with_description("Top-level node")
        .expandable()]
}

fn seed_source() -> StaticChildSource {
    StaticChildSource::new()
        .with_entry(
            "node-a",
            vec![
                Node::with_id("node-b1", "B")
                    .with_description("Branch for experiments")
                    .expandable(),
                Node::with_id("node-c3", "C").with_description("Single leaf"),
                Node::with_id("node-b2", "B").with_description("Another branch"),
            ],
        )
        .with_entry(
            "node-b1",
            vec![
                Node::with_id("node-c1", "C")
                    .with_description("Contains tasks")
                    .expandable(),
                Node::with_id("node-c2", "C")
                    .with_description("Notes bucket")
                    .expandable(),
            ],
        )
        .with_entry(
            "node-c1",
            vec![Node::with_id("node-d", "D").with_description("Deep leaf")],
        )
}

fn test_service() -> Arc<OutlineService> {
    Arc::new(
        OutlineService::new(seed_forest())
            .unwrap()
            .with_child_source(Arc::new(seed_source())),
    )
}

#[tokio::test]
async fn test_lazy_expansion_chain() {
    let service = test_service();

    // 1. Expand the root; its children arrive from the source
    service.toggle("node-a").await.unwrap();
    let a = service.get_node("node-a").unwrap();
    assert!(a.is_expanded);
    assert!(!a.is_loading);
    assert_eq!(a.child_count(), 3);

    // 2. Walk down the lazy chain
    service.toggle("node-b1").await.unwrap();
    service.toggle("node-c1").await.unwrap();
    assert_eq!(service.get_node("node-d").unwrap().title, "D");

    // 3. A hinted node whose load finds nothing ends up loaded-empty
    service.toggle("node-c2").await.unwrap();
    let c2 = service.get_node("node-c2").unwrap();
    assert_eq!(c2.children.as_deref(), Some(&[][..]));

    // 4. Invariants hold across every load
    assert!(tree::validate_forest(&service.snapshot()).is_ok());
}

#[tokio::test]
async fn test_full_editing_session() {
    let service = test_service();
    let mut events = service.subscribe();
    let mut session = EditorSession::new(service.clone());

    // 1. Open the outline down to the leaves
    session.toggle("node-a").await.unwrap();
    session.toggle("node-b1").await.unwrap();
    session.toggle("node-c1").await.unwrap();

    // 2. Create a node under the single leaf via the dialog flow
    session.open_add_dialog(Some("node-c3"));
    session.set_dialog_title("Fresh leaf");
    session.set_dialog_description("Added mid-session");
    let new_id = session.confirm_add().unwrap().expect("title was present");
    assert!(service.get_node("node-c3").unwrap().is_expanded);

    // 3. Rename a sibling
    session.begin_rename("node-b2").unwrap();
    session.set_rename_value("B (renamed)");
    session.commit_rename().unwrap();
    assert_eq!(service.get_node("node-b2").unwrap().title, "B (renamed)");

    // 4. Drag it under the leaf we just extended
    session.start_drag("node-b2").unwrap();
    assert!(session.drop_on_node("node-c3").unwrap());
    let c3 = service.get_node("node-c3").unwrap();
    let child_ids: Vec<&str> = c3
        .children
        .as_ref()
        .unwrap()
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(child_ids, vec![new_id.as_str(), "node-b2"]);

    // 5. An illegal drag (root into its own subtree) changes nothing
    let before = service.snapshot();
    session.start_drag("node-a").unwrap();
    assert!(!session.drop_on_node("node-d").unwrap());
    assert_eq!(*service.snapshot(), *before);
    session.cancel_drag();

    // 6. Delete a whole branch; every descendant goes with it
    session.delete_node("node-b1").unwrap();
    for gone in ["node-b1", "node-c1", "node-c2", "node-d"] {
        assert!(service.get_node(gone).is_none(), "{} should be gone", gone);
    }
    assert!(service.get_node("node-c3").is_some());

    // 7. The event stream saw every committed mutation, in order
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event.event_type().to_string());
    }
    let created = seen.iter().filter(|t| *t == "node:created").count();
    let loaded = seen.iter().filter(|t| *t == "children:loaded").count();
    assert_eq!(created, 1);
    assert_eq!(loaded, 3);
    assert_eq!(seen.last().map(String::as_str), Some("node:deleted"));

    // 8. And the forest is still well-formed
    assert!(tree::validate_forest(&service.snapshot()).is_ok());
}

#[tokio::test]
async fn test_moved_node_keeps_identity_across_sessions() {
    let service = test_service();
    service.toggle("node-a").await.unwrap();

    // Snapshots taken before a move keep showing the old arrangement
    let before = service.snapshot();
    service.move_node("node-b2", Some("node-c3"), 0).unwrap();

    let a_before = tree::find(&before, "node-a").unwrap();
    assert_eq!(a_before.child_count(), 3);

    let after = service.snapshot();
    let a_after = tree::find(&after, "node-a").unwrap();
    assert_eq!(a_after.child_count(), 2);
    assert!(tree::is_ancestor(&after, "node-c3", "node-b2"));
}

#[tokio::test]
async fn test_events_include_move_payload() {
    let service = test_service();
    service.toggle("node-a").await.unwrap();

    let mut events = service.subscribe();
    service.move_node("node-b2", Some("node-c3"), 0).unwrap();

    match events.try_recv().unwrap() {
        OutlineEvent::NodeMoved {
            id,
            parent_id,
            index,
        } => {
            assert_eq!(id, "node-b2");
            assert_eq!(parent_id.as_deref(), Some("node-c3"));
            assert_eq!(index, 0);
        }
        other => panic!("unexpected event: {}", other.event_type()),
    }
}
