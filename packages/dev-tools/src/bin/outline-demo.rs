//! Scripted Outline Demo
//!
//! Seeds the sample outline, attaches a child source with simulated
//! latency, and walks through the interactive flows end to end: lazy
//! expansion, dialog-driven creation, inline rename, drag-and-drop with a
//! vetoed attempt, and a cascading delete. The outline is printed after
//! the interesting steps, and every change notification is logged as it
//! arrives.
//!
//! Run with: `cargo run -p treemap-dev-tools --bin outline-demo`

use std::sync::Arc;
use std::time::Duration;

use treemap_core::models::Node;
use treemap_core::services::{OutlineService, StaticChildSource};
use treemap_core::session::EditorSession;

/// One expandable root; everything below it arrives lazily.
fn seed_forest() -> Vec<Node> {
    vec![Node::with_id("node-a", "A")
        .with_subtitle("Level A")
        .with_description("Top-level node")
        .expandable()]
}

/// Two lazy levels behind the root, served with a simulated 500 ms
/// round-trip.
fn seed_source() -> StaticChildSource {
    StaticChildSource::new()
        .with_entry(
            "node-a",
            vec![
                Node::with_id("node-b1", "B")
                    .with_subtitle("Level A")
                    .with_description("Branch for experiments")
                    .expandable(),
                Node::with_id("node-c3", "C")
                    .with_subtitle("Level A")
                    .with_description("Single leaf"),
                Node::with_id("node-b2", "B")
                    .with_subtitle("Level A")
                    .with_description("Another branch"),
            ],
        )
        .with_entry(
            "node-b1",
            vec![
                Node::with_id("node-c1", "C")
                    .with_subtitle("Level A")
                    .with_description("Contains tasks")
                    .expandable(),
                Node::with_id("node-c2", "C")
                    .with_subtitle("Level A")
                    .with_description("Notes bucket")
                    .expandable(),
            ],
        )
        .with_entry(
            "node-c1",
            vec![Node::with_id("node-d", "D")
                .with_subtitle("Level A")
                .with_description("Deep leaf")],
        )
        .with_latency(Duration::from_millis(500))
}

fn print_outline(nodes: &[Node], depth: usize) {
    for node in nodes {
        let marker = if node.is_loading {
            "~"
        } else if node.is_expanded {
            "v"
        } else if node.is_expandable() {
            ">"
        } else {
            "-"
        };
        println!("{}{} {} ({})", "  ".repeat(depth), marker, node.title, node.id);
        if node.is_expanded {
            if let Some(children) = &node.children {
                print_outline(children, depth + 1);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Treemap outline demo");

    let service = Arc::new(
        OutlineService::new(seed_forest())?.with_child_source(Arc::new(seed_source())),
    );

    // Log every change notification as it is committed
    let mut events = service.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::info!("event: {}", event.event_type());
        }
    });

    let mut session = EditorSession::new(service.clone());

    tracing::info!("expanding the lazy chain (each level costs one simulated round-trip)");
    session.toggle("node-a").await?;
    session.toggle("node-b1").await?;
    session.toggle("node-c1").await?;
    print_outline(&service.snapshot(), 0);

    tracing::info!("adding a node under node-c3 via the dialog flow");
    session.open_add_dialog(Some("node-c3"));
    session.set_dialog_title("Fresh leaf");
    session.set_dialog_description("Added by the scripted demo");
    let new_id = session.confirm_add()?.expect("dialog title was not blank");
    tracing::info!("created node '{}'", new_id);

    tracing::info!("renaming node-b2");
    session.begin_rename("node-b2")?;
    session.set_rename_value("B (renamed)");
    session.commit_rename()?;

    tracing::info!("dragging node-b2 onto node-c3 (becomes its last child)");
    session.start_drag("node-b2")?;
    let applied = session.drop_on_node("node-c3")?;
    tracing::info!("drop applied: {}", applied);

    tracing::info!("attempting an illegal drop: node-a into its own subtree");
    session.start_drag("node-a")?;
    let applied = session.drop_on_node("node-d")?;
    tracing::info!("drop applied: {} (vetoed drops leave the outline unchanged)", applied);
    session.cancel_drag();

    tracing::info!("deleting node-b1 and its whole subtree");
    session.delete_node("node-b1")?;
    print_outline(&service.snapshot(), 0);

    tracing::info!("final forest as interchange records:");
    println!("{}", serde_json::to_string_pretty(&*service.snapshot())?);

    Ok(())
}
