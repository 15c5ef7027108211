//! Performance benchmarks for Treemap core operations
//!
//! Run with: `cargo bench -p treemap-core`
//!
//! These benchmarks measure the engine's critical paths on a generated
//! forest: deep lookup, patch, detach/insert round-trips, and the ancestor
//! check that gates every drop.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use treemap_core::models::{Node, NodePatch};
use treemap_core::tree;

/// Build a node with `breadth` children per level, `depth` levels deep.
/// Ids encode the path, so they are unique by construction.
fn build_node(id: String, breadth: usize, depth: usize) -> Node {
    let node = Node::with_id(id.clone(), format!("Node {}", id)).expanded(true);
    if depth == 0 {
        return node;
    }
    let children = (0..breadth)
        .map(|i| build_node(format!("{}-{}", id, i), breadth, depth - 1))
        .collect();
    node.with_children(children)
}

fn generate_forest(roots: usize, breadth: usize, depth: usize) -> Vec<Node> {
    (0..roots)
        .map(|i| build_node(format!("r{}", i), breadth, depth))
        .collect()
}

fn deepest_id(root: &str, breadth_digit: usize, depth: usize) -> String {
    let mut id = root.to_string();
    for _ in 0..depth {
        id.push_str(&format!("-{}", breadth_digit));
    }
    id
}

fn bench_find(c: &mut Criterion) {
    // 4 roots * 4^5 leaves, worst-case target in the last root
    let forest = generate_forest(4, 4, 5);
    let target = deepest_id("r3", 3, 5);

    c.bench_function("find_deep_node", |b| {
        b.iter(|| tree::find(black_box(&forest), black_box(&target)))
    });
}

fn bench_patch(c: &mut Criterion) {
    let forest = generate_forest(4, 4, 5);
    let target = deepest_id("r3", 3, 5);
    let patch = NodePatch {
        title: Some("patched".to_string()),
        ..Default::default()
    };

    c.bench_function("patch_deep_node", |b| {
        b.iter(|| tree::patch_node(black_box(&forest), black_box(&target), black_box(&patch)))
    });
}

fn bench_detach_insert(c: &mut Criterion) {
    let forest = generate_forest(4, 4, 5);
    let target = deepest_id("r0", 0, 3);

    c.bench_function("detach_then_insert", |b| {
        b.iter(|| {
            let (pruned, removed) = tree::detach(black_box(&forest), black_box(&target));
            tree::insert_at(&pruned, Some("r3"), 0, removed.unwrap())
        })
    });
}

fn bench_is_ancestor(c: &mut Criterion) {
    let forest = generate_forest(4, 4, 5);
    let candidate = deepest_id("r0", 3, 5);

    c.bench_function("is_ancestor_full_subtree", |b| {
        b.iter(|| tree::is_ancestor(black_box(&forest), black_box("r0"), black_box(&candidate)))
    });
}

criterion_group!(
    benches,
    bench_find,
    bench_patch,
    bench_detach_insert,
    bench_is_ancestor
);
criterion_main!(benches);
