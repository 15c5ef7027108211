//! Tree Mutation Engine
//!
//! Pure, structure-preserving operations over an ordered forest of
//! [`Node`]s. Every operation takes the current forest by reference and
//! returns a freshly built forest; the input is never mutated, so any
//! snapshot a collaborator holds stays valid indefinitely.
//!
//! # Contract
//!
//! - Operations are total: a missing id is a structural no-op, never an
//!   error. Callers wanting strict validation run [`find`] first and branch
//!   (the service layer does exactly that).
//! - Unchanged branches are carried over by clone. Interactive outlines are
//!   small; a flat id-keyed arena would amortize the copies if that ever
//!   stops being true.
//! - Well-formed input is a precondition: globally unique ids and no cycles.
//!   The primitives do not detect or repair violations; [`validate_forest`]
//!   exists for boundary checks.
//!
//! # Examples
//!
//! ```rust
//! use treemap_core::models::Node;
//! use treemap_core::tree;
//!
//! let forest = vec![Node::with_id("a", "A").child(Node::with_id("b", "B"))];
//!
//! let (pruned, removed) = tree::detach(&forest, "b");
//! assert_eq!(removed.unwrap().id, "b");
//! assert_eq!(tree::find(&pruned, "b"), None);
//! // The original forest is untouched
//! assert!(tree::find(&forest, "b").is_some());
//! ```

use std::collections::HashSet;

use crate::models::{Node, NodePatch, ValidationError};

/// Find a node by id, depth-first pre-order across the forest.
///
/// Returns the first match; with the unique-id invariant intact there is at
/// most one.
pub fn find<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = &node.children {
            if let Some(found) = find(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Return a new forest with `patch` shallow-merged onto the node matching
/// `id`.
///
/// All other nodes are carried over unchanged. If no node matches, the
/// result is structurally equal to the input. Recursion descends into
/// `children` only when they are present; unloaded subtrees are never
/// materialized.
pub fn patch_node(nodes: &[Node], id: &str, patch: &NodePatch) -> Vec<Node> {
    nodes
        .iter()
        .map(|node| {
            if node.id == id {
                let mut patched = node.clone();
                patch.apply(&mut patched);
                patched
            } else if let Some(children) = &node.children {
                let mut next = node.clone();
                next.children = Some(patch_node(children, id, patch));
                next
            } else {
                node.clone()
            }
        })
        .collect()
}

/// Return a new forest where the node matching `id` has its children fully
/// replaced with `new_children` (and thereby marked as loaded).
///
/// No-op if the id is not found. That makes a late lazy-load completion
/// harmless: if the node was deleted while the fetch was in flight the
/// result lands nowhere, and if it was moved the lookup still finds it by
/// id.
pub fn replace_children(nodes: &[Node], id: &str, new_children: &[Node]) -> Vec<Node> {
    nodes
        .iter()
        .map(|node| {
            if node.id == id {
                let mut next = node.clone();
                next.children = Some(new_children.to_vec());
                next
            } else if let Some(children) = &node.children {
                let mut next = node.clone();
                next.children = Some(replace_children(children, id, new_children));
                next
            } else {
                node.clone()
            }
        })
        .collect()
}

/// Return a new forest with `new_node` inserted at `index` under
/// `parent_id`, or into the root sequence when `parent_id` is `None`.
///
/// An out-of-range `index` clamps to the sequence length; drag/drop index
/// arithmetic can momentarily overshoot and must not be fatal. Inserting
/// under a parent treats absent children as empty and sets the parent
/// `is_expanded = true` so the new child is immediately visible.
///
/// A `parent_id` that matches no node is a silent no-op here; the new node
/// is dropped. `OutlineService::create_node` validates the parent first and
/// fails loudly instead.
pub fn insert_at(nodes: &[Node], parent_id: Option<&str>, index: usize, new_node: Node) -> Vec<Node> {
    match parent_id {
        None => {
            let mut next = nodes.to_vec();
            let index = index.min(next.len());
            next.insert(index, new_node);
            next
        }
        Some(parent_id) => insert_under(nodes, parent_id, index, &new_node),
    }
}

fn insert_under(nodes: &[Node], parent_id: &str, index: usize, new_node: &Node) -> Vec<Node> {
    nodes
        .iter()
        .map(|node| {
            if node.id == parent_id {
                let mut children = node.children.clone().unwrap_or_default();
                let index = index.min(children.len());
                children.insert(index, new_node.clone());
                let mut next = node.clone();
                next.children = Some(children);
                next.is_expanded = true;
                next
            } else if let Some(children) = &node.children {
                let mut next = node.clone();
                next.children = Some(insert_under(children, parent_id, index, new_node));
                next
            } else {
                node.clone()
            }
        })
        .collect()
}

/// Excise the first node matching `id` from wherever it lives and return it
/// alongside the pruned forest.
///
/// The removed value owns its entire subtree. Returns `(unchanged, None)`
/// when the id is absent. Only the first match in depth-first order is
/// removed; under a violated unique-id invariant that is defensive
/// behavior, not a guaranteed policy.
pub fn detach(nodes: &[Node], id: &str) -> (Vec<Node>, Option<Node>) {
    let mut next = Vec::with_capacity(nodes.len());
    let mut removed = None;

    for node in nodes {
        if removed.is_none() {
            if node.id == id {
                removed = Some(node.clone());
                continue;
            }
            if let Some(children) = &node.children {
                let (pruned, inner) = detach(children, id);
                if inner.is_some() {
                    removed = inner;
                    let mut kept = node.clone();
                    kept.children = Some(pruned);
                    next.push(kept);
                    continue;
                }
            }
        }
        next.push(node.clone());
    }

    (next, removed)
}

/// True iff `candidate_id` appears anywhere strictly inside the subtree
/// rooted at `ancestor_id`.
///
/// The ancestor itself does not count as its own descendant. Returns false
/// when `ancestor_id` does not exist or has no loaded children. Used to veto
/// moves that would make a node a child of its own descendant.
pub fn is_ancestor(nodes: &[Node], ancestor_id: &str, candidate_id: &str) -> bool {
    let Some(ancestor) = find(nodes, ancestor_id) else {
        return false;
    };
    let Some(children) = &ancestor.children else {
        return false;
    };
    subtree_contains(children, candidate_id)
}

fn subtree_contains(nodes: &[Node], id: &str) -> bool {
    nodes.iter().any(|node| {
        node.id == id
            || node
                .children
                .as_ref()
                .is_some_and(|children| subtree_contains(children, id))
    })
}

/// Set `is_expanded = true` on the node matching `id`; identity when `id`
/// is `None`. Idempotent.
pub fn ensure_expanded(nodes: &[Node], id: Option<&str>) -> Vec<Node> {
    match id {
        Some(id) => patch_node(
            nodes,
            id,
            &NodePatch {
                is_expanded: Some(true),
                ..Default::default()
            },
        ),
        None => nodes.to_vec(),
    }
}

/// Check the forest-wide invariants: every node is well-formed and ids are
/// globally unique at every depth.
///
/// The mutation primitives assume this holds and never call it themselves;
/// it is a boundary check for freshly constructed or deserialized forests.
pub fn validate_forest(nodes: &[Node]) -> Result<(), ValidationError> {
    fn walk<'a>(nodes: &'a [Node], seen: &mut HashSet<&'a str>) -> Result<(), ValidationError> {
        for node in nodes {
            node.validate()?;
            if !seen.insert(node.id.as_str()) {
                return Err(ValidationError::DuplicateId(node.id.clone()));
            }
            if let Some(children) = &node.children {
                walk(children, seen)?;
            }
        }
        Ok(())
    }

    let mut seen = HashSet::new();
    walk(nodes, &mut seen)
}
