//! Child Source - Lazy Loading Collaborator
//!
//! A node flagged as expandable may not have its children in memory yet; the
//! first expansion asks a [`ChildSource`] to fetch them. The engine never
//! talks to a source directly; `OutlineService::toggle` owns the protocol
//! (optimistic expand, spinner flag, apply-on-completion).
//!
//! [`StaticChildSource`] is the in-memory implementation used by demos and
//! tests, with optional simulated latency.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Node;

/// Child fetch failure
///
/// The outline service does not interpret the failure; it clears the
/// node's loading flag, logs a warning, and surfaces the error to the
/// caller as `OutlineError::LoadFailed`.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("child source unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous provider of a node's children
///
/// Given a node id, eventually returns the node's children (possibly
/// empty), or fails. Implementations back this with whatever actually holds
/// the data: a remote API, a database, or a fixture map.
#[async_trait]
pub trait ChildSource: Send + Sync {
    async fn load_children(&self, id: &str) -> Result<Vec<Node>, LoadError>;
}

/// Map-backed child source with optional simulated latency
///
/// Unknown ids resolve to an empty child list rather than an error, so a
/// node hinted as expandable but with nothing registered simply loads
/// empty.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use treemap_core::models::Node;
/// use treemap_core::services::StaticChildSource;
///
/// let source = StaticChildSource::new()
///     .with_entry("node-a", vec![Node::with_id("node-b", "B")])
///     .with_latency(Duration::from_millis(500));
/// ```
#[derive(Default)]
pub struct StaticChildSource {
    children: HashMap<String, Vec<Node>>,
    latency: Option<Duration>,
}

impl StaticChildSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the children returned for `id`.
    #[must_use]
    pub fn with_entry(mut self, id: impl Into<String>, children: Vec<Node>) -> Self {
        self.children.insert(id.into(), children);
        self
    }

    /// Delay every load by `latency`, simulating a network round-trip.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[async_trait]
impl ChildSource for StaticChildSource {
    async fn load_children(&self, id: &str) -> Result<Vec<Node>, LoadError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(self.children.get(id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_returns_registered_children() {
        let source =
            StaticChildSource::new().with_entry("a", vec![Node::with_id("b", "B")]);

        let children = source.load_children("a").await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, "b");
    }

    #[tokio::test]
    async fn test_static_source_unknown_id_loads_empty() {
        let source = StaticChildSource::new();
        assert!(source.load_children("ghost").await.unwrap().is_empty());
    }
}
