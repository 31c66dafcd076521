//! Node identifiers.
//!
//! Identifiers are opaque strings assigned by whoever creates a node (the
//! source parser, the rendering surface, or the built-in demo content). They
//! are compared by value and never interpreted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of a [`DiagramNode`](crate::node::DiagramNode).
///
/// # Examples
///
/// ```
/// use mindmark_core::identifier::NodeId;
///
/// let id = NodeId::new("root");
/// assert_eq!(id, "root");
/// assert_eq!(id.to_string(), "root");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a `NodeId` from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
