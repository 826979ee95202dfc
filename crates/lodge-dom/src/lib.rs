//! Lodge DOM - Host document model
//!
//! Arena-based document tree that the accessibility core reads and mutates.
//! The host (browser bridge, webview, test harness) mirrors this document;
//! every focus move, scroll request and live-region insertion is recorded in
//! an event journal the host can drain.

mod node;
mod tree;
mod document;
mod dom_events;
mod keyboard;
pub mod query;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Children, Descendants};
pub use document::{Document, ScrollBlock};
pub use dom_events::{DomEvent, DomEventType};
pub use keyboard::{Key, Modifiers, KeyboardEvent, KeyOutcome};
pub use query::TabIndex;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn option(self) -> Option<NodeId> {
        if self.is_valid() { Some(self) } else { None }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#none")
        }
    }
}

/// DOM error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Invalid node: {0}")]
    InvalidNode(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Cannot insert {child} under {parent}: would create a cycle")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
