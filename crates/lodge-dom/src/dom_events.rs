//! DOM Events
//!
//! Journal entries describing what the core did to the document. The host
//! drains them to mirror focus moves, scroll requests and live-region edits.

use std::time::Duration;

use crate::NodeId;

/// DOM event types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEventType {
    /// Element received focus
    Focus,
    /// Element lost focus
    Blur,
    /// Element was activated (click)
    Click,
    /// Element was scrolled into view
    ScrollIntoView,
    /// Node inserted under a parent
    NodeInserted,
    /// Node removed from its parent
    NodeRemoved,
    /// Attribute changed (class toggles included)
    AttrModified,
}

/// DOM event
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    pub event_type: DomEventType,
    pub target: NodeId,
    pub related_node: Option<NodeId>,
    pub attr_name: Option<String>,
    pub prev_value: Option<String>,
    pub new_value: Option<String>,
    /// Document timeline position
    pub timestamp: Duration,
}

impl DomEvent {
    fn new(event_type: DomEventType, target: NodeId, timestamp: Duration) -> Self {
        Self {
            event_type,
            target,
            related_node: None,
            attr_name: None,
            prev_value: None,
            new_value: None,
            timestamp,
        }
    }

    /// Create focus event; `related` is the element losing focus
    pub fn focus(target: NodeId, related: Option<NodeId>, timestamp: Duration) -> Self {
        Self { related_node: related, ..Self::new(DomEventType::Focus, target, timestamp) }
    }

    /// Create blur event; `related` is the element gaining focus
    pub fn blur(target: NodeId, related: Option<NodeId>, timestamp: Duration) -> Self {
        Self { related_node: related, ..Self::new(DomEventType::Blur, target, timestamp) }
    }

    /// Create click event
    pub fn click(target: NodeId, timestamp: Duration) -> Self {
        Self::new(DomEventType::Click, target, timestamp)
    }

    /// Create scroll-into-view event; `block` is the alignment keyword
    pub fn scroll_into_view(target: NodeId, block: &str, timestamp: Duration) -> Self {
        Self { new_value: Some(block.to_string()), ..Self::new(DomEventType::ScrollIntoView, target, timestamp) }
    }

    /// Create node inserted event
    pub fn node_inserted(target: NodeId, parent: NodeId, timestamp: Duration) -> Self {
        Self { related_node: Some(parent), ..Self::new(DomEventType::NodeInserted, target, timestamp) }
    }

    /// Create node removed event
    pub fn node_removed(target: NodeId, parent: NodeId, timestamp: Duration) -> Self {
        Self { related_node: Some(parent), ..Self::new(DomEventType::NodeRemoved, target, timestamp) }
    }

    /// Create attribute modified event
    pub fn attr_modified(
        target: NodeId,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
        timestamp: Duration,
    ) -> Self {
        Self {
            attr_name: Some(name.to_string()),
            prev_value: old_value.map(str::to_string),
            new_value: new_value.map(str::to_string),
            ..Self::new(DomEventType::AttrModified, target, timestamp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_inserted_event() {
        let event = DomEvent::node_inserted(NodeId(5), NodeId(1), Duration::from_millis(10));

        assert_eq!(event.event_type, DomEventType::NodeInserted);
        assert_eq!(event.target, NodeId(5));
        assert_eq!(event.related_node, Some(NodeId(1)));
        assert_eq!(event.timestamp, Duration::from_millis(10));
    }

    #[test]
    fn test_attr_modified_event() {
        let event = DomEvent::attr_modified(NodeId(1), "class", Some("old"), Some("new"), Duration::ZERO);

        assert_eq!(event.attr_name, Some("class".to_string()));
        assert_eq!(event.prev_value, Some("old".to_string()));
        assert_eq!(event.new_value, Some("new".to_string()));
    }
}
