//! Document - High-level document API
//!
//! Every mutation that the host has to mirror goes through here and is
//! appended to the event journal.

use std::time::Duration;

use crate::query;
use crate::{DomError, DomEvent, DomTree, ElementData, NodeId};

/// Alignment for scroll-into-view requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBlock {
    Start,
    #[default]
    Center,
    End,
    Nearest,
}

impl ScrollBlock {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
            Self::Nearest => "nearest",
        }
    }
}

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Focused element; `None` means the body has focus
    focused: Option<NodeId>,
    /// Document timeline
    now: Duration,
    /// Journal of changes since the last drain
    journal: Vec<DomEvent>,
}

impl Document {
    /// Create a new document with html/head/body
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let root = doc.tree.root();
        let html = doc.tree.create_element("html");
        let head = doc.tree.create_element("head");
        let body = doc.tree.create_element("body");

        // Fresh nodes under a fresh root cannot fail to link
        let _ = doc.tree.append_child(root, html);
        let _ = doc.tree.append_child(html, head);
        let _ = doc.tree.append_child(html, body);

        doc.html_element = html;
        doc.head_element = head;
        doc.body_element = body;
        doc
    }

    /// Create an empty document (no structure); call `finalize` after filling it
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            focused: None,
            now: Duration::ZERO,
            journal: Vec::new(),
        }
    }

    /// Locate html/head/body after the tree was built externally.
    ///
    /// Missing elements are created so every document has a body to fall
    /// back to.
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self.child_with_tag(root, "html").unwrap_or_else(|| {
            let html = self.tree.create_element("html");
            let _ = self.tree.append_child(root, html);
            html
        });
        let html = self.html_element;
        self.head_element = self.child_with_tag(html, "head").unwrap_or_else(|| {
            let head = self.tree.create_element("head");
            let first = self.tree.get(html).map(|n| n.first_child).unwrap_or(NodeId::NONE);
            let _ = self.tree.insert_before(html, head, first);
            head
        });
        self.body_element = self.child_with_tag(html, "body").unwrap_or_else(|| {
            let body = self.tree.create_element("body");
            let _ = self.tree.append_child(html, body);
            body
        });
        tracing::debug!("Document finalized: {} nodes", self.tree.len());
    }

    fn child_with_tag(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.tree.children(parent)
            .find(|(_, node)| node.as_element().is_some_and(|e| e.is(tag)))
            .map(|(id, _)| id)
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.child_with_tag(self.head_element, "title")
            .map(|t| self.tree.text_content(t).trim().to_string())
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably (bypasses the journal)
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Element data for a node
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.get(id).and_then(|n| n.as_element())
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match self.tree.get_mut(id) {
            Some(node) => node.as_element_mut().ok_or(DomError::NotAnElement(id)),
            None => Err(DomError::InvalidNode(id)),
        }
    }

    /// Check whether a node is attached to the document
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.is_connected(id)
    }

    /// Check whether `node` is `container` or inside it
    pub fn contains(&self, container: NodeId, node: NodeId) -> bool {
        self.tree.is_inclusive_ancestor(container, node)
    }

    /// Get connected element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.tree.descendants(self.tree.root())
            .find(|(_, node)| node.as_element().and_then(|e| e.id()) == Some(id))
            .map(|(node_id, _)| node_id)
    }

    // === Tree mutation ===

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    /// Append a child and record the insertion
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.tree.append_child(parent, child)?;
        self.journal.push(DomEvent::node_inserted(child, parent, self.now));
        Ok(())
    }

    /// Insert `child` before `reference`, or append when `reference` is NONE
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<(), DomError> {
        self.tree.insert_before(parent, child, reference)?;
        self.journal.push(DomEvent::node_inserted(child, parent, self.now));
        Ok(())
    }

    /// Create an element with attributes and append it
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> Result<NodeId, DomError> {
        let id = self.tree.create_element(tag);
        {
            let elem = self.element_mut(id)?;
            for (name, value) in attrs {
                elem.set_attr(name, *value);
            }
        }
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Create a text node and append it
    pub fn append_text(&mut self, parent: NodeId, content: &str) -> Result<NodeId, DomError> {
        let id = self.tree.create_text(content);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Replace all children of a node with a single text node
    pub fn set_text_content(&mut self, node: NodeId, content: &str) -> Result<(), DomError> {
        let children: Vec<NodeId> = self.tree.children(node).map(|(id, _)| id).collect();
        for child in children {
            self.remove(child)?;
        }
        if !content.is_empty() {
            self.append_text(node, content)?;
        }
        Ok(())
    }

    /// Detach a node (and its subtree) from its parent.
    ///
    /// If focus was inside the removed subtree it falls back to the body.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.tree.parent(node) else {
            return match self.tree.get(node) {
                Some(_) => Ok(()),
                None => Err(DomError::InvalidNode(node)),
            };
        };
        let lost_focus = self.focused.filter(|&f| self.tree.is_inclusive_ancestor(node, f));
        self.tree.detach(node);
        self.journal.push(DomEvent::node_removed(node, parent, self.now));
        if let Some(previous) = lost_focus {
            tracing::debug!("Focused element {} removed; focus returns to body", previous);
            self.focused = None;
            self.journal.push(DomEvent::blur(previous, None, self.now));
        }
        Ok(())
    }

    // === Attributes ===

    /// Get an attribute value
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|e| e.get_attr(name))
    }

    /// Set an attribute and record the change
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let now = self.now;
        let previous = self.element_mut(node)?.set_attr(name, value);
        if previous.as_deref() != Some(value) {
            self.journal.push(DomEvent::attr_modified(node, name, previous.as_deref(), Some(value), now));
        }
        Ok(())
    }

    /// Remove an attribute and record the change
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError> {
        let now = self.now;
        if let Some(previous) = self.element_mut(node)?.remove_attr(name) {
            self.journal.push(DomEvent::attr_modified(node, name, Some(&previous), None, now));
        }
        Ok(())
    }

    /// Check class membership
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|e| e.has_class(class))
    }

    /// Add or remove a class; records a change only when membership flips
    pub fn toggle_class(&mut self, node: NodeId, class: &str, present: bool) -> Result<bool, DomError> {
        let now = self.now;
        let elem = self.element_mut(node)?;
        let before = elem.get_attr("class").map(str::to_string);
        let changed = if present { elem.add_class(class) } else { elem.remove_class(class) };
        if changed {
            let after = elem.get_attr("class").map(str::to_string);
            self.journal.push(DomEvent::attr_modified(node, "class", before.as_deref(), after.as_deref(), now));
        }
        Ok(changed)
    }

    // === Focus ===

    /// Focused element, if any element other than the body has focus
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Element that currently has focus (body when nothing else does)
    pub fn active_element(&self) -> NodeId {
        self.focused.unwrap_or(self.body_element)
    }

    /// Move focus to an element. Returns false if it cannot take focus.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if node == self.body_element {
            self.focus_body();
            return true;
        }
        if !query::is_focus_target(self, node) {
            tracing::debug!("Refusing focus on {}: not focusable", node);
            return false;
        }
        if self.focused == Some(node) {
            return true;
        }
        if let Some(previous) = self.focused {
            self.journal.push(DomEvent::blur(previous, Some(node), self.now));
        }
        self.journal.push(DomEvent::focus(node, self.focused, self.now));
        self.focused = Some(node);
        true
    }

    /// Return focus to the body
    pub fn focus_body(&mut self) {
        if let Some(previous) = self.focused.take() {
            self.journal.push(DomEvent::blur(previous, Some(self.body_element), self.now));
        }
        self.journal.push(DomEvent::focus(self.body_element, None, self.now));
    }

    /// Blur the focused element
    pub fn blur(&mut self) {
        if let Some(previous) = self.focused.take() {
            self.journal.push(DomEvent::blur(previous, None, self.now));
        }
    }

    /// Default Tab / Shift+Tab behaviour over the whole document, wrapping
    pub fn focus_sequential(&mut self, forward: bool) -> Option<NodeId> {
        let order = query::focusable_descendants(self, self.tree.root());
        if order.is_empty() {
            return None;
        }
        let current = self.focused.and_then(|f| order.iter().position(|&id| id == f));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % order.len(),
            (Some(0), false) | (None, false) => order.len() - 1,
            (Some(i), false) => i - 1,
            (None, true) => 0,
        };
        let target = order[next];
        self.focus(target).then_some(target)
    }

    // === Activation and scrolling ===

    /// Activate an element (click). Returns false for non-elements.
    pub fn click(&mut self, node: NodeId) -> bool {
        if self.element(node).is_none() {
            return false;
        }
        self.journal.push(DomEvent::click(node, self.now));
        true
    }

    /// Ask the host to scroll an element into view
    pub fn scroll_into_view(&mut self, node: NodeId, block: ScrollBlock) {
        if self.is_connected(node) {
            self.journal.push(DomEvent::scroll_into_view(node, block.as_str(), self.now));
        }
    }

    // === Timeline and journal ===

    /// Current position on the document timeline
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Advance the document timeline
    pub fn advance(&mut self, delta: Duration) {
        self.now += delta;
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[DomEvent] {
        &self.journal
    }

    /// Drain the event journal
    pub fn take_events(&mut self) -> Vec<DomEvent> {
        std::mem::take(&mut self.journal)
    }

    /// Count of live nodes reachable from the root
    pub fn connected_len(&self) -> usize {
        self.tree.descendants(self.tree.root()).count()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
