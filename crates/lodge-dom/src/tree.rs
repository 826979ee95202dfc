//! DOM Tree (arena-based allocation)
//!
//! Removed nodes stay in the arena, detached, so stale `NodeId`s held by
//! callers never alias a different node.

use crate::{DomError, Node, NodeData, NodeId};

/// Arena-based DOM tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// Root (document) node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree holds nothing but the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Check whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = match self.get(current) {
                Some(n) => n.parent,
                None => return false,
            };
        }
        false
    }

    /// Check whether a node is reachable from the document root
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.is_inclusive_ancestor(NodeId::ROOT, node)
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, NodeId::NONE)
    }

    /// Insert `child` before `reference` (or append when `reference` is NONE)
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<(), DomError> {
        if self.get(parent).is_none() {
            return Err(DomError::InvalidNode(parent));
        }
        if self.get(child).is_none() || child == NodeId::ROOT {
            return Err(DomError::InvalidNode(child));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if reference.is_valid() && self.get(reference).map(|r| r.parent) != Some(parent) {
            return Err(DomError::InvalidNode(reference));
        }

        self.detach(child);

        let prev = if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling
        } else {
            self.nodes[parent.index()].last_child
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }

        if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }

        Ok(())
    }

    /// Unlink a node from its parent. The subtree stays intact.
    pub fn detach(&mut self, child: NodeId) {
        let (parent, prev, next) = match self.get(child) {
            Some(node) if node.parent.is_valid() => (node.parent, node.prev_sibling, node.next_sibling),
            _ => return,
        };

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }

        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[child.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.option())
    }

    /// Iterate direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let first = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children { tree: self, next: first }
    }

    /// Iterate descendants in document (pre-)order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let first = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Descendants { tree: self, root: id, next: first }
    }

    /// Iterate ancestors from the parent upwards
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.get(id).and_then(|n| n.as_text()) {
            out.push_str(text);
        }
        for (_, node) in self.descendants(id) {
            if let NodeData::Text(text) = &node.data {
                out.push_str(text);
            }
        }
        out
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Child iterator
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.option()?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order descendant iterator
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Descendants<'_> {
    /// Next node in pre-order that is not a descendant of `id`, bounded by the root
    fn following(&self, id: NodeId) -> NodeId {
        let mut current = id;
        loop {
            if current == self.root {
                return NodeId::NONE;
            }
            let Some(node) = self.tree.get(current) else {
                return NodeId::NONE;
            };
            if node.next_sibling.is_valid() {
                return node.next_sibling;
            }
            current = node.parent;
            if !current.is_valid() {
                return NodeId::NONE;
            }
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.option()?;
        let node = self.tree.get(id)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            self.following(id)
        };

        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_children() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();

        let children: Vec<NodeId> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(children, vec![a, b]);
        assert!(tree.is_connected(b));
    }

    #[test]
    fn test_insert_before() {
        let mut tree = DomTree::new();
        let list = tree.create_element("ul");
        let first = tree.create_element("li");
        let second = tree.create_element("li");
        tree.append_child(list, second).unwrap();
        tree.insert_before(list, first, second).unwrap();

        let children: Vec<NodeId> = tree.children(list).map(|(id, _)| id).collect();
        assert_eq!(children, vec![first, second]);
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        let leaf = tree.create_element("span");
        let sibling = tree.create_element("p");
        let after = tree.create_element("footer");
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, inner).unwrap();
        tree.append_child(inner, leaf).unwrap();
        tree.append_child(outer, sibling).unwrap();
        tree.append_child(tree.root(), after).unwrap();

        let order: Vec<NodeId> = tree.descendants(outer).map(|(id, _)| id).collect();
        assert_eq!(order, vec![inner, leaf, sibling]);
    }

    #[test]
    fn test_detach_disconnects_subtree() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("button");
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, inner).unwrap();

        tree.detach(outer);
        assert!(!tree.is_connected(inner));
        assert_eq!(tree.children(tree.root()).count(), 0);
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(outer, inner).unwrap();
        assert_eq!(
            tree.append_child(inner, outer),
            Err(DomError::HierarchyRequest { parent: inner, child: outer })
        );
    }

    #[test]
    fn test_text_content() {
        let mut tree = DomTree::new();
        let button = tree.create_element("button");
        let icon = tree.create_element("span");
        let t1 = tree.create_text("Book ");
        let t2 = tree.create_text("now");
        tree.append_child(button, icon).unwrap();
        tree.append_child(icon, t1).unwrap();
        tree.append_child(button, t2).unwrap();
        assert_eq!(tree.text_content(button), "Book now");
    }
}
