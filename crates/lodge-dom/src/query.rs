//! Document queries
//!
//! The two lookups every accessibility component needs: "which elements
//! inside this container can take keyboard focus, in tab order" and "where is
//! the live region". Keeping them here stops each component from growing its
//! own ad hoc tree walk.

use crate::{Document, ElementData, NodeId};

/// Tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// tabindex="-1": focusable by script, skipped by Tab
    ProgrammaticOnly,
    /// tabindex="0" or positive
    Sequential(i32),
}

impl TabIndex {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Some(Self::ProgrammaticOnly),
            Ok(n) => Some(Self::Sequential(n)),
            Err(_) => None,
        }
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }
}

/// Explicit tabindex on an element, if parseable
pub fn tab_index(elem: &ElementData) -> Option<TabIndex> {
    elem.get_attr("tabindex").and_then(TabIndex::parse)
}

/// Check whether an element is focusable without a tabindex attribute
pub fn is_natively_focusable(elem: &ElementData) -> bool {
    match elem.tag.as_str() {
        "a" | "area" => elem.has_attr("href"),
        "button" | "select" | "textarea" => !elem.has_attr("disabled"),
        "input" => !elem.has_attr("disabled") && elem.get_attr("type") != Some("hidden"),
        "iframe" | "summary" => true,
        "audio" | "video" => elem.has_attr("controls"),
        _ => is_content_editable(elem),
    }
}

fn is_content_editable(elem: &ElementData) -> bool {
    matches!(elem.get_attr("contenteditable"), Some("") | Some("true") | Some("plaintext-only"))
}

/// Check whether the element or an ancestor is hidden or inert
pub fn is_hidden(doc: &Document, node: NodeId) -> bool {
    std::iter::once(node)
        .chain(doc.tree().ancestors(node))
        .filter_map(|id| doc.element(id))
        .any(|e| e.has_attr("hidden") || e.has_attr("inert"))
}

/// Check whether `focus()` can move focus to this node
pub fn is_focus_target(doc: &Document, node: NodeId) -> bool {
    let Some(elem) = doc.element(node) else {
        return false;
    };
    if !doc.is_connected(node) || is_hidden(doc, node) {
        return false;
    }
    if elem.has_attr("disabled") && matches!(elem.tag.as_str(), "button" | "input" | "select" | "textarea") {
        return false;
    }
    tab_index(elem).is_some() || is_natively_focusable(elem)
}

/// Check whether Tab can reach this node
pub fn is_tabbable(doc: &Document, node: NodeId) -> bool {
    if !is_focus_target(doc, node) {
        return false;
    }
    match doc.element(node).and_then(tab_index) {
        Some(index) => index.is_sequential(),
        None => true,
    }
}

/// Tabbable descendants of `container` in sequential navigation order.
///
/// Positive tabindex values come first in ascending order, then everything
/// with tabindex 0 (explicit or implied) in document order.
pub fn focusable_descendants(doc: &Document, container: NodeId) -> Vec<NodeId> {
    let mut ranked: Vec<(i32, usize, NodeId)> = doc.tree()
        .descendants(container)
        .filter(|(id, node)| node.is_element() && is_tabbable(doc, *id))
        .enumerate()
        .map(|(order, (id, node))| {
            let index = match node.as_element().and_then(tab_index) {
                Some(TabIndex::Sequential(n)) => n,
                _ => 0,
            };
            (index, order, id)
        })
        .collect();

    ranked.sort_by(|a, b| match (a.0, b.0) {
        (0, 0) => a.1.cmp(&b.1),
        (0, _) => std::cmp::Ordering::Greater,
        (_, 0) => std::cmp::Ordering::Less,
        (x, y) => x.cmp(&y).then(a.1.cmp(&b.1)),
    });

    ranked.into_iter().map(|(_, _, id)| id).collect()
}

/// Check whether a node is a text-entry control (typing target)
pub fn is_text_entry(doc: &Document, node: NodeId) -> bool {
    let Some(elem) = doc.element(node) else {
        return false;
    };
    if is_content_editable(elem) || elem.get_attr("role") == Some("textbox") {
        return true;
    }
    match elem.tag.as_str() {
        "textarea" | "select" => true,
        "input" => !matches!(
            elem.get_attr("type").map(|t| t.to_ascii_lowercase()).as_deref(),
            Some("button" | "submit" | "reset" | "checkbox" | "radio" | "image" | "hidden" | "range" | "color" | "file")
        ),
        _ => false,
    }
}

/// Find a connected live-region container by id
pub fn find_live_region(doc: &Document, id: &str) -> Option<NodeId> {
    let node = doc.get_element_by_id(id)?;
    let elem = doc.element(node)?;
    let live = elem.get_attr("aria-live").is_some_and(|v| v != "off")
        || matches!(elem.get_attr("role"), Some("status" | "alert" | "log"))
        || elem.has_attr("data-live-region");
    live.then_some(node)
}

/// Descendant elements with a given tag, in document order
pub fn elements_by_tag(doc: &Document, root: NodeId, tag: &str) -> Vec<NodeId> {
    doc.tree()
        .descendants(root)
        .filter(|(_, node)| node.as_element().is_some_and(|e| e.is(tag)))
        .map(|(id, _)| id)
        .collect()
}
