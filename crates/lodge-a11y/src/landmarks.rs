//! Landmark registry
//!
//! Named regions of the page keyed by role. Regions mount and unmount
//! asynchronously, so navigating to a missing or detached landmark is a
//! quiet no-op.

use lodge_dom::{Document, NodeId, ScrollBlock, query};

use crate::aria::{self, AriaRole};

/// Registered landmark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landmark {
    pub role: String,
    pub label: String,
    pub anchor: NodeId,
}

/// Role and label, as listed to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkEntry {
    pub role: String,
    pub label: String,
}

/// Landmark registry
#[derive(Debug, Default)]
pub struct LandmarkRegistry {
    /// Registration order
    entries: Vec<Landmark>,
    /// Landmark last reached by cycling
    cursor: Option<usize>,
}

impl LandmarkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a landmark. A role registered twice keeps its original
    /// position and takes the new label and anchor.
    pub fn register(&mut self, role: &str, label: &str, anchor: NodeId) {
        match self.entries.iter_mut().find(|e| e.role == role) {
            Some(entry) => {
                entry.label = label.to_string();
                entry.anchor = anchor;
            }
            None => self.entries.push(Landmark {
                role: role.to_string(),
                label: label.to_string(),
                anchor,
            }),
        }
        tracing::debug!("Registered landmark {} ({}) at {}", role, label, anchor);
    }

    /// Remove a landmark; returns false if the role was not registered
    pub fn unregister(&mut self, role: &str) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.role == role) else {
            return false;
        };
        self.entries.remove(pos);
        self.cursor = match self.cursor {
            Some(c) if c == pos => None,
            Some(c) if c > pos => Some(c - 1),
            other => other,
        };
        true
    }

    /// Drop landmarks whose anchors left the document; returns how many
    pub fn prune(&mut self, doc: &Document) -> usize {
        let gone: Vec<String> = self.entries.iter()
            .filter(|e| !doc.is_connected(e.anchor))
            .map(|e| e.role.clone())
            .collect();
        for role in &gone {
            self.unregister(role);
            tracing::debug!("Landmark {} unmounted", role);
        }
        gone.len()
    }

    pub fn get(&self, role: &str) -> Option<&Landmark> {
        self.entries.iter().find(|e| e.role == role)
    }

    /// Registered landmarks in registration order
    pub fn list(&self) -> Vec<LandmarkEntry> {
        self.entries.iter()
            .map(|e| LandmarkEntry { role: e.role.clone(), label: e.label.clone() })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Focus a landmark and scroll it to the viewport centre.
    ///
    /// Returns false (and changes nothing) for an unknown role or an anchor
    /// that is no longer in the document.
    pub fn navigate_to(&mut self, doc: &mut Document, role: &str) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.role == role) else {
            tracing::debug!("No landmark registered for {}", role);
            return false;
        };
        self.navigate_index(doc, pos)
    }

    fn navigate_index(&mut self, doc: &mut Document, pos: usize) -> bool {
        let anchor = self.entries[pos].anchor;
        if !doc.is_connected(anchor) {
            tracing::debug!("Landmark {} is detached", self.entries[pos].role);
            return false;
        }
        if !query::is_focus_target(doc, anchor) && doc.set_attribute(anchor, "tabindex", "-1").is_err() {
            return false;
        }
        if !doc.focus(anchor) {
            return false;
        }
        doc.scroll_into_view(anchor, ScrollBlock::Center);
        self.cursor = Some(pos);
        true
    }

    /// Register every landmark element under `root` (explicit or implicit role).
    /// Returns the number of landmarks found.
    pub fn discover(&mut self, doc: &Document, root: NodeId) -> usize {
        let found: Vec<(AriaRole, NodeId)> = doc.tree()
            .descendants(root)
            .filter_map(|(id, _)| aria::role_of(doc, id).filter(AriaRole::is_landmark).map(|r| (r, id)))
            .collect();

        for &(role, anchor) in &found {
            let name = aria::accessible_name(doc, anchor);
            let label = if name.is_empty() { role.label().to_string() } else { name };
            self.register(role.as_str(), &label, anchor);
        }
        found.len()
    }

    /// Move to the next landmark (F6), wrapping
    pub fn next(&mut self, doc: &mut Document) -> Option<LandmarkEntry> {
        self.cycle(doc, true)
    }

    /// Move to the previous landmark (F7), wrapping
    pub fn previous(&mut self, doc: &mut Document) -> Option<LandmarkEntry> {
        self.cycle(doc, false)
    }

    fn cycle(&mut self, doc: &mut Document, forward: bool) -> Option<LandmarkEntry> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        // Start from the landmark that contains focus, if any
        let active = doc.active_element();
        let current = self.entries.iter()
            .rposition(|e| active != doc.body() && doc.contains(e.anchor, active))
            .or(self.cursor);

        let mut pos = match (current, forward) {
            (Some(c), true) => (c + 1) % len,
            (Some(c), false) => (c + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        for _ in 0..len {
            if self.navigate_index(doc, pos) {
                let entry = &self.entries[pos];
                return Some(LandmarkEntry { role: entry.role.clone(), label: entry.label.clone() });
            }
            pos = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
        }
        None
    }
}
