//! Keyboard navigation
//!
//! Arrow-key movement through an ordered collection of elements (menu,
//! list, grid). Every successful move focuses the newly active item.

use lodge_dom::{Document, Key, KeyOutcome, KeyboardEvent, NodeId, query};

/// Which arrow keys move through the group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

/// An ordered group of focusable items with one active index
#[derive(Debug, Clone)]
pub struct NavigationGroup {
    items: Vec<NodeId>,
    orientation: Orientation,
    looping: bool,
    /// Grid column count; rows move by this stride
    columns: Option<usize>,
    active: Option<usize>,
}

impl NavigationGroup {
    pub fn new(items: Vec<NodeId>, orientation: Orientation) -> Self {
        let active = if items.is_empty() { None } else { Some(0) };
        Self { items, orientation, looping: false, columns: None, active }
    }

    /// Group over the tabbable descendants of a container
    pub fn from_container(doc: &Document, container: NodeId, orientation: Orientation) -> Self {
        Self::new(query::focusable_descendants(doc, container), orientation)
    }

    /// Wrap at the edges
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Treat the items as a row-major grid
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = (columns > 0).then_some(columns);
        self
    }

    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_item(&self) -> Option<NodeId> {
        self.active.map(|i| self.items[i])
    }

    // === Moves ===

    fn move_to(&mut self, doc: &mut Document, index: usize) -> bool {
        let Some(&item) = self.items.get(index) else {
            return false;
        };
        self.active = Some(index);
        if !doc.focus(item) {
            tracing::debug!("Navigation item {} could not take focus", item);
        }
        true
    }

    /// Move by one item, wrapping when looping
    pub fn next(&mut self, doc: &mut Document) -> bool {
        self.step(doc, 1)
    }

    /// Move back by one item, wrapping when looping
    pub fn previous(&mut self, doc: &mut Document) -> bool {
        self.step(doc, -1)
    }

    fn step(&mut self, doc: &mut Document, delta: isize) -> bool {
        let Some(current) = self.active else {
            return false;
        };
        let len = self.items.len() as isize;
        let target = current as isize + delta;
        let target = if (0..len).contains(&target) {
            target
        } else if self.looping {
            target.rem_euclid(len)
        } else {
            return false;
        };
        self.move_to(doc, target as usize)
    }

    /// Jump to an index, clamped to the valid range
    pub fn go_to(&mut self, doc: &mut Document, index: usize) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let index = index.min(self.items.len() - 1);
        self.move_to(doc, index)
    }

    pub fn first(&mut self, doc: &mut Document) -> bool {
        self.go_to(doc, 0)
    }

    pub fn last(&mut self, doc: &mut Document) -> bool {
        self.go_to(doc, usize::MAX)
    }

    /// Move one grid row up or down. With looping, leaving an edge row lands
    /// in the same column of the opposite edge row.
    fn step_row(&mut self, doc: &mut Document, down: bool) -> bool {
        let (Some(current), Some(columns)) = (self.active, self.columns) else {
            return false;
        };
        let len = self.items.len();
        let column = current % columns;
        let target = if down {
            current.checked_add(columns).filter(|&t| t < len)
        } else {
            current.checked_sub(columns)
        };
        let target = match target {
            Some(t) => t,
            None if self.looping => {
                if down {
                    column
                } else {
                    // Same column in the last row that has it
                    let last_row_start = (len - 1) / columns * columns;
                    let candidate = last_row_start + column;
                    if candidate < len { candidate } else { candidate - columns }
                }
            }
            None => return false,
        };
        self.move_to(doc, target)
    }

    /// Offer a key press to the group
    pub fn handle_key(&mut self, doc: &mut Document, event: &KeyboardEvent) -> KeyOutcome {
        if self.items.is_empty() || event.modifiers.has_command_modifier() {
            return KeyOutcome::Ignored;
        }
        let grid = self.columns.is_some();
        let horizontal = grid || self.orientation == Orientation::Horizontal;
        let vertical = grid || self.orientation == Orientation::Vertical;

        match event.key {
            Key::ArrowDown if grid => { self.step_row(doc, true); }
            Key::ArrowUp if grid => { self.step_row(doc, false); }
            Key::ArrowDown if vertical => { self.next(doc); }
            Key::ArrowUp if vertical => { self.previous(doc); }
            Key::ArrowRight if horizontal => { self.next(doc); }
            Key::ArrowLeft if horizontal => { self.previous(doc); }
            Key::Home => { self.first(doc); }
            Key::End => { self.last(doc); }
            Key::Enter | Key::Space => {
                match self.active_item() {
                    Some(item) => { doc.click(item); }
                    None => return KeyOutcome::Ignored,
                }
            }
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    // === Item list changes ===

    /// Replace the items, keeping the active index when it is still valid
    pub fn set_items(&mut self, items: Vec<NodeId>) {
        self.items = items;
        self.clamp();
    }

    /// Insert an item; the active item stays the same element
    pub fn insert(&mut self, index: usize, item: NodeId) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        self.active = match self.active {
            Some(a) if index <= a => Some(a + 1),
            Some(a) => Some(a),
            None => Some(0),
        };
    }

    /// Remove an item; returns false if it was not in the group
    pub fn remove(&mut self, item: NodeId) -> bool {
        let Some(pos) = self.items.iter().position(|&i| i == item) else {
            return false;
        };
        self.items.remove(pos);
        if let Some(a) = self.active {
            if pos < a {
                self.active = Some(a - 1);
            }
        }
        self.clamp();
        true
    }

    fn clamp(&mut self) {
        self.active = match (self.items.len(), self.active) {
            (0, _) => None,
            (len, Some(a)) => Some(a.min(len - 1)),
            (_, None) => Some(0),
        };
    }

    /// Adopt the index of the focused element if it belongs to the group
    pub fn sync_with_focus(&mut self, doc: &Document) -> bool {
        let Some(focused) = doc.focused() else {
            return false;
        };
        match self.items.iter().position(|&i| i == focused) {
            Some(pos) => {
                self.active = Some(pos);
                true
            }
            None => false,
        }
    }

    /// Roving tabindex: only the active item is in the tab sequence
    pub fn apply_roving_tabindex(&self, doc: &mut Document) {
        for (i, &item) in self.items.iter().enumerate() {
            let value = if Some(i) == self.active { "0" } else { "-1" };
            if let Err(e) = doc.set_attribute(item, "tabindex", value) {
                tracing::warn!("Could not set tabindex on {}: {}", item, e);
            }
        }
    }
}
