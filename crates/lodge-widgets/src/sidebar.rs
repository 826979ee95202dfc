//! Navigation sidebar
//!
//! Disclosure-style panel behind a toggle button. Links move as a vertical
//! looping group. In a narrow layout the open panel also traps focus.

use lodge_a11y::{AccessibilityCore, NavigationGroup, Orientation, TrapId, TrapOptions};
use lodge_dom::{Document, Key, KeyOutcome, KeyboardEvent, NodeId};

use crate::Result;

/// Navigation sidebar
#[derive(Debug)]
pub struct Sidebar {
    toggle: NodeId,
    panel: NodeId,
    nav: NavigationGroup,
    expanded: bool,
    modal: bool,
    trap: Option<TrapId>,
}

impl Sidebar {
    /// Build the toggle button and a collapsed panel of `(text, href)` links
    pub fn build(doc: &mut Document, parent: NodeId, id: &str, label: &str, links: &[(&str, &str)]) -> Result<Self> {
        let toggle = doc.append_element(parent, "button", &[
            ("type", "button"),
            ("aria-expanded", "false"),
            ("aria-controls", id),
        ])?;
        doc.append_text(toggle, label)?;

        let panel = doc.append_element(parent, "nav", &[
            ("id", id),
            ("aria-label", label),
            ("class", "sidebar"),
            ("hidden", ""),
        ])?;
        let list = doc.append_element(panel, "ul", &[])?;
        let mut items = Vec::with_capacity(links.len());
        for &(text, href) in links {
            let li = doc.append_element(list, "li", &[])?;
            let a = doc.append_element(li, "a", &[("href", href)])?;
            doc.append_text(a, text)?;
            items.push(a);
        }

        Ok(Self {
            toggle,
            panel,
            nav: NavigationGroup::new(items, Orientation::Vertical).looping(true),
            expanded: false,
            modal: false,
            trap: None,
        })
    }

    /// Trap focus in the open panel (narrow layouts)
    pub fn set_modal(&mut self, modal: bool) {
        self.modal = modal;
    }

    pub fn toggle_button(&self) -> NodeId {
        self.toggle
    }

    pub fn panel(&self) -> NodeId {
        self.panel
    }

    pub fn items(&self) -> &[NodeId] {
        self.nav.items()
    }

    /// Expanded, and for a modal panel its trap still installed
    pub fn is_expanded(&self, core: &AccessibilityCore) -> bool {
        self.expanded && self.trap.is_none_or(|trap| core.traps().contains(trap))
    }

    /// Collapse a modal panel whose trap was released underneath it
    fn drop_stale_trap(&mut self, doc: &mut Document, core: &AccessibilityCore) -> Result<()> {
        if let Some(trap) = self.trap {
            if !core.traps().contains(trap) {
                self.trap = None;
                self.collapse(doc)?;
            }
        }
        Ok(())
    }

    /// Expand the panel and focus its first link
    pub fn open(&mut self, doc: &mut Document, core: &mut AccessibilityCore) -> Result<()> {
        self.drop_stale_trap(doc, core)?;
        if self.expanded {
            return Ok(());
        }
        doc.remove_attribute(self.panel, "hidden")?;
        doc.set_attribute(self.toggle, "aria-expanded", "true")?;
        self.expanded = true;

        if self.modal {
            self.trap = Some(core.open_trap(doc, self.panel, TrapOptions::new().escape_closes(true)));
            self.nav.sync_with_focus(doc);
        } else {
            self.nav.first(doc);
        }
        tracing::debug!("Sidebar {} expanded", self.panel);
        Ok(())
    }

    /// Collapse the panel and return focus to the toggle. No-op when collapsed.
    pub fn close(&mut self, doc: &mut Document, core: &mut AccessibilityCore) -> Result<bool> {
        self.drop_stale_trap(doc, core)?;
        if !self.expanded {
            return Ok(false);
        }
        match self.trap.take() {
            Some(trap) => {
                core.release_trap(doc, trap);
            }
            None => {
                doc.focus(self.toggle);
            }
        }
        self.collapse(doc)?;
        Ok(true)
    }

    fn collapse(&mut self, doc: &mut Document) -> Result<()> {
        doc.set_attribute(self.panel, "hidden", "")?;
        doc.set_attribute(self.toggle, "aria-expanded", "false")?;
        self.expanded = false;
        tracing::debug!("Sidebar {} collapsed", self.panel);
        Ok(())
    }

    /// Flip the panel; returns the new expanded state
    pub fn toggle(&mut self, doc: &mut Document, core: &mut AccessibilityCore) -> Result<bool> {
        if self.is_expanded(core) {
            self.close(doc, core)?;
        } else {
            self.open(doc, core)?;
        }
        Ok(self.expanded)
    }

    /// Arrows move between links; Escape collapses the panel
    pub fn handle_key(&mut self, doc: &mut Document, core: &mut AccessibilityCore, event: &KeyboardEvent) -> KeyOutcome {
        if let Err(e) = self.drop_stale_trap(doc, core) {
            tracing::warn!("Could not collapse sidebar: {}", e);
        }
        if !self.expanded {
            return KeyOutcome::Ignored;
        }

        if self.trap.is_some() {
            let outcome = core.handle_key(doc, event);
            if self.trap.is_some_and(|trap| !core.traps().contains(trap)) {
                if let Err(e) = self.drop_stale_trap(doc, core) {
                    tracing::warn!("Could not collapse sidebar: {}", e);
                }
                return outcome;
            }
            if outcome.is_handled() {
                self.nav.sync_with_focus(doc);
                return outcome;
            }
        } else if event.key == Key::Escape && event.modifiers.is_empty() {
            return match self.close(doc, core) {
                Ok(_) => KeyOutcome::Handled,
                Err(e) => {
                    tracing::warn!("Could not collapse sidebar: {}", e);
                    KeyOutcome::Ignored
                }
            };
        }

        self.nav.sync_with_focus(doc);
        self.nav.handle_key(doc, event)
    }
}
