//! Modal dialog
//!
//! A `role="dialog"` container that traps focus while open. Escape closes it
//! through the focus trap engine; [`Modal::handle_key`] notices and hides the
//! node. Releasing an outer trap also drops this dialog's trap, so the open
//! state is always read back from the engine.

use lodge_a11y::{AccessibilityCore, Priority, TrapId, TrapOptions};
use lodge_dom::{Document, KeyOutcome, KeyboardEvent, NodeId};

use crate::{Result, slug, unique_id};

/// Modal dialog
#[derive(Debug)]
pub struct Modal {
    container: NodeId,
    title_node: NodeId,
    title: String,
    trap: Option<TrapId>,
}

impl Modal {
    /// Build a hidden dialog titled `title` under `parent`
    pub fn build(doc: &mut Document, parent: NodeId, title: &str) -> Result<Self> {
        let title_id = unique_id(doc, &format!("modal-{}-title", slug(title)));
        let container = doc.append_element(parent, "div", &[
            ("role", "dialog"),
            ("aria-modal", "true"),
            ("aria-labelledby", title_id.as_str()),
            ("class", "modal"),
            ("hidden", ""),
        ])?;
        let title_node = doc.append_element(container, "h2", &[("id", title_id.as_str())])?;
        doc.append_text(title_node, title)?;
        Ok(Self { container, title_node, title: title.to_string(), trap: None })
    }

    /// Container to append the dialog's content to
    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn title_node(&self) -> NodeId {
        self.title_node
    }

    /// True while the dialog's trap is still installed
    pub fn is_open(&self, core: &AccessibilityCore) -> bool {
        self.trap.is_some_and(|trap| core.traps().contains(trap))
    }

    /// Forget a trap the engine already released and hide the node
    fn drop_stale_trap(&mut self, doc: &mut Document, core: &AccessibilityCore) -> Result<()> {
        if let Some(trap) = self.trap {
            if !core.traps().contains(trap) {
                self.trap = None;
                self.hide(doc)?;
            }
        }
        Ok(())
    }

    /// Show the dialog, trap focus inside it and announce the title
    pub fn open(&mut self, doc: &mut Document, core: &mut AccessibilityCore) -> Result<()> {
        self.drop_stale_trap(doc, core)?;
        if self.trap.is_some() {
            return Ok(());
        }
        doc.remove_attribute(self.container, "hidden")?;
        let trap = core.open_trap(doc, self.container, TrapOptions::new().escape_closes(true));
        self.trap = Some(trap);
        core.announce(doc, &format!("{} dialog opened", self.title), Priority::Polite);
        tracing::debug!("Modal \"{}\" opened ({})", self.title, trap);
        Ok(())
    }

    /// Release the trap and hide the dialog. Closing twice is a no-op.
    pub fn close(&mut self, doc: &mut Document, core: &mut AccessibilityCore) -> Result<bool> {
        self.drop_stale_trap(doc, core)?;
        let Some(trap) = self.trap.take() else {
            return Ok(false);
        };
        core.release_trap(doc, trap);
        self.hide(doc)?;
        Ok(true)
    }

    fn hide(&mut self, doc: &mut Document) -> Result<()> {
        doc.set_attribute(self.container, "hidden", "")?;
        tracing::debug!("Modal \"{}\" closed", self.title);
        Ok(())
    }

    /// Route a key press through the core and pick up Escape-driven closes
    pub fn handle_key(&mut self, doc: &mut Document, core: &mut AccessibilityCore, event: &KeyboardEvent) -> KeyOutcome {
        let outcome = core.handle_key(doc, event);
        if let Err(e) = self.drop_stale_trap(doc, core) {
            tracing::warn!("Could not hide modal \"{}\": {}", self.title, e);
        }
        outcome
    }
}
