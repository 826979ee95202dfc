//! Skip links
//!
//! One link per registered landmark at the top of the body. The block is
//! hidden while the `autoSkipLinks` preference is off.

use lodge_a11y::{AccessibilityCore, PreferenceSet};
use lodge_dom::{Document, Key, KeyOutcome, KeyboardEvent, NodeId};

use crate::Result;

/// Id of the skip-links container
pub const SKIP_LINKS_ID: &str = "skip-links";

/// Skip-links block
#[derive(Debug)]
pub struct SkipLinks {
    container: NodeId,
    /// Link node and the landmark role it targets
    links: Vec<(NodeId, String)>,
}

impl SkipLinks {
    /// Render links for every registered landmark.
    ///
    /// Reuses the page's `#skip-links` container if it has one, otherwise
    /// creates it as the first child of the body.
    pub fn render(doc: &mut Document, core: &AccessibilityCore) -> Result<Self> {
        let container = match doc.get_element_by_id(SKIP_LINKS_ID) {
            Some(existing) => {
                doc.set_text_content(existing, "")?;
                existing
            }
            None => {
                let body = doc.body();
                let node = doc.create_element("div");
                doc.set_attribute(node, "id", SKIP_LINKS_ID)?;
                doc.set_attribute(node, "class", "skip-links")?;
                let first = doc.tree().children(body).next().map(|(id, _)| id).unwrap_or(NodeId::NONE);
                doc.insert_before(body, node, first)?;
                node
            }
        };

        let mut links = Vec::new();
        for entry in core.landmarks().list() {
            let href = format!("#{}", entry.role);
            let link = doc.append_element(container, "a", &[
                ("href", href.as_str()),
                ("data-landmark", entry.role.as_str()),
            ])?;
            doc.append_text(link, &format!("Skip to {}", entry.label))?;
            links.push((link, entry.role));
        }

        let mut skip = Self { container, links };
        skip.sync(doc, &core.preferences())?;
        tracing::debug!("Rendered {} skip links", skip.links.len());
        Ok(skip)
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn links(&self) -> Vec<NodeId> {
        self.links.iter().map(|(node, _)| *node).collect()
    }

    pub fn is_visible(&self, doc: &Document) -> bool {
        doc.get_attribute(self.container, "hidden").is_none()
    }

    /// Show or hide the block to match the preferences
    pub fn sync(&mut self, doc: &mut Document, prefs: &PreferenceSet) -> Result<()> {
        if prefs.auto_skip_links {
            doc.remove_attribute(self.container, "hidden")?;
        } else {
            doc.set_attribute(self.container, "hidden", "")?;
        }
        Ok(())
    }

    /// Follow a skip link to its landmark
    pub fn activate(&self, doc: &mut Document, core: &mut AccessibilityCore, link: NodeId) -> bool {
        let Some((_, role)) = self.links.iter().find(|(node, _)| *node == link) else {
            return false;
        };
        core.navigate_to(doc, role)
    }

    /// Enter on a focused skip link activates it
    pub fn handle_key(&self, doc: &mut Document, core: &mut AccessibilityCore, event: &KeyboardEvent) -> KeyOutcome {
        if event.key != Key::Enter || !event.modifiers.is_empty() {
            return KeyOutcome::Ignored;
        }
        if self.activate(doc, core, event.target) {
            KeyOutcome::Handled
        } else {
            KeyOutcome::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodge_a11y::{A11yConfig, MemoryStorage, OsPreferences, PreferenceKey};

    fn page() -> (Document, AccessibilityCore) {
        let mut doc = Document::default();
        let body = doc.body();
        doc.append_element(body, "header", &[]).unwrap();
        let main = doc.append_element(body, "main", &[]).unwrap();
        doc.append_element(main, "h1", &[]).unwrap();
        let mut core = AccessibilityCore::new(A11yConfig::default(), Box::new(MemoryStorage::new()), OsPreferences::default()).unwrap();
        core.attach(&mut doc);
        (doc, core)
    }

    #[test]
    fn test_render_first_in_body() {
        let (mut doc, core) = page();
        let skip = SkipLinks::render(&mut doc, &core).unwrap();
        let body = doc.body();
        assert_eq!(doc.tree().children(body).next().map(|(id, _)| id), Some(skip.container()));

        let texts: Vec<String> = skip.links().iter().map(|&l| doc.tree().text_content(l)).collect();
        assert_eq!(texts, ["Skip to Banner", "Skip to Main"]);
        assert!(skip.is_visible(&doc));
    }

    #[test]
    fn test_hidden_without_preference() {
        let (mut doc, mut core) = page();
        core.set_preference(&mut doc, PreferenceKey::AutoSkipLinks, false);
        let mut skip = SkipLinks::render(&mut doc, &core).unwrap();
        assert!(!skip.is_visible(&doc));

        core.set_preference(&mut doc, PreferenceKey::AutoSkipLinks, true);
        skip.sync(&mut doc, &core.preferences()).unwrap();
        assert!(skip.is_visible(&doc));
    }

    #[test]
    fn test_enter_navigates() {
        let (mut doc, mut core) = page();
        let skip = SkipLinks::render(&mut doc, &core).unwrap();
        let to_main = skip.links()[1];
        doc.focus(to_main);

        let event = KeyboardEvent::parse("Enter", to_main);
        assert_eq!(skip.handle_key(&mut doc, &mut core, &event), KeyOutcome::Handled);
        let main = core.landmarks().get("main").unwrap().anchor;
        assert_eq!(doc.focused(), Some(main));
        assert_eq!(doc.get_attribute(main, "tabindex"), Some("-1"));
    }

    #[test]
    fn test_rerender_reuses_container() {
        let (mut doc, core) = page();
        let first = SkipLinks::render(&mut doc, &core).unwrap();
        let second = SkipLinks::render(&mut doc, &core).unwrap();
        assert_eq!(first.container(), second.container());
        assert_eq!(doc.tree().children(second.container()).count(), 2);
    }
}
