//! Form field
//!
//! Label, control, optional help text and an error slot, wired together
//! with `for`, `aria-describedby` and `aria-invalid`.

use lodge_a11y::AccessibilityCore;
use lodge_dom::{Document, NodeId};

use crate::input::Input;
use crate::Result;

/// Labelled form field
#[derive(Debug, Clone)]
pub struct FormField {
    container: NodeId,
    label: NodeId,
    input: NodeId,
    help_id: Option<String>,
    error: NodeId,
    error_id: String,
    label_text: String,
    invalid: bool,
}

impl FormField {
    /// Build the field under `parent`
    pub fn build(
        doc: &mut Document,
        parent: NodeId,
        label_text: &str,
        input: &Input,
        help: Option<&str>,
    ) -> Result<Self> {
        let container = doc.append_element(parent, "div", &[("class", "form-field")])?;
        let input_id = input.resolve_id(doc);

        let label = doc.append_element(container, "label", &[("for", input_id.as_str())])?;
        doc.append_text(label, label_text)?;
        if input.is_required() {
            let marker = doc.append_element(label, "span", &[("aria-hidden", "true")])?;
            doc.append_text(marker, " *")?;
        }

        let control = input.clone().id(&input_id).build(doc, container)?;

        let help_id = match help {
            Some(text) => {
                let id = format!("{}-help", input_id);
                let node = doc.append_element(container, "p", &[("id", id.as_str()), ("class", "form-help")])?;
                doc.append_text(node, text)?;
                doc.set_attribute(control, "aria-describedby", &id)?;
                Some(id)
            }
            None => None,
        };

        let error_id = format!("{}-error", input_id);
        let error = doc.append_element(container, "p", &[
            ("id", error_id.as_str()),
            ("class", "form-error"),
            ("hidden", ""),
        ])?;

        Ok(Self {
            container,
            label,
            input: control,
            help_id,
            error,
            error_id,
            label_text: label_text.to_string(),
            invalid: false,
        })
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn label(&self) -> NodeId {
        self.label
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    pub fn error(&self) -> NodeId {
        self.error
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Show a validation error, mark the control invalid and announce it
    pub fn set_error(&mut self, doc: &mut Document, core: &mut AccessibilityCore, message: &str) -> Result<()> {
        doc.set_text_content(self.error, message)?;
        doc.remove_attribute(self.error, "hidden")?;
        doc.set_attribute(self.input, "aria-invalid", "true")?;
        let described = match &self.help_id {
            Some(help) => format!("{} {}", help, self.error_id),
            None => self.error_id.clone(),
        };
        doc.set_attribute(self.input, "aria-describedby", &described)?;
        self.invalid = true;

        let prefs = core.preferences();
        core.announcer_mut().announce_error(doc, &prefs, &format!("{}: {}", self.label_text, message));
        Ok(())
    }

    /// Remove the error and restore the original description
    pub fn clear_error(&mut self, doc: &mut Document) -> Result<()> {
        if !self.invalid {
            return Ok(());
        }
        doc.set_text_content(self.error, "")?;
        doc.set_attribute(self.error, "hidden", "")?;
        doc.remove_attribute(self.input, "aria-invalid")?;
        match &self.help_id {
            Some(help) => doc.set_attribute(self.input, "aria-describedby", help)?,
            None => doc.remove_attribute(self.input, "aria-describedby")?,
        }
        self.invalid = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodge_a11y::{A11yConfig, MemoryStorage, OsPreferences, accessible_name};

    fn core() -> AccessibilityCore {
        AccessibilityCore::new(A11yConfig::default(), Box::new(MemoryStorage::new()), OsPreferences::default()).unwrap()
    }

    #[test]
    fn test_label_and_help_wiring() {
        let mut doc = Document::default();
        let body = doc.body();
        let field = FormField::build(&mut doc, body, "Guest name", &Input::new("guest").required(true), Some("As on the passport")).unwrap();

        assert_eq!(doc.get_attribute(field.label(), "for"), Some("input-guest"));
        assert_eq!(doc.get_attribute(field.input(), "aria-describedby"), Some("input-guest-help"));
        assert_eq!(doc.get_attribute(field.input(), "aria-required"), Some("true"));
        assert!(accessible_name(&doc, field.input()).starts_with("Guest name"));
    }

    #[test]
    fn test_error_cycle() {
        let mut doc = Document::default();
        let body = doc.body();
        let mut core = core();
        let mut field = FormField::build(&mut doc, body, "Email", &Input::new("email"), Some("We send the invoice here")).unwrap();

        field.set_error(&mut doc, &mut core, "Enter a valid address").unwrap();
        assert!(field.is_invalid());
        assert_eq!(doc.get_attribute(field.input(), "aria-invalid"), Some("true"));
        assert_eq!(doc.get_attribute(field.input(), "aria-describedby"), Some("input-email-help input-email-error"));
        assert_eq!(doc.get_attribute(field.error(), "hidden"), None);
        let node = core.announcer().pending_nodes()[0];
        assert_eq!(doc.get_attribute(node, "role"), Some("alert"));
        assert_eq!(doc.tree().text_content(node), "Error: Email: Enter a valid address");

        field.clear_error(&mut doc).unwrap();
        assert!(!field.is_invalid());
        assert_eq!(doc.get_attribute(field.input(), "aria-invalid"), None);
        assert_eq!(doc.get_attribute(field.input(), "aria-describedby"), Some("input-email-help"));
        assert_eq!(doc.tree().text_content(field.error()), "");
    }
}
