//! Lodge Widgets
//!
//! Composite widgets built on the host document and wired to the
//! accessibility core: form fields, data tables, modals, the navigation
//! sidebar and skip links.

pub mod input;
pub mod form_field;
pub mod table;
pub mod modal;
pub mod sidebar;
pub mod skip_links;

pub use input::Input;
pub use form_field::FormField;
pub use table::{DataTable, SortDirection};
pub use modal::Modal;
pub use sidebar::Sidebar;
pub use skip_links::SkipLinks;

use lodge_dom::{Document, DomError};

/// Widget error
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("Row {row} has {got} cells, expected {expected}")]
    RowWidth { row: usize, expected: usize, got: usize },

    #[error("Column {column} out of range ({columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },
}

pub type Result<T> = std::result::Result<T, WidgetError>;

/// First `{base}`, `{base}-2`, `{base}-3`... not already used in the document
pub(crate) fn unique_id(doc: &Document, base: &str) -> String {
    if doc.get_element_by_id(base).is_none() {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|id| doc.get_element_by_id(id).is_none())
        .unwrap_or_else(|| base.to_string())
}

/// Lowercase, dash-separated form of a label for use in ids
pub(crate) fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() { "field".to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Guest name"), "guest-name");
        assert_eq!(slug("  E-mail (work) "), "e-mail-work");
        assert_eq!(slug("!!"), "field");
    }

    #[test]
    fn test_unique_id_skips_taken() {
        let mut doc = Document::default();
        let body = doc.body();
        assert_eq!(unique_id(&doc, "room"), "room");
        doc.append_element(body, "div", &[("id", "room")]).unwrap();
        doc.append_element(body, "div", &[("id", "room-2")]).unwrap();
        assert_eq!(unique_id(&doc, "room"), "room-3");
    }
}
