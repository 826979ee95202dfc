//! ARIA Support
//!
//! Roles the core cares about, the implicit role mapping for landmark
//! elements, and accessible name computation over the host document.

use lodge_dom::{Document, NodeId, query};

/// ARIA role (the subset the core reads or writes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    // === Landmark Roles ===
    Banner,
    Complementary,
    ContentInfo,
    Form,
    Main,
    Navigation,
    Region,
    Search,

    // === Widget Roles ===
    Button,
    Link,
    TextBox,
    GridCell,
    Tab,
    MenuItem,
    Option,

    // === Document Structure Roles ===
    Heading,
    Img,
    Presentation,
    Table,

    // === Live Region Roles ===
    Alert,
    Log,
    Status,

    // === Window Roles ===
    AlertDialog,
    Dialog,
}

impl AriaRole {
    /// Parse from a role attribute token
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "banner" => Self::Banner,
            "complementary" => Self::Complementary,
            "contentinfo" => Self::ContentInfo,
            "form" => Self::Form,
            "main" => Self::Main,
            "navigation" => Self::Navigation,
            "region" => Self::Region,
            "search" => Self::Search,

            "button" => Self::Button,
            "link" => Self::Link,
            "textbox" | "searchbox" => Self::TextBox,
            "gridcell" | "cell" => Self::GridCell,
            "tab" => Self::Tab,
            "menuitem" => Self::MenuItem,
            "option" => Self::Option,

            "heading" => Self::Heading,
            "img" | "image" => Self::Img,
            "none" | "presentation" => Self::Presentation,
            "table" | "grid" => Self::Table,

            "alert" => Self::Alert,
            "log" => Self::Log,
            "status" => Self::Status,

            "alertdialog" => Self::AlertDialog,
            "dialog" => Self::Dialog,

            _ => return None,
        })
    }

    /// Role attribute token
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Banner => "banner",
            Self::Complementary => "complementary",
            Self::ContentInfo => "contentinfo",
            Self::Form => "form",
            Self::Main => "main",
            Self::Navigation => "navigation",
            Self::Region => "region",
            Self::Search => "search",
            Self::Button => "button",
            Self::Link => "link",
            Self::TextBox => "textbox",
            Self::GridCell => "gridcell",
            Self::Tab => "tab",
            Self::MenuItem => "menuitem",
            Self::Option => "option",
            Self::Heading => "heading",
            Self::Img => "img",
            Self::Presentation => "presentation",
            Self::Table => "table",
            Self::Alert => "alert",
            Self::Log => "log",
            Self::Status => "status",
            Self::AlertDialog => "alertdialog",
            Self::Dialog => "dialog",
        }
    }

    /// Human-readable label used when a landmark carries no name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Banner => "Banner",
            Self::Complementary => "Complementary",
            Self::ContentInfo => "Content info",
            Self::Form => "Form",
            Self::Main => "Main",
            Self::Navigation => "Navigation",
            Self::Region => "Region",
            Self::Search => "Search",
            Self::Button => "Button",
            Self::Link => "Link",
            Self::TextBox => "Text box",
            Self::GridCell => "Cell",
            Self::Tab => "Tab",
            Self::MenuItem => "Menu item",
            Self::Option => "Option",
            Self::Heading => "Heading",
            Self::Img => "Image",
            Self::Presentation => "Presentation",
            Self::Table => "Table",
            Self::Alert => "Alert",
            Self::Log => "Log",
            Self::Status => "Status",
            Self::AlertDialog => "Alert dialog",
            Self::Dialog => "Dialog",
        }
    }

    /// Check if role is landmark
    pub fn is_landmark(&self) -> bool {
        matches!(self,
            Self::Banner | Self::Complementary | Self::ContentInfo |
            Self::Form | Self::Main | Self::Navigation | Self::Region | Self::Search
        )
    }

    /// Check if role is live region
    pub fn is_live_region(&self) -> bool {
        matches!(self, Self::Alert | Self::Log | Self::Status)
    }

    /// Check if role is window
    pub fn is_window(&self) -> bool {
        matches!(self, Self::AlertDialog | Self::Dialog)
    }

    /// Check if role supports name from content
    pub fn supports_name_from_content(&self) -> bool {
        matches!(self,
            Self::Button | Self::Link | Self::GridCell | Self::Tab |
            Self::MenuItem | Self::Option | Self::Heading
        )
    }
}

/// Role from the `role` attribute (first recognised token)
pub fn explicit_role(doc: &Document, node: NodeId) -> Option<AriaRole> {
    doc.get_attribute(node, "role")?
        .split_whitespace()
        .find_map(AriaRole::parse)
}

/// Role implied by the element's tag
pub fn implicit_role(doc: &Document, node: NodeId) -> Option<AriaRole> {
    let elem = doc.element(node)?;
    Some(match elem.tag.as_str() {
        "main" => AriaRole::Main,
        "nav" => AriaRole::Navigation,
        "aside" => AriaRole::Complementary,
        "search" => AriaRole::Search,
        "header" if !in_sectioning_content(doc, node) => AriaRole::Banner,
        "footer" if !in_sectioning_content(doc, node) => AriaRole::ContentInfo,
        "form" if has_author_label(doc, node) => AriaRole::Form,
        "section" if has_author_label(doc, node) => AriaRole::Region,
        "button" | "summary" => AriaRole::Button,
        "a" | "area" if elem.has_attr("href") => AriaRole::Link,
        "img" if elem.get_attr("alt") == Some("") => AriaRole::Presentation,
        "img" => AriaRole::Img,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => AriaRole::Heading,
        "table" => AriaRole::Table,
        "td" | "th" => AriaRole::GridCell,
        "dialog" => AriaRole::Dialog,
        "textarea" => AriaRole::TextBox,
        "input" if query::is_text_entry(doc, node) => AriaRole::TextBox,
        "input" if matches!(elem.get_attr("type"), Some("button" | "submit" | "reset")) => AriaRole::Button,
        _ => return None,
    })
}

/// Effective role: explicit first, then implicit
pub fn role_of(doc: &Document, node: NodeId) -> Option<AriaRole> {
    explicit_role(doc, node).or_else(|| implicit_role(doc, node))
}

/// Header/footer only map to banner/contentinfo at page level
fn in_sectioning_content(doc: &Document, node: NodeId) -> bool {
    doc.tree().ancestors(node)
        .filter_map(|id| doc.element(id))
        .any(|e| matches!(e.tag.as_str(), "article" | "aside" | "main" | "nav" | "section"))
}

fn has_author_label(doc: &Document, node: NodeId) -> bool {
    doc.get_attribute(node, "aria-label").is_some_and(|l| !l.trim().is_empty())
        || doc.get_attribute(node, "aria-labelledby").is_some_and(|l| !l.trim().is_empty())
}

/// Heading level for `h1`-`h6` or `role="heading"` with `aria-level`
pub fn heading_level(doc: &Document, node: NodeId) -> Option<u8> {
    let elem = doc.element(node)?;
    if let Some(level) = elem.tag.strip_prefix('h').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=6).contains(&level) {
            return Some(level);
        }
    }
    if explicit_role(doc, node) == Some(AriaRole::Heading) {
        // Out-of-range levels fall back to the implicit level 2
        let level = elem.get_attr("aria-level")
            .and_then(|l| l.trim().parse::<u8>().ok())
            .filter(|l| (1..=6).contains(l))
            .unwrap_or(2);
        return Some(level);
    }
    None
}

/// Label element associated with a form control (`label[for]` or wrapping label)
pub fn associated_label(doc: &Document, node: NodeId) -> Option<NodeId> {
    if let Some(id) = doc.element(node).and_then(|e| e.id()) {
        let by_for = query::elements_by_tag(doc, doc.tree().root(), "label")
            .into_iter()
            .find(|&label| doc.get_attribute(label, "for") == Some(id));
        if by_for.is_some() {
            return by_for;
        }
    }
    doc.tree().ancestors(node).find(|&id| doc.element(id).is_some_and(|e| e.is("label")))
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compute the accessible name of an element.
///
/// Order: aria-labelledby, aria-label, native text alternative (alt, value,
/// associated label), subtree text for roles named from content, title.
pub fn accessible_name(doc: &Document, node: NodeId) -> String {
    let Some(elem) = doc.element(node) else {
        return String::new();
    };

    if let Some(ids) = elem.get_attr("aria-labelledby") {
        let name = ids.split_whitespace()
            .filter_map(|id| doc.get_element_by_id(id))
            .map(|label| collapse(&doc.tree().text_content(label)))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !name.is_empty() {
            return name;
        }
    }

    if let Some(label) = elem.get_attr("aria-label").map(collapse).filter(|l| !l.is_empty()) {
        return label;
    }

    let native = match elem.tag.as_str() {
        "img" | "area" => elem.get_attr("alt").map(collapse),
        "input" if matches!(elem.get_attr("type"), Some("button" | "submit" | "reset" | "image")) => {
            elem.get_attr("value").or_else(|| elem.get_attr("alt")).map(collapse)
        }
        "input" | "select" | "textarea" => {
            associated_label(doc, node).map(|label| collapse(&doc.tree().text_content(label)))
        }
        _ => None,
    };
    if let Some(name) = native.filter(|n| !n.is_empty()) {
        return name;
    }

    if role_of(doc, node).is_some_and(|r| r.supports_name_from_content()) {
        let text = collapse(&doc.tree().text_content(node));
        if !text.is_empty() {
            return text;
        }
        // An image with alt text inside a button names the button
        let from_images = query::elements_by_tag(doc, node, "img")
            .into_iter()
            .filter_map(|img| doc.get_attribute(img, "alt").map(collapse))
            .filter(|alt| !alt.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !from_images.is_empty() {
            return from_images;
        }
    }

    elem.get_attr("title").map(collapse).unwrap_or_default()
}
