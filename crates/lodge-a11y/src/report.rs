//! Accessibility report
//!
//! Read-only scan of the document for common problems. Advisory only; the
//! score is `max(0, 100 - 10 * issues)`.

use lodge_dom::{Document, NodeId, query};
use serde::{Deserialize, Serialize};

use crate::aria::{self, AriaRole};
use crate::preferences::PreferenceSet;
use crate::Result;

/// Points lost per issue
const ISSUE_PENALTY: u32 = 10;

/// Issue category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IssueKind {
    MissingAlt,
    UnnamedButton,
    UnlabelledInput,
    HeadingJump,
}

impl IssueKind {
    fn recommendation(&self) -> &'static str {
        match self {
            Self::MissingAlt => "Add alt text to informative images, or alt=\"\" to decorative ones",
            Self::UnnamedButton => "Give every button visible text, aria-label or aria-labelledby",
            Self::UnlabelledInput => "Associate every form control with a <label> or aria-label",
            Self::HeadingJump => "Nest headings without skipping levels",
        }
    }
}

/// Report output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityReport {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
    pub preferences: PreferenceSet,
    pub issues: Vec<String>,
    pub score: u32,
    pub recommendations: Vec<String>,
}

impl AccessibilityReport {
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Short selector-like description for issue messages
fn describe(doc: &Document, node: NodeId) -> String {
    let Some(elem) = doc.element(node) else {
        return node.to_string();
    };
    let mut out = elem.tag.clone();
    if let Some(id) = elem.id() {
        out.push('#');
        out.push_str(id);
    } else if let Some(src) = elem.get_attr("src") {
        out.push_str(&format!("[src=\"{}\"]", src));
    } else if let Some(name) = elem.get_attr("name") {
        out.push_str(&format!("[name=\"{}\"]", name));
    }
    out
}

fn is_presentational(doc: &Document, node: NodeId) -> bool {
    aria::explicit_role(doc, node) == Some(AriaRole::Presentation)
}

fn is_button(doc: &Document, node: NodeId) -> bool {
    doc.element(node).is_some_and(|e| e.is("button")) || aria::explicit_role(doc, node) == Some(AriaRole::Button)
}

fn needs_label(doc: &Document, node: NodeId) -> bool {
    let Some(elem) = doc.element(node) else {
        return false;
    };
    match elem.tag.as_str() {
        "select" | "textarea" => true,
        "input" => !matches!(
            elem.get_attr("type").map(|t| t.to_ascii_lowercase()).as_deref(),
            Some("hidden" | "submit" | "button" | "reset" | "image")
        ),
        _ => false,
    }
}

fn has_label(doc: &Document, node: NodeId) -> bool {
    let labelled_by = doc.get_attribute(node, "aria-labelledby").is_some_and(|ids| {
        ids.split_whitespace().any(|id| doc.get_element_by_id(id).is_some())
    });
    labelled_by
        || doc.get_attribute(node, "aria-label").is_some_and(|l| !l.trim().is_empty())
        || aria::associated_label(doc, node).is_some()
}

/// Scan the document. Never mutates it.
pub fn generate_report(doc: &Document, preferences: PreferenceSet, timestamp_ms: u64) -> AccessibilityReport {
    let mut issues: Vec<(IssueKind, String)> = Vec::new();
    let mut previous_heading: Option<u8> = None;

    let root = doc.tree().root();
    for (node, _) in doc.tree().descendants(root) {
        let Some(elem) = doc.element(node) else {
            continue;
        };
        if query::is_hidden(doc, node) {
            continue;
        }

        if elem.is("img") && !elem.has_attr("alt") && !is_presentational(doc, node) {
            issues.push((IssueKind::MissingAlt, format!("Image without alt text: {}", describe(doc, node))));
        }

        if is_button(doc, node) && aria::accessible_name(doc, node).is_empty() {
            issues.push((IssueKind::UnnamedButton, format!("Button without accessible name: {}", describe(doc, node))));
        }

        if needs_label(doc, node) && !has_label(doc, node) {
            issues.push((IssueKind::UnlabelledInput, format!("Form control without label: {}", describe(doc, node))));
        }

        if let Some(level) = aria::heading_level(doc, node) {
            if let Some(prev) = previous_heading {
                if level > prev.saturating_add(1) {
                    issues.push((
                        IssueKind::HeadingJump,
                        format!("Heading level jumps from h{} to h{}: {}", prev, level, describe(doc, node)),
                    ));
                }
            }
            previous_heading = Some(level);
        }
    }

    let mut recommendations: Vec<String> = Vec::new();
    for kind in [IssueKind::MissingAlt, IssueKind::UnnamedButton, IssueKind::UnlabelledInput, IssueKind::HeadingJump] {
        if issues.iter().any(|(k, _)| *k == kind) {
            recommendations.push(kind.recommendation().to_string());
        }
    }
    if !preferences.show_focus_indicators {
        recommendations.push("Turn on focus indicators so keyboard users can see where they are".to_string());
    }
    if !preferences.announcements {
        recommendations.push("Turn on announcements so status changes reach screen readers".to_string());
    }

    let score = 100u32.saturating_sub(ISSUE_PENALTY.saturating_mul(issues.len() as u32));
    tracing::info!("Accessibility report: {} issues, score {}", issues.len(), score);

    AccessibilityReport {
        timestamp_ms,
        preferences,
        issues: issues.into_iter().map(|(_, text)| text).collect(),
        score,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_page_scores_100() {
        let mut doc = Document::default();
        let body = doc.body();
        let h1 = doc.append_element(body, "h1", &[]).unwrap();
        doc.append_text(h1, "Reservations").unwrap();
        let button = doc.append_element(body, "button", &[]).unwrap();
        doc.append_text(button, "New booking").unwrap();
        doc.append_element(body, "img", &[("src", "logo.png"), ("alt", "Lodge")]).unwrap();

        let report = generate_report(&doc, PreferenceSet::default(), 42);
        assert!(report.issues.is_empty(), "{:?}", report.issues);
        assert_eq!(report.score, 100);
        assert!(report.recommendations.is_empty());
        assert_eq!(report.timestamp_ms, 42);
    }

    #[test]
    fn test_each_issue_kind() {
        let mut doc = Document::default();
        let body = doc.body();
        doc.append_element(body, "img", &[("src", "room.jpg")]).unwrap();
        doc.append_element(body, "img", &[("src", "spacer.gif"), ("role", "presentation")]).unwrap();
        doc.append_element(body, "button", &[("id", "close")]).unwrap();
        doc.append_element(body, "input", &[("name", "email")]).unwrap();
        doc.append_element(body, "input", &[("type", "hidden"), ("name", "token")]).unwrap();
        doc.append_element(body, "h1", &[]).unwrap();
        doc.append_element(body, "h3", &[]).unwrap();

        let report = generate_report(&doc, PreferenceSet::default(), 0);
        assert_eq!(report.issues, vec![
            "Image without alt text: img[src=\"room.jpg\"]".to_string(),
            "Button without accessible name: button#close".to_string(),
            "Form control without label: input[name=\"email\"]".to_string(),
            "Heading level jumps from h1 to h3: h3".to_string(),
        ]);
        assert_eq!(report.score, 60);
        assert_eq!(report.recommendations.len(), 4);
    }

    #[test]
    fn test_score_floor() {
        let mut doc = Document::default();
        let body = doc.body();
        for _ in 0..12 {
            doc.append_element(body, "img", &[]).unwrap();
        }
        let report = generate_report(&doc, PreferenceSet::default(), 0);
        assert_eq!(report.issue_count(), 12);
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_preference_recommendations() {
        let doc = Document::default();
        let mut prefs = PreferenceSet::default();
        prefs.show_focus_indicators = false;
        prefs.announcements = false;
        let report = generate_report(&doc, prefs, 0);
        assert_eq!(report.recommendations.len(), 2);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_report_does_not_mutate() {
        let mut doc = Document::default();
        let body = doc.body();
        doc.append_element(body, "img", &[]).unwrap();
        doc.take_events();
        let before = doc.tree().len();
        generate_report(&doc, PreferenceSet::default(), 0);
        assert_eq!(doc.tree().len(), before);
        assert!(doc.events().is_empty());
    }

    #[test]
    fn test_serializes_camel_case_preferences() {
        let report = generate_report(&Document::default(), PreferenceSet::default(), 7);
        let json = report.to_json_pretty().unwrap();
        assert!(json.contains("\"timestamp_ms\": 7"));
        assert!(json.contains("\"highContrast\": false"));
    }
}
