//! Edge case tests for lodge-html
//!
//! Malformed markup and the pages the accessibility core expects to load.

use lodge_dom::query;
use lodge_html::HtmlParser;

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_parse_empty_has_body() {
    let doc = HtmlParser::new().parse("").unwrap();
    assert!(doc.is_connected(doc.body()));
    assert!(doc.is_connected(doc.head()));
}

#[test]
fn test_parse_only_whitespace() {
    let doc = HtmlParser::new().parse("   \t\n\r\n   ").unwrap();
    assert_eq!(doc.tree().text_content(doc.body()), "");
}

#[test]
fn test_parse_only_doctype() {
    let doc = HtmlParser::new().parse("<!DOCTYPE html>").unwrap();
    assert!(doc.tree().len() >= 4);
}

// ============================================================================
// MALFORMED HTML
// ============================================================================

#[test]
fn test_parse_unclosed_tags() {
    let doc = HtmlParser::new().parse("<div><p><span>text").unwrap();
    assert_eq!(doc.tree().text_content(doc.body()), "text");
}

#[test]
fn test_parse_mismatched_tags() {
    let doc = HtmlParser::new().parse("<div><p></div></p>").unwrap();
    assert!(doc.tree().len() > 4);
}

// ============================================================================
// HOTEL PAGES
// ============================================================================

#[test]
fn test_reservation_form_tab_order() {
    let html = r#"
        <!DOCTYPE html>
        <html>
            <head><title>New reservation</title></head>
            <body>
                <form id="booking">
                    <label for="guest">Guest</label>
                    <input id="guest" name="guest">
                    <input type="hidden" name="token" value="x">
                    <select id="room"><option>101</option></select>
                    <button type="submit" disabled>Book</button>
                    <a href="/rooms">Rooms</a>
                </form>
            </body>
        </html>
    "#;
    let doc = HtmlParser::new().parse_with_url(html, "https://lodge.example/reservations/new").unwrap();

    let form = doc.get_element_by_id("booking").unwrap();
    let order = query::focusable_descendants(&doc, form);
    let tags: Vec<&str> = order.iter()
        .filter_map(|&id| doc.element(id))
        .map(|e| e.tag.as_str())
        .collect();
    assert_eq!(tags, vec!["input", "select", "a"]);
    assert_eq!(doc.url(), "https://lodge.example/reservations/new");
}

#[test]
fn test_live_region_found() {
    let html = r#"<body><div id="a11y-live-announcer" aria-live="polite" class="sr-only"></div></body>"#;
    let doc = HtmlParser::new().parse(html).unwrap();
    assert!(query::find_live_region(&doc, "a11y-live-announcer").is_some());
}

#[test]
fn test_uppercase_tags_normalised() {
    let doc = HtmlParser::new().parse("<MAIN><BUTTON>Check in</BUTTON></MAIN>").unwrap();
    let buttons = query::elements_by_tag(&doc, doc.body(), "button");
    assert_eq!(buttons.len(), 1);
    assert!(query::is_tabbable(&doc, buttons[0]));
}
