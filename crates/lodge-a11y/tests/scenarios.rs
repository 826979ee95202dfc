//! Scenario tests - Accessibility core driven end to end
//!
//! Pages are loaded through lodge-html, then driven with key presses and
//! timeline advances the way a host would.

use std::time::Duration;

use lodge_a11y::{
    A11yConfig, AccessibilityCore, FileStorage, FocusTrapEngine, HostSignals, MemoryStorage,
    NavigationGroup, Orientation, OsPreferences, PreferenceKey, PreferenceSet, PreferenceStorage,
    PreferenceStore, Priority, RecordingSpeech, TrapOptions, generate_report,
};
use lodge_a11y::config::DEFAULT_STORAGE_KEY;
use lodge_dom::{Document, KeyOutcome, KeyboardEvent, NodeId};

const FRONT_DESK: &str = r#"
    <!DOCTYPE html>
    <html>
        <head><title>Front desk</title></head>
        <body>
            <header><a href="/">Lodge</a></header>
            <nav aria-label="Main menu">
                <a href="/rooms">Rooms</a>
                <a href="/guests">Guests</a>
            </nav>
            <main>
                <h1>Arrivals</h1>
                <input id="search" type="search" aria-label="Find guest">
                <button id="checkin">Check in</button>
            </main>
            <div id="dialog" role="dialog" aria-modal="true">
                <button id="d-first">Confirm</button>
                <input id="d-notes" aria-label="Notes">
                <button id="d-last">Cancel</button>
            </div>
            <footer>Lodge PMS</footer>
        </body>
    </html>
"#;

fn load(html: &str) -> Document {
    lodge_html::parse(html).expect("page should parse")
}

fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id).unwrap_or_else(|| panic!("missing #{}", id))
}

fn core() -> AccessibilityCore {
    AccessibilityCore::new(A11yConfig::default(), Box::new(MemoryStorage::new()), OsPreferences::default()).unwrap()
}

fn press(core: &mut AccessibilityCore, doc: &mut Document, chord: &str) -> KeyOutcome {
    let event = KeyboardEvent::parse(chord, doc.active_element());
    core.handle_key(doc, &event)
}

// ============================================================================
// PREFERENCES
// ============================================================================

#[test]
fn test_preferences_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let mut doc = load(FRONT_DESK);

    let mut store = PreferenceStore::load(Box::new(FileStorage::new(&path)), DEFAULT_STORAGE_KEY, OsPreferences::default());
    store.set(&mut doc, PreferenceKey::HighContrast, true);
    store.set(&mut doc, PreferenceKey::Announcements, false);
    let saved = store.get();

    let reloaded = PreferenceStore::load(Box::new(FileStorage::new(&path)), DEFAULT_STORAGE_KEY, OsPreferences::default());
    assert_eq!(reloaded.get(), saved);
    assert!(reloaded.is_enabled(PreferenceKey::HighContrast));
    assert!(!reloaded.is_enabled(PreferenceKey::Announcements));
}

#[test]
fn test_reset_restores_defaults_and_markers() {
    let mut doc = load(FRONT_DESK);
    let root = doc.document_element();
    let mut store = PreferenceStore::load(Box::new(MemoryStorage::new()), DEFAULT_STORAGE_KEY, OsPreferences::default());

    store.set(&mut doc, PreferenceKey::LargeText, true);
    store.set(&mut doc, PreferenceKey::ShowFocusIndicators, false);
    assert!(doc.has_class(root, "large-text"));
    assert!(!doc.has_class(root, "show-focus"));

    store.reset(&mut doc);
    assert_eq!(store.get(), PreferenceSet::default());
    assert!(!doc.has_class(root, "large-text"));
    assert!(doc.has_class(root, "show-focus"));
}

#[test]
fn test_malformed_blob_falls_back_to_defaults() {
    let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, "not json");
    let store = PreferenceStore::load(Box::new(storage), DEFAULT_STORAGE_KEY, OsPreferences::default());
    assert_eq!(store.get(), PreferenceSet::default());
}

#[test]
fn test_os_preferences_seed_missing_keys() {
    let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, r#"{"largeText": true, "version": 1}"#);
    let os = OsPreferences { prefers_contrast: true, prefers_reduced_motion: false };
    let store = PreferenceStore::load(Box::new(storage), DEFAULT_STORAGE_KEY, os);
    assert!(store.is_enabled(PreferenceKey::LargeText));
    assert!(store.is_enabled(PreferenceKey::HighContrast));
    assert!(!store.is_enabled(PreferenceKey::ReducedMotion));
}

#[test]
fn test_file_storage_blob_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("prefs.json");
    let mut doc = Document::default();
    let mut store = PreferenceStore::load(Box::new(FileStorage::new(&path)), DEFAULT_STORAGE_KEY, OsPreferences::default());
    store.toggle(&mut doc, PreferenceKey::ReducedMotion);

    let blob = FileStorage::new(&path).get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(value["reducedMotion"], serde_json::Value::Bool(true));
    assert_eq!(value["version"], serde_json::Value::from(1));
}

// ============================================================================
// KEYBOARD NAVIGATION
// ============================================================================

#[test]
fn test_looping_group_returns_to_start() {
    let mut doc = load(FRONT_DESK);
    let nav = doc.tree().descendants(doc.body())
        .find(|(id, _)| doc.element(*id).is_some_and(|e| e.is("nav")))
        .map(|(id, _)| id)
        .unwrap();
    let mut group = NavigationGroup::from_container(&doc, nav, Orientation::Horizontal).looping(true);
    let start = group.active_index();

    for _ in 0..group.len() {
        group.next(&mut doc);
    }
    assert_eq!(group.active_index(), start);
    assert_eq!(doc.focused(), group.active_item());
}

#[test]
fn test_non_looping_group_stays_at_edge() {
    let mut doc = load(FRONT_DESK);
    let main = by_id(&doc, "checkin");
    let search = by_id(&doc, "search");
    let mut group = NavigationGroup::new(vec![search, main], Orientation::Vertical);

    group.last(&mut doc);
    let down = KeyboardEvent::parse("ArrowDown", main);
    assert_eq!(group.handle_key(&mut doc, &down), KeyOutcome::Handled);
    assert_eq!(group.active_index(), Some(1));

    group.first(&mut doc);
    assert!(!group.previous(&mut doc));
    assert_eq!(group.active_index(), Some(0));
}

// ============================================================================
// FOCUS TRAPS
// ============================================================================

#[test]
fn test_trap_wraps_tab_and_shift_tab() {
    let mut doc = load(FRONT_DESK);
    let dialog = by_id(&doc, "dialog");
    let (first, last) = (by_id(&doc, "d-first"), by_id(&doc, "d-last"));
    let mut traps = FocusTrapEngine::new();
    traps.open(&mut doc, dialog, TrapOptions::new());
    assert_eq!(doc.focused(), Some(first));

    doc.focus(last);
    let tab = KeyboardEvent::parse("Tab", last);
    assert_eq!(traps.handle_key(&mut doc, &tab), KeyOutcome::Handled);
    assert_eq!(doc.focused(), Some(first));

    let back = KeyboardEvent::parse("Shift+Tab", first);
    assert_eq!(traps.handle_key(&mut doc, &back), KeyOutcome::Handled);
    assert_eq!(doc.focused(), Some(last));
}

#[test]
fn test_release_restores_focus_once() {
    let mut doc = load(FRONT_DESK);
    let opener = by_id(&doc, "checkin");
    let dialog = by_id(&doc, "dialog");
    doc.focus(opener);

    let mut traps = FocusTrapEngine::new();
    let id = traps.open(&mut doc, dialog, TrapOptions::new());
    assert!(traps.release(&mut doc, id));
    assert_eq!(doc.focused(), Some(opener));

    let search = by_id(&doc, "search");
    doc.focus(search);
    assert!(!traps.release(&mut doc, id));
    assert_eq!(doc.focused(), Some(search));
}

#[test]
fn test_nested_traps_restore_in_order() {
    let mut doc = load(FRONT_DESK);
    let opener = by_id(&doc, "checkin");
    let dialog = by_id(&doc, "dialog");
    let notes = by_id(&doc, "d-notes");
    let inner = doc.append_element(dialog, "div", &[("role", "alertdialog")]).unwrap();
    let ok = doc.append_element(inner, "button", &[("id", "inner-ok")]).unwrap();
    doc.focus(opener);

    let mut traps = FocusTrapEngine::new();
    let a = traps.open(&mut doc, dialog, TrapOptions::new().initial_focus(notes));
    assert_eq!(doc.focused(), Some(notes));
    let b = traps.open(&mut doc, inner, TrapOptions::new());
    assert_eq!(doc.focused(), Some(ok));
    assert_eq!(traps.depth(), 2);

    // Tab inside B stays in B
    let tab = KeyboardEvent::parse("Tab", ok);
    assert_eq!(traps.handle_key(&mut doc, &tab), KeyOutcome::Handled);
    assert_eq!(doc.focused(), Some(ok));

    traps.release(&mut doc, b);
    assert_eq!(doc.focused(), Some(notes));
    traps.release(&mut doc, a);
    assert_eq!(doc.focused(), Some(opener));
    assert!(!traps.is_active());
}

#[test]
fn test_escape_needs_opt_in() {
    let mut doc = load(FRONT_DESK);
    let dialog = by_id(&doc, "dialog");
    let mut core = core();
    core.attach(&mut doc);

    core.open_trap(&mut doc, dialog, TrapOptions::new());
    assert_eq!(press(&mut core, &mut doc, "Escape"), KeyOutcome::Ignored);
    assert!(core.traps().is_active());

    core.open_trap(&mut doc, dialog, TrapOptions::new().escape_closes(true));
    assert_eq!(press(&mut core, &mut doc, "Escape"), KeyOutcome::Handled);
    assert_eq!(core.traps().depth(), 1);
}

// ============================================================================
// ANNOUNCEMENTS
// ============================================================================

#[test]
fn test_repeated_announcements_get_distinct_nodes() {
    let mut doc = load(FRONT_DESK);
    let mut core = core();
    core.attach(&mut doc);

    let a = core.announce(&mut doc, "Room 12 ready", Priority::Polite).unwrap();
    let b = core.announce(&mut doc, "Room 12 ready", Priority::Polite).unwrap();
    assert_ne!(a, b);
    assert_eq!(doc.tree().text_content(a), doc.tree().text_content(b));
    assert_eq!(core.announcer().pending_nodes(), vec![a, b]);
}

#[test]
fn test_announcements_expire_after_dwell() {
    let mut doc = load(FRONT_DESK);
    let mut core = core();
    core.attach(&mut doc);

    let node = core.announce(&mut doc, "Payment received", Priority::Assertive).unwrap();
    doc.advance(Duration::from_millis(999));
    assert_eq!(core.poll(&mut doc), 0);
    assert!(doc.is_connected(node));

    doc.advance(Duration::from_millis(1));
    assert_eq!(core.poll(&mut doc), 1);
    assert!(!doc.is_connected(node));
    assert_eq!(core.announcer().pending(), 0);
}

#[test]
fn test_announcements_off_inserts_nothing() {
    let mut doc = load(FRONT_DESK);
    let mut core = core();
    core.attach(&mut doc);
    core.set_preference(&mut doc, PreferenceKey::Announcements, false);
    let before = doc.connected_len();

    assert!(core.announce(&mut doc, "Checked in", Priority::Polite).is_none());
    assert_eq!(doc.connected_len(), before);
}

#[test]
fn test_speech_follows_detection() {
    let mut doc = load(FRONT_DESK);
    let speech = RecordingSpeech::new();
    let mut core = core().with_speech(Box::new(speech.clone()));
    core.attach(&mut doc);

    core.announce(&mut doc, "Silent", Priority::Polite);
    assert!(speech.spoken().is_empty());

    assert!(core.set_host_signals(&doc, HostSignals::new("Mozilla/5.0 NVDA/2024.1")));
    core.announce(&mut doc, "Error: card declined", Priority::Assertive);
    assert_eq!(speech.spoken(), vec![("Error: card declined".to_string(), Priority::Assertive)]);
    assert_eq!(speech.cancels(), 1);
}

// ============================================================================
// LANDMARKS AND HOTKEYS
// ============================================================================

#[test]
fn test_unknown_landmark_is_noop() {
    let mut doc = load(FRONT_DESK);
    let mut core = core();
    core.attach(&mut doc);
    doc.take_events();
    let focused = doc.focused();

    assert!(!core.navigate_to(&mut doc, "search"));
    assert_eq!(doc.focused(), focused);
    assert!(doc.events().is_empty());
}

#[test]
fn test_f6_cycles_landmarks() {
    let mut doc = load(FRONT_DESK);
    let mut core = core();
    core.attach(&mut doc);
    let roles: Vec<String> = core.landmarks().list().into_iter().map(|e| e.role).collect();
    assert_eq!(roles, ["banner", "navigation", "main", "contentinfo"]);

    assert_eq!(press(&mut core, &mut doc, "F6"), KeyOutcome::Handled);
    assert_eq!(press(&mut core, &mut doc, "F6"), KeyOutcome::Handled);
    let nodes = core.announcer().pending_nodes();
    let last = *nodes.last().unwrap();
    assert_eq!(doc.tree().text_content(last), "Navigated to Main menu");
}

#[test]
fn test_hotkeys_ignored_while_typing() {
    let mut doc = load(FRONT_DESK);
    let search = by_id(&doc, "search");
    let mut core = core();
    core.attach(&mut doc);
    doc.focus(search);

    assert_eq!(press(&mut core, &mut doc, "Alt+H"), KeyOutcome::Ignored);
    assert!(!core.preferences().high_contrast);

    doc.focus(by_id(&doc, "checkin"));
    assert_eq!(press(&mut core, &mut doc, "Alt+H"), KeyOutcome::Handled);
    assert!(core.preferences().high_contrast);
    assert!(doc.has_class(doc.document_element(), "high-contrast"));
}

// ============================================================================
// REPORT
// ============================================================================

#[test]
fn test_report_score_formula() {
    let doc = load(r#"
        <body>
            <h1>Rooms</h1>
            <h4>Suites</h4>
            <img src="suite.jpg">
            <button></button>
            <select name="floor"></select>
        </body>
    "#);
    let report = generate_report(&doc, PreferenceSet::default(), 0);
    assert_eq!(report.issue_count(), 4);
    assert_eq!(report.score, 60);
}

#[test]
fn test_front_desk_page_is_clean() {
    let mut doc = load(FRONT_DESK);
    let mut core = core();
    core.attach(&mut doc);
    let report = core.generate_report(&doc);
    assert!(report.issues.is_empty(), "{:?}", report.issues);
    assert_eq!(report.score, 100);
}
