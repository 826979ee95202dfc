//! Accessibility core
//!
//! Owns every component and is the single document-level key entry point.
//! Hosts call [`AccessibilityCore::handle_key`] for each key press and
//! [`AccessibilityCore::poll`] after advancing the document timeline.

use std::time::{SystemTime, UNIX_EPOCH};

use lodge_dom::{Document, KeyOutcome, KeyboardEvent, NodeId};

use crate::announcer::{Announcer, Priority};
use crate::config::A11yConfig;
use crate::detection::HostSignals;
use crate::focus_trap::{FocusTrapEngine, TrapId, TrapOptions};
use crate::hotkeys::{self, HotkeyAction, HotkeyMap};
use crate::landmarks::LandmarkRegistry;
use crate::preferences::{OsPreferences, PreferenceKey, PreferenceSet, PreferenceStore};
use crate::report::{self, AccessibilityReport};
use crate::speech::SpeechBridge;
use crate::storage::PreferenceStorage;
use crate::Result;

/// Accessibility core
pub struct AccessibilityCore {
    config: A11yConfig,
    preferences: PreferenceStore,
    landmarks: LandmarkRegistry,
    announcer: Announcer,
    traps: FocusTrapEngine,
    hotkeys: HotkeyMap,
    last_report: Option<AccessibilityReport>,
}

impl AccessibilityCore {
    /// Build the core; fails only on an invalid configuration
    pub fn new(config: A11yConfig, storage: Box<dyn PreferenceStorage>, os: OsPreferences) -> Result<Self> {
        config.validate()?;
        let preferences = PreferenceStore::load(storage, &config.storage_key, os);
        let announcer = Announcer::new(&config);
        Ok(Self {
            config,
            preferences,
            landmarks: LandmarkRegistry::new(),
            announcer,
            traps: FocusTrapEngine::new(),
            hotkeys: HotkeyMap::default(),
            last_report: None,
        })
    }

    /// Route spoken announcements through a speech bridge
    pub fn with_speech(mut self, speech: Box<dyn SpeechBridge>) -> Self {
        self.announcer = self.announcer.with_speech(speech);
        self
    }

    /// Replace the hotkey bindings
    pub fn with_hotkeys(mut self, hotkeys: HotkeyMap) -> Self {
        self.hotkeys = hotkeys;
        self
    }

    /// First load: flag the stored preferences on the root, create the live
    /// region and register the page's landmarks.
    pub fn attach(&mut self, doc: &mut Document) {
        self.preferences.apply(doc);
        if let Err(e) = self.announcer.live_region(doc) {
            tracing::warn!("Could not create live region: {}", e);
        }
        let body = doc.body();
        let found = self.landmarks.discover(doc, body);
        tracing::info!("Accessibility core attached to {} ({} landmarks)", doc.url(), found);
    }

    pub fn config(&self) -> &A11yConfig {
        &self.config
    }

    // === Preferences ===

    pub fn preferences(&self) -> PreferenceSet {
        self.preferences.get()
    }

    pub fn set_preference(&mut self, doc: &mut Document, key: PreferenceKey, value: bool) {
        self.preferences.set(doc, key, value);
    }

    /// Flip a preference and announce its new state
    pub fn toggle_preference(&mut self, doc: &mut Document, key: PreferenceKey) -> bool {
        let value = self.preferences.toggle(doc, key);
        let state = if value { "enabled" } else { "disabled" };
        self.announce(doc, &format!("{} {}", key.label(), state), Priority::Polite);
        value
    }

    pub fn reset_preferences(&mut self, doc: &mut Document) {
        self.preferences.reset(doc);
    }

    // === Announcements ===

    pub fn announce(&mut self, doc: &mut Document, text: &str, priority: Priority) -> Option<NodeId> {
        let prefs = self.preferences.get();
        self.announcer.announce(doc, &prefs, text, priority)
    }

    pub fn announcer(&self) -> &Announcer {
        &self.announcer
    }

    pub fn announcer_mut(&mut self) -> &mut Announcer {
        &mut self.announcer
    }

    /// Update the signals used for assistive-technology detection
    pub fn set_host_signals(&mut self, doc: &Document, signals: HostSignals) -> bool {
        self.announcer.set_host_signals(signals);
        let prefs = self.preferences.get();
        self.announcer.detect_now(doc, &prefs)
    }

    // === Landmarks ===

    pub fn landmarks(&self) -> &LandmarkRegistry {
        &self.landmarks
    }

    pub fn landmarks_mut(&mut self) -> &mut LandmarkRegistry {
        &mut self.landmarks
    }

    pub fn navigate_to(&mut self, doc: &mut Document, role: &str) -> bool {
        self.landmarks.navigate_to(doc, role)
    }

    // === Focus traps ===

    pub fn traps(&self) -> &FocusTrapEngine {
        &self.traps
    }

    pub fn open_trap(&mut self, doc: &mut Document, container: NodeId, options: TrapOptions) -> TrapId {
        self.traps.open(doc, container, options)
    }

    pub fn release_trap(&mut self, doc: &mut Document, id: TrapId) -> bool {
        self.traps.release(doc, id)
    }

    // === Report ===

    /// Scan the document, log the report and keep it as the latest
    pub fn generate_report(&mut self, doc: &Document) -> AccessibilityReport {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let report = report::generate_report(doc, self.preferences.get(), timestamp_ms);
        for issue in &report.issues {
            tracing::info!("a11y issue: {}", issue);
        }
        self.last_report = Some(report.clone());
        report
    }

    pub fn last_report(&self) -> Option<&AccessibilityReport> {
        self.last_report.as_ref()
    }

    // === Event loop ===

    /// Document-level key handler.
    ///
    /// Focus traps see the key first; then hotkeys unless the press is typing
    /// inside a text-entry control. Never fails.
    pub fn handle_key(&mut self, doc: &mut Document, event: &KeyboardEvent) -> KeyOutcome {
        if self.traps.handle_key(doc, event).is_handled() {
            return KeyOutcome::Handled;
        }
        if !self.config.hotkeys_enabled || hotkeys::is_typing(doc, event) {
            return KeyOutcome::Ignored;
        }
        match self.hotkeys.lookup(event) {
            Some(action) => self.run(doc, action),
            None => KeyOutcome::Ignored,
        }
    }

    fn run(&mut self, doc: &mut Document, action: HotkeyAction) -> KeyOutcome {
        tracing::debug!("Hotkey action {:?}", action);
        match action {
            HotkeyAction::Toggle(key) => {
                self.toggle_preference(doc, key);
            }
            HotkeyAction::Report => {
                let report = self.generate_report(doc);
                let text = format!(
                    "Accessibility score {} out of 100, {} issues found",
                    report.score,
                    report.issue_count()
                );
                self.announce(doc, &text, Priority::Polite);
            }
            HotkeyAction::CloseTrap => {
                if !self.traps.escape(doc) {
                    return KeyOutcome::Ignored;
                }
            }
            HotkeyAction::NextLandmark | HotkeyAction::PreviousLandmark => {
                if !self.preferences.is_enabled(PreferenceKey::KeyboardNavigation) {
                    return KeyOutcome::Ignored;
                }
                let reached = if action == HotkeyAction::NextLandmark {
                    self.landmarks.next(doc)
                } else {
                    self.landmarks.previous(doc)
                };
                let Some(entry) = reached else {
                    return KeyOutcome::Ignored;
                };
                let prefs = self.preferences.get();
                self.announcer.announce_navigation(doc, &prefs, &entry.label);
            }
        }
        KeyOutcome::Handled
    }

    /// Timer turn: expire announcements and unmounted landmarks, then
    /// re-check assistive technology.
    /// Returns the number of announcement nodes removed.
    pub fn poll(&mut self, doc: &mut Document) -> usize {
        let prefs = self.preferences.get();
        self.landmarks.prune(doc);
        self.announcer.poll(doc, &prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn core() -> AccessibilityCore {
        AccessibilityCore::new(A11yConfig::default(), Box::new(MemoryStorage::new()), OsPreferences::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = A11yConfig::default().with_dwell_ms(0);
        assert!(AccessibilityCore::new(config, Box::new(MemoryStorage::new()), OsPreferences::default()).is_err());
    }

    #[test]
    fn test_toggle_hotkey_announces() {
        let mut doc = Document::default();
        let mut core = core();
        core.attach(&mut doc);

        let event = KeyboardEvent::parse("Alt+H", doc.active_element());
        assert_eq!(core.handle_key(&mut doc, &event), KeyOutcome::Handled);
        assert!(core.preferences().high_contrast);
        let node = core.announcer().pending_nodes()[0];
        assert_eq!(doc.tree().text_content(node), "High contrast enabled");
    }

    #[test]
    fn test_unbound_key_ignored() {
        let mut doc = Document::default();
        let mut core = core();
        let event = KeyboardEvent::parse("Alt+Z", doc.active_element());
        assert_eq!(core.handle_key(&mut doc, &event), KeyOutcome::Ignored);
    }

    #[test]
    fn test_hotkeys_disabled_by_config() {
        let mut doc = Document::default();
        let config = A11yConfig::default().with_hotkeys(false);
        let mut core = AccessibilityCore::new(config, Box::new(MemoryStorage::new()), OsPreferences::default()).unwrap();
        let event = KeyboardEvent::parse("Alt+H", doc.active_element());
        assert_eq!(core.handle_key(&mut doc, &event), KeyOutcome::Ignored);
        assert!(!core.preferences().high_contrast);
    }

    #[test]
    fn test_report_hotkey_keeps_report() {
        let mut doc = Document::default();
        let body = doc.body();
        doc.append_element(body, "img", &[]).unwrap();
        let mut core = core();
        let event = KeyboardEvent::parse("Alt+R", doc.active_element());
        core.handle_key(&mut doc, &event);
        assert_eq!(core.last_report().map(|r| r.score), Some(90));
    }

    #[test]
    fn test_report_hotkey_with_out_of_range_heading() {
        let mut doc = Document::default();
        let body = doc.body();
        let heading = doc.append_element(body, "div", &[("role", "heading"), ("aria-level", "255")]).unwrap();
        doc.append_text(heading, "Rates").unwrap();
        let h2 = doc.append_element(body, "h2", &[]).unwrap();
        doc.append_text(h2, "Seasons").unwrap();
        let mut core = core();

        let event = KeyboardEvent::parse("Alt+R", doc.active_element());
        assert_eq!(core.handle_key(&mut doc, &event), KeyOutcome::Handled);
        let report = core.last_report().unwrap();
        assert!(report.issues.is_empty(), "{:?}", report.issues);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_poll_drops_unmounted_landmarks() {
        let mut doc = Document::default();
        let body = doc.body();
        let aside = doc.append_element(body, "aside", &[("aria-label", "Room filters")]).unwrap();
        doc.append_element(body, "main", &[]).unwrap();
        let mut core = core();
        core.attach(&mut doc);
        assert_eq!(core.landmarks().len(), 2);

        doc.remove(aside).unwrap();
        core.poll(&mut doc);
        assert!(core.landmarks().get("complementary").is_none());
        assert_eq!(core.landmarks().len(), 1);
    }
}
