//! Global hotkeys
//!
//! Document-level Alt+key bindings for the accessibility toggles. Bindings
//! are data; [`AccessibilityCore`](crate::AccessibilityCore) runs the actions.

use std::fmt;

use lodge_dom::{Document, Key, KeyboardEvent, Modifiers, query};

use crate::preferences::PreferenceKey;

/// What a hotkey does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    /// Flip a preference and announce the new state
    Toggle(PreferenceKey),
    /// Generate, log and announce the accessibility report
    Report,
    /// Release the topmost focus trap
    CloseTrap,
    NextLandmark,
    PreviousLandmark,
}

/// Key plus modifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl Hotkey {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Parse a chord such as "Alt+H" or "F6"
    pub fn parse(chord: &str) -> Self {
        let event = KeyboardEvent::parse(chord, lodge_dom::NodeId::NONE);
        Self { key: event.key, modifiers: event.modifiers }
    }

    /// Letters match regardless of case
    pub fn matches(&self, event: &KeyboardEvent) -> bool {
        let same_key = match (&self.key, &event.key) {
            (Key::Char(a), Key::Char(b)) => a.eq_ignore_ascii_case(b),
            (a, b) => a == b,
        };
        same_key && self.modifiers == event.modifiers
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl { f.write_str("Ctrl+")?; }
        if self.modifiers.alt { f.write_str("Alt+")?; }
        if self.modifiers.shift { f.write_str("Shift+")?; }
        if self.modifiers.meta { f.write_str("Meta+")?; }
        match &self.key {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            key => f.write_str(&key.name()),
        }
    }
}

/// Hotkey bindings
#[derive(Debug, Clone)]
pub struct HotkeyMap {
    bindings: Vec<(Hotkey, HotkeyAction)>,
}

impl Default for HotkeyMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(Hotkey::parse("Alt+A"), HotkeyAction::Toggle(PreferenceKey::Announcements));
        map.bind(Hotkey::parse("Alt+H"), HotkeyAction::Toggle(PreferenceKey::HighContrast));
        map.bind(Hotkey::parse("Alt+M"), HotkeyAction::Toggle(PreferenceKey::ReducedMotion));
        map.bind(Hotkey::parse("Alt+L"), HotkeyAction::Toggle(PreferenceKey::LargeText));
        map.bind(Hotkey::parse("Alt+K"), HotkeyAction::Toggle(PreferenceKey::KeyboardNavigation));
        map.bind(Hotkey::parse("Alt+R"), HotkeyAction::Report);
        map.bind(Hotkey::parse("Escape"), HotkeyAction::CloseTrap);
        map.bind(Hotkey::parse("F6"), HotkeyAction::NextLandmark);
        map.bind(Hotkey::parse("F7"), HotkeyAction::PreviousLandmark);
        map
    }
}

impl HotkeyMap {
    /// Map with no bindings
    pub fn empty() -> Self {
        Self { bindings: Vec::new() }
    }

    /// Bind a hotkey, replacing whatever it was bound to
    pub fn bind(&mut self, hotkey: Hotkey, action: HotkeyAction) {
        self.bindings.retain(|(h, _)| *h != hotkey);
        self.bindings.push((hotkey, action));
    }

    /// Move an action to a new hotkey
    pub fn rebind(&mut self, action: HotkeyAction, hotkey: Hotkey) {
        self.unbind(action);
        self.bind(hotkey, action);
    }

    /// Drop every binding for an action
    pub fn unbind(&mut self, action: HotkeyAction) {
        self.bindings.retain(|(_, a)| *a != action);
    }

    /// Action bound to the pressed keys
    pub fn lookup(&self, event: &KeyboardEvent) -> Option<HotkeyAction> {
        self.bindings.iter()
            .find(|(hotkey, _)| hotkey.matches(event))
            .map(|(_, action)| *action)
    }

    /// Hotkey bound to an action
    pub fn hotkey_for(&self, action: HotkeyAction) -> Option<&Hotkey> {
        self.bindings.iter().find(|(_, a)| *a == action).map(|(h, _)| h)
    }

    pub fn bindings(&self) -> &[(Hotkey, HotkeyAction)] {
        &self.bindings
    }
}

/// A modifier+character chord typed into a text-entry control belongs to
/// the control, not to the hotkeys.
pub fn is_typing(doc: &Document, event: &KeyboardEvent) -> bool {
    matches!(event.key, Key::Char(_)) && query::is_text_entry(doc, event.target)
}
