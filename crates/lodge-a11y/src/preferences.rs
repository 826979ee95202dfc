//! Accessibility preferences
//!
//! The single owner of the user's accessibility toggles. Every mutation goes
//! through [`PreferenceStore::set`], which flags the change on the document
//! root and persists the blob in the same call.

use std::fmt;
use std::str::FromStr;

use lodge_dom::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::PreferenceStorage;
use crate::{A11yError, Result};

/// Version written into the persisted blob
pub const BLOB_VERSION: u64 = 1;

/// Preference key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    HighContrast,
    ReducedMotion,
    LargeText,
    KeyboardNavigation,
    ShowFocusIndicators,
    Announcements,
    AutoSkipLinks,
    ScreenReader,
}

impl PreferenceKey {
    /// Every key, in blob order
    pub const ALL: [PreferenceKey; 8] = [
        Self::HighContrast,
        Self::ReducedMotion,
        Self::LargeText,
        Self::KeyboardNavigation,
        Self::ShowFocusIndicators,
        Self::Announcements,
        Self::AutoSkipLinks,
        Self::ScreenReader,
    ];

    /// camelCase name used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighContrast => "highContrast",
            Self::ReducedMotion => "reducedMotion",
            Self::LargeText => "largeText",
            Self::KeyboardNavigation => "keyboardNavigation",
            Self::ShowFocusIndicators => "showFocusIndicators",
            Self::Announcements => "announcements",
            Self::AutoSkipLinks => "autoSkipLinks",
            Self::ScreenReader => "screenReader",
        }
    }

    /// Human-readable name for announcements
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighContrast => "High contrast",
            Self::ReducedMotion => "Reduced motion",
            Self::LargeText => "Large text",
            Self::KeyboardNavigation => "Keyboard navigation",
            Self::ShowFocusIndicators => "Focus indicators",
            Self::Announcements => "Announcements",
            Self::AutoSkipLinks => "Skip links",
            Self::ScreenReader => "Screen reader mode",
        }
    }

    /// Compiled-in default
    pub fn default_value(&self) -> bool {
        matches!(self,
            Self::KeyboardNavigation | Self::ShowFocusIndicators |
            Self::Announcements | Self::AutoSkipLinks
        )
    }

    /// Class flagged on the root element while the preference is on
    pub fn marker_class(&self) -> Option<&'static str> {
        match self {
            Self::HighContrast => Some("high-contrast"),
            Self::ReducedMotion => Some("reduced-motion"),
            Self::LargeText => Some("large-text"),
            Self::ShowFocusIndicators => Some("show-focus"),
            _ => None,
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceKey {
    type Err = A11yError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL.into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| A11yError::UnknownPreference(s.to_string()))
    }
}

/// The full set of accessibility toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSet {
    pub high_contrast: bool,
    pub reduced_motion: bool,
    pub large_text: bool,
    pub keyboard_navigation: bool,
    pub show_focus_indicators: bool,
    pub announcements: bool,
    pub auto_skip_links: bool,
    pub screen_reader: bool,
}

impl Default for PreferenceSet {
    fn default() -> Self {
        let mut set = Self {
            high_contrast: false,
            reduced_motion: false,
            large_text: false,
            keyboard_navigation: false,
            show_focus_indicators: false,
            announcements: false,
            auto_skip_links: false,
            screen_reader: false,
        };
        for key in PreferenceKey::ALL {
            set.set(key, key.default_value());
        }
        set
    }
}

impl PreferenceSet {
    pub fn get(&self, key: PreferenceKey) -> bool {
        match key {
            PreferenceKey::HighContrast => self.high_contrast,
            PreferenceKey::ReducedMotion => self.reduced_motion,
            PreferenceKey::LargeText => self.large_text,
            PreferenceKey::KeyboardNavigation => self.keyboard_navigation,
            PreferenceKey::ShowFocusIndicators => self.show_focus_indicators,
            PreferenceKey::Announcements => self.announcements,
            PreferenceKey::AutoSkipLinks => self.auto_skip_links,
            PreferenceKey::ScreenReader => self.screen_reader,
        }
    }

    pub fn set(&mut self, key: PreferenceKey, value: bool) {
        let slot = match key {
            PreferenceKey::HighContrast => &mut self.high_contrast,
            PreferenceKey::ReducedMotion => &mut self.reduced_motion,
            PreferenceKey::LargeText => &mut self.large_text,
            PreferenceKey::KeyboardNavigation => &mut self.keyboard_navigation,
            PreferenceKey::ShowFocusIndicators => &mut self.show_focus_indicators,
            PreferenceKey::Announcements => &mut self.announcements,
            PreferenceKey::AutoSkipLinks => &mut self.auto_skip_links,
            PreferenceKey::ScreenReader => &mut self.screen_reader,
        };
        *slot = value;
    }

    /// Build a set from a per-key function
    pub fn from_fn(f: impl Fn(PreferenceKey) -> bool) -> Self {
        let mut set = Self::default();
        for key in PreferenceKey::ALL {
            set.set(key, f(key));
        }
        set
    }

    /// Serialize to the persisted blob (camelCase keys plus `version`)
    pub fn to_blob(&self) -> Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.insert("version".into(), Value::from(BLOB_VERSION));
        }
        Ok(serde_json::to_string(&value)?)
    }

    /// Read a persisted blob key by key.
    ///
    /// Returns `None` for anything that is not a JSON object. Keys that are
    /// missing or not booleans come from `fallback`; unknown keys are ignored.
    pub fn from_blob(blob: &str, fallback: impl Fn(PreferenceKey) -> bool) -> Option<Self> {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(blob) else {
            return None;
        };
        if let Some(version) = map.get("version").and_then(Value::as_u64).filter(|v| *v > BLOB_VERSION) {
            tracing::debug!("Reading preference blob version {} key by key", version);
        }
        Some(Self::from_fn(|key| {
            map.get(key.as_str()).and_then(Value::as_bool).unwrap_or_else(|| fallback(key))
        }))
    }
}

/// OS-reported media preferences (`prefers-contrast: more`, `prefers-reduced-motion: reduce`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OsPreferences {
    pub prefers_contrast: bool,
    pub prefers_reduced_motion: bool,
}

impl OsPreferences {
    /// Value the OS suggests for a key, if it reports one
    pub fn suggest(&self, key: PreferenceKey) -> Option<bool> {
        match key {
            PreferenceKey::HighContrast => Some(self.prefers_contrast),
            PreferenceKey::ReducedMotion => Some(self.prefers_reduced_motion),
            _ => None,
        }
    }
}

/// Preference store
pub struct PreferenceStore {
    prefs: PreferenceSet,
    storage: Box<dyn PreferenceStorage>,
    storage_key: String,
}

impl PreferenceStore {
    /// Load preferences from storage, falling back per key to the OS and defaults
    pub fn load(storage: Box<dyn PreferenceStorage>, storage_key: &str, os: OsPreferences) -> Self {
        let initial = |key: PreferenceKey| os.suggest(key).unwrap_or_else(|| key.default_value());

        let blob = match storage.get_item(storage_key) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Could not read preferences from storage: {}", e);
                None
            }
        };

        let prefs = match blob {
            Some(blob) => PreferenceSet::from_blob(&blob, initial).unwrap_or_else(|| {
                tracing::warn!("Ignoring malformed preference blob under {}", storage_key);
                PreferenceSet::from_fn(initial)
            }),
            None => PreferenceSet::from_fn(initial),
        };

        tracing::debug!("Loaded accessibility preferences: {:?}", prefs);
        Self { prefs, storage, storage_key: storage_key.to_string() }
    }

    /// Current preferences (copy)
    pub fn get(&self) -> PreferenceSet {
        self.prefs
    }

    /// Single preference
    pub fn is_enabled(&self, key: PreferenceKey) -> bool {
        self.prefs.get(key)
    }

    /// Set a preference, flag it on the document, persist
    pub fn set(&mut self, doc: &mut Document, key: PreferenceKey, value: bool) {
        self.prefs.set(key, value);
        apply_marker(doc, key, value);
        tracing::info!("Preference {} set to {}", key, value);
        self.persist();
    }

    /// Set a preference by its stored name
    pub fn set_by_name(&mut self, doc: &mut Document, name: &str, value: bool) -> Result<()> {
        let key: PreferenceKey = name.parse()?;
        self.set(doc, key, value);
        Ok(())
    }

    /// Flip a preference; returns the new value
    pub fn toggle(&mut self, doc: &mut Document, key: PreferenceKey) -> bool {
        let value = !self.prefs.get(key);
        self.set(doc, key, value);
        value
    }

    /// Restore compiled-in defaults
    pub fn reset(&mut self, doc: &mut Document) {
        self.prefs = PreferenceSet::default();
        self.apply(doc);
        tracing::info!("Preferences reset to defaults");
        self.persist();
    }

    /// Re-apply every marker class to the document root
    pub fn apply(&self, doc: &mut Document) {
        for key in PreferenceKey::ALL {
            apply_marker(doc, key, self.prefs.get(key));
        }
    }

    /// Write the blob; failures are logged and the in-memory state is kept
    fn persist(&mut self) {
        let result = self.prefs.to_blob()
            .and_then(|blob| self.storage.set_item(&self.storage_key, &blob));
        if let Err(e) = result {
            tracing::warn!("Failed to persist accessibility preferences: {}", e);
        }
    }
}

fn apply_marker(doc: &mut Document, key: PreferenceKey, value: bool) {
    let Some(class) = key.marker_class() else {
        return;
    };
    let root = doc.document_element();
    if let Err(e) = doc.toggle_class(root, class, value) {
        tracing::warn!("Could not flag {} on the root element: {}", class, e);
    }
}
