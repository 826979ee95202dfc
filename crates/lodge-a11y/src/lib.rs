//! Lodge Accessibility
//!
//! Keyboard and assistive-technology support for the hotel front end.
//!
//! Features:
//! - Persisted accessibility preferences with root marker classes
//! - Landmark registry with discovery and F6/F7 cycling
//! - Live-region announcements with a dwell timer
//! - Roving keyboard navigation for lists and grids
//! - Nested focus traps for modals and sidebars
//! - Global Alt+key hotkeys that never hijack typing
//! - Read-only accessibility report

pub mod aria;
pub mod config;
pub mod storage;
pub mod preferences;
pub mod landmarks;
pub mod speech;
pub mod detection;
pub mod announcer;
pub mod keyboard_nav;
pub mod focus_trap;
pub mod hotkeys;
pub mod report;
pub mod runtime;

// Core exports
pub use aria::{AriaRole, accessible_name};
pub use config::A11yConfig;
pub use storage::{PreferenceStorage, MemoryStorage, FileStorage};
pub use preferences::{PreferenceKey, PreferenceSet, PreferenceStore, OsPreferences};
pub use landmarks::{LandmarkRegistry, LandmarkEntry};
pub use speech::{SpeechBridge, NullSpeech, RecordingSpeech};
pub use detection::{HostSignals, AssistiveTechDetector};
pub use announcer::{Announcer, Priority};
pub use keyboard_nav::{NavigationGroup, Orientation};
pub use focus_trap::{FocusTrapEngine, TrapId, TrapOptions};
pub use hotkeys::{HotkeyAction, HotkeyMap};
pub use report::{AccessibilityReport, generate_report};
pub use runtime::AccessibilityCore;

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Unknown preference: {0}")]
    UnknownPreference(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, A11yError>;
