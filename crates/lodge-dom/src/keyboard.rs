//! Keyboard events
//!
//! Key names follow the DOM `KeyboardEvent.key` vocabulary so a browser
//! bridge can forward events without translation.

use crate::NodeId;

/// Keyboard key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable character, stored lowercase
    Char(char),
    Tab,
    Enter,
    Space,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    /// Function key F1..F24
    F(u8),
    /// Anything else, by DOM name
    Other(String),
}

impl Key {
    /// Parse a DOM key name ("Tab", "ArrowUp", "F6", "a", " ")
    pub fn parse(name: &str) -> Self {
        match name {
            "Tab" => Self::Tab,
            "Enter" | "Return" => Self::Enter,
            " " | "Space" | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Backspace" => Self::Backspace,
            "Delete" | "Del" => Self::Delete,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c.to_ascii_lowercase()),
                    _ => match name.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                        Some(n) if (1..=24).contains(&n) => Self::F(n),
                        _ => Self::Other(name.to_string()),
                    },
                }
            }
        }
    }

    /// DOM key name
    pub fn name(&self) -> String {
        match self {
            Self::Char(c) => c.to_string(),
            Self::Tab => "Tab".into(),
            Self::Enter => "Enter".into(),
            Self::Space => " ".into(),
            Self::Escape => "Escape".into(),
            Self::ArrowUp => "ArrowUp".into(),
            Self::ArrowDown => "ArrowDown".into(),
            Self::ArrowLeft => "ArrowLeft".into(),
            Self::ArrowRight => "ArrowRight".into(),
            Self::Home => "Home".into(),
            Self::End => "End".into(),
            Self::PageUp => "PageUp".into(),
            Self::PageDown => "PageDown".into(),
            Self::Backspace => "Backspace".into(),
            Self::Delete => "Delete".into(),
            Self::F(n) => format!("F{}", n),
            Self::Other(name) => name.clone(),
        }
    }
}

/// Modifier keys held during a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { ctrl: false, alt: false, shift: false, meta: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ..Self::NONE };
    pub const ALT: Modifiers = Modifiers { alt: true, ..Self::NONE };
    pub const CTRL: Modifiers = Modifiers { ctrl: true, ..Self::NONE };

    /// No modifier held
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// A modifier other than Shift is held
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Key press delivered to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    /// Element the event was dispatched to (the focused element, or body)
    pub target: NodeId,
}

impl KeyboardEvent {
    /// Character keys are stored lowercase, matching [`Key::parse`]
    pub fn new(key: Key, modifiers: Modifiers, target: NodeId) -> Self {
        let key = match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Self { key, modifiers, target }
    }

    /// Plain key press with no modifiers
    pub fn plain(key: Key, target: NodeId) -> Self {
        Self::new(key, Modifiers::NONE, target)
    }

    /// Parse a chord such as "Shift+Tab", "Alt+H" or "F6"
    pub fn parse(chord: &str, target: NodeId) -> Self {
        let mut modifiers = Modifiers::NONE;
        let mut parts: Vec<&str> = chord.split('+').collect();
        // "Alt++" style chords end with an empty segment for the plus key
        let key_name = match parts.pop() {
            Some("") if chord.ends_with("++") => "+",
            Some(name) => name,
            None => "",
        };
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "meta" | "cmd" | "super" => modifiers.meta = true,
                _ => {}
            }
        }
        Self::new(Key::parse(key_name), modifiers, target)
    }

    /// Tab without Shift
    pub fn is_tab(&self) -> bool {
        self.key == Key::Tab && !self.modifiers.shift && !self.modifiers.has_command_modifier()
    }

    /// Shift+Tab
    pub fn is_shift_tab(&self) -> bool {
        self.key == Key::Tab && self.modifiers.shift && !self.modifiers.has_command_modifier()
    }
}

/// Result of offering a key press to a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Handler acted; host must prevent the default action
    Handled,
    /// Not ours; host performs its default action
    Ignored,
}

impl KeyOutcome {
    pub fn is_handled(self) -> bool {
        self == Self::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        assert_eq!(Key::parse("Tab"), Key::Tab);
        assert_eq!(Key::parse("H"), Key::Char('h'));
        assert_eq!(Key::parse("F6"), Key::F(6));
        assert_eq!(Key::parse(" "), Key::Space);
        assert_eq!(Key::parse("Fish"), Key::Other("Fish".into()));
        assert_eq!(Key::parse("F"), Key::Char('f'));
    }

    #[test]
    fn test_parse_chords() {
        let event = KeyboardEvent::parse("Shift+Tab", NodeId::ROOT);
        assert!(event.is_shift_tab());
        assert!(!event.is_tab());

        let event = KeyboardEvent::parse("Alt+H", NodeId::ROOT);
        assert_eq!(event.key, Key::Char('h'));
        assert_eq!(event.modifiers, Modifiers::ALT);

        let event = KeyboardEvent::parse("Ctrl++", NodeId::ROOT);
        assert_eq!(event.key, Key::Char('+'));
        assert!(event.modifiers.ctrl);
    }

    #[test]
    fn test_new_lowercases_chars() {
        let event = KeyboardEvent::new(Key::Char('H'), Modifiers::ALT, NodeId::ROOT);
        assert_eq!(event, KeyboardEvent::parse("Alt+H", NodeId::ROOT));
        assert_eq!(KeyboardEvent::plain(Key::Char('?'), NodeId::ROOT).key, Key::Char('?'));
    }
}
