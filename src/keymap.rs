//! Keyboard shortcuts of the editing surface.
//!
//! Chords map onto the same [`EditCommand`]s the toolbar dispatches; nothing
//! here edits the document itself.

use crate::richtext::structured_document::StyleKind;
use crate::richtext::structured_editor::EditCommand;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable key, stored lowercase
    Char(char),
    Enter,
    Backspace,
    Delete,
    Home,
}

/// A key plus the modifiers held down with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    pub fn new(key: Key) -> Self {
        KeyChord {
            key: match key {
                Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
                other => other,
            },
            ctrl: false,
            meta: false,
            shift: false,
            alt: false,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Ctrl on most platforms, Cmd on macOS
    pub fn command_modifier(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What the host should do for a chord
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    Command(EditCommand),
    /// Open the link dialog; the host dispatches `insertLink` with its result
    RequestLink,
    ScrollToTop,
}

/// Look up the binding for `chord`. Unbound chords give `None` and should be
/// left to the host's default handling.
pub fn action_for(chord: &KeyChord) -> Option<EditorAction> {
    if chord.command_modifier() {
        let toggle = |style| Some(EditorAction::Command(EditCommand::ToggleStyle { style }));
        return match chord.key {
            Key::Char('b') => toggle(StyleKind::Bold),
            Key::Char('i') => toggle(StyleKind::Italic),
            Key::Char('u') => toggle(StyleKind::Underline),
            Key::Char('k') => Some(EditorAction::RequestLink),
            Key::Char('a') => Some(EditorAction::Command(EditCommand::SelectAll)),
            Key::Home if chord.ctrl => Some(EditorAction::ScrollToTop),
            _ => None,
        };
    }
    if chord.alt {
        return None;
    }
    match chord.key {
        Key::Enter => Some(EditorAction::Command(EditCommand::InsertParagraph)),
        Key::Backspace => Some(EditorAction::Command(EditCommand::DeleteBackward)),
        Key::Delete => Some(EditorAction::Command(EditCommand::DeleteForward)),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid key chord {0:?}")]
pub struct ParseKeyChordError(String);

impl FromStr for KeyChord {
    type Err = ParseKeyChordError;

    /// Parses chords like `Ctrl+B`, `Cmd+Shift+k` or `Enter`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseKeyChordError(s.to_string());
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        // a trailing "+" is the plus key itself
        if s.ends_with("++") || s == "+" {
            parts.retain(|p| !p.is_empty());
            parts.push("+");
        }
        let (key, modifiers) = parts.split_last().ok_or_else(err)?;

        let key = match key.to_ascii_lowercase().as_str() {
            "enter" | "return" => Key::Enter,
            "backspace" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "home" => Key::Home,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return Err(err()),
                }
            }
        };

        let mut chord = KeyChord::new(key);
        for modifier in modifiers {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "cmd" | "command" | "meta" | "super" => chord.meta = true,
                "shift" => chord.shift = true,
                "alt" | "option" => chord.alt = true,
                _ => return Err(err()),
            }
        }
        Ok(chord)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (held, name) in [
            (self.ctrl, "Ctrl+"),
            (self.meta, "Cmd+"),
            (self.alt, "Alt+"),
            (self.shift, "Shift+"),
        ] {
            if held {
                f.write_str(name)?;
            }
        }
        match self.key {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Key::Enter => f.write_str("Enter"),
            Key::Backspace => f.write_str("Backspace"),
            Key::Delete => f.write_str("Delete"),
            Key::Home => f.write_str("Home"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(chord: &str) -> Option<EditorAction> {
        action_for(&chord.parse().unwrap())
    }

    #[test]
    fn test_style_shortcuts() {
        assert_eq!(
            action("Ctrl+B"),
            Some(EditorAction::Command(EditCommand::ToggleStyle {
                style: StyleKind::Bold
            }))
        );
        assert_eq!(action("Cmd+i"), action("Ctrl+I"));
        // shift does not change the binding
        assert_eq!(action("Ctrl+Shift+U"), action("Ctrl+U"));
        assert_eq!(action("Cmd+K"), Some(EditorAction::RequestLink));
    }

    #[test]
    fn test_unbound_chords() {
        assert_eq!(action("B"), None);
        assert_eq!(action("Ctrl+Q"), None);
        assert_eq!(action("Alt+Enter"), None);
        assert_eq!(action("Cmd+Home"), None);
        assert_eq!(action("Ctrl+Home"), Some(EditorAction::ScrollToTop));
    }

    #[test]
    fn test_editing_keys() {
        assert_eq!(
            action("Enter"),
            Some(EditorAction::Command(EditCommand::InsertParagraph))
        );
        assert_eq!(
            action("backspace"),
            Some(EditorAction::Command(EditCommand::DeleteBackward))
        );
    }

    #[test]
    fn test_parse_and_display() {
        let chord: KeyChord = "cmd+shift+k".parse().unwrap();
        assert!(chord.meta && chord.shift && !chord.ctrl);
        assert_eq!(chord.to_string(), "Cmd+Shift+K");
        assert_eq!("Ctrl++".parse::<KeyChord>().unwrap().key, Key::Char('+'));
        assert!("Hyper+B".parse::<KeyChord>().is_err());
        assert!("Ctrl+Tab".parse::<KeyChord>().is_err());
        assert!("".parse::<KeyChord>().is_err());
    }
}
