//! Key mapping for terminal input
//!
//! Converts crossterm key events to session actions, and to the DOM-style
//! key names ("ArrowUp", "b", "Enter") that the Konami detector matches on.

use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::Key;

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Forward to the terminal session
    Edit(Key),
    /// Insert clipboard text
    Paste,
    /// Leave the application
    Quit,
}

/// Key mapper for converting key events to actions
pub struct KeyMapper;

impl KeyMapper {
    /// Map a crossterm KeyEvent to an application action
    pub fn map(event: &KeyEvent) -> Option<Action> {
        let mods = Modifiers::from(event.modifiers);

        if mods.contains(Modifiers::CTRL) {
            return match event.code {
                KeyCode::Char('c') | KeyCode::Char('d') => Some(Action::Quit),
                KeyCode::Char('v') => Some(Action::Paste),
                KeyCode::Char('u') => Some(Action::Edit(Key::ClearLine)),
                KeyCode::Char('l') => Some(Action::Edit(Key::ClearScreen)),
                KeyCode::Char('a') => Some(Action::Edit(Key::Home)),
                KeyCode::Char('e') => Some(Action::Edit(Key::End)),
                _ => None,
            };
        }

        let key = match event.code {
            // Alt+key has no meaning in the prompt
            KeyCode::Char(_) if mods.contains(Modifiers::ALT) => return None,
            KeyCode::Char(ch) => Key::Char(ch),
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Tab => Key::Tab,
            KeyCode::Esc => return Some(Action::Quit),
            _ => return None,
        };
        Some(Action::Edit(key))
    }

    /// DOM-style name of the pressed key
    pub fn key_name(event: &KeyEvent) -> Option<String> {
        let name = match event.code {
            KeyCode::Char(ch) => ch.to_string(),
            KeyCode::Up => "ArrowUp".to_string(),
            KeyCode::Down => "ArrowDown".to_string(),
            KeyCode::Left => "ArrowLeft".to_string(),
            KeyCode::Right => "ArrowRight".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Esc => "Escape".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Insert => "Insert".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => return None,
        };
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn test_char_keys() {
        let event = key_event(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(Action::Edit(Key::Char('a'))));

        // Shift is already folded into the char
        let event = key_event(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(KeyMapper::map(&event), Some(Action::Edit(Key::Char('A'))));

        let event = key_event(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_control_keys() {
        let event = key_event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), Some(Action::Quit));

        let event = key_event(KeyCode::Char('v'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), Some(Action::Paste));

        let event = key_event(KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), Some(Action::Edit(Key::ClearScreen)));

        let event = key_event(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_navigation_keys() {
        let event = key_event(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(Action::Edit(Key::Up)));

        let event = key_event(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(Action::Edit(Key::Enter)));

        let event = key_event(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(Action::Quit));

        let event = key_event(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_key_names() {
        let name = |code| KeyMapper::key_name(&key_event(code, KeyModifiers::NONE));

        assert_eq!(name(KeyCode::Up).as_deref(), Some("ArrowUp"));
        assert_eq!(name(KeyCode::Right).as_deref(), Some("ArrowRight"));
        assert_eq!(name(KeyCode::Char('b')).as_deref(), Some("b"));
        assert_eq!(name(KeyCode::Char('B')).as_deref(), Some("B"));
        assert_eq!(name(KeyCode::F(1)).as_deref(), Some("F1"));
        assert_eq!(name(KeyCode::Null), None);
    }
}
