//! Key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key plus its modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub modifiers: KeyModifiers,
    pub code: KeyCode,
}

impl KeyBinding {
    pub const fn new(modifiers: KeyModifiers, code: KeyCode) -> Self {
        Self { modifiers, code }
    }

    pub const fn key(code: KeyCode) -> Self {
        Self::new(KeyModifiers::NONE, code)
    }

    pub const fn ctrl(code: KeyCode) -> Self {
        Self::new(KeyModifiers::CONTROL, code)
    }

    pub const fn shift(code: KeyCode) -> Self {
        Self::new(KeyModifiers::SHIFT, code)
    }

    /// Whether `key` triggers this binding.
    ///
    /// Shift is ignored for characters since the case already carries it and terminals
    /// disagree on whether they report the modifier.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.code != self.code {
            return false;
        }
        if matches!(self.code, KeyCode::Char(_)) {
            key.modifiers.difference(KeyModifiers::SHIFT)
                == self.modifiers.difference(KeyModifiers::SHIFT)
        } else {
            key.modifiers == self.modifiers
        }
    }
}

/// Global keys
pub struct DefaultKeymap;

impl DefaultKeymap {
    pub const QUIT: KeyBinding = KeyBinding::key(KeyCode::Char('q'));
    pub const FORCE_QUIT: KeyBinding = KeyBinding::ctrl(KeyCode::Char('c'));
    pub const BACK: KeyBinding = KeyBinding::key(KeyCode::Esc);

    // panel focus
    pub const FOCUS_LEFT: KeyBinding = KeyBinding::key(KeyCode::Left);
    pub const FOCUS_RIGHT: KeyBinding = KeyBinding::key(KeyCode::Right);
    pub const FOCUS_LEFT_VI: KeyBinding = KeyBinding::key(KeyCode::Char('h'));
    pub const FOCUS_RIGHT_VI: KeyBinding = KeyBinding::key(KeyCode::Char('l'));
    pub const NEXT_TAB: KeyBinding = KeyBinding::key(KeyCode::Tab);

    // actions
    pub const ACTION_NEW: KeyBinding = KeyBinding::key(KeyCode::Char('n'));
    pub const ACTION_DELETE: KeyBinding = KeyBinding::key(KeyCode::Char('d'));
    pub const ACTION_PRODUCE: KeyBinding = KeyBinding::key(KeyCode::Char('p'));
    pub const ACTION_CONFIG: KeyBinding = KeyBinding::key(KeyCode::Char('c'));
    pub const ACTION_MESSAGES: KeyBinding = KeyBinding::key(KeyCode::Char('m'));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_is_ignored_for_characters_only() {
        let bottom = KeyBinding::shift(KeyCode::Char('G'));
        assert!(bottom.matches(&KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT)));
        assert!(bottom.matches(&KeyEvent::new(KeyCode::Char('G'), KeyModifiers::NONE)));
        assert!(!bottom.matches(&KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE)));

        let tab = KeyBinding::key(KeyCode::Tab);
        assert!(!tab.matches(&KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT)));
        assert!(!DefaultKeymap::QUIT.matches(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)));
    }
}
