//! Keyboard Input Handler
//!
//! Processes crossterm key events and updates `AppState`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::AppState;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Submit(String),
    Quit,
}

/// Handles a single keyboard event.
///
/// Enter submits the input unless it is blank or a reply is streaming, in
/// which case the input is kept as typed.
pub fn handle_key_event(key: KeyEvent, state: &mut AppState, busy: bool) -> Option<InputAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.should_quit = true;
            Some(InputAction::Quit)
        }
        KeyCode::Esc => {
            state.should_quit = true;
            Some(InputAction::Quit)
        }
        KeyCode::Enter => {
            if busy || state.input.trim().is_empty() {
                return None;
            }
            Some(InputAction::Submit(state.take_input()))
        }
        KeyCode::Backspace => {
            state.input.pop();
            None
        }
        KeyCode::Char(c) => {
            state.input.push(c);
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key_event(key(KeyCode::Char(c)), state, false);
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut state = AppState::new();
        type_text(&mut state, "hey");
        handle_key_event(key(KeyCode::Backspace), &mut state, false);
        assert_eq!(state.input, "he");
    }

    #[test]
    fn test_enter_submits_and_clears() {
        let mut state = AppState::new();
        type_text(&mut state, "hello");
        let action = handle_key_event(key(KeyCode::Enter), &mut state, false);
        assert_eq!(action, Some(InputAction::Submit("hello".into())));
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_enter_ignored_when_blank_or_busy() {
        let mut state = AppState::new();
        type_text(&mut state, "   ");
        assert_eq!(handle_key_event(key(KeyCode::Enter), &mut state, false), None);

        state.input = "queued".into();
        assert_eq!(handle_key_event(key(KeyCode::Enter), &mut state, true), None);
        assert_eq!(state.input, "queued");
    }

    #[test]
    fn test_quit_keys() {
        let mut state = AppState::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c, &mut state, true), Some(InputAction::Quit));
        assert!(state.should_quit);

        let mut state = AppState::new();
        assert_eq!(handle_key_event(key(KeyCode::Esc), &mut state, false), Some(InputAction::Quit));
        assert!(state.input.is_empty());
    }
}
