//! Key bindings: terminal key events to console actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, Mode, Route};

/// Map a key press to an action for the current input mode.
///
/// Returns `None` for keys with no binding in `mode`.
pub fn map_key(mode: Mode, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    match mode {
        Mode::Checking => None,
        Mode::Login | Mode::Form => text_entry_key(key),
        Mode::Confirm => confirm_key(key.code),
        Mode::Browse => browse_key(key.code),
    }
}

fn text_entry_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab | KeyCode::Down => Some(Action::FocusNext),
        KeyCode::BackTab | KeyCode::Up => Some(Action::FocusPrev),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => Some(Action::Type(c)),
        _ => None,
    }
}

const fn confirm_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Enter | KeyCode::Char('y' | 'Y') => Some(Action::Submit),
        KeyCode::Esc | KeyCode::Char('n' | 'N') => Some(Action::Cancel),
        _ => None,
    }
}

const fn browse_key(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Tab => Action::NextRoute,
        KeyCode::BackTab => Action::PrevRoute,
        KeyCode::Char('1') => Action::GoTo(Route::Messages),
        KeyCode::Char('2') => Action::GoTo(Route::Applications),
        KeyCode::Char('3') => Action::GoTo(Route::Clients),
        KeyCode::Char('4') => Action::GoTo(Route::Users),
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Left | KeyCode::Char('h') => Action::Left,
        KeyCode::Right | KeyCode::Char('l') => Action::Right,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('n') => Action::New,
        KeyCode::Char('e') | KeyCode::Enter => Action::Edit,
        KeyCode::Char('d') | KeyCode::Delete => Action::Delete,
        KeyCode::Char('D') => Action::DeleteAll,
        KeyCode::Char('t') => Action::ToggleToken,
        KeyCode::Char('L') => Action::Logout,
        KeyCode::Char('x') | KeyCode::Esc => Action::DismissError,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for mode in [
            Mode::Checking,
            Mode::Login,
            Mode::Browse,
            Mode::Form,
            Mode::Confirm,
        ] {
            assert_eq!(map_key(mode, key), Some(Action::Quit), "{mode:?}");
        }
    }

    #[test]
    fn checking_ignores_keys() {
        assert_eq!(map_key(Mode::Checking, press(KeyCode::Enter)), None);
        assert_eq!(map_key(Mode::Checking, press(KeyCode::Char('q'))), None);
    }

    #[test]
    fn login_types_every_character() {
        assert_eq!(
            map_key(Mode::Login, press(KeyCode::Char('q'))),
            Some(Action::Type('q'))
        );
        assert_eq!(
            map_key(Mode::Login, press(KeyCode::Tab)),
            Some(Action::FocusNext)
        );
        assert_eq!(
            map_key(Mode::Login, press(KeyCode::Enter)),
            Some(Action::Submit)
        );
        assert_eq!(map_key(Mode::Login, press(KeyCode::Esc)), Some(Action::Cancel));
    }

    #[test]
    fn form_navigation() {
        assert_eq!(
            map_key(Mode::Form, press(KeyCode::BackTab)),
            Some(Action::FocusPrev)
        );
        assert_eq!(
            map_key(Mode::Form, press(KeyCode::Backspace)),
            Some(Action::Backspace)
        );
        assert_eq!(
            map_key(Mode::Form, press(KeyCode::Char(' '))),
            Some(Action::Type(' '))
        );
    }

    #[test]
    fn confirm_accepts_y_and_rejects_n() {
        assert_eq!(
            map_key(Mode::Confirm, press(KeyCode::Char('y'))),
            Some(Action::Submit)
        );
        assert_eq!(
            map_key(Mode::Confirm, press(KeyCode::Char('n'))),
            Some(Action::Cancel)
        );
        assert_eq!(
            map_key(Mode::Confirm, press(KeyCode::Esc)),
            Some(Action::Cancel)
        );
        assert_eq!(map_key(Mode::Confirm, press(KeyCode::Char('d'))), None);
    }

    #[test]
    fn browse_bindings() {
        assert_eq!(
            map_key(Mode::Browse, press(KeyCode::Char('q'))),
            Some(Action::Quit)
        );
        assert_eq!(
            map_key(Mode::Browse, press(KeyCode::Char('3'))),
            Some(Action::GoTo(Route::Clients))
        );
        assert_eq!(
            map_key(Mode::Browse, press(KeyCode::Char('j'))),
            Some(Action::Down)
        );
        assert_eq!(
            map_key(Mode::Browse, press(KeyCode::Char('D'))),
            Some(Action::DeleteAll)
        );
        assert_eq!(
            map_key(Mode::Browse, press(KeyCode::Char('L'))),
            Some(Action::Logout)
        );
        assert_eq!(map_key(Mode::Browse, press(KeyCode::Char('z'))), None);
    }
}
