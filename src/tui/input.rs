//! Keyboard handling.
//!
//! When a picker overlay is open it owns the keyboard; the input bar only
//! sees keys while no overlay is up. Ctrl-C quits from anywhere.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::TuiApp;
use super::select::SelectKey;

pub fn handle_key(app: &mut TuiApp, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.picker.is_some() {
        handle_picker_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Enter => app.submit_input(),
        KeyCode::Esc => app.input.clear(),
        _ => {}
    }
}

fn handle_picker_key(app: &mut TuiApp, key: KeyEvent) {
    let select_key = match key.code {
        KeyCode::Up | KeyCode::Char('k') => SelectKey::Up,
        KeyCode::Down | KeyCode::Char('j') => SelectKey::Down,
        KeyCode::Enter => SelectKey::Confirm,
        KeyCode::Char(c @ '0'..='9') => SelectKey::Digit(c as u8 - b'0'),
        KeyCode::Esc => {
            app.close_picker();
            return;
        }
        _ => SelectKey::Other,
    };
    app.picker_key(select_key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::{Picker, PickerAction};
    use crate::tui::select::{SelectItem, SelectList};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn with_picker(app: &mut TuiApp, ids: &[&str]) {
        app.open_picker(Picker {
            title: "Tasks".into(),
            action: PickerAction::ShowTask,
            list: SelectList::new(
                ids.iter()
                    .map(|id| SelectItem::new(*id, id.to_string()))
                    .collect(),
            ),
        });
    }

    #[test]
    fn typing_builds_the_input_bar() {
        let mut app = TuiApp::new();
        for c in "/he".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.input, "/he");
        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.input, "/h");
        handle_key(&mut app, key(KeyCode::Esc));
        assert!(app.input.is_empty());
    }

    #[test]
    fn ctrl_c_quits_even_with_picker_open() {
        let mut app = TuiApp::new();
        with_picker(&mut app, &["alpha"]);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn picker_captures_navigation_keys() {
        let mut app = TuiApp::new();
        with_picker(&mut app, &["alpha", "beta", "gamma"]);
        handle_key(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.picker.as_ref().unwrap().list.active_index(), Some(1));
        handle_key(&mut app, key(KeyCode::Up));
        assert_eq!(app.picker.as_ref().unwrap().list.active_index(), Some(0));
        // Typed characters go to the picker, not the input bar.
        assert!(app.input.is_empty());
    }

    #[test]
    fn digits_reach_the_fast_select_buffer() {
        let mut app = TuiApp::new();
        with_picker(&mut app, &["alpha", "beta", "gamma"]);
        handle_key(&mut app, key(KeyCode::Char('3')));
        let picker = app.picker.as_ref().unwrap();
        assert_eq!(picker.list.buffer(), "3");
        assert_eq!(picker.list.active_index(), Some(2));
    }

    #[test]
    fn esc_dismisses_the_picker() {
        let mut app = TuiApp::new();
        with_picker(&mut app, &["alpha"]);
        handle_key(&mut app, key(KeyCode::Esc));
        assert!(app.picker.is_none());
        assert!(app.take_effects().is_empty());
    }
}
