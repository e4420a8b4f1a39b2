use crate::application::{App, AppMode, TextInput};
use crate::infrastructure::SystemClipboard;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Chat => Self::handle_chat_mode(app, key),
            AppMode::Preview => Self::handle_preview_mode(app, key),
            AppMode::PreviewEditing => Self::handle_preview_editing_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('c') => {
                    app.status_message = Some(match SystemClipboard::set_text(app.selected_value()) {
                        Ok(()) => "Copied".to_string(),
                        Err(e) => e.to_string(),
                    });
                }
                KeyCode::Char('v') => match SystemClipboard::get_text() {
                    Ok(text) => app.paste_text(&text),
                    Err(e) => app.status_message = Some(e.to_string()),
                },
                _ => {}
            }
            return;
        }

        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_up(),
            KeyCode::Down | KeyCode::Char('j') => app.move_down(),
            KeyCode::Left | KeyCode::Char('h') => app.move_left(),
            KeyCode::Right | KeyCode::Char('l') => app.move_right(),
            KeyCode::Tab => app.next_spreadsheet(),
            KeyCode::BackTab => app.previous_spreadsheet(),
            KeyCode::Enter | KeyCode::F(2) => app.start_editing(),
            KeyCode::Backspace | KeyCode::Delete => app.clear_selected_cell(),
            KeyCode::Char('o') => app.append_row(),
            KeyCode::Char('O') => app.append_column(),
            KeyCode::Char('c') => app.toggle_sidebar(),
            KeyCode::Char('i') => app.focus_chat(),
            KeyCode::Char('p') => app.open_preview(),
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            // 'q' is handled by the main loop
            _ => {}
        }
    }

    /// Shared line-editing keys. Returns false if the key was not an edit.
    fn edit_text(input: &mut TextInput, key: KeyCode) -> bool {
        match key {
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            KeyCode::Char(c) => input.insert(c),
            _ => return false,
        }
        true
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_editing(),
            KeyCode::Esc => app.cancel_editing(),
            other => {
                Self::edit_text(&mut app.input, other);
            }
        }
    }

    fn handle_chat_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.send_chat_message(),
            KeyCode::Esc => app.leave_chat(),
            other => {
                Self::edit_text(&mut app.chat.input, other);
            }
        }
    }

    fn handle_preview_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('a') | KeyCode::Char('y') => app.accept_preview(),
            KeyCode::Char('r') | KeyCode::Char('n') | KeyCode::Esc => app.reject_preview(),
            KeyCode::Enter | KeyCode::F(2) => app.start_preview_editing(),
            KeyCode::Up | KeyCode::Char('k') => app.preview_move(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => app.preview_move(1, 0),
            KeyCode::Left | KeyCode::Char('h') => app.preview_move(0, -1),
            KeyCode::Right | KeyCode::Char('l') => app.preview_move(0, 1),
            _ => {}
        }
    }

    fn handle_preview_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_preview_editing(),
            KeyCode::Esc => app.cancel_preview_editing(),
            other => {
                Self::edit_text(&mut app.input, other);
            }
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}
