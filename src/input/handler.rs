use std::io;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::editor::{Editor, Mode};

/// Rows moved by PageUp/PageDown in the reference overlay
const HELP_PAGE: usize = 20;

/// Unwrap one item of the terminal event stream. `None` means the session
/// has no more input and should end.
pub fn terminal_event(item: Option<io::Result<Event>>) -> Option<Event> {
    match item? {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::error!("terminal input failed: {e}");
            None
        }
    }
}

pub fn handle_event(editor: &mut Editor, event: Event) {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            // Clear any message on keypress
            editor.clear_message();
            handle_key(editor, key);
        }
        Event::Resize(_, _) => {
            // Resize is handled by the renderer
        }
        _ => {}
    }
}

fn handle_key(editor: &mut Editor, key: KeyEvent) {
    if key.code == KeyCode::F(12) {
        return editor.toggle_help();
    }
    if editor.help.is_some() {
        return handle_help(editor, key);
    }

    // Function keys work from every mode
    match key.code {
        KeyCode::F(2) => return editor.new_file(false),
        KeyCode::F(3) => {
            if let Err(e) = editor.save() {
                editor.set_message(format!("Error: {e}"));
            } else {
                editor.set_message(format!("Saved {}", editor.file_name()));
            }
            return;
        }
        KeyCode::F(4) => return editor.request_execute(),
        _ => {}
    }

    match editor.mode {
        Mode::Normal => handle_normal_mode(editor, key),
        Mode::Insert => handle_insert_mode(editor, key),
        Mode::Command => handle_command_mode(editor, key),
    }
}

/// The reference overlay takes every key until it is closed
fn handle_help(editor: &mut Editor, key: KeyEvent) {
    let Some(view) = editor.help.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => editor.close_help(),
        KeyCode::Char('j') | KeyCode::Down => view.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => view.scroll_up(1),
        KeyCode::PageDown | KeyCode::Char(' ') => view.scroll_down(HELP_PAGE),
        KeyCode::PageUp => view.scroll_up(HELP_PAGE),
        KeyCode::Char('g') | KeyCode::Home => view.scroll_up(usize::MAX),
        _ => {}
    }
}

fn handle_normal_mode(editor: &mut Editor, key: KeyEvent) {
    let pending = editor.pending_key.take();

    match key.code {
        // Basic movement
        KeyCode::Char('h') | KeyCode::Left => editor.move_left(),
        KeyCode::Char('j') | KeyCode::Down => editor.move_down(),
        KeyCode::Char('k') | KeyCode::Up => editor.move_up(),
        KeyCode::Char('l') | KeyCode::Right => editor.move_right(),

        // Line motions
        KeyCode::Char('0') | KeyCode::Home => editor.move_to_line_start(),
        KeyCode::Char('$') | KeyCode::End => editor.move_to_line_end(),
        KeyCode::Char('g') if pending == Some('g') => editor.move_to_first_line(),
        KeyCode::Char('g') => editor.pending_key = Some('g'),
        KeyCode::Char('G') => editor.move_to_last_line(),

        // Word motions
        KeyCode::Char('w') => editor.move_word_forward(),
        KeyCode::Char('b') => editor.move_word_backward(),
        KeyCode::Char('e') => editor.move_word_end(),

        // Insert mode entry
        KeyCode::Char('i') => editor.enter_insert_mode(),
        KeyCode::Char('a') => editor.append(),
        KeyCode::Char('A') => editor.append_end_of_line(),
        KeyCode::Char('o') => editor.open_line_below(),
        KeyCode::Char('O') => editor.open_line_above(),

        // Command mode
        KeyCode::Char(':') => editor.enter_command_mode(),

        // Quick quit with Ctrl-C
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            editor.quit(false);
        }

        _ => {}
    }
}

fn handle_insert_mode(editor: &mut Editor, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => editor.escape(),

        KeyCode::Char(c) => {
            editor.insert_char(c);
        }

        KeyCode::Backspace => {
            editor.delete_char_backward();
        }

        // Enter accepts an open completion, otherwise breaks the line
        KeyCode::Enter => {
            editor.insert_newline();
        }

        KeyCode::Tab => editor.insert_tab(),

        KeyCode::Up if editor.completion.is_open() => editor.completion.select_previous(),
        KeyCode::Down if editor.completion.is_open() => editor.completion.select_next(),

        KeyCode::Left => editor.move_left(),
        KeyCode::Right => editor.move_right(),
        KeyCode::Up => editor.move_up(),
        KeyCode::Down => editor.move_down(),

        _ => {}
    }
}

fn handle_command_mode(editor: &mut Editor, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            editor.command_buffer.clear();
            editor.enter_normal_mode();
        }

        KeyCode::Enter => {
            editor.execute_command();
        }

        KeyCode::Backspace => {
            editor.command_buffer.pop();
            if editor.command_buffer.is_empty() {
                editor.enter_normal_mode();
            }
        }

        KeyCode::Char(c) => {
            editor.command_buffer.push(c);
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::PendingAction;

    fn press(editor: &mut Editor, code: KeyCode) {
        handle_event(editor, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn type_str(editor: &mut Editor, s: &str) {
        for c in s.chars() {
            press(editor, KeyCode::Char(c));
        }
    }

    #[test]
    fn insert_then_escape() {
        let mut editor = Editor::new();
        press(&mut editor, KeyCode::Char('i'));
        assert_eq!(editor.mode, Mode::Insert);
        type_str(&mut editor, "vn x = 1");
        press(&mut editor, KeyCode::Esc);
        assert_eq!(editor.mode, Mode::Normal);
        assert_eq!(editor.buffer.text(), "vn x = 1");
    }

    #[test]
    fn arrows_navigate_open_completion() {
        let mut editor = Editor::new();
        press(&mut editor, KeyCode::Char('i'));
        type_str(&mut editor, "m");
        assert!(editor.completion.is_open());
        let first = editor.completion.selected().map(str::to_string);
        press(&mut editor, KeyCode::Down);
        assert_ne!(editor.completion.selected().map(str::to_string), first);
        press(&mut editor, KeyCode::Up);
        assert_eq!(editor.completion.selected().map(str::to_string), first);
        assert_eq!(editor.cursor.line, 0);
    }

    #[test]
    fn f4_requests_execution() {
        let mut editor = Editor::new();
        press(&mut editor, KeyCode::F(4));
        assert_eq!(editor.take_pending(), Some(PendingAction::Execute));
        assert_eq!(editor.take_pending(), None);
    }

    #[test]
    fn f3_without_path_reports_error() {
        let mut editor = Editor::new();
        press(&mut editor, KeyCode::F(3));
        assert!(editor.message.as_deref().unwrap_or("").starts_with("Error"));
    }

    #[test]
    fn command_mode_runs_command() {
        let mut editor = Editor::new();
        press(&mut editor, KeyCode::Char(':'));
        type_str(&mut editor, "run");
        press(&mut editor, KeyCode::Enter);
        assert_eq!(editor.mode, Mode::Normal);
        assert_eq!(editor.take_pending(), Some(PendingAction::Execute));
    }

    #[test]
    fn gg_jumps_to_first_line() {
        let mut editor = Editor::new();
        press(&mut editor, KeyCode::Char('i'));
        type_str(&mut editor, "1");
        press(&mut editor, KeyCode::Enter);
        type_str(&mut editor, "2");
        press(&mut editor, KeyCode::Esc);
        assert_eq!(editor.cursor.line, 1);

        press(&mut editor, KeyCode::Char('g'));
        assert_eq!(editor.cursor.line, 1);
        press(&mut editor, KeyCode::Char('g'));
        assert_eq!(editor.cursor.line, 0);
    }

    #[test]
    fn f12_opens_reference_over_insert_mode() {
        let mut editor = Editor::new();
        press(&mut editor, KeyCode::Char('i'));
        press(&mut editor, KeyCode::F(12));
        assert!(editor.help.is_some());

        // Keys scroll the reference instead of editing
        type_str(&mut editor, "jj");
        assert_eq!(editor.help.map(|h| h.scroll()), Some(2));
        assert_eq!(editor.buffer.text(), "");

        press(&mut editor, KeyCode::Esc);
        assert!(editor.help.is_none());
        assert_eq!(editor.mode, Mode::Insert);
    }

    #[test]
    fn help_command_then_q_closes() {
        let mut editor = Editor::new();
        press(&mut editor, KeyCode::Char(':'));
        type_str(&mut editor, "help");
        press(&mut editor, KeyCode::Enter);
        assert!(editor.help.is_some());
        press(&mut editor, KeyCode::Char('q'));
        assert!(editor.help.is_none());
        assert!(editor.running);
    }

    #[test]
    fn closed_or_failed_input_ends_the_session() {
        assert!(terminal_event(None).is_none());
        let failed = Err(io::Error::new(io::ErrorKind::BrokenPipe, "tty gone"));
        assert!(terminal_event(Some(failed)).is_none());
        let resize = Some(Ok(Event::Resize(80, 24)));
        assert_eq!(terminal_event(resize), Some(Event::Resize(80, 24)));
    }

    #[test]
    fn key_release_is_ignored() {
        let mut editor = Editor::new();
        let mut key = KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_event(&mut editor, Event::Key(key));
        assert_eq!(editor.mode, Mode::Normal);
    }
}
