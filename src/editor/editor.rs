use std::{io, path::PathBuf};

use super::{Buffer, Cursor, HelpView, Mode, assist};
use crate::completion::{Completion, current_token};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::syntax::Highlighter;

/// Work the event loop runs outside the key handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// Save, build the bridge file and launch the runtime
    Execute,
}

/// One editing session: the document, its caret and the analysis state
/// derived from it.
pub struct Editor {
    pub buffer: Buffer,
    pub cursor: Cursor,
    pub mode: Mode,
    pub command_buffer: String,
    /// First key of a two-key normal mode sequence (`gg`)
    pub pending_key: Option<char>,
    pub running: bool,
    pub message: Option<String>,
    pub scroll_offset: usize,
    pub highlighter: Highlighter,
    pub completion: Completion,
    /// Language reference overlay, shown over the text while open
    pub help: Option<HelpView>,
    pending: Option<PendingAction>,
    tab_width: usize,
    auto_indent: bool,
    auto_close: bool,
}

impl Editor {
    pub fn new() -> Self {
        Self::with_buffer(Buffer::new())
    }

    pub fn open(path: PathBuf) -> io::Result<Self> {
        Ok(Self::with_buffer(Buffer::from_file(path)?))
    }

    fn with_buffer(buffer: Buffer) -> Self {
        let defaults = Settings::default();
        let mut editor = Self {
            buffer,
            cursor: Cursor::new(),
            mode: Mode::default(),
            command_buffer: String::new(),
            pending_key: None,
            running: true,
            message: None,
            scroll_offset: 0,
            highlighter: Highlighter::new(),
            completion: Completion::new(),
            help: None,
            pending: None,
            tab_width: defaults.tab_width,
            auto_indent: defaults.auto_indent,
            auto_close: defaults.auto_close,
        };
        editor.rehighlight();
        editor
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.tab_width = settings.tab_width;
        self.auto_indent = settings.auto_indent;
        self.auto_close = settings.auto_close;
    }

    /// Adjust scroll offset to keep cursor visible within viewport
    pub fn adjust_scroll(&mut self, viewport_height: usize) {
        if self.cursor.line < self.scroll_offset {
            self.scroll_offset = self.cursor.line;
        }
        if self.cursor.line >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor.line + 1 - viewport_height;
        }
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    /// Display name of the current file
    pub fn file_name(&self) -> String {
        self.buffer
            .path()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "[No Name]".to_string())
    }

    /// Byte offset of the caret into the full text
    pub fn cursor_offset(&self) -> usize {
        self.buffer.byte_offset(self.cursor.line, self.cursor.col)
    }

    // Analysis

    fn rehighlight(&mut self) {
        let text = self.buffer.text();
        self.highlighter.parse(&text);
    }

    fn refresh_completion(&mut self) {
        if self.mode.completes() {
            let text = self.buffer.text();
            self.completion.refresh(&text, self.cursor_offset());
        } else {
            self.completion.close();
        }
    }

    /// Full re-scan after any edit
    fn text_changed(&mut self) {
        self.rehighlight();
        self.refresh_completion();
    }

    /// Replace the token before the caret with the highlighted candidate
    pub fn accept_completion(&mut self) -> bool {
        let Some(choice) = self.completion.accept() else {
            return false;
        };

        let prefix: String = self
            .buffer
            .line_text(self.cursor.line)
            .chars()
            .take(self.cursor.col)
            .collect();
        let token_len = current_token(&prefix, prefix.len()).chars().count();

        self.buffer
            .delete_before(self.cursor.line, self.cursor.col, token_len);
        self.cursor.col -= token_len;
        self.buffer
            .insert_str(self.cursor.line, self.cursor.col, &choice);
        self.cursor.col += choice.chars().count();

        tracing::debug!(candidate = %choice, "accepted completion");
        self.rehighlight();
        true
    }

    // Movement

    pub fn move_left(&mut self) {
        self.cursor.move_left();
        self.refresh_completion();
    }

    pub fn move_right(&mut self) {
        let line_len = self.buffer.line_len(self.cursor.line);
        self.cursor.move_right(line_len);
        self.refresh_completion();
    }

    pub fn move_up(&mut self) {
        self.cursor.move_up();
        self.clamp_cursor_col();
    }

    pub fn move_down(&mut self) {
        let line_count = self.buffer.line_count();
        self.cursor.move_down(line_count);
        self.clamp_cursor_col();
    }

    fn clamp_cursor_col(&mut self) {
        let line_len = self.buffer.line_len(self.cursor.line);
        if self.cursor.col > line_len {
            self.cursor.col = line_len;
        }
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor.col = 0;
    }

    pub fn move_to_line_end(&mut self) {
        let line_len = self.buffer.line_len(self.cursor.line);
        self.cursor.col = line_len.saturating_sub(1);
    }

    pub fn move_to_first_line(&mut self) {
        self.cursor.line = 0;
        self.clamp_cursor_col();
    }

    pub fn move_to_last_line(&mut self) {
        self.cursor.line = self.buffer.line_count().saturating_sub(1);
        self.clamp_cursor_col();
    }

    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }

    /// Move to start of next word (w)
    pub fn move_word_forward(&mut self) {
        let line_count = self.buffer.line_count();

        while let Some(c) = self.buffer.char_at(self.cursor.line, self.cursor.col) {
            if !Self::is_word_char(c) {
                break;
            }
            self.cursor.col += 1;
        }

        loop {
            match self.buffer.char_at(self.cursor.line, self.cursor.col) {
                Some(c) if Self::is_word_char(c) => break,
                Some(_) => self.cursor.col += 1,
                None if self.cursor.line + 1 < line_count => {
                    self.cursor.line += 1;
                    self.cursor.col = 0;
                }
                None => break,
            }
        }
        self.clamp_cursor_col();
    }

    /// Move to start of previous word (b)
    pub fn move_word_backward(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.col = self.buffer.line_len(self.cursor.line).saturating_sub(1);
        }

        loop {
            match self.buffer.char_at(self.cursor.line, self.cursor.col) {
                Some(c) if Self::is_word_char(c) => break,
                Some(_) if self.cursor.col > 0 => self.cursor.col -= 1,
                _ if self.cursor.line > 0 => {
                    self.cursor.line -= 1;
                    self.cursor.col = self.buffer.line_len(self.cursor.line).saturating_sub(1);
                }
                _ => return,
            }
        }

        while self.cursor.col > 0 {
            match self.buffer.char_at(self.cursor.line, self.cursor.col - 1) {
                Some(c) if Self::is_word_char(c) => self.cursor.col -= 1,
                _ => break,
            }
        }
    }

    /// Move to end of word (e)
    pub fn move_word_end(&mut self) {
        let line_count = self.buffer.line_count();
        self.cursor.col += 1;

        loop {
            match self.buffer.char_at(self.cursor.line, self.cursor.col) {
                Some(c) if Self::is_word_char(c) => break,
                Some(_) => self.cursor.col += 1,
                None if self.cursor.line + 1 < line_count => {
                    self.cursor.line += 1;
                    self.cursor.col = 0;
                }
                None => {
                    self.clamp_cursor_col();
                    return;
                }
            }
        }

        while let Some(c) = self.buffer.char_at(self.cursor.line, self.cursor.col + 1) {
            if !Self::is_word_char(c) {
                break;
            }
            self.cursor.col += 1;
        }
    }

    // Modes

    pub fn enter_insert_mode(&mut self) {
        self.mode = Mode::Insert;
    }

    /// Append after cursor (a)
    pub fn append(&mut self) {
        let line_len = self.buffer.line_len(self.cursor.line);
        if self.cursor.col < line_len {
            self.cursor.col += 1;
        }
        self.enter_insert_mode();
    }

    /// Append at end of line (A)
    pub fn append_end_of_line(&mut self) {
        self.cursor.col = self.buffer.line_len(self.cursor.line);
        self.enter_insert_mode();
    }

    /// Open line below (o), carrying the indentation forward
    pub fn open_line_below(&mut self) {
        self.cursor.col = self.buffer.line_len(self.cursor.line);
        self.enter_insert_mode();
        self.insert_newline();
    }

    /// Open line above (O)
    pub fn open_line_above(&mut self) {
        self.cursor.col = 0;
        let line_ending = self.buffer.line_ending();
        self.buffer.insert_str(self.cursor.line, 0, line_ending);
        self.enter_insert_mode();
        self.text_changed();
    }

    pub fn enter_normal_mode(&mut self) {
        self.mode = Mode::Normal;
        self.command_buffer.clear();
        self.completion.close();
        self.clamp_cursor_col();
    }

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.command_buffer.clear();
        self.completion.close();
    }

    /// Esc in insert mode: dismiss the completion list first
    pub fn escape(&mut self) {
        if self.completion.is_open() {
            self.completion.close();
        } else {
            self.enter_normal_mode();
        }
    }

    // Commands

    pub fn execute_command(&mut self) {
        let cmd = self.command_buffer.trim().to_string();
        let (name, arg) = match cmd.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim())),
            None => (cmd.as_str(), None),
        };

        match (name, arg) {
            ("q" | "quit", None) => self.quit(false),
            ("q!", None) => self.quit(true),
            ("w" | "write", path) => {
                if let Some(path) = path {
                    self.buffer.set_path(PathBuf::from(path));
                }
                match self.save() {
                    Ok(()) => self.set_message(format!("Saved {}", self.file_name())),
                    Err(e) => self.set_message(format!("Error: {e}")),
                }
            }
            ("wq", None) => match self.save() {
                Ok(()) => self.quit(true),
                Err(e) => self.set_message(format!("Error: {e}")),
            },
            ("e" | "edit", Some(path)) => self.open_file(PathBuf::from(path)),
            ("new", None) => self.new_file(false),
            ("new!", None) => self.new_file(true),
            ("run", None) => self.request_execute(),
            ("h" | "help", None) => self.open_help(),
            ("", None) => {}
            _ => self.set_message(format!("Unknown command: {cmd}")),
        }
        self.command_buffer.clear();
        self.mode = Mode::Normal;
    }

    pub fn open_help(&mut self) {
        self.completion.close();
        self.help = Some(HelpView::new());
    }

    pub fn close_help(&mut self) {
        self.help = None;
    }

    pub fn toggle_help(&mut self) {
        if self.help.is_some() {
            self.close_help();
        } else {
            self.open_help();
        }
    }

    pub fn request_execute(&mut self) {
        self.pending = Some(PendingAction::Execute);
    }

    pub fn quit(&mut self, force: bool) {
        if self.buffer.is_dirty() && !force {
            self.set_message("Unsaved changes (add ! to override)");
            return;
        }
        self.running = false;
    }

    pub fn save(&mut self) -> Result<()> {
        if self.buffer.path().is_none() {
            return Err(Error::NoFilePath);
        }
        self.buffer.save()?;
        tracing::info!(file = %self.file_name(), "saved script");
        Ok(())
    }

    pub fn new_file(&mut self, force: bool) {
        if self.buffer.is_dirty() && !force {
            self.set_message("Unsaved changes (use :new! to discard)");
            return;
        }
        self.replace_buffer(Buffer::new());
    }

    pub fn open_file(&mut self, path: PathBuf) {
        match Buffer::from_file(path) {
            Ok(buffer) => {
                self.replace_buffer(buffer);
                tracing::info!(file = %self.file_name(), "opened script");
            }
            Err(e) => self.set_message(format!("Error: {e}")),
        }
    }

    fn replace_buffer(&mut self, buffer: Buffer) {
        self.buffer = buffer;
        self.cursor = Cursor::new();
        self.scroll_offset = 0;
        self.completion.close();
        self.rehighlight();
    }

    // Text editing

    pub fn insert_char(&mut self, ch: char) {
        let pair = if self.auto_close {
            assist::auto_close(ch)
        } else {
            None
        };

        match pair {
            Some((text, advance)) => {
                self.buffer
                    .insert_str(self.cursor.line, self.cursor.col, &text);
                self.cursor.col += advance;
            }
            None => {
                self.buffer
                    .insert_char(self.cursor.line, self.cursor.col, ch);
                self.cursor.col += 1;
            }
        }
        self.text_changed();
    }

    /// Tab accepts an open completion, otherwise inserts spaces
    pub fn insert_tab(&mut self) {
        if self.accept_completion() {
            return;
        }
        let spaces = " ".repeat(self.tab_width);
        self.buffer
            .insert_str(self.cursor.line, self.cursor.col, &spaces);
        self.cursor.col += self.tab_width;
        self.text_changed();
    }

    pub fn delete_char_backward(&mut self) {
        if self.cursor.col > 0 {
            self.buffer
                .delete_char_backward(self.cursor.line, self.cursor.col);
            self.cursor.col -= 1;
        } else if self.cursor.line > 0 {
            // Join with previous line
            let prev_line_len = self.buffer.line_len(self.cursor.line - 1);
            self.buffer
                .delete_char_backward(self.cursor.line, self.cursor.col);
            self.cursor.line -= 1;
            self.cursor.col = prev_line_len;
        } else {
            return;
        }
        self.text_changed();
    }

    /// Enter accepts an open completion, otherwise breaks the line and
    /// indents the new one from the text left of the caret.
    pub fn insert_newline(&mut self) {
        if self.accept_completion() {
            return;
        }

        let indent = if self.auto_indent {
            let before: String = self
                .buffer
                .line_text(self.cursor.line)
                .chars()
                .take(self.cursor.col)
                .collect();
            assist::compute_indent(&before)
        } else {
            String::new()
        };

        let break_and_indent = format!("{}{indent}", self.buffer.line_ending());
        self.buffer
            .insert_str(self.cursor.line, self.cursor.col, &break_and_indent);
        self.cursor.line += 1;
        self.cursor.col = indent.chars().count();
        self.text_changed();
        // A fresh line never offers candidates
        self.completion.close();
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
