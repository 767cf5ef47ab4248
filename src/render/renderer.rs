use std::io::{self, Write, stdout};

use crossterm::{
    cursor::{Hide, MoveTo, SetCursorStyle, Show},
    execute, queue,
    style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use crate::completion::current_token;
use crate::config::Settings;
use crate::editor::{Editor, HelpView, Mode, help};
use crate::syntax::HighlightedLine;
use crate::theme::{Style, Theme};

/// Rows reserved below the text: status line and command line
const CHROME_ROWS: u16 = 2;

pub struct Renderer {
    pub width: u16,
    pub height: u16,
    /// Set while the execution handoff is talking to the network
    pub busy: bool,
    show_line_numbers: bool,
    relative_line_numbers: bool,
}

impl Renderer {
    pub fn new(settings: &Settings) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            width,
            height,
            busy: false,
            show_line_numbers: settings.show_line_numbers,
            relative_line_numbers: settings.relative_line_numbers,
        })
    }

    pub fn setup() -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            EnterAlternateScreen,
            DisableLineWrap,
            Hide,
            Clear(ClearType::All)
        )?;
        Ok(())
    }

    pub fn teardown() -> io::Result<()> {
        execute!(
            stdout(),
            SetCursorStyle::DefaultUserShape,
            Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Rows available for script text
    pub fn text_height(&self) -> usize {
        self.height.saturating_sub(CHROME_ROWS).max(1) as usize
    }

    fn gutter_width(&self, editor: &Editor) -> u16 {
        if !self.show_line_numbers {
            return 0;
        }
        let digits = editor.buffer.line_count().to_string().len().max(3);
        digits as u16 + 1
    }

    pub fn render(&self, editor: &Editor, theme: &Theme) -> io::Result<()> {
        let mut stdout = stdout();

        // Hide cursor during redraw to prevent flicker
        queue!(stdout, Hide)?;
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;

        if let Some(view) = &editor.help {
            self.render_help(&mut stdout, view, theme)?;
            self.render_status_line(&mut stdout, editor, theme)?;
            self.render_command_line(&mut stdout, editor, theme)?;
            stdout.flush()?;
            return Ok(());
        }

        self.render_text(&mut stdout, editor, theme)?;
        if editor.completion.is_open() {
            self.render_completion(&mut stdout, editor, theme)?;
        }
        self.render_status_line(&mut stdout, editor, theme)?;
        self.render_command_line(&mut stdout, editor, theme)?;
        self.position_cursor(&mut stdout, editor)?;

        stdout.flush()?;
        Ok(())
    }

    fn render_text(&self, stdout: &mut impl Write, editor: &Editor, theme: &Theme) -> io::Result<()> {
        let line_count = editor.buffer.line_count();
        let gutter_width = self.gutter_width(editor);
        let text_width = self.width.saturating_sub(gutter_width) as usize;

        for row in 0..self.text_height() {
            let line_idx = row + editor.scroll_offset;
            queue!(stdout, MoveTo(0, row as u16))?;

            if line_idx >= line_count {
                // Empty line indicator
                queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
                queue!(stdout, SetForegroundColor(theme.line_number.to_crossterm()))?;
                let filler = format!("{:<width$}", "~", width = self.width as usize);
                queue!(stdout, Print(filler))?;
                continue;
            }

            let is_cursor_line = line_idx == editor.cursor.line;
            let line_bg = if is_cursor_line {
                theme.current_line
            } else {
                theme.background
            };

            if gutter_width > 0 {
                let number = if self.relative_line_numbers && !is_cursor_line {
                    line_idx.abs_diff(editor.cursor.line)
                } else {
                    line_idx + 1
                };
                let color = if is_cursor_line {
                    theme.line_number_active
                } else {
                    theme.line_number
                };
                queue!(stdout, SetBackgroundColor(theme.gutter_bg.to_crossterm()))?;
                queue!(stdout, SetForegroundColor(color.to_crossterm()))?;
                queue!(
                    stdout,
                    Print(format!("{:>width$} ", number, width = gutter_width as usize - 1))
                )?;
            }

            queue!(stdout, SetBackgroundColor(line_bg.to_crossterm()))?;
            let line = editor.buffer.line_text(line_idx);
            let drawn = self.render_line(
                stdout,
                &line,
                editor.highlighter.line_highlights(line_idx),
                text_width,
                theme,
            )?;

            if drawn < text_width {
                queue!(stdout, SetBackgroundColor(line_bg.to_crossterm()))?;
                queue!(stdout, Print(" ".repeat(text_width - drawn)))?;
            }
        }

        Ok(())
    }

    /// Read-only language reference over the text area
    fn render_help(&self, stdout: &mut impl Write, view: &HelpView, theme: &Theme) -> io::Result<()> {
        let width = self.width as usize;
        let mut lines = HelpView::lines().skip(view.scroll());

        queue!(stdout, SetBackgroundColor(theme.current_line.to_crossterm()))?;
        for row in 0..self.text_height() {
            queue!(stdout, MoveTo(0, row as u16))?;
            let line = lines.next().unwrap_or("");
            let color = if line.starts_with("==") || line.starts_with("--") {
                theme.line_number
            } else if line.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                theme.syntax_keyword.fg
            } else {
                theme.foreground
            };
            queue!(stdout, SetForegroundColor(color.to_crossterm()))?;
            let text: String = format!("  {:<width$}", line, width = width)
                .chars()
                .take(width)
                .collect();
            queue!(stdout, Print(text))?;
        }
        Ok(())
    }

    /// Draw one line in styled runs, returning the number of cells used
    fn render_line(
        &self,
        stdout: &mut impl Write,
        line: &str,
        highlights: Option<&HighlightedLine>,
        max_width: usize,
        theme: &Theme,
    ) -> io::Result<usize> {
        let base = Style::new(theme.foreground);
        let mut run = String::new();
        let mut run_style = base;
        let mut drawn = 0;

        for (byte_col, ch) in line.char_indices().take(max_width) {
            let style = highlights
                .and_then(|h| h.kind_at(byte_col))
                .map(|kind| theme.syntax_style(kind))
                .unwrap_or(base);

            if style != run_style && !run.is_empty() {
                print_styled(stdout, &run, run_style)?;
                run.clear();
            }
            run_style = style;
            run.push(ch);
            drawn += 1;
        }
        if !run.is_empty() {
            print_styled(stdout, &run, run_style)?;
        }

        Ok(drawn)
    }

    fn render_completion(
        &self,
        stdout: &mut impl Write,
        editor: &Editor,
        theme: &Theme,
    ) -> io::Result<()> {
        let candidates = editor.completion.candidates();
        let Some(cursor_row) = editor.cursor.line.checked_sub(editor.scroll_offset) else {
            return Ok(());
        };

        let line = editor.buffer.line_text(editor.cursor.line);
        let prefix: String = line.chars().take(editor.cursor.col).collect();
        let token_len = current_token(&prefix, prefix.len()).chars().count();
        let anchor = editor.cursor.col.saturating_sub(token_len) as u16 + self.gutter_width(editor);

        let width = candidates
            .iter()
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(0)
            + 2;
        let width = width.min(self.width as usize);
        let x = anchor.min(self.width.saturating_sub(width as u16));

        // Below the cursor when there is room, otherwise above it
        let text_height = self.text_height();
        let rows = candidates.len().min(text_height);
        let top = if cursor_row + 1 + rows <= text_height {
            cursor_row + 1
        } else {
            cursor_row.saturating_sub(rows)
        };

        for (i, candidate) in candidates.iter().take(rows).enumerate() {
            let style = if i == editor.completion.selected_index() {
                theme.completion_selected
            } else {
                Style::new(theme.completion_fg).with_bg(theme.completion_bg)
            };
            queue!(stdout, MoveTo(x, (top + i) as u16))?;
            let entry: String = format!(" {:<width$}", candidate, width = width - 1)
                .chars()
                .take(width)
                .collect();
            print_styled(stdout, &entry, style)?;
        }

        Ok(())
    }

    fn render_status_line(
        &self,
        stdout: &mut impl Write,
        editor: &Editor,
        theme: &Theme,
    ) -> io::Result<()> {
        let status_row = self.height.saturating_sub(CHROME_ROWS);
        queue!(stdout, MoveTo(0, status_row))?;

        let bg = if self.busy {
            theme.status_busy_bg
        } else {
            theme.status_bar_bg
        };
        queue!(stdout, SetBackgroundColor(bg.to_crossterm()))?;
        queue!(stdout, SetForegroundColor(theme.status_bar_fg.to_crossterm()))?;

        let dirty = if editor.buffer.is_dirty() { " *" } else { "" };
        let left = if editor.help.is_some() {
            format!(" HELP | {} ", help::TITLE)
        } else {
            format!(" {} | {}{} ", editor.mode.display(), editor.file_name(), dirty)
        };
        let right = format!(
            " Ln: {} | Col: {} ",
            editor.cursor.line + 1,
            editor.cursor.col
        );

        let used = left.chars().count() + right.chars().count();
        let padding = (self.width as usize).saturating_sub(used);
        let status = format!("{}{}{}", left, " ".repeat(padding), right);
        let status: String = status.chars().take(self.width as usize).collect();

        queue!(stdout, SetAttribute(Attribute::Bold))?;
        queue!(stdout, Print(status))?;
        queue!(stdout, SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    fn render_command_line(
        &self,
        stdout: &mut impl Write,
        editor: &Editor,
        theme: &Theme,
    ) -> io::Result<()> {
        let row = self.height.saturating_sub(1);
        queue!(stdout, MoveTo(0, row))?;
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
        queue!(stdout, Clear(ClearType::CurrentLine))?;

        if editor.mode == Mode::Command {
            queue!(stdout, SetForegroundColor(theme.foreground.to_crossterm()))?;
            queue!(stdout, Print(format!(":{}", editor.command_buffer)))?;
        } else if let Some(msg) = &editor.message {
            let color = if msg.starts_with("Error") {
                theme.error
            } else {
                theme.warning
            };
            queue!(stdout, SetForegroundColor(color.to_crossterm()))?;
            let msg: String = msg.chars().take(self.width as usize).collect();
            queue!(stdout, Print(msg))?;
        }
        Ok(())
    }

    fn position_cursor(&self, stdout: &mut impl Write, editor: &Editor) -> io::Result<()> {
        if editor.mode == Mode::Command {
            let cmd_col = 1 + editor.command_buffer.chars().count() as u16;
            queue!(stdout, MoveTo(cmd_col, self.height.saturating_sub(1)))?;
            queue!(stdout, SetCursorStyle::BlinkingBar)?;
            queue!(stdout, Show)?;
            return Ok(());
        }

        let Some(row) = editor.cursor.line.checked_sub(editor.scroll_offset) else {
            return Ok(());
        };
        let x = (self.gutter_width(editor) as usize + editor.cursor.col)
            .min(self.width.saturating_sub(1) as usize);
        queue!(stdout, MoveTo(x as u16, row as u16))?;

        let cursor_style = match editor.mode {
            Mode::Insert => SetCursorStyle::BlinkingBar,
            _ => SetCursorStyle::SteadyBlock,
        };
        queue!(stdout, cursor_style)?;
        queue!(stdout, Show)?;
        Ok(())
    }
}

fn print_styled(stdout: &mut impl Write, text: &str, style: Style) -> io::Result<()> {
    queue!(stdout, SetForegroundColor(style.fg.to_crossterm()))?;
    if let Some(bg) = style.bg {
        queue!(stdout, SetBackgroundColor(bg.to_crossterm()))?;
    }
    if style.bold {
        queue!(stdout, SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        queue!(stdout, SetAttribute(Attribute::Italic))?;
    }
    queue!(stdout, Print(text))?;
    if style.bold || style.italic {
        // Reset clears colors too
        queue!(stdout, SetAttribute(Attribute::NormalIntensity))?;
        queue!(stdout, SetAttribute(Attribute::NoItalic))?;
    }
    Ok(())
}
