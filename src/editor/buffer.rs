use ropey::Rope;
use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

/// Rope-backed script text with its file path and dirty flag
pub struct Buffer {
    text: Rope,
    filepath: Option<PathBuf>,
    dirty: bool,
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            text: Rope::new(),
            filepath: None,
            dirty: false,
        }
    }

    /// Load a script; a path that does not exist yet opens an empty buffer
    /// that will be created on first save.
    pub fn from_file(path: PathBuf) -> io::Result<Self> {
        let text = match File::open(&path) {
            Ok(file) => Rope::from_reader(BufReader::new(file))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Rope::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            text,
            filepath: Some(path),
            dirty: false,
        })
    }

    #[cfg(test)]
    pub fn from_text(s: &str) -> Self {
        Self {
            text: Rope::from_str(s),
            filepath: None,
            dirty: false,
        }
    }

    pub fn save(&mut self) -> io::Result<()> {
        let Some(path) = &self.filepath else {
            return Err(io::Error::new(io::ErrorKind::NotFound, "No file path"));
        };
        let mut file = File::create(path)?;
        self.text.write_to(&mut file)?;
        self.dirty = false;
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.filepath.as_deref()
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.filepath = Some(path);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Full text snapshot for the analysis passes
    pub fn text(&self) -> String {
        self.text.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    pub fn line(&self, idx: usize) -> ropey::RopeSlice<'_> {
        self.text.line(idx)
    }

    /// Line content without its newline
    pub fn line_text(&self, idx: usize) -> String {
        let mut line = self.text.line(idx).to_string();
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        line
    }

    /// Length in chars excluding the line break (`\n` or `\r\n`)
    pub fn line_len(&self, idx: usize) -> usize {
        let line = self.text.line(idx);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    /// Line break used by the document, taken from its first line
    pub fn line_ending(&self) -> &'static str {
        let first = self.text.line(0);
        let len = first.len_chars();
        if len >= 2 && first.char(len - 2) == '\r' && first.char(len - 1) == '\n' {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Get character at position, returns None if out of bounds
    pub fn char_at(&self, line: usize, col: usize) -> Option<char> {
        if line >= self.line_count() {
            return None;
        }
        let rope_line = self.text.line(line);
        if col >= rope_line.len_chars() {
            return None;
        }
        Some(rope_line.char(col))
    }

    fn line_col_to_char(&self, line: usize, col: usize) -> usize {
        self.text.line_to_char(line) + col
    }

    /// Byte offset of (line, col) into the full text
    pub fn byte_offset(&self, line: usize, col: usize) -> usize {
        self.text.char_to_byte(self.line_col_to_char(line, col))
    }

    pub fn insert_char(&mut self, line: usize, col: usize, ch: char) {
        let idx = self.line_col_to_char(line, col);
        self.text.insert_char(idx, ch);
        self.dirty = true;
    }

    pub fn insert_str(&mut self, line: usize, col: usize, s: &str) {
        let idx = self.line_col_to_char(line, col);
        self.text.insert(idx, s);
        self.dirty = true;
    }

    /// Remove `count` chars immediately before (line, col)
    pub fn delete_before(&mut self, line: usize, col: usize, count: usize) {
        let end = self.line_col_to_char(line, col);
        let start = end.saturating_sub(count);
        if start < end {
            self.text.remove(start..end);
            self.dirty = true;
        }
    }

    /// Delete the character before the given position (backspace)
    pub fn delete_char_backward(&mut self, line: usize, col: usize) -> bool {
        let idx = self.line_col_to_char(line, col);
        if idx == 0 {
            return false;
        }
        // A CRLF break goes as one unit
        let start = if idx >= 2 && self.text.char(idx - 1) == '\n' && self.text.char(idx - 2) == '\r' {
            idx - 2
        } else {
            idx - 1
        };
        self.text.remove(start..idx);
        self.dirty = true;
        true
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty() {
        let buf = Buffer::new();
        assert_eq!(buf.line_count(), 1); // empty rope has 1 line
        assert!(!buf.is_dirty());
    }

    #[test]
    fn line_text_strips_newline() {
        let buf = Buffer::from_text("si (x)\r\nsi!");
        assert_eq!(buf.line_text(0), "si (x)");
        assert_eq!(buf.line_text(1), "si!");
    }

    #[test]
    fn line_len_handles_empty_lines() {
        let buf = Buffer::from_text("hola\n\nmundo");
        assert_eq!(buf.line_len(0), 4);
        assert_eq!(buf.line_len(1), 0);
        assert_eq!(buf.line_len(2), 5);
    }

    #[test]
    fn byte_offset_counts_multibyte_chars() {
        let buf = Buffer::from_text("año\nvn");
        assert_eq!(buf.byte_offset(0, 3), 4);
        assert_eq!(buf.byte_offset(1, 2), 7);
    }

    #[test]
    fn delete_before_removes_token() {
        let mut buf = Buffer::from_text("vn x = mos");
        buf.delete_before(0, 10, 3);
        assert_eq!(buf.text(), "vn x = ");
        assert!(buf.is_dirty());
    }

    #[test]
    fn backspace_joins_lines() {
        let mut buf = Buffer::from_text("a\nb");
        assert!(buf.delete_char_backward(1, 0));
        assert_eq!(buf.text(), "ab");
        assert!(!buf.delete_char_backward(0, 0));
    }

    #[test]
    fn missing_file_opens_empty_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nuevo.red");
        let buf = Buffer::from_file(path.clone()).unwrap();
        assert_eq!(buf.text(), "");
        assert_eq!(buf.path(), Some(path.as_path()));
    }

    #[test]
    fn save_writes_and_clears_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.red");
        let mut buf = Buffer::new();
        buf.set_path(path.clone());
        buf.insert_str(0, 0, "vn x = 1\n");
        buf.save().unwrap();

        assert!(!buf.is_dirty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "vn x = 1\n");
    }

    #[test]
    fn save_without_path_fails() {
        let mut buf = Buffer::from_text("x");
        assert!(buf.save().is_err());
    }

    #[test]
    fn line_len_excludes_crlf() {
        let buf = Buffer::from_text("si\r\nx");
        assert_eq!(buf.line_len(0), 2);
        assert_eq!(buf.line_len(1), 1);
        assert_eq!(buf.line_ending(), "\r\n");
        assert_eq!(Buffer::from_text("si\nx").line_ending(), "\n");
    }

    #[test]
    fn backspace_joins_crlf_lines() {
        let mut buf = Buffer::from_text("ab\r\ncd");
        assert!(buf.delete_char_backward(1, 0));
        assert_eq!(buf.text(), "abcd");
    }
}
