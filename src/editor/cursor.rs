/// Caret position as (line, char column)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self { line: 0, col: 0 }
    }

    pub fn at(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    pub fn move_left(&mut self) {
        self.col = self.col.saturating_sub(1);
    }

    pub fn move_right(&mut self, line_len: usize) {
        self.col = (self.col + 1).min(line_len);
    }

    pub fn move_up(&mut self) {
        self.line = self.line.saturating_sub(1);
    }

    pub fn move_down(&mut self, line_count: usize) {
        self.line = (self.line + 1).min(line_count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cursor_starts_at_origin() {
        assert_eq!(Cursor::new(), Cursor::at(0, 0));
    }

    #[test]
    fn move_left_stops_at_zero() {
        let mut cursor = Cursor::at(0, 1);
        cursor.move_left();
        cursor.move_left();
        assert_eq!(cursor.col, 0);
    }

    #[test]
    fn move_right_clamps_to_line_len() {
        let mut cursor = Cursor::at(0, 9);
        cursor.move_right(10);
        cursor.move_right(10);
        assert_eq!(cursor.col, 10);
    }

    #[test]
    fn move_up_stops_at_zero() {
        let mut cursor = Cursor::new();
        cursor.move_up();
        assert_eq!(cursor.line, 0);
    }

    #[test]
    fn move_down_clamps_to_last_line() {
        let mut cursor = Cursor::at(8, 0);
        cursor.move_down(10);
        cursor.move_down(10);
        assert_eq!(cursor.line, 9);
    }
}
