use super::Color;
use crate::syntax::SpanKind;

/// Style for a UI element (color + optional attributes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bg: Option<Color>,
    pub bold: bool,
    pub italic: bool,
}

impl Style {
    pub const fn new(fg: Color) -> Self {
        Self {
            fg,
            bg: None,
            bold: false,
            italic: false,
        }
    }

    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

/// Complete theme definition
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Editor chrome
    pub background: Color,
    pub foreground: Color,
    pub cursor: Color,
    pub current_line: Color,

    // Gutter
    pub gutter_bg: Color,
    pub line_number: Color,
    pub line_number_active: Color,

    // Status line
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_busy_bg: Color,

    // Completion popup
    pub completion_bg: Color,
    pub completion_fg: Color,
    pub completion_selected: Style,

    // Syntax highlighting
    pub syntax_keyword: Style,
    pub syntax_module: Style,
    pub syntax_operator: Style,
    pub syntax_string: Style,
    pub syntax_comment: Style,

    pub error: Color,
    pub warning: Color,
}

impl Theme {
    /// The RedSync Studio palette
    pub fn redsync() -> Self {
        Self {
            name: "redsync".to_string(),
            background: Color::rgb(0x12, 0x12, 0x12),
            foreground: Color::rgb(0xf1, 0xfa, 0xee),
            cursor: Color::rgb(0xf1, 0xc4, 0x0f),
            current_line: Color::rgb(0x1a, 0x1a, 0x1a),

            gutter_bg: Color::rgb(0x1e, 0x1e, 0x1e),
            line_number: Color::rgb(0x60, 0x60, 0x60),
            line_number_active: Color::rgb(0xf1, 0xc4, 0x0f),

            status_bar_bg: Color::rgb(0x00, 0x7a, 0xcc),
            status_bar_fg: Color::WHITE,
            status_busy_bg: Color::rgb(0xcc, 0x88, 0x00),

            completion_bg: Color::rgb(0x25, 0x25, 0x26),
            completion_fg: Color::rgb(0xc5, 0xc5, 0xc5),
            completion_selected: Style::new(Color::WHITE).with_bg(Color::rgb(0x09, 0x47, 0x71)),

            syntax_keyword: Style::new(Color::rgb(0xf1, 0xc4, 0x0f)).bold(),
            syntax_module: Style::new(Color::rgb(0xff, 0x8c, 0x42)),
            syntax_operator: Style::new(Color::rgb(0x00, 0xf5, 0xff)),
            syntax_string: Style::new(Color::rgb(0x48, 0xca, 0xe4)),
            syntax_comment: Style::new(Color::rgb(0x6c, 0x75, 0x7d)).italic(),

            error: Color::rgb(0xe0, 0x4f, 0x4f),
            warning: Color::rgb(0xf1, 0xc4, 0x0f),
        }
    }

    /// Gruvbox Dark - warm retro theme
    pub fn gruvbox_dark() -> Self {
        Self {
            name: "gruvbox-dark".to_string(),
            background: Color::rgb(0x28, 0x28, 0x28),
            foreground: Color::rgb(0xeb, 0xdb, 0xb2),
            cursor: Color::rgb(0xfe, 0x80, 0x19),
            current_line: Color::rgb(0x32, 0x30, 0x2f),

            gutter_bg: Color::rgb(0x28, 0x28, 0x28),
            line_number: Color::rgb(0x66, 0x5c, 0x54),
            line_number_active: Color::rgb(0xfa, 0xbd, 0x2f),

            status_bar_bg: Color::rgb(0x3c, 0x38, 0x36),
            status_bar_fg: Color::rgb(0xeb, 0xdb, 0xb2),
            status_busy_bg: Color::rgb(0xd7, 0x99, 0x21),

            completion_bg: Color::rgb(0x1d, 0x20, 0x21),
            completion_fg: Color::rgb(0xa8, 0x99, 0x84),
            completion_selected: Style::new(Color::rgb(0x28, 0x28, 0x28))
                .with_bg(Color::rgb(0xfe, 0x80, 0x19)),

            syntax_keyword: Style::new(Color::rgb(0xfb, 0x49, 0x34)).bold(),
            syntax_module: Style::new(Color::rgb(0xfa, 0xbd, 0x2f)),
            syntax_operator: Color::rgb(0xfe, 0x80, 0x19).into(),
            syntax_string: Style::new(Color::rgb(0xb8, 0xbb, 0x26)),
            syntax_comment: Style::new(Color::rgb(0x92, 0x83, 0x74)).italic(),

            error: Color::rgb(0xfb, 0x49, 0x34),
            warning: Color::rgb(0xfa, 0xbd, 0x2f),
        }
    }

    pub fn syntax_style(&self, kind: SpanKind) -> Style {
        match kind {
            SpanKind::Keyword => self.syntax_keyword,
            SpanKind::ModuleCall => self.syntax_module,
            SpanKind::Operator => self.syntax_operator,
            SpanKind::String => self.syntax_string,
            SpanKind::Comment => self.syntax_comment,
        }
    }
}

impl From<Color> for Style {
    fn from(color: Color) -> Self {
        Style::new(color)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::redsync()
    }
}
