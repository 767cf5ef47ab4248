mod colors;
mod theme;

pub use colors::Color;
pub use theme::{Style, Theme};

pub fn list_builtin_themes() -> Vec<&'static str> {
    vec!["redsync", "gruvbox-dark"]
}

pub fn get_builtin_theme(name: &str) -> Option<Theme> {
    match name {
        "redsync" => Some(Theme::redsync()),
        "gruvbox-dark" => Some(Theme::gruvbox_dark()),
        _ => None,
    }
}
