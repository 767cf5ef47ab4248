mod handler;

pub use handler::{handle_event, terminal_event};
