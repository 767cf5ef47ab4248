pub mod assist;
mod buffer;
mod cursor;
mod editor;
pub mod help;
mod mode;

pub use buffer::Buffer;
pub use cursor::Cursor;
pub use editor::{Editor, PendingAction};
pub use help::HelpView;
pub use mode::Mode;
