//! A minimal modal text editor for the terminal.
//!
//! The editing core is [`session::Session`]: one owned state machine over
//! the NORMAL/INSERT/COMMAND/VISUAL modes, fed one key event at a time.
//! Everything else is glue around it: [`render`] paints the session
//! snapshot, [`file`] loads and persists the document, [`config`] and
//! [`log`] cover settings and the session log.

pub mod buffer;
pub mod config;
pub mod cursor;
pub mod file;
pub mod log;
pub mod render;
pub mod selection;
pub mod session;
pub mod theme;

pub use buffer::LineBuffer;
pub use cursor::{ColumnRule, Cursor};
pub use file::{FileError, FileStore};
pub use selection::Selection;
pub use session::{Mode, Outcome, Session};
