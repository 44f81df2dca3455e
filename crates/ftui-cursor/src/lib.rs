#![forbid(unsafe_code)]

//! Cursor: stateful ANSI cursor control over any writer.
//!
//! [`Cursor`] turns terminal intents (move, erase, insert, attribute toggles,
//! save/restore) into escape sequences from a fixed [`codes`] table. Output is
//! gated by an enable flag, can be buffered and flushed as one write, and
//! every newline that reaches the stream is counted.

pub mod axis;
pub mod codes;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod options;
pub mod stream;

pub use axis::{Axes, to_axis};
pub use codes::{Action, Attributes, Color, Movement};
pub use controller::{Cursor, CursorEvent};
pub use dispatch::{DeleteKind, EraseKind, InsertMode};
pub use error::{CursorError, Result};
pub use notifier::NewlineNotifier;
pub use options::CursorOptions;
pub use stream::OutputStream;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
