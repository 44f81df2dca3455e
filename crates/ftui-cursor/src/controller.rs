#![forbid(unsafe_code)]

//! Cursor controller: gated, bufferable escape-sequence emission.
//!
//! The controller sits between callers and a stream. Semantic methods
//! (`up`, `erase_screen`, `bold`, ...) encode a sequence from the
//! [`codes`](crate::codes) table and send it down the gated path, which drops
//! it when the controller is disabled. Raw [`Cursor::write`] always reaches
//! the stream (or the buffer). Every byte bound for the stream goes through a
//! [`NewlineNotifier`], so the newline count stays accurate whatever path
//! produced the output.
//!
//! # Example
//!
//! ```
//! use ftui_cursor::{Cursor, CursorOptions};
//!
//! let mut out = Vec::new();
//! let mut cursor = Cursor::new(&mut out, CursorOptions::new().enabled(true))?;
//! cursor.up(2)?.forward(3)?.write("hi\n")?;
//! assert_eq!(cursor.newline_count(), 1);
//! drop(cursor);
//! assert_eq!(out, b"\x1b[2A\x1b[3Chi\n");
//! # Ok::<(), ftui_cursor::CursorError>(())
//! ```

use std::fmt;
use std::io::Write;

use smallvec::SmallVec;

use crate::axis::Axes;
use crate::codes::{
    self, Action, Attributes, Color, Movement, RESTORE_POSITION, RESTORE_WITH_ATTRIBUTES,
    SAVE_POSITION, SAVE_WITH_ATTRIBUTES,
};
use crate::dispatch::{DeleteKind, EraseKind, InsertMode};
use crate::error::{CursorError, Result};
use crate::notifier::NewlineNotifier;
use crate::options::CursorOptions;
use crate::stream::OutputStream;

/// Notification delivered to [`Cursor::on_event`] listeners.
#[derive(Debug)]
pub enum CursorEvent<'a> {
    /// Bytes that just went to the stream through [`Cursor::write`].
    Data(&'a [u8]),
    /// A soft failure: the request was ignored and nothing was written.
    Error(&'a CursorError),
}

type Listener = Box<dyn FnMut(&CursorEvent<'_>)>;

/// One queued write. Almost always a single part.
#[derive(Debug, Clone)]
struct Pending {
    parts: SmallVec<[Vec<u8>; 1]>,
}

/// Stateful ANSI cursor controller over a stream.
///
/// Not `Send`: newline notifications and listeners are single-threaded
/// callbacks. Share across threads behind a `Mutex` held by one owner.
pub struct Cursor<W: Write> {
    stream: NewlineNotifier<W>,
    enabled: bool,
    buffering: bool,
    buffer: Vec<Pending>,
    attrs: Attributes,
    listeners: Vec<Listener>,
}

/// Generates one method per movement table entry.
macro_rules! movement_methods {
    ($($(#[$meta:meta])* $method:ident => $variant:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $method(&mut self, axes: impl Into<Axes>) -> Result<&mut Self> {
                self.movement(Movement::$variant, axes)
            }
        )*
    };
}

/// Generates one method per action table entry.
macro_rules! action_methods {
    ($($(#[$meta:meta])* $method:ident => $variant:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $method(&mut self) -> Result<&mut Self> {
                self.action(Action::$variant)
            }
        )*
    };
}

impl<W: OutputStream> Cursor<W> {
    /// Create a controller over `stream`.
    ///
    /// Pass `&mut stream` to keep ownership; the controller never closes it.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::InvalidStream`] if the stream reports itself as
    /// not writable.
    pub fn new(stream: W, options: CursorOptions) -> Result<Self> {
        if !stream.is_writable() {
            crate::warn!("refusing non-writable stream");
            return Err(CursorError::InvalidStream);
        }

        let enabled = options.resolved_enabled();
        crate::debug!(enabled, buffering = options.buffering, "cursor controller created");

        Ok(Self {
            stream: NewlineNotifier::new(stream),
            enabled,
            buffering: options.buffering,
            buffer: Vec::new(),
            attrs: Attributes::empty(),
            listeners: Vec::new(),
        })
    }

    /// Create a controller with default options (disabled, not buffering).
    ///
    /// # Errors
    ///
    /// Same as [`Cursor::new`].
    pub fn with_defaults(stream: W) -> Result<Self> {
        Self::new(stream, CursorOptions::default())
    }
}

impl<W: Write> Cursor<W> {
    // =========================================================================
    // State
    // =========================================================================

    /// Let semantic methods emit sequences.
    pub fn enable(&mut self) -> &mut Self {
        self.enabled = true;
        self
    }

    /// Suppress sequences from semantic methods. Raw writes still go through.
    pub fn disable(&mut self) -> &mut Self {
        self.enabled = false;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    #[must_use]
    pub fn is_buffering(&self) -> bool {
        self.buffering
    }

    /// Number of queued writes waiting for [`Cursor::flush`].
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Newlines that have reached the stream since construction.
    #[inline]
    #[must_use]
    pub fn newline_count(&self) -> u64 {
        self.stream.newlines()
    }

    /// Bytes that have reached the stream since construction.
    #[inline]
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.stream.bytes_written()
    }

    /// Last-known text attributes.
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        self.attrs
    }

    #[must_use]
    pub fn is_bold(&self) -> bool {
        self.attrs.contains(Attributes::BOLD)
    }

    #[must_use]
    pub fn is_italic(&self) -> bool {
        self.attrs.contains(Attributes::ITALIC)
    }

    #[must_use]
    pub fn is_underline(&self) -> bool {
        self.attrs.contains(Attributes::UNDERLINE)
    }

    #[must_use]
    pub fn is_inverse(&self) -> bool {
        self.attrs.contains(Attributes::INVERSE)
    }

    // =========================================================================
    // Observers and stream access
    // =========================================================================

    /// Register a listener for data and soft-error events.
    pub fn on_event<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&CursorEvent<'_>) + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Register a callback invoked once per newline that reaches the stream.
    pub fn on_newline<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut() + 'static,
    {
        self.stream.subscribe(f);
        self
    }

    /// Get a reference to the underlying stream.
    #[inline]
    pub fn get_ref(&self) -> &W {
        self.stream.inner()
    }

    /// Get a mutable reference to the underlying stream.
    ///
    /// Bytes written directly here bypass the controller and are not counted.
    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        self.stream.inner_mut()
    }

    /// Consume the controller and return the stream. Queued writes are
    /// discarded; flush first to keep them.
    pub fn into_inner(self) -> W {
        self.stream.into_inner()
    }

    fn notify(&mut self, event: &CursorEvent<'_>) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    fn report(&mut self, err: &CursorError) -> &mut Self {
        crate::warn!(error = %err, "ignoring cursor request");
        self.notify(&CursorEvent::Error(err));
        self
    }

    // =========================================================================
    // Write paths
    // =========================================================================

    /// Raw write, never gated by [`Cursor::is_enabled`].
    ///
    /// Queued while buffering; otherwise written to the stream and announced
    /// as [`CursorEvent::Data`].
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn write(&mut self, data: impl AsRef<[u8]>) -> Result<&mut Self> {
        let data = data.as_ref();
        if self.buffering {
            let mut parts = SmallVec::new();
            parts.push(data.to_vec());
            self.buffer.push(Pending { parts });
            return Ok(self);
        }
        self.stream.write_all(data)?;
        self.notify(&CursorEvent::Data(data));
        Ok(self)
    }

    /// Multi-part raw write.
    ///
    /// Unbuffered, the parts are written in order and the first one is
    /// announced. Buffered, they are queued as one entry, which
    /// [`Cursor::flush`] will refuse unless it has exactly one part.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn write_parts(&mut self, parts: &[&[u8]]) -> Result<&mut Self> {
        if self.buffering {
            let parts = parts.iter().map(|p| p.to_vec()).collect();
            self.buffer.push(Pending { parts });
            return Ok(self);
        }
        for part in parts {
            self.stream.write_all(part)?;
        }
        let first = parts.first().copied().unwrap_or_default();
        self.notify(&CursorEvent::Data(first));
        Ok(self)
    }

    /// Gated write used by every semantic method.
    fn emit(&mut self, seq: &[u8]) -> Result<&mut Self> {
        if !self.enabled {
            return Ok(self);
        }
        crate::trace!(seq = ?String::from_utf8_lossy(seq), "emit");
        self.write(seq)
    }

    // =========================================================================
    // Buffering
    // =========================================================================

    /// Start queuing writes. Idempotent.
    pub fn buffer(&mut self) -> &mut Self {
        self.buffering = true;
        self
    }

    /// Stop buffering and send everything queued as one write.
    ///
    /// Runs even when nothing is queued, producing an empty write.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::MultiPartBuffered`] if any queued entry came
    /// from a multi-part write; buffering stays on and the queue is kept.
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn flush(&mut self) -> Result<&mut Self> {
        if let Some((index, entry)) = self
            .buffer
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.parts.len() != 1)
        {
            return Err(CursorError::MultiPartBuffered {
                index,
                parts: entry.parts.len(),
            });
        }

        self.buffering = false;
        let total = self.buffer.iter().map(|e| e.parts[0].len()).sum();
        let mut payload = Vec::with_capacity(total);
        for entry in self.buffer.drain(..) {
            payload.extend_from_slice(&entry.parts[0]);
        }
        crate::debug!(bytes = payload.len(), "flushing buffered writes");
        self.write(payload)
    }

    // =========================================================================
    // Table-driven emitters
    // =========================================================================

    /// Emit a movement. Empty `axes` writes the bare code.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn movement(&mut self, movement: Movement, axes: impl Into<Axes>) -> Result<&mut Self> {
        if !self.enabled {
            return Ok(self);
        }
        let args = axes.into().normalized();
        crate::trace!(movement = movement.name(), args = ?args.as_slice(), "emit movement");
        let mut seq = Vec::with_capacity(8);
        movement.encode(&mut seq, &args)?;
        self.emit(&seq)
    }

    /// Emit an action and record its effect on the tracked attributes.
    ///
    /// Attribute state follows the request even while disabled.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn action(&mut self, action: Action) -> Result<&mut Self> {
        self.attrs = action.apply(self.attrs);
        if !self.enabled {
            return Ok(self);
        }
        crate::trace!(action = action.name(), "emit action");
        let mut seq = Vec::with_capacity(8);
        action.encode(&mut seq)?;
        self.emit(&seq)
    }

    movement_methods! {
        /// `CSI n A`
        up => Up;
        /// `CSI n B`
        down => Down;
        /// `CSI n C`
        forward => Forward;
        /// `CSI n D`
        backward => Backward;
        /// `CSI n E`
        next_line => NextLine;
        /// `CSI n F`
        previous_line => PreviousLine;
        /// `CSI n G`
        horizontal_absolute => HorizontalAbsolute;
        /// `CSI row ; col H`
        position => Position;
        /// `CSI n S`
        scroll_up => ScrollUp;
        /// `CSI n T`
        scroll_down => ScrollDown;
        /// `CSI n M`
        delete_line => DeleteLine;
        /// `CSI n P`
        delete_char => DeleteChar;
        /// `CSI n X`
        erase_chars => EraseChars;
    }

    action_methods! {
        /// Clear from the cursor to the end of the line.
        erase_right => EraseRight;
        /// Clear from the start of the line to the cursor.
        erase_left => EraseLeft;
        erase_line => EraseLine;
        erase_down => EraseDown;
        erase_up => EraseUp;
        erase_screen => EraseScreen;
        bold => Bold;
        italic => Italic;
        underline => Underline;
        inverse => Inverse;
        reset_bold => ResetBold;
        reset_italic => ResetItalic;
        reset_underline => ResetUnderline;
        reset_inverse => ResetInverse;
        /// Reset every attribute and color.
        reset => Reset;
        hide => Hide;
        show => Show;
        /// Ask the terminal to report the cursor position on its input.
        query_position => QueryPosition;
    }

    // =========================================================================
    // Compound operations
    // =========================================================================

    /// Move relative to the current position: vertical first, then
    /// horizontal. Negative `y` is up, negative `x` is left. Zero on an axis
    /// emits nothing for it.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn move_by(&mut self, x: i32, y: i32) -> Result<&mut Self> {
        match y.signum() {
            -1 => {
                self.up(-f64::from(y))?;
            }
            1 => {
                self.down(y)?;
            }
            _ => {}
        }
        match x.signum() {
            1 => {
                self.forward(x)?;
            }
            -1 => {
                self.backward(-f64::from(x))?;
            }
            _ => {}
        }
        Ok(self)
    }

    /// Absolute position, 1-indexed: column `x`, row `y`.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn goto(&mut self, x: u16, y: u16) -> Result<&mut Self> {
        self.position((y, x))
    }

    /// Ring the terminal bell.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn beep(&mut self) -> Result<&mut Self> {
        self.emit(codes::BEEP)
    }

    /// Set the foreground color.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn fg(&mut self, color: Color) -> Result<&mut Self> {
        let mut seq = Vec::with_capacity(20);
        color.encode_fg(&mut seq)?;
        self.emit(&seq)
    }

    /// Set the background color.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn bg(&mut self, color: Color) -> Result<&mut Self> {
        let mut seq = Vec::with_capacity(20);
        color.encode_bg(&mut seq)?;
        self.emit(&seq)
    }

    /// Clear a region.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn erase(&mut self, kind: EraseKind) -> Result<&mut Self> {
        match kind.action() {
            Some(action) => self.action(action),
            None => self.erase_chars(()),
        }
    }

    /// Clear a region named `$`, `^`, `right`, `left`, `line`, `down`, `up`,
    /// `screen` or `chars`. The first letter may be capitalized.
    ///
    /// An unknown name is reported as [`CursorEvent::Error`] and nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn erase_named(&mut self, name: &str) -> Result<&mut Self> {
        match name.parse::<EraseKind>() {
            Ok(kind) => self.erase(kind),
            Err(err) => Ok(self.report(&err)),
        }
    }

    /// Delete `n` lines or characters. `None` lets the count normalize to 1.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn delete(&mut self, kind: DeleteKind, n: Option<u32>) -> Result<&mut Self> {
        self.movement(kind.movement(), n.map(f64::from))
    }

    /// Delete by name (`line` or `char`, first letter in either case).
    ///
    /// An unknown name is reported as [`CursorEvent::Error`] and nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn delete_named(&mut self, name: &str, n: Option<u32>) -> Result<&mut Self> {
        match name.parse::<DeleteKind>() {
            Ok(kind) => self.delete(kind, n),
            Err(err) => Ok(self.report(&err)),
        }
    }

    /// Toggle insert mode or insert blank lines/characters.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn insert(&mut self, mode: InsertMode) -> Result<&mut Self> {
        let seq = match mode {
            InsertMode::On => format!("{}{}", codes::CSI, codes::INSERT_MODE_ON),
            InsertMode::Off => format!("{}{}", codes::CSI, codes::INSERT_MODE_OFF),
            InsertMode::Lines(n) => format!("{}{}{}", codes::CSI, n.max(1), codes::INSERT_LINES),
            InsertMode::Chars(n) => format!("{}{}{}", codes::CSI, n.max(1), codes::INSERT_CHARS),
        };
        self.emit(seq.as_bytes())
    }

    /// Insert by name: `on`/`true`, `off`/`false`, `line` or `char`.
    ///
    /// An unknown name is reported as [`CursorEvent::Error`] and nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn insert_named(&mut self, name: &str, n: Option<u32>) -> Result<&mut Self> {
        match InsertMode::parse(name, n) {
            Ok(mode) => self.insert(mode),
            Err(err) => Ok(self.report(&err)),
        }
    }

    // =========================================================================
    // Save / restore
    // =========================================================================

    /// Save the cursor. With attributes uses DECSC, otherwise `CSI s`.
    ///
    /// Goes straight to the stream even while buffering, so the saved
    /// position is never deferred past later queued output.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn save(&mut self, with_attributes: bool) -> Result<&mut Self> {
        let seq = if with_attributes {
            SAVE_WITH_ATTRIBUTES
        } else {
            SAVE_POSITION
        };
        self.write_unbuffered(seq)
    }

    /// Restore what [`Cursor::save`] stored. Same variant and buffering rules.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Io`] if the stream fails.
    pub fn restore(&mut self, with_attributes: bool) -> Result<&mut Self> {
        let seq = if with_attributes {
            RESTORE_WITH_ATTRIBUTES
        } else {
            RESTORE_POSITION
        };
        self.write_unbuffered(seq)
    }

    fn write_unbuffered(&mut self, seq: &[u8]) -> Result<&mut Self> {
        if self.enabled {
            self.stream.write_all(seq)?;
        }
        Ok(self)
    }
}

impl<W: Write + fmt::Debug> fmt::Debug for Cursor<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("stream", &self.stream)
            .field("enabled", &self.enabled)
            .field("buffering", &self.buffering)
            .field("pending", &self.buffer.len())
            .field("attrs", &self.attrs)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
