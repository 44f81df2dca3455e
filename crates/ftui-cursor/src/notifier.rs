#![forbid(unsafe_code)]

//! Newline-notifying writer.
//!
//! Wraps any `Write` implementation and raises one notification per `\n`
//! byte that reaches the inner writer. Subscribers run synchronously inside
//! the write call, so by the time `write` returns every newline it carried
//! has been reported.
//!
//! # Usage
//!
//! ```
//! use ftui_cursor::notifier::NewlineNotifier;
//! use std::cell::Cell;
//! use std::io::Write;
//! use std::rc::Rc;
//!
//! let seen = Rc::new(Cell::new(0));
//! let mut writer = NewlineNotifier::new(Vec::new());
//! let counter = Rc::clone(&seen);
//! writer.subscribe(move || counter.set(counter.get() + 1));
//!
//! writer.write_all(b"one\ntwo\r\nthree").unwrap();
//! assert_eq!(seen.get(), 2);
//! assert_eq!(writer.newlines(), 2);
//! ```

use std::fmt;
use std::io::{self, Write};

/// A write wrapper that reports newlines as they are written.
pub struct NewlineNotifier<W> {
    /// The underlying writer.
    inner: W,
    /// Newline subscribers, called once per newline in subscription order.
    subscribers: Vec<Box<dyn FnMut()>>,
    /// Total newlines seen.
    newlines: u64,
    /// Total bytes accepted by the inner writer.
    bytes_written: u64,
}

impl<W> NewlineNotifier<W> {
    /// Create a new notifier wrapping the given writer.
    #[inline]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            subscribers: Vec::new(),
            newlines: 0,
            bytes_written: 0,
        }
    }

    /// Register a callback invoked once per newline written.
    pub fn subscribe<F>(&mut self, f: F)
    where
        F: FnMut() + 'static,
    {
        self.subscribers.push(Box::new(f));
    }

    /// Total newlines written through this wrapper.
    #[inline]
    pub fn newlines(&self) -> u64 {
        self.newlines
    }

    /// Total bytes written through this wrapper.
    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Get a reference to the underlying writer.
    #[inline]
    pub fn inner(&self) -> &W {
        &self.inner
    }

    /// Get a mutable reference to the underlying writer.
    ///
    /// Bytes written directly to the inner writer are not observed.
    #[inline]
    pub fn inner_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the notifier and return the inner writer.
    #[inline]
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn observe(&mut self, written: &[u8]) {
        self.bytes_written += written.len() as u64;
        for _ in memchr::memchr_iter(b'\n', written) {
            self.newlines += 1;
            for subscriber in &mut self.subscribers {
                subscriber();
            }
        }
    }
}

impl<W: Write> Write for NewlineNotifier<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.observe(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: fmt::Debug> fmt::Debug for NewlineNotifier<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewlineNotifier")
            .field("inner", &self.inner)
            .field("subscribers", &self.subscribers.len())
            .field("newlines", &self.newlines)
            .field("bytes_written", &self.bytes_written)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn counts_each_newline() {
        let mut writer = NewlineNotifier::new(Vec::new());
        writer.write_all(b"a\nb\n\nc").unwrap();
        assert_eq!(writer.newlines(), 3);
        assert_eq!(writer.bytes_written(), 6);
        assert_eq!(writer.inner(), b"a\nb\n\nc");
    }

    #[test]
    fn no_newline_no_notification() {
        let calls = Rc::new(Cell::new(0u32));
        let mut writer = NewlineNotifier::new(Vec::new());
        let c = Rc::clone(&calls);
        writer.subscribe(move || c.set(c.get() + 1));
        writer.write_all(b"\x1b[2J").unwrap();
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn every_subscriber_sees_every_newline() {
        let a = Rc::new(Cell::new(0u32));
        let b = Rc::new(Cell::new(0u32));
        let mut writer = NewlineNotifier::new(Vec::new());
        let ca = Rc::clone(&a);
        writer.subscribe(move || ca.set(ca.get() + 1));
        let cb = Rc::clone(&b);
        writer.subscribe(move || cb.set(cb.get() + 1));
        writer.write_all(b"\n\r\n").unwrap();
        assert_eq!(a.get(), 2);
        assert_eq!(b.get(), 2);
    }

    #[test]
    fn partial_write_counts_only_accepted_bytes() {
        struct Short(Vec<u8>);
        impl Write for Short {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                let n = buf.len().min(2);
                self.0.extend_from_slice(&buf[..n]);
                Ok(n)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut writer = NewlineNotifier::new(Short(Vec::new()));
        assert_eq!(writer.write(b"a\n\n\n").unwrap(), 2);
        assert_eq!(writer.newlines(), 1);
    }

    #[test]
    fn failed_write_all_counts_accepted_prefix() {
        struct Choke {
            taken: Vec<u8>,
            room: usize,
        }
        impl Write for Choke {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                if self.room == 0 {
                    return Err(io::ErrorKind::BrokenPipe.into());
                }
                let n = buf.len().min(self.room);
                self.taken.extend_from_slice(&buf[..n]);
                self.room -= n;
                Ok(n)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut writer = NewlineNotifier::new(Choke {
            taken: Vec::new(),
            room: 4,
        });
        let err = writer.write_all(b"a\nb\nccc\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(writer.inner().taken, b"a\nb\n");
        assert_eq!(writer.newlines(), 2);
        assert_eq!(writer.bytes_written(), 4);
    }

    #[test]
    fn into_inner_returns_writer() {
        let mut writer = NewlineNotifier::new(Vec::new());
        writer.write_all(b"hi").unwrap();
        assert_eq!(writer.into_inner(), b"hi");
    }
}
