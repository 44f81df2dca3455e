#![forbid(unsafe_code)]

//! The stream contract the controller writes to.

use std::fs::File;
use std::io::{self, BufWriter, LineWriter, Write};

/// A writer the controller can drive.
///
/// `is_writable` lets a sink refuse the controller at construction time,
/// for example a stream that has already been shut down. Implementations for
/// the standard sinks always accept.
pub trait OutputStream: Write {
    /// Whether the stream currently accepts writes.
    fn is_writable(&self) -> bool {
        true
    }
}

impl OutputStream for Vec<u8> {}
impl OutputStream for File {}
impl OutputStream for io::Stdout {}
impl OutputStream for io::Stderr {}
impl OutputStream for io::StdoutLock<'_> {}
impl OutputStream for io::StderrLock<'_> {}
impl OutputStream for io::Sink {}
impl OutputStream for io::Cursor<Vec<u8>> {}
impl OutputStream for io::Cursor<&mut Vec<u8>> {}

impl<W: OutputStream> OutputStream for BufWriter<W> {
    fn is_writable(&self) -> bool {
        self.get_ref().is_writable()
    }
}

impl<W: OutputStream> OutputStream for LineWriter<W> {
    fn is_writable(&self) -> bool {
        self.get_ref().is_writable()
    }
}

impl<T: OutputStream + ?Sized> OutputStream for &mut T {
    fn is_writable(&self) -> bool {
        (**self).is_writable()
    }
}

impl<T: OutputStream + ?Sized> OutputStream for Box<T> {
    fn is_writable(&self) -> bool {
        (**self).is_writable()
    }
}
