use std::cell::Cell;
use std::io::{BufWriter, Write};
use std::rc::Rc;

use ftui_cursor::{Cursor, CursorError, CursorOptions, DeleteKind, EraseKind, OutputStream};

#[test]
fn borrowed_stream_outlives_controller() {
    let mut out = Vec::new();
    {
        let mut cursor = Cursor::new(&mut out, CursorOptions::new().enabled(true)).unwrap();
        cursor
            .erase(EraseKind::Screen)
            .unwrap()
            .goto(1, 1)
            .unwrap()
            .write("ready\n")
            .unwrap();
        assert_eq!(cursor.newline_count(), 1);
    }
    assert_eq!(out, b"\x1b[2J\x1b[1;1Hready\n");
}

#[test]
fn buffered_writer_stream() {
    let mut cursor = Cursor::new(
        BufWriter::new(Vec::new()),
        CursorOptions::new().interactive(true),
    )
    .unwrap();
    assert!(cursor.is_enabled());
    cursor.delete(DeleteKind::Char, Some(4)).unwrap();
    cursor.get_mut().flush().unwrap();
    let inner = cursor.into_inner().into_inner().unwrap();
    assert_eq!(inner, b"\x1b[4P");
}

#[test]
fn options_can_start_buffering() {
    let mut cursor = Cursor::new(
        Vec::new(),
        CursorOptions::new().enabled(true).buffering(true),
    )
    .unwrap();
    assert!(cursor.is_buffering());
    cursor.hide().unwrap().write("x").unwrap().show().unwrap();
    assert!(cursor.get_ref().is_empty());
    cursor.flush().unwrap();
    assert_eq!(cursor.get_ref().as_slice(), b"\x1b[?25lx\x1b[?25h");
}

#[test]
fn save_and_restore_are_never_buffered() {
    // These two bypass the queue and land ahead of anything still buffered.
    let mut cursor = Cursor::new(Vec::new(), CursorOptions::new().enabled(true)).unwrap();
    cursor.buffer();
    cursor.up(1).unwrap();
    cursor.save(true).unwrap();
    cursor.restore(true).unwrap();
    assert_eq!(cursor.get_ref().as_slice(), b"\x1b7\x1b8");
    assert_eq!(cursor.pending(), 1);
    cursor.flush().unwrap();
    assert_eq!(cursor.get_ref().as_slice(), b"\x1b7\x1b8\x1b[1A");
}

#[test]
fn newline_listeners_fire_per_newline() {
    let mut cursor = Cursor::with_defaults(Vec::new()).unwrap();
    let lines = Rc::new(Cell::new(0u32));
    let seen = Rc::clone(&lines);
    cursor.on_newline(move || seen.set(seen.get() + 1));
    cursor.write("one\r\ntwo\nthree").unwrap();
    assert_eq!(lines.get(), 2);
    assert_eq!(cursor.newline_count(), 2);
}

#[test]
fn failing_stream_surfaces_io_error() {
    #[derive(Debug)]
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl OutputStream for Broken {}

    let mut cursor = Cursor::new(Broken, CursorOptions::new().enabled(true)).unwrap();
    let err = cursor.erase_line().unwrap_err();
    assert!(matches!(err, CursorError::Io(_)));
    assert_eq!(cursor.newline_count(), 0);
}

#[test]
fn partially_accepted_write_still_counts_delivered_newlines() {
    #[derive(Debug)]
    struct Choke {
        taken: Vec<u8>,
        room: usize,
    }

    impl Write for Choke {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.room == 0 {
                return Err(std::io::ErrorKind::BrokenPipe.into());
            }
            let n = buf.len().min(self.room);
            self.taken.extend_from_slice(&buf[..n]);
            self.room -= n;
            Ok(n)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl OutputStream for Choke {}

    let stream = Choke {
        taken: Vec::new(),
        room: 4,
    };
    let mut cursor = Cursor::new(stream, CursorOptions::new()).unwrap();
    let err = cursor.write("a\nb\nccc\n").unwrap_err();
    assert!(matches!(err, CursorError::Io(_)));
    assert_eq!(cursor.get_ref().taken, b"a\nb\n");
    assert_eq!(cursor.newline_count(), 2);
}
