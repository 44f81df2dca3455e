//! Benchmarks for cursor sequence emission.
//!
//! Compares direct emission against buffer-then-flush for a typical
//! status-line redraw, plus the cost of the disabled gate.
//!
//! Run with: cargo bench -p ftui-cursor --bench emit_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ftui_cursor::{Color, Cursor, CursorOptions, EraseKind};
use std::hint::black_box;

fn redraw(cursor: &mut Cursor<Vec<u8>>, lines: u16) {
    for row in 1..=lines {
        cursor
            .goto(1, row)
            .unwrap()
            .erase(EraseKind::Line)
            .unwrap()
            .fg(Color::CYAN)
            .unwrap()
            .write("status line\n")
            .unwrap()
            .reset()
            .unwrap();
    }
}

fn bench_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor/redraw");

    for lines in [1u16, 24, 100] {
        group.throughput(Throughput::Elements(u64::from(lines)));

        group.bench_with_input(BenchmarkId::new("direct", lines), &lines, |b, &lines| {
            b.iter(|| {
                let mut cursor =
                    Cursor::new(Vec::new(), CursorOptions::new().enabled(true)).unwrap();
                redraw(&mut cursor, lines);
                black_box(cursor.into_inner())
            })
        });

        group.bench_with_input(BenchmarkId::new("buffered", lines), &lines, |b, &lines| {
            b.iter(|| {
                let mut cursor =
                    Cursor::new(Vec::new(), CursorOptions::new().enabled(true)).unwrap();
                cursor.buffer();
                redraw(&mut cursor, lines);
                cursor.flush().unwrap();
                black_box(cursor.into_inner())
            })
        });

        group.bench_with_input(BenchmarkId::new("disabled", lines), &lines, |b, &lines| {
            b.iter(|| {
                let mut cursor = Cursor::with_defaults(Vec::new()).unwrap();
                redraw(&mut cursor, lines);
                black_box(cursor.into_inner())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_redraw);
criterion_main!(benches);
