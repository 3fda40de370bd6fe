//! Parser benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use periscope_parser::Parser;

fn bench_plain_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let input = "The quick brown fox jumps over the lazy dog. ".repeat(200);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("plain_text", |b| {
        b.iter(|| {
            let mut parser = Parser::new();
            let mut count = 0usize;
            parser.feed(input.as_bytes(), |action| {
                count += 1;
                black_box(&action);
            });
            black_box(count)
        })
    });

    group.finish();
}

fn bench_csi_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let input = "\x1b[1;31mcolor\x1b[0m\x1b[10;20H\x1b[2K".repeat(200);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("csi_heavy", |b| {
        b.iter(|| {
            let mut parser = Parser::new();
            black_box(parser.feed_collect(input.as_bytes()))
        })
    });

    group.finish();
}

fn bench_utf8_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let input = "译码器把字节流变成码点 — с кириллицей и émojis 🦀. ".repeat(100);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("utf8_text", |b| {
        b.iter(|| {
            let mut parser = Parser::new();
            black_box(parser.feed_collect(input.as_bytes()))
        })
    });

    group.finish();
}

fn bench_osc_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let input = "\x1b]2;window title with some length to it\x07".repeat(200);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("osc_strings", |b| {
        b.iter(|| {
            let mut parser = Parser::new();
            black_box(parser.feed_collect(input.as_bytes()))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_plain_text,
    bench_csi_heavy,
    bench_utf8_text,
    bench_osc_strings
);

criterion_main!(benches);
