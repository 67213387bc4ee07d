//! Benchmarks for the line lexer.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ged_tree::tokenizer::lex;

/// Benchmark lexing individual line shapes
fn bench_lex_line_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("lex_line_shapes");

    group.bench_function("simple_tag", |b| {
        b.iter(|| lex(black_box("0 HEAD")).unwrap());
    });

    group.bench_function("with_xref", |b| {
        b.iter(|| lex(black_box("0 @I1@ INDI")).unwrap());
    });

    group.bench_function("with_value", |b| {
        b.iter(|| lex(black_box("1 NAME John /Doe/")).unwrap());
    });

    let long_value = format!("1 NOTE {}", "A".repeat(1000));
    group.bench_function("long_value", |b| {
        b.iter(|| lex(black_box(long_value.as_str())).unwrap());
    });

    group.bench_function("malformed", |b| {
        b.iter(|| lex(black_box("not a gedcom line")).unwrap_err());
    });

    group.finish();
}

/// Benchmark lexing a synthetic document line by line
fn bench_lex_synthetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("lex_synthetic");

    for &line_count in &[100usize, 1000, 5000] {
        let content = generate_synthetic_lines(line_count);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("lines", line_count),
            &content,
            |b, content| {
                b.iter(|| {
                    let mut lexed = 0usize;
                    for line in content.lines() {
                        if lex(black_box(line)).is_ok() {
                            lexed += 1;
                        }
                    }
                    lexed
                });
            },
        );
    }

    group.finish();
}

/// Generate synthetic GEDCOM lines for benchmarking
fn generate_synthetic_lines(line_count: usize) -> String {
    let mut content = String::with_capacity(line_count * 30);
    content.push_str("0 HEAD\n1 GEDC\n2 VERS 5.5\n");

    let mut current_line = 3;
    let mut individual_id = 1;
    while current_line < line_count - 1 {
        content.push_str(&format!("0 @I{individual_id}@ INDI\n"));
        current_line += 1;
        if current_line < line_count - 1 {
            content.push_str(&format!("1 NAME Person{individual_id} /Family/\n"));
            current_line += 1;
        }
        if current_line < line_count - 1 {
            content.push_str("1 BIRT\n");
            current_line += 1;
        }
        if current_line < line_count - 1 {
            content.push_str(&format!("2 DATE {} JAN 1900\n", (individual_id % 28) + 1));
            current_line += 1;
        }
        individual_id += 1;
    }

    content.push_str("0 TRLR\n");
    content
}

criterion_group!(benches, bench_lex_line_shapes, bench_lex_synthetic);
criterion_main!(benches);
