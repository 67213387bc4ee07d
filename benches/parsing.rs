//! Benchmarks for batch and streaming parsing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ged_tree::{parse_str, parse_with_handler};

/// Benchmark batch parsing at several synthetic sizes
fn bench_parse_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_batch");

    for &line_count in &[100usize, 1000, 5000] {
        let content = generate_synthetic_document(line_count);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("parse_str", line_count),
            &content,
            |b, content| {
                b.iter(|| parse_str(black_box(content)).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark the streaming driver against the same documents
fn bench_parse_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_streaming");

    for &line_count in &[1000usize, 5000] {
        let content = generate_synthetic_document(line_count);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("parse_with_handler", line_count),
            &content,
            |b, content| {
                b.iter(|| {
                    let mut records = 0usize;
                    parse_with_handler(black_box(content.as_bytes()), |_| {
                        records += 1;
                        Ok(())
                    })
                    .unwrap();
                    records
                });
            },
        );
    }

    group.finish();
}

/// Benchmark path queries over a parsed tree
fn bench_path_query(c: &mut Criterion) {
    let content = generate_synthetic_document(1000);
    let (tree, _) = parse_str(&content).unwrap();
    let individual = tree.get_individual("@I1@").unwrap();

    c.bench_function("query_birt_date", |b| {
        b.iter(|| individual.get_value(black_box("BIRT.DATE")));
    });
}

/// Generate a synthetic GEDCOM document for benchmarking
fn generate_synthetic_document(line_count: usize) -> String {
    let mut content = String::with_capacity(line_count * 30);
    content.push_str("0 HEAD\n1 GEDC\n2 VERS 5.5\n1 CHAR UTF-8\n");

    let mut current_line = 4;
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

criterion_group!(benches, bench_parse_batch, bench_parse_streaming, bench_path_query);
criterion_main!(benches);
