use std::num::NonZero;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dict_codec::{Dictionary, DictionaryCodec};
use dict_codec_benchmarks::generate_column;

const ROWS: usize = 1 << 16;
const DISTINCT: usize = 64;

fn setup_codec() -> (tempfile::TempDir, DictionaryCodec) {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("column.txt");
    std::fs::write(&input, generate_column(ROWS, DISTINCT).join("\n")).unwrap();

    let codec = DictionaryCodec::new();
    codec
        .encode(&input, &dir.path().join("column.dict"))
        .unwrap();
    (dir, codec)
}

fn equality_queries(c: &mut Criterion) {
    let (_dir, codec) = setup_codec();

    c.bench_function("query_equal_scan", |b| {
        b.iter(|| black_box(codec.query_equal_scan("alpha_0000")))
    });
    c.bench_function("query_equal_index", |b| {
        b.iter(|| black_box(codec.query_equal_index("alpha_0000")))
    });
    c.bench_function("query_equal_vectorized", |b| {
        b.iter(|| black_box(codec.query_equal_vectorized("alpha_0000")))
    });
    c.bench_function("baseline_equal", |b| {
        b.iter(|| black_box(codec.baseline_equal("alpha_0000")))
    });
}

fn prefix_queries(c: &mut Criterion) {
    let (_dir, codec) = setup_codec();

    c.bench_function("query_prefix_scan", |b| {
        b.iter(|| black_box(codec.query_prefix_scan("alpha_00")))
    });
    c.bench_function("query_prefix_index", |b| {
        b.iter(|| black_box(codec.query_prefix_index("alpha_00")))
    });
    c.bench_function("query_prefix_vectorized", |b| {
        b.iter(|| black_box(codec.query_prefix_vectorized("alpha_00")))
    });
    c.bench_function("baseline_prefix", |b| {
        b.iter(|| black_box(codec.baseline_prefix("alpha_00")))
    });
}

fn dictionary_build(c: &mut Criterion) {
    let column = generate_column(ROWS, DISTINCT);

    for threads in [1, 2, 8] {
        c.bench_function(&format!("dictionary_build_t{threads}"), |b| {
            b.iter(|| black_box(Dictionary::build(&column, NonZero::new(threads).unwrap())))
        });
    }
}

criterion_group!(benches, equality_queries, prefix_queries, dictionary_build);
criterion_main!(benches);
