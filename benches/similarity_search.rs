//! Benchmarks for ranking an index against a query.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use robot_rag::{IndexEntry, RagIndex};

fn synthetic_index(entries: usize, dim: usize) -> RagIndex {
    let records = (0..entries)
        .map(|i| IndexEntry {
            text: format!("chunk {i}"),
            source: format!("doc{}.txt", i / 16),
            chunk_id: i % 16,
            start: 0,
            end: 1,
        })
        .collect();
    let embeddings = (0..entries)
        .map(|i| (0..dim).map(|j| ((i * dim + j) as f32).sin()).collect())
        .collect();
    RagIndex::new("bench", records, embeddings, None).unwrap()
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_top4_dim768");
    for entries in [1_000, 10_000] {
        let index = synthetic_index(entries, 768);
        let query: Vec<f32> = (0..768).map(|j| (j as f32).cos()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(entries), &index, |b, index| {
            b.iter(|| index.rank(black_box(&query), black_box(4)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rank);
criterion_main!(benches);
