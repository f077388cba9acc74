//! Ranking benchmarks.
//!
//! Covers the hot paths of the search engine: ingestion, sequential vs.
//! parallel top-K ranking, match, and duplicate detection, at corpus sizes
//! large enough to show the shapes of the two rankers diverging.
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench ranking
//! ```

use corpusdb_core::status::DocumentStatus;
use corpusdb_search::dedup::remove_duplicates;
use corpusdb_search::store::SearchServer;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const VOCAB: &[&str] = &[
    "cat", "dog", "bird", "fish", "mouse", "house", "white", "blue", "dance", "chees", "collar",
    "tail", "eyes", "garden", "river", "mountain", "forest", "ocean", "desert", "valley",
];

fn synthetic_corpus(n: usize) -> SearchServer {
    let mut server = SearchServer::new("the a of to in on and").unwrap();
    for i in 0..n {
        let mut words = Vec::new();
        for j in 0..12 {
            words.push(VOCAB[(i * 7 + j) % VOCAB.len()]);
        }
        let content = words.join(" ");
        let rating = (i % 10) as i32 - 5;
        server
            .add_document(i as i64, &content, DocumentStatus::Actual, &[rating])
            .unwrap();
    }
    server
}

fn ingestion_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingestion");
    for &n in &[100usize, 1_000, 5_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("add_document", n), &n, |b, &n| {
            b.iter(|| black_box(synthetic_corpus(n)));
        });
    }
    group.finish();
}

fn ranking_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_top_documents");
    for &n in &[100usize, 1_000, 5_000] {
        let server = synthetic_corpus(n);
        group.throughput(Throughput::Elements(1));

        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |b, _| {
            b.iter(|| black_box(server.find_top_documents_default("cat dog house -mouse").unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("parallel", n), &n, |b, _| {
            b.iter(|| {
                black_box(
                    server
                        .find_top_documents_parallel_default("cat dog house -mouse")
                        .unwrap(),
                )
            });
        });
    }
    group.finish();
}

fn match_benchmarks(c: &mut Criterion) {
    let server = synthetic_corpus(1_000);
    let mut group = c.benchmark_group("match_document");
    group.bench_function("sequential", |b| {
        b.iter(|| black_box(server.match_document("cat dog -mouse", 500).unwrap()));
    });
    group.bench_function("parallel", |b| {
        b.iter(|| black_box(server.match_document_parallel("cat dog -mouse", 500).unwrap()));
    });
    group.finish();
}

fn dedup_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_duplicates");
    group.sample_size(20);
    group.bench_function("1000_docs_half_duplicated", |b| {
        b.iter_batched(
            || {
                let mut server = SearchServer::new("").unwrap();
                for i in 0..1_000i64 {
                    let term_set_id = i % 500;
                    let content = format!("{} {}", VOCAB[term_set_id as usize % VOCAB.len()], term_set_id);
                    server
                        .add_document(i, &content, DocumentStatus::Actual, &[])
                        .unwrap();
                }
                server
            },
            |mut server| black_box(remove_duplicates(&mut server)),
            criterion::BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(
    ranking_group,
    ingestion_benchmarks,
    ranking_benchmarks,
    match_benchmarks,
    dedup_benchmarks
);
criterion_main!(ranking_group);
