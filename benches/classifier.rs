use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use symptra::dataset::{EncodedDataset, builtin_corpus};
use symptra::ml::{EvaluateOptions, PatternClassifier, TieBreak, evaluate};

fn bench_nearest(c: &mut Criterion) {
    let dataset = EncodedDataset::from_corpus(&builtin_corpus()).expect("encode corpus");
    let classifier = PatternClassifier::train(&dataset.samples, TieBreak::FirstInserted);
    let unseen = dataset
        .vocabulary
        .encode(&["headache", "wheezing", "joint_pain", "fatigue"]);
    c.bench_with_input(
        BenchmarkId::new("nearest_neighbor", classifier.len()),
        &unseen,
        |b, features| {
            b.iter(|| classifier.predict(black_box(features)));
        },
    );
    let known = dataset.samples[0].features.clone();
    c.bench_function("exact_match", |b| {
        b.iter(|| classifier.predict(black_box(&known)));
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let dataset = EncodedDataset::from_corpus(&builtin_corpus()).expect("encode corpus");
    let options = EvaluateOptions {
        seed: Some(17),
        ..EvaluateOptions::default()
    };
    c.bench_function("evaluate_builtin", |b| {
        b.iter(|| evaluate(black_box(&dataset), &options).expect("evaluate"));
    });
}

criterion_group!(benches, bench_nearest, bench_evaluate);
criterion_main!(benches);
