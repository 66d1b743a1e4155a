//! Pipeline benchmark: synthetic user group → feature matrix → split.

use authfeat::config::SplitConfig;
use authfeat::features::{user_feature_matrix, BaselineExtractor};
use authfeat::split::split_matrix;
use authfeat::EventRecord;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn make_dummy_events(n: usize) -> Vec<EventRecord> {
    (0..n)
        .map(|i| EventRecord {
            time: 1_000_000.0 + i as f64 * 60.0,
            user: "bench_user".to_string(),
            domain: "DOM1".to_string(),
            dest_user: format!("U{}", i % 20),
            src_computer: format!("C{}", i % 50),
            dest_computer: format!("C{}", (i * 7) % 50),
            auth_type: "Kerberos".to_string(),
            logon_type: "Network".to_string(),
            auth_orientation: "LogOn".to_string(),
            status: if i % 13 == 0 { "Failure" } else { "Success" }.to_string(),
        })
        .collect()
}

fn bench_feature_matrix(c: &mut Criterion) {
    let events = make_dummy_events(1000);
    let extractor = BaselineExtractor;

    c.bench_function("feature_matrix_1000_events", |b| {
        b.iter(|| black_box(user_feature_matrix(black_box(&events), &extractor).unwrap()))
    });
}

fn bench_matrix_split(c: &mut Criterion) {
    let events = make_dummy_events(1000);
    let matrix = user_feature_matrix(&events, &BaselineExtractor).unwrap();
    let config = SplitConfig::default();

    c.bench_function("split_1000_row_matrix", |b| {
        b.iter(|| black_box(split_matrix(black_box(&matrix), &config)))
    });
}

criterion_group!(benches, bench_feature_matrix, bench_matrix_split);
criterion_main!(benches);
