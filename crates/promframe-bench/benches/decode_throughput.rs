//! Decode throughput per result shape and layout

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use promframe_bench::{
    DecodeOptions, PayloadSpec, ResultDecoder, exemplars_payload, matrix_payload, streams_payload,
};
use std::hint::black_box;
use std::time::Duration;

fn benchmark_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix");
    let multi = ResultDecoder::new();
    let wide = match ResultDecoder::with_options(DecodeOptions::new().with_wide_matrix(true)) {
        Ok(decoder) => decoder,
        Err(err) => panic!("invalid options: {err}"),
    };

    for (name, spec) in [
        ("small", PayloadSpec::new(5, 60)),
        ("medium", PayloadSpec::new(50, 240)),
        ("large", PayloadSpec::new(200, 1440)),
    ] {
        let payload = matrix_payload(spec);
        group.throughput(Throughput::Bytes(payload.len() as u64));

        group.bench_function(format!("multi/{name}"), |b| {
            b.iter(|| multi.decode(black_box(payload.as_bytes())))
        });
        group.bench_function(format!("wide/{name}"), |b| {
            b.iter(|| wide.decode(black_box(payload.as_bytes())))
        });
    }

    group.finish();
}

fn benchmark_streams(c: &mut Criterion) {
    let mut group = c.benchmark_group("streams");
    let decoder = ResultDecoder::new();

    for (name, spec) in [
        ("small", PayloadSpec::new(2, 100)),
        ("large", PayloadSpec::new(20, 5000)),
    ] {
        let payload = streams_payload(spec);
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| decoder.decode(black_box(payload.as_bytes())))
        });
    }

    group.finish();
}

fn benchmark_exemplars(c: &mut Criterion) {
    let mut group = c.benchmark_group("exemplars");
    let payload = exemplars_payload(PayloadSpec::new(20, 2000));
    group.throughput(Throughput::Bytes(payload.len() as u64));

    for step in [Duration::ZERO, Duration::from_secs(15)] {
        let options = DecodeOptions::new().with_sampling_step(step);
        let decoder = match ResultDecoder::with_options(options) {
            Ok(decoder) => decoder,
            Err(err) => panic!("invalid options: {err}"),
        };
        group.bench_function(format!("step_{}s", step.as_secs()), |b| {
            b.iter(|| decoder.decode(black_box(payload.as_bytes())))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_matrix,
    benchmark_streams,
    benchmark_exemplars
);
criterion_main!(benches);
