//! promframe benchmarking suite
//!
//! Payload generators shared by the benches. Payloads are built with a seeded
//! generator so every run measures the same bytes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use promframe::{DecodeOptions, Response, ResultDecoder};

/// Shape and size of a generated payload
#[derive(Debug, Clone, Copy)]
pub struct PayloadSpec {
    /// Number of series or streams
    pub series: usize,
    /// Samples per series
    pub samples: usize,
    /// Generator seed
    pub seed: u64,
}

impl PayloadSpec {
    /// Create a spec with the default seed
    pub fn new(series: usize, samples: usize) -> Self {
        Self {
            series,
            samples,
            seed: 7,
        }
    }
}

/// Range query result with 15s steps and jittered gaps
pub fn matrix_payload(spec: PayloadSpec) -> String {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let mut series = Vec::with_capacity(spec.series);

    for i in 0..spec.series {
        let mut values = Vec::with_capacity(spec.samples);
        for step in 0..spec.samples {
            // roughly one sample in twenty is missing
            if rng.random_range(0..20) == 0 {
                continue;
            }
            let t = 1_700_000_000 + step as i64 * 15;
            let v: f64 = rng.random_range(0.0..1000.0);
            values.push(format!(r#"[{t}, "{v:.3}"]"#));
        }
        series.push(format!(
            r#"{{"metric": {{"__name__": "http_requests_total", "instance": "host-{i}:9090", "job": "api"}}, "values": [{}]}}"#,
            values.join(",")
        ));
    }

    format!(
        r#"{{"status": "success", "data": {{"resultType": "matrix", "result": [{}]}}}}"#,
        series.join(",")
    )
}

/// Log query result with nanosecond timestamps
pub fn streams_payload(spec: PayloadSpec) -> String {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let mut streams = Vec::with_capacity(spec.series);

    for i in 0..spec.series {
        let values = (0..spec.samples)
            .map(|n| {
                let jitter: i64 = rng.random_range(0..1000);
                let ns = 1_700_000_000_000_000_000i64 + n as i64 * 1_000_000 + jitter;
                let status = [200, 200, 200, 404, 500][rng.random_range(0..5)];
                format!(r#"["{ns}", "GET /api/v1/items/{n} status={status}"]"#)
            })
            .collect::<Vec<_>>()
            .join(",");
        streams.push(format!(
            r#"{{"stream": {{"app": "gateway", "pod": "gateway-{i}"}}, "values": [{values}]}}"#
        ));
    }

    format!(
        r#"{{"status": "success", "data": {{"resultType": "streams", "result": [{}]}}}}"#,
        streams.join(",")
    )
}

/// Exemplar query result, one object per series
pub fn exemplars_payload(spec: PayloadSpec) -> String {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let mut objects = Vec::with_capacity(spec.series);

    for i in 0..spec.series {
        let exemplars = (0..spec.samples)
            .map(|n| {
                let ts = 1_700_000_000.0 + n as f64 * 0.5;
                let v: f64 = rng.random_range(0.0..2.0);
                let trace: u64 = rng.random();
                format!(
                    r#"{{"labels": {{"traceID": "{trace:016x}"}}, "value": "{v:.4}", "timestamp": {ts}}}"#
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        objects.push(format!(
            r#"{{"seriesLabels": {{"__name__": "request_duration_seconds_bucket", "service": "svc-{i}"}}, "exemplars": [{exemplars}]}}"#
        ));
    }

    format!(
        r#"{{"status": "success", "data": [{}]}}"#,
        objects.join(",")
    )
}
