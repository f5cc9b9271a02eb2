//! Common test utilities and payload fixtures
//!
//! Provides a tracing subscriber for debugging failing tests and builders for
//! Prometheus/Loki envelopes.

#![allow(dead_code)]

use promframe::{DecodeOptions, Frame, Response, ResultDecoder};

/// Route decoder logs to the test output; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Wrap a `data` value into a success envelope
pub fn success(data: &str) -> String {
    format!(r#"{{"status": "success", "data": {data}}}"#)
}

/// Wrap a result into a success envelope with the given result type
pub fn result(result_type: &str, result: &str) -> String {
    success(&format!(
        r#"{{"resultType": "{result_type}", "result": {result}}}"#
    ))
}

/// Decode with default options, panicking on error
pub fn decode_ok(body: &str) -> Response {
    decode_with(body, DecodeOptions::default())
}

/// Decode with custom options, panicking on error
pub fn decode_with(body: &str, options: DecodeOptions) -> Response {
    init_tracing();
    ResultDecoder::with_options(options)
        .expect("valid options")
        .decode(body.as_bytes())
        .unwrap_or_else(|err| panic!("decode failed: {err}\nbody: {body}"))
}

/// Decode with default options, expecting an error
pub fn decode_err(body: &str) -> promframe::Error {
    init_tracing();
    match ResultDecoder::new().decode(body.as_bytes()) {
        Ok(response) => panic!("expected error, got {} frames", response.len()),
        Err(err) => err,
    }
}

/// Unix seconds of a time column
pub fn seconds(frame: &Frame, index: usize) -> Vec<i64> {
    frame
        .field(index)
        .and_then(|f| f.as_time())
        .expect("time field")
        .iter()
        .map(|t| t.timestamp())
        .collect()
}

/// A matrix series object with `values` at whole seconds
pub fn matrix_series(labels: &[(&str, &str)], samples: &[(i64, f64)]) -> String {
    let metric = labels
        .iter()
        .map(|(k, v)| format!(r#""{k}": "{v}""#))
        .collect::<Vec<_>>()
        .join(", ");
    let values = samples
        .iter()
        .map(|(t, v)| format!(r#"[{t}, "{v}"]"#))
        .collect::<Vec<_>>()
        .join(", ");
    format!(r#"{{"metric": {{{metric}}}, "values": [{values}]}}"#)
}
