//! Scalar and string results
//!
//! Both are a single `[seconds, "text"]` pair. A scalar parses the text as a
//! float; a string keeps it verbatim. A malformed pair gives a frame with the
//! same columns and no rows.

use super::{Leaf, ResultType, read_pair, read_sample, result_type_meta};
use crate::error::Result;
use crate::response::Response;
use crate::time;
use crate::token::TokenSource;
use chrono::{DateTime, Utc};
use promframe_domain::{Field, FieldValues, Frame, FrameKind, TIME_FIELD_NAME, VALUE_FIELD_NAME};
use tracing::trace;

fn single_row(result_type: ResultType, times: Vec<DateTime<Utc>>, values: FieldValues) -> Frame {
    Frame::with_fields(
        "",
        vec![
            Field::new(TIME_FIELD_NAME, FieldValues::Time(times)),
            Field::new(VALUE_FIELD_NAME, values),
        ],
    )
    .with_kind(FrameKind::TimeSeriesMulti)
    .with_custom("resultType", result_type_meta(result_type.as_str()))
}

/// Read a `scalar` result
pub fn read_scalar(src: &mut TokenSource<'_>) -> Result<Response> {
    let (times, values) = match read_sample(src)? {
        Some((ts, value)) => (vec![ts], vec![value]),
        None => (Vec::new(), Vec::new()),
    };
    let frame = single_row(ResultType::Scalar, times, FieldValues::Float64(values));
    Ok(Response::from_frames(vec![frame]))
}

/// Read a `string` result
pub fn read_string(src: &mut TokenSource<'_>) -> Result<Response> {
    let sample = match read_pair(src)? {
        Some((Leaf::Number(seconds), Leaf::Text(text))) => {
            time::from_float_seconds(seconds).map(|ts| (ts, text))
        }
        _ => None,
    };
    let (times, values) = match sample {
        Some((ts, text)) => (vec![ts], vec![text]),
        None => {
            trace!("dropping malformed string sample");
            (Vec::new(), Vec::new())
        }
    };
    let frame = single_row(ResultType::String, times, FieldValues::String(values));
    Ok(Response::from_frames(vec![frame]))
}
