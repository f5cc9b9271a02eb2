//! Log stream results
//!
//! `[{"stream": {..labels..}, "values": [["<ns>", "line"], ..]}, ..]` becomes
//! one frame of four columns: `__labels` (canonical label JSON, one copy
//! shared by every row of a stream), `Time`, `Line` and `TS`, the nanosecond
//! string as received. The label column keeps its JSON name so consumers do
//! not spread it into per-label columns.

use super::{Leaf, for_each_element, read_pair};
use crate::error::Result;
use crate::response::Response;
use crate::time;
use crate::token::{TokenSource, ValueKind};
use chrono::{DateTime, Utc};
use promframe_domain::{Field, FieldValues, Frame, LabelSet, TIME_FIELD_NAME};
use std::sync::Arc;
use tracing::{debug, trace};

/// Name of the label blob column
pub const LABELS_FIELD_NAME: &str = "__labels";

#[derive(Debug, Default)]
struct StreamColumns {
    labels: Vec<Arc<str>>,
    time: Vec<DateTime<Utc>>,
    line: Vec<String>,
    ts: Vec<String>,
}

impl StreamColumns {
    fn push(&mut self, labels: &Arc<str>, time: DateTime<Utc>, line: String, ts: String) {
        self.labels.push(Arc::clone(labels));
        self.time.push(time);
        self.line.push(line);
        self.ts.push(ts);
    }

    fn into_frame(self) -> Frame {
        Frame::with_fields(
            "",
            vec![
                Field::new(LABELS_FIELD_NAME, FieldValues::Json(self.labels)),
                Field::new(TIME_FIELD_NAME, FieldValues::Time(self.time)),
                Field::new("Line", FieldValues::String(self.line)),
                Field::new("TS", FieldValues::String(self.ts)),
            ],
        )
    }
}

fn canonical(labels: &LabelSet) -> Result<Arc<str>> {
    Ok(Arc::from(labels.to_canonical_json()?))
}

/// Read a `streams` result
pub fn read_streams(src: &mut TokenSource<'_>) -> Result<Response> {
    let mut columns = StreamColumns::default();
    let empty = canonical(&LabelSet::new())?;

    for_each_element(src, |src| {
        if src.what_is_next()? != ValueKind::Object {
            debug!("skipping non-object stream");
            return src.skip();
        }

        let mut labels = Arc::clone(&empty);
        let mut key = src.enter_object()?;
        while let Some(name) = key {
            match name.as_str() {
                "stream" => match src.what_is_next()? {
                    ValueKind::Object | ValueKind::Null => {
                        labels = canonical(&src.read_labels()?)?;
                    }
                    _ => {
                        debug!("skipping non-object stream labels");
                        src.skip()?;
                    }
                },
                "values" => for_each_element(src, |src| {
                    match read_pair(src)? {
                        Some((Leaf::Text(ts), Leaf::Text(line))) => {
                            match time::from_loki_nanos(&ts) {
                                Some(t) => columns.push(&labels, t, line, ts),
                                None => trace!(ts = %ts, "dropping entry with bad timestamp"),
                            }
                        }
                        _ => trace!("dropping malformed log entry"),
                    }
                    Ok(())
                })?,
                other => {
                    debug!(key = other, "skipping unsupported stream key");
                    src.skip()?;
                }
            }
            key = src.next_key()?;
        }
        Ok(())
    })?;

    Ok(Response::from_frames(vec![columns.into_frame()]))
}
