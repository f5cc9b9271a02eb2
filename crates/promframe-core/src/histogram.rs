//! Sparse histogram accumulation
//!
//! A native histogram sample arrives as
//! `[time, {"count": "..", "sum": "..", "buckets": [[layout, min, max, count], ..]}]`.
//! Every bucket becomes one row of five aligned columns: the sample time
//! (`xMax`), the lower and upper boundaries (`yMin`, `yMax`), the bucket
//! count and the boundary layout code (`yLayout`). The layout code is an
//! opaque i8 describing which boundaries are inclusive; it is passed through
//! untouched.
//!
//! Bucket numbers are strict: a value that fails to parse aborts the whole
//! decode, unlike plain samples which are dropped one row at a time.

use crate::error::{Error, Result};
use crate::time;
use crate::token::{TokenSource, ValueKind};
use chrono::{DateTime, Utc};
use promframe_domain::{Field, FieldValues, Frame, FrameKind, LabelSet};
use tracing::debug;

/// Column accumulator for the histogram samples of one series
#[derive(Debug, Default)]
pub struct HistogramAccumulator {
    time: Vec<DateTime<Utc>>,
    y_min: Vec<f64>,
    y_max: Vec<f64>,
    count: Vec<f64>,
    y_layout: Vec<i8>,
}

impl HistogramAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bucket rows collected
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Check if no bucket was collected
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Read one `[time, {..}]` histogram sample and append its buckets
    pub fn read_sample(&mut self, src: &mut TokenSource<'_>) -> Result<()> {
        if src.what_is_next()? != ValueKind::Array {
            return Err(Error::histogram("expected [time, histogram] sample"));
        }
        if !src.enter_array()? {
            return Err(Error::histogram("empty histogram sample"));
        }
        let seconds = src
            .read_f64()
            .map_err(|e| Error::histogram(format!("sample time: {e}")))?;
        let ts = time::from_float_seconds(seconds)
            .ok_or_else(|| Error::histogram(format!("timestamp {seconds} out of range")))?;

        if !src.next_element()? {
            return Err(Error::histogram("histogram sample has no body"));
        }

        if src.what_is_next()? != ValueKind::Object {
            return Err(Error::histogram("histogram body must be an object"));
        }
        let mut key = src.enter_object()?;
        while let Some(name) = key {
            match name.as_str() {
                // reserved, the heatmap only needs buckets
                "count" | "sum" => src.skip()?,
                "buckets" => self.read_buckets(src, ts)?,
                other => {
                    debug!(key = other, "skipping unsupported histogram key");
                    src.skip()?;
                }
            }
            key = src.next_key()?;
        }

        if src.next_element()? {
            return Err(Error::histogram("expected end of histogram sample"));
        }
        Ok(())
    }

    fn read_buckets(&mut self, src: &mut TokenSource<'_>, ts: DateTime<Utc>) -> Result<()> {
        if src.what_is_next()? != ValueKind::Array {
            return Err(Error::histogram("buckets must be an array"));
        }
        let mut more = src.enter_array()?;
        while more {
            self.read_bucket(src, ts)?;
            more = src.next_element()?;
        }
        Ok(())
    }

    fn read_bucket(&mut self, src: &mut TokenSource<'_>, ts: DateTime<Utc>) -> Result<()> {
        if src.what_is_next()? != ValueKind::Array {
            return Err(Error::histogram("bucket must be an array"));
        }
        if !src.enter_array()? {
            return Err(Error::histogram("empty bucket"));
        }
        let layout = src
            .read_i8()
            .map_err(|e| Error::histogram(format!("yLayout: {e}")))?;

        let mut numbers = [0.0; 3];
        for (slot, name) in numbers.iter_mut().zip(["yMin", "yMax", "count"]) {
            if !src.next_element()? {
                return Err(Error::histogram(format!("bucket is missing {name}")));
            }
            *slot = read_bucket_number(src, name)?;
        }

        if src.next_element()? {
            return Err(Error::histogram("expected close array after bucket count"));
        }

        let [min, max, count] = numbers;
        self.time.push(ts);
        self.y_layout.push(layout);
        self.y_min.push(min);
        self.y_max.push(max);
        self.count.push(count);
        Ok(())
    }

    /// Build the heatmap frame; `labels` are attached to the `yMin` field
    pub fn into_frame(self, labels: LabelSet) -> Frame {
        Frame::with_fields(
            "",
            vec![
                Field::new("xMax", FieldValues::Time(self.time)),
                Field::new("yMin", FieldValues::Float64(self.y_min)).with_labels(labels),
                Field::new("yMax", FieldValues::Float64(self.y_max)),
                Field::new("count", FieldValues::Float64(self.count)),
                Field::new("yLayout", FieldValues::Int8(self.y_layout)),
            ],
        )
        .with_kind(FrameKind::HeatmapCellsSparse)
    }
}

fn read_bucket_number(src: &mut TokenSource<'_>, name: &str) -> Result<f64> {
    let text = src
        .read_string()
        .map_err(|e| Error::histogram(format!("{name}: {e}")))?;
    text.parse::<f64>()
        .map_err(|e| Error::histogram(format!("{name} '{text}': {e}")))
}
