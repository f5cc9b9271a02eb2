//! Vector and matrix results
//!
//! Both result types are arrays of series objects:
//! `{"metric": {..}, "value": [t, "v"]}` for vectors and
//! `{"metric": {..}, "values": [[t, "v"], ..]}` for matrices, with
//! `histogram` / `histograms` replacing the plain samples for native
//! histograms. Two layouts are produced:
//!
//! - **multi**: one frame per series, samples kept in arrival order
//! - **wide**: one frame with a shared time column and a nullable value
//!   column per series, rows aligned on identical timestamps and finally
//!   sorted by time
//!
//! A series carrying a histogram never contributes plain samples; it becomes
//! a standalone heatmap frame in either layout.

use super::{ResultType, for_each_element, read_sample, result_type_meta};
use crate::error::Result;
use crate::histogram::HistogramAccumulator;
use crate::response::Response;
use crate::time::unix_nanos;
use crate::token::{TokenSource, ValueKind};
use chrono::{DateTime, Utc};
use promframe_domain::{
    Field, FieldValues, Frame, FrameKind, LabelSet, TIME_FIELD_NAME, VALUE_FIELD_NAME,
};
use std::collections::HashMap;
use tracing::debug;

/// One series object, fully read
#[derive(Debug, Default)]
struct Series {
    labels: LabelSet,
    samples: Vec<(DateTime<Utc>, f64)>,
    histogram: Option<HistogramAccumulator>,
}

/// Read one element of `result`; `None` when it is not a series object
fn read_series(src: &mut TokenSource<'_>) -> Result<Option<Series>> {
    if src.what_is_next()? != ValueKind::Object {
        debug!("skipping non-object series");
        src.skip()?;
        return Ok(None);
    }

    let mut series = Series::default();

    let mut key = src.enter_object()?;
    while let Some(name) = key {
        match name.as_str() {
            "metric" => series.labels = src.read_labels()?,
            "value" => {
                if let Some(sample) = read_sample(src)? {
                    series.samples.push(sample);
                }
            }
            "values" => for_each_element(src, |src| {
                if let Some(sample) = read_sample(src)? {
                    series.samples.push(sample);
                }
                Ok(())
            })?,
            "histogram" => series
                .histogram
                .get_or_insert_with(HistogramAccumulator::new)
                .read_sample(src)?,
            "histograms" => {
                let histogram = series
                    .histogram
                    .get_or_insert_with(HistogramAccumulator::new);
                for_each_element(src, |src| histogram.read_sample(src))?;
            }
            other => {
                debug!(key = other, "skipping unsupported series key");
                src.skip()?;
            }
        }
        key = src.next_key()?;
    }
    Ok(Some(series))
}

/// One frame per series
pub fn read_multi(src: &mut TokenSource<'_>, result_type: ResultType) -> Result<Response> {
    let mut response = Response::new();

    for_each_element(src, |src| {
        let Some(series) = read_series(src)? else {
            return Ok(());
        };
        let frame = match series.histogram {
            Some(histogram) => histogram.into_frame(series.labels),
            None => {
                let (times, values): (Vec<_>, Vec<_>) = series.samples.into_iter().unzip();
                Frame::with_fields(
                    "",
                    vec![
                        Field::new(TIME_FIELD_NAME, FieldValues::Time(times)),
                        Field::new(VALUE_FIELD_NAME, FieldValues::Float64(values))
                            .with_labels(series.labels),
                    ],
                )
                .with_kind(FrameKind::TimeSeriesMulti)
                .with_custom("resultType", result_type_meta(result_type.as_str()))
            }
        };
        response.push(frame);
        Ok(())
    })?;

    Ok(response)
}

/// Nullable value column of the wide frame
#[derive(Debug)]
struct WideColumn {
    labels: LabelSet,
    values: Vec<Option<f64>>,
}

impl WideColumn {
    fn extend_to(&mut self, rows: usize) {
        if self.values.len() < rows {
            self.values.resize(rows, None);
        }
    }
}

/// Column arena of the wide layout, rows keyed by nanosecond timestamp
#[derive(Debug, Default)]
struct WideTable {
    times: Vec<DateTime<Utc>>,
    rows: HashMap<i64, usize>,
    columns: Vec<WideColumn>,
}

impl WideTable {
    fn row_for(&mut self, ts: DateTime<Utc>) -> usize {
        let key = unix_nanos(&ts);
        if let Some(&row) = self.rows.get(&key) {
            return row;
        }

        let row = self.times.len();
        self.rows.insert(key, row);
        self.times.push(ts);
        let rows = self.times.len();
        for column in &mut self.columns {
            column.extend_to(rows);
        }
        row
    }

    fn add_series(&mut self, labels: LabelSet, samples: Vec<(DateTime<Utc>, f64)>) {
        self.columns.push(WideColumn {
            labels,
            values: vec![None; self.times.len()],
        });
        let column = self.columns.len() - 1;

        for (ts, value) in samples {
            let row = self.row_for(ts);
            self.columns[column].values[row] = Some(value);
        }
    }

    fn into_frame(self, result_type: ResultType) -> Result<Frame> {
        let mut fields = Vec::with_capacity(self.columns.len() + 1);
        fields.push(Field::new(TIME_FIELD_NAME, FieldValues::Time(self.times)));
        fields.extend(self.columns.into_iter().map(|column| {
            Field::new(VALUE_FIELD_NAME, FieldValues::NullableFloat64(column.values))
                .with_labels(column.labels)
        }));

        let mut frame = Frame::with_fields("", fields)
            .with_kind(FrameKind::TimeSeriesWide)
            .with_custom("resultType", result_type_meta(result_type.as_str()));
        // rows were allocated in arrival order
        frame.sort_by_field(0)?;
        Ok(frame)
    }
}

/// One shared-time frame, followed by one heatmap frame per histogram series
pub fn read_wide(src: &mut TokenSource<'_>, result_type: ResultType) -> Result<Response> {
    let mut table = WideTable::default();
    let mut heatmaps = Vec::new();

    for_each_element(src, |src| {
        let Some(series) = read_series(src)? else {
            return Ok(());
        };
        match series.histogram {
            Some(histogram) => heatmaps.push(histogram.into_frame(series.labels)),
            None => table.add_series(series.labels, series.samples),
        }
        Ok(())
    })?;

    let mut response = Response::new();
    if !table.columns.is_empty() || heatmaps.is_empty() {
        response.push(table.into_frame(result_type)?);
    }
    response.extend(heatmaps);
    Ok(response)
}
