//! `data` as a plain array
//!
//! Label-name and label-value endpoints return arrays of strings, series
//! endpoints return arrays of label objects, and exemplar queries return
//! arrays of `{"seriesLabels": {..}, "exemplars": [..]}` objects. The three
//! can in principle be mixed, so every element is classified on its own.
//!
//! Objects are sniffed before committing to a path: the raw object text is
//! captured once and its top-level keys are scanned for `seriesLabels` or
//! `exemplars`. The object is then parsed again from the captured slice by
//! the chosen reader.

use super::{for_each_element, result_type_meta};
use crate::config::DecodeOptions;
use crate::error::{Error, Result};
use crate::exemplar::{Exemplar, ExemplarSampler};
use crate::response::Response;
use crate::time;
use crate::token::{TokenSource, ValueKind};
use promframe_domain::{
    Field, FieldValues, Frame, LabelSet, Notice, TIME_FIELD_NAME, VALUE_FIELD_NAME,
};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Name and result type of the sampled exemplar frame
pub const EXEMPLAR_FRAME_NAME: &str = "exemplar";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectShape {
    Labels,
    Exemplars,
}

fn sniff(raw: &[u8]) -> Result<ObjectShape> {
    let mut src = TokenSource::new(raw);
    let mut key = src.enter_object()?;
    while let Some(name) = key {
        if name == "seriesLabels" || name == "exemplars" {
            return Ok(ObjectShape::Exemplars);
        }
        src.skip()?;
        key = src.next_key()?;
    }
    Ok(ObjectShape::Labels)
}

/// Shift syntax error offsets from a captured slice back to the input
fn rebase(err: Error, base: usize) -> Error {
    match err {
        Error::InvalidJson { position, message } => Error::InvalidJson {
            position: position + base,
            message,
        },
        other => other,
    }
}

/// String columns of the label frame, one row per label object
#[derive(Debug, Default)]
struct LabelTable {
    names: HashMap<String, usize>,
    fields: Vec<Field>,
    rows: usize,
}

impl LabelTable {
    fn add_row(&mut self, pairs: Vec<(String, String)>) {
        if pairs.is_empty() {
            return;
        }

        let row = self.rows;
        self.rows += 1;
        for (name, value) in pairs {
            let index = match self.names.get(&name) {
                Some(&index) => index,
                None => {
                    let index = self.fields.len();
                    let mut field = Field::new(name.clone(), FieldValues::String(Vec::new()));
                    field.extend_to(row);
                    self.fields.push(field);
                    self.names.insert(name, index);
                    index
                }
            };

            let field = &mut self.fields[index];
            // repeated key within one object keeps the first value
            if field.len() > row {
                continue;
            }
            if let FieldValues::String(values) = field.values_mut() {
                values.push(value);
            }
        }

        for field in &mut self.fields {
            field.extend_to(self.rows);
        }
    }

    fn into_frame(self) -> Option<Frame> {
        if self.fields.is_empty() {
            return None;
        }
        Some(Frame::with_fields("", self.fields))
    }
}

fn read_label_pairs(src: &mut TokenSource<'_>) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    let mut key = src.enter_object()?;
    while let Some(name) = key {
        pairs.push((name, src.read_text()?));
        key = src.next_key()?;
    }
    Ok(pairs)
}

/// Exemplar objects of one decode call and the notices they raised
struct ExemplarReader {
    sampler: ExemplarSampler,
    notices: Vec<Notice>,
}

impl ExemplarReader {
    fn new(options: &DecodeOptions) -> Self {
        Self {
            sampler: ExemplarSampler::new(
                options.sampling_step,
                options.exemplar_capacity,
                options.sampler_seed,
            ),
            notices: Vec::new(),
        }
    }

    fn read_object(&mut self, src: &mut TokenSource<'_>) -> Result<()> {
        let mut series_labels = LabelSet::new();
        let mut pending = Vec::new();

        let mut key = src.enter_object()?;
        while let Some(name) = key {
            match name.as_str() {
                "seriesLabels" => series_labels = src.read_labels()?,
                "exemplars" => for_each_element(src, |src| {
                    if let Some(exemplar) = self.read_exemplar(src)? {
                        pending.push(exemplar);
                    }
                    Ok(())
                })?,
                other => {
                    debug!(key = other, "skipping unsupported exemplar envelope key");
                    src.skip()?;
                }
            }
            key = src.next_key()?;
        }

        // series labels may follow the exemplars, so merge once the object is done
        for exemplar in pending {
            self.sampler.update(Exemplar {
                labels: series_labels.merged(&exemplar.labels),
                ..exemplar
            });
        }
        Ok(())
    }

    fn read_exemplar(&mut self, src: &mut TokenSource<'_>) -> Result<Option<Exemplar>> {
        if src.what_is_next()? != ValueKind::Object {
            trace!("dropping non-object exemplar");
            src.skip()?;
            return Ok(None);
        }

        let mut value = None;
        let mut timestamp = None;
        let mut labels = LabelSet::new();

        let mut key = src.enter_object()?;
        while let Some(name) = key {
            match name.as_str() {
                "value" => value = src.read_text()?.parse::<f64>().ok(),
                "timestamp" => {
                    timestamp = match src.what_is_next()? {
                        ValueKind::Number => time::from_float_seconds(src.read_f64()?),
                        _ => {
                            src.skip()?;
                            None
                        }
                    }
                }
                "labels" => labels = src.read_labels()?,
                other => {
                    src.skip()?;
                    self.notices.push(Notice::error(format!(
                        "unable to parse key: {other} in response body"
                    )));
                }
            }
            key = src.next_key()?;
        }

        match (timestamp, value) {
            (Some(timestamp), Some(value)) => Ok(Some(Exemplar {
                timestamp,
                value,
                labels,
            })),
            (None, _) => {
                trace!(key = "timestamp", "dropping exemplar with missing or bad key");
                Ok(None)
            }
            (_, None) => {
                trace!(key = "value", "dropping exemplar with missing or bad key");
                Ok(None)
            }
        }
    }

    fn into_frame(self) -> Option<Frame> {
        if self.sampler.is_empty() {
            return None;
        }

        let label_names = self.sampler.label_names();
        let exemplars = self.sampler.into_exemplars();

        let mut times = Vec::with_capacity(exemplars.len());
        let mut values = Vec::with_capacity(exemplars.len());
        let mut columns = vec![Vec::with_capacity(exemplars.len()); label_names.len()];
        for exemplar in exemplars {
            times.push(exemplar.timestamp);
            values.push(exemplar.value);
            for (column, name) in columns.iter_mut().zip(&label_names) {
                column.push(exemplar.labels.get(name).unwrap_or_default().to_string());
            }
        }

        let mut fields = vec![
            Field::new(TIME_FIELD_NAME, FieldValues::Time(times)),
            Field::new(VALUE_FIELD_NAME, FieldValues::Float64(values)),
        ];
        fields.extend(
            label_names
                .into_iter()
                .zip(columns)
                .map(|(name, column)| Field::new(name, FieldValues::String(column))),
        );

        let mut frame = Frame::with_fields(EXEMPLAR_FRAME_NAME, fields)
            .with_custom("resultType", result_type_meta(EXEMPLAR_FRAME_NAME));
        frame.append_notices(self.notices);
        Some(frame)
    }
}

/// Read `data` when it is an array instead of an object
pub fn read_array_data(src: &mut TokenSource<'_>, options: &DecodeOptions) -> Result<Response> {
    let mut strings = Vec::new();
    let mut labels = LabelTable::default();
    let mut exemplars = ExemplarReader::new(options);

    for_each_element(src, |src| match src.what_is_next()? {
        ValueKind::String => {
            strings.push(src.read_string()?);
            Ok(())
        }
        ValueKind::Object => {
            let base = src.position();
            let raw = src.read_raw()?;
            let mut object = TokenSource::new(raw);
            match sniff(raw).map_err(|e| rebase(e, base))? {
                ObjectShape::Labels => {
                    let pairs = read_label_pairs(&mut object).map_err(|e| rebase(e, base))?;
                    labels.add_row(pairs);
                }
                ObjectShape::Exemplars => exemplars
                    .read_object(&mut object)
                    .map_err(|e| rebase(e, base))?,
            }
            Ok(())
        }
        _ => {
            strings.push(src.read_text()?);
            Ok(())
        }
    })?;

    let mut response = Response::new();
    if let Some(frame) = labels.into_frame() {
        response.push(frame);
    }
    if !strings.is_empty() {
        response.push(Frame::with_fields(
            "",
            vec![Field::new(VALUE_FIELD_NAME, FieldValues::String(strings))],
        ));
    }
    if let Some(frame) = exemplars.into_frame() {
        response.push(frame);
    }
    Ok(response)
}
