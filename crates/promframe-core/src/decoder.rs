//! Envelope reader and result dispatch
//!
//! The envelope is read key by key in arrival order:
//!
//! ```json
//! {"status": "success", "warnings": [".."], "data": {"resultType": "matrix", "result": [..], "stats": {..}}}
//! ```
//!
//! `resultType` must arrive before `result`: the result is decoded as it is
//! read, without buffering, so its shape has to be known first. Upstream
//! servers emit the keys in this order.

use crate::config::DecodeOptions;
use crate::error::{Error, Result};
use crate::response::Response;
use crate::shapes::{self, ResultType};
use crate::token::{TokenSource, ValueKind};
use promframe_domain::Notice;
use tracing::{debug, debug_span};

/// Reusable decoder holding validated options.
///
/// Holds no per-call state, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ResultDecoder {
    options: DecodeOptions,
}

impl ResultDecoder {
    /// Create a decoder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with validated options
    pub fn with_options(options: DecodeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Options used for every call
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode one response body
    pub fn decode(&self, input: &[u8]) -> Result<Response> {
        let span = debug_span!("decode", bytes = input.len());
        let _guard = span.enter();

        let mut src = TokenSource::new(input);
        let response = read_envelope(&mut src, &self.options)?;
        src.finish()?;

        for frame in response.frames() {
            frame.validate()?;
        }
        debug!(frames = response.len(), "decoded response");
        Ok(response)
    }
}

/// Decode one response body with the given options
pub fn decode(input: &[u8], options: &DecodeOptions) -> Result<Response> {
    ResultDecoder::with_options(options.clone())?.decode(input)
}

fn read_envelope(src: &mut TokenSource<'_>, options: &DecodeOptions) -> Result<Response> {
    if src.what_is_next()? != ValueKind::Object {
        return Err(Error::unexpected("expected object type"));
    }

    let mut status = None;
    let mut message = String::new();
    let mut error_type = String::new();
    let mut warnings = Vec::new();
    let mut response = Response::new();

    let mut key = src.enter_object()?;
    while let Some(name) = key {
        match name.as_str() {
            "status" => status = Some(src.read_text()?),
            "error" => message = src.read_text()?,
            "errorType" => error_type = src.read_text()?,
            "warnings" => warnings = read_warnings(src)?,
            "data" => response = read_data(src, options)?,
            other => {
                debug!(key = other, "skipping unsupported envelope key");
                src.skip()?;
            }
        }
        key = src.next_key()?;
    }

    if status.as_deref() == Some("error") {
        return Err(Error::upstream(error_type, message));
    }

    response.attach_notices(&warnings);
    Ok(response)
}

fn read_warnings(src: &mut TokenSource<'_>) -> Result<Vec<Notice>> {
    let mut warnings = Vec::new();
    shapes::for_each_element(src, |src| {
        if src.what_is_next()? == ValueKind::String {
            warnings.push(Notice::warning(src.read_string()?));
        } else {
            src.skip()?;
        }
        Ok(())
    })?;
    Ok(warnings)
}

fn read_data(src: &mut TokenSource<'_>, options: &DecodeOptions) -> Result<Response> {
    match src.what_is_next()? {
        ValueKind::Array => shapes::array::read_array_data(src, options),
        ValueKind::Object => read_result_object(src, options),
        _ => {
            src.skip()?;
            Err(Error::unexpected("expected object type"))
        }
    }
}

fn read_result_object(src: &mut TokenSource<'_>, options: &DecodeOptions) -> Result<Response> {
    let mut result_type = None;
    let mut stats = None;
    let mut response = Response::new();

    let mut key = src.enter_object()?;
    while let Some(name) = key {
        match name.as_str() {
            "resultType" => result_type = Some(src.read_string()?),
            "result" => {
                let tag = result_type.as_deref().ok_or(Error::MissingResultType)?;
                let kind = match tag.parse::<ResultType>() {
                    Ok(kind) => kind,
                    Err(err) => {
                        src.skip()?;
                        return Err(err);
                    }
                };
                debug!(result_type = %kind, "dispatching result");
                response = read_result(src, kind, options)?;
            }
            "stats" => stats = Some(src.read_json()?),
            other => {
                debug!(key = other, "skipping unsupported data key");
                src.skip()?;
            }
        }
        key = src.next_key()?;
    }

    if let Some(stats) = stats {
        if !response.set_first_custom("stats", stats) {
            debug!("dropping stats of an empty result");
        }
    }
    Ok(response)
}

fn read_result(
    src: &mut TokenSource<'_>,
    kind: ResultType,
    options: &DecodeOptions,
) -> Result<Response> {
    match kind {
        ResultType::Matrix if options.wide_matrix_layout => shapes::matrix::read_wide(src, kind),
        ResultType::Vector if options.wide_vector_layout => shapes::matrix::read_wide(src, kind),
        ResultType::Matrix | ResultType::Vector => shapes::matrix::read_multi(src, kind),
        ResultType::Streams => shapes::stream::read_streams(src),
        ResultType::String => shapes::scalar::read_string(src),
        ResultType::Scalar => shapes::scalar::read_scalar(src),
    }
}
