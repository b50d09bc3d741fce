//! Extraction strategies, tried in order by [`super::normalize`].
//!
//! Each strategy is pure: it reads the payload, never mutates it, and either
//! produces a non-empty list for the expected field or declines.

use super::fence;
use atf_protocol::run_models::ExtractionSource;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub(crate) const RAW_RESPONSE: &str = "raw_response";

/// Fields recovered by a successful strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub fields: BTreeMap<String, Value>,
    pub source: ExtractionSource,
}

pub type Strategy = fn(&Map<String, Value>, &str) -> Option<Extraction>;

/// The extraction chain. First success wins.
pub const STRATEGIES: &[Strategy] = &[direct, direct_raw_parse, fenced_json, fenced_plain, fallback_raw];

fn has_items(object: &Map<String, Value>, field: &str) -> bool {
    matches!(object.get(field), Some(Value::Array(items)) if !items.is_empty())
}

fn fields_of(object: &Map<String, Value>) -> BTreeMap<String, Value> {
    object
        .iter()
        .filter(|(key, _)| key.as_str() != RAW_RESPONSE)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn from_object(object: &Map<String, Value>, field: &str, source: ExtractionSource) -> Option<Extraction> {
    has_items(object, field).then(|| Extraction {
        fields: fields_of(object),
        source,
    })
}

fn raw_text(payload: &Map<String, Value>) -> Option<&str> {
    payload.get(RAW_RESPONSE).and_then(Value::as_str)
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(text).ok()? {
        Value::Object(object) => Some(object),
        _ => None,
    }
}

/// The expected field is already a list on the payload.
pub fn direct(payload: &Map<String, Value>, field: &str) -> Option<Extraction> {
    from_object(payload, field, ExtractionSource::Direct)
}

/// `raw_response` is itself a JSON document, possibly encoded twice.
pub fn direct_raw_parse(payload: &Map<String, Value>, field: &str) -> Option<Extraction> {
    let text = raw_text(payload)?;
    let object = match serde_json::from_str(text.trim()).ok()? {
        Value::Object(object) => object,
        Value::String(inner) => parse_object(inner.trim())?,
        _ => return None,
    };
    from_object(&object, field, ExtractionSource::DirectRawParse)
}

/// First ```` ```json ```` block inside `raw_response`.
pub fn fenced_json(payload: &Map<String, Value>, field: &str) -> Option<Extraction> {
    let block = fence::json_block(raw_text(payload)?)?;
    from_object(&parse_object(block)?, field, ExtractionSource::FencedJson)
}

/// First ```` ``` ```` block of any language inside `raw_response`.
///
/// Declines whenever a ```` ```json ```` marker is present, even one whose
/// block did not parse.
pub fn fenced_plain(payload: &Map<String, Value>, field: &str) -> Option<Extraction> {
    let text = raw_text(payload)?;
    if fence::has_json_block(text) {
        return None;
    }
    let block = fence::any_block(text)?;
    from_object(&parse_object(block)?, field, ExtractionSource::FencedPlain)
}

/// `raw_response` arrived already structured.
pub fn fallback_raw(payload: &Map<String, Value>, field: &str) -> Option<Extraction> {
    match payload.get(RAW_RESPONSE)? {
        Value::Object(object) => from_object(object, field, ExtractionSource::FallbackRaw),
        _ => None,
    }
}
