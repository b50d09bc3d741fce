//! Response normalizer.
//!
//! Turns a backend agent payload into a [`NormalizedAgentResult`] using the
//! ordered chain in [`strategies::STRATEGIES`]. Parse failures never escape:
//! when nothing matches, the result holds an empty list and the raw text.

mod fence;
pub mod strategies;

use atf_protocol::run_models::{ExtractionSource, NormalizedAgentResult};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use strategies::{RAW_RESPONSE, STRATEGIES};

/// Normalize `payload`, looking for the list stored under `field`.
pub fn normalize(payload: &Map<String, Value>, field: &str) -> NormalizedAgentResult {
    let raw_response = payload
        .get(RAW_RESPONSE)
        .and_then(Value::as_str)
        .map(str::to_string);

    for strategy in STRATEGIES {
        if let Some(extraction) = strategy(payload, field) {
            return NormalizedAgentResult {
                structured_fields: extraction.fields,
                extraction_source: extraction.source,
                raw_response,
            };
        }
    }

    let mut structured_fields = BTreeMap::new();
    structured_fields.insert(field.to_string(), Value::Array(Vec::new()));
    NormalizedAgentResult {
        structured_fields,
        extraction_source: ExtractionSource::None,
        raw_response,
    }
}

/// Normalize a payload of unknown shape. Non-object payloads yield `none`.
pub fn normalize_value(payload: &Value, field: &str) -> NormalizedAgentResult {
    match payload {
        Value::Object(map) => normalize(map, field),
        Value::String(text) => {
            let mut map = Map::new();
            map.insert(RAW_RESPONSE.to_string(), Value::String(text.clone()));
            normalize(&map, field)
        }
        _ => normalize(&Map::new(), field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_fenced_json_case() {
        let p = payload(json!({"raw_response": "```json\n{\"test_data\":[{\"a\":1}]}\n```"}));
        let result = normalize(&p, "test_data");
        assert_eq!(result.extraction_source, ExtractionSource::FencedJson);
        assert_eq!(result.items("test_data"), &[json!({"a": 1})]);
        assert!(result.raw_response.is_some());
    }

    #[test]
    fn test_direct_case_ignores_raw_response() {
        let p = payload(json!({
            "test_data": [{"a": 1}],
            "raw_response": "```json\n{\"test_data\":[{\"b\":2}]}\n```"
        }));
        let result = normalize(&p, "test_data");
        assert_eq!(result.extraction_source, ExtractionSource::Direct);
        assert_eq!(result.items("test_data"), &[json!({"a": 1})]);
    }

    #[test]
    fn test_unparseable_raw_response() {
        let p = payload(json!({"raw_response": "not json at all"}));
        let result = normalize(&p, "test_data");
        assert_eq!(result.extraction_source, ExtractionSource::None);
        assert!(result.items("test_data").is_empty());
        assert_eq!(result.structured_fields.get("test_data"), Some(&json!([])));
        assert_eq!(result.raw_response.as_deref(), Some("not json at all"));
    }

    #[test]
    fn test_plain_fence_fallback() {
        let p = payload(json!({"raw_response": "Result:\n```\n{\"user_stories\": [\"US-1\"]}\n```"}));
        let result = normalize(&p, "user_stories");
        assert_eq!(result.extraction_source, ExtractionSource::FencedPlain);
        assert_eq!(result.items("user_stories").len(), 1);
    }

    #[test]
    fn test_json_marker_shadows_plain_fence() {
        let p = payload(json!({
            "raw_response": "```\n{\"test_data\":[{\"a\":1}]}\n```\nthen\n```json\n{broken\n```"
        }));
        let result = normalize(&p, "test_data");
        assert_eq!(result.extraction_source, ExtractionSource::None);
        assert!(result.items("test_data").is_empty());
    }

    #[test]
    fn test_empty_direct_list_falls_through() {
        let p = payload(json!({
            "test_cases": [],
            "raw_response": "{\"test_cases\": [{\"id\": 1}, {\"id\": 2}]}"
        }));
        let result = normalize(&p, "test_cases");
        assert_eq!(result.extraction_source, ExtractionSource::DirectRawParse);
        assert_eq!(result.items("test_cases").len(), 2);
    }

    #[test]
    fn test_normalize_is_idempotent_and_pure() {
        let p = payload(json!({"raw_response": "```json\n{\"x\": [true]}"}));
        let before = p.clone();
        let first = normalize(&p, "x");
        let second = normalize(&p, "x");
        assert_eq!(first, second);
        assert_eq!(p, before);
        assert_eq!(first.extraction_source, ExtractionSource::FencedJson);
    }

    #[test]
    fn test_normalize_value_shapes() {
        assert_eq!(
            normalize_value(&json!(42), "x").extraction_source,
            ExtractionSource::None
        );
        let text = json!("```json\n{\"x\": [1]}\n```");
        assert_eq!(
            normalize_value(&text, "x").extraction_source,
            ExtractionSource::FencedJson
        );
    }
}
