//! Bidirectional translation between a protocol [`Part`] and a runner
//! [`RunnerPart`].
//!
//! `runner_to_protocol` is total over a constructed `RunnerPart` (exactly
//! one shape is ever active by construction). The raw elaboration entry
//! point, [`elaborate_runner_part`], is where the "first matching field
//! wins" priority order applies — it is the boundary where a loosely
//! populated source part becomes the closed sum type.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::{BridgeError, BridgeResult};
use crate::runner::RunnerPart;
use crate::types::{FileContent, Part};

/// A raw, possibly-multiply-populated runner part as a source system would
/// hand it to us, prior to elaboration into the closed [`RunnerPart`] sum.
///
/// At most one field should be set in practice; if more than one is set,
/// [`elaborate_runner_part`] resolves it by the documented priority order.
#[derive(Debug, Clone, Default)]
pub struct RawRunnerPart {
    /// Plain text, if present.
    pub text: Option<String>,
    /// A file URI and its MIME type, if present.
    pub file_uri: Option<(String, Option<String>)>,
    /// Inline bytes and their MIME type, if present.
    pub inline_data: Option<(Vec<u8>, Option<String>)>,
    /// A function call: `(id, name, args)`.
    pub function_call: Option<(Option<String>, String, HashMap<String, Value>)>,
    /// A function response: `(id, name, response)`.
    pub function_response: Option<(Option<String>, String, HashMap<String, Value>)>,
    /// A code-execution result: `(outcome, output)`.
    pub code_execution_result: Option<(String, String)>,
    /// Executable code: `(code, language)`.
    pub executable_code: Option<(String, String)>,
}

/// Elaborate a [`RawRunnerPart`] into the closed [`RunnerPart`] sum.
///
/// First matching active field wins, in order: text -> file_uri ->
/// inline_data -> function_call -> function_response ->
/// code_execution_result -> executable_code. Fails with
/// [`BridgeError::ConversionError`] if no field is populated.
pub fn elaborate_runner_part(raw: &RawRunnerPart) -> BridgeResult<RunnerPart> {
    if let Some(ref text) = raw.text {
        return Ok(RunnerPart::Text { text: text.clone() });
    }
    if let Some((ref uri, ref mime_type)) = raw.file_uri {
        return Ok(RunnerPart::FileUri {
            uri: uri.clone(),
            mime_type: mime_type.clone(),
        });
    }
    if let Some((ref bytes, ref mime_type)) = raw.inline_data {
        return Ok(RunnerPart::InlineData {
            bytes: bytes.clone(),
            mime_type: mime_type.clone(),
        });
    }
    if let Some((ref id, ref name, ref args)) = raw.function_call {
        return Ok(RunnerPart::FunctionCall {
            id: id.clone(),
            name: name.clone(),
            args: args.clone(),
        });
    }
    if let Some((ref id, ref name, ref response)) = raw.function_response {
        return Ok(RunnerPart::FunctionResponse {
            id: id.clone(),
            name: name.clone(),
            response: response.clone(),
        });
    }
    if let Some((ref outcome, ref output)) = raw.code_execution_result {
        return Ok(RunnerPart::CodeExecutionResult {
            outcome: outcome.clone(),
            output: output.clone(),
        });
    }
    if let Some((ref code, ref language)) = raw.executable_code {
        return Ok(RunnerPart::ExecutableCode {
            code: code.clone(),
            language: language.clone(),
        });
    }
    Err(BridgeError::ConversionError(
        "no recognized content in runner part".to_string(),
    ))
}

/// Convert a runner part to its protocol representation.
pub fn runner_to_protocol(part: &RunnerPart) -> BridgeResult<Part> {
    let protocol_part = match part {
        RunnerPart::Text { text } => Part::text(text),
        RunnerPart::FileUri { uri, mime_type } => {
            Part::file_from_uri(uri.clone(), None, mime_type.clone())
        }
        RunnerPart::InlineData { bytes, mime_type } => {
            Part::file_from_bytes(BASE64.encode(bytes), None, mime_type.clone())
        }
        RunnerPart::FunctionCall { id, name, args } => {
            let mut data = Map::new();
            data.insert("name".to_string(), json!(name));
            data.insert("args".to_string(), json!(args));
            if let Some(id) = id {
                data.insert("id".to_string(), json!(id));
            }
            Part::Data {
                data: Value::Object(data),
                metadata: Some(json!({"kagent_type": "function_call"})),
            }
        }
        RunnerPart::FunctionResponse { id, name, response } => {
            let normalized = normalize_function_response(response);
            let mut data = Map::new();
            data.insert("name".to_string(), json!(name));
            data.insert("response".to_string(), Value::Object(normalized));
            if let Some(id) = id {
                data.insert("id".to_string(), json!(id));
            }
            Part::Data {
                data: Value::Object(data),
                metadata: Some(json!({"kagent_type": "function_response"})),
            }
        }
        RunnerPart::CodeExecutionResult { outcome, output } => Part::Data {
            data: json!({"outcome": outcome, "output": output}),
            metadata: Some(json!({"kagent_type": "code_execution_result"})),
        },
        RunnerPart::ExecutableCode { code, language } => Part::Data {
            data: json!({"code": code, "language": language}),
            metadata: Some(json!({"kagent_type": "executable_code"})),
        },
    };
    Ok(protocol_part)
}

/// Normalize a function-response map for UI rendering.
///
/// 1. Strip keys whose value is nil.
/// 2. If `result` is already present, keep the stripped map as-is.
/// 3. Else if `error` is a non-empty string, set `isError=true` and
///    `result = {error: <string>}`.
/// 4. Else if `content` is a string, `result = {content: <string>}`.
/// 5. Else if `content` is a non-empty array, `result = {content: <array>}`.
/// 6. Else fall back to `result = <original response>`.
pub fn normalize_function_response(response: &HashMap<String, Value>) -> Map<String, Value> {
    let mut stripped = Map::new();
    for (k, v) in response {
        if !v.is_null() {
            stripped.insert(k.clone(), v.clone());
        }
    }

    if stripped.contains_key("result") {
        return stripped;
    }

    if let Some(Value::String(err)) = stripped.get("error") {
        if !err.is_empty() {
            let err = err.clone();
            stripped.insert("isError".to_string(), json!(true));
            stripped.insert("result".to_string(), json!({"error": err}));
            return stripped;
        }
    }

    match stripped.get("content") {
        Some(Value::String(content)) => {
            let content = content.clone();
            stripped.insert("result".to_string(), json!({"content": content}));
            stripped
        }
        Some(Value::Array(items)) if !items.is_empty() => {
            let items = items.clone();
            stripped.insert("result".to_string(), json!({"content": items}));
            stripped
        }
        _ => {
            let mut fallback = Map::new();
            fallback.insert(
                "result".to_string(),
                Value::Object(stripped.into_iter().collect()),
            );
            fallback
        }
    }
}

/// Convert a protocol part to its runner representation.
///
/// `data_part`s dispatch on `metadata["kagent_type"]`; an unrecognized or
/// missing type tag falls back to serializing the `data` map as a text part.
pub fn protocol_to_runner(part: &Part) -> BridgeResult<RunnerPart> {
    match part {
        Part::Text { text, .. } => Ok(RunnerPart::Text { text: text.clone() }),
        Part::File { file, .. } => match file {
            FileContent::Uri(f) => Ok(RunnerPart::FileUri {
                uri: f.uri.clone(),
                mime_type: f.mime_type.clone(),
            }),
            FileContent::Bytes(f) => {
                let bytes = BASE64.decode(f.bytes.as_bytes()).map_err(|e| {
                    BridgeError::ConversionError(format!("invalid base64 file bytes: {e}"))
                })?;
                Ok(RunnerPart::InlineData {
                    bytes,
                    mime_type: f.mime_type.clone(),
                })
            }
        },
        Part::Data { data, metadata } => {
            let type_tag = metadata
                .as_ref()
                .and_then(|m| m.get("kagent_type"))
                .and_then(|t| t.as_str());

            match type_tag {
                Some("function_call") => {
                    let name = data
                        .get("name")
                        .and_then(|v| v.as_str())
                        .ok_or_else(|| {
                            BridgeError::ConversionError(
                                "function_call data part missing name".to_string(),
                            )
                        })?
                        .to_string();
                    let args = data
                        .get("args")
                        .and_then(|v| v.as_object())
                        .map(|m| m.clone().into_iter().collect())
                        .unwrap_or_default();
                    let id = data
                        .get("id")
                        .and_then(|v| v.as_str())
                        .map(|s| s.to_string());
                    Ok(RunnerPart::FunctionCall { id, name, args })
                }
                Some("function_response") => {
                    let name = data
                        .get("name")
                        .and_then(|v| v.as_str())
                        .ok_or_else(|| {
                            BridgeError::ConversionError(
                                "function_response data part missing name".to_string(),
                            )
                        })?
                        .to_string();
                    let response = data
                        .get("response")
                        .and_then(|v| v.as_object())
                        .map(|m| m.clone().into_iter().collect())
                        .unwrap_or_default();
                    let id = data
                        .get("id")
                        .and_then(|v| v.as_str())
                        .map(|s| s.to_string());
                    Ok(RunnerPart::FunctionResponse { id, name, response })
                }
                Some("code_execution_result") => {
                    let outcome = data
                        .get("outcome")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    let output = data
                        .get("output")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    Ok(RunnerPart::CodeExecutionResult { outcome, output })
                }
                Some("executable_code") => {
                    let code = data
                        .get("code")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    let language = data
                        .get("language")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    Ok(RunnerPart::ExecutableCode { code, language })
                }
                _ => {
                    debug!("data part has no recognized type tag, serializing as text");
                    Ok(RunnerPart::Text {
                        text: data.to_string(),
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_to_protocol_text() {
        let part = RunnerPart::Text {
            text: "hello".to_string(),
        };
        match runner_to_protocol(&part).unwrap() {
            Part::Text { text, .. } => assert_eq!(text, "hello"),
            _ => panic!("expected text part"),
        }
    }

    #[test]
    fn runner_to_protocol_inline_data_base64_encodes() {
        let part = RunnerPart::InlineData {
            bytes: b"hi".to_vec(),
            mime_type: Some("text/plain".to_string()),
        };
        match runner_to_protocol(&part).unwrap() {
            Part::File { file, .. } => match file {
                FileContent::Bytes(f) => assert_eq!(f.bytes, BASE64.encode(b"hi")),
                _ => panic!("expected bytes file"),
            },
            _ => panic!("expected file part"),
        }
    }

    #[test]
    fn runner_to_protocol_function_call_tags_metadata() {
        let mut args = HashMap::new();
        args.insert("city".to_string(), json!("NYC"));
        let part = RunnerPart::FunctionCall {
            id: Some("fc1".to_string()),
            name: "get_weather".to_string(),
            args,
        };
        match runner_to_protocol(&part).unwrap() {
            Part::Data { data, metadata } => {
                assert_eq!(metadata.unwrap()["kagent_type"], "function_call");
                assert_eq!(data["name"], "get_weather");
                assert_eq!(data["id"], "fc1");
            }
            _ => panic!("expected data part"),
        }
    }

    #[test]
    fn protocol_to_runner_roundtrip_text() {
        let part = Part::text("hello");
        let runner_part = protocol_to_runner(&part).unwrap();
        assert_eq!(runner_part, RunnerPart::Text { text: "hello".into() });
    }

    #[test]
    fn protocol_to_runner_unrecognized_type_falls_back_to_text() {
        let part = Part::Data {
            data: json!({"foo": "bar"}),
            metadata: Some(json!({"kagent_type": "unknown_tag"})),
        };
        match protocol_to_runner(&part).unwrap() {
            RunnerPart::Text { text } => assert!(text.contains("foo")),
            _ => panic!("expected text fallback"),
        }
    }

    #[test]
    fn normalize_function_response_strips_nils() {
        let mut response = HashMap::new();
        response.insert("foo".to_string(), Value::Null);
        response.insert("bar".to_string(), json!("baz"));
        let normalized = normalize_function_response(&response);
        assert!(!normalized.contains_key("foo"));
    }

    #[test]
    fn normalize_function_response_keeps_existing_result() {
        let mut response = HashMap::new();
        response.insert("result".to_string(), json!({"already": "set"}));
        let normalized = normalize_function_response(&response);
        assert_eq!(normalized["result"], json!({"already": "set"}));
    }

    #[test]
    fn normalize_function_response_error_string_sets_is_error() {
        let mut response = HashMap::new();
        response.insert("error".to_string(), json!("boom"));
        let normalized = normalize_function_response(&response);
        assert_eq!(normalized["isError"], json!(true));
        assert_eq!(normalized["result"], json!({"error": "boom"}));
    }

    #[test]
    fn normalize_function_response_string_content() {
        let mut response = HashMap::new();
        response.insert("content".to_string(), json!("some text"));
        let normalized = normalize_function_response(&response);
        assert_eq!(normalized["result"], json!({"content": "some text"}));
    }

    #[test]
    fn normalize_function_response_array_content() {
        let mut response = HashMap::new();
        response.insert("content".to_string(), json!(["a", "b"]));
        let normalized = normalize_function_response(&response);
        assert_eq!(normalized["result"], json!({"content": ["a", "b"]}));
    }

    #[test]
    fn normalize_function_response_fallback_wraps_original() {
        let mut response = HashMap::new();
        response.insert("status".to_string(), json!("ok"));
        let normalized = normalize_function_response(&response);
        assert_eq!(normalized["result"]["status"], json!("ok"));
    }

    #[test]
    fn elaborate_runner_part_priority_text_over_file() {
        let raw = RawRunnerPart {
            text: Some("wins".to_string()),
            file_uri: Some(("https://example.com/f".to_string(), None)),
            ..Default::default()
        };
        match elaborate_runner_part(&raw).unwrap() {
            RunnerPart::Text { text } => assert_eq!(text, "wins"),
            _ => panic!("expected text to win priority"),
        }
    }

    #[test]
    fn elaborate_runner_part_empty_fails() {
        let raw = RawRunnerPart::default();
        assert!(elaborate_runner_part(&raw).is_err());
    }
}
