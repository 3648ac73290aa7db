//! Builds a runner message (role + parts) from a protocol [`Message`] or a
//! loose map, and builds protocol messages back from runner content.

use std::collections::HashMap;

use base64::Engine;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::convert::part::{protocol_to_runner, runner_to_protocol, RawRunnerPart};
use crate::runner::RunnerPart;
use crate::types::{Message, Part, Role};

/// A runner-native message: a role string plus ordered parts.
///
/// The runner's own role vocabulary differs from the protocol's — `agent`
/// on the wire becomes `model` here, matching how the underlying
/// LLM-plus-tools runner expects to see its own prior turns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunnerMessage {
    /// `"user"` or `"model"`.
    pub role: String,
    /// The message's content parts.
    pub parts: Vec<RunnerPart>,
}

/// Maps a protocol [`Role`] to the runner's role vocabulary.
fn runner_role(role: Role) -> &'static str {
    match role {
        Role::Agent => "model",
        Role::User | Role::Unspecified => "user",
    }
}

/// Strict entry point: build a runner message from a structured protocol
/// [`Message`].
///
/// Parts that fail conversion are skipped (logged), not fatal — a message
/// with zero usable parts yields a zero-parts runner message; the caller
/// decides whether to proceed.
pub fn runner_message_from_protocol(message: &Message) -> RunnerMessage {
    let parts = message
        .parts
        .iter()
        .filter_map(|part| match protocol_to_runner(part) {
            Ok(runner_part) => Some(runner_part),
            Err(err) => {
                warn!(error = %err, "skipping part that failed protocol->runner conversion");
                None
            }
        })
        .collect();

    RunnerMessage {
        role: runner_role(message.role).to_string(),
        parts,
    }
}

/// Loose entry point: build a runner message from a `serde_json::Value`
/// shaped either as `{role, parts: [...]}` or as a bare array of part maps.
///
/// Recognized part keys: `text`, `function_call {name, args, id?}`,
/// `function_response {name, response, id?}`, `file_data {file_uri,
/// mime_type}`, `inline_data {data, mime_type}` where `data` is either raw
/// bytes or a base64 string. Malformed parts are skipped silently.
pub fn message_from_loose(value: &Value) -> RunnerMessage {
    let role = value
        .get("role")
        .and_then(|v| v.as_str())
        .map(|s| if s == "agent" { "model" } else { s })
        .unwrap_or("user")
        .to_string();

    let parts_value = value.get("parts").unwrap_or(value);
    let empty = Vec::new();
    let raw_parts = parts_value.as_array().unwrap_or(&empty);

    let parts = raw_parts
        .iter()
        .filter_map(loose_part_to_runner_part)
        .collect();

    RunnerMessage { role, parts }
}

fn loose_part_to_runner_part(value: &Value) -> Option<RunnerPart> {
    let obj = value.as_object()?;

    let mut raw = RawRunnerPart::default();

    if let Some(text) = obj.get("text").and_then(|v| v.as_str()) {
        raw.text = Some(text.to_string());
    } else if let Some(fc) = obj.get("function_call").and_then(|v| v.as_object()) {
        let name = fc.get("name").and_then(|v| v.as_str())?.to_string();
        let args: HashMap<String, Value> = fc
            .get("args")
            .and_then(|v| v.as_object())
            .map(|m| m.clone().into_iter().collect())
            .unwrap_or_default();
        let id = fc.get("id").and_then(|v| v.as_str()).map(String::from);
        raw.function_call = Some((id, name, args));
    } else if let Some(fr) = obj.get("function_response").and_then(|v| v.as_object()) {
        let name = fr.get("name").and_then(|v| v.as_str())?.to_string();
        let response: HashMap<String, Value> = fr
            .get("response")
            .and_then(|v| v.as_object())
            .map(|m| m.clone().into_iter().collect())
            .unwrap_or_default();
        let id = fr.get("id").and_then(|v| v.as_str()).map(String::from);
        raw.function_response = Some((id, name, response));
    } else if let Some(fd) = obj.get("file_data").and_then(|v| v.as_object()) {
        let uri = fd.get("file_uri").and_then(|v| v.as_str())?.to_string();
        let mime_type = fd
            .get("mime_type")
            .and_then(|v| v.as_str())
            .map(String::from);
        raw.file_uri = Some((uri, mime_type));
    } else if let Some(id) = obj.get("inline_data").and_then(|v| v.as_object()) {
        let mime_type = id
            .get("mime_type")
            .and_then(|v| v.as_str())
            .map(String::from);
        let bytes = match id.get("data") {
            Some(Value::String(s)) => base64::engine::general_purpose::STANDARD
                .decode(s.as_bytes())
                .ok()?,
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| v.as_u64().map(|n| n as u8))
                .collect::<Option<Vec<u8>>>()?,
            _ => return None,
        };
        raw.inline_data = Some((bytes, mime_type));
    } else {
        return None;
    }

    crate::convert::part::elaborate_runner_part(&raw).ok()
}

/// Build a protocol [`Message`] from converted runner parts, with a fresh
/// message ID.
pub fn protocol_message_from_content(parts: Vec<RunnerPart>, role: Role) -> Message {
    let converted_parts: Vec<Part> = parts
        .iter()
        .filter_map(|part| match runner_to_protocol(part) {
            Ok(protocol_part) => Some(protocol_part),
            Err(err) => {
                warn!(error = %err, "skipping runner part that failed runner->protocol conversion");
                None
            }
        })
        .collect();

    Message {
        message_id: Uuid::new_v4().to_string(),
        role,
        kind: "message".to_string(),
        parts: converted_parts,
        context_id: None,
        task_id: None,
        metadata: None,
        extensions: None,
        reference_task_ids: None,
    }
}
