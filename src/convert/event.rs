//! Translates a [`RunnerStep`] into zero or more A2A protocol events.
//!
//! Stateless: every decision is a pure function of the step and the
//! [`ConversionContext`] it arrived with.

use std::collections::HashSet;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::convert::part::runner_to_protocol;
use crate::runner::{ConversionContext, RunnerPart, RunnerStep};
use crate::types::{Message, Part, Role, StreamResponse, TaskState, TaskStatus, TaskStatusUpdateEvent};

/// Returns `true` if the step's event is an incremental streaming fragment.
pub fn is_partial(step: &RunnerStep) -> bool {
    step.event.as_ref().is_some_and(|event| event.partial)
}

/// Convert one runner step into zero or more protocol events.
///
/// A nil event paired with an error is classified and converted the same
/// way as a structured event carrying a terminal finish reason. A
/// `STOP`-finished event with empty content yields nothing — neither an
/// error nor a working update.
pub fn convert_event(step: &RunnerStep, ctx: &ConversionContext) -> Vec<StreamResponse> {
    if let Some(error) = &step.error {
        return vec![error_event(&error.error_code, error.error_message.as_deref(), ctx)];
    }

    let Some(event) = &step.event else {
        return Vec::new();
    };

    if let Some(reason) = event.finish_reason.as_deref() {
        if !reason.is_empty() && reason != "STOP" {
            return vec![error_event(reason, None, ctx)];
        }
    }

    let Some(content) = event.effective_content() else {
        return Vec::new();
    };
    if content.parts.is_empty() {
        return Vec::new();
    }

    let converted_parts: Vec<Part> = content
        .parts
        .iter()
        .filter_map(|runner_part| match runner_to_protocol(runner_part) {
            Ok(mut protocol_part) => {
                stamp_long_running(&mut protocol_part, runner_part, &event.long_running_tool_ids);
                Some(protocol_part)
            }
            Err(err) => {
                debug!(error = %err, "dropping part that failed conversion");
                None
            }
        })
        .collect();

    if converted_parts.is_empty() {
        return Vec::new();
    }

    let state = classify_state(&converted_parts);

    let mut message_metadata = Map::new();
    if event.partial {
        message_metadata.insert("kagent_adk_partial".to_string(), json!(true));
    }

    let message = Message {
        message_id: Uuid::new_v4().to_string(),
        role: Role::Agent,
        kind: "message".to_string(),
        parts: converted_parts,
        context_id: Some(ctx.context_id.clone()),
        task_id: Some(ctx.task_id.clone()),
        metadata: if message_metadata.is_empty() {
            None
        } else {
            Some(Value::Object(message_metadata))
        },
        extensions: None,
        reference_task_ids: None,
    };

    let status_metadata = context_metadata(ctx, Some(&event.author), Some(&event.invocation_id), None);

    vec![StreamResponse::StatusUpdate(TaskStatusUpdateEvent {
        task_id: ctx.task_id.clone(),
        context_id: ctx.context_id.clone(),
        kind: "status-update".to_string(),
        status: TaskStatus {
            state,
            message: Some(message),
            timestamp: Some(Utc::now().to_rfc3339()),
        },
        r#final: false,
        metadata: Some(status_metadata),
    })]
}

/// Task-state classification lattice: `auth_required` beats `input_required`
/// beats `working`, driven by the converted parts' `function_call`
/// long-running tags.
fn classify_state(parts: &[Part]) -> TaskState {
    let mut any_long_running_call = false;

    for part in parts {
        let Part::Data { data, metadata } = part else {
            continue;
        };
        let is_function_call = metadata
            .as_ref()
            .and_then(|m| m.get("kagent_type"))
            .and_then(|t| t.as_str())
            == Some("function_call");
        let is_long_running = metadata
            .as_ref()
            .and_then(|m| m.get("kagent_is_long_running"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        if !(is_function_call && is_long_running) {
            continue;
        }
        any_long_running_call = true;

        let is_request_euc = data.get("name").and_then(|v| v.as_str()) == Some("request_euc");
        if is_request_euc {
            return TaskState::AuthRequired;
        }
    }

    if any_long_running_call {
        TaskState::InputRequired
    } else {
        TaskState::Working
    }
}

/// Stamps `metadata["kagent_is_long_running"] = true` on a converted
/// `data_part` when its originating function call's ID is in the event's
/// long-running set.
fn stamp_long_running(protocol_part: &mut Part, runner_part: &RunnerPart, long_running_ids: &HashSet<String>) {
    let RunnerPart::FunctionCall { id: Some(id), .. } = runner_part else {
        return;
    };
    if !long_running_ids.contains(id) {
        return;
    }
    if let Part::Data { metadata, .. } = protocol_part {
        let map = metadata.get_or_insert_with(|| Value::Object(Map::new()));
        if let Some(obj) = map.as_object_mut() {
            obj.insert("kagent_is_long_running".to_string(), json!(true));
        }
    }
}

fn context_metadata(
    ctx: &ConversionContext,
    author: Option<&str>,
    invocation_id: Option<&str>,
    error_code: Option<&str>,
) -> Value {
    let mut map = Map::new();
    map.insert("kagent_app_name".to_string(), json!(ctx.app_name));
    map.insert("kagent_user_id".to_string(), json!(ctx.user_id));
    map.insert("kagent_session_id".to_string(), json!(ctx.session_id));
    if let Some(author) = author {
        map.insert("kagent_author".to_string(), json!(author));
    }
    if let Some(invocation_id) = invocation_id {
        map.insert("kagent_invocation_id".to_string(), json!(invocation_id));
    }
    if let Some(error_code) = error_code {
        map.insert("kagent_error_code".to_string(), json!(error_code));
    }
    Value::Object(map)
}

fn error_event(error_code: &str, error_message: Option<&str>, ctx: &ConversionContext) -> StreamResponse {
    let text = error_message
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| default_error_message(error_code));

    let message = Message {
        message_id: Uuid::new_v4().to_string(),
        role: Role::Agent,
        kind: "message".to_string(),
        parts: vec![Part::text(text)],
        context_id: Some(ctx.context_id.clone()),
        task_id: Some(ctx.task_id.clone()),
        metadata: None,
        extensions: None,
        reference_task_ids: None,
    };

    StreamResponse::StatusUpdate(TaskStatusUpdateEvent {
        task_id: ctx.task_id.clone(),
        context_id: ctx.context_id.clone(),
        kind: "status-update".to_string(),
        status: TaskStatus {
            state: TaskState::Failed,
            message: Some(message),
            timestamp: Some(Utc::now().to_rfc3339()),
        },
        r#final: false,
        metadata: Some(context_metadata(ctx, None, None, Some(error_code))),
    })
}

/// A fixed table of user-facing default messages for error codes that carry
/// no explicit `error_message` of their own.
fn default_error_message(code: &str) -> String {
    match code {
        "MCP_CONNECTION_ERROR" => "MCP connection failure or timeout.".to_string(),
        "MCP_DNS_ERROR" => "MCP server DNS resolution failed.".to_string(),
        "MCP_CONNECTION_REFUSED" => "MCP server connection refused.".to_string(),
        "RUNNER_ERROR" => "The agent runner encountered an error.".to_string(),
        "RUNNER_TIMEOUT" => "The agent runner timed out.".to_string(),
        "RUNNER_INIT_ERROR" => "The agent runner failed to initialize.".to_string(),
        "NO_MODEL" => "No model is configured for this agent.".to_string(),
        "NO_MESSAGE" => "No message was provided to the agent.".to_string(),
        "CONVERSION_ERROR" => "Failed to convert agent output.".to_string(),
        "MALFORMED_FUNCTION_CALL" => "The model produced a malformed function call.".to_string(),
        "MAX_TOKENS" => "The model reached its maximum token limit.".to_string(),
        other => format!("An unknown error occurred ({other})."),
    }
}
