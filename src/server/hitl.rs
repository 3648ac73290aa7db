//! Human-in-the-loop tool-approval interrupts.
//!
//! When the runner wants to invoke a tool that requires human sign-off, the
//! bridge pauses the task in `input-required` and surfaces the pending
//! calls as both readable text and a structured data part, so a UI can
//! either render a form or let a human free-type a reply. [`extract_decision`]
//! later reads that reply back.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::warn;
use uuid::Uuid;

use crate::error::BridgeResult;
use crate::runner::ApprovalRequest;
use crate::types::{Message, Part, Role, StreamResponse, TaskState, TaskStatus, TaskStatusUpdateEvent};

use super::sink::EventSink;

const WAIT_FOR_SAVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Something that can block until a task's latest save has been
/// acknowledged by the remote task store.
///
/// Implemented by the remote task-store client; kept as a narrow trait here
/// so this module doesn't need the `tool-registry` feature.
#[async_trait]
pub trait TaskSaveWaiter: Send + Sync {
    /// Block until `task_id`'s pending save completes, or `timeout` elapses.
    async fn wait_for_save(&self, task_id: &str, timeout: Duration) -> BridgeResult<()>;
}

/// Pause a task on a tool-approval interrupt.
///
/// Enqueues an `input-required` status update carrying both a human-readable
/// summary and a structured `interrupt_data` part, then — if a task store
/// waiter is supplied — best-effort waits for that status to be durably
/// saved before returning, so a client polling the remote store won't race
/// the in-flight write. A wait timeout or cancellation is logged, not
/// returned as an error; only a failure to enqueue the event itself is
/// fatal, since the human simply can't see the interrupt without it.
pub async fn handle_approval_interrupt(
    action_requests: &[ApprovalRequest],
    task_id: &str,
    context_id: &str,
    sink: &dyn EventSink,
    task_store: Option<&dyn TaskSaveWaiter>,
    app_name: Option<&str>,
) -> BridgeResult<()> {
    let message = build_interrupt_message(action_requests, task_id, context_id);

    let mut event_metadata = Map::new();
    event_metadata.insert("kagent_interrupt_type".to_string(), json!("tool_approval"));
    if let Some(app_name) = app_name {
        event_metadata.insert("kagent_app_name".to_string(), json!(app_name));
    }

    let event = TaskStatusUpdateEvent {
        task_id: task_id.to_string(),
        context_id: context_id.to_string(),
        kind: "status-update".to_string(),
        status: TaskStatus {
            state: TaskState::InputRequired,
            message: Some(message),
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
        },
        r#final: false,
        metadata: Some(Value::Object(event_metadata)),
    };

    sink.enqueue(StreamResponse::StatusUpdate(event)).await?;

    if let Some(task_store) = task_store {
        match task_store.wait_for_save(task_id, WAIT_FOR_SAVE_TIMEOUT).await {
            Ok(()) => {}
            Err(err) => {
                warn!(task_id, error = %err, "timed out waiting for approval interrupt to be saved");
            }
        }
    }

    Ok(())
}

fn build_interrupt_message(action_requests: &[ApprovalRequest], task_id: &str, context_id: &str) -> Message {
    let mut text = String::from("**Approval Required**\n\n");
    for request in action_requests {
        text.push_str(&format!("- `{}`\n", escape_markdown(&json!(request.name))));
        let mut keys: Vec<&String> = request.args.keys().collect();
        keys.sort();
        for key in keys {
            let value = &request.args[key];
            text.push_str(&format!("  - {}: `{}`\n", key, escape_markdown(value)));
        }
    }

    let data_part = Part::Data {
        data: json!({
            "interrupt_type": "tool_approval",
            "action_requests": action_requests,
        }),
        metadata: Some(json!({"kagent_type": "interrupt_data"})),
    };

    Message {
        message_id: Uuid::new_v4().to_string(),
        role: Role::Agent,
        kind: "message".to_string(),
        parts: vec![Part::text(text), data_part],
        context_id: Some(context_id.to_string()),
        task_id: Some(task_id.to_string()),
        metadata: None,
        extensions: None,
        reference_task_ids: None,
    }
}

fn escape_markdown(value: &Value) -> String {
    let rendered = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    rendered.replace('`', "'")
}
