//! Runner-side data model.
//!
//! These are the shapes an agent runner speaks — distinct from the protocol
//! wire types in [`crate::types`]. [`crate::convert`] translates between the
//! two; nothing in this module knows about JSON-RPC or the A2A wire format.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single content part as the runner represents it.
///
/// Exactly one variant is ever constructed for a given part — this is a
/// closed sum rather than a loose map with runtime type assertions, the
/// sum the source's dynamically-typed `Part` elaborates into at the
/// boundary (see [`crate::convert::part`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunnerPart {
    /// Plain text content.
    Text {
        /// The text content.
        text: String,
    },
    /// A file referenced by URI.
    FileUri {
        /// The file's URI.
        uri: String,
        /// MIME type of the file.
        #[serde(skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
    /// Inline binary data.
    InlineData {
        /// Raw bytes, not yet base64-encoded.
        bytes: Vec<u8>,
        /// MIME type of the data.
        #[serde(skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
    /// A request by the runner to invoke a tool.
    FunctionCall {
        /// Call ID, present when the runner needs to correlate a response.
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Name of the tool to invoke.
        name: String,
        /// Arguments to pass to the tool.
        args: HashMap<String, Value>,
    },
    /// The result of a previously requested tool invocation.
    FunctionResponse {
        /// Call ID correlating this response to its request, when known.
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Name of the tool that produced this response.
        name: String,
        /// The raw tool response, prior to UI normalization.
        response: HashMap<String, Value>,
    },
    /// The result of executing runner-generated code.
    CodeExecutionResult {
        /// Execution outcome (e.g. `"OUTCOME_OK"`, `"OUTCOME_FAILED"`).
        outcome: String,
        /// Captured output of the execution.
        output: String,
    },
    /// Code the runner generated and intends to execute.
    ExecutableCode {
        /// The source code.
        code: String,
        /// The code's language (e.g. `"python"`).
        language: String,
    },
}

/// The bundle of parts a runner event carries in one content slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerContent {
    /// The parts, in emission order.
    pub parts: Vec<RunnerPart>,
}

impl RunnerContent {
    /// Build content from a vector of parts.
    pub fn new(parts: Vec<RunnerPart>) -> Self {
        Self { parts }
    }
}

/// A structured event yielded by the runner during one run.
///
/// `partial=true` marks an incremental streaming fragment; such events are
/// never appended to persisted task history unless they carry tool content
/// (see [`crate::convert::event`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerEvent {
    /// The component that produced this event (e.g. the agent's name).
    pub author: String,
    /// Correlates events from the same runner invocation.
    pub invocation_id: String,
    /// Whether this event is an incremental streaming fragment.
    pub partial: bool,
    /// IDs of function calls in this event the caller is expected to
    /// answer externally rather than have the runner resolve inline.
    pub long_running_tool_ids: HashSet<String>,
    /// The event's primary content slot.
    pub content: Option<RunnerContent>,
    /// A secondary, nested content slot some runner events use instead of
    /// `content` (e.g. a tool-response envelope nested under a named key).
    /// The event converter falls back to this when `content` is empty.
    pub response: Option<RunnerContent>,
    /// The model/runner's reason for ending generation, if any (e.g. `STOP`).
    pub finish_reason: Option<String>,
}

impl RunnerEvent {
    /// Returns the content to convert: the primary slot if it carries any
    /// parts, otherwise the secondary slot.
    pub fn effective_content(&self) -> Option<&RunnerContent> {
        match &self.content {
            Some(content) if !content.parts.is_empty() => Some(content),
            _ => self.response.as_ref(),
        }
    }

    /// Whether this event's content contains any tool-related part
    /// (function call or function response).
    pub fn has_tool_content(&self) -> bool {
        self.effective_content().is_some_and(|content| {
            content.parts.iter().any(|part| {
                matches!(
                    part,
                    RunnerPart::FunctionCall { .. } | RunnerPart::FunctionResponse { .. }
                )
            })
        })
    }
}

/// An error sentinel yielded by the runner in place of a structured event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerEventError {
    /// A short, machine-matchable error code or description.
    pub error_code: String,
    /// A human-readable error message, when the runner supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// One step of the runner's lazy event sequence: a structured event, an
/// error sentinel, or — per the source's coroutine-like contract — both
/// absent fields paired with an error meaning "no event, but something
/// went wrong".
#[derive(Debug, Clone, Default)]
pub struct RunnerStep {
    /// The structured event, if the runner produced one for this step.
    pub event: Option<RunnerEvent>,
    /// The error sentinel, if the runner reported a failure for this step.
    pub error: Option<RunnerEventError>,
}

impl RunnerStep {
    /// Build a step carrying a normal event.
    pub fn event(event: RunnerEvent) -> Self {
        Self {
            event: Some(event),
            error: None,
        }
    }

    /// Build a step carrying only an error.
    pub fn error(error: RunnerEventError) -> Self {
        Self {
            event: None,
            error: Some(error),
        }
    }
}

/// Immutable identifiers stamped into every event converted during one
/// request.
#[derive(Debug, Clone)]
pub struct ConversionContext {
    /// The task this run belongs to.
    pub task_id: String,
    /// The conversation context this task belongs to.
    pub context_id: String,
    /// The name of the agent application driving this run.
    pub app_name: String,
    /// The user on whose behalf this run executes.
    pub user_id: String,
    /// The runner session this run is attached to.
    pub session_id: String,
}

impl ConversionContext {
    /// Construct a new conversion context.
    pub fn new(
        task_id: impl Into<String>,
        context_id: impl Into<String>,
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            context_id: context_id.into(),
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }
}

/// The transport a tool server is reachable over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolServerType {
    /// Streamable HTTP transport.
    HttpStreamable,
    /// Server-sent events transport.
    Sse,
}

/// A tool schema discovered from a remote tool server, recorded once at
/// registration and read thereafter by name on the tool-invocation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRegistryEntry {
    /// The tool's name, as the runner's function-calling machinery sees it.
    pub name: String,
    /// A human/model-readable description of what the tool does.
    pub description: String,
    /// The tool's JSON Schema input shape.
    pub input_schema: Value,
    /// The originating server's endpoint.
    pub server_url: String,
    /// The transport the originating server is reachable over.
    pub server_type: ToolServerType,
    /// Headers injected on every request to the originating server.
    pub headers: HashMap<String, String>,
}

/// A pending tool-approval request surfaced to the human for review.
///
/// Created when the runner yields a long-running function call; consumed
/// once the human's decision arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// The tool the runner wants to invoke.
    pub name: String,
    /// The arguments the runner wants to invoke it with.
    pub args: HashMap<String, Value>,
    /// The originating function call's correlation ID, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}
