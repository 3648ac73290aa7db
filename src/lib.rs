//! # a2a-bridge — runtime bridge between an agent runner and the A2A protocol
//!
//! This crate translates the black-box event stream produced by an LLM-plus-tools
//! agent runner into [A2A protocol](https://a2a-protocol.org/latest/specification/)
//! task and message events, persists task state to a remote task store, and
//! supports human-in-the-loop tool-approval interrupts.
//!
//! ## Overview
//!
//! A runner produces a stream of runner-native steps (text deltas, tool calls,
//! tool responses, errors). This crate:
//! - Converts runner parts/messages/events into A2A [`types::Part`],
//!   [`types::Message`], and [`types::StreamResponse`] values (see [`convert`])
//! - Drives that conversion end-to-end via [`server::RunnerAdapter`]
//! - Fans converted events out to subscribers through [`server::EventSink`]
//!   implementations, optionally mirroring them into a remote task store
//! - Reduces a status-update stream into a final [`types::Task`] snapshot via
//!   [`server::TaskAggregator`]
//! - Discovers tool schemas from remote tool servers via [`server::ToolRegistry`]
//! - Pauses a task for tool-approval review and resumes it from the human's
//!   decision via [`server::hitl`] and [`server::decision`]
//!
//! ## Feature flags
//!
//! | Feature         | Default | Description |
//! |-----------------|---------|-------------|
//! | `tool-registry` | yes     | HTTP/SSE tool discovery and the remote task-store REST client (reqwest + SSE) |
//!
//! Disabling `tool-registry` leaves the data model, converters, event sinks,
//! aggregator, and HITL modules usable without pulling in an HTTP stack.
//!
//! ## Quick start
//!
//! Implement [`server::AgentRunner`] to adapt your runner, then drive it with
//! [`server::RunnerAdapter`]:
//!
//! ```rust,ignore
//! use a2a_bridge::server::{AgentRunner, RunnerAdapter, EventSink, BufferSink};
//! use a2a_bridge::runner::{ConversionContext, RunnerStep};
//! use async_trait::async_trait;
//!
//! struct MyRunner;
//!
//! #[async_trait]
//! impl AgentRunner for MyRunner {
//!     async fn run(&self, ctx: &ConversionContext) -> a2a_bridge::BridgeResult<Vec<RunnerStep>> {
//!         // call into the runner, collect its steps
//!         Ok(vec![])
//!     }
//! }
//!
//! # async fn example() -> a2a_bridge::BridgeResult<()> {
//! let sink = BufferSink::new();
//! let adapter = RunnerAdapter::new(MyRunner);
//! let ctx = ConversionContext::new("task-1", "ctx-1", "my-agent", "user-1", "session-1");
//! adapter.run(&ctx, &sink).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ### Data model and conversion
//!
//! - [`runner::RunnerPart`] / [`runner::RunnerEvent`] / [`runner::RunnerStep`] —
//!   the runner-native shapes a runner emits
//! - [`convert::part`] — `Part` <-> `RunnerPart` conversion
//! - [`convert::message`] — strict and loose `Message` conversion
//! - [`convert::event`] — `RunnerStep` -> `StreamResponse` conversion
//!
//! ### Server-side collaborators
//!
//! - [`server::RunnerAdapter`] — drives an [`server::AgentRunner`] end-to-end
//! - [`server::ToolRegistry`] — discovers tool schemas from remote tool servers
//! - [`server::TaskStore`] — trait for task persistence
//! - [`server::InMemoryTaskStore`] — in-memory task store implementation
//! - [`server::RemoteTaskStoreClient`] — REST-backed task store implementation
//! - [`server::EventQueue`] — broadcast channel for SSE events
//! - [`server::EventSink`] — pluggable event fan-out (buffer/stream/task-saving)
//! - [`server::TaskAggregator`] — reduces a status-update stream to a snapshot
//! - [`server::TaskUpdater`] — helper for publishing task status/artifact updates
//! - [`server::handle_approval_interrupt`] — pauses a task for human approval
//! - [`server::extract_decision`] — reads an approve/deny decision back out
//!
//! ### Core types
//!
//! - [`types::Task`] — A2A task with status, history, and artifacts
//! - [`types::Message`] — a message with text/file/data parts
//! - [`types::Part`] — content part (text, file, or structured data)
//! - [`types::TaskState`] — task lifecycle state machine
//! - [`types::StreamResponse`] — SSE event types (status updates, artifact updates)
//! - [`error::BridgeError`] — the bridge's unified error type

pub mod convert;
pub mod error;
pub mod runner;
pub mod server;
pub mod types;
pub mod utils;

/// Prelude module that re-exports commonly used types and traits.
///
/// Import this module with `use a2a_bridge::prelude::*;` to get access to the
/// most frequently used types without having to import them individually.
///
/// # Example
///
/// ```
/// use a2a_bridge::prelude::*;
///
/// // Now you have access to common types like:
/// // - Message, Part, Task, TaskState, Role
/// // - RunnerPart, RunnerEvent, RunnerStep, ConversionContext
/// // - BridgeError, BridgeResult
/// ```
pub mod prelude {
    // Core protocol types
    pub use crate::types::{
        Artifact, FileContent, FileWithBytes, FileWithUri, Message, Part, Role,
        SendMessageConfiguration, SendMessageParams, StreamResponse, Task,
        TaskArtifactUpdateEvent, TaskState, TaskStatus, TaskStatusUpdateEvent,
    };

    // Runner-side data model
    pub use crate::runner::{
        ApprovalRequest, ConversionContext, RunnerEvent, RunnerEventError, RunnerPart, RunnerStep,
        ToolRegistryEntry,
    };

    // Error types
    pub use crate::error::{BridgeError, BridgeResult};

    pub use crate::server::{
        AgentExecutor, AgentRunner, EventConsumer, EventQueue, InMemoryQueueManager,
        InMemoryTaskStore, QueueManager, RequestContext, RequestContextBuilder, RunnerAdapter,
        ServerCallContext, SimpleRequestContextBuilder, TaskAggregator, TaskManager, TaskStore,
        TaskUpdater,
    };

    #[cfg(feature = "tool-registry")]
    pub use crate::server::{RemoteTaskStoreClient, ToolRegistry};
}

// Re-export core types at crate root for convenience.
pub use error::{BridgeError, BridgeResult};
pub use types::*;
