//! The bridge's stateful server-side collaborators.
//!
//! - [`AgentExecutor`] trait — the protocol-facing execution contract
//! - [`RequestContext`] — execution context with task IDs, message, metadata
//! - [`ServerCallContext`] — per-request context with extensions and state
//! - [`RequestContextBuilder`] trait + [`SimpleRequestContextBuilder`] — build contexts
//! - [`TaskStore`] trait + [`InMemoryTaskStore`] — task persistence
//! - [`task_store_client::RemoteTaskStoreClient`] — REST-backed `TaskStore`
//! - [`TaskUpdater`] — thread-safe task state transition helper
//! - [`EventQueue`] — broadcast channel for streaming events
//! - [`QueueManager`] trait + [`InMemoryQueueManager`] — per-task queue management
//! - [`EventConsumer`] — consumes events from a queue (one-shot or streaming)
//! - [`sink::EventSink`] trait + buffer/stream/task-saving implementations
//! - [`aggregator::TaskAggregator`] — reduces a status-update stream to a snapshot
//! - [`runner_adapter::RunnerAdapter`] — drives an [`runner_adapter::AgentRunner`]
//! - [`tool_registry::ToolRegistry`] — discovers tool schemas from remote servers
//! - [`hitl::handle_approval_interrupt`] — pauses a task for human approval
//! - [`decision::extract_decision`] — reads an approve/deny decision back out
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use a2a_bridge::server::*;
//!
//! struct MyAgent;
//!
//! #[async_trait::async_trait]
//! impl AgentExecutor for MyAgent {
//!     async fn execute(&self, ctx: RequestContext, queue: EventQueue) -> a2a_bridge::BridgeResult<()> {
//!         let updater = TaskUpdater::new(queue, ctx.task_id, ctx.context_id);
//!         updater.start_work(Some("Processing...")).await?;
//!         updater.complete(Some("Done!")).await?;
//!         Ok(())
//!     }
//!
//!     async fn cancel(&self, ctx: RequestContext, queue: EventQueue) -> a2a_bridge::BridgeResult<()> {
//!         let updater = TaskUpdater::new(queue, ctx.task_id, ctx.context_id);
//!         updater.cancel(None).await?;
//!         Ok(())
//!     }
//! }
//! ```

pub mod aggregator;
pub mod agent_executor;
pub mod decision;
pub mod event_queue;
pub mod hitl;
pub mod runner_adapter;
pub mod sink;
pub mod task_manager;
pub mod task_store;
pub mod task_updater;

#[cfg(feature = "tool-registry")]
pub mod task_store_client;
#[cfg(feature = "tool-registry")]
pub mod tool_registry;

pub use aggregator::TaskAggregator;
pub use agent_executor::{
    AgentExecutor, RequestContext, RequestContextBuilder, ServerCallContext,
    SimpleRequestContextBuilder,
};
pub use decision::{extract_decision, Decision};
pub use event_queue::{
    EventConsumer, EventQueue, InMemoryQueueManager, NoTaskQueue, QueueManager, TaskQueueExists,
};
pub use hitl::handle_approval_interrupt;
pub use runner_adapter::{AgentRunner, RunnerAdapter, SessionService};
pub use sink::{BufferSink, EventSink, StreamSink, TaskSavingSink};
pub use task_manager::{append_artifact_to_task, TaskEvent, TaskManager};
pub use task_store::{InMemoryTaskStore, TaskListParams, TaskListResponse, TaskStore};
pub use task_updater::TaskUpdater;

#[cfg(feature = "tool-registry")]
pub use task_store_client::{RemoteTaskStoreClient, TaskStoreClientConfig};
#[cfg(feature = "tool-registry")]
pub use tool_registry::{ToolRegistry, ToolServerConfig, TransportKind};
