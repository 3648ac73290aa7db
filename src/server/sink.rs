//! Event sinks — the outbound destinations a converted event can be written
//! to.
//!
//! Three variants share one contract: a buffer that never blocks, a
//! streaming wrapper around [`EventQueue`], and a task-saving wrapper that
//! mirrors every event into a [`TaskStore`] without ever failing the stream
//! on a save error.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use crate::error::BridgeResult;
use crate::types::{Message, Role, StreamResponse, Task, TaskState, TaskStatus};

use super::event_queue::EventQueue;
use super::task_store::TaskStore;

/// A destination a converted event can be written to.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Write one event to the sink.
    async fn enqueue(&self, event: StreamResponse) -> BridgeResult<()>;
}

/// An in-memory sink that appends events to an ordered buffer. Never blocks.
#[derive(Default)]
pub struct BufferSink {
    events: Mutex<Vec<StreamResponse>>,
}

impl BufferSink {
    /// Create an empty buffer sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a clone of the accumulated events in enqueue order.
    pub async fn events(&self) -> Vec<StreamResponse> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventSink for BufferSink {
    async fn enqueue(&self, event: StreamResponse) -> BridgeResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// A sink backed by a broadcast [`EventQueue`].
pub struct StreamSink {
    queue: EventQueue,
}

impl StreamSink {
    /// Wrap an event queue as a sink.
    pub fn new(queue: EventQueue) -> Self {
        Self { queue }
    }
}

#[async_trait]
impl EventSink for StreamSink {
    async fn enqueue(&self, event: StreamResponse) -> BridgeResult<()> {
        self.queue.enqueue_event(event).await
    }
}

/// A sink that mirrors every event into a [`TaskStore`] before forwarding it
/// to an inner sink.
///
/// Keeps an in-memory cached task to avoid clobbering itself with a stale
/// `GET` result: the first event loads the existing task (or constructs a
/// fresh one bound to `context_id`), and every subsequent event mutates that
/// cached copy via [`apply_event_to_task`]. Save failures are logged, never
/// propagated — availability of the live stream outranks strict durability
/// on this path.
pub struct TaskSavingSink<I: EventSink> {
    inner: I,
    task_store: Arc<dyn TaskStore>,
    task_id: String,
    context_id: String,
    cached_task: Mutex<Option<Task>>,
}

impl<I: EventSink> TaskSavingSink<I> {
    /// Wrap `inner`, mirroring events for `task_id`/`context_id` into
    /// `task_store`.
    pub fn new(
        inner: I,
        task_store: Arc<dyn TaskStore>,
        task_id: impl Into<String>,
        context_id: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            task_store,
            task_id: task_id.into(),
            context_id: context_id.into(),
            cached_task: Mutex::new(None),
        }
    }

    async fn load_or_init(&self) -> BridgeResult<Task> {
        if let Some(task) = self.task_store.get(&self.task_id).await? {
            return Ok(task);
        }
        Ok(Task {
            id: self.task_id.clone(),
            context_id: self.context_id.clone(),
            kind: "task".to_string(),
            status: TaskStatus {
                state: TaskState::Submitted,
                message: None,
                timestamp: None,
            },
            artifacts: None,
            history: None,
            metadata: None,
        })
    }
}

#[async_trait]
impl<I: EventSink + Send + Sync> EventSink for TaskSavingSink<I> {
    async fn enqueue(&self, event: StreamResponse) -> BridgeResult<()> {
        {
            let mut cached = self.cached_task.lock().await;
            if cached.is_none() {
                *cached = Some(self.load_or_init().await?);
            }

            if let Some(task) = cached.as_mut() {
                apply_event_to_task(task, &event);
                if let Err(err) = self.task_store.save(task.clone()).await {
                    warn!(task_id = %self.task_id, error = %err, "failed to persist task event");
                }
            }
        }

        self.inner.enqueue(event).await
    }
}

/// Mutates `task` in place to reflect `event`.
///
/// - `status-update`: replaces `task.status`; if the new status carries a
///   message, that message is appended to history.
/// - `artifact-update` with non-empty parts: appends a fresh agent-role
///   message carrying those parts to history.
/// - Everything else (complete `Task` snapshots, direct `Message`s) is
///   ignored — this sink only tracks incremental status/artifact deltas.
pub fn apply_event_to_task(task: &mut Task, event: &StreamResponse) {
    match event {
        StreamResponse::StatusUpdate(update) => {
            task.status = update.status.clone();
            if let Some(ref message) = update.status.message {
                task.history.get_or_insert_with(Vec::new).push(message.clone());
            }
        }
        StreamResponse::ArtifactUpdate(update) => {
            if update.artifact.parts.is_empty() {
                return;
            }
            let message = Message {
                message_id: Uuid::new_v4().to_string(),
                role: Role::Agent,
                kind: "message".to_string(),
                parts: update.artifact.parts.clone(),
                context_id: Some(task.context_id.clone()),
                task_id: Some(task.id.clone()),
                metadata: None,
                extensions: None,
                reference_task_ids: None,
            };
            task.history.get_or_insert_with(Vec::new).push(message);
        }
        StreamResponse::Task(_) | StreamResponse::Message(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::task_store::InMemoryTaskStore;
    use crate::types::{Artifact, Part, TaskArtifactUpdateEvent, TaskStatusUpdateEvent};

    #[tokio::test]
    async fn buffer_sink_accumulates_in_order() {
        let sink = BufferSink::new();
        sink.enqueue(StreamResponse::Message(Message::user("m1", "hi")))
            .await
            .unwrap();
        sink.enqueue(StreamResponse::Message(Message::user("m2", "bye")))
            .await
            .unwrap();
        let events = sink.events().await;
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn apply_status_update_replaces_status_and_appends_message() {
        let mut task = Task {
            id: "t1".to_string(),
            context_id: "ctx1".to_string(),
            kind: "task".to_string(),
            status: TaskStatus {
                state: TaskState::Submitted,
                message: None,
                timestamp: None,
            },
            artifacts: None,
            history: None,
            metadata: None,
        };

        let event = StreamResponse::StatusUpdate(TaskStatusUpdateEvent {
            task_id: "t1".to_string(),
            context_id: "ctx1".to_string(),
            kind: "status-update".to_string(),
            status: TaskStatus {
                state: TaskState::Working,
                message: Some(Message::agent("m1", "working on it")),
                timestamp: None,
            },
            r#final: false,
            metadata: None,
        });

        apply_event_to_task(&mut task, &event);

        assert_eq!(task.status.state, TaskState::Working);
        assert_eq!(task.history.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn apply_artifact_update_appends_history_message() {
        let mut task = Task {
            id: "t1".to_string(),
            context_id: "ctx1".to_string(),
            kind: "task".to_string(),
            status: TaskStatus {
                state: TaskState::Working,
                message: None,
                timestamp: None,
            },
            artifacts: None,
            history: None,
            metadata: None,
        };

        let event = StreamResponse::ArtifactUpdate(TaskArtifactUpdateEvent {
            task_id: "t1".to_string(),
            context_id: "ctx1".to_string(),
            kind: "artifact-update".to_string(),
            artifact: Artifact {
                artifact_id: "a1".to_string(),
                name: None,
                description: None,
                parts: vec![Part::text("result")],
                metadata: None,
                extensions: None,
            },
            append: None,
            last_chunk: None,
            metadata: None,
        });

        apply_event_to_task(&mut task, &event);

        let history = task.history.as_ref().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, Role::Agent);
    }

    #[tokio::test]
    async fn task_saving_sink_persists_and_forwards() {
        let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
        let buffer = BufferSink::new();
        let sink = TaskSavingSink::new(buffer, Arc::clone(&store), "t1", "ctx1");

        let event = StreamResponse::StatusUpdate(TaskStatusUpdateEvent {
            task_id: "t1".to_string(),
            context_id: "ctx1".to_string(),
            kind: "status-update".to_string(),
            status: TaskStatus {
                state: TaskState::Working,
                message: None,
                timestamp: None,
            },
            r#final: false,
            metadata: None,
        });

        sink.enqueue(event).await.unwrap();

        let saved = store.get("t1").await.unwrap().unwrap();
        assert_eq!(saved.status.state, TaskState::Working);
        assert_eq!(sink.inner.events().await.len(), 1);
    }
}
