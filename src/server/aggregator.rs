//! Task aggregator — reduces a stream of status-update events into a final
//! task snapshot for non-streaming callers.
//!
//! State-precedence lattice (higher wins): `failed` > `auth_required` >
//! `input_required` > `working`. While the reduction is still `working`,
//! each event's parts are appended (not replaced) into a combined message;
//! once a higher-precedence state is observed, the aggregator snapshots
//! that event's message as-is.

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::types::{Message, Part, Role, TaskState, TaskStatus, TaskStatusUpdateEvent};

fn precedence(state: TaskState) -> u8 {
    match state {
        TaskState::Failed => 3,
        TaskState::AuthRequired => 2,
        TaskState::InputRequired => 1,
        _ => 0,
    }
}

struct AggregatorState {
    state: TaskState,
    message: Option<Message>,
    timestamp: Option<String>,
    accumulated_parts: Vec<Part>,
}

/// Reduces a sequence of `status-update` events into one logical snapshot,
/// while also filtering the same sequence for a streaming consumer.
///
/// [`process`](Self::process) serves both purposes at once: it folds the
/// event into the internal reduction AND returns a copy with its
/// externally-visible state downgraded to `working` whenever the event
/// isn't the stream's final one (per the upstream `final` flag) — this
/// prevents premature terminal signaling on clients that infer completion
/// from `state` rather than `final`. [`final_status`](Self::final_status)
/// exposes the true reduced state once the stream has ended.
pub struct TaskAggregator {
    task_id: String,
    context_id: String,
    inner: Mutex<AggregatorState>,
}

impl TaskAggregator {
    /// Create an aggregator starting from the `working` state with no
    /// accumulated parts.
    pub fn new(task_id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            context_id: context_id.into(),
            inner: Mutex::new(AggregatorState {
                state: TaskState::Working,
                message: None,
                timestamp: None,
                accumulated_parts: Vec::new(),
            }),
        }
    }

    /// Fold `update` into the reduction and return a copy suitable for
    /// forwarding to a streaming consumer, with its state downgraded to
    /// `working` unless `update.final` is set.
    pub async fn process(&self, update: &TaskStatusUpdateEvent) -> TaskStatusUpdateEvent {
        self.reduce(update).await;

        let mut outgoing = update.clone();
        if !update.r#final {
            outgoing.status.state = TaskState::Working;
        }
        outgoing
    }

    /// The final reduced status, reflecting the true precedence-lattice
    /// winner across the whole processed sequence.
    pub async fn final_status(&self) -> TaskStatus {
        let inner = self.inner.lock().await;
        TaskStatus {
            state: inner.state,
            message: inner.message.clone(),
            timestamp: inner.timestamp.clone(),
        }
    }

    async fn reduce(&self, update: &TaskStatusUpdateEvent) {
        let mut inner = self.inner.lock().await;
        let incoming = update.status.state;

        if precedence(incoming) > 0 {
            if precedence(incoming) >= precedence(inner.state) {
                inner.state = incoming;
                inner.message = update.status.message.clone();
                inner.timestamp = update.status.timestamp.clone();
            }
            return;
        }

        if inner.state != TaskState::Working {
            // A terminal/lattice state has already been observed; stop
            // accumulating plain working updates.
            return;
        }

        if let Some(ref message) = update.status.message {
            inner.accumulated_parts.extend(message.parts.clone());
        }
        inner.timestamp = update.status.timestamp.clone();
        inner.message = Some(Message {
            message_id: Uuid::new_v4().to_string(),
            role: Role::Agent,
            kind: "message".to_string(),
            parts: inner.accumulated_parts.clone(),
            context_id: Some(self.context_id.clone()),
            task_id: Some(self.task_id.clone()),
            metadata: None,
            extensions: None,
            reference_task_ids: None,
        });
    }
}
