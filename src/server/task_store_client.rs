//! Remote task store client — persists tasks to a remote REST service
//! instead of the in-process [`super::task_store::InMemoryTaskStore`].
//!
//! Every response is wrapped in an `{error, data, message}` envelope;
//! [`unwrap_envelope`] is the single place that peels it off. Saves also
//! notify any in-process waiters blocked in [`RemoteTaskStoreClient::wait_for_save`]
//! — the mechanism [`super::hitl::handle_approval_interrupt`] uses to avoid
//! returning before its status update is durably visible to a polling client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::{oneshot, RwLock};
use tracing::debug;

use crate::error::{BridgeError, BridgeResult};
use crate::types::Task;

use super::hitl::TaskSaveWaiter;
use super::task_store::{TaskListParams, TaskListResponse, TaskStore};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the remote task store REST client.
#[derive(Debug, Clone)]
pub struct TaskStoreClientConfig {
    /// Base URL of the remote task store service (no trailing `/api/tasks`).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Headers injected on every request (e.g. service auth).
    pub headers: HashMap<String, String>,
}

impl TaskStoreClientConfig {
    /// Build a config pointed at `base_url` with the client's defaults.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            headers: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

fn unwrap_envelope<T>(envelope: Envelope<T>) -> BridgeResult<T> {
    if envelope.error {
        return Err(BridgeError::Other(
            envelope.message.unwrap_or_else(|| "task store returned an error".to_string()),
        ));
    }
    envelope
        .data
        .ok_or_else(|| BridgeError::InvalidJson("task store response carried no data".to_string()))
}

/// REST client for a remote task store, implementing both the bridge's
/// [`TaskStore`] trait and the [`TaskSaveWaiter`] trait HITL interrupts use
/// to avoid a save/read race.
pub struct RemoteTaskStoreClient {
    client: reqwest::Client,
    base_url: String,
    waiters: RwLock<HashMap<String, Vec<oneshot::Sender<()>>>>,
}

impl RemoteTaskStoreClient {
    /// Build a client from `config`.
    pub fn new(config: TaskStoreClientConfig) -> BridgeResult<Self> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);

        if !config.headers.is_empty() {
            let mut default_headers = HeaderMap::new();
            for (key, value) in &config.headers {
                if let (Ok(name), Ok(val)) =
                    (HeaderName::from_bytes(key.as_bytes()), HeaderValue::from_str(value))
                {
                    default_headers.insert(name, val);
                }
            }
            builder = builder.default_headers(default_headers);
        }

        let client = builder
            .build()
            .map_err(|e| BridgeError::Transport(format!("failed to build task store HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            waiters: RwLock::new(HashMap::new()),
        })
    }

    fn tasks_url(&self) -> String {
        format!("{}/api/tasks", self.base_url)
    }

    fn task_url(&self, task_id: &str) -> String {
        format!("{}/api/tasks/{}", self.base_url, task_id)
    }

    /// Strip `kagent_adk_partial` streaming fragments out of a task's
    /// history before persisting — only materialized turns are worth
    /// keeping in the remote store.
    fn history_for_save(task: &Task) -> Option<Vec<crate::types::Message>> {
        task.history.as_ref().map(|history| {
            history
                .iter()
                .filter(|message| {
                    !message
                        .metadata
                        .as_ref()
                        .and_then(|m| m.get("kagent_adk_partial"))
                        .and_then(Value::as_bool)
                        .unwrap_or(false)
                })
                .cloned()
                .collect()
        })
    }

    async fn notify_waiters(&self, task_id: &str) {
        let mut waiters = self.waiters.write().await;
        if let Some(senders) = waiters.remove(task_id) {
            for sender in senders {
                let _ = sender.send(());
            }
        }
    }
}

#[async_trait]
impl TaskStore for RemoteTaskStoreClient {
    async fn save(&self, mut task: Task) -> BridgeResult<()> {
        task.history = Self::history_for_save(&task);

        let response = self
            .client
            .post(self.tasks_url())
            .json(&task)
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Http { status: status.as_u16(), body });
        }

        debug!(task_id = %task.id, "task saved to remote store");
        self.notify_waiters(&task.id).await;
        Ok(())
    }

    async fn get(&self, task_id: &str) -> BridgeResult<Option<Task>> {
        let response = self
            .client
            .get(self.task_url(task_id))
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Http { status: status.as_u16(), body });
        }

        let envelope: Envelope<Task> = response.json().await.map_err(|e| BridgeError::InvalidJson(e.to_string()))?;
        unwrap_envelope(envelope).map(Some)
    }

    async fn delete(&self, task_id: &str) -> BridgeResult<()> {
        let response = self
            .client
            .delete(self.task_url(task_id))
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND || status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(BridgeError::Http { status: status.as_u16(), body })
    }

    async fn list(&self, params: &TaskListParams) -> BridgeResult<TaskListResponse> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(context_id) = &params.context_id {
            query.push(("contextId", context_id.clone()));
        }
        if let Some(page_size) = params.page_size {
            query.push(("pageSize", page_size.to_string()));
        }
        if let Some(page_token) = &params.page_token {
            query.push(("pageToken", page_token.clone()));
        }

        let response = self
            .client
            .get(self.tasks_url())
            .query(&query)
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Http { status: status.as_u16(), body });
        }

        #[derive(Deserialize)]
        struct ListData {
            tasks: Vec<Task>,
            #[serde(default, rename = "nextPageToken")]
            next_page_token: Option<String>,
        }

        let envelope: Envelope<ListData> = response.json().await.map_err(|e| BridgeError::InvalidJson(e.to_string()))?;
        let data = unwrap_envelope(envelope)?;
        Ok(TaskListResponse { tasks: data.tasks, next_page_token: data.next_page_token })
    }
}

#[async_trait]
impl TaskSaveWaiter for RemoteTaskStoreClient {
    async fn wait_for_save(&self, task_id: &str, timeout: Duration) -> BridgeResult<()> {
        let (tx, rx) = oneshot::channel();
        self.waiters.write().await.entry(task_id.to_string()).or_default().push(tx);

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(BridgeError::Other("save waiter channel closed unexpectedly".to_string())),
            Err(_) => {
                let mut waiters = self.waiters.write().await;
                if let Some(remaining) = waiters.get_mut(task_id) {
                    remaining.retain(|sender| !sender.is_closed());
                    if remaining.is_empty() {
                        waiters.remove(task_id);
                    }
                }
                Err(BridgeError::Timeout(format!("no save observed for task {task_id} within {timeout:?}")))
            }
        }
    }
}

fn map_transport_error(err: &reqwest::Error) -> BridgeError {
    if err.is_timeout() {
        BridgeError::Timeout(err.to_string())
    } else if err.is_connect() {
        BridgeError::Transport(format!("connection failed: {err}"))
    } else {
        BridgeError::Transport(err.to_string())
    }
}

/// Convenience wrapper for sharing a client across collaborators that each
/// need a [`TaskStore`] and a [`TaskSaveWaiter`].
pub fn shared(client: RemoteTaskStoreClient) -> Arc<RemoteTaskStoreClient> {
    Arc::new(client)
}
