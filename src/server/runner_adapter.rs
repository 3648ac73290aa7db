//! Runner adapter — drives the underlying agent runner's lazy event sequence
//! and forwards each converted event onto an [`EventQueue`], closing the
//! queue when the run ends.
//!
//! The runner itself is behind two seams: [`RunnerFactory`] lazily builds
//! one from a (model, tools, session) triple on first use, and the running
//! instance is polled through [`AgentRunner::next_step`]. [`SessionService`]
//! is the optional collaborator the adapter tells about non-partial events
//! so a session transcript stays in sync with what the client actually saw.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::convert::{convert_event, message_from_loose, runner_message_from_protocol};
use crate::convert::message::RunnerMessage;
use crate::error::BridgeResult;
use crate::runner::{ConversionContext, RunnerEventError, RunnerStep, ToolRegistryEntry};
use crate::types::Message;

use super::event_queue::EventQueue;

/// A running agent runner instance, polled one step at a time.
#[async_trait]
pub trait AgentRunner: Send {
    /// Pull the next step of the run, or `None` once the sequence is
    /// exhausted.
    async fn next_step(&mut self) -> Option<RunnerStep>;
}

/// Lazily builds a running [`AgentRunner`] from the (model, tools, session)
/// triple once a run actually needs one.
#[async_trait]
pub trait RunnerFactory: Send + Sync {
    /// Initialize a runner for one run.
    async fn init(
        &self,
        model: &str,
        tools: &[ToolRegistryEntry],
        message: RunnerMessage,
        session_id: &str,
    ) -> BridgeResult<Box<dyn AgentRunner>>;
}

/// The runner's session transcript, kept in sync as the run progresses.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Append a non-partial (or tool-bearing) event to the session.
    async fn append_event(&self, session_id: &str, event: &crate::runner::RunnerEvent) -> BridgeResult<()>;
}

/// Arguments for one run.
pub struct RunArgs {
    /// The user this run executes on behalf of.
    pub user_id: String,
    /// The runner session this run is attached to.
    pub session_id: String,
    /// The model to run, if configured.
    pub model: Option<String>,
    /// The inbound message, structured.
    pub message: Option<Message>,
    /// The inbound message, as a loose JSON shape — used when `message` is
    /// absent.
    pub new_message: Option<serde_json::Value>,
    /// Whether the caller requested incremental streaming.
    pub streaming: bool,
    /// The name of the agent application driving this run.
    pub app_name: String,
    /// A hard deadline for the whole run.
    pub deadline: Option<Instant>,
    /// Fires `true` when the caller wants to abandon the run.
    pub cancel: Option<watch::Receiver<bool>>,
}

const SESSION_APPEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Drives one run of the underlying agent runner and forwards its output.
pub struct RunnerAdapter<F: RunnerFactory> {
    factory: F,
    tools: Vec<ToolRegistryEntry>,
}

impl<F: RunnerFactory> RunnerAdapter<F> {
    /// Build an adapter around `factory`, with `tools` exposed to every run.
    pub fn new(factory: F, tools: Vec<ToolRegistryEntry>) -> Self {
        Self { factory, tools }
    }

    /// Run the agent to completion, forwarding every converted event onto
    /// `queue` and closing it when the run ends — successfully, on error,
    /// or on early exit (missing message/model/runner-init failure).
    pub async fn run(
        &self,
        ctx: &ConversionContext,
        mut args: RunArgs,
        session_service: Option<Arc<dyn SessionService>>,
        queue: &EventQueue,
    ) -> BridgeResult<()> {
        let runner_message = match args.message.take() {
            Some(message) => runner_message_from_protocol(&message),
            None => match args.new_message.take() {
                Some(value) => message_from_loose(&value),
                None => {
                    emit_error(queue, ctx, "NO_MESSAGE", None).await?;
                    queue.close().await;
                    return Ok(());
                }
            },
        };

        let Some(model) = args.model.clone() else {
            emit_error(queue, ctx, "NO_MODEL", None).await?;
            queue.close().await;
            return Ok(());
        };

        let mut runner = match self
            .factory
            .init(&model, &self.tools, runner_message, &args.session_id)
            .await
        {
            Ok(runner) => runner,
            Err(err) => {
                emit_error(queue, ctx, "RUNNER_INIT_ERROR", Some(&err.to_string())).await?;
                queue.close().await;
                return Ok(());
            }
        };

        let run_started_at = Instant::now();
        let mut last_event_at = run_started_at;

        loop {
            let outcome = next_with_interrupts(runner.as_mut(), args.deadline, &mut args.cancel).await;

            let step = match outcome {
                StepOutcome::Step(Some(step)) => step,
                StepOutcome::Step(None) => break,
                StepOutcome::Cancelled => {
                    emit_error(queue, ctx, "RUNNER_TIMEOUT", Some("the run was cancelled")).await?;
                    break;
                }
                StepOutcome::DeadlineExceeded => {
                    emit_error(queue, ctx, "RUNNER_TIMEOUT", Some("the run exceeded its deadline")).await?;
                    break;
                }
            };

            if step.event.is_none() {
                if let Some(error) = &step.error {
                    emit_classified_error(queue, ctx, error).await?;
                }
                continue;
            }

            let now = Instant::now();
            debug!(
                elapsed_ms = now.duration_since(last_event_at).as_millis() as u64,
                cumulative_ms = now.duration_since(run_started_at).as_millis() as u64,
                "runner step received"
            );
            last_event_at = now;

            if let Some(error) = &step.error {
                emit_classified_error(queue, ctx, error).await?;
                continue;
            }

            let event = step.event.as_ref().expect("checked above");
            let should_append = !event.partial || event.has_tool_content();
            if should_append {
                if let Some(service) = &session_service {
                    match tokio::time::timeout(SESSION_APPEND_TIMEOUT, service.append_event(&args.session_id, event)).await {
                        Ok(Ok(())) => {}
                        Ok(Err(err)) => warn!(error = %err, "session service append_event failed"),
                        Err(_) => warn!("session service append_event timed out"),
                    }
                }
            }

            for response in convert_event(&step, ctx) {
                queue.enqueue_event(response).await?;
            }
        }

        queue.close().await;
        Ok(())
    }
}

enum StepOutcome {
    Step(Option<RunnerStep>),
    Cancelled,
    DeadlineExceeded,
}

async fn next_with_interrupts(
    runner: &mut dyn AgentRunner,
    deadline: Option<Instant>,
    cancel: &mut Option<watch::Receiver<bool>>,
) -> StepOutcome {
    let sleep = async {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from(deadline)).await,
            None => futures::future::pending::<()>().await,
        }
    };

    let cancelled = async {
        match cancel {
            Some(rx) => loop {
                if *rx.borrow() {
                    return;
                }
                if rx.changed().await.is_err() {
                    futures::future::pending::<()>().await;
                }
            },
            None => futures::future::pending::<()>().await,
        }
    };

    tokio::select! {
        step = runner.next_step() => StepOutcome::Step(step),
        _ = sleep => StepOutcome::DeadlineExceeded,
        _ = cancelled => StepOutcome::Cancelled,
    }
}

async fn emit_error(queue: &EventQueue, ctx: &ConversionContext, code: &str, message: Option<&str>) -> BridgeResult<()> {
    let step = RunnerStep::error(RunnerEventError {
        error_code: code.to_string(),
        error_message: message.map(String::from),
    });
    for response in convert_event(&step, ctx) {
        queue.enqueue_event(response).await?;
    }
    Ok(())
}

async fn emit_classified_error(queue: &EventQueue, ctx: &ConversionContext, error: &RunnerEventError) -> BridgeResult<()> {
    let code = classify_error_text(&error.error_code);
    let step = RunnerStep::error(RunnerEventError {
        error_code: code.to_string(),
        error_message: error.error_message.clone(),
    });
    for response in convert_event(&step, ctx) {
        queue.enqueue_event(response).await?;
    }
    Ok(())
}

const MCP_CONNECTION_PATTERNS: &[&str] = &[
    "failed to extract tools",
    "failed to get mcp session",
    "failed to init mcp session",
    "connection failed",
    "context deadline exceeded",
    "timeout exceeded",
];
const DNS_PATTERNS: &[&str] = &["name or service not known", "no such host", "dns"];
const REFUSED_PATTERNS: &[&str] = &["connection refused", "econnrefused"];

/// Classifies a raw runner error string by case-insensitive substring match,
/// first matching pattern group wins.
fn classify_error_text(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    if MCP_CONNECTION_PATTERNS.iter().any(|p| lower.contains(p)) {
        "MCP_CONNECTION_ERROR"
    } else if DNS_PATTERNS.iter().any(|p| lower.contains(p)) {
        "MCP_DNS_ERROR"
    } else if REFUSED_PATTERNS.iter().any(|p| lower.contains(p)) {
        "MCP_CONNECTION_REFUSED"
    } else {
        "RUNNER_ERROR"
    }
}
