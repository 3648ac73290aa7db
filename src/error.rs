//! Bridge error types.
//!
//! One `thiserror`-derived enum covers every failure mode the bridge raises:
//! the MCP tool-server connection failures and runner failures from the
//! classification table, the general validation errors the collaborators
//! borrowed from the protocol SDK (invalid params, internal error), and the
//! transport-style variants used by the task-store REST client.
//!
//! `code()` maps each variant to the spec's string error code so callers can
//! stamp it into event metadata without matching on the enum directly.

/// Unified error type for the bridge.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BridgeError {
    // -- Tool registry / MCP connection errors --
    /// A tool server connection failed for a reason other than DNS or refusal.
    #[error("MCP connection error: {0}")]
    McpConnectionError(String),

    /// DNS resolution for a tool server's host failed.
    #[error("MCP DNS error: {0}")]
    McpDnsError(String),

    /// A tool server actively refused the connection.
    #[error("MCP connection refused: {0}")]
    McpConnectionRefused(String),

    // -- Runner adapter errors --
    /// The underlying agent runner raised an error while producing a step.
    #[error("Runner error: {0}")]
    RunnerError(String),

    /// The underlying agent runner did not produce a step within the deadline.
    #[error("Runner timeout: {0}")]
    RunnerTimeout(String),

    /// The underlying agent runner failed to initialize.
    #[error("Runner init error: {0}")]
    RunnerInitError(String),

    /// A run was requested without a resolvable model.
    #[error("No model configured: {0}")]
    NoModel(String),

    /// A run was requested without an inbound message.
    #[error("No message provided: {0}")]
    NoMessage(String),

    /// A runner part could not be converted to (or from) its protocol shape.
    #[error("Conversion error: {0}")]
    ConversionError(String),

    // -- General validation errors (shared with the protocol SDK layer) --
    /// Request or argument validation error.
    #[error("Invalid params: {message}")]
    InvalidParams {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// The requested task was not found.
    #[error("Task not found: {message}")]
    TaskNotFound {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Unclassified internal error.
    #[error("Internal error: {message}")]
    InternalError {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    // -- Transport-side errors (task-store REST client, tool registry HTTP/SSE) --
    /// Transport-level error (connection failed, request failed, etc.).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request or stream timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP error with status code and response body.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Invalid JSON received from remote (parse or deserialization failure).
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Catch-all for errors that don't fit other categories.
    #[error("{0}")]
    Other(String),
}

/// Convenience result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    /// Create an `InvalidParams` with a message and no data.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
            data: None,
        }
    }

    /// Create a `TaskNotFound` with a message and no data.
    pub fn task_not_found(message: impl Into<String>) -> Self {
        Self::TaskNotFound {
            message: message.into(),
            data: None,
        }
    }

    /// Create an `InternalError` with a message and no data.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            data: None,
        }
    }

    /// Returns the spec error-code string for this variant, suitable for
    /// stamping into `status-update`/`artifact-update` metadata.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::McpConnectionError(_) => "MCP_CONNECTION_ERROR",
            BridgeError::McpDnsError(_) => "MCP_DNS_ERROR",
            BridgeError::McpConnectionRefused(_) => "MCP_CONNECTION_REFUSED",
            BridgeError::RunnerError(_) => "RUNNER_ERROR",
            BridgeError::RunnerTimeout(_) => "RUNNER_TIMEOUT",
            BridgeError::RunnerInitError(_) => "RUNNER_INIT_ERROR",
            BridgeError::NoModel(_) => "NO_MODEL",
            BridgeError::NoMessage(_) => "NO_MESSAGE",
            BridgeError::ConversionError(_) => "CONVERSION_ERROR",
            BridgeError::InvalidParams { .. } => "INVALID_PARAMS",
            BridgeError::TaskNotFound { .. } => "TASK_NOT_FOUND",
            BridgeError::InternalError { .. } => "INTERNAL_ERROR",
            BridgeError::Transport(_) => "TRANSPORT_ERROR",
            BridgeError::Timeout(_) => "TIMEOUT",
            BridgeError::Http { .. } => "HTTP_ERROR",
            BridgeError::InvalidJson(_) => "INVALID_JSON",
            BridgeError::Other(_) => "ERROR",
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::InvalidJson(err.to_string())
    }
}
