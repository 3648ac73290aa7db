//! Tool registry — discovers tool schemas from remote MCP-style tool
//! servers and exposes them to the runner's function-calling machinery.
//!
//! Reachable over either a direct streamable-HTTP transport or
//! server-sent events; both paths converge on the same
//! [`ToolRegistryEntry`] shape recorded in [`crate::runner`].

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::warn;

use crate::error::{BridgeError, BridgeResult};
use crate::runner::{ToolRegistryEntry, ToolServerType};

/// The transport a tool server is reachable over.
///
/// An alias for [`ToolServerType`] — the registry and the runner's data
/// model agree on one vocabulary for this.
pub type TransportKind = ToolServerType;

const MIN_OPERATION_TIMEOUT: Duration = Duration::from_secs(1);
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const INIT_TIMEOUT_CAP: Duration = Duration::from_secs(10);

/// Configuration for one remote tool server.
#[derive(Debug, Clone)]
pub struct ToolServerConfig {
    /// Base URL of the tool server.
    pub url: String,
    /// Transport the server is reachable over.
    pub server_type: TransportKind,
    /// Operation timeout; clamped to `[1s, unset default 30m]`.
    pub timeout: Option<Duration>,
    /// Extra read timeout applied on top of `timeout` for SSE connections.
    pub sse_read_timeout: Option<Duration>,
    /// Skip TLS certificate verification entirely. Logged as a warning when
    /// enabled — never silent.
    pub tls_disable_verify: bool,
    /// PEM-encoded custom CA certificate to trust, in addition to (or
    /// instead of) the system root store.
    pub tls_ca_cert: Option<Vec<u8>>,
    /// Whether to keep trusting the system root store alongside a custom CA.
    pub tls_ca_merge_system: bool,
    /// Headers injected on every request to this server.
    pub headers: HashMap<String, String>,
    /// If set, only tools named here are registered.
    pub allow_list: Option<Vec<String>>,
}

impl Default for ToolServerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            server_type: TransportKind::HttpStreamable,
            timeout: None,
            sse_read_timeout: None,
            tls_disable_verify: false,
            tls_ca_cert: None,
            tls_ca_merge_system: true,
            headers: HashMap::new(),
            allow_list: None,
        }
    }
}

/// A tool's declaration, in the shape the runner's function-calling
/// machinery expects.
#[derive(Debug, Clone)]
pub struct ToolDeclaration {
    /// The tool's name.
    pub name: String,
    /// A human/model-readable description.
    pub description: String,
    /// The tool's JSON Schema input shape.
    pub parameters: Value,
}

#[derive(Debug, Deserialize)]
struct DiscoveredTool {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, alias = "inputSchema")]
    input_schema: Value,
}

#[derive(Debug, Deserialize)]
struct ListToolsResponse {
    #[serde(default)]
    tools: Vec<DiscoveredTool>,
}

/// Discovers and holds tool schemas gathered from registered tool servers.
#[derive(Default)]
pub struct ToolRegistry {
    entries: RwLock<Vec<ToolRegistryEntry>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect to a tool server, discover its tools, and record them.
    pub async fn register(&self, config: ToolServerConfig) -> BridgeResult<()> {
        let operation_timeout = operation_timeout(&config);
        let http_timeout = http_timeout(&config, operation_timeout);
        let client = build_client(&config, http_timeout)?;
        let init_timeout = operation_timeout.min(INIT_TIMEOUT_CAP);

        let mut tools = match config.server_type {
            TransportKind::HttpStreamable => list_tools_http(&client, &config.url, init_timeout).await?,
            TransportKind::Sse => list_tools_sse(&client, &config.url, init_timeout).await?,
        };

        if let Some(allow_list) = &config.allow_list {
            tools.retain(|tool| allow_list.iter().any(|name| name == &tool.name));
        }

        if tools.iter().any(|tool| !has_full_schema(&tool.input_schema)) {
            if let Ok(direct) = list_tools_http(&client, &config.url, init_timeout).await {
                for tool in tools.iter_mut() {
                    if has_full_schema(&tool.input_schema) {
                        continue;
                    }
                    if let Some(richer) = direct.iter().find(|candidate| candidate.name == tool.name) {
                        tool.input_schema = richer.input_schema.clone();
                        tool.description = richer.description.clone();
                    }
                }
            }
        }

        let mut entries = self.entries.write().await;
        for tool in tools {
            entries.push(ToolRegistryEntry {
                name: tool.name,
                description: tool.description,
                input_schema: tool.input_schema,
                server_url: config.url.clone(),
                server_type: config.server_type,
                headers: config.headers.clone(),
            });
        }

        Ok(())
    }

    /// The tool declarations gathered so far, in registration order.
    pub async fn declarations(&self) -> Vec<ToolDeclaration> {
        self.entries
            .read()
            .await
            .iter()
            .map(|entry| ToolDeclaration {
                name: entry.name.clone(),
                description: entry.description.clone(),
                parameters: entry.input_schema.clone(),
            })
            .collect()
    }
}

fn operation_timeout(config: &ToolServerConfig) -> Duration {
    config
        .timeout
        .map(|t| t.max(MIN_OPERATION_TIMEOUT))
        .unwrap_or(DEFAULT_OPERATION_TIMEOUT)
}

fn http_timeout(config: &ToolServerConfig, operation_timeout: Duration) -> Duration {
    match config.server_type {
        TransportKind::Sse => operation_timeout.max(config.sse_read_timeout.unwrap_or_default()),
        TransportKind::HttpStreamable => operation_timeout,
    }
}

fn build_client(config: &ToolServerConfig, http_timeout: Duration) -> BridgeResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(http_timeout);

    if config.tls_disable_verify {
        warn!(url = %config.url, "disabling TLS certificate verification for tool server");
        builder = builder.danger_accept_invalid_certs(true);
    } else if let Some(ca_pem) = &config.tls_ca_cert {
        let cert = reqwest::Certificate::from_pem(ca_pem)
            .map_err(|e| BridgeError::Transport(format!("invalid tool server CA certificate: {e}")))?;
        builder = builder
            .add_root_certificate(cert)
            .tls_built_in_root_certs(config.tls_ca_merge_system);
    }

    if !config.headers.is_empty() {
        let mut default_headers = HeaderMap::new();
        for (key, value) in &config.headers {
            if let (Ok(name), Ok(val)) = (HeaderName::from_bytes(key.as_bytes()), HeaderValue::from_str(value)) {
                default_headers.insert(name, val);
            }
        }
        builder = builder.default_headers(default_headers);
    }

    builder
        .build()
        .map_err(|e| BridgeError::Transport(format!("failed to build tool server HTTP client: {e}")))
}

fn has_full_schema(schema: &Value) -> bool {
    schema
        .get("properties")
        .and_then(|properties| properties.as_object())
        .is_some_and(|properties| !properties.is_empty())
}

async fn list_tools_http(client: &reqwest::Client, base_url: &str, timeout: Duration) -> BridgeResult<Vec<DiscoveredTool>> {
    let url = format!("{}/tools", base_url.trim_end_matches('/'));
    let response = tokio::time::timeout(timeout, client.get(&url).send())
        .await
        .map_err(|_| BridgeError::Timeout(format!("tool discovery at {url} timed out")))?
        .map_err(|e| BridgeError::Transport(format!("failed to reach tool server {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BridgeError::Http { status: status.as_u16(), body });
    }

    let parsed: ListToolsResponse = response
        .json()
        .await
        .map_err(|e| BridgeError::InvalidJson(format!("invalid tool list from {url}: {e}")))?;

    Ok(parsed.tools)
}

/// Discovers tools over SSE by reading the first event off `{base_url}/tools/subscribe`.
///
/// Falls back to a direct HTTP list-tools call if the SSE handshake fails —
/// some tool servers advertise SSE but only actually stream updates after
/// an initial synchronous listing.
async fn list_tools_sse(client: &reqwest::Client, base_url: &str, timeout: Duration) -> BridgeResult<Vec<DiscoveredTool>> {
    use futures::StreamExt;
    use reqwest_eventsource::{Event, EventSource};

    let url = format!("{}/tools/subscribe", base_url.trim_end_matches('/'));
    let request = client.get(&url);

    let mut source = match EventSource::new(request) {
        Ok(source) => source,
        Err(_) => return list_tools_http(client, base_url, timeout).await,
    };

    let result = tokio::time::timeout(timeout, async {
        while let Some(event) = source.next().await {
            match event {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => {
                    if let Ok(parsed) = serde_json::from_str::<ListToolsResponse>(&message.data) {
                        return Some(parsed.tools);
                    }
                }
                Err(_) => return None,
            }
        }
        None
    })
    .await;

    source.close();

    match result {
        Ok(Some(tools)) => Ok(tools),
        _ => list_tools_http(client, base_url, timeout).await,
    }
}
