//! Unified error types.

use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ToolError
// ---------------------------------------------------------------------------

/// Errors arising from tool execution.
#[derive(Debug)]
pub enum ToolError {
    /// The model supplied arguments the tool couldn't parse.
    InvalidArguments(String),
    /// The tool ran but encountered a failure.
    ExecutionFailed(String),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArguments(msg) => write!(f, "invalid arguments: {msg}"),
            Self::ExecutionFailed(msg) => write!(f, "execution failed: {msg}"),
        }
    }
}

impl std::error::Error for ToolError {}

impl From<FetchError> for ToolError {
    fn from(e: FetchError) -> Self {
        Self::ExecutionFailed(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors from the model HTTP API layer.
#[derive(Debug)]
pub enum ApiError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the API.
    Status {
        code: u16,
        body: String,
        retry_after_secs: Option<u64>,
    },
    /// Response parsed but did not contain a usable choice.
    InvalidResponse(String),
}

impl ApiError {
    pub fn status(code: u16, body: String, retry_after_secs: Option<u64>) -> Self {
        Self::Status {
            code,
            body,
            retry_after_secs,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::Status {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }

    /// True when the connection to the server failed or dropped, as opposed
    /// to the server answering with something unusable.
    pub fn is_connection_failure(&self) -> bool {
        let Self::Http(inner) = self else {
            return false;
        };
        if inner.is_connect() {
            return true;
        }
        if inner.is_timeout() || inner.is_status() || inner.is_decode() || inner.is_builder() {
            return false;
        }
        inner.is_request() || inner.is_body() || has_io_source(inner)
    }
}

fn has_io_source(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return true;
        }
        source = cause.source();
    }
    false
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status { code, body, .. } => write!(f, "status {code}: {body}"),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// FetchError
// ---------------------------------------------------------------------------

/// Errors from documentation page retrieval.
#[derive(Debug)]
pub enum FetchError {
    Http(reqwest::Error),
    /// The server answered with a non-success status.
    Status { url: String, code: u16 },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status { url, code } => write!(f, "failed to fetch {url}: {code}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Failures at the agent-session boundary.
///
/// Variants are tagged by recoverability: [`SessionError::is_recoverable`]
/// decides whether the orchestrator reconnects or reports the failure inline.
#[derive(Debug)]
pub enum SessionError {
    /// The session (or its backend) was already destroyed.
    Disposed,
    /// The connection to the agent service failed.
    Transport(String),
    /// The turn did not finish within its deadline.
    Timeout(Duration),
    /// A send was issued while another was still outstanding.
    Busy,
    /// The session could not be created.
    Init(String),
    /// Any other failure, scoped to the current turn.
    Turn(String),
}

impl SessionError {
    /// True when a fresh session may fix the problem.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Disposed | Self::Transport(_))
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disposed => write!(f, "session was disposed"),
            Self::Transport(msg) => write!(f, "connection error: {msg}"),
            Self::Timeout(limit) => {
                write!(f, "timed out after {}s waiting for the agent", limit.as_secs())
            }
            Self::Busy => write!(f, "a request is already in flight"),
            Self::Init(msg) => write!(f, "session initialization failed: {msg}"),
            Self::Turn(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ApiError> for SessionError {
    fn from(e: ApiError) -> Self {
        if e.is_connection_failure() {
            Self::Transport(e.to_string())
        } else {
            Self::Turn(e.to_string())
        }
    }
}
