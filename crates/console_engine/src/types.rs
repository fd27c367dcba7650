use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_ok() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollRequest {
    pub log_from: u64,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PollResponse {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub log_guid: String,
    #[serde(default)]
    pub log_version: u64,
    #[serde(default)]
    pub logs: Vec<WireLogEntry>,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub contexts: Vec<WireContext>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireLogEntry {
    pub no: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub kvps: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WireContext {
    pub id: String,
    #[serde(default)]
    pub no: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRequest {
    pub text: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PauseRequest {
    pub paused: bool,
    pub context: String,
}

/// Body of `/reset` and `/remove`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextRequest {
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteTemplateRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseTemplateRequest {
    pub template_id: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemplateRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub navigation_goal: String,
    #[serde(default)]
    pub data_extraction_goal: String,
    #[serde(default)]
    pub advanced_settings: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemplatesResponse {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default)]
    pub templates: Vec<TemplateRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Application-level outcome carried by a successful HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Ack {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl Default for Ack {
    fn default() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Encode,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Encode => write!(f, "request encoding failed"),
            FailureKind::Decode => write!(f, "response decoding failed"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Work the engine runs against the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCommand {
    Poll { log_from: u64, context: String },
    SendMessage { text: String, context: String },
    Pause { paused: bool, context: String },
    Reset { context: String },
    Remove { context: String },
    LoadTemplates,
    SaveTemplate(TemplateRecord),
    DeleteTemplate { id: String },
    UseTemplate { template_id: String, context: String },
}

/// Calls answered with a plain [`Ack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckRequest {
    SendMessage,
    Pause,
    Reset,
    Remove,
    SaveTemplate,
    DeleteTemplate,
    UseTemplate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Polled {
        context: String,
        result: Result<PollResponse, TransportError>,
    },
    TemplatesLoaded(Result<TemplatesResponse, TransportError>),
    Acknowledged {
        request: AckRequest,
        result: Result<Ack, TransportError>,
    },
}
