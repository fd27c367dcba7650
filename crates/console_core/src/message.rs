use serde_json::{Map, Value};

/// Kind of a transcript message, as reported in the `type` field of a log
/// entry. Unknown kinds are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageKind {
    User,
    Agent,
    Response,
    Tool,
    CodeExe,
    Warning,
    Error,
    Info,
    Util,
    Hint,
    Adhoc,
    Other(String),
}

impl MessageKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "user" => Self::User,
            "agent" => Self::Agent,
            "response" => Self::Response,
            "tool" => Self::Tool,
            "code_exe" => Self::CodeExe,
            "warning" => Self::Warning,
            "error" => Self::Error,
            "info" => Self::Info,
            "util" => Self::Util,
            "hint" => Self::Hint,
            "adhoc" => Self::Adhoc,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
            Self::Response => "response",
            Self::Tool => "tool",
            Self::CodeExe => "code_exe",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
            Self::Util => "util",
            Self::Hint => "hint",
            Self::Adhoc => "adhoc",
            Self::Other(raw) => raw,
        }
    }

    /// Only `user` messages come from the user; everything else is the agent.
    pub fn sender(&self) -> Sender {
        match self {
            Self::User => Sender::User,
            _ => Sender::Ai,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }
}

/// One log entry of a context, addressed by its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub no: u64,
    pub kind: MessageKind,
    pub heading: String,
    pub content: String,
    pub kvps: Option<Map<String, Value>>,
}

impl LogEntry {
    pub fn new(no: u64, kind: MessageKind, heading: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            no,
            kind,
            heading: heading.into(),
            content: content.into(),
            kvps: None,
        }
    }

    pub fn with_kvps(mut self, kvps: Map<String, Value>) -> Self {
        self.kvps = Some(kvps);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{MessageKind, Sender};

    #[test]
    fn known_kinds_round_trip_through_their_names() {
        for name in [
            "user", "agent", "response", "tool", "code_exe", "warning", "error", "info", "util",
            "hint", "adhoc",
        ] {
            assert_eq!(MessageKind::parse(name).as_str(), name);
        }
    }

    #[test]
    fn unknown_kind_is_preserved() {
        let kind = MessageKind::parse("browser_action");
        assert_eq!(kind, MessageKind::Other("browser_action".to_string()));
        assert_eq!(kind.as_str(), "browser_action");
        assert_eq!(kind.sender(), Sender::Ai);
    }
}
