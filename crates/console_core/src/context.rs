use std::fmt;

/// Opaque identifier of one conversation on the agent backend.
///
/// The empty id is valid: it is what the console sends before the backend
/// has assigned a context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ContextId(String);

impl ContextId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Generates a fresh random (UUID v4) context id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContextId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ContextId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// One entry of the chat list reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSummary {
    pub id: ContextId,
    pub no: Option<u64>,
    pub name: Option<String>,
}

impl ContextSummary {
    pub fn new(id: impl Into<ContextId>) -> Self {
        Self {
            id: id.into(),
            no: None,
            name: None,
        }
    }

    /// Human readable label: the name, else `Chat #no`, else a short id.
    pub fn label(&self) -> String {
        if let Some(name) = self.name.as_deref().map(str::trim) {
            if !name.is_empty() {
                return name.to_string();
            }
        }
        if let Some(no) = self.no {
            return format!("Chat #{no}");
        }
        self.id.as_str().chars().take(8).collect()
    }
}
