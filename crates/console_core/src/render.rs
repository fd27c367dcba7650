//! Log entry → rendered message block.
//!
//! Rendering is selected by message kind through a [`HandlerRegistry`]. Kinds
//! without a registered handler use the registry's fallback.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::Value;

use crate::message::{LogEntry, MessageKind, Sender};

const THOUGHTS_KEY: &str = "thoughts";

/// Visual treatment of a whole message block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageStyle {
    Default,
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
}

/// What a section holds. `Json` and `Thoughts` can be hidden by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionClass {
    Heading,
    Body,
    Json,
    Thoughts,
    Kvp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub class: SectionClass,
    pub label: Option<String>,
    pub text: String,
}

impl Section {
    pub fn new(class: SectionClass, text: impl Into<String>) -> Self {
        Self {
            class,
            label: None,
            text: text.into(),
        }
    }

    pub fn labelled(class: SectionClass, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            class,
            label: Some(label.into()),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub id: u64,
    pub kind: MessageKind,
    pub sender: Sender,
    pub style: MessageStyle,
    pub sections: Vec<Section>,
}

pub type Handler = fn(&LogEntry) -> RenderedMessage;

pub struct HandlerRegistry {
    handlers: HashMap<MessageKind, Handler>,
    fallback: Handler,
}

impl HandlerRegistry {
    /// Registry with no kind-specific handlers.
    pub fn with_fallback(fallback: Handler) -> Self {
        Self {
            handlers: HashMap::new(),
            fallback,
        }
    }

    /// Registers `handler` for `kind`, returning the handler it replaced.
    pub fn register(&mut self, kind: MessageKind, handler: Handler) -> Option<Handler> {
        self.handlers.insert(kind, handler)
    }

    pub fn handler_for(&self, kind: &MessageKind) -> Handler {
        self.handlers.get(kind).copied().unwrap_or(self.fallback)
    }

    pub fn render(&self, entry: &LogEntry) -> RenderedMessage {
        (self.handler_for(&entry.kind))(entry)
    }

    /// Shared registry with the built-in handlers.
    pub fn standard() -> &'static HandlerRegistry {
        static STANDARD: OnceLock<HandlerRegistry> = OnceLock::new();
        STANDARD.get_or_init(HandlerRegistry::default)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        let mut registry = Self::with_fallback(render_default);
        registry.register(MessageKind::User, render_user);
        registry.register(MessageKind::Agent, render_agent);
        registry.register(MessageKind::Response, render_response);
        registry.register(MessageKind::Tool, render_tool);
        registry.register(MessageKind::CodeExe, render_code_exe);
        registry.register(MessageKind::Warning, render_warning);
        registry.register(MessageKind::Error, render_error);
        registry.register(MessageKind::Info, render_info);
        registry.register(MessageKind::Util, render_util);
        registry.register(MessageKind::Hint, render_hint);
        registry.register(MessageKind::Adhoc, render_adhoc);
        registry
    }
}

pub fn render_default(entry: &LogEntry) -> RenderedMessage {
    standard_block(entry, MessageStyle::Default)
}

fn render_user(entry: &LogEntry) -> RenderedMessage {
    let mut sections = heading(entry);
    push_body(&mut sections, SectionClass::Body, &entry.content);
    block(entry, MessageStyle::User, sections)
}

/// Agent turns carry their raw JSON in `content` and reasoning in the
/// `thoughts` kvp; both are separate sections so the view can hide them.
fn render_agent(entry: &LogEntry) -> RenderedMessage {
    let mut sections = heading(entry);
    if let Some(kvps) = &entry.kvps {
        if let Some(thoughts) = kvps.get(THOUGHTS_KEY) {
            sections.push(Section::new(SectionClass::Thoughts, format_value(thoughts)));
        }
        for (key, value) in kvps.iter().filter(|(key, _)| key.as_str() != THOUGHTS_KEY) {
            sections.push(Section::labelled(SectionClass::Kvp, key, format_value(value)));
        }
    }
    push_body(&mut sections, SectionClass::Json, &entry.content);
    block(entry, MessageStyle::Agent, sections)
}

fn render_response(entry: &LogEntry) -> RenderedMessage {
    let mut sections = heading(entry);
    push_body(&mut sections, SectionClass::Body, &entry.content);
    block(entry, MessageStyle::Response, sections)
}

fn render_tool(entry: &LogEntry) -> RenderedMessage {
    standard_block(entry, MessageStyle::Tool)
}

fn render_code_exe(entry: &LogEntry) -> RenderedMessage {
    standard_block(entry, MessageStyle::CodeExe)
}

fn render_warning(entry: &LogEntry) -> RenderedMessage {
    standard_block(entry, MessageStyle::Warning)
}

fn render_error(entry: &LogEntry) -> RenderedMessage {
    standard_block(entry, MessageStyle::Error)
}

fn render_info(entry: &LogEntry) -> RenderedMessage {
    standard_block(entry, MessageStyle::Info)
}

fn render_util(entry: &LogEntry) -> RenderedMessage {
    standard_block(entry, MessageStyle::Util)
}

fn render_hint(entry: &LogEntry) -> RenderedMessage {
    standard_block(entry, MessageStyle::Hint)
}

fn render_adhoc(entry: &LogEntry) -> RenderedMessage {
    standard_block(entry, MessageStyle::Adhoc)
}

/// Heading, then kvps, then the body text.
fn standard_block(entry: &LogEntry, style: MessageStyle) -> RenderedMessage {
    let mut sections = heading(entry);
    if let Some(kvps) = &entry.kvps {
        for (key, value) in kvps {
            let class = if key == THOUGHTS_KEY {
                SectionClass::Thoughts
            } else {
                SectionClass::Kvp
            };
            sections.push(Section::labelled(class, key, format_value(value)));
        }
    }
    push_body(&mut sections, SectionClass::Body, &entry.content);
    block(entry, style, sections)
}

fn heading(entry: &LogEntry) -> Vec<Section> {
    let mut sections = Vec::new();
    let text = entry.heading.trim();
    if !text.is_empty() {
        sections.push(Section::new(SectionClass::Heading, text));
    }
    sections
}

fn push_body(sections: &mut Vec<Section>, class: SectionClass, content: &str) {
    if !content.trim().is_empty() {
        sections.push(Section::new(class, content.trim_end()));
    }
}

fn block(entry: &LogEntry, style: MessageStyle, sections: Vec<Section>) -> RenderedMessage {
    RenderedMessage {
        id: entry.no,
        kind: entry.kind.clone(),
        sender: entry.kind.sender(),
        style,
        sections,
    }
}

/// Strings verbatim, arrays one item per line, everything else as JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
