//! Agent console core: pure state machine and view-model helpers.
mod context;
mod effect;
mod message;
mod msg;
mod render;
mod state;
mod templates;
mod transcript;
mod update;
mod view_model;

pub use context::{ContextId, ContextSummary};
pub use effect::{Effect, RequestAction};
pub use message::{LogEntry, MessageKind, Sender};
pub use msg::Msg;
pub use render::{
    format_value, render_default, Handler, HandlerRegistry, MessageStyle, RenderedMessage,
    Section, SectionClass,
};
pub use state::{AppState, DisplayOptions, PollSnapshot, SessionSnapshot};
pub use templates::{Confirmation, Template, TemplateField, TemplateForm};
pub use transcript::{Transcript, Upsert};
pub use update::{update, update_with};
pub use view_model::{AppViewModel, ContextRowView, MessageView, TemplateRowView};
