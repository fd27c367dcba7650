use std::fmt;

use crate::context::ContextId;
use crate::templates::Template;

/// Backend calls requested by `update`. The app executes them and reports
/// back with a `Msg`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Poll { log_from: u64, context: ContextId },
    SendMessage { text: String, context: ContextId },
    Pause { paused: bool, context: ContextId },
    Reset { context: ContextId },
    RemoveContext { context: ContextId },
    LoadTemplates,
    SaveTemplate(Template),
    DeleteTemplate { id: String },
    UseTemplate { template_id: String, context: ContextId },
}

/// Fire-and-forget calls whose transport failures are only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    SendMessage,
    Pause,
    Reset,
    RemoveContext,
    SaveTemplate,
    DeleteTemplate,
    UseTemplate,
}

impl fmt::Display for RequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequestAction::SendMessage => "send message",
            RequestAction::Pause => "pause",
            RequestAction::Reset => "reset chat",
            RequestAction::RemoveContext => "remove chat",
            RequestAction::SaveTemplate => "save template",
            RequestAction::DeleteTemplate => "delete template",
            RequestAction::UseTemplate => "use template",
        };
        f.write_str(label)
    }
}
