use crate::context::ContextId;
use crate::effect::RequestAction;
use crate::state::PollSnapshot;
use crate::templates::{Template, TemplateField};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The terminal is set up; initial loads may start.
    Started,
    /// Clock tick; the app redraws on it.
    Tick,
    /// Poll interval elapsed.
    PollTick,
    /// Poll answered. `requested` is the context the poll was sent for.
    PollCompleted {
        requested: ContextId,
        snapshot: PollSnapshot,
    },
    /// Poll failed at the transport level.
    PollFailed {
        requested: ContextId,
        reason: String,
    },
    /// User edited the chat input (full text).
    InputChanged(String),
    /// User submitted the chat input.
    MessageSubmitted,
    PauseToggled,
    ResetRequested,
    /// Start a new chat under a freshly generated id.
    NewChat {
        fresh: ContextId,
    },
    SelectChat(ContextId),
    /// Remove a chat. `fresh` is used if no other chat can take over.
    KillChat {
        id: ContextId,
        fresh: ContextId,
    },
    AutoScrollToggled,
    JsonToggled,
    ThoughtsToggled,
    TemplatesLoaded(Vec<Template>),
    TemplatesLoadFailed(String),
    TemplateNewRequested,
    TemplateEditRequested(String),
    TemplateFieldChanged {
        field: TemplateField,
        value: String,
    },
    TemplateFocusNext,
    TemplateFocusPrev,
    TemplateSaveRequested,
    TemplateFormCancelled,
    TemplateSaved,
    TemplateSaveFailed(Option<String>),
    TemplateDeleteRequested(String),
    TemplateDeleted,
    TemplateDeleteFailed(Option<String>),
    TemplateUseRequested(String),
    TemplateApplied,
    TemplateApplyFailed(Option<String>),
    ConfirmAccepted,
    ConfirmRejected,
    AlertDismissed,
    /// A fire-and-forget call failed at the transport level.
    RequestFailed {
        action: RequestAction,
        reason: String,
    },
    /// Nothing to do, e.g. an accepted fire-and-forget call.
    NoOp,
}

impl Msg {
    pub fn new_chat() -> Self {
        Msg::NewChat {
            fresh: ContextId::generate(),
        }
    }

    pub fn kill_chat(id: ContextId) -> Self {
        Msg::KillChat {
            id,
            fresh: ContextId::generate(),
        }
    }
}
