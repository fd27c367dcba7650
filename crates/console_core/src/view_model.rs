use crate::message::Sender;
use crate::render::{MessageStyle, Section, SectionClass};
use crate::state::{AppState, DisplayOptions};
use crate::templates::TemplateForm;
use crate::ContextId;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub context: ContextId,
    pub contexts: Vec<ContextRowView>,
    pub messages: Vec<MessageView>,
    pub transcript_revision: u64,
    pub connected: bool,
    pub paused: bool,
    pub display: DisplayOptions,
    pub input: String,
    pub templates: Vec<TemplateRowView>,
    pub template_form: Option<TemplateForm>,
    pub confirmation: Option<String>,
    pub alert: Option<String>,
    pub status_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRowView {
    pub id: ContextId,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub id: u64,
    pub kind: String,
    pub sender: Sender,
    pub style: MessageStyle,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRowView {
    pub id: String,
    pub name: String,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let display = state.display();
        let messages = state
            .transcript()
            .iter()
            .map(|message| MessageView {
                id: message.id,
                kind: message.kind.as_str().to_string(),
                sender: message.sender,
                style: message.style,
                sections: message
                    .sections
                    .iter()
                    .filter(|section| is_visible(section.class, display))
                    .cloned()
                    .collect(),
            })
            .collect();

        Self {
            context: state.context().clone(),
            contexts: state
                .contexts()
                .iter()
                .map(|summary| ContextRowView {
                    id: summary.id.clone(),
                    label: summary.label(),
                    selected: &summary.id == state.context(),
                })
                .collect(),
            messages,
            transcript_revision: state.transcript().revision(),
            connected: state.connected(),
            paused: state.paused(),
            display,
            input: state.input().to_string(),
            templates: state
                .templates()
                .iter()
                .map(|template| TemplateRowView {
                    id: template.id.clone(),
                    name: template.name.clone(),
                })
                .collect(),
            template_form: state.template_form().cloned(),
            confirmation: state.confirmation().map(|c| c.prompt()),
            alert: state.alert().map(ToOwned::to_owned),
            status_note: state.status_note().map(ToOwned::to_owned),
        }
    }
}

fn is_visible(class: SectionClass, display: DisplayOptions) -> bool {
    match class {
        SectionClass::Json => display.show_json,
        SectionClass::Thoughts => display.show_thoughts,
        SectionClass::Heading | SectionClass::Body | SectionClass::Kvp => true,
    }
}
