use console_logging::{console_error, console_info, console_trace, console_warn};

use crate::render::HandlerRegistry;
use crate::templates::{Confirmation, Template, TemplateForm};
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    update_with(HandlerRegistry::standard(), state, msg)
}

/// Same as [`update`], rendering log entries through `registry`.
pub fn update_with(
    registry: &HandlerRegistry,
    mut state: AppState,
    msg: Msg,
) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![Effect::LoadTemplates],
        Msg::PollTick => {
            // Polls are serialized: a tick while one is outstanding is skipped.
            if state.poll_in_flight() {
                console_trace!("Poll still in flight; skipping tick");
                Vec::new()
            } else {
                let context = state.begin_poll();
                vec![Effect::Poll {
                    log_from: state.last_log_version(),
                    context,
                }]
            }
        }
        Msg::PollCompleted {
            requested,
            snapshot,
        } => {
            if state.finish_poll(&requested) {
                state.apply_poll(snapshot, registry);
            }
            Vec::new()
        }
        Msg::PollFailed { requested, reason } => {
            console_warn!("Poll for {:?} failed: {}", requested.as_str(), reason);
            if state.finish_poll(&requested) {
                state.mark_disconnected();
            }
            Vec::new()
        }
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::MessageSubmitted => {
            let text = state.input().trim().to_string();
            if text.is_empty() {
                Vec::new()
            } else {
                state.take_input();
                vec![Effect::SendMessage {
                    text,
                    context: state.context().clone(),
                }]
            }
        }
        Msg::PauseToggled => vec![Effect::Pause {
            paused: !state.paused(),
            context: state.context().clone(),
        }],
        Msg::ResetRequested => vec![Effect::Reset {
            context: state.context().clone(),
        }],
        Msg::NewChat { fresh } => {
            state.set_context(fresh);
            Vec::new()
        }
        Msg::SelectChat(id) => {
            state.set_context(id);
            Vec::new()
        }
        Msg::KillChat { id, fresh } => {
            if state.kill_chat(&id, fresh) {
                vec![Effect::RemoveContext { context: id }]
            } else {
                Vec::new()
            }
        }
        Msg::AutoScrollToggled => {
            let display = state.display_mut();
            display.auto_scroll = !display.auto_scroll;
            Vec::new()
        }
        Msg::JsonToggled => {
            let display = state.display_mut();
            display.show_json = !display.show_json;
            Vec::new()
        }
        Msg::ThoughtsToggled => {
            let display = state.display_mut();
            display.show_thoughts = !display.show_thoughts;
            Vec::new()
        }
        Msg::TemplatesLoaded(templates) => {
            state.set_templates(templates);
            Vec::new()
        }
        Msg::TemplatesLoadFailed(reason) => {
            console_error!("Failed to load templates: {}", reason);
            state.note(format!("Failed to load templates: {reason}"));
            Vec::new()
        }
        Msg::TemplateNewRequested => {
            state.open_form(TemplateForm::new(Template::default()));
            Vec::new()
        }
        Msg::TemplateEditRequested(id) => {
            if let Some(template) = state.find_template(&id).cloned() {
                state.open_form(TemplateForm::new(template));
            }
            Vec::new()
        }
        Msg::TemplateFieldChanged { field, value } => {
            if let Some(form) = state.form_mut() {
                form.draft.set_field(field, value);
            }
            Vec::new()
        }
        Msg::TemplateFocusNext => {
            if let Some(form) = state.form_mut() {
                form.focused = form.focused.next();
            }
            Vec::new()
        }
        Msg::TemplateFocusPrev => {
            if let Some(form) = state.form_mut() {
                form.focused = form.focused.prev();
            }
            Vec::new()
        }
        Msg::TemplateSaveRequested => match state.template_form() {
            Some(form) => vec![Effect::SaveTemplate(form.draft.clone())],
            None => Vec::new(),
        },
        Msg::TemplateFormCancelled => {
            state.close_form();
            Vec::new()
        }
        Msg::TemplateSaved => {
            state.close_form();
            vec![Effect::LoadTemplates]
        }
        Msg::TemplateSaveFailed(message) => {
            state.raise_alert(failure_text("Error saving template", message));
            Vec::new()
        }
        Msg::TemplateDeleteRequested(id) => {
            let name = state
                .find_template(&id)
                .map(|template| template.name.clone())
                .unwrap_or_default();
            state.ask(Confirmation::DeleteTemplate { id, name });
            Vec::new()
        }
        Msg::ConfirmAccepted => match state.take_confirmation() {
            Some(Confirmation::DeleteTemplate { id, .. }) => {
                vec![Effect::DeleteTemplate { id }]
            }
            None => Vec::new(),
        },
        Msg::ConfirmRejected => {
            state.take_confirmation();
            Vec::new()
        }
        Msg::TemplateDeleted => vec![Effect::LoadTemplates],
        Msg::TemplateDeleteFailed(message) => {
            state.raise_alert(failure_text("Error deleting template", message));
            Vec::new()
        }
        Msg::TemplateUseRequested(template_id) => vec![Effect::UseTemplate {
            template_id,
            context: state.context().clone(),
        }],
        Msg::TemplateApplied => {
            console_info!("Template applied successfully");
            state.note("Template applied successfully");
            Vec::new()
        }
        Msg::TemplateApplyFailed(message) => {
            state.raise_alert(failure_text("Error using template", message));
            Vec::new()
        }
        Msg::AlertDismissed => {
            state.dismiss_alert();
            Vec::new()
        }
        Msg::RequestFailed { action, reason } => {
            console_warn!("Request '{}' failed: {}", action, reason);
            state.note(format!("Could not {action}: {reason}"));
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn failure_text(prefix: &str, message: Option<String>) -> String {
    let message = message
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| "unknown error".to_string());
    format!("{prefix}: {message}")
}
