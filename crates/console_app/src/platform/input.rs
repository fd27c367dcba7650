//! Key handling. Modal surfaces (alert, confirmation, template form) take
//! every key until they close; otherwise keys go to the focused pane.

use console_core::{AppViewModel, Msg, TemplateForm};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const SCROLL_STEP: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Chats,
    Templates,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Input => Focus::Chats,
            Focus::Chats => Focus::Templates,
            Focus::Templates => Focus::Input,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Input => Focus::Templates,
            Focus::Chats => Focus::Input,
            Focus::Templates => Focus::Chats,
        }
    }
}

/// UI-only selection state that never reaches the core.
#[derive(Debug, Clone, Default)]
pub struct UiCursor {
    pub focus: Focus,
    pub chat_index: usize,
    pub template_index: usize,
    /// Rows scrolled up from the bottom when auto-scroll is off.
    pub scroll_back: u16,
}

impl UiCursor {
    /// Keeps the selections inside lists that may have shrunk.
    pub fn clamp(&mut self, view: &AppViewModel) {
        self.chat_index = self.chat_index.min(view.contexts.len().saturating_sub(1));
        self.template_index = self
            .template_index
            .min(view.templates.len().saturating_sub(1));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Dispatch(Msg),
    Redraw,
    Quit,
}

pub fn map_key(key: KeyEvent, view: &AppViewModel, cursor: &mut UiCursor) -> Option<KeyOutcome> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        return Some(KeyOutcome::Quit);
    }

    if view.alert.is_some() {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc => dispatch(Msg::AlertDismissed),
            _ => None,
        };
    }
    if view.confirmation.is_some() {
        return match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                dispatch(Msg::ConfirmAccepted)
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                dispatch(Msg::ConfirmRejected)
            }
            _ => None,
        };
    }
    if let Some(form) = &view.template_form {
        return map_form_key(key, form);
    }

    if let Some(outcome) = map_global_key(key, view, cursor) {
        return Some(outcome);
    }

    match cursor.focus {
        Focus::Input => map_input_key(key, &view.input),
        Focus::Chats => map_chats_key(key, view, cursor),
        Focus::Templates => map_templates_key(key, view, cursor),
    }
}

/// Pasted text goes wherever typed text would.
pub fn map_paste(text: &str, view: &AppViewModel, cursor: &UiCursor) -> Option<KeyOutcome> {
    if view.alert.is_some() || view.confirmation.is_some() {
        return None;
    }
    if let Some(form) = &view.template_form {
        let mut value = form.draft.field(form.focused).to_string();
        value.push_str(text);
        return dispatch(Msg::TemplateFieldChanged {
            field: form.focused,
            value,
        });
    }
    if cursor.focus == Focus::Input {
        return dispatch(Msg::InputChanged(format!("{}{}", view.input, text)));
    }
    None
}

fn dispatch(msg: Msg) -> Option<KeyOutcome> {
    Some(KeyOutcome::Dispatch(msg))
}

fn map_form_key(key: KeyEvent, form: &TemplateForm) -> Option<KeyOutcome> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let current = form.draft.field(form.focused);
    match key.code {
        KeyCode::Esc => dispatch(Msg::TemplateFormCancelled),
        KeyCode::Char('s') if ctrl => dispatch(Msg::TemplateSaveRequested),
        KeyCode::Tab | KeyCode::Down => dispatch(Msg::TemplateFocusNext),
        KeyCode::BackTab | KeyCode::Up => dispatch(Msg::TemplateFocusPrev),
        KeyCode::Enter if form.focused.multiline() => dispatch(Msg::TemplateFieldChanged {
            field: form.focused,
            value: format!("{current}\n"),
        }),
        KeyCode::Enter => dispatch(Msg::TemplateFocusNext),
        KeyCode::Backspace => {
            let mut value = current.to_string();
            value.pop()?;
            dispatch(Msg::TemplateFieldChanged {
                field: form.focused,
                value,
            })
        }
        KeyCode::Char(c) if !ctrl => dispatch(Msg::TemplateFieldChanged {
            field: form.focused,
            value: format!("{current}{c}"),
        }),
        _ => None,
    }
}

fn map_global_key(key: KeyEvent, view: &AppViewModel, cursor: &mut UiCursor) -> Option<KeyOutcome> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Tab => {
            cursor.focus = cursor.focus.next();
            Some(KeyOutcome::Redraw)
        }
        KeyCode::BackTab => {
            cursor.focus = cursor.focus.prev();
            Some(KeyOutcome::Redraw)
        }
        KeyCode::Char('n') if ctrl => dispatch(Msg::new_chat()),
        KeyCode::Char('p') if ctrl => dispatch(Msg::PauseToggled),
        KeyCode::Char('r') if ctrl => dispatch(Msg::ResetRequested),
        KeyCode::Char('t') if ctrl => dispatch(Msg::TemplateNewRequested),
        KeyCode::F(2) => {
            cursor.scroll_back = 0;
            dispatch(Msg::AutoScrollToggled)
        }
        KeyCode::F(3) => dispatch(Msg::JsonToggled),
        KeyCode::F(4) => dispatch(Msg::ThoughtsToggled),
        KeyCode::PageUp if !view.display.auto_scroll => {
            cursor.scroll_back = cursor.scroll_back.saturating_add(SCROLL_STEP);
            Some(KeyOutcome::Redraw)
        }
        KeyCode::PageDown if !view.display.auto_scroll => {
            cursor.scroll_back = cursor.scroll_back.saturating_sub(SCROLL_STEP);
            Some(KeyOutcome::Redraw)
        }
        _ => None,
    }
}

fn map_input_key(key: KeyEvent, input: &str) -> Option<KeyOutcome> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            dispatch(Msg::InputChanged(format!("{input}\n")))
        }
        KeyCode::Enter => dispatch(Msg::MessageSubmitted),
        KeyCode::Backspace => {
            let mut text = input.to_string();
            text.pop()?;
            dispatch(Msg::InputChanged(text))
        }
        KeyCode::Char(c) if !ctrl => dispatch(Msg::InputChanged(format!("{input}{c}"))),
        _ => None,
    }
}

fn map_chats_key(key: KeyEvent, view: &AppViewModel, cursor: &mut UiCursor) -> Option<KeyOutcome> {
    match key.code {
        KeyCode::Up => {
            cursor.chat_index = cursor.chat_index.saturating_sub(1);
            Some(KeyOutcome::Redraw)
        }
        KeyCode::Down => {
            if cursor.chat_index + 1 < view.contexts.len() {
                cursor.chat_index += 1;
            }
            Some(KeyOutcome::Redraw)
        }
        KeyCode::Char('n') => dispatch(Msg::new_chat()),
        KeyCode::Enter => {
            let row = view.contexts.get(cursor.chat_index)?;
            dispatch(Msg::SelectChat(row.id.clone()))
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            let row = view.contexts.get(cursor.chat_index)?;
            dispatch(Msg::kill_chat(row.id.clone()))
        }
        _ => None,
    }
}

fn map_templates_key(
    key: KeyEvent,
    view: &AppViewModel,
    cursor: &mut UiCursor,
) -> Option<KeyOutcome> {
    match key.code {
        KeyCode::Up => {
            cursor.template_index = cursor.template_index.saturating_sub(1);
            Some(KeyOutcome::Redraw)
        }
        KeyCode::Down => {
            if cursor.template_index + 1 < view.templates.len() {
                cursor.template_index += 1;
            }
            Some(KeyOutcome::Redraw)
        }
        KeyCode::Char('n') => dispatch(Msg::TemplateNewRequested),
        KeyCode::Enter => {
            let row = view.templates.get(cursor.template_index)?;
            dispatch(Msg::TemplateUseRequested(row.id.clone()))
        }
        KeyCode::Char('e') => {
            let row = view.templates.get(cursor.template_index)?;
            dispatch(Msg::TemplateEditRequested(row.id.clone()))
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            let row = view.templates.get(cursor.template_index)?;
            dispatch(Msg::TemplateDeleteRequested(row.id.clone()))
        }
        _ => None,
    }
}
