use console_logging::console_debug;

use crate::context::{ContextId, ContextSummary};
use crate::message::LogEntry;
use crate::render::HandlerRegistry;
use crate::templates::{Confirmation, Template, TemplateForm};
use crate::transcript::Transcript;
use crate::view_model::AppViewModel;

/// View toggles that filter the transcript without changing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub auto_scroll: bool,
    pub show_json: bool,
    pub show_thoughts: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            auto_scroll: true,
            show_json: false,
            show_thoughts: true,
        }
    }
}

/// Conversation state reported by one poll.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PollSnapshot {
    pub ok: bool,
    pub context: ContextId,
    pub log_guid: String,
    pub log_version: u64,
    pub logs: Vec<LogEntry>,
    pub paused: bool,
    pub contexts: Vec<ContextSummary>,
}

/// What survives a restart of the console.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub context: Option<ContextId>,
    pub display: DisplayOptions,
}

/// The outstanding poll and the context generation it was sent under.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingPoll {
    context: ContextId,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    context: ContextId,
    last_log_version: u64,
    last_log_guid: String,
    transcript: Transcript,
    contexts: Vec<ContextSummary>,
    paused: bool,
    connected: bool,
    /// Bumped on every context switch, including A -> B -> A.
    context_generation: u64,
    poll_in_flight: Option<PendingPoll>,
    display: DisplayOptions,
    input: String,
    templates: Vec<Template>,
    template_form: Option<TemplateForm>,
    confirmation: Option<Confirmation>,
    alert: Option<String>,
    status_note: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restore(session: SessionSnapshot) -> Self {
        Self {
            context: session.context.unwrap_or_default(),
            display: session.display,
            ..Self::default()
        }
    }

    pub fn session_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            context: (!self.context.is_empty()).then(|| self.context.clone()),
            display: self.display,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    /// Returns whether anything changed since the last call, and resets it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn context(&self) -> &ContextId {
        &self.context
    }

    pub fn last_log_version(&self) -> u64 {
        self.last_log_version
    }

    pub fn last_log_guid(&self) -> &str {
        &self.last_log_guid
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn contexts(&self) -> &[ContextSummary] {
        &self.contexts
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn poll_in_flight(&self) -> bool {
        self.poll_in_flight.is_some()
    }

    pub fn display(&self) -> DisplayOptions {
        self.display
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn template_form(&self) -> Option<&TemplateForm> {
        self.template_form.as_ref()
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn status_note(&self) -> Option<&str> {
        self.status_note.as_deref()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Activates `id`. Log tracking is reset only when the context changes.
    pub(crate) fn set_context(&mut self, id: ContextId) -> bool {
        if id == self.context {
            return false;
        }
        console_debug!("Switching context {:?} -> {:?}", self.context.as_str(), id.as_str());
        self.context = id;
        self.context_generation += 1;
        self.last_log_guid.clear();
        self.last_log_version = 0;
        self.mark_dirty();
        true
    }

    /// Drops `id` from the chat list, picking a replacement when it was the
    /// active context. Returns whether the id was listed at all.
    ///
    /// The replacement is the last non-matching entry seen before the scan
    /// stops, which is not necessarily a neighbour of `id`.
    pub(crate) fn kill_chat(&mut self, id: &ContextId, fresh: ContextId) -> bool {
        let mut found = false;
        let mut other: Option<ContextId> = None;
        for summary in &self.contexts {
            if &summary.id == id {
                found = true;
            } else {
                other = Some(summary.id.clone());
            }
            if found && other.is_some() {
                break;
            }
        }

        if found && &self.context == id {
            self.set_context(other.unwrap_or(fresh));
        }
        found
    }

    /// Marks a poll as outstanding for the current context.
    pub(crate) fn begin_poll(&mut self) -> ContextId {
        self.poll_in_flight = Some(PendingPoll {
            context: self.context.clone(),
            generation: self.context_generation,
        });
        self.context.clone()
    }

    /// Clears the outstanding poll and reports whether its answer still
    /// applies.
    ///
    /// An answer is stale once the context has been switched after the poll
    /// was sent, even if the user has since switched back: the poll carried
    /// a `log_from` that no longer matches the reset log tracking.
    pub(crate) fn finish_poll(&mut self, requested: &ContextId) -> bool {
        let current = match self.poll_in_flight.take() {
            Some(pending) => {
                &pending.context == requested && pending.generation == self.context_generation
            }
            None => false,
        };
        if !current {
            console_debug!(
                "Dropping poll answer for {:?}; active context is {:?}",
                requested.as_str(),
                self.context.as_str()
            );
        }
        current
    }

    /// Reconciles a current poll result into local state.
    pub(crate) fn apply_poll(&mut self, snapshot: PollSnapshot, registry: &HandlerRegistry) {
        if !snapshot.ok {
            return;
        }

        self.set_context(snapshot.context);

        if self.last_log_guid != snapshot.log_guid {
            self.transcript.clear();
            self.last_log_version = 0;
        }

        if self.last_log_version != snapshot.log_version {
            for entry in &snapshot.logs {
                self.transcript.upsert(registry.render(entry));
            }
            self.mark_dirty();
        }

        if self.paused != snapshot.paused || !self.connected || self.contexts != snapshot.contexts {
            self.paused = snapshot.paused;
            self.connected = true;
            self.contexts = snapshot.contexts;
            self.mark_dirty();
        }

        self.last_log_version = snapshot.log_version;
        self.last_log_guid = snapshot.log_guid;
    }

    pub(crate) fn mark_disconnected(&mut self) {
        if self.connected {
            self.connected = false;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn take_input(&mut self) -> String {
        self.mark_dirty();
        std::mem::take(&mut self.input)
    }

    pub(crate) fn display_mut(&mut self) -> &mut DisplayOptions {
        self.mark_dirty();
        &mut self.display
    }

    pub(crate) fn set_templates(&mut self, templates: Vec<Template>) {
        self.templates = templates;
        self.mark_dirty();
    }

    pub(crate) fn find_template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|template| template.id == id)
    }

    pub(crate) fn open_form(&mut self, form: TemplateForm) {
        self.template_form = Some(form);
        self.mark_dirty();
    }

    pub(crate) fn form_mut(&mut self) -> Option<&mut TemplateForm> {
        if self.template_form.is_some() {
            self.mark_dirty();
        }
        self.template_form.as_mut()
    }

    pub(crate) fn close_form(&mut self) {
        if self.template_form.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn ask(&mut self, confirmation: Confirmation) {
        self.confirmation = Some(confirmation);
        self.mark_dirty();
    }

    pub(crate) fn take_confirmation(&mut self) -> Option<Confirmation> {
        let taken = self.confirmation.take();
        if taken.is_some() {
            self.mark_dirty();
        }
        taken
    }

    pub(crate) fn raise_alert(&mut self, text: String) {
        self.alert = Some(text);
        self.mark_dirty();
    }

    pub(crate) fn dismiss_alert(&mut self) {
        if self.alert.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn note(&mut self, text: impl Into<String>) {
        self.status_note = Some(text.into());
        self.mark_dirty();
    }
}
