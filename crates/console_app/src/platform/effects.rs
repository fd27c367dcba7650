use std::io;
use std::sync::mpsc;
use std::thread;

use console_core::{
    ContextId, ContextSummary, Effect, LogEntry, MessageKind, Msg, PollSnapshot, RequestAction,
    Template,
};
use console_engine::{
    Ack, AckRequest, AgentApi, ApiCommand, EngineEvent, EngineEvents, EngineHandle, PollResponse,
    TemplateRecord, TemplatesResponse, TransportError,
};
use console_logging::{console_debug, console_info, console_warn};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(api: AgentApi, msg_tx: mpsc::Sender<Msg>) -> io::Result<Self> {
        let (engine, events) = EngineHandle::start(api)?;
        spawn_event_loop(events, msg_tx);
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            console_debug!("effect {}", effect_name(&effect));
            self.engine.submit(to_command(effect));
        }
    }

    pub fn shutdown(&self) {
        console_info!("cancelling in-flight requests");
        self.engine.shutdown();
    }
}

fn spawn_event_loop(events: EngineEvents, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if msg_tx.send(to_msg(event)).is_err() {
                break;
            }
        }
    });
}

fn effect_name(effect: &Effect) -> &'static str {
    match effect {
        Effect::Poll { .. } => "poll",
        Effect::SendMessage { .. } => "send_message",
        Effect::Pause { .. } => "pause",
        Effect::Reset { .. } => "reset",
        Effect::RemoveContext { .. } => "remove",
        Effect::LoadTemplates => "load_templates",
        Effect::SaveTemplate(_) => "save_template",
        Effect::DeleteTemplate { .. } => "delete_template",
        Effect::UseTemplate { .. } => "use_template",
    }
}

fn to_command(effect: Effect) -> ApiCommand {
    match effect {
        Effect::Poll { log_from, context } => ApiCommand::Poll {
            log_from,
            context: context.to_string(),
        },
        Effect::SendMessage { text, context } => ApiCommand::SendMessage {
            text,
            context: context.to_string(),
        },
        Effect::Pause { paused, context } => ApiCommand::Pause {
            paused,
            context: context.to_string(),
        },
        Effect::Reset { context } => ApiCommand::Reset {
            context: context.to_string(),
        },
        Effect::RemoveContext { context } => ApiCommand::Remove {
            context: context.to_string(),
        },
        Effect::LoadTemplates => ApiCommand::LoadTemplates,
        Effect::SaveTemplate(template) => ApiCommand::SaveTemplate(to_record(template)),
        Effect::DeleteTemplate { id } => ApiCommand::DeleteTemplate { id },
        Effect::UseTemplate {
            template_id,
            context,
        } => ApiCommand::UseTemplate {
            template_id,
            context: context.to_string(),
        },
    }
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Polled { context, result } => {
            let requested = ContextId::from(context);
            match result {
                Ok(response) => Msg::PollCompleted {
                    requested,
                    snapshot: to_snapshot(response),
                },
                Err(err) => {
                    console_warn!("poll failed: {err}");
                    Msg::PollFailed {
                        requested,
                        reason: err.to_string(),
                    }
                }
            }
        }
        EngineEvent::TemplatesLoaded(result) => templates_msg(result),
        EngineEvent::Acknowledged { request, result } => ack_msg(request, result),
    }
}

fn templates_msg(result: Result<TemplatesResponse, TransportError>) -> Msg {
    match result {
        Ok(reply) if reply.ok => {
            Msg::TemplatesLoaded(reply.templates.into_iter().map(to_template).collect())
        }
        Ok(reply) => Msg::TemplatesLoadFailed(
            reply
                .message
                .unwrap_or_else(|| "backend reported failure".to_string()),
        ),
        Err(err) => Msg::TemplatesLoadFailed(err.to_string()),
    }
}

fn ack_msg(request: AckRequest, result: Result<Ack, TransportError>) -> Msg {
    let ack = match result {
        Ok(ack) => ack,
        Err(err) => {
            console_warn!("{:?} failed: {}", request, err);
            return Msg::RequestFailed {
                action: to_action(request),
                reason: err.to_string(),
            };
        }
    };

    match (request, ack.ok) {
        (AckRequest::SaveTemplate, true) => Msg::TemplateSaved,
        (AckRequest::SaveTemplate, false) => Msg::TemplateSaveFailed(ack.message),
        (AckRequest::DeleteTemplate, true) => Msg::TemplateDeleted,
        (AckRequest::DeleteTemplate, false) => Msg::TemplateDeleteFailed(ack.message),
        (AckRequest::UseTemplate, true) => Msg::TemplateApplied,
        (AckRequest::UseTemplate, false) => Msg::TemplateApplyFailed(ack.message),
        (_, true) => Msg::NoOp,
        (other, false) => {
            console_warn!(
                "{:?} rejected by backend: {}",
                other,
                ack.message.as_deref().unwrap_or("no message")
            );
            Msg::NoOp
        }
    }
}

fn to_action(request: AckRequest) -> RequestAction {
    match request {
        AckRequest::SendMessage => RequestAction::SendMessage,
        AckRequest::Pause => RequestAction::Pause,
        AckRequest::Reset => RequestAction::Reset,
        AckRequest::Remove => RequestAction::RemoveContext,
        AckRequest::SaveTemplate => RequestAction::SaveTemplate,
        AckRequest::DeleteTemplate => RequestAction::DeleteTemplate,
        AckRequest::UseTemplate => RequestAction::UseTemplate,
    }
}

fn to_snapshot(response: PollResponse) -> PollSnapshot {
    PollSnapshot {
        ok: response.ok,
        context: ContextId::from(response.context),
        log_guid: response.log_guid,
        log_version: response.log_version,
        logs: response
            .logs
            .into_iter()
            .map(|entry| LogEntry {
                no: entry.no,
                kind: MessageKind::parse(&entry.kind),
                heading: entry.heading.unwrap_or_default(),
                content: entry.content.unwrap_or_default(),
                kvps: entry.kvps,
            })
            .collect(),
        paused: response.paused,
        contexts: response
            .contexts
            .into_iter()
            .map(|context| ContextSummary {
                id: ContextId::from(context.id),
                no: context.no,
                name: context.name,
            })
            .collect(),
    }
}

fn to_template(record: TemplateRecord) -> Template {
    Template {
        id: record.id,
        name: record.name,
        url: record.url,
        navigation_goal: record.navigation_goal,
        data_extraction_goal: record.data_extraction_goal,
        advanced_settings: record.advanced_settings,
    }
}

fn to_record(template: Template) -> TemplateRecord {
    TemplateRecord {
        id: template.id,
        name: template.name,
        url: template.url,
        navigation_goal: template.navigation_goal,
        data_extraction_goal: template.data_extraction_goal,
        advanced_settings: template.advanced_settings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_engine::{FailureKind, WireContext, WireLogEntry};
    use serde_json::json;

    fn transport_error(kind: FailureKind) -> TransportError {
        TransportError {
            kind,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn poll_reply_becomes_a_snapshot_with_parsed_kinds() {
        let kvps = json!({"thoughts": ["a"]}).as_object().cloned();
        let event = EngineEvent::Polled {
            context: "ctx".to_string(),
            result: Ok(PollResponse {
                ok: true,
                context: "ctx".to_string(),
                log_guid: "g".to_string(),
                log_version: 3,
                logs: vec![WireLogEntry {
                    no: 2,
                    kind: "code_exe".to_string(),
                    heading: None,
                    content: Some("ls".to_string()),
                    kvps,
                }],
                paused: true,
                contexts: vec![WireContext {
                    id: "ctx".to_string(),
                    no: Some(4),
                    name: None,
                }],
            }),
        };

        let Msg::PollCompleted {
            requested,
            snapshot,
        } = to_msg(event)
        else {
            panic!("expected PollCompleted");
        };
        assert_eq!(requested.as_str(), "ctx");
        assert_eq!(snapshot.logs[0].kind, MessageKind::CodeExe);
        assert_eq!(snapshot.logs[0].heading, "");
        assert!(snapshot.logs[0].kvps.is_some());
        assert!(snapshot.paused);
        assert_eq!(snapshot.contexts[0].label(), "Chat #4");
    }

    #[test]
    fn poll_transport_failure_becomes_poll_failed() {
        let msg = to_msg(EngineEvent::Polled {
            context: "ctx".to_string(),
            result: Err(transport_error(FailureKind::HttpStatus(500))),
        });
        assert!(matches!(msg, Msg::PollFailed { reason, .. } if reason.contains("500")));
    }

    #[test]
    fn template_acks_map_to_outcomes() {
        let rejected = Ack {
            ok: false,
            message: Some("duplicate name".to_string()),
        };
        assert_eq!(
            to_msg(EngineEvent::Acknowledged {
                request: AckRequest::SaveTemplate,
                result: Ok(rejected),
            }),
            Msg::TemplateSaveFailed(Some("duplicate name".to_string()))
        );
        assert_eq!(
            to_msg(EngineEvent::Acknowledged {
                request: AckRequest::DeleteTemplate,
                result: Ok(Ack::default()),
            }),
            Msg::TemplateDeleted
        );
        assert_eq!(
            to_msg(EngineEvent::Acknowledged {
                request: AckRequest::Pause,
                result: Ok(Ack::default()),
            }),
            Msg::NoOp
        );
    }

    #[test]
    fn transport_failure_on_a_call_is_reported_with_its_action() {
        let msg = to_msg(EngineEvent::Acknowledged {
            request: AckRequest::Remove,
            result: Err(transport_error(FailureKind::Timeout)),
        });
        assert!(matches!(
            msg,
            Msg::RequestFailed {
                action: RequestAction::RemoveContext,
                ..
            }
        ));
    }

    #[test]
    fn refused_template_list_keeps_backend_message() {
        let msg = to_msg(EngineEvent::TemplatesLoaded(Ok(TemplatesResponse {
            ok: false,
            templates: Vec::new(),
            message: Some("store offline".to_string()),
        })));
        assert_eq!(msg, Msg::TemplatesLoadFailed("store offline".to_string()));
    }

    #[test]
    fn effects_carry_the_context_id_as_text() {
        let command = to_command(Effect::UseTemplate {
            template_id: "t-1".to_string(),
            context: ContextId::from("ctx"),
        });
        assert_eq!(
            command,
            ApiCommand::UseTemplate {
                template_id: "t-1".to_string(),
                context: "ctx".to_string(),
            }
        );

        let template = Template {
            id: "t-2".to_string(),
            name: "beta".to_string(),
            ..Template::default()
        };
        let ApiCommand::SaveTemplate(record) = to_command(Effect::SaveTemplate(template)) else {
            panic!("expected SaveTemplate");
        };
        assert_eq!(record.id, "t-2");
        assert_eq!(record.name, "beta");
    }
}
