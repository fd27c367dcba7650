use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use console_logging::{console_debug, console_error, console_info};
use tokio_util::sync::CancellationToken;

use crate::api::AgentApi;
use crate::{AckRequest, ApiCommand, EngineEvent};

/// Sending side of the engine. Cloning shares the same worker thread.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<ApiCommand>,
    cancel: CancellationToken,
}

/// Receiving side of the engine; owned by whichever thread forwards results.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    /// Starts the worker thread. Commands run concurrently on its runtime and
    /// each one answers with exactly one event unless cancelled.
    ///
    /// Fails if the runtime cannot be built; no thread is started then.
    pub fn start(api: AgentApi) -> io::Result<(Self, EngineEvents)> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<ApiCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        thread::Builder::new()
            .name("console-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let api = api.clone();
                    let event_tx = event_tx.clone();
                    let cancel = worker_cancel.clone();
                    runtime.spawn(async move {
                        tokio::select! {
                            _ = cancel.cancelled() => {
                                console_debug!("dropping cancelled request");
                            }
                            event = execute(&api, command) => {
                                let _ = event_tx.send(event);
                            }
                        }
                    });
                }
                worker_cancel.cancel();
                runtime.shutdown_timeout(Duration::from_millis(500));
                console_info!("engine stopped");
            })?;

        Ok((Self { cmd_tx, cancel }, EngineEvents { event_rx }))
    }

    pub fn submit(&self, command: ApiCommand) {
        if self.cancel.is_cancelled() {
            return;
        }
        if self.cmd_tx.send(command).is_err() {
            console_error!("engine is gone; request dropped");
        }
    }

    /// Abandons in-flight requests; their results are never delivered.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl EngineEvents {
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks for the next event; `None` once the engine has stopped.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

async fn execute(api: &AgentApi, command: ApiCommand) -> EngineEvent {
    match command {
        ApiCommand::Poll { log_from, context } => {
            let result = api.poll(log_from, &context).await;
            EngineEvent::Polled { context, result }
        }
        ApiCommand::LoadTemplates => EngineEvent::TemplatesLoaded(api.templates().await),
        ApiCommand::SendMessage { text, context } => EngineEvent::Acknowledged {
            request: AckRequest::SendMessage,
            result: api.send_message(&text, &context).await,
        },
        ApiCommand::Pause { paused, context } => EngineEvent::Acknowledged {
            request: AckRequest::Pause,
            result: api.pause(paused, &context).await,
        },
        ApiCommand::Reset { context } => EngineEvent::Acknowledged {
            request: AckRequest::Reset,
            result: api.reset(&context).await,
        },
        ApiCommand::Remove { context } => EngineEvent::Acknowledged {
            request: AckRequest::Remove,
            result: api.remove(&context).await,
        },
        ApiCommand::SaveTemplate(template) => EngineEvent::Acknowledged {
            request: AckRequest::SaveTemplate,
            result: api.save_template(&template).await,
        },
        ApiCommand::DeleteTemplate { id } => EngineEvent::Acknowledged {
            request: AckRequest::DeleteTemplate,
            result: api.delete_template(&id).await,
        },
        ApiCommand::UseTemplate {
            template_id,
            context,
        } => EngineEvent::Acknowledged {
            request: AckRequest::UseTemplate,
            result: api.use_template(&template_id, &context).await,
        },
    }
}
