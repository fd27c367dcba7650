use std::sync::Arc;

use console_logging::console_debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::transport::Transport;
use crate::types::{
    ContextRequest, DeleteTemplateRequest, MessageRequest, PauseRequest, PollRequest,
    UseTemplateRequest,
};
use crate::{Ack, FailureKind, PollResponse, TemplateRecord, TemplatesResponse, TransportError};

/// Backend endpoint names, relative to the configured base url.
pub mod endpoints {
    pub const MSG: &str = "msg";
    pub const POLL: &str = "poll";
    pub const PAUSE: &str = "pause";
    pub const RESET: &str = "reset";
    pub const REMOVE: &str = "remove";
    pub const TEMPLATES: &str = "templates";
    pub const SAVE_TEMPLATE: &str = "save_template";
    pub const DELETE_TEMPLATE: &str = "delete_template";
    pub const USE_TEMPLATE: &str = "use_template";
}

/// Typed calls against the agent backend.
#[derive(Clone)]
pub struct AgentApi {
    transport: Arc<dyn Transport>,
}

impl AgentApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn call<Req, Resp>(&self, endpoint: &str, request: &Req) -> Result<Resp, TransportError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_value(request)
            .map_err(|err| TransportError::new(FailureKind::Encode, err.to_string()))?;
        let reply = self.transport.post_json(endpoint, &body).await?;
        serde_json::from_value(reply).map_err(|err| {
            TransportError::new(FailureKind::Decode, format!("{endpoint}: {err}"))
        })
    }

    /// The backend echoes the message back; any JSON reply counts as accepted.
    pub async fn send_message(&self, text: &str, context: &str) -> Result<Ack, TransportError> {
        let request = MessageRequest {
            text: text.to_string(),
            context: context.to_string(),
        };
        let body = serde_json::to_value(&request)
            .map_err(|err| TransportError::new(FailureKind::Encode, err.to_string()))?;
        let reply = self.transport.post_json(endpoints::MSG, &body).await?;
        console_debug!("message accepted for context {context:?}");
        Ok(serde_json::from_value(reply).unwrap_or_default())
    }

    pub async fn poll(&self, log_from: u64, context: &str) -> Result<PollResponse, TransportError> {
        let request = PollRequest {
            log_from,
            context: context.to_string(),
        };
        self.call(endpoints::POLL, &request).await
    }

    pub async fn pause(&self, paused: bool, context: &str) -> Result<Ack, TransportError> {
        let request = PauseRequest {
            paused,
            context: context.to_string(),
        };
        self.call(endpoints::PAUSE, &request).await
    }

    pub async fn reset(&self, context: &str) -> Result<Ack, TransportError> {
        self.call(endpoints::RESET, &context_request(context)).await
    }

    pub async fn remove(&self, context: &str) -> Result<Ack, TransportError> {
        self.call(endpoints::REMOVE, &context_request(context)).await
    }

    pub async fn templates(&self) -> Result<TemplatesResponse, TransportError> {
        self.call(endpoints::TEMPLATES, &Map::<String, Value>::new()).await
    }

    pub async fn save_template(&self, template: &TemplateRecord) -> Result<Ack, TransportError> {
        self.call(endpoints::SAVE_TEMPLATE, template).await
    }

    pub async fn delete_template(&self, id: &str) -> Result<Ack, TransportError> {
        let request = DeleteTemplateRequest { id: id.to_string() };
        self.call(endpoints::DELETE_TEMPLATE, &request).await
    }

    pub async fn use_template(
        &self,
        template_id: &str,
        context: &str,
    ) -> Result<Ack, TransportError> {
        let request = UseTemplateRequest {
            template_id: template_id.to_string(),
            context: context.to_string(),
        };
        self.call(endpoints::USE_TEMPLATE, &request).await
    }
}

fn context_request(context: &str) -> ContextRequest {
    ContextRequest {
        context: context.to_string(),
    }
}
