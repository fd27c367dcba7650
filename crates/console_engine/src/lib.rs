//! Console engine: backend transport, typed API calls and the worker that runs them.
mod api;
mod engine;
mod persist;
mod transport;
mod types;

pub use api::{endpoints, AgentApi};
pub use engine::{EngineEvents, EngineHandle};
pub use persist::{ensure_state_dir, read_optional, AtomicFileWriter, PersistError};
pub use transport::{ReqwestTransport, Transport, TransportSettings};
pub use types::{
    Ack, AckRequest, ApiCommand, EngineEvent, FailureKind, PollResponse, TemplateRecord,
    TemplatesResponse, TransportError, WireContext, WireLogEntry,
};
