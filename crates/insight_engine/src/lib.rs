//! Insight engine: retried delivery, backend API client, and effect execution.
mod api;
mod bridge;
mod descriptor;
mod engine;
mod retry;
mod transport;
mod types;

pub use api::{ApiClient, ApiError};
pub use bridge::EffectRunner;
pub use descriptor::{Method, RequestDescriptor, RetryPolicy};
pub use engine::ClientHandle;
pub use retry::execute;
pub use transport::{
    ReqwestTransport, Transport, TransportError, TransportResponse, TransportSettings,
};
pub use types::{
    AnalysisPayload, CandidateEntry, ClientEvent, ColumnEntry, DeliveryError, DeliveryFailureKind,
    SubmissionId,
};
