//! HTTP gateway server module.
//!
//! This module provides the `/api` relay endpoint, which counts each
//! accepted request and forwards the prompt to the configured upstream,
//! and the read-only dashboard and stats endpoints.

pub mod counters;
pub mod dashboard;
mod handlers;
mod server;
pub mod types;
pub mod upstream;

pub use counters::{CounterSnapshot, CounterStore, ModelCount};
pub use handlers::{CATALYST_LATENCY_MS_HEADER, CATALYST_MODEL_HEADER, CATALYST_REQUEST_ID_HEADER};
pub use server::{create_router, run_server, AppState, RequestId};
pub use types::{GatewayQuery, GatewaySuccess};
pub use upstream::UpstreamClient;
