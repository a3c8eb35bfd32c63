//! catalyst - single-endpoint AI model gateway
//!
//! This library provides the core functionality for the catalyst gateway:
//! configuration, model resolution, request counting, and the HTTP relay.

pub mod config;
pub mod error;
pub mod proxy;
pub mod router;

pub use config::Config;
pub use error::{Error, GatewayError, Result};
