//! Router module for model resolution.
//!
//! This module decides which model a request is counted under and which
//! `model` parameter is sent upstream:
//! - Case-insensitive membership check against the configured set
//! - Silent fallback to the default model
//! - Per-model upstream overrides

mod resolver;

pub use resolver::{ModelResolution, ModelResolver};
