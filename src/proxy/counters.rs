//! In-memory request counters.
//!
//! Counts are volatile: they start at zero and are lost on restart.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

/// Request count for one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelCount {
    pub model: String,
    pub count: u64,
}

/// Point-in-time copy of all counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub total_requests: u64,
    pub models: Vec<ModelCount>,
}

impl CounterSnapshot {
    pub fn count(&self, model: &str) -> Option<u64> {
        self.models.iter().find(|m| m.model == model).map(|m| m.count)
    }
}

#[derive(Debug)]
struct CounterState {
    total_requests: u64,
    per_model: Vec<ModelCount>,
}

/// Per-model and total request counters over a fixed key set.
///
/// One mutex guards the whole map so the per-model count and the total are
/// always updated together and `total_requests == sum(per_model)` holds for
/// every snapshot.
#[derive(Debug)]
pub struct CounterStore {
    inner: Mutex<CounterState>,
}

impl CounterStore {
    /// Create a store with every model at zero, keeping the given order.
    pub fn new<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let per_model = models
            .into_iter()
            .map(|m| ModelCount {
                model: m.into(),
                count: 0,
            })
            .collect();

        Self {
            inner: Mutex::new(CounterState {
                total_requests: 0,
                per_model,
            }),
        }
    }

    /// Count one request for `model`.
    ///
    /// `model` must already be resolved to a known key. Unknown keys are
    /// dropped without touching the total.
    pub fn increment(&self, model: &str) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let state = &mut *guard;
        match state.per_model.iter_mut().find(|m| m.model == model) {
            Some(entry) => {
                entry.count += 1;
                state.total_requests += 1;
            }
            None => {
                tracing::warn!(model = %model, "Ignoring increment for unknown model");
            }
        }
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        let state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        CounterSnapshot {
            total_requests: state.total_requests,
            models: state.per_model.clone(),
        }
    }

    pub fn count(&self, model: &str) -> Option<u64> {
        let state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .per_model
            .iter()
            .find(|m| m.model == model)
            .map(|m| m.count)
    }

    pub fn total(&self) -> u64 {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .total_requests
    }
}
