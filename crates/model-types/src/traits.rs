//! Traits for the model registry and its result generator.

use crate::{Model, ModelStatus, ResultSet};
use async_trait::async_trait;
use std::sync::Arc;

/// Stored pair for one job: the record and its cached results, if generated.
///
/// `results` is shared with the store, so two reads of the same completed job hand out
/// the same allocation.
#[derive(Debug, Clone)]
pub struct ModelEntry {
    pub model: Model,
    pub results: Option<Arc<ResultSet>>,
}

/// Produces the result set for a completed job. Stand-in for the real clustering engine.
pub trait ResultGenerator: Send + Sync {
    fn generate(&self, model_id: &str) -> ResultSet;
}

/// Concurrent registry of model jobs keyed by stringified id.
///
/// Every operation is atomic with respect to other callers; a failed call leaves the
/// registry unchanged.
#[async_trait]
pub trait ModelStore: Send + Sync {
    /// Store `model` under `key` with no results.
    ///
    /// Fails with `DuplicateKey` if `key` is present, `IdentityMismatch` if `key` is not
    /// the model's own id.
    async fn insert(&self, key: &str, model: Model) -> Result<(), ModelStoreError>;

    /// Store `model` under its own id.
    async fn create(&self, model: Model) -> Result<(), ModelStoreError> {
        let key = model.key();
        self.insert(&key, model).await
    }

    /// Current record and results for `model_id`, or `None` when unknown.
    async fn lookup(&self, model_id: &str) -> Result<Option<ModelEntry>, ModelStoreError>;

    /// Remove the entry; `NotFound` when absent.
    async fn delete(&self, model_id: &str) -> Result<(), ModelStoreError>;

    /// Move the job to `status`.
    ///
    /// Fails with `NotFound` for unknown ids and `InvalidTransition` for anything outside
    /// the transition table, including every change away from a terminal status.
    async fn set_status(&self, model_id: &str, status: ModelStatus)
        -> Result<(), ModelStoreError>;

    /// Results for a completed job, generating and caching them on first call.
    ///
    /// This looks like a read but writes: the first call after completion runs the
    /// generator and stores its output. Returns `Ok(None)` while the job is not
    /// `completed`; `NotFound` for unknown ids.
    async fn get_results(&self, model_id: &str)
        -> Result<Option<Arc<ResultSet>>, ModelStoreError>;

    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn contains(&self, model_id: &str) -> bool;

    /// All keys, order unspecified.
    async fn keys(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelStoreError {
    #[error("no model with id {0:?} exists")]
    NotFound(String),
    #[error("a model with id {0:?} already exists")]
    DuplicateKey(String),
    #[error("key {key:?} does not match the model id {id:?}")]
    IdentityMismatch { key: String, id: String },
    #[error("model {id:?} cannot change status from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: ModelStatus,
        to: ModelStatus,
    },
}
