//! In-memory model registry: one map of entries under a single lock.

use crate::RandomResultGenerator;
use async_trait::async_trait;
use model_types::{
    Model, ModelEntry, ModelStatus, ModelStore, ModelStoreError, ResultGenerator, ResultSet,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of ModelStore (process lifetime only).
///
/// Reads take the shared lock; `insert`, `delete`, `set_status` and `get_results` take the
/// exclusive one, so result generation runs at most once per job.
pub struct InMemoryModelStore {
    /// model_id -> (record, cached results).
    entries: RwLock<HashMap<String, ModelEntry>>,
    generator: Arc<dyn ResultGenerator>,
}

impl InMemoryModelStore {
    /// Store backed by the random placeholder generator.
    pub fn new() -> Self {
        Self::with_generator(Arc::new(RandomResultGenerator::new()))
    }

    pub fn with_generator(generator: Arc<dyn ResultGenerator>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            generator,
        }
    }
}

impl Default for InMemoryModelStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelStore for InMemoryModelStore {
    async fn insert(&self, key: &str, model: Model) -> Result<(), ModelStoreError> {
        let mut guard = self.entries.write().await;
        if guard.contains_key(key) {
            return Err(ModelStoreError::DuplicateKey(key.to_string()));
        }
        let id = model.key();
        if key != id {
            return Err(ModelStoreError::IdentityMismatch {
                key: key.to_string(),
                id,
            });
        }
        guard.insert(
            id,
            ModelEntry {
                model,
                results: None,
            },
        );
        tracing::debug!(model_id = %key, "model inserted");
        Ok(())
    }

    async fn lookup(&self, model_id: &str) -> Result<Option<ModelEntry>, ModelStoreError> {
        let guard = self.entries.read().await;
        Ok(guard.get(model_id).cloned())
    }

    async fn delete(&self, model_id: &str) -> Result<(), ModelStoreError> {
        let mut guard = self.entries.write().await;
        match guard.remove(model_id) {
            Some(_) => {
                tracing::debug!(model_id = %model_id, "model deleted");
                Ok(())
            }
            None => Err(ModelStoreError::NotFound(model_id.to_string())),
        }
    }

    async fn set_status(
        &self,
        model_id: &str,
        status: ModelStatus,
    ) -> Result<(), ModelStoreError> {
        let mut guard = self.entries.write().await;
        let entry = guard
            .get_mut(model_id)
            .ok_or_else(|| ModelStoreError::NotFound(model_id.to_string()))?;
        let from = entry.model.status;
        if !from.can_transition_to(status) {
            return Err(ModelStoreError::InvalidTransition {
                id: model_id.to_string(),
                from,
                to: status,
            });
        }
        entry.model.status = status;
        tracing::info!(model_id = %model_id, from = %from, to = %status, "model status changed");
        Ok(())
    }

    async fn get_results(
        &self,
        model_id: &str,
    ) -> Result<Option<Arc<ResultSet>>, ModelStoreError> {
        // Exclusive lock: two first readers must not both generate.
        let mut guard = self.entries.write().await;
        let entry = guard
            .get_mut(model_id)
            .ok_or_else(|| ModelStoreError::NotFound(model_id.to_string()))?;
        if entry.model.status != ModelStatus::Completed {
            return Ok(None);
        }
        if let Some(ref cached) = entry.results {
            return Ok(Some(Arc::clone(cached)));
        }
        let results = Arc::new(self.generator.generate(model_id));
        entry.results = Some(Arc::clone(&results));
        tracing::info!(
            model_id = %model_id,
            clusters = results.cluster_count(),
            "results generated and cached"
        );
        Ok(Some(results))
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn contains(&self, model_id: &str) -> bool {
        self.entries.read().await.contains_key(model_id)
    }

    async fn keys(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }
}
