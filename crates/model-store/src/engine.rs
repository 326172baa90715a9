//! Simulated computation engine: single queue + one worker that walks submitted jobs
//! through running to a terminal status.

use model_types::{ModelStatus, ModelStore, ModelStoreError};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine worker channel closed")]
    ChannelClosed,
}

/// How the simulated engine paces and resolves jobs.
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// Delay before each status change.
    pub step: Duration,
    /// Probability in `[0, 1]` that a job ends `failed` instead of `completed`.
    pub failure_rate: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            step: Duration::from_millis(500),
            failure_rate: 0.0,
        }
    }
}

/// Stand-in for the real clustering engine. Reports progress only through the store's
/// public operations, so the store's transition rules still apply.
pub struct SimulatedEngine {
    tx: mpsc::UnboundedSender<String>,
}

impl SimulatedEngine {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn(store: Arc<dyn ModelStore>, settings: EngineSettings) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let failure_rate = if settings.failure_rate.is_nan() {
            0.0
        } else {
            settings.failure_rate.clamp(0.0, 1.0)
        };

        tokio::spawn(async move {
            while let Some(model_id) = rx.recv().await {
                tokio::time::sleep(settings.step).await;
                if let Err(e) = store.set_status(&model_id, ModelStatus::Running).await {
                    log_skip(&model_id, &e);
                    continue;
                }
                tokio::time::sleep(settings.step).await;
                let outcome = if rand::thread_rng().gen_bool(failure_rate) {
                    ModelStatus::Failed
                } else {
                    ModelStatus::Completed
                };
                match store.set_status(&model_id, outcome).await {
                    Ok(()) => {
                        tracing::info!(model_id = %model_id, status = %outcome, "engine finished job")
                    }
                    Err(e) => log_skip(&model_id, &e),
                }
            }
            tracing::debug!("engine worker stopped");
        });

        Self { tx }
    }

    /// Engine whose worker is already gone; every `submit` fails.
    #[cfg(any(test, feature = "test-util"))]
    pub fn disconnected() -> Self {
        let (tx, _) = mpsc::unbounded_channel::<String>();
        Self { tx }
    }

    /// Queue a job; the worker picks jobs up in submission order.
    pub fn submit(&self, model_id: impl Into<String>) -> Result<(), EngineError> {
        self.tx
            .send(model_id.into())
            .map_err(|_| EngineError::ChannelClosed)
    }
}

// Jobs can be deleted or moved by another caller while queued.
fn log_skip(model_id: &str, err: &ModelStoreError) {
    tracing::warn!(model_id = %model_id, error = %err, "engine skipped job");
}
