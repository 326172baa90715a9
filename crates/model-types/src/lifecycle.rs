//! Job record and its status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle stage of a model job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl ModelStatus {
    pub const ALL: [ModelStatus; 4] = [
        ModelStatus::Pending,
        ModelStatus::Running,
        ModelStatus::Completed,
        ModelStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelStatus::Pending => "pending",
            ModelStatus::Running => "running",
            ModelStatus::Completed => "completed",
            ModelStatus::Failed => "failed",
        }
    }

    /// Completed and failed jobs never change status again.
    pub fn is_terminal(self) -> bool {
        matches!(self, ModelStatus::Completed | ModelStatus::Failed)
    }

    /// Whether `self -> next` is in the transition table.
    ///
    /// Pending is initial only, so nothing moves back into it, and self-transitions are
    /// rejected.
    pub fn can_transition_to(self, next: ModelStatus) -> bool {
        use ModelStatus::*;
        matches!(
            (self, next),
            (Pending, Running)
                | (Pending, Completed)
                | (Pending, Failed)
                | (Running, Completed)
                | (Running, Failed)
        )
    }
}

impl std::fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submitted model job: immutable identity plus mutable status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: Uuid,
    pub status: ModelStatus,
    pub created_at: DateTime<Utc>,
}

impl Model {
    /// Fresh job with a random v4 id in `pending`.
    pub fn new_model() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            status: ModelStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// The registry key for this record.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}
