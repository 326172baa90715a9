//! Request and response DTOs for the model jobs HTTP API.

use crate::{Cluster, Model, ModelConfig, ModelStatus, ResultSet};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// POST /models body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateModelRequest {
    pub config: ModelConfig,
}

/// Public view of a job: id and status only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub id: Uuid,
    pub status: ModelStatus,
}

impl From<&Model> for ModelResponse {
    fn from(m: &Model) -> Self {
        Self {
            id: m.id,
            status: m.status,
        }
    }
}

/// Summary of a result set as returned by GET /models/{id}/results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsSummary {
    pub cluster_count: usize,
    pub total_data_points: u64,
    pub clusters: Vec<Cluster>,
}

impl From<&ResultSet> for ResultsSummary {
    fn from(rs: &ResultSet) -> Self {
        Self {
            cluster_count: rs.cluster_count(),
            total_data_points: rs.total_data_points(),
            clusters: rs.clusters().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub results: ResultsSummary,
}

/// Single error entry: snake_case code plus a human readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Error envelope used for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorDetail>,
}

impl ErrorResponse {
    pub fn single(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![ErrorDetail {
                code: code.into(),
                message: message.into(),
            }],
        }
    }
}
