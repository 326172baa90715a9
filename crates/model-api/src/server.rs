//! Axum server and routes.

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use model_store::SimulatedEngine;
use model_types::{
    CreateModelRequest, Model, ModelResponse, ModelStore, ModelStoreError, ResultsResponse,
    ResultsSummary,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

pub struct AppState {
    pub store: Arc<dyn ModelStore>,
    /// Receives every newly created job when the simulated engine is enabled.
    pub engine: Option<SimulatedEngine>,
    pub blocked_hosts: Vec<String>,
    pub public_url: Option<String>,
}

impl AppState {
    /// State for `config`, spawning the simulated engine if it is enabled.
    pub fn from_config(store: Arc<dyn ModelStore>, config: &ServerConfig) -> Self {
        let engine = config
            .simulate_engine
            .then(|| SimulatedEngine::spawn(Arc::clone(&store), config.engine));
        Self {
            store,
            engine,
            blocked_hosts: config.blocked_hosts.clone(),
            public_url: config.public_url.clone(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(handle_healthz))
        .route("/models", post(handle_create_model))
        .route(
            "/models/:model_id",
            get(handle_get_model).delete(handle_delete_model),
        )
        .route("/models/:model_id/results", get(handle_get_results))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_healthz() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Canonical registry key for a path id; anything that is not a UUID is rejected.
fn model_key(path: Result<Path<Uuid>, PathRejection>) -> ApiResult<String> {
    let Path(id) = path?;
    Ok(id.to_string())
}

fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(ref url) = state.public_url {
        return url.clone();
    }
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{}", host)
}

async fn handle_create_model(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CreateModelRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let source = req.config.validate(&state.blocked_hosts)?;

    let model = Model::new_model();
    let key = model.key();
    let body = ModelResponse::from(&model);
    state.store.create(model).await?;
    if let Some(ref engine) = state.engine {
        if let Err(e) = engine.submit(key.clone()) {
            // Nothing will ever run the job, so do not leave it pending.
            if let Err(cleanup) = state.store.delete(&key).await {
                tracing::warn!(model_id = %key, error = %cleanup, "failed to drop unsubmitted model");
            }
            return Err(ApiError::Internal(e.to_string()));
        }
    }
    tracing::info!(
        model_id = %key,
        data_source = source.host_str().unwrap_or_default(),
        "model created"
    );

    let location = format!("{}/models/{}", base_url(&state, &headers), key);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(body)))
}

async fn handle_get_model(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<ModelResponse>> {
    let key = model_key(path)?;
    let entry = state
        .store
        .lookup(&key)
        .await?
        .ok_or(ModelStoreError::NotFound(key))?;
    Ok(Json(ModelResponse::from(&entry.model)))
}

async fn handle_delete_model(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let key = model_key(path)?;
    state.store.delete(&key).await?;
    tracing::info!(model_id = %key, "model deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_get_results(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<ResultsResponse>> {
    let key = model_key(path)?;
    let entry = state
        .store
        .lookup(&key)
        .await?
        .ok_or_else(|| ModelStoreError::NotFound(key.clone()))?;
    match state.store.get_results(&key).await? {
        Some(results) => Ok(Json(ResultsResponse {
            results: ResultsSummary::from(results.as_ref()),
        })),
        None => Err(ApiError::ResultsNotAvailable {
            id: key,
            status: entry.model.status,
        }),
    }
}
