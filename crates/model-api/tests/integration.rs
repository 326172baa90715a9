//! Integration tests: create, get, delete, results, health, error envelopes.

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use model_api::config::ServerConfig;
use model_api::server::{self, AppState};
use model_store::{FixedResultGenerator, InMemoryModelStore, SimulatedEngine};
use model_types::{Model, ModelStatus, ModelStore};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

fn test_app() -> (axum::Router, Arc<InMemoryModelStore>) {
    let store = Arc::new(InMemoryModelStore::with_generator(Arc::new(
        FixedResultGenerator::single_cluster(440),
    )));
    let state = Arc::new(AppState::from_config(
        store.clone(),
        &ServerConfig::default(),
    ));
    (server::router(state), store)
}

fn valid_config() -> serde_json::Value {
    json!({
        "config": {
            "data_source": "https://myexampleapi.com",
            "data_api_key": "my_example_api_key"
        }
    })
}

async fn send(
    app: &axum::Router,
    req: Request<Body>,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let body = res.into_body().collect().await.unwrap().to_bytes();
    let j = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, headers, j)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::HOST, "testserver")
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::HOST, "testserver")
        .body(Body::empty())
        .unwrap()
}

fn post_models(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/models")
        .header(header::HOST, "testserver")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn assert_error_envelope(j: &serde_json::Value, code: &str) {
    let errors = j["errors"].as_array().expect("errors must be a list");
    assert_eq!(errors.len(), 1);
    let error = errors[0].as_object().unwrap();
    let mut keys: Vec<&String> = error.keys().collect();
    keys.sort();
    assert_eq!(keys, vec!["code", "message"]);
    assert_eq!(error["code"], code);
    assert!(error["message"].as_str().unwrap().len() > 15);
}

async fn create_model(app: &axum::Router) -> String {
    let (status, _, j) = send(app, post_models(&valid_config())).await;
    assert_eq!(status, StatusCode::CREATED);
    j["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn healthz_is_no_content() {
    let (app, _) = test_app();
    let (status, _, j) = send(&app, get("/healthz")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(j.is_null());
}

#[tokio::test]
async fn post_models_creates_pending_job() {
    let (app, store) = test_app();
    let (status, headers, j) = send(&app, post_models(&valid_config())).await;
    assert_eq!(status, StatusCode::CREATED);

    let obj = j.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    let id = j["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(j["status"], "pending");

    let location = headers.get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(location, format!("http://testserver/models/{}", id));
    assert!(store.contains(id).await);
}

#[tokio::test]
async fn post_models_rejects_bad_input() {
    let (app, store) = test_app();

    let bad_url = json!({
        "config": { "data_source": "http://icnompleteurl", "data_api_key": "k" }
    });
    let (status, _, j) = send(&app, post_models(&bad_url)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_envelope(&j, "invalid_config");

    let missing_source = json!({ "config": { "data_api_key": "my_example_api_key" } });
    let (status, _, j) = send(&app, post_models(&missing_source)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_envelope(&j, "invalid_request_body");

    let missing_key = json!({ "config": { "data_source": "https://myexampleapi.com" } });
    let (status, _, _) = send(&app, post_models(&missing_key)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert!(store.is_empty().await);
}

#[tokio::test]
async fn post_models_with_inaccessible_source_is_bad_request() {
    let (app, store) = test_app();
    let body = json!({
        "config": {
            "data_source": "https://airbus.com/some/data/source",
            "data_api_key": "my_example_api_key"
        }
    });
    let (status, _, j) = send(&app, post_models(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&j, "data_source_inaccessible");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn get_model_returns_id_and_status() {
    let (app, store) = test_app();
    let model = Model::new_model();
    store.create(model.clone()).await.unwrap();

    let (status, _, j) = send(&app, get(&format!("/models/{}", model.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(j, json!({ "id": model.id.to_string(), "status": "pending" }));
}

#[tokio::test]
async fn unknown_model_is_404_everywhere() {
    let (app, _) = test_app();
    let id = uuid::Uuid::new_v4();
    for req in [
        get(&format!("/models/{}", id)),
        delete(&format!("/models/{}", id)),
        get(&format!("/models/{}/results", id)),
    ] {
        let (status, _, j) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error_envelope(&j, "model_not_found");
    }
}

#[tokio::test]
async fn non_uuid_ids_are_unprocessable() {
    let (app, _) = test_app();
    for req in [
        get("/models/some-random-string"),
        delete("/models/some-random-string"),
        get("/models/87ebe5ak-f3ez-4d2c-93be-ee600596c397/results"),
    ] {
        let (status, _, j) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_error_envelope(&j, "invalid_model_id");
    }
}

#[tokio::test]
async fn delete_model_then_get_404() {
    let (app, store) = test_app();
    let id = create_model(&app).await;
    let (status, _, _) = send(&app, get(&format!("/models/{}", id))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, j) = send(&app, delete(&format!("/models/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(j.is_null());

    let (status, _, _) = send(&app, get(&format!("/models/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!store.contains(&id).await);
}

#[tokio::test]
async fn results_for_completed_model() {
    let (app, store) = test_app();
    let id = create_model(&app).await;
    store.set_status(&id, ModelStatus::Completed).await.unwrap();

    let (status, _, j) = send(&app, get(&format!("/models/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(j["status"], "completed");

    let (status, _, j) = send(&app, get(&format!("/models/{}/results", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(j.as_object().unwrap().len(), 1);
    let results = &j["results"];
    assert_eq!(results.as_object().unwrap().len(), 3);
    assert_eq!(results["cluster_count"], 1);
    assert_eq!(results["total_data_points"], 440);
    let clusters = results["clusters"].as_array().unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].as_object().unwrap().len(), 3);
    assert_eq!(clusters[0]["cluster_label"], 0);
    assert_eq!(clusters[0]["occurrences"], 440);
    assert!(!clusters[0]["members"].as_array().unwrap().is_empty());

    let (_, _, again) = send(&app, get(&format!("/models/{}/results", id))).await;
    assert_eq!(again, j);
}

#[tokio::test]
async fn results_for_incomplete_model_are_bad_request() {
    let (app, store) = test_app();
    let id = create_model(&app).await;

    let (status, _, j) = send(&app, get(&format!("/models/{}/results", id))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&j, "results_not_available");

    store.set_status(&id, ModelStatus::Running).await.unwrap();
    let (_, _, j) = send(&app, get(&format!("/models/{}", id))).await;
    assert_eq!(j["status"], "running");
    let (status, _, j) = send(&app, get(&format!("/models/{}/results", id))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&j, "results_not_available");

    store.set_status(&id, ModelStatus::Failed).await.unwrap();
    let (_, _, j) = send(&app, get(&format!("/models/{}", id))).await;
    assert_eq!(j["status"], "failed");
    let (status, _, j) = send(&app, get(&format!("/models/{}/results", id))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&j, "results_not_available");
}

#[tokio::test]
async fn public_url_overrides_host_in_location() {
    let store: Arc<dyn ModelStore> = Arc::new(InMemoryModelStore::new());
    let config = ServerConfig {
        public_url: Some("https://models.example.com".to_string()),
        ..ServerConfig::default()
    };
    let app = server::router(Arc::new(AppState::from_config(store, &config)));
    let (status, headers, j) = send(&app, post_models(&valid_config())).await;
    assert_eq!(status, StatusCode::CREATED);
    let location = headers.get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(
        location,
        format!("https://models.example.com/models/{}", j["id"].as_str().unwrap())
    );
}

#[tokio::test]
async fn simulated_engine_completes_created_jobs() {
    let store = Arc::new(InMemoryModelStore::with_generator(Arc::new(
        FixedResultGenerator::single_cluster(7),
    )));
    let mut config = ServerConfig {
        simulate_engine: true,
        ..ServerConfig::default()
    };
    config.engine.step = Duration::from_millis(5);
    let app = server::router(Arc::new(AppState::from_config(store.clone(), &config)));
    let id = create_model(&app).await;

    let mut status = String::new();
    for _ in 0..100 {
        let (_, _, j) = send(&app, get(&format!("/models/{}", id))).await;
        status = j["status"].as_str().unwrap_or("").to_string();
        if status == "completed" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(status, "completed");

    let (code, _, j) = send(&app, get(&format!("/models/{}/results", id))).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(j["results"]["total_data_points"], 7);
}

#[tokio::test]
async fn failed_engine_submission_leaves_no_job_behind() {
    let store = Arc::new(InMemoryModelStore::new());
    let state = AppState {
        store: store.clone(),
        engine: Some(SimulatedEngine::disconnected()),
        blocked_hosts: ServerConfig::default().blocked_hosts,
        public_url: None,
    };
    let app = server::router(Arc::new(state));

    let (status, headers, j) = send(&app, post_models(&valid_config())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_error_envelope(&j, "internal_error");
    assert!(headers.get(header::LOCATION).is_none());
    assert!(store.is_empty().await);
}
