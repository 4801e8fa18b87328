//! REST API handlers for the demo server.
//!
//! Exposes the form catalog, the states options endpoint, and a validated
//! submission endpoint backed by the in-memory store.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::adapters::static_options::US_STATES;
use crate::adapters::submission_store::InMemorySubmissionStore;
use crate::config::Settings;
use crate::domain::validation::validate;
use crate::domain::value::ValueMap;
use crate::domain::SubmissionSink;

/// Shared application state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub settings: Arc<RwLock<Settings>>,
    pub store: InMemorySubmissionStore,
}

/// GET /api/forms returns the full form catalog.
pub async fn list_forms(State(state): State<ApiState>) -> impl IntoResponse {
    let settings = state.settings.read().await;
    Json(settings.forms.clone())
}

/// GET /api/forms/:form_id returns one schema, or 404 for an unknown identifier.
pub async fn get_form(
    State(state): State<ApiState>,
    Path(form_id): Path<String>,
) -> impl IntoResponse {
    let settings = state.settings.read().await;
    match settings.find_form(&form_id) {
        Some(schema) => (StatusCode::OK, Json(json!(schema))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Unknown form: {}", form_id) })),
        ),
    }
}

/// GET /api/options/states?country=... backs the dependent-options demo
/// endpoint. USA has states; everywhere else gets an empty list.
pub async fn state_options(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let country = params.get("country").map(String::as_str).unwrap_or("USA");
    let states: Vec<String> = if country == "USA" {
        US_STATES.iter().map(|s| s.to_string()).collect()
    } else {
        Vec::new()
    };
    Json(states)
}

/// POST /api/forms/:form_id/submissions validates a value map server-side
/// and stores it when clean. Absent keys are treated as empty values.
pub async fn submit_form(
    State(state): State<ApiState>,
    Path(form_id): Path<String>,
    Json(payload): Json<ValueMap>,
) -> impl IntoResponse {
    let settings = state.settings.read().await;
    let Some(schema) = settings.find_form(&form_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Unknown form: {}", form_id) })),
        );
    };

    // Seed then overlay so validation sees an entry for every leaf.
    let mut values = schema.seed_values();
    values.extend(payload);

    let errors = validate(schema, &values);
    if !errors.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "success": false, "errors": errors })),
        );
    }

    let form_id = schema.form_id.clone();
    drop(settings);

    match state.store.submit(&form_id, values).await {
        Ok(receipt) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "data": receipt })),
        ),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "error": err.to_string() })),
        ),
    }
}

/// GET /api/submissions lists all accepted submissions, oldest first.
pub async fn list_submissions(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.store.list().await)
}

/// GET /health liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
