use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde_json::json;

use crate::{render, AppState};

pub async fn not_found(State(state): State<AppState>) -> impl IntoResponse {
    render::page_response(&state, StatusCode::NOT_FOUND, "pages/not_found", "404", &json!({}))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Html("ok".to_string()))
}

pub async fn health_db(State(state): State<AppState>) -> impl IntoResponse {
    match state.orders.ping().await {
        Ok(_) => (StatusCode::OK, Html("store: ok".to_string())).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!("store error: {}", e)),
        )
            .into_response(),
    }
}
