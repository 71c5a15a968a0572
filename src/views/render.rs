use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;

pub fn render_full(state: &AppState, title: &str, body_html: String) -> Result<String, String> {
    let ctx = json!({
        "title": title,
        "body": body_html,
    });

    state
        .hbs
        .render("layouts/base", &ctx)
        .map_err(|e| e.to_string())
}

/// Renders `template` with `ctx` inside the base layout.
pub fn render_page(state: &AppState, template: &str, title: &str, ctx: &serde_json::Value) -> Result<String, String> {
    let body = state.hbs.render(template, ctx).map_err(|e| e.to_string())?;
    render_full(state, title, body)
}

pub fn page_response(state: &AppState, status: StatusCode, template: &str, title: &str, ctx: &serde_json::Value) -> Response {
    match render_page(state, template, title, ctx) {
        Ok(page) => (status, Html(page)).into_response(),
        Err(e) => {
            tracing::error!(template, error = %e, "template error");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("template error: {e}"))).into_response()
        }
    }
}
