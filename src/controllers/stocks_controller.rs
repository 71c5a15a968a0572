use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::{render, services::stocks_service, AppState};

pub const LISTING_ERROR: &str = "Error while fetching stocks from Finnhub, please try again";
pub const SELECTED_ERROR: &str = "Error while loading the selected stock";
pub const NO_POPULAR_ERROR: &str = "No popular stocks are configured";

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

async fn render_explore(state: AppState, selected: Option<String>) -> Response {
    let mut errors: Vec<String> = vec![];

    let stocks = if state.settings.trading.popular_stocks.is_empty() {
        errors.push(NO_POPULAR_ERROR.to_string());
        vec![]
    } else {
        match stocks_service::popular_stocks(&state).await {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "explore listing degraded");
                errors.push(LISTING_ERROR.to_string());
                vec![]
            }
        }
    };

    let selected_symbol = selected
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty());

    let selected_ctx = match &selected_symbol {
        Some(sym) => match stocks_service::selected_stock(&state, sym).await {
            Ok(card) => json!(card),
            Err(e) => {
                warn!(symbol = %sym, error = %e, "selected stock degraded");
                errors.push(SELECTED_ERROR.to_string());
                serde_json::Value::Null
            }
        },
        None => serde_json::Value::Null,
    };

    let ctx = json!({
        "stocks": stocks,
        "selected_symbol": selected_symbol,
        "selected": selected_ctx,
        "errors": errors,
    });

    render::page_response(&state, StatusCode::OK, "pages/explore", "Explore", &ctx)
}

// GET /stocks/explore
pub async fn get_explore(State(state): State<AppState>) -> Response {
    render_explore(state, None).await
}

// GET /stocks/explore/:symbol
pub async fn get_explore_symbol(State(state): State<AppState>, Path(symbol): Path<String>) -> Response {
    render_explore(state, Some(symbol)).await
}

// GET /stocks/search?q=
pub async fn get_search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    let q = query.q.unwrap_or_default().trim().to_string();

    let data = stocks_service::search_results_ctx(&state, &q).await;

    render::page_response(&state, StatusCode::OK, "pages/search", "Search", &data)
}
