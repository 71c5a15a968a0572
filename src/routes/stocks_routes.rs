use axum::{Router, routing::get};
use crate::{AppState, controllers::stocks_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/stocks/explore", get(stocks_controller::get_explore))
        .route("/stocks/explore/:symbol", get(stocks_controller::get_explore_symbol))
        .route("/stocks/search", get(stocks_controller::get_search))
}
