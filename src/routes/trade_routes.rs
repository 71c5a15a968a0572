use axum::{Router, routing::{get, post}};
use crate::{AppState, controllers::trade_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/trade/index", get(trade_controller::get_index))
        .route("/trade/index/:symbol", get(trade_controller::get_index_symbol))
        .route("/trade/buy-order", post(trade_controller::post_buy_order))
        .route("/trade/sell-order", post(trade_controller::post_sell_order))
        .route("/trade/orders", get(trade_controller::get_orders))
        .route("/trade/orders/pdf", get(trade_controller::get_orders_pdf))
}
