use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{AppState, controllers::home_controller};

pub mod home_routes;
pub mod stocks_routes;
pub mod trade_routes;

pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = trade_routes::add_routes(router);
    let router = stocks_routes::add_routes(router);

    router
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(home_controller::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
