//! Library entrypoint for RustStocks.
//!
//! This file exists mainly to make controller tests easy (integration tests
//! under `tests/` can import the app state, routers, controllers, services).

use std::sync::Arc;

pub mod cache;
pub mod config;
pub mod flash;
pub mod models;
pub mod repositories;
pub mod services;

// Views stay at crate root as `crate::render`, `crate::templates`, `crate::pdf`.
#[path = "views/render.rs"]
pub mod render;
#[path = "views/templates.rs"]
pub mod templates;
#[path = "views/pdf.rs"]
pub mod pdf;

pub mod controllers;
pub mod routes;

use repositories::OrdersRepository;
use services::{finnhub::{FinnhubClient, ListedStock}, market_data_service::MarketDataService};

#[derive(Clone)]
pub struct AppState {
    pub hbs: templates::Hbs,
    pub settings: config::Settings,
    pub market_data: MarketDataService,
    pub orders: Arc<dyn OrdersRepository>,
    pub stocks_cache: cache::ExpiringCache<Arc<Vec<ListedStock>>>,
}

impl AppState {
    pub fn new(settings: config::Settings, hbs: templates::Hbs, orders: Arc<dyn OrdersRepository>) -> Self {
        let client = FinnhubClient::with_base_url(
            settings.finnhub_api_key.clone(),
            settings.finnhub_base_url.clone(),
        );

        Self {
            hbs,
            market_data: MarketDataService::new(client),
            orders,
            stocks_cache: cache::ExpiringCache::new(settings.stocks_cache_ttl),
            settings,
        }
    }
}
