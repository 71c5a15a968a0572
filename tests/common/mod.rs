#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use http_body_util::BodyExt;
use parking_lot::Mutex;
use ruststocks::{
    config::{Settings, TradingOptions},
    models::{Order, OrderSide},
    repositories::{OrdersRepository, RepositoryError},
    templates, AppState,
};
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_KEY: &str = "test-key";

/// Keeps orders in memory; can be switched to fail every call.
#[derive(Default)]
pub struct InMemoryOrders {
    pub buy: Mutex<Vec<Order>>,
    pub sell: Mutex<Vec<Order>>,
    pub failing: bool,
}

impl InMemoryOrders {
    pub fn failing() -> Self {
        Self { failing: true, ..Default::default() }
    }

    fn side(&self, side: OrderSide) -> &Mutex<Vec<Order>> {
        match side {
            OrderSide::Buy => &self.buy,
            OrderSide::Sell => &self.sell,
        }
    }

    pub fn count(&self, side: OrderSide) -> usize {
        self.side(side).lock().len()
    }
}

#[async_trait]
impl OrdersRepository for InMemoryOrders {
    async fn create_order(&self, side: OrderSide, order: Order) -> Result<Order, RepositoryError> {
        if self.failing {
            return Err(RepositoryError::Unavailable("store is down".to_string()));
        }
        self.side(side).lock().push(order.clone());
        Ok(order)
    }

    async fn list_orders(&self, side: OrderSide) -> Result<Vec<Order>, RepositoryError> {
        if self.failing {
            return Err(RepositoryError::Unavailable("store is down".to_string()));
        }
        let mut orders = self.side(side).lock().clone();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        if self.failing {
            return Err(RepositoryError::Unavailable("store is down".to_string()));
        }
        Ok(())
    }
}

pub fn test_settings(base_url: &str) -> Settings {
    Settings {
        mongodb_uri: "mongodb://localhost:27017".to_string(),
        mongodb_db: "stocks_test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        finnhub_api_key: TEST_KEY.to_string(),
        finnhub_base_url: base_url.to_string(),
        stocks_cache_ttl: Duration::from_secs(300),
        trading: TradingOptions {
            default_stock_symbol: "MSFT".to_string(),
            default_order_quantity: 100,
            popular_stocks: vec!["MSFT".to_string(), "AAPL".to_string(), "TSLA".to_string()],
        },
    }
}

pub fn test_state_with(settings: Settings, orders: Arc<InMemoryOrders>) -> AppState {
    let hbs = templates::build_handlebars().unwrap();
    AppState::new(settings, hbs, orders)
}

pub fn test_state(server: &MockServer, orders: Arc<InMemoryOrders>) -> AppState {
    test_state_with(test_settings(&server.uri()), orders)
}

pub async fn response_body_string(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

pub async fn mount_profile(server: &MockServer, symbol: &str, name: &str) {
    Mock::given(method("GET"))
        .and(path("/stock/profile2"))
        .and(query_param("symbol", symbol))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "country": "US",
            "currency": "USD",
            "exchange": "NASDAQ NMS - GLOBAL MARKET",
            "finnhubIndustry": "Technology",
            "ipo": "1986-03-13",
            "logo": format!("https://static.finnhub.io/logo/{symbol}.png"),
            "marketCapitalization": 3000000.0,
            "name": name,
            "ticker": symbol,
            "weburl": "https://example.com/"
        })))
        .mount(server)
        .await;
}

pub async fn mount_quote(server: &MockServer, symbol: &str, current: f64) {
    Mock::given(method("GET"))
        .and(path("/quote"))
        .and(query_param("symbol", symbol))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "c": current,
            "d": 1.5,
            "dp": 0.37,
            "h": current + 2.0,
            "l": current - 2.0,
            "o": current - 1.0,
            "pc": current - 1.5,
            "t": 1_700_000_000
        })))
        .mount(server)
        .await;
}

pub fn listing_body() -> serde_json::Value {
    json!([
        { "currency": "USD", "description": "TESLA INC", "displaySymbol": "TSLA", "symbol": "TSLA", "type": "Common Stock" },
        { "currency": "USD", "description": "ACME CORP", "displaySymbol": "ACME", "symbol": "ACME", "type": "Common Stock" },
        { "currency": "USD", "description": "MICROSOFT CORP", "displaySymbol": "MSFT", "symbol": "MSFT", "type": "Common Stock" },
        { "currency": "USD", "description": "APPLE INC", "displaySymbol": "AAPL", "symbol": "AAPL", "type": "Common Stock" }
    ])
}
