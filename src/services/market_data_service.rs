//! Business-level checks on top of [`FinnhubClient`].
//!
//! Finnhub reports failures in several shapes: a non-2xx status, an empty JSON
//! object, an object carrying an `error` key, or (for quotes) a zero current
//! price. All of them come out of this module as
//! [`MarketDataError::Unavailable`] so callers never see partial data.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, info};

use super::finnhub::{CompanyProfile, FinnhubClient, ListedStock, QuoteResponse, SearchResponse};

pub const LISTING_EXCHANGE: &str = "US";

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("FINNHUB_API_KEY is missing")]
    MissingApiKey,

    #[error("stock symbol is missing")]
    MissingSymbol,

    #[error("market data unavailable: {0}")]
    Unavailable(String),
}

#[derive(Clone)]
pub struct MarketDataService {
    client: FinnhubClient,
}

fn unavailable(op: &'static str, reason: impl Into<String>) -> MarketDataError {
    let reason = reason.into();
    error!(op, %reason, "market data unavailable");
    MarketDataError::Unavailable(reason)
}

fn expect_object(op: &'static str, value: Value) -> Result<Map<String, Value>, MarketDataError> {
    match value {
        Value::Object(map) if map.is_empty() => Err(unavailable(op, "empty response")),
        Value::Object(map) => match map.get("error") {
            Some(e) => Err(unavailable(op, format!("upstream error: {e}"))),
            None => Ok(map),
        },
        _ => Err(unavailable(op, "unexpected response shape")),
    }
}

fn decode<T: DeserializeOwned>(op: &'static str, map: Map<String, Value>) -> Result<T, MarketDataError> {
    serde_json::from_value(Value::Object(map)).map_err(|e| unavailable(op, format!("malformed response: {e}")))
}

impl MarketDataService {
    pub fn new(client: FinnhubClient) -> Self {
        Self { client }
    }

    fn require_key(&self) -> Result<(), MarketDataError> {
        if self.client.has_key() {
            Ok(())
        } else {
            error!("no Finnhub API key configured");
            Err(MarketDataError::MissingApiKey)
        }
    }

    fn normalize_symbol(symbol: &str) -> Result<String, MarketDataError> {
        let sym = symbol.trim().to_uppercase();
        if sym.is_empty() {
            return Err(MarketDataError::MissingSymbol);
        }
        Ok(sym)
    }

    pub async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile, MarketDataError> {
        info!(symbol, "market data: company profile");
        self.require_key()?;
        let sym = Self::normalize_symbol(symbol)?;

        let raw = self
            .client
            .company_profile(&sym)
            .await
            .map_err(|e| unavailable("profile", e.to_string()))?;

        let profile: CompanyProfile = decode("profile", expect_object("profile", raw)?)?;
        debug!(?profile, "market data: company profile loaded");
        Ok(profile)
    }

    pub async fn price_quote(&self, symbol: &str) -> Result<QuoteResponse, MarketDataError> {
        info!(symbol, "market data: price quote");
        self.require_key()?;
        let sym = Self::normalize_symbol(symbol)?;

        let raw = self
            .client
            .quote(&sym)
            .await
            .map_err(|e| unavailable("quote", e.to_string()))?;

        let map = expect_object("quote", raw)?;

        // Finnhub answers unknown symbols with an all-zero quote.
        match map.get("c").and_then(Value::as_f64) {
            Some(c) if c != 0.0 => {}
            _ => return Err(unavailable("quote", "no current price")),
        }

        let quote: QuoteResponse = decode("quote", map)?;
        debug!(?quote, "market data: price quote loaded");
        Ok(quote)
    }

    /// Every symbol listed on the US exchanges.
    pub async fn stocks(&self) -> Result<Vec<ListedStock>, MarketDataError> {
        info!("market data: stock listing");
        self.require_key()?;

        let raw = self
            .client
            .stock_symbols(LISTING_EXCHANGE)
            .await
            .map_err(|e| unavailable("symbols", e.to_string()))?;

        let items = match raw {
            Value::Array(items) => items,
            other => {
                expect_object("symbols", other)?;
                return Err(unavailable("symbols", "unexpected response shape"));
            }
        };

        let total = items.len();
        let stocks: Vec<ListedStock> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<ListedStock>(item).ok())
            .filter(|s| !s.symbol.trim().is_empty())
            .collect();

        if stocks.is_empty() {
            return Err(unavailable("symbols", "empty listing"));
        }

        debug!(total, kept = stocks.len(), "market data: stock listing loaded");
        Ok(stocks)
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse, MarketDataError> {
        info!(query, "market data: search");
        self.require_key()?;

        let q = query.trim();
        if q.is_empty() {
            return Err(MarketDataError::MissingSymbol);
        }

        let raw = self
            .client
            .search(q)
            .await
            .map_err(|e| unavailable("search", e.to_string()))?;

        let results: SearchResponse = decode("search", expect_object("search", raw)?)?;
        debug!(count = results.count, "market data: search loaded");
        Ok(results)
    }
}
