use std::{env, time::Duration};

use thiserror::Error;

use crate::services::finnhub::DEFAULT_BASE_URL;

const DEFAULT_POPULAR_STOCKS: &[&str] = &[
    "AAPL", "MSFT", "AMZN", "TSLA", "GOOGL", "GOOG", "NVDA", "BRK.B", "META", "UNH",
    "JNJ", "JPM", "V", "PG", "XOM", "HD", "CVX", "MA", "BAC", "ABBV",
    "PFE", "AVGO", "COST", "DIS", "KO",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("FINNHUB_API_KEY is missing; set it in the environment or .env")]
    MissingApiKey,
    #[error("trading options are incomplete: {0}")]
    TradingOptions(&'static str),
}

/// Options that drive the trade and explore pages.
#[derive(Debug, Clone)]
pub struct TradingOptions {
    pub default_stock_symbol: String,
    pub default_order_quantity: u32,
    pub popular_stocks: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub finnhub_api_key: String,
    pub finnhub_base_url: String,
    pub stocks_cache_ttl: Duration,

    pub trading: TradingOptions,
}

impl Settings {
    /// Startup checks. A missing API key cannot be recovered from at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.finnhub_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.trading.default_stock_symbol.trim().is_empty() {
            return Err(ConfigError::TradingOptions("default stock symbol is empty"));
        }
        if self.trading.popular_stocks.is_empty() {
            return Err(ConfigError::TradingOptions("popular stocks list is empty"));
        }
        Ok(())
    }
}

fn parse_symbol_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB")
        .unwrap_or_else(|_| "stocks".to_string());

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let finnhub_api_key = env::var("FINNHUB_API_KEY").unwrap_or_default();
    let finnhub_base_url = env::var("FINNHUB_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let stocks_cache_ttl = env::var("STOCKS_CACHE_TTL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(5 * 60));

    let default_stock_symbol = env::var("DEFAULT_STOCK_SYMBOL")
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_else(|_| "MSFT".to_string());

    let default_order_quantity = env::var("DEFAULT_ORDER_QUANTITY")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(100);

    let popular_stocks = env::var("POPULAR_STOCKS")
        .map(|raw| parse_symbol_list(&raw))
        .unwrap_or_else(|_| DEFAULT_POPULAR_STOCKS.iter().map(|s| s.to_string()).collect());

    Settings {
        mongodb_uri,
        mongodb_db,
        host,
        port,
        finnhub_api_key,
        finnhub_base_url,
        stocks_cache_ttl,
        trading: TradingOptions {
            default_stock_symbol,
            default_order_quantity,
            popular_stocks,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_list_is_trimmed_and_uppercased() {
        assert_eq!(parse_symbol_list(" aapl, msft ,,tsla"), vec!["AAPL", "MSFT", "TSLA"]);
    }

    #[test]
    fn validate_rejects_blank_api_key() {
        let mut settings = load();
        settings.finnhub_api_key = "   ".to_string();
        assert!(matches!(settings.validate(), Err(ConfigError::MissingApiKey)));

        settings.finnhub_api_key = "key".to_string();
        settings.trading.popular_stocks.clear();
        assert!(matches!(settings.validate(), Err(ConfigError::TradingOptions(_))));
    }
}
