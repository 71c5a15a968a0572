use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

#[derive(Debug, Error)]
pub enum FinnhubError {
    #[error("Finnhub request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Finnhub {endpoint} failed: {status} {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },
}

/// Thin REST client. Returns the decoded JSON as-is; shape checks live in
/// `market_data_service`.
#[derive(Clone)]
pub struct FinnhubClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl FinnhubClient {
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn get_json(&self, endpoint: &'static str, path: &str, query: &[(&str, &str)]) -> Result<Value, FinnhubError> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("token", self.api_key.as_str())])
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            error!(endpoint, %status, "Finnhub returned non-success status");
            return Err(FinnhubError::Status { endpoint, status, body });
        }

        let value = res.json::<Value>().await?;
        debug!(endpoint, "Finnhub response decoded");
        Ok(value)
    }

    pub async fn company_profile(&self, symbol: &str) -> Result<Value, FinnhubError> {
        self.get_json("profile", "/stock/profile2", &[("symbol", symbol)]).await
    }

    pub async fn quote(&self, symbol: &str) -> Result<Value, FinnhubError> {
        self.get_json("quote", "/quote", &[("symbol", symbol)]).await
    }

    pub async fn stock_symbols(&self, exchange: &str) -> Result<Value, FinnhubError> {
        self.get_json("symbols", "/stock/symbol", &[("exchange", exchange)]).await
    }

    pub async fn search(&self, q: &str) -> Result<Value, FinnhubError> {
        self.get_json("search", "/search", &[("q", q)]).await
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default, rename = "finnhubIndustry")]
    pub finnhub_industry: String,
    #[serde(default)]
    pub ipo: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default, rename = "marketCapitalization")]
    pub market_capitalization: f64,
    pub name: String,
    pub ticker: String,
    #[serde(default)]
    pub weburl: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteResponse {
    // current
    pub c: f64,
    // change
    #[serde(default)]
    pub d: Option<f64>,
    // percent change
    #[serde(default)]
    pub dp: Option<f64>,
    // high
    #[serde(default)]
    pub h: f64,
    // low
    #[serde(default)]
    pub l: f64,
    // open
    #[serde(default)]
    pub o: f64,
    // previous close
    #[serde(default)]
    pub pc: f64,
    // timestamp
    #[serde(default)]
    pub t: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListedStock {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub description: String,

    #[serde(default, rename = "displaySymbol")]
    pub display_symbol: String,

    pub symbol: String,

    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub count: i64,
    pub result: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchItem {
    pub description: String,

    #[serde(rename = "displaySymbol")]
    pub display_symbol: String,

    pub symbol: String,

    #[serde(rename = "type")]
    pub kind: String,
}
