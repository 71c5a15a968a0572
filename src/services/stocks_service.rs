use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use tracing::warn;

use crate::{
    models::{SelectedStock, StockListItem, StockTrade},
    AppState,
};

use super::{finnhub::ListedStock, market_data_service::MarketDataError};

pub const STOCKS_CACHE_KEY: &str = "stocks:US";

/// Exchange listing, served from the cache for `stocks_cache_ttl` after each fetch.
pub async fn listed_stocks_cached(state: &AppState) -> Result<Arc<Vec<ListedStock>>, MarketDataError> {
    state
        .stocks_cache
        .get_or_try_insert_with(STOCKS_CACHE_KEY, || async {
            state.market_data.stocks().await.map(Arc::new)
        })
        .await
}

/// Listing entries whose symbol is on the configured popular list, in list order.
pub async fn popular_stocks(state: &AppState) -> Result<Vec<StockListItem>, MarketDataError> {
    let listing = listed_stocks_cached(state).await?;
    let popular = &state.settings.trading.popular_stocks;

    let mut items: Vec<(usize, StockListItem)> = listing
        .iter()
        .filter_map(|s| {
            let rank = popular.iter().position(|p| *p == s.symbol)?;
            Some((
                rank,
                StockListItem {
                    stock_symbol: s.symbol.clone(),
                    stock_name: s.description.clone(),
                },
            ))
        })
        .collect();

    items.sort_by_key(|(rank, _)| *rank);
    items.dedup_by(|a, b| a.0 == b.0);
    Ok(items.into_iter().map(|(_, item)| item).collect())
}

/// Profile and quote for the explore page's detail card. A profile without
/// logo, name, industry or exchange counts as unavailable.
pub async fn selected_stock(state: &AppState, symbol: &str) -> Result<SelectedStock, MarketDataError> {
    let profile = state.market_data.company_profile(symbol).await?;

    let missing: Vec<&str> = [
        ("logo", &profile.logo),
        ("name", &profile.name),
        ("finnhubIndustry", &profile.finnhub_industry),
        ("exchange", &profile.exchange),
    ]
    .into_iter()
    .filter(|(_, v)| v.trim().is_empty())
    .map(|(k, _)| k)
    .collect();
    if !missing.is_empty() {
        warn!(symbol, ?missing, "company profile is incomplete");
        return Err(MarketDataError::Unavailable(format!("profile is missing {}", missing.join(", "))));
    }

    let quote = state.market_data.price_quote(symbol).await?;

    Ok(SelectedStock {
        symbol: symbol.trim().to_uppercase(),
        logo: profile.logo,
        name: profile.name,
        industry: profile.finnhub_industry,
        exchange: profile.exchange,
        price: quote.c,
    })
}

/// Prefilled trade form. Profile and quote are fetched one after the other and
/// may reflect slightly different market moments.
pub async fn stock_trade(state: &AppState, symbol: &str) -> Result<StockTrade, MarketDataError> {
    let profile = state.market_data.company_profile(symbol).await?;
    let quote = state.market_data.price_quote(symbol).await?;

    let price = Decimal::try_from(quote.c)
        .map(|p| p.round_dp(2))
        .map_err(|_| MarketDataError::Unavailable(format!("price {} is not representable", quote.c)))?;

    Ok(StockTrade {
        stock_symbol: profile.ticker,
        stock_name: profile.name,
        price,
        quantity: state.settings.trading.default_order_quantity,
    })
}

/// Build the context used by the `partials/search_results` template.
///
/// - empty query => no results, no error
/// - non-empty query => Finnhub search, drop empty symbols, limit 10
/// - any failure => generic error string
pub async fn search_results_ctx(state: &AppState, query: &str) -> serde_json::Value {
    let q = query.trim().to_string();

    if q.is_empty() {
        return json!({
            "query": "",
            "results": serde_json::Value::Null,
            "error": serde_json::Value::Null
        });
    }

    match state.market_data.search(&q).await {
        Ok(resp) => {
            let results: Vec<_> = resp
                .result
                .into_iter()
                .filter(|it| !it.symbol.trim().is_empty())
                .take(10)
                .map(|it| {
                    json!({
                        "symbol": it.symbol,
                        "display_symbol": it.display_symbol,
                        "description": it.description,
                        "type": it.kind
                    })
                })
                .collect();

            let results_val = if results.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::Value::Array(results)
            };

            json!({
                "query": q,
                "results": results_val,
                "error": serde_json::Value::Null
            })
        }
        Err(err) => {
            warn!(query = %q, error = %err, "search degraded");
            json!({
                "query": q,
                "results": serde_json::Value::Null,
                "error": "Search unavailable right now."
            })
        }
    }
}
