mod common;

use common::{listing_body, mount_profile, mount_quote, TEST_KEY};
use ruststocks::services::{
    finnhub::FinnhubClient,
    market_data_service::{MarketDataError, MarketDataService},
};
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn service(server: &MockServer) -> MarketDataService {
    MarketDataService::new(FinnhubClient::with_base_url(TEST_KEY.to_string(), server.uri()))
}

async fn respond(server: &MockServer, endpoint: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn profile_is_decoded() {
    let server = MockServer::start().await;
    mount_profile(&server, "MSFT", "Microsoft Corp").await;

    let profile = service(&server).company_profile("msft").await.unwrap();

    assert_eq!(profile.ticker, "MSFT");
    assert_eq!(profile.name, "Microsoft Corp");
    assert_eq!(profile.finnhub_industry, "Technology");
}

#[tokio::test]
async fn api_key_is_sent_as_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote"))
        .and(query_param("token", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "c": 410.5 })))
        .expect(1)
        .mount(&server)
        .await;

    let quote = service(&server).price_quote("MSFT").await.unwrap();
    assert_eq!(quote.c, 410.5);
}

#[tokio::test]
async fn error_key_means_unavailable() {
    let server = MockServer::start().await;
    respond(&server, "/stock/profile2", 200, json!({ "error": "You don't have access to this resource." })).await;

    let err = service(&server).company_profile("MSFT").await.unwrap_err();
    assert!(matches!(err, MarketDataError::Unavailable(_)));
}

#[tokio::test]
async fn empty_object_means_unavailable() {
    let server = MockServer::start().await;
    respond(&server, "/stock/profile2", 200, json!({})).await;

    let err = service(&server).company_profile("NOPE").await.unwrap_err();
    assert!(matches!(err, MarketDataError::Unavailable(_)));
}

#[tokio::test]
async fn zero_quote_means_unavailable() {
    let server = MockServer::start().await;
    respond(&server, "/quote", 200, json!({ "c": 0, "d": null, "dp": null, "h": 0, "l": 0, "o": 0, "pc": 0, "t": 0 })).await;

    let err = service(&server).price_quote("NOPE").await.unwrap_err();
    assert!(matches!(err, MarketDataError::Unavailable(_)));
}

#[tokio::test]
async fn quote_carries_current_price() {
    let server = MockServer::start().await;
    mount_quote(&server, "AAPL", 189.25).await;

    let quote = service(&server).price_quote("AAPL").await.unwrap();
    assert_eq!(quote.c, 189.25);
    assert_eq!(quote.d, Some(1.5));
}

#[tokio::test]
async fn server_error_means_unavailable() {
    let server = MockServer::start().await;
    respond(&server, "/quote", 500, json!({ "error": "boom" })).await;

    let err = service(&server).price_quote("MSFT").await.unwrap_err();
    assert!(matches!(err, MarketDataError::Unavailable(_)));
}

#[tokio::test]
async fn missing_key_fails_without_calling_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "c": 1.0 })))
        .expect(0)
        .mount(&server)
        .await;

    let svc = MarketDataService::new(FinnhubClient::with_base_url(String::new(), server.uri()));
    let blank = MarketDataService::new(FinnhubClient::with_base_url("  ".to_string(), server.uri()));

    assert!(matches!(svc.price_quote("MSFT").await, Err(MarketDataError::MissingApiKey)));
    assert!(matches!(svc.stocks().await, Err(MarketDataError::MissingApiKey)));
    assert!(matches!(blank.company_profile("MSFT").await, Err(MarketDataError::MissingApiKey)));
}

#[tokio::test]
async fn blank_symbol_is_rejected() {
    let server = MockServer::start().await;

    let err = service(&server).company_profile("  ").await.unwrap_err();
    assert!(matches!(err, MarketDataError::MissingSymbol));
}

#[tokio::test]
async fn listing_skips_entries_without_symbol() {
    let server = MockServer::start().await;
    let mut body = listing_body();
    if let Some(items) = body.as_array_mut() {
        items.push(json!({ "description": "NO SYMBOL" }));
        items.push(json!({ "description": "BLANK", "symbol": "  " }));
    }
    Mock::given(method("GET"))
        .and(path("/stock/symbol"))
        .and(query_param("exchange", "US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let stocks = service(&server).stocks().await.unwrap();

    assert_eq!(stocks.len(), 4);
    assert!(stocks.iter().any(|s| s.symbol == "MSFT" && s.description == "MICROSOFT CORP"));
}

#[tokio::test]
async fn empty_listing_means_unavailable() {
    let server = MockServer::start().await;
    respond(&server, "/stock/symbol", 200, json!([])).await;

    let err = service(&server).stocks().await.unwrap_err();
    assert!(matches!(err, MarketDataError::Unavailable(_)));
}

#[tokio::test]
async fn single_entry_listing_is_accepted() {
    let server = MockServer::start().await;
    respond(
        &server,
        "/stock/symbol",
        200,
        json!([{ "description": "MICROSOFT CORP", "displaySymbol": "MSFT", "symbol": "MSFT", "type": "Common Stock" }]),
    )
    .await;

    let stocks = service(&server).stocks().await.unwrap();
    assert_eq!(stocks.len(), 1);
    assert_eq!(stocks[0].symbol, "MSFT");
}

#[tokio::test]
async fn error_shaped_listing_means_unavailable() {
    let server = MockServer::start().await;
    respond(&server, "/stock/symbol", 200, json!({ "error": "Invalid API key" })).await;

    let err = service(&server).stocks().await.unwrap_err();
    assert!(matches!(err, MarketDataError::Unavailable(_)));
}

#[tokio::test]
async fn search_returns_matches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "apple"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "result": [{ "description": "APPLE INC", "displaySymbol": "AAPL", "symbol": "AAPL", "type": "Common Stock" }]
        })))
        .mount(&server)
        .await;

    let res = service(&server).search(" apple ").await.unwrap();

    assert_eq!(res.count, 1);
    assert_eq!(res.result[0].symbol, "AAPL");
}
