use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stock_notion_sync::api::YahooApi;
use stock_notion_sync::config::Config;
use stock_notion_sync::store::NotionStore;
use stock_notion_sync::sync::StockSync;

const STOCK_DB: &str = "stock-db";
const PORTFOLIO_DB: &str = "portfolio-db";

fn service(notion: &MockServer, yahoo: &MockServer, portfolio: bool) -> StockSync {
    let config = Config::new(
        "secret-token".to_string(),
        STOCK_DB.to_string(),
        portfolio.then(|| PORTFOLIO_DB.to_string()),
        false,
        5000,
        "static".to_string(),
    );
    let store = Arc::new(NotionStore::with_base_url(
        &notion.uri(),
        "secret-token".to_string(),
    ));
    let market = YahooApi::with_base_url(&yahoo.uri()).unwrap();
    StockSync::new(store, market, &config).with_pacing(Duration::ZERO)
}

fn chart_payload(price: f64, previous_close: f64) -> Value {
    json!({
        "chart": {
            "result": [{
                "meta": {
                    "regularMarketPrice": price,
                    "previousClose": previous_close,
                    "longName": "XYZ Corporation",
                    "exchangeName": "NMS"
                }
            }],
            "error": null
        }
    })
}

#[tokio::test]
async fn adding_a_new_symbol_creates_stock_and_position_records() {
    let notion = MockServer::start().await;
    let yahoo = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/XYZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_payload(42.50, 40.00)))
        .mount(&yahoo)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/databases/{}/query", STOCK_DB)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&notion)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/pages"))
        .and(body_partial_json(
            json!({ "parent": { "database_id": STOCK_DB } }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "page-1" })))
        .expect(1)
        .mount(&notion)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/pages"))
        .and(body_partial_json(
            json!({ "parent": { "database_id": PORTFOLIO_DB } }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "page-2" })))
        .expect(1)
        .mount(&notion)
        .await;

    service(&notion, &yahoo, true)
        .add_stock("XYZ")
        .await
        .unwrap();
}

#[tokio::test]
async fn updating_an_existing_symbol_overwrites_its_record() {
    let notion = MockServer::start().await;
    let yahoo = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/XYZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_payload(42.50, 40.00)))
        .mount(&yahoo)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/databases/{}/query", STOCK_DB)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": "page-9", "properties": {} }]
        })))
        .mount(&notion)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/v1/pages/page-9"))
        .and(body_partial_json(json!({
            "properties": { "Current Price": { "number": 42.5 } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "page-9" })))
        .expect(1)
        .mount(&notion)
        .await;

    let outcome = service(&notion, &yahoo, true)
        .update_stocks(Some(vec!["XYZ".to_string()]))
        .await;

    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.failed, 0);
}

#[tokio::test]
async fn a_failed_fetch_skips_the_symbol_and_continues() {
    let notion = MockServer::start().await;
    let yahoo = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/BAD"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&yahoo)
        .await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/GOOD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_payload(10.0, 9.0)))
        .mount(&yahoo)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/databases/{}/query", STOCK_DB)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&notion)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/pages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "page-1" })))
        .expect(1)
        .mount(&notion)
        .await;

    let outcome = service(&notion, &yahoo, false)
        .update_stocks(Some(vec!["BAD".to_string(), "GOOD".to_string()]))
        .await;

    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.failed, 1);
}

#[tokio::test]
async fn snapshot_appends_a_dated_record() {
    let notion = MockServer::start().await;
    let yahoo = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/databases/{}/query", PORTFOLIO_DB)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&notion)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/pages"))
        .and(body_partial_json(json!({
            "parent": { "database_id": PORTFOLIO_DB },
            "properties": { "Positions": { "number": 0.0 } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "snap-1" })))
        .expect(1)
        .mount(&notion)
        .await;

    service(&notion, &yahoo, true)
        .create_snapshot()
        .await
        .unwrap();
}
