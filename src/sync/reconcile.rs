use anyhow::{Context, Result};
use chrono::Local;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::models::QuoteRecord;
use crate::store::{RecordStore, props};

pub const SYMBOL_PROPERTY: &str = "Stock Symbol";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Exact-match lookup on the symbol title property. Callers uppercase
/// and trim before calling; no fuzzy matching happens here.
pub async fn find_stock_record(
    store: &dyn RecordStore,
    database_id: &str,
    symbol: &str,
) -> Result<Option<String>> {
    let records = store
        .query_by_title(database_id, SYMBOL_PROPERTY, symbol)
        .await?;
    Ok(records.into_iter().next().map(|record| record.id().clone()))
}

/// Upserts a quote into the tracked-stock database: update on a match,
/// create otherwise. Last write wins; there is no conflict detection.
/// A brand-new symbol also gets a zero-share position seeded into the
/// portfolio database when one is configured.
pub async fn upsert_quote(
    store: &dyn RecordStore,
    stock_database_id: &str,
    portfolio_database_id: Option<&str>,
    quote: &QuoteRecord,
) -> Result<UpsertOutcome> {
    let properties = stock_properties(quote);

    match find_stock_record(store, stock_database_id, quote.symbol()).await? {
        Some(record_id) => {
            store
                .update_record(&record_id, properties)
                .await
                .with_context(|| format!("Failed to update {}", quote.symbol()))?;
            info!(symbol = %quote.symbol(), "updated tracked stock");
            Ok(UpsertOutcome::Updated)
        }
        None => {
            store
                .create_record(stock_database_id, properties)
                .await
                .with_context(|| format!("Failed to create entry for {}", quote.symbol()))?;
            info!(symbol = %quote.symbol(), "created tracked stock");

            if let Some(portfolio_db) = portfolio_database_id {
                seed_position(store, portfolio_db, quote).await;
            }

            Ok(UpsertOutcome::Created)
        }
    }
}

/// Best-effort side write; failure is logged and never fails the add.
async fn seed_position(store: &dyn RecordStore, database_id: &str, quote: &QuoteRecord) {
    if let Err(err) = store
        .create_record(database_id, position_properties(quote))
        .await
    {
        warn!(symbol = %quote.symbol(), "failed to seed portfolio position: {:#}", err);
    }
}

fn stock_properties(quote: &QuoteRecord) -> Value {
    json!({
        "Stock Symbol": props::title(quote.symbol()),
        "Company Name": props::rich_text(quote.company_name()),
        "Current Price": props::number(*quote.current_price()),
        "Prev Close": props::number(*quote.previous_close()),
        "Price Change": props::number(*quote.price_change()),
        "Change Percentage": props::number(*quote.percent_change()),
        "Volume": props::number(*quote.volume()),
        "Market Cap": props::number(*quote.market_cap()),
        "52-Week High/Low": props::rich_text(&format!(
            "${:.2} / ${:.2}",
            quote.fifty_two_week_high(),
            quote.fifty_two_week_low()
        )),
        "Exchange": props::select(quote.exchange()),
        "Last Updated": props::date(&quote.last_updated().format("%Y-%m-%d").to_string()),
    })
}

fn position_properties(quote: &QuoteRecord) -> Value {
    json!({
        "Stock Symbol": props::title(quote.symbol()),
        "Date": props::date(&Local::now().format("%Y-%m-%d").to_string()),
        "Price": props::number(*quote.current_price()),
        "Shares Owned": props::number(Decimal::ZERO),
        "Total Value": props::number(Decimal::ZERO),
    })
}
