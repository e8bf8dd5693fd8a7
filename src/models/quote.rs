use chrono::{DateTime, Local};
use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;

/// Canonical quote produced by one fetch, merged into the tracked-stock
/// database and then discarded. Prices are non-negative; when
/// `previous_close` is zero both change fields are exactly zero.
#[derive(Clone, Debug, Getters, new)]
pub struct QuoteRecord {
    symbol: String,
    company_name: String,
    current_price: Decimal,
    previous_close: Decimal,
    price_change: Decimal,
    percent_change: Decimal,
    volume: Decimal,
    market_cap: Decimal,
    fifty_two_week_high: Decimal,
    fifty_two_week_low: Decimal,
    exchange: String,
    last_updated: DateTime<Local>,
}
