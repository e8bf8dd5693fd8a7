use chrono::{DateTime, Local};
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rust_decimal_macros::dec;

use crate::api::yahoo_dto::ChartResultDto;
use crate::models::QuoteRecord;

/// Converts a raw chart payload into a canonical quote. Upstream
/// payload completeness varies by symbol and exchange, so every field
/// goes through a fallback chain; the previous-close cascade in
/// particular must keep its precedence (historical series, then meta
/// fields, then current price) or derived gain/loss shifts for thinly
/// traded symbols.
pub fn normalize_quote(
    symbol: &str,
    chart: &ChartResultDto,
    fetched_at: DateTime<Local>,
) -> QuoteRecord {
    let meta = chart.meta();

    let mut current_price = non_negative(*meta.regular_market_price());
    if current_price.is_zero() {
        current_price = non_negative(*meta.previous_close());
    }

    let company_name = meta
        .long_name()
        .clone()
        .or_else(|| meta.short_name().clone())
        .unwrap_or_else(|| symbol.to_string());

    let mut previous_close = Decimal::ZERO;
    if let Some(closes) = historical_closes(chart) {
        if closes.len() >= 2 {
            previous_close = closes[closes.len() - 2];
        } else if closes.len() == 1 {
            previous_close = positive(*meta.chart_previous_close()).unwrap_or(current_price);
        }
    }
    if previous_close.is_zero() {
        previous_close = positive(*meta.previous_close())
            .or_else(|| positive(*meta.chart_previous_close()))
            .unwrap_or(current_price);
    }

    let (price_change, percent_change) = if previous_close > Decimal::ZERO {
        let change = current_price - previous_close;
        (change, change / previous_close * dec!(100))
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let volume = non_negative((*meta.regular_market_volume()).or(*meta.volume()));
    let exchange = meta
        .exchange_name()
        .clone()
        .or_else(|| meta.full_exchange_name().clone())
        .unwrap_or_else(|| String::from("Unknown"));

    QuoteRecord::new(
        symbol.to_string(),
        company_name,
        current_price,
        previous_close,
        price_change,
        percent_change,
        volume,
        non_negative(*meta.market_cap()),
        non_negative(*meta.fifty_two_week_high()),
        non_negative(*meta.fifty_two_week_low()),
        exchange,
        fetched_at,
    )
}

/// Non-null positive entries of the historical close series, oldest
/// first. None when the payload has no series block at all.
fn historical_closes(chart: &ChartResultDto) -> Option<Vec<Decimal>> {
    let quote = chart.indicators().as_ref()?.quote().as_ref()?.first()?;
    let closes = quote.close().as_ref()?;
    Some(closes.iter().filter_map(|close| positive(*close)).collect())
}

fn positive(value: Option<f64>) -> Option<Decimal> {
    value
        .and_then(Decimal::from_f64)
        .filter(|decimal| *decimal > Decimal::ZERO)
}

fn non_negative(value: Option<f64>) -> Decimal {
    value
        .and_then(Decimal::from_f64)
        .filter(|decimal| *decimal >= Decimal::ZERO)
        .unwrap_or(Decimal::ZERO)
}
