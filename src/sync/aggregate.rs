use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{PortfolioSummary, Position};

/// Folds stored holdings into one portfolio summary. Rows without
/// positive shares and a positive purchase price are not zero-value
/// positions, they are excluded entirely: they contribute to neither
/// sum nor to the position count.
pub fn aggregate_positions(records: &[Position]) -> PortfolioSummary {
    let mut total_value = Decimal::ZERO;
    let mut total_investment = Decimal::ZERO;
    let mut positions = 0u32;

    for record in records {
        if *record.shares() <= Decimal::ZERO || *record.purchase_price() <= Decimal::ZERO {
            continue;
        }

        positions += 1;
        total_value += *record.shares() * *record.current_price();
        total_investment += *record.shares() * *record.purchase_price();
    }

    let gain_loss = total_value - total_investment;
    let return_percentage = if total_investment > Decimal::ZERO {
        gain_loss / total_investment * dec!(100)
    } else {
        Decimal::ZERO
    };

    PortfolioSummary::new(
        total_value,
        total_investment,
        gain_loss,
        return_percentage,
        positions,
    )
}
