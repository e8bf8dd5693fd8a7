use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone, Debug, Default, Getters, Serialize, new)]
pub struct PortfolioSummary {
    total_value: Decimal,
    total_investment: Decimal,
    gain_loss: Decimal,
    return_percentage: Decimal,
    positions: u32,
}
