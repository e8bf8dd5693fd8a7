use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;

/// One stored holding as read back from the record store. Only rows
/// with positive shares and a positive purchase price count as
/// positions during aggregation.
#[derive(Clone, Debug, Getters, new)]
pub struct Position {
    symbol: String,
    shares: Decimal,
    purchase_price: Decimal,
    current_price: Decimal,
}
