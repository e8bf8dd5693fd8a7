pub mod position;
pub mod quote;
pub mod summary;

pub use position::Position;
pub use quote::QuoteRecord;
pub use summary::PortfolioSummary;
