use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Error, Result};
use chrono::Local;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::api::YahooApi;
use crate::config::Config;
use crate::models::{PortfolioSummary, Position, QuoteRecord};
use crate::store::{RecordStore, props};
use crate::sync::aggregate::aggregate_positions;
use crate::sync::normalize::normalize_quote;
use crate::sync::reconcile::{self, SYMBOL_PROPERTY};

const DEFAULT_SYMBOLS: [&str; 9] = [
    "AAPL", "GOOGL", "MSFT", "TSLA", "AMZN", "NVDA", "META", "AMD", "NFLX",
];
const QUERY_PAGE_SIZE: u32 = 100;
const FETCH_PACING: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct UpdateOutcome {
    pub updated: u32,
    pub failed: u32,
}

/// Orchestrates fetch, reconcile, aggregate and snapshot operations
/// against the two store databases. Collaborators arrive by
/// constructor injection; nothing reads the environment past startup.
pub struct StockSync {
    store: Arc<dyn RecordStore>,
    market: YahooApi,
    stock_database_id: String,
    portfolio_database_id: Option<String>,
    overwrite_same_day_snapshot: bool,
    pacing: Duration,
}

impl StockSync {
    pub fn new(store: Arc<dyn RecordStore>, market: YahooApi, config: &Config) -> Self {
        Self {
            store,
            market,
            stock_database_id: config.stock_database_id().clone(),
            portfolio_database_id: config.portfolio_database_id().clone(),
            overwrite_same_day_snapshot: *config.snapshot_overwrite(),
            pacing: FETCH_PACING,
        }
    }

    /// Overrides the pause between successive symbol fetches.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn has_portfolio_database(&self) -> bool {
        self.portfolio_database_id.is_some()
    }

    /// Symbols currently tracked in the stock database, falling back
    /// to the built-in default list when the scan fails.
    pub async fn tracked_symbols(&self) -> Vec<String> {
        match self.scan_symbols().await {
            Ok(symbols) => symbols,
            Err(err) => {
                warn!("failed to scan tracked symbols, using default list: {:#}", err);
                DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
            }
        }
    }

    async fn scan_symbols(&self) -> Result<Vec<String>> {
        let records = self
            .store
            .query_all(&self.stock_database_id, QUERY_PAGE_SIZE)
            .await?;
        Ok(records
            .iter()
            .filter_map(|record| props::title_text(record.properties(), SYMBOL_PROPERTY))
            .collect())
    }

    pub async fn fetch_quote(&self, symbol: &str) -> Result<QuoteRecord> {
        let chart = self.market.get_chart(symbol).await?;
        Ok(normalize_quote(symbol, &chart, Local::now()))
    }

    /// Fetches and reconciles each symbol in turn, pausing between
    /// fetches to stay under the provider's rate limit. Per-symbol
    /// failures are counted and skipped; the batch always finishes.
    pub async fn update_stocks(&self, symbols: Option<Vec<String>>) -> UpdateOutcome {
        let symbols = match symbols {
            Some(symbols) => symbols,
            None => self.tracked_symbols().await,
        };
        info!("updating {} stocks", symbols.len());

        let mut outcome = UpdateOutcome::default();
        for symbol in &symbols {
            match self.sync_symbol(symbol).await {
                Ok(()) => outcome.updated += 1,
                Err(err) => {
                    warn!(symbol = %symbol, "update failed: {:#}", err);
                    outcome.failed += 1;
                }
            }
            tokio::time::sleep(self.pacing).await;
        }

        info!(
            updated = outcome.updated,
            failed = outcome.failed,
            "update finished"
        );
        outcome
    }

    async fn sync_symbol(&self, symbol: &str) -> Result<()> {
        let quote = self.fetch_quote(symbol).await?;
        reconcile::upsert_quote(
            self.store.as_ref(),
            &self.stock_database_id,
            self.portfolio_database_id.as_deref(),
            &quote,
        )
        .await?;
        Ok(())
    }

    pub async fn add_stock(&self, symbol: &str) -> Result<()> {
        self.sync_symbol(symbol)
            .await
            .with_context(|| format!("Failed to add {}", symbol))
    }

    pub async fn remove_stock(&self, symbol: &str) -> Result<()> {
        let record_id =
            reconcile::find_stock_record(self.store.as_ref(), &self.stock_database_id, symbol)
                .await?
                .ok_or_else(|| Error::msg(format!("{} is not tracked", symbol)))?;

        self.store
            .archive_record(&record_id)
            .await
            .with_context(|| format!("Failed to remove {}", symbol))?;
        info!(symbol = %symbol, "removed tracked stock");
        Ok(())
    }

    /// Aggregates stored holdings. Reads the portfolio database when
    /// one is configured, resolving current prices from the stock
    /// database; otherwise scans the stock database directly.
    pub async fn portfolio_summary(&self) -> Result<PortfolioSummary> {
        let positions = match &self.portfolio_database_id {
            Some(portfolio_db) => self.positions_from_portfolio(portfolio_db).await?,
            None => self.positions_from_stocks().await?,
        };
        Ok(aggregate_positions(&positions))
    }

    async fn positions_from_portfolio(&self, database_id: &str) -> Result<Vec<Position>> {
        let records = self.store.query_all(database_id, QUERY_PAGE_SIZE).await?;

        let mut positions = Vec::new();
        for record in &records {
            let Some(symbol) = props::title_text(record.properties(), SYMBOL_PROPERTY) else {
                continue;
            };
            let shares = props::number_value(record.properties(), "Shares Owned");
            let purchase_price = props::number_value(record.properties(), "Purchase Price");
            if shares <= Decimal::ZERO || purchase_price <= Decimal::ZERO {
                continue;
            }

            let current_price = self.current_price(&symbol).await;
            positions.push(Position::new(symbol, shares, purchase_price, current_price));
        }

        Ok(positions)
    }

    async fn positions_from_stocks(&self) -> Result<Vec<Position>> {
        let records = self
            .store
            .query_all(&self.stock_database_id, QUERY_PAGE_SIZE)
            .await?;

        Ok(records
            .iter()
            .filter_map(|record| {
                let symbol = props::title_text(record.properties(), SYMBOL_PROPERTY)?;
                let shares = props::number_value(record.properties(), "Shares Owned");
                let purchase_price = props::number_value(record.properties(), "Purchase Price");
                let current_price = props::number_value(record.properties(), "Current Price");
                Some(Position::new(symbol, shares, purchase_price, current_price))
            })
            .collect())
    }

    /// Current price of one symbol as stored in the stock database;
    /// zero when the symbol is missing or the lookup fails.
    async fn current_price(&self, symbol: &str) -> Decimal {
        match self
            .store
            .query_by_title(&self.stock_database_id, SYMBOL_PROPERTY, symbol)
            .await
        {
            Ok(records) => records
                .first()
                .map(|record| props::number_value(record.properties(), "Current Price"))
                .unwrap_or(Decimal::ZERO),
            Err(err) => {
                warn!(symbol = %symbol, "price lookup failed: {:#}", err);
                Decimal::ZERO
            }
        }
    }

    /// Persists today's summary as a dated snapshot record. Append-only
    /// by default; with the overwrite flag set, a same-day snapshot is
    /// updated in place instead of duplicated.
    pub async fn create_snapshot(&self) -> Result<PortfolioSummary> {
        let portfolio_db = self
            .portfolio_database_id
            .as_ref()
            .ok_or_else(|| Error::msg("No portfolio database configured for snapshots"))?;

        let summary = self.portfolio_summary().await?;
        let today = Local::now().format("%Y-%m-%d").to_string();
        let properties = snapshot_properties(&today, &summary);

        if self.overwrite_same_day_snapshot {
            let existing = self
                .store
                .query_by_title(portfolio_db, "Date", &today)
                .await?;
            if let Some(record) = existing.first() {
                self.store
                    .update_record(record.id(), properties)
                    .await
                    .with_context(|| "Failed to overwrite snapshot")?;
                info!(date = %today, "overwrote portfolio snapshot");
                return Ok(summary);
            }
        }

        self.store
            .create_record(portfolio_db, properties)
            .await
            .with_context(|| "Failed to create snapshot")?;
        info!(date = %today, total_value = %summary.total_value(), "created portfolio snapshot");
        Ok(summary)
    }
}

fn snapshot_properties(date: &str, summary: &PortfolioSummary) -> Value {
    json!({
        "Date": props::title(date),
        "Total Value": props::number(*summary.total_value()),
        "Total Investment": props::number(*summary.total_investment()),
        "Gain/Loss": props::number(*summary.gain_loss()),
        "Return %": props::number(*summary.return_percentage()),
        "Positions": props::number(Decimal::from(*summary.positions())),
    })
}
