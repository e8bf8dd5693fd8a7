use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;

use stock_notion_sync::api::YahooApi;
use stock_notion_sync::config::Config;
use stock_notion_sync::logging;
use stock_notion_sync::server;
use stock_notion_sync::store::NotionStore;
use stock_notion_sync::sync::{StockSync, tasks};

#[derive(Debug, Parser)]
#[command(
    name = "stock-notion-sync",
    about = "Sync stock quotes into Notion and track portfolio value"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP dashboard server
    Serve,
    /// Fetch fresh quotes and reconcile them into the stock database
    Update {
        #[arg(long, value_delimiter = ',')]
        symbols: Option<Vec<String>>,
    },
    /// Start tracking a new symbol
    Add { symbol: String },
    /// Stop tracking a symbol
    Remove { symbol: String },
    /// Print the current portfolio summary
    Portfolio,
    /// Persist a dated snapshot of the portfolio summary
    Snapshot,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    logging::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store = Arc::new(NotionStore::new(config.notion_token().clone()));
    let market = YahooApi::new()?;
    let sync = Arc::new(StockSync::new(store, market, &config));

    match cli.command {
        Command::Serve => {
            let addr = SocketAddr::from(([0, 0, 0, 0], *config.port()));
            server::run(addr, sync, config.static_dir()).await?;
        }
        Command::Update { symbols } => {
            let symbols = symbols.map(normalize_symbols);
            let handle = tasks::spawn(async move { sync.update_stocks(symbols).await });
            let outcome = handle.join().await?;
            println!("Updated: {}", outcome.updated);
            println!("Failed:  {}", outcome.failed);
        }
        Command::Add { symbol } => {
            let symbol = symbol.trim().to_uppercase();
            sync.add_stock(&symbol).await?;
            println!("Successfully added {} to tracking", symbol);
        }
        Command::Remove { symbol } => {
            let symbol = symbol.trim().to_uppercase();
            sync.remove_stock(&symbol).await?;
            println!("Successfully removed {}", symbol);
        }
        Command::Portfolio => {
            let summary = sync.portfolio_summary().await?;
            println!("Total Value:      ${:.2}", summary.total_value());
            println!("Total Investment: ${:.2}", summary.total_investment());
            println!("Gain/Loss:        ${:.2}", summary.gain_loss());
            println!("Return:           {:.2}%", summary.return_percentage());
            println!("Positions:        {}", summary.positions());
        }
        Command::Snapshot => {
            let summary = sync.create_snapshot().await?;
            println!(
                "Created portfolio snapshot: ${:.2} total value",
                summary.total_value()
            );
        }
    }

    Ok(())
}

fn normalize_symbols(symbols: Vec<String>) -> Vec<String> {
    symbols
        .iter()
        .map(|symbol| symbol.trim().to_uppercase())
        .filter(|symbol| !symbol.is_empty())
        .collect()
}
