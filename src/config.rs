use std::env;

use anyhow::{Context, Result};
use derive_getters::Getters;
use derive_new::new;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_STATIC_DIR: &str = "static";

/// Everything the service needs from the environment, read and
/// validated once at startup. Components receive this by constructor
/// injection; nothing touches the environment afterwards.
#[derive(Clone, Debug, Getters, new)]
pub struct Config {
    notion_token: String,
    stock_database_id: String,
    portfolio_database_id: Option<String>,
    snapshot_overwrite: bool,
    port: u16,
    static_dir: String,
}

impl Config {
    /// Missing required variables are fatal: the service refuses to
    /// start rather than run half-configured.
    pub fn from_env() -> Result<Self> {
        let notion_token =
            env::var("NOTION_TOKEN").context("NOTION_TOKEN environment variable is required")?;
        let stock_database_id = env::var("STOCK_DATABASE_ID")
            .context("STOCK_DATABASE_ID environment variable is required")?;
        let portfolio_database_id = env::var("PORTFOLIO_DATABASE_ID")
            .ok()
            .filter(|id| !id.is_empty());
        let snapshot_overwrite = env::var("SNAPSHOT_OVERWRITE")
            .map(|value| value == "true")
            .unwrap_or(false);
        let port = match env::var("PORT") {
            Ok(value) => value.parse::<u16>().context("PORT must be a port number")?,
            Err(_) => DEFAULT_PORT,
        };
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());

        Ok(Self {
            notion_token,
            stock_database_id,
            portfolio_database_id,
            snapshot_overwrite,
            port,
            static_dir,
        })
    }
}
