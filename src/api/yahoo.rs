use std::time::Duration;

use anyhow::Result;
use reqwest::Client;

use super::utils::check_status;
use super::yahoo_dto::{ChartResponseDto, ChartResultDto};

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct YahooApi {
    client: Client,
    base_url: String,
}

impl YahooApi {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Fetches one symbol's daily chart: a metadata block plus up to
    /// five days of historical closes.
    pub async fn get_chart(&self, symbol: &str) -> Result<ChartResultDto> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let res = self
            .client
            .get(&url)
            .query(&[
                ("region", "US"),
                ("lang", "en-US"),
                ("includePrePost", "false"),
                ("interval", "1d"),
                ("range", "5d"),
            ])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let res = check_status(res, &format!("Chart request for {}", symbol)).await?;
        let data = res.json::<ChartResponseDto>().await?;

        data.into_first_result()
            .ok_or_else(|| anyhow::anyhow!("No chart data found for {}", symbol))
    }
}
