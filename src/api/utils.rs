use anyhow::{Error, Result};
use reqwest::Response;

pub async fn check_status(res: Response, context: &str) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    Err(Error::msg(format!(
        "{} failed with status {}: {}",
        context, status, body
    )))
}
