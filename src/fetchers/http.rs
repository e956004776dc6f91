use crate::config::FetchConfig;
use crate::error::FetchError;
use reqwest::Client;
use std::time::Duration;

/// Create a configured HTTP client for fetching pages
pub fn create_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
}

/// Fetch a page with a plain GET; non-2xx responses are errors
pub async fn fetch(url: &str, config: &FetchConfig) -> Result<String, FetchError> {
    let started = std::time::Instant::now();
    let client = create_client(config)?;

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    ::log::debug!(
        "Fetched {} ({} bytes) in {:.2} seconds",
        url,
        body.len(),
        started.elapsed().as_secs_f64()
    );
    Ok(body)
}
