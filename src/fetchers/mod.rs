//! Raw HTML retrieval.
//!
//! Two explicit modes, selected by [`FetchMode`]: a direct HTTP GET, or a
//! headless browser driven over WebDriver for pages that render their content
//! with client-side script. A failure in one mode never escalates to the other.

pub mod browser;
pub mod http;

use crate::config::{FetchConfig, FetchMode};
use crate::error::FetchError;

/// Retrieve raw HTML for `url` using the configured mode
pub async fn fetch_html(url: &str, config: &FetchConfig) -> Result<String, FetchError> {
    match config.mode {
        FetchMode::Http => {
            ::log::info!("Fetching URL with HTTP: {}", url);
            http::fetch(url, config).await
        }
        FetchMode::Browser => {
            ::log::info!("Fetching URL with headless browser: {}", url);
            browser::fetch(url, config).await
        }
    }
}
