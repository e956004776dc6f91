use crate::config::FetchConfig;
use crate::error::FetchError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tokio::time::timeout;

/// Headless Chrome arguments; the user agent is appended per config
const CHROME_ARGS: [&str; 8] = [
    "--headless",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--window-size=1920,1080",
    "--disable-gpu",
    "--disable-extensions",
    "--log-level=3",
    "--blink-settings=imagesEnabled=false",
];

/// Render `url` in a headless browser and return the serialized DOM.
///
/// The WebDriver session lives for exactly this call and is closed on every
/// exit path, including navigation errors and timeouts.
pub async fn fetch(url: &str, config: &FetchConfig) -> Result<String, FetchError> {
    let started = std::time::Instant::now();
    let client = connect_to_webdriver(config).await?;

    let result = timeout(
        Duration::from_secs(config.browser_timeout_secs),
        render(&client, url, config),
    )
    .await
    .unwrap_or_else(|_| {
        ::log::error!("Timeout rendering: {}", url);
        Err(FetchError::Timeout(config.browser_timeout_secs))
    });

    release(client).await;

    if result.is_ok() {
        ::log::debug!(
            "Rendered {} in {:.2} seconds",
            url,
            started.elapsed().as_secs_f64()
        );
    }
    result
}

/// Capabilities for a headless Chrome session
pub fn chrome_capabilities(user_agent: &str) -> Map<String, Value> {
    let mut args: Vec<String> = CHROME_ARGS.iter().map(|arg| arg.to_string()).collect();
    args.push(format!("--user-agent={}", user_agent));

    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

/// Connects to the WebDriver instance
async fn connect_to_webdriver(config: &FetchConfig) -> Result<Client, FetchError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(chrome_capabilities(&config.user_agent));

    match builder.connect(&config.webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", config.webdriver_url);
            Ok(client)
        }
        Err(e) => {
            ::log::error!(
                "Failed to connect to WebDriver at {}: {}",
                config.webdriver_url,
                e
            );
            ::log::error!(
                "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
            );
            Err(FetchError::WebDriverSession {
                webdriver_url: config.webdriver_url.clone(),
                source: e,
            })
        }
    }
}

/// Navigate, wait for the body, read the rendered source
async fn render(client: &Client, url: &str, config: &FetchConfig) -> Result<String, FetchError> {
    client
        .goto(url)
        .await
        .map_err(|e| navigation_error(e, "navigating to", url))?;

    client
        .wait()
        .at_most(Duration::from_secs(config.render_wait_secs))
        .for_element(Locator::Css("body"))
        .await
        .map_err(|e| navigation_error(e, "waiting for the body of", url))?;

    client
        .source()
        .await
        .map_err(|e| navigation_error(e, "reading the source of", url))
}

/// Handles errors that occur during navigation or page source retrieval
fn navigation_error(
    error: fantoccini::error::CmdError,
    context: &'static str,
    url: &str,
) -> FetchError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session while {} {}", context, url);
    } else {
        ::log::error!("Failed while {} {}: {}", context, url, error);
    }
    FetchError::Browser {
        context,
        source: error,
    }
}

/// Ends the WebDriver session
async fn release(client: Client) {
    match client.close().await {
        Ok(()) => ::log::debug!("WebDriver session closed"),
        Err(e) => ::log::warn!("Failed to close WebDriver session: {}", e),
    }
}
