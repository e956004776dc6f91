use thiserror::Error;

/// Failure to retrieve raw HTML for a URL
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure, invalid URL or timeout on the direct HTTP path
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP status {status} for url ({url})")]
    Status { status: u16, url: String },

    /// Could not open a WebDriver session
    #[error("could not start a browser session at {webdriver_url}: {source}")]
    WebDriverSession {
        webdriver_url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    /// A WebDriver command failed while loading or reading the page
    #[error("browser error while {context}: {source}")]
    Browser {
        context: &'static str,
        #[source]
        source: fantoccini::error::CmdError,
    },

    /// The browser did not finish within the configured bound
    #[error("browser timed out after {0} seconds")]
    Timeout(u64),
}

/// Failure talking to the chat-completion endpoint
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("could not parse model response: {0}")]
    Parse(String),

    #[error("no response content received from the model")]
    EmptyResponse,
}

impl LlmError {
    /// Short advice for the user, keyed on the error text
    pub fn hint(&self) -> &'static str {
        let message = self.to_string().to_lowercase();
        if message.contains("maximum context length") || message.contains("context_length") {
            "The prompt might be too long. Try fewer links or a smaller page."
        } else if message.contains("rate limit") || message.contains("rate_limit") {
            "You might be hitting rate limits. Wait a bit before retrying."
        } else {
            "Please check your API key and network connection."
        }
    }
}

/// Startup configuration problems; these are fatal
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY not found in environment variables. Please set it in a .env file.")]
    MissingApiKey,

    #[error("OPENAI_API_KEY contains whitespace. Please check the value in your .env file.")]
    MalformedApiKey,

    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a brochure could not be produced
#[derive(Debug, Error)]
pub enum BrochureError {
    #[error("no content could be obtained from {url}")]
    NoContent { url: String },

    #[error(transparent)]
    Llm(#[from] LlmError),
}
