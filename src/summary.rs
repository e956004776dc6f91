use crate::config::{DigestConfig, FetchConfig, FetchMode};
use crate::llm::{ChatModel, CompletionSettings};
use crate::prompts::{SUMMARY_SYSTEM_PROMPT, build_messages, summary_user_prompt};
use crate::results::Page;

/// Returned when the model call fails
pub const SUMMARY_FAILED: &str = "## Error\nFailed to generate summary from the LLM.";

/// Summarizes single web pages with a chat model
pub struct Summarizer<'a, M: ChatModel + ?Sized> {
    model: &'a M,
    fetch: FetchConfig,
    settings: CompletionSettings,
}

impl<'a, M: ChatModel + ?Sized> Summarizer<'a, M> {
    /// Create a summarizer with default settings (direct HTTP, gpt-4o-mini)
    pub fn new(model: &'a M) -> Self {
        Self::from_config(model, &DigestConfig::for_summary())
    }

    /// Create a summarizer from loaded configuration
    pub fn from_config(model: &'a M, config: &DigestConfig) -> Self {
        Self {
            model,
            fetch: config.fetch.clone(),
            settings: CompletionSettings::new(&config.model)
                .with_temperature(config.temperature)
                .with_max_tokens(config.summary_max_tokens),
        }
    }

    /// Set the chat model id
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.settings.model = model_name.into();
        self
    }

    /// Set how pages are retrieved
    pub fn with_fetch_mode(mut self, mode: FetchMode) -> Self {
        self.fetch.mode = mode;
        self
    }

    /// Replace the whole fetch configuration
    pub fn with_fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    /// Fetch `url` and summarize it. Never fails: problems come back as a
    /// markdown error block.
    pub async fn summarize(&self, url: &str) -> String {
        ::log::info!("Summarizing {}", url);
        let page = Page::load(url, &self.fetch).await;

        if !page.has_content() {
            ::log::warn!("No usable content for {}", url);
            return format!(
                "## Error\nCould not retrieve or parse content from {}.\nDetails: {}",
                url, page.text
            );
        }

        let messages = build_messages(SUMMARY_SYSTEM_PROMPT, &summary_user_prompt(&page));
        let request = self.settings.request(messages);

        match self.model.complete(&request).await {
            Ok(summary) => summary,
            Err(e) => {
                ::log::error!("An error occurred while calling the model for {}: {}", url, e);
                ::log::info!("{}", e.hint());
                SUMMARY_FAILED.to_string()
            }
        }
    }
}
