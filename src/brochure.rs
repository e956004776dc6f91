//! Company brochure generation.
//!
//! The landing page is fetched first, the model picks which of its links are
//! worth following, those pages are fetched one at a time and everything is
//! handed to the model in a single brochure prompt.

use crate::config::{DigestConfig, FetchConfig, FetchMode};
use crate::error::BrochureError;
use crate::filter::select_relevant_links;
use crate::llm::{ChatModel, CompletionSettings};
use crate::prompts::{BROCHURE_SYSTEM_PROMPT, brochure_user_prompt, build_messages};
use crate::results::Page;
use std::time::Duration;

/// Generates markdown brochures with a chat model
pub struct BrochureGenerator<'a, M: ChatModel + ?Sized> {
    model: &'a M,
    fetch: FetchConfig,
    link_settings: CompletionSettings,
    brochure_settings: CompletionSettings,
    link_limit: usize,
    politeness_delay: Duration,
}

impl<'a, M: ChatModel + ?Sized> BrochureGenerator<'a, M> {
    /// Create a generator with default settings (headless browser, gpt-4o-mini)
    pub fn new(model: &'a M) -> Self {
        Self::from_config(model, &DigestConfig::for_brochure())
    }

    /// Create a generator from loaded configuration
    pub fn from_config(model: &'a M, config: &DigestConfig) -> Self {
        Self {
            model,
            fetch: config.fetch.clone(),
            link_settings: CompletionSettings::new(&config.model),
            brochure_settings: CompletionSettings::new(&config.model)
                .with_temperature(config.temperature)
                .with_max_tokens(config.brochure_max_tokens),
            link_limit: config.brochure_link_limit,
            politeness_delay: Duration::from_millis(config.politeness_delay_ms),
        }
    }

    /// Set the chat model id used for both the link filter and the brochure
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        let model_name = model_name.into();
        self.link_settings.model = model_name.clone();
        self.brochure_settings.model = model_name;
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

    /// Maximum number of landing-page links sent to the filter
    pub fn with_link_limit(mut self, link_limit: usize) -> Self {
        self.link_limit = link_limit;
        self
    }

    /// Pause after each sub-page fetch
    pub fn with_politeness_delay(mut self, delay: Duration) -> Self {
        self.politeness_delay = delay;
        self
    }

    pub fn brochure_settings(&self) -> &CompletionSettings {
        &self.brochure_settings
    }

    /// Gather the landing page and every relevant sub-page into one text.
    /// `None` when the landing page has no usable content.
    pub async fn collect_details(&self, url: &str) -> Option<String> {
        ::log::info!("Fetching landing page: {}", url);
        let landing = Page::load(url, &self.fetch).await;

        if !landing.has_content() {
            ::log::error!(
                "Could not get content from landing page {}: {}",
                url,
                landing.text
            );
            return None;
        }

        let mut parts = vec![format!("Landing page:\n{}", landing.contents())];

        let links =
            select_relevant_links(self.model, &landing, self.link_limit, &self.link_settings)
                .await;
        if links.is_empty() {
            ::log::info!("No relevant links found to process further");
        } else {
            ::log::info!("Processing {} relevant links", links.len());
        }

        for link in links {
            ::log::info!("Fetching {} ({})", link.url, link.kind);
            let page = Page::load(&link.url, &self.fetch).await;

            if page.has_content() {
                parts.push(format!(
                    "\n\n--- {} ---\nURL: {}\n{}",
                    link.kind.to_uppercase(),
                    link.url,
                    page.contents()
                ));
            } else {
                ::log::warn!("Skipping {}: {}", link.url, page.text);
            }

            if !self.politeness_delay.is_zero() {
                tokio::time::sleep(self.politeness_delay).await;
            }
        }

        Some(parts.join("\n"))
    }

    /// Build a brochure for `company_name` from the site at `url`.
    ///
    /// With `on_delta`, the answer is streamed and each piece handed over as
    /// it arrives. The full raw text is returned either way.
    pub async fn generate(
        &self,
        company_name: &str,
        url: &str,
        on_delta: Option<&mut (dyn for<'s> FnMut(&'s str) + Send)>,
    ) -> Result<String, BrochureError> {
        let details = self
            .collect_details(url)
            .await
            .ok_or_else(|| BrochureError::NoContent {
                url: url.to_string(),
            })?;

        let messages = build_messages(
            BROCHURE_SYSTEM_PROMPT,
            &brochure_user_prompt(company_name, &details),
        );
        let request = self.brochure_settings.request(messages);

        ::log::info!("Generating brochure for {}", company_name);
        let result = match on_delta {
            Some(on_delta) => self.model.complete_streaming(&request, on_delta).await,
            None => self.model.complete(&request).await,
        };

        result.map_err(|e| {
            ::log::error!("An error occurred while generating the brochure: {}", e);
            ::log::info!("{}", e.hint());
            BrochureError::from(e)
        })
    }
}
