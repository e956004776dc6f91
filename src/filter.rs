//! Link relevance filter.
//!
//! Sends a page's raw links to the model, parses the JSON classification it
//! returns and resolves every suggested URL against the page. Every failure
//! along the way degrades to an empty list.

use crate::llm::{ChatModel, CompletionSettings, ResponseFormat};
use crate::prompts::{LINK_SYSTEM_PROMPT, build_messages, links_user_prompt};
use crate::results::{Page, RelevantLink};
use serde::Deserialize;
use url::Url;

/// Default number of links sent for a standalone analysis
pub const DEFAULT_MAX_LINKS: usize = 100;

/// Shape the model is asked to answer with
#[derive(Debug, Deserialize)]
struct LinksResponse {
    #[serde(default)]
    links: Vec<SuggestedLink>,
}

#[derive(Debug, Deserialize)]
struct SuggestedLink {
    #[serde(rename = "type", default = "default_link_type")]
    kind: String,
    #[serde(default)]
    url: Option<String>,
}

fn default_link_type() -> String {
    "unknown".to_string()
}

/// Ask the model which of the page's links are worth following for a brochure
pub async fn select_relevant_links<M: ChatModel + ?Sized>(
    model: &M,
    page: &Page,
    max_links: usize,
    settings: &CompletionSettings,
) -> Vec<RelevantLink> {
    if page.links.is_empty() {
        ::log::info!("No links found on {}", page.url);
        return Vec::new();
    }

    let links_to_send = &page.links[..page.links.len().min(max_links)];
    if page.links.len() > max_links {
        ::log::warn!(
            "Page has {} links. Only processing the first {} to save tokens.",
            page.links.len(),
            max_links
        );
    }

    let messages = build_messages(
        LINK_SYSTEM_PROMPT,
        &links_user_prompt(&page.url, links_to_send),
    );
    let request = settings
        .request(messages)
        .with_response_format(ResponseFormat::json_object());

    let response = match model.complete(&request).await {
        Ok(response) => response,
        Err(e) => {
            ::log::error!(
                "An error occurred while getting relevant links for {}: {}",
                page.url,
                e
            );
            ::log::info!("{}", e.hint());
            return Vec::new();
        }
    };

    let relevant = parse_relevant_links(&page.url, &response);
    ::log::info!("Found {} relevant links on {}", relevant.len(), page.url);
    relevant
}

/// Parse the model's JSON answer and resolve each URL against `base_url`.
/// Malformed JSON yields an empty list.
pub fn parse_relevant_links(base_url: &str, response: &str) -> Vec<RelevantLink> {
    let parsed: LinksResponse = match serde_json::from_str(response) {
        Ok(parsed) => parsed,
        Err(e) => {
            ::log::warn!("Error decoding JSON response from the model for {}: {}", base_url, e);
            ::log::warn!("Model response was: {}", response);
            return Vec::new();
        }
    };

    parsed
        .links
        .into_iter()
        .filter_map(|suggested| {
            let raw = suggested.url?;
            match resolve_link(base_url, &raw) {
                Some(url) => Some(RelevantLink::new(suggested.kind, url)),
                None => {
                    ::log::debug!("Dropping non-web link: {}", raw);
                    None
                }
            }
        })
        .collect()
}

/// Resolve `raw` against `base_url`; only http and https results are kept
pub fn resolve_link(base_url: &str, raw: &str) -> Option<String> {
    let base = parse_base(base_url)?;
    let resolved = base.join(raw.trim()).ok()?;

    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}

/// Parse a base URL, assuming https when it has no scheme
fn parse_base(base_url: &str) -> Option<Url> {
    let base_url = base_url.trim();
    if base_url.contains("://") {
        Url::parse(base_url).ok()
    } else {
        Url::parse(&format!("https://{}", base_url)).ok()
    }
}
