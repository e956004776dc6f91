use crate::config::FetchConfig;
use crate::fetchers;
use crate::parsers::html;
use serde::{Deserialize, Serialize};

/// Title used when a page has no usable `<title>`
pub const NO_TITLE: &str = "No title found";

/// Prefix of the text stored on a page whose fetch failed
pub const FETCH_ERROR_PREFIX: &str = "Error fetching URL";

/// A fetched and parsed web page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// URL of the page
    pub url: String,

    /// Title of the page, or [`NO_TITLE`]
    pub title: String,

    /// Extracted text content, or a sentinel
    pub text: String,

    /// Raw href values in document order
    pub links: Vec<String>,
}

impl Page {
    /// Build a page from HTML that has already been retrieved
    pub fn from_html(url: &str, html_source: &str) -> Self {
        let extracted = html::extract(html_source);
        Self {
            url: url.to_string(),
            title: extracted.title,
            text: extracted.text,
            links: extracted.links,
        }
    }

    /// A page standing in for a failed fetch
    pub fn fetch_failed(url: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            url: url.to_string(),
            title: NO_TITLE.to_string(),
            text: format!("{}: {}", FETCH_ERROR_PREFIX, reason),
            links: Vec::new(),
        }
    }

    /// Fetch and parse a URL. Never fails: fetch errors end up in `text`.
    pub async fn load(url: &str, config: &FetchConfig) -> Self {
        match fetchers::fetch_html(url, config).await {
            Ok(source) => {
                let page = Self::from_html(url, &source);
                ::log::info!(
                    "Scraped {} ({} chars of text, {} links)",
                    url,
                    page.text.len(),
                    page.links.len()
                );
                page
            }
            Err(e) => {
                ::log::error!("Error fetching URL {}: {}", url, e);
                Self::fetch_failed(url, e)
            }
        }
    }

    /// Whether `text` may be used for prompting
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty() && !self.text.starts_with(FETCH_ERROR_PREFIX)
    }

    /// Title and text formatted for a prompt
    pub fn contents(&self) -> String {
        format!(
            "Webpage Title:\n{}\nWebpage Contents:\n{}\n\n",
            self.title, self.text
        )
    }
}

/// A link the model judged worth following, resolved to an absolute URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevantLink {
    /// Free-form category such as "about page"
    #[serde(rename = "type")]
    pub kind: String,

    pub url: String,
}

impl RelevantLink {
    pub fn new(kind: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            url: url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failed_page_has_no_content() {
        let page = Page::fetch_failed("https://example.com", "connection refused");
        assert!(!page.has_content());
        assert_eq!(page.title, NO_TITLE);
        assert!(page.text.starts_with("Error fetching URL: connection refused"));
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_blank_text_has_no_content() {
        let page = Page {
            url: "https://example.com".to_string(),
            title: NO_TITLE.to_string(),
            text: "  \n ".to_string(),
            links: Vec::new(),
        };
        assert!(!page.has_content());
    }

    #[test]
    fn test_from_html_and_contents() {
        let page = Page::from_html(
            "https://example.com",
            "<html><head><title> Acme </title></head><body><main><p>We make anvils.</p></main></body></html>",
        );
        assert!(page.has_content());
        assert_eq!(page.title, "Acme");
        assert_eq!(
            page.contents(),
            "Webpage Title:\nAcme\nWebpage Contents:\nWe make anvils.\n\n"
        );
    }

    #[test]
    fn test_relevant_link_serializes_kind_as_type() {
        let link = RelevantLink::new("about page", "https://example.com/about");
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["type"], "about page");
        assert_eq!(json["url"], "https://example.com/about");
    }
}
