use crate::parsers::{MAIN_CONTENT_PROBES, PRUNED_TAGS};
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

/// Text used when the source has no `<body>` element
pub const NO_BODY: &str = "No body content found.";

/// Text used when nothing readable is left after pruning
pub const NO_TEXT: &str = "Could not extract meaningful text content.";

/// The HTML5 parser always synthesizes a body, so presence is read from the markup
static BODY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body[\s/>]").expect("body tag pattern is valid"));

/// Comments and script elements, whose contents are not markup
static NON_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<script\b.*?</script\s*>").expect("non-markup pattern is valid")
});

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector is valid"));

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("body selector is valid"));

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// Title, readable text and raw links of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub text: String,
    pub links: Vec<String>,
}

/// Parses HTML content to extract the title, main text and links
pub fn extract(html: &str) -> Extracted {
    let doc = Html::parse_document(html);

    let title = extract_title(&doc);
    let links = extract_links(&doc);

    let text = if has_body_tag(html) {
        doc.select(&BODY)
            .next()
            .map(extract_body_text)
            .unwrap_or_else(|| NO_BODY.to_string())
    } else {
        NO_BODY.to_string()
    };

    // Log the number of links found
    ::log::debug!("HTML parser found {} links", links.len());
    if !links.is_empty() {
        ::log::debug!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    Extracted { title, text, links }
}

/// Whether the markup itself opens a `<body>`, ignoring comments and scripts
fn has_body_tag(html: &str) -> bool {
    BODY_TAG.is_match(&NON_MARKUP.replace_all(html, ""))
}

/// Trimmed `<title>` text, or the no-title sentinel
pub fn extract_title(doc: &Html) -> String {
    doc.select(&TITLE)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| crate::results::NO_TITLE.to_string())
}

/// Every anchor's href, verbatim and in document order
pub fn extract_links(doc: &Html) -> Vec<String> {
    doc.select(&ANCHOR)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect()
}

/// Text of the first matching main-content container, or of the whole pruned body
fn extract_body_text(body: ElementRef<'_>) -> String {
    let root = find_main_content(body).unwrap_or(body);
    let text = collect_text(root);

    if text.trim().is_empty() {
        NO_TEXT.to_string()
    } else {
        text
    }
}

/// Probes the main-content selectors in priority order; first match wins
pub(crate) fn find_main_content(body: ElementRef<'_>) -> Option<ElementRef<'_>> {
    for probe in MAIN_CONTENT_PROBES.iter() {
        let selector = probe.selector();
        if let Some(found) = body
            .select(selector)
            .find(|candidate| candidate.id() != body.id() && !is_pruned(*candidate, body))
        {
            ::log::debug!("Main content matched {:?} ({})", probe.kind, probe.css);
            return Some(found);
        }
    }
    ::log::debug!("No main content container found, using the whole body");
    None
}

/// Whether an element or any of its ancestors below `body` is on the denylist
fn is_pruned(element: ElementRef<'_>, body: ElementRef<'_>) -> bool {
    if is_pruned_tag(element.value().name()) {
        return true;
    }
    element
        .ancestors()
        .take_while(|node| node.id() != body.id())
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_pruned_tag(ancestor.value().name()))
}

fn is_pruned_tag(name: &str) -> bool {
    PRUNED_TAGS.contains(&name)
}

/// Joins the trimmed text nodes under `root` with newlines, skipping pruned subtrees
fn collect_text(root: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    push_text(root, &mut parts);
    parts.join("\n")
}

fn push_text(root: ElementRef<'_>, parts: &mut Vec<String>) {
    let mut stack = vec![*root];

    // Depth-first in document order
    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Element(element) if is_pruned_tag(element.name()) => continue,
            Node::Text(text)
                if node.parent().and_then(ElementRef::wrap).is_some_and(is_noscript) =>
            {
                // Parsed with scripting on, so the fallback markup arrives as raw text
                let fragment = Html::parse_fragment(text);
                push_text(fragment.root_element(), parts);
            }
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
            _ => {}
        }
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev());
    }
}

fn is_noscript(element: ElementRef<'_>) -> bool {
    element.value().name() == "noscript"
}
