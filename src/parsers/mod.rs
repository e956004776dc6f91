pub mod html;


use scraper::Selector;
use std::sync::LazyLock;

/// Elements removed from the body before any text is read
pub const PRUNED_TAGS: [&str; 14] = [
    "script", "style", "img", "input", "nav", "footer", "aside", "header", "form", "button",
    "svg", "iframe", "link", "meta",
];

/// What a main-content probe keys on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// A semantic element such as `<main>`
    Tag,
    /// An ARIA role attribute
    Role,
    /// A class name
    Class,
    /// An element id
    Id,
}

/// One entry of the main-content priority list
#[derive(Debug)]
pub struct ContentProbe {
    pub kind: ProbeKind,
    pub css: &'static str,
    selector: LazyLock<Selector>,
}

impl ContentProbe {
    const fn new(kind: ProbeKind, css: &'static str, parse: fn() -> Selector) -> Self {
        Self {
            kind,
            css,
            selector: LazyLock::new(parse),
        }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

macro_rules! probe {
    ($kind:expr, $css:literal) => {
        ContentProbe::new($kind, $css, || {
            Selector::parse($css).expect("main content selector is valid")
        })
    };
}

/// Main-content containers, highest priority first
pub static MAIN_CONTENT_PROBES: [ContentProbe; 7] = [
    probe!(ProbeKind::Tag, "main"),
    probe!(ProbeKind::Tag, "article"),
    probe!(ProbeKind::Role, r#"[role="main"]"#),
    probe!(ProbeKind::Class, ".content"),
    probe!(ProbeKind::Id, "#content"),
    probe!(ProbeKind::Class, ".main-content"),
    probe!(ProbeKind::Id, "#main-content"),
];
