//! Visible text extraction from HTML pages
//!
//! Extraction is an ordered chain of strategies: the first strategy that
//! yields non-empty text wins. The default chain prefers the `<main>`
//! region, then `<article>`, then the document `<body>`.

use scraper::{ElementRef, Html, Selector};

/// Maximum number of characters kept from one page
pub const MAX_CONTENT_CHARS: usize = 8000;

/// Elements whose text is never visible
const INVISIBLE: &[&str] = &["script", "style", "noscript", "template"];

/// One way of locating the readable region of a document
#[derive(Debug, Clone)]
pub struct Strategy {
    name: &'static str,
    selector: Selector,
}

impl Strategy {
    /// Build a strategy from a CSS selector
    pub fn new(name: &'static str, css: &str) -> Option<Self> {
        Selector::parse(css).ok().map(|selector| Self { name, selector })
    }

    /// Name used in logs
    pub fn name(&self) -> &str {
        self.name
    }

    /// Text of the first element matching this strategy
    fn apply(&self, document: &Html) -> Option<String> {
        let element = document.select(&self.selector).next()?;
        let text = visible_text(element);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Extracts bounded plain text from raw HTML
#[derive(Debug, Clone)]
pub struct TextExtractor {
    strategies: Vec<Strategy>,
    max_chars: usize,
}

impl TextExtractor {
    /// Create an extractor with the main → article → body chain
    pub fn new() -> Self {
        let strategies = [("main", "main"), ("article", "article"), ("body", "body")]
            .into_iter()
            .filter_map(|(name, css)| Strategy::new(name, css))
            .collect();

        Self {
            strategies,
            max_chars: MAX_CONTENT_CHARS,
        }
    }

    /// Extract single-spaced visible text, truncated to the character cap.
    /// Returns an empty string when no strategy finds any text.
    pub fn extract(&self, html: &str) -> String {
        let document = Html::parse_document(html);

        for strategy in &self.strategies {
            if let Some(text) = strategy.apply(&document) {
                tracing::trace!("Extracted text using '{}' strategy", strategy.name());
                return truncate_chars(&text, self.max_chars);
            }
        }

        String::new()
    }
}

/// Collect the visible text below an element, collapsed to single spaces
fn visible_text(root: ElementRef<'_>) -> String {
    let mut words: Vec<&str> = Vec::new();
    collect_text(root, &mut words);
    words.join(" ")
}

fn collect_text<'a>(element: ElementRef<'a>, words: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            words.extend(text.split_whitespace());
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !INVISIBLE.contains(&child_element.value().name()) {
                collect_text(child_element, words);
            }
        }
    }
}

/// Keep at most `max_chars` characters (not bytes)
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
