//! Markup to plain-text rendering

use gleaner_domain::traits::ContentRenderer;
use scraper::{Html, Selector};

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Renders HTML to newline-separated visible text
///
/// Text inside `<script>`, `<style>`, `<noscript>` and `<template>` is
/// dropped. Each text fragment is trimmed and empty fragments are discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Create a renderer
    pub fn new() -> Self {
        Self
    }
}

impl ContentRenderer for HtmlRenderer {
    fn render(&self, markup: &str) -> String {
        let doc = Html::parse_document(markup);
        let body = Selector::parse("body")
            .ok()
            .and_then(|sel| doc.select(&sel).next())
            .unwrap_or_else(|| doc.root_element());

        body.descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
                });
                (!hidden).then(|| text.trim())
            })
            .filter(|fragment| !fragment.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_only() {
        let html = r#"<html><head><title>Head title</title><style>p { color: red }</style></head>
            <body>
              <h1>Headline</h1>
              <script>var x = 1;</script>
              <p>First  paragraph.</p>
              <noscript>Enable JS</noscript>
              <div>   </div>
              <p>Second <b>bold</b> part</p>
            </body></html>"#;

        let text = HtmlRenderer::new().render(html);
        assert_eq!(text, "Headline\nFirst  paragraph.\nSecond\nbold\npart");
    }

    #[test]
    fn test_plain_text_input() {
        assert_eq!(HtmlRenderer::new().render("just text"), "just text");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(HtmlRenderer::new().render(""), "");
    }
}
