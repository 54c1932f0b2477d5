//! HTML renderer backed by `pulldown-cmark`.

use pulldown_cmark::{Options, Parser, html};

use crate::Renderer;

/// Default Markdown renderer producing HTML5 fragments.
///
/// GFM extensions are enabled by default:
/// - Tables
/// - Strikethrough (`~~text~~`)
/// - Task lists (`- [ ] item`)
/// - Footnotes
///
/// Smart punctuation (curly quotes, en/em dashes) is on as well and can be
/// switched off with [`with_smart_punctuation`](Self::with_smart_punctuation).
#[derive(Clone, Debug)]
pub struct HtmlRenderer {
    gfm: bool,
    smart_punctuation: bool,
}

impl HtmlRenderer {
    /// Create a renderer with GFM and smart punctuation enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gfm: true,
            smart_punctuation: true,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Enable or disable smart punctuation.
    #[must_use]
    pub fn with_smart_punctuation(mut self, enabled: bool) -> Self {
        self.smart_punctuation = enabled;
        self
    }

    /// Get parser options based on configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options |= Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_FOOTNOTES;
        }
        if self.smart_punctuation {
            options |= Options::ENABLE_SMART_PUNCTUATION;
        }
        options
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.parser_options());
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}
