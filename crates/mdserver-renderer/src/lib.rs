//! Markdown rendering for mdserver.
//!
//! This crate defines the [`Renderer`] seam used by the document cache and
//! ships the default [`HtmlRenderer`] backed by `pulldown-cmark`.
//!
//! A renderer is a pure function from Markdown text to HTML markup. It holds no
//! per-call state, so a single instance is shared by every request thread.
//! Closures implement [`Renderer`] as well, which keeps tests free of a real
//! Markdown engine:
//!
//! ```
//! use mdserver_renderer::{HtmlRenderer, Renderer};
//!
//! let html = HtmlRenderer::new().render("**Bold** text");
//! assert_eq!(html, "<p><strong>Bold</strong> text</p>\n");
//!
//! let upper = |markdown: &str| markdown.to_uppercase();
//! assert_eq!(upper.render("hi"), "HI");
//! ```

mod html;

pub use html::HtmlRenderer;

/// Converts Markdown text into HTML markup.
///
/// Implementations must be pure: the same input always yields the same
/// output, and rendering never touches shared state.
pub trait Renderer: Send + Sync {
    /// Render Markdown source to HTML markup.
    fn render(&self, markdown: &str) -> String;
}

impl<F> Renderer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn render(&self, markdown: &str) -> String {
        self(markdown)
    }
}
