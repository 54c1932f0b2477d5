//! HTML page templates.
//!
//! Post and error pages share one layout. Document bodies are inserted
//! verbatim; titles are escaped.

use std::fmt::{self, Write};

use axum::http::StatusCode;
use mdserver_cache::Document;

/// Stylesheet linked from every page.
const STYLESHEET: &str = "/static/style.css";

/// Render a post page.
pub(crate) fn render_post(document: &Document) -> Result<String, fmt::Error> {
    let mut content = String::with_capacity(document.body.len() + 128);
    writeln!(content, "<article>")?;
    writeln!(content, "<h1>{}</h1>", escape(&document.title))?;
    content.push_str(&document.body);
    writeln!(content, "</article>")?;
    layout(&document.title, &content)
}

/// Render the error page for `status`.
pub(crate) fn render_error(status: StatusCode) -> Result<String, fmt::Error> {
    let reason = status.canonical_reason().unwrap_or("Error");
    let title = format!("{} {reason}", status.as_u16());

    let mut content = String::with_capacity(128);
    writeln!(content, "<section class=\"error\">")?;
    writeln!(content, "<h1>{}</h1>", escape(&title))?;
    writeln!(content, "<p><a href=\"/\">Back to index</a></p>")?;
    writeln!(content, "</section>")?;
    layout(&title, &content)
}

/// Wrap `content` in the page layout.
fn layout(title: &str, content: &str) -> Result<String, fmt::Error> {
    let mut html = String::with_capacity(content.len() + 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    writeln!(html, "<title>{}</title>", escape(title))?;
    writeln!(html, "<link rel=\"stylesheet\" href=\"{STYLESHEET}\">")?;
    html.push_str("</head>\n<body>\n<main>\n");
    html.push_str(content);
    html.push_str("</main>\n</body>\n</html>\n");
    Ok(html)
}

/// Escape HTML special characters.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
