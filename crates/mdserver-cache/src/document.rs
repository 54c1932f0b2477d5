//! Rendered document values.

use std::fs::Metadata;
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use mdserver_renderer::Renderer;

/// Modification stamp of a document's source file.
///
/// Only meaningful when compared against another stamp of the same file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceVersion(SystemTime);

impl SourceVersion {
    /// Read the modification stamp from file metadata.
    pub fn from_metadata(metadata: &Metadata) -> io::Result<Self> {
        metadata.modified().map(Self)
    }

    /// The modification time as a `SystemTime`.
    #[must_use]
    pub fn system_time(self) -> SystemTime {
        self.0
    }

    /// Nanoseconds since the Unix epoch (0 for earlier timestamps).
    #[must_use]
    pub fn unix_nanos(self) -> u128 {
        self.0
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos())
    }
}

impl From<SystemTime> for SourceVersion {
    fn from(time: SystemTime) -> Self {
        Self(time)
    }
}

/// A rendered document derived from one Markdown source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// First line of the source file.
    pub title: String,
    /// Remaining lines rendered to HTML markup. Trusted for verbatim output.
    pub body: String,
    /// Modification stamp of the source at render time.
    pub source_version: SourceVersion,
}

impl Document {
    /// Build a document from raw source text.
    ///
    /// The first line becomes the title; everything after it goes through
    /// `renderer`.
    pub fn render(source: &str, source_version: SourceVersion, renderer: &dyn Renderer) -> Self {
        let (title, markdown) = split_title(source);
        Self {
            title: title.to_owned(),
            body: renderer.render(markdown),
            source_version,
        }
    }
}

/// Split source text into its first line and the remainder.
///
/// A trailing `\r` is dropped from the title so CRLF files produce clean
/// titles. Text without a newline is all title and no body.
pub fn split_title(source: &str) -> (&str, &str) {
    let (title, body) = source.split_once('\n').unwrap_or((source, ""));
    (title.strip_suffix('\r').unwrap_or(title), body)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;

    fn echo(markdown: &str) -> String {
        markdown.to_owned()
    }

    #[test]
    fn test_split_title_and_body() {
        assert_eq!(split_title("Hello\nWorld\nFoo"), ("Hello", "World\nFoo"));
    }

    #[test]
    fn test_split_title_only() {
        assert_eq!(split_title("Just a title"), ("Just a title", ""));
    }

    #[test]
    fn test_split_empty_source() {
        assert_eq!(split_title(""), ("", ""));
    }

    #[test]
    fn test_split_crlf_title() {
        assert_eq!(split_title("Title\r\nBody\r\n"), ("Title", "Body\r\n"));
    }

    #[test]
    fn test_split_keeps_blank_lines_in_body() {
        assert_eq!(split_title("T\n\nPara"), ("T", "\nPara"));
    }

    #[test]
    fn test_render_document() {
        let version = SourceVersion::from(UNIX_EPOCH + Duration::from_secs(42));
        let document = Document::render("Hello\nWorld\nFoo", version, &echo);

        assert_eq!(document.title, "Hello");
        assert_eq!(document.body, "World\nFoo");
        assert_eq!(document.source_version, version);
    }

    #[test]
    fn test_unix_nanos() {
        let version = SourceVersion::from(UNIX_EPOCH + Duration::new(1, 5));
        assert_eq!(version.unix_nanos(), 1_000_000_005);
    }

    #[test]
    fn test_unix_nanos_before_epoch() {
        let version = SourceVersion::from(UNIX_EPOCH - Duration::from_secs(1));
        assert_eq!(version.unix_nanos(), 0);
    }
}
