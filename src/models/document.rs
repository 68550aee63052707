use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Matches a `---` delimited header at the very start of a document.
///
/// An empty header (`---\n---\n`) is tried first so that a later `---` line
/// in the body is never taken as the closing delimiter. The closing delimiter
/// may end the file.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\A---[ \t]*\r?\n(?:---[ \t]*(?:\r?\n|\z)|((?s:.*?))\r?\n---[ \t]*(?:\r?\n|\z))",
    )
    .expect("header pattern is valid")
});

/// A markdown document split into an optional metadata header and a body.
///
/// The text is held as read; nothing is normalized. Byte ranges into the text
/// locate the header content and the start of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    header: Option<Range<usize>>,
    body_start: usize,
}

impl Document {
    /// Parses document text, locating the metadata header if one exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use notetag::Document;
    ///
    /// let doc = Document::parse("---\ntitle: Hello\n---\n# Hello\n");
    /// assert_eq!(doc.header(), Some("title: Hello"));
    /// assert_eq!(doc.body(), "# Hello\n");
    ///
    /// let plain = Document::parse("# Just a body");
    /// assert_eq!(plain.header(), None);
    /// assert_eq!(plain.body(), "# Just a body");
    /// ```
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();

        let Some(caps) = HEADER_RE.captures(&text) else {
            return Self {
                text,
                header: None,
                body_start: 0,
            };
        };

        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let content = match caps.get(1) {
            Some(m) => m.range(),
            None => {
                // Empty header: content sits right after the opening line.
                let open_end = text[whole.clone()].find('\n').map_or(whole.end, |i| i + 1);
                open_end..open_end
            }
        };

        Self {
            header: Some(content),
            body_start: whole.end,
            text,
        }
    }

    /// Returns the full document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }

    /// Returns the header content between the delimiter lines.
    pub fn header(&self) -> Option<&str> {
        self.header.clone().map(|range| &self.text[range])
    }

    /// Byte range of the header content within [`Document::text`].
    pub(crate) fn header_range(&self) -> Option<Range<usize>> {
        self.header.clone()
    }

    /// Returns everything after the header's closing delimiter line.
    pub fn body(&self) -> &str {
        &self.text[self.body_start..]
    }
}
