use crate::models::{Document, TagSet};

use super::field;

/// Renders tags as an inline YAML list field, e.g. `tags: ["a", "b"]`.
///
/// # Examples
///
/// ```
/// use notetag::frontmatter::render_inline_tags;
///
/// assert_eq!(render_inline_tags(["intro", "notes"]), r#"tags: ["intro", "notes"]"#);
/// assert_eq!(render_inline_tags(Vec::<String>::new()), "tags: []");
/// ```
pub fn render_inline_tags<I, S>(tags: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let quoted: Vec<String> = tags
        .into_iter()
        .map(|tag| format!("\"{}\"", tag.as_ref()))
        .collect();
    format!("tags: [{}]", quoted.join(", "))
}

/// Merges `new_tags` into the document's frontmatter.
///
/// With a header present, the existing tags and `new_tags` are unioned
/// (existing first) and written back in place of the current `tags` field,
/// or appended as the last header line when there is none. Without a header,
/// a new one holding only the new tags is placed before the original text.
///
/// New tags are reduced to what an inline list can hold: quote, bracket,
/// comma and backslash characters are dropped and whitespace is collapsed.
/// Everything outside the rewritten field is preserved byte-for-byte, and
/// merging the same tags twice gives the same text as merging them once.
///
/// # Examples
///
/// ```
/// use notetag::Document;
/// use notetag::frontmatter::merge_tags;
///
/// let doc = Document::parse("# Title\nHello world");
/// let merged = merge_tags(&doc, ["intro", "notes"]);
/// assert_eq!(
///     merged.text(),
///     "---\ntags: [\"intro\", \"notes\"]\n---\n\n# Title\nHello world"
/// );
///
/// let again = merge_tags(&merged, ["intro", "notes"]);
/// assert_eq!(again, merged);
/// ```
pub fn merge_tags<I, S>(doc: &Document, new_tags: I) -> Document
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let new_tags = new_tags
        .into_iter()
        .map(|tag| field::sanitize_tag(&Into::<String>::into(tag)))
        .filter(|tag| !tag.is_empty());

    let Some(range) = doc.header_range() else {
        let tags: TagSet = new_tags.collect();
        return Document::parse(format!(
            "---\n{}\n---\n\n{}",
            render_inline_tags(tags.iter()),
            doc.text()
        ));
    };

    let text = doc.text();
    let header = &text[range.clone()];
    let located = field::locate(header);

    let existing: TagSet = located
        .as_ref()
        .map(|f| f.tags.iter().cloned().collect())
        .unwrap_or_default();
    let rendered = render_inline_tags(existing.union(new_tags).iter());

    let new_header = match located {
        Some(f) => {
            let mut out = String::with_capacity(header.len() + rendered.len());
            out.push_str(&header[..f.span.start]);
            out.push_str(&rendered);
            // A block field's span can swallow the `\r` of a CRLF line ending.
            if header[f.span.clone()].ends_with('\r') {
                out.push('\r');
            }
            out.push_str(&header[f.span.end..]);
            out
        }
        None if header.is_empty() => {
            if text[range.end..].starts_with("---") {
                // Header had no content line at all: `---\n---`.
                format!("{rendered}{}", line_ending(text))
            } else {
                rendered
            }
        }
        None => format!("{header}{}{rendered}", line_ending(text)),
    };

    let mut merged = String::with_capacity(text.len() + new_header.len());
    merged.push_str(&text[..range.start]);
    merged.push_str(&new_header);
    merged.push_str(&text[range.end..]);
    Document::parse(merged)
}

fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") { "\r\n" } else { "\n" }
}
