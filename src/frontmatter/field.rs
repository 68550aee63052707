use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static INLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^tags:[ \t]*\[((?s:.*?))\]").expect("inline tags pattern is valid")
});

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^tags:[ \t]*\r?$((?:\n[ \t]*-[^\n]*)*)").expect("block tags pattern is valid")
});

static SCALAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^tags:[ \t]*(\S[^\r\n]*)").expect("scalar tags pattern is valid")
});

/// Spelling of a `tags` field inside a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldForm {
    Inline,
    Block,
    Scalar,
}

/// A located `tags` field: its byte span within the header and its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TagsField {
    pub span: Range<usize>,
    pub form: FieldForm,
    pub tags: Vec<String>,
}

/// Finds the top-level `tags` field in header content.
pub(crate) fn locate(header: &str) -> Option<TagsField> {
    if let Some(caps) = INLINE_RE.captures(header) {
        let whole = caps.get(0)?;
        let items = caps.get(1).map_or("", |m| m.as_str());
        return Some(TagsField {
            span: whole.range(),
            form: FieldForm::Inline,
            tags: split_list(items),
        });
    }

    if let Some(caps) = BLOCK_RE.captures(header) {
        let whole = caps.get(0)?;
        let items = caps.get(1).map_or("", |m| m.as_str());
        let tags = items
            .lines()
            .map(|line| line.trim().trim_start_matches('-'))
            .map(sanitize_tag)
            .filter(|tag| !tag.is_empty())
            .collect();
        return Some(TagsField {
            span: whole.range(),
            form: FieldForm::Block,
            tags,
        });
    }

    let caps = SCALAR_RE.captures(header)?;
    let whole = caps.get(0)?;
    let value = caps.get(1).map_or("", |m| m.as_str());
    Some(TagsField {
        span: whole.range(),
        form: FieldForm::Scalar,
        tags: split_list(value.trim_matches(|c| c == '[' || c == ']')),
    })
}

fn split_list(items: &str) -> Vec<String> {
    items
        .split(',')
        .map(sanitize_tag)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Characters an inline list item cannot carry without changing meaning on
/// the next read.
const RESERVED: &[char] = &['"', '\'', '[', ']', ',', '\\'];

/// Reduces a tag to the form the inline list writes and reads back unchanged.
///
/// Reserved characters are removed and runs of whitespace collapse to a single
/// space.
pub(crate) fn sanitize_tag(raw: &str) -> String {
    raw.replace(RESERVED, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_takes_precedence_over_block() {
        let header = "tags: [a]\nother:\n  - b";
        let field = locate(header).unwrap();
        assert_eq!(field.form, FieldForm::Inline);
        assert_eq!(field.tags, vec!["a"]);
        assert_eq!(&header[field.span], "tags: [a]");
    }

    #[test]
    fn inline_list_spanning_lines() {
        let header = "tags: [\n  a,\n  b\n]\ntitle: t";
        let field = locate(header).unwrap();
        assert_eq!(field.form, FieldForm::Inline);
        assert_eq!(field.tags, vec!["a", "b"]);
        assert_eq!(&header[field.span], "tags: [\n  a,\n  b\n]");
    }

    #[test]
    fn block_span_excludes_trailing_newline() {
        let header = "tags:\n  - a\n  - b\ntitle: t";
        let field = locate(header).unwrap();
        assert_eq!(field.form, FieldForm::Block);
        assert_eq!(&header[field.span], "tags:\n  - a\n  - b");
    }

    #[test]
    fn empty_block_field() {
        let header = "title: t\ntags:\ndate: d";
        let field = locate(header).unwrap();
        assert_eq!(field.form, FieldForm::Block);
        assert!(field.tags.is_empty());
        assert_eq!(&header[field.span], "tags:");
    }

    #[test]
    fn crlf_block_items_are_trimmed() {
        let header = "tags:\r\n  - a\r\n  - b\r\ntitle: t";
        let field = locate(header).unwrap();
        assert_eq!(field.form, FieldForm::Block);
        assert_eq!(field.tags, vec!["a", "b"]);
    }

    #[test]
    fn scalar_value() {
        let field = locate("tags: one").unwrap();
        assert_eq!(field.form, FieldForm::Scalar);
        assert_eq!(field.tags, vec!["one"]);
    }

    #[test]
    fn field_must_start_at_line_start() {
        assert!(locate("subtags: [a]").is_none());
        assert!(locate("  tags: [a]").is_none());
    }

    #[test]
    fn quotes_are_stripped() {
        let field = locate(r#"tags: ["it's", 'b']"#).unwrap();
        assert_eq!(field.tags, vec!["its", "b"]);
    }

    #[test]
    fn sanitize_removes_reserved_characters() {
        assert_eq!(sanitize_tag(r#"say "hi" there"#), "say hi there");
        assert_eq!(sanitize_tag("a]b"), "ab");
        assert_eq!(sanitize_tag("[x], y\\z"), "x yz");
        assert_eq!(sanitize_tag("  deep \n learning\t"), "deep learning");
        assert_eq!(sanitize_tag("\"\""), "");
    }

    #[test]
    fn block_item_with_comma_reads_as_one_tag() {
        let field = locate("tags:\n  - a, b").unwrap();
        assert_eq!(field.tags, vec!["a b"]);
    }
}
