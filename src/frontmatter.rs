//! Reading and rewriting the `tags` field of a note's frontmatter.
//!
//! Only the header content located by [`Document`] is inspected; the body is
//! never scanned. Three spellings of the field are recognized, in order of
//! precedence:
//!
//! - inline list: `tags: [a, "b", 'c']` (may span lines)
//! - block list: `tags:` followed by one `- item` per line
//! - scalar: `tags: a, b`
//!
//! # Examples
//!
//! ```
//! use notetag::Document;
//! use notetag::frontmatter::{extract_existing_tags, merge_tags};
//!
//! let doc = Document::parse("---\ntitle: Notes\ntags:\n  - rust\n---\nBody\n");
//! assert_eq!(extract_existing_tags(&doc).as_slice(), &["rust"]);
//!
//! let merged = merge_tags(&doc, ["cli", "rust"]);
//! assert_eq!(
//!     merged.text(),
//!     "---\ntitle: Notes\ntags: [\"rust\", \"cli\"]\n---\nBody\n"
//! );
//! ```

mod field;
mod merge;

pub(crate) use field::sanitize_tag;
pub use merge::{merge_tags, render_inline_tags};

use crate::models::{Document, TagSet};

/// Returns the tags listed in the document's frontmatter.
///
/// Values are stripped of quote, bracket and backslash characters with
/// whitespace collapsed; empty entries are dropped. Returns an empty set when there is no header or no `tags` field.
pub fn extract_existing_tags(doc: &Document) -> TagSet {
    doc.header()
        .and_then(field::locate)
        .map(|field| field.tags.into_iter().collect())
        .unwrap_or_default()
}
