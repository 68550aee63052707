use crate::frontmatter::sanitize_tag;

/// Maximum length, in characters, of a generated tag.
pub const MAX_TAG_LENGTH: usize = 50;

/// Post-processing layer that turns a model reply into tags.
///
/// Models are asked for a bare comma-separated list, but replies still vary
/// in case, spacing, and quoting. All tags come out lowercase.
pub struct TagNormalizer;

impl TagNormalizer {
    /// Normalizes a single reply entry, returning `None` when it is unusable.
    ///
    /// # Normalization rules
    ///
    /// - Drops quote, bracket, comma and backslash characters and collapses
    ///   whitespace, so the tag survives a frontmatter round trip
    /// - Converts to lowercase
    /// - Rejects empty entries and entries longer than 50 characters
    ///
    /// # Examples
    ///
    /// ```
    /// use notetag::autotagger::TagNormalizer;
    ///
    /// assert_eq!(TagNormalizer::normalize_tag("  Rust "), Some("rust".to_string()));
    /// assert_eq!(TagNormalizer::normalize_tag("\"Machine Learning\""), Some("machine learning".to_string()));
    /// assert_eq!(TagNormalizer::normalize_tag("   "), None);
    /// ```
    #[must_use]
    pub fn normalize_tag(raw: &str) -> Option<String> {
        let tag = sanitize_tag(raw).to_lowercase();

        let len = tag.chars().count();
        (1..=MAX_TAG_LENGTH).contains(&len).then_some(tag)
    }

    /// Parses a comma-separated model reply into at most `max_tags` tags.
    ///
    /// Entries keep their reply order and the first `max_tags` valid entries
    /// win. Duplicates are not removed at this step.
    ///
    /// # Examples
    ///
    /// ```
    /// use notetag::autotagger::TagNormalizer;
    ///
    /// assert_eq!(
    ///     TagNormalizer::parse_model_reply("Rust,  CLI , ,x", 5),
    ///     vec!["rust", "cli", "x"]
    /// );
    /// assert_eq!(TagNormalizer::parse_model_reply("a, b, c", 2), vec!["a", "b"]);
    /// assert!(TagNormalizer::parse_model_reply("", 5).is_empty());
    /// ```
    #[must_use]
    pub fn parse_model_reply(text: &str, max_tags: u8) -> Vec<String> {
        text.split(',')
            .filter_map(Self::normalize_tag)
            .take(usize::from(max_tags))
            .collect()
    }
}
