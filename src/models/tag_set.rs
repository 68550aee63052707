use std::collections::HashSet;

/// An ordered collection of tags with set semantics.
///
/// Tags are deduplicated by exact string equality and keep the order in which
/// they were first inserted. No case folding happens here; callers decide how
/// tags are normalized before they reach the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<String>,
    seen: HashSet<String>,
}

impl TagSet {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tag, returning `false` if it was already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use notetag::TagSet;
    ///
    /// let mut tags = TagSet::new();
    /// assert!(tags.insert("rust"));
    /// assert!(!tags.insert("rust"));
    /// assert!(tags.insert("Rust"));
    /// assert_eq!(tags.as_slice(), &["rust", "Rust"]);
    /// ```
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.seen.contains(&tag) {
            return false;
        }
        self.seen.insert(tag.clone());
        self.tags.push(tag);
        true
    }

    /// Returns `true` if the exact tag is present.
    pub fn contains(&self, tag: &str) -> bool {
        self.seen.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates over the tags in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn into_vec(self) -> Vec<String> {
        self.tags
    }

    /// Returns the union of this set and `other`.
    ///
    /// Existing tags come first, followed by tags from `other` that were not
    /// already present, in the order `other` yields them.
    ///
    /// # Examples
    ///
    /// ```
    /// use notetag::TagSet;
    ///
    /// let existing: TagSet = ["notes", "rust"].into_iter().collect();
    /// let merged = existing.union(["go", "rust", "cli"]);
    /// assert_eq!(merged.as_slice(), &["notes", "rust", "go", "cli"]);
    /// ```
    #[must_use]
    pub fn union<I, S>(&self, other: I) -> TagSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut merged = self.clone();
        merged.extend(other);
        merged
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<String>> Extend<S> for TagSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for tag in iter {
            self.insert(tag);
        }
    }
}

impl IntoIterator for TagSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}
