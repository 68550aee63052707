use crate::autotagger::TagProposal;

/// How the user left the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Write the selected tags.
    Apply,
    /// Leave the document untouched.
    Cancel,
}

/// Application state for the tag preview.
///
/// Holds the proposed tags with a checkbox per tag, the list cursor, and the
/// scroll offset of the body preview.
#[derive(Debug, Clone)]
pub struct App {
    /// Display name of the document being tagged
    file_name: String,
    /// Proposed tags in generation order
    tags: Vec<String>,
    /// Checkbox state, parallel to `tags`
    selected: Vec<bool>,
    /// Index of the highlighted tag
    cursor: usize,
    /// Note body shown in the preview pane
    excerpt: String,
    /// Scroll offset for the preview pane
    preview_scroll: u16,
    decision: Option<Decision>,
}

impl App {
    /// Creates the preview state for a proposal with every tag selected.
    ///
    /// # Examples
    ///
    /// ```
    /// use notetag::autotagger::TagProposal;
    /// use notetag::tui::App;
    ///
    /// let proposal = TagProposal::new("notes/idea.md", vec!["rust".into(), "cli".into()], "Body");
    /// let app = App::new(&proposal);
    /// assert_eq!(app.file_name(), "idea.md");
    /// assert_eq!(app.selected_tags(), vec!["rust", "cli"]);
    /// ```
    pub fn new(proposal: &TagProposal) -> Self {
        let file_name = proposal
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| proposal.path().display().to_string());

        Self {
            file_name,
            tags: proposal.tags().to_vec(),
            selected: vec![true; proposal.tags().len()],
            cursor: 0,
            excerpt: proposal.excerpt().to_string(),
            preview_scroll: 0,
            decision: None,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }

    pub fn preview_scroll(&self) -> u16 {
        self.preview_scroll
    }

    pub fn decision(&self) -> Option<Decision> {
        self.decision
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|s| **s).count()
    }

    /// Returns the checked tags in proposal order.
    pub fn selected_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .map(|(tag, _)| tag.clone())
            .collect()
    }

    /// Moves the cursor down, wrapping to the first tag.
    pub fn next(&mut self) {
        if !self.tags.is_empty() {
            self.cursor = (self.cursor + 1) % self.tags.len();
        }
    }

    /// Moves the cursor up, wrapping to the last tag.
    pub fn previous(&mut self) {
        if !self.tags.is_empty() {
            self.cursor = self.cursor.checked_sub(1).unwrap_or(self.tags.len() - 1);
        }
    }

    pub fn toggle_current(&mut self) {
        if let Some(selected) = self.selected.get_mut(self.cursor) {
            *selected = !*selected;
        }
    }

    pub fn select_all(&mut self) {
        self.selected.fill(true);
    }

    pub fn select_none(&mut self) {
        self.selected.fill(false);
    }

    pub fn scroll_preview_down(&mut self, lines: u16) {
        self.preview_scroll = self.preview_scroll.saturating_add(lines);
    }

    pub fn scroll_preview_up(&mut self, lines: u16) {
        self.preview_scroll = self.preview_scroll.saturating_sub(lines);
    }

    pub fn apply(&mut self) {
        self.decision = Some(Decision::Apply);
    }

    pub fn cancel(&mut self) {
        self.decision = Some(Decision::Cancel);
    }
}
