//! UI rendering functions for the tag preview.
//!
//! Lays out a header with the file name, the tag checklist beside a preview
//! of the note body, and a shortcut bar.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::App;

/// Main rendering function for the preview.
pub fn draw(frame: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content area
            Constraint::Length(1), // Shortcut bar
        ])
        .split(frame.area());

    // Tag list (40%) | note preview (60%)
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_chunks[1]);

    render_header(frame, app, main_chunks[0]);
    render_tag_list(frame, app, content_chunks[0]);
    render_preview(frame, app, content_chunks[1]);
    render_shortcut_bar(frame, main_chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Generated Tags Preview");

    let line = Line::from(vec![
        Span::styled("File: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(app.file_name()),
        Span::styled(
            format!(
                "  ({} of {} tags selected)",
                app.selected_count(),
                app.tags().len()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Formats one checklist row, e.g. `[x] rust`.
fn checkbox_label(tag: &str, selected: bool) -> String {
    let mark = if selected { 'x' } else { ' ' };
    format!("[{mark}] {tag}")
}

fn render_tag_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Tags")
        .border_style(Style::default().fg(Color::Cyan));

    if app.tags().is_empty() {
        frame.render_widget(Paragraph::new("No tags proposed").block(block), area);
        return;
    }

    let items: Vec<ListItem> = app
        .tags()
        .iter()
        .enumerate()
        .map(|(index, tag)| {
            let style = if app.is_selected(index) {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(Line::from(Span::styled(
                checkbox_label(tag, app.is_selected(index)),
                style,
            )))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.cursor()));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Styles the note body line by line: headings bold, list markers cyan.
fn preview_text(excerpt: &str) -> Text<'_> {
    let marker_style = Style::default().fg(Color::Cyan);

    excerpt
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with('#') {
                Line::from(Span::styled(
                    line,
                    Style::default().add_modifier(Modifier::BOLD),
                ))
            } else if let Some(rest) = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
            {
                let indent = &line[..line.len() - trimmed.len()];
                Line::from(vec![
                    Span::raw(indent),
                    Span::styled("• ", marker_style),
                    Span::raw(rest),
                ])
            } else {
                Line::from(line)
            }
        })
        .collect()
}

fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Note");

    let paragraph = Paragraph::new(preview_text(app.excerpt()))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.preview_scroll(), 0));

    frame.render_widget(paragraph, area);
}

/// Renders the shortcut bar at the bottom of the screen.
///
/// Format: `Key: action | Key: action` with keys highlighted in cyan.
fn render_shortcut_bar(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let shortcuts = [
        ("j/k", "move"),
        ("Space", "toggle"),
        ("a/n", "all/none"),
        ("PgUp/PgDn", "scroll"),
        ("Enter", "apply"),
        ("Esc", "cancel"),
    ];

    let mut spans = Vec::with_capacity(shortcuts.len() * 3);
    for (index, (key, action)) in shortcuts.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" | ", sep_style));
        }
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::raw(format!(": {action}")));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autotagger::TagProposal;
    use ratatui::{Terminal, backend::TestBackend};

    // Helper to create a test app with a small proposal
    fn create_test_app() -> App {
        let proposal = TagProposal::new(
            "vault/rust-notes.md",
            vec!["rust".to_string(), "ownership".to_string(), "cli".to_string()],
            "# Borrowing\nReferences must not outlive their owner.",
        );
        App::new(&proposal)
    }

    fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn two_column_layout_structure() {
        let area = Rect::new(0, 0, 100, 30);

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);
        assert_eq!(main_chunks[0].height, 3, "header should be 3 lines tall");
        assert_eq!(main_chunks[2].height, 1, "shortcut bar should be 1 line");

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(main_chunks[1]);

        let total_width = content_chunks[0].width + content_chunks[1].width;
        let left_percentage = (content_chunks[0].width as f32 / total_width as f32) * 100.0;
        assert!(
            (left_percentage - 40.0).abs() < 5.0,
            "tag list should be approximately 40% wide, got {}%",
            left_percentage
        );
    }

    #[test]
    fn checkbox_label_formatting() {
        assert_eq!(checkbox_label("rust", true), "[x] rust");
        assert_eq!(checkbox_label("rust", false), "[ ] rust");
    }

    #[test]
    fn header_shows_file_name_and_selection_count() {
        let mut app = create_test_app();
        app.toggle_current();

        let screen = render_to_string(&app, 100, 20);
        assert!(screen.contains("Generated Tags Preview"));
        assert!(screen.contains("rust-notes.md"));
        assert!(screen.contains("(2 of 3 tags selected)"));
    }

    #[test]
    fn tag_list_reflects_checkbox_state() {
        let mut app = create_test_app();
        app.next();
        app.toggle_current();

        let screen = render_to_string(&app, 100, 20);
        assert!(screen.contains("[x] rust"));
        assert!(screen.contains("[ ] ownership"));
        assert!(screen.contains("[x] cli"));
    }

    #[test]
    fn preview_shows_note_body() {
        let app = create_test_app();
        let screen = render_to_string(&app, 120, 20);
        assert!(screen.contains("References must not outlive"));
    }

    #[test]
    fn preview_styles_headings_and_list_items() {
        let text = preview_text("# Plan\n  - first\nplain");
        assert_eq!(text.lines.len(), 3);
        assert!(text.lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(text.lines[1].spans[0].content, "  ");
        assert_eq!(text.lines[1].spans[1].content, "• ");
        assert_eq!(text.lines[1].spans[2].content, "first");
        assert_eq!(text.lines[2].spans[0].content, "plain");
    }

    #[test]
    fn empty_proposal_renders_placeholder() {
        let app = App::new(&TagProposal::new("a.md", Vec::new(), ""));
        let screen = render_to_string(&app, 80, 12);
        assert!(screen.contains("No tags proposed"));
    }
}
