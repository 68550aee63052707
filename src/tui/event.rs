//! Keyboard event handling for the tag preview.
//!
//! Maps crossterm keyboard events to application state changes.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::App;

/// Lines scrolled per page key in the preview pane.
const PAGE_LINES: u16 = 10;

/// Handles a keyboard event and updates the app state accordingly.
///
/// Returns `true` once the user has applied or cancelled.
///
/// # Event Handling
///
/// - `j`/`Down`, `k`/`Up`: move between tags
/// - `Space`: toggle the highlighted tag
/// - `a` / `n`: select all / none
/// - `PageDown` / `PageUp`: scroll the note preview
/// - `Enter`: apply the selected tags
/// - `Esc`, `q`, `Ctrl+C`: cancel
///
/// # Examples
///
/// ```
/// use notetag::autotagger::TagProposal;
/// use notetag::tui::{App, Decision, event::handle_key_event};
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// let proposal = TagProposal::new("a.md", vec!["rust".into()], "");
/// let mut app = App::new(&proposal);
/// let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
/// assert!(handle_key_event(&mut app, key));
/// assert_eq!(app.decision(), Some(Decision::Apply));
/// ```
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.cancel();
        return true;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Char(' ') => app.toggle_current(),
        KeyCode::Char('a') => app.select_all(),
        KeyCode::Char('n') => app.select_none(),
        KeyCode::PageDown => app.scroll_preview_down(PAGE_LINES),
        KeyCode::PageUp => app.scroll_preview_up(PAGE_LINES),
        KeyCode::Enter => {
            app.apply();
            return true;
        }
        KeyCode::Esc | KeyCode::Char('q') => {
            app.cancel();
            return true;
        }
        _ => {}
    }

    false
}
