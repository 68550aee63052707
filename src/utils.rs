//! Shared path helpers used by the CLI and the document store.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File extension recognised as a note.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Gets the cross-platform settings path.
///
/// Returns the path as `{config_dir}/notetag/config.toml` where `config_dir` is:
/// - Linux: `~/.config`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the config directory cannot be determined.
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;

    Ok(config_dir.join("notetag").join("config.toml"))
}

/// Ensures the parent directory of the settings file exists.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_config_directory(config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }
    Ok(())
}

/// Returns true when `path` has a `.md` extension (case-insensitive).
///
/// # Examples
///
/// ```
/// use notetag::utils::is_markdown_file;
/// use std::path::Path;
///
/// assert!(is_markdown_file(Path::new("notes/idea.md")));
/// assert!(is_markdown_file(Path::new("README.MD")));
/// assert!(!is_markdown_file(Path::new("image.png")));
/// ```
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn config_path_ends_with_app_file() {
        let path = get_config_path().unwrap();
        assert!(path.ends_with("notetag/config.toml"));
    }

    #[test]
    fn ensure_config_directory_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("config.toml");
        ensure_config_directory(&path).unwrap();
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn markdown_detection_ignores_other_extensions() {
        assert!(!is_markdown_file(Path::new("notes/draft.markdown.txt")));
        assert!(!is_markdown_file(Path::new("notes/md")));
    }
}
