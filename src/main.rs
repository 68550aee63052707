use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notetag::autotagger::{AutoTagger, AutoTaggerBuilder, TagOutcome};
use notetag::config::ConfigError;
use notetag::provider::{ProviderClientBuilder, ProviderError};
use notetag::store::{DocumentStore, FsDocumentStore};
use notetag::utils::{ensure_config_directory, get_config_path, is_markdown_file};
use notetag::{ProviderKind, Settings, tui};
use tracing_subscriber::EnvFilter;

/// notetag - propose tags for markdown notes with an LLM
#[derive(Parser, Debug)]
#[command(name = "notetag")]
#[command(about = "Propose tags for markdown notes with an LLM and merge them into the frontmatter")]
#[command(version)]
struct Cli {
    /// Settings file to use instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate tags for a single note
    Tag(TagCommand),
    /// Generate tags for every markdown note under a directory
    Batch(BatchCommand),
    /// Inspect or create the settings file
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Generate tags for a single note
#[derive(Parser, Debug)]
struct TagCommand {
    /// The markdown note to tag
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Provider to use instead of the configured default (openai or claude)
    #[arg(short, long, value_name = "PROVIDER")]
    provider: Option<ProviderKind>,

    /// Apply generated tags without the preview
    #[arg(short = 'y', long)]
    yes: bool,

    /// Print the proposed tags without writing anything
    #[arg(long, conflicts_with = "yes")]
    dry_run: bool,
}

/// Generate tags for every markdown note under a directory
#[derive(Parser, Debug)]
struct BatchCommand {
    /// Directory to scan (defaults to the current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Provider to use instead of the configured default (openai or claude)
    #[arg(short, long, value_name = "PROVIDER")]
    provider: Option<ProviderKind>,

    /// Skip the confirmation prompt and apply tags without previews
    #[arg(short = 'y', long)]
    yes: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the settings file location
    Path,
    /// Print the effective settings with API keys hidden
    Show,
    /// Write a settings file with default values
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

/// A mistake in how the command was invoked.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct UsageError(String);

fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Logs go to stderr, filtered by `NOTETAG_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("NOTETAG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => get_config_path()?,
    };

    match &cli.command {
        Commands::Tag(cmd) => handle_tag(cmd, &config_path),
        Commands::Batch(cmd) => handle_batch(cmd, &config_path),
        Commands::Config(cmd) => handle_config(cmd, &config_path),
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are bad invocations and configuration problems, including a
/// missing API key. Everything else (network, I/O, provider failures) is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause.is::<UsageError>()
            || cause.is::<ConfigError>()
            || cause
                .downcast_ref::<ProviderError>()
                .is_some_and(ProviderError::is_config_error)
    })
}

/// Loads settings and applies a command-line provider override.
fn load_settings(config_path: &Path, provider: Option<ProviderKind>) -> Result<Settings> {
    let settings = Settings::load(config_path)?;
    Ok(match provider {
        Some(kind) => settings.with_provider(kind),
        None => settings,
    })
}

/// Fails early when the selected provider has no key, before any file is read.
fn require_api_key(settings: &Settings) -> Result<()> {
    let provider = settings.default_provider;
    if settings.api_key(provider).is_none() {
        return Err(ProviderError::MissingApiKey { provider }.into());
    }
    Ok(())
}

fn build_tagger(settings: &Settings) -> Result<AutoTagger> {
    let client = ProviderClientBuilder::new()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()
        .context("Failed to create provider client")?;

    Ok(AutoTaggerBuilder::new().client(Arc::new(client)).build())
}

/// Prints a successful outcome, or turns a failed one into an error.
fn report_outcome(outcome: &TagOutcome) -> Result<()> {
    if outcome.is_failure() {
        anyhow::bail!("{outcome}");
    }
    println!("{outcome}");
    Ok(())
}

/// Handles the tag command for a single note.
fn handle_tag(cmd: &TagCommand, config_path: &Path) -> Result<()> {
    if !cmd.file.is_file() {
        return Err(UsageError(format!("File not found: {}", cmd.file.display())).into());
    }
    if !is_markdown_file(&cmd.file) {
        return Err(UsageError(format!("Not a markdown file: {}", cmd.file.display())).into());
    }

    let mut settings = load_settings(config_path, cmd.provider)?;
    require_api_key(&settings)?;
    if cmd.yes {
        settings.auto_apply_tags = true;
    }
    if cmd.dry_run {
        settings.auto_apply_tags = false;
    }

    let tagger = build_tagger(&settings)?;
    let store = FsDocumentStore::new(".");

    let outcome = match tagger.tag_document(&store, &cmd.file, &settings) {
        proposed @ TagOutcome::Proposed(_) if cmd.dry_run => proposed,
        TagOutcome::Proposed(proposal) => {
            let selected = tui::confirm_tags(&proposal)?;
            tagger.apply_selection(&store, &proposal, &selected)
        }
        other => other,
    };

    report_outcome(&outcome)
}

/// Handles the batch command for a directory of notes.
fn handle_batch(cmd: &BatchCommand, config_path: &Path) -> Result<()> {
    let dir = cmd.dir.clone().unwrap_or_else(|| PathBuf::from("."));
    if !dir.is_dir() {
        return Err(UsageError(format!("Not a directory: {}", dir.display())).into());
    }

    let mut settings = load_settings(config_path, cmd.provider)?;
    require_api_key(&settings)?;
    if cmd.yes {
        settings.auto_apply_tags = true;
    }

    let store = FsDocumentStore::new(&dir);
    let paths = store
        .list_documents()
        .with_context(|| format!("Failed to list notes in {}", dir.display()))?;

    if paths.is_empty() {
        println!("No markdown files found in {}", dir.display());
        return Ok(());
    }

    if !(cmd.yes || settings.batch_processing) && !confirm_batch(paths.len())? {
        println!("Batch cancelled");
        return Ok(());
    }

    let tagger = build_tagger(&settings)?;
    let report = tagger.run_batch(&store, &paths, &settings, tui::confirm_tags);

    for (path, message) in &report.failures {
        eprintln!("{}: {message}", path.display());
    }
    println!("{report}");
    if report.updated > 0 {
        println!(
            "Added {} tags across {} notes",
            report.tags_added, report.updated
        );
    }
    Ok(())
}

/// Asks on stdin whether to start a batch over `count` notes.
fn confirm_batch(count: usize) -> Result<bool> {
    let mut stderr = io::stderr();
    write!(
        stderr,
        "Generate tags for {count} notes? This may take a while and consume API credits. [y/N] "
    )?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Handles the config subcommands.
fn handle_config(cmd: &ConfigCommand, config_path: &Path) -> Result<()> {
    match cmd {
        ConfigCommand::Path => {
            println!("{}", config_path.display());
        }
        ConfigCommand::Show => {
            let settings = Settings::load(config_path)?;
            print!("{}", settings.redacted().to_toml_string()?);
        }
        ConfigCommand::Init { force } => {
            if config_path.exists() && !force {
                return Err(UsageError(format!(
                    "Settings file already exists: {} (use --force to overwrite)",
                    config_path.display()
                ))
                .into());
            }
            ensure_config_directory(config_path)?;
            Settings::default().save(config_path)?;
            println!("Wrote default settings to {}", config_path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn tag_command_parses_flags() {
        let cli = Cli::try_parse_from(["notetag", "tag", "note.md", "--provider", "claude", "-y"])
            .unwrap();
        let Commands::Tag(cmd) = cli.command else {
            panic!("expected tag command");
        };
        assert_eq!(cmd.file, PathBuf::from("note.md"));
        assert_eq!(cmd.provider, Some(ProviderKind::Claude));
        assert!(cmd.yes);
        assert!(!cmd.dry_run);
    }

    #[test]
    fn tag_command_rejects_unknown_provider() {
        let result = Cli::try_parse_from(["notetag", "tag", "note.md", "--provider", "gemini"]);
        assert!(result.is_err());
    }

    #[test]
    fn dry_run_conflicts_with_yes() {
        let result = Cli::try_parse_from(["notetag", "tag", "note.md", "--dry-run", "--yes"]);
        assert!(result.is_err());
    }

    #[test]
    fn batch_dir_is_optional() {
        let cli = Cli::try_parse_from(["notetag", "batch"]).unwrap();
        let Commands::Batch(cmd) = cli.command else {
            panic!("expected batch command");
        };
        assert_eq!(cmd.dir, None);
        assert!(!cmd.yes);
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["notetag", "config", "show", "--config", "/tmp/x.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
        assert!(matches!(cli.command, Commands::Config(ConfigCommand::Show)));
    }

    #[test]
    fn config_init_force_flag() {
        let cli = Cli::try_parse_from(["notetag", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommand::Init { force: true })
        ));
    }

    #[test]
    fn user_errors_map_to_exit_code_one() {
        let missing_key: anyhow::Error = ProviderError::MissingApiKey {
            provider: ProviderKind::OpenAi,
        }
        .into();
        assert!(is_user_error(&missing_key));

        let usage: anyhow::Error = UsageError("File not found: x.md".to_string()).into();
        assert!(is_user_error(&usage));

        let invalid: anyhow::Error = ConfigError::Invalid("max_tags".to_string()).into();
        assert!(is_user_error(&invalid.context("Failed to load settings")));
    }

    #[test]
    fn provider_failures_are_internal_errors() {
        let http: anyhow::Error = ProviderError::Http {
            provider: ProviderKind::Claude,
            status: 500,
        }
        .into();
        assert!(!is_user_error(&http));
        assert!(!is_user_error(&anyhow::anyhow!("disk full")));
    }

    #[test]
    fn require_api_key_checks_selected_provider() {
        let settings = Settings {
            openai_api_key: "sk-1".to_string(),
            ..Settings::default()
        };
        assert!(require_api_key(&settings).is_ok());

        let err = require_api_key(&settings.with_provider(ProviderKind::Claude)).unwrap_err();
        assert_eq!(err.to_string(), "Claude API key not configured");
        assert!(is_user_error(&err));
    }

    #[test]
    fn confirmation_accepts_only_yes() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("no"));
    }

    #[test]
    fn config_init_refuses_to_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        handle_config(&ConfigCommand::Init { force: false }, &path).unwrap();
        assert!(path.exists());

        let err = handle_config(&ConfigCommand::Init { force: false }, &path).unwrap_err();
        assert!(is_user_error(&err));

        handle_config(&ConfigCommand::Init { force: true }, &path).unwrap();
    }

    #[test]
    fn tag_missing_file_is_usage_error() {
        let dir = tempdir().unwrap();
        let cmd = TagCommand {
            file: dir.path().join("absent.md"),
            provider: None,
            yes: true,
            dry_run: false,
        };
        let err = handle_tag(&cmd, &dir.path().join("config.toml")).unwrap_err();
        assert!(is_user_error(&err));
        assert!(err.to_string().contains("File not found"));
    }
}
