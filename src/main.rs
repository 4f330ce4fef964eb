use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use prepdeck::app::{App, AppEvent};
use prepdeck::config::Config;
use prepdeck::loader::QuestionSource;
use prepdeck::storage::{Database, DatabaseError};
use prepdeck::theme::{ThemeStore, THEME_PREF_KEY};
use prepdeck::ui;

/// Timeout for fetching a remote question set.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Get the config directory path (~/.config/prepdeck/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("prepdeck");
    Ok(config_dir)
}

/// Send tracing output to a log file in the config directory; stderr would
/// draw over the TUI.
fn init_tracing(config_dir: &std::path::Path) -> Result<()> {
    let log_path = config_dir.join("prepdeck.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file '{}'", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[derive(Parser, Debug)]
#[command(
    name = "prepdeck",
    about = "Browse and search frontend interview questions in the terminal"
)]
struct Args {
    /// Question set to load: a JSON file path or an http(s) URL
    #[arg(long, short, value_name = "SOURCE")]
    questions: Option<String>,

    /// Config file (defaults to ~/.config/prepdeck/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Forget the saved theme choice
    #[arg(long)]
    reset_prefs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    init_tracing(&config_dir)?;

    // User-only access to the preference store and log
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;

    // Open preference store
    let db_path = config_dir.join("prefs.db");
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of prepdeck appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open preference store: {}", e));
        }
    };

    if args.reset_prefs {
        db.delete_preference(THEME_PREF_KEY)
            .await
            .context("Failed to reset preferences")?;
        println!("Preferences reset.");
    }

    let theme_store = ThemeStore::load_or(db, config.default_theme()).await;

    let source = match args.questions.as_deref().or(config.questions.as_deref()) {
        Some(s) => QuestionSource::parse(s),
        None => QuestionSource::File(config_dir.join("questions.json")),
    };
    tracing::info!(source = %source, "Starting");

    let http_client = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let mut app = App::new(theme_store, http_client, source);

    let warnings = app.keybindings.apply_overrides(&config.keybindings);
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Keybinding override ignored");
    }
    if let Some(first) = warnings.first() {
        app.set_status(format!("Config: {}", first));
    }

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
