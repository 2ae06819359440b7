//! Charfinder: find Unicode characters by the words in their names
//!
//! This is the main entry point for the application.

use anyhow::{Context as _, Result};
use charfinder::config::Settings;
use charfinder::provider::DatabaseProvider;
use charfinder::query::Query;
use charfinder::records;
use charfinder::web::{create_router, AppState};
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Find Unicode characters by words in their names.
///
/// Words match whole name tokens, in any order: `charfinder cat face` finds
/// every character whose name contains both CAT and FACE. The character
/// database is downloaded on first use.
#[derive(Parser)]
#[command(name = "charfinder", version)]
struct Cli {
    /// Words that must all appear in a character's name
    words: Vec<String>,

    /// Serve the web interface instead of printing matches to stdout
    #[arg(short = 'w', long = "serve")]
    serve: bool,

    /// Path to a YAML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Download from the fallback mirror instead of the canonical source
    #[arg(long)]
    mirror: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is reserved for matches.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if cli.mirror {
        settings.database.url = settings.database.mirror_url.clone();
    }

    let path = settings
        .database
        .resolve_path(dirs::home_dir().as_deref())
        .context("cannot determine a home directory for the character database; set CHARFINDER_UCD_PATH")?;

    let mut provider = DatabaseProvider::new(&settings.database)?;
    let database = provider.ensure_available(&path).await?;

    if cli.serve {
        serve(settings, database).await
    } else {
        list_matches(database, Query::from_words(&cli.words))
    }
}

/// Load settings from --config, the environment, or well-known locations
fn load_settings(override_path: Option<&Path>) -> Result<Settings> {
    let mut settings = match settings_file(override_path) {
        Some(path) => {
            info!("loading settings from {}", path.display());
            Settings::from_file(&path)?
        }
        None => Settings::default(),
    };
    settings.merge_env();
    Ok(settings)
}

fn settings_file(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("CHARFINDER_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }
    dirs::config_dir()
        .map(|dir| dir.join("charfinder/charfinder.yml"))
        .filter(|path| path.exists())
}

/// Scan the database and print one line per match plus a count summary
fn list_matches(database: File, query: Query) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut count = 0usize;
    for record in records::scan_matches(BufReader::new(database), query) {
        writeln!(out, "{}", record?)?;
        count += 1;
    }
    writeln!(out, "{}", records::match_summary(count))?;
    Ok(())
}

/// Read the whole database once and serve the query form
async fn serve(settings: Settings, mut database: File) -> Result<()> {
    let mut content = String::new();
    database.read_to_string(&mut content)?;

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    let state = AppState::new(settings, content)?;
    let app = create_router(state);

    println!("serving charfinder on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
