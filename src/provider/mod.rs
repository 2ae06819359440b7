//! Database acquisition
//!
//! Guarantees the character database file exists locally before a scan: open
//! it when present, otherwise download it from the remote source while a
//! concurrent reporter ticks progress dots on stderr.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::config::DatabaseSettings;

/// Interval between progress ticks while a download is running
const PROGRESS_TICK: Duration = Duration::from_millis(150);

/// Failure to make the database available locally
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// The local file exists but cannot be opened, or reopening after a
    /// completed download failed
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The download request failed or returned an error status
    #[error("download from {url} failed: {source}")]
    Fetch { url: String, source: reqwest::Error },
    /// The destination file could not be created or written
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Building the HTTP client failed
    #[error("cannot build HTTP client: {0}")]
    Client(reqwest::Error),
}

/// Acquisition lifecycle. `Ready` and `FetchFailed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    /// Local file not yet checked, or known missing
    Absent,
    /// Download in progress
    Fetching,
    /// Local file opened for reading
    Ready,
    /// Download failed; nothing usable on disk
    FetchFailed,
}

/// Makes the database file available locally, downloading it on first use
pub struct DatabaseProvider {
    client: reqwest::Client,
    url: String,
    state: ProviderState,
    fetches: u32,
}

impl DatabaseProvider {
    /// Build a provider from database settings
    pub fn new(settings: &DatabaseSettings) -> Result<Self, AcquisitionError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs_f64(settings.connect_timeout))
            .build()
            .map_err(AcquisitionError::Client)?;

        Ok(Self {
            client,
            url: settings.url.clone(),
            state: ProviderState::Absent,
            fetches: 0,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> ProviderState {
        self.state
    }

    /// Number of downloads performed. Stays at zero whenever the local file
    /// is already present.
    pub fn fetches(&self) -> u32 {
        self.fetches
    }

    /// Open the database at `path`, downloading it first when missing.
    ///
    /// The file is only opened for reading once the write side has fully
    /// completed, so a partially written database is never returned.
    pub async fn ensure_available(&mut self, path: &Path) -> Result<File, AcquisitionError> {
        match File::open(path) {
            Ok(file) => {
                self.state = ProviderState::Ready;
                Ok(file)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                eprintln!("{} not found\ndownloading {}", path.display(), self.url);
                info!(path = %path.display(), url = %self.url, "database missing, fetching");
                self.state = ProviderState::Fetching;
                match self.fetch(path).await {
                    Ok(()) => {
                        self.state = ProviderState::Ready;
                        File::open(path).map_err(|source| AcquisitionError::Open {
                            path: path.to_path_buf(),
                            source,
                        })
                    }
                    Err(err) => {
                        self.state = ProviderState::FetchFailed;
                        Err(err)
                    }
                }
            }
            Err(source) => Err(AcquisitionError::Open {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Run the download and the progress reporter as a pair, joining both
    /// before returning. A failed download leaves no partial file behind.
    async fn fetch(&mut self, path: &Path) -> Result<(), AcquisitionError> {
        self.fetches += 1;
        let (done_tx, done_rx) = oneshot::channel();
        let reporter = tokio::spawn(report_progress(done_rx));

        let outcome = self.download(path).await;

        // The reporter must observe completion and stop ticking before
        // control returns, on the failure path as well.
        let _ = done_tx.send(());
        let _ = reporter.await;

        if outcome.is_err() {
            // A truncated file would read as a valid database on the next
            // run; remove whatever the failed copy left behind.
            let _ = tokio::fs::remove_file(path).await;
        }
        outcome
    }

    /// Streaming copy from the remote source into `path`. The response body
    /// and the destination handle are scoped here and released on every exit
    /// path.
    async fn download(&self, path: &Path) -> Result<(), AcquisitionError> {
        let fetch_err = |source| AcquisitionError::Fetch {
            url: self.url.clone(),
            source,
        };
        let write_err = |source| AcquisitionError::Write {
            path: path.to_path_buf(),
            source,
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_err)?;

        let mut file = tokio::fs::File::create(path).await.map_err(write_err)?;

        let mut written = 0u64;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(fetch_err)?;
            file.write_all(&chunk).await.map_err(write_err)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(write_err)?;

        debug!(bytes = written, "download complete");
        Ok(())
    }
}

/// Tick a dot on stderr until the download signals completion, then close
/// the line with a newline.
async fn report_progress(mut done: oneshot::Receiver<()>) {
    let mut ticks = tokio::time::interval(PROGRESS_TICK);
    loop {
        tokio::select! {
            _ = &mut done => {
                eprintln!();
                return;
            }
            _ = ticks.tick() => {
                eprint!(".");
                let _ = io::stderr().flush();
            }
        }
    }
}
