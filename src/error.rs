use std::path::PathBuf;
use thiserror::Error;

/// Failures that end a run. The render timeout is deliberately absent: it is
/// absorbed by the static renderer and only logged.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not a git repository: {0}")]
    Repository(#[from] git2::Error),
    #[error("Failed to execute git. Is it installed? {0}")]
    GitSpawn(#[source] std::io::Error),
    #[error("`git {args}` failed: {stderr}")]
    Git { args: String, stderr: String },
    #[error(
        "Missing asset `{name}` (expected at {}). \
         Run `commit-html --fetch-assets` to populate the asset cache, \
         or pass --asset-dir pointing at a directory that contains it.",
        .path.display()
    )]
    MissingAsset { name: &'static str, path: PathBuf },
    #[error("Failed to read asset {}: {source}", .path.display())]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to download {url}: {message}")]
    Fetch { url: String, message: String },
    #[error("Static rendering failed: {0}")]
    Render(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an error coming out of the headless browser layer.
    pub fn render(err: impl std::fmt::Display) -> Self {
        Error::Render(format!("{err:#}"))
    }
}
