//! Viewer assets: the highlight theme, the diff2html stylesheet and the
//! diff2html-ui bundle. They live in a local cache directory and are read
//! fully into memory for embedding; `--fetch-assets` populates the cache.

use crate::error::{Error, Result};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// The three assets a document needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    HighlightTheme,
    DiffViewerStyles,
    DiffViewerScript,
}

impl Asset {
    pub const ALL: [Asset; 3] = [
        Asset::HighlightTheme,
        Asset::DiffViewerStyles,
        Asset::DiffViewerScript,
    ];

    /// File name inside the asset cache
    pub fn file_name(&self) -> &'static str {
        match self {
            Asset::HighlightTheme => "highlight-theme.css",
            Asset::DiffViewerStyles => "diff2html.min.css",
            Asset::DiffViewerScript => "diff2html-ui.min.js",
        }
    }

    /// Pinned download location used by `--fetch-assets`
    pub fn source_url(&self) -> &'static str {
        match self {
            Asset::HighlightTheme => {
                "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/github.min.css"
            }
            Asset::DiffViewerStyles => {
                "https://cdn.jsdelivr.net/npm/diff2html@3.4.48/bundles/css/diff2html.min.css"
            }
            Asset::DiffViewerScript => {
                "https://cdn.jsdelivr.net/npm/diff2html@3.4.48/bundles/js/diff2html-ui.min.js"
            }
        }
    }
}

/// Contents of all three assets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBundle {
    pub highlight_theme: String,
    pub diff_viewer_styles: String,
    pub diff_viewer_script: String,
}

impl AssetBundle {
    /// Read every asset from `dir`. There is no partial bundle: the first
    /// missing file fails the load.
    pub fn load(dir: &Path) -> Result<Self> {
        debug!("Loading assets from {}", dir.display());
        Ok(Self {
            highlight_theme: read_required_asset(dir, Asset::HighlightTheme)?,
            diff_viewer_styles: read_required_asset(dir, Asset::DiffViewerStyles)?,
            diff_viewer_script: read_required_asset(dir, Asset::DiffViewerScript)?,
        })
    }
}

/// Read one asset. A file that does not exist is `MissingAsset`, which
/// tells the user how to fill the cache; anything else is a plain I/O error.
pub fn read_required_asset(dir: &Path, asset: Asset) -> Result<String> {
    let path = dir.join(asset.file_name());
    fs::read_to_string(&path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => Error::MissingAsset {
            name: asset.file_name(),
            path,
        },
        _ => Error::Asset { path, source },
    })
}

/// Download every asset into `dir`, creating it if needed
pub fn fetch_all(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(Asset::ALL.len());
    for asset in Asset::ALL {
        let url = asset.source_url();
        info!("Fetching {}", url);
        let body = download(url)?;

        let path = dir.join(asset.file_name());
        fs::write(&path, body)?;
        written.push(path);
    }

    Ok(written)
}

fn download(url: &str) -> Result<String> {
    let fetch_error = |message: String| Error::Fetch {
        url: url.to_string(),
        message,
    };

    let mut body = ureq::get(url)
        .header("User-Agent", "commit-html")
        .call()
        .map_err(|e| fetch_error(e.to_string()))?
        .into_body();

    let text = body
        .read_to_string()
        .map_err(|e| fetch_error(format!("Failed to read response body: {}", e)))?;

    if text.trim().is_empty() {
        return Err(fetch_error("empty response body".to_string()));
    }

    Ok(text)
}
