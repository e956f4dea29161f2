use std::path::PathBuf;

use thiserror::Error;

/// Every way a fetch, transform or write step can fail.
///
/// None of these are recovered locally; the binary turns them into a
/// diagnostic and a non-zero exit status.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A required setting is absent or blank.
    #[error("{0} is not set")]
    MissingSetting(&'static str),
    /// A setting is present but cannot be used.
    #[error("invalid value for {name}: {value:?}")]
    InvalidSetting { name: &'static str, value: String },
    /// The HTTP client could not be set up.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    /// The request never produced a usable response.
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The shop answered with a non-2xx status.
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to render CSV")]
    Csv(#[from] csv::Error),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
