use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the install pipeline.
/// Every module returns `Result<T, InstallerError>`.
#[derive(Debug, Error)]
pub enum InstallerError {
    // ── Link ────────────────────────────────────────────
    #[error("Not a recognised modpack download link: {0:?}")]
    InvalidLink(String),

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    // ── Modpack ─────────────────────────────────────────
    #[error("Extracted tree at {0:?} is not a modpack")]
    InvalidModpack(PathBuf),

    #[error("Malformed profile descriptor: {0}")]
    MalformedDescriptor(String),

    // ── Mod-loader installer ────────────────────────────
    #[error("Mod-loader installer failed (code {code:?}): {detail}")]
    SubprocessFailure { code: Option<i32>, detail: String },

    // ── Launcher registry ───────────────────────────────
    #[error("Launcher profile registry {path:?} is unreadable: {reason}")]
    RegistryUnreadable { path: PathBuf, reason: String },

    #[error("Could not write launcher profile registry {path:?}: {source}")]
    RegistryWriteFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Install cancelled")]
    Cancelled,

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type InstallerResult<T> = Result<T, InstallerError>;

/// Coarse failure taxonomy reported at the end of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    InvalidLink,
    DownloadError,
    ExtractionError,
    InvalidModpack,
    MalformedDescriptor,
    SubprocessFailure,
    RegistryUnreadable,
    RegistryWriteFailure,
    FilesystemError,
    Cancelled,
}

impl InstallerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InstallerError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn reason(&self) -> FailureReason {
        match self {
            InstallerError::InvalidLink(_) => FailureReason::InvalidLink,
            InstallerError::Http(_) | InstallerError::DownloadFailed { .. } => {
                FailureReason::DownloadError
            }
            InstallerError::Zip(_) | InstallerError::Extraction(_) => {
                FailureReason::ExtractionError
            }
            InstallerError::InvalidModpack(_) => FailureReason::InvalidModpack,
            InstallerError::MalformedDescriptor(_) => FailureReason::MalformedDescriptor,
            InstallerError::SubprocessFailure { .. } => FailureReason::SubprocessFailure,
            InstallerError::RegistryUnreadable { .. } => FailureReason::RegistryUnreadable,
            InstallerError::RegistryWriteFailure { .. } => FailureReason::RegistryWriteFailure,
            InstallerError::Io { .. } | InstallerError::Other(_) => FailureReason::FilesystemError,
            InstallerError::Cancelled => FailureReason::Cancelled,
        }
    }

    /// The single status line shown to the user for a terminal failure.
    pub fn status_message(&self) -> &'static str {
        match self.reason() {
            FailureReason::InvalidLink => "Link is not a valid download link!",
            FailureReason::DownloadError => "Invalid Download Link!",
            FailureReason::InvalidModpack => "Link is not a valid modpack!",
            FailureReason::Cancelled => "Installation Cancelled",
            _ => "Error Installing Modpack",
        }
    }
}

impl From<std::io::Error> for InstallerError {
    fn from(source: std::io::Error) -> Self {
        InstallerError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
