//! Domain errors.
//!
//! Everything that can go wrong *inside* the naming/selection layer is a
//! variant of [`ArchiveError`].  Command handlers wrap these in
//! `anyhow::Error` with extra context before they reach `main`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArchiveError {
    /// A line of `--list-archives` output does not start with `YYYY-MM-DD`.
    #[error("malformed archive identifier '{raw}': expected a leading YYYY-MM-DD date")]
    MalformedIdentifier { raw: String },

    /// An `add` target that is neither a regular file nor a directory.
    #[error("'{}' is not a regular file or directory", .path.display())]
    InvalidAddTarget { path: PathBuf },

    /// The final path component cannot be embedded in an archive name.
    #[error("'{}' has no usable UTF-8 file name", .path.display())]
    NonUtf8Path { path: PathBuf },

    /// `get` found nothing for a requested name.  Non-fatal: reported as a
    /// warning and the remaining names are still processed.
    #[error("Archive '{name}'{} does not exist", version_suffix(.version.as_deref()))]
    ArchiveNotFound {
        name: String,
        version: Option<String>,
    },
}

fn version_suffix(version: Option<&str>) -> String {
    version.map(|v| format!(" of version {v}")).unwrap_or_default()
}
