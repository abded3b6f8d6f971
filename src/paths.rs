//! Turning user-supplied paths into archive names.
//!
//! Expansion is purely lexical: `~` becomes the home directory, relative
//! paths are joined onto the current directory, and `.`/`..` components are
//! folded away.  Symlinks are *not* resolved, so `bp-rs add link` archives
//! under the link's own name.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use crate::{archive::sanitize_name, error::ArchiveError};

/// Make `path` absolute relative to `cwd` and normalise it.
pub fn expand_path_in(path: &Path, cwd: &Path) -> PathBuf {
    let joined = match path.strip_prefix("~") {
        Ok(rest) => match dirs_next::home_dir() {
            Some(home) => home.join(rest),
            None => cwd.join(path),
        },
        Err(_) => cwd.join(path),
    };
    normalize(&joined)
}

/// [`expand_path_in`] against the process's current directory.
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    Ok(expand_path_in(path, &cwd))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in path.components() {
        match c {
            Component::CurDir => {},
            Component::ParentDir => {
                out.pop();
            },
            other => out.push(other),
        }
    }
    out
}

/// Final component of an already-expanded path, as UTF-8.
pub fn basename(path: &Path) -> Result<&str, ArchiveError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ArchiveError::NonUtf8Path { path: path.into() })
}

/// Logical name a path is archived under: its sanitised basename.
pub fn logical_name(path: &Path) -> Result<String, ArchiveError> {
    basename(path).map(sanitize_name)
}

/// An `add` target that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTarget {
    /// Directory tarsnap runs from.
    pub dir: PathBuf,
    /// Name passed to tarsnap, relative to `dir`.
    pub basename: String,
    /// Sanitised basename, embedded in the archive name.
    pub name: String,
}

/// Validate an expanded path for `add`: it must be a regular file or a
/// directory (following symlinks) and have a usable final component.
pub fn add_target(path: &Path) -> Result<AddTarget, ArchiveError> {
    if !(path.is_file() || path.is_dir()) {
        return Err(ArchiveError::InvalidAddTarget { path: path.into() });
    }
    let base = basename(path)?;
    let dir = path
        .parent()
        .ok_or_else(|| ArchiveError::InvalidAddTarget { path: path.into() })?;

    Ok(AddTarget {
        dir: dir.into(),
        basename: base.into(),
        name: sanitize_name(base),
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────
