//! Backing-store requests and their argument vectors.
//!
//! Every call into tarsnap is first described as an [`Invocation`].  This
//! module only *builds* argument lists; spawning processes lives in
//! [`crate::ui`] so that the spinner can own the terminal while commands run,
//! and so that `--dry-run` can intercept a request before anything is
//! executed.
//!
//! # Base command
//!
//! ```text
//! [doas]  <program>  [--keyfile K]  [--cachedir C]  [extra_args…]
//! ```
//!
//! followed by the mode flags of the individual request.

use std::path::{Path, PathBuf};

use crate::{cli::Cli, config::Config};

// ─── Requests ─────────────────────────────────────────────────────────────────

/// One request to the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `--list-archives`: one raw identifier per output line.
    ListArchives,
    /// `-c -f <raw_name> <basename>`, run from `dir`.
    Create {
        raw_name: String,
        basename: String,
        dir: PathBuf,
    },
    /// `-x -f <raw_name>`, run from the caller's current directory.
    Extract { raw_name: String },
    /// `-d -f <raw_name>`.
    Delete { raw_name: String },
}

impl Invocation {
    /// Full argument vector: `base` followed by this request's flags.
    pub fn args(&self, base: &[String]) -> Vec<String> {
        let mut cmd = base.to_vec();
        match self {
            Self::ListArchives => cmd.push("--list-archives".into()),
            Self::Create {
                raw_name, basename, ..
            } => cmd.extend([
                "-c".into(),
                "-f".into(),
                raw_name.clone(),
                basename.clone(),
            ]),
            Self::Extract { raw_name } => {
                cmd.extend(["-x".into(), "-f".into(), raw_name.clone()]);
            },
            Self::Delete { raw_name } => {
                cmd.extend(["-d".into(), "-f".into(), raw_name.clone()]);
            },
        }
        cmd
    }

    /// Directory the request must run from, if not the current one.
    pub fn working_dir(&self) -> Option<&Path> {
        match self {
            Self::Create { dir, .. } => Some(dir.as_path()),
            _ => None,
        }
    }

    /// `false` only for the read-only enumerate request.
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::ListArchives)
    }

    /// Short spinner / summary label, e.g. `"Delete 2021-01-01_photos"`.
    pub fn label(&self) -> String {
        match self {
            Self::ListArchives => "List archives".into(),
            Self::Create { raw_name, .. } => format!("Create {raw_name}"),
            Self::Extract { raw_name } => format!("Extract {raw_name}"),
            Self::Delete { raw_name } => format!("Delete {raw_name}"),
        }
    }
}

// ─── Privilege prefix ─────────────────────────────────────────────────────────

/// Returns `["doas"]` when `--sudo` is set, otherwise an empty `Vec`.
pub fn prefix(cli: &Cli) -> Vec<String> {
    if cli.sudo {
        vec!["doas".into()]
    } else {
        vec![]
    }
}

// ─── tarsnap base command ─────────────────────────────────────────────────────

/// Builds the argument list shared by every backing-store invocation.
pub fn tarsnap_base(cli: &Cli, cfg: &Config) -> Vec<String> {
    let t = &cfg.tarsnap;
    let mut cmd: Vec<String> = prefix(cli);
    cmd.push(t.program.clone());
    if let Some(keyfile) = &t.keyfile {
        cmd.extend(["--keyfile".into(), keyfile.clone()]);
    }
    if let Some(cachedir) = &t.cachedir {
        cmd.extend(["--cachedir".into(), cachedir.clone()]);
    }
    cmd.extend(t.extra_args.iter().cloned());
    cmd
}

// ─── Tests ────────────────────────────────────────────────────────────────────
