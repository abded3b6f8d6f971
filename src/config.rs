//! Configuration types and loading logic.
//!
//! `Config` is a direct mapping of `config.toml`.  Every field has a default,
//! so the file is entirely optional: without one, `bp-rs` calls `tarsnap`
//! from `$PATH` with tarsnap's own defaults (`~/.tarsnaprc`, …).
//!
//! # File format
//!
//! ```toml
//! [tarsnap]
//! program    = "tarsnap"             # name on $PATH, or a path
//! keyfile    = "/root/tarsnap.key"   # optional, forwarded as --keyfile
//! cachedir   = "/var/cache/tarsnap"  # optional, forwarded as --cachedir
//! extra_args = []                    # appended verbatim before the mode flag
//!
//! [add]
//! drop_old = false                   # always prune after `add`
//! ```
//!
//! # Layers
//!
//! The global file (`<config_dir>/bp-rs/config.toml`) is read first, then the
//! file given with `--config`.  Values from the later file win field by
//! field; see [`PartialConfig::merge`].
//!
//! Relative `program`, `keyfile` and `cachedir` paths are taken relative to
//! the directory `bp-rs` was started from, even though `add` runs tarsnap
//! from each target's parent directory; see [`Config::anchored_at`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::paths::expand_path_in;

// ─── Top-level ────────────────────────────────────────────────────────────────

/// Resolved configuration.  Both sections fall back to their `Default`.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// How to reach the backing store.
    #[serde(default)]
    pub tarsnap: TarsnapConfig,

    /// Defaults for `bp-rs add`.
    #[serde(default)]
    pub add: AddConfig,
}

impl Config {
    /// Make relative tool paths absolute against `cwd`.  A bare `program`
    /// name is left alone so it is still looked up on `$PATH`.
    #[must_use]
    pub fn anchored_at(mut self, cwd: &Path) -> Self {
        let t = &mut self.tarsnap;
        if Path::new(&t.program).components().count() > 1 {
            t.program = anchor(&t.program, cwd);
        }
        t.keyfile = t.keyfile.as_deref().map(|k| anchor(k, cwd));
        t.cachedir = t.cachedir.as_deref().map(|c| anchor(c, cwd));
        self
    }
}

fn anchor(path: &str, cwd: &Path) -> String {
    expand_path_in(Path::new(path), cwd).to_string_lossy().into_owned()
}

// ─── [tarsnap] ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TarsnapConfig {
    /// Executable to run.  Pointing this at a wrapper script is handy for
    /// testing or for running tarsnap through `nice`/`ionice`.
    #[serde(default = "default_program")]
    pub program: String,

    /// Forwarded as `--keyfile`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyfile: Option<String>,

    /// Forwarded as `--cachedir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cachedir: Option<String>,

    /// Extra global options, e.g. `["--configfile", "/etc/tarsnap.conf"]`.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for TarsnapConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            keyfile: None,
            cachedir: None,
            extra_args: vec![],
        }
    }
}

// ─── [add] ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct AddConfig {
    /// Behave as if `--drop-old` were always passed to `add`.
    #[serde(default)]
    pub drop_old: bool,
}

pub fn default_program() -> String {
    "tarsnap".into()
}

// ─── Partial (per-layer) config ───────────────────────────────────────────────

/// One config layer as written on disk: every field optional so that an
/// absent key never overrides a value from an earlier layer.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct PartialConfig {
    #[serde(default)]
    pub tarsnap: PartialTarsnap,
    #[serde(default)]
    pub add: PartialAdd,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct PartialTarsnap {
    pub program: Option<String>,
    pub keyfile: Option<String>,
    pub cachedir: Option<String>,
    pub extra_args: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct PartialAdd {
    pub drop_old: Option<bool>,
}

impl PartialConfig {
    /// Overlay `other` on top of `self`; set fields in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            tarsnap: PartialTarsnap {
                program: other.tarsnap.program.or(self.tarsnap.program),
                keyfile: other.tarsnap.keyfile.or(self.tarsnap.keyfile),
                cachedir: other.tarsnap.cachedir.or(self.tarsnap.cachedir),
                extra_args: other.tarsnap.extra_args.or(self.tarsnap.extra_args),
            },
            add: PartialAdd {
                drop_old: other.add.drop_old.or(self.add.drop_old),
            },
        }
    }

    /// Fill every unset field with its default.
    pub fn resolve(self) -> Config {
        let t = self.tarsnap;
        Config {
            tarsnap: TarsnapConfig {
                program: t.program.unwrap_or_else(default_program),
                keyfile: t.keyfile,
                cachedir: t.cachedir,
                extra_args: t.extra_args.unwrap_or_default(),
            },
            add: AddConfig {
                drop_old: self.add.drop_old.unwrap_or(false),
            },
        }
    }
}

// ─── Loader ───────────────────────────────────────────────────────────────────

/// `<config_dir>/bp-rs/config.toml`, e.g. `~/.config/bp-rs/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|d| d.join("bp-rs").join("config.toml"))
}

/// Read one layer from `path`.
///
/// Returns `Ok(None)` when the file does not exist, and an error if it exists
/// but cannot be read or is not valid TOML.
pub fn parse_partial(path: &Path) -> Result<Option<PartialConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    toml::from_str(&text)
        .map(Some)
        .with_context(|| format!("parsing {}", path.display()))
}

// ─── Starter file ─────────────────────────────────────────────────────────────

/// Written by `bp-rs init`.
pub const STARTER_CONFIG: &str = r#"# bp-rs configuration
#
# Global file:   ~/.config/bp-rs/config.toml
# Override file: bp-rs --config <path> …

[tarsnap]
program    = "tarsnap"
# keyfile  = "/root/tarsnap.key"
# cachedir = "/usr/local/tarsnap-cache"
extra_args = []

[add]
# Remove older versions of a backup set right after adding a new one.
drop_old = false
"#;

// ─── Tests ────────────────────────────────────────────────────────────────────
