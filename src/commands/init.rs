//! `bp-rs init`: write a starter config file.
//!
//! The target is `--config <path>` when given, else the global
//! `~/.config/bp-rs/config.toml`.  Parent directories are created as needed;
//! an existing file is never overwritten.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::{
    config::{STARTER_CONFIG, global_config_path},
    ui::StageOutcome,
};

pub fn run(explicit: Option<&Path>) -> Result<()> {
    let path: PathBuf = match explicit {
        Some(p) => p.into(),
        None => global_config_path().context("cannot determine the config directory")?,
    };

    let outcome = match write_starter(&path) {
        Ok(()) => StageOutcome {
            label: format!("Wrote {}", path.display()),
            success: true,
            stdout: String::new(),
            stderr: String::new(),
            error: None,
        },
        Err(e) => StageOutcome {
            label: format!("Write {}", path.display()),
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            error: Some(format!("{e:#}")),
        },
    };
    outcome.print();
    if outcome.failed() {
        bail!("init failed");
    }
    Ok(())
}

fn write_starter(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists, refusing to overwrite", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, STARTER_CONFIG).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn writes_starter_into_new_directory() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("nested").join("config.toml");
        run(Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), STARTER_CONFIG);
    }

    #[test]
    fn refuses_to_overwrite() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("config.toml");
        fs::write(&path, "# mine").unwrap();

        assert!(run(Some(&path)).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine");
    }
}
