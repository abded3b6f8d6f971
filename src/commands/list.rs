//! `bp-rs list`: one line per backup set.
//!
//! ```text
//! etc     	2023-01-02
//! photos  	2022-12-01, 2023-02-01
//! ```
//!
//! Sets whose newest version is oldest come first, so stale backups float
//! to the top.

use anyhow::Result;
use tracing::debug;

use super::Session;
use crate::{cli::Cli, config::Config};

pub fn run(cli: &Cli, cfg: &Config) -> Result<()> {
    let store = Session::new(cli, cfg, false).load_store()?;
    if store.is_empty() {
        debug!("no archives in the store");
    }
    for line in store.render_list() {
        println!("{line}");
    }
    Ok(())
}
