//! `bp-rs prune`: keep only the newest version of each backup set.
//!
//! Paths given on the command line only select *which* sets are pruned: each
//! is reduced to the logical name `add` would have archived it under.  With
//! no paths every set is a candidate.

use std::{collections::HashSet, path::PathBuf};

use anyhow::Result;

use super::Session;
use crate::{
    cli::{Cli, PruneArgs},
    config::Config,
    paths::{expand_path, logical_name},
    ui,
};

pub fn run(cli: &Cli, cfg: &Config, args: &PruneArgs) -> Result<()> {
    let mut session = Session::new(cli, cfg, args.dry_run);
    prune_paths(&mut session, &args.paths)
}

/// Reload the store and prune the sets named by `paths` (all when empty).
pub fn prune_paths(session: &mut Session, paths: &[PathBuf]) -> Result<()> {
    let names = name_filter(paths)?;
    let store = session.load_store()?;

    for group in store.plan_prune(&names) {
        ui::print_prune_group(group.name, &group.removed_versions(), &group.keep.version());
        session.dispatch_all(&group.delete_invocations())?;
    }
    session.finish();
    Ok(())
}

fn name_filter(paths: &[PathBuf]) -> Result<HashSet<String>> {
    paths
        .iter()
        .map(|p| -> Result<String> { Ok(logical_name(&expand_path(p)?)?) })
        .collect()
}
