//! `bp-rs get`: extract backup sets into the current directory.
//!
//! Names that resolve to nothing are reported and skipped; the remaining
//! names are still extracted.

use anyhow::Result;
use tracing::warn;

use super::Session;
use crate::{
    archive::is_canonical_version,
    cli::{Cli, GetArgs},
    config::Config,
    ui,
};

pub fn run(cli: &Cli, cfg: &Config, args: &GetArgs) -> Result<()> {
    if let Some(v) = args.version.as_deref().filter(|v| !is_canonical_version(v)) {
        warn!(version = v, "not a YYYY-MM-DD date, no archive can match it");
    }

    let mut session = Session::new(cli, cfg, args.dry_run);
    let store = session.load_store()?;

    let plan = store.plan_get(args.names.as_slice(), args.version.as_deref());
    for missing in &plan.missing {
        ui::warn(missing);
    }

    let extracts: Vec<_> = plan.found.iter().map(|a| a.extract_invocation()).collect();
    session.dispatch_all(&extracts)?;
    session.finish();
    Ok(())
}
