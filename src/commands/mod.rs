//! Subcommand handlers.
//!
//! Each file in this module corresponds to one user-facing command:
//!
//! | File        | Invocation                 | Description                         |
//! |-------------|----------------------------|-------------------------------------|
//! | `list.rs`   | `bp-rs` / `bp-rs list`     | Backup sets and their versions      |
//! | `add.rs`    | `bp-rs add <path>…`        | Create `<today>_<name>` archives    |
//! | `get.rs`    | `bp-rs get <name>…`        | Extract latest / given version      |
//! | `prune.rs`  | `bp-rs prune [path…]`      | Delete all but the newest version   |
//! | `init.rs`   | `bp-rs init`               | Scaffold a config file              |
//!
//! Every handler builds a [`Session`] and does all of its tarsnap I/O
//! through it, so `--dry-run` is enforced in exactly one place.

pub mod add;
pub mod get;
pub mod init;
pub mod list;
pub mod prune;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::{
    cli::Cli,
    config::Config,
    runner::{Invocation, tarsnap_base},
    store::Store,
    ui::{self, StageOutcome},
};

/// Connection to the backing store for the duration of one command.
#[derive(Debug)]
pub struct Session {
    base: Vec<String>,
    dry_run: bool,
    outcomes: Vec<StageOutcome>,
}

impl Session {
    pub fn new(cli: &Cli, cfg: &Config, dry_run: bool) -> Self {
        Self {
            base: tarsnap_base(cli, cfg),
            dry_run,
            outcomes: Vec::new(),
        }
    }

    /// Enumerate and parse every archive.
    ///
    /// Runs even under `--dry-run`: listing never mutates the store.
    pub fn load_store(&self) -> Result<Store> {
        let inv = Invocation::ListArchives;
        let args = inv.args(&self.base);
        debug!(cmd = %args.join(" "), "listing archives");

        let outcome = ui::run_stage(&inv.label(), &args, None);
        if outcome.failed() {
            outcome.print();
            bail!("could not list archives");
        }

        let store = Store::parse(&outcome.stdout).context("reading the archive listing")?;
        debug!(archives = store.len(), "archive listing loaded");
        Ok(store)
    }

    /// Run one request; under `--dry-run`, mutating requests are only
    /// printed.
    ///
    /// The first failure prints the batch summary and aborts.
    pub fn dispatch(&mut self, inv: &Invocation) -> Result<()> {
        let args = inv.args(&self.base);
        let dir = inv.working_dir();
        debug!(cmd = %args.join(" "), dir = ?dir, dry_run = self.dry_run, "dispatch");

        if self.dry_run && inv.is_mutation() {
            ui::print_dry_run(dir, &args);
            return Ok(());
        }

        let outcome = ui::run_stage(&inv.label(), &args, dir);
        outcome.print();
        let failed = outcome.failed().then(|| outcome.label.clone());
        self.outcomes.push(outcome);

        if let Some(label) = failed {
            ui::print_summary(&self.outcomes);
            bail!("aborted: {label} failed");
        }
        Ok(())
    }

    pub fn dispatch_all<'a>(&mut self, invs: impl IntoIterator<Item = &'a Invocation>) -> Result<()> {
        invs.into_iter().try_for_each(|inv| self.dispatch(inv))
    }

    /// Print the summary banner for everything dispatched so far.
    pub fn finish(&mut self) {
        ui::print_summary(&self.outcomes);
        self.outcomes.clear();
    }
}
