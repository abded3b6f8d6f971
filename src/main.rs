//! `bp-rs`: dated tarsnap archives, grouped into backup sets.
//!
//! # Overview
//!
//! tarsnap stores flat, named archives.  This tool names every archive
//! `YYYY-MM-DD_<set>` and treats archives sharing a `<set>` as versions of one
//! backup.  On top of that convention it lists sets, adds today's version,
//! extracts the newest (or a given) version and prunes everything but the
//! newest.
//!
//! # Usage
//!
//! ```text
//! bp-rs                          # list backup sets and their versions
//! bp-rs add ~/photos /etc        # archive as 2023-05-01_photos, 2023-05-01_etc
//! bp-rs add --drop-old ~/photos  # … then delete older versions of "photos"
//! bp-rs get photos               # extract the newest "photos" into .
//! bp-rs get photos --version 2023-01-02
//! bp-rs prune                    # keep only the newest version of every set
//! bp-rs prune -n ~/photos        # show what pruning "photos" would delete
//! bp-rs init                     # write ~/.config/bp-rs/config.toml
//! ```
//!
//! # Module layout
//!
//! | Module                   | Responsibility                                |
//! |--------------------------|-----------------------------------------------|
//! | [`cli`]                  | Argument types parsed by clap                 |
//! | [`config`]               | `Config` struct, layered TOML loader          |
//! | [`archive`]              | `YYYY-MM-DD_name` parsing and naming rules    |
//! | [`store`]                | Grouping, listing, get/prune selection        |
//! | [`paths`]                | Path expansion and `add` target validation    |
//! | [`runner`]               | Backing-store requests → argument vectors     |
//! | [`ui`]                   | Spinner, captured execution, dry-run output   |
//! | [`commands`]             | One handler per subcommand                    |

mod archive;
mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod paths;
mod runner;
mod store;
mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Subcommand};
use config::{PartialConfig, global_config_path, parse_partial};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if cli.print_config {
        println!("{:#?}", load_merged_config(cli.config.as_deref())?);
        return Ok(());
    }

    match &cli.command {
        Some(Subcommand::Init) => commands::init::run(cli.config.as_deref()),
        None | Some(Subcommand::List) => {
            commands::list::run(&cli, &load_merged_config(cli.config.as_deref())?)
        },
        Some(Subcommand::Add(args)) => {
            commands::add::run(&cli, &load_merged_config(cli.config.as_deref())?, args)
        },
        Some(Subcommand::Get(args)) => {
            commands::get::run(&cli, &load_merged_config(cli.config.as_deref())?, args)
        },
        Some(Subcommand::Prune(args)) => {
            commands::prune::run(&cli, &load_merged_config(cli.config.as_deref())?, args)
        },
    }
}

/// Load configuration from two sources and merge them.
///
/// 1. `~/.config/bp-rs/config.toml`: global defaults
/// 2. `--config <path>`: overrides, if given
///
/// Later values win on a per-field basis.  Either file may be absent.
/// Relative tool paths are anchored at the current directory.
fn load_merged_config(local_path: Option<&Path>) -> Result<config::Config> {
    let mut merged = PartialConfig::default();

    if let Some(global_path) = global_config_path() {
        if let Some(global) = parse_partial(&global_path)? {
            debug!(path = %global_path.display(), "loaded global config");
            merged = merged.merge(global);
        }
    }

    if let Some(path) = local_path {
        match parse_partial(path)? {
            Some(local) => {
                debug!(path = %path.display(), "loaded config override");
                merged = merged.merge(local);
            },
            None => ui::warn(format!(
                "config file '{}' not found, using defaults.\n\
                 Run 'bp-rs init --config {}' to generate a starter config.",
                path.display(),
                path.display()
            )),
        }
    }

    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    Ok(merged.resolve().anchored_at(&cwd))
}
