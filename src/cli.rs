//! Command-line interface definition.
//!
//! All argument parsing lives here so the rest of the codebase can stay
//! agnostic to `clap`.  The `Cli` struct is parsed once in `main` and then
//! passed (by reference) into the command handlers.

use std::path::PathBuf;

use clap::{Args, Parser};

/// Top-level CLI arguments, shared across every subcommand.
#[derive(Parser, Debug)]
#[command(
    name    = "bp-rs",
    about   = "Dated tarsnap archives: list, add, get and prune",
    version,
    // Show a compact two-column help layout.
    help_template = "\
{before-help}{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Cli {
    /// Extra configuration file, layered over the global one.
    ///
    /// The global file lives at `~/.config/bp-rs/config.toml`.  Values set
    /// here win field by field.  With `init`, this is the file to create.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.  Omit to list archives.
    #[command(subcommand)]
    pub command: Option<Subcommand>,

    /// Print the resolved configuration and exit without running anything.
    #[arg(long)]
    pub print_config: bool,

    /// Prefix every tarsnap call with `doas`.
    #[arg(long, global = true)]
    pub sudo: bool,

    /// Log backing-store calls and config sources to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug, PartialEq, Eq)]
pub enum Subcommand {
    /// Show every backup set with its versions, least recently updated first.
    #[command(visible_alias = "ls")]
    List,

    /// Archive files or directories as `<today>_<name>`.
    Add(AddArgs),

    /// Extract the latest (or a given) version of backup sets into the
    /// current directory.
    Get(GetArgs),

    /// Delete all but the newest version of each backup set.
    Prune(PruneArgs),

    /// Write a starter config file.
    ///
    /// Creates `--config <path>` if given, else the global config file.
    /// Refuses to overwrite an existing file.
    Init,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct AddArgs {
    /// Files or directories to archive.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Print the tarsnap calls instead of running them.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Prune older versions of the added sets afterwards.
    #[arg(short, long)]
    pub drop_old: bool,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct GetArgs {
    /// Logical names of the backup sets to extract.
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Extract this exact version (YYYY-MM-DD) of every requested set.
    /// Sets without that version are reported and skipped.
    #[arg(long = "version", value_name = "YYYY-MM-DD")]
    pub version: Option<String>,

    /// Print the tarsnap calls instead of running them.
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct PruneArgs {
    /// Restrict pruning to the sets these paths are archived under.
    /// Only the basename matters; the paths need not exist.
    pub paths: Vec<PathBuf>,

    /// Print the tarsnap calls instead of running them.
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}
