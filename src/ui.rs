//! Terminal UI: spinners, captured execution, dry-run lines and warnings.
//!
//! # Design goals
//!
//! - **Clean by default.** While tarsnap runs the user sees only a spinner and a short label. Raw
//!   output is captured and hidden.
//! - **Informative on failure.** If a call exits non-zero its captured stdout *and* stderr are
//!   printed in full so the operator can diagnose the problem without re-running manually.
//! - **Testable without a terminal.** Rendering helpers such as [`dry_run_line`] return plain
//!   strings; indicatif hides the spinner automatically when stderr is not a TTY.

use std::{
    path::Path,
    process::{Command, Output, Stdio},
    time::Duration,
};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

// ─── Icons ───────────────────────────────────────────────────────────────────

/// Braille spinner frames, same style as indicatif's default.
static SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

fn icon_ok() -> console::StyledObject<&'static str> {
    style("✓").green().bold()
}
fn icon_err() -> console::StyledObject<&'static str> {
    style("✗").red().bold()
}
fn icon_done() -> console::StyledObject<&'static str> {
    style("✓").cyan().bold()
}

// ─── Stage result ─────────────────────────────────────────────────────────────

/// The outcome of a single backing-store call.
#[derive(Debug)]
pub struct StageOutcome {
    /// Human-readable label, e.g. `"Delete 2021-01-01_photos"`.
    pub label: String,
    pub success: bool,
    /// Everything the command wrote to stdout.
    pub stdout: String,
    /// Everything the command wrote to stderr.
    pub stderr: String,
    /// The error message, if any.
    pub error: Option<String>,
}

impl StageOutcome {
    /// Print the one-line summary (✓/✗ + label) to stdout.
    ///
    /// On failure, also prints the captured stdout/stderr and the error
    /// message.
    pub fn print(&self) {
        if self.success {
            println!("  {}  {}", icon_ok(), style(&self.label).bold());
            return;
        }

        println!("  {}  {}", icon_err(), style(&self.label).bold());

        if let Some(ref msg) = self.error {
            eprintln!();
            eprintln!("  {} {}", style("Error:").red().bold(), msg);
        }

        // Replay captured output so the operator can see what tarsnap said.
        if !self.stdout.is_empty() {
            eprintln!();
            eprintln!("  {} stdout:", style("►").dim());
            for line in self.stdout.lines() {
                eprintln!("    {line}");
            }
        }
        if !self.stderr.is_empty() {
            eprintln!();
            eprintln!("  {} stderr:", style("►").dim());
            for line in self.stderr.lines() {
                eprintln!("    {line}");
            }
        }
    }

    pub const fn failed(&self) -> bool {
        !self.success
    }
}

// ─── Spinner ──────────────────────────────────────────────────────────────────

/// Create and start an indeterminate spinner for `label`.
fn make_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::with_template("  {spinner:.cyan}  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS);
    pb.set_style(spinner_style);
    pb.set_message(format!("{}", style(label).dim()));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ─── Captured execution ───────────────────────────────────────────────────────

/// Run a command, capturing both stdout and stderr.
///
/// `cwd` overrides the working directory of the child only; the parent never
/// changes directory.
///
/// Returns `(success, stdout_text, stderr_text)`.
pub fn run_captured(args: &[String], cwd: Option<&Path>) -> Result<(bool, String, String)> {
    let (prog, rest) = args.split_first().context("cannot run an empty command")?;

    let mut cmd = Command::new(prog);
    cmd.args(rest).stdout(Stdio::piped()).stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output: Output = cmd
        .output()
        .with_context(|| format!("failed to spawn: {}", args.join(" ")))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    Ok((output.status.success(), stdout, stderr))
}

/// Run one call behind a spinner, returning a [`StageOutcome`].
///
/// The spinner is cleared before anything else is printed.
pub fn run_stage(label: &str, args: &[String], cwd: Option<&Path>) -> StageOutcome {
    let spinner = make_spinner(label);

    let result = run_captured(args, cwd);
    spinner.finish_and_clear();

    match result {
        Ok((success, stdout, stderr)) => StageOutcome {
            label: label.to_string(),
            success,
            stdout,
            stderr,
            error: (!success).then(|| format!("command exited non-zero: {}", args.join(" "))),
        },
        Err(e) => StageOutcome {
            label: label.to_string(),
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            error: Some(format!("{e:#}")),
        },
    }
}

// ─── Dry run ──────────────────────────────────────────────────────────────────

/// `dry-run  [/srv]  tarsnap -c -f 2023-05-01_etc etc`
pub fn dry_run_line(dir: Option<&Path>, args: &[String]) -> String {
    match dir {
        Some(d) => format!("dry-run  [{}]  {}", d.display(), args.join(" ")),
        None => format!("dry-run  {}", args.join(" ")),
    }
}

pub fn print_dry_run(dir: Option<&Path>, args: &[String]) {
    println!("  {}", style(dry_run_line(dir, args)).yellow());
}

// ─── Messages ─────────────────────────────────────────────────────────────────

/// Non-fatal problem, printed to stderr.
pub fn warn(msg: impl std::fmt::Display) {
    eprintln!("{} {msg}", style("Warning:").yellow().bold());
}

/// Print the prune report for one backup set.
pub fn print_prune_group(name: &str, removed: &str, kept: &str) {
    for line in prune_report(name, removed, kept) {
        println!("{line}");
    }
}

pub fn prune_report(name: &str, removed: &str, kept: &str) -> [String; 3] {
    [
        format!("Archive '{name}'"),
        format!("\tversions that are going to be removed: {removed}"),
        format!("\tremaining version: {kept}"),
    ]
}

// ─── Summary banner ───────────────────────────────────────────────────────────

/// Print the final summary after a batch of calls.
///
/// Nothing is printed for an empty batch.
pub fn print_summary(outcomes: &[StageOutcome]) {
    if outcomes.is_empty() {
        return;
    }
    let failed: Vec<&StageOutcome> = outcomes.iter().filter(|o| o.failed()).collect();
    println!();
    if failed.is_empty() {
        println!(
            "  {} {}",
            icon_done(),
            style(format!("{} archive operation(s) completed.", outcomes.len()))
                .cyan()
                .bold()
        );
    } else {
        eprintln!("  {}  {}", icon_err(), style("Some operations failed.").red().bold());
        for o in &failed {
            eprintln!("    {} {}", icon_err(), style(&o.label).red());
        }
    }
    println!();
}

// ─── Tests ────────────────────────────────────────────────────────────────────
