//! `bp-rs add`: archive paths as `<today>_<sanitised basename>`.
//!
//! Each path is archived from its parent directory so that paths inside the
//! archive stay short (`photos/…` rather than `/home/alice/photos/…`).
//!
//! Every path is validated before the first archive is created: one bad
//! path aborts the whole batch with nothing written.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::debug;

use super::{Session, prune};
use crate::{
    cli::{AddArgs, Cli},
    config::Config,
    paths::{add_target, expand_path},
    runner::Invocation,
    store::create_invocation,
};

pub fn run(cli: &Cli, cfg: &Config, args: &AddArgs) -> Result<()> {
    let today = Local::now().date_naive();
    let invocations = plan(&args.paths, today)?;

    let mut session = Session::new(cli, cfg, args.dry_run);
    session.dispatch_all(&invocations)?;
    session.finish();

    if args.drop_old || cfg.add.drop_old {
        debug!("dropping old versions of the added sets");
        prune::prune_paths(&mut session, &args.paths)?;
    }
    Ok(())
}

/// Create requests for `paths`, or the first validation error.
pub fn plan(paths: &[PathBuf], today: NaiveDate) -> Result<Vec<Invocation>> {
    paths
        .iter()
        .map(|p| -> Result<Invocation> {
            let target = add_target(&expand_path(p)?)?;
            Ok(create_invocation(&target, today))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::ArchiveError;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()
    }

    #[test]
    fn plan_names_archives_after_sanitised_basename() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("my-backup");
        fs::create_dir(&dir).unwrap();

        let invs = plan(&[dir], day()).unwrap();
        assert_eq!(invs, vec![Invocation::Create {
            raw_name: "2023-05-01_my_backup".into(),
            basename: "my-backup".into(),
            dir: root.path().into(),
        }]);
    }

    #[test]
    fn plan_keeps_input_order() {
        let root = tempfile::tempdir().unwrap();
        for name in ["b", "a"] {
            fs::write(root.path().join(name), name).unwrap();
        }
        let invs = plan(&[root.path().join("b"), root.path().join("a")], day()).unwrap();
        let labels: Vec<String> = invs.iter().map(Invocation::label).collect();
        assert_eq!(labels, ["Create 2023-05-01_b", "Create 2023-05-01_a"]);
    }

    #[test]
    fn plan_aborts_on_first_invalid_path() {
        let root = tempfile::tempdir().unwrap();
        let good = root.path().join("good");
        fs::create_dir(&good).unwrap();
        let bad = root.path().join("missing");

        let err = plan(&[good, bad.clone()], day()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ArchiveError>(),
            Some(&ArchiveError::InvalidAddTarget { path: bad })
        );
    }
}
