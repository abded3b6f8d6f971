//! The archive store: every archive tarsnap knows about, parsed once.
//!
//! All selection logic here is pure.  Methods return *plans* (archives or
//! [`Invocation`]s); the command handlers decide whether to execute them or,
//! under `--dry-run`, only print them.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::{
    archive::{ArchiveId, format_date, raw_name_for},
    error::ArchiveError,
    paths::AddTarget,
    runner::Invocation,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    archives: Vec<ArchiveId>,
}

/// Outcome of resolving the names requested by `get`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GetPlan<'a> {
    /// Selected archives, in request order.
    pub found: Vec<&'a ArchiveId>,
    /// One `ArchiveNotFound` per name that resolved to nothing.
    pub missing: Vec<ArchiveError>,
}

/// One backup set with more than one version.
#[derive(Debug, PartialEq, Eq)]
pub struct PruneGroup<'a> {
    pub name: &'a str,
    /// Older versions, ascending by date.
    pub remove: Vec<&'a ArchiveId>,
    /// Newest version, as `get` would pick it.
    pub keep: &'a ArchiveId,
}

impl PruneGroup<'_> {
    /// `"2021-01-01, 2021-03-01"`
    pub fn removed_versions(&self) -> String {
        join_versions(self.remove.iter().map(|a| a.date()))
    }

    pub fn delete_invocations(&self) -> Vec<Invocation> {
        self.remove.iter().map(|a| a.drop_invocation()).collect()
    }
}

impl Store {
    pub const fn new(archives: Vec<ArchiveId>) -> Self {
        Self { archives }
    }

    /// Parse `tarsnap --list-archives` output.
    ///
    /// Blank lines are ignored; any other line that fails to parse aborts the
    /// whole load.  Order is kept as tarsnap printed it.
    pub fn parse(listing: &str) -> Result<Self, ArchiveError> {
        listing
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .map(ArchiveId::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.archives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    /// Archives grouped by logical name, groups in order of first appearance,
    /// members in enumeration order.
    pub fn groups(&self) -> Vec<(&str, Vec<&ArchiveId>)> {
        group_by_name(self.archives.iter())
    }

    // ── list ──────────────────────────────────────────────────────────────────

    /// One line per backup set: the name padded to the longest name, a tab,
    /// then every version ascending.  Sets are ordered by their newest
    /// version, oldest activity first.
    pub fn render_list(&self) -> Vec<String> {
        let width = self
            .archives
            .iter()
            .map(|a| a.name().chars().count())
            .max()
            .unwrap_or(0);

        let mut groups: Vec<(&str, Vec<NaiveDate>)> = self
            .groups()
            .into_iter()
            .map(|(name, members)| {
                let mut dates: Vec<NaiveDate> = members.iter().map(|a| a.date()).collect();
                dates.sort_unstable();
                (name, dates)
            })
            .collect();
        // Stable: equal newest dates keep first-appearance order.
        groups.sort_by_key(|(_, dates)| dates.last().copied());

        groups
            .into_iter()
            .map(|(name, dates)| format!("{name:<width$}\t{}", join_versions(dates)))
            .collect()
    }

    // ── get ───────────────────────────────────────────────────────────────────

    /// Pick the version of `name` to extract.
    ///
    /// With `version`, the first archive (enumeration order) whose date
    /// formats to exactly that string.  Without, the newest; on equal dates
    /// the one enumerated first.
    pub fn select(&self, name: &str, version: Option<&str>) -> Option<&ArchiveId> {
        let mut candidates = self.archives.iter().filter(|a| a.name() == name);
        match version {
            Some(v) => candidates.find(|a| a.version() == v),
            None => newest(candidates),
        }
    }

    pub fn plan_get<'a, S: AsRef<str>>(&'a self, names: &[S], version: Option<&str>) -> GetPlan<'a> {
        let mut plan = GetPlan::default();
        for name in names {
            let name = name.as_ref();
            match self.select(name, version) {
                Some(a) => plan.found.push(a),
                None => plan.missing.push(ArchiveError::ArchiveNotFound {
                    name: name.into(),
                    version: version.map(Into::into),
                }),
            }
        }
        plan
    }

    // ── prune ─────────────────────────────────────────────────────────────────

    /// Every backup set (restricted to `names`, or all when empty) that has
    /// more than one version, with the versions to drop and the one to keep.
    pub fn plan_prune(&self, names: &HashSet<String>) -> Vec<PruneGroup<'_>> {
        let selected = self
            .archives
            .iter()
            .filter(|a| names.is_empty() || names.contains(a.name()));

        group_by_name(selected)
            .into_iter()
            .filter_map(|(name, members)| {
                let keep = newest(members.iter().copied())?;
                let mut remove: Vec<&ArchiveId> = members
                    .into_iter()
                    .filter(|a| !std::ptr::eq(*a, keep))
                    .collect();
                if remove.is_empty() {
                    return None;
                }
                remove.sort_by_key(|a| a.date());
                Some(PruneGroup {
                    name,
                    remove,
                    keep,
                })
            })
            .collect()
    }
}

// ─── add ──────────────────────────────────────────────────────────────────────

/// Create request for a validated target, dated `today`.
pub fn create_invocation(target: &AddTarget, today: NaiveDate) -> Invocation {
    Invocation::Create {
        raw_name: raw_name_for(today, &target.name),
        basename: target.basename.clone(),
        dir: target.dir.clone(),
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Latest-dated archive; on equal dates the one enumerated first.
fn newest<'a>(archives: impl Iterator<Item = &'a ArchiveId>) -> Option<&'a ArchiveId> {
    archives.fold(None, |best: Option<&ArchiveId>, a| match best {
        Some(b) if b.date() >= a.date() => Some(b),
        _ => Some(a),
    })
}

fn group_by_name<'a>(
    archives: impl Iterator<Item = &'a ArchiveId>,
) -> Vec<(&'a str, Vec<&'a ArchiveId>)> {
    let mut groups: Vec<(&str, Vec<&ArchiveId>)> = Vec::new();
    for a in archives {
        match groups.iter_mut().find(|(name, _)| *name == a.name()) {
            Some((_, members)) => members.push(a),
            None => groups.push((a.name(), vec![a])),
        }
    }
    groups
}

fn join_versions(dates: impl IntoIterator<Item = NaiveDate>) -> String {
    dates
        .into_iter()
        .map(format_date)
        .collect::<Vec<_>>()
        .join(", ")
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn store(lines: &[&str]) -> Store {
        Store::parse(&lines.join("\n")).unwrap()
    }

    fn sample() -> Store {
        store(&["2021-01-01_a", "2021-06-01_a", "2021-03-01_b"])
    }

    fn names(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    // ── parse ─────────────────────────────────────────────────────────────────

    #[test]
    fn parse_keeps_listing_order() {
        let s = store(&["2021-06-01_a", "2020-01-01_b", "2021-01-01_a"]);
        let raw: Vec<&str> = s.archives.iter().map(ArchiveId::raw_name).collect();
        assert_eq!(raw, ["2021-06-01_a", "2020-01-01_b", "2021-01-01_a"]);
    }

    #[test]
    fn parse_ignores_blank_lines_and_crlf() {
        let s = Store::parse("2021-01-01_a\r\n\n2021-02-01_a\n").unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.archives[0].name(), "a");
    }

    #[test]
    fn parse_fails_on_any_malformed_line() {
        let err = Store::parse("2021-01-01_a\nlost+found\n2021-02-01_a\n").unwrap_err();
        assert_eq!(err, ArchiveError::MalformedIdentifier {
            raw: "lost+found".into()
        });
    }

    #[test]
    fn parse_empty_listing() {
        assert!(Store::parse("").unwrap().is_empty());
    }

    // ── render_list ───────────────────────────────────────────────────────────

    #[test]
    fn list_orders_groups_by_newest_version() {
        assert_eq!(sample().render_list(), vec![
            "b\t2021-03-01",
            "a\t2021-01-01, 2021-06-01",
        ]);
    }

    #[test]
    fn list_sorts_versions_within_group() {
        let s = store(&["2021-06-01_a", "2021-01-01_a", "2021-03-01_a"]);
        assert_eq!(s.render_list(), vec!["a\t2021-01-01, 2021-03-01, 2021-06-01"]);
    }

    #[test]
    fn list_pads_names_to_longest() {
        let s = store(&["2021-01-01_photos", "2022-01-01_etc"]);
        insta::assert_debug_snapshot!(s.render_list(), @r#"
        [
            "photos\t2021-01-01",
            "etc   \t2022-01-01",
        ]
        "#);
    }

    #[test]
    fn list_of_empty_store_is_empty() {
        assert!(Store::default().render_list().is_empty());
    }

    // ── select / plan_get ─────────────────────────────────────────────────────

    #[test]
    fn select_latest_without_version() {
        let s = sample();
        assert_eq!(s.select("a", None).unwrap().raw_name(), "2021-06-01_a");
    }

    #[test]
    fn select_exact_version() {
        let s = sample();
        assert_eq!(
            s.select("a", Some("2021-01-01")).unwrap().raw_name(),
            "2021-01-01_a"
        );
        assert!(s.select("a", Some("2021-03-01")).is_none());
    }

    #[test]
    fn select_tie_prefers_first_enumerated() {
        // "2021-06-01a" parses to the same date and name as "2021-06-01_a".
        let s = store(&["2021-06-01_a", "2021-06-01a", "2021-01-01_a"]);
        assert_eq!(s.select("a", None).unwrap().raw_name(), "2021-06-01_a");
    }

    #[test]
    fn plan_get_reports_missing_and_continues() {
        let s = sample();
        let plan = s.plan_get(&["a", "zzz", "b"], None);
        let raw: Vec<&str> = plan.found.iter().map(|a| a.raw_name()).collect();
        assert_eq!(raw, ["2021-06-01_a", "2021-03-01_b"]);
        assert_eq!(plan.missing, vec![ArchiveError::ArchiveNotFound {
            name: "zzz".into(),
            version: None
        }]);
    }

    #[test]
    fn plan_get_with_unmatched_version_excludes_name() {
        let s = sample();
        let plan = s.plan_get(&["a", "b"], Some("2021-03-01"));
        let raw: Vec<&str> = plan.found.iter().map(|a| a.raw_name()).collect();
        assert_eq!(raw, ["2021-03-01_b"]);
        assert_eq!(plan.missing[0].to_string(), "Archive 'a' of version 2021-03-01 does not exist");
    }

    // ── plan_prune ────────────────────────────────────────────────────────────

    #[test]
    fn prune_keeps_newest_of_named_set() {
        let s = sample();
        let groups = s.plan_prune(&names(&["a"]));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "a");
        assert_eq!(groups[0].removed_versions(), "2021-01-01");
        assert_eq!(groups[0].keep.version(), "2021-06-01");
        assert_eq!(groups[0].delete_invocations(), vec![Invocation::Delete {
            raw_name: "2021-01-01_a".into()
        }]);
    }

    #[test]
    fn prune_skips_single_version_sets() {
        assert!(sample().plan_prune(&names(&["b"])).is_empty());
    }

    #[test]
    fn prune_without_filter_covers_everything() {
        let s = store(&[
            "2021-03-01_a",
            "2021-01-01_b",
            "2021-01-01_a",
            "2021-02-01_b",
            "2021-02-01_a",
            "2021-05-01_c",
        ]);
        let groups = s.plan_prune(&HashSet::new());
        let summary: Vec<(&str, String, String)> = groups
            .iter()
            .map(|g| (g.name, g.removed_versions(), g.keep.version()))
            .collect();
        assert_eq!(summary, vec![
            ("a", "2021-01-01, 2021-02-01".to_string(), "2021-03-01".to_string()),
            ("b", "2021-01-01".to_string(), "2021-02-01".to_string()),
        ]);
    }

    #[test]
    fn prune_keeps_the_archive_get_would_extract() {
        let s = store(&["2021-06-01_a", "2021-06-01a", "2021-01-01_a"]);
        let groups = s.plan_prune(&names(&["a"]));
        assert_eq!(groups[0].keep, s.select("a", None).unwrap());
        assert_eq!(groups[0].keep.raw_name(), "2021-06-01_a");
        let removed: Vec<&str> = groups[0].remove.iter().map(|a| a.raw_name()).collect();
        assert_eq!(removed, ["2021-01-01_a", "2021-06-01a"]);
    }

    #[test]
    fn prune_with_unknown_name_does_nothing() {
        assert!(sample().plan_prune(&names(&["nope"])).is_empty());
    }

    // ── create_invocation ─────────────────────────────────────────────────────

    #[test]
    fn create_invocation_embeds_date_and_sanitised_name() {
        let target = AddTarget {
            dir: "/srv".into(),
            basename: "my-backup".into(),
            name: "my_backup".into(),
        };
        let today = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        assert_eq!(create_invocation(&target, today), Invocation::Create {
            raw_name: "2023-05-01_my_backup".into(),
            basename: "my-backup".into(),
            dir: "/srv".into(),
        });
    }
}
