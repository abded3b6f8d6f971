//! Archive identity: `YYYY-MM-DD_name` ⇄ [`ArchiveId`].
//!
//! tarsnap knows nothing about dates or backup sets; it only stores opaque
//! archive names.  This tool encodes both into the name:
//!
//! ```text
//! 2023-05-01_my_backup
//! └───┬────┘│└───┬───┘
//!    date   _  logical name
//! ```
//!
//! Several archives sharing a logical name are versions of the same backup
//! set.  Logical names never contain `-` (see [`sanitize_name`]), so the date
//! prefix can always be split off unambiguously.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;

use crate::{error::ArchiveError, runner::Invocation};

/// `strftime` format of the date prefix and of `--version` arguments.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Separator between the date prefix and the logical name.
pub const SEPARATOR: char = '_';

/// Byte length of a `YYYY-MM-DD` prefix.
const DATE_LEN: usize = 10;

/// One archive snapshot known to the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveId {
    raw: String,
    date: NaiveDate,
    name: String,
}

impl ArchiveId {
    /// Parse a raw identifier as printed by `tarsnap --list-archives`.
    ///
    /// The leading ten bytes must be a valid calendar date.  A single `_`
    /// after the date is consumed if present; whatever follows (possibly
    /// nothing) is the logical name.
    pub fn parse(raw: &str) -> Result<Self, ArchiveError> {
        let malformed = || ArchiveError::MalformedIdentifier { raw: raw.into() };

        let (prefix, rest) = raw.split_at_checked(DATE_LEN).ok_or_else(malformed)?;
        if !is_date_shaped(prefix) {
            return Err(malformed());
        }
        let date = NaiveDate::parse_from_str(prefix, DATE_FORMAT).map_err(|_| malformed())?;
        let name = rest.strip_prefix(SEPARATOR).unwrap_or(rest);

        Ok(Self {
            raw: raw.into(),
            date,
            name: name.into(),
        })
    }

    /// The exact string tarsnap uses for this archive.
    pub fn raw_name(&self) -> &str {
        &self.raw
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// The backup set this snapshot belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The date formatted as `YYYY-MM-DD`, i.e. what `get --version` matches.
    pub fn version(&self) -> String {
        format_date(self.date)
    }

    /// Request to delete exactly this archive.
    pub fn drop_invocation(&self) -> Invocation {
        Invocation::Delete {
            raw_name: self.raw.clone(),
        }
    }

    /// Request to extract this archive into the current directory.
    pub fn extract_invocation(&self) -> Invocation {
        Invocation::Extract {
            raw_name: self.raw.clone(),
        }
    }
}

impl FromStr for ArchiveId {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ArchiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ─── Naming helpers ───────────────────────────────────────────────────────────

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Turn a file name into a logical name: every `-` becomes `_`.
pub fn sanitize_name(basename: &str) -> String {
    basename.replace('-', "_")
}

/// Build the raw identifier for a new archive of `name` taken on `date`.
pub fn raw_name_for(date: NaiveDate, name: &str) -> String {
    format!("{}{SEPARATOR}{name}", format_date(date))
}

/// Whether `s` is a real calendar date written exactly as `YYYY-MM-DD`.
///
/// Only such a string can ever equal an archive's version.
pub fn is_canonical_version(s: &str) -> bool {
    is_date_shaped(s) && NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok()
}

/// `DDDD-DD-DD`, checked byte by byte; chrono alone would also accept
/// unpadded fields such as `2021-1-1`.
fn is_date_shaped(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == DATE_LEN
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── parse ─────────────────────────────────────────────────────────────────

    #[test]
    fn parses_date_and_name() {
        let a = ArchiveId::parse("2021-06-01_photos").unwrap();
        assert_eq!(a.date(), ymd(2021, 6, 1));
        assert_eq!(a.name(), "photos");
        assert_eq!(a.raw_name(), "2021-06-01_photos");
    }

    #[test]
    fn only_one_separator_is_consumed() {
        let a = ArchiveId::parse("2021-06-01__hidden").unwrap();
        assert_eq!(a.name(), "_hidden");
    }

    #[test]
    fn name_may_contain_underscores_and_dates() {
        let a = ArchiveId::parse("2021-06-01_my_backup_2020-01-01").unwrap();
        assert_eq!(a.name(), "my_backup_2020-01-01");
    }

    #[test]
    fn name_may_be_empty() {
        assert_eq!(ArchiveId::parse("2021-06-01_").unwrap().name(), "");
        assert_eq!(ArchiveId::parse("2021-06-01").unwrap().name(), "");
    }

    #[test]
    fn missing_separator_keeps_remainder() {
        assert_eq!(ArchiveId::parse("2021-06-01docs").unwrap().name(), "docs");
    }

    #[test]
    fn rejects_missing_date() {
        let err = ArchiveId::parse("photos").unwrap_err();
        assert_eq!(err, ArchiveError::MalformedIdentifier {
            raw: "photos".into()
        });
    }

    #[test]
    fn rejects_impossible_calendar_date() {
        assert!(ArchiveId::parse("2021-02-30_photos").is_err());
        assert!(ArchiveId::parse("2021-13-01_photos").is_err());
    }

    #[test]
    fn rejects_unpadded_date() {
        assert!(ArchiveId::parse("2021-6-1_photos").is_err());
    }

    #[test]
    fn rejects_date_not_at_start() {
        assert!(ArchiveId::parse("x2021-06-01_photos").is_err());
    }

    #[test]
    fn rejects_multibyte_prefix_without_panicking() {
        assert!(ArchiveId::parse("2021-06-0é_photos").is_err());
        assert!(ArchiveId::parse("ééééé").is_err());
    }

    #[test]
    fn reconstructed_name_reparses_to_equal_identifier() {
        for raw in ["2021-01-01_a", "1999-12-31_my_backup", "2024-02-29_"] {
            let a = ArchiveId::parse(raw).unwrap();
            let rebuilt = raw_name_for(a.date(), a.name());
            assert_eq!(ArchiveId::parse(&rebuilt).unwrap(), a);
        }
    }

    #[test]
    fn from_str_and_display_use_raw_name() {
        let a: ArchiveId = "2022-03-04_etc".parse().unwrap();
        assert_eq!(a.to_string(), "2022-03-04_etc");
        assert_eq!(a.version(), "2022-03-04");
    }

    // ── invocations ───────────────────────────────────────────────────────────

    #[test]
    fn drop_and_extract_target_the_raw_name() {
        let a = ArchiveId::parse("2021-06-01_photos").unwrap();
        assert_eq!(a.drop_invocation(), Invocation::Delete {
            raw_name: "2021-06-01_photos".into()
        });
        assert_eq!(a.extract_invocation(), Invocation::Extract {
            raw_name: "2021-06-01_photos".into()
        });
    }

    // ── naming helpers ────────────────────────────────────────────────────────

    #[test]
    fn sanitize_replaces_every_dash() {
        assert_eq!(sanitize_name("my-backup"), "my_backup");
        assert_eq!(sanitize_name("a-b-c"), "a_b_c");
        assert_eq!(sanitize_name("plain"), "plain");
    }

    #[test]
    fn raw_name_for_today() {
        assert_eq!(
            raw_name_for(ymd(2023, 5, 1), &sanitize_name("my-backup")),
            "2023-05-01_my_backup"
        );
    }

    #[test]
    fn canonical_version_is_a_padded_real_date() {
        assert!(is_canonical_version("2021-06-01"));
        assert!(!is_canonical_version("2021-06-31"));
        assert!(!is_canonical_version("2021-6-1"));
        assert!(!is_canonical_version("latest"));
    }
}
