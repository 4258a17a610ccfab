//! Timestamps embedded in file and folder names
//!
//! Backup entries end with a `YYYY.MM.DD-HH.MM.SS` local timestamp, e.g.
//! `DataLog_Backup -2020.11.30-00.43.25` or just `2020.11.30-00.43.25`.
//! Hourly datalog files are named `<COM>-dataYYYYMMDDHH.log` in UTC.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

/// chrono format of the backup timestamp suffix
pub const BACKUP_STAMP_FORMAT: &str = "%Y.%m.%d-%H.%M.%S";

/// Length in bytes of a backup timestamp suffix
pub const BACKUP_STAMP_LEN: usize = 19;

// `d` = ASCII digit, anything else must match literally
const BACKUP_STAMP_SHAPE: &[u8; BACKUP_STAMP_LEN] = b"dddd.dd.dd-dd.dd.dd";

/// Parse the timestamp at the end of a backup entry name.
///
/// Returns `None` for names that are too short, do not have the exact
/// `YYYY.MM.DD-HH.MM.SS` shape, or encode an impossible date.
pub fn parse_backup_stamp(name: &str) -> Option<NaiveDateTime> {
    let start = name.len().checked_sub(BACKUP_STAMP_LEN)?;
    if !name.is_char_boundary(start) {
        return None;
    }
    let stamp = &name[start..];

    let shape_ok = stamp
        .bytes()
        .zip(BACKUP_STAMP_SHAPE.iter())
        .all(|(b, &s)| if s == b'd' { b.is_ascii_digit() } else { b == s });
    if !shape_ok {
        return None;
    }

    NaiveDateTime::parse_from_str(stamp, BACKUP_STAMP_FORMAT).ok()
}

/// The freshest backup found in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupAge {
    /// Entry name as listed in the backup directory
    pub name: String,
    /// Timestamp parsed from the entry name
    pub taken_at: NaiveDateTime,
    /// Elapsed time between `taken_at` and the reference time
    pub age: Duration,
}

/// Pick the entry with the smallest age relative to `now`.
///
/// Stamps are wall-clock times in `now`'s zone; ages are measured between
/// the real instants, so a DST change in between does not skew them.
/// Entries without a valid timestamp suffix are skipped, as are stamps that
/// fall in a DST gap and never occurred.
pub fn freshest_backup<I, S, Tz>(names: I, now: &DateTime<Tz>) -> Option<BackupAge>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    Tz: TimeZone,
{
    let zone = now.timezone();
    names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let taken_at = parse_backup_stamp(name)?;
            let instant = zone.from_local_datetime(&taken_at).earliest()?;
            Some(BackupAge {
                name: name.to_string(),
                taken_at,
                age: now.naive_utc() - instant.naive_utc(),
            })
        })
        .min_by_key(|b| b.age)
}

/// Name of the hourly datalog file a COM port logger writes at `now`.
pub fn dated_datalog_name(com: &str, now: DateTime<Utc>) -> String {
    format!("{}-data{}.log", com, now.format("%Y%m%d%H"))
}
