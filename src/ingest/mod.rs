//! Auth event ingest: row parsing, CSV reading, order-preserving user grouping.
//!
//! Input rows carry two `localpart@domain` identity strings; both are split on
//! `@` at parse time and a missing delimiter is rejected immediately rather
//! than misparsed downstream.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Literal status marker for a successful authentication.
pub const SUCCESS_STATUS: &str = "Success";

/// Usernames excluded from every dataset regardless of group size.
pub const EXCLUDED_USERS: [&str; 2] = ["ANONYMOUS LOGON", "ANONYMOUS_LOGON"];

const COLUMN_COUNT: usize = 9;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error reading input: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: identity field {value:?} has no '@' delimiter")]
    MalformedIdentity { value: String, line: u64 },
    #[error("line {line}: expected 9 columns, found {found}")]
    MissingColumns { found: usize, line: u64 },
    #[error("line {line}: bad timestamp {value:?}")]
    BadTimestamp { value: String, line: u64 },
}

/// One authentication event, decomposed from a raw log row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unix timestamp, seconds
    pub time: f64,
    /// Local part of the source identity (`user@domain`)
    pub user: String,
    pub domain: String,
    /// Local part of the destination identity
    pub dest_user: String,
    pub src_computer: String,
    pub dest_computer: String,
    pub auth_type: String,
    pub logon_type: String,
    pub auth_orientation: String,
    /// Compared against [`SUCCESS_STATUS`]
    pub status: String,
}

impl EventRecord {
    /// Parse one raw 9-column row. `line` is used for diagnostics only.
    pub fn parse(record: &csv::StringRecord, line: u64) -> Result<Self, IngestError> {
        if record.len() < COLUMN_COUNT {
            return Err(IngestError::MissingColumns {
                found: record.len(),
                line,
            });
        }
        let time: f64 = record[0]
            .trim()
            .parse()
            .map_err(|_| IngestError::BadTimestamp {
                value: record[0].to_string(),
                line,
            })?;
        let (user, domain) = split_identity(&record[1], line)?;
        let (dest_user, _dest_domain) = split_identity(&record[2], line)?;

        Ok(Self {
            time,
            user,
            domain,
            dest_user,
            src_computer: record[3].to_string(),
            dest_computer: record[4].to_string(),
            auth_type: record[5].to_string(),
            logon_type: record[6].to_string(),
            auth_orientation: record[7].to_string(),
            status: record[8].to_string(),
        })
    }

    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

fn split_identity(raw: &str, line: u64) -> Result<(String, String), IngestError> {
    match raw.split_once('@') {
        Some((local, domain)) => Ok((local.to_string(), domain.to_string())),
        None => Err(IngestError::MalformedIdentity {
            value: raw.to_string(),
            line,
        }),
    }
}

/// Whether a username is always excluded from output.
pub fn is_excluded_user(user: &str) -> bool {
    EXCLUDED_USERS.contains(&user)
}

/// Read up to `max_rows` events from a headerless CSV auth log.
/// Any malformed row aborts the whole read (source-level corruption).
pub fn read_events(path: &Path, max_rows: Option<usize>) -> Result<Vec<EventRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut events = Vec::new();
    for (i, record) in reader.records().enumerate() {
        if let Some(cap) = max_rows {
            if events.len() >= cap {
                break;
            }
        }
        let record = record?;
        events.push(EventRecord::parse(&record, i as u64 + 1)?);
    }
    Ok(events)
}

/// Group events by source user, preserving first-seen order of users and
/// original event order within each group.
pub fn group_by_user(events: Vec<EventRecord>) -> IndexMap<String, Vec<EventRecord>> {
    let mut groups: IndexMap<String, Vec<EventRecord>> = IndexMap::new();
    for event in events {
        groups.entry(event.user.clone()).or_default().push(event);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn parse_decomposes_identities() {
        let r = record(&[
            "151036",
            "C625$@DOM1",
            "U147@DOM1",
            "C625",
            "C625",
            "Negotiate",
            "Batch",
            "LogOn",
            "Success",
        ]);
        let ev = EventRecord::parse(&r, 1).unwrap();
        assert_eq!(ev.time, 151036.0);
        assert_eq!(ev.user, "C625$");
        assert_eq!(ev.domain, "DOM1");
        assert_eq!(ev.dest_user, "U147");
        assert!(ev.is_success());
    }

    #[test]
    fn malformed_identity_is_rejected() {
        let r = record(&[
            "1", "no-delim", "U1@D", "C1", "C2", "a", "b", "c", "Success",
        ]);
        let err = EventRecord::parse(&r, 7).unwrap_err();
        assert!(matches!(err, IngestError::MalformedIdentity { line: 7, .. }));
    }

    #[test]
    fn grouping_preserves_first_seen_order() {
        let mk = |user: &str, t: f64| EventRecord {
            time: t,
            user: user.into(),
            domain: "D".into(),
            dest_user: "U".into(),
            src_computer: "C1".into(),
            dest_computer: "C2".into(),
            auth_type: "a".into(),
            logon_type: "b".into(),
            auth_orientation: "c".into(),
            status: SUCCESS_STATUS.into(),
        };
        let groups = group_by_user(vec![mk("b", 1.0), mk("a", 2.0), mk("b", 3.0)]);
        let order: Vec<&String> = groups.keys().collect();
        assert_eq!(order, ["b", "a"]);
        assert_eq!(groups["b"].len(), 2);
    }
}
