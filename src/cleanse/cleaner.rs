use std::collections::HashSet;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use crate::cleanse::constants::*;
use crate::cleanse::record::{CleanedRecord, SourceHeader, SourceRecord};

pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex")
});

/// Checks the general shape of an address after trimming and lowercasing.
/// The stored value is left untouched.
pub fn is_valid_email(email: Option<&str>) -> bool {
    match email {
        Some(email) => EMAIL_REGEX.is_match(&email.trim().to_lowercase()),
        None => false,
    }
}

/// A row is structurally broken when any of its cells carries the four-comma run.
pub fn is_malformed(row: &SourceRecord) -> bool {
    row.fields.iter().any(|cell| cell.contains(MALFORMED_ROW_MARKER))
}

/// Result of cleaning one partition. `accepted` and `garbage` never share a row.
#[derive(Debug, Default, Clone)]
pub struct CleanOutcome {
    pub accepted: Vec<CleanedRecord>,
    pub garbage: Vec<CleanedRecord>,
    pub malformed_dropped: usize,
    pub missing_data: usize,
    pub invalid_emails: usize,
    pub duplicates_dropped: usize,
    pub unparsed_gender: usize,
}

pub struct RowCleaner {
    header: SourceHeader,
}

impl RowCleaner {
    pub fn new(header: SourceHeader) -> Self {
        Self { header }
    }

    pub fn clean(&self, rows: &[SourceRecord]) -> CleanOutcome {
        let mut outcome = CleanOutcome::default();

        let mut projected = Vec::with_capacity(rows.len());
        for row in rows {
            if is_malformed(row) {
                outcome.malformed_dropped += 1;
                continue;
            }
            let record = self.header.project(row);
            if record.gender_unparsed {
                outcome.unparsed_gender += 1;
            }
            projected.push(CleanedRecord::from(record));
        }

        let mut missing_data = Vec::new();
        let mut invalid_emails = Vec::new();
        let mut candidates = Vec::new();

        for record in projected {
            let has_essential = record.has_essential_data();
            let valid_email = is_valid_email(record.email.as_deref());

            if !has_essential {
                missing_data.push(record.clone());
            }
            if !valid_email {
                invalid_emails.push(record.clone());
            }
            if has_essential && valid_email {
                candidates.push(record);
            }
        }

        outcome.missing_data = missing_data.len();
        outcome.invalid_emails = invalid_emails.len();
        debug!(
            "Missing essential data: {}, invalid emails: {}",
            outcome.missing_data, outcome.invalid_emails
        );

        let before = candidates.len();
        outcome.accepted = dedup_by_identity(candidates);
        outcome.duplicates_dropped = before - outcome.accepted.len();

        missing_data.extend(invalid_emails);
        outcome.garbage = dedup_full_rows(missing_data);

        outcome
    }
}

/// Keeps the first row for every `(email, login)` pair.
pub fn dedup_by_identity(records: Vec<CleanedRecord>) -> Vec<CleanedRecord> {
    let mut seen: HashSet<(Option<String>, Option<String>)> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| {
            let (email, login) = record.dedup_key();
            seen.insert((email.map(str::to_string), login.map(str::to_string)))
        })
        .collect()
}

/// Keeps the first occurrence of every distinct full row.
pub fn dedup_full_rows(records: Vec<CleanedRecord>) -> Vec<CleanedRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.full_key()))
        .collect()
}
