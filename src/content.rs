//! Normalized, read-only view of a [`BiodataRecord`].
//!
//! Absence is a first-class state: nothing in here fails on a missing or malformed optional
//! field, it simply reports the value as absent. Both renderers go through this module, so
//! `prettify` and the composite/derived fields exist exactly once.

use chrono::{Datelike, NaiveDate};

use crate::error::Error;
use crate::model::BiodataRecord;

pub const COMPOSITE_SEPARATOR: &str = ", ";

/// Presence test shared by every field kind.
///
/// Strings are present when non-empty after trimming; numbers and flags whenever they are set,
/// so `0` and `false` count as present.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for Option<String> {
    fn is_present(&self) -> bool {
        self.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

impl Presence for Option<u32> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

impl Presence for Option<bool> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

/// `pending_review` → `Pending Review`. Underscores and hyphens separate words; only the first
/// letter of each word changes case.
pub fn prettify(raw: &str) -> String {
    raw.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars)
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join the present parts with [`COMPOSITE_SEPARATOR`]; absent when every part is absent.
pub fn compose_parts(parts: &[&Option<String>]) -> Option<String> {
    let present: Vec<&str> = parts
        .iter()
        .filter(|p| p.is_present())
        .filter_map(|p| p.as_deref().map(str::trim))
        .collect();
    if present.is_empty() {
        None
    } else {
        Some(present.join(COMPOSITE_SEPARATOR))
    }
}

/// Whole years elapsed between `dob` and `today`, comparing month/day rather than dividing by a
/// fixed year length. `None` when `dob` lies in the future.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> Option<u32> {
    if dob > today {
        return None;
    }
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part (`1996-03-12T00:00:00Z`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub struct Content<'a> {
    record: &'a BiodataRecord,
    today: NaiveDate,
}

impl<'a> Content<'a> {
    pub fn new(record: &'a BiodataRecord, today: NaiveDate) -> Self {
        Self { record, today }
    }

    pub fn record(&self) -> &'a BiodataRecord {
        self.record
    }

    /// The record's required fields. Everything else may be absent.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.record.full_name.is_present() {
            return Err(Error::InvalidRecord("full name is required".into()));
        }
        if !self.record.gender.is_present() {
            return Err(Error::InvalidRecord("gender is required".into()));
        }
        Ok(())
    }

    pub fn full_name(&self) -> String {
        self.record
            .full_name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }

    /// Free-form text as entered, trimmed.
    pub fn text(&self, field: &Option<String>) -> Option<String> {
        field
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Enum-like value through [`prettify`].
    pub fn label(&self, field: &Option<String>) -> Option<String> {
        self.text(field).map(|s| prettify(&s))
    }

    pub fn location(&self) -> Option<String> {
        compose_parts(&[&self.record.city, &self.record.country])
    }

    pub fn full_address(&self) -> Option<String> {
        let r = self.record;
        compose_parts(&[&r.address, &r.city, &r.state, &r.country])
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        let raw = self.text(&self.record.date_of_birth)?;
        let parsed = parse_date(&raw);
        if parsed.is_none() {
            log::debug!("date of birth {raw:?} is not a date, treating as absent");
        }
        parsed
    }

    pub fn age(&self) -> Option<u32> {
        age_on(self.date_of_birth()?, self.today)
    }

    pub fn age_label(&self) -> Option<String> {
        self.age().map(|n| format!("{n} years"))
    }

    pub fn date_of_birth_label(&self) -> Option<String> {
        self.date_of_birth()
            .map(|d| format!("{} {}", d.day(), d.format("%B %Y")))
    }

    pub fn preferred_age_range(&self) -> Option<String> {
        match (self.record.preferred_age_min, self.record.preferred_age_max) {
            (Some(min), Some(max)) => Some(format!("{min} - {max} years")),
            _ => None,
        }
    }

    pub fn siblings(&self) -> Option<String> {
        self.record.siblings_count.map(|n| n.to_string())
    }

    pub fn willing_to_relocate(&self) -> Option<String> {
        self.record
            .willing_to_relocate
            .map(|yes| if yes { "Yes" } else { "No" }.to_string())
    }

    pub fn status_badge(&self) -> Option<String> {
        self.label(&self.record.status)
    }
}
