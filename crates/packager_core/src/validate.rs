//! Pure input validators shared by all mutation paths.
//!
//! # Invariants
//! - Validators never touch the store.
//! - Name uniqueness is not checked here; it is enforced by the store's
//!   UNIQUE constraints at write time.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason a name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    Empty,
    OnlyWhitespace,
}

impl Display for NameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("Name cannot be empty"),
            Self::OnlyWhitespace => f.write_str("Name cannot be only whitespace"),
        }
    }
}

impl Error for NameError {}

/// Checks a user supplied name.
///
/// Rules, in order: the empty string is rejected, then strings consisting
/// only of whitespace.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.chars().all(char::is_whitespace) {
        return Err(NameError::OnlyWhitespace);
    }
    Ok(())
}

/// Message shown when a write hits a UNIQUE name constraint.
pub fn duplicate_name_message(name: &str) -> String {
    format!("Name \"{name}\" already exists")
}

/// Parses an item weight in grams.
pub fn parse_weight(value: &str) -> Result<u32, &'static str> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| "Weight must be a non-negative integer")
}

/// Parses an optional temperature; blank input clears the value.
pub fn parse_temperature(value: &str) -> Result<Option<i64>, &'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| "Temperature must be an integer")
}

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| "Date must be YYYY-MM-DD")
}

/// Checks the date range of a trip.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), &'static str> {
    if end < start {
        return Err("End date must not be before start date");
    }
    Ok(())
}

/// Turns blank optional text input into `None`.
pub fn optional_text(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
