//! Age classification
//!
//! This module derives a coarse age group from a birthdate. The group is
//! recomputed on every request and drives the content policy applied by
//! [`crate::filtering`].

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::filtering::AgePolicy;

/// Errors that can occur while reading a birthdate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgeError {
    /// No birthdate text was supplied
    #[error("Birthdate is empty")]
    Empty,

    /// Birthdate text could not be read as a calendar date
    #[error("Invalid birthdate: {0}")]
    InvalidBirthdate(String),

    /// Age group name not recognized
    #[error("Unknown age group: {0}")]
    UnknownGroup(String),
}

/// Result type for age operations
pub type Result<T> = std::result::Result<T, AgeError>;

/// Age at which a user leaves the youngest bucket
pub const TEEN_AGE: i64 = 13;

/// Age at which a user is treated as an adult
pub const ADULT_AGE: i64 = 18;

/// Coarse age bucket used for content policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    /// Younger than 13
    #[serde(rename = "UNDER_13")]
    Under13,
    /// 13 through 17
    #[serde(rename = "TEEN", alias = "TEEN_13_17")]
    Teen,
    /// 18 or older
    #[serde(rename = "ADULT", alias = "ADULT_18_PLUS")]
    Adult,
    /// Birthdate missing, unreadable or in the future
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl AgeGroup {
    /// Map an age in whole years to its group
    pub fn from_age(age: i64) -> Self {
        match age {
            a if a < 0 => AgeGroup::Unknown,
            a if a < TEEN_AGE => AgeGroup::Under13,
            a if a < ADULT_AGE => AgeGroup::Teen,
            _ => AgeGroup::Adult,
        }
    }

    /// Wire name of the group
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Under13 => "UNDER_13",
            AgeGroup::Teen => "TEEN",
            AgeGroup::Adult => "ADULT",
            AgeGroup::Unknown => "UNKNOWN",
        }
    }

    /// Whether the viewer must be treated as a minor.
    ///
    /// An unknown age counts as a minor.
    pub fn is_minor(&self) -> bool {
        !matches!(self, AgeGroup::Adult)
    }

    /// Content policy for this group
    pub fn policy(&self) -> AgePolicy {
        AgePolicy::for_group(*self)
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeGroup {
    type Err = AgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNDER_13" => Ok(AgeGroup::Under13),
            "TEEN" | "TEEN_13_17" => Ok(AgeGroup::Teen),
            "ADULT" | "ADULT_18_PLUS" => Ok(AgeGroup::Adult),
            "UNKNOWN" => Ok(AgeGroup::Unknown),
            _ => Err(AgeError::UnknownGroup(s.to_string())),
        }
    }
}

/// A birthdate as supplied by a user record
///
/// Either an already-typed calendar date or raw text that still has to be
/// parsed. Deserializes from a JSON string; well-formed `YYYY-MM-DD` values
/// land in [`Birthdate::Date`], anything else is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Birthdate {
    /// A calendar date
    Date(NaiveDate),
    /// Unparsed date text
    Text(String),
}

impl Birthdate {
    /// Resolve to a calendar date
    pub fn to_date(&self) -> Result<NaiveDate> {
        match self {
            Birthdate::Date(date) => Ok(*date),
            Birthdate::Text(text) => parse_birthdate(text),
        }
    }
}

impl From<NaiveDate> for Birthdate {
    fn from(date: NaiveDate) -> Self {
        Birthdate::Date(date)
    }
}

impl From<DateTime<Utc>> for Birthdate {
    fn from(instant: DateTime<Utc>) -> Self {
        Birthdate::Date(instant.date_naive())
    }
}

impl From<&str> for Birthdate {
    fn from(text: &str) -> Self {
        Birthdate::Text(text.to_string())
    }
}

impl From<String> for Birthdate {
    fn from(text: String) -> Self {
        Birthdate::Text(text)
    }
}

/// Parse birthdate text into a calendar date
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (the UTC date is used) and
/// naive `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS` timestamps with
/// optional fractional seconds.
pub fn parse_birthdate(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AgeError::Empty);
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc).date_naive());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(moment) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(moment.date());
        }
    }

    Err(AgeError::InvalidBirthdate(text.to_string()))
}

/// Whole years between `birth` and `today`
///
/// A birthday falling on `today` counts as already reached. Negative when
/// `birth` lies in the future.
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> i64 {
    let mut age = i64::from(today.year()) - i64::from(birth.year());
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Classify a birthdate as of the current UTC date
///
/// Never fails: a missing or unreadable birthdate yields
/// [`AgeGroup::Unknown`].
pub fn compute_age_group(birthdate: Option<&Birthdate>) -> AgeGroup {
    compute_age_group_on(birthdate, Utc::now().date_naive())
}

/// Classify a birthdate as of `today`
pub fn compute_age_group_on(birthdate: Option<&Birthdate>, today: NaiveDate) -> AgeGroup {
    let Some(birthdate) = birthdate else {
        return AgeGroup::Unknown;
    };

    let birth = match birthdate.to_date() {
        Ok(date) => date,
        Err(e) => {
            tracing::debug!("Birthdate not usable for age classification: {}", e);
            return AgeGroup::Unknown;
        }
    };

    let age = age_in_years(birth, today);
    if age < 0 {
        tracing::debug!("Birthdate {} lies after {}", birth, today);
    }

    AgeGroup::from_age(age)
}
