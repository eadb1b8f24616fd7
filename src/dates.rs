//! Service-day calendar dates.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use jiff::civil::Date;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A calendar day in canonical zero-padded ISO 8601 `YYYY-MM-DD` form.
///
/// Ordering and equality compare the canonical string form
/// lexicographically. The canonical form is zero-padded and big-endian, so
/// the string order coincides with chronological order; comparisons must
/// never go through locale-dependent date parsing.
#[derive(Debug, Clone)]
pub struct ServiceDate {
    date: Date,
    iso: String,
}

impl ServiceDate {
    /// Builds a `ServiceDate` from an already-validated civil date.
    #[must_use]
    pub fn from_civil(date: Date) -> Self {
        Self {
            iso: date.to_string(),
            date,
        }
    }

    /// The canonical `YYYY-MM-DD` form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.iso
    }

    /// The underlying civil date, for calendar arithmetic.
    #[must_use]
    pub fn civil(&self) -> Date {
        self.date
    }

    /// The day after this one, if representable.
    #[must_use]
    pub fn next_day(&self) -> Option<Self> {
        self.date.tomorrow().ok().map(Self::from_civil)
    }
}

impl FromStr for ServiceDate {
    type Err = DateParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .parse::<Date>()
            .map(Self::from_civil)
            .map_err(|_| DateParseError {
                value: value.to_string(),
            })
    }
}

impl fmt::Display for ServiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iso)
    }
}

impl PartialEq for ServiceDate {
    fn eq(&self, other: &Self) -> bool {
        self.iso == other.iso
    }
}

impl Eq for ServiceDate {}

impl PartialOrd for ServiceDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iso.cmp(&other.iso)
    }
}

impl Hash for ServiceDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.iso.hash(state);
    }
}

impl Serialize for ServiceDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.iso)
    }
}

impl<'de> Deserialize<'de> for ServiceDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A date string that is not a valid `YYYY-MM-DD` calendar day.
#[derive(Debug, Clone, Error)]
#[error("invalid calendar date: {value}")]
pub struct DateParseError {
    /// The rejected input.
    pub value: String,
}

/// Deserializes an optional date field, treating an empty string as absent.
///
/// Older API deployments send `""` for a missing `availableOn`.
///
/// # Errors
///
/// Returns a deserialization error when the field is present, non-empty and
/// not a valid calendar date.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<ServiceDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;

    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Deserializes an optional date list, dropping entries that do not parse.
///
/// The storefront must keep rendering a catalog even when one dish carries a
/// malformed date, so bad entries are skipped rather than failing the whole
/// payload.
///
/// # Errors
///
/// Returns a deserialization error only when the field is not a list of
/// strings.
pub fn deserialize_lenient_dates<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<ServiceDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?;

    Ok(raw.map(|dates| {
        dates
            .iter()
            .filter_map(|value| value.parse().ok())
            .collect()
    }))
}
