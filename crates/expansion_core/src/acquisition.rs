//! Territorial acquisition table.
//!
//! # Responsibility
//! - Map acquisition years to the state abbreviations acquired that year.
//! - Resolve an abbreviation back to its acquisition year.
//! - Load the table from a JSON configuration resource.
//!
//! # Invariants
//! - Entries are held in ascending year order; lookups scan in that order and
//!   the first containing entry wins.
//! - Abbreviations are two uppercase ASCII letters.
//! - An abbreviation may appear under several years (AZ/NM are listed under
//!   both 1848 and 1853); the earliest year is the resolved one.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

static ABBREVIATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("valid abbreviation regex"));

const US_ACQUISITIONS: &[(i32, &[&str])] = &[
    (
        1783,
        &[
            "CT", "DE", "GA", "MA", "MD", "NH", "NJ", "NY", "NC", "PA", "RI", "SC", "VA",
        ],
    ),
    (
        1803,
        &[
            "AR", "IA", "KS", "LA", "MN", "MO", "MT", "ND", "NE", "OK", "SD", "WY",
        ],
    ),
    (1845, &["TX"]),
    (1848, &["AZ", "CA", "CO", "NV", "NM", "UT"]),
    // Gadsden Purchase; overlaps the 1848 cession.
    (1853, &["AZ", "NM"]),
    (1867, &["AK"]),
    (1959, &["HI"]),
];

/// Error for loading an externally supplied acquisition table.
#[derive(Debug)]
pub enum TableError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    InvalidAbbreviation {
        year: i32,
        value: String,
    },
    EmptyYear(i32),
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(
                f,
                "failed to read acquisition table `{}`: {source}",
                path.display()
            ),
            Self::Parse(err) => write!(f, "invalid acquisition table: {err}"),
            Self::InvalidAbbreviation { year, value } => write!(
                f,
                "invalid state abbreviation `{value}` under year {year}; expected two uppercase letters"
            ),
            Self::EmptyYear(year) => write!(f, "acquisition year {year} lists no states"),
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TableError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Year entries in document order, repeated keys included.
struct YearEntries(Vec<(i32, Vec<String>)>);

impl<'de> Deserialize<'de> for YearEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct YearEntriesVisitor;

        impl<'de> Visitor<'de> for YearEntriesVisitor {
            type Value = YearEntries;

            fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of year to state abbreviations")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<i32, Vec<String>>()? {
                    entries.push(entry);
                }
                Ok(YearEntries(entries))
            }
        }

        deserializer.deserialize_map(YearEntriesVisitor)
    }
}

/// Immutable year → abbreviations lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionTable {
    entries: BTreeMap<i32, Vec<String>>,
}

impl AcquisitionTable {
    /// Builds a validated table from year → abbreviations pairs.
    ///
    /// Pairs sharing a year are merged in input order.
    pub fn new<I, S>(entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (i32, Vec<S>)>,
        S: Into<String>,
    {
        let mut merged = BTreeMap::<i32, Vec<String>>::new();
        for (year, states) in entries {
            let slot = merged.entry(year).or_default();
            slot.extend(states.into_iter().map(Into::into));
        }

        for (year, states) in &merged {
            if states.is_empty() {
                return Err(TableError::EmptyYear(*year));
            }
            if let Some(bad) = states.iter().find(|s| !ABBREVIATION_RE.is_match(s)) {
                return Err(TableError::InvalidAbbreviation {
                    year: *year,
                    value: bad.clone(),
                });
            }
        }

        Ok(Self { entries: merged })
    }

    /// Returns the built-in US territorial acquisition table.
    pub fn us_territorial() -> Self {
        let entries = US_ACQUISITIONS
            .iter()
            .map(|(year, states)| {
                let states = states.iter().map(|s| s.to_string()).collect::<Vec<_>>();
                (*year, states)
            })
            .collect::<BTreeMap<_, _>>();
        Self { entries }
    }

    /// Parses a table shaped like `{"1783": ["CT", ...], ...}`.
    ///
    /// A year key repeated in the document is merged like repeated pairs
    /// passed to [`AcquisitionTable::new`].
    pub fn from_json_str(text: &str) -> Result<Self, TableError> {
        let YearEntries(entries) = serde_json::from_str(text)?;
        Self::new(entries)
    }

    /// Reads and parses a table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Returns the first year (ascending) whose entry lists `abbr`.
    pub fn year_for(&self, abbr: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|(_, states)| states.iter().any(|s| s == abbr))
            .map(|(year, _)| *year)
    }

    /// Returns every year whose entry lists `abbr`, ascending.
    pub fn years_for(&self, abbr: &str) -> Vec<i32> {
        self.entries
            .iter()
            .filter(|(_, states)| states.iter().any(|s| s == abbr))
            .map(|(year, _)| *year)
            .collect()
    }

    /// Iterates `(year, abbreviations)` in ascending year order.
    pub fn entries(&self) -> impl Iterator<Item = (i32, &[String])> {
        self.entries
            .iter()
            .map(|(year, states)| (*year, states.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AcquisitionTable {
    fn default() -> Self {
        Self::us_territorial()
    }
}

#[cfg(test)]
mod tests {
    use super::{AcquisitionTable, TableError};

    #[test]
    fn builtin_table_resolves_known_states() {
        let table = AcquisitionTable::us_territorial();
        assert_eq!(table.year_for("TX"), Some(1845));
        assert_eq!(table.year_for("VA"), Some(1783));
        assert_eq!(table.year_for("WY"), Some(1803));
        assert_eq!(table.year_for("AK"), Some(1867));
        assert_eq!(table.year_for("HI"), Some(1959));
    }

    #[test]
    fn overlapping_states_resolve_to_earliest_year() {
        let table = AcquisitionTable::us_territorial();
        assert_eq!(table.year_for("AZ"), Some(1848));
        assert_eq!(table.year_for("NM"), Some(1848));
        assert_eq!(table.years_for("AZ"), vec![1848, 1853]);
        assert_eq!(table.years_for("CA"), vec![1848]);
    }

    #[test]
    fn unknown_and_empty_abbreviations_have_no_year() {
        let table = AcquisitionTable::us_territorial();
        assert_eq!(table.year_for("ZZ"), None);
        assert_eq!(table.year_for(""), None);
        assert_eq!(table.year_for("tx"), None);
    }

    #[test]
    fn entries_are_ascending() {
        let years: Vec<i32> = AcquisitionTable::us_territorial()
            .entries()
            .map(|(year, _)| year)
            .collect();
        assert_eq!(years, vec![1783, 1803, 1845, 1848, 1853, 1867, 1959]);
    }

    #[test]
    fn json_table_is_ordered_by_year_not_declaration() {
        let table =
            AcquisitionTable::from_json_str(r#"{"1900": ["AA"], "1800": ["AA", "BB"]}"#).unwrap();
        assert_eq!(table.year_for("AA"), Some(1800));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn json_table_merges_repeated_year_keys() {
        let table =
            AcquisitionTable::from_json_str(r#"{"1848": ["AZ"], "1803": ["LA"], "1848": ["NM"]}"#)
                .unwrap();
        assert_eq!(table.year_for("AZ"), Some(1848));
        assert_eq!(table.year_for("NM"), Some(1848));
        assert_eq!(table.len(), 2);
        let merged: Vec<(i32, Vec<&str>)> = table
            .entries()
            .map(|(year, states)| (year, states.iter().map(String::as_str).collect()))
            .collect();
        assert_eq!(merged, vec![(1803, vec!["LA"]), (1848, vec!["AZ", "NM"])]);
    }

    #[test]
    fn json_table_rejects_invalid_abbreviation() {
        let err = AcquisitionTable::from_json_str(r#"{"1800": ["Texas"]}"#).unwrap_err();
        assert!(matches!(
            err,
            TableError::InvalidAbbreviation { year: 1800, ref value } if value == "Texas"
        ));
    }

    #[test]
    fn json_table_rejects_empty_year_and_bad_keys() {
        let err = AcquisitionTable::from_json_str(r#"{"1800": []}"#).unwrap_err();
        assert!(matches!(err, TableError::EmptyYear(1800)));

        let err = AcquisitionTable::from_json_str(r#"{"later": ["TX"]}"#).unwrap_err();
        assert!(matches!(err, TableError::Parse(_)));
    }
}
