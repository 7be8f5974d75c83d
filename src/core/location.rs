//! Composite location keys
//!
//! A cinema is addressed inside its tenant partition by a single sort key that
//! encodes the location taxonomy: `country#department#province#district`, with
//! the country segment only present when it was supplied.
//!
//! Empty segments are skipped rather than left as empty fields between
//! delimiters, so a key never starts or ends with `#` and any leading run of
//! the hierarchy is a usable `begins_with` prefix.

use crate::core::validation::filters::trim;
use serde::{Deserialize, Serialize};

/// Separator between location segments
pub const KEY_DELIMITER: char = '#';

/// Join the non-empty parts with [`KEY_DELIMITER`], preserving their order
///
/// Empty input (or only empty parts) yields an empty string, which callers
/// treat as "no filter".
pub fn build_key(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .filter_map(|part| part.map(str::trim).filter(|p| !p.is_empty()))
        .collect::<Vec<_>>()
        .join(&KEY_DELIMITER.to_string())
}

/// Build a prefix for `begins_with` matching
///
/// Same join as [`build_key`]; any leading run of the ordered hierarchy
/// (department only, department + province, ...) is a valid prefix.
pub fn build_prefix(parts: &[Option<&str>]) -> String {
    build_key(parts)
}

/// Split a stored key back into its segments
pub fn split_key(key: &str) -> Vec<&str> {
    if key.is_empty() {
        return Vec::new();
    }
    key.split(KEY_DELIMITER).collect()
}

/// A segment carried a character that would corrupt the key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{field}' must not contain '#' (value: {value})")]
pub struct InvalidSegment {
    pub field: &'static str,
    pub value: String,
}

/// Hierarchical location of a cinema
///
/// Every segment is optional; constructors trim whitespace and turn empty
/// strings into `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPath {
    #[serde(rename = "pais", default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "departamento", default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(rename = "provincia", default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(rename = "distrito", default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

impl LocationPath {
    pub fn new(
        country: Option<String>,
        department: Option<String>,
        province: Option<String>,
        district: Option<String>,
    ) -> Self {
        Self {
            country: trim(country),
            department: trim(department),
            province: trim(province),
            district: trim(district),
        }
    }

    /// Location without a country segment
    pub fn local(department: &str, province: &str, district: &str) -> Self {
        Self::new(
            None,
            Some(department.to_string()),
            Some(province.to_string()),
            Some(district.to_string()),
        )
    }

    /// True when no segment at all was supplied
    pub fn is_empty(&self) -> bool {
        self.country.is_none()
            && self.department.is_none()
            && self.province.is_none()
            && self.district.is_none()
    }

    /// Department, province and district are all present
    pub fn is_complete(&self) -> bool {
        self.department.is_some() && self.province.is_some() && self.district.is_some()
    }

    fn ordered(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("pais", self.country.as_deref()),
            ("departamento", self.department.as_deref()),
            ("provincia", self.province.as_deref()),
            ("distrito", self.district.as_deref()),
        ]
    }

    /// Reject segments containing the key delimiter
    pub fn validate_segments(&self) -> Result<(), InvalidSegment> {
        for (field, value) in self.ordered() {
            if let Some(value) = value {
                if value.contains(KEY_DELIMITER) {
                    return Err(InvalidSegment {
                        field,
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Full sort key for this location
    pub fn key(&self) -> String {
        let parts = self.ordered().map(|(_, value)| value);
        build_key(&parts)
    }

    /// Longest `begins_with` prefix this location can express
    ///
    /// Keys only start with a known segment when the country is given: a
    /// search without a country must also reach keys written with one, so
    /// it gets an empty prefix (the whole partition). Otherwise the prefix
    /// stops at the first missing hierarchy field. Fields left out of the
    /// prefix are still honoured by [`LocationPath::matches_key`].
    pub fn search_prefix(&self) -> String {
        let Some(country) = self.country.as_deref() else {
            return String::new();
        };

        let mut parts = vec![Some(country)];
        for value in [
            self.department.as_deref(),
            self.province.as_deref(),
            self.district.as_deref(),
        ] {
            if value.is_none() {
                break;
            }
            parts.push(value);
        }
        build_prefix(&parts)
    }

    /// Check a stored key against every supplied segment
    ///
    /// Segments are aligned from the district end, so keys written with and
    /// without a country segment compare correctly. A country filter only
    /// matches keys that carry a country.
    pub fn matches_key(&self, key: &str) -> bool {
        let segments = split_key(key);
        let from_end = |offset: usize| {
            segments
                .len()
                .checked_sub(offset)
                .and_then(|idx| segments.get(idx).copied())
        };

        let expectations = [
            (4, self.country.as_deref()),
            (3, self.department.as_deref()),
            (2, self.province.as_deref()),
            (1, self.district.as_deref()),
        ];

        expectations.iter().all(|(offset, expected)| match expected {
            Some(expected) => from_end(*offset) == Some(*expected),
            None => true,
        })
    }

    /// Predicates for the tenant-less scan
    ///
    /// These are a coarse pre-filter: `begins_with` is only set when the
    /// country anchors the key. Callers still check [`LocationPath::matches_key`].
    pub fn scan_predicates(&self) -> ScanPredicates {
        let begins_with = self.country.as_deref().map(|country| {
            build_prefix(&[Some(country), self.department.as_deref()])
        });

        ScanPredicates {
            begins_with,
            contains: self
                .province
                .as_ref()
                .map(|p| format!("{KEY_DELIMITER}{p}{KEY_DELIMITER}")),
            ends_with: self
                .district
                .as_ref()
                .map(|d| format!("{KEY_DELIMITER}{d}")),
        }
    }
}

/// Independently composable key predicates, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPredicates {
    pub begins_with: Option<String>,
    pub contains: Option<String>,
    pub ends_with: Option<String>,
}

impl ScanPredicates {
    pub fn is_empty(&self) -> bool {
        self.begins_with.is_none() && self.contains.is_none() && self.ends_with.is_none()
    }

    pub fn matches(&self, key: &str) -> bool {
        self.begins_with.as_deref().is_none_or(|p| key.starts_with(p))
            && self.contains.as_deref().is_none_or(|c| key.contains(c))
            && self.ends_with.as_deref().is_none_or(|s| key.ends_with(s))
    }
}
