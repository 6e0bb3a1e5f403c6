//! Search criteria and the record matcher

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::{xml_trim, AttributeKey, ScientistRecord};

/// How a criterion value is compared against a record field.
///
/// The mode is chosen once per engine set and applied by every strategy,
/// so that all strategies return the same records for the same criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Equality after trimming both sides
    Exact,
    /// Trimmed criterion is a case-insensitive substring of the field
    #[default]
    #[serde(rename = "contains", alias = "case_insensitive_contains")]
    CaseInsensitiveContains,
}

/// Matching policy used when nothing else is configured
pub const DEFAULT_MATCH_MODE: MatchMode = MatchMode::CaseInsensitiveContains;

impl MatchMode {
    /// Compare one field value against one criterion value
    pub fn matches_value(self, field: &str, needle: &str) -> bool {
        match self {
            MatchMode::Exact => xml_trim(field) == xml_trim(needle),
            MatchMode::CaseInsensitiveContains => {
                let needle = xml_trim(needle).to_lowercase();
                field.to_lowercase().contains(&needle)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::CaseInsensitiveContains => "contains",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(MatchMode::Exact),
            "contains" | "case-insensitive-contains" | "case_insensitive_contains" => {
                Ok(MatchMode::CaseInsensitiveContains)
            }
            other => Err(format!("unknown match mode '{other}' (expected exact or contains)")),
        }
    }
}

/// Attribute -> search value mapping. Entries are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    entries: BTreeMap<AttributeKey, String>,
}

impl Criteria {
    /// Empty criteria, which match every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: AttributeKey, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: AttributeKey, value: impl Into<String>) {
        self.entries.insert(key, value.into());
    }

    /// Insert by canonical key name. Unknown names are ignored and
    /// reported back as `false`.
    pub fn insert_named(&mut self, key: &str, value: impl Into<String>) -> bool {
        match key.parse::<AttributeKey>() {
            Ok(key) => {
                self.insert(key, value);
                true
            }
            Err(_) => {
                tracing::debug!(key, "ignoring unknown criteria key");
                false
            }
        }
    }

    pub fn get(&self, key: AttributeKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut criteria = Criteria::new();
        for (key, value) in iter {
            criteria.insert_named(key.as_ref(), value);
        }
        criteria
    }
}

/// Whether `record` satisfies every entry of `criteria` under `mode`.
pub fn matches(record: &ScientistRecord, criteria: &Criteria, mode: MatchMode) -> bool {
    criteria.iter().all(|(key, value)| match record.field(key) {
        Some(field) => mode.matches_value(field, value),
        None => record.rank_titles().any(|title| mode.matches_value(title, value)),
    })
}
