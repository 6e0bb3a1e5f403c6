//! Scientist record model and the filterable attribute index

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Element name of a record in the input document
pub const RECORD_ELEMENT: &str = "Scientist";

/// Element name of the collection wrapping a result set
pub const RESULTS_ELEMENT: &str = "ScientistsResults";

/// One entry of a scientist's rank history
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rank {
    pub title: String,
    pub date: String,
}

impl Rank {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
        }
    }
}

/// A single scientist entry.
///
/// Every field defaults to the empty string when the document omits it;
/// `ranks` keeps document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScientistRecord {
    pub id: String,
    pub full_name: String,
    pub faculty: String,
    pub department: String,
    pub degree_type: String,
    pub degree_value: String,
    pub ranks: Vec<Rank>,
}

impl ScientistRecord {
    /// Resolve the single-valued field a criteria key refers to.
    ///
    /// Returns `None` for [`AttributeKey::Rank`], which is multi-valued.
    pub fn field(&self, key: AttributeKey) -> Option<&str> {
        match key {
            AttributeKey::Faculty => Some(&self.faculty),
            AttributeKey::Department => Some(&self.department),
            AttributeKey::DegreeType => Some(&self.degree_type),
            AttributeKey::Rank => None,
        }
    }

    /// Iterate the rank titles in document order
    pub fn rank_titles(&self) -> impl Iterator<Item = &str> {
        self.ranks.iter().map(|r| r.title.as_str())
    }
}

/// The four filterable attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttributeKey {
    Faculty,
    Department,
    DegreeType,
    Rank,
}

impl AttributeKey {
    pub const ALL: [AttributeKey; 4] = [
        AttributeKey::Faculty,
        AttributeKey::Department,
        AttributeKey::DegreeType,
        AttributeKey::Rank,
    ];

    /// Canonical key name as used in criteria mappings
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKey::Faculty => "Faculty",
            AttributeKey::Department => "Department",
            AttributeKey::DegreeType => "DegreeType",
            AttributeKey::Rank => "Rank",
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown attribute key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attribute key: {0}")]
pub struct UnknownAttributeKey(pub String);

impl FromStr for AttributeKey {
    type Err = UnknownAttributeKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributeKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownAttributeKey(s.to_string()))
    }
}

/// Trim XML whitespace (space, tab, CR, LF) from both ends.
///
/// Used instead of `str::trim` so that every strategy agrees with the
/// XPath `\s` class on what counts as whitespace.
pub fn xml_trim(s: &str) -> &str {
    s.trim_matches(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

/// Distinct values of every filterable attribute in one document.
///
/// All four keys are always present; each list is strictly ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "BTreeMap<String, Vec<String>>")]
pub struct FilterAttributes {
    values: BTreeMap<AttributeKey, Vec<String>>,
}

impl FilterAttributes {
    /// Sorted distinct values for one attribute
    pub fn get(&self, key: AttributeKey) -> &[String] {
        self.values.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mapping keyed by canonical names, as handed to a front-end
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        self.values
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.clone()))
            .collect()
    }

    /// Total number of distinct values across all keys
    pub fn len(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<FilterAttributes> for BTreeMap<String, Vec<String>> {
    fn from(attrs: FilterAttributes) -> Self {
        attrs.to_map()
    }
}

/// Accumulates attribute values while a strategy walks a document
#[derive(Debug, Default)]
pub struct AttributeCollector {
    sets: BTreeMap<AttributeKey, BTreeSet<String>>,
}

impl AttributeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observed value. Surrounding whitespace is trimmed and
    /// values that end up empty are skipped.
    pub fn insert(&mut self, key: AttributeKey, value: &str) {
        let value = xml_trim(value);
        if value.is_empty() {
            return;
        }
        self.sets.entry(key).or_default().insert(value.to_string());
    }

    pub fn finish(mut self) -> FilterAttributes {
        let values = AttributeKey::ALL
            .into_iter()
            .map(|key| {
                let set = self.sets.remove(&key).unwrap_or_default();
                (key, set.into_iter().collect())
            })
            .collect();
        FilterAttributes { values }
    }
}
