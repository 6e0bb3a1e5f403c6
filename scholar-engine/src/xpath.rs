//! XPath expression building for the tree engine
//!
//! Criterion values only ever reach an expression through
//! [`string_literal`], never by splicing raw text.

use scholar_traits::{xml_trim, AttributeKey, Criteria, MatchMode, RECORD_ELEMENT};

/// Top-level records: record elements without a record ancestor
pub fn records_path() -> String {
    format!("//{RECORD_ELEMENT}[not(ancestor::{RECORD_ELEMENT})]")
}

/// Quote `value` as an XPath string literal.
///
/// Uses single quotes; an embedded `'` is written as `''`.
pub fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Whitespace-trimmed string value of `expr`
fn trimmed(expr: &str) -> String {
    format!(r"replace(string({expr}), '^\s+|\s+$', '')")
}

/// Builds the record selection for one set of criteria
#[derive(Debug, Clone)]
pub struct RecordQuery<'a> {
    criteria: &'a Criteria,
    mode: MatchMode,
}

impl<'a> RecordQuery<'a> {
    pub fn new(criteria: &'a Criteria, mode: MatchMode) -> Self {
        Self { criteria, mode }
    }

    /// Full selection expression, one predicate per criterion
    pub fn to_xpath(&self) -> String {
        let mut xpath = records_path();
        for (key, value) in self.criteria.iter() {
            xpath.push('[');
            xpath.push_str(&self.predicate(key, value));
            xpath.push(']');
        }
        xpath
    }

    fn predicate(&self, key: AttributeKey, value: &str) -> String {
        match key {
            AttributeKey::Faculty => self.compare("Faculty[1]", value),
            AttributeKey::Department => self.compare("Department[1]", value),
            AttributeKey::DegreeType => self.compare("Degree[1]/@type", value),
            AttributeKey::Rank => format!(".//Rank[{}]", self.compare("@title", value)),
        }
    }

    fn compare(&self, expr: &str, value: &str) -> String {
        let needle = xml_trim(value);
        match self.mode {
            MatchMode::Exact => format!("{} = {}", trimmed(expr), string_literal(needle)),
            MatchMode::CaseInsensitiveContains => format!(
                "contains(lower-case(string({expr})), {})",
                string_literal(&needle.to_lowercase())
            ),
        }
    }
}

