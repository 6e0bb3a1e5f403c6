//! Tree engine
//!
//! Loads the whole document into an in-memory tree and answers both
//! operations with XPath 3.1 expressions evaluated by xee.
//!
//! Matching records are serialized back from the tree unchanged.

use xee_xpath::{Atomic, Documents, Item, Queries, Query};

use scholar_traits::{
    AttributeCollector, AttributeKey, Criteria, Error, FilterAttributes, MatchMode, Result,
    ScientistQuery, DEFAULT_MATCH_MODE,
};

use crate::serializer::ResultWriter;
use crate::xpath::RecordQuery;

/// Enumeration query per attribute
const ATTRIBUTE_QUERIES: [(AttributeKey, &str); 4] = [
    (AttributeKey::Faculty, "//Faculty/string()"),
    (AttributeKey::Department, "//Department/string()"),
    (AttributeKey::DegreeType, "//Degree/@type/string()"),
    (AttributeKey::Rank, "//Rank/@title/string()"),
];

/// xee-backed tree engine
#[derive(Debug, Clone, Copy)]
pub struct TreeEngine {
    mode: MatchMode,
}

impl Default for TreeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeEngine {
    pub fn new() -> Self {
        Self::with_mode(DEFAULT_MATCH_MODE)
    }

    pub fn with_mode(mode: MatchMode) -> Self {
        Self { mode }
    }
}

fn query_error<E: std::fmt::Debug>(e: E) -> Error {
    Error::query(format!("{:?}", e))
}

fn atomic_to_string(atomic: &Atomic) -> String {
    match atomic {
        Atomic::String(_, s) => s.to_string(),
        Atomic::Untyped(s) => s.to_string(),
        _ => format!("{:?}", atomic),
    }
}

impl ScientistQuery for TreeEngine {
    fn name(&self) -> &'static str {
        "Tree (XPath)"
    }

    fn match_mode(&self) -> MatchMode {
        self.mode
    }

    fn filter_attributes(&self, document: &str) -> Result<FilterAttributes> {
        let mut documents = Documents::new();
        let handle = documents
            .add_string_without_uri(document)
            .map_err(|e| Error::parse(format!("{:?}", e)))?;
        let queries = Queries::default();
        let mut collector = AttributeCollector::new();

        for (key, xpath) in ATTRIBUTE_QUERIES {
            let query = queries.sequence(xpath).map_err(query_error)?;
            let sequence = query.execute(&mut documents, handle).map_err(query_error)?;
            for item in sequence.iter() {
                if let Item::Atomic(atomic) = item {
                    collector.insert(key, &atomic_to_string(&atomic));
                }
            }
        }

        let attributes = collector.finish();
        tracing::debug!(
            strategy = self.name(),
            values = attributes.len(),
            "collected filter attributes"
        );
        Ok(attributes)
    }

    fn search(&self, document: &str, criteria: &Criteria) -> Result<String> {
        let mut documents = Documents::new();
        let handle = documents
            .add_string_without_uri(document)
            .map_err(|e| Error::parse(format!("{:?}", e)))?;
        let xpath = RecordQuery::new(criteria, self.mode).to_xpath();
        tracing::debug!(strategy = self.name(), %xpath, "evaluating record query");

        let queries = Queries::default();
        let query = queries.sequence(&xpath).map_err(query_error)?;
        let sequence = query.execute(&mut documents, handle).map_err(query_error)?;
        let mut writer = ResultWriter::new();
        for item in sequence.iter() {
            match item {
                Item::Node(node) => {
                    let xml = documents
                        .xot()
                        .to_string(node)
                        .map_err(|e| Error::serialize(e.to_string()))?;
                    writer.write_raw(&xml)?;
                }
                other => {
                    return Err(Error::query(format!(
                        "record query returned a non-node item: {:?}",
                        other
                    )))
                }
            }
        }

        tracing::debug!(strategy = self.name(), matched = writer.len(), "search complete");
        writer.finish()
    }
}
