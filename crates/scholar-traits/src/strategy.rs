//! Query strategy abstraction trait

use crate::criteria::{Criteria, MatchMode};
use crate::error::Result;
use crate::record::FilterAttributes;

/// Trait for roster query strategies.
///
/// This trait abstracts over different parsing and querying approaches,
/// allowing them to be used interchangeably. Given the same document and
/// criteria, every implementation must return the same records in document
/// order and the same attribute values.
///
/// Each call parses `document` afresh; implementations keep no state
/// between calls apart from their configuration.
pub trait ScientistQuery {
    /// Display label used when offering strategies to choose from
    fn name(&self) -> &'static str;

    /// Matching policy applied by [`search`](Self::search)
    fn match_mode(&self) -> MatchMode;

    /// Distinct values of the four filterable attributes
    fn filter_attributes(&self, document: &str) -> Result<FilterAttributes>;

    /// Records matching `criteria`, serialized as a `ScientistsResults`
    /// document. Zero matches yields an empty collection element.
    fn search(&self, document: &str, criteria: &Criteria) -> Result<String>;

    /// Every record in the document
    fn search_all(&self, document: &str) -> Result<String> {
        self.search(document, &Criteria::new())
    }
}
