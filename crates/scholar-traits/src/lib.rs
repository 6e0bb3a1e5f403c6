//! Core model and trait abstractions for scientist roster queries.
//!
//! This crate defines the record model, the criteria matcher and the
//! strategy trait that every query engine implements.

pub mod criteria;
pub mod error;
pub mod record;
pub mod strategy;

pub use criteria::{matches, Criteria, MatchMode, DEFAULT_MATCH_MODE};
pub use error::{Error, Result};
pub use record::{
    xml_trim, AttributeCollector, AttributeKey, FilterAttributes, Rank, ScientistRecord,
    UnknownAttributeKey, RECORD_ELEMENT, RESULTS_ELEMENT,
};
pub use strategy::ScientistQuery;
