//! scholar-engine: interchangeable query engines for scientist rosters
//!
//! Three strategies answer the same two questions about a roster document
//! (which filter values exist, which records match) and are expected to
//! agree exactly:
//!
//! - [`StreamingEngine`]: forward-only token stream (quick-xml)
//! - [`TreeEngine`]: in-memory tree queried with XPath (xee)
//! - [`DeclarativeEngine`]: iterator pipelines over a tree (xot)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use scholar_engine::{Backend, ScholarEngine};
//! use scholar_traits::{AttributeKey, Criteria, MatchMode, ScientistQuery};
//!
//! let engine = ScholarEngine::with_backend(Backend::Tree, MatchMode::Exact);
//! let criteria = Criteria::new().with(AttributeKey::Rank, "Professor");
//! let results = engine.search(&xml, &criteria)?;
//! println!("{}", TemplateTransform::render_default(&results));
//! ```

pub mod engine_declarative;
pub mod engine_stream;
pub mod engine_tree;
pub mod serializer;
pub mod xpath;

pub mod reporter;
pub mod transform;
pub mod unified;

pub use engine_declarative::DeclarativeEngine;
pub use engine_stream::{extract_records, StreamingEngine};
pub use engine_tree::TreeEngine;
pub use serializer::{serialize, ResultWriter};
pub use transform::{TemplateTransform, DEFAULT_TEMPLATE};

// Re-export unified API
pub use reporter::{ConsistencyReport, StrategyOutcome};
pub use unified::{Backend, ScholarEngine};
