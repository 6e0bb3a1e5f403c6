//! Unified engine wrapper with runtime backend selection
//!
//! Provides a single `ScholarEngine` type that can use any strategy
//! (streaming, tree, declarative) with the same API, selectable at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use scholar_traits::{Criteria, FilterAttributes, MatchMode, Result, ScientistQuery};

use crate::engine_declarative::DeclarativeEngine;
use crate::engine_stream::StreamingEngine;
use crate::engine_tree::TreeEngine;

/// Backend strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Forward-only token stream (quick-xml)
    #[default]
    #[serde(alias = "sax")]
    Streaming,
    /// In-memory tree with XPath 3.1 (xee)
    #[serde(alias = "dom")]
    Tree,
    /// Iterator pipelines over an in-memory tree (xot)
    #[serde(alias = "linq")]
    Declarative,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Streaming, Backend::Tree, Backend::Declarative];

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Streaming => "streaming",
            Backend::Tree => "tree",
            Backend::Declarative => "declarative",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "streaming" | "sax" => Ok(Backend::Streaming),
            "tree" | "dom" => Ok(Backend::Tree),
            "declarative" | "linq" => Ok(Backend::Declarative),
            other => Err(format!(
                "unknown strategy '{other}' (expected streaming, tree or declarative)"
            )),
        }
    }
}

/// Scientist query engine with runtime backend selection
#[derive(Debug, Clone, Copy)]
pub enum ScholarEngine {
    Streaming(StreamingEngine),
    Tree(TreeEngine),
    Declarative(DeclarativeEngine),
}

impl ScholarEngine {
    /// Create a new engine with the streaming backend
    pub fn streaming(mode: MatchMode) -> Self {
        Self::Streaming(StreamingEngine::with_mode(mode))
    }

    /// Create a new engine with the tree backend
    pub fn tree(mode: MatchMode) -> Self {
        Self::Tree(TreeEngine::with_mode(mode))
    }

    /// Create a new engine with the declarative backend
    pub fn declarative(mode: MatchMode) -> Self {
        Self::Declarative(DeclarativeEngine::with_mode(mode))
    }

    /// Create a new engine with the specified backend
    pub fn with_backend(backend: Backend, mode: MatchMode) -> Self {
        match backend {
            Backend::Streaming => Self::streaming(mode),
            Backend::Tree => Self::tree(mode),
            Backend::Declarative => Self::declarative(mode),
        }
    }

    /// One engine per backend, all sharing `mode`
    pub fn all(mode: MatchMode) -> Vec<Self> {
        Backend::ALL
            .into_iter()
            .map(|backend| Self::with_backend(backend, mode))
            .collect()
    }

    /// Get the current backend
    pub fn backend(&self) -> Backend {
        match self {
            Self::Streaming(_) => Backend::Streaming,
            Self::Tree(_) => Backend::Tree,
            Self::Declarative(_) => Backend::Declarative,
        }
    }

    fn inner(&self) -> &dyn ScientistQuery {
        match self {
            Self::Streaming(e) => e,
            Self::Tree(e) => e,
            Self::Declarative(e) => e,
        }
    }
}

impl ScientistQuery for ScholarEngine {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn match_mode(&self) -> MatchMode {
        self.inner().match_mode()
    }

    fn filter_attributes(&self, document: &str) -> Result<FilterAttributes> {
        self.inner().filter_attributes(document)
    }

    fn search(&self, document: &str, criteria: &Criteria) -> Result<String> {
        self.inner().search(document, criteria)
    }
}

impl Default for ScholarEngine {
    /// Default to the streaming backend
    fn default() -> Self {
        Self::with_backend(Backend::default(), MatchMode::default())
    }
}
