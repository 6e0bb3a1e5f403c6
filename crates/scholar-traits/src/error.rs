//! Error types for roster query operations

/// Result type for roster query operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all roster query operations.
///
/// A search that matches nothing is not an error: it yields a result
/// document whose collection element has no children.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input document or template is not well-formed XML
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// Query compilation or evaluation failed
    #[error("Query error: {0}")]
    Query(String),

    /// Writing the result document failed
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Template compilation or application failed
    #[error("Transform error: {0}")]
    Transform(String),
}

impl Error {
    /// Create a new parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a new query error
    pub fn query<S: Into<String>>(msg: S) -> Self {
        Error::Query(msg.into())
    }

    /// Create a new serialization error
    pub fn serialize<S: Into<String>>(msg: S) -> Self {
        Error::Serialize(msg.into())
    }

    /// Create a new transform error
    pub fn transform<S: Into<String>>(msg: S) -> Self {
        Error::Transform(msg.into())
    }

    /// Whether the error came from malformed input rather than the engine
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}
