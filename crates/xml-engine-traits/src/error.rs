//! Error types for collaborator engines

/// Result type for collaborator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for loaders, validators and transform engines
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source document could not be turned into a tree
    #[error("Document load error: {0}")]
    Load(String),

    /// Schema or content model could not be used
    #[error("Schema error: {0}")]
    Schema(String),

    /// Stylesheet compilation failed
    #[error("Transform compilation error: {0}")]
    TransformCompile(String),

    /// Transformation failed
    #[error("Transformation error: {0}")]
    Transform(String),

    /// The underlying tree rejected an operation
    #[error("Tree error: {0}")]
    Tree(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new document load error
    pub fn load<S: Into<String>>(msg: S) -> Self {
        Error::Load(msg.into())
    }

    /// Create a new schema error
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        Error::Schema(msg.into())
    }

    /// Create a new stylesheet compilation error
    pub fn transform_compile<S: Into<String>>(msg: S) -> Self {
        Error::TransformCompile(msg.into())
    }

    /// Create a new transformation error
    pub fn transform<S: Into<String>>(msg: S) -> Self {
        Error::Transform(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_pick_matching_variant() {
        assert!(matches!(Error::load("x"), Error::Load(m) if m == "x"));
        assert!(matches!(Error::transform_compile("y"), Error::TransformCompile(_)));
        assert_eq!(
            Error::schema("missing model").to_string(),
            "Schema error: missing model"
        );
    }

    #[test]
    fn json_errors_convert() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
