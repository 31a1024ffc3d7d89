use thiserror::Error;

/// Result type for tag-map operations
pub type Result<T> = std::result::Result<T, TagMapError>;

/// Errors that can occur while building or querying a tag map
#[derive(Error, Debug)]
pub enum TagMapError {
    /// Failed to parse a test source file
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A scan input was neither an existing file nor a source file
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid extractor configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl TagMapError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an invalid path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }
}
