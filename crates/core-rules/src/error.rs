use thiserror::Error;

/// Result type for core-rule operations
pub type Result<T> = std::result::Result<T, CoreRulesError>;

/// Errors that can occur while loading or applying the core rule table
#[derive(Error, Debug)]
pub enum CoreRulesError {
    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The rule file is missing required content or is not valid TOML
    #[error("Invalid rule file: {0}")]
    InvalidRuleFile(String),

    /// A per-path pattern is not a valid regular expression
    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

impl CoreRulesError {
    /// Create an invalid rule file error
    pub fn invalid_rule_file(msg: impl Into<String>) -> Self {
        Self::InvalidRuleFile(msg.into())
    }
}
