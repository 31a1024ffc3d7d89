use serde::{Deserialize, Serialize};

/// Configuration for extracting tag annotations from test sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Marker token looked for in docstrings (`:<marker>: tags=<tag1>,<tag2>,...`)
    pub marker: String,

    /// Name prefix that identifies test methods inside a group
    pub test_prefix: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            marker: "avocado".to_string(),
            test_prefix: "test_".to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.marker.is_empty() {
            return Err("marker must not be empty".to_string());
        }

        // The marker is interpolated into the tag-line pattern
        if !self
            .marker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(format!(
                "marker must contain only alphanumerics, '_' or '-': {}",
                self.marker
            ));
        }

        if self.test_prefix.is_empty() {
            return Err("test_prefix must not be empty".to_string());
        }

        Ok(())
    }
}
