use crate::error::{CoreRulesError, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Set of tags produced by rule resolution
pub type TagSet = BTreeSet<String>;

/// Raw shape of the rule file before compilation
#[derive(Debug, Deserialize)]
struct RawRuleFile {
    /// Space-separated tags applied when no pattern matches a path
    default: String,

    /// Ordered mapping of path regex -> space-separated tags
    #[serde(default)]
    per_path: toml::Table,
}

/// One compiled path rule
#[derive(Debug)]
struct PathRule {
    pattern: Regex,
    tags: TagSet,
}

/// Ordered regex -> tags rules for changed files outside the tagged-test tree
///
/// Loaded once from a TOML rule file; read-only afterwards. Patterns use
/// substring-search semantics against the changed path, and every matching
/// rule contributes its tags. Paths under the tagged-test tree are skipped
/// entirely so they are never double-counted against the tag-map selection.
pub struct CoreRules {
    default: TagSet,
    rules: Vec<PathRule>,
    exclude_marker: String,
}

impl CoreRules {
    /// Load and compile a rule file
    ///
    /// `exclude_marker` identifies the tagged-test tree: any changed path
    /// containing it is ignored by [`CoreRules::recommended_tags`].
    pub fn load(path: &Path, exclude_marker: &str) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text, exclude_marker)
    }

    /// Compile a rule table from TOML text
    pub fn from_toml_str(text: &str, exclude_marker: &str) -> Result<Self> {
        let raw: RawRuleFile =
            toml::from_str(text).map_err(|e| CoreRulesError::invalid_rule_file(e.to_string()))?;

        let default = split_tags(&raw.default);
        if default.is_empty() {
            return Err(CoreRulesError::invalid_rule_file(
                "`default` must name at least one tag",
            ));
        }

        let mut rules = Vec::with_capacity(raw.per_path.len());
        for (pattern, value) in &raw.per_path {
            let tags = value.as_str().ok_or_else(|| {
                CoreRulesError::invalid_rule_file(format!(
                    "per_path entry `{pattern}` must be a string of tags"
                ))
            })?;
            let regex = Regex::new(pattern).map_err(|source| CoreRulesError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            rules.push(PathRule {
                pattern: regex,
                tags: split_tags(tags),
            });
        }

        Ok(Self {
            default,
            rules,
            exclude_marker: exclude_marker.to_string(),
        })
    }

    /// Get the union of tags recommended for the given changed paths
    ///
    /// Each path takes the union of every matching rule's tags, or the
    /// default set when nothing matches; the result accumulates across paths.
    pub fn recommended_tags(&self, paths: &[PathBuf]) -> TagSet {
        let mut recommended = TagSet::new();
        for path in paths {
            let path_str = path.to_string_lossy();
            if path_str.contains(&self.exclude_marker) {
                log::debug!("Skipping tagged-test path {}", path.display());
                continue;
            }

            let mut matched = TagSet::new();
            for rule in &self.rules {
                if rule.pattern.is_match(&path_str) {
                    matched.extend(rule.tags.iter().cloned());
                }
            }
            if matched.is_empty() {
                recommended.extend(self.default.iter().cloned());
            } else {
                recommended.extend(matched);
            }
        }
        recommended
    }
}

/// Split a space-separated tag string into a set
fn split_tags(value: &str) -> TagSet {
    value.split_whitespace().map(str::to_string).collect()
}
