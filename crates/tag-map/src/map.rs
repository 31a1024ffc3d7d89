use crate::config::ExtractorConfig;
use crate::error::{Result, TagMapError};
use crate::extractor::TagExtractor;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Set of tags attached to one test
pub type TagSet = BTreeSet<String>;

/// Nested mapping of file -> group -> test -> tags
pub type Mapping = BTreeMap<PathBuf, BTreeMap<String, BTreeMap<String, TagSet>>>;

/// Normalize a path to a canonical absolute form
///
/// Falls back to plain absolutization for paths that no longer exist on disk
/// (e.g. files deleted in the change under inspection).
pub(crate) fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// In-memory mapping of test files to per-test tag sets
///
/// Owns all extracted tag data for one scan session. Grows only through
/// [`TagMap::update_from_paths`]; re-scanning a file merges additively into
/// the existing sets instead of overwriting them.
pub struct TagMap {
    mapping: Mapping,
    extractor: TagExtractor,
}

impl TagMap {
    /// Create an empty tag map
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Ok(Self {
            mapping: Mapping::new(),
            extractor: TagExtractor::new(config)?,
        })
    }

    /// Create a tag map populated from an initial set of paths
    pub fn from_paths(config: ExtractorConfig, paths: &[PathBuf]) -> Result<Self> {
        let mut map = Self::new(config)?;
        map.update_from_paths(paths)?;
        Ok(map)
    }

    /// Scan the given files and merge their tag annotations into the map
    ///
    /// Paths are canonicalized and deduplicated first. A path that is not an
    /// existing file aborts the whole update: a partially built map would
    /// produce an under-selecting recommendation downstream. Existing files
    /// that are not Python sources are filtered out.
    pub fn update_from_paths(&mut self, paths: &[PathBuf]) -> Result<()> {
        let mut sources = BTreeSet::new();
        for path in paths {
            let path = normalize(path);
            if !path.is_file() {
                return Err(TagMapError::invalid_path(format!(
                    "Expected an existing file: {}",
                    path.display()
                )));
            }
            if path.extension().and_then(|ext| ext.to_str()) == Some("py") {
                sources.insert(path);
            } else {
                log::debug!("Skipping non-Python file {}", path.display());
            }
        }

        for path in sources {
            let content = fs::read_to_string(&path)?;
            let tests = self
                .extractor
                .extract(&content, &path.to_string_lossy())?;
            for test in tests {
                self.insert(path.clone(), &test.group, &test.test, test.tags);
            }
        }

        Ok(())
    }

    /// Get a structural copy of the mapping
    pub fn mapping(&self) -> Mapping {
        self.mapping.clone()
    }

    /// Borrow the mapping for in-crate queries
    pub(crate) fn mapping_ref(&self) -> &Mapping {
        &self.mapping
    }

    /// Get the union of all tags, excluding those belonging to the given files
    ///
    /// Used as a probe: hiding a file reveals which of its tags stop
    /// appearing anywhere else.
    pub fn unique_tags(&self, exclude: &[PathBuf]) -> TagSet {
        let excluded: BTreeSet<PathBuf> = exclude.iter().map(|p| normalize(p)).collect();

        let mut tags = TagSet::new();
        for (file_path, groups) in &self.mapping {
            if excluded.contains(file_path) {
                continue;
            }
            for tests in groups.values() {
                for test_tags in tests.values() {
                    tags.extend(test_tags.iter().cloned());
                }
            }
        }
        tags
    }

    /// Merge one test's tags into the mapping
    ///
    /// Invariant: entries with an empty tag set are never materialized.
    fn insert(&mut self, file: PathBuf, group: &str, test: &str, tags: TagSet) {
        if tags.is_empty() {
            return;
        }
        self.mapping
            .entry(file)
            .or_default()
            .entry(group.to_string())
            .or_default()
            .entry(test.to_string())
            .or_default()
            .extend(tags);
    }
}
