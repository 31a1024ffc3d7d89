use crate::map::{normalize, TagMap, TagSet};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Greedy minimal-tag selection over a built [`TagMap`]
///
/// Computes, per test, the smallest sufficient tag combination in a fixed
/// priority order, then compresses the per-file results. The result is an
/// approximate minimum: the priority order is the contract, not an exact
/// set-cover solution.
pub struct MinimalSetComputer<'a> {
    map: &'a TagMap,
}

impl<'a> MinimalSetComputer<'a> {
    /// Create a computer reading from the given map
    pub fn new(map: &'a TagMap) -> Self {
        Self { map }
    }

    /// Get tag expressions sufficient to select every test under the given
    /// paths
    ///
    /// Each returned string is one comma-joined tag combination (comma means
    /// AND in the runner's filter language); the expressions together are
    /// OR'd. An empty `include_paths` selects every file in the map.
    pub fn minimal_tags(&self, include_paths: &[PathBuf]) -> BTreeSet<String> {
        let include: BTreeSet<PathBuf> = include_paths.iter().map(|p| normalize(p)).collect();
        let combos = frequency_stage_combos();

        let mut minimal_sets: Vec<TagSet> = Vec::new();
        for (file_path, groups) in self.map.mapping_ref() {
            if !include.is_empty() && !include.contains(file_path) {
                continue;
            }

            // Tags still visible when this file is hidden; shared across
            // every test in the file, so computed once
            let visible_elsewhere = self.map.unique_tags(&[file_path.clone()]);

            let mut file_recommended: Vec<TagSet> = Vec::new();
            for (group_name, tests) in groups {
                for (test_name, tags) in tests {
                    file_recommended.push(recommend(
                        group_name,
                        test_name,
                        tags,
                        &visible_elsewhere,
                        &combos,
                    ));
                }
            }
            if file_recommended.is_empty() {
                continue;
            }

            // A common tag across every test collapses the file to one set
            let common = intersect_all(&file_recommended);
            if !common.is_empty() {
                minimal_sets.push(common);
                continue;
            }

            // Otherwise keep the distinct per-test sets, first occurrence wins
            let mut file_unique: Vec<TagSet> = Vec::new();
            for tags in file_recommended {
                if !file_unique.contains(&tags) {
                    file_unique.push(tags);
                }
            }
            minimal_sets.extend(file_unique);
        }

        minimal_sets
            .into_iter()
            .map(|tags| tags.into_iter().collect::<Vec<_>>().join(","))
            .collect()
    }
}

/// Pick one sufficient tag set for a single test
///
/// Priority order, first applicable rule wins:
/// 1. the owning group's name, when the test declares it as a tag
/// 2. the test's own name, when declared as a tag
/// 3. the subset of tags appearing nowhere outside the test's file
/// 4. the first frequency+stage combo fully contained in the tags
/// 5. the full tag set, verbatim
fn recommend(
    group: &str,
    test: &str,
    tags: &TagSet,
    visible_elsewhere: &TagSet,
    combos: &[TagSet],
) -> TagSet {
    if tags.contains(group) {
        return std::iter::once(group.to_string()).collect();
    }
    if tags.contains(test) {
        return std::iter::once(test.to_string()).collect();
    }

    let unique_to_file: TagSet = tags.difference(visible_elsewhere).cloned().collect();
    if !unique_to_file.is_empty() {
        return unique_to_file;
    }

    for combo in combos {
        if combo.is_subset(tags) {
            return combo.clone();
        }
    }

    tags.clone()
}

/// The nine conventional frequency x stage tag combinations, enumerated
/// frequency-outer
fn frequency_stage_combos() -> Vec<TagSet> {
    let frequencies: [&[&str]; 3] = [&["pr"], &["daily_regression"], &["full_regression"]];
    let stages: [&[&str]; 3] = [&["vm"], &["hw", "medium"], &["hw", "large"]];

    let mut combos = Vec::with_capacity(frequencies.len() * stages.len());
    for frequency in &frequencies {
        for stage in &stages {
            combos.push(
                frequency
                    .iter()
                    .chain(stage.iter())
                    .map(|tag| tag.to_string())
                    .collect(),
            );
        }
    }
    combos
}

/// Intersect a non-empty list of tag sets
fn intersect_all(sets: &[TagSet]) -> TagSet {
    let mut iter = sets.iter();
    let Some(first) = iter.next() else {
        return TagSet::new();
    };
    iter.fold(first.clone(), |common, tags| {
        common.intersection(tags).cloned().collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn build_map(sources: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>, TagMap) {
        let dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = sources
            .iter()
            .map(|(name, content)| write_source(dir.path(), name, content))
            .collect();
        let map = TagMap::from_paths(ExtractorConfig::default(), &paths).unwrap();
        (dir, paths, map)
    }

    fn expressions(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_group_name_tag_wins_over_everything() {
        let (_dir, _paths, map) = build_map(&[(
            "group.py",
            r#"
class GroupA:
    def test_one(self):
        """:avocado: tags=GroupA,test_one,extra,pr,vm"""
        pass
"#,
        )]);

        let result = MinimalSetComputer::new(&map).minimal_tags(&[]);
        assert_eq!(result, expressions(&["GroupA"]));
    }

    #[test]
    fn test_test_name_tag_wins_when_group_absent() {
        let (_dir, _paths, map) = build_map(&[(
            "named.py",
            r#"
class GroupB:
    def test_named(self):
        """:avocado: tags=test_named,pr,vm"""
        pass
"#,
        )]);

        let result = MinimalSetComputer::new(&map).minimal_tags(&[]);
        assert_eq!(result, expressions(&["test_named"]));
    }

    #[test]
    fn test_globally_unique_subset_disambiguates() {
        let (_dir, _paths, map) = build_map(&[
            (
                "x.py",
                r#"
class XGroup:
    def test_x(self):
        """:avocado: tags=alpha,common"""
        pass
"#,
            ),
            (
                "y.py",
                r#"
class YGroup:
    def test_y(self):
        """:avocado: tags=beta,common"""
        pass
"#,
            ),
        ]);

        let result = MinimalSetComputer::new(&map).minimal_tags(&[]);
        assert_eq!(result, expressions(&["alpha", "beta"]));
    }

    #[test]
    fn test_frequency_stage_combo_beats_full_set() {
        // Both files declare the same tags, so nothing is unique to either
        // file and the pr+vm combo is the first sufficient signal
        let source = r#"
class {group}:
    def test_{name}(self):
        """:avocado: tags=pr,vm,other"""
        pass
"#;
        let one = source.replace("{group}", "One").replace("{name}", "one");
        let two = source.replace("{group}", "Two").replace("{name}", "two");
        let (_dir, _paths, map) =
            build_map(&[("one.py", one.as_str()), ("two.py", two.as_str())]);

        let result = MinimalSetComputer::new(&map).minimal_tags(&[]);
        assert_eq!(result, expressions(&["pr,vm"]));
    }

    #[test]
    fn test_full_tag_set_is_the_last_resort() {
        let source = r#"
class {group}:
    def test_{name}(self):
        """:avocado: tags=random1,random2"""
        pass
"#;
        let one = source.replace("{group}", "One").replace("{name}", "one");
        let two = source.replace("{group}", "Two").replace("{name}", "two");
        let (_dir, _paths, map) =
            build_map(&[("one.py", one.as_str()), ("two.py", two.as_str())]);

        let result = MinimalSetComputer::new(&map).minimal_tags(&[]);
        assert_eq!(result, expressions(&["random1,random2"]));
    }

    #[test]
    fn test_file_collapses_to_shared_intersection() {
        let (_dir, _paths, map) = build_map(&[(
            "shared.py",
            r#"
class SharedGroup:
    def test_one(self):
        """:avocado: tags=shared,x"""
        pass

    def test_two(self):
        """:avocado: tags=shared,y"""
        pass
"#,
        )]);

        let result = MinimalSetComputer::new(&map).minimal_tags(&[]);
        assert_eq!(result, expressions(&["shared"]));
    }

    #[test]
    fn test_disjoint_recommendations_stay_distinct() {
        let (_dir, _paths, map) = build_map(&[(
            "disjoint.py",
            r#"
class DisjointGroup:
    def test_one(self):
        """:avocado: tags=DisjointGroup1,only_one"""
        pass

    def test_two(self):
        """:avocado: tags=DisjointGroup2,only_two"""
        pass
"#,
        )]);

        let result = MinimalSetComputer::new(&map).minimal_tags(&[]);
        assert_eq!(
            result,
            expressions(&["DisjointGroup1,only_one", "DisjointGroup2,only_two"])
        );
    }

    #[test]
    fn test_include_paths_filter_files() {
        let (_dir, paths, map) = build_map(&[
            (
                "first.py",
                r#"
class First:
    def test_first(self):
        """:avocado: tags=First,extra"""
        pass
"#,
            ),
            (
                "second.py",
                r#"
class Second:
    def test_second(self):
        """:avocado: tags=Second,extra"""
        pass
"#,
            ),
        ]);

        let computer = MinimalSetComputer::new(&map);
        assert_eq!(
            computer.minimal_tags(&[paths[0].clone()]),
            expressions(&["First"])
        );
        // Paths outside the map contribute nothing
        assert_eq!(
            computer.minimal_tags(&[PathBuf::from("/no/such/file.py")]),
            BTreeSet::new()
        );
    }

    #[test]
    fn test_combo_enumeration_prefers_frequency_order() {
        // pr+vm and daily_regression+vm are both subsets; pr comes first
        let source = r#"
class {group}:
    def test_{name}(self):
        """:avocado: tags=pr,daily_regression,vm"""
        pass
"#;
        let one = source.replace("{group}", "One").replace("{name}", "one");
        let two = source.replace("{group}", "Two").replace("{name}", "two");
        let (_dir, _paths, map) =
            build_map(&[("one.py", one.as_str()), ("two.py", two.as_str())]);

        let result = MinimalSetComputer::new(&map).minimal_tags(&[]);
        assert_eq!(result, expressions(&["pr,vm"]));
    }
}
