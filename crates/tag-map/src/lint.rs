use crate::map::TagMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Category axis every test must declare at least one tag from
const REQUIRED_CATEGORY_TAGS: [&str; 3] = ["vm", "hw", "manual"];

/// Itemized result of the suite-wide tagging lint
///
/// Linting only counts and reports; it never changes selection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    /// Number of test files inspected
    pub files: usize,
    /// Group names owned by more than one file
    pub non_unique_groups: Vec<String>,
    /// Test names declared more than once across the suite
    pub non_unique_tests: Vec<String>,
    /// Tests that do not declare their owning group's name as a tag
    pub tests_missing_group_tag: Vec<String>,
    /// Tests that do not declare their own name as a tag
    pub tests_missing_self_tag: Vec<String>,
    /// Tests that declare none of the required category tags
    pub tests_missing_category_tag: Vec<String>,
}

impl LintReport {
    /// Whether the suite passes the lint
    pub fn passed(&self) -> bool {
        self.non_unique_groups.is_empty()
            && self.non_unique_tests.is_empty()
            && self.tests_missing_group_tag.is_empty()
            && self.tests_missing_self_tag.is_empty()
            && self.tests_missing_category_tag.is_empty()
    }

    /// Render the itemized counts as human-readable text
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "suite overview");
        let _ = writeln!(out, "  {} test files", self.files);
        let _ = writeln!(out);

        let sections: [(&str, &Vec<String>); 5] = [
            ("non-unique groups", &self.non_unique_groups),
            ("non-unique tests", &self.non_unique_tests),
            ("tests w/o group as tag", &self.tests_missing_group_tag),
            ("tests w/o name as tag", &self.tests_missing_self_tag),
            (
                "tests w/o a vm|hw|manual tag",
                &self.tests_missing_category_tag,
            ),
        ];
        for (label, entries) in sections {
            let _ = writeln!(out, "  {} {}: {:?}", entries.len(), label, entries);
            let _ = writeln!(out);
        }
        out
    }
}

/// Check suite-wide tagging conventions over a built map
pub fn lint(map: &TagMap) -> LintReport {
    let mut report = LintReport::default();
    let mut group_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut test_counts: BTreeMap<&str, usize> = BTreeMap::new();

    for groups in map.mapping_ref().values() {
        report.files += 1;
        for (group_name, tests) in groups {
            *group_counts.entry(group_name).or_default() += 1;
            for (test_name, tags) in tests {
                *test_counts.entry(test_name).or_default() += 1;
                if !tags.contains(group_name) {
                    report.tests_missing_group_tag.push(test_name.clone());
                }
                if !tags.contains(test_name) {
                    report.tests_missing_self_tag.push(test_name.clone());
                }
                if !REQUIRED_CATEGORY_TAGS.iter().any(|tag| tags.contains(*tag)) {
                    report.tests_missing_category_tag.push(test_name.clone());
                }
            }
        }
    }

    report.non_unique_groups = names_seen_twice(&group_counts);
    report.non_unique_tests = names_seen_twice(&test_counts);
    report
}

fn names_seen_twice(counts: &BTreeMap<&str, usize>) -> Vec<String> {
    counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(name, _)| name.to_string())
        .collect()
}
