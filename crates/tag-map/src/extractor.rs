use crate::config::ExtractorConfig;
use crate::error::{Result, TagMapError};
use regex::Regex;
use std::collections::BTreeSet;
use tree_sitter::{Node, Parser};

/// One tagged test method found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTest {
    /// Name of the group (class) that owns the test
    pub group: String,
    /// Name of the test method
    pub test: String,
    /// Tags declared in the test's docstring, never empty
    pub tags: BTreeSet<String>,
}

/// AST-based extractor for per-test tag annotations
///
/// Walks a Python source file for classes whose methods carry the configured
/// test prefix and pulls `:<marker>: tags=...` lines out of their docstrings.
pub struct TagExtractor {
    config: ExtractorConfig,
    parser: Parser,
    tag_line: Regex,
}

impl TagExtractor {
    /// Create a new extractor for the given configuration
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate().map_err(TagMapError::invalid_config)?;

        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| TagMapError::tree_sitter(format!("Failed to set language: {e}")))?;

        // Anchored to one docstring line; the list runs to the end of the line
        let tag_line = Regex::new(&format!(":{}: tags=(.*)", config.marker))
            .map_err(|e| TagMapError::invalid_config(format!("Bad marker pattern: {e}")))?;

        Ok(Self {
            config,
            parser,
            tag_line,
        })
    }

    /// Extract every tagged test method from one source file's contents
    ///
    /// Methods without a marker line produce no entry. A file that does not
    /// parse as valid Python is an error, never a partial result.
    pub fn extract(&mut self, content: &str, file_path: &str) -> Result<Vec<ExtractedTest>> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| TagMapError::parse(format!("Failed to parse {file_path}")))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(TagMapError::parse(format!(
                "Source is not valid Python: {file_path}"
            )));
        }

        let mut tests = Vec::new();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            if child.kind() == "class_definition" {
                self.extract_group_tests(content, child, &mut tests);
            }
        }

        Ok(tests)
    }

    /// Extract tagged test methods from one class body
    fn extract_group_tests(&self, content: &str, class_node: Node, tests: &mut Vec<ExtractedTest>) {
        let Some(group) = Self::name_of(content, class_node) else {
            return;
        };
        let Some(body) = class_node.child_by_field_name("body") else {
            return;
        };

        let mut cursor = body.walk();
        for statement in body.children(&mut cursor) {
            let def = match statement.kind() {
                "function_definition" => statement,
                // Decorators wrap the definition one level down
                "decorated_definition" => {
                    match statement.child_by_field_name("definition") {
                        Some(def) if def.kind() == "function_definition" => def,
                        _ => continue,
                    }
                }
                _ => continue,
            };

            let Some(name) = Self::name_of(content, def) else {
                continue;
            };
            if !name.starts_with(&self.config.test_prefix) {
                continue;
            }

            let Some(docstring) = Self::docstring(content, def) else {
                continue;
            };
            let tags = self.parse_tag_lines(docstring);
            if tags.is_empty() {
                continue;
            }

            tests.push(ExtractedTest {
                group: group.clone(),
                test: name,
                tags,
            });
        }
    }

    /// Collect every marker line in a docstring and split the concatenation
    /// on commas
    ///
    /// Tags may be spread across multiple marker lines; all matched lists are
    /// joined before splitting so the result is one flat set.
    fn parse_tag_lines(&self, docstring: &str) -> BTreeSet<String> {
        let lists: Vec<&str> = self
            .tag_line
            .captures_iter(docstring)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect();

        lists
            .join(",")
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Extract the name identifier of a class or function definition
    fn name_of(content: &str, node: Node) -> Option<String> {
        let name = node.child_by_field_name("name")?;
        Some(content[name.start_byte()..name.end_byte()].to_string())
    }

    /// Extract the docstring of a function definition, if any
    ///
    /// The docstring is a string expression appearing as the first statement
    /// of the function body. The quote delimiters are stripped so that a tag
    /// list ending on the closing line stays clean.
    fn docstring<'a>(content: &'a str, def: Node) -> Option<&'a str> {
        let body = def.child_by_field_name("body")?;
        let first = body.named_child(0)?;
        if first.kind() != "expression_statement" {
            return None;
        }
        let string = first.named_child(0)?;
        if string.kind() != "string" {
            return None;
        }

        let mut start = string.start_byte();
        let mut end = string.end_byte();
        let mut cursor = string.walk();
        for part in string.children(&mut cursor) {
            match part.kind() {
                "string_start" => start = part.end_byte(),
                "string_end" => end = part.start_byte(),
                _ => {}
            }
        }
        Some(content[start..end].trim_matches(|c| c == '"' || c == '\''))
    }
}
