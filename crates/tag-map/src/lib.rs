//! # Tagscope Tag Map
//!
//! Tag extraction and minimal-set selection for parameterized test suites.
//!
//! ## Pipeline
//!
//! ```text
//! Test sources (.py)
//!     │
//!     ├──> TagExtractor (tree-sitter AST)
//!     │      └─> (group, test, tags) per docstring marker line
//!     │
//!     ├──> TagMap (file -> group -> test -> tags)
//!     │      ├─> unique_tags(exclude) probe
//!     │      └─> lint (suite-wide convention checks)
//!     │
//!     └──> MinimalSetComputer
//!            └─> comma-joined tag expressions for the runner's filter
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tagscope_tag_map::{ExtractorConfig, TagExtractor};
//!
//! let code = r#"
//! class HarnessBasic:
//!     def test_smoke(self):
//!         """Run the smoke check.
//!
//!         :avocado: tags=HarnessBasic,test_smoke,vm
//!         """
//!         pass
//! "#;
//!
//! let mut extractor = TagExtractor::new(ExtractorConfig::default()).unwrap();
//! let tests = extractor.extract(code, "harness_basic.py").unwrap();
//! assert_eq!(tests.len(), 1);
//! assert!(tests[0].tags.contains("vm"));
//! ```

mod config;
mod error;
mod extractor;
mod lint;
mod map;
mod minimal;

pub use config::ExtractorConfig;
pub use error::{Result, TagMapError};
pub use extractor::{ExtractedTest, TagExtractor};
pub use lint::{lint, LintReport};
pub use map::{Mapping, TagMap, TagSet};
pub use minimal::MinimalSetComputer;
