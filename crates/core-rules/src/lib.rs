//! # Tagscope Core Rules
//!
//! Path-pattern tag rules for changed files outside the tagged-test tree.
//!
//! Test sources carry their own tag annotations and are selected through the
//! tag map; everything else (server code, build files, docs) maps to tags
//! through an externally maintained rule file:
//!
//! ```text
//! default = "smoke"
//!
//! [per_path]
//! "src/control/.*" = "control"
//! "src/pool/"      = "pool daily_regression"
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::path::PathBuf;
//! use tagscope_core_rules::CoreRules;
//!
//! let rules = CoreRules::from_toml_str(
//!     "default = \"smoke\"\n[per_path]\n\"src/pool/\" = \"pool\"\n",
//!     "src/tests/ftest",
//! )
//! .unwrap();
//!
//! let tags = rules.recommended_tags(&[PathBuf::from("src/pool/srv_pool.c")]);
//! assert!(tags.contains("pool"));
//! ```

mod error;
mod rules;

pub use error::{CoreRulesError, Result};
pub use rules::{CoreRules, TagSet};
