//! Substitution rules and file matching for headerkit.
//!
//! This module handles:
//! - Expanding root-relative glob patterns into file matches
//! - Literal line-by-line substitution and the prepend step
//! - Selecting the rules enabled by the gate

pub mod matcher;
pub mod rewriter;

pub use matcher::{
	FileMatch, active_rules, compile_prepend, compile_rules, expand_pattern, validate_pattern,
};
pub use rewriter::{PrependRule, SubstitutionRule};
