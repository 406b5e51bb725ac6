use crate::config::types::Config;
use crate::error::{HeaderkitError, Result};
use crate::rules::rewriter::{PrependRule, SubstitutionRule};
use std::io;
use std::path::{Path, PathBuf};

/// A file selected by one glob pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatch {
	/// Path of the matched file (root joined with the glob result).
	pub path: PathBuf,

	/// The pattern string that selected it, as written in the config.
	pub pattern: String,
}

/// Compile a pattern rooted at `root`, escaping any glob syntax in the root itself.
fn rooted_pattern(root: &Path, pattern: &str) -> String {
	let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
	Path::new(&escaped_root)
		.join(pattern)
		.to_string_lossy()
		.into_owned()
}

/// Check that a pattern is well-formed without touching the filesystem.
pub fn validate_pattern(pattern: &str) -> Result<()> {
	glob::Pattern::new(pattern)
		.map(|_| ())
		.map_err(|source| HeaderkitError::InvalidPattern {
			pattern: pattern.to_string(),
			source,
		})
}

/// List the regular files currently matching `pattern` under `root`, sorted.
///
/// `**` matches any number of directories. Wildcards never match a leading
/// `.`, so hidden files and directories are skipped unless the pattern names
/// them. A path that vanishes while the glob is being walked surfaces as an
/// error.
pub fn expand_pattern(root: &Path, pattern: &str) -> Result<Vec<FileMatch>> {
	let full_pattern = rooted_pattern(root, pattern);
	let options = glob::MatchOptions {
		require_literal_leading_dot: true,
		..Default::default()
	};
	let paths = glob::glob_with(&full_pattern, options).map_err(|source| HeaderkitError::InvalidPattern {
		pattern: pattern.to_string(),
		source,
	})?;

	let mut files = Vec::new();
	for entry in paths {
		let path = entry.map_err(|err| {
			let path = err.path().to_path_buf();
			HeaderkitError::from_io(&path, io::Error::from(err))
		})?;
		if path.is_file() {
			files.push(FileMatch {
				path,
				pattern: pattern.to_string(),
			});
		}
	}

	files.sort_by(|a, b| a.path.cmp(&b.path));
	tracing::debug!(pattern, count = files.len(), "expanded pattern");

	Ok(files)
}

/// Build the ordered rule table from a config.
pub fn compile_rules(config: &Config) -> Vec<SubstitutionRule> {
	config.rules.iter().map(SubstitutionRule::from).collect()
}

/// Build the prepend rule, if the config has one.
pub fn compile_prepend(config: &Config) -> Option<PrependRule> {
	config.prepend.as_ref().map(PrependRule::from)
}

/// The rules that run for a given gate setting, in order.
pub fn active_rules(rules: &[SubstitutionRule], gate: bool) -> impl Iterator<Item = &SubstitutionRule> {
	rules.iter().filter(move |rule| gate || !rule.gated)
}
