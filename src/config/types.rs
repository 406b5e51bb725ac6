use crate::error::{HeaderkitError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Top-level configuration from a `.headerkit.toml` file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// Glob patterns, relative to the working directory, selecting files to rewrite.
	/// Processed in order.
	#[serde(default)]
	pub patterns: Vec<String>,

	/// Enables rules marked `gated` (the platform-header substitution).
	#[serde(default)]
	pub gate: bool,

	/// What to do when rewriting a single file fails.
	#[serde(default)]
	pub on_error: ErrorPolicy,

	/// Optional line inserted at the top of qualifying files.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub prepend: Option<PrependConfig>,

	/// Defaults for `headerkit list`.
	#[serde(default)]
	pub list: ListConfig,

	/// Substitution rules, applied in order.
	#[serde(default)]
	pub rules: Vec<RuleConfig>,
}

/// A literal `(from, to)` substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleConfig {
	/// Match-string, replaced verbatim wherever it occurs on a line.
	pub from: String,

	/// Replacement string. May contain newlines.
	#[serde(default)]
	pub to: String,

	/// Only applied when the gate is enabled.
	#[serde(default)]
	pub gated: bool,
}

/// Where the prepend marker is searched for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrependScope {
	/// The glob pattern string that selected the file.
	#[default]
	Pattern,
	/// The path of the file itself.
	Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PrependConfig {
	pub marker: String,
	pub content: String,
	#[serde(default)]
	pub scope: PrependScope,
}

/// Failure handling for the substituter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
	/// Stop at the first failing file.
	#[default]
	Abort,
	/// Log the failure, keep going, fail at the end.
	Continue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListConfig {
	/// Framework name used in `#import <NAMESPACE/file.h>`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub namespace: Option<String>,

	/// File name suffix to select. Defaults to `.h`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub suffix: Option<String>,

	/// Directory names pruned from the walk.
	#[serde(default)]
	pub exclude: Vec<String>,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

impl RuleConfig {
	pub fn validate(&self) -> Result<()> {
		if self.from.is_empty() {
			return Err(invalid("rule has an empty `from` string"));
		}
		if self.from.contains('\n') {
			return Err(invalid(format!(
				"rule `{}` spans several lines; `from` must fit on one line",
				self.from.escape_default()
			)));
		}
		if self.from == self.to {
			return Err(invalid(format!(
				"rule `{}` replaces a string with itself",
				self.from
			)));
		}
		Ok(())
	}
}

impl Config {
	/// Validate patterns, rules and the prepend table.
	pub fn validate(&self) -> Result<()> {
		if self.patterns.iter().any(|p| p.trim().is_empty()) {
			return Err(invalid("empty glob pattern"));
		}

		let mut seen = HashSet::new();
		for rule in &self.rules {
			rule.validate()?;
			if !seen.insert(rule.from.as_str()) {
				return Err(invalid(format!("duplicate rule for `{}`", rule.from)));
			}
		}

		if let Some(ref prepend) = self.prepend {
			if prepend.marker.is_empty() {
				return Err(invalid("prepend marker is empty"));
			}
			if prepend.content.contains('\n') {
				return Err(invalid("prepend content must be a single line"));
			}
		}

		Ok(())
	}
}

fn invalid(reason: impl Into<String>) -> HeaderkitError {
	HeaderkitError::InvalidConfig {
		reason: reason.into(),
	}
}
