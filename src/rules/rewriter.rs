use crate::config::types::{PrependConfig, PrependScope, RuleConfig};
use crate::rules::matcher::FileMatch;
use std::borrow::Cow;

/// A literal `(from, to)` substitution applied line by line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionRule {
	/// The match-string.
	pub from: String,

	/// The replacement string.
	pub to: String,

	/// Whether this rule only runs when the gate is enabled.
	pub gated: bool,
}

impl SubstitutionRule {
	pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			from: from.into(),
			to: to.into(),
			gated: false,
		}
	}

	/// Mark this rule as the gated one.
	pub fn gated(mut self) -> Self {
		self.gated = true;
		self
	}

	/// Replace every non-overlapping occurrence in a single line.
	pub fn apply_line<'a>(&self, line: &'a str) -> Cow<'a, str> {
		if line.contains(self.from.as_str()) {
			Cow::Owned(line.replace(self.from.as_str(), &self.to))
		} else {
			Cow::Borrowed(line)
		}
	}

	/// Apply this rule to each line of `text`, keeping line terminators as they are.
	///
	/// Returns `Cow::Borrowed` when nothing matched. A rule whose replacement
	/// contains its own match-string leaves text that already holds the
	/// replacement alone, so reruns do not nest it.
	pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
		if !text.contains(self.from.as_str()) || self.already_applied(text) {
			return Cow::Borrowed(text);
		}

		let mut out = String::with_capacity(text.len());
		for line in text.split_inclusive('\n') {
			out.push_str(&self.apply_line(line));
		}
		Cow::Owned(out)
	}

	fn already_applied(&self, text: &str) -> bool {
		self.to.contains(self.from.as_str()) && text.contains(self.to.as_str())
	}
}

impl From<&RuleConfig> for SubstitutionRule {
	fn from(rule: &RuleConfig) -> Self {
		Self {
			from: rule.from.clone(),
			to: rule.to.clone(),
			gated: rule.gated,
		}
	}
}

/// A fixed line inserted at the top of qualifying files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrependRule {
	/// Substring that makes a file qualify.
	pub marker: String,

	/// The line to insert, without terminator.
	pub content: String,

	/// What the marker is matched against.
	pub scope: PrependScope,
}

impl PrependRule {
	pub fn new(marker: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			marker: marker.into(),
			content: content.into(),
			scope: PrependScope::Pattern,
		}
	}

	pub fn with_scope(mut self, scope: PrependScope) -> Self {
		self.scope = scope;
		self
	}

	/// Check whether a matched file gets the prepended line.
	pub fn qualifies(&self, file: &FileMatch) -> bool {
		match self.scope {
			PrependScope::Pattern => file.pattern.contains(self.marker.as_str()),
			PrependScope::Path => file.path.to_string_lossy().contains(self.marker.as_str()),
		}
	}

	/// Insert the content line at index 0.
	///
	/// Files that already start with exactly this line are left alone, so
	/// rerunning the same configuration does not stack copies.
	pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
		let first_line = text.lines().next().unwrap_or("");
		if first_line == self.content {
			return Cow::Borrowed(text);
		}

		let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
		let mut out = String::with_capacity(self.content.len() + newline.len() + text.len());
		out.push_str(&self.content);
		out.push_str(newline);
		out.push_str(text);
		Cow::Owned(out)
	}
}

impl From<&PrependConfig> for PrependRule {
	fn from(prepend: &PrependConfig) -> Self {
		Self {
			marker: prepend.marker.clone(),
			content: prepend.content.clone(),
			scope: prepend.scope,
		}
	}
}
