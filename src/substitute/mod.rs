//! Bulk substitution over a file tree.
//!
//! For every pattern, for every enabled rule in order, for every file the
//! pattern currently matches, the file is rewritten with that rule. A file
//! matched by several patterns, or touched by several rules, is rewritten
//! several times, cumulatively. Rewrites are atomic per file, but a run is
//! not transactional across rules.

pub mod atomic;

use crate::config::types::{Config, ErrorPolicy};
use crate::error::{HeaderkitError, Result};
use crate::rules::{
	FileMatch, PrependRule, SubstitutionRule, active_rules, compile_prepend, compile_rules,
	expand_pattern, validate_pattern,
};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// A file that could not be processed while running with `ErrorPolicy::Continue`.
#[derive(Debug)]
pub struct Failure {
	pub path: PathBuf,
	pub error: HeaderkitError,
}

/// Outcome of a substitution run.
#[derive(Debug, Default)]
pub struct Report {
	/// (pattern, rule, file) combinations processed successfully.
	pub visits: usize,

	/// Visits that changed a file's contents.
	pub rewrites: usize,

	/// Files that received the prepended line.
	pub prepended: usize,

	/// Every file whose contents changed at least once.
	pub changed_files: BTreeSet<PathBuf>,

	/// Failures skipped under `ErrorPolicy::Continue`.
	pub failures: Vec<Failure>,
}

impl Report {
	pub fn is_success(&self) -> bool {
		self.failures.is_empty()
	}
}

/// The substitution pipeline.
#[derive(Debug, Clone)]
pub struct Substituter {
	patterns: Vec<String>,
	rules: Vec<SubstitutionRule>,
	prepend: Option<PrependRule>,
	gate: bool,
	on_error: ErrorPolicy,
	dry_run: bool,
}

/// Per-run bookkeeping.
#[derive(Default)]
struct RunState {
	report: Report,
	/// Files that already went through the prepend step this run.
	prepend_seen: HashSet<PathBuf>,
	/// In-memory contents for dry runs, so later rules see earlier results.
	staged: HashMap<PathBuf, String>,
}

impl Substituter {
	pub fn new(patterns: Vec<String>, rules: Vec<SubstitutionRule>) -> Self {
		Self {
			patterns,
			rules,
			prepend: None,
			gate: false,
			on_error: ErrorPolicy::Abort,
			dry_run: false,
		}
	}

	/// Build a substituter from a parsed configuration.
	pub fn from_config(config: &Config) -> Self {
		Self::new(config.patterns.clone(), compile_rules(config))
			.with_prepend(compile_prepend(config))
			.with_gate(config.gate)
			.with_error_policy(config.on_error)
	}

	pub fn with_prepend(mut self, prepend: Option<PrependRule>) -> Self {
		self.prepend = prepend;
		self
	}

	pub fn with_gate(mut self, gate: bool) -> Self {
		self.gate = gate;
		self
	}

	pub fn with_error_policy(mut self, on_error: ErrorPolicy) -> Self {
		self.on_error = on_error;
		self
	}

	/// Compute every rewrite without touching the disk.
	pub fn with_dry_run(mut self, dry_run: bool) -> Self {
		self.dry_run = dry_run;
		self
	}

	pub fn gate(&self) -> bool {
		self.gate
	}

	/// Run the pipeline against `root`.
	///
	/// `on_closed` is called with each file path once a visit has finished.
	/// Under `ErrorPolicy::Abort` the first error is returned; under
	/// `ErrorPolicy::Continue` errors are collected into the report.
	pub fn run(&self, root: &Path, on_closed: &mut dyn FnMut(&Path)) -> Result<Report> {
		for pattern in &self.patterns {
			validate_pattern(pattern)?;
		}

		let mut state = RunState::default();

		for pattern in &self.patterns {
			for rule in active_rules(&self.rules, self.gate) {
				let files = match expand_pattern(root, pattern) {
					Ok(files) => files,
					Err(error) => {
						self.handle_failure(&mut state, root.to_path_buf(), error)?;
						continue;
					}
				};

				for file in &files {
					match self.visit(&mut state, file, rule) {
						Ok(()) => {
							state.report.visits += 1;
							on_closed(&file.path);
						}
						Err(error) => self.handle_failure(&mut state, file.path.clone(), error)?,
					}
				}
			}
		}

		let report = state.report;
		tracing::info!(
			visits = report.visits,
			rewrites = report.rewrites,
			changed = report.changed_files.len(),
			prepended = report.prepended,
			failures = report.failures.len(),
			dry_run = self.dry_run,
			"substitution finished"
		);

		Ok(report)
	}

	fn handle_failure(&self, state: &mut RunState, path: PathBuf, error: HeaderkitError) -> Result<()> {
		match self.on_error {
			ErrorPolicy::Abort => Err(error),
			ErrorPolicy::Continue => {
				tracing::warn!(path = %path.display(), error = %error, "skipping file");
				state.report.failures.push(Failure { path, error });
				Ok(())
			}
		}
	}

	/// Apply one rule (and the prepend step, on a qualifying file's first visit).
	fn visit(&self, state: &mut RunState, file: &FileMatch, rule: &SubstitutionRule) -> Result<()> {
		let prepend = self
			.prepend
			.as_ref()
			.filter(|p| p.qualifies(file) && !state.prepend_seen.contains(&file.path));

		let (changed, prepended) = if self.dry_run {
			self.visit_staged(state, &file.path, rule, prepend)?
		} else {
			let mut prepended = false;
			let changed = atomic::rewrite(&file.path, |text| {
				let (out, did_prepend) = transform(text, rule, prepend);
				prepended = did_prepend;
				out
			})?;
			(changed, prepended)
		};

		if prepend.is_some() {
			state.prepend_seen.insert(file.path.clone());
		}
		if prepended {
			state.report.prepended += 1;
		}
		if changed {
			tracing::debug!(path = %file.path.display(), from = %rule.from, "rewrote");
			state.report.rewrites += 1;
			state.report.changed_files.insert(file.path.clone());
		}

		Ok(())
	}

	fn visit_staged(
		&self,
		state: &mut RunState,
		path: &Path,
		rule: &SubstitutionRule,
		prepend: Option<&PrependRule>,
	) -> Result<(bool, bool)> {
		let current = match state.staged.get(path) {
			Some(text) => text.clone(),
			None => atomic::read_text(path)?,
		};

		let (out, prepended) = transform(&current, rule, prepend);
		match out {
			Cow::Owned(updated) if updated != current => {
				state.staged.insert(path.to_path_buf(), updated);
				Ok((true, prepended))
			}
			_ => Ok((false, prepended)),
		}
	}
}

/// Substitute, then prepend. Returns the new text and whether a line was prepended.
fn transform<'a>(
	text: &'a str,
	rule: &SubstitutionRule,
	prepend: Option<&PrependRule>,
) -> (Cow<'a, str>, bool) {
	let substituted = rule.apply(text);
	if let Some(prepend) = prepend
		&& let Cow::Owned(with_line) = prepend.apply(&substituted)
	{
		return (Cow::Owned(with_line), true);
	}
	(substituted, false)
}
