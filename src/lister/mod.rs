//! Header listing.
//!
//! Walks a directory tree and turns every file with a matching suffix into an
//! umbrella-header line such as `#import <awsosx/AWSCore.h>`.

use crate::error::{HeaderkitError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Default file name suffix selected by the lister.
pub const DEFAULT_SUFFIX: &str = ".h";

/// Formats matching file names as `#import <NAMESPACE/{file}>` lines.
#[derive(Debug, Clone)]
pub struct HeaderLister {
	namespace: String,
	suffix: String,
	exclude_dirs: Vec<String>,
}

impl HeaderLister {
	pub fn new(namespace: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			suffix: DEFAULT_SUFFIX.to_string(),
			exclude_dirs: Vec::new(),
		}
	}

	pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
		self.suffix = suffix.into();
		self
	}

	/// Skip any directory with this exact name (e.g. a stale `build` folder).
	pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
		self.exclude_dirs.push(name.into());
		self
	}

	pub fn format_line(&self, file_name: &str) -> String {
		format!("#import <{}/{}>", self.namespace, file_name)
	}

	/// Lazily list import lines for every matching file under `root`.
	///
	/// Lines come out in traversal order, which depends on the filesystem.
	/// The root is checked up front so a missing or unreadable root fails
	/// before anything is yielded.
	pub fn list(&self, root: &Path) -> Result<ImportLines<'_>> {
		let metadata = fs::metadata(root).map_err(|source| HeaderkitError::from_io(root, source))?;
		if metadata.is_dir() {
			fs::read_dir(root).map_err(|source| HeaderkitError::from_io(root, source))?;
		}

		let exclude_dirs = &self.exclude_dirs;
		let walker = WalkDir::new(root)
			.follow_links(false)
			.into_iter()
			.filter_entry(move |entry| !is_excluded(entry, exclude_dirs));

		Ok(ImportLines {
			lister: self,
			walker: Box::new(walker),
		})
	}

	/// List every import line under `root`, sorted and without duplicates.
	pub fn collect_sorted(&self, root: &Path) -> Result<Vec<String>> {
		let mut lines = self.list(root)?.collect::<Result<Vec<_>>>()?;
		lines.sort();
		lines.dedup();
		Ok(lines)
	}

	fn matches(&self, entry: &DirEntry) -> bool {
		entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(&self.suffix)
	}
}

fn is_excluded(entry: &DirEntry, exclude_dirs: &[String]) -> bool {
	entry.depth() > 0
		&& entry.file_type().is_dir()
		&& exclude_dirs
			.iter()
			.any(|name| entry.file_name().to_string_lossy() == name.as_str())
}

/// Iterator over import lines, produced while the directory is walked.
pub struct ImportLines<'a> {
	lister: &'a HeaderLister,
	walker: Box<dyn Iterator<Item = walkdir::Result<DirEntry>> + 'a>,
}

impl Iterator for ImportLines<'_> {
	type Item = Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let entry = match self.walker.next()? {
				Ok(entry) => entry,
				Err(err) => return Some(Err(walk_error(err))),
			};
			if self.lister.matches(&entry) {
				let name = entry.file_name().to_string_lossy();
				return Some(Ok(self.lister.format_line(&name)));
			}
		}
	}
}

fn walk_error(err: walkdir::Error) -> HeaderkitError {
	let path = err.path().map(Path::to_path_buf).unwrap_or_else(PathBuf::new);
	match err.into_io_error() {
		Some(source) => HeaderkitError::from_io(&path, source),
		None => HeaderkitError::Io {
			path,
			source: std::io::Error::other("filesystem loop detected"),
		},
	}
}
