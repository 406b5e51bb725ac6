//! Crash-safe file rewriting.
//!
//! New content is written to a temporary file in the target's directory and
//! renamed over the original only once it is complete. If anything fails
//! before the rename, the original is untouched and the temporary file is
//! removed when it is dropped.

use crate::error::{HeaderkitError, Result};
use std::borrow::Cow;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Read a whole file as UTF-8 text. Invalid UTF-8 is reported as `NotText`.
pub fn read_text(path: &Path) -> Result<String> {
	fs::read_to_string(path).map_err(|source| match source.kind() {
		io::ErrorKind::InvalidData => HeaderkitError::NotText {
			path: path.to_path_buf(),
		},
		_ => HeaderkitError::from_io(path, source),
	})
}

/// Replace the contents of `path` with whatever `write` produces.
///
/// The original's permissions are carried over to the new file.
pub fn write_with<F>(path: &Path, write: F) -> Result<()>
where
	F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	let mut tmp = NamedTempFile::new_in(dir).map_err(|source| HeaderkitError::from_io(dir, source))?;

	{
		let mut writer = BufWriter::new(tmp.as_file_mut());
		write(&mut writer).map_err(|source| HeaderkitError::from_io(path, source))?;
		writer
			.flush()
			.map_err(|source| HeaderkitError::from_io(path, source))?;
	}

	if let Ok(metadata) = fs::metadata(path) {
		tmp.as_file()
			.set_permissions(metadata.permissions())
			.map_err(|source| HeaderkitError::from_io(path, source))?;
	}

	tmp.persist(path)
		.map_err(|err| HeaderkitError::from_io(path, err.error))?;

	Ok(())
}

/// Replace the contents of `path` with `contents`.
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
	write_with(path, |out| out.write_all(contents.as_bytes()))
}

/// Read `path`, transform it, and write it back if the transform changed anything.
///
/// Returns whether the file was rewritten.
pub fn rewrite<F>(path: &Path, transform: F) -> Result<bool>
where
	F: for<'a> FnOnce(&'a str) -> Cow<'a, str>,
{
	let original = read_text(path)?;
	match transform(&original) {
		Cow::Borrowed(_) => Ok(false),
		Cow::Owned(updated) => {
			if updated == original {
				return Ok(false);
			}
			write_text(path, &updated)?;
			Ok(true)
		}
	}
}
