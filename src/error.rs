use std::io;
use std::path::{Path, PathBuf};

/// Library-level structured errors for headerkit.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum HeaderkitError {
	#[error("Path not found: {path}")]
	NotFound { path: PathBuf },

	#[error("Permission denied: {path}")]
	PermissionDenied { path: PathBuf },

	#[error("I/O error on {path}")]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("Not a UTF-8 text file: {path}")]
	NotText { path: PathBuf },

	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid configuration: {reason}")]
	InvalidConfig { reason: String },

	#[error("Invalid glob pattern: {pattern}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: glob::PatternError,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

impl HeaderkitError {
	/// Classify an I/O error on `path` into the matching variant.
	pub fn from_io(path: &Path, source: io::Error) -> Self {
		match source.kind() {
			io::ErrorKind::NotFound => HeaderkitError::NotFound {
				path: path.to_path_buf(),
			},
			io::ErrorKind::PermissionDenied => HeaderkitError::PermissionDenied {
				path: path.to_path_buf(),
			},
			_ => HeaderkitError::Io {
				path: path.to_path_buf(),
				source,
			},
		}
	}
}

/// Result type alias using HeaderkitError.
pub type Result<T> = std::result::Result<T, HeaderkitError>;
