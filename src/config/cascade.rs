use crate::config::parser::parse_config_file;
use crate::config::types::LoadedConfig;
use crate::error::{HeaderkitError, Result};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".headerkit.toml";

/// When set to a truthy value, `~/.headerkit.toml` is never consulted.
pub const NO_USER_CONFIG_ENV_VAR: &str = "HEADERKIT_NO_USER_CONFIG";

/// Find the config that applies to `start_dir`.
///
/// The lookup order is:
/// 1. `.headerkit.toml` in `start_dir`, then each parent directory in turn
/// 2. `~/.headerkit.toml` (unless disabled via `HEADERKIT_NO_USER_CONFIG`)
///
/// The nearest file wins; configs are not merged.
pub fn discover_config(start_dir: &Path) -> Result<Option<LoadedConfig>> {
	// Relative paths like "." have no ancestors to walk otherwise.
	let start_dir = start_dir
		.canonicalize()
		.unwrap_or_else(|_| start_dir.to_path_buf());

	for dir in start_dir.ancestors() {
		let config_path = dir.join(CONFIG_FILE_NAME);
		if config_path.is_file() {
			tracing::debug!(path = %config_path.display(), "using project config");
			return load_config(&config_path).map(Some);
		}
	}

	if is_env_truthy(NO_USER_CONFIG_ENV_VAR) {
		return Ok(None);
	}

	let user_path = user_config_path()?;
	if user_path.is_file() {
		tracing::debug!(path = %user_path.display(), "using user config");
		return load_config(&user_path).map(Some);
	}

	Ok(None)
}

/// Load the config at an explicit path.
pub fn load_config(path: &Path) -> Result<LoadedConfig> {
	let config = parse_config_file(path)?;
	Ok(LoadedConfig {
		config,
		path: path.to_path_buf(),
	})
}

/// Load an explicit config if given, otherwise discover one from `start_dir`.
pub fn resolve_config(explicit: Option<&Path>, start_dir: &Path) -> Result<Option<LoadedConfig>> {
	match explicit {
		Some(path) => load_config(path).map(Some),
		None => discover_config(start_dir),
	}
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(HeaderkitError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	#[test]
	fn test_is_env_truthy() {
		// SAFETY: These env var operations are safe in single-threaded test context
		unsafe {
			std::env::remove_var("TEST_HEADERKIT_ENV_1");
			assert!(!is_env_truthy("TEST_HEADERKIT_ENV_1"));

			std::env::set_var("TEST_HEADERKIT_ENV_2", "");
			assert!(!is_env_truthy("TEST_HEADERKIT_ENV_2"));

			std::env::set_var("TEST_HEADERKIT_ENV_3", "0");
			assert!(!is_env_truthy("TEST_HEADERKIT_ENV_3"));

			std::env::set_var("TEST_HEADERKIT_ENV_4", "FALSE");
			assert!(!is_env_truthy("TEST_HEADERKIT_ENV_4"));

			std::env::set_var("TEST_HEADERKIT_ENV_5", "no");
			assert!(!is_env_truthy("TEST_HEADERKIT_ENV_5"));

			std::env::set_var("TEST_HEADERKIT_ENV_6", "1");
			assert!(is_env_truthy("TEST_HEADERKIT_ENV_6"));

			std::env::set_var("TEST_HEADERKIT_ENV_7", "yes");
			assert!(is_env_truthy("TEST_HEADERKIT_ENV_7"));

			for i in 1..=7 {
				std::env::remove_var(format!("TEST_HEADERKIT_ENV_{}", i));
			}
		}
	}

	#[test]
	fn test_discover_nearest_ancestor_config() {
		let temp_dir = tempfile::tempdir().unwrap();
		let nested = temp_dir.path().join("sdk/AWSCore/Bolts");
		fs::create_dir_all(&nested).unwrap();

		fs::write(
			temp_dir.path().join(CONFIG_FILE_NAME),
			"patterns = [\"outer/**/*.h\"]\n",
		)
		.unwrap();
		fs::write(
			temp_dir.path().join("sdk").join(CONFIG_FILE_NAME),
			"patterns = [\"inner/**/*.h\"]\n",
		)
		.unwrap();

		let loaded = discover_config(&nested).unwrap().unwrap();
		let expected = temp_dir.path().canonicalize().unwrap().join("sdk").join(CONFIG_FILE_NAME);
		assert_eq!(loaded.path, expected);
		assert_eq!(loaded.config.patterns, vec!["inner/**/*.h"]);
	}

	#[test]
	fn test_resolve_explicit_config() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("custom.toml");
		fs::write(&path, "gate = true\n").unwrap();

		let loaded = resolve_config(Some(&path), temp_dir.path())
			.unwrap()
			.unwrap();
		assert!(loaded.config.gate);
	}

	#[test]
	fn test_resolve_missing_explicit_config() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("missing.toml");

		let result = resolve_config(Some(&path), temp_dir.path());
		assert!(matches!(
			result.unwrap_err(),
			HeaderkitError::ConfigNotFound { .. }
		));
	}

	#[test]
	fn test_user_config_path() {
		let path = user_config_path().unwrap();
		assert!(path.ends_with(CONFIG_FILE_NAME));
	}
}
