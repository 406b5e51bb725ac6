#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn headerkit_cmd() -> assert_cmd::Command {
	let mut cmd = assert_cmd::Command::cargo_bin("headerkit").unwrap();
	// Keep tests independent of the developer's ~/.headerkit.toml.
	cmd.env("HEADERKIT_NO_USER_CONFIG", "1");
	cmd
}

fn write(root: &Path, rel: &str, content: &str) {
	let path = root.join(rel);
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(path, content).unwrap();
}

const SDK_CONFIG: &str = r#"
patterns = ["**/*.h", "**/*.m"]

[[rules]]
from = '#import <AWSCore/AWSCore.h>'
to = '#import "AWSCore.h"'

[[rules]]
from = '#import <UIKit/UIKit.h>'
to = '''
#if TARGET_OS_IPHONE || TARGET_IPHONE_SIMULATOR
#import <UIKit/UIKit.h>
#else
#import <Cocoa/Cocoa.h>
#endif'''
gated = true
"#;

const UIKIT_BLOCK: &str = "#if TARGET_OS_IPHONE || TARGET_IPHONE_SIMULATOR\n#import <UIKit/UIKit.h>\n#else\n#import <Cocoa/Cocoa.h>\n#endif\n";

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	headerkit_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("listing SDK headers"));
}

#[test]
fn test_version_flag() {
	headerkit_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("headerkit"));
}

#[test]
fn test_no_args_shows_help() {
	headerkit_cmd()
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

// ============================================================================
// list tests
// ============================================================================

#[test]
fn test_list_prints_import_lines() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(temp_dir.path(), "AWSKMS/AWSKMSService.h", "");
	write(temp_dir.path(), "AWSKMS/AWSKMSService.m", "");
	write(temp_dir.path(), "AWSCore/Bolts/AWSBolts.h", "");

	headerkit_cmd()
		.args(["list", "--namespace", "awsosx", "--sort"])
		.arg(temp_dir.path())
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("#import <awsosx/AWSBolts.h>\n#import <awsosx/AWSKMSService.h>\n");
}

#[test]
fn test_list_uses_config_defaults() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(
		temp_dir.path(),
		".headerkit.toml",
		"[list]\nnamespace = \"awsosx\"\nexclude = [\"build\"]\n",
	);
	write(temp_dir.path(), "sdk/AWSCore.h", "");
	write(temp_dir.path(), "sdk/build/Headers/AWSCore-Swift.h", "");

	headerkit_cmd()
		.args(["list", "sdk"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout("#import <awsosx/AWSCore.h>\n");
}

#[test]
fn test_list_requires_namespace() {
	let temp_dir = tempfile::tempdir().unwrap();

	headerkit_cmd()
		.arg("list")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("No namespace given"));
}

#[test]
fn test_list_missing_root_fails() {
	let temp_dir = tempfile::tempdir().unwrap();

	headerkit_cmd()
		.args(["list", "--namespace", "awsosx", "aws-sdk-osx"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stdout(predicate::str::is_empty())
		.stderr(predicate::str::contains("Path not found"));
}

// ============================================================================
// substitute tests
// ============================================================================

#[test]
fn test_substitute_rewrites_and_reports_closed() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(temp_dir.path(), ".headerkit.toml", SDK_CONFIG);
	write(temp_dir.path(), "AWSS3/AWSS3.h", "#import <AWSCore/AWSCore.h>\n");

	headerkit_cmd()
		.arg("substitute")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("CLOSED: "))
		.stdout(predicate::str::contains("AWSS3/AWSS3.h"));

	assert_eq!(
		fs::read_to_string(temp_dir.path().join("AWSS3/AWSS3.h")).unwrap(),
		"#import \"AWSCore.h\"\n"
	);
}

#[test]
fn test_substitute_gate_flag() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(temp_dir.path(), ".headerkit.toml", SDK_CONFIG);
	write(temp_dir.path(), "AWSCore/AWSUIKit.m", "#import <UIKit/UIKit.h>\n");
	let path = temp_dir.path().join("AWSCore/AWSUIKit.m");

	headerkit_cmd()
		.arg("substitute")
		.current_dir(temp_dir.path())
		.assert()
		.success();
	assert_eq!(fs::read_to_string(&path).unwrap(), "#import <UIKit/UIKit.h>\n");

	headerkit_cmd()
		.args(["substitute", "--gate"])
		.current_dir(temp_dir.path())
		.assert()
		.success();
	assert_eq!(fs::read_to_string(&path).unwrap(), UIKIT_BLOCK);
}

#[test]
fn test_substitute_gate_rerun_is_stable() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(temp_dir.path(), ".headerkit.toml", SDK_CONFIG);
	write(temp_dir.path(), "AWSCore/AWSUIKit.m", "#import <UIKit/UIKit.h>\n");
	let path = temp_dir.path().join("AWSCore/AWSUIKit.m");

	for _ in 0..2 {
		headerkit_cmd()
			.args(["substitute", "--gate"])
			.current_dir(temp_dir.path())
			.assert()
			.success();
		assert_eq!(fs::read_to_string(&path).unwrap(), UIKIT_BLOCK);
	}

	headerkit_cmd()
		.args(["substitute", "--gate", "--dry-run"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("would rewrite").not());
}

#[test]
fn test_substitute_no_gate_overrides_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(
		temp_dir.path(),
		".headerkit.toml",
		&format!("gate = true\n{SDK_CONFIG}"),
	);
	write(temp_dir.path(), "a.m", "#import <UIKit/UIKit.h>\n");

	headerkit_cmd()
		.args(["substitute", "--no-gate"])
		.current_dir(temp_dir.path())
		.assert()
		.success();
	assert_eq!(
		fs::read_to_string(temp_dir.path().join("a.m")).unwrap(),
		"#import <UIKit/UIKit.h>\n"
	);
}

#[test]
fn test_substitute_with_dir_and_explicit_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(temp_dir.path(), "headerkit.toml", SDK_CONFIG);
	write(temp_dir.path(), "sdk/AWSCore.m", "#import <AWSCore/AWSCore.h>\n");

	headerkit_cmd()
		.args(["substitute", "--dir", "sdk", "--config", "headerkit.toml"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("AWSCore.m"));

	assert_eq!(
		fs::read_to_string(temp_dir.path().join("sdk/AWSCore.m")).unwrap(),
		"#import \"AWSCore.h\"\n"
	);
}

#[test]
fn test_substitute_dry_run_leaves_files() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(temp_dir.path(), ".headerkit.toml", SDK_CONFIG);
	write(temp_dir.path(), "AWSS3.h", "#import <AWSCore/AWSCore.h>\n");

	headerkit_cmd()
		.args(["substitute", "--dry-run"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("would rewrite: "))
		.stdout(predicate::str::contains("AWSS3.h"))
		.stdout(predicate::str::contains("CLOSED").not());

	assert_eq!(
		fs::read_to_string(temp_dir.path().join("AWSS3.h")).unwrap(),
		"#import <AWSCore/AWSCore.h>\n"
	);
}

#[test]
fn test_substitute_without_config_fails() {
	let temp_dir = tempfile::tempdir().unwrap();

	headerkit_cmd()
		.arg("substitute")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_substitute_stops_on_non_text_file() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(temp_dir.path(), ".headerkit.toml", SDK_CONFIG);
	fs::write(temp_dir.path().join("a.h"), [0xff, 0xfe]).unwrap();

	headerkit_cmd()
		.arg("substitute")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Not a UTF-8 text file"));
}

#[test]
fn test_substitute_keep_going_finishes_and_fails() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(temp_dir.path(), ".headerkit.toml", SDK_CONFIG);
	fs::write(temp_dir.path().join("a.h"), [0xff, 0xfe]).unwrap();
	write(temp_dir.path(), "b.h", "#import <AWSCore/AWSCore.h>\n");

	headerkit_cmd()
		.args(["substitute", "--keep-going"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stdout(predicate::str::contains("CLOSED: "))
		.stdout(predicate::str::contains("b.h"))
		.stderr(predicate::str::contains("failed: "))
		.stderr(predicate::str::contains("a.h"));

	assert_eq!(
		fs::read_to_string(temp_dir.path().join("b.h")).unwrap(),
		"#import \"AWSCore.h\"\n"
	);
}

// ============================================================================
// init and config subcommand tests
// ============================================================================

#[test]
fn test_init_creates_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".headerkit.toml");

	headerkit_cmd()
		.arg("init")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created .headerkit.toml"));

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("[[rules]]"));
	assert!(content.contains("gated = true"));
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join(".headerkit.toml"), "# existing").unwrap();

	headerkit_cmd()
		.arg("init")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".headerkit.toml");
	fs::write(&config_path, "# existing").unwrap();

	headerkit_cmd()
		.args(["init", "--force"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("patterns"));
}

#[test]
fn test_init_template_validates() {
	let temp_dir = tempfile::tempdir().unwrap();

	headerkit_cmd()
		.arg("init")
		.current_dir(temp_dir.path())
		.assert()
		.success();

	headerkit_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("valid"));
}

#[test]
fn test_config_validate_no_config() {
	let temp_dir = tempfile::tempdir().unwrap();

	headerkit_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("No configuration file found"));
}

#[test]
fn test_config_validate_invalid_toml() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join(".headerkit.toml"), "invalid toml [[[").unwrap();

	headerkit_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure();
}

#[test]
fn test_config_validate_bad_pattern() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join(".headerkit.toml"),
		"patterns = [\"[unclosed\"]\n",
	)
	.unwrap();

	headerkit_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Invalid glob pattern"));
}

#[test]
fn test_config_show_displays_rules() {
	let temp_dir = tempfile::tempdir().unwrap();
	write(temp_dir.path(), ".headerkit.toml", SDK_CONFIG);

	headerkit_cmd()
		.args(["config", "show"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("# rules: 2"))
		.stdout(predicate::str::contains("# gated rules: 1"))
		.stdout(predicate::str::contains("AWSCore/AWSCore.h"));
}
