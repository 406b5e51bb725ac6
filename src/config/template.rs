/// Generate the `.headerkit.toml` written by `headerkit init`.
///
/// The rule table converts the framework-style imports of the AWS iOS SDK
/// into the quoted, flat imports needed to build it as a local macOS framework.
pub fn generate_init_template() -> String {
	let mut out = String::from(HEADER);
	for (from, to) in AWS_RULES {
		out.push_str("\n[[rules]]\n");
		out.push_str(&format!("from = '{from}'\n"));
		out.push_str(&format!("to = '{to}'\n"));
	}
	out.push_str(PLATFORM_RULE);
	out
}

const HEADER: &str = r#"# headerkit configuration.
#
# `headerkit substitute` applies every rule, in order, to every file matched
# by every pattern. Patterns are relative to the working directory.
patterns = ["**/*.h", "**/*.m"]

# Enables rules marked `gated = true` (the UIKit/Cocoa platform block).
gate = false

# "abort" stops at the first failing file, "continue" reports and carries on.
on-error = "abort"

# Inserted as the first line of files selected by a pattern containing `marker`.
# Set scope = "path" to match the marker against the file path instead.
# [prepend]
# marker = "Resources"
# content = '#import "AWSCocoaLumberjack.h"'

[list]
namespace = "awsosx"
suffix = ".h"
exclude = ["build"]
"#;

const AWS_RULES: &[(&str, &str)] = &[
	("#import <AWSS3/AWSS3.h>", "#import \"AWSS3.h\""),
	("#import <AWSCore/AWSFMDB.h>", "#import \"AWSFMDB.h\""),
	(
		"#import <AWSCore/AWSURLRequestRetryHandler.h>",
		"#import \"AWSURLRequestRetryHandler.h\"",
	),
	("#import <AWSCore/AWSService.h>", "#import \"AWSService.h\""),
	("#import <AWSCore/AWSCore.h>", "#import \"AWSCore.h\""),
	("#import <AWSCore/AWSNetworking.h>", "#import \"AWSNetworking.h\""),
	("#import <AWSCore/AWSModel.h>", "#import \"AWSModel.h\""),
	("#import <AWSCore/AWSCategory.h>", "#import \"AWSCategory.h\""),
	("#import <AWSCore/AWSBolts.h>", "#import \"AWSBolts.h\""),
	("#import <AWSCore/AWSSignature.h>", "#import \"AWSSignature.h\""),
	(
		"#import <AWSCore/AWSCocoaLumberjack.h>",
		"#import \"AWSCocoaLumberjack.h\"",
	),
	(
		"#import <AWSCore/AWSSynchronizedMutableDictionary.h>",
		"#import \"AWSSynchronizedMutableDictionary.h\"",
	),
	(
		"#import <AWSCore/AWSURLRequestSerialization.h>",
		"#import \"AWSURLRequestSerialization.h\"",
	),
	(
		"#import <AWSCore/AWSURLResponseSerialization.h>",
		"#import \"AWSURLResponseSerialization.h\"",
	),
	("#import <AWSCore/AWSTMCache.h>", "#import \"AWSTMCache.h\""),
	("#import <AWSCore/AWSXMLDictionary.h>", "#import \"AWSXMLDictionary.h\""),
	("#import <AWSFMDB/AWSFMDB.h>", "#import \"AWSFMDB.h\""),
	// Logging shims that do not exist in the macOS build.
	("#import \"AWSDDASLLogCapture.h\"", ""),
	("#import \"AWSDDASLLogger.h\"", ""),
	("#import \"AWSLogging.h\"", ""),
	("#import \"AWSFMDB+AWSHelpers.h\"", ""),
];

const PLATFORM_RULE: &str = r#"
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
