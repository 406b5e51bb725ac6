//! Headerkit - CLI tool for preparing a vendored Objective-C SDK for a local build.
//!
//! This library provides the core functionality for headerkit, including:
//! - Listing headers as umbrella `#import` lines
//! - Configuration file parsing and discovery
//! - Literal, ordered include-path substitution with atomic file rewrites
//!
//! # Example
//!
//! ```no_run
//! use headerkit::config::discover_config;
//! use headerkit::substitute::Substituter;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let loaded = discover_config(&cwd).unwrap().expect("no .headerkit.toml found");
//!
//! let substituter = Substituter::from_config(&loaded.config);
//! let report = substituter
//!     .run(&cwd, &mut |path| println!("CLOSED: {}", path.display()))
//!     .unwrap();
//! println!("{} files changed", report.changed_files.len());
//! ```

pub mod config;
pub mod error;
pub mod lister;
pub mod rules;
pub mod substitute;

pub use error::{HeaderkitError, Result};
