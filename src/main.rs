use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use headerkit::HeaderkitError;
use headerkit::config::{
	CONFIG_FILE_NAME, ErrorPolicy, LoadedConfig, generate_init_template, resolve_config,
};
use headerkit::lister::{DEFAULT_SUFFIX, HeaderLister};
use headerkit::rules::validate_pattern;
use headerkit::substitute::Substituter;

#[derive(Parser)]
#[command(name = "headerkit")]
#[command(
	author,
	version,
	about = "CLI tool for listing SDK headers and rewriting their include paths in bulk"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Use this config file instead of searching for .headerkit.toml
	#[arg(long, global = true, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Increase log verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Print an #import line for every header under a directory
	List(ListArgs),
	/// Apply the configured substitution rules to every matching file
	Substitute(SubstituteArgs),
	/// Create a template .headerkit.toml in the current directory
	Init {
		/// Overwrite an existing .headerkit.toml
		#[arg(long)]
		force: bool,
	},
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Args)]
struct ListArgs {
	/// Directory to walk
	#[arg(default_value = ".")]
	root: PathBuf,

	/// Framework name used in `#import <NAMESPACE/file.h>`
	#[arg(long, short)]
	namespace: Option<String>,

	/// File name suffix to select [default: .h]
	#[arg(long, short)]
	suffix: Option<String>,

	/// Directory name to skip (repeatable)
	#[arg(long, short, value_name = "DIR")]
	exclude: Vec<String>,

	/// Sort lines and drop duplicates
	#[arg(long)]
	sort: bool,
}

#[derive(Args)]
struct SubstituteArgs {
	/// Working directory that patterns are relative to [default: current directory]
	#[arg(long, short, value_name = "DIR")]
	dir: Option<PathBuf>,

	/// Enable gated rules regardless of the config
	#[arg(long, overrides_with = "no_gate")]
	gate: bool,

	/// Disable gated rules regardless of the config
	#[arg(long, overrides_with = "gate")]
	no_gate: bool,

	/// Report failing files and keep going instead of stopping at the first
	#[arg(long)]
	keep_going: bool,

	/// Show which files would change without writing anything
	#[arg(long)]
	dry_run: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the effective configuration and where it came from
	Show,
	/// Check the config file and its patterns without touching any files
	Validate,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

/// Initialize the tracing subscriber. Logs go to stderr; stdout carries tool output.
fn init_tracing(verbose: u8) {
	use tracing_subscriber::EnvFilter;

	let default_level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	let explicit_config = cli.config.as_deref();

	match cli.command {
		Commands::List(args) => handle_list(args, explicit_config),
		Commands::Substitute(args) => handle_substitute(args, explicit_config),
		Commands::Init { force } => handle_init(force),
		Commands::Config { action } => match action {
			ConfigAction::Show => handle_config_show(explicit_config),
			ConfigAction::Validate => handle_config_validate(explicit_config),
		},
	}
}

fn current_dir() -> Result<PathBuf> {
	std::env::current_dir().context("Failed to get current directory")
}

fn load(explicit: Option<&Path>, start_dir: &Path) -> Result<Option<LoadedConfig>> {
	resolve_config(explicit, start_dir).context("Failed to load configuration")
}

fn handle_list(args: ListArgs, explicit_config: Option<&Path>) -> Result<ExitCode> {
	let cwd = current_dir()?;
	let defaults = load(explicit_config, &cwd)?
		.map(|loaded| loaded.config.list)
		.unwrap_or_default();

	let namespace = args.namespace.or(defaults.namespace).ok_or_else(|| {
		anyhow::anyhow!("No namespace given. Pass --namespace or set `namespace` under [list] in {CONFIG_FILE_NAME}.")
	})?;
	let suffix = args
		.suffix
		.or(defaults.suffix)
		.unwrap_or_else(|| DEFAULT_SUFFIX.to_string());

	let mut lister = HeaderLister::new(namespace).suffix(suffix);
	for dir in defaults.exclude.into_iter().chain(args.exclude) {
		lister = lister.exclude_dir(dir);
	}

	let context = || format!("Failed to list headers under {}", args.root.display());
	if args.sort {
		for line in lister.collect_sorted(&args.root).with_context(context)? {
			println!("{}", line);
		}
	} else {
		for line in lister.list(&args.root).with_context(context)? {
			println!("{}", line.with_context(context)?);
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_substitute(args: SubstituteArgs, explicit_config: Option<&Path>) -> Result<ExitCode> {
	let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
	if !dir.is_dir() {
		return Err(HeaderkitError::NotFound { path: dir }.into());
	}

	let loaded = load(explicit_config, &dir)?.ok_or_else(|| HeaderkitError::ConfigNotFound {
		path: dir.join(CONFIG_FILE_NAME),
	})?;
	tracing::info!(config = %loaded.path.display(), "loaded configuration");

	let mut substituter = Substituter::from_config(&loaded.config).with_dry_run(args.dry_run);
	if args.gate {
		substituter = substituter.with_gate(true);
	} else if args.no_gate {
		substituter = substituter.with_gate(false);
	}
	if args.keep_going {
		substituter = substituter.with_error_policy(ErrorPolicy::Continue);
	}

	let result = if args.dry_run {
		substituter.run(&dir, &mut |_| {})
	} else {
		substituter.run(&dir, &mut |path| println!("CLOSED: {}", path.display()))
	};
	let report = result.with_context(|| format!("Substitution failed in {}", dir.display()))?;

	if args.dry_run {
		for path in &report.changed_files {
			println!("would rewrite: {}", path.display());
		}
	}

	if !report.is_success() {
		for failure in &report.failures {
			eprintln!("failed: {}: {}", failure.path.display(), failure.error);
		}
		anyhow::bail!("{} file operation(s) failed", report.failures.len());
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	let template = generate_init_template();
	std::fs::write(&config_path, template)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show(explicit_config: Option<&Path>) -> Result<ExitCode> {
	let cwd = current_dir()?;
	let Some(loaded) = load(explicit_config, &cwd)? else {
		println!("No configuration file found.");
		return Ok(ExitCode::SUCCESS);
	};

	println!("# Source: {}", loaded.path.display());
	println!("# rules: {}", loaded.config.rules.len());
	println!(
		"# gated rules: {}",
		loaded.config.rules.iter().filter(|r| r.gated).count()
	);
	println!();

	let rendered =
		toml::to_string_pretty(&loaded.config).context("Failed to render configuration")?;
	print!("{}", rendered);

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(explicit_config: Option<&Path>) -> Result<ExitCode> {
	let cwd = current_dir()?;
	let Some(loaded) = load(explicit_config, &cwd)? else {
		println!("No configuration file found.");
		return Ok(ExitCode::SUCCESS);
	};

	for pattern in &loaded.config.patterns {
		validate_pattern(pattern)
			.with_context(|| format!("Invalid pattern in {}", loaded.path.display()))?;
	}

	if loaded.config.patterns.is_empty() {
		println!(
			"{}: valid (warning: no patterns, substitute will not touch any file)",
			loaded.path.display()
		);
	} else {
		println!("{}: valid", loaded.path.display());
	}

	Ok(ExitCode::SUCCESS)
}
