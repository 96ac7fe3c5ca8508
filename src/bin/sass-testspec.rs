//! sass-testspec CLI
//!
//! Discover SASS/SCSS fixtures and run the tests they report.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use sass_testspec::{RunConfig, TestRunner, DEFAULT_SUFFIXES};

#[derive(Parser, Debug)]
#[command(name = "sass-testspec")]
#[command(version)]
#[command(about = "Run SASS/SCSS test fixtures")]
struct Cli {
    /// Directory containing fixtures
    #[arg(default_value = "test")]
    path: PathBuf,

    /// Only look at the directory itself, not its subdirectories
    #[arg(long = "no-recursive")]
    no_recursive: bool,

    /// Only run fixtures whose file name contains this string
    #[arg(short = 'f', long)]
    filter: Option<String>,

    /// Fixture file name suffixes [default: .test.scss .test.sass]
    #[arg(long = "suffix")]
    suffixes: Vec<String>,

    /// Directories searched for stylesheet imports [default: .]
    #[arg(short = 'I', long = "load-path")]
    load_paths: Vec<PathBuf>,

    /// Verbose output: debug logging, one line per case as it runs
    #[arg(short, long)]
    verbose: bool,

    /// Show number of fixtures without running
    #[arg(long = "count")]
    count: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let defaults = RunConfig::default();
    let config = RunConfig {
        dir: cli.path,
        recursive: !cli.no_recursive,
        suffixes: if cli.suffixes.is_empty() {
            DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect()
        } else {
            cli.suffixes
        },
        filter: cli.filter,
        load_paths: if cli.load_paths.is_empty() {
            defaults.load_paths
        } else {
            cli.load_paths
        },
        verbose: cli.verbose,
    };
    let dir = config.dir.clone();
    let runner = TestRunner::new(config);

    if cli.count {
        let count = runner
            .count_tests()
            .with_context(|| format!("cannot scan {}", dir.display()))?;
        println!("Found {} fixture(s)", count);
        return Ok(true);
    }

    let result = runner
        .run_all()
        .with_context(|| format!("cannot scan {}", dir.display()))?;

    print!("{}", result.render(true));

    Ok(result.all_passed())
}
