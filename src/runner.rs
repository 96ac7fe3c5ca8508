//! Test runner
//!
//! Orchestrates a run: discovers fixture files under a directory, registers
//! the tests each one reports, executes them and collects results.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use crate::compiler::{GrassCompiler, SassOptions, StylesheetCompiler};
use crate::filter::{fixture_stem, FixtureFilter, DEFAULT_SUFFIXES};
use crate::locator::discover;
use crate::registrar::SuiteCollector;
use crate::sass::run_sass;

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory containing fixtures
    pub dir: PathBuf,
    /// Descend into subdirectories
    pub recursive: bool,
    /// File name suffixes that mark a fixture
    pub suffixes: Vec<String>,
    /// Optional filter — only run fixtures whose file name contains this
    pub filter: Option<String>,
    /// Include paths for stylesheet imports
    pub load_paths: Vec<PathBuf>,
    /// Verbose mode — report passing cases too, not only failures
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("test"),
            recursive: true,
            suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            filter: None,
            load_paths: SassOptions::default().load_paths,
            verbose: false,
        }
    }
}

/// Result of running all tests
#[derive(Debug)]
pub struct TestResult {
    /// Individual test case results
    pub cases: Vec<TestCaseResult>,
    /// Total duration
    pub duration: Duration,
}

impl TestResult {
    /// Check if all tests passed
    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(|c| c.passed)
    }

    /// Count passed tests
    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.passed).count()
    }

    /// Count failed tests
    pub fn failed_count(&self) -> usize {
        self.cases.iter().filter(|c| !c.passed).count()
    }

    /// Format a summary line
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed ({}ms)",
            self.passed_count(),
            self.failed_count(),
            self.duration.as_millis(),
        )
    }

    /// Per-case lines followed by the summary.
    ///
    /// Failures are always listed with their error; passing cases only when
    /// `verbose` is set.
    pub fn render(&self, verbose: bool) -> String {
        let mut out = String::new();
        for case in &self.cases {
            if case.passed {
                if verbose {
                    out.push_str(&format!("PASS  {} ({}ms)\n", case.name, case.duration.as_millis()));
                }
                continue;
            }
            out.push_str(&format!("FAIL  {}\n", case.name));
            if let Some(ref err) = case.error {
                for line in err.lines() {
                    out.push_str(&format!("      {}\n", line));
                }
            }
        }
        out.push_str(&format!("\n{}\n", self.summary()));
        out
    }
}

/// Result of a single test case
#[derive(Debug)]
pub struct TestCaseResult {
    /// Qualified name: fixture, modules, test
    pub name: String,
    /// Fixture the case came from
    pub file: PathBuf,
    pub passed: bool,
    /// Error message if failed
    pub error: Option<String>,
    pub duration: Duration,
}

/// The test runner
pub struct TestRunner {
    compiler: Box<dyn StylesheetCompiler>,
    config: RunConfig,
}

impl TestRunner {
    /// Create a runner that compiles with `grass`
    pub fn new(config: RunConfig) -> Self {
        Self::with_compiler(Box::new(GrassCompiler), config)
    }

    /// Create a runner with a custom compiler
    pub fn with_compiler(compiler: Box<dyn StylesheetCompiler>, config: RunConfig) -> Self {
        Self { compiler, config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    fn fixture_filter(&self) -> FixtureFilter {
        let filter = FixtureFilter::with_suffixes(self.config.suffixes.iter().cloned());
        match self.config.filter {
            Some(ref pattern) => filter.name_contains(pattern.clone()),
            None => filter,
        }
    }

    /// Discover fixture files in the configured directory, in listing order
    pub fn discover(&self) -> Result<Vec<String>, std::io::Error> {
        let root = self.config.dir.to_string_lossy();
        let files = discover(&root, self.config.recursive)?;
        let fixtures = self.fixture_filter().apply(files);
        for f in &fixtures {
            debug!(fixture = %f, "discovered fixture");
        }
        Ok(fixtures)
    }

    /// Count the number of fixtures that would be run
    pub fn count_tests(&self) -> Result<usize, std::io::Error> {
        Ok(self.discover()?.len())
    }

    /// Run all discovered fixtures.
    ///
    /// Discovery errors abort the run. Problems inside a single fixture
    /// become failed cases.
    pub fn run_all(&self) -> Result<TestResult, std::io::Error> {
        let start = Instant::now();
        let files = self.discover()?;

        let mut cases = Vec::new();
        for file in &files {
            cases.extend(self.run_one(Path::new(file)));
        }

        let result = TestResult {
            cases,
            duration: start.elapsed(),
        };
        info!(fixtures = files.len(), "{}", result.summary());
        Ok(result)
    }

    /// Register and run the tests of a single fixture
    pub fn run_one(&self, file: &Path) -> Vec<TestCaseResult> {
        let start = Instant::now();
        let path = file.to_string_lossy();
        let name = fixture_stem(&path, &self.config.suffixes).to_string();
        let options = SassOptions {
            load_paths: self.config.load_paths.clone(),
        };

        let mut collector = SuiteCollector::new(name.clone());
        if let Err(e) = run_sass(&mut collector, self.compiler.as_ref(), file, &options) {
            warn!(fixture = %path, error = %e, "fixture failed to load");
            return vec![TestCaseResult {
                name,
                file: file.to_path_buf(),
                passed: false,
                error: Some(e.to_string()),
                duration: start.elapsed(),
            }];
        }

        collector
            .finish()
            .into_cases()
            .into_iter()
            .map(|(case_name, check)| {
                let start = Instant::now();
                debug!(case = %case_name, "running");
                let (passed, error) = match check() {
                    Ok(()) => (true, None),
                    Err(e) => (false, Some(e.to_string())),
                };
                TestCaseResult {
                    name: case_name,
                    file: file.to_path_buf(),
                    passed,
                    error,
                    duration: start.elapsed(),
                }
            })
            .collect()
    }
}

/// Builder API for convenient test runner construction
pub struct TestRunnerBuilder {
    config: RunConfig,
    compiler: Option<Box<dyn StylesheetCompiler>>,
}

impl TestRunnerBuilder {
    /// Start building a runner for the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            config: RunConfig {
                dir: dir.into(),
                ..Default::default()
            },
            compiler: None,
        }
    }

    /// Only descend into subdirectories when `recursive` is true
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.config.recursive = recursive;
        self
    }

    /// Set the fixture name filter
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.config.filter = Some(filter.into());
        self
    }

    /// Replace the recognized fixture suffixes
    pub fn suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.config.suffixes = suffixes;
        self
    }

    /// Replace the stylesheet include paths
    pub fn load_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config.load_paths = paths;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Use a custom compiler
    pub fn compiler(mut self, compiler: Box<dyn StylesheetCompiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Build and return the runner
    pub fn build(self) -> TestRunner {
        match self.compiler {
            Some(compiler) => TestRunner::with_compiler(compiler, self.config),
            None => TestRunner::new(self.config),
        }
    }

    /// Build and run all tests
    pub fn run(self) -> Result<TestResult, std::io::Error> {
        self.build().run_all()
    }
}

/// Convenience function: create a runner builder for a directory
pub fn run(dir: impl Into<PathBuf>) -> TestRunnerBuilder {
    TestRunnerBuilder::new(dir)
}

/// Run fixtures and integrate with `#[test]` by panicking on failure.
///
/// Usage in cargo tests:
/// ```rust,ignore
/// #[test]
/// fn sass_fixtures() {
///     sass_testspec::run_and_assert("test");
/// }
/// ```
pub fn run_and_assert(dir: impl Into<PathBuf>) {
    let config = RunConfig {
        dir: dir.into(),
        verbose: std::env::var("SASS_TESTSPEC_VERBOSE").is_ok(),
        ..Default::default()
    };
    assert_result(TestRunner::new(config));
}

/// Like `run_and_assert` but with a prepared runner.
pub fn assert_result(runner: TestRunner) {
    let result = runner.run_all().expect("failed to discover fixtures");
    eprint!("{}", result.render(runner.config().verbose));

    if !result.all_passed() {
        panic!("{} test(s) failed", result.failed_count());
    }
}
