//! sass-testspec: discover SASS/SCSS test fixtures and run them as test cases
//!
//! Fixtures are stylesheet files whose name ends in `.test.scss` or
//! `.test.sass`. Each one is compiled and the report its assertions leave in
//! the compiled CSS (True's comment format) is turned into `describe`/`it`
//! registrations, which the runner then executes.
//!
//! # Pipeline
//!
//! | Stage | Item |
//! |-------|------|
//! | walk the fixture directory | [`discover`] |
//! | keep fixture files only | [`FixtureFilter`] |
//! | compile and register | [`run_sass`] |
//! | execute and summarize | [`TestRunner`] |
//!
//! # Usage
//!
//! ```rust,ignore
//! #[test]
//! fn sass_fixtures() {
//!     sass_testspec::run_and_assert("test");
//! }
//! ```

mod locator;
mod filter;
mod registrar;
mod compiler;
mod report;
mod sass;
mod runner;
mod error;

pub use locator::discover;
pub use filter::{FixtureFilter, DEFAULT_SUFFIXES, file_name, fixture_stem};
pub use registrar::{Registrar, SuiteCollector, Suite, Case, Check};
pub use compiler::{StylesheetCompiler, GrassCompiler, SassOptions};
pub use report::{parse_report, Report, ReportModule, ReportTest, Assertion};
pub use sass::{run_sass, describe_failure};
pub use runner::{TestRunner, RunConfig, TestResult, TestCaseResult, TestRunnerBuilder};
pub use error::{SpecError, ErrorKind};

// Convenience functions for cargo test integration
pub use runner::{run_and_assert, assert_result, run};
