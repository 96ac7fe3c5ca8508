//! Fixture registration
//!
//! Compiles one fixture, reads its report and registers a `describe` per
//! module and an `it` per test.

use std::path::Path;
use similar::TextDiff;
use tracing::debug;
use crate::compiler::{SassOptions, StylesheetCompiler};
use crate::error::SpecError;
use crate::registrar::Registrar;
use crate::report::{parse_report, Assertion, ReportModule, ReportTest};

/// Compile `path` and register every test it reports with `registrar`.
///
/// Compilation and report errors are returned without registering anything.
/// A fixture that reports no tests registers nothing and is not an error.
pub fn run_sass(
    registrar: &mut dyn Registrar,
    compiler: &dyn StylesheetCompiler,
    path: &Path,
    options: &SassOptions,
) -> Result<(), SpecError> {
    let css = compiler.compile(path, options)?;
    let report = parse_report(&css).map_err(|e| e.with_file(path.display().to_string()))?;
    debug!(file = %path.display(), tests = report.test_count(), "parsed fixture report");

    register_tests(registrar, &report.tests);
    for module in &report.modules {
        register_module(registrar, module);
    }
    Ok(())
}

fn register_module(registrar: &mut dyn Registrar, module: &ReportModule) {
    registrar.describe(&module.name, &mut |r| {
        register_tests(r, &module.tests);
        for nested in &module.modules {
            register_module(r, nested);
        }
    });
}

fn register_tests(registrar: &mut dyn Registrar, tests: &[ReportTest]) {
    for test in tests {
        let test = test.clone();
        let name = test.name.clone();
        registrar.it(&name, Box::new(move || verdict(&test)));
    }
}

fn verdict(test: &ReportTest) -> Result<(), SpecError> {
    match test.failure() {
        None => Ok(()),
        Some(failed) => Err(SpecError::assertion(describe_failure(failed))),
    }
}

/// Human readable message for a failed assertion, with a diff when both sides are known
pub fn describe_failure(a: &Assertion) -> String {
    let mut msg = if a.assert_type.is_empty() {
        a.description.clone()
    } else {
        format!("[{}] {}", a.assert_type, a.description)
    };
    if let (Some(output), Some(expected)) = (&a.output, &a.expected) {
        let expected = format!("{}\n", expected);
        let output = format!("{}\n", output);
        let diff = TextDiff::from_lines(&expected, &output);
        msg.push('\n');
        msg.push_str(&diff.unified_diff().header("expected", "output").to_string());
    }
    if let Some(ref details) = a.details {
        msg.push_str(&format!("\ndetails: {}", details));
    }
    msg
}
