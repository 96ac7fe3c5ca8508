//! Integration tests: discovery, filtering and fixture runs through the public API
//!
//! Usage:
//!   cargo test --test integration
//!   SASS_TESTSPEC_VERBOSE=1 cargo test --test integration

use std::fs;
use std::path::{Path, PathBuf};
use sass_testspec::{
    discover, run, run_sass, FixtureFilter, GrassCompiler, SassOptions, SpecError,
    StylesheetCompiler, SuiteCollector,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "").unwrap();
}

#[test]
fn fixtures_all() {
    sass_testspec::run_and_assert(fixtures_dir());
}

#[test]
fn fixtures_are_discovered() {
    let result = run(fixtures_dir()).run().unwrap();
    let mut names: Vec<&str> = result.cases.iter().map(|c| c.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec![
        "brand > Color > brand",
        "math > Math > double",
        "math > Math > emits a rule",
    ]);
}

#[test]
fn recursive_discovery_with_suffix_filter() {
    let tmp = tempfile::tempdir().unwrap();
    touch(tmp.path(), "a.test.scss");
    touch(tmp.path(), "b.scss");
    touch(tmp.path(), "sub/c.test.sass");
    let root = tmp.path().to_str().unwrap();

    let mut found = FixtureFilter::default().apply(discover(root, true).unwrap());
    found.sort();
    assert_eq!(found, vec![
        format!("{}/a.test.scss", root),
        format!("{}/sub/c.test.sass", root),
    ]);
}

#[test]
fn recursive_discovery_returns_every_file_once() {
    let tmp = tempfile::tempdir().unwrap();
    let files = ["x", "d1/y", "d1/d2/z", "d3/w.test.scss", "d3/d4/d5/v"];
    for f in files {
        touch(tmp.path(), f);
    }
    fs::create_dir(tmp.path().join("empty")).unwrap();
    let root = tmp.path().to_str().unwrap();

    let mut found = discover(root, true).unwrap();
    found.sort();
    let mut expected: Vec<String> = files.iter().map(|f| format!("{}/{}", root, f)).collect();
    expected.sort();
    assert_eq!(found, expected);
}

#[test]
fn flat_discovery_only_immediate_files() {
    let tmp = tempfile::tempdir().unwrap();
    touch(tmp.path(), "top.test.scss");
    touch(tmp.path(), "nested/inner.test.scss");
    let root = tmp.path().to_str().unwrap();

    assert_eq!(discover(root, false).unwrap(), vec![format!("{}/top.test.scss", root)]);
}

#[test]
fn missing_root_registers_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("gone");
    assert!(discover(missing.to_str().unwrap(), true).is_err());
    assert!(run(&missing).run().is_err());
}

#[test]
fn compile_failure_becomes_failed_case() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("bad.test.scss"), ".x { color: $undefined; }").unwrap();

    let result = run(tmp.path()).run().unwrap();
    assert_eq!(result.cases.len(), 1);
    assert_eq!(result.failed_count(), 1);
    assert!(result.cases[0].error.as_deref().unwrap().contains("bad.test.scss"));
}

#[test]
fn load_paths_reach_the_compiler() {
    struct Recording(std::cell::RefCell<Vec<PathBuf>>);

    impl StylesheetCompiler for Recording {
        fn compile(&self, _path: &Path, options: &SassOptions) -> Result<String, SpecError> {
            self.0.borrow_mut().extend(options.load_paths.iter().cloned());
            Ok(String::new())
        }
    }

    let compiler = Recording(Default::default());
    let options = SassOptions { load_paths: vec![PathBuf::from("vendor/styles")] };
    let mut collector = SuiteCollector::new("x");
    run_sass(&mut collector, &compiler, Path::new("x.test.scss"), &options).unwrap();

    assert_eq!(compiler.0.into_inner(), vec![PathBuf::from("vendor/styles")]);
    assert_eq!(collector.finish().case_count(), 0);
}

#[test]
fn grass_runs_failing_fixture() {
    let tmp = tempfile::tempdir().unwrap();
    let fixture = tmp.path().join("size.test.scss");
    fs::write(&fixture, "\
/* # Module: Size */
/* Test: width */
/* ASSERT: width matches */
/* OUTPUT */
.a { width: 1px + 1px; }
/* END_OUTPUT */
/* EXPECTED */
.a { width: 3px; }
/* END_EXPECTED */
/* END_ASSERT */
").unwrap();

    let mut collector = SuiteCollector::new("size");
    run_sass(&mut collector, &GrassCompiler, &fixture, &SassOptions::default()).unwrap();
    let mut cases = collector.finish().into_cases();
    assert_eq!(cases.len(), 1);
    let (name, check) = cases.remove(0);
    assert_eq!(name, "size > Size > width");
    let err = check().unwrap_err();
    assert!(err.message.contains("width: 2px"));
    assert!(err.message.contains("width: 3px"));
}

#[test]
fn grass_contains_needs_matching_rule() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("layout.test.scss"), "\
/* # Module: Layout */
/* Test: spacing */
/* ASSERT: margin sits on .a */
/* OUTPUT */
.b { margin: 0; }
.a { color: red; }
/* END_OUTPUT */
/* CONTAINS */
.a { margin: 0; }
/* END_CONTAINS */
/* END_ASSERT */
").unwrap();

    let result = run(tmp.path()).run().unwrap();
    assert_eq!(result.cases.len(), 1);
    assert_eq!(result.cases[0].name, "layout > Layout > spacing");
    assert!(!result.cases[0].passed);
}

#[cfg(unix)]
#[test]
fn linked_fixture_directory_is_reported_under_both_paths() {
    let tmp = tempfile::tempdir().unwrap();
    touch(tmp.path(), "shared/grid.test.scss");
    std::os::unix::fs::symlink(tmp.path().join("shared"), tmp.path().join("alias")).unwrap();
    let root = tmp.path().to_str().unwrap();

    let mut found = FixtureFilter::default().apply(discover(root, true).unwrap());
    found.sort();
    assert_eq!(found, vec![
        format!("{}/alias/grid.test.scss", root),
        format!("{}/shared/grid.test.scss", root),
    ]);
}
