//! Compiled fixture report parser
//!
//! A fixture written against the True testing library compiles to CSS whose
//! comments describe what happened:
//!
//! ```text
//! /* # Module: Color */
//! /* Test: lighten */
//! /*   ✔ lightens by 10% */
//! /*   ✖ FAILED: [assert-equal] mixes evenly */
//! /*     - Output: [color] #800080 */
//! /*     - Expected: [color] purple */
//! /* ASSERT: emits a rule */
//! /* OUTPUT */
//! .a { color: red; }
//! /* END_OUTPUT */
//! /* EXPECTED */
//! .a { color: red; }
//! /* END_EXPECTED */
//! /* END_ASSERT */
//! ```
//!
//! Extra `#` characters nest modules (`## Module: Mix` sits under the closest
//! shallower module). Summary lines and other comments are ignored.

use regex::Regex;
use crate::error::SpecError;

/// One assertion outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    pub description: String,
    /// `assert-equal`, `assert-true`, `assert`, `contains`, ...
    pub assert_type: String,
    pub passed: bool,
    pub output: Option<String>,
    pub expected: Option<String>,
    pub details: Option<String>,
}

impl Assertion {
    fn passing(assert_type: &str, description: &str) -> Self {
        Self {
            description: description.to_string(),
            assert_type: assert_type.to_string(),
            passed: true,
            output: None,
            expected: None,
            details: None,
        }
    }
}

/// A test and its assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTest {
    pub name: String,
    pub assertions: Vec<Assertion>,
}

impl ReportTest {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            assertions: Vec::new(),
        }
    }

    /// First failing assertion, if any
    pub fn failure(&self) -> Option<&Assertion> {
        self.assertions.iter().find(|a| !a.passed)
    }

    pub fn passed(&self) -> bool {
        self.failure().is_none()
    }
}

/// A module with its tests and submodules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportModule {
    pub name: String,
    pub tests: Vec<ReportTest>,
    pub modules: Vec<ReportModule>,
}

impl ReportModule {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tests: Vec::new(),
            modules: Vec::new(),
        }
    }

    pub fn test_count(&self) -> usize {
        self.tests.len() + self.modules.iter().map(ReportModule::test_count).sum::<usize>()
    }
}

/// Everything a compiled fixture reported
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Tests outside any module
    pub tests: Vec<ReportTest>,
    pub modules: Vec<ReportModule>,
}

impl Report {
    pub fn test_count(&self) -> usize {
        self.tests.len() + self.modules.iter().map(ReportModule::test_count).sum::<usize>()
    }
}

/// A piece of compiled CSS: either a comment body or plain CSS text
#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Comment(&'a str),
    Css(&'a str),
}

fn split_chunks(css: &str) -> Result<Vec<Chunk<'_>>, SpecError> {
    let bytes = css.as_bytes();
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut i = 0;
    // `/*` inside a quoted string does not open a comment
    let mut quote: Option<u8> = None;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'"' | b'\'' => {
                quote = Some(b);
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                if i > start {
                    chunks.push(Chunk::Css(&css[start..i]));
                }
                let body = i + 2;
                let end = css[body..]
                    .find("*/")
                    .ok_or_else(|| SpecError::report("unterminated comment in compiled CSS"))?;
                chunks.push(Chunk::Comment(&css[body..body + end]));
                i = body + end + 2;
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < css.len() {
        chunks.push(Chunk::Css(&css[start..]));
    }
    Ok(chunks)
}

struct Patterns {
    module: Regex,
    test: Regex,
    pass: Regex,
    fail: Regex,
    detail: Regex,
    assert: Regex,
}

impl Patterns {
    fn new() -> Result<Self, SpecError> {
        let build = |p: &str| Regex::new(p).map_err(|e| SpecError::report(e.to_string()));
        Ok(Self {
            module: build(r"^(#+)\s*Module:\s*(.*)$")?,
            test: build(r"^Test:\s*(.*)$")?,
            pass: build(r"^✔\s*(?:\[([^\]]+)\]\s*)?(.*)$")?,
            fail: build(r"^✖\s*FAILED:\s*(?:\[([^\]]+)\]\s*)?(.*)$")?,
            detail: build(r"^-\s*(Output|Expected|Details):\s*(.*)$")?,
            assert: build(r"^ASSERT:?\s*(.*)$")?,
        })
    }
}

/// Which CSS buffer plain text currently flows into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    None,
    Output,
    Expected,
}

/// An `ASSERT` block being read
struct Block {
    description: String,
    output: String,
    expected: String,
    contains: bool,
}

impl Block {
    fn finish(self) -> Assertion {
        let output = normalize_css(&self.output);
        let expected = normalize_css(&self.expected);
        let (assert_type, passed) = if self.contains {
            ("contains", contains_rules(&self.output, &self.expected))
        } else {
            ("assert", output == expected)
        };
        Assertion {
            description: self.description,
            assert_type: assert_type.to_string(),
            passed,
            output: Some(output),
            expected: Some(expected),
            details: None,
        }
    }
}

/// A rule block: selector path (at-rules included, joined with ` | `) and its declarations
#[derive(Debug, PartialEq, Eq)]
struct Rule {
    selector: String,
    declarations: Vec<String>,
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split flat or nested CSS into rule blocks
fn css_rules(css: &str) -> Vec<Rule> {
    let mut rules = Vec::new();
    let mut open: Vec<Rule> = Vec::new();
    let mut buf = String::new();
    for c in css.chars() {
        match c {
            '{' => {
                let selector = collapse(&buf);
                let selector = match open.last() {
                    Some(parent) => format!("{} | {}", parent.selector, selector),
                    None => selector,
                };
                open.push(Rule { selector, declarations: Vec::new() });
                buf.clear();
            }
            ';' | '}' => {
                let decl = collapse(&buf);
                buf.clear();
                if !decl.is_empty() {
                    if let Some(rule) = open.last_mut() {
                        rule.declarations.push(decl);
                    }
                }
                if c == '}' {
                    if let Some(rule) = open.pop() {
                        rules.push(rule);
                    }
                }
            }
            _ => buf.push(c),
        }
    }
    rules
}

/// Every expected rule has a same-selector rule in `output` holding all its declarations
fn contains_rules(output: &str, expected: &str) -> bool {
    let have = css_rules(output);
    css_rules(expected).iter().all(|want| {
        have.iter().any(|rule| {
            rule.selector == want.selector
                && want.declarations.iter().all(|d| rule.declarations.contains(d))
        })
    })
}

/// Trimmed non-empty lines of a CSS fragment
fn normalize_css(css: &str) -> String {
    css.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the module tree while lines stream in
struct Builder {
    report: Report,
    /// Open modules with their `#` depth, innermost last
    modules: Vec<(usize, ReportModule)>,
    test: Option<ReportTest>,
}

impl Builder {
    fn new() -> Self {
        Self {
            report: Report::default(),
            modules: Vec::new(),
            test: None,
        }
    }

    fn close_test(&mut self) {
        if let Some(test) = self.test.take() {
            match self.modules.last_mut() {
                Some((_, module)) => module.tests.push(test),
                None => self.report.tests.push(test),
            }
        }
    }

    fn close_module(&mut self) {
        if let Some((_, module)) = self.modules.pop() {
            match self.modules.last_mut() {
                Some((_, parent)) => parent.modules.push(module),
                None => self.report.modules.push(module),
            }
        }
    }

    fn open_module(&mut self, depth: usize, name: &str) {
        self.close_test();
        while self.modules.last().map_or(false, |(d, _)| *d >= depth) {
            self.close_module();
        }
        self.modules.push((depth, ReportModule::new(name)));
    }

    fn open_test(&mut self, name: &str) {
        self.close_test();
        self.test = Some(ReportTest::new(name));
    }

    /// Current test, opening an unnamed one for stray assertions
    fn test_mut(&mut self) -> &mut ReportTest {
        self.test.get_or_insert_with(|| ReportTest::new(""))
    }

    fn finish(mut self) -> Report {
        self.close_test();
        while !self.modules.is_empty() {
            self.close_module();
        }
        self.report
    }
}

/// Parse the comment report out of compiled fixture CSS
pub fn parse_report(css: &str) -> Result<Report, SpecError> {
    let patterns = Patterns::new()?;
    let mut builder = Builder::new();
    let mut block: Option<Block> = None;
    let mut capture = Capture::None;
    // failing assertion whose `- Output:` lines may still follow
    let mut open_failure = false;

    let css = css.trim_start_matches('\u{feff}');
    for chunk in split_chunks(css)? {
        let comment = match chunk {
            Chunk::Css(text) => {
                if let Some(ref mut b) = block {
                    match capture {
                        Capture::Output => b.output.push_str(text),
                        Capture::Expected => b.expected.push_str(text),
                        Capture::None => {}
                    }
                }
                continue;
            }
            Chunk::Comment(text) => text,
        };

        for line in comment.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if let Some(b) = block.as_mut() {
                match line {
                    "OUTPUT" => capture = Capture::Output,
                    "EXPECTED" => capture = Capture::Expected,
                    "CONTAINS" => {
                        b.contains = true;
                        capture = Capture::Expected;
                    }
                    "END_OUTPUT" | "END_EXPECTED" | "END_CONTAINS" => capture = Capture::None,
                    "END_ASSERT" => {
                        if let Some(done) = block.take() {
                            builder.test_mut().assertions.push(done.finish());
                        }
                        capture = Capture::None;
                    }
                    _ => {}
                }
                continue;
            }

            if let Some(caps) = patterns.module.captures(line) {
                open_failure = false;
                builder.open_module(caps[1].len(), caps[2].trim());
            } else if let Some(caps) = patterns.test.captures(line) {
                open_failure = false;
                builder.open_test(caps[1].trim());
            } else if let Some(caps) = patterns.pass.captures(line) {
                open_failure = false;
                let kind = caps.get(1).map_or("", |m| m.as_str());
                builder.test_mut().assertions.push(Assertion::passing(kind, caps[2].trim()));
            } else if let Some(caps) = patterns.fail.captures(line) {
                open_failure = true;
                let kind = caps.get(1).map_or("", |m| m.as_str());
                let mut failed = Assertion::passing(kind, caps[2].trim());
                failed.passed = false;
                builder.test_mut().assertions.push(failed);
            } else if let Some(caps) = patterns.assert.captures(line) {
                open_failure = false;
                block = Some(Block {
                    description: caps[1].trim().to_string(),
                    output: String::new(),
                    expected: String::new(),
                    contains: false,
                });
            } else if let Some(caps) = patterns.detail.captures(line) {
                if !open_failure {
                    continue;
                }
                let value = Some(caps[2].trim().to_string());
                if let Some(last) = builder.test_mut().assertions.last_mut() {
                    match &caps[1] {
                        "Output" => last.output = value,
                        "Expected" => last.expected = value,
                        _ => last.details = value,
                    }
                }
            }
        }
    }

    if let Some(b) = block {
        return Err(SpecError::report(format!(
            "ASSERT block '{}' is missing END_ASSERT",
            b.description
        )));
    }
    Ok(builder.finish())
}
