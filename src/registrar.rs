//! Registration surface
//!
//! The `describe`/`it` pair a stylesheet collaborator uses to hand test
//! cases to the runner. `SuiteCollector` records them into a tree that the
//! runner executes later.

use crate::error::SpecError;

/// Deferred body of a single test case
pub type Check = Box<dyn FnOnce() -> Result<(), SpecError>>;

/// Receives groups and test cases from a collaborator
pub trait Registrar {
    /// Open a named group; everything registered inside `body` belongs to it
    fn describe(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn Registrar));

    /// Register one test case in the current group
    fn it(&mut self, name: &str, check: Check);
}

/// A registered test case
pub struct Case {
    pub name: String,
    pub check: Check,
}

impl std::fmt::Debug for Case {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Case").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A group of cases and nested groups
#[derive(Debug, Default)]
pub struct Suite {
    pub name: String,
    pub suites: Vec<Suite>,
    pub cases: Vec<Case>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Total number of cases in this suite and below
    pub fn case_count(&self) -> usize {
        self.cases.len() + self.suites.iter().map(Suite::case_count).sum::<usize>()
    }

    /// Flatten into `(qualified name, check)` pairs, cases before nested suites.
    ///
    /// Names are joined with ` > `; an empty suite name adds no segment.
    pub fn into_cases(self) -> Vec<(String, Check)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(self, prefix: &str, out: &mut Vec<(String, Check)>) {
        let prefix = join_name(prefix, &self.name);
        for case in self.cases {
            out.push((join_name(&prefix, &case.name), case.check));
        }
        for suite in self.suites {
            suite.flatten_into(&prefix, out);
        }
    }
}

fn join_name(prefix: &str, name: &str) -> String {
    match (prefix.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{} > {}", prefix, name),
    }
}

/// A `Registrar` that builds a `Suite` tree
pub struct SuiteCollector {
    stack: Vec<Suite>,
}

impl SuiteCollector {
    /// Collect into a root suite called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            stack: vec![Suite::new(name)],
        }
    }

    /// Finish collection and return the root suite
    pub fn finish(mut self) -> Suite {
        // unbalanced stacks cannot happen through the trait, but fold anyway
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack.pop().unwrap_or_default()
    }

    fn close(&mut self) {
        if let Some(done) = self.stack.pop() {
            if let Some(parent) = self.stack.last_mut() {
                parent.suites.push(done);
            } else {
                self.stack.push(done);
            }
        }
    }
}

impl Registrar for SuiteCollector {
    fn describe(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn Registrar)) {
        self.stack.push(Suite::new(name));
        body(self);
        self.close();
    }

    fn it(&mut self, name: &str, check: Check) {
        if let Some(current) = self.stack.last_mut() {
            current.cases.push(Case {
                name: name.to_string(),
                check,
            });
        }
    }
}
