//! Fixture filter
//!
//! Narrows a discovery result down to stylesheet test fixtures by looking at
//! the final path segment only.

/// Suffixes recognized as fixtures unless configured otherwise
pub const DEFAULT_SUFFIXES: &[&str] = &[".test.scss", ".test.sass"];

/// Keeps paths whose file name ends with a recognized suffix.
///
/// Matching is case-sensitive: `a.TEST.SCSS` is not a fixture.
#[derive(Debug, Clone)]
pub struct FixtureFilter {
    suffixes: Vec<String>,
    name_contains: Option<String>,
}

impl Default for FixtureFilter {
    fn default() -> Self {
        Self::with_suffixes(DEFAULT_SUFFIXES.iter().map(|s| s.to_string()))
    }
}

impl FixtureFilter {
    /// Recognize exactly the given suffixes
    pub fn with_suffixes(suffixes: impl IntoIterator<Item = String>) -> Self {
        Self {
            suffixes: suffixes.into_iter().collect(),
            name_contains: None,
        }
    }

    /// Additionally require the file name to contain `pattern`
    pub fn name_contains(mut self, pattern: impl Into<String>) -> Self {
        self.name_contains = Some(pattern.into());
        self
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Whether `path` names a fixture
    pub fn matches(&self, path: &str) -> bool {
        let name = file_name(path);
        if !self.suffixes.iter().any(|s| name.ends_with(s.as_str())) {
            return false;
        }
        match self.name_contains {
            Some(ref pattern) => name.contains(pattern.as_str()),
            None => true,
        }
    }

    /// Drop non-fixtures, keeping the original order
    pub fn apply(&self, paths: Vec<String>) -> Vec<String> {
        paths.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Final `/`-separated segment of a path
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Fixture name with the recognized suffix removed (`math.test.scss` -> `math`)
pub fn fixture_stem<'a>(path: &'a str, suffixes: &[String]) -> &'a str {
    let name = file_name(path);
    suffixes
        .iter()
        .find_map(|s| name.strip_suffix(s.as_str()))
        .unwrap_or(name)
}
