//! Fixture errors

use std::fmt;

/// The kind of fixture error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Filesystem access failed
    Io,
    /// The stylesheet did not compile
    CompileFailed,
    /// An assertion inside a fixture failed
    AssertionFailed,
    /// The compiled report could not be understood
    ReportSyntax,
}

/// An error with optional fixture context
#[derive(Debug)]
pub struct SpecError {
    pub kind: ErrorKind,
    pub message: String,
    pub file: Option<String>,
}

impl SpecError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn compile(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::CompileFailed, msg)
    }

    pub fn assertion(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::AssertionFailed, msg)
    }

    pub fn report(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReportSyntax, msg)
    }
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}: ", file)?;
        }
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SpecError {}

impl From<std::io::Error> for SpecError {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, e.to_string())
    }
}
