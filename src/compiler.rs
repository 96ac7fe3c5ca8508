//! Stylesheet compilation
//!
//! The collaborator only needs "turn this fixture into CSS". [`GrassCompiler`]
//! does that with [`grass`]; tests and embedders can plug in anything else.

use std::path::{Path, PathBuf};
use crate::error::SpecError;

/// Options handed to the compiler for every fixture
#[derive(Debug, Clone)]
pub struct SassOptions {
    /// Directories searched when resolving `@use` / `@import`
    pub load_paths: Vec<PathBuf>,
}

impl Default for SassOptions {
    fn default() -> Self {
        Self {
            load_paths: vec![PathBuf::from(".")],
        }
    }
}

/// Compiles a stylesheet file to CSS
pub trait StylesheetCompiler {
    fn compile(&self, path: &Path, options: &SassOptions) -> Result<String, SpecError>;
}

/// Compiler backed by `grass`
#[derive(Debug, Default, Clone, Copy)]
pub struct GrassCompiler;

impl StylesheetCompiler for GrassCompiler {
    fn compile(&self, path: &Path, options: &SassOptions) -> Result<String, SpecError> {
        let grass_options = grass::Options::default().load_paths(options.load_paths.as_slice());
        grass::from_path(path, &grass_options)
            .map_err(|e| SpecError::compile(e.to_string()).with_file(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_load_paths() {
        assert_eq!(SassOptions::default().load_paths, vec![PathBuf::from(".")]);
    }

    #[test]
    fn test_grass_compiles_fixture() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.test.scss");
        std::fs::write(&file, ".a { .b { color: red; } }").unwrap();

        let css = GrassCompiler.compile(&file, &SassOptions::default()).unwrap();
        assert!(css.contains(".a .b"));
    }

    #[test]
    fn test_grass_resolves_load_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let lib = tmp.path().join("lib");
        std::fs::create_dir(&lib).unwrap();
        std::fs::write(lib.join("_vars.scss"), "$brand: blue;").unwrap();
        let file = tmp.path().join("a.test.scss");
        std::fs::write(&file, "@import 'vars';\n.x { color: $brand; }").unwrap();

        let options = SassOptions { load_paths: vec![lib] };
        let css = GrassCompiler.compile(&file, &options).unwrap();
        assert!(css.contains("blue"));
    }

    #[test]
    fn test_grass_reports_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("bad.test.scss");
        std::fs::write(&file, ".x { color: $missing; }").unwrap();

        let err = GrassCompiler.compile(&file, &SassOptions::default()).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::CompileFailed);
        assert!(err.file.unwrap().ends_with("bad.test.scss"));
    }
}
