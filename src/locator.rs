//! Test fixture locator
//!
//! Walks a directory and returns every non-directory entry below it. Paths
//! are built as `<parent>/<name>` and come back in directory-listing order,
//! depth-first, with a directory's contents spliced in where the directory
//! was listed. Nothing is sorted and nothing is cached.

use std::collections::HashSet;
use std::path::PathBuf;
use tracing::trace;

/// List the files under `root_dir`.
///
/// When `recursive` is false only the immediate entries are considered and
/// subdirectories are skipped. Any filesystem error (missing root, denied
/// permission, an entry vanishing between listing and stat) aborts the walk.
pub fn discover(root_dir: &str, recursive: bool) -> std::io::Result<Vec<String>> {
    let mut files = Vec::new();
    let mut ancestors = HashSet::new();
    if recursive {
        ancestors.insert(std::fs::canonicalize(root_dir)?);
    }
    walk(root_dir, recursive, &mut ancestors, &mut files)?;
    Ok(files)
}

fn walk(
    dir: &str,
    recursive: bool,
    ancestors: &mut HashSet<PathBuf>,
    files: &mut Vec<String>,
) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let path = format!("{}/{}", dir, name.to_string_lossy());

        // stat, not lstat: a link to a directory counts as a directory
        if std::fs::metadata(&path)?.is_dir() {
            if !recursive {
                continue;
            }
            // only a directory that is its own ancestor is cut; siblings
            // reached through links are walked again
            let real = std::fs::canonicalize(&path)?;
            if ancestors.contains(&real) {
                trace!(path = %path, "skipping symlink cycle");
                continue;
            }
            ancestors.insert(real.clone());
            let walked = walk(&path, recursive, ancestors, files);
            ancestors.remove(&real);
            walked?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}
