//! SQL source discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

/// Finds every `.sql` file under `dir`, recursively.
///
/// The list is sorted by path so repeated runs process files in the same
/// order regardless of directory iteration order.
///
/// # Errors
///
/// Fails when a directory cannot be read.
pub fn discover_sql_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|source| CliError::io(dir, source))?;
    for entry in entries {
        let entry = entry.map_err(|source| CliError::io(dir, source))?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    Ok(())
}
