//! Plain-text rendering of result entries

use crate::crawler::ResultEntry;
use crate::{Result, SiftError};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Renders entries as blocks separated by blank lines
pub fn format_results(entries: &[ResultEntry]) -> String {
    entries
        .iter()
        .map(ResultEntry::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Prints every entry to stdout
pub fn print_results(entries: &[ResultEntry]) {
    println!("=== Full info ===\n");
    for entry in entries {
        println!("{}\n", entry);
    }
}

/// Writes entries to a new file
///
/// # Errors
///
/// * `SiftError::OutputPath` - the parent directory does not exist, or the
///   file already exists (it is never overwritten)
/// * `SiftError::Io` - any other write failure
///
/// # Returns
///
/// The number of entries written
pub fn write_results(path: &Path, entries: &[ResultEntry]) -> Result<usize> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    if !parent.is_dir() {
        return Err(SiftError::OutputPath(format!(
            "directory {} does not exist",
            parent.display()
        )));
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => SiftError::OutputPath(format!(
                "{} already exists, refusing to overwrite",
                path.display()
            )),
            _ => SiftError::Io(e),
        })?;

    let mut body = format_results(entries);
    if !body.is_empty() {
        body.push('\n');
    }
    file.write_all(body.as_bytes())?;

    tracing::info!("Wrote {} results to {}", entries.len(), path.display());
    Ok(entries.len())
}
