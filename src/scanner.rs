// SPDX-License-Identifier: PMPL-1.0-or-later
//! Directory scanner for validating every markup file under a project.
//!
//! Walks directory trees in file-name order, skips the configured build and
//! vendor directories, and validates each markup file as one component.

use crate::config::ValidatorConfig;
use crate::error::{GuardError, Result};
use crate::finding::ValidationResult;
use crate::validator::validate;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File extensions holding component markup
pub const MARKUP_EXTENSIONS: &[&str] = &["html", "htm", "xhtml", "vue", "svelte"];

/// Whether a path looks like a markup file the validator understands
pub fn is_markup_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| MARKUP_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Component name for a file: its stem, falling back to the full name
pub fn component_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "component".to_string())
}

/// Validate every markup file under `dir`
pub fn scan_directory(dir: &Path, config: &ValidatorConfig) -> Result<Vec<ValidationResult>> {
    if !dir.is_dir() {
        return Err(GuardError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }

    info!("Scanning directory: {}", dir.display());
    let mut results = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden and excluded directories below the root
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_str().unwrap_or("");
            !name.starts_with('.') && !config.exclude.iter().any(|x| x == name)
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_markup_file(entry.path()) {
            continue;
        }

        match scan_file(entry.path(), config) {
            Ok(result) => results.push(result),
            Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    info!(
        "Scanned {} file(s), {} with issues",
        results.len(),
        results.iter().filter(|r| !r.is_passed()).count()
    );

    Ok(results)
}

/// Validate a single markup file
pub fn scan_file(path: &Path, config: &ValidatorConfig) -> Result<ValidationResult> {
    let content = std::fs::read_to_string(path)?;
    let file = path.display().to_string();
    debug!("Validating {}", file);
    Ok(validate(&content, &component_name(path), Some(&file), Some(config)))
}
