use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning source roots.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Existing source root directories, in configuration order.
    pub roots: Vec<PathBuf>,
    /// Java files under the roots, minus ignored paths.
    pub files: BTreeSet<PathBuf>,
    pub skipped_count: usize,
}

pub fn scan_source_files(
    base_dir: &Path,
    sources: &[String],
    ignore_patterns: &[String],
) -> ScanResult {
    let mut result = ScanResult::default();

    // Separate ignore patterns into literal paths and glob patterns
    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();
    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => tracing::warn!("invalid ignore pattern '{}': {}", p, e),
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    for source in sources {
        if is_glob_pattern(source) {
            // Glob mode: expand pattern to matching directories
            let full_pattern = base_dir.join(source);
            match glob(&full_pattern.to_string_lossy()) {
                Ok(entries) => result
                    .roots
                    .extend(entries.flatten().filter(|entry| entry.is_dir())),
                Err(e) => tracing::warn!("invalid source pattern '{}': {}", source, e),
            }
        } else {
            let path = base_dir.join(source);
            if path.is_dir() {
                result.roots.push(path);
            } else {
                tracing::warn!("source root does not exist: {}", path.display());
            }
        }
    }

    for root in &result.roots {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    result.skipped_count += 1;
                    tracing::warn!("cannot access path: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }
            let path_str = path.to_string_lossy();
            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if entry.file_type().is_file() && is_java_file(path) {
                result.files.insert(path.to_path_buf());
            }
        }
    }

    tracing::debug!(
        roots = result.roots.len(),
        files = result.files.len(),
        "scanned source roots"
    );
    result
}

fn is_java_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("java"))
}
