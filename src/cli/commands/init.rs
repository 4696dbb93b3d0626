use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use colored::Colorize;
use walkdir::WalkDir;

use super::super::exit_status::ExitStatus;
use super::super::report::SUCCESS_MARK;
use crate::config::{CONFIG_FILE_NAME, Config};

/// How deep to look for `install.xml` below the current directory.
const SPEC_SEARCH_DEPTH: usize = 4;

/// Java source roots tried in order; the first existing one is used.
const SOURCE_CANDIDATES: &[&str] = &["src/main/java", "src"];

pub fn init() -> Result<ExitStatus> {
    init_in(Path::new("."))
}

pub fn init_in(dir: &Path) -> Result<ExitStatus> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        eprintln!("Error: {} already exists", CONFIG_FILE_NAME);
        return Ok(ExitStatus::Failure);
    }

    let config = detect_config(dir);
    let json = serde_json::to_string_pretty(&config).context("Failed to generate config.")?;
    fs::write(&config_path, json)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", CONFIG_FILE_NAME).green()
    );
    if config.specs_path != Config::default().specs_path {
        println!("  specsPath: {}", config.specs_path);
    }
    if !config.sources.is_empty() {
        println!("  sources: {}", config.sources.join(", "));
    }

    Ok(ExitStatus::Success)
}

/// Default configuration, with the specs directory and source root filled
/// in when they can be found under `dir`.
pub fn detect_config(dir: &Path) -> Config {
    let mut config = Config::default();

    if let Some(specs) = find_install_spec_dir(dir) {
        config.specs_path = specs;
    }
    if let Some(source) = SOURCE_CANDIDATES
        .iter()
        .find(|candidate| dir.join(candidate).is_dir())
    {
        config.sources = vec![source.to_string()];
    }

    config
}

fn find_install_spec_dir(dir: &Path) -> Option<String> {
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(SPEC_SEARCH_DEPTH)
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            entry.depth() == 0 || !(name.starts_with('.') || name == "target" || name == "node_modules")
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == "install.xml")
        .filter_map(|entry| entry.path().parent().map(Path::to_path_buf))
        .collect();
    // Shallowest first, then by name.
    found.sort_by_key(|path| (path.components().count(), path.clone()));

    let specs = found.into_iter().next()?;
    let relative = specs.strip_prefix(dir).unwrap_or(&specs);
    if relative.as_os_str().is_empty() {
        Some(".".to_string())
    } else {
        Some(relative.to_string_lossy().replace('\\', "/"))
    }
}
