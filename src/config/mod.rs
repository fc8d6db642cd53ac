//! Configuration module for AskWeb
//!
//! Handles loading settings from YAML files and environment variables.
//! Settings are resolved once at startup and passed down explicitly.

mod settings;

pub use settings::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Find the settings file, checking `ASKWEB_SETTINGS_PATH` first
pub fn locate() -> Option<PathBuf> {
    let from_env = std::env::var("ASKWEB_SETTINGS_PATH").ok().map(PathBuf::from);

    from_env
        .into_iter()
        .chain(default_paths())
        .find(|path| path.exists())
}

/// Load settings from a file (or defaults) and apply environment overrides
pub fn load_from(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    settings.merge_env();
    Ok(settings)
}

fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/askweb/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("askweb/settings.yml"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_missing_file_fails() {
        let err = load_from(Some(Path::new("/nonexistent/askweb.yml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/askweb.yml"));
    }

    #[test]
    fn test_load_defaults() {
        let settings = load_from(None).unwrap();
        assert!(!settings.llm.model.is_empty());
    }
}
