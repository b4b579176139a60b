//! Configuration loading and management.

use crate::cli::Args;
use au_diagnostics::ValidationSettings;
use globset::{Glob, GlobSet, GlobSetBuilder};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "au-check.json";

/// Contents of `au-check.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    /// Run attribute validation.
    #[serde(default)]
    pub validation: Option<bool>,
    /// File extensions to check, with the leading dot.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    /// Ignore patterns (glob).
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl FileConfig {
    /// Find `au-check.json` in `dir` or any of its parents.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        let mut current = dir;
        loop {
            let candidate = current.join(CONFIG_FILE);
            if candidate.exists() {
                return Some(candidate);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid configuration in {}", path.display()))
    }
}

/// Configuration for au-check.
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace root directory.
    pub workspace: PathBuf,
    /// Path to the configuration file, if one was found.
    pub config_path: Option<PathBuf>,
    /// Validation settings handed to the validator.
    pub settings: ValidationSettings,
    /// File extensions to process.
    pub extensions: Vec<String>,
    /// Ignore patterns.
    pub ignore_patterns: Vec<String>,
    ignore: GlobSet,
}

impl Config {
    /// Load configuration from CLI arguments and workspace.
    pub fn load(workspace: &Path, args: &Args) -> Result<Self> {
        let config_path = args
            .config
            .clone()
            .or_else(|| FileConfig::find(workspace));

        let file = match &config_path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let settings = ValidationSettings {
            validation: !args.no_validate && file.validation.unwrap_or(true),
        };

        let extensions = file
            .extensions
            .unwrap_or_else(|| vec![".html".to_string(), ".au".to_string()]);

        let mut ignore_patterns = vec![
            "**/node_modules/**".to_string(),
            "**/dist/**".to_string(),
            "**/.git/**".to_string(),
        ];
        ignore_patterns.extend(file.ignore);
        ignore_patterns.extend(args.ignore.iter().cloned());

        let mut builder = GlobSetBuilder::new();
        for pattern in &ignore_patterns {
            let glob = Glob::new(pattern)
                .into_diagnostic()
                .wrap_err_with(|| format!("Invalid ignore pattern '{}'", pattern))?;
            builder.add(glob);
        }
        let ignore = builder.build().into_diagnostic()?;

        tracing::debug!(
            config = ?config_path,
            validation = settings.validation,
            extensions = ?extensions,
            "loaded configuration"
        );

        Ok(Self {
            workspace: workspace.to_path_buf(),
            config_path,
            settings,
            extensions,
            ignore_patterns,
            ignore,
        })
    }

    /// Check if a file should be processed.
    pub fn should_process(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        if !self.extensions.iter().any(|e| e == &ext) {
            return false;
        }

        !self.ignore.is_match(path)
    }

    /// Check if a change to `path` should trigger a re-check in watch mode.
    /// Companion `.ts`/`.js` files count as well as templates.
    pub fn is_watched(&self, path: &Path) -> bool {
        let is_script = path
            .extension()
            .is_some_and(|e| e == "ts" || e == "js");
        (is_script && !self.ignore.is_match(path)) || self.should_process(path)
    }
}
