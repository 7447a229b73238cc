//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

use crate::core::project::Project;

/// Default external program for drawing/BOM text extraction
pub const DEFAULT_EXTRACTOR: &str = "pdftotext -layout {file} -";

/// Plateq configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default author recorded on new quotes
    pub author: Option<String>,

    /// Rate table location (relative paths resolve against the project root)
    pub rates_file: Option<PathBuf>,

    /// Text extraction command; `{file}` is replaced with the input path
    pub extractor: Option<String>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/plateq/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.plateq/config.yaml)
        if let Ok(project) = Project::discover() {
            if let Some(project_config) = Self::read_file(&project.config_path()) {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(author) = std::env::var("PLATEQ_AUTHOR") {
            config.author = Some(author);
        }
        if let Ok(rates) = std::env::var("PLATEQ_RATES") {
            config.rates_file = Some(PathBuf::from(rates));
        }
        if let Ok(extractor) = std::env::var("PLATEQ_EXTRACTOR") {
            config.extractor = Some(extractor);
        }

        config
    }

    fn read_file(path: &std::path::Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    /// Get the path to the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "plateq").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.rates_file.is_some() {
            self.rates_file = other.rates_file;
        }
        if other.extractor.is_some() {
            self.extractor = other.extractor;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Resolve where the rate table lives
    ///
    /// An explicit `rates_file` wins; otherwise the project's
    /// `.plateq/rates.yaml`, and outside a project the global config dir.
    pub fn rates_path(&self, project: Option<&Project>) -> Option<PathBuf> {
        if let Some(ref path) = self.rates_file {
            if path.is_relative() {
                if let Some(project) = project {
                    return Some(project.root().join(path));
                }
            }
            return Some(path.clone());
        }

        match project {
            Some(project) => Some(project.rates_path()),
            None => Self::global_config_dir().map(|dir| dir.join("rates.yaml")),
        }
    }

    /// Get the extraction command template
    pub fn extractor(&self) -> String {
        self.extractor
            .clone()
            .unwrap_or_else(|| DEFAULT_EXTRACTOR.to_string())
    }

    /// Get the author name, falling back to git config or username
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }
}
