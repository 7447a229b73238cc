//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::rates::RateConfig;

/// Name of the project marker directory
const PROJECT_DIR: &str = ".plateq";

/// Directory holding quote documents
const QUOTES_DIR: &str = "quotes";

/// Represents a Plateq project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .plateq/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current =
            std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::write_structure(root)
    }

    /// Force initialization even if .plateq/ exists
    ///
    /// The rate table is reset to defaults; existing quotes are left alone.
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_structure(root)
    }

    fn write_structure(root: PathBuf) -> Result<Self, ProjectError> {
        let project = Self { root };

        std::fs::create_dir_all(project.plateq_dir())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::create_dir_all(project.quotes_dir())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        std::fs::write(project.config_path(), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        RateConfig::default()
            .save(&project.rates_path())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Ok(project)
    }

    fn default_config() -> &'static str {
        r#"# Plateq Project Configuration

# Author recorded on new quotes (default: git user.name)
# author: ""

# Rate table location, relative to the project root
# rates_file: .plateq/rates.yaml

# Drawing/BOM text extraction command; {file} is replaced with the input path
# extractor: "pdftotext -layout {file} -"

# Default output format (auto, yaml, json, tsv, md)
# default_format: auto
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .plateq configuration directory
    pub fn plateq_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Project configuration file
    pub fn config_path(&self) -> PathBuf {
        self.plateq_dir().join("config.yaml")
    }

    /// Project rate table
    pub fn rates_path(&self) -> PathBuf {
        self.plateq_dir().join("rates.yaml")
    }

    /// Directory holding quote documents
    pub fn quotes_dir(&self) -> PathBuf {
        self.root.join(QUOTES_DIR)
    }

    /// Iterate all quote files in the project, sorted by file name
    pub fn quote_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(self.quotes_dir())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "yaml"))
                    .collect()
            })
            .unwrap_or_default();
        files.sort();
        files
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a Plateq project (searched from {searched_from:?}). Run 'plateq init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("Plateq project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
