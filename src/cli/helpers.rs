//! Shared helper functions for CLI commands
//!
//! Project, rate table and quote lookups used by several command modules.

use miette::Result;
use std::path::PathBuf;

use crate::core::identity::Id;
use crate::core::{Config, Project, RateConfig, RateStore};
use crate::entities::Quote;

/// Format an Id for display, truncating if too long
///
/// IDs longer than 16 characters are truncated to 13 chars with "..." suffix.
pub fn format_short_id(id: &Id) -> String {
    let s = id.to_string();
    if s.len() > 16 {
        format!("{}...", &s[..13])
    } else {
        s
    }
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Make a cell safe for tab-separated output
pub fn escape_tsv(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}

/// Discover the enclosing project
pub fn require_project() -> Result<Project> {
    Project::discover().map_err(|e| miette::miette!("{}", e))
}

/// The rate table in effect plus where it is stored
pub struct RateContext {
    pub path: Option<PathBuf>,
    pub store: RateStore,
}

impl RateContext {
    /// Load the rate table resolved from config and the current project
    pub fn load(config: &Config) -> Result<Self> {
        let project = Project::discover().ok();
        let path = config.rates_path(project.as_ref());
        let rates = match &path {
            Some(path) => RateConfig::load(path).map_err(|e| miette::miette!("{}", e))?,
            None => RateConfig::default(),
        };
        Ok(Self {
            path,
            store: RateStore::new(rates),
        })
    }

    /// Persist the current table
    pub fn save(&self) -> Result<&PathBuf> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| miette::miette!("No location available for the rate table"))?;
        self.store
            .snapshot()
            .save(path)
            .map_err(|e| miette::miette!("{}", e))?;
        Ok(path)
    }
}

/// Load every readable quote in the project
///
/// Unreadable files are skipped with a warning.
pub fn load_quotes(project: &Project) -> Vec<(PathBuf, Quote)> {
    project
        .quote_files()
        .into_iter()
        .filter_map(|path| match Quote::load(&path) {
            Ok(quote) => Some((path, quote)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping quote file");
                None
            }
        })
        .collect()
}

/// Find exactly one quote matching a full ID or ULID prefix
pub fn find_quote(project: &Project, text: &str) -> Result<(PathBuf, Quote)> {
    let mut matches: Vec<(PathBuf, Quote)> = load_quotes(project)
        .into_iter()
        .filter(|(_, quote)| quote.id.matches(text))
        .collect();

    match matches.len() {
        0 => Err(miette::miette!("No quote found matching '{}'", text)),
        1 => Ok(matches.remove(0)),
        n => Err(miette::miette!(
            "'{}' matches {} quotes; use more characters",
            text,
            n
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::IdPrefix;

    #[test]
    fn test_format_short_id() {
        let id = Id::new(IdPrefix::Quot);
        let formatted = format_short_id(&id);
        assert!(formatted.len() <= 16);
        assert!(formatted.ends_with("..."));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("µµµµµµ", 5), "µµ...");
    }

    #[test]
    fn test_escape_tsv() {
        assert_eq!(escape_tsv("simple"), "simple");
        assert_eq!(escape_tsv("with\ttab"), "with tab");
        assert_eq!(escape_tsv("two\nlines"), "two lines");
    }
}
