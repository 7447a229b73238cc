//! Output formatting shared by commands
//!
//! Tables go through `tabled`; structured output goes through serde. The
//! `auto` format falls back to the configured `default_format` before
//! picking a pretty table.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::escape_tsv;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

/// Resolve `auto` against the configured default format
pub fn effective_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    match config.default_format.as_deref() {
        Some(name) => <OutputFormat as clap::ValueEnum>::from_str(name, true).unwrap_or_else(|_| {
            tracing::warn!(format = name, "unknown default_format in config, using auto");
            OutputFormat::Auto
        }),
        None => OutputFormat::Auto,
    }
}

/// Print a value as YAML or JSON
///
/// Returns `false` when the format is not a structured one, so the caller
/// can render its own view.
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(value).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Render rows as a table in the requested format
pub fn render_table(header: &[&str], rows: &[Vec<String>], format: OutputFormat) -> String {
    match format {
        OutputFormat::Tsv => {
            let mut out = header.join("\t");
            out.push('\n');
            for row in rows {
                let cells: Vec<String> = row.iter().map(|c| escape_tsv(c)).collect();
                out.push_str(&cells.join("\t"));
                out.push('\n');
            }
            out
        }
        _ => {
            let mut builder = Builder::default();
            builder.push_record(header.iter().copied());
            for row in rows {
                builder.push_record(row.iter().map(String::as_str));
            }
            let mut table = builder.build();
            if format == OutputFormat::Md {
                table.with(Style::markdown());
            } else {
                table.with(Style::rounded());
            }
            format!("{}\n", table)
        }
    }
}

/// Format minutes with two decimals
pub fn minutes(value: f64) -> String {
    format!("{:.2}", value)
}

/// Format a dollar amount with two decimals
pub fn money(value: f64) -> String {
    format!("${:.2}", crate::core::numeric::round_cents(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(format: OutputFormat) -> GlobalOpts {
        GlobalOpts {
            format,
            quiet: false,
            verbose: false,
        }
    }

    #[test]
    fn test_effective_format_prefers_flag() {
        let config = Config {
            default_format: Some("json".to_string()),
            ..Config::default()
        };
        assert_eq!(effective_format(&opts(OutputFormat::Tsv), &config), OutputFormat::Tsv);
        assert_eq!(effective_format(&opts(OutputFormat::Auto), &config), OutputFormat::Json);
    }

    #[test]
    fn test_effective_format_unknown_default() {
        let config = Config {
            default_format: Some("xml".to_string()),
            ..Config::default()
        };
        assert_eq!(effective_format(&opts(OutputFormat::Auto), &config), OutputFormat::Auto);
    }

    #[test]
    fn test_render_tsv() {
        let rows = vec![vec!["a".to_string(), "1.00".to_string()]];
        let out = render_table(&["NAME", "VALUE"], &rows, OutputFormat::Tsv);
        assert_eq!(out, "NAME\tVALUE\na\t1.00\n");
    }

    #[test]
    fn test_render_markdown() {
        let rows = vec![vec!["grit".to_string(), "5.00".to_string()]];
        let out = render_table(&["OP", "MIN"], &rows, OutputFormat::Md);
        assert!(out.contains("| OP"));
        assert!(out.contains("| grit"));
    }

    #[test]
    fn test_money() {
        assert_eq!(money(375.0), "$375.00");
        assert_eq!(money(3.749999), "$3.75");
    }
}
