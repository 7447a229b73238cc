//! `plateq extract` command - drawing/BOM text extraction
//!
//! Runs the configured extraction program (default `pdftotext`) and prints
//! the text it produces. Failures are reported, never retried.

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::extract::{CommandExtractor, ServiceError, TextExtractor};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct ExtractArgs {
    /// Drawing or BOM file to extract text from
    pub file: PathBuf,

    /// Extraction command template, overriding config (`{file}` marks the input)
    #[arg(long)]
    pub command: Option<String>,

    /// Write the text to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExtractArgs, global: &GlobalOpts) -> Result<()> {
    let template = args.command.unwrap_or_else(|| Config::load().extractor());
    let extractor =
        CommandExtractor::from_template(&template).map_err(|e| miette::miette!("{}", e))?;

    let text = extractor.extract(&args.file).map_err(|e| match e {
        ServiceError::NotInstalled { .. } => miette::miette!(
            help = "Install it or set `extractor` in .plateq/config.yaml (or PLATEQ_EXTRACTOR)",
            "{}",
            e
        ),
        other => miette::miette!("{}", other),
    })?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &text).map_err(|e| miette::miette!("{}", e))?;
            if !global.quiet {
                println!(
                    "{} Extracted {} lines to {}",
                    style("✓").green(),
                    text.lines().count(),
                    style(path.display()).cyan()
                );
            }
        }
        None => print!("{}", text),
    }
    Ok(())
}
