//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    completions::CompletionsArgs, extract::ExtractArgs, init::InitArgs, labor::LaborArgs,
    quote::QuoteCommands, rack::RackArgs, rates::RatesCommands,
};

#[derive(Parser)]
#[command(name = "plateq")]
#[command(author, version, about = "Plating shop quoting toolkit")]
#[command(long_about = "Estimates surface-prep labor, rack capacity and plating cost for metal-finishing quotes kept as plain YAML files.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose (debug) logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new plateq project
    Init(InitArgs),

    /// Rate table management (hourly rate, process and material rates)
    #[command(subcommand)]
    Rates(RatesCommands),

    /// Estimate prep labor for a part without saving a quote
    Labor(LaborArgs),

    /// Plan rack loading for a part without saving a quote
    Rack(RackArgs),

    /// Quote management
    #[command(subcommand)]
    Quote(QuoteCommands),

    /// Extract text from a drawing or BOM file with an external tool
    Extract(ExtractArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tables for terminals, YAML for single documents
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Tab-separated values (for piping)
    Tsv,
    /// Markdown tables
    Md,
}
